use super::Translator;
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Looks translations up in a fixed table; unknown text is echoed back.
#[derive(Clone)]
pub struct MockTranslator {
    translations: Arc<Mutex<HashMap<String, String>>>,
    call_count: Arc<Mutex<usize>>,
    should_fail: bool,
}

impl MockTranslator {
    pub fn new() -> Self {
        Self {
            translations: Arc::new(Mutex::new(HashMap::new())),
            call_count: Arc::new(Mutex::new(0)),
            should_fail: false,
        }
    }

    pub fn with_translation(self, source: &str, translated: &str) -> Self {
        self.translations
            .lock()
            .unwrap()
            .insert(source.to_string(), translated.to_string());
        self
    }

    pub fn with_failure(mut self, should_fail: bool) -> Self {
        self.should_fail = should_fail;
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl Default for MockTranslator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, text: &str, _source_lang: &str, _target_lang: &str) -> Result<String> {
        *self.call_count.lock().unwrap() += 1;

        if self.should_fail {
            return Err(Error::Translation("Mock failure".to_string()));
        }

        let translations = self.translations.lock().unwrap();
        Ok(translations
            .get(text)
            .cloned()
            .unwrap_or_else(|| text.to_string()))
    }
}
