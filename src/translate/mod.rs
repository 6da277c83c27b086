//! Prompt translation
//!
//! Users write frame prompts in their own language; the image model is
//! prompted in English.

pub mod client;
pub mod mock;

pub use client::GoogleTranslateClient;
pub use mock::MockTranslator;

use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String>;
}
