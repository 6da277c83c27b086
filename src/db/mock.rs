use super::FrameRepository;
use crate::models::{FrameRecord, NewFrame};
use crate::{Error, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct MockFrameRepository {
    frames: Arc<Mutex<Vec<FrameRecord>>>,
    fail_create: bool,
    fail_get: bool,
}

impl MockFrameRepository {
    pub fn new() -> Self {
        Self {
            frames: Arc::new(Mutex::new(Vec::new())),
            fail_create: false,
            fail_get: false,
        }
    }

    pub fn with_frame(self, frame: FrameRecord) -> Self {
        self.frames.lock().unwrap().push(frame);
        self
    }

    pub fn with_create_failure(mut self, should_fail: bool) -> Self {
        self.fail_create = should_fail;
        self
    }

    pub fn with_get_failure(mut self, should_fail: bool) -> Self {
        self.fail_get = should_fail;
        self
    }

    pub fn get_frames(&self) -> Vec<FrameRecord> {
        self.frames.lock().unwrap().clone()
    }
}

impl Default for MockFrameRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FrameRepository for MockFrameRepository {
    async fn create(&self, frame: NewFrame) -> Result<FrameRecord> {
        if self.fail_create {
            return Err(Error::Database("Mock failure".to_string()));
        }

        let mut frames = self.frames.lock().unwrap();
        let frame_id = frames.iter().map(|f| f.frame_id).max().unwrap_or(0) + 1;
        let record = FrameRecord {
            frame_id,
            frame_url: frame.frame_url,
            camera_width: frame.camera_size.width(),
            camera_height: frame.camera_size.height(),
            created_at: Utc::now(),
        };
        frames.push(record.clone());
        Ok(record)
    }

    async fn get_by_id(&self, frame_id: i64) -> Result<Option<FrameRecord>> {
        if self.fail_get {
            return Err(Error::Database("Mock failure".to_string()));
        }

        Ok(self
            .frames
            .lock()
            .unwrap()
            .iter()
            .find(|f| f.frame_id == frame_id)
            .cloned())
    }
}
