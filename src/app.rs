//! Request orchestration for frame creation, AI frame generation and lookup.

use crate::ai::{
    GeneratedImage, HttpImageDownloader, ImageDownloader, ImageGenerationService,
    MockDownloader, MockImageGenerationClient, OpenAiImageClient, FRAME_IMAGE_SIZE,
};
use crate::db::{pool, FrameRepository, SqliteFrameRepository};
use crate::image::{ImageProcessor, ImageService, JPEG_CONTENT_TYPE, PNG_CONTENT_TYPE};
use crate::models::{Config, CreatedFrame, FrameRecord, FrameUpload, NewFrame};
use crate::prompts;
use crate::storage::{MockStorageClient, S3StorageClient, StorageService, Visibility};
use crate::translate::{GoogleTranslateClient, MockTranslator, Translator};
use crate::{Error, Result};
use chrono::{DateTime, Local, Utc};
use tracing::{error, info, warn};
use uuid::Uuid;

/// Prefix for generated frame backgrounds in object storage.
pub const AI_FRAME_PREFIX: &str = "ai-frames";

/// Characters of the user's prompt kept in an AI frame's object key.
const PROMPT_SLUG_LEN: usize = 30;

/// Behaviour knobs that are not collaborators.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub source_lang: String,
    pub target_lang: String,
    /// Include raw error text in 500 responses.
    pub expose_error_details: bool,
    /// Answer unknown frame ids with 404 instead of the legacy 500.
    pub not_found_as_404: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            source_lang: "ko".to_string(),
            target_lang: "en".to_string(),
            expose_error_details: false,
            not_found_as_404: false,
        }
    }
}

impl From<&Config> for AppSettings {
    fn from(config: &Config) -> Self {
        Self {
            source_lang: config.translate_source_lang.clone(),
            target_lang: config.translate_target_lang.clone(),
            expose_error_details: config.expose_error_details,
            not_found_as_404: config.not_found_as_404,
        }
    }
}

/// Owns the collaborator handles shared by every request.
pub struct App {
    storage: Box<dyn StorageService>,
    image: Box<dyn ImageService>,
    translator: Box<dyn Translator>,
    image_gen: Box<dyn ImageGenerationService>,
    downloader: Box<dyn ImageDownloader>,
    frames: Box<dyn FrameRepository>,
    settings: AppSettings,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub storage: Box<dyn StorageService>,
    pub image: Box<dyn ImageService>,
    pub translator: Box<dyn Translator>,
    pub image_gen: Box<dyn ImageGenerationService>,
    pub downloader: Box<dyn ImageDownloader>,
    pub frames: Box<dyn FrameRepository>,
}

impl App {
    /// Build an app from concrete service dependencies.
    pub fn with_services(services: AppServices, settings: AppSettings) -> Self {
        Self {
            storage: services.storage,
            image: services.image,
            translator: services.translator,
            image_gen: services.image_gen,
            downloader: services.downloader,
            frames: services.frames,
            settings,
        }
    }

    /// Construct an app from environment configuration (`Config::from_env`).
    pub async fn new(config: &Config) -> Result<Self> {
        let db_pool = if config.dry_run {
            info!("DRY_RUN enabled; frames are kept in memory");
            pool::init_memory_pool()?
        } else {
            info!("Opening frame database at {}", config.database_path);
            pool::init_pool(&config.database_path)?
        };
        let frames = Box::new(SqliteFrameRepository::new(db_pool));

        let services = if config.dry_run {
            info!("DRY_RUN enabled; storage, translation and generation are mocked");
            AppServices {
                storage: Box::new(
                    MockStorageClient::new().with_base_url(config.storage.base_url.clone()),
                ),
                image: Box::new(ImageProcessor::new()),
                translator: Box::new(MockTranslator::new()),
                image_gen: Box::new(MockImageGenerationClient::new()),
                downloader: Box::new(MockDownloader::new()),
                frames,
            }
        } else {
            info!(
                "Storage bucket: {} ({}), image model: {}",
                config.storage.bucket, config.storage.endpoint, config.image_model
            );
            AppServices {
                storage: Box::new(S3StorageClient::new(&config.storage).await?),
                image: Box::new(ImageProcessor::new()),
                translator: Box::new(GoogleTranslateClient::new(
                    config.translate_api_key.clone(),
                )?),
                image_gen: Box::new(OpenAiImageClient::new(
                    config.openai_api_key.clone(),
                    config.image_model.clone(),
                )?),
                downloader: Box::new(HttpImageDownloader::new(config.download_timeout)?),
                frames,
            }
        };

        Ok(Self::with_services(services, AppSettings::from(config)))
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    /// Re-encode an uploaded frame, store it and record it.
    ///
    /// The storage upload and the record insert are independent writes: if the
    /// insert fails the uploaded object stays in storage.
    pub async fn create_frame(&self, upload: FrameUpload) -> Result<CreatedFrame> {
        let jpeg = self.image.reencode_jpeg(&upload.image).await?;

        let key = frame_object_key(Utc::now());
        let frame_img_url = self
            .storage
            .upload(&jpeg, &key, JPEG_CONTENT_TYPE, Visibility::PublicRead)
            .await?
            .ok_or_else(|| Error::StorageNoUrl(key.clone()))?;
        info!("Uploaded frame image {} ({} bytes)", key, jpeg.len());

        let record = self
            .frames
            .create(NewFrame {
                frame_url: key.clone(),
                camera_size: upload.camera_size,
            })
            .await
            .inspect_err(|e| warn!("Frame image {} stored but record insert failed: {}", key, e))?;

        info!(
            "Created frame {} ({}x{})",
            record.frame_id, record.camera_width, record.camera_height
        );

        Ok(CreatedFrame {
            frame_id: record.frame_id,
            frame_img_url,
        })
    }

    /// Generate a decorative frame background for `prompt` and return its
    /// public URL. Nothing is persisted besides the stored image.
    pub async fn generate_ai_frame(&self, prompt: &str) -> Result<String> {
        let translated = self
            .translator
            .translate(prompt, &self.settings.source_lang, &self.settings.target_lang)
            .await?;
        info!("Translated frame prompt '{}' -> '{}'", prompt, translated);

        let detailed_prompt = prompts::frame_background(&translated);

        let generated = self
            .image_gen
            .generate(&detailed_prompt, 1, FRAME_IMAGE_SIZE)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::AiProvider("Image generation returned no results".to_string()))?;

        let image_bytes = match generated {
            GeneratedImage::Url(url) => self.downloader.download(&url).await?,
            GeneratedImage::Inline(bytes) => bytes,
        };

        let key = ai_frame_object_key(prompt, Local::now());
        let url = self
            .storage
            .upload(&image_bytes, &key, PNG_CONTENT_TYPE, Visibility::PublicRead)
            .await?
            .ok_or_else(|| Error::StorageNoUrl(key.clone()))?;

        info!("Stored AI frame {} ({} bytes)", key, image_bytes.len());
        Ok(url)
    }

    /// Fetch a frame, failing with [`Error::NotFound`] for unknown ids.
    pub async fn get_frame(&self, frame_id: i64) -> Result<FrameRecord> {
        match self.frames.get_by_id(frame_id).await {
            Ok(Some(frame)) => Ok(frame),
            Ok(None) => Err(Error::NotFound {
                entity: "Frame",
                id: frame_id,
            }),
            Err(e) => {
                error!("Frame lookup {} failed: {}", frame_id, e);
                Err(e)
            }
        }
    }
}

fn unique_token() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// `frame_<unix seconds>_<token>.jpg`; the token keeps same-second uploads apart.
pub fn frame_object_key(now: DateTime<Utc>) -> String {
    format!("frame_{}_{}.jpg", now.timestamp(), unique_token())
}

/// `ai-frames/<prompt slug>_<YYYYmmddHHMMSS>_<token>.png`.
pub fn ai_frame_object_key(prompt: &str, now: DateTime<Local>) -> String {
    format!(
        "{}/{}_{}_{}.png",
        AI_FRAME_PREFIX,
        prompt_slug(prompt),
        now.format("%Y%m%d%H%M%S"),
        unique_token()
    )
}

fn prompt_slug(prompt: &str) -> String {
    prompt
        .chars()
        .take(PROMPT_SLUG_LEN)
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::GenerationCall;
    use crate::db::MockFrameRepository;
    use crate::image::MockImageProcessor;
    use crate::models::CameraSize;
    use chrono::TimeZone;

    struct Harness {
        storage: MockStorageClient,
        translator: MockTranslator,
        image_gen: MockImageGenerationClient,
        downloader: MockDownloader,
        frames: MockFrameRepository,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                storage: MockStorageClient::new().with_base_url("https://cdn.test".to_string()),
                translator: MockTranslator::new().with_translation("노을", "sunset"),
                image_gen: MockImageGenerationClient::new()
                    .with_url_response("https://images.test/1.png".to_string()),
                downloader: MockDownloader::new()
                    .with_body("https://images.test/1.png".to_string(), vec![7, 7, 7]),
                frames: MockFrameRepository::new(),
            }
        }

        fn app(&self) -> App {
            App::with_services(
                AppServices {
                    storage: Box::new(self.storage.clone()),
                    image: Box::new(MockImageProcessor::new()),
                    translator: Box::new(self.translator.clone()),
                    image_gen: Box::new(self.image_gen.clone()),
                    downloader: Box::new(self.downloader.clone()),
                    frames: Box::new(self.frames.clone()),
                },
                AppSettings::default(),
            )
        }
    }

    fn upload() -> FrameUpload {
        FrameUpload {
            image: vec![1, 2, 3],
            camera_size: CameraSize::new(1080, 1920).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_create_frame_uploads_then_records() {
        let harness = Harness::new();

        let created = harness.app().create_frame(upload()).await.unwrap();

        let frames = harness.frames.get_frames();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].frame_id, created.frame_id);
        assert_eq!(frames[0].camera_width, 1080);
        assert_eq!(frames[0].camera_height, 1920);

        let objects = harness.storage.get_objects();
        let stored = objects.get(&frames[0].frame_url).unwrap();
        assert_eq!(stored.content_type, "image/jpeg");
        assert_eq!(stored.visibility, Visibility::PublicRead);
        assert_eq!(
            created.frame_img_url,
            format!("https://cdn.test/{}", frames[0].frame_url)
        );
    }

    #[tokio::test]
    async fn test_create_frame_without_storage_url_records_nothing() {
        let mut harness = Harness::new();
        harness.storage = MockStorageClient::new().without_url();

        let err = harness.app().create_frame(upload()).await.unwrap_err();

        assert!(matches!(err, Error::StorageNoUrl(_)));
        assert!(harness.frames.get_frames().is_empty());
    }

    #[tokio::test]
    async fn test_create_frame_persist_failure_leaves_object() {
        let mut harness = Harness::new();
        harness.frames = MockFrameRepository::new().with_create_failure(true);

        let err = harness.app().create_frame(upload()).await.unwrap_err();

        assert!(matches!(err, Error::Database(_)));
        assert_eq!(harness.storage.get_upload_count(), 1);
    }

    #[tokio::test]
    async fn test_generate_ai_frame_flow() {
        let harness = Harness::new();

        let url = harness.app().generate_ai_frame("노을").await.unwrap();

        assert!(url.starts_with("https://cdn.test/ai-frames/노을_"));
        assert!(url.ends_with(".png"));

        let calls = harness.image_gen.get_calls();
        assert_eq!(
            calls,
            vec![GenerationCall {
                prompt: prompts::frame_background("sunset"),
                count: 1,
                size: "1024x1024".to_string(),
            }]
        );
        assert_eq!(
            harness.downloader.get_downloads(),
            vec!["https://images.test/1.png".to_string()]
        );

        let objects = harness.storage.get_objects();
        let (_, stored) = objects.iter().next().unwrap();
        assert_eq!(stored.data, vec![7, 7, 7]);
        assert_eq!(stored.content_type, "image/png");
        assert!(harness.frames.get_frames().is_empty());
    }

    #[tokio::test]
    async fn test_generate_ai_frame_inline_skips_download() {
        let mut harness = Harness::new();
        harness.image_gen =
            MockImageGenerationClient::new().with_response(vec![GeneratedImage::Inline(vec![5])]);

        harness.app().generate_ai_frame("노을").await.unwrap();

        assert!(harness.downloader.get_downloads().is_empty());
        assert_eq!(harness.storage.get_upload_count(), 1);
    }

    #[tokio::test]
    async fn test_generate_ai_frame_propagates_translation_failure() {
        let mut harness = Harness::new();
        harness.translator = MockTranslator::new().with_failure(true);

        let err = harness.app().generate_ai_frame("노을").await.unwrap_err();

        assert!(matches!(err, Error::Translation(_)));
        assert_eq!(harness.image_gen.get_call_count(), 0);
        assert_eq!(harness.storage.get_upload_count(), 0);
    }

    #[tokio::test]
    async fn test_generate_ai_frame_empty_generation_result() {
        let mut harness = Harness::new();
        harness.image_gen = MockImageGenerationClient::new().with_response(vec![]);

        let err = harness.app().generate_ai_frame("노을").await.unwrap_err();

        assert!(matches!(err, Error::AiProvider(_)));
    }

    #[tokio::test]
    async fn test_get_frame_distinguishes_missing_from_failure() {
        let harness = Harness::new();
        let app = harness.app();
        let created = app.create_frame(upload()).await.unwrap();

        let found = app.get_frame(created.frame_id).await.unwrap();
        assert_eq!(found.frame_id, created.frame_id);

        let missing = app.get_frame(created.frame_id + 100).await.unwrap_err();
        assert!(matches!(missing, Error::NotFound { entity: "Frame", .. }));

        let mut failing = Harness::new();
        failing.frames = MockFrameRepository::new().with_get_failure(true);
        let err = failing.app().get_frame(1).await.unwrap_err();
        assert!(matches!(err, Error::Database(_)));
    }

    fn dry_run_config(database_path: String) -> Config {
        Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            database_path,
            storage: crate::models::StorageConfig {
                access_key_id: String::new(),
                secret_access_key: String::new(),
                endpoint: "https://storage.test".to_string(),
                region: "ap-northeast-2".to_string(),
                bucket: "inframe".to_string(),
                base_url: "https://cdn.test".to_string(),
            },
            openai_api_key: String::new(),
            image_model: "dall-e-3".to_string(),
            translate_api_key: String::new(),
            translate_source_lang: "ko".to_string(),
            translate_target_lang: "en".to_string(),
            download_timeout: std::time::Duration::from_secs(5),
            max_upload_bytes: 1024,
            expose_error_details: false,
            not_found_as_404: false,
            dry_run: true,
        }
    }

    #[tokio::test]
    async fn test_dry_run_keeps_frames_in_memory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frames.sqlite3");
        let config = dry_run_config(path.to_string_lossy().to_string());

        let app = App::new(&config).await.unwrap();

        let mut png = Vec::new();
        image::RgbImage::new(4, 4)
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();
        let created = app
            .create_frame(FrameUpload {
                image: png,
                camera_size: CameraSize::new(4, 4).unwrap(),
            })
            .await
            .unwrap();

        let found = app.get_frame(created.frame_id).await.unwrap();
        assert_eq!(found.camera_width, 4);
        assert!(created.frame_img_url.starts_with("https://cdn.test/frame_"));
        assert!(!path.exists());
    }

    #[test]
    fn test_frame_object_key_is_unique_within_a_second() {
        let now = Utc.with_ymd_and_hms(2025, 1, 15, 8, 17, 0).unwrap();

        let a = frame_object_key(now);
        let b = frame_object_key(now);

        assert!(a.starts_with(&format!("frame_{}_", now.timestamp())));
        assert!(a.ends_with(".jpg"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_ai_frame_object_key_layout() {
        let now = Local.with_ymd_and_hms(2025, 1, 15, 8, 17, 30).unwrap();

        let key = ai_frame_object_key("a very long prompt about sunsets over the sea", now);

        assert!(key.starts_with("ai-frames/a_very_long_prompt_about_sunse_20250115081730_"));
        assert!(key.ends_with(".png"));
    }

    #[test]
    fn test_prompt_slug_counts_characters_not_bytes() {
        let prompt = "가".repeat(40);
        assert_eq!(prompt_slug(&prompt).chars().count(), 30);
        assert_eq!(prompt_slug("a/b\\c d"), "a_b_c_d");
    }
}
