//! Backend for the frame service.
//!
//! Accepts user frame uploads and AI-generated frame backgrounds, stores the
//! images in S3-compatible object storage and records uploaded frames in
//! SQLite.

pub mod ai;
pub mod app;
pub mod db;
pub mod error;
pub mod image;
pub mod models;
pub mod prompts;
pub mod server;
pub mod storage;
pub mod translate;

pub use error::{Error, Result};
