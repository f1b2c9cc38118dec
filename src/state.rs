use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::storage::TeacherStore;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to create upload dir {path}: {source}")]
    UploadDir { path: PathBuf, source: std::io::Error },

    #[error("failed to build http client: {0}")]
    HttpClient(reqwest::Error),
}

pub struct AppState {
    pub store: TeacherStore,
    pub http: reqwest::Client,
    pub upload_dir: PathBuf,
}

impl AppState {
    pub fn new() -> Result<Self, StateError> {
        let upload_dir = std::env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("uploads"));

        std::fs::create_dir_all(&upload_dir).map_err(|source| StateError::UploadDir {
            path: upload_dir.clone(),
            source,
        })?;

        // A hung remote photo load would otherwise stall a card render
        // indefinitely; cap it and let the compositor fall back.
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(StateError::HttpClient)?;

        Ok(Self {
            store: TeacherStore::new(),
            http,
            upload_dir,
        })
    }
}
