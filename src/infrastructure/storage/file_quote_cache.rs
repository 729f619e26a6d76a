use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::{fs, sync::Mutex};

use crate::{application::ports::QuoteCache, domain::Quote, shared::AppError};

/// Local cache holding the whole collection as one JSON document under a single key.
pub struct FileQuoteCache {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileQuoteCache {
    pub async fn new(root_dir: impl AsRef<Path>, key: &str) -> Result<Self, AppError> {
        let root_dir = root_dir.as_ref();
        fs::create_dir_all(root_dir).await.map_err(|err| {
            AppError::Storage(format!("Failed to create cache dir {}: {err}", root_dir.display()))
        })?;

        Ok(Self {
            path: root_dir.join(format!("{key}.json")),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl QuoteCache for FileQuoteCache {
    async fn load(&self) -> Result<Vec<Quote>, AppError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(AppError::Storage(format!("Failed to read quote cache: {err}")));
            }
        };
        if bytes.is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&bytes).map_err(|err| {
            AppError::DeserializationError(format!("Failed to parse quote cache: {err}"))
        })
    }

    async fn save(&self, quotes: &[Quote]) -> Result<(), AppError> {
        let json = serde_json::to_vec(quotes).map_err(|err| {
            AppError::SerializationError(format!("Failed to encode quote cache: {err}"))
        })?;

        let _guard = self.write_lock.lock().await;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .await
            .map_err(|err| AppError::Storage(format!("Failed to write quote cache: {err}")))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|err| AppError::Storage(format!("Failed to replace quote cache: {err}")))?;
        tracing::debug!("Cached {} quotes at {}", quotes.len(), self.path.display());
        Ok(())
    }
}
