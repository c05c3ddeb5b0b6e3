// src/services/storage.rs

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use rand::{Rng, distributions::Alphanumeric};
use uuid::Uuid;

use crate::common::error::{AppError, AppResult};

const SUFFIX_LEN: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub url: String,
}

/// Armazenamento das fotos de encomendas. O backend em disco atende o
/// desenvolvimento; em produção entra um bucket atrás do mesmo trait.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> AppResult<StoredObject>;
}

fn extension_for(mime_type: &str) -> &'static str {
    match mime_type.to_ascii_lowercase().as_str() {
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/heic" => "heic",
        _ => "jpg",
    }
}

/// `packages/{tenant}/{unix_millis}-{sufixo}.{ext}`
pub fn photo_key(tenant_id: Uuid, mime_type: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(|byte| char::from(byte).to_ascii_lowercase())
        .collect();

    format!(
        "packages/{}/{}-{}.{}",
        tenant_id,
        Utc::now().timestamp_millis(),
        suffix,
        extension_for(mime_type)
    )
}

#[derive(Debug, Clone)]
pub struct LocalDiskStorage {
    root: PathBuf,
    public_url: String,
}

impl LocalDiskStorage {
    pub fn new(root: impl Into<PathBuf>, public_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_url: public_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

#[async_trait]
impl ObjectStorage for LocalDiskStorage {
    async fn put(&self, key: &str, bytes: Vec<u8>, _content_type: &str) -> AppResult<StoredObject> {
        let key = key.trim_start_matches('/');
        if key.split('/').any(|segment| segment == "..") {
            return Err(AppError::BadRequest("Invalid storage key.".into()));
        }

        let path = self.root.join(key);
        let unavailable = |e: std::io::Error| {
            tracing::error!(key, "Falha ao gravar objeto: {:?}", e);
            AppError::Unavailable("Photo storage is unavailable.".into())
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(unavailable)?;
        }
        tokio::fs::write(&path, bytes).await.map_err(unavailable)?;

        Ok(StoredObject {
            key: key.to_string(),
            url: format!("{}/{}", self.public_url, key),
        })
    }
}
