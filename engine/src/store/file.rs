use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, create_dir_all};
use tracing::{info, warn};
use launchpad_core::DiscoveredToken;
use discovery::{StoreError, TokenStore};

/// One `<address>.json` file per token under a directory
pub struct JsonFileTokenStore {
    dir: PathBuf,
}

impl JsonFileTokenStore {
    pub async fn new(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.exists() {
            create_dir_all(&dir).await?;
            info!("📁 Created token store directory {}", dir.display());
        }
        Ok(Self { dir })
    }

    fn path_for(&self, address: &str) -> Result<PathBuf, StoreError> {
        let is_plain = !address.is_empty()
            && address.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !is_plain {
            return Err(StoreError::Backend(format!("refusing unsafe key {:?}", address)));
        }
        Ok(self.dir.join(format!("{}.json", address)))
    }
}

#[async_trait::async_trait]
impl TokenStore for JsonFileTokenStore {
    async fn get(&self, address: &str) -> Result<Option<DiscoveredToken>, StoreError> {
        let path = self.path_for(address)?;
        let content = match fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_slice(&content)
            .map(Some)
            .map_err(|e| StoreError::Serialization(format!("{}: {}", path.display(), e)))
    }

    async fn get_all(&self) -> Result<Vec<DiscoveredToken>, StoreError> {
        let mut tokens = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let content = match fs::read(&path).await {
                Ok(content) => content,
                Err(e) => {
                    warn!("⚠️ Skipping unreadable token file {}: {}", path.display(), e);
                    continue;
                }
            };
            match serde_json::from_slice::<DiscoveredToken>(&content) {
                Ok(token) => tokens.push(token),
                Err(e) => warn!("⚠️ Skipping corrupt token file {}: {}", path.display(), e),
            }
        }

        Ok(tokens)
    }

    async fn set(&self, address: &str, token: DiscoveredToken) -> Result<(), StoreError> {
        let path = self.path_for(address)?;
        let content = serde_json::to_vec_pretty(&token)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        // Write-then-rename so readers never see a half-written file
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content).await?;
        fs::rename(&tmp, &path).await?;
        Ok(())
    }
}
