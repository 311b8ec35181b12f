use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use fr_core::{Article, ArticleStorage, Result, HISTORY_LIMIT};

/// JSON-file history, the local-storage equivalent of the web reader.
///
/// Every operation is a read-modify-write of the whole file. Writers in
/// the same process are serialized by the lock; concurrent writers from
/// other processes are not addressed and the last write wins.
pub struct FileStorage {
    path: PathBuf,
    lock: Arc<RwLock<()>>,
}

impl FileStorage {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Arc::new(RwLock::new(())),
        }
    }

    async fn load(&self) -> Result<Vec<Article>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("history file {} not found, starting empty", self.path.display());
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, articles: &[Article]) -> Result<()> {
        let json = serde_json::to_string_pretty(articles)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

#[async_trait]
impl ArticleStorage for FileStorage {
    async fn add_article(&self, article: &Article) -> Result<()> {
        let _guard = self.lock.write().await;
        let mut articles = self.load().await?;
        articles.insert(0, article.clone());
        articles.truncate(HISTORY_LIMIT);
        self.save(&articles).await
    }

    async fn list_articles(&self) -> Result<Vec<Article>> {
        let _guard = self.lock.read().await;
        self.load().await
    }

    async fn get_article(&self, id: &str) -> Result<Option<Article>> {
        let _guard = self.lock.read().await;
        Ok(self
            .load()
            .await?
            .into_iter()
            .find(|article| article.id == id))
    }

    async fn delete_article(&self, id: &str) -> Result<bool> {
        let _guard = self.lock.write().await;
        let mut articles = self.load().await?;
        let before = articles.len();
        articles.retain(|article| article.id != id);
        let removed = articles.len() < before;
        if removed {
            self.save(&articles).await?;
        }
        Ok(removed)
    }

    async fn clear(&self) -> Result<()> {
        let _guard = self.lock.write().await;
        self.save(&[]).await
    }

    async fn search(&self, query: &str) -> Result<Vec<Article>> {
        let _guard = self.lock.read().await;
        Ok(self
            .load()
            .await?
            .into_iter()
            .filter(|article| article.matches_query(query))
            .collect())
    }
}
