use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use fr_core::{Article, ArticleStorage, Result, HISTORY_LIMIT};

/// In-memory history, newest first. State lives only for the process
/// lifetime; useful for tests and throwaway sessions.
pub struct MemoryStorage {
    articles: Arc<RwLock<Vec<Article>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            articles: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArticleStorage for MemoryStorage {
    async fn add_article(&self, article: &Article) -> Result<()> {
        let mut articles = self.articles.write().await;
        articles.insert(0, article.clone());
        articles.truncate(HISTORY_LIMIT);
        Ok(())
    }

    async fn list_articles(&self) -> Result<Vec<Article>> {
        Ok(self.articles.read().await.clone())
    }

    async fn get_article(&self, id: &str) -> Result<Option<Article>> {
        Ok(self
            .articles
            .read()
            .await
            .iter()
            .find(|article| article.id == id)
            .cloned())
    }

    async fn delete_article(&self, id: &str) -> Result<bool> {
        let mut articles = self.articles.write().await;
        let before = articles.len();
        articles.retain(|article| article.id != id);
        Ok(articles.len() < before)
    }

    async fn clear(&self) -> Result<()> {
        self.articles.write().await.clear();
        Ok(())
    }

    async fn search(&self, query: &str) -> Result<Vec<Article>> {
        Ok(self
            .articles
            .read()
            .await
            .iter()
            .filter(|article| article.matches_query(query))
            .cloned()
            .collect())
    }
}
