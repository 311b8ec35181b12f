use async_trait::async_trait;

use crate::models::Article;
use crate::Result;

/// Maximum number of articles kept in the reading history. Inserting past
/// the cap evicts the oldest entries.
pub const HISTORY_LIMIT: usize = 50;

#[async_trait]
pub trait ArticleStorage: Send + Sync {
    /// Insert an article at the head of the history, evicting beyond
    /// [`HISTORY_LIMIT`]
    async fn add_article(&self, article: &Article) -> Result<()>;

    /// All stored articles, newest first
    async fn list_articles(&self) -> Result<Vec<Article>>;

    /// Look up a single article by id
    async fn get_article(&self, id: &str) -> Result<Option<Article>>;

    /// Remove an article by id, returning whether anything was removed
    async fn delete_article(&self, id: &str) -> Result<bool>;

    /// Drop the whole history
    async fn clear(&self) -> Result<()>;

    /// Case-insensitive search over title, author and tags
    async fn search(&self, query: &str) -> Result<Vec<Article>>;
}
