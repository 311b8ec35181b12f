use std::sync::Arc;

use scraper::Html;

use fr_core::{Article, ArticleStorage, Error, Result};

use crate::builder;
use crate::extractor;
use crate::fetcher::BypassClient;
use crate::logging::Logger;
use crate::validator;

/// Drives the whole pipeline for one URL: validation, fetch, extraction,
/// normalization, assembly, history insertion.
pub struct ReaderManager {
    client: BypassClient,
    storage: Arc<dyn ArticleStorage>,
    log: Logger,
}

impl ReaderManager {
    pub fn new(client: BypassClient, storage: Arc<dyn ArticleStorage>) -> Self {
        Self {
            client,
            storage,
            log: Logger::new().with_prefix("📖".to_string()),
        }
    }

    /// Turn a URL into an `Article` and record it in the reading history.
    ///
    /// A URL that does not look like a Medium article is rejected with
    /// `Error::Validation` before any network traffic. Past that point the
    /// pipeline never fails: fetch, parse or assembly errors all collapse
    /// into the diagnostic fallback article. Dropping the returned future
    /// cancels the in-flight fetch.
    pub async fn read_url(&self, url: &str) -> Result<Article> {
        if !validator::is_medium_url(url) {
            return Err(Error::Validation(format!(
                "Not a Medium article URL: {}",
                url
            )));
        }

        let article = match self.extract(url).await {
            Ok(article) => {
                self.log
                    .info(&format!("✨ Extracted \"{}\" from {}", article.title, url));
                article
            }
            Err(e) => {
                self.log
                    .warn(&format!("💥 Extraction failed for {}: {}", url, e));
                builder::fallback_article(url, &e)
            }
        };

        self.storage.add_article(&article).await?;
        self.log.debug(&format!("🗄️ Saved {} to history", article.id));
        Ok(article)
    }

    /// Fetch and assemble, one round trip. The validator's probe is folded
    /// into this fetch: failure markers on the bypass page reject the
    /// document before extraction starts.
    async fn extract(&self, url: &str) -> Result<Article> {
        let html = self.client.fetch_page(url).await?;
        if validator::has_failure_markers(&html) {
            return Err(Error::Fetch(
                "Unable to identify the link as a Medium.com article".to_string(),
            ));
        }
        let document = Html::parse_document(&html);
        let raw = extractor::extract_raw(&document);
        Ok(builder::build_article(url, raw))
    }
}
