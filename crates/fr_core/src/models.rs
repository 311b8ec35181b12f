use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A Medium article after extraction, ready for display and history storage.
///
/// Field names serialize in camelCase so persisted history files stay
/// compatible with the records the web reader writes to local storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Millisecond-timestamp id assigned at extraction time, immutable.
    pub id: String,
    /// Original source URL. Acts as the natural external key, but storage
    /// does not enforce uniqueness.
    pub url: String,
    pub title: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_avatar: Option<String>,
    pub published_at: DateTime<Utc>,
    /// Present only when distinct from `published_at`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Estimated minutes to read, never below 5.
    pub reading_time: u32,
    /// Sanitized HTML fragment, never empty.
    pub content: String,
    pub excerpt: String,
    /// De-duplicated, at most 8 entries.
    pub tags: Vec<String>,
    /// When the record entered the reading history.
    pub added_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub is_paid: bool,
    /// Free-text reading-time label scraped from the source UI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claps: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responses: Option<u32>,
}

impl Article {
    /// Case-insensitive substring match over title, author and tags, the
    /// filter the history view exposes.
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.title.to_lowercase().contains(&query)
            || self.author.to_lowercase().contains(&query)
            || self
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article() -> Article {
        Article {
            id: "1".to_string(),
            url: "https://medium.com/@alice/my-post".to_string(),
            title: "Understanding Rust Lifetimes".to_string(),
            author: "Alice Writes".to_string(),
            author_handle: Some("alice".to_string()),
            author_avatar: None,
            published_at: Utc::now(),
            updated_at: None,
            reading_time: 5,
            content: "<p>Hello</p>".to_string(),
            excerpt: "Hello".to_string(),
            tags: vec!["Rust".to_string(), "Lifetimes".to_string()],
            added_at: Utc::now(),
            image: None,
            is_paid: false,
            read: None,
            claps: None,
            responses: None,
        }
    }

    #[test]
    fn test_matches_query() {
        let article = article();
        assert!(article.matches_query("rust"));
        assert!(article.matches_query("ALICE"));
        assert!(article.matches_query("lifetimes"));
        assert!(!article.matches_query("golang"));
    }

    #[test]
    fn test_camel_case_serialization() {
        let json = serde_json::to_string(&article()).unwrap();
        assert!(json.contains("\"publishedAt\""));
        assert!(json.contains("\"readingTime\""));
        assert!(json.contains("\"authorHandle\""));
        assert!(json.contains("\"isPaid\""));
        // absent optionals are omitted, not serialized as null
        assert!(!json.contains("authorAvatar"));
        assert!(!json.contains("claps"));
    }

    #[test]
    fn test_roundtrip() {
        let article = article();
        let json = serde_json::to_string(&article).unwrap();
        let back: Article = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, article.id);
        assert_eq!(back.tags, article.tags);
        assert_eq!(back.published_at, article.published_at);
    }
}
