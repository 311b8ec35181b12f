use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;
use scraper::Html;

use fr_core::{Article, Error};

use crate::dom;
use crate::extractor::RawArticle;
use crate::fetcher::BYPASS_HOST;
use crate::normalizer::normalize_content;

const WORDS_PER_MINUTE: usize = 200;
const MIN_READING_TIME: u32 = 5;
const EXCERPT_LENGTH: usize = 250;
const MAX_TAGS: usize = 8;
/// Extracted titles shorter than this are replaced with the slug title.
const MIN_TITLE_LENGTH: usize = 10;
const MAX_TITLE_LENGTH: usize = 100;

const PLACEHOLDER_CONTENT: &str = "<p>Content could not be extracted from this article.</p>";
const FALLBACK_IMAGE: &str =
    "https://images.pexels.com/photos/4050315/pexels-photo-4050315.jpeg?auto=compress&cs=tinysrgb&w=800&h=400&fit=crop";

lazy_static! {
    static ref URL_HANDLE: Regex = Regex::new(r"@([^/]+)").unwrap();
}

/// Text content of an HTML fragment, tags dropped.
pub fn plain_text(html: &str) -> String {
    Html::parse_fragment(html)
        .root_element()
        .text()
        .collect::<String>()
}

/// Word count at 200 words per minute, rounded up.
pub fn estimate_reading_time(text: &str) -> u32 {
    let words = text.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE) as u32
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Synthesize a title from the URL's last non-empty path segment:
/// hyphens become spaces, words are capitalized, everything that is not
/// alphanumeric or a space is stripped.
pub fn title_from_url(url: &str) -> String {
    let slug = url
        .split('/')
        .rev()
        .find(|segment| !segment.is_empty())
        .unwrap_or_default();
    let title: String = slug
        .split('-')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .take(MAX_TITLE_LENGTH)
        .collect();
    let title = title.trim().to_string();
    if title.is_empty() {
        "Medium Article".to_string()
    } else {
        title
    }
}

/// Order-preserving de-duplication, capped at 8 entries.
pub fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        if !out.contains(&tag) {
            out.push(tag);
        }
    }
    out.truncate(MAX_TAGS);
    out
}

fn truncate_excerpt(text: &str) -> String {
    let text = text.trim();
    let mut excerpt: String = text.chars().take(EXCERPT_LENGTH).collect();
    if text.chars().count() > EXCERPT_LENGTH {
        excerpt.push_str("...");
    }
    excerpt
}

/// Assemble the final record from the raw extraction: normalize the
/// content, then derive excerpt, reading time, fallback title and tags.
pub fn build_article(url: &str, raw: RawArticle) -> Article {
    let now = Utc::now();

    let content = normalize_content(&raw.content_html);
    let content = if content.trim().is_empty() {
        PLACEHOLDER_CONTENT.to_string()
    } else {
        content
    };
    let text = plain_text(&content);

    let excerpt = raw
        .subtitle
        .clone()
        .filter(|subtitle| !subtitle.is_empty())
        .unwrap_or_else(|| truncate_excerpt(&text));

    let title = match raw.title {
        Some(title) if title.chars().count() >= MIN_TITLE_LENGTH => title,
        _ => title_from_url(url),
    };

    let mut tags = raw.tags;
    if tags.is_empty() {
        tags = vec!["Medium".to_string(), "Article".to_string()];
    }

    let published_at = raw.published_at.unwrap_or(now);

    Article {
        id: now.timestamp_millis().to_string(),
        url: url.to_string(),
        title,
        author: raw
            .author
            .unwrap_or_else(|| "Unknown Author".to_string()),
        author_handle: raw.author_handle,
        author_avatar: raw.author_avatar,
        published_at,
        updated_at: raw.updated_at.filter(|updated| *updated != published_at),
        reading_time: estimate_reading_time(&text).max(MIN_READING_TIME),
        content,
        excerpt,
        tags: dedup_tags(tags),
        added_at: now,
        image: raw.image,
        is_paid: raw.is_paid,
        read: raw.read_label,
        claps: None,
        responses: None,
    }
}

/// Synthesize the diagnostic article returned when any pipeline step
/// fails. Fully valid per the data model, so extraction as a whole never
/// surfaces an error past the builder.
pub fn fallback_article(url: &str, error: &Error) -> Article {
    let now = Utc::now();

    let author_handle = URL_HANDLE
        .captures(url)
        .map(|caps| caps[1].to_string());
    let author = author_handle
        .as_deref()
        .map(|handle| {
            handle
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
                .collect::<String>()
        })
        .unwrap_or_else(|| "Medium Author".to_string());

    let message = error.to_string();
    let bypass_url = format!("{}/{}", BYPASS_HOST, url);
    let content = diagnostic_content(url, &bypass_url, &message);

    Article {
        id: now.timestamp_millis().to_string(),
        url: url.to_string(),
        title: format!("{} (Content Unavailable)", title_from_url(url)),
        author,
        author_handle,
        author_avatar: None,
        published_at: now,
        updated_at: None,
        reading_time: MIN_READING_TIME,
        content,
        excerpt: format!(
            "Failed to fetch content for this article. Error: {}. You can try visiting \
             the article directly on Freedium or Medium.",
            message
        ),
        tags: vec![
            "Medium".to_string(),
            "Error".to_string(),
            "Unavailable".to_string(),
        ],
        added_at: now,
        image: Some(FALLBACK_IMAGE.to_string()),
        is_paid: false,
        read: None,
        claps: None,
        responses: None,
    }
}

fn diagnostic_content(url: &str, bypass_url: &str, message: &str) -> String {
    format!(
        r#"<div class="bg-red-50 dark:bg-red-900/20 border border-red-200 dark:border-red-800 rounded-lg p-6 my-8">
  <h3 class="text-red-700 dark:text-red-400 font-bold text-lg mb-3">Content Extraction Failed</h3>
  <p class="text-red-600 dark:text-red-300 mb-4"><strong>We encountered an issue while trying to fetch this article from Freedium.</strong></p>
  <p class="text-red-600 dark:text-red-300 mb-4"><strong>Error:</strong> {message}</p>
</div>

<h2 class="text-2xl font-bold text-gray-900 dark:text-white mb-4">What happened?</h2>
<p class="text-gray-700 dark:text-gray-300 mb-4">We tried to fetch the article content using Freedium (freedium.cfd), which is a service that provides free access to Medium articles. However, the request failed.</p>

<h3 class="text-xl font-bold text-gray-900 dark:text-white mb-3">Possible reasons:</h3>
<ul class="list-disc list-inside text-gray-700 dark:text-gray-300 mb-6 space-y-2">
  <li><strong>Network issues:</strong> Temporary connectivity problems</li>
  <li><strong>Freedium service unavailable:</strong> The service might be temporarily down</li>
  <li><strong>Article not accessible:</strong> The specific article might not be available through Freedium</li>
</ul>

<h3 class="text-xl font-bold text-gray-900 dark:text-white mb-3">What you can do:</h3>
<ol class="list-decimal list-inside text-gray-700 dark:text-gray-300 mb-6 space-y-2">
  <li><strong>Try again:</strong> The issue might be temporary</li>
  <li><strong>Visit Freedium directly:</strong> <a href="{bypass_href}" target="_blank" rel="noopener noreferrer" class="text-emerald-600 dark:text-emerald-400 hover:underline">{bypass_text}</a></li>
  <li><strong>Check the original article:</strong> <a href="{url_href}" target="_blank" rel="noopener noreferrer" class="text-emerald-600 dark:text-emerald-400 hover:underline">View on Medium</a></li>
</ol>"#,
        message = dom::escape_text(message),
        bypass_href = dom::escape_attr(bypass_url),
        bypass_text = dom::escape_text(bypass_url),
        url_href = dom::escape_attr(url),
    )
}
