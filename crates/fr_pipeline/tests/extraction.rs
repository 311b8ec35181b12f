//! End-to-end extraction: a bypass-style page goes through the extractor,
//! normalizer and builder and comes out as a display-ready article.

use scraper::Html;

use fr_pipeline::builder::{build_article, plain_text};
use fr_pipeline::extractor::extract_raw;

const PAGE: &str = r#"<html><head><script>track()</script></head><body>
  <nav class="freedium-nav">home</nav>
  <div class="w-full px-4 text-xl leading-normal">
    <h1>Understanding Rust Lifetimes In Depth</h1>
    <h2>Rust is known for memory safety without a garbage collector.</h2>
    <div class="bg-gray-100 border border-gray-300 rounded">
      <img src="https://cdn.example.com/avatar/alice.png" alt="Alice">
      <div class="flex-grow">
        <a href="https://medium.com/@alice">Alice Writes</a>
        <div class="flex flex-wrap items-center text-sm text-gray-500">
          <span>·</span>
          <span>June 5, 2023</span>
          <span>·</span>
          <span>7 min read</span>
          <span class="text-yellow-500">Free: No</span>
        </div>
      </div>
    </div>
    <div class="main-content mt-8">
      <p>Lifetimes are how the borrow checker reasons about references.
         They show up the moment a function returns borrowed data.</p>
      <img src="/v2/resize:fit:800/cover.png" alt="Preview image">
      <h3>Elision rules</h3>
      <p>Most signatures never spell lifetimes out, because the compiler
         fills them in following three short rules.</p>
      <pre><code class="language-rust">fn longest&lt;'a&gt;(a: &amp;'a str, b: &amp;'a str) -&gt; &amp;'a str { a }</code></pre>
      <blockquote>When in doubt, let the compiler tell you.</blockquote>
      <div class="subscription-box">Subscribe for more!</div>
      <div><a href="https://freedium.cfd/#bypass">Go to original</a></div>
    </div>
    <div class="flex flex-wrap gap-2">
      <span>#rust</span><span>#lifetimes</span><span>#rust</span>
      <span>#borrow-checker</span>
    </div>
  </div>
</body></html>"#;

const URL: &str = "https://medium.com/@alice/understanding-rust-lifetimes";

#[test]
fn test_full_pipeline_on_bypass_page() {
    let document = Html::parse_document(PAGE);
    let article = build_article(URL, extract_raw(&document));

    assert_eq!(article.title, "Understanding Rust Lifetimes In Depth");
    assert_eq!(article.author, "Alice Writes");
    assert_eq!(article.author_handle.as_deref(), Some("alice"));
    assert_eq!(
        article.author_avatar.as_deref(),
        Some("https://cdn.example.com/avatar/alice.png")
    );
    assert_eq!(article.read.as_deref(), Some("7 min read"));
    assert!(article.is_paid);
    assert_eq!(article.url, URL);

    // publish date parsed from the page text
    assert_eq!(
        article.published_at.format("%Y-%m-%d").to_string(),
        "2023-06-05"
    );
    assert!(article.updated_at.is_none());

    // subtitle wins as excerpt
    assert_eq!(
        article.excerpt,
        "Rust is known for memory safety without a garbage collector."
    );

    // tags deduped, capped, marker stripped
    assert_eq!(article.tags, vec!["rust", "lifetimes", "borrow-checker"]);
    assert!(article.tags.len() <= 8);

    assert!(article.reading_time >= 5);
    assert!(!article.content.is_empty());
}

#[test]
fn test_content_is_normalized_and_clean() {
    let document = Html::parse_document(PAGE);
    let article = build_article(URL, extract_raw(&document));

    // page chrome and boilerplate are gone
    assert!(!article.content.contains("track()"));
    assert!(!article.content.contains("freedium-nav"));
    assert!(!article.content.contains("Subscribe for more!"));
    assert!(!article.content.contains("#bypass"));
    assert!(!article.content.contains("flex-grow"));

    // body text and order survive
    let text = plain_text(&article.content);
    let borrow = text.find("borrow checker reasons").unwrap();
    let elision = text.find("Elision rules").unwrap();
    let quote = text.find("let the compiler tell you").unwrap();
    assert!(borrow < elision && elision < quote);

    // image rewritten onto the canonical host
    assert!(article
        .content
        .contains("https://miro.medium.com/v2/resize:fit:800/cover.png"));

    // code block rebuilt with language label and copy trigger
    assert!(article.content.contains(">rust</span>"));
    assert!(article.content.contains("copy-btn"));
    assert!(article.content.contains("longest"));

    // presentational classes applied
    assert!(article.content.contains("leading-relaxed mb-4"));
    assert!(article.content.contains("border-emerald-500"));
}

#[test]
fn test_title_fallback_from_slug() {
    let html = "<html><body><div class=\"main-content\"><p>No heading here.</p></div></body></html>";
    let document = Html::parse_document(html);
    let article = build_article(
        "https://medium.com/@alice/understanding-rust-lifetimes",
        extract_raw(&document),
    );
    assert_eq!(article.title, "Understanding Rust Lifetimes");
}

#[test]
fn test_minimal_page_still_yields_valid_article() {
    let document = Html::parse_document("<html><body><p>tiny</p></body></html>");
    let article = build_article("https://medium.com/@bob/x", extract_raw(&document));

    assert!(!article.content.is_empty());
    assert!(!article.title.is_empty());
    assert!(article.reading_time >= 5);
    assert_eq!(article.tags, vec!["Medium", "Article"]);
}
