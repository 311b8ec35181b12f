//! Rewrites an extracted content fragment into the display-ready form:
//! boilerplate stripped, image sources fixed, code blocks rebuilt with a
//! copy affordance, presentational classes applied throughout. Running the
//! normalizer over already-normalized markup yields the same fragment.

use scraper::node::Element;
use scraper::{ElementRef, Html, Selector};

use crate::dom;

const UNWANTED_TAGS: &[&str] = &["script", "style", "nav", "header", "footer", "button"];

const UNWANTED_CLASSES: &[&str] = &[
    "freedium-header",
    "freedium-footer",
    "freedium-nav",
    "ad",
    "ads",
    "advertisement",
    "promo",
    "share-buttons",
    "social-share",
    "comments-section",
    "related-articles",
    "sidebar",
    "widget",
    "popup",
    "modal",
    "subscription-box",
    "paywall",
    "member-preview",
    "hljs-copy",
];

/// Canonical host for root-relative Medium image paths.
const IMAGE_HOST: &str = "https://miro.medium.com";

const IMG_CLASS: &str = "w-full h-auto rounded-lg my-6 mx-auto max-w-full shadow-md";
const FIGURE_CLASS: &str = "my-8 text-center";
const CODE_WRAPPER_CLASS: &str = "relative group my-6";
const CODE_HEADER_CLASS: &str =
    "flex items-center justify-between bg-gray-800 dark:bg-gray-900 px-4 py-2 rounded-t-lg";
const CODE_LANG_CLASS: &str = "text-gray-400 text-sm font-mono";
const COPY_BUTTON_CLASS: &str = "copy-btn flex items-center space-x-1 px-2 py-1 bg-gray-700 \
     hover:bg-gray-600 text-gray-300 text-xs rounded transition-colors duration-200";
const COPY_ICON: &str = r#"<svg class="h-3 w-3" fill="none" stroke="currentColor" viewBox="0 0 24 24"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M8 16H6a2 2 0 01-2-2V6a2 2 0 012-2h8a2 2 0 012 2v2m-6 12h8a2 2 0 002-2v-8a2 2 0 00-2-2h-8a2 2 0 00-2 2v8a2 2 0 002 2z"></path></svg>"#;
const PRE_CLASS: &str =
    "bg-gray-900 dark:bg-gray-950 text-gray-100 p-4 rounded-b-lg overflow-x-auto text-sm m-0";
const CODE_BODY_CLASS: &str = "text-gray-100";
const INLINE_CODE_CLASS: &str = "bg-gray-100 dark:bg-gray-800 text-emerald-600 \
     dark:text-emerald-400 px-1.5 py-0.5 rounded text-sm font-mono";
const BLOCKQUOTE_CLASS: &str = "border-l-4 border-emerald-500 bg-emerald-50 \
     dark:bg-emerald-900/20 pl-6 py-4 my-6 italic text-gray-700 dark:text-gray-300 rounded-r-lg";
const HEADING_BASE_CLASS: &str = "font-bold text-gray-900 dark:text-white mt-8 mb-4 leading-tight";
const PARAGRAPH_CLASS: &str = "text-gray-700 dark:text-gray-300 leading-relaxed mb-4";
const UL_CLASS: &str = "list-disc list-inside text-gray-700 dark:text-gray-300 mb-4 space-y-2 pl-4";
const OL_CLASS: &str =
    "list-decimal list-inside text-gray-700 dark:text-gray-300 mb-4 space-y-2 pl-4";
const LI_CLASS: &str = "text-gray-700 dark:text-gray-300 leading-relaxed";
const LINK_CLASS: &str = "text-emerald-600 dark:text-emerald-400 hover:underline font-medium";

/// Normalize a raw content fragment for display. Text content and element
/// order are preserved; only structure around images/code blocks and
/// class metadata change.
pub fn normalize_content(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut out = String::new();
    write_children(fragment.root_element(), &mut out);
    out.trim().to_string()
}

fn is_unwanted(element: &Element) -> bool {
    UNWANTED_TAGS.contains(&element.name())
        || element
            .classes()
            .any(|class| UNWANTED_CLASSES.contains(&class))
}

fn heading_class(level: u32) -> String {
    let size = match level {
        1 => "text-3xl md:text-4xl",
        2 => "text-2xl md:text-3xl",
        3 => "text-xl md:text-2xl",
        4 => "text-lg md:text-xl",
        _ => "text-base md:text-lg",
    };
    format!("{} {}", HEADING_BASE_CLASS, size)
}

fn write_children(element: ElementRef, out: &mut String) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            write_element(child_element, out);
        } else if let Some(text) = child.value().as_text() {
            out.push_str(&dom::escape_text(&text.text));
        } else if let Some(comment) = child.value().as_comment() {
            out.push_str(&format!("<!--{}-->", comment.comment));
        }
    }
}

fn write_element(element: ElementRef, out: &mut String) {
    let value = element.value();
    let tag = value.name();

    if is_unwanted(value) {
        return;
    }

    // A wrapper emitted by a previous normalization pass: re-emit the
    // canonical code block instead of wrapping it again.
    if tag == "div" && value.attr("class") == Some(CODE_WRAPPER_CLASS) {
        if let Some(pre) = element
            .select(&Selector::parse("pre").unwrap())
            .next()
        {
            let language = element
                .select(&Selector::parse("span").unwrap())
                .next()
                .map(|span| span.text().collect::<String>())
                .unwrap_or_else(|| "code".to_string());
            write_code_block(out, &language, &pre.text().collect::<String>());
            return;
        }
    }

    match tag {
        "img" => write_image(element, out),
        "pre" => {
            let language = element
                .select(&Selector::parse("code").unwrap())
                .next()
                .and_then(|code| {
                    code.value()
                        .classes()
                        .find_map(|class| class.strip_prefix("language-"))
                })
                .unwrap_or("code")
                .to_string();
            write_code_block(out, &language, &element.text().collect::<String>());
        }
        "code" => write_styled(element, INLINE_CODE_CLASS, out),
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level = tag[1..].parse().unwrap_or(6);
            write_styled(element, &heading_class(level), out);
        }
        "p" => write_styled(element, PARAGRAPH_CLASS, out),
        "ul" => write_styled(element, UL_CLASS, out),
        "ol" => write_styled(element, OL_CLASS, out),
        "li" => write_styled(element, LI_CLASS, out),
        "blockquote" => write_styled(element, BLOCKQUOTE_CLASS, out),
        "a" => write_styled(element, LINK_CLASS, out),
        _ => {
            dom::write_open_tag(out, tag, &dom::sorted_attrs(value));
            if !dom::is_void(tag) {
                write_children(element, out);
                dom::write_close_tag(out, tag);
            }
        }
    }
}

fn write_styled(element: ElementRef, class: &str, out: &mut String) {
    let value = element.value();
    let tag = value.name();
    dom::write_open_tag(out, tag, &dom::with_class(dom::sorted_attrs(value), class));
    if !dom::is_void(tag) {
        write_children(element, out);
        dom::write_close_tag(out, tag);
    }
}

/// Root-relative sources are rewritten to the canonical image host; bare
/// images get wrapped in a captioned figure container.
fn write_image(element: ElementRef, out: &mut String) {
    let value = element.value();
    let mut attrs = dom::sorted_attrs(value);
    for (name, src) in attrs.iter_mut() {
        if name == "src" && src.starts_with('/') && !src.starts_with("//") {
            *src = format!("{}{}", IMAGE_HOST, src);
        }
    }
    let attrs = dom::with_class(attrs, IMG_CLASS);

    let parent_tag = element
        .parent()
        .and_then(ElementRef::wrap)
        .map(|parent| parent.value().name().to_string());
    let wrap = !matches!(parent_tag.as_deref(), Some("figure") | Some("div"));

    if wrap {
        dom::write_open_tag(
            out,
            "figure",
            &[("class".to_string(), FIGURE_CLASS.to_string())],
        );
    }
    dom::write_open_tag(out, "img", &attrs);
    if wrap {
        dom::write_close_tag(out, "figure");
    }
}

/// Header (language label + copy trigger) above the code body; the code
/// text is carried over exactly.
fn write_code_block(out: &mut String, language: &str, code: &str) {
    dom::write_open_tag(
        out,
        "div",
        &[("class".to_string(), CODE_WRAPPER_CLASS.to_string())],
    );
    dom::write_open_tag(
        out,
        "div",
        &[("class".to_string(), CODE_HEADER_CLASS.to_string())],
    );
    dom::write_open_tag(
        out,
        "span",
        &[("class".to_string(), CODE_LANG_CLASS.to_string())],
    );
    out.push_str(&dom::escape_text(language));
    dom::write_close_tag(out, "span");
    dom::write_open_tag(
        out,
        "button",
        &[("class".to_string(), COPY_BUTTON_CLASS.to_string())],
    );
    out.push_str(COPY_ICON);
    out.push_str("<span>Copy</span>");
    dom::write_close_tag(out, "button");
    dom::write_close_tag(out, "div");
    dom::write_open_tag(out, "pre", &[("class".to_string(), PRE_CLASS.to_string())]);
    dom::write_open_tag(
        out,
        "code",
        &[("class".to_string(), CODE_BODY_CLASS.to_string())],
    );
    out.push_str(&dom::escape_text(code));
    dom::write_close_tag(out, "code");
    dom::write_close_tag(out, "pre");
    dom::write_close_tag(out, "div");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::plain_text;

    #[test]
    fn test_removes_denylisted_elements() {
        let html = r#"<script>evil()</script><nav>menu</nav>
            <div class="paywall">pay up</div>
            <div class="share-buttons">share</div>
            <button>subscribe</button>
            <p>the actual story</p>"#;
        let normalized = normalize_content(html);
        assert!(normalized.contains("the actual story"));
        assert!(!normalized.contains("evil"));
        assert!(!normalized.contains("menu"));
        assert!(!normalized.contains("pay up"));
        assert!(!normalized.contains("share"));
        assert!(!normalized.contains("subscribe"));
    }

    #[test]
    fn test_applies_structural_classes() {
        let normalized = normalize_content(
            "<h1>Top</h1><h3>Section</h3><p>Body</p><ul><li>one</li></ul>\
             <blockquote>quoted</blockquote><a href=\"https://example.com\">link</a>",
        );
        assert!(normalized.contains(r#"<h1 class="font-bold text-gray-900 dark:text-white mt-8 mb-4 leading-tight text-3xl md:text-4xl">Top</h1>"#));
        assert!(normalized.contains("text-xl md:text-2xl"));
        assert!(normalized.contains(&format!(r#"<p class="{}">Body</p>"#, PARAGRAPH_CLASS)));
        assert!(normalized.contains("list-disc"));
        assert!(normalized.contains("border-emerald-500"));
        // href survives class rewriting
        assert!(normalized.contains(r#"href="https://example.com""#));
        assert!(normalized.contains("hover:underline"));
    }

    #[test]
    fn test_rewrites_relative_image_and_wraps_in_figure() {
        let normalized = normalize_content(r#"<p><img src="/v2/cover.png" alt="x"></p>"#);
        assert!(normalized.contains(r#"src="https://miro.medium.com/v2/cover.png""#));
        assert!(normalized.contains(r#"<figure class="my-8 text-center">"#));
    }

    #[test]
    fn test_absolute_image_source_is_kept() {
        let normalized = normalize_content(r#"<img src="https://cdn.example.com/a.png">"#);
        assert!(normalized.contains(r#"src="https://cdn.example.com/a.png""#));
    }

    #[test]
    fn test_rebuilds_code_block_with_language_label() {
        let normalized =
            normalize_content("<pre><code class=\"language-rust\">fn main() {}</code></pre>");
        assert!(normalized.contains(r#"<div class="relative group my-6">"#));
        assert!(normalized.contains(">rust</span>"));
        assert!(normalized.contains("copy-btn"));
        assert!(normalized.contains("fn main() {}"));
    }

    #[test]
    fn test_code_block_without_language_defaults() {
        let normalized = normalize_content("<pre><code>x = 1</code></pre>");
        assert!(normalized.contains(">code</span>"));
        assert!(normalized.contains("x = 1"));
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let html = r#"<h2>Heading</h2><p>Some <code>inline</code> text</p>
            <pre><code class="language-python">print("hi")</code></pre>
            <img src="/pic.png">
            <blockquote>wise words</blockquote>"#;
        let once = normalize_content(html);
        let twice = normalize_content(&once);
        assert_eq!(once, twice);
        assert_eq!(plain_text(&once), plain_text(&twice));
    }

    #[test]
    fn test_preserves_text_and_order() {
        let normalized = normalize_content("<p>first</p><p>second</p><p>third</p>");
        let first = normalized.find("first").unwrap();
        let second = normalized.find("second").unwrap();
        let third = normalized.find("third").unwrap();
        assert!(first < second && second < third);
    }
}
