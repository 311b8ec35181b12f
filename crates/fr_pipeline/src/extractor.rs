use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use scraper::node::Element;
use scraper::{ElementRef, Html, Selector};

use crate::dom;

lazy_static! {
    static ref LONG_DATE: Regex = Regex::new(
        r"(January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2},\s+\d{4}"
    ).unwrap();
    static ref UPDATED_DATE: Regex = Regex::new(
        r"Updated:\s*((January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2},\s+\d{4})"
    ).unwrap();
    static ref AUTHOR_HANDLE: Regex = Regex::new(r"@([^/?]+)").unwrap();
}

/// Candidate selectors for the bypass page's main content region, most
/// specific first. The page body is the last resort.
const CONTAINER_CANDIDATES: &[&str] = &[
    ".w-full.px-4.text-xl.leading-normal",
    r#"[style*="font-family:Georgia,serif"]"#,
    ".main-content",
    "body",
];

const AUTHOR_REGION_CANDIDATES: &[&str] = &[".flex-grow", r#"[class*="bg-gray-100"]"#];

const AUTHOR_CARD_CANDIDATES: &[&str] = &[
    ".bg-gray-100.border.border-gray-300",
    r#"[class*="bg-gray-100"]"#,
];

const METADATA_CANDIDATES: &[&str] = &[".flex.flex-wrap.items-center", ".text-sm.text-gray-500"];

const PAID_REGION_CANDIDATES: &[&str] = &[".text-yellow-500", r#"[class*="text-yellow"]"#];

const CONTENT_CANDIDATES: &[&str] = &[".main-content", ".mt-8"];

/// Raw fields pulled out of a bypass page before normalization. Every
/// field is best-effort; a missing one degrades to its default.
#[derive(Debug, Default, Clone)]
pub struct RawArticle {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub author: Option<String>,
    pub author_handle: Option<String>,
    pub author_avatar: Option<String>,
    pub read_label: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub is_paid: bool,
    pub image: Option<String>,
    pub content_html: String,
    pub tags: Vec<String>,
}

/// Ordered candidate lookup, evaluated lazily: the first selector with a
/// match wins.
fn select_first<'a>(scope: ElementRef<'a>, candidates: &[&str]) -> Option<ElementRef<'a>> {
    candidates.iter().find_map(|css| {
        let selector = Selector::parse(css).ok()?;
        scope.select(&selector).next()
    })
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

pub fn parse_long_date(text: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(text, "%B %d, %Y")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| Utc.from_utc_datetime(&datetime))
}

/// Extract the raw structured record from a parsed bypass page.
pub fn extract_raw(document: &Html) -> RawArticle {
    let root = document.root_element();
    let container = select_first(root, CONTAINER_CANDIDATES).unwrap_or(root);

    let title = select_first(container, &["h1"])
        .or_else(|| select_first(root, &["h1"]))
        .map(element_text)
        .filter(|text| !text.is_empty());

    let subtitle = select_first(container, &["h2"])
        .or_else(|| select_first(root, &["h2"]))
        .map(element_text)
        .filter(|text| !text.is_empty());

    let author_region = select_first(container, AUTHOR_REGION_CANDIDATES);
    let (author, author_handle) = author_region
        .map(extract_author)
        .unwrap_or((None, None));
    let read_label = author_region.and_then(extract_read_label);

    let author_avatar = select_first(container, AUTHOR_CARD_CANDIDATES)
        .and_then(|card| select_first(card, &["img"]))
        .and_then(|img| img.value().attr("src"))
        .map(str::to_string);

    let markup = container.inner_html();
    let published_at = LONG_DATE
        .find(&markup)
        .and_then(|m| parse_long_date(m.as_str()));
    let updated_at = UPDATED_DATE
        .captures(&markup)
        .and_then(|caps| parse_long_date(&caps[1]))
        .filter(|updated| Some(updated) != published_at.as_ref());

    let is_paid = select_first(container, PAID_REGION_CANDIDATES)
        .map(|region| region.text().collect::<String>().contains("Free: No"))
        .unwrap_or(false);

    let content_region = select_first(container, CONTENT_CANDIDATES).unwrap_or(container);

    RawArticle {
        title,
        subtitle,
        author,
        author_handle,
        author_avatar,
        read_label,
        published_at,
        updated_at,
        is_paid,
        image: extract_image(container),
        content_html: content_fragment(content_region),
        tags: extract_tags(container),
    }
}

/// Author name from the first `@handle` anchor in the author-info region,
/// handle parsed out of its link target.
fn extract_author(region: ElementRef) -> (Option<String>, Option<String>) {
    let Some(anchor) = select_first(region, &[r#"a[href*="@"]"#]) else {
        return (None, None);
    };
    let author = Some(element_text(anchor)).filter(|text| !text.is_empty());
    let handle = anchor
        .value()
        .attr("href")
        .and_then(|href| AUTHOR_HANDLE.captures(href))
        .map(|caps| caps[1].to_string());
    (author, handle)
}

/// First span in the metadata region that is not a separator dot, a date,
/// or a `Free:`/`Updated:` label, with a plausible length.
fn extract_read_label(region: ElementRef) -> Option<String> {
    let metadata = select_first(region, METADATA_CANDIDATES)?;
    let span = Selector::parse("span").unwrap();
    for element in metadata.select(&span) {
        let text = element_text(element);
        if text == "·" || text == "Â·" {
            continue;
        }
        if LONG_DATE.is_match(&text) || text.contains("Free:") || text.contains("Updated:") {
            continue;
        }
        if text.len() > 2 && text.len() < 50 {
            return Some(text);
        }
    }
    None
}

/// Featured image: the preview image if present, else the first image
/// that does not look like an avatar.
fn extract_image(container: ElementRef) -> Option<String> {
    if let Some(src) = select_first(container, &[r#"img[alt="Preview image"]"#])
        .and_then(|img| img.value().attr("src"))
    {
        if !src.contains("avatar") {
            return Some(src.to_string());
        }
    }
    let img = Selector::parse("img").unwrap();
    container
        .select(&img)
        .filter_map(|element| element.value().attr("src"))
        .find(|src| !src.contains("avatar"))
        .map(str::to_string)
}

/// Tag texts from the trailing tag-list region; only `#`-prefixed spans
/// count, with the marker stripped.
fn extract_tags(container: ElementRef) -> Vec<String> {
    let Some(region) = select_first(container, &[".flex.flex-wrap.gap-2"]) else {
        return Vec::new();
    };
    let span = Selector::parse("span").unwrap();
    region
        .select(&span)
        .map(element_text)
        .filter_map(|text| text.strip_prefix('#').map(str::to_string))
        .filter(|tag| !tag.is_empty())
        .collect()
}

struct StripState {
    h1_dropped: bool,
    h2_dropped: bool,
}

fn has_class_set(element: &Element, classes: &[&str]) -> bool {
    classes
        .iter()
        .all(|class| element.classes().any(|c| c == *class))
}

fn is_author_card(element: &Element) -> bool {
    has_class_set(element, &["bg-gray-100", "border"]) || has_class_set(element, &["m-2", "mt-5"])
}

fn is_tag_section(element: &Element) -> bool {
    has_class_set(element, &["flex", "flex-wrap", "gap-2"])
}

/// "Go to original" links point back at the bypass anchor; their parent
/// block is navigation, not content.
fn has_bypass_link(element: ElementRef) -> bool {
    element.children().filter_map(ElementRef::wrap).any(|child| {
        child.value().name() == "a"
            && child
                .value()
                .attr("href")
                .map(|href| href.contains("#bypass"))
                .unwrap_or(false)
    })
}

/// Serialize the content region's children verbatim, dropping the parts
/// that belong to the page chrome rather than the article: author cards,
/// the leading title/subtitle headings, bypass navigation and the
/// trailing tag list.
fn content_fragment(region: ElementRef) -> String {
    let mut out = String::new();
    let mut state = StripState {
        h1_dropped: false,
        h2_dropped: false,
    };
    write_stripped_children(region, &mut state, &mut out);
    out.trim().to_string()
}

fn write_stripped_children(element: ElementRef, state: &mut StripState, out: &mut String) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            let value = child_element.value();
            let tag = value.name();
            if tag == "h1" && !state.h1_dropped {
                state.h1_dropped = true;
                continue;
            }
            if tag == "h2" && !state.h2_dropped {
                state.h2_dropped = true;
                continue;
            }
            if is_author_card(value) || is_tag_section(value) || has_bypass_link(child_element) {
                continue;
            }
            dom::write_open_tag(out, tag, &dom::sorted_attrs(value));
            if !dom::is_void(tag) {
                write_stripped_children(child_element, state, out);
                dom::write_close_tag(out, tag);
            }
        } else if let Some(text) = child.value().as_text() {
            out.push_str(&dom::escape_text(&text.text));
        } else if let Some(comment) = child.value().as_comment() {
            out.push_str(&format!("<!--{}-->", comment.comment));
        }
    }
}
