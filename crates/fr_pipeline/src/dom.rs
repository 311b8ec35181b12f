//! Serialization helpers shared by the extraction and normalization walkers.

use scraper::node::Element;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta",
    "param", "source", "track", "wbr",
];

pub(crate) fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

pub(crate) fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub(crate) fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

/// Attributes in name order so serialization is deterministic.
pub(crate) fn sorted_attrs(element: &Element) -> Vec<(String, String)> {
    let mut attrs: Vec<(String, String)> = element
        .attrs()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();
    attrs.sort();
    attrs
}

/// Replace (or insert) the `class` attribute, keeping everything else.
pub(crate) fn with_class(
    attrs: Vec<(String, String)>,
    class: &str,
) -> Vec<(String, String)> {
    let mut attrs: Vec<(String, String)> = attrs
        .into_iter()
        .filter(|(name, _)| name != "class")
        .collect();
    attrs.push(("class".to_string(), class.to_string()));
    attrs.sort();
    attrs
}

pub(crate) fn write_open_tag(out: &mut String, tag: &str, attrs: &[(String, String)]) {
    out.push('<');
    out.push_str(tag);
    for (name, value) in attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_attr(value));
        out.push('"');
    }
    out.push('>');
}

pub(crate) fn write_close_tag(out: &mut String, tag: &str) {
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
    }

    #[test]
    fn test_escape_attr() {
        assert_eq!(escape_attr(r#"say "hi" & bye"#), "say &quot;hi&quot; &amp; bye");
    }

    #[test]
    fn test_void_elements() {
        assert!(is_void("img"));
        assert!(is_void("br"));
        assert!(!is_void("p"));
    }

    #[test]
    fn test_with_class_replaces_existing() {
        let attrs = vec![
            ("class".to_string(), "old".to_string()),
            ("href".to_string(), "/x".to_string()),
        ];
        let attrs = with_class(attrs, "new");
        assert_eq!(
            attrs,
            vec![
                ("class".to_string(), "new".to_string()),
                ("href".to_string(), "/x".to_string()),
            ]
        );
    }
}
