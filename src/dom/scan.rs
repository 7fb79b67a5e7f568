//! String-level queries over rendered markup.
//!
//! The headless document has no element tree, so the few queries the
//! runtime needs (scripts, component roots, action elements) are answered by
//! scanning the container's HTML. Matching is tolerant rather than
//! validating: unterminated elements simply extend to the end of the input.

use once_cell::sync::Lazy;
use regex::Regex;

static OPEN_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<([A-Za-z][A-Za-z0-9-]*)\b((?:[^>'\x22]|'[^']*'|\x22[^\x22]*\x22)*)>").unwrap());

static ANY_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<(/?)([A-Za-z][A-Za-z0-9-]*)\b(?:[^>'\x22]|'[^']*'|\x22[^\x22]*\x22)*?(/?)>").unwrap());

static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#)
        .unwrap()
});

static SCRIPT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b([^>]*)>(.*?)</script\s*>").unwrap());

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Attributes of an opening tag, in source order. Bare attributes get "".
pub fn attributes(source: &str) -> Vec<(String, String)> {
    ATTRIBUTE
        .captures_iter(source)
        .map(|caps| {
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            (caps[1].to_string(), value)
        })
        .collect()
}

fn attribute<'a>(attrs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// An element located in a markup string.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementSpan {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    /// Byte offset of the `<` of the opening tag.
    pub start: usize,
    /// Byte offset just past the opening tag's `>`.
    pub open_end: usize,
    /// Byte offset just past the closing tag (or `open_end` for void and
    /// self-closing elements).
    pub end: usize,
}

impl ElementSpan {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        attribute(&self.attributes, name)
    }

    /// Byte offset where a new attribute can be inserted into the opening tag.
    pub fn attribute_insert_point(&self, html: &str) -> usize {
        let open = &html[self.start..self.open_end];
        if open.ends_with("/>") {
            self.open_end - 2
        } else {
            self.open_end - 1
        }
    }
}

/// Every element whose opening tag carries `attr`, in document order.
pub fn elements_with_attribute(html: &str, attr: &str) -> Vec<ElementSpan> {
    OPEN_TAG
        .captures_iter(html)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let attrs = attributes(&caps[2]);
            attribute(&attrs, attr)?;
            let tag = caps[1].to_ascii_lowercase();
            let self_closing = caps[2].trim_end().ends_with('/');
            let end = if self_closing || VOID_ELEMENTS.contains(&tag.as_str()) {
                whole.end()
            } else {
                element_end(html, whole.end(), &tag)
            };
            Some(ElementSpan {
                tag,
                attributes: attrs,
                start: whole.start(),
                open_end: whole.end(),
                end,
            })
        })
        .collect()
}

/// Finds the end of the element opened just before `from`, honouring
/// nested elements of the same tag name.
fn element_end(html: &str, from: usize, tag: &str) -> usize {
    let mut depth = 1usize;
    for caps in ANY_TAG.captures_iter(&html[from..]) {
        if !caps[2].eq_ignore_ascii_case(tag) {
            continue;
        }
        let closing = !caps[1].is_empty();
        let self_closing = !caps[3].is_empty();
        if closing {
            depth -= 1;
            if depth == 0 {
                return from + caps.get(0).map_or(0, |m| m.end());
            }
        } else if !self_closing {
            depth += 1;
        }
    }
    html.len()
}

/// `(attributes, text)` of every `<script>` element, in document order.
pub fn scripts(html: &str) -> Vec<(Vec<(String, String)>, String)> {
    SCRIPT
        .captures_iter(html)
        .map(|caps| (attributes(&caps[1]), caps[2].to_string()))
        .collect()
}

/// Whether any element carries `id="<id>"`.
pub fn has_element_id(html: &str, id: &str) -> bool {
    OPEN_TAG
        .captures_iter(html)
        .any(|caps| attribute(&attributes(&caps[2]), "id") == Some(id))
}
