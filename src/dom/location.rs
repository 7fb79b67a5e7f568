use std::fmt;

use once_cell::sync::Lazy;
use reqwest::Url;

/// Documents are addressed relative to a fixed, never-contacted origin so
/// that relative hrefs resolve the same way a browser resolves them.
static DOCUMENT_ORIGIN: Lazy<Url> = Lazy::new(|| Url::parse("http://document.invalid/").unwrap());

/// A document location: pathname, optional query and optional hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    url: Url,
}

impl Location {
    /// Parses an href against the document root. Returns None for hrefs
    /// that cannot be resolved.
    pub fn parse(href: &str) -> Option<Self> {
        Self::root().join(href)
    }

    /// The `/` location.
    pub fn root() -> Self {
        Self {
            url: DOCUMENT_ORIGIN.clone(),
        }
    }

    /// Resolves `href` relative to this location.
    pub fn join(&self, href: &str) -> Option<Self> {
        let url = self.url.join(href).ok()?;
        (url.origin() == self.url.origin()).then_some(Self { url })
    }

    pub fn pathname(&self) -> &str {
        self.url.path()
    }

    /// Fragment without the leading `#`, if any and non-empty.
    pub fn hash(&self) -> Option<&str> {
        self.url.fragment().filter(|f| !f.is_empty())
    }

    /// Origin-relative form: path, query and fragment.
    pub fn href(&self) -> String {
        let mut href = self.url.path().to_string();
        if let Some(query) = self.url.query() {
            href.push('?');
            href.push_str(query);
        }
        if let Some(fragment) = self.url.fragment() {
            href.push('#');
            href.push_str(fragment);
        }
        href
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.href())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_path_query_and_hash() {
        let loc = Location::parse("/docs/intro?x=1#setup").unwrap();
        assert_eq!(loc.pathname(), "/docs/intro");
        assert_eq!(loc.hash(), Some("setup"));
        assert_eq!(loc.href(), "/docs/intro?x=1#setup");
    }

    #[test]
    fn test_join_resolves_relative_hrefs() {
        let loc = Location::parse("/docs/intro").unwrap();
        assert_eq!(loc.join("usage").unwrap().pathname(), "/docs/usage");
        assert_eq!(loc.join("../about").unwrap().pathname(), "/about");
        assert_eq!(loc.join("#top").unwrap().pathname(), "/docs/intro");
    }

    #[test]
    fn test_join_rejects_other_origins() {
        let loc = Location::root();
        assert!(loc.join("https://example.com/").is_none());
    }

    #[test]
    fn test_empty_hash_is_none() {
        let loc = Location::parse("/a#").unwrap();
        assert_eq!(loc.hash(), None);
    }
}
