/// Element names that are never treated as component references.
const STANDARD_ELEMENTS: &[&str] = &[
    "div", "span", "p", "h1", "h2", "h3", "h4", "h5", "h6", "a", "img", "button", "input",
    "form", "ul", "ol", "li", "table", "tr", "td", "th", "thead", "tbody", "nav", "header",
    "footer", "section", "article", "aside", "main", "script", "style", "link", "meta", "title",
    "head", "body", "html", "br", "hr", "strong", "em", "small", "mark", "del", "ins", "sub",
    "sup", "blockquote", "pre", "code", "kbd", "samp", "var", "time", "data", "address", "cite",
    "q", "dfn", "abbr", "textarea", "select", "option", "label", "fieldset", "legend", "details",
    "summary", "dialog", "menu", "menuitem",
];

/// True for lowercase standard element names. Capitalized names such as
/// `Button` are free to be used as components.
pub fn is_standard_element(tag: &str) -> bool {
    tag.bytes().all(|b| !b.is_ascii_uppercase()) && STANDARD_ELEMENTS.contains(&tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_elements_are_case_sensitive() {
        assert!(is_standard_element("div"));
        assert!(is_standard_element("menuitem"));
        assert!(!is_standard_element("Button"));
        assert!(!is_standard_element("DIV"));
        assert!(!is_standard_element("card"));
    }
}
