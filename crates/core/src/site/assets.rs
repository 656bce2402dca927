//! Built-in site assets. Written to the site folder only when absent, so
//! a user's edited copies survive every run; `style.css` can additionally
//! be rewritten through the explicit refresh override.

pub const STYLE_CSS: &str = include_str!("../../assets/style.css");
pub const HEADER_HTML: &str = include_str!("../../assets/header.html");
pub const FOOTER_HTML: &str = include_str!("../../assets/footer.html");

pub fn default_asset(file_name: &str) -> Option<&'static str> {
    match file_name {
        "style.css" => Some(STYLE_CSS),
        "header.html" => Some(HEADER_HTML),
        "footer.html" => Some(FOOTER_HTML),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_assets_resolve() {
        assert!(default_asset("style.css").is_some());
        assert!(default_asset("header.html").is_some());
        assert!(default_asset("footer.html").is_some());
        assert!(default_asset("other.css").is_none());
    }

    #[test]
    fn test_header_carries_title_placeholder() {
        assert!(HEADER_HTML.contains("{{site_title}}"));
    }
}
