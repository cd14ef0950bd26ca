//! Catalog URL helpers
//!
//! Listing pages live at `{base}/brands.html?p={n}` (1-indexed). Product
//! links scraped from them may be absolute or relative to the site root.

use url::Url;

/// Builds the URL of listing page `page` (1-indexed)
pub fn listing_page_url(base_url: &str, page: u32) -> String {
    format!("{}/brands.html?p={}", base_url.trim_end_matches('/'), page)
}

/// Builds the URLs of listing pages `1..=total_pages`, in page order
pub fn listing_urls(base_url: &str, total_pages: u32) -> Vec<String> {
    (1..=total_pages)
        .map(|page| listing_page_url(base_url, page))
        .collect()
}

/// Resolves a product href against the catalog base URL
///
/// Absolute http(s) hrefs are returned unchanged. Returns None for empty
/// hrefs, fragment-only anchors, `javascript:`/`mailto:`/`tel:`/`data:`
/// links and anything that does not resolve to http(s).
pub fn resolve_product_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute) if absolute.scheme() == "http" || absolute.scheme() == "https" => {
            Some(absolute.to_string())
        }
        _ => None,
    }
}
