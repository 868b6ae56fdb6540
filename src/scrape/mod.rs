// src/scrape/mod.rs
pub mod match_list;
pub mod match_page;

/// Last path segment of a URL, which is where both sites keep their match IDs
/// (`/matches/1234`, `https://www.opendota.com/matches/567`).
pub(crate) fn trailing_segment(href: &str) -> &str {
    href.trim_end_matches('/').rsplit('/').next().unwrap_or(href)
}
