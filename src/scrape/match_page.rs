// src/scrape/match_page.rs
// Match detail page -> the OpenDota ID ld2l posted for it.

use crate::core::html::{attr_value, next_tag_block_ci, next_tag_ci, opener, to_lower};
use crate::error::SyncError;
use crate::scrape::trailing_segment;

const PAGE: &str = "match page";
const RESULT_CLASS: &str = "ld2l-result-description";

/// Read the OpenDota match ID out of the result-description block. The block's
/// second anchor links to the OpenDota match page; its last URL segment is the
/// ID. Returns 0 when the match was never actually played (forfeit etc.) —
/// ld2l posts a literal `/matches/0` link in that case.
///
/// Any missing structure is a hard error: the page layout changed and a retry
/// will not help.
pub fn stats_match_id(page: &str) -> Result<u64, SyncError> {
    let mut pos = 0usize;
    while let Some((p_s, p_e)) = next_tag_block_ci(page, "<p", "</p>", pos) {
        let block = &page[p_s..p_e];
        pos = p_e;

        if !to_lower(opener(block)).contains(RESULT_CLASS) {
            continue;
        }

        // First anchor is the winning team, second is the OpenDota link.
        let mut hrefs = Vec::with_capacity(2);
        let mut a_pos = 0usize;
        while let Some((a_s, a_e)) = next_tag_ci(block, "<a", a_pos) {
            if let Some(href) = attr_value(&block[a_s..a_e], "href") {
                hrefs.push(href);
            }
            a_pos = a_e;
        }

        let href = hrefs.get(1).ok_or_else(|| {
            SyncError::upstream_format(PAGE, "result description has fewer than two links")
        })?;
        return trailing_segment(href).parse().map_err(|_| {
            SyncError::upstream_format(PAGE, format!("OpenDota link has no numeric ID: {href}"))
        });
    }
    Err(SyncError::upstream_format(PAGE, "no result-description block"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(od_href: &str) -> String {
        format!(
            r#"<html><body>
                 <h1>Week 3</h1>
                 <p class="ld2l-result-description">
                   <a href="/teams/12">Radiant Raiders</a> won!
                   <a href="{od_href}">View on OpenDota</a>
                 </p>
               </body></html>"#
        )
    }

    #[test]
    fn reads_id_from_second_anchor() {
        let doc = detail("https://www.opendota.com/matches/55555");
        assert_eq!(stats_match_id(&doc).unwrap(), 55555);
    }

    #[test]
    fn forfeit_page_yields_sentinel_zero() {
        let doc = detail("https://www.opendota.com/matches/0");
        assert_eq!(stats_match_id(&doc).unwrap(), 0);
    }

    #[test]
    fn missing_block_is_a_format_error() {
        let err = stats_match_id("<html><body><p>nothing here</p></body></html>").unwrap_err();
        assert!(matches!(err, SyncError::UpstreamFormat { .. }));
    }

    #[test]
    fn single_anchor_is_a_format_error() {
        let doc = r#"<p class="ld2l-result-description"><a href="/teams/12">x</a></p>"#;
        let err = stats_match_id(doc).unwrap_err();
        assert!(matches!(err, SyncError::UpstreamFormat { .. }));
    }

    #[test]
    fn non_numeric_link_is_a_format_error() {
        let doc = detail("https://www.opendota.com/matches/coming-soon");
        let err = stats_match_id(&doc).unwrap_err();
        assert!(matches!(err, SyncError::UpstreamFormat { .. }));
    }
}
