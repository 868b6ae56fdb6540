// src/scrape/match_list.rs
// Season listing page -> set of ld2l IDs for matches with a declared winner.

use std::collections::BTreeSet;

use crate::core::html::{attr_value, has_tag_ci, next_tag_block_ci, next_tag_ci};
use crate::error::SyncError;
use crate::scrape::trailing_segment;

const PAGE: &str = "season listing";

/// Scan the season's match table and collect the ld2l ID of every row whose
/// status cell carries the winner crown (a `<span>` ld2l renders next to the
/// winning team). Rows without it are in progress or unplayed and skipped.
///
/// Pure function of the page; does no I/O.
pub fn completed_matches(page: &str) -> Result<BTreeSet<u64>, SyncError> {
    let (tb_s, tb_e) = next_tag_block_ci(page, "<tbody", "</tbody>", 0)
        .ok_or_else(|| SyncError::upstream_format(PAGE, "no <tbody> found"))?;
    let body = &page[tb_s..tb_e];

    let mut ids = BTreeSet::new();
    let mut pos = 0usize;
    while let Some((tr_s, tr_e)) = next_tag_block_ci(body, "<tr", "</tr>", pos) {
        let row = &body[tr_s..tr_e];
        pos = tr_e;

        // The status cell is the second column.
        let mut cells = Vec::with_capacity(3);
        let mut td_pos = 0usize;
        while let Some((td_s, td_e)) = next_tag_block_ci(row, "<td", "</td>", td_pos) {
            cells.push(&row[td_s..td_e]);
            td_pos = td_e;
        }
        let Some(cell) = cells.get(1) else { continue }; // header/filler row

        if !has_tag_ci(cell, "span") {
            continue; // no crown yet
        }

        // A decided match whose link doesn't parse means the page changed
        // under us; that is fatal, not skippable.
        let id = informal_id(cell).ok_or_else(|| {
            SyncError::upstream_format(PAGE, "status cell has a winner marker but no parseable match link")
        })?;
        ids.insert(id);
    }
    Ok(ids)
}

fn informal_id(cell: &str) -> Option<u64> {
    let (a_s, a_e) = next_tag_ci(cell, "<a", 0)?;
    let href = attr_value(&cell[a_s..a_e], "href")?;
    trailing_segment(href).parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: u64, decided: bool) -> String {
        let crown = if decided { r#"<span class="crown"></span>"# } else { "" };
        format!(
            r#"<tr>
                 <td>Week 3</td>
                 <td><a href="/matches/{id}">Radiant Raiders vs Dire Straits</a>{crown}</td>
                 <td>19:00</td>
               </tr>"#
        )
    }

    fn page(rows: &str) -> String {
        format!("<html><body><table><tbody>{rows}</tbody></table></body></html>")
    }

    #[test]
    fn collects_only_rows_with_winner_marker() {
        let doc = page(&format!("{}{}{}", row(101, true), row(102, false), row(103, true)));
        let ids = completed_matches(&doc).unwrap();
        assert_eq!(ids, BTreeSet::from([101, 103]));
    }

    #[test]
    fn empty_table_yields_empty_set() {
        let ids = completed_matches(&page("")).unwrap();
        assert!(ids.is_empty());
    }

    #[test]
    fn missing_tbody_is_a_format_error() {
        let err = completed_matches("<html><body>maintenance</body></html>").unwrap_err();
        assert!(matches!(err, SyncError::UpstreamFormat { .. }));
    }

    #[test]
    fn marker_without_link_is_a_format_error() {
        let doc = page(r#"<tr><td>w</td><td><span class="crown"></span>no link</td></tr>"#);
        let err = completed_matches(&doc).unwrap_err();
        assert!(matches!(err, SyncError::UpstreamFormat { .. }));
    }

    #[test]
    fn one_column_rows_are_skipped() {
        let doc = page(&format!("<tr><td colspan=3>playoffs</td></tr>{}", row(7, true)));
        let ids = completed_matches(&doc).unwrap();
        assert_eq!(ids, BTreeSet::from([7]));
    }
}
