// src/csv.rs
// Minimal CSV for the summary table. Cells are all numeric, so writing never
// needs quoting; reading tolerates quoted cells anyway in case the file was
// round-tripped through a spreadsheet.

use std::io::{self, Write};

/// Parse comma-separated rows, skipping blank lines. CRLF tolerant.
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            line.split(',')
                .map(|cell| cell.trim().trim_matches('"').to_string())
                .collect()
        })
        .collect()
}

/// Write one row. Cells must not contain commas or newlines.
pub fn write_row<W: Write>(mut w: W, row: &[String]) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first {
            write!(w, ",")?;
        }
        first = false;
        write!(w, "{cell}")?;
    }
    writeln!(w)
}
