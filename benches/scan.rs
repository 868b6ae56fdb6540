// benches/scan.rs
use criterion::{Criterion, black_box, criterion_group, criterion_main};

use ld2l_sync::scrape::match_list;

/// Synthetic season listing, roughly the shape of a real one, with every
/// second match decided.
fn sample_listing(rows: usize) -> String {
    let mut body = String::new();
    for i in 0..rows {
        let crown = if i % 2 == 0 { r#"<span class="crown"></span>"# } else { "" };
        body.push_str(&format!(
            r#"<tr><td>Week {}</td><td><a href="/matches/{}">Team A vs Team B</a>{crown}</td><td>19:00</td></tr>"#,
            i / 4,
            1000 + i,
        ));
    }
    format!("<html><body><table><tbody>{body}</tbody></table></body></html>")
}

fn bench_scan(c: &mut Criterion) {
    let doc = sample_listing(500);

    c.bench_function("match_list_500_rows", |b| {
        b.iter(|| {
            let ids = match_list::completed_matches(black_box(&doc)).unwrap();
            black_box(ids.len())
        })
    });
}

criterion_group!(benches, bench_scan);
criterion_main!(benches);
