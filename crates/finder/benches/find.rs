//! Traversal benchmarks
//!
//! Synchronous `find` against the streamed variants on a wide, shallow page.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use finder::{all_text, pred, Finder};

fn generate_table(rows: usize) -> String {
    let mut html = String::from("<table id=\"data\">");
    for i in 0..rows {
        html.push_str(&format!(
            r#"<tr class="row"><td class="key">k{i}</td><td class="val">v{i}</td></tr>"#
        ));
    }
    html.push_str("</table>");
    html
}

fn bench_find(c: &mut Criterion) {
    let top = Finder::parse_html(&generate_table(1000));

    c.bench_function("find last row", |b| {
        b.iter(|| top.find(black_box(pred::inner_text("k999"))))
    });

    c.bench_function("find missing", |b| {
        b.iter(|| top.find(black_box(pred::id("missing"))))
    });
}

fn bench_streams(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("tokio runtime");
    let top = Finder::parse_html(&generate_table(1000));

    c.bench_function("find_with_siblings collect", |b| {
        b.iter(|| {
            rt.block_on(async {
                let (mut rows, _) = top.find_with_siblings(pred::class("row"));
                rows.collect().await.len()
            })
        })
    });

    c.bench_function("join all_text", |b| {
        b.iter(|| {
            rt.block_on(async {
                top.find_all(pred::class("row"))
                    .join(all_text)
                    .collect()
                    .await
                    .len()
            })
        })
    });

    c.bench_function("take_n 10", |b| {
        b.iter(|| {
            rt.block_on(async {
                top.find_all(pred::element("td"))
                    .take_n(10)
                    .collect()
                    .await
                    .len()
            })
        })
    });
}

criterion_group!(benches, bench_find, bench_streams);
criterion_main!(benches);
