// SPDX-FileCopyrightText: 2026 Quire Authors
// SPDX-License-Identifier: MIT

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use quire::model::{EntryBody, EntryKind, TextContent, Worksheet};
use quire::ops;
use quire::query::{search, SearchDirection, SearchMode, SearchScope};

// Benchmark identity (keep stable):
// - Group names in this file: `search.first`, `search.walk`
// - Case IDs (the string after the `/`) must remain stable across refactors so
//   results stay comparable over time (e.g. `substring_small`, `regex_large`).
// - If implementations move/deduplicate, update the wiring but do not rename
//   group or case IDs.

/// A worksheet alternating command and text entries, with the needle
/// `omega` planted in the last text entry only.
fn haystack_worksheet(entries: usize) -> Worksheet {
    let mut ws = Worksheet::new();
    for i in 0..entries {
        let cmd = ops::append(&mut ws, EntryKind::Command);
        if let Some(entry) = ws.entry_mut(cmd) {
            if let EntryBody::Command { source, result, .. } = entry.body_mut() {
                *source = format!("expand((a+b)^{i})");
                *result = Some("a^2 + 2*a*b + b^2".to_owned());
            }
        }

        let text = ops::append(&mut ws, EntryKind::Text);
        if let Some(entry) = ws.entry_mut(text) {
            let mut content = TextContent::from_plain("binomial coefficients appear in row ");
            content.push_math(format!("n = {i}"));
            if i + 1 == entries {
                content.push_plain(" and finally omega");
            }
            *entry.body_mut() = EntryBody::Text { content };
        }
    }
    ws
}

fn benches_search(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("search.first");

        for (case_id, mode, pattern, entries) in [
            ("substring_small", SearchMode::Substring, "omega", 8usize),
            ("substring_large", SearchMode::Substring, "omega", 256usize),
            ("regex_small", SearchMode::Regex, r"omega$", 8usize),
            ("regex_large", SearchMode::Regex, r"omega$", 256usize),
        ] {
            let ws = haystack_worksheet(entries);
            group.throughput(Throughput::Elements(entries as u64));
            group.bench_function(case_id, move |b| {
                b.iter(|| {
                    let hit = search(
                        black_box(&ws),
                        black_box(pattern),
                        SearchDirection::Forward,
                        SearchScope::all(),
                        mode,
                        false,
                        None,
                    )
                    .expect("valid pattern")
                    .expect("planted needle");
                    black_box(hit.offset() as u64)
                })
            });
        }

        group.finish();
    }

    {
        let mut group = c.benchmark_group("search.walk");

        // Every `a` in the worksheet, walked via cursor continuation.
        for (case_id, entries) in [("small", 8usize), ("large", 64usize)] {
            let ws = haystack_worksheet(entries);
            group.throughput(Throughput::Elements(entries as u64));
            group.bench_function(case_id, move |b| {
                b.iter(|| {
                    let mut acc = 0u64;
                    let mut cursor = None;
                    while let Some(hit) = search(
                        black_box(&ws),
                        "a",
                        SearchDirection::Forward,
                        SearchScope::all(),
                        SearchMode::Substring,
                        false,
                        cursor,
                    )
                    .expect("valid pattern")
                    {
                        acc = acc.wrapping_add(hit.offset() as u64);
                        cursor = Some(hit);
                    }
                    black_box(acc)
                })
            });
        }

        group.finish();
    }
}

criterion_group!(benches, benches_search);
criterion_main!(benches);
