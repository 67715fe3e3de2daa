//! Performance benchmarks for lsx

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use lsx::test_utils::{CapturedOutput, TestTree};
use lsx::{
    Entry, Lister, Ordering, OutputConfig, Recursion, Renderer, Stat, TimeField, WalkerConfig,
};
use std::fs;

fn create_tree_with_files(file_count: usize) -> TestTree {
    let tree = TestTree::new();
    for i in 0..file_count {
        tree.add_file(&format!("flat/file_{}.txt", i), &"x".repeat(i % 4096));
    }
    for i in 0..file_count / 10 {
        tree.add_file(&format!("nested/dir_{}/inner_{}.txt", i % 10, i), "n");
    }
    tree
}

fn read_entries(tree: &TestTree) -> Vec<Entry> {
    let dir = tree.path().join("flat");
    fs::read_dir(&dir)
        .unwrap()
        .map(|item| {
            let item = item.unwrap();
            Entry::new(item.file_name(), item.path(), 1, Stat::lstat(&item.path()))
        })
        .collect()
}

fn bench_sort(c: &mut Criterion) {
    let tree = create_tree_with_files(1000);
    let mut group = c.benchmark_group("sort");

    for (name, ordering) in [
        ("name", Ordering::name_asc()),
        ("size", Ordering::size_desc()),
        ("time", Ordering::time_desc(TimeField::Modified)),
    ] {
        group.bench_function(name, |b| {
            b.iter_batched(
                || read_entries(&tree),
                |mut entries| ordering.sort(black_box(&mut entries)),
                criterion::BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let tree = create_tree_with_files(100);
    let entries = read_entries(&tree);
    let mut group = c.benchmark_group("render");

    let mut short = Renderer::new(OutputConfig::default());
    group.bench_function("short", |b| {
        b.iter(|| {
            for entry in &entries {
                black_box(short.render(entry));
            }
        })
    });

    let mut long = Renderer::new(OutputConfig {
        long: true,
        ..Default::default()
    });
    group.bench_function("long", |b| {
        b.iter(|| {
            for entry in &entries {
                black_box(long.render(entry));
            }
        })
    });

    group.finish();
}

fn bench_listing(c: &mut Criterion) {
    let tree = create_tree_with_files(500);
    let mut group = c.benchmark_group("listing");

    group.bench_function("flat_long", |b| {
        let paths = [tree.path().join("flat")];
        b.iter(|| {
            let mut lister = Lister::new(
                WalkerConfig::default(),
                OutputConfig {
                    long: true,
                    ..Default::default()
                },
            );
            let mut out = CapturedOutput::new();
            lister.list(black_box(&paths), &mut out).unwrap()
        })
    });

    group.bench_function("recursive", |b| {
        let paths = [tree.path().to_path_buf()];
        b.iter(|| {
            let mut lister = Lister::new(
                WalkerConfig {
                    recursion: Recursion::Recursive,
                    ..Default::default()
                },
                OutputConfig::default(),
            );
            let mut out = CapturedOutput::new();
            lister.list(black_box(&paths), &mut out).unwrap()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_sort, bench_render, bench_listing);
criterion_main!(benches);
