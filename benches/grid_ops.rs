//! Benchmarks for the per-edit hot paths: snapshot diffing, history pushes
//! and navigation over a large table.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]

use casegrid::navigation::plan;
use casegrid::tracking::diff_cells;
use casegrid::{ColumnDescriptor, Direction, GridConfig, GridEditor, HistoryStack, Row};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const FIELDS: [&str; 6] = ["id", "system", "component", "element", "description", "owner"];

fn table(rows: usize) -> Vec<Row> {
    (0..rows)
        .map(|i| {
            let mut row = Row::new().with("id", format!("SCO.{:05}", i + 1));
            for field in &FIELDS[1..] {
                row.set(*field, format!("{field}-{i}"));
            }
            row
        })
        .collect()
}

fn columns() -> Vec<ColumnDescriptor> {
    FIELDS
        .iter()
        .map(|f| ColumnDescriptor::new(*f, *f).editable(*f != "id"))
        .collect()
}

/// Diff two tables that differ in a single cell
fn bench_diff_cells(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff_cells");

    for size in [100usize, 2_000, 10_000] {
        let old = table(size);
        let mut new = old.clone();
        new[size / 2].set("description", "edited");

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("one_change", size), &size, |b, _| {
            b.iter(|| diff_cells(black_box(&new), black_box(&old), &FIELDS))
        });
    }

    group.finish();
}

/// Push distinct snapshots, including the equality check that suppresses no-ops
fn bench_history_push(c: &mut Criterion) {
    let base = table(2_000);
    let mut edited = base.clone();
    edited[1_999].set("owner", "someone else");

    c.bench_function("history_set_state_2000", |b| {
        b.iter(|| {
            let mut stack = HistoryStack::with_limit(base.clone(), 50);
            stack.set_state(black_box(edited.clone()));
            stack.set_state(black_box(edited.clone()));
            stack.undo()
        })
    });
}

/// Plan a Tab from the last cell, which scans forward and appends
fn bench_navigation(c: &mut Criterion) {
    let rows = table(2_000);
    let columns = columns();

    c.bench_function("plan_tab_last_cell", |b| {
        b.iter(|| plan(black_box(&rows), &columns, 1_999, "owner", Direction::Next))
    });
}

/// Full edit through the editor, including pending-change bookkeeping
fn bench_editor_edit(c: &mut Criterion) {
    c.bench_function("editor_edit_cell_2000", |b| {
        b.iter_batched(
            || GridEditor::new(columns(), table(2_000), GridConfig::default()),
            |mut grid| grid.edit_cell(1_000, "description", black_box("changed")),
            criterion::BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    benches,
    bench_diff_cells,
    bench_history_push,
    bench_navigation,
    bench_editor_edit
);
criterion_main!(benches);
