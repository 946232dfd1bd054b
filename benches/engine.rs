// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Benchmarks for the transfer engine.
//!
//! Run with: cargo bench
//!
//! Benchmarks include:
//! - Single-threaded account creation and transfers
//! - Multi-threaded transfers on disjoint and shared account pairs
//! - Scaling with number of threads

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use ledger_transfer_rs::{Account, AccountId, NotificationService, TransferEngine};
use rayon::prelude::*;
use rust_decimal::Decimal;
use std::sync::Arc;

// =============================================================================
// Helper Functions
// =============================================================================

/// Notification service that drops every message, so benchmarks measure the
/// engine rather than the log.
struct NoopNotifier;

impl NotificationService for NoopNotifier {
    fn notify_about_transfer(&self, _account: &Account, _message: &str) {}
}

fn new_engine() -> TransferEngine {
    TransferEngine::with_notifier(Arc::new(NoopNotifier))
}

fn account_ids(count: usize) -> Vec<AccountId> {
    (0..count).map(|i| AccountId(format!("Id-{i}"))).collect()
}

/// Engine with `count` accounts holding a large balance each.
fn funded_engine(ids: &[AccountId]) -> TransferEngine {
    let engine = new_engine();
    for id in ids {
        engine
            .create_account(id.clone(), Decimal::new(1_000_000_000, 0))
            .unwrap();
    }
    engine
}

fn amount() -> Decimal {
    Decimal::new(1, 2)
}

// =============================================================================
// Single-Threaded Benchmarks
// =============================================================================

fn bench_create_account(c: &mut Criterion) {
    c.bench_function("create_account", |b| {
        let engine = new_engine();
        let mut next = 0u64;
        b.iter(|| {
            let id = AccountId(format!("Id-{next}"));
            next += 1;
            engine.create_account(black_box(id), Decimal::ONE).unwrap();
        })
    });
}

fn bench_single_transfer(c: &mut Criterion) {
    let ids = account_ids(2);
    let engine = funded_engine(&ids);
    c.bench_function("single_transfer", |b| {
        b.iter(|| {
            engine
                .transfer(black_box(&ids[0]), black_box(&ids[1]), amount())
                .unwrap();
        })
    });
}

fn bench_rejected_transfer(c: &mut Criterion) {
    let ids = account_ids(2);
    let engine = new_engine();
    engine.create_account(ids[0].clone(), Decimal::ZERO).unwrap();
    engine.create_account(ids[1].clone(), Decimal::ZERO).unwrap();

    c.bench_function("rejected_transfer", |b| {
        b.iter(|| {
            let _ = engine.transfer(black_box(&ids[0]), black_box(&ids[1]), amount());
        })
    });
}

fn bench_transfer_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("transfer_throughput");

    for count in [100, 1_000, 10_000].iter() {
        let ids = account_ids(10);
        let engine = funded_engine(&ids);
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            b.iter(|| {
                for i in 0..count {
                    let from = &ids[i % ids.len()];
                    let to = &ids[(i + 1) % ids.len()];
                    engine.transfer(from, to, amount()).unwrap();
                }
            })
        });
    }
    group.finish();
}

// =============================================================================
// Multi-Threaded Benchmarks
// =============================================================================

fn bench_parallel_disjoint_pairs(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel_disjoint_pairs");
    let transfers = 10_000usize;

    for num_pairs in [2, 16, 128].iter() {
        let ids = account_ids(num_pairs * 2);
        let engine = Arc::new(funded_engine(&ids));

        group.throughput(Throughput::Elements(transfers as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(num_pairs),
            num_pairs,
            |b, &num_pairs| {
                b.iter(|| {
                    (0..transfers).into_par_iter().for_each(|i| {
                        let pair = i % num_pairs;
                        engine
                            .transfer(&ids[pair * 2], &ids[pair * 2 + 1], amount())
                            .unwrap();
                    });
                })
            },
        );
    }
    group.finish();
}

fn bench_contention(c: &mut Criterion) {
    let mut group = c.benchmark_group("contention");
    let transfers = 10_000usize;

    // Every transfer shares both accounts, alternating direction
    let ids = account_ids(2);
    let engine = Arc::new(funded_engine(&ids));

    group.throughput(Throughput::Elements(transfers as u64));
    group.bench_function("symmetric_pair", |b| {
        b.iter(|| {
            (0..transfers).into_par_iter().for_each(|i| {
                let (from, to) = if i % 2 == 0 { (0, 1) } else { (1, 0) };
                engine.transfer(&ids[from], &ids[to], amount()).unwrap();
            });
        })
    });
    group.finish();
}

// =============================================================================
// Scaling Benchmarks
// =============================================================================

fn bench_thread_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("thread_scaling");
    let total_transfers = 50_000usize;
    let ids = account_ids(1_000);

    for num_threads in [1, 2, 4, 8].iter() {
        let engine = Arc::new(funded_engine(&ids));

        group.throughput(Throughput::Elements(total_transfers as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(num_threads),
            num_threads,
            |b, &num_threads| {
                // Configure rayon thread pool for this benchmark
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(num_threads)
                    .build()
                    .unwrap();

                b.iter(|| {
                    pool.install(|| {
                        (0..total_transfers).into_par_iter().for_each(|i| {
                            // Walk pseudo-random pairs across 1000 accounts
                            let from = &ids[(i * 7) % ids.len()];
                            let to = &ids[(i * 13 + 1) % ids.len()];
                            let _ = engine.transfer(from, to, amount());
                        });
                    });
                })
            },
        );
    }
    group.finish();
}

criterion_group!(
    single_threaded,
    bench_create_account,
    bench_single_transfer,
    bench_rejected_transfer,
    bench_transfer_throughput,
);

criterion_group!(multi_threaded, bench_parallel_disjoint_pairs, bench_contention,);

criterion_group!(scaling, bench_thread_scaling,);

criterion_main!(single_threaded, multi_threaded, scaling);
