// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hawser_slinq::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

fn make_data(len: usize) -> Vec<i64> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..len).map(|_| rng.gen_range(-1000..1000)).collect()
}

fn bench_filter_map_fold(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_map_fold");
    for &len in &[1_000usize, 100_000] {
        let data = make_data(len);
        group.throughput(Throughput::Elements(len as u64));

        group.bench_with_input(BenchmarkId::new("slinq", len), &data, |b, data| {
            b.iter(|| {
                let sum: i64 = data
                    .slinq()
                    .filter(|x| x % 3 == 0)
                    .select(|x| x * 2)
                    .aggregate(0i64, |acc, x| acc + x);
                black_box(sum)
            });
        });

        group.bench_with_input(BenchmarkId::new("std_iter", len), &data, |b, data| {
            b.iter(|| {
                let sum: i64 = data
                    .iter()
                    .copied()
                    .filter(|x| x % 3 == 0)
                    .map(|x| x * 2)
                    .sum();
                black_box(sum)
            });
        });
    }
    group.finish();
}

fn bench_order_by(c: &mut Criterion) {
    let mut group = c.benchmark_group("order_by");
    for &len in &[1_000usize, 10_000] {
        let data = make_data(len);
        group.throughput(Throughput::Elements(len as u64));

        group.bench_with_input(BenchmarkId::new("slinq", len), &data, |b, data| {
            b.iter(|| black_box(data.slinq().order_by(|x| *x).to_vec()));
        });

        group.bench_with_input(BenchmarkId::new("std_sort", len), &data, |b, data| {
            b.iter(|| {
                let mut out = data.clone();
                out.sort();
                black_box(out)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_filter_map_fold, bench_order_by);
criterion_main!(benches);
