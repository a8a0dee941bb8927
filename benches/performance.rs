use criterion::{criterion_group, criterion_main, Criterion};
use lazyq::{JoinType, Query};

#[derive(Clone)]
struct Order {
    id: u64,
    customer: u64,
    region: &'static str,
    total: Option<u32>,
}

fn make_orders(rows: usize) -> Vec<Order> {
    const REGIONS: [&str; 4] = ["north", "south", "east", "west"];
    (0..rows)
        .map(|i| Order {
            id: i as u64,
            customer: (i % 97) as u64,
            region: REGIONS[i % REGIONS.len()],
            total: (i % 11 != 0).then_some((i * 37 % 1000) as u32),
        })
        .collect()
}

fn bench_filter_map_chain(c: &mut Criterion) {
    let orders = Query::from(make_orders(10_000));
    let chain = orders
        .filter(|o| o.total.is_some())
        .map(|o| o.id * 2)
        .skip(100)
        .take(5_000);
    c.bench_function("filter_map_chain", |b| {
        b.iter(|| {
            let _ = chain.to_vec().unwrap();
        })
    });
}

fn bench_multi_key_order(c: &mut Criterion) {
    let orders = Query::from(make_orders(10_000));
    let sorted = orders
        .order_by(|o| o.region)
        .then_by_descending_nullable(|o| o.total)
        .then_by(|o| o.id);
    c.bench_function("multi_key_order", |b| {
        b.iter(|| {
            let _ = sorted.to_vec().unwrap();
        })
    });
}

fn bench_hash_join(c: &mut Criterion) {
    let orders = Query::from(make_orders(10_000));
    let customers: Vec<(u64, String)> = (0..97).map(|i| (i, format!("customer-{i}"))).collect();
    let joined = orders.join(JoinType::Left, customers, |o| o.customer, |c| c.0);
    c.bench_function("hash_join_left", |b| {
        b.iter(|| {
            let _ = joined.count_where(|row| row.is_matched()).unwrap();
        })
    });
}

criterion_group!(
    chains,
    bench_filter_map_chain,
    bench_multi_key_order,
    bench_hash_join
);
criterion_main!(chains);
