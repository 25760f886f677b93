use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tytx_bag::{decode, encode, AttrMap, Bag, Decimal, Density, Transport, Value};

fn catalog(size: usize) -> Bag {
    let mut bag = Bag::new();
    bag.set("meta.version", "1.0.0").unwrap();
    bag.set(
        "meta.created",
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap().and_hms_opt(10, 30, 0).unwrap(),
    )
    .unwrap();
    for i in 0..size {
        let price: Decimal = format!("{}.{:02}", i, i % 100).parse().unwrap();
        let attrs = AttrMap::from_pairs([
            ("sku", Value::from(format!("PRD{:04}", i))),
            ("stock", Value::from(i as i64 * 3)),
        ])
        .unwrap();
        bag.set_with_attrs(&format!("products.p{}.price", i), price, attrs).unwrap();
        bag.set(&format!("products.p{}.name", i), format!("Product {}", i)).unwrap();
        bag.set(&format!("products.p{}.active", i), i % 2 == 0).unwrap();
    }
    bag
}

const COMBINATIONS: [(Transport, Density); 4] = [
    (Transport::Text, Density::Expanded),
    (Transport::Text, Density::Compact),
    (Transport::Binary, Density::Expanded),
    (Transport::Binary, Density::Compact),
];

fn benchmark_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    let bag = catalog(200);
    for (transport, density) in COMBINATIONS {
        group.bench_with_input(
            BenchmarkId::new(transport.as_str(), density.as_str()),
            &bag,
            |b, bag| b.iter(|| encode(black_box(bag), transport, density)),
        );
    }
    group.finish();
}

fn benchmark_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    let bag = catalog(200);
    for (transport, density) in COMBINATIONS {
        let data = encode(&bag, transport, density).unwrap();
        group.bench_with_input(
            BenchmarkId::new(transport.as_str(), density.as_str()),
            &data,
            |b, data| b.iter(|| decode(black_box(data), transport)),
        );
    }
    group.finish();
}

fn benchmark_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("roundtrip_text_compact");
    for size in [10, 100, 1000] {
        let bag = catalog(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &bag, |b, bag| {
            b.iter(|| {
                let data = encode(black_box(bag), Transport::Text, Density::Compact).unwrap();
                decode(&data, Transport::Text)
            })
        });
    }
    group.finish();
}

fn benchmark_size_report(c: &mut Criterion) {
    let bag = catalog(100);
    for (transport, density) in COMBINATIONS {
        let data = encode(&bag, transport, density).unwrap();
        println!("{} {}: {} bytes", transport, density, data.len());
    }
    c.bench_function("walk_catalog", |b| b.iter(|| black_box(&bag).walk().len()));
}

criterion_group!(
    benches,
    benchmark_encode,
    benchmark_decode,
    benchmark_scaling,
    benchmark_size_report
);
criterion_main!(benches);
