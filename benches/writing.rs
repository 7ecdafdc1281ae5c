use criterion::{criterion_group, criterion_main, Criterion};
use jsonx::{to_string, Value};

fn scalar_heavy_value() -> Value {
    let mut items = vec![];
    for i in 0..2000i64 {
        items.push(Value::SignedInt(-i));
        items.push(Value::Double(i as f64 + 0.25));
        items.push(Value::from(format!("value-{}", i)));
    }
    Value::Array(items)
}

fn object_heavy_value() -> Value {
    let mut items = vec![];
    for i in 0..500u64 {
        let mut record = Value::object();
        record.insert("id", i);
        record.insert("label", format!("item-{}", i));
        record.insert("payload", Value::blob(vec![0xab; 64]));
        items.push(record);
    }
    Value::Array(items)
}

fn benchmark_scalar_writing(c: &mut Criterion) {
    let value = scalar_heavy_value();
    c.bench_function("write of scalar arrays", |b| b.iter(|| to_string(&value)));
}

fn benchmark_object_writing(c: &mut Criterion) {
    let value = object_heavy_value();
    c.bench_function("write of objects with blobs", |b| b.iter(|| to_string(&value)));
}

criterion_group!(benches, benchmark_scalar_writing, benchmark_object_writing);
criterion_main!(benches);
