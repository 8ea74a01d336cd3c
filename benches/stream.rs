//! Stream reassembly benchmarks
//!
//! Measures push throughput for clean traffic, fragmented delivery and
//! traffic interleaved with line noise.

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use mavwire::{Connection, ConnectionConfig, Message, Registry, Value, dialect};

const FRAMES: u32 = 256;

fn traffic(registry: &Arc<Registry>, noise: &[u8]) -> Vec<u8> {
    let mut tx = Connection::new(Arc::clone(registry), ConnectionConfig::new(1, 1));
    let heartbeat = Message::zeroed(Arc::clone(registry.by_name("HEARTBEAT").unwrap()));

    let mut stream = Vec::new();
    for i in 0..FRAMES {
        let ping = registry
            .message(
                "PING",
                vec![
                    Value::UInt64(u64::from(i)),
                    Value::UInt32(i),
                    Value::UInt8(0),
                    Value::UInt8(0),
                ],
            )
            .unwrap();
        let msg = if i % 4 == 0 { &heartbeat } else { &ping };
        stream.extend(tx.pack_and_send(msg).unwrap());
        stream.extend_from_slice(noise);
    }
    stream
}

fn bench_push(c: &mut Criterion) {
    let mut group = c.benchmark_group("stream");
    let registry = Arc::new(dialect::minimal());

    let clean = traffic(&registry, &[]);
    group.throughput(Throughput::Bytes(clean.len() as u64));
    group.bench_function("push_clean", |b| {
        b.iter(|| {
            let mut rx = Connection::new(Arc::clone(&registry), ConnectionConfig::default());
            black_box(rx.push(&clean));
        });
    });

    let noisy = traffic(&registry, &[0x00, 0x55, 0xAA]);
    group.throughput(Throughput::Bytes(noisy.len() as u64));
    group.bench_function("push_noisy", |b| {
        b.iter(|| {
            let mut rx = Connection::new(Arc::clone(&registry), ConnectionConfig::default());
            black_box(rx.push(&noisy));
        });
    });

    group.finish();
}

fn bench_chunked(c: &mut Criterion) {
    let mut group = c.benchmark_group("stream_chunked");
    let registry = Arc::new(dialect::minimal());
    let clean = traffic(&registry, &[]);

    for chunk in [1usize, 7, 64, 1024] {
        group.throughput(Throughput::Bytes(clean.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(chunk), &chunk, |b, &chunk| {
            b.iter(|| {
                let mut rx = Connection::new(Arc::clone(&registry), ConnectionConfig::default());
                for piece in clean.chunks(chunk) {
                    black_box(rx.push(piece));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_push, bench_chunked);
criterion_main!(benches);
