//! Frame codec benchmarks
//!
//! Measures pack and decode for dialect messages of different widths.

use std::sync::Arc;

use bytes::Bytes;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use mavwire::{Codec, Message, SenderContext, Value, crc16, dialect, protocol::CRC_INIT};

fn sample_messages(codec: &Codec) -> Vec<Message> {
    let registry = codec.registry();
    let mut attitude = Message::zeroed(Arc::clone(registry.by_name("ATTITUDE").unwrap()));
    attitude.set("time_boot_ms", 123_456u32).unwrap();
    attitude.set("roll", 0.1f32).unwrap();
    attitude.set("yaw", -1.5f32).unwrap();

    vec![
        Message::zeroed(Arc::clone(registry.by_name("HEARTBEAT").unwrap())),
        attitude,
        registry
            .message(
                "STATUSTEXT",
                vec![Value::UInt8(6), Value::from("benchmark status line")],
            )
            .unwrap(),
    ]
}

fn bench_crc(c: &mut Criterion) {
    let mut group = c.benchmark_group("crc16");

    for size in [9usize, 64, 255] {
        let data = vec![0xA5u8; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| black_box(crc16(black_box(data), CRC_INIT)));
        });
    }

    group.finish();
}

fn bench_pack(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    let codec = Codec::new(Arc::new(dialect::minimal()));

    for message in sample_messages(&codec) {
        let len = 8 + message.schema().payload_len();
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_function(format!("pack_{}", message.name().to_lowercase()), |b| {
            b.iter(|| black_box(codec.pack(&message, SenderContext::new(1, 1, 1)).unwrap()));
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    let codec = Codec::new(Arc::new(dialect::minimal()));

    for message in sample_messages(&codec) {
        let frame = Bytes::from(codec.pack(&message, SenderContext::new(1, 1, 1)).unwrap());
        group.throughput(Throughput::Bytes(frame.len() as u64));
        group.bench_function(format!("decode_{}", message.name().to_lowercase()), |b| {
            // Cloning `Bytes` only bumps a refcount.
            b.iter(|| black_box(codec.decode(frame.clone()).unwrap()));
        });
    }

    group.finish();
}

fn bench_roundtrip(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    let codec = Codec::new(Arc::new(dialect::minimal()));
    let messages = sample_messages(&codec);
    let attitude = &messages[1];

    group.throughput(Throughput::Bytes(36));
    group.bench_function("roundtrip_attitude", |b| {
        b.iter(|| {
            let frame = codec.pack(attitude, SenderContext::default()).unwrap();
            black_box(codec.decode(Bytes::from(frame)).unwrap());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_crc, bench_pack, bench_decode, bench_roundtrip);
criterion_main!(benches);
