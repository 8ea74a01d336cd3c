//! Loopback link between a ground station and a vehicle
//!
//! Frames travel over an in-memory "wire" that injects noise and splits the
//! byte stream at odd boundaries, the way a serial link delivers it.

use std::sync::Arc;

use mavwire::{Connection, ConnectionConfig, Message, Received, Value, dialect};
use tracing::Level;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(Level::DEBUG).init();

    println!("mavwire loopback");
    println!("================\n");

    let registry = Arc::new(dialect::minimal());
    let mut vehicle = Connection::new(Arc::clone(&registry), ConnectionConfig::new(1, 1));
    let mut gcs = Connection::new(Arc::clone(&registry), ConnectionConfig::new(255, 190));

    let mut heartbeat = Message::zeroed(Arc::clone(
        registry.by_name("HEARTBEAT").ok_or("HEARTBEAT not registered")?,
    ));
    heartbeat.set("type", 2u8)?;
    heartbeat.set("autopilot", 3u8)?;
    heartbeat.set("mavlink_version", 3u8)?;

    let status = registry.message(
        "STATUSTEXT",
        vec![Value::UInt8(6), Value::from("pre-arm checks passed")],
    )?;

    // Vehicle -> wire, with garbage between frames
    let mut wire = vec![0x00, 0x42];
    wire.extend(vehicle.pack_and_send(&heartbeat)?);
    wire.extend_from_slice(&[0x13, 0x37]);
    let mut corrupt = vehicle.pack_and_send(&status)?;
    corrupt[10] ^= 0xFF;
    wire.extend(corrupt);
    wire.extend(vehicle.pack_and_send(&status)?);

    // Wire -> ground station in uneven chunks
    for chunk in wire.chunks(5) {
        for received in gcs.push(chunk) {
            report(&received);
        }
    }

    // And back again
    let ping = gcs.registry().message(
        "PING",
        vec![
            Value::UInt64(1_000_000),
            Value::UInt32(0),
            Value::UInt8(1),
            Value::UInt8(1),
        ],
    )?;
    let frame = gcs.pack_and_send(&ping)?;
    for received in vehicle.push(&frame) {
        report(&received);
    }

    let stats = gcs.stats();
    println!(
        "\nground station: {} frames decoded, {} bad-data items, {} bytes in",
        stats.packets_received, stats.receive_errors, stats.bytes_received
    );
    if let Some(rate) = stats.error_rate() {
        println!("error rate: {:.1}%", rate * 100.0);
    }

    Ok(())
}

fn report(received: &Received) {
    match received {
        Received::Message(decoded) => println!(
            "[sys {} comp {} seq {:3}] {}",
            decoded.source_system(),
            decoded.source_component(),
            decoded.sequence(),
            decoded.message()
        ),
        Received::BadData(bad) => {
            println!("{} {} bytes: {}", received.name(), bad.data().len(), bad.reason());
        }
    }
}
