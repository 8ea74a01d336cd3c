//! Incremental stream reassembly and framed sending for one MAVLink link.

use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::BytesMut;
use tracing::{debug, instrument, trace};

use crate::protocol::{
    Codec, Error, HEADER_SIZE, MAX_FRAME_SIZE, MIN_FRAME_SIZE, Message, Registry, Result,
    SenderContext,
};

use super::{BadData, ConnectionConfig, ConnectionStats, Received};

/// One logical MAVLink link.
///
/// Feed received bytes with [`push`](Self::push) in chunks of any size; frame
/// boundaries are found by the marker byte and the header length field. Bytes
/// that cannot start a frame are dropped one at a time, and frames that fail
/// to decode are reported as [`BadData`], so the stream recovers on its own
/// after corruption or when joining mid-stream.
///
/// State is owned exclusively and is not synchronized: a connection shared
/// between threads needs external locking.
#[derive(Debug)]
pub struct Connection {
    codec: Codec,
    buffer: BytesMut,
    /// `HEADER_SIZE` while waiting for a header, `8 + payload_len` once known
    expected_length: usize,
    sequence: u8,
    system_id: u8,
    component_id: u8,
    stats: ConnectionStats,
    started_at: Instant,
}

impl Connection {
    /// Create a connection for the registry's dialect.
    #[must_use]
    pub fn new(registry: Arc<Registry>, config: ConnectionConfig) -> Self {
        let mut codec = Codec::new(registry).with_crc_extra(config.crc_extra);
        if let Some(marker) = config.marker {
            codec = codec.with_marker(marker);
        }
        if let Some(endianness) = config.endianness {
            codec = codec.with_endianness(endianness);
        }

        Self {
            codec,
            buffer: BytesMut::with_capacity(MAX_FRAME_SIZE),
            expected_length: HEADER_SIZE,
            sequence: 0,
            system_id: config.system_id,
            component_id: config.component_id,
            stats: ConnectionStats::default(),
            started_at: Instant::now(),
        }
    }

    /// Frame codec used by this connection.
    #[must_use]
    pub const fn codec(&self) -> &Codec {
        &self.codec
    }

    /// Message registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<Registry> {
        self.codec.registry()
    }

    /// Feed received bytes and collect every result they complete.
    ///
    /// May yield nothing (frame still incomplete), or several messages and
    /// bad-data sentinels in stream order.
    #[instrument(level = "trace", skip(self, data), fields(len = data.len()))]
    pub fn push(&mut self, data: &[u8]) -> Vec<Received> {
        self.extend(data);

        let mut out = Vec::new();
        while let Some(item) = self.poll() {
            out.push(item);
        }
        out
    }

    /// Append received bytes without parsing.
    pub fn extend(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
        self.stats.record_bytes_received(data.len());
    }

    /// Run one parsing step over the buffered bytes.
    ///
    /// Returns `None` when no further progress is possible until more bytes
    /// arrive.
    pub fn poll(&mut self) -> Option<Received> {
        let marker = self.codec.marker();
        let &first = self.buffer.first()?;
        if first != marker {
            let dropped = self.buffer.split_to(1).freeze();
            self.expected_length = HEADER_SIZE;
            self.stats.record_error();
            debug!(byte = first, "dropping byte before frame marker");
            return Some(BadData::new(dropped, Error::BadPrefix { found: first }).into());
        }

        if self.buffer.len() >= 2 {
            self.expected_length = usize::from(self.buffer[1]) + MIN_FRAME_SIZE;
        }

        if self.expected_length < MIN_FRAME_SIZE || self.buffer.len() < self.expected_length {
            return None;
        }

        let frame = self.buffer.split_to(self.expected_length).freeze();
        self.expected_length = HEADER_SIZE;

        match self.codec.decode(frame.clone()) {
            Ok(decoded) => {
                self.stats.record_packet_received();
                trace!(
                    message = decoded.name(),
                    seq = decoded.sequence(),
                    sysid = decoded.source_system(),
                    "decoded frame"
                );
                Some(decoded.into())
            }
            Err(err) => {
                self.stats.record_error();
                debug!(error = %err, len = frame.len(), "discarding undecodable frame");
                Some(BadData::new(frame, err).into())
            }
        }
    }

    /// Pack a message with this link's sender ids and advance the sequence.
    ///
    /// Returns the frame ready for transmission.
    ///
    /// # Errors
    ///
    /// Fails only for a message whose schema is not registered with this
    /// connection; the sequence and counters are left untouched.
    #[instrument(level = "debug", skip(self, message), fields(message = message.name()))]
    pub fn pack_and_send(&mut self, message: &Message) -> Result<Vec<u8>> {
        let ctx = SenderContext::new(self.sequence, self.system_id, self.component_id);
        let frame = self.codec.pack(message, ctx)?;

        self.sequence = self.sequence.wrapping_add(1);
        self.stats.record_sent(frame.len());
        trace!(seq = ctx.sequence, len = frame.len(), "packed frame");

        Ok(frame)
    }

    /// Bytes still required before the next parsing stage (at least 1).
    #[must_use]
    pub fn bytes_needed(&self) -> usize {
        self.expected_length.saturating_sub(self.buffer.len()).max(1)
    }

    /// Bytes buffered but not yet consumed.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Frame size the parser is currently waiting for.
    #[must_use]
    pub const fn expected_length(&self) -> usize {
        self.expected_length
    }

    /// Sequence number of the next outgoing frame.
    #[must_use]
    pub const fn sequence(&self) -> u8 {
        self.sequence
    }

    /// System id of outgoing frames.
    #[must_use]
    pub const fn system_id(&self) -> u8 {
        self.system_id
    }

    /// Component id of outgoing frames.
    #[must_use]
    pub const fn component_id(&self) -> u8 {
        self.component_id
    }

    /// Snapshot of the traffic counters.
    #[must_use]
    pub const fn stats(&self) -> ConnectionStats {
        self.stats
    }

    /// Frames sent.
    #[must_use]
    pub const fn packets_sent(&self) -> u64 {
        self.stats.packets_sent
    }

    /// Bytes sent.
    #[must_use]
    pub const fn bytes_sent(&self) -> u64 {
        self.stats.bytes_sent
    }

    /// Frames received and decoded.
    #[must_use]
    pub const fn packets_received(&self) -> u64 {
        self.stats.packets_received
    }

    /// Bytes received.
    #[must_use]
    pub const fn bytes_received(&self) -> u64 {
        self.stats.bytes_received
    }

    /// Bad-data sentinels emitted.
    #[must_use]
    pub const fn receive_errors(&self) -> u64 {
        self.stats.receive_errors
    }

    /// Time since the connection was created.
    #[must_use]
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Value, dialect};

    fn pair() -> (Connection, Connection) {
        let registry = Arc::new(dialect::minimal());
        (
            Connection::new(Arc::clone(&registry), ConnectionConfig::new(1, 1)),
            Connection::new(registry, ConnectionConfig::new(255, 190)),
        )
    }

    fn ping(conn: &Connection, seq: u32) -> Message {
        conn.registry()
            .message(
                "PING",
                vec![
                    Value::UInt64(1_000 + u64::from(seq)),
                    Value::UInt32(seq),
                    Value::UInt8(0),
                    Value::UInt8(0),
                ],
            )
            .unwrap()
    }

    #[test]
    fn test_send_then_receive() {
        let (mut tx, mut rx) = pair();
        let msg = ping(&tx, 7);
        let frame = tx.pack_and_send(&msg).unwrap();

        let results = rx.push(&frame);
        assert_eq!(results.len(), 1);
        let decoded = results[0].message().unwrap();
        assert_eq!(decoded.message(), &msg);
        assert_eq!(decoded.source_system(), 1);
        assert_eq!(decoded.source_component(), 1);

        assert_eq!(tx.sequence(), 1);
        assert_eq!(tx.packets_sent(), 1);
        assert_eq!(tx.bytes_sent(), frame.len() as u64);
        assert_eq!(rx.packets_received(), 1);
        assert_eq!(rx.bytes_received(), frame.len() as u64);
        assert_eq!(rx.receive_errors(), 0);
        assert_eq!(rx.buffered(), 0);
    }

    #[test]
    fn test_sequence_wraps() {
        let (mut tx, mut rx) = pair();
        let msg = ping(&tx, 0);

        let mut last = 0;
        for i in 0..=256u32 {
            let frame = tx.pack_and_send(&msg).unwrap();
            let results = rx.push(&frame);
            last = results[0].message().unwrap().sequence();
            assert_eq!(u32::from(last), i % 256);
        }
        assert_eq!(last, 0);
        assert_eq!(tx.sequence(), 1);
        assert_eq!(tx.packets_sent(), 257);
    }

    #[test]
    fn test_byte_at_a_time() {
        let (mut tx, mut rx) = pair();
        let frame = tx.pack_and_send(&ping(&tx, 3)).unwrap();

        let (last, head) = frame.split_last().unwrap();
        for byte in head {
            assert!(rx.push(&[*byte]).is_empty());
        }
        assert_eq!(rx.bytes_needed(), 1);
        assert_eq!(rx.expected_length(), frame.len());

        let results = rx.push(&[*last]);
        assert_eq!(results.len(), 1);
        assert!(results[0].message().is_some());
        assert_eq!(rx.expected_length(), HEADER_SIZE);
    }

    #[test]
    fn test_bytes_needed_tracks_stages() {
        let (mut tx, mut rx) = pair();
        let frame = tx.pack_and_send(&ping(&tx, 1)).unwrap();

        assert_eq!(rx.bytes_needed(), HEADER_SIZE);
        rx.push(&frame[..1]);
        assert_eq!(rx.bytes_needed(), HEADER_SIZE - 1);
        rx.push(&frame[1..4]);
        assert_eq!(rx.bytes_needed(), frame.len() - 4);
    }

    #[test]
    fn test_noise_before_frame() {
        let (mut tx, mut rx) = pair();
        let frame = tx.pack_and_send(&ping(&tx, 9)).unwrap();

        let mut data = vec![0x00, 0x11, 0x22];
        data.extend_from_slice(&frame);
        let results = rx.push(&data);

        assert_eq!(results.len(), 4);
        for (bad, byte) in results[..3].iter().zip([0x00, 0x11, 0x22]) {
            let bad = bad.bad_data().unwrap();
            assert_eq!(bad.data().as_ref(), &[byte]);
            assert_eq!(bad.error(), &Error::BadPrefix { found: byte });
            assert_eq!(bad.reason(), format!("bad prefix ({byte:#04x})"));
        }
        assert_eq!(results[3].name(), "PING");
        assert_eq!(rx.receive_errors(), 3);
        assert_eq!(rx.packets_received(), 1);
    }

    #[test]
    fn test_corrupt_frame_does_not_stop_stream() {
        let (mut tx, mut rx) = pair();
        let mut first = tx.pack_and_send(&ping(&tx, 1)).unwrap();
        let second = tx.pack_and_send(&ping(&tx, 2)).unwrap();
        first[8] ^= 0x40;

        let mut data = first.clone();
        data.extend_from_slice(&second);
        let results = rx.push(&data);

        assert_eq!(results.len(), 2);
        let bad = results[0].bad_data().unwrap();
        assert_eq!(bad.data().as_ref(), first.as_slice());
        assert!(matches!(bad.error(), Error::ChecksumMismatch { .. }));
        assert_eq!(results[1].message().unwrap().sequence(), 1);
        assert_eq!(rx.receive_errors(), 1);
    }

    #[test]
    fn test_unknown_message_reported() {
        let (_, mut rx) = pair();
        let results = rx.push(&[0xFE, 0, 0, 1, 1, 99, 0, 0]);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name(), "BAD_DATA");
        assert_eq!(
            results[0].bad_data().unwrap().error(),
            &Error::UnknownMessage { message_id: 99 }
        );
    }

    #[test]
    fn test_custom_marker() {
        let registry = Arc::new(dialect::minimal());
        let config = ConnectionConfig {
            marker: Some(0x55),
            ..ConnectionConfig::new(1, 1)
        };
        let mut tx = Connection::new(Arc::clone(&registry), config.clone());
        let mut rx = Connection::new(Arc::clone(&registry), config);
        let mut standard = Connection::new(registry, ConnectionConfig::default());

        let frame = tx.pack_and_send(&ping(&tx, 5)).unwrap();
        assert_eq!(frame[0], 0x55);
        assert_eq!(rx.push(&frame).len(), 1);
        assert_eq!(rx.receive_errors(), 0);

        let results = standard.push(&frame);
        assert!(results.iter().all(Received::is_bad_data));
        assert_eq!(standard.buffered(), 0);
    }

    #[test]
    fn test_uptime_advances() {
        let (conn, _) = pair();
        let first = conn.uptime();
        assert!(conn.uptime() >= first);
    }
}
