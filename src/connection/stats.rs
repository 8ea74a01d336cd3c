/// Traffic counters of one connection.
///
/// Every counter only grows for the lifetime of the connection.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConnectionStats {
    /// Frames packed by `pack_and_send`
    pub packets_sent: u64,
    /// Bytes of those frames
    pub bytes_sent: u64,
    /// Frames decoded from received bytes
    pub packets_received: u64,
    /// Raw bytes fed in, including noise
    pub bytes_received: u64,
    /// Bad-data sentinels emitted
    pub receive_errors: u64,
}

impl ConnectionStats {
    #[inline]
    pub(crate) fn record_sent(&mut self, bytes: usize) {
        self.packets_sent += 1;
        self.bytes_sent += to_u64(bytes);
    }

    #[inline]
    pub(crate) fn record_bytes_received(&mut self, bytes: usize) {
        self.bytes_received += to_u64(bytes);
    }

    #[inline]
    pub(crate) fn record_packet_received(&mut self) {
        self.packets_received += 1;
    }

    #[inline]
    pub(crate) fn record_error(&mut self) {
        self.receive_errors += 1;
    }

    /// Share of receive results that were bad data, in `[0, 1]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn error_rate(&self) -> Option<f64> {
        let total = self.packets_received + self.receive_errors;
        if total == 0 {
            return None;
        }

        Some(self.receive_errors as f64 / total as f64)
    }
}

fn to_u64(value: usize) -> u64 {
    value.try_into().unwrap_or(u64::MAX)
}
