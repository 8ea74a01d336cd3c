//! CRC-16/MCRF4XX (the X.25 variant used by MAVLink)

use crc::{CRC_16_MCRF4XX, Crc};

/// Initial CRC value.
pub const CRC_INIT: u16 = 0xFFFF;

static MCRF4XX: Crc<u16> = Crc::<u16>::new(&CRC_16_MCRF4XX);

/// Compute the checksum of `bytes`, starting from `seed`.
///
/// Pass [`CRC_INIT`] as the seed for a fresh checksum, or a previous result
/// to continue accumulating over more data.
#[must_use]
pub fn crc16(bytes: &[u8], seed: u16) -> u16 {
    // The algorithm is reflected and results come out reflected, but the
    // initial value is taken unreflected.
    let mut digest = MCRF4XX.digest_with_initial(seed.reverse_bits());
    digest.update(bytes);
    digest.finalize()
}

/// Running checksum accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crc16(u16);

impl Crc16 {
    /// Start a fresh checksum.
    #[must_use]
    pub const fn new() -> Self {
        Self(CRC_INIT)
    }

    /// Feed bytes into the checksum.
    pub fn update(&mut self, bytes: &[u8]) {
        self.0 = crc16(bytes, self.0);
    }

    /// Feed a single byte into the checksum.
    pub fn update_byte(&mut self, byte: u8) {
        self.0 = crc16(&[byte], self.0);
    }

    /// Current checksum value.
    #[must_use]
    pub const fn value(self) -> u16 {
        self.0
    }

    /// Fold the 16-bit value into one byte, as used for `crc_extra`.
    #[must_use]
    pub const fn fold(self) -> u8 {
        let [lo, hi] = self.0.to_le_bytes();
        lo ^ hi
    }
}

impl Default for Crc16 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_value() {
        // Standard CRC-16/MCRF4XX check value
        assert_eq!(crc16(b"123456789", CRC_INIT), 0x6F91);
    }

    #[test]
    fn test_empty_input_returns_seed() {
        assert_eq!(crc16(&[], CRC_INIT), CRC_INIT);
        assert_eq!(crc16(&[], 0x1234), 0x1234);
    }

    #[test]
    fn test_continuation_matches_single_pass() {
        let data = b"MAVLink frame checksum";
        let (head, tail) = data.split_at(7);
        assert_eq!(crc16(tail, crc16(head, CRC_INIT)), crc16(data, CRC_INIT));

        let mut crc = Crc16::new();
        crc.update(head);
        for &b in tail {
            crc.update_byte(b);
        }
        assert_eq!(crc.value(), crc16(data, CRC_INIT));
    }

    #[test]
    fn test_fold_mixes_both_bytes() {
        let mut crc = Crc16::new();
        crc.update(b"HEARTBEAT ");
        assert_eq!(Crc16::default(), Crc16::new());
        assert_eq!(crc.fold(), (crc.value() & 0xFF) as u8 ^ (crc.value() >> 8) as u8);
    }

    #[test]
    fn test_zero_heartbeat_checksum() {
        let mut crc = crc16(&[0x09, 0x00, 0x01, 0x01, 0x00], CRC_INIT);
        crc = crc16(&[0u8; 9], crc);
        crc = crc16(&[50], crc);
        assert_eq!(crc, 0x4843);
    }
}
