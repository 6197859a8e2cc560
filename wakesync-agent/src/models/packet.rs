use std::fmt;
use std::str::FromStr;

use crate::errors::WakeError;

/// Number of bytes in a MAC-48 hardware address.
pub const MAC_LEN: usize = 6;

/// Size of a magic packet on the wire: a 6 byte header followed by 16
/// repetitions of the hardware address.
pub const PACKET_LEN: usize = 102;

const REPETITIONS: usize = 16;

/// A 6 byte network hardware address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MacAddress([u8; MAC_LEN]);

impl MacAddress {
    pub fn as_bytes(&self) -> &[u8; MAC_LEN] {
        &self.0
    }

    /// Whether `s` is in the canonical MAC-48 text form: six 2-digit hex
    /// groups joined by one consistent `:` or `-` delimiter.
    pub fn is_canonical(s: &str) -> bool {
        let bytes = s.as_bytes();
        if bytes.len() != 17 {
            return false;
        }

        let delimiter = bytes[2];
        if delimiter != b':' && delimiter != b'-' {
            return false;
        }

        bytes.iter().enumerate().all(|(index, byte)| {
            if index % 3 == 2 {
                *byte == delimiter
            } else {
                byte.is_ascii_hexdigit()
            }
        })
    }
}

impl FromStr for MacAddress {
    type Err = WakeError;

    /// Tolerant parse: hex octets split on `:` or `-`, mixed delimiters
    /// and 1-digit groups included.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; MAC_LEN];
        let mut count = 0;

        for group in s.split([':', '-']) {
            if count == MAC_LEN || group.is_empty() || group.len() > 2 {
                return Err(WakeError::InvalidAddress(s.to_string()));
            }

            bytes[count] = u8::from_str_radix(group, 16)
                .map_err(|_| WakeError::InvalidAddress(s.to_string()))?;
            count += 1;
        }

        if count != MAC_LEN {
            return Err(WakeError::InvalidAddress(s.to_string()));
        }

        Ok(Self(bytes))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

/// A magic packet: 6 bytes of 0xFF followed by 16 repetitions of the
/// destination hardware address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MagicPacket {
    header: [u8; MAC_LEN],
    payload: [MacAddress; REPETITIONS],
}

impl MagicPacket {
    /// Builds a magic packet from a hardware address string.
    ///
    /// Only the canonical MAC-48 textual form goes through: the tolerant
    /// `FromStr` above also admits mixed delimiters and 1-digit groups,
    /// so the string is checked against the canonical grammar as well.
    pub fn build(mac: &str) -> Result<Self, WakeError> {
        let address = mac.parse::<MacAddress>()?;

        if !MacAddress::is_canonical(mac) {
            return Err(WakeError::InvalidAddress(mac.to_string()));
        }

        Ok(Self {
            header: [0xFF; MAC_LEN],
            payload: [address; REPETITIONS],
        })
    }

    pub fn target(&self) -> MacAddress {
        self.payload[0]
    }

    /// Serializes the packet in wire order: header first, then the 16
    /// address repetitions.
    pub fn to_bytes(&self) -> [u8; PACKET_LEN] {
        let mut buffer = [0u8; PACKET_LEN];
        buffer[..MAC_LEN].copy_from_slice(&self.header);

        for (chunk, address) in buffer[MAC_LEN..].chunks_exact_mut(MAC_LEN).zip(&self.payload) {
            chunk.copy_from_slice(address.as_bytes());
        }

        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_layout() {
        let packet = MagicPacket::build("AA:BB:CC:DD:EE:FF").unwrap();
        let bytes = packet.to_bytes();

        assert_eq!(bytes.len(), PACKET_LEN);
        assert!(bytes[..MAC_LEN].iter().all(|byte| *byte == 0xFF));
        for chunk in bytes[MAC_LEN..].chunks_exact(MAC_LEN) {
            assert_eq!(chunk, [0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);
        }
    }

    #[test]
    fn test_case_and_delimiter_insensitive() {
        let upper = MagicPacket::build("AA:BB:CC:DD:EE:FF").unwrap();
        let lower = MagicPacket::build("aa:bb:cc:dd:ee:ff").unwrap();
        let hyphen = MagicPacket::build("AA-BB-CC-DD-EE-FF").unwrap();

        assert_eq!(upper.to_bytes(), lower.to_bytes());
        assert_eq!(upper.to_bytes(), hyphen.to_bytes());
    }

    #[test]
    fn test_build_is_deterministic() {
        let first = MagicPacket::build("00:11:22:33:44:55").unwrap();
        let second = MagicPacket::build("00:11:22:33:44:55").unwrap();

        assert_eq!(first.to_bytes(), second.to_bytes());
    }

    #[test]
    fn test_rejects_non_canonical_forms() {
        let rejected = [
            "",
            "not-a-mac",
            "AA:BB:CC:DD:EE",       // wrong group count
            "AA:BB:CC:DD:EE:FF:00", // wrong group count
            "A:BB:CC:DD:EE:FF",     // wrong group width
            "AAA:BB:CC:DD:EE:FF",   // wrong group width
            "GG:BB:CC:DD:EE:FF",    // non-hex
            "AA.BB.CC.DD.EE.FF",    // disallowed delimiter
            "AA:BB-CC:DD-EE:FF",    // mixed delimiters
            "AABBCCDDEEFF",         // no delimiter
        ];

        for mac in rejected {
            assert!(
                matches!(MagicPacket::build(mac), Err(WakeError::InvalidAddress(_))),
                "{mac:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_display_is_canonical_uppercase() {
        let address = "aa-bb-cc-dd-ee-ff".parse::<MacAddress>().unwrap();

        assert_eq!(address.to_string(), "AA:BB:CC:DD:EE:FF");
    }

    #[test]
    fn test_target_round_trips() {
        let packet = MagicPacket::build("de:ad:be:ef:00:01").unwrap();

        assert_eq!(packet.target().to_string(), "DE:AD:BE:EF:00:01");
    }
}
