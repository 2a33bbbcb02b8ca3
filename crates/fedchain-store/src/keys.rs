//! Key layout for the slashing tables.
//!
//! Every table owns a one-byte prefix so key families never overlap and
//! scan ranges stay prefix-contained:
//!
//! - `0x01 | cons_addr`                          → signing info
//! - `0x02 | cons_addr | index (u64 BE)`         → missed-block bit
//! - `0x03 | cons_addr`                          → consensus pubkey
//! - `0x04 | cons_addr | kind (u8) | height (u64 BE)` → slash record

use fedchain_types::{ConsAddress, InfractionKind};

pub const SIGNING_INFO_PREFIX: u8 = 0x01;
pub const MISSED_BIT_PREFIX: u8 = 0x02;
pub const ADDR_PUBKEY_PREFIX: u8 = 0x03;
pub const SLASH_RECORD_PREFIX: u8 = 0x04;

pub fn signing_info_key(addr: &ConsAddress) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + addr.as_bytes().len());
    key.push(SIGNING_INFO_PREFIX);
    key.extend_from_slice(addr.as_bytes());
    key
}

pub fn missed_bit_key(addr: &ConsAddress, index: u64) -> Vec<u8> {
    let mut key = missed_bit_prefix(addr);
    key.extend_from_slice(&index.to_be_bytes());
    key
}

/// Prefix covering all of one validator's bitmap entries; used by the
/// clear-on-jail subtree delete.
pub fn missed_bit_prefix(addr: &ConsAddress) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + addr.as_bytes().len() + 8);
    key.push(MISSED_BIT_PREFIX);
    key.extend_from_slice(addr.as_bytes());
    key
}

pub fn addr_pubkey_key(addr: &ConsAddress) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + addr.as_bytes().len());
    key.push(ADDR_PUBKEY_PREFIX);
    key.extend_from_slice(addr.as_bytes());
    key
}

pub fn slash_record_key(addr: &ConsAddress, kind: InfractionKind, infraction_height: u64) -> Vec<u8> {
    let mut key = slash_record_kind_prefix(addr, kind);
    key.extend_from_slice(&infraction_height.to_be_bytes());
    key
}

/// Prefix covering all records of one kind for one validator; used by the
/// any-record-of-kind existence check.
pub fn slash_record_kind_prefix(addr: &ConsAddress, kind: InfractionKind) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + addr.as_bytes().len() + 1 + 8);
    key.push(SLASH_RECORD_PREFIX);
    key.extend_from_slice(addr.as_bytes());
    key.push(kind as u8);
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use fedchain_types::CONS_ADDR_LEN;

    #[test]
    fn test_table_prefixes_disjoint() {
        let addr = ConsAddress::new([0xff; CONS_ADDR_LEN]);
        let keys = [
            signing_info_key(&addr),
            missed_bit_key(&addr, 0),
            addr_pubkey_key(&addr),
            slash_record_key(&addr, InfractionKind::Downtime, 0),
        ];
        for (i, a) in keys.iter().enumerate() {
            for (j, b) in keys.iter().enumerate() {
                if i != j {
                    assert_ne!(a[0], b[0], "tables {} and {} share a prefix byte", i, j);
                }
            }
        }
    }

    #[test]
    fn test_missed_bit_keys_under_validator_prefix() {
        let addr = ConsAddress::new([0x01; CONS_ADDR_LEN]);
        let prefix = missed_bit_prefix(&addr);
        for index in [0u64, 1, 9_999, u64::MAX] {
            assert!(missed_bit_key(&addr, index).starts_with(&prefix));
        }
        // A different validator's keys never share the prefix.
        let other = ConsAddress::new([0x02; CONS_ADDR_LEN]);
        assert!(!missed_bit_key(&other, 0).starts_with(&prefix));
    }

    #[test]
    fn test_slash_record_key_orders_fields() {
        let addr = ConsAddress::new([0x03; CONS_ADDR_LEN]);
        let key = slash_record_key(&addr, InfractionKind::MaliciousVote, 0x0102);
        assert!(key.starts_with(&slash_record_kind_prefix(&addr, InfractionKind::MaliciousVote)));
        assert!(!key.starts_with(&slash_record_kind_prefix(&addr, InfractionKind::Downtime)));
        assert_eq!(&key[key.len() - 8..], &0x0102u64.to_be_bytes());
    }
}
