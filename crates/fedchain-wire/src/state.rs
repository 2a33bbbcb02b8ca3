//! Canonical codecs for persisted slashing state.
//!
//! `ValidatorSigningInfo` wire layout:
//! ```text
//! start_height:           i64
//! index_offset:           u64
//! jailed_until:           i64   // unix nanos
//! missed_blocks_counter:  i64
//! ```
//!
//! `SlashRecord` wire layout:
//! ```text
//! cons_addr:         [u8; 20]
//! infraction_type:   u8
//! infraction_height: u64
//! slash_height:      i64
//! jail_until:        i64   // unix nanos
//! slash_amt:         u64
//! side_chain_id_len: u16
//! side_chain_id:     [u8; side_chain_id_len]   // utf-8 chain name
//! ```

use crate::error::WireError;
use crate::io::{
    get_bytes, get_i64, get_u64, get_u8, get_var_bytes, put_bytes, put_i64, put_u64, put_u8,
    put_var_bytes, WireDecode, WireEncode,
};
use fedchain_types::{
    ConsAddress, InfractionKind, SlashRecord, Timestamp, ValidatorSigningInfo, CONS_ADDR_LEN,
};

impl WireEncode for ValidatorSigningInfo {
    fn encode(&self, out: &mut Vec<u8>) {
        put_i64(out, self.start_height);
        put_u64(out, self.index_offset);
        put_i64(out, self.jailed_until.unix_nanos());
        put_i64(out, self.missed_blocks_counter);
    }
}

impl WireDecode for ValidatorSigningInfo {
    fn decode(input: &mut &[u8]) -> Result<Self, WireError> {
        let start_height = get_i64(input)?;
        let index_offset = get_u64(input)?;
        let jailed_until = Timestamp::from_unix_nanos(get_i64(input)?);
        let missed_blocks_counter = get_i64(input)?;
        Ok(ValidatorSigningInfo {
            start_height,
            index_offset,
            jailed_until,
            missed_blocks_counter,
        })
    }
}

impl WireEncode for SlashRecord {
    fn encode(&self, out: &mut Vec<u8>) {
        put_bytes(out, self.cons_addr.as_bytes());
        put_u8(out, self.infraction_type as u8);
        put_u64(out, self.infraction_height);
        put_i64(out, self.slash_height);
        put_i64(out, self.jail_until.unix_nanos());
        put_u64(out, self.slash_amt);
        put_var_bytes(out, self.side_chain_id.as_bytes());
    }
}

impl WireDecode for SlashRecord {
    fn decode(input: &mut &[u8]) -> Result<Self, WireError> {
        let addr_bytes = get_bytes(input, CONS_ADDR_LEN)?;
        let cons_addr = ConsAddress::from_slice(addr_bytes)
            .ok_or(WireError::InvalidValue("bad consensus address length"))?;
        let infraction_type = InfractionKind::from_u8(get_u8(input)?)
            .ok_or(WireError::InvalidValue("unknown infraction type"))?;
        let infraction_height = get_u64(input)?;
        let slash_height = get_i64(input)?;
        let jail_until = Timestamp::from_unix_nanos(get_i64(input)?);
        let slash_amt = get_u64(input)?;
        let side_chain_id = String::from_utf8(get_var_bytes(input)?.to_vec())
            .map_err(|_| WireError::InvalidValue("side chain id is not utf-8"))?;
        Ok(SlashRecord {
            cons_addr,
            infraction_type,
            infraction_height,
            slash_height,
            jail_until,
            slash_amt,
            side_chain_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signing_info_roundtrip() {
        let info = ValidatorSigningInfo {
            start_height: 1_234,
            index_offset: 42,
            jailed_until: Timestamp::from_unix_secs(1_700_000_000),
            missed_blocks_counter: 17,
        };
        let enc = info.encode_to_vec();
        assert_eq!(ValidatorSigningInfo::decode_all(&enc), Ok(info));
    }

    #[test]
    fn test_slash_record_roundtrip() {
        let record = SlashRecord {
            cons_addr: ConsAddress::new([0x22; CONS_ADDR_LEN]),
            infraction_type: InfractionKind::MaliciousVote,
            infraction_height: 99,
            slash_height: 1_000,
            jail_until: Timestamp::from_unix_secs(1_700_000_500),
            slash_amt: 10_000,
            side_chain_id: "bsc".to_string(),
        };
        let enc = record.encode_to_vec();
        assert_eq!(SlashRecord::decode_all(&enc), Ok(record));
    }

    #[test]
    fn test_slash_record_rejects_unknown_kind() {
        let record = SlashRecord {
            cons_addr: ConsAddress::new([0x22; CONS_ADDR_LEN]),
            infraction_type: InfractionKind::Downtime,
            infraction_height: 1,
            slash_height: 1,
            jail_until: Timestamp::default(),
            slash_amt: 0,
            side_chain_id: String::new(),
        };
        let mut enc = record.encode_to_vec();
        enc[CONS_ADDR_LEN] = 0x7f; // corrupt the kind byte
        assert_eq!(
            SlashRecord::decode_all(&enc),
            Err(WireError::InvalidValue("unknown infraction type"))
        );
    }

    #[test]
    fn test_decode_all_rejects_trailing_bytes() {
        let info = ValidatorSigningInfo::new(5);
        let mut enc = info.encode_to_vec();
        enc.push(0x00);
        assert_eq!(
            ValidatorSigningInfo::decode_all(&enc),
            Err(WireError::InvalidValue("trailing bytes after record"))
        );
    }
}
