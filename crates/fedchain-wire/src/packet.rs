//! Cross-chain slash packet and ack formats.
//!
//! `SideSlashPacket` RLP layout (one list):
//! ```text
//! [ side_chain_id : uint,
//!   side_addr     : bytes,   // length decides the claim subkind
//!   side_height   : uint64,
//!   side_timestamp: uint64 ] // unix seconds
//! ```
//!
//! `CommonAck` RLP layout (one list):
//! ```text
//! [ code : uint32 ]           // 0 = success, otherwise an error code
//! ```

use crate::error::WireError;
use crate::rlp::{enter_list, get_bytes, get_uint, put_bytes, put_uint, wrap_list};
use fedchain_types::SideChainId;

/// A slash claim delivered from a federated side chain.
///
/// Only structural decoding happens here; the evidence processor classifies
/// the address by length and applies the height/timestamp domain checks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SideSlashPacket {
    pub side_chain_id: SideChainId,
    pub side_addr: Vec<u8>,
    pub side_height: u64,
    /// Unix seconds of the side-chain block carrying the infraction.
    pub side_timestamp: u64,
}

impl SideSlashPacket {
    pub fn encode(&self) -> Vec<u8> {
        let mut payload = Vec::new();
        put_uint(&mut payload, u64::from(self.side_chain_id.as_u16()));
        put_bytes(&mut payload, &self.side_addr);
        put_uint(&mut payload, self.side_height);
        put_uint(&mut payload, self.side_timestamp);
        wrap_list(&payload)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        let mut input = bytes;
        let mut fields = enter_list(&mut input)?;
        if !input.is_empty() {
            return Err(WireError::InvalidValue("trailing bytes after packet"));
        }

        let chain_raw = get_uint(&mut fields)?;
        let side_chain_id = u16::try_from(chain_raw)
            .map(SideChainId)
            .map_err(|_| WireError::InvalidValue("side chain id wider than 16 bits"))?;
        let side_addr = get_bytes(&mut fields)?.to_vec();
        let side_height = get_uint(&mut fields)?;
        let side_timestamp = get_uint(&mut fields)?;
        if !fields.is_empty() {
            return Err(WireError::InvalidValue("trailing fields in packet"));
        }

        Ok(SideSlashPacket {
            side_chain_id,
            side_addr,
            side_height,
            side_timestamp,
        })
    }
}

/// The ack returned for every received packet: a single result code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommonAck {
    pub code: u32,
}

impl CommonAck {
    pub fn new(code: u32) -> Self {
        CommonAck { code }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut payload = Vec::new();
        put_uint(&mut payload, u64::from(self.code));
        wrap_list(&payload)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        let mut input = bytes;
        let mut fields = enter_list(&mut input)?;
        if !input.is_empty() {
            return Err(WireError::InvalidValue("trailing bytes after ack"));
        }
        let raw = get_uint(&mut fields)?;
        let code = u32::try_from(raw)
            .map_err(|_| WireError::InvalidValue("ack code wider than 32 bits"))?;
        if !fields.is_empty() {
            return Err(WireError::InvalidValue("trailing fields in ack"));
        }
        Ok(CommonAck { code })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fedchain_types::{SIDE_CHAIN_ID_BSC, SIDE_CHAIN_ID_RIALTO};

    #[test]
    fn test_packet_roundtrip() {
        let packet = SideSlashPacket {
            side_chain_id: SIDE_CHAIN_ID_BSC,
            side_addr: vec![0x11; 20],
            side_height: 7_654_321,
            side_timestamp: 1_700_000_000,
        };
        let enc = packet.encode();
        assert_eq!(SideSlashPacket::decode(&enc), Ok(packet));
    }

    #[test]
    fn test_packet_vote_addr_roundtrip() {
        let packet = SideSlashPacket {
            side_chain_id: SIDE_CHAIN_ID_RIALTO,
            side_addr: vec![0xbe; 48],
            side_height: 1,
            side_timestamp: 1,
        };
        let enc = packet.encode();
        assert_eq!(SideSlashPacket::decode(&enc), Ok(packet));
    }

    #[test]
    fn test_packet_rejects_garbage() {
        assert!(SideSlashPacket::decode(&[]).is_err());
        assert!(SideSlashPacket::decode(&[0x00]).is_err());
        // bare string instead of a list
        assert!(SideSlashPacket::decode(&[0x83, 1, 2, 3]).is_err());
    }

    #[test]
    fn test_packet_rejects_trailing_field() {
        let packet = SideSlashPacket {
            side_chain_id: SIDE_CHAIN_ID_BSC,
            side_addr: vec![0x11; 20],
            side_height: 9,
            side_timestamp: 9,
        };
        let mut payload = Vec::new();
        crate::rlp::put_uint(&mut payload, u64::from(packet.side_chain_id.as_u16()));
        crate::rlp::put_bytes(&mut payload, &packet.side_addr);
        crate::rlp::put_uint(&mut payload, packet.side_height);
        crate::rlp::put_uint(&mut payload, packet.side_timestamp);
        crate::rlp::put_uint(&mut payload, 1);
        let enc = crate::rlp::wrap_list(&payload);
        assert_eq!(
            SideSlashPacket::decode(&enc),
            Err(WireError::InvalidValue("trailing fields in packet"))
        );
    }

    #[test]
    fn test_ack_roundtrip() {
        for code in [0u32, 1, 8, u32::MAX] {
            let ack = CommonAck::new(code);
            assert_eq!(CommonAck::decode(&ack.encode()), Ok(ack));
        }
    }

    #[test]
    fn test_ack_success_is_single_byte_list() {
        // [0x80] wrapped in a list header
        assert_eq!(CommonAck::new(0).encode(), vec![0xc1, 0x80]);
    }
}
