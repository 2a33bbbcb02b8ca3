//! Property-based tests for the cross-chain packet codec.
//!
//! The decoder contract is that `encode(decode(p)) == p` for any structurally
//! valid packet and that every generated packet survives a round trip
//! bit-identically, for both address subkinds and arbitrary field values.

use proptest::prelude::*;

use fedchain_types::SideChainId;
use fedchain_wire::{CommonAck, SideSlashPacket};

/// Number of proptest cases (kept modest for CI speed).
const PACKET_PROPTEST_CASES: u32 = 256;

fn arb_side_addr() -> impl Strategy<Value = Vec<u8>> {
    // Consensus-address length, vote-address length, and a few junk lengths:
    // the codec itself accepts any length, classification happens later.
    prop_oneof![
        proptest::collection::vec(any::<u8>(), 20),
        proptest::collection::vec(any::<u8>(), 48),
        proptest::collection::vec(any::<u8>(), 0..64),
    ]
}

fn arb_packet() -> impl Strategy<Value = SideSlashPacket> {
    (any::<u16>(), arb_side_addr(), any::<u64>(), any::<u64>()).prop_map(
        |(chain, side_addr, side_height, side_timestamp)| SideSlashPacket {
            side_chain_id: SideChainId(chain),
            side_addr,
            side_height,
            side_timestamp,
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(PACKET_PROPTEST_CASES))]

    #[test]
    fn prop_packet_roundtrip(packet in arb_packet()) {
        let encoded = packet.encode();
        let decoded = SideSlashPacket::decode(&encoded).expect("valid packet must decode");
        prop_assert_eq!(&decoded, &packet);
        // A second encode must reproduce the exact bytes (single canonical form).
        prop_assert_eq!(decoded.encode(), encoded);
    }

    #[test]
    fn prop_packet_rejects_truncation(packet in arb_packet()) {
        let encoded = packet.encode();
        for cut in 0..encoded.len() {
            prop_assert!(SideSlashPacket::decode(&encoded[..cut]).is_err());
        }
    }

    #[test]
    fn prop_ack_roundtrip(code in any::<u32>()) {
        let ack = CommonAck::new(code);
        prop_assert_eq!(CommonAck::decode(&ack.encode()), Ok(ack));
    }
}
