//! Identity, time and amount primitives for the fedchain slashing module.

use std::fmt;
use std::time::Duration;

/// Primary-chain block height.
pub type Height = i64;

/// Validator voting power as delivered by the consensus layer.
pub type Power = i64;

/// Amount of bonded stake in bond-denom base units.
pub type StakeAmount = u64;

/// Length in bytes of a primary-chain consensus address.
pub const CONS_ADDR_LEN: usize = 20;

/// Length in bytes of a side-chain vote address (BLS-style fingerprint).
pub const VOTE_ADDR_LEN: usize = 48;

// ============================================================================
// ConsAddress
// ============================================================================

/// Short fingerprint of a validator's consensus public key.
///
/// Consensus addresses key all per-validator slashing state: signing info,
/// the missed-block bitmap, slash records and the address→pubkey map.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConsAddress(pub [u8; CONS_ADDR_LEN]);

impl ConsAddress {
    pub const fn new(bytes: [u8; CONS_ADDR_LEN]) -> Self {
        ConsAddress(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Parse an address from a raw byte slice of exactly `CONS_ADDR_LEN` bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != CONS_ADDR_LEN {
            return None;
        }
        let mut out = [0u8; CONS_ADDR_LEN];
        out.copy_from_slice(bytes);
        Some(ConsAddress(out))
    }
}

impl fmt::Display for ConsAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl fmt::Debug for ConsAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConsAddress({})", self)
    }
}

// ============================================================================
// VoteAddress
// ============================================================================

/// Fingerprint used on side chains for BLS-style voting.
///
/// Vote addresses identify validators in malicious-vote evidence; the
/// validator-set bookkeeping maps them back to consensus addresses.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VoteAddress(pub [u8; VOTE_ADDR_LEN]);

impl VoteAddress {
    pub const fn new(bytes: [u8; VOTE_ADDR_LEN]) -> Self {
        VoteAddress(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != VOTE_ADDR_LEN {
            return None;
        }
        let mut out = [0u8; VOTE_ADDR_LEN];
        out.copy_from_slice(bytes);
        Some(VoteAddress(out))
    }
}

impl fmt::Display for VoteAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl fmt::Debug for VoteAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VoteAddress({})", self)
    }
}

// ============================================================================
// Timestamp
// ============================================================================

/// Wall-clock time as nanoseconds since the unix epoch.
///
/// Evidence aging on the primary chain compares full-precision timestamps;
/// side-chain evidence aging is computed in whole unix seconds (see the
/// evidence processor). Jail terms are stored at full precision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub const fn from_unix_nanos(nanos: i64) -> Self {
        Timestamp(nanos)
    }

    pub const fn from_unix_secs(secs: i64) -> Self {
        Timestamp(secs * 1_000_000_000)
    }

    pub const fn unix_nanos(&self) -> i64 {
        self.0
    }

    /// Whole seconds since the epoch, rounded toward negative infinity.
    pub const fn unix_secs(&self) -> i64 {
        self.0.div_euclid(1_000_000_000)
    }

    /// Signed nanoseconds elapsed since `earlier`. Negative when `earlier`
    /// is in the future of `self`.
    pub const fn nanos_since(&self, earlier: Timestamp) -> i64 {
        self.0 - earlier.0
    }

    /// This timestamp advanced by `d`, saturating at `i64::MAX` nanos.
    pub fn saturating_add(&self, d: Duration) -> Timestamp {
        let nanos = i64::try_from(d.as_nanos()).unwrap_or(i64::MAX);
        Timestamp(self.0.saturating_add(nanos))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ns", self.0)
    }
}

// ============================================================================
// SideChainId
// ============================================================================

/// Well-known chain selector for a federated side chain.
///
/// Side-chain ids travel in slash packets; the side-chain registry maps them
/// to chain names and store namespaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SideChainId(pub u16);

/// BNB Smart Chain mainnet.
pub const SIDE_CHAIN_ID_BSC: SideChainId = SideChainId(56);
/// BNB Smart Chain testnet.
pub const SIDE_CHAIN_ID_CHAPEL: SideChainId = SideChainId(97);
/// Internal integration network.
pub const SIDE_CHAIN_ID_RIALTO: SideChainId = SideChainId(714);

/// Error for a textual side-chain alias that is not registered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownSideChainName(pub String);

impl fmt::Display for UnknownSideChainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "provided side chain name {:?} is not supported", self.0)
    }
}

impl std::error::Error for UnknownSideChainName {}

impl SideChainId {
    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    /// Resolve a case-insensitive textual alias to its chain selector.
    pub fn from_text(name: &str) -> Result<SideChainId, UnknownSideChainName> {
        match name.to_ascii_lowercase().as_str() {
            "bsc" => Ok(SIDE_CHAIN_ID_BSC),
            "chapel" => Ok(SIDE_CHAIN_ID_CHAPEL),
            "rialto" => Ok(SIDE_CHAIN_ID_RIALTO),
            _ => Err(UnknownSideChainName(name.to_string())),
        }
    }
}

impl fmt::Display for SideChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cons_address_from_slice_length() {
        assert!(ConsAddress::from_slice(&[0u8; CONS_ADDR_LEN]).is_some());
        assert!(ConsAddress::from_slice(&[0u8; CONS_ADDR_LEN - 1]).is_none());
        assert!(ConsAddress::from_slice(&[0u8; VOTE_ADDR_LEN]).is_none());
    }

    #[test]
    fn test_timestamp_seconds_floor() {
        assert_eq!(Timestamp::from_unix_nanos(1_999_999_999).unix_secs(), 1);
        assert_eq!(Timestamp::from_unix_secs(7).unix_nanos(), 7_000_000_000);
    }

    #[test]
    fn test_timestamp_age() {
        let t0 = Timestamp::from_unix_secs(100);
        let t1 = Timestamp::from_unix_secs(101);
        assert_eq!(t1.nanos_since(t0), 1_000_000_000);
        assert_eq!(t0.nanos_since(t1), -1_000_000_000);
    }

    #[test]
    fn test_side_chain_id_from_text() {
        assert_eq!(SideChainId::from_text("bsc"), Ok(SIDE_CHAIN_ID_BSC));
        assert_eq!(SideChainId::from_text("Chapel"), Ok(SIDE_CHAIN_ID_CHAPEL));
        assert_eq!(SideChainId::from_text("RIALTO"), Ok(SIDE_CHAIN_ID_RIALTO));
        assert!(SideChainId::from_text("osmosis").is_err());
    }
}
