//! Core types for the fedchain slashing module.
//!
//! This crate defines the identity, time and state primitives shared by the
//! wire, store and engine layers:
//! - `ConsAddress` / `VoteAddress`: validator fingerprints on the primary
//!   chain and on federated side chains
//! - `Timestamp`: nanosecond-precision wall-clock time used for evidence
//!   aging and jail terms
//! - `SideChainId`: well-known side-chain selectors with textual aliases
//! - `ValidatorSigningInfo` / `SlashRecord` / `InfractionKind`: the slashing
//!   state machine's persisted records
//! - `SlashParams`: governance-tunable parameters with domain validation

pub mod params;
pub mod primitives;
pub mod state_slashing;

pub use params::{ParamError, SlashParams};
pub use primitives::{
    ConsAddress, Height, Power, SideChainId, StakeAmount, Timestamp, UnknownSideChainName,
    VoteAddress, CONS_ADDR_LEN, SIDE_CHAIN_ID_BSC, SIDE_CHAIN_ID_CHAPEL, SIDE_CHAIN_ID_RIALTO,
    VOTE_ADDR_LEN,
};
pub use state_slashing::{InfractionKind, SlashRecord, ValidatorSigningInfo};
