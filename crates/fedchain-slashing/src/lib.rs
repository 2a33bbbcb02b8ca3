//! Slashing state machine for the fedchain proof-of-stake chain.
//!
//! The module observes validator misbehavior on the primary chain and on
//! federated side chains and deterministically applies stake penalties and
//! jail terms:
//! - `liveness`: per-block signature observer implementing the
//!   sliding-window downtime detector
//! - `evidence`: primary-chain double-sign handling and the cross-chain
//!   slash-packet intake (side-chain downtime and malicious votes)
//! - `unjail` via `msgs`: validator-initiated return to the active set
//!
//! The host drives the keeper serially through the block sequence
//! (begin-block → signatures → transactions → end-block) and supplies the
//! KV store per call; a panic inside the keeper discards the in-flight
//! block. External bookkeeping is reached through the [`ValidatorSet`],
//! [`FeePool`] and side-chain registry seams, which ship with in-memory
//! implementations for tests and simulations.

pub mod context;
pub mod error;
pub mod events;
pub mod evidence;
pub mod fee_pool;
pub mod genesis;
pub mod keeper;
pub mod liveness;
pub mod msgs;
pub mod params;
pub mod side_chain;
pub mod validator_set;

pub use context::{BlockContext, ExecPhase};
pub use error::{ExecuteResult, SlashingError, UnjailError};
pub use events::{EventPublisher, SideSlashEvent};
pub use fee_pool::{FeePool, InMemoryFeePool};
pub use genesis::{GenesisError, GenesisParams, GenesisSigningInfo, GenesisState};
pub use keeper::{SlashingKeeper, ValidatorActivation};
pub use msgs::{MsgBscSubmitEvidence, MsgSideChainUnjail, MsgUnjail, SlashingMsg, TxResult};
pub use params::{ParamStore, ParamUpdateDecision};
pub use side_chain::SideChainRegistry;
pub use validator_set::{
    InMemoryValidator, InMemoryValidatorSet, ValidatorSet, ValidatorSetError, ValidatorView,
    VALIDATOR_UPDATE_DELAY,
};
