//! Storage layer for the fedchain slashing module.
//!
//! The module state lives in a key-value store supplied by the host per
//! call; this crate provides:
//! - [`KvStore`]: the abstract store interface, with an in-memory B-tree
//!   implementation for tests and a prefix-scoped view used for per-side-chain
//!   namespacing
//! - the one-byte-prefix key layout shared by all slashing tables
//! - typed accessors for signing info, the missed-block bitmap, slash
//!   records and the address→pubkey map
//!
//! The typed stores are deliberately dumb: counter maintenance and all
//! policy decisions live in the engines, never here.

pub mod addr_pubkey;
pub mod keys;
pub mod kv;
pub mod signing_info;
pub mod slash_records;

pub use kv::{KvStore, MemKvStore, PrefixedKvStore};
