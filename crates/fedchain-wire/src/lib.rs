//! Deterministic wire encodings for the fedchain slashing module.
//!
//! Two codec families live here:
//! - `rlp`: a minimal canonical RLP codec used for cross-chain payloads
//!   (slash packets and the common ack). Decoding is strict: non-minimal
//!   lengths, leading zeros in integers and trailing bytes are rejected so
//!   that a payload has exactly one valid encoding.
//! - `io`: fixed-layout field-order codecs (`WireEncode`/`WireDecode`) used
//!   for state records persisted in the KV store.

pub mod error;
pub mod io;
pub mod packet;
pub mod rlp;
pub mod state;

pub use error::WireError;
pub use io::{WireDecode, WireEncode};
pub use packet::{CommonAck, SideSlashPacket};
