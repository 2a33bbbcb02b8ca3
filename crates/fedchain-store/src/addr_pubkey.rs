//! Consensus address → public key map.
//!
//! Entries are added when a validator activates and retained after unbond:
//! late evidence may still need to resolve the address, and the evidence
//! age gate bounds how long the entry stays useful.

use crate::keys;
use crate::kv::KvStore;
use fedchain_types::ConsAddress;

pub fn set(store: &mut dyn KvStore, addr: &ConsAddress, pubkey: &[u8]) {
    store.set(&keys::addr_pubkey_key(addr), pubkey.to_vec());
}

pub fn get(store: &dyn KvStore, addr: &ConsAddress) -> Option<Vec<u8>> {
    store.get(&keys::addr_pubkey_key(addr))
}
