//! Typed access to signing info and the missed-block bitmap.
//!
//! The bitmap stores one key per *missed* index; an absent key means the
//! block was signed, so a healthy validator writes nothing. Counter deltas
//! are applied by the caller, never here.

use crate::keys;
use crate::kv::KvStore;
use fedchain_types::{ConsAddress, ValidatorSigningInfo};
use fedchain_wire::{WireDecode, WireEncode};

/// Marker value for a missed-block bit.
const MISSED: [u8; 1] = [0x01];

pub fn get(store: &dyn KvStore, addr: &ConsAddress) -> Option<ValidatorSigningInfo> {
    let bytes = store.get(&keys::signing_info_key(addr))?;
    match ValidatorSigningInfo::decode_all(&bytes) {
        Ok(info) => Some(info),
        Err(err) => panic!(
            "corrupt signing info for validator {}: {}",
            addr, err
        ),
    }
}

pub fn set(store: &mut dyn KvStore, addr: &ConsAddress, info: &ValidatorSigningInfo) {
    store.set(&keys::signing_info_key(addr), info.encode_to_vec());
}

/// Whether the block observed at `index` (mod window) was missed.
pub fn get_missed(store: &dyn KvStore, addr: &ConsAddress, index: u64) -> bool {
    store.get(&keys::missed_bit_key(addr, index)).is_some()
}

/// Flip the bit at `index`. Writing `false` removes the entry so signed
/// blocks occupy no storage.
pub fn set_missed(store: &mut dyn KvStore, addr: &ConsAddress, index: u64, missed: bool) {
    let key = keys::missed_bit_key(addr, index);
    if missed {
        store.set(&key, MISSED.to_vec());
    } else {
        store.delete(&key);
    }
}

/// Drop the validator's whole bitmap subtree (reset after a downtime jail).
pub fn clear_missed(store: &mut dyn KvStore, addr: &ConsAddress) {
    store.delete_prefix(&keys::missed_bit_prefix(addr));
}
