//! Idempotence ledger of applied slashes.
//!
//! Presence of a record under (`cons_addr`, `kind`, `infraction_height`) is
//! the dedup flag for re-submitted evidence; the per-kind prefix scan backs
//! the malicious-vote anti-drain guard.

use crate::keys;
use crate::kv::KvStore;
use fedchain_types::{ConsAddress, InfractionKind, SlashRecord};
use fedchain_wire::{WireDecode, WireEncode};

pub fn has(
    store: &dyn KvStore,
    addr: &ConsAddress,
    kind: InfractionKind,
    infraction_height: u64,
) -> bool {
    store
        .get(&keys::slash_record_key(addr, kind, infraction_height))
        .is_some()
}

pub fn put(store: &mut dyn KvStore, record: &SlashRecord) {
    let key = keys::slash_record_key(
        &record.cons_addr,
        record.infraction_type,
        record.infraction_height,
    );
    store.set(&key, record.encode_to_vec());
}

pub fn get(
    store: &dyn KvStore,
    addr: &ConsAddress,
    kind: InfractionKind,
    infraction_height: u64,
) -> Option<SlashRecord> {
    let bytes = store.get(&keys::slash_record_key(addr, kind, infraction_height))?;
    match SlashRecord::decode_all(&bytes) {
        Ok(record) => Some(record),
        Err(err) => panic!("corrupt slash record for validator {}: {}", addr, err),
    }
}

/// Whether any record of `kind` exists for this validator, at any height.
pub fn is_slashed(store: &dyn KvStore, addr: &ConsAddress, kind: InfractionKind) -> bool {
    store.has_prefix(&keys::slash_record_kind_prefix(addr, kind))
}
