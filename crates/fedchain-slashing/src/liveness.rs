//! Sliding-window downtime detector.
//!
//! Called once per active validator per block, in active-set order. Each
//! call flips at most one bitmap bit and adjusts the missed-blocks counter
//! by ±1, so the window popcount is maintained lazily and no call ever
//! scans the full window.

use fedchain_store::{signing_info, KvStore};
use fedchain_types::{ConsAddress, Power};

use crate::context::BlockContext;
use crate::fee_pool::FeePool;
use crate::keeper::SlashingKeeper;
use crate::validator_set::{ValidatorSet, VALIDATOR_UPDATE_DELAY};

impl<V: ValidatorSet, F: FeePool> SlashingKeeper<V, F> {
    /// Record one validator's signature presence for the current block.
    ///
    /// Panics when signing info is absent: the host guarantees presence for
    /// every active validator (see `add_validators`), so absence is an
    /// integration bug that must halt the block.
    pub fn handle_validator_signature(
        &mut self,
        store: &mut dyn KvStore,
        ctx: &BlockContext,
        addr: &ConsAddress,
        power: Power,
        signed: bool,
    ) {
        let params = self.params().clone();
        let height = ctx.height;
        let pubkey = self.must_get_pubkey(store, addr);

        let mut info = match signing_info::get(store, addr) {
            Some(info) => info,
            None => panic!("expected signing info for validator {} but not found", addr),
        };

        let window = params.signed_blocks_window;
        let index = info.index_offset % window as u64;
        info.index_offset += 1;

        // The counter tracks the popcount of the bit array; flipping a bit
        // adjusts it by exactly one, unchanged bits cost no write.
        let previous = signing_info::get_missed(store, addr, index);
        let missed = !signed;
        if previous != missed {
            signing_info::set_missed(store, addr, index, missed);
            if missed {
                info.missed_blocks_counter += 1;
            } else {
                info.missed_blocks_counter -= 1;
            }
        }

        if missed {
            eprintln!(
                "[LIVENESS] absent validator {} at height {}, {} missed, threshold {}",
                addr, height, info.missed_blocks_counter, params.min_signed_per_window
            );
        }

        let min_height = info.start_height + window;
        let max_missed = params.max_missed_per_window();
        if height > min_height && info.missed_blocks_counter > max_missed {
            match self.validator_set.validator_by_cons_addr(addr) {
                Some(validator) if !validator.jailed => {
                    eprintln!(
                        "[LIVENESS] validator {:02x?} past min height {} and below signed blocks threshold {}",
                        pubkey, min_height, params.min_signed_per_window
                    );
                    // The stake distribution that signed is one update delay
                    // behind, minus one more because this observation is the
                    // last commit. May go negative near genesis.
                    let distribution_height = height - VALIDATOR_UPDATE_DELAY - 1;
                    self.validator_set.slash(
                        addr,
                        distribution_height,
                        power,
                        params.slash_bps_downtime,
                    );
                    self.validator_set.jail(addr);
                    info.jailed_until = ctx
                        .block_time
                        .saturating_add(params.downtime_unbond_duration);
                    // Reset the window so the validator is not immediately
                    // slashed again on rebonding.
                    info.missed_blocks_counter = 0;
                    info.index_offset = 0;
                    signing_info::clear_missed(store, addr);
                }
                _ => {
                    eprintln!(
                        "[LIVENESS] validator {} would have been slashed for downtime, but was \
                         either not found in store or already jailed",
                        addr
                    );
                }
            }
        }

        signing_info::set(store, addr, &info);
    }
}
