//! Community fee pool seam.
//!
//! Slashed amounts that are not paid out as compensation are committed
//! here. Commits only happen in the deliver phase; the keeper enforces
//! that, not the pool.

use std::collections::BTreeMap;

use fedchain_types::StakeAmount;

pub trait FeePool {
    /// Credit `amount` of `denom` to the pool under an attribution tag.
    fn add_and_commit_fee(&mut self, tag: &'static str, denom: &str, amount: StakeAmount);
}

/// Accumulating pool for tests and simulations.
#[derive(Debug, Default)]
pub struct InMemoryFeePool {
    total: StakeAmount,
    by_tag: BTreeMap<&'static str, StakeAmount>,
}

impl InMemoryFeePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> StakeAmount {
        self.total
    }

    pub fn collected(&self, tag: &str) -> StakeAmount {
        self.by_tag.get(tag).copied().unwrap_or(0)
    }
}

impl FeePool for InMemoryFeePool {
    fn add_and_commit_fee(&mut self, tag: &'static str, denom: &str, amount: StakeAmount) {
        self.total += amount;
        *self.by_tag.entry(tag).or_insert(0) += amount;
        eprintln!("[FEEPOOL] committed {} {} under {}", amount, denom, tag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fees_accumulate_by_tag() {
        let mut pool = InMemoryFeePool::new();
        pool.add_and_commit_fee("side_downtime_slash", "FED", 100);
        pool.add_and_commit_fee("side_downtime_slash", "FED", 20);
        pool.add_and_commit_fee("side_malicious_vote_slash", "FED", 7);

        assert_eq!(pool.total(), 127);
        assert_eq!(pool.collected("side_downtime_slash"), 120);
        assert_eq!(pool.collected("side_malicious_vote_slash"), 7);
        assert_eq!(pool.collected("unknown"), 0);
    }
}
