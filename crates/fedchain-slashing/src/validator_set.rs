//! External validator-set seam.
//!
//! Bonding, unbonding and delegation math live outside the slashing module;
//! this trait is the contract the module consumes. An in-memory
//! implementation backs unit tests and simulations; a node wires the real
//! staking module here.

use std::collections::BTreeMap;
use std::fmt;

use fedchain_types::{ConsAddress, Height, Power, StakeAmount, VoteAddress};

/// Blocks between a validator-set change and the consensus layer acting on
/// it. Slashing subtracts this from infraction heights so the stake
/// distribution that actually signed is the one slashed.
pub const VALIDATOR_UPDATE_DELAY: i64 = 1;

/// Full fraction in basis points.
const MAX_BPS: u16 = 10_000;

/// View of a validator as the slashing module needs it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatorView {
    /// Operator address (opaque bech32-style string).
    pub operator: String,
    pub cons_addr: ConsAddress,
    pub jailed: bool,
}

/// Error from validator-set bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidatorSetError {
    ValidatorNotFound(ConsAddress),
    NoBondedStake(ConsAddress),
    Other(String),
}

impl fmt::Display for ValidatorSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidatorSetError::ValidatorNotFound(addr) => {
                write!(f, "validator {} not found", addr)
            }
            ValidatorSetError::NoBondedStake(addr) => {
                write!(f, "validator {} has no bonded stake on this chain", addr)
            }
            ValidatorSetError::Other(msg) => write!(f, "validator set error: {}", msg),
        }
    }
}

impl std::error::Error for ValidatorSetError {}

/// Contract between the slashing module and validator-set bookkeeping.
pub trait ValidatorSet {
    fn validator_by_cons_addr(&self, addr: &ConsAddress) -> Option<ValidatorView>;

    fn validator_by_vote_addr(&self, vote_addr: &VoteAddress) -> Option<ValidatorView>;

    fn validator_by_operator(&self, operator: &str) -> Option<ValidatorView>;

    /// Burn `fraction_bps` of the stake that was bonded at
    /// `distribution_height` (negative heights are legal and mean
    /// pre-genesis; they only filter unbonding and redelegations).
    fn slash(
        &mut self,
        addr: &ConsAddress,
        distribution_height: Height,
        power: Power,
        fraction_bps: u16,
    );

    /// Clamp a requested fraction so the net fraction applied within the
    /// validator's current slashing period never exceeds the worst single
    /// infraction. Returns the incremental fraction still applicable.
    fn cap_by_slashing_period(
        &mut self,
        addr: &ConsAddress,
        fraction_bps: u16,
        distribution_height: Height,
    ) -> u16;

    fn jail(&mut self, addr: &ConsAddress);

    fn unjail(&mut self, addr: &ConsAddress);

    /// Burn up to `amount` of the validator's stake bonded to the named
    /// side chain; returns the view and the amount actually burned (less
    /// than requested when stake is short).
    fn slash_side_chain(
        &mut self,
        chain_name: &str,
        addr: &ConsAddress,
        amount: StakeAmount,
    ) -> Result<(ValidatorView, StakeAmount), ValidatorSetError>;

    /// Distribute `amount` pro rata to the remaining active validators as
    /// compensation. Returns `(false, empty)` when there is no recipient;
    /// otherwise the per-operator allocation, summing exactly to `amount`.
    fn allocate_slash_amt_to_validators(
        &mut self,
        offender: &ConsAddress,
        amount: StakeAmount,
    ) -> Result<(bool, BTreeMap<String, StakeAmount>), ValidatorSetError>;

    fn bond_denom(&self) -> String;

    /// Whether the operator still holds enough self-bond to leave jail.
    fn self_delegation_sufficient(&self, operator: &str) -> bool;
}

// ============================================================================
// In-memory implementation
// ============================================================================

/// A validator tracked by [`InMemoryValidatorSet`].
#[derive(Clone, Debug)]
pub struct InMemoryValidator {
    pub operator: String,
    pub cons_addr: ConsAddress,
    pub vote_addr: Option<VoteAddress>,
    /// Primary-chain bonded tokens (also the reported power).
    pub tokens: StakeAmount,
    /// Stake bonded to side chains, by chain name.
    pub side_stake: BTreeMap<String, StakeAmount>,
    pub self_delegation: StakeAmount,
    pub jailed: bool,
}

impl InMemoryValidator {
    pub fn new(operator: &str, cons_addr: ConsAddress, tokens: StakeAmount) -> Self {
        InMemoryValidator {
            operator: operator.to_string(),
            cons_addr,
            vote_addr: None,
            tokens,
            side_stake: BTreeMap::new(),
            self_delegation: tokens,
            jailed: false,
        }
    }

    pub fn with_vote_addr(mut self, vote_addr: VoteAddress) -> Self {
        self.vote_addr = Some(vote_addr);
        self
    }

    pub fn with_side_stake(mut self, chain_name: &str, stake: StakeAmount) -> Self {
        self.side_stake.insert(chain_name.to_string(), stake);
        self
    }

    fn view(&self) -> ValidatorView {
        ValidatorView {
            operator: self.operator.clone(),
            cons_addr: self.cons_addr,
            jailed: self.jailed,
        }
    }
}

/// Net fraction already applied within a validator's current slashing
/// period. The period opens at the first capped slash and closes on unjail.
#[derive(Clone, Copy, Debug, Default)]
struct SlashingPeriod {
    applied_bps: u16,
}

/// B-tree-backed validator set for tests and simulations.
///
/// Deterministic by construction: validators iterate in consensus-address
/// order and compensation rounding is largest-remainder with operator-order
/// tie-break, so the allocation always sums to the input amount.
#[derive(Debug, Default)]
pub struct InMemoryValidatorSet {
    validators: BTreeMap<ConsAddress, InMemoryValidator>,
    periods: BTreeMap<ConsAddress, SlashingPeriod>,
    min_self_delegation: StakeAmount,
    total_primary_slashed: StakeAmount,
}

impl InMemoryValidatorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_validators(validators: impl IntoIterator<Item = InMemoryValidator>) -> Self {
        let validators: BTreeMap<_, _> = validators
            .into_iter()
            .map(|v| (v.cons_addr, v))
            .collect();
        InMemoryValidatorSet {
            validators,
            periods: BTreeMap::new(),
            min_self_delegation: 1,
            total_primary_slashed: 0,
        }
    }

    pub fn set_min_self_delegation(&mut self, min: StakeAmount) {
        self.min_self_delegation = min;
    }

    pub fn validator(&self, addr: &ConsAddress) -> Option<&InMemoryValidator> {
        self.validators.get(addr)
    }

    pub fn validator_mut(&mut self, addr: &ConsAddress) -> Option<&mut InMemoryValidator> {
        self.validators.get_mut(addr)
    }

    /// Total primary-chain stake burned so far.
    pub fn total_primary_slashed(&self) -> StakeAmount {
        self.total_primary_slashed
    }

    fn fraction_of(amount: StakeAmount, bps: u16) -> StakeAmount {
        (amount as u128 * u128::from(bps) / u128::from(MAX_BPS)) as u64
    }
}

impl ValidatorSet for InMemoryValidatorSet {
    fn validator_by_cons_addr(&self, addr: &ConsAddress) -> Option<ValidatorView> {
        self.validators.get(addr).map(InMemoryValidator::view)
    }

    fn validator_by_vote_addr(&self, vote_addr: &VoteAddress) -> Option<ValidatorView> {
        self.validators
            .values()
            .find(|v| v.vote_addr.as_ref() == Some(vote_addr))
            .map(InMemoryValidator::view)
    }

    fn validator_by_operator(&self, operator: &str) -> Option<ValidatorView> {
        self.validators
            .values()
            .find(|v| v.operator == operator)
            .map(InMemoryValidator::view)
    }

    fn slash(
        &mut self,
        addr: &ConsAddress,
        _distribution_height: Height,
        power: Power,
        fraction_bps: u16,
    ) {
        let Some(validator) = self.validators.get_mut(addr) else {
            eprintln!("[VALSET] slash skipped, validator {} not found", addr);
            return;
        };
        // Slash is based on the power at the infraction, not current tokens.
        let slash_amount = Self::fraction_of(power.max(0) as u64, fraction_bps);
        let burned = slash_amount.min(validator.tokens);
        validator.tokens -= burned;
        validator.self_delegation = validator.self_delegation.saturating_sub(burned);
        self.total_primary_slashed += burned;
        eprintln!(
            "[VALSET] slashed {} tokens ({} bps of power {}) from validator {}",
            burned, fraction_bps, power, addr
        );
    }

    fn cap_by_slashing_period(
        &mut self,
        addr: &ConsAddress,
        fraction_bps: u16,
        _distribution_height: Height,
    ) -> u16 {
        let period = self.periods.entry(*addr).or_default();
        // Within one period the net fraction is clamped to the worst single
        // infraction; re-slashing is reduced by what was already applied.
        let revised = fraction_bps.saturating_sub(period.applied_bps);
        period.applied_bps = period.applied_bps.max(fraction_bps);
        revised
    }

    fn jail(&mut self, addr: &ConsAddress) {
        if let Some(validator) = self.validators.get_mut(addr) {
            validator.jailed = true;
            eprintln!("[VALSET] jailed validator {}", addr);
        }
    }

    fn unjail(&mut self, addr: &ConsAddress) {
        if let Some(validator) = self.validators.get_mut(addr) {
            validator.jailed = false;
            // Leaving jail closes the slashing period.
            self.periods.remove(addr);
            eprintln!("[VALSET] unjailed validator {}", addr);
        }
    }

    fn slash_side_chain(
        &mut self,
        chain_name: &str,
        addr: &ConsAddress,
        amount: StakeAmount,
    ) -> Result<(ValidatorView, StakeAmount), ValidatorSetError> {
        let validator = self
            .validators
            .get_mut(addr)
            .ok_or(ValidatorSetError::ValidatorNotFound(*addr))?;
        let stake = validator
            .side_stake
            .get_mut(chain_name)
            .ok_or(ValidatorSetError::NoBondedStake(*addr))?;
        let burned = amount.min(*stake);
        *stake -= burned;
        eprintln!(
            "[VALSET] slashed {} of requested {} side stake on {} from validator {}",
            burned, amount, chain_name, addr
        );
        Ok((validator.view(), burned))
    }

    fn allocate_slash_amt_to_validators(
        &mut self,
        offender: &ConsAddress,
        amount: StakeAmount,
    ) -> Result<(bool, BTreeMap<String, StakeAmount>), ValidatorSetError> {
        let recipients: Vec<(String, StakeAmount)> = self
            .validators
            .values()
            .filter(|v| v.cons_addr != *offender && !v.jailed && v.tokens > 0)
            .map(|v| (v.operator.clone(), v.tokens))
            .collect();
        if recipients.is_empty() {
            return Ok((false, BTreeMap::new()));
        }

        let total_weight: u128 = recipients.iter().map(|(_, w)| u128::from(*w)).sum();
        // Floor shares first, then hand out the remainder one unit at a time,
        // largest remainder first with operator order as the tie-break.
        let mut shares: Vec<(String, StakeAmount, u128)> = recipients
            .iter()
            .map(|(op, weight)| {
                let exact = u128::from(amount) * u128::from(*weight);
                let share = (exact / total_weight) as u64;
                let remainder = exact % total_weight;
                (op.clone(), share, remainder)
            })
            .collect();
        let floored: StakeAmount = shares.iter().map(|(_, s, _)| s).sum();
        let mut leftover = amount - floored;
        shares.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.0.cmp(&b.0)));
        for share in shares.iter_mut() {
            if leftover == 0 {
                break;
            }
            share.1 += 1;
            leftover -= 1;
        }

        let mut allocation = BTreeMap::new();
        for (operator, share, _) in shares {
            if share > 0 {
                allocation.insert(operator.clone(), share);
            }
            if let Some(validator) = self.validators.values_mut().find(|v| v.operator == operator)
            {
                validator.tokens += share;
            }
        }
        Ok((true, allocation))
    }

    fn bond_denom(&self) -> String {
        "FED".to_string()
    }

    fn self_delegation_sufficient(&self, operator: &str) -> bool {
        self.validators
            .values()
            .find(|v| v.operator == operator)
            .map(|v| v.self_delegation >= self.min_self_delegation)
            .unwrap_or(false)
    }
}
