//! The slashing keeper: composition root of the module.
//!
//! The keeper owns the parameter store, the side-chain registry, the event
//! publisher and the external seams (validator set, fee pool). The KV store
//! is supplied per call by the host; side-chain paths narrow it to the
//! chain's namespace before touching state.

use fedchain_store::kv::PrefixedKvStore;
use fedchain_store::{addr_pubkey, signing_info, KvStore};
use fedchain_types::{ConsAddress, SideChainId, SlashParams, ValidatorSigningInfo};

use crate::context::BlockContext;
use crate::error::UnjailError;
use crate::events::EventPublisher;
use crate::fee_pool::FeePool;
use crate::params::ParamStore;
use crate::side_chain::SideChainRegistry;
use crate::validator_set::ValidatorSet;

/// A validator entering the active set: its consensus address and public
/// key as reported by the consensus layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatorActivation {
    pub cons_addr: ConsAddress,
    pub pubkey: Vec<u8>,
}

pub struct SlashingKeeper<V: ValidatorSet, F: FeePool> {
    pub(crate) param_store: ParamStore,
    pub(crate) validator_set: V,
    pub(crate) side_chains: SideChainRegistry,
    pub(crate) fee_pool: F,
    pub(crate) publisher: EventPublisher,
}

impl<V: ValidatorSet, F: FeePool> SlashingKeeper<V, F> {
    pub fn new(
        params: SlashParams,
        validator_set: V,
        side_chains: SideChainRegistry,
        fee_pool: F,
    ) -> Result<Self, fedchain_types::ParamError> {
        Ok(SlashingKeeper {
            param_store: ParamStore::new(params)?,
            validator_set,
            side_chains,
            fee_pool,
            publisher: EventPublisher::new(),
        })
    }

    pub fn params(&self) -> &SlashParams {
        self.param_store.get()
    }

    pub fn param_store_mut(&mut self) -> &mut ParamStore {
        &mut self.param_store
    }

    pub fn validator_set(&self) -> &V {
        &self.validator_set
    }

    pub fn validator_set_mut(&mut self) -> &mut V {
        &mut self.validator_set
    }

    pub fn fee_pool(&self) -> &F {
        &self.fee_pool
    }

    pub fn publisher_mut(&mut self) -> &mut EventPublisher {
        &mut self.publisher
    }

    /// Register newly-activated validators: record their pubkeys and make
    /// sure signing info exists so the liveness engine's presence contract
    /// holds from the first observed block.
    pub fn add_validators(
        &mut self,
        store: &mut dyn KvStore,
        ctx: &BlockContext,
        activations: &[ValidatorActivation],
    ) {
        for activation in activations {
            addr_pubkey::set(store, &activation.cons_addr, &activation.pubkey);
            if signing_info::get(store, &activation.cons_addr).is_none() {
                signing_info::set(
                    store,
                    &activation.cons_addr,
                    &ValidatorSigningInfo::new(ctx.height),
                );
            }
        }
    }

    /// Resolve the stored pubkey for a consensus address; panics when the
    /// host broke the activation contract.
    pub(crate) fn must_get_pubkey(&self, store: &dyn KvStore, addr: &ConsAddress) -> Vec<u8> {
        match addr_pubkey::get(store, addr) {
            Some(pubkey) => pubkey,
            None => panic!("validator consensus address {} not found", addr),
        }
    }

    // ========================================================================
    // Unjail
    // ========================================================================

    /// Primary-chain unjail, driven by a validator-signed transaction.
    pub fn unjail(
        &mut self,
        store: &mut dyn KvStore,
        ctx: &BlockContext,
        operator: &str,
    ) -> Result<(), UnjailError> {
        self.unjail_in_store(store, ctx, operator)
    }

    /// Side-chain unjail: same rules, evaluated against the side chain's
    /// namespaced state.
    pub fn unjail_side_chain(
        &mut self,
        store: &mut dyn KvStore,
        ctx: &BlockContext,
        operator: &str,
        side_chain_id: SideChainId,
    ) -> Result<(), UnjailError> {
        let chain_name = self
            .side_chains
            .dest_chain_name(side_chain_id)
            .ok_or(UnjailError::InvalidSideChainId)?
            .to_string();
        let mut side_store =
            PrefixedKvStore::new(store, SideChainRegistry::store_namespace(&chain_name));
        self.unjail_in_store(&mut side_store, ctx, operator)
    }

    fn unjail_in_store(
        &mut self,
        store: &mut dyn KvStore,
        ctx: &BlockContext,
        operator: &str,
    ) -> Result<(), UnjailError> {
        let validator = self
            .validator_set
            .validator_by_operator(operator)
            .ok_or(UnjailError::NoValidatorForAddress)?;
        if !self.validator_set.self_delegation_sufficient(operator) {
            return Err(UnjailError::SelfDelegationTooLow);
        }
        if !validator.jailed {
            return Err(UnjailError::ValidatorNotJailed);
        }
        let info = signing_info::get(store, &validator.cons_addr)
            .ok_or(UnjailError::NoValidatorForAddress)?;
        if ctx.block_time < info.jailed_until {
            return Err(UnjailError::StillJailed);
        }
        self.validator_set.unjail(&validator.cons_addr);
        eprintln!(
            "[SLASHING] validator {} unjailed at height {}",
            validator.cons_addr, ctx.height
        );
        Ok(())
    }
}
