//! Evidence processing: primary-chain double signs and side-chain packets.
//!
//! Double-sign evidence arrives from the consensus layer already verified;
//! side-chain claims arrive as RLP packets over the cross-chain transport.
//! Every packet produces an ack carrying a result code — bad packets are
//! errors, never panics. The only panics here are contract violations
//! (evidence for an address the host never activated).

use std::collections::BTreeMap;

use fedchain_store::kv::PrefixedKvStore;
use fedchain_store::{signing_info, slash_records, KvStore};
use fedchain_types::{
    ConsAddress, Height, InfractionKind, Power, SlashRecord, Timestamp, VoteAddress,
    CONS_ADDR_LEN, VOTE_ADDR_LEN,
};
use fedchain_wire::{CommonAck, SideSlashPacket};

use crate::context::BlockContext;
use crate::error::{ExecuteResult, SlashingError};
use crate::events::SideSlashEvent;
use crate::fee_pool::FeePool;
use crate::keeper::SlashingKeeper;
use crate::side_chain::SideChainRegistry;
use crate::validator_set::{ValidatorSet, VALIDATOR_UPDATE_DELAY};

/// A structurally valid claim, classified by address length.
enum SideSlashClaim {
    Downtime(ConsAddress),
    MaliciousVote(VoteAddress),
}

impl<V: ValidatorSet, F: FeePool> SlashingKeeper<V, F> {
    // ========================================================================
    // Primary-chain double sign
    // ========================================================================

    /// Handle a validator signing two blocks at the same height.
    ///
    /// `power` is the validator's power at the height of the infraction as
    /// received from the consensus layer.
    pub fn handle_double_sign(
        &mut self,
        store: &mut dyn KvStore,
        ctx: &BlockContext,
        addr: &ConsAddress,
        infraction_height: Height,
        evidence_time: Timestamp,
        power: Power,
    ) {
        let params = self.params().clone();
        let pubkey = self.must_get_pubkey(store, addr);

        let age = ctx.block_time.nanos_since(evidence_time);
        let max_age = i64::try_from(params.max_evidence_age.as_nanos()).unwrap_or(i64::MAX);
        if age > max_age {
            eprintln!(
                "[SLASHING] ignored double sign from {} at height {}, age {}ns past max {}ns",
                addr, infraction_height, age, max_age
            );
            return;
        }

        eprintln!(
            "[SLASHING] confirmed double sign from {:02x?} at height {}, age {}ns within max {}ns",
            pubkey, infraction_height, age, max_age
        );

        // The stake distribution which signed the infraction block is one
        // validator-update delay behind the evidence height. This can go
        // negative near genesis; it only filters unbonding and
        // redelegations downstream.
        let distribution_height = infraction_height - VALIDATOR_UPDATE_DELAY;

        // Cap the applied fraction to the worst infraction within the
        // current slashing period; the validator set owns the clamp.
        let fraction = params.slash_bps_double_sign;
        let revised =
            self.validator_set
                .cap_by_slashing_period(addr, fraction, distribution_height);
        eprintln!(
            "[SLASHING] double sign fraction capped by slashing period from {} to {} bps",
            fraction, revised
        );

        self.validator_set
            .slash(addr, distribution_height, power, revised);

        let validator = match self.validator_set.validator_by_cons_addr(addr) {
            Some(validator) => validator,
            None => panic!("validator with consensus address {} not found", addr),
        };
        if !validator.jailed {
            self.validator_set.jail(addr);
        }

        let mut info = match signing_info::get(store, addr) {
            Some(info) => info,
            None => panic!("expected signing info for validator {} but not found", addr),
        };
        info.jailed_until = ctx
            .block_time
            .saturating_add(params.double_sign_unbond_duration);
        signing_info::set(store, addr, &info);
    }

    // ========================================================================
    // Side-chain packet intake
    // ========================================================================

    /// Execute a received cross-chain slash packet and build its ack.
    ///
    /// Decode and validation failures become result codes, not panics; the
    /// block always continues past a bad packet.
    pub fn execute_syn_package(
        &mut self,
        store: &mut dyn KvStore,
        ctx: &BlockContext,
        payload: &[u8],
    ) -> ExecuteResult {
        let result = self.run_syn_package(store, ctx, payload);
        let code = result.as_ref().err().map(SlashingError::code).unwrap_or(0);
        ExecuteResult {
            ack: CommonAck::new(code).encode(),
            code,
            err: result.err(),
        }
    }

    /// The slashing channel never receives acks for its own packets.
    pub fn execute_ack_package(&mut self, _payload: &[u8]) -> ! {
        panic!("received unexpected ack package on the slashing channel");
    }

    /// The slashing channel never receives fail-acks either.
    pub fn execute_fail_ack_package(&mut self, _payload: &[u8]) -> ! {
        panic!("received unexpected fail ack package on the slashing channel");
    }

    fn run_syn_package(
        &mut self,
        store: &mut dyn KvStore,
        ctx: &BlockContext,
        payload: &[u8],
    ) -> Result<(), SlashingError> {
        let packet = SideSlashPacket::decode(payload).map_err(|err| {
            SlashingError::InvalidInput(format!("failed to parse the payload: {}", err))
        })?;
        let claim = check_side_slash_packet(&packet)?;
        match claim {
            SideSlashClaim::Downtime(addr) => self.slash_side_downtime(store, ctx, &packet, addr),
            SideSlashClaim::MaliciousVote(vote_addr) => {
                self.slash_side_malicious_vote(store, ctx, &packet, vote_addr)
            }
        }
    }

    // ========================================================================
    // Side-chain downtime
    // ========================================================================

    fn slash_side_downtime(
        &mut self,
        store: &mut dyn KvStore,
        ctx: &BlockContext,
        packet: &SideSlashPacket,
        side_cons_addr: ConsAddress,
    ) -> Result<(), SlashingError> {
        let params = self.params().clone();
        let chain_name = self
            .side_chains
            .dest_chain_name(packet.side_chain_id)
            .ok_or(SlashingError::InvalidSideChainId)?
            .to_string();
        let mut side_store =
            PrefixedKvStore::new(store, SideChainRegistry::store_namespace(&chain_name));

        // Side-chain evidence ages in whole seconds; a timestamp from the
        // future wraps to a huge age and is rejected as expired.
        let age = (ctx.block_time.unix_secs() as u64).wrapping_sub(packet.side_timestamp);
        if age > params.max_evidence_age.as_secs() {
            return Err(SlashingError::ExpiredEvidence);
        }

        if slash_records::has(
            &side_store,
            &side_cons_addr,
            InfractionKind::Downtime,
            packet.side_height,
        ) {
            return Err(SlashingError::DuplicateDowntimeClaim);
        }

        let (validator, slashed_amt) = self
            .validator_set
            .slash_side_chain(&chain_name, &side_cons_addr, params.downtime_slash_amount)
            .map_err(|err| SlashingError::FailedToSlash(err.to_string()))?;

        // Flat claim fee first, the rest is compensation.
        let fee = params.downtime_slash_fee.min(slashed_amt);
        let bond_denom = self.validator_set.bond_denom();
        let mut to_fee_pool = 0;
        if fee > 0 && ctx.phase.is_deliver() {
            self.fee_pool
                .add_and_commit_fee("side_downtime_slash", &bond_denom, fee);
            to_fee_pool = fee;
        }

        let remaining = slashed_amt - fee;
        let mut compensation = BTreeMap::new();
        if remaining > 0 {
            let (found, allocated) = self
                .validator_set
                .allocate_slash_amt_to_validators(&side_cons_addr, remaining)
                .map_err(|err| SlashingError::FailedToSlash(err.to_string()))?;
            compensation = allocated;
            if !found && ctx.phase.is_deliver() {
                self.fee_pool.add_and_commit_fee(
                    "side_downtime_slash_remaining",
                    &bond_denom,
                    remaining,
                );
                to_fee_pool += remaining;
            }
        }

        let jail_until = ctx
            .block_time
            .saturating_add(params.downtime_unbond_duration);
        let record = SlashRecord {
            cons_addr: side_cons_addr,
            infraction_type: InfractionKind::Downtime,
            infraction_height: packet.side_height,
            slash_height: ctx.height,
            jail_until,
            slash_amt: slashed_amt,
            side_chain_id: chain_name.clone(),
        };
        slash_records::put(&mut side_store, &record);

        let mut info = signing_info::get(&side_store, &side_cons_addr).ok_or_else(|| {
            SlashingError::Internal(format!(
                "expected signing info for validator {} but not found",
                side_cons_addr
            ))
        })?;
        // Downtime overwrites the jail term rather than extending it.
        info.jailed_until = jail_until;
        signing_info::set(&mut side_store, &side_cons_addr, &info);

        self.publisher.publish(SideSlashEvent {
            validator: validator.operator,
            infraction_type: InfractionKind::Downtime,
            infraction_height: packet.side_height as i64,
            slash_height: ctx.height,
            jail_until,
            slash_amt: slashed_amt,
            to_fee_pool,
            side_chain_id: chain_name,
            validators_compensation: compensation,
        });

        Ok(())
    }

    // ========================================================================
    // Side-chain malicious vote
    // ========================================================================

    fn slash_side_malicious_vote(
        &mut self,
        store: &mut dyn KvStore,
        ctx: &BlockContext,
        packet: &SideSlashPacket,
        side_vote_addr: VoteAddress,
    ) -> Result<(), SlashingError> {
        let params = self.params().clone();
        let chain_name = self
            .side_chains
            .dest_chain_name(packet.side_chain_id)
            .ok_or(SlashingError::InvalidSideChainId)?
            .to_string();
        let mut side_store =
            PrefixedKvStore::new(store, SideChainRegistry::store_namespace(&chain_name));

        let age = (ctx.block_time.unix_secs() as u64).wrapping_sub(packet.side_timestamp);
        let max_age = params.max_evidence_age.as_secs();
        if age > max_age {
            return Err(SlashingError::ExpiredEvidence);
        }

        let validator = self
            .validator_set
            .validator_by_vote_addr(&side_vote_addr)
            .ok_or(SlashingError::NoValidatorWithVoteAddr)?;
        let side_cons_addr = validator.cons_addr;

        let mut info = signing_info::get(&side_store, &side_cons_addr).ok_or_else(|| {
            SlashingError::Internal(format!(
                "expected signing info for validator {} but not found",
                side_cons_addr
            ))
        })?;

        // While a malicious-vote jail term is running the validator can be
        // slashed at most once, so a burst of claims cannot drain it.
        let jailed_until_secs = info.jailed_until.unix_secs().max(0) as u64;
        if slash_records::is_slashed(&side_store, &side_cons_addr, InfractionKind::MaliciousVote)
            && packet.side_timestamp < jailed_until_secs
        {
            eprintln!(
                "[SLASHING] slashing blocked, {} still in duration of latest malicious vote slash",
                side_cons_addr
            );
            return Err(SlashingError::FailedToSlash(
                "still in duration of latest malicious vote slash".to_string(),
            ));
        } else if slash_records::has(
            &side_store,
            &side_cons_addr,
            InfractionKind::MaliciousVote,
            packet.side_height,
        ) {
            eprintln!("[SLASHING] slashing blocked for duplicate malicious vote claim");
            return Err(SlashingError::DuplicateMaliciousVoteClaim);
        }

        eprintln!(
            "[SLASHING] confirmed malicious vote from {} at side height {}, age {}s within max {}s",
            side_cons_addr, packet.side_height, age, max_age
        );

        let (validator, slashed_amt) = self
            .validator_set
            .slash_side_chain(&chain_name, &side_cons_addr, params.double_sign_slash_amount)
            .map_err(|err| SlashingError::FailedToSlash(err.to_string()))?;

        // The whole slashed amount goes to compensation; there is no claim
        // fee on this path.
        let bond_denom = self.validator_set.bond_denom();
        let mut to_fee_pool = 0;
        let mut compensation = BTreeMap::new();
        if slashed_amt > 0 {
            let (found, allocated) = self
                .validator_set
                .allocate_slash_amt_to_validators(&side_cons_addr, slashed_amt)
                .map_err(|err| SlashingError::FailedToSlash(err.to_string()))?;
            compensation = allocated;
            if !found && ctx.phase.is_deliver() {
                self.fee_pool.add_and_commit_fee(
                    "side_malicious_vote_slash",
                    &bond_denom,
                    slashed_amt,
                );
                to_fee_pool = slashed_amt;
            }
        }

        let jail_until = ctx
            .block_time
            .saturating_add(params.double_sign_unbond_duration);
        let record = SlashRecord {
            cons_addr: side_cons_addr,
            infraction_type: InfractionKind::MaliciousVote,
            infraction_height: packet.side_height,
            slash_height: ctx.height,
            jail_until,
            slash_amt: slashed_amt,
            side_chain_id: chain_name.clone(),
        };
        slash_records::put(&mut side_store, &record);

        // Unlike downtime, the malicious-vote jail term only ever grows.
        if jail_until > info.jailed_until {
            info.jailed_until = jail_until;
        }
        signing_info::set(&mut side_store, &side_cons_addr, &info);

        self.publisher.publish(SideSlashEvent {
            validator: validator.operator,
            infraction_type: InfractionKind::MaliciousVote,
            infraction_height: packet.side_height as i64,
            slash_height: ctx.height,
            jail_until,
            slash_amt: slashed_amt,
            to_fee_pool,
            side_chain_id: chain_name,
            validators_compensation: compensation,
        });

        Ok(())
    }
}

/// Structural packet checks: address subkind by length, height domain and
/// timestamp domain.
fn check_side_slash_packet(packet: &SideSlashPacket) -> Result<SideSlashClaim, SlashingError> {
    let claim = if packet.side_addr.len() == CONS_ADDR_LEN {
        SideSlashClaim::Downtime(
            ConsAddress::from_slice(&packet.side_addr)
                .ok_or_else(|| SlashingError::InvalidClaim("bad side address".to_string()))?,
        )
    } else if packet.side_addr.len() == VOTE_ADDR_LEN {
        SideSlashClaim::MaliciousVote(
            VoteAddress::from_slice(&packet.side_addr)
                .ok_or_else(|| SlashingError::InvalidClaim("bad side address".to_string()))?,
        )
    } else {
        return Err(SlashingError::InvalidClaim(format!(
            "wrong side address length: {}, expected {} or {}",
            packet.side_addr.len(),
            CONS_ADDR_LEN,
            VOTE_ADDR_LEN
        )));
    };

    if packet.side_height == 0 {
        return Err(SlashingError::InvalidClaim(
            "side height must be positive".to_string(),
        ));
    }
    if packet.side_height > i64::MAX as u64 {
        return Err(SlashingError::InvalidClaim(
            "side height overflow".to_string(),
        ));
    }
    if packet.side_timestamp == 0 {
        return Err(SlashingError::InvalidClaim(
            "invalid side timestamp".to_string(),
        ));
    }
    Ok(claim)
}
