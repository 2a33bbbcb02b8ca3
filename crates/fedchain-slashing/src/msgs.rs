//! Decoded transaction messages and their routing.
//!
//! The transaction decoder hands the module already-validated messages;
//! routing is a tagged enum with an exhaustive match, so adding a message
//! kind without a handler is a compile error.

use fedchain_store::KvStore;
use fedchain_types::SideChainId;

use crate::context::BlockContext;
use crate::fee_pool::FeePool;
use crate::keeper::SlashingKeeper;
use crate::validator_set::ValidatorSet;

/// Primary-chain unjail request, signed by the validator operator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgUnjail {
    pub validator_addr: String,
}

/// Side-chain unjail request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgSideChainUnjail {
    pub validator_addr: String,
    pub side_chain_id: SideChainId,
}

/// Off-chain evidence submission; the payload is an encoded side slash
/// packet and runs through the same intake as transport-delivered packets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgBscSubmitEvidence {
    pub submitter: String,
    pub payload: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SlashingMsg {
    Unjail(MsgUnjail),
    SideChainUnjail(MsgSideChainUnjail),
    BscSubmitEvidence(MsgBscSubmitEvidence),
}

impl SlashingMsg {
    /// Stable message-kind string, usable as a routing key.
    pub fn kind(&self) -> &'static str {
        match self {
            SlashingMsg::Unjail(_) => "slashing/unjail",
            SlashingMsg::SideChainUnjail(_) => "slashing/side_chain_unjail",
            SlashingMsg::BscSubmitEvidence(_) => "slashing/bsc_submit_evidence",
        }
    }
}

/// Result of a routed transaction message.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TxResult {
    /// 0 on success, otherwise the handler's error code.
    pub code: u32,
    /// Tags are emitted only on success.
    pub tags: Vec<(String, String)>,
}

impl TxResult {
    pub fn ok() -> Self {
        TxResult::default()
    }

    pub fn ok_with_tags(tags: Vec<(String, String)>) -> Self {
        TxResult { code: 0, tags }
    }

    pub fn error(code: u32) -> Self {
        TxResult {
            code,
            tags: Vec::new(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code == 0
    }
}

impl<V: ValidatorSet, F: FeePool> SlashingKeeper<V, F> {
    /// Route one decoded message to its handler.
    pub fn route_msg(
        &mut self,
        store: &mut dyn KvStore,
        ctx: &BlockContext,
        msg: SlashingMsg,
    ) -> TxResult {
        match msg {
            SlashingMsg::Unjail(msg) => match self.unjail(store, ctx, &msg.validator_addr) {
                Ok(()) => unjail_tags(&msg.validator_addr),
                Err(err) => {
                    eprintln!("[SLASHING] unjail failed: {}", err);
                    TxResult::error(err.code())
                }
            },
            SlashingMsg::SideChainUnjail(msg) => {
                match self.unjail_side_chain(store, ctx, &msg.validator_addr, msg.side_chain_id) {
                    Ok(()) => unjail_tags(&msg.validator_addr),
                    Err(err) => {
                        eprintln!("[SLASHING] side chain unjail failed: {}", err);
                        TxResult::error(err.code())
                    }
                }
            }
            SlashingMsg::BscSubmitEvidence(msg) => {
                let result = self.execute_syn_package(store, ctx, &msg.payload);
                if let Some(err) = &result.err {
                    eprintln!("[SLASHING] submitted evidence rejected: {}", err);
                }
                TxResult {
                    code: result.code,
                    tags: Vec::new(),
                }
            }
        }
    }
}

fn unjail_tags(validator_addr: &str) -> TxResult {
    TxResult::ok_with_tags(vec![
        ("action".to_string(), "unjail".to_string()),
        ("validator".to_string(), validator_addr.to_string()),
    ])
}
