//! Genesis state for the slashing module.
//!
//! The genesis document is JSON/TOML compatible and validated at parse
//! time: parameters run the same `update_check` as governance updates, and
//! consensus addresses must be well-formed hex.
//!
//! # Schema
//!
//! ```json
//! {
//!   "params": {
//!     "max_evidence_age_secs": 86400,
//!     "signed_blocks_window": 10000,
//!     "min_signed_per_window": 5000,
//!     "downtime_unbond_duration_secs": 172800,
//!     "double_sign_unbond_duration_secs": 432000,
//!     "slash_bps_downtime": 50,
//!     "slash_bps_double_sign": 500,
//!     "downtime_slash_amount": 50,
//!     "double_sign_slash_amount": 10000,
//!     "downtime_slash_fee": 10
//!   },
//!   "signing_infos": [
//!     { "cons_addr": "0101…01", "start_height": 0 }
//!   ]
//! }
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use fedchain_store::{signing_info, KvStore};
use fedchain_types::{ConsAddress, ParamError, SlashParams, ValidatorSigningInfo, CONS_ADDR_LEN};

use crate::fee_pool::FeePool;
use crate::keeper::SlashingKeeper;
use crate::validator_set::ValidatorSet;

/// Serialized form of [`SlashParams`], durations in whole seconds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisParams {
    pub max_evidence_age_secs: u64,
    pub signed_blocks_window: i64,
    pub min_signed_per_window: i64,
    pub downtime_unbond_duration_secs: u64,
    pub double_sign_unbond_duration_secs: u64,
    pub slash_bps_downtime: u16,
    pub slash_bps_double_sign: u16,
    pub downtime_slash_amount: u64,
    pub double_sign_slash_amount: u64,
    pub downtime_slash_fee: u64,
}

impl GenesisParams {
    pub fn to_params(&self) -> SlashParams {
        SlashParams {
            max_evidence_age: Duration::from_secs(self.max_evidence_age_secs),
            signed_blocks_window: self.signed_blocks_window,
            min_signed_per_window: self.min_signed_per_window,
            downtime_unbond_duration: Duration::from_secs(self.downtime_unbond_duration_secs),
            double_sign_unbond_duration: Duration::from_secs(
                self.double_sign_unbond_duration_secs,
            ),
            slash_bps_downtime: self.slash_bps_downtime,
            slash_bps_double_sign: self.slash_bps_double_sign,
            downtime_slash_amount: self.downtime_slash_amount,
            double_sign_slash_amount: self.double_sign_slash_amount,
            downtime_slash_fee: self.downtime_slash_fee,
        }
    }

    pub fn from_params(params: &SlashParams) -> Self {
        GenesisParams {
            max_evidence_age_secs: params.max_evidence_age.as_secs(),
            signed_blocks_window: params.signed_blocks_window,
            min_signed_per_window: params.min_signed_per_window,
            downtime_unbond_duration_secs: params.downtime_unbond_duration.as_secs(),
            double_sign_unbond_duration_secs: params.double_sign_unbond_duration.as_secs(),
            slash_bps_downtime: params.slash_bps_downtime,
            slash_bps_double_sign: params.slash_bps_double_sign,
            downtime_slash_amount: params.downtime_slash_amount,
            double_sign_slash_amount: params.double_sign_slash_amount,
            downtime_slash_fee: params.downtime_slash_fee,
        }
    }
}

/// Signing info seeded at genesis for an initial validator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisSigningInfo {
    /// Hex-encoded consensus address (40 characters).
    pub cons_addr: String,
    #[serde(default)]
    pub start_height: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    pub params: GenesisParams,
    #[serde(default)]
    pub signing_infos: Vec<GenesisSigningInfo>,
}

impl GenesisState {
    pub fn from_json(raw: &str) -> Result<Self, GenesisError> {
        serde_json::from_str(raw).map_err(|err| GenesisError::Json(err.to_string()))
    }

    pub fn to_json(&self) -> Result<String, GenesisError> {
        serde_json::to_string_pretty(self).map_err(|err| GenesisError::Json(err.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenesisError {
    Json(String),
    InvalidParams(ParamError),
    BadConsAddress(String),
}

impl fmt::Display for GenesisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenesisError::Json(msg) => write!(f, "genesis is not valid json: {}", msg),
            GenesisError::InvalidParams(err) => write!(f, "genesis params invalid: {}", err),
            GenesisError::BadConsAddress(raw) => {
                write!(f, "genesis consensus address invalid: {:?}", raw)
            }
        }
    }
}

impl std::error::Error for GenesisError {}

impl From<ParamError> for GenesisError {
    fn from(err: ParamError) -> Self {
        GenesisError::InvalidParams(err)
    }
}

fn parse_cons_addr(raw: &str) -> Result<ConsAddress, GenesisError> {
    let raw = raw.strip_prefix("0x").unwrap_or(raw);
    if raw.len() != CONS_ADDR_LEN * 2 {
        return Err(GenesisError::BadConsAddress(raw.to_string()));
    }
    let mut bytes = [0u8; CONS_ADDR_LEN];
    for (i, chunk) in raw.as_bytes().chunks(2).enumerate() {
        let hi = (chunk[0] as char)
            .to_digit(16)
            .ok_or_else(|| GenesisError::BadConsAddress(raw.to_string()))?;
        let lo = (chunk[1] as char)
            .to_digit(16)
            .ok_or_else(|| GenesisError::BadConsAddress(raw.to_string()))?;
        bytes[i] = ((hi << 4) | lo) as u8;
    }
    Ok(ConsAddress::new(bytes))
}

impl<V: ValidatorSet, F: FeePool> SlashingKeeper<V, F> {
    /// Apply a genesis document: install the parameters and seed signing
    /// info for the initial validator set.
    pub fn init_genesis(
        &mut self,
        store: &mut dyn KvStore,
        genesis: &GenesisState,
    ) -> Result<(), GenesisError> {
        let params = genesis.params.to_params();
        self.param_store_mut().set(params)?;

        for seed in &genesis.signing_infos {
            let addr = parse_cons_addr(&seed.cons_addr)?;
            signing_info::set(store, &addr, &ValidatorSigningInfo::new(seed.start_height));
        }
        Ok(())
    }
}
