//! Governance-tunable slashing parameters.
//!
//! Parameters are read-only during block execution and mutated only through
//! governance updates, which are gated by [`SlashParams::update_check`]: an
//! update that violates a domain constraint is dropped and the previous
//! value stays in force.

use std::fmt;
use std::time::Duration;

/// Full fraction in basis points (100%).
pub const MAX_BPS: u16 = 10_000;

/// Governance-tunable parameters of the slashing module.
///
/// | Parameter                    | Constraint                           |
/// | :--------------------------- | :----------------------------------- |
/// | `max_evidence_age`           | > 0                                  |
/// | `signed_blocks_window`       | > 0                                  |
/// | `min_signed_per_window`      | 0 < M ≤ window                       |
/// | `downtime_unbond_duration`   | > 0                                  |
/// | `double_sign_unbond_duration`| > 0                                  |
/// | `slash_bps_downtime`         | ≤ 10_000                             |
/// | `slash_bps_double_sign`      | ≤ 10_000                             |
/// | `downtime_slash_fee`         | ≤ `downtime_slash_amount`            |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlashParams {
    /// Evidence older than this is silently dropped.
    pub max_evidence_age: Duration,
    /// Size of the liveness window in blocks (W).
    pub signed_blocks_window: i64,
    /// Minimum signed blocks required per window (M).
    pub min_signed_per_window: i64,
    /// Jail term after a downtime infraction.
    pub downtime_unbond_duration: Duration,
    /// Jail term after a double-sign or malicious-vote infraction.
    pub double_sign_unbond_duration: Duration,
    /// Primary-chain downtime slash fraction in basis points.
    pub slash_bps_downtime: u16,
    /// Primary-chain double-sign slash fraction in basis points.
    pub slash_bps_double_sign: u16,
    /// Fixed side-chain downtime slash amount in bond denom.
    pub downtime_slash_amount: u64,
    /// Fixed side-chain malicious-vote slash amount in bond denom.
    pub double_sign_slash_amount: u64,
    /// Flat fee taken from side-chain downtime slashes before compensation
    /// distribution.
    pub downtime_slash_fee: u64,
}

impl Default for SlashParams {
    fn default() -> Self {
        SlashParams {
            max_evidence_age: Duration::from_secs(60 * 60 * 24),
            signed_blocks_window: 10_000,
            min_signed_per_window: 5_000,
            downtime_unbond_duration: Duration::from_secs(60 * 60 * 24 * 2),
            double_sign_unbond_duration: Duration::from_secs(60 * 60 * 24 * 5),
            slash_bps_downtime: 50,
            slash_bps_double_sign: 500,
            downtime_slash_amount: 50,
            double_sign_slash_amount: 10_000,
            downtime_slash_fee: 10,
        }
    }
}

impl SlashParams {
    /// Maximum number of blocks that may be missed inside a window before
    /// the downtime detector fires: `W - M`.
    pub fn max_missed_per_window(&self) -> i64 {
        self.signed_blocks_window - self.min_signed_per_window
    }

    /// Validate the domain constraints of a proposed parameter set.
    ///
    /// Called by the parameter store before accepting a governance update.
    pub fn update_check(&self) -> Result<(), ParamError> {
        if self.max_evidence_age.is_zero() {
            return Err(ParamError::NonPositiveDuration("max_evidence_age"));
        }
        if self.signed_blocks_window <= 0 {
            return Err(ParamError::NonPositiveWindow(self.signed_blocks_window));
        }
        if self.min_signed_per_window <= 0 || self.min_signed_per_window > self.signed_blocks_window
        {
            return Err(ParamError::MinSignedOutOfRange {
                min_signed: self.min_signed_per_window,
                window: self.signed_blocks_window,
            });
        }
        if self.downtime_unbond_duration.is_zero() {
            return Err(ParamError::NonPositiveDuration("downtime_unbond_duration"));
        }
        if self.double_sign_unbond_duration.is_zero() {
            return Err(ParamError::NonPositiveDuration(
                "double_sign_unbond_duration",
            ));
        }
        if self.slash_bps_downtime > MAX_BPS {
            return Err(ParamError::FractionOutOfRange {
                name: "slash_bps_downtime",
                bps: self.slash_bps_downtime,
            });
        }
        if self.slash_bps_double_sign > MAX_BPS {
            return Err(ParamError::FractionOutOfRange {
                name: "slash_bps_double_sign",
                bps: self.slash_bps_double_sign,
            });
        }
        if self.downtime_slash_fee > self.downtime_slash_amount {
            return Err(ParamError::FeeExceedsSlashAmount {
                fee: self.downtime_slash_fee,
                amount: self.downtime_slash_amount,
            });
        }
        Ok(())
    }
}

/// Domain-constraint violation in a proposed parameter set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamError {
    NonPositiveWindow(i64),
    MinSignedOutOfRange { min_signed: i64, window: i64 },
    NonPositiveDuration(&'static str),
    FractionOutOfRange { name: &'static str, bps: u16 },
    FeeExceedsSlashAmount { fee: u64, amount: u64 },
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamError::NonPositiveWindow(w) => {
                write!(f, "signed blocks window must be positive, got {}", w)
            }
            ParamError::MinSignedOutOfRange { min_signed, window } => {
                write!(
                    f,
                    "min signed per window {} outside of 1..={}",
                    min_signed, window
                )
            }
            ParamError::NonPositiveDuration(name) => {
                write!(f, "{} must be positive", name)
            }
            ParamError::FractionOutOfRange { name, bps } => {
                write!(f, "{} is {} bps, above the {} bps maximum", name, bps, MAX_BPS)
            }
            ParamError::FeeExceedsSlashAmount { fee, amount } => {
                write!(
                    f,
                    "downtime slash fee {} exceeds downtime slash amount {}",
                    fee, amount
                )
            }
        }
    }
}

impl std::error::Error for ParamError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_pass_update_check() {
        assert!(SlashParams::default().update_check().is_ok());
    }

    #[test]
    fn test_min_signed_above_window_rejected() {
        let params = SlashParams {
            signed_blocks_window: 100,
            min_signed_per_window: 101,
            ..SlashParams::default()
        };
        assert!(matches!(
            params.update_check(),
            Err(ParamError::MinSignedOutOfRange { .. })
        ));
    }

    #[test]
    fn test_min_signed_equal_to_window_accepted() {
        let params = SlashParams {
            signed_blocks_window: 100,
            min_signed_per_window: 100,
            ..SlashParams::default()
        };
        assert!(params.update_check().is_ok());
        assert_eq!(params.max_missed_per_window(), 0);
    }

    #[test]
    fn test_zero_duration_rejected() {
        let params = SlashParams {
            downtime_unbond_duration: Duration::ZERO,
            ..SlashParams::default()
        };
        assert!(matches!(
            params.update_check(),
            Err(ParamError::NonPositiveDuration("downtime_unbond_duration"))
        ));
    }

    #[test]
    fn test_fraction_above_one_rejected() {
        let params = SlashParams {
            slash_bps_double_sign: MAX_BPS + 1,
            ..SlashParams::default()
        };
        assert!(matches!(
            params.update_check(),
            Err(ParamError::FractionOutOfRange { .. })
        ));
    }

    #[test]
    fn test_fee_above_amount_rejected() {
        let params = SlashParams {
            downtime_slash_amount: 10,
            downtime_slash_fee: 11,
            ..SlashParams::default()
        };
        assert!(matches!(
            params.update_check(),
            Err(ParamError::FeeExceedsSlashAmount { .. })
        ));
    }
}
