//! Error taxonomy of the slashing module.
//!
//! Packet-path errors carry a stable `u32` result code returned in the
//! cross-chain ack; code 0 is success. Tx-path (unjail) errors use their own
//! code space surfaced as the transaction result. Contract violations are
//! not errors: the keeper panics and the host discards the block.

use std::fmt;

/// Error raised while processing evidence or a cross-chain slash packet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SlashingError {
    /// Packet could not be decoded.
    InvalidInput(String),
    /// Decoded packet fails structural checks.
    InvalidClaim(String),
    /// Chain selector unknown.
    InvalidSideChainId,
    /// Evidence older than the maximum evidence age.
    ExpiredEvidence,
    /// A downtime slash record already exists for this claim.
    DuplicateDowntimeClaim,
    /// A malicious-vote slash record already exists for this claim.
    DuplicateMaliciousVoteClaim,
    /// Malicious-vote packet targets an unregistered vote address.
    NoValidatorWithVoteAddr,
    /// The validator set refused or aborted the slash.
    FailedToSlash(String),
    /// State the packet path relies on is missing (signing info for a
    /// side-chain validator).
    Internal(String),
}

impl SlashingError {
    /// Stable result code carried in the ack packet.
    pub fn code(&self) -> u32 {
        match self {
            SlashingError::InvalidInput(_) => 1,
            SlashingError::InvalidClaim(_) => 2,
            SlashingError::InvalidSideChainId => 3,
            SlashingError::ExpiredEvidence => 4,
            SlashingError::DuplicateDowntimeClaim => 5,
            SlashingError::DuplicateMaliciousVoteClaim => 6,
            SlashingError::NoValidatorWithVoteAddr => 7,
            SlashingError::FailedToSlash(_) => 8,
            SlashingError::Internal(_) => 9,
        }
    }
}

impl fmt::Display for SlashingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlashingError::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
            SlashingError::InvalidClaim(msg) => write!(f, "invalid claim: {}", msg),
            SlashingError::InvalidSideChainId => write!(f, "invalid side chain id"),
            SlashingError::ExpiredEvidence => write!(f, "evidence is expired"),
            SlashingError::DuplicateDowntimeClaim => write!(f, "duplicate downtime claim"),
            SlashingError::DuplicateMaliciousVoteClaim => {
                write!(f, "duplicate malicious vote claim")
            }
            SlashingError::NoValidatorWithVoteAddr => {
                write!(f, "no validator with such vote address")
            }
            SlashingError::FailedToSlash(msg) => write!(f, "failed to slash: {}", msg),
            SlashingError::Internal(msg) => write!(f, "internal: {}", msg),
        }
    }
}

impl std::error::Error for SlashingError {}

/// Outcome of executing a cross-chain packet: the encoded ack plus the
/// result code it carries (0 on success).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecuteResult {
    pub ack: Vec<u8>,
    pub code: u32,
    pub err: Option<SlashingError>,
}

/// Error raised by the unjail transaction path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnjailError {
    NoValidatorForAddress,
    SelfDelegationTooLow,
    ValidatorNotJailed,
    /// The jail term has not elapsed yet.
    StillJailed,
    InvalidSideChainId,
}

impl UnjailError {
    /// Result code surfaced as the transaction result.
    pub fn code(&self) -> u32 {
        match self {
            UnjailError::NoValidatorForAddress => 101,
            UnjailError::SelfDelegationTooLow => 102,
            UnjailError::ValidatorNotJailed => 103,
            UnjailError::StillJailed => 104,
            UnjailError::InvalidSideChainId => 105,
        }
    }
}

impl fmt::Display for UnjailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnjailError::NoValidatorForAddress => {
                write!(f, "no validator found for the given operator address")
            }
            UnjailError::SelfDelegationTooLow => {
                write!(f, "self delegation too low to unjail")
            }
            UnjailError::ValidatorNotJailed => write!(f, "validator is not jailed"),
            UnjailError::StillJailed => write!(f, "validator still in jail duration"),
            UnjailError::InvalidSideChainId => write!(f, "invalid side chain id"),
        }
    }
}

impl std::error::Error for UnjailError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable_and_distinct() {
        let errors = [
            SlashingError::InvalidInput(String::new()),
            SlashingError::InvalidClaim(String::new()),
            SlashingError::InvalidSideChainId,
            SlashingError::ExpiredEvidence,
            SlashingError::DuplicateDowntimeClaim,
            SlashingError::DuplicateMaliciousVoteClaim,
            SlashingError::NoValidatorWithVoteAddr,
            SlashingError::FailedToSlash(String::new()),
            SlashingError::Internal(String::new()),
        ];
        let codes: Vec<u32> = errors.iter().map(|e| e.code()).collect();
        assert_eq!(codes, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }
}
