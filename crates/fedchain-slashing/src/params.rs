//! Typed parameter store with governance update gating.
//!
//! Parameters are read-only during block execution. Governance hands
//! proposed updates to [`ParamStore::handle_param_change`], which
//! double-checks the domain constraints and consults observers registered
//! at composition time; an update that fails either gate is dropped with a
//! log line and the previous value stays in force.

use fedchain_types::SlashParams;

/// Observer verdict on a proposed parameter update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamUpdateDecision {
    Accept,
    Reject(String),
}

/// Callback signature: `(old, new) -> Accept | Reject(reason)`.
pub type ParamObserver = Box<dyn Fn(&SlashParams, &SlashParams) -> ParamUpdateDecision>;

pub struct ParamStore {
    params: SlashParams,
    observers: Vec<ParamObserver>,
}

impl ParamStore {
    /// Build a store around an initial parameter set, which must itself be
    /// valid.
    pub fn new(params: SlashParams) -> Result<Self, fedchain_types::ParamError> {
        params.update_check()?;
        Ok(ParamStore {
            params,
            observers: Vec::new(),
        })
    }

    pub fn get(&self) -> &SlashParams {
        &self.params
    }

    /// Install a parameter set directly (genesis path). Observers are not
    /// consulted; the domain constraints still apply.
    pub fn set(&mut self, params: SlashParams) -> Result<(), fedchain_types::ParamError> {
        params.update_check()?;
        self.params = params;
        Ok(())
    }

    /// Register an update observer. Observers run after the built-in
    /// `update_check` and may veto with a reason.
    pub fn subscribe_param_change(&mut self, observer: ParamObserver) {
        self.observers.push(observer);
    }

    /// Apply a proposed governance update. Returns whether it was accepted.
    pub fn handle_param_change(&mut self, proposed: SlashParams) -> bool {
        if let Err(err) = proposed.update_check() {
            eprintln!("[SLASHING] skip invalid param change: {}", err);
            return false;
        }
        for observer in &self.observers {
            if let ParamUpdateDecision::Reject(reason) = observer(&self.params, &proposed) {
                eprintln!("[SLASHING] param change rejected by observer: {}", reason);
                return false;
            }
        }
        self.params = proposed;
        true
    }
}

impl std::fmt::Debug for ParamStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParamStore")
            .field("params", &self.params)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_invalid_initial_params_rejected() {
        let bad = SlashParams {
            signed_blocks_window: 0,
            ..SlashParams::default()
        };
        assert!(ParamStore::new(bad).is_err());
    }

    #[test]
    fn test_invalid_update_keeps_previous_value() {
        let mut store = ParamStore::new(SlashParams::default()).unwrap();
        let before = store.get().clone();

        let accepted = store.handle_param_change(SlashParams {
            min_signed_per_window: 20_000,
            ..SlashParams::default()
        });
        assert!(!accepted);
        assert_eq!(store.get(), &before);
    }

    #[test]
    fn test_valid_update_applies() {
        let mut store = ParamStore::new(SlashParams::default()).unwrap();
        let accepted = store.handle_param_change(SlashParams {
            max_evidence_age: Duration::from_secs(3_600),
            ..SlashParams::default()
        });
        assert!(accepted);
        assert_eq!(store.get().max_evidence_age, Duration::from_secs(3_600));
    }

    #[test]
    fn test_observer_can_veto() {
        let mut store = ParamStore::new(SlashParams::default()).unwrap();
        store.subscribe_param_change(Box::new(|old, new| {
            if new.signed_blocks_window < old.signed_blocks_window {
                ParamUpdateDecision::Reject("window may not shrink".to_string())
            } else {
                ParamUpdateDecision::Accept
            }
        }));

        let before = store.get().clone();
        let accepted = store.handle_param_change(SlashParams {
            signed_blocks_window: 100,
            min_signed_per_window: 50,
            ..SlashParams::default()
        });
        assert!(!accepted);
        assert_eq!(store.get(), &before);

        let accepted = store.handle_param_change(SlashParams {
            signed_blocks_window: 20_000,
            ..SlashParams::default()
        });
        assert!(accepted);
        assert_eq!(store.get().signed_blocks_window, 20_000);
    }
}
