//! Best-effort event publishing.
//!
//! Events are values handed to subscriber channels with `try_send`; a full
//! or disconnected subscriber is skipped, never waited on, so publishing
//! can never stall block execution. Having no subscriber at all is legal.

use std::collections::BTreeMap;

use crossbeam_channel::{bounded, Receiver, Sender};
use fedchain_types::{Height, InfractionKind, StakeAmount, Timestamp};

/// Subscriber channel depth; slow consumers drop events past this.
const SUBSCRIBER_CAPACITY: usize = 1_024;

/// Published after every successful side-chain slash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SideSlashEvent {
    /// Operator address of the slashed validator.
    pub validator: String,
    pub infraction_type: InfractionKind,
    pub infraction_height: i64,
    pub slash_height: Height,
    pub jail_until: Timestamp,
    pub slash_amt: StakeAmount,
    /// Portion of the slash committed to the community fee pool.
    pub to_fee_pool: StakeAmount,
    pub side_chain_id: String,
    /// Per-operator compensation paid out of the slashed amount.
    pub validators_compensation: BTreeMap<String, StakeAmount>,
}

#[derive(Default)]
pub struct EventPublisher {
    subscribers: Vec<Sender<SideSlashEvent>>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a subscription; the returned receiver sees every event
    /// published after this call, up to the channel capacity.
    pub fn subscribe(&mut self) -> Receiver<SideSlashEvent> {
        let (tx, rx) = bounded(SUBSCRIBER_CAPACITY);
        self.subscribers.push(tx);
        rx
    }

    /// Hand the event to every live subscriber without blocking.
    pub fn publish(&self, event: SideSlashEvent) {
        for subscriber in &self.subscribers {
            let _ = subscriber.try_send(event.clone());
        }
    }

    pub fn has_subscribers(&self) -> bool {
        !self.subscribers.is_empty()
    }
}

impl std::fmt::Debug for EventPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventPublisher")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
