use serde::{Deserialize, Serialize};
use strum::Display;
use thiserror::Error;

#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VerificationState {
    #[default]
    Unverified,
    Verified,
}

#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VerificationEvent {
    /// Asserted externally, after a successful test payout or a compliance review
    MarkVerified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Cannot {event} a bank account that is {from}")]
pub struct StateTransitionError {
    pub from: VerificationState,
    pub event: VerificationEvent,
}

impl VerificationState {
    /// The one-way `unverified -> verified` transition. There is no way back.
    pub fn transition(self, event: VerificationEvent) -> Result<Self, StateTransitionError> {
        match (self, event) {
            (VerificationState::Unverified, VerificationEvent::MarkVerified) => {
                Ok(VerificationState::Verified)
            }
            (from @ VerificationState::Verified, event) => {
                Err(StateTransitionError { from, event })
            }
        }
    }
}
