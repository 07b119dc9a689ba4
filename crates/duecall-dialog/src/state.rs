//! Call state and per-call session.
//!
//! The dialogue position is a tagged state value rather than a bare step
//! integer, so each state carries only the data relevant to it and every
//! transition is enumerable. `step()` exposes stable numeric ids for
//! logging and for the monotonicity property.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use duecall_core::Customer;

/// Position in the fixed call topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    /// Identify the customer by name.
    Identify,
    /// Confirm the customer has time to talk.
    ConfirmAvailability,
    /// Present the policy summary.
    PresentPolicy,
    /// Elicit the delay reason; `awaiting_reason` marks the sub-mode where
    /// the next utterance is consumed verbatim as the reason.
    ElicitReason { awaiting_reason: bool },
    /// Check whether the customer knows the policy benefits.
    BenefitsCheck,
    /// Offer a payment solution.
    OfferSolution,
    /// Ask for the payment mode.
    PaymentMode,
    /// Thank the customer for confirming the mode.
    ThankForMode,
    /// Acknowledge a completed payment if mentioned.
    AcknowledgePayment,
    /// Wrap up the call.
    WrapUp,
    /// Terminal: the call has ended.
    Closed,
}

impl CallState {
    /// Numeric step id; 99 is the terminal sentinel.
    pub fn step(&self) -> u8 {
        match self {
            CallState::Identify => 0,
            CallState::ConfirmAvailability => 1,
            CallState::PresentPolicy => 2,
            CallState::ElicitReason { .. } => 3,
            CallState::BenefitsCheck => 4,
            CallState::OfferSolution => 5,
            CallState::PaymentMode => 6,
            CallState::ThankForMode => 7,
            CallState::AcknowledgePayment => 8,
            CallState::WrapUp => 9,
            CallState::Closed => 99,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, CallState::Closed)
    }
}

/// Resumption prompt appended after a knowledge answer, selected by the
/// current state.
///
/// An explicit lookup rather than inline conditionals: adding a state never
/// requires touching the interrupt handler.
pub fn resumption_prompt(state: &CallState) -> Option<&'static str> {
    match state {
        CallState::ElicitReason {
            awaiting_reason: true,
        } => Some("Now, could you share your reason for the delay in payment?"),
        CallState::ElicitReason {
            awaiting_reason: false,
        } => Some("Let's continue. Could you tell me your reason for the delay in payment?"),
        CallState::BenefitsCheck => Some("Moving on, do you know the benefits of your policy?"),
        CallState::PaymentMode => {
            Some("Now, could you tell me if you'll pay online, cash, or cheque?")
        }
        _ => None,
    }
}

/// Mutable per-call session state.
///
/// One session per call; never shared across concurrent calls. Mutated
/// exclusively by the dialogue engine's transition dispatch.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub state: CallState,
    /// Bound once at identification; never re-bound afterwards.
    pub customer: Option<Customer>,
    pub payment_reason: Option<String>,
}

impl Session {
    /// Start a fresh session at the identification step.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            state: CallState::Identify,
            customer: None,
            payment_reason: None,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_starts_at_identify() {
        let session = Session::new();
        assert_eq!(session.state, CallState::Identify);
        assert!(session.customer.is_none());
        assert!(session.payment_reason.is_none());
        assert_ne!(session.id, Uuid::nil());
    }

    #[test]
    fn test_step_ids() {
        assert_eq!(CallState::Identify.step(), 0);
        assert_eq!(
            CallState::ElicitReason {
                awaiting_reason: true
            }
            .step(),
            3
        );
        assert_eq!(CallState::PaymentMode.step(), 6);
        assert_eq!(CallState::WrapUp.step(), 9);
        assert_eq!(CallState::Closed.step(), 99);
    }

    #[test]
    fn test_resumption_prompts_by_state() {
        let awaiting = CallState::ElicitReason {
            awaiting_reason: true,
        };
        let not_awaiting = CallState::ElicitReason {
            awaiting_reason: false,
        };
        assert!(resumption_prompt(&awaiting).unwrap().starts_with("Now,"));
        assert!(resumption_prompt(&not_awaiting)
            .unwrap()
            .starts_with("Let's continue."));
        assert!(resumption_prompt(&CallState::BenefitsCheck)
            .unwrap()
            .contains("benefits"));
        assert!(resumption_prompt(&CallState::PaymentMode)
            .unwrap()
            .contains("online, cash, or cheque"));
    }

    #[test]
    fn test_no_resumption_prompt_elsewhere() {
        assert!(resumption_prompt(&CallState::Identify).is_none());
        assert!(resumption_prompt(&CallState::ConfirmAvailability).is_none());
        assert!(resumption_prompt(&CallState::OfferSolution).is_none());
        assert!(resumption_prompt(&CallState::WrapUp).is_none());
        assert!(resumption_prompt(&CallState::Closed).is_none());
    }

    #[test]
    fn test_is_closed() {
        assert!(CallState::Closed.is_closed());
        assert!(!CallState::WrapUp.is_closed());
    }
}
