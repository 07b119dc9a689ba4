//! Dialogue engine: interrupt-first dispatch over the call state machine.
//!
//! Every incoming utterance is first checked for a knowledge question; if it
//! is one, the answer collaborator replies and a state-appropriate
//! resumption prompt is appended without touching the session. Otherwise the
//! utterance is classified and the tagged-state dispatch both mutates the
//! session and produces the reply.

use tracing::debug;

use duecall_core::script::{fill, line};
use duecall_core::{CallScript, CustomerStore};

use crate::answer::{AnswerService, DynAnswerService};
use crate::error::DialogError;
use crate::intent::{normalize, Classifier, Intent};
use crate::state::{resumption_prompt, CallState, Session};

/// Product name rendered into the policy summary.
const PRODUCT_NAME: &str = "Term Life";

/// Greeting fallback when no customer name matched yet.
const GENERIC_ADDRESS: &str = "sir/madam";

const RELATIONSHIP_PROBE: &str = "May I know your relationship with the policyholder?";
const ASK_PAYMENT_MODE: &str = "Could you tell me if you'll be paying online, cash, or cheque?";
const ASK_REASON: &str = "Could you tell me the reason for the delay in payment?";
const AGREE_TO_PAY: &str = "Great! Will you be paying online, cash, or cheque?";
const REFUSE_PAYMENT_ACK: &str = "Alright, I understand you won't be paying right now.";

/// The dialogue engine.
///
/// Owns the immutable reference data and the pluggable classifier and
/// answer collaborator; per-call mutable state lives in [`Session`], one per
/// call, passed in by the caller.
pub struct DialogEngine {
    script: CallScript,
    customers: CustomerStore,
    classifier: Box<dyn Classifier>,
    answers: Box<dyn DynAnswerService>,
}

impl DialogEngine {
    /// Create an engine over loaded reference data.
    pub fn new(
        script: CallScript,
        customers: CustomerStore,
        classifier: impl Classifier + 'static,
        answers: impl AnswerService + 'static,
    ) -> Self {
        Self {
            script,
            customers,
            classifier: Box::new(classifier),
            answers: Box::new(answers),
        }
    }

    /// Create an engine from already-boxed collaborators, for callers that
    /// select the backend at runtime.
    pub fn from_boxed(
        script: CallScript,
        customers: CustomerStore,
        classifier: Box<dyn Classifier>,
        answers: Box<dyn DynAnswerService>,
    ) -> Self {
        Self {
            script,
            customers,
            classifier,
            answers,
        }
    }

    /// Handle one utterance: answer a knowledge question without mutating
    /// the session, or advance the state machine and return its reply.
    pub async fn handle(&self, session: &mut Session, msg: &str) -> Result<String, DialogError> {
        let normalized = normalize(msg);

        // Knowledge questions interrupt at every step, including terminal
        // ones, and never mutate the session.
        if self.classifier.is_knowledge_question(&normalized) {
            let answer = self.answers.ask_general_boxed(msg).await?;
            debug!(
                session = %session.id,
                step = session.state.step(),
                "Knowledge interrupt answered"
            );
            return Ok(match resumption_prompt(&session.state) {
                Some(prompt) => format!("{} {}", answer, prompt),
                None => answer,
            });
        }

        let reply = self.advance(session, msg, &normalized)?;
        debug!(
            session = %session.id,
            step = session.state.step(),
            "Utterance dispatched"
        );
        Ok(reply)
    }

    /// Tagged-state transition dispatch. Exhaustive: every (state, intent)
    /// combination lands in a documented arm, none panics.
    fn advance(
        &self,
        session: &mut Session,
        raw: &str,
        normalized: &str,
    ) -> Result<String, DialogError> {
        match session.state {
            CallState::Identify => match self.customers.match_name(normalized) {
                Some(customer) => {
                    let reply = fill(
                        self.script.line(line::GREETING)?,
                        &[("name", &customer.name)],
                    );
                    session.customer = Some(customer.clone());
                    session.state = CallState::ConfirmAvailability;
                    Ok(reply)
                }
                // No match is a retry, not an error: greet generically and
                // hold the step.
                None => Ok(fill(
                    self.script.line(line::GREETING)?,
                    &[("name", GENERIC_ADDRESS)],
                )),
            },

            CallState::ConfirmAvailability => {
                if self.classifier.intent(normalized) == Intent::Agree {
                    session.state = CallState::PresentPolicy;
                    Ok(self.script.line(line::TIME_CONFIRMATION)?.to_string())
                } else {
                    Ok(RELATIONSHIP_PROBE.to_string())
                }
            }

            CallState::PresentPolicy => {
                let reply = match &session.customer {
                    Some(c) => fill(
                        self.script.line(line::POLICY_SUMMARY)?,
                        &[
                            ("name", &c.name),
                            ("policy_number", c.policy_number_or_na()),
                            ("purchase_date", c.purchase_date_or_na()),
                            ("due_date", c.due_date_or_na()),
                            ("premium", c.premium_or_na()),
                            ("product", PRODUCT_NAME),
                        ],
                    ),
                    None => fill(
                        self.script.line(line::POLICY_SUMMARY)?,
                        &[
                            ("name", GENERIC_ADDRESS),
                            ("policy_number", "N/A"),
                            ("purchase_date", "N/A"),
                            ("due_date", "N/A"),
                            ("premium", "N/A"),
                            ("product", PRODUCT_NAME),
                        ],
                    ),
                };
                session.state = CallState::ElicitReason {
                    awaiting_reason: false,
                };
                Ok(reply)
            }

            CallState::ElicitReason { awaiting_reason } => {
                if awaiting_reason {
                    return Ok(self.capture_reason_and_move_on(session, raw));
                }

                let intent = self.classifier.intent(normalized);
                // Free text (including refuse-classified utterances) is the
                // reason itself; only an explicit agree or a premature
                // paid/payment-mode mention is handled differently.
                if !matches!(intent, Intent::Agree | Intent::PaymentMode | Intent::Paid) {
                    return Ok(self.capture_reason_and_move_on(session, raw));
                }
                if intent == Intent::Agree {
                    session.state = CallState::PaymentMode;
                    return Ok(AGREE_TO_PAY.to_string());
                }
                session.state = CallState::ElicitReason {
                    awaiting_reason: true,
                };
                Ok(ASK_REASON.to_string())
            }

            CallState::BenefitsCheck => {
                if session.payment_reason.is_none() && normalized != "yes" && normalized != "no" {
                    let reason = raw.trim().to_string();
                    session.payment_reason = Some(reason.clone());
                    return Ok(format!(
                        "I understand it was due to {}. {}",
                        reason,
                        self.script.line(line::BENEFITS_PROMPT)?
                    ));
                }
                session.state = CallState::OfferSolution;
                Ok(self.script.line(line::BENEFITS_PROMPT)?.to_string())
            }

            CallState::OfferSolution => {
                session.state = CallState::PaymentMode;
                Ok(self.script.line(line::SOLUTION)?.to_string())
            }

            CallState::PaymentMode => match self.classifier.intent(normalized) {
                Intent::Other => {
                    let reason = raw.trim().to_string();
                    session.payment_reason = Some(reason.clone());
                    Ok(format!("I understand it was due to {}. {}", reason, ASK_PAYMENT_MODE))
                }
                Intent::PaymentMode => {
                    session.state = CallState::ThankForMode;
                    Ok(self.script.line(line::MODE_CONFIRMATION)?.to_string())
                }
                Intent::Refuse => {
                    session.state = CallState::WrapUp;
                    Ok(REFUSE_PAYMENT_ACK.to_string())
                }
                Intent::Agree | Intent::Paid => Ok(ASK_PAYMENT_MODE.to_string()),
            },

            CallState::ThankForMode => {
                session.state = CallState::AcknowledgePayment;
                Ok(self.script.line(line::THANKS)?.to_string())
            }

            CallState::AcknowledgePayment => {
                session.state = CallState::WrapUp;
                if self.classifier.intent(normalized) == Intent::Paid {
                    Ok(self.script.line(line::ALREADY_PAID)?.to_string())
                } else {
                    Ok(self.script.line(line::ALTERNATIVE_CLOSE)?.to_string())
                }
            }

            CallState::WrapUp => {
                session.state = CallState::Closed;
                Ok(self.script.closing_line().to_string())
            }

            // Terminal: re-emit the closing line for any further utterance.
            CallState::Closed => Ok(self.script.closing_line().to_string()),
        }
    }

    /// Store the utterance verbatim as the delay reason and move to the
    /// benefits check.
    fn capture_reason_and_move_on(&self, session: &mut Session, raw: &str) -> String {
        let reason = raw.trim().to_string();
        session.payment_reason = Some(reason.clone());
        session.state = CallState::BenefitsCheck;
        format!(
            "I understand it was due to {}. Let's go over the benefits of your policy.",
            reason
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
