//! Sequence Executor (C4) — runs an ordered list of mediators against one
//! Message Context with short-circuit-on-failure. Fault-sequence fallback
//! is NOT handled here: it only applies at a Resource's entry point, so
//! it lives one level up in `execute_resource`.

use crate::context::MediationContext;
use crate::mediators::{call, log, payload, respond, variable};
use metrics::counter;
use sy_common::MessageContext;
use sy_model::{MediatorKind, Sequence};
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    Success,
    Failure(String),
    /// Cancellation was observed between mediators. Distinct from
    /// `Failure` so a caller never routes it into a fault sequence.
    Cancelled,
}

impl ExecutionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionOutcome::Success)
    }
}

pub async fn execute_sequence(
    sequence: &Sequence,
    msg: &mut MessageContext,
    ctx: &MediationContext,
) -> ExecutionOutcome {
    for mediator in &sequence.mediators {
        if ctx.is_cancelled() {
            info!(position = %mediator.position, "mediation cancelled between mediators");
            return ExecutionOutcome::Cancelled;
        }

        let (success, err) = match &mediator.kind {
            MediatorKind::Log(m) => log::execute(m, msg),
            MediatorKind::Respond(_) => respond::execute(msg),
            MediatorKind::Payload(m) => payload::execute(m, msg),
            MediatorKind::Variable(m) => variable::execute(m, msg),
            MediatorKind::Call(m) => call::execute(m, msg, ctx).await,
        };

        if let Some(message) = &err {
            if success {
                // Non-fatal diagnostic: logged, execution continues.
                error!(position = %mediator.position, mediator = mediator.name(), error = %message, "mediator reported a non-fatal error");
            } else {
                error!(position = %mediator.position, mediator = mediator.name(), error = %message, "mediator failed");
            }
        }

        if !success {
            return ExecutionOutcome::Failure(err.unwrap_or_else(|| "mediator failed".to_string()));
        }
    }

    ExecutionOutcome::Success
}

/// Runs a Resource's `inSequence`, falling back to `faultSequence` on
/// failure. Cancellation never triggers the fallback. Returns the overall
/// success used to decide the HTTP response / file disposition.
pub async fn execute_resource(
    in_sequence: &Sequence,
    fault_sequence: Option<&Sequence>,
    msg: &mut MessageContext,
    ctx: &MediationContext,
) -> bool {
    let outcome = match execute_sequence(in_sequence, msg, ctx).await {
        ExecutionOutcome::Success => true,
        ExecutionOutcome::Cancelled => {
            counter!("sy_mediation_outcomes_total", "outcome" => "cancelled").increment(1);
            return false;
        }
        ExecutionOutcome::Failure(reason) => {
            if let Some(fault) = fault_sequence {
                error!(reason = %reason, "inSequence failed, running faultSequence");
                execute_sequence(fault, msg, ctx).await.is_success()
            } else {
                error!(reason = %reason, "inSequence failed, no faultSequence configured");
                false
            }
        }
    };

    counter!(
        "sy_mediation_outcomes_total",
        "outcome" => if outcome { "success" } else { "failure" }
    )
    .increment(1);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use sy_common::{DrainGroup, Position};
    use sy_model::{ArtifactGraph, LogCategory, LogMediator, Mediator, RespondMediator};
    use std::sync::Arc;
    use tokio_util::sync::CancellationToken;

    fn pos() -> Position {
        Position::new("t.xml".to_string(), 1, "T".to_string())
    }

    fn test_ctx() -> MediationContext {
        MediationContext::new(
            Arc::new(ArtifactGraph::new()),
            CancellationToken::new(),
            DrainGroup::new(),
        )
    }

    #[tokio::test]
    async fn sequence_of_log_and_respond_succeeds() {
        let sequence = Sequence {
            name: None,
            mediators: vec![
                Mediator {
                    kind: MediatorKind::Log(LogMediator {
                        category: LogCategory::Info,
                        message: "hi".to_string(),
                    }),
                    position: pos(),
                },
                Mediator {
                    kind: MediatorKind::Respond(RespondMediator),
                    position: pos(),
                },
            ],
            position: pos(),
        };
        let mut msg = MessageContext::new();
        let ctx = test_ctx();
        let outcome = execute_sequence(&sequence, &mut msg, &ctx).await;
        assert_eq!(outcome, ExecutionOutcome::Success);
        assert!(msg.is_marked_for_response());
    }

    #[tokio::test]
    async fn cancellation_short_circuits_without_fault_fallback() {
        let sequence = Sequence {
            name: None,
            mediators: vec![Mediator {
                kind: MediatorKind::Respond(RespondMediator),
                position: pos(),
            }],
            position: pos(),
        };
        let ctx = test_ctx();
        ctx.cancellation.cancel();
        let mut msg = MessageContext::new();
        let result = execute_resource(&sequence, None, &mut msg, &ctx).await;
        assert!(!result);
        assert!(!msg.is_marked_for_response());
    }
}
