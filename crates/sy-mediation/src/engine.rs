//! Mediation Engine (C8, engine half) — `mediate_inbound` adapts an
//! inbound arrival into a sequence execution without blocking its caller.

use crate::context::MediationContext;
use crate::executor::execute_resource;
use sy_common::MessageContext;
use tracing::{error, info};

/// Resolves `sequence_name` in the artifact graph and runs it on a
/// dedicated task registered with the context's drain group. Returns
/// immediately; inbound transports never block on mediation completion.
///
/// The spawned task is itself a "resource" with no fault sequence — only
/// a Resource's own `inSequence`/`faultSequence` pairing gets fault
/// fallback; sequences invoked directly by an inbound endpoint have none.
pub fn mediate_inbound(ctx: MediationContext, sequence_name: String, mut msg: MessageContext) {
    ctx.drain.add();
    tokio::spawn(async move {
        let _guard = DoneOnDrop(ctx.clone());

        if ctx.is_cancelled() {
            info!(sequence = %sequence_name, "mediation cancelled before execution started");
            return;
        }

        let sequence = match ctx.graph.sequence(&sequence_name) {
            Some(s) => s.clone(),
            None => {
                error!(sequence = %sequence_name, "sequence not found, dropping request");
                return;
            }
        };

        let _ = execute_resource(&sequence, None, &mut msg, &ctx).await;
    });
}

/// Ensures `drain.done()` runs exactly once per `drain.add()`, even if the
/// spawned task panics, without risking the double-`done()` bug noted as
/// an open question in the source this engine follows.
struct DoneOnDrop(MediationContext);

impl Drop for DoneOnDrop {
    fn drop(&mut self) {
        self.0.drain.done();
    }
}
