use sy_common::MessageContext;

/// Sets the response-ready flag. Idempotent — re-running this mediator
/// twice leaves the header at `"true"`.
pub fn execute(msg: &mut MessageContext) -> (bool, Option<String>) {
    msg.mark_for_response();
    (true, None)
}
