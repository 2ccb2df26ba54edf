use sy_common::MessageContext;
use sy_model::{LogCategory, LogMediator};
use tracing::{debug, error, info, warn};

pub fn execute(mediator: &LogMediator, _msg: &MessageContext) -> (bool, Option<String>) {
    match mediator.category {
        LogCategory::Debug => debug!(message = %mediator.message, "log mediator"),
        LogCategory::Info => info!(message = %mediator.message, "log mediator"),
        LogCategory::Warn => warn!(message = %mediator.message, "log mediator"),
        LogCategory::Error => error!(message = %mediator.message, "log mediator"),
    }
    (true, None)
}
