use sy_common::MessageContext;
use sy_model::VariableMediator;

/// Assigns `properties[name] = value`. Runtime performs no coercion: the
/// declared `type` was only a parser-time whitelist check (see the
/// open question recorded in DESIGN.md), the stored value is always the
/// literal string.
pub fn execute(mediator: &VariableMediator, msg: &mut MessageContext) -> (bool, Option<String>) {
    msg.set_property(mediator.name.clone(), mediator.value.clone());
    (true, None)
}
