use subattr_rs_core::{script_name::ScriptName, signal::Signal};
use subattr_rs_errors::{attr_error, Result};
use tracing::trace;

use crate::attributes::attr_context::AttrContext;

/// `SigHandler`: install the function as the handler for each listed
/// signal name, overwriting whatever was previously registered for that
/// exact name. Handlers do not stack; the displaced one is simply never
/// invoked again.
pub fn apply(context: &mut AttrContext, name: &ScriptName, args: &[String]) -> Result<()> {
    let Some(function) = context.lookup_function(name) else {
        return Err(attr_error!(
            "cannot install unknown function `{}` as a signal handler",
            name
        ));
    };

    if args.is_empty() {
        return Err(attr_error!(
            "`SigHandler` on `{}` requires at least one signal name",
            name
        ));
    }

    let mut flags = function.prototype.flags;
    flags.set_signal_handler(true);
    let handler = function.with_flags(flags);
    context.replace_function(handler.clone());

    for arg in args {
        let signal = Signal::parse(arg);
        context.register_handler(signal, handler.clone());

        trace!("`{}` handles {}", name, signal);
    }

    Ok(())
}
