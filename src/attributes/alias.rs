use subattr_rs_core::script_name::ScriptName;
use subattr_rs_errors::{attr_error, Result};
use tracing::trace;

use crate::attributes::attr_context::AttrContext;

/// `Alias`: bind each listed name, in the originating package, to the
/// exact same storage as `name`. Not a copy, and not a forwarding call:
/// redefinition through any of the names is observable through all of
/// them.
pub fn apply(context: &mut AttrContext, name: &ScriptName, args: &[String]) -> Result<()> {
    if args.is_empty() {
        return Err(attr_error!(
            "`Alias` on `{}` requires at least one target name",
            name
        ));
    }

    for target in args {
        let target_name = context.resolve_name(target, name.package);
        context.alias(name, &target_name)?;

        trace!("`{}` now also answers to `{}`", name, target_name);
    }

    // the function slot, if there is one, records its participation
    if let Some(function) = context.lookup_function(name) {
        let mut flags = function.prototype.flags;
        if !flags.aliased() {
            flags.set_aliased(true);
            context.replace_function(function.with_flags(flags));
        }
    }

    Ok(())
}
