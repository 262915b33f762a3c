use subattr_rs_core::{script_name::ScriptName, value::Value};
use subattr_rs_errors::{attr_error, Result};
use subattr_rs_function_support::script_fn::{CallContext, ScriptFn};
use tracing::debug;

use crate::attributes::attr_context::AttrContext;

/// `Abstract`: replace the function's body with one that always fails.
/// The error names the function and the *caller's* source location, not
/// the definition's. Subtypes are expected to redefine the name with a
/// concrete implementation; nothing checks that they do, and failure is
/// deferred to the first call.
pub fn apply(context: &mut AttrContext, name: &ScriptName, args: &[String]) -> Result<()> {
    let Some(original) = context.lookup_function(name) else {
        return Err(attr_error!(
            "cannot mark unknown function `{}` as abstract",
            name
        ));
    };

    if !args.is_empty() {
        debug!("`Abstract` takes no arguments; ignoring {:?}", args);
    }

    let mut flags = original.prototype.flags;
    flags.set_abstract_method(true);

    let fully_qualified = original.name();
    let prototype = original.prototype.clone().with_flags(flags);

    let stub = ScriptFn::new(prototype, move |ctx: &CallContext, _args: &[Value]| {
        Err(attr_error!(
            Some(ctx.call_site),
            "call to abstract method `{}`",
            fully_qualified
        ))
    });

    context.replace_function(stub);

    Ok(())
}

#[cfg(test)]
mod tests {
    use claims::*;
    use subattr_rs_core::value::Value;

    use crate::test_support::{annotate, counting_fn, define, registry_fixture};

    #[test]
    fn test_calls_always_fail() {
        let registry = registry_fixture();
        let (f, counter) = counting_fn("speak");
        define(&registry, f);

        annotate(&registry, "speak", "Abstract").unwrap();

        let name = registry.name("speak");
        let result = registry.call(&name, &[Value::Int(1)]);

        assert_err!(result.as_ref());
        assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 0);

        let message = result.unwrap_err().to_string();
        assert!(message.contains("call to abstract method `main::speak`"));
        assert!(message.contains(" line "));
    }

    #[test]
    fn test_redefinition_makes_it_concrete_again() {
        let registry = registry_fixture();
        let (f, _counter) = counting_fn("speak");
        define(&registry, f);
        annotate(&registry, "speak", "Abstract").unwrap();

        // a subtype supplies the real implementation
        let (concrete, counter) = counting_fn("speak");
        define(&registry, concrete);

        let name = registry.name("speak");
        assert_ok!(registry.call(&name, &[Value::Int(1)]));
        assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unknown_function_errors() {
        let registry = registry_fixture();

        assert_err!(annotate(&registry, "ghost", "Abstract"));
    }
}
