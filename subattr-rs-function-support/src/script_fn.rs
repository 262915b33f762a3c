use std::sync::Arc;

use educe::Educe;
use subattr_rs_core::{attr_flags::AttrFlags, script_name::ScriptName, value::Value};
use subattr_rs_errors::{call_site::CallSite, Result};

use crate::prototype::FunctionPrototype;

/// Data available to every invocation: where the call came from, and
/// the name the function was invoked under (which differs from the
/// prototype's name when the call went through an alias).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct CallContext {
    /// The caller's source location
    pub call_site: CallSite,
    /// The name the call was made through
    pub invoked_as: ScriptName,
}

/// The signature all function bodies share. Bodies must be callable
/// from an arbitrary thread: signal handlers run in an implicit
/// concurrent-with-everything context.
pub type FnBody = Arc<dyn Fn(&CallContext, &[Value]) -> Result<Value> + Send + Sync>;

/// A callable: a prototype plus a shared, reference-counted body.
/// Cloning one does not clone the code.
#[derive(Educe, Clone)]
#[educe(Debug)]
pub struct ScriptFn {
    /// The function's metadata
    pub prototype: FunctionPrototype,

    /// The code itself
    #[educe(Debug(ignore))]
    body: FnBody,
}

impl ScriptFn {
    /// Create a new [`ScriptFn`] from a closure.
    pub fn new<B>(prototype: FunctionPrototype, body: B) -> Self
    where
        B: Fn(&CallContext, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            prototype,
            body: Arc::new(body),
        }
    }

    /// Create a new [`ScriptFn`] around an already-shared body. Used by
    /// wrappers that keep the original code alive.
    pub fn from_body(prototype: FunctionPrototype, body: FnBody) -> Self {
        Self { prototype, body }
    }

    /// A handle to my body.
    pub fn body(&self) -> FnBody {
        self.body.clone()
    }

    /// My fully-qualified name.
    #[inline]
    pub fn name(&self) -> ScriptName {
        self.prototype.name
    }

    /// The same body, with updated prototype flags.
    pub fn with_flags(&self, flags: AttrFlags) -> Self {
        Self {
            prototype: self.prototype.clone().with_flags(flags),
            body: self.body.clone(),
        }
    }

    /// Invoke the body. No arity or type checking happens here.
    pub fn call(&self, context: &CallContext, args: &[Value]) -> Result<Value> {
        (self.body)(context, args)
    }
}

#[cfg(test)]
mod tests {
    use ustr::ustr;

    use super::*;
    use crate::prototype::FunctionPrototypeBuilder;

    fn context() -> CallContext {
        CallContext {
            call_site: CallSite {
                file: ustr("test.rs"),
                line: 1,
                column: 1,
            },
            invoked_as: ScriptName::parse("double"),
        }
    }

    fn double() -> ScriptFn {
        let prototype = FunctionPrototypeBuilder::default()
            .name("double")
            .arity(Some(1))
            .build()
            .unwrap();

        ScriptFn::new(prototype, |_context, args| {
            let Some(Value::Int(x)) = args.first() else {
                return Err(subattr_rs_errors::attr_error!("expected an int"));
            };

            Ok(Value::Int(x * 2))
        })
    }

    #[test]
    fn test_call_passes_args() {
        let f = double();

        let result = f.call(&context(), &[Value::Int(21)]);

        assert_eq!(result.unwrap(), Value::Int(42));
    }

    #[test]
    fn test_clone_shares_the_body() {
        let f = double();
        let g = f.clone();

        assert_eq!(
            f.call(&context(), &[Value::Int(3)]).unwrap(),
            g.call(&context(), &[Value::Int(3)]).unwrap()
        );
    }

    #[test]
    fn test_with_flags_keeps_the_body() {
        let mut flags = AttrFlags::default();
        flags.set_memoized(true);

        let f = double().with_flags(flags);

        assert!(f.prototype.flags.memoized());
        assert_eq!(
            f.call(&context(), &[Value::Int(4)]).unwrap(),
            Value::Int(8)
        );
    }
}
