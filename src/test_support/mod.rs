use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use subattr_rs_core::value::Value;
use subattr_rs_errors::Result;
use subattr_rs_function_support::{
    prototype::{FunctionPrototype, FunctionPrototypeBuilder},
    script_fn::ScriptFn,
};

use crate::{attributes::Annotation, registry::Registry};

/// Module for various test utilities that are shared among unit tests.

/// A default-configured [`Registry`].
pub fn registry_fixture() -> Registry {
    Registry::default()
}

/// A prototype for `name`, parsed in the conventional default package.
pub fn proto(name: &str) -> FunctionPrototype {
    FunctionPrototypeBuilder::default()
        .name(name)
        .build()
        .unwrap()
}

/// A function that counts its invocations and echoes back its first
/// argument (or `0`).
pub fn counting_fn(name: &str) -> (ScriptFn, Arc<AtomicUsize>) {
    let counter = Arc::new(AtomicUsize::new(0));
    let count = counter.clone();

    let function = ScriptFn::new(proto(name), move |_context, args| {
        count.fetch_add(1, Ordering::SeqCst);

        Ok(args.first().cloned().unwrap_or(Value::Int(0)))
    });

    (function, counter)
}

/// Install an already-built function.
pub fn define(registry: &Registry, function: ScriptFn) {
    registry.insert(function);
}

/// Parse `text` and apply it to `name`.
pub fn annotate(registry: &Registry, name: &str, text: &str) -> Result<()> {
    let annotation = Annotation::parse(text)?;

    registry.annotate(&registry.name(name), &annotation)
}
