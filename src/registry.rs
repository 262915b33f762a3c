use std::sync::Arc;

use parking_lot::RwLock;
use subattr_rs_core::{
    script_name::ScriptName,
    signal::Signal,
    value::{Mapping, Value},
};
use subattr_rs_errors::{attr_error, call_site::CallSite, Result};
use subattr_rs_function_support::{
    prototype::FunctionPrototype,
    script_fn::{CallContext, ScriptFn},
};
use subattr_rs_utils::config::Config;
use tracing::{debug, trace};

use crate::{
    attributes::{self, attr_context::AttrContext, Annotation},
    signal_table::SignalTable,
    symbol_space::SymbolSpace,
};

/// The owning object for what the host language keeps as ambient
/// process-wide state: the symbol space and the signal-dispatch table.
/// Explicitly created from a [`Config`], torn down by dropping it.
///
/// Every lock is released before user code (function bodies, handlers,
/// normalizers) runs, so bodies may re-enter the registry freely.
#[derive(Debug)]
pub struct Registry {
    /// Our configuration
    config: Arc<Config>,

    /// name -> storage
    symbols: RwLock<SymbolSpace>,

    /// signal -> handler
    signals: RwLock<SignalTable>,
}

impl Registry {
    /// Create a new [`Registry`] with the passed [`Config`]
    pub fn new<T>(config: T) -> Self
    where
        T: Into<Arc<Config>>,
    {
        let config = config.into();

        Self {
            symbols: RwLock::new(SymbolSpace::new(config.clone())),
            signals: RwLock::new(SignalTable::new(config.clone())),
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// The symbol space itself, for introspection.
    #[inline]
    pub fn symbol_space(&self) -> &RwLock<SymbolSpace> {
        &self.symbols
    }

    /// The signal-dispatch table itself, for introspection.
    #[inline]
    pub fn signal_table(&self) -> &RwLock<SignalTable> {
        &self.signals
    }

    /// Parse `text` as a name, with unqualified names landing in the
    /// configured default package.
    pub fn name<T>(&self, text: T) -> ScriptName
    where
        T: AsRef<str>,
    {
        ScriptName::parse_in(text, self.config.default_package)
    }

    /// Install an already-built function. Redefining an existing name
    /// writes through the existing glob, so aliases see the new body.
    pub fn insert(&self, function: ScriptFn) {
        self.symbols.write().define_function(function);
    }

    /// Define a function from a prototype and a body closure.
    pub fn define<B>(&self, prototype: FunctionPrototype, body: B)
    where
        B: Fn(&CallContext, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.insert(ScriptFn::new(prototype, body));
    }

    /// The explicit attribute-application step: apply `annotation` to
    /// the binding at `name`. This is where a host language would hook
    /// subroutine-definition events; here the author opts in per name.
    pub fn annotate(&self, name: &ScriptName, annotation: &Annotation) -> Result<()> {
        debug!("applying {} to `{}`", annotation, name);

        let mut symbols = self.symbols.write();
        let mut signals = self.signals.write();
        let mut context = AttrContext::new(&mut symbols, &mut signals, self.config.clone());

        attributes::apply(&mut context, name, annotation)
    }

    /// Define, then apply each annotation in order.
    pub fn define_annotated<B>(
        &self,
        prototype: FunctionPrototype,
        annotations: &[Annotation],
        body: B,
    ) -> Result<()>
    where
        B: Fn(&CallContext, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        let name = prototype.name;
        self.define(prototype, body);

        for annotation in annotations {
            self.annotate(&name, annotation)?;
        }

        Ok(())
    }

    /// Invoke the function bound at `name`. The caller's source
    /// location is captured here and carried to the body, which is what
    /// abstract stubs report.
    #[track_caller]
    pub fn call(&self, name: &ScriptName, args: &[Value]) -> Result<Value> {
        let call_site = CallSite::here();

        let function = { self.symbols.read().lookup_function(name) };
        let Some(function) = function else {
            return Err(attr_error!(
                Some(call_site),
                "call to undefined function `{}`",
                name
            ));
        };

        let context = CallContext {
            call_site,
            invoked_as: *name,
        };

        function.call(&context, args)
    }

    /// Dispatch `signal` to its installed handler, if any. Delivery
    /// itself is the host environment's job; this is the table lookup
    /// it would perform.
    #[track_caller]
    pub fn raise(&self, signal: &Signal, args: &[Value]) -> Result<Option<Value>> {
        let call_site = CallSite::here();

        let handler = { self.signals.read().lookup(signal).cloned() };
        let Some(handler) = handler else {
            trace!("no handler installed for {}", signal);
            return Ok(None);
        };

        let context = CallContext {
            call_site,
            invoked_as: handler.name(),
        };

        handler.call(&context, args).map(Some)
    }

    /// Write `value` into the scalar slot of `name`'s glob.
    pub fn set_scalar(&self, name: &ScriptName, value: Value) {
        self.symbols.write().set_scalar(name, value);
    }

    /// Read the scalar slot of `name`'s glob.
    pub fn scalar(&self, name: &ScriptName) -> Option<Value> {
        let symbols = self.symbols.read();
        let value = symbols.lookup(name)?.read().scalar.clone();

        value
    }

    /// Write `values` into the array slot of `name`'s glob.
    pub fn set_array(&self, name: &ScriptName, values: Vec<Value>) {
        self.symbols.write().set_array(name, values);
    }

    /// Read the array slot of `name`'s glob.
    pub fn array(&self, name: &ScriptName) -> Option<Vec<Value>> {
        let symbols = self.symbols.read();
        let values = symbols.lookup(name)?.read().array.clone();

        values
    }

    /// Write `mapping` into the mapping slot of `name`'s glob.
    pub fn set_mapping(&self, name: &ScriptName, mapping: Mapping) {
        self.symbols.write().set_mapping(name, mapping);
    }

    /// Read the mapping slot of `name`'s glob.
    pub fn mapping(&self, name: &ScriptName) -> Option<Mapping> {
        let symbols = self.symbols.read();
        let mapping = symbols.lookup(name)?.read().mapping.clone();

        mapping
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(Config::shared_default())
    }
}
