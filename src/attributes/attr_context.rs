use std::sync::Arc;

use subattr_rs_core::{script_name::ScriptName, signal::Signal};
use subattr_rs_errors::Result;
use subattr_rs_function_support::script_fn::ScriptFn;
use subattr_rs_utils::config::Config;
use ustr::Ustr;

use crate::{signal_table::SignalTable, symbol_space::SymbolSpace};

/// A struct to hold the data the attribute appliers need, so the
/// registry's internals don't leak into each of them.
pub struct AttrContext<'a> {
    symbols: &'a mut SymbolSpace,
    signals: &'a mut SignalTable,
    config: Arc<Config>,
}

impl<'a> AttrContext<'a> {
    /// Create a new [`AttrContext`]
    pub fn new(
        symbols: &'a mut SymbolSpace,
        signals: &'a mut SignalTable,
        config: Arc<Config>,
    ) -> Self {
        Self {
            symbols,
            signals,
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Clone out the function bound under `name`.
    #[inline]
    pub fn lookup_function(&self, name: &ScriptName) -> Option<ScriptFn> {
        self.symbols.lookup_function(name)
    }

    /// Write `function` through its name's glob.
    #[inline]
    pub fn replace_function(&mut self, function: ScriptFn) {
        self.symbols.define_function(function);
    }

    /// Make `target` refer to the same storage as `source`.
    #[inline]
    pub fn alias(&mut self, source: &ScriptName, target: &ScriptName) -> Result<()> {
        self.symbols.alias(source, target)
    }

    /// Install `handler` for `signal`, returning any displaced handler.
    #[inline]
    pub fn register_handler(&mut self, signal: Signal, handler: ScriptFn) -> Option<ScriptFn> {
        self.signals.register(signal, handler)
    }

    /// Resolve a possibly-unqualified name in `package`.
    #[inline]
    pub fn resolve_name<T>(&self, text: T, package: Ustr) -> ScriptName
    where
        T: AsRef<str>,
    {
        ScriptName::parse_in(text, package)
    }
}
