use std::{collections::HashMap, fmt::Formatter, sync::Arc};

use delegate::delegate;
use educe::Educe;
use itertools::Itertools;
use subattr_rs_core::signal::Signal;
use subattr_rs_function_support::script_fn::ScriptFn;
use subattr_rs_utils::config::Config;
use tracing::{debug, trace, warn};

/// The signal-dispatch table: one currently-installed handler per
/// signal name. Installing a new handler for a signal overwrites the
/// previous one. Registration is last-write-wins, never additive, and
/// there is no unregistration.
#[derive(Educe, Clone)]
#[educe(Debug)]
pub struct SignalTable {
    /// The actual mapping of signals to handlers
    #[educe(Debug(method = "handlers_debug"))]
    handlers: HashMap<Signal, ScriptFn>,

    /// Our configuration
    config: Arc<Config>,
}

fn handlers_debug(
    handlers: &HashMap<Signal, ScriptFn>,
    f: &mut Formatter<'_>,
) -> std::fmt::Result {
    write!(f, "{}", handlers.keys().join(", "))
}

impl SignalTable {
    delegate! {
        to self.handlers {
            /// Get the number of signals with an installed handler
            pub fn len(&self) -> usize;

            /// Is the table empty?
            pub fn is_empty(&self) -> bool;

            /// Clear the entire table
            pub fn clear(&mut self);
        }
    }

    /// Create a new [`SignalTable`] with the passed [`Config`]
    pub fn new<T>(config: T) -> Self
    where
        T: Into<Arc<Config>>,
    {
        Self {
            config: config.into(),
            ..Default::default()
        }
    }

    /// Install `handler` for `signal`, returning whatever handler it
    /// displaced. The displaced handler is never invoked again.
    pub fn register(&mut self, signal: Signal, handler: ScriptFn) -> Option<ScriptFn> {
        if !signal.is_conventional() {
            debug!("`{}` is not a conventional signal name", signal);
        }

        trace!("installing `{}` as the handler for {}", handler.name(), signal);

        let displaced = self.handlers.insert(signal, handler);

        if let Some(previous) = &displaced {
            if self.config.warn_on_clobber {
                warn!(
                    "handler `{}` for {} displaced `{}`",
                    self.handlers[&signal].name(),
                    signal,
                    previous.name()
                );
            }
        }

        displaced
    }

    /// Look up the currently-installed handler for `signal`.
    pub fn lookup(&self, signal: &Signal) -> Option<&ScriptFn> {
        self.handlers.get(signal)
    }
}

impl Default for SignalTable {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
            config: Config::shared_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use subattr_rs_core::value::Value;
    use subattr_rs_function_support::prototype::FunctionPrototypeBuilder;

    use super::*;

    fn noop(name: &str) -> ScriptFn {
        let prototype = FunctionPrototypeBuilder::default()
            .name(name)
            .build()
            .unwrap();

        ScriptFn::new(prototype, |_, _| Ok(Value::Int(0)))
    }

    #[test]
    fn test_register_and_lookup() {
        let mut table = SignalTable::default();

        assert!(table.register(Signal::Warn, noop("warn_handler")).is_none());
        assert_eq!(table.len(), 1);

        let handler = table.lookup(&Signal::Warn).unwrap();
        assert_eq!(handler.name().to_string(), "main::warn_handler");
        assert!(table.lookup(&Signal::Die).is_none());
    }

    #[test]
    fn test_register_returns_the_displaced_handler() {
        let mut table = SignalTable::default();
        let signal = Signal::parse("ALRM");

        table.register(signal, noop("first"));
        let displaced = table.register(signal, noop("second"));

        assert_eq!(displaced.unwrap().name().to_string(), "main::first");
        assert_eq!(
            table.lookup(&signal).unwrap().name().to_string(),
            "main::second"
        );
        assert_eq!(table.len(), 1);
    }
}
