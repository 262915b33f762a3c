use std::{collections::HashMap, fmt::Formatter, sync::Arc};

use delegate::delegate;
use educe::Educe;
use itertools::Itertools;
use parking_lot::RwLock;
use subattr_rs_core::{
    script_name::ScriptName,
    value::{Mapping, Value},
};
use subattr_rs_errors::{attr_error, Result};
use subattr_rs_function_support::{glob::Glob, script_fn::ScriptFn};
use subattr_rs_utils::config::Config;
use tracing::{trace, warn};
use ustr::Ustr;

/// The initial size (in bindings) of the symbol space
const SYMBOL_SPACE_SIZE: usize = 1_024;

/// The name table: a wrapper around a [`HashMap`] from fully-qualified
/// names to shared [`Glob`] storage. Aliasing inserts a second entry
/// pointing at the same storage handle; it never copies.
#[derive(Educe, Clone)]
#[educe(Debug)]
pub struct SymbolSpace {
    /// The actual mapping of names to storage
    #[educe(Debug(method = "globs_debug"))]
    globs: HashMap<Ustr, Arc<RwLock<Glob>>>,

    /// Our configuration
    config: Arc<Config>,
}

fn globs_debug(
    globs: &HashMap<Ustr, Arc<RwLock<Glob>>>,
    f: &mut Formatter<'_>,
) -> std::fmt::Result {
    write!(f, "{}", globs.keys().join(", "))
}

impl SymbolSpace {
    delegate! {
        to self.globs {
            /// Get the number of bound names in the space
            pub fn len(&self) -> usize;

            /// Get whether or not the space is empty
            pub fn is_empty(&self) -> bool;

            /// Clear the entire space
            pub fn clear(&mut self);
        }
    }

    /// Create a new [`SymbolSpace`] with the passed [`Config`]
    pub fn new<T>(config: T) -> Self
    where
        T: Into<Arc<Config>>,
    {
        Self {
            config: config.into(),
            ..Default::default()
        }
    }

    /// Install `function` into the function slot of its name's glob.
    /// Redefining an existing name writes through the existing glob, so
    /// every alias of that name observes the new body.
    pub fn define_function(&mut self, function: ScriptFn) {
        let key = function.name().fully_qualified();
        trace!("defining `{}`", key);

        match self.globs.get(&key) {
            Some(cell) => {
                cell.write().function = Some(function);
            }
            None => {
                self.globs
                    .insert(key, RwLock::new(Glob::with_function(function)).into());
            }
        }
    }

    /// Write `value` into the scalar slot of `name`'s glob.
    pub fn set_scalar(&mut self, name: &ScriptName, value: Value) {
        self.glob_cell(name).write().scalar = Some(value);
    }

    /// Write `values` into the array slot of `name`'s glob.
    pub fn set_array(&mut self, name: &ScriptName, values: Vec<Value>) {
        self.glob_cell(name).write().array = Some(values);
    }

    /// Write `mapping` into the mapping slot of `name`'s glob.
    pub fn set_mapping(&mut self, name: &ScriptName, mapping: Mapping) {
        self.glob_cell(name).write().mapping = Some(mapping);
    }

    /// Make `target` refer to the exact same storage as `source`:
    /// every slot, for the remaining life of the space. If `target` was
    /// already bound, its whole bundle is displaced by this.
    pub fn alias(&mut self, source: &ScriptName, target: &ScriptName) -> Result<()> {
        let key = source.fully_qualified();
        let Some(cell) = self.globs.get(&key) else {
            return Err(attr_error!("cannot alias unknown name `{}`", source));
        };

        let cell = cell.clone();
        let displaced = self.globs.insert(target.fully_qualified(), cell);

        if displaced.is_some() && self.config.warn_on_clobber {
            warn!(
                "alias `{}` -> `{}` displaced an existing binding (the whole glob bundle)",
                target, source
            );
        }

        trace!("aliased `{}` -> `{}`", target, source);

        Ok(())
    }

    /// Look up the storage bound under `name`.
    pub fn lookup(&self, name: &ScriptName) -> Option<&Arc<RwLock<Glob>>> {
        self.globs.get(&name.fully_qualified())
    }

    /// Clone out the function bound under `name`, if there is one.
    pub fn lookup_function(&self, name: &ScriptName) -> Option<ScriptFn> {
        self.lookup(name)?.read().function.clone()
    }

    /// Get (creating if necessary) the glob cell for `name`.
    fn glob_cell(&mut self, name: &ScriptName) -> Arc<RwLock<Glob>> {
        self.globs
            .entry(name.fully_qualified())
            .or_insert_with(|| RwLock::new(Glob::default()).into())
            .clone()
    }
}

impl Default for SymbolSpace {
    fn default() -> Self {
        let globs = HashMap::with_capacity(SYMBOL_SPACE_SIZE);

        Self {
            globs,
            config: Config::shared_default(),
        }
    }
}
