use std::fmt::{Display, Formatter};

use derive_builder::Builder;
use itertools::Itertools;
use lazy_format::lazy_format;
use serde::{Deserialize, Serialize};
use subattr_rs_core::{attr_flags::AttrFlags, script_name::ScriptName};

/// A representation of a function's metadata, as distinct from its body.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, Builder)]
#[builder(build_fn(error = "subattr_rs_errors::AttrError"))]
#[readonly::make]
pub struct FunctionPrototype {
    /// The fully-qualified name of the function
    #[builder(setter(into))]
    pub name: ScriptName,

    /// The number of arguments the function expects. `None` means
    /// variadic; nothing enforces this at call time.
    #[builder(default)]
    pub arity: Option<usize>,

    /// The attributes that have been applied to this function
    #[builder(default)]
    pub flags: AttrFlags,
}

impl FunctionPrototype {
    /// The same prototype, with `flags` swapped out.
    pub fn with_flags(mut self, flags: AttrFlags) -> Self {
        self.flags = flags;

        self
    }
}

impl Display for FunctionPrototype {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let flags = self.flags;

        let memoized = lazy_format!(
            if flags.memoized() => ("{}", "memoized ")
            else => ""
        );

        let abstract_method = lazy_format!(
            if flags.abstract_method() => ("{}", "abstract ")
            else => ""
        );

        let args = match self.arity {
            Some(n) => (0..n).map(|_| "_").join(", "),
            None => String::from("..."),
        };

        write!(f, "{}{}{}({})", memoized, abstract_method, self.name, args)
    }
}
