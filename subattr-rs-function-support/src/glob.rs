use subattr_rs_core::value::{Mapping, Value};

use crate::script_fn::ScriptFn;

/// All of the storage slots that can live under a single name: the
/// function slot plus the three variable slots. Aliased names share one
/// `Glob`, so a write through any name is visible through every other.
///
/// Aliasing always operates on the whole bundle. Re-binding a name to a
/// different `Glob` replaces every slot at once, not just the one the
/// caller was thinking about.
#[derive(Debug, Clone, Default)]
pub struct Glob {
    /// The function slot
    pub function: Option<ScriptFn>,
    /// The scalar-variable slot
    pub scalar: Option<Value>,
    /// The array-variable slot
    pub array: Option<Vec<Value>>,
    /// The mapping-variable slot
    pub mapping: Option<Mapping>,
}

impl Glob {
    /// A glob with only the function slot filled.
    pub fn with_function(function: ScriptFn) -> Self {
        Self {
            function: Some(function),
            ..Default::default()
        }
    }

    /// Is every slot empty?
    pub fn is_empty(&self) -> bool {
        self.function.is_none()
            && self.scalar.is_none()
            && self.array.is_none()
            && self.mapping.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prototype::FunctionPrototypeBuilder;

    #[test]
    fn test_default_is_empty() {
        assert!(Glob::default().is_empty());
    }

    #[test]
    fn test_with_function() {
        let prototype = FunctionPrototypeBuilder::default()
            .name("noop")
            .build()
            .unwrap();
        let glob = Glob::with_function(ScriptFn::new(prototype, |_, _| Ok(Value::Int(0))));

        assert!(!glob.is_empty());
        assert!(glob.function.is_some());
        assert!(glob.scalar.is_none());
    }
}
