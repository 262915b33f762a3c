use std::{
    fmt::{Display, Formatter},
    hash::{Hash, Hasher},
};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{BaseFloat, ScriptFloat, ScriptInt};

/// The backing type for in-language mappings. Insertion order is
/// preserved, which keeps hashing and display deterministic.
pub type Mapping = IndexMap<String, Value>;

/// A runtime value, as passed to and returned from registered functions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    Int(ScriptInt),
    Float(ScriptFloat),
    String(String),
    Array(Vec<Value>),
    Mapping(Mapping),
}

impl Value {
    /// The in-language name of my type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Mapping(_) => "mapping",
        }
    }
}

/// [`Mapping`]s don't hash on their own, so the whole thing is by hand.
/// Each arm gets a discriminant prefix so `0` and `"0"` don't collide.
impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Int(x) => {
                0_u8.hash(state);
                x.hash(state);
            }
            Value::Float(x) => {
                1_u8.hash(state);
                x.hash(state);
            }
            Value::String(x) => {
                2_u8.hash(state);
                x.hash(state);
            }
            Value::Array(x) => {
                3_u8.hash(state);
                x.hash(state);
            }
            Value::Mapping(map) => {
                4_u8.hash(state);
                map.len().hash(state);
                for (key, value) in map {
                    key.hash(state);
                    value.hash(state);
                }
            }
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(x) => write!(f, "{x}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(x) => write!(f, "{x}"),
            Value::Array(x) => {
                let items = x.iter().map(|i| i.to_string()).collect::<Vec<_>>();
                write!(f, "({{ {} }})", items.join(", "))
            }
            Value::Mapping(map) => {
                let items = map
                    .iter()
                    .map(|(k, v)| format!("\"{k}\": {v}"))
                    .collect::<Vec<_>>();
                write!(f, "([ {} ])", items.join(", "))
            }
        }
    }
}

impl From<ScriptInt> for Value {
    fn from(x: ScriptInt) -> Self {
        Self::Int(x)
    }
}

impl From<BaseFloat> for Value {
    fn from(x: BaseFloat) -> Self {
        Self::Float(ScriptFloat::from(x))
    }
}

impl From<&str> for Value {
    fn from(x: &str) -> Self {
        Self::String(String::from(x))
    }
}

impl From<String> for Value {
    fn from(x: String) -> Self {
        Self::String(x)
    }
}

impl From<Vec<Value>> for Value {
    fn from(x: Vec<Value>) -> Self {
        Self::Array(x)
    }
}

impl From<Mapping> for Value {
    fn from(x: Mapping) -> Self {
        Self::Mapping(x)
    }
}
