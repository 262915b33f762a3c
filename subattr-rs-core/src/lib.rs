use decorum::Total;

#[allow(clippy::identity_op)]
pub mod attr_flags;
pub mod script_name;
pub mod signal;
pub mod value;

/// Name of the package that unqualified names resolve into, unless
/// configured otherwise.
pub const DEFAULT_PACKAGE: &str = "main";

/// Separator between the package portion and the final portion of a
/// fully-qualified name.
pub const PACKAGE_SEPARATOR: &str = "::";

/// Abstracted type to use as in-language `int`s
pub type ScriptInt = i64;

/// The base float-type that in-language `float`s are backed by
pub type BaseFloat = f64;

/// Abstracted type for in-language `float`s. The wrapper is to handle
/// hashing, ordering, etc.
pub type ScriptFloat = Total<BaseFloat>;
