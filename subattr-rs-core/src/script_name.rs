use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use ustr::{ustr, Ustr};

use crate::{DEFAULT_PACKAGE, PACKAGE_SEPARATOR};

/// A fully-qualified name: the package a binding lives in, plus the
/// unqualified name within it. This is the key type for the symbol
/// space.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ScriptName {
    /// The package (namespace) the name lives in
    pub package: Ustr,
    /// The unqualified name
    pub name: Ustr,
}

impl ScriptName {
    /// Create a new [`ScriptName`] from its two parts.
    pub fn new<P, N>(package: P, name: N) -> Self
    where
        P: AsRef<str>,
        N: AsRef<str>,
    {
        Self {
            package: ustr(package.as_ref()),
            name: ustr(name.as_ref()),
        }
    }

    /// Parse a possibly-qualified name. Unqualified names resolve into
    /// `default_package`. The split is on the *last* separator, so
    /// nested packages stay intact.
    pub fn parse_in<T, P>(text: T, default_package: P) -> Self
    where
        T: AsRef<str>,
        P: AsRef<str>,
    {
        let text = text.as_ref().trim();

        match text.rsplit_once(PACKAGE_SEPARATOR) {
            Some((package, name)) => Self::new(package, name),
            None => Self::new(default_package, text),
        }
    }

    /// [`parse_in`](Self::parse_in), with the conventional default package.
    pub fn parse<T>(text: T) -> Self
    where
        T: AsRef<str>,
    {
        Self::parse_in(text, DEFAULT_PACKAGE)
    }

    /// My interned `package::name` form.
    pub fn fully_qualified(&self) -> Ustr {
        ustr(&self.to_string())
    }
}

impl Display for ScriptName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.package, PACKAGE_SEPARATOR, self.name)
    }
}

impl From<&str> for ScriptName {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

impl From<String> for ScriptName {
    fn from(text: String) -> Self {
        Self::parse(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_unqualified() {
        let name = ScriptName::parse("fib");

        assert_eq!(name.package.as_str(), DEFAULT_PACKAGE);
        assert_eq!(name.name.as_str(), "fib");
    }

    #[test]
    fn test_parse_qualified() {
        let name = ScriptName::parse("Dog::speak");

        assert_eq!(name.package.as_str(), "Dog");
        assert_eq!(name.name.as_str(), "speak");
    }

    #[test]
    fn test_parse_nested_package() {
        let name = ScriptName::parse("Animal::Dog::speak");

        assert_eq!(name.package.as_str(), "Animal::Dog");
        assert_eq!(name.name.as_str(), "speak");
    }

    #[test]
    fn test_parse_in_uses_default_package() {
        let name = ScriptName::parse_in("bark", "Dog");

        assert_eq!(name.package.as_str(), "Dog");
        assert_eq!(name.to_string(), "Dog::bark");
    }

    #[test]
    fn test_fully_qualified_round_trips() {
        let name = ScriptName::parse("Dog::speak");

        assert_eq!(ScriptName::parse(name.fully_qualified()), name);
    }
}
