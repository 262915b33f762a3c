pub mod abstract_method;
pub mod alias;
pub mod attr_context;
pub mod memoize;
pub mod sig_handler;

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use itertools::Itertools;
use phf::phf_map;
use serde::{Deserialize, Serialize};
use subattr_rs_core::script_name::ScriptName;
use subattr_rs_errors::{attr_error, AttrError, Result};

use crate::attributes::attr_context::AttrContext;

/// The annotation names this suite recognizes, mapped to their kinds.
static ATTRIBUTE_KINDS: phf::Map<&'static str, AttributeKind> = phf_map! {
    "Memoize" => AttributeKind::Memoize,
    "Abstract" => AttributeKind::Abstract,
    "Alias" => AttributeKind::Alias,
    "SigHandler" => AttributeKind::SigHandler,
};

/// The four recognized attribute kinds.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum AttributeKind {
    Memoize,
    Abstract,
    Alias,
    SigHandler,
}

impl AttributeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeKind::Memoize => "Memoize",
            AttributeKind::Abstract => "Abstract",
            AttributeKind::Alias => "Alias",
            AttributeKind::SigHandler => "SigHandler",
        }
    }
}

impl Display for AttributeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AttributeKind {
    type Err = Box<AttrError>;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ATTRIBUTE_KINDS
            .get(s)
            .copied()
            .ok_or_else(|| attr_error!("unknown attribute `{}`", s))
    }
}

/// An annotation, as attached to a subroutine definition: an attribute
/// kind, plus its (possibly empty) ordered argument list.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Annotation {
    pub kind: AttributeKind,
    pub args: Vec<String>,
}

impl Annotation {
    /// Create a new [`Annotation`]
    pub fn new<I, S>(kind: AttributeKind, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind,
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// An [`Annotation`] with no arguments.
    pub fn bare(kind: AttributeKind) -> Self {
        Self { kind, args: vec![] }
    }

    /// Parse the textual form: `Name`, `Name()`, or `Name(a, b)`.
    /// Arguments may be single- or double-quoted; empty arguments are
    /// rejected.
    pub fn parse<T>(text: T) -> Result<Self>
    where
        T: AsRef<str>,
    {
        let text = text.as_ref().trim();

        let (name, inner) = match text.find('(') {
            Some(idx) => {
                if !text.ends_with(')') {
                    return Err(attr_error!("malformed annotation `{}`", text));
                }

                (&text[..idx], &text[idx + 1..text.len() - 1])
            }
            None => (text, ""),
        };

        let kind = AttributeKind::from_str(name.trim())?;

        let inner = inner.trim();
        let args = if inner.is_empty() {
            vec![]
        } else {
            inner
                .split(',')
                .map(|raw| {
                    let arg = strip_quotes(raw.trim());
                    if arg.is_empty() {
                        return Err(attr_error!("empty argument in annotation `{}`", text));
                    }

                    Ok(arg.to_string())
                })
                .collect::<Result<Vec<_>>>()?
        };

        Ok(Self { kind, args })
    }
}

fn strip_quotes(s: &str) -> &str {
    for quote in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return &s[1..s.len() - 1];
        }
    }

    s
}

impl FromStr for Annotation {
    type Err = Box<AttrError>;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for Annotation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.args.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}({})", self.kind, self.args.iter().join(", "))
        }
    }
}

/// Apply `annotation` to the binding at `name`.
pub fn apply(context: &mut AttrContext, name: &ScriptName, annotation: &Annotation) -> Result<()> {
    match annotation.kind {
        AttributeKind::Memoize => memoize::apply(context, name, &annotation.args),
        AttributeKind::Abstract => abstract_method::apply(context, name, &annotation.args),
        AttributeKind::Alias => alias::apply(context, name, &annotation.args),
        AttributeKind::SigHandler => sig_handler::apply(context, name, &annotation.args),
    }
}

#[cfg(test)]
mod tests {
    use claims::*;

    use super::*;

    mod test_parse {
        use super::*;

        #[test]
        fn parses_a_bare_name() {
            let annotation = Annotation::parse("Abstract").unwrap();

            assert_eq!(annotation.kind, AttributeKind::Abstract);
            assert!(annotation.args.is_empty());
        }

        #[test]
        fn parses_empty_parens() {
            let annotation = Annotation::parse("Memoize()").unwrap();

            assert_eq!(annotation.kind, AttributeKind::Memoize);
            assert!(annotation.args.is_empty());
        }

        #[test]
        fn parses_an_argument_list() {
            let annotation = Annotation::parse("SigHandler(__WARN__, ALRM)").unwrap();

            assert_eq!(annotation.kind, AttributeKind::SigHandler);
            assert_eq!(annotation.args, vec!["__WARN__", "ALRM"]);
        }

        #[test]
        fn strips_quotes() {
            let annotation = Annotation::parse(r#"Alias("dump_noargs", 'dump2')"#).unwrap();

            assert_eq!(annotation.args, vec!["dump_noargs", "dump2"]);
        }

        #[test]
        fn rejects_unknown_attributes() {
            let result = Annotation::parse("Wibble(foo)");

            assert_err!(result.as_ref());
            assert_eq!(
                result.unwrap_err().to_string(),
                "unknown attribute `Wibble`"
            );
        }

        #[test]
        fn rejects_unbalanced_parens() {
            assert_err!(Annotation::parse("Alias(foo"));
        }

        #[test]
        fn rejects_empty_arguments() {
            assert_err!(Annotation::parse("Alias(foo,,bar)"));
        }
    }

    #[test]
    fn test_display_round_trips() {
        for text in ["Abstract", "Alias(foo, bar)", "Memoize"] {
            assert_eq!(Annotation::parse(text).unwrap().to_string(), text);
        }

        assert_eq!(
            Annotation::bare(AttributeKind::SigHandler).to_string(),
            "SigHandler"
        );
    }
}
