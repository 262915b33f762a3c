use std::fmt::{Display, Formatter};

use phf::phf_set;
use serde::{Deserialize, Serialize};
use ustr::{ustr, Ustr};

/// Name of the pseudo-signal raised when a warning is emitted
pub const WARN_SIGNAL: &str = "__WARN__";

/// Name of the pseudo-signal raised when a fatal error is emitted
pub const DIE_SIGNAL: &str = "__DIE__";

/// The conventional asynchronous signal names. Registration is *not*
/// restricted to these; they only inform logging.
static CONVENTIONAL_SIGNALS: phf::Set<&'static str> = phf_set! {
    "HUP",
    "INT",
    "QUIT",
    "ILL",
    "ABRT",
    "FPE",
    "KILL",
    "SEGV",
    "PIPE",
    "ALRM",
    "TERM",
    "USR1",
    "USR2",
    "CHLD",
    "CONT",
    "STOP",
    "TSTP",
    "TTIN",
    "TTOU",
    "WINCH",
    "IO",
};

/// A signal that a handler can be installed for. The two pseudo-signals
/// are delivered by the error-reporting path rather than the operating
/// system, but dispatch identically.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Signal {
    /// The warning pseudo-signal, `__WARN__`
    Warn,
    /// The fatal-error pseudo-signal, `__DIE__`
    Die,
    /// A true asynchronous signal, by name (e.g. `ALRM`)
    Os(Ustr),
}

impl Signal {
    /// Parse a signal name. Any non-empty name is accepted; there is no
    /// validation layer here.
    pub fn parse<T>(name: T) -> Self
    where
        T: AsRef<str>,
    {
        match name.as_ref() {
            WARN_SIGNAL => Self::Warn,
            DIE_SIGNAL => Self::Die,
            other => Self::Os(ustr(other)),
        }
    }

    /// Is this a name signal delivery is actually expected for?
    pub fn is_conventional(&self) -> bool {
        match self {
            Signal::Warn | Signal::Die => true,
            Signal::Os(name) => CONVENTIONAL_SIGNALS.contains(name.as_str()),
        }
    }
}

impl Display for Signal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Signal::Warn => WARN_SIGNAL,
            Signal::Die => DIE_SIGNAL,
            Signal::Os(name) => name.as_str(),
        };

        write!(f, "{s}")
    }
}

impl From<&str> for Signal {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pseudo_signals() {
        assert_eq!(Signal::parse("__WARN__"), Signal::Warn);
        assert_eq!(Signal::parse("__DIE__"), Signal::Die);
    }

    #[test]
    fn test_parse_os_signal() {
        assert_eq!(Signal::parse("ALRM"), Signal::Os(ustr("ALRM")));
    }

    #[test]
    fn test_is_conventional() {
        assert!(Signal::Warn.is_conventional());
        assert!(Signal::parse("USR1").is_conventional());
        assert!(!Signal::parse("DEFINITELY_NOT_A_SIGNAL").is_conventional());
    }

    #[test]
    fn test_display_round_trips() {
        for name in ["__WARN__", "__DIE__", "ALRM"] {
            assert_eq!(Signal::parse(name).to_string(), name);
        }
    }
}
