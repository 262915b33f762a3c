use std::{
    fmt::{Display, Formatter},
    panic::Location,
};

use serde::{Deserialize, Serialize};
use ustr::{ustr, Ustr};

/// The source location of a call, for use in error messaging. This is
/// the runtime's stand-in for a code span: attribute-installed stubs
/// report where they were called *from*, not where they were defined.
#[derive(Hash, Debug, Copy, Clone, Eq, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct CallSite {
    /// The file the call was made from
    pub file: Ustr,
    /// The 1-based line of the call
    pub line: u32,
    /// The 1-based column of the call
    pub column: u32,
}

impl CallSite {
    /// Capture the location of my caller. Functions that pass this
    /// further down should themselves be `#[track_caller]`.
    #[track_caller]
    pub fn here() -> Self {
        Self::from(Location::caller())
    }
}

impl From<&Location<'_>> for CallSite {
    fn from(location: &Location<'_>) -> Self {
        Self {
            file: ustr(location.file()),
            line: location.line(),
            column: location.column(),
        }
    }
}

impl Display for CallSite {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} line {}", self.file, self.line)
    }
}
