use modular_bitfield::prelude::*;
use serde::{Deserialize, Serialize};

/// A struct to keep track of which attributes have been applied to a
/// binding. Purely informational; the behavior itself lives in the
/// installed function body.
#[bitfield(filled = false)]
#[derive(Debug, Copy, Clone, Eq, PartialOrd, PartialEq, Hash, Default, Serialize, Deserialize)]
pub struct AttrFlags {
    pub memoized: bool,
    pub abstract_method: bool,
    pub aliased: bool,
    pub signal_handler: bool,
}

impl AttrFlags {
    /// Has nothing been applied?
    #[inline]
    pub fn plain(&self) -> bool {
        !(self.memoized() || self.abstract_method() || self.aliased() || self.signal_handler())
    }
}

impl<T> From<&[T]> for AttrFlags
where
    T: AsRef<str>,
{
    fn from(vec: &[T]) -> Self {
        let mut flags = Self::default();
        for s in vec {
            match s.as_ref() {
                "memoized" => {
                    flags.set_memoized(true);
                }
                "abstract" => {
                    flags.set_abstract_method(true);
                }
                "aliased" => {
                    flags.set_aliased(true);
                }
                "sig_handler" => {
                    flags.set_signal_handler(true);
                }
                _ => {}
            }
        }

        flags
    }
}
