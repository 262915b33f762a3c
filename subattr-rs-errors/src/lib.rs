#![forbid(unsafe_code)]

use std::{
    error::Error,
    fmt::{Display, Formatter},
    result,
};

use derive_builder::UninitializedFieldError;
use itertools::Itertools;

use crate::call_site::CallSite;

pub mod call_site;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrErrorSeverity {
    Warning,
    Error,
    Bug,
}

/// A convenience helper for creating a new `AttrError`. (`Error` severity)
#[macro_export]
macro_rules! attr_error {
    ($fmt:literal, $($arg:tt)*) => {
        $crate::AttrError::new(format!($fmt, $($arg)*)).into()
    };
    ($site:expr, $msg:literal $(,)?) => {
        $crate::AttrError::new($msg).with_location($site).into()
    };
    ($site:expr, $fmt:expr, $($arg:tt)*) => {
        $crate::AttrError::new(format!($fmt, $($arg)*)).with_location($site).into()
    };
    ($msg:literal $(,)?) => {
        $crate::AttrError::new($msg).into()
    };
    ($err:expr $(,)?) => {
        $crate::AttrError::new($err).into()
    };
}

/// A convenience helper for creating a new `AttrError`. (`Warning` severity)
#[macro_export]
macro_rules! attr_warning {
    ($fmt:literal, $($arg:tt)*) => {
        $crate::AttrError::new_warning(format!($fmt, $($arg)*)).into()
    };
    ($site:expr, $msg:literal $(,)?) => {
        $crate::AttrError::new_warning($msg).with_location($site).into()
    };
    ($site:expr, $fmt:expr, $($arg:tt)*) => {
        $crate::AttrError::new_warning(format!($fmt, $($arg)*)).with_location($site).into()
    };
    ($msg:literal $(,)?) => {
        $crate::AttrError::new_warning($msg).into()
    };
    ($err:expr $(,)?) => {
        $crate::AttrError::new_warning($err).into()
    };
}

/// A convenience helper for creating a new `AttrError`. (`Bug` severity)
#[macro_export]
macro_rules! attr_bug {
    ($fmt:literal, $($arg:tt)*) => {
        $crate::AttrError::new_bug(format!($fmt, $($arg)*)).into()
    };
    ($site:expr, $msg:literal $(,)?) => {
        $crate::AttrError::new_bug($msg).with_location($site).into()
    };
    ($site:expr, $fmt:expr, $($arg:tt)*) => {
        $crate::AttrError::new_bug(format!($fmt, $($arg)*)).with_location($site).into()
    };
    ($msg:literal $(,)?) => {
        $crate::AttrError::new_bug($msg).into()
    };
    ($err:expr $(,)?) => {
        $crate::AttrError::new_bug($err).into()
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttrError {
    /// The main message to be printed out
    message: String,
    /// The call location that triggered this error, if one was captured
    pub location: Option<CallSite>,
    /// Additional text notes, suggestions, etc. to be printed to the user.
    notes: Vec<String>,
    /// The severity of this error. Warnings are reported, but do not
    /// stop anything.
    pub severity: AttrErrorSeverity,
}

impl AttrError {
    /// Create a new `AttrError` with severity [`AttrErrorSeverity::Error`],
    /// and a message
    pub fn new<T>(message: T) -> Self
    where
        T: Into<String>,
    {
        Self {
            message: message.into(),
            location: None,
            notes: vec![],
            severity: AttrErrorSeverity::Error,
        }
    }

    /// Create a new `AttrError` with severity [`AttrErrorSeverity::Warning`],
    /// and a message
    pub fn new_warning<T>(message: T) -> Self
    where
        T: Into<String>,
    {
        Self {
            message: message.into(),
            location: None,
            notes: vec![],
            severity: AttrErrorSeverity::Warning,
        }
    }

    /// Create a new `AttrError` with severity [`AttrErrorSeverity::Bug`],
    /// and a message
    pub fn new_bug<T>(message: T) -> Self
    where
        T: Into<String>,
    {
        Self {
            message: message.into(),
            location: None,
            notes: vec![],
            severity: AttrErrorSeverity::Bug,
        }
    }

    pub fn is_warning(&self) -> bool {
        self.severity == AttrErrorSeverity::Warning
    }

    pub fn is_error(&self) -> bool {
        self.severity == AttrErrorSeverity::Error
    }

    pub fn is_bug(&self) -> bool {
        self.severity == AttrErrorSeverity::Bug
    }

    /// Set the call location for this error
    pub fn with_location(mut self, location: Option<CallSite>) -> Self {
        self.location = location;

        self
    }

    /// Add some notes to the error
    pub fn with_note<T>(mut self, note: T) -> Self
    where
        T: Into<String>,
    {
        self.notes.push(note.into());

        self
    }

    /// The full report: the message (with location), followed by any notes.
    pub fn diagnostic_string(&self) -> String {
        let mut err = self.to_string();

        if !self.notes.is_empty() {
            err.push('\n');
            err.push_str(&self.notes.iter().join("\n"));
        }

        err.push('\n');

        err
    }
}

impl Display for AttrError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(location) = self.location {
            write!(f, " at {location}")?;
        }

        Ok(())
    }
}

impl Error for AttrError {}

impl AsRef<str> for AttrError {
    fn as_ref(&self) -> &str {
        &self.message
    }
}

impl From<UninitializedFieldError> for AttrError {
    fn from(e: UninitializedFieldError) -> Self {
        Self::new(e.to_string())
    }
}

/// Common `Result` type
pub type Result<T> = result::Result<T, Box<AttrError>>;
