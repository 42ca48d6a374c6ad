// Copyright 2025 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fmt;
use std::{error, result};

pub type Ident = String;
pub type ModelName = String;
pub type DimensionName = String;
pub type ElementName = String;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    JsonDeserialization,
    BadDimensionName,
    MismatchedDimensions,
    UnsupportedSubscript,
    BadSubscriptRange,
    EmptyEquation,
    EmptyDimension,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ErrorCode::*;
        let name = match self {
            JsonDeserialization => "json_deserialization",
            BadDimensionName => "bad_dimension_name",
            MismatchedDimensions => "mismatched_dimensions",
            UnsupportedSubscript => "unsupported_subscript",
            BadSubscriptRange => "bad_subscript_range",
            EmptyEquation => "empty_equation",
            EmptyDimension => "empty_dimension",
        };

        write!(f, "{name}")
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Import,
    Model,
    Variable,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ErrorKind::Import => "import",
            ErrorKind::Model => "model",
            ErrorKind::Variable => "variable",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    pub kind: ErrorKind,
    pub code: ErrorCode,
    pub details: Option<String>,
}

impl Error {
    pub fn new(kind: ErrorKind, code: ErrorCode, details: Option<String>) -> Self {
        Error {
            kind,
            code,
            details,
        }
    }

    /// Prefix the error's details with the location it surfaced from,
    /// e.g. the `model.kind.variable` being expanded.
    pub fn context(self, location: &str) -> Self {
        let details = match self.details {
            Some(details) => format!("{location}: {details}"),
            None => location.to_owned(),
        };
        Error {
            details: Some(details),
            ..self
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.details {
            Some(ref details) => write!(f, "{}:{} -- {}", self.kind, self.code, details),
            None => write!(f, "{}:{}", self.kind, self.code),
        }
    }
}

impl error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error {
            kind: ErrorKind::Import,
            code: ErrorCode::JsonDeserialization,
            details: Some(err.to_string()),
        }
    }
}

pub type Result<T> = result::Result<T, Error>;

#[macro_export]
macro_rules! model_err(
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(
            ErrorKind::Model,
            ErrorCode::$code,
            Some($str),
        ))
    }}
);

#[macro_export]
macro_rules! var_err {
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(
            ErrorKind::Variable,
            ErrorCode::$code,
            Some($str),
        ))
    }};
}

#[test]
fn test_error_display() {
    let err = Error::new(
        ErrorKind::Variable,
        ErrorCode::UnsupportedSubscript,
        Some("call(f)".to_owned()),
    );
    assert_eq!("variable:unsupported_subscript -- call(f)", format!("{err}"));

    let err = Error::new(ErrorKind::Model, ErrorCode::EmptyDimension, None);
    assert_eq!("model:empty_dimension", format!("{err}"));
}

#[test]
fn test_error_context() {
    let err = Error::new(ErrorKind::Variable, ErrorCode::MismatchedDimensions, None)
        .context("main.stocks.population");
    assert_eq!(Some("main.stocks.population".to_owned()), err.details);

    let err = Error::new(
        ErrorKind::Variable,
        ErrorCode::BadSubscriptRange,
        Some("range bound 'z' not in dimension".to_owned()),
    )
    .context("main.flows.births[north]");
    assert_eq!(
        "variable:bad_subscript_range -- main.flows.births[north]: range bound 'z' not in dimension",
        format!("{err}")
    );
}

#[test]
fn test_json_error_conversion() {
    let err: Error = serde_json::from_str::<Vec<u32>>("[1, ")
        .map_err(Error::from)
        .unwrap_err();
    assert_eq!(ErrorKind::Import, err.kind);
    assert_eq!(ErrorCode::JsonDeserialization, err.code);
    assert!(err.details.is_some());
}
