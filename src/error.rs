// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;

/// The error type used throughout the crate: a human-readable message.
#[derive(Debug)]
pub struct ErrorReport {
    message: String,
}

impl ErrorReport {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for ErrorReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for ErrorReport {}

pub type Fallible<T> = Result<T, ErrorReport>;

pub fn fail<T>(message: impl Into<String>) -> Fallible<T> {
    Err(ErrorReport::new(message))
}

impl From<std::io::Error> for ErrorReport {
    fn from(value: std::io::Error) -> Self {
        ErrorReport::new(format!("I/O error: {value}"))
    }
}

impl From<rusqlite::Error> for ErrorReport {
    fn from(value: rusqlite::Error) -> Self {
        ErrorReport::new(format!("database error: {value}"))
    }
}

impl From<serde_json::Error> for ErrorReport {
    fn from(value: serde_json::Error) -> Self {
        ErrorReport::new(format!("JSON error: {value}"))
    }
}

impl From<toml::de::Error> for ErrorReport {
    fn from(value: toml::de::Error) -> Self {
        ErrorReport::new(format!("TOML error: {value}"))
    }
}

impl From<walkdir::Error> for ErrorReport {
    fn from(value: walkdir::Error) -> Self {
        ErrorReport::new(format!("directory traversal error: {value}"))
    }
}

impl From<csv::Error> for ErrorReport {
    fn from(value: csv::Error) -> Self {
        ErrorReport::new(format!("CSV error: {value}"))
    }
}

impl From<chrono::ParseError> for ErrorReport {
    fn from(value: chrono::ParseError) -> Self {
        ErrorReport::new(format!("invalid timestamp: {value}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fail() {
        let result: Fallible<()> = fail("something went wrong");
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "something went wrong");
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ErrorReport = io.into();
        assert_eq!(err.message(), "I/O error: missing");
    }
}
