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

use rusqlite::ToSql;
use rusqlite::types::FromSql;
use rusqlite::types::FromSqlError;
use rusqlite::types::FromSqlResult;
use rusqlite::types::ToSqlOutput;
use rusqlite::types::ValueRef;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::fail;

/// The result of a single review.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    Correct,
    Incorrect,
}

impl Outcome {
    pub fn is_correct(self) -> bool {
        self == Outcome::Correct
    }

    pub fn as_str(&self) -> &str {
        match self {
            Outcome::Correct => "correct",
            Outcome::Incorrect => "incorrect",
        }
    }
}

impl From<bool> for Outcome {
    fn from(is_correct: bool) -> Self {
        if is_correct {
            Outcome::Correct
        } else {
            Outcome::Incorrect
        }
    }
}

impl TryFrom<i64> for Outcome {
    type Error = ErrorReport;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Outcome::Incorrect),
            1 => Ok(Outcome::Correct),
            _ => fail(format!("Invalid review outcome: {value}")),
        }
    }
}

impl ToSql for Outcome {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.is_correct()))
    }
}

impl FromSql for Outcome {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let n: i64 = FromSql::column_result(value)?;
        Outcome::try_from(n).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bool() {
        assert_eq!(Outcome::from(true), Outcome::Correct);
        assert_eq!(Outcome::from(false), Outcome::Incorrect);
    }

    #[test]
    fn test_try_from_integer() {
        assert_eq!(Outcome::try_from(1i64).unwrap(), Outcome::Correct);
        assert_eq!(Outcome::try_from(0i64).unwrap(), Outcome::Incorrect);
        assert!(Outcome::try_from(2i64).is_err());
    }
}
