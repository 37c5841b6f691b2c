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

use std::fmt::Display;
use std::fmt::Formatter;

use rusqlite::ToSql;
use rusqlite::types::FromSql;
use rusqlite::types::FromSqlError;
use rusqlite::types::FromSqlResult;
use rusqlite::types::ToSqlOutput;
use rusqlite::types::ValueRef;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::fail;

/// Review interval in days, indexed by box number minus one.
const INTERVAL_DAYS: [i64; 5] = [1, 3, 7, 14, 30];

/// Display names, indexed by box number minus one.
const LABELS: [&str; 5] = [
    "Daily Review",
    "Every 3 Days",
    "Weekly",
    "Bi-weekly",
    "Monthly",
];

/// Label for a box number outside [1, 5].
pub const UNKNOWN_LABEL: &str = "Unknown";

/// A Leitner box. Always in [1, 5].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct LeitnerBox(u8);

impl LeitnerBox {
    pub const FIRST: LeitnerBox = LeitnerBox(1);
    pub const LAST: LeitnerBox = LeitnerBox(5);

    /// Returns `None` if `number` is not in [1, 5].
    pub fn new(number: u8) -> Option<Self> {
        if (Self::FIRST.0..=Self::LAST.0).contains(&number) {
            Some(Self(number))
        } else {
            None
        }
    }

    /// All five boxes, in order.
    pub fn all() -> impl Iterator<Item = LeitnerBox> {
        (Self::FIRST.0..=Self::LAST.0).map(LeitnerBox)
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// The next box up. The last box saturates.
    pub fn promote(self) -> Self {
        if self == Self::LAST {
            self
        } else {
            Self(self.0 + 1)
        }
    }

    pub fn interval_days(self) -> i64 {
        INTERVAL_DAYS[self.index()]
    }

    pub fn label(self) -> &'static str {
        LABELS[self.index()]
    }

    pub fn tier(self) -> BoxTier {
        match self.0 {
            1 => BoxTier::Urgent,
            2 => BoxTier::Shaky,
            3 => BoxTier::Developing,
            4 => BoxTier::Solid,
            _ => BoxTier::Settled,
        }
    }

    fn index(self) -> usize {
        usize::from(self.0 - 1)
    }
}

impl TryFrom<u8> for LeitnerBox {
    type Error = ErrorReport;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match LeitnerBox::new(value) {
            Some(b) => Ok(b),
            None => fail(format!("Invalid Leitner box: {value}")),
        }
    }
}

impl From<LeitnerBox> for u8 {
    fn from(value: LeitnerBox) -> Self {
        value.0
    }
}

impl Display for LeitnerBox {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ToSql for LeitnerBox {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for LeitnerBox {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let number: u8 = FromSql::column_result(value)?;
        LeitnerBox::try_from(number).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// Presentation category of a box, from most to least in need of review.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BoxTier {
    Urgent,
    Shaky,
    Developing,
    Solid,
    Settled,
    /// Out-of-range box number.
    Unknown,
}

impl BoxTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoxTier::Urgent => "urgent",
            BoxTier::Shaky => "shaky",
            BoxTier::Developing => "developing",
            BoxTier::Solid => "solid",
            BoxTier::Settled => "settled",
            BoxTier::Unknown => "unknown",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            BoxTier::Urgent => "red",
            BoxTier::Shaky => "orange",
            BoxTier::Developing => "yellow",
            BoxTier::Solid => "blue",
            BoxTier::Settled => "green",
            BoxTier::Unknown => "gray",
        }
    }
}
