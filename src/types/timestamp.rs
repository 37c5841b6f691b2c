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

use chrono::DateTime;
use chrono::Duration;
use chrono::Local;
use chrono::SecondsFormat;
use chrono::SubsecRound;
use chrono::Utc;
use rusqlite::ToSql;
use rusqlite::types::FromSql;
use rusqlite::types::FromSqlError;
use rusqlite::types::FromSqlResult;
use rusqlite::types::ToSqlOutput;
use rusqlite::types::ValueRef;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

use crate::error::Fallible;

/// A point in time, stored in UTC.
///
/// Held at millisecond precision and serialized as RFC 3339 with a `Z` suffix,
/// so a timestamp survives a round trip through the database unchanged and
/// the textual form sorts in the same order as the timestamps themselves.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn new(ts: DateTime<Utc>) -> Self {
        Self(ts.trunc_subsecs(3))
    }

    pub fn now() -> Self {
        Self::new(Utc::now())
    }

    pub fn parse(s: &str) -> Fallible<Self> {
        let ts = DateTime::parse_from_rfc3339(s)?;
        Ok(Self::new(ts.with_timezone(&Utc)))
    }

    pub fn into_inner(self) -> DateTime<Utc> {
        self.0
    }

    pub fn plus_days(self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    /// Signed number of milliseconds from `self` until `other`.
    pub fn millis_until(self, other: Timestamp) -> i64 {
        (other.0 - self.0).num_milliseconds()
    }

    /// The start of the local calendar day containing this timestamp.
    pub fn start_of_local_day(self) -> Self {
        let local = self.0.with_timezone(&Local);
        let midnight = local
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .and_then(|naive| naive.and_local_timezone(Local).earliest());
        match midnight {
            Some(midnight) => Self(midnight.with_timezone(&Utc)),
            // Midnight does not exist locally (DST gap); fall back to a day ago.
            None => self.plus_days(-1),
        }
    }

    pub fn to_rfc3339(self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_rfc3339())
    }
}

impl ToSql for Timestamp {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_rfc3339()))
    }
}

impl FromSql for Timestamp {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let string: String = FromSql::column_result(value)?;
        let ts =
            DateTime::parse_from_rfc3339(&string).map_err(|e| FromSqlError::Other(Box::new(e)))?;
        Ok(Timestamp::new(ts.with_timezone(&Utc)))
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let string = String::deserialize(deserializer)?;
        Timestamp::parse(&string).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn ts(h: u32, m: u32) -> Timestamp {
        Timestamp::new(Utc.with_ymd_and_hms(2025, 3, 1, h, m, 0).unwrap())
    }

    #[test]
    fn test_rfc3339_format() {
        assert_eq!(ts(9, 30).to_string(), "2025-03-01T09:30:00.000Z");
    }

    #[test]
    fn test_parse_browser_iso_string() -> Fallible<()> {
        let parsed = Timestamp::parse("2025-03-01T09:30:00.000Z")?;
        assert_eq!(parsed, ts(9, 30));
        let offset = Timestamp::parse("2025-03-01T10:30:00+01:00")?;
        assert_eq!(offset, ts(9, 30));
        Ok(())
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Timestamp::parse("yesterday").is_err());
    }

    #[test]
    fn test_plus_days_and_millis() {
        let start = ts(12, 0);
        let later = start.plus_days(3);
        assert_eq!(start.millis_until(later), 3 * 24 * 60 * 60 * 1000);
        assert_eq!(later.millis_until(start), -3 * 24 * 60 * 60 * 1000);
    }

    #[test]
    fn test_start_of_local_day() {
        let now = ts(15, 45);
        let start = now.start_of_local_day();
        assert!(start <= now);
        assert!(start.millis_until(now) < 25 * 60 * 60 * 1000);
    }

    #[test]
    fn test_sub_millisecond_precision_is_dropped() -> Fallible<()> {
        let precise = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap()
            + Duration::nanoseconds(714_433_873);
        let ts = Timestamp::new(precise);
        assert_eq!(ts.to_string(), "2025-03-01T09:30:00.714Z");
        assert_eq!(Timestamp::parse(&ts.to_string())?, ts);
        let parsed = Timestamp::parse("2025-03-01T09:30:00.714433873Z")?;
        assert_eq!(parsed, ts);
        Ok(())
    }

    #[test]
    fn test_now_round_trips_through_text() -> Fallible<()> {
        let now = Timestamp::now();
        assert_eq!(Timestamp::parse(&now.to_string())?, now);
        Ok(())
    }

    #[test]
    fn test_serde() -> Fallible<()> {
        let json = serde_json::to_string(&ts(0, 5))?;
        assert_eq!(json, "\"2025-03-01T00:05:00.000Z\"");
        let back: Timestamp = serde_json::from_str(&json)?;
        assert_eq!(back, ts(0, 5));
        Ok(())
    }
}
