// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Time related utils.

use crate::{Error, Result};
use chrono::{TimeDelta, Utc};
use std::time::Duration;

/// DateTime is the alias for chrono::DateTime<Utc>.
pub type DateTime = chrono::DateTime<Utc>;

pub use chrono::FixedOffset;

/// Offset of China Standard Time (UTC+8) in seconds.
///
/// Minute-granularity CDN signatures are formatted in this zone.
pub const CST_OFFSET_SECONDS: i32 = 8 * 60 * 60;

/// Create a new DateTime of now.
pub fn now() -> DateTime {
    Utc::now()
}

/// China Standard Time as a fixed offset.
pub fn cst() -> FixedOffset {
    FixedOffset::east_opt(CST_OFFSET_SECONDS).expect("in bounds")
}

/// Format time into date: `20220301`
pub fn format_date(t: DateTime) -> String {
    t.format("%Y%m%d").to_string()
}

/// Format time into ISO8601: `20220313T072004Z`
pub fn format_iso8601(t: DateTime) -> String {
    t.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Format time into ISO8601 with separators and milliseconds: `2022-03-13T07:20:04.000Z`
///
/// This is the expiration format of POST policy documents.
pub fn format_iso8601_millis(t: DateTime) -> String {
    t.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Format time into minutes in the given zone: `202203131520`
pub fn format_minute(t: DateTime, tz: FixedOffset) -> String {
    t.with_timezone(&tz).format("%Y%m%d%H%M").to_string()
}

/// Add a std duration to the time.
pub fn add_duration(t: DateTime, d: Duration) -> Result<DateTime> {
    let delta = TimeDelta::from_std(d)
        .map_err(|e| Error::request_invalid(format!("invalid expiration duration: {e}")))?;
    t.checked_add_signed(delta)
        .ok_or_else(|| Error::request_invalid("expiration duration overflows"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_time() -> DateTime {
        Utc.with_ymd_and_hms(2022, 3, 1, 8, 12, 34).unwrap()
    }

    #[test]
    fn test_format_date() {
        assert_eq!("20220301", format_date(test_time()))
    }

    #[test]
    fn test_format_iso8601() {
        assert_eq!("20220301T081234Z", format_iso8601(test_time()))
    }

    #[test]
    fn test_format_iso8601_millis() {
        assert_eq!("2022-03-01T08:12:34.000Z", format_iso8601_millis(test_time()))
    }

    #[test]
    fn test_format_minute_in_cst() {
        assert_eq!("202203011612", format_minute(test_time(), cst()));

        // Crossing midnight in CST moves the date forward.
        let late = Utc.with_ymd_and_hms(2022, 3, 1, 17, 5, 0).unwrap();
        assert_eq!("202203020105", format_minute(late, cst()));
    }

    #[test]
    fn test_add_duration() {
        let t = add_duration(test_time(), Duration::from_secs(60)).unwrap();
        assert_eq!("20220301T081334Z", format_iso8601(t));
    }
}
