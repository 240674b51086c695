/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::time::SystemTime;

const DATE_TIME_FORMAT: &str = "%Y%m%dT%H%M%SZ";
const DATE_FORMAT: &str = "%Y%m%d";

/// Formats a time as the date portion of a SigV4 scope, e.g. `20150830`
pub fn format_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format(DATE_FORMAT).to_string()
}

/// Formats a time for the `x-amz-date` header, e.g. `20150830T123600Z`
pub fn format_date_time(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format(DATE_TIME_FORMAT)
        .to_string()
}

pub fn parse_date(date_str: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(date_str, DATE_FORMAT)
}

pub fn parse_date_time(date_time_str: &str) -> Result<SystemTime, chrono::ParseError> {
    let naive = NaiveDateTime::parse_from_str(date_time_str, DATE_TIME_FORMAT)?;
    Ok(Utc.from_utc_datetime(&naive).into())
}

#[cfg(test)]
mod test {
    use super::{format_date, format_date_time, parse_date, parse_date_time};
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn date_time_roundtrip() {
        let time = UNIX_EPOCH + Duration::from_secs(1440938160);
        assert_eq!(format_date_time(time), "20150830T123600Z");
        assert_eq!(format_date(time), "20150830");
        assert_eq!(parse_date_time("20150830T123600Z").unwrap(), time);
    }

    #[test]
    fn parse_invalid() {
        parse_date_time("2015-08-30T12:36:00Z").expect_err("wrong format");
        parse_date("20151330").expect_err("no month 13");
        assert_eq!(parse_date("20150830").unwrap().to_string(), "2015-08-30");
    }
}
