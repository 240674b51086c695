/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use std::error::Error;
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A point in time with nanosecond precision, independent of the local clock
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct Instant {
    seconds: i64,
    subsecond_nanos: u32,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Format {
    /// RFC-3339, eg. `2021-06-29T18:20:33.000Z`
    DateTime,
    EpochSeconds,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct InstantParseError {
    input: String,
}

impl fmt::Display for InstantParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` is not a valid timestamp", self.input)
    }
}

impl Error for InstantParseError {}

impl Instant {
    pub fn from_epoch_seconds(epoch_seconds: i64) -> Self {
        Instant {
            seconds: epoch_seconds,
            subsecond_nanos: 0,
        }
    }

    pub fn from_secs_and_nanos(seconds: i64, subsecond_nanos: u32) -> Self {
        Instant {
            seconds,
            subsecond_nanos,
        }
    }

    pub fn from_system_time(system_time: SystemTime) -> Self {
        match system_time.duration_since(UNIX_EPOCH) {
            Ok(after) => Instant {
                seconds: after.as_secs() as i64,
                subsecond_nanos: after.subsec_nanos(),
            },
            Err(before) => {
                let before = before.duration();
                let mut seconds = -(before.as_secs() as i64);
                let mut nanos = before.subsec_nanos();
                if nanos > 0 {
                    seconds -= 1;
                    nanos = 1_000_000_000 - nanos;
                }
                Instant {
                    seconds,
                    subsecond_nanos: nanos,
                }
            }
        }
    }

    pub fn from_str(s: &str, format: Format) -> Result<Self, InstantParseError> {
        let err = || InstantParseError {
            input: s.to_string(),
        };
        match format {
            Format::DateTime => {
                let parsed = DateTime::parse_from_rfc3339(s).map_err(|_| err())?;
                Ok(Instant::from_secs_and_nanos(
                    parsed.timestamp(),
                    parsed.timestamp_subsec_nanos(),
                ))
            }
            Format::EpochSeconds => {
                let mut parts = s.splitn(2, '.');
                let seconds = parts
                    .next()
                    .and_then(|secs| secs.parse::<i64>().ok())
                    .ok_or_else(err)?;
                let nanos = match parts.next() {
                    None => 0,
                    Some(frac) if frac.len() <= 9 && frac.bytes().all(|b| b.is_ascii_digit()) => {
                        format!("{:0<9}", frac).parse::<u32>().map_err(|_| err())?
                    }
                    Some(_) => return Err(err()),
                };
                Ok(Instant::from_secs_and_nanos(seconds, nanos))
            }
        }
    }

    fn to_chrono(self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.seconds, self.subsecond_nanos).single()
    }

    pub fn epoch_seconds(&self) -> i64 {
        self.seconds
    }

    pub fn epoch_subsecond_nanos(&self) -> u32 {
        self.subsecond_nanos
    }

    pub fn to_system_time(&self) -> Option<SystemTime> {
        if self.seconds >= 0 {
            UNIX_EPOCH.checked_add(Duration::new(self.seconds as u64, self.subsecond_nanos))
        } else {
            UNIX_EPOCH
                .checked_sub(Duration::from_secs(self.seconds.unsigned_abs()))?
                .checked_add(Duration::from_nanos(self.subsecond_nanos as u64))
        }
    }

    pub fn fmt(&self, format: Format) -> String {
        match format {
            Format::DateTime => match self.to_chrono() {
                Some(date_time) => date_time.to_rfc3339_opts(SecondsFormat::AutoSi, true),
                None => self.fmt(Format::EpochSeconds),
            },
            Format::EpochSeconds => {
                if self.subsecond_nanos == 0 {
                    format!("{}", self.seconds)
                } else {
                    let fraction = format!("{:0>9}", self.subsecond_nanos);
                    format!("{}.{}", self.seconds, fraction.trim_end_matches('0'))
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Format, Instant};
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn parse_ec2_timestamps() {
        let instant = Instant::from_str("2021-06-29T18:20:33.000Z", Format::DateTime).unwrap();
        assert_eq!(instant.epoch_seconds(), 1624990833);
        assert_eq!(instant.fmt(Format::DateTime), "2021-06-29T18:20:33Z");

        let instant = Instant::from_str("2019-12-16T23:48:18.52Z", Format::DateTime).unwrap();
        assert_eq!(instant, Instant::from_secs_and_nanos(1576540098, 520_000_000));
        assert_eq!(instant.fmt(Format::EpochSeconds), "1576540098.52");
    }

    #[test]
    fn parse_epoch_seconds() {
        assert_eq!(
            Instant::from_str("1576540098.52", Format::EpochSeconds).unwrap(),
            Instant::from_secs_and_nanos(1576540098, 520_000_000)
        );
        assert_eq!(
            Instant::from_str("1576540098", Format::EpochSeconds).unwrap(),
            Instant::from_epoch_seconds(1576540098)
        );
        assert!(Instant::from_str("15765.4.0098", Format::EpochSeconds).is_err());
        assert!(Instant::from_str("not a date", Format::DateTime).is_err());
    }

    #[test]
    fn system_time_conversion() {
        let time = UNIX_EPOCH + Duration::new(1613414417, 5);
        let instant = Instant::from_system_time(time);
        assert_eq!(instant, Instant::from_secs_and_nanos(1613414417, 5));
        assert_eq!(instant.to_system_time(), Some(time));

        let before_epoch = UNIX_EPOCH - Duration::new(1, 500_000_000);
        let instant = Instant::from_system_time(before_epoch);
        assert_eq!(instant, Instant::from_secs_and_nanos(-2, 500_000_000));
        assert_eq!(instant.to_system_time(), Some(before_epoch));
    }

    proptest::proptest! {
        #[test]
        fn date_time_format_is_lossless(seconds in 0_i64..253_402_300_799, nanos in 0_u32..1_000_000_000) {
            let instant = Instant::from_secs_and_nanos(seconds, nanos);
            let formatted = instant.fmt(Format::DateTime);
            proptest::prop_assert_eq!(Instant::from_str(&formatted, Format::DateTime), Ok(instant));
        }
    }
}
