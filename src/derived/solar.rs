// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Solar event windows.
//!
//! An [`Ephemeris`] holds one day's worth of event timestamps. Each tick the
//! solar accessory asks which events are "happening now", i.e. whether the
//! current local time lies strictly inside the event's tolerance window.

use std::fmt;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::Deserialize;

use crate::error::ParseError;

/// The six tracked solar events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum SolarEvent {
    /// Sun crosses the horizon in the morning.
    Sunrise,
    /// Sun crosses the horizon in the evening.
    Sunset,
    /// Sun at its highest point.
    SolarNoon,
    /// Start of the evening golden hour.
    GoldenHour,
    /// Civil dawn.
    Dawn,
    /// Civil dusk.
    Dusk,
}

impl SolarEvent {
    /// All events, in the order they are evaluated.
    pub const ALL: [SolarEvent; 6] = [
        Self::Sunrise,
        Self::Sunset,
        Self::SolarNoon,
        Self::GoldenHour,
        Self::Dawn,
        Self::Dusk,
    ];

    /// Half-width of the detection window around the event.
    #[must_use]
    pub const fn tolerance(self) -> Duration {
        match self {
            Self::Sunrise | Self::Sunset => Duration::from_secs(10),
            Self::SolarNoon => Duration::from_secs(45 * 60),
            Self::GoldenHour | Self::Dawn | Self::Dusk => Duration::from_secs(15 * 60),
        }
    }

    /// Display name of the event's motion sensor.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sunrise => "Sunrise",
            Self::Sunset => "Sunset",
            Self::SolarNoon => "Noon",
            Self::GoldenHour => "GoldenHour",
            Self::Dawn => "Dawn",
            Self::Dusk => "Dusk",
        }
    }
}

impl fmt::Display for SolarEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One calendar day of solar event times, in local time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ephemeris {
    date: NaiveDate,
    sunrise: NaiveTime,
    sunset: NaiveTime,
    solar_noon: NaiveTime,
    golden_hour: NaiveTime,
    dawn: NaiveTime,
    dusk: NaiveTime,
}

/// `results` object of the sunrisesunset.io API.
#[derive(Debug, Clone, Deserialize)]
pub struct EphemerisPayload {
    date: String,
    sunrise: String,
    sunset: String,
    solar_noon: String,
    golden_hour: String,
    dawn: String,
    dusk: String,
}

impl Ephemeris {
    /// Builds a snapshot from already parsed values.
    #[must_use]
    pub fn new(date: NaiveDate, times: [NaiveTime; 6]) -> Self {
        let [sunrise, sunset, solar_noon, golden_hour, dawn, dusk] = times;
        Self {
            date,
            sunrise,
            sunset,
            solar_noon,
            golden_hour,
            dawn,
            dusk,
        }
    }

    /// Parses the API payload (`YYYY-MM-DD` date, `HH:MM:SS` times).
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidValue` naming the first field that does not
    /// parse.
    pub fn from_payload(payload: &EphemerisPayload) -> Result<Self, ParseError> {
        let date = NaiveDate::parse_from_str(&payload.date, "%Y-%m-%d").map_err(|e| {
            ParseError::InvalidValue {
                field: "date".to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(Self::new(
            date,
            [
                parse_time("sunrise", &payload.sunrise)?,
                parse_time("sunset", &payload.sunset)?,
                parse_time("solar_noon", &payload.solar_noon)?,
                parse_time("golden_hour", &payload.golden_hour)?,
                parse_time("dawn", &payload.dawn)?,
                parse_time("dusk", &payload.dusk)?,
            ],
        ))
    }

    /// The day this snapshot describes.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// A snapshot is stale once the wall-clock date moved past it.
    #[must_use]
    pub fn is_stale(&self, today: NaiveDate) -> bool {
        self.date != today
    }

    /// Full local timestamp of an event.
    #[must_use]
    pub fn timestamp(&self, event: SolarEvent) -> NaiveDateTime {
        let time = match event {
            SolarEvent::Sunrise => self.sunrise,
            SolarEvent::Sunset => self.sunset,
            SolarEvent::SolarNoon => self.solar_noon,
            SolarEvent::GoldenHour => self.golden_hour,
            SolarEvent::Dawn => self.dawn,
            SolarEvent::Dusk => self.dusk,
        };
        self.date.and_time(time)
    }

    /// Whether `now` lies strictly inside the event's window.
    #[must_use]
    pub fn is_detected(&self, event: SolarEvent, now: NaiveDateTime) -> bool {
        let at = self.timestamp(event);
        let spread = TimeDelta::from_std(event.tolerance()).unwrap_or(TimeDelta::zero());
        now > at - spread && now < at + spread
    }

    /// Detection result for every event.
    #[must_use]
    pub fn detect_all(&self, now: NaiveDateTime) -> [(SolarEvent, bool); 6] {
        SolarEvent::ALL.map(|event| (event, self.is_detected(event, now)))
    }
}

fn parse_time(field: &str, value: &str) -> Result<NaiveTime, ParseError> {
    NaiveTime::parse_from_str(value, "%H:%M:%S").map_err(|e| ParseError::InvalidValue {
        field: field.to_string(),
        message: format!("{value}: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> EphemerisPayload {
        serde_json::from_value(serde_json::json!({
            "date": "2024-06-21",
            "sunrise": "05:29:10",
            "sunset": "22:01:45",
            "first_light": "03:10:02",
            "last_light": "00:20:53",
            "dawn": "04:44:03",
            "dusk": "22:46:52",
            "solar_noon": "13:45:27",
            "golden_hour": "21:12:33",
            "day_length": "16:32:35"
        }))
        .unwrap()
    }

    fn at(time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("2024-06-21 {time}"), "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn parses_api_payload() {
        let eph = Ephemeris::from_payload(&payload()).unwrap();
        assert_eq!(eph.date(), NaiveDate::from_ymd_opt(2024, 6, 21).unwrap());
        assert_eq!(eph.timestamp(SolarEvent::Sunrise), at("05:29:10"));
        assert_eq!(eph.timestamp(SolarEvent::SolarNoon), at("13:45:27"));
    }

    #[test]
    fn rejects_malformed_time() {
        let mut bad = payload();
        bad.dusk = "late".to_string();
        let err = Ephemeris::from_payload(&bad).unwrap_err();
        assert!(matches!(err, ParseError::InvalidValue { field, .. } if field == "dusk"));
    }

    #[test]
    fn sunrise_window_is_ten_seconds() {
        let eph = Ephemeris::from_payload(&payload()).unwrap();
        assert!(eph.is_detected(SolarEvent::Sunrise, at("05:29:10")));
        assert!(eph.is_detected(SolarEvent::Sunrise, at("05:29:19")));
        assert!(!eph.is_detected(SolarEvent::Sunrise, at("05:29:20")));
        assert!(!eph.is_detected(SolarEvent::Sunrise, at("05:29:00")));
        assert!(eph.is_detected(SolarEvent::Sunrise, at("05:29:01")));
    }

    #[test]
    fn noon_window_is_forty_five_minutes() {
        let eph = Ephemeris::from_payload(&payload()).unwrap();
        assert!(eph.is_detected(SolarEvent::SolarNoon, at("13:01:00")));
        assert!(eph.is_detected(SolarEvent::SolarNoon, at("14:30:00")));
        assert!(!eph.is_detected(SolarEvent::SolarNoon, at("14:31:00")));
    }

    #[test]
    fn golden_hour_dawn_dusk_windows_are_fifteen_minutes() {
        let eph = Ephemeris::from_payload(&payload()).unwrap();
        assert!(eph.is_detected(SolarEvent::GoldenHour, at("21:00:00")));
        assert!(!eph.is_detected(SolarEvent::GoldenHour, at("20:57:33")));
        assert!(eph.is_detected(SolarEvent::Dawn, at("04:55:00")));
        assert!(!eph.is_detected(SolarEvent::Dawn, at("05:00:00")));
        assert!(eph.is_detected(SolarEvent::Dusk, at("22:35:00")));
    }

    #[test]
    fn detect_all_covers_every_event() {
        let eph = Ephemeris::from_payload(&payload()).unwrap();
        let result = eph.detect_all(at("13:45:27"));
        assert_eq!(result.len(), 6);
        let detected: Vec<_> = result.iter().filter(|(_, d)| *d).map(|(e, _)| *e).collect();
        assert_eq!(detected, vec![SolarEvent::SolarNoon]);
    }

    #[test]
    fn stale_once_date_changes() {
        let eph = Ephemeris::from_payload(&payload()).unwrap();
        assert!(!eph.is_stale(NaiveDate::from_ymd_opt(2024, 6, 21).unwrap()));
        assert!(eph.is_stale(NaiveDate::from_ymd_opt(2024, 6, 22).unwrap()));
    }
}
