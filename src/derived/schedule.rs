// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Day-of-week rules for stateful switches.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Rule deciding on which days a stateful switch reads as on.
///
/// Days are numbered the way the configuration writes them: 0 is Sunday,
/// 6 is Saturday.
///
/// # Examples
///
/// ```
/// use accessory_bridge::derived::DayRule;
/// use chrono::Weekday;
///
/// let weekend = DayRule::DayOfTheWeekGroup { days: vec![0, 6] };
/// assert!(weekend.is_active_on(Weekday::Sat));
/// assert!(!weekend.is_active_on(Weekday::Mon));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DayRule {
    /// On for exactly one day of the week.
    #[serde(rename = "dayOfTheWeek")]
    DayOfTheWeek {
        /// Day index, 0 = Sunday.
        day: u8,
    },
    /// On for any day in the group.
    #[serde(rename = "dayOfTheWeekGroup")]
    DayOfTheWeekGroup {
        /// Day indices, 0 = Sunday.
        days: Vec<u8>,
    },
}

impl DayRule {
    /// Evaluates the rule for a weekday.
    #[must_use]
    pub fn is_active_on(&self, weekday: Weekday) -> bool {
        let index = day_index(weekday);
        match self {
            Self::DayOfTheWeek { day } => *day == index,
            Self::DayOfTheWeekGroup { days } => days.contains(&index),
        }
    }

    /// Evaluates the rule for a calendar date.
    #[must_use]
    pub fn is_active_on_date(&self, date: NaiveDate) -> bool {
        self.is_active_on(date.weekday())
    }
}

/// Sunday-based day index (0 = Sunday).
#[must_use]
pub fn day_index(weekday: Weekday) -> u8 {
    // num_days_from_sunday is always 0..=6
    #[allow(clippy::cast_possible_truncation)]
    let index = weekday.num_days_from_sunday() as u8;
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn single_day_matches_wednesday() {
        let rule = DayRule::DayOfTheWeek { day: 3 };
        // 2024-01-03 was a Wednesday
        assert!(rule.is_active_on_date(date(2024, 1, 3)));
    }

    #[test]
    fn single_day_rejects_other_days() {
        let rule = DayRule::DayOfTheWeek { day: 3 };
        for day in [1, 2, 4, 5, 6, 7] {
            assert!(!rule.is_active_on_date(date(2024, 1, day)), "2024-01-{day}");
        }
    }

    #[test]
    fn weekend_group() {
        let rule = DayRule::DayOfTheWeekGroup { days: vec![0, 6] };
        assert!(rule.is_active_on(Weekday::Sat));
        assert!(rule.is_active_on(Weekday::Sun));
        for weekday in [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
        ] {
            assert!(!rule.is_active_on(weekday));
        }
    }

    #[test]
    fn day_index_is_sunday_based() {
        assert_eq!(day_index(Weekday::Sun), 0);
        assert_eq!(day_index(Weekday::Wed), 3);
        assert_eq!(day_index(Weekday::Sat), 6);
    }

    #[test]
    fn deserializes_tagged_rules() {
        let rule: DayRule = serde_json::from_str(r#"{"type":"dayOfTheWeek","day":3}"#).unwrap();
        assert_eq!(rule, DayRule::DayOfTheWeek { day: 3 });

        let rule: DayRule =
            serde_json::from_str(r#"{"type":"dayOfTheWeekGroup","days":[0,6]}"#).unwrap();
        assert_eq!(rule, DayRule::DayOfTheWeekGroup { days: vec![0, 6] });
    }
}
