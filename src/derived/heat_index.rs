// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Heat index (apparent temperature).
//!
//! Uses the NOAA approach: a simple estimate first, then the Rothfusz
//! regression once the average of the estimate and the air temperature
//! reaches 80 °F, with the two published correction terms.

/// Computes the heat index in °C.
///
/// Returns `None` unless both readings are present. `humidity` is relative
/// humidity in percent (0-100).
///
/// # Examples
///
/// ```
/// use accessory_bridge::derived::heat_index;
///
/// let hi = heat_index(Some(30.0), Some(70.0)).unwrap();
/// assert!((hi - 35.038).abs() < 0.01);
/// assert!(heat_index(Some(30.0), None).is_none());
/// ```
#[must_use]
pub fn heat_index(temperature: Option<f64>, humidity: Option<f64>) -> Option<f64> {
    let (celsius, rh) = (temperature?, humidity?);
    let t = celsius_to_fahrenheit(celsius);

    let simple = 0.5 * (t + 61.0 + (t - 68.0) * 1.2 + rh * 0.094);
    if (simple + t) / 2.0 < 80.0 {
        return Some(fahrenheit_to_celsius(simple));
    }

    let mut hi = rothfusz(t, rh);
    if rh < 13.0 && (80.0..=112.0).contains(&t) {
        hi -= ((13.0 - rh) / 4.0) * ((17.0 - (t - 95.0).abs()) / 17.0).sqrt();
    } else if rh >= 85.0 && (80.0..=87.0).contains(&t) {
        hi += ((rh - 85.0) / 10.0) * ((87.0 - t) / 5.0);
    }

    Some(fahrenheit_to_celsius(hi))
}

fn rothfusz(t: f64, rh: f64) -> f64 {
    -42.379 + 2.049_015_23 * t + 10.143_331_27 * rh
        - 0.224_755_41 * t * rh
        - 0.006_837_83 * t * t
        - 0.054_817_17 * rh * rh
        + 0.001_228_74 * t * t * rh
        + 0.000_852_82 * t * rh * rh
        - 0.000_001_99 * t * t * rh * rh
}

/// Converts °C to °F.
#[must_use]
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Converts °F to °C.
#[must_use]
pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}
