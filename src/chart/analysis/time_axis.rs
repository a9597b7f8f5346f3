/*
Copyright 2022 Jakub Lewandowski

This file is part of Isotach Chart (isochart).

Isotach Chart (isochart) is a free software: you can redistribute it and/or modify
it under the terms of the GNU General Public License as published by
the Free Software Foundation; either version 3 of the License, or
(at your option) any later version.

Isotach Chart (isochart) is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
GNU General Public License for more details.

You should have received a copy of the GNU General Public License
along with Isotach Chart (isochart). If not, see https://www.gnu.org/licenses/.
*/

//! Decoding of the CF-style time coordinate of the dataset.
//!
//! Time values in netCDF files are stored as offsets from a
//! reference date, with units such as `hours since 1900-01-01 00:00:00.0`.
//! They are only used to provide a human-readable analysis label.

use crate::errors::InputError;
use crate::Float;
use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Offsets beyond that do not fit into a chrono duration.
const MAX_SECONDS: Float = 9.0e15;

/// Decoded time coordinate.
#[derive(Clone, PartialEq, Debug)]
pub struct TimeAxis {
    reference: NaiveDateTime,
    unit_seconds: Float,
    offsets: Vec<Float>,
}

impl TimeAxis {
    /// Builds the axis from the `units` attribute and raw values of the coordinate.
    pub fn new(units: &str, offsets: Vec<Float>) -> Result<Self, InputError> {
        let (unit_seconds, reference) = parse_units(units)?;

        Ok(TimeAxis {
            reference,
            unit_seconds,
            offsets,
        })
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Datetime at given index, if the index is valid and the
    /// offset fits into the representable range.
    pub fn datetime(&self, index: usize) -> Option<NaiveDateTime> {
        let offset = self.offsets.get(index)?;
        let seconds = (offset * self.unit_seconds).round();

        if !seconds.is_finite() || seconds.abs() > MAX_SECONDS {
            return None;
        }

        self.reference
            .checked_add_signed(Duration::seconds(seconds as i64))
    }
}

/// Splits units string into length of one unit in seconds
/// and the reference datetime.
fn parse_units(units: &str) -> Result<(Float, NaiveDateTime), InputError> {
    let (unit, reference) = units
        .split_once(" since ")
        .ok_or_else(|| InputError::TimeUnits(units.to_string()))?;

    let unit_seconds = match unit.trim().to_lowercase().as_str() {
        "seconds" | "second" | "secs" | "s" => 1.0,
        "minutes" | "minute" | "mins" | "min" => 60.0,
        "hours" | "hour" | "hrs" | "h" => 3600.0,
        "days" | "day" | "d" => 86_400.0,
        _ => return Err(InputError::TimeUnits(units.to_string())),
    };

    let reference = parse_reference(reference.trim())
        .ok_or_else(|| InputError::TimeUnits(units.to_string()))?;

    Ok((unit_seconds, reference))
}

fn parse_reference(reference: &str) -> Option<NaiveDateTime> {
    // some producers append a timezone which is always UTC in reanalyses
    let reference = reference
        .trim_end_matches(" UTC")
        .trim_end_matches('Z')
        .trim();

    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];

    for format in FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(reference, format) {
            return Some(datetime);
        }
    }

    NaiveDate::parse_from_str(reference, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
