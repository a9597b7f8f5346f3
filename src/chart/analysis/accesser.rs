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

//! Module with methods for accessing the
//! analysis fields at arbitrary geographic coordinates.

use super::{bisection, Analysis, FieldKind};
use crate::{errors::SearchError, Float};

impl Analysis {
    /// Function to get bilinearly interpolated value of given
    /// field at given geographic coordinates and time index.
    ///
    /// Missing (NaN) value at any of four surrounding gridpoints
    /// gives a missing result, so masked areas are never smeared.
    pub fn field_value(
        &self,
        kind: FieldKind,
        time_index: usize,
        lon: Float,
        lat: Float,
    ) -> Result<Float, SearchError> {
        let lons = self.lons.as_slice().ok_or(SearchError::EmptyArray)?;
        let lats = self.lats.as_slice().ok_or(SearchError::EmptyArray)?;

        let lon = self.wrap_longitude(lon);

        let (west, east, x) = bisection::bracket(lons, lon)?;
        let (north, south, y) = bisection::bracket(lats, lat)?;

        let field = self.field(kind);

        let top = lerp(
            field[[time_index, north, west]],
            field[[time_index, north, east]],
            x,
        );
        let bottom = lerp(
            field[[time_index, south, west]],
            field[[time_index, south, east]],
            x,
        );

        Ok(lerp(top, bottom, y))
    }

    /// Shifts the longitude by a full turn when that
    /// brings it into the range covered by the grid.
    ///
    /// Datasets use either `-180..180` or `0..360` convention
    /// while the chart extent can be given in any of them.
    pub fn wrap_longitude(&self, lon: Float) -> Float {
        let (first, last) = match (self.lons.first(), self.lons.last()) {
            (Some(first), Some(last)) => (first.min(*last), first.max(*last)),
            _ => return lon,
        };

        for candidate in [lon, lon + 360.0, lon - 360.0] {
            if (first..=last).contains(&candidate) {
                return candidate;
            }
        }

        lon
    }
}

fn lerp(a: Float, b: Float, t: Float) -> Float {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use crate::chart::analysis::{Analysis, FieldKind, RawDataset};
    use crate::errors::SearchError;
    use float_cmp::approx_eq;
    use ndarray::{array, Array3};

    fn analysis() -> Analysis {
        // speeds (in m/s) chosen so that the knots are simple multiples
        let u = array![[[40.0, 50.0, 60.0], [f64::NAN, 70.0, 80.0]]] / crate::constants::KNOTS_PER_MS;
        let v = Array3::zeros((1, 2, 3));

        Analysis::from_raw(RawDataset {
            lats: vec![50.0, 40.0],
            lons: vec![250.0, 260.0, 270.0],
            geopotential: Array3::zeros((1, 2, 3)),
            u_wind: u,
            v_wind: v,
            vorticity: Array3::zeros((1, 2, 3)),
            times: None,
            level: None,
        })
    }

    #[test]
    fn interpolates_inside_cell() {
        let analysis = analysis();
        let value = analysis
            .field_value(FieldKind::WindSpeed, 0, 265.0, 45.0)
            .unwrap();

        assert!(approx_eq!(f64, value, 65.0, epsilon = 1e-9));
    }

    #[test]
    fn gridpoint_value() {
        let analysis = analysis();
        let value = analysis
            .field_value(FieldKind::WindSpeed, 0, 270.0, 40.0)
            .unwrap();

        assert!(approx_eq!(f64, value, 80.0, epsilon = 1e-9));
    }

    #[test]
    fn negative_longitudes_wrap() {
        let analysis = analysis();
        let value = analysis
            .field_value(FieldKind::WindSpeed, 0, -95.0, 50.0)
            .unwrap();

        assert!(approx_eq!(f64, value, 55.0, epsilon = 1e-9));
    }

    #[test]
    fn missing_corner_gives_missing_value() {
        let analysis = analysis();
        let value = analysis
            .field_value(FieldKind::UWind, 0, 255.0, 45.0)
            .unwrap();

        assert!(value.is_nan());
    }

    #[test]
    fn outside_grid() {
        let analysis = analysis();
        let result = analysis.field_value(FieldKind::WindSpeed, 0, 255.0, 60.0);

        assert_eq!(result, Err(SearchError::OutOfBounds));
    }
}
