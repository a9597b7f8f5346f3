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

//! Conversions of dataset fields into units shown on the chart.

use crate::constants::{GEOPOTENTIAL_PER_DAM, KNOTS_PER_MS, VORTICITY_SCALE};
use crate::Float;
use ndarray::Array3;

/// Geopotential as stored in the dataset to decameters.
pub fn geopotential_to_dam(field: &Array3<Float>) -> Array3<Float> {
    field.mapv(|v| v / GEOPOTENTIAL_PER_DAM)
}

/// Wind component from metres per second to knots.
pub fn ms_to_knots(field: &Array3<Float>) -> Array3<Float> {
    field.mapv(|v| v * KNOTS_PER_MS)
}

/// Relative vorticity scaled by `10^5` so that typical values are of order one.
pub fn scale_vorticity(field: &Array3<Float>) -> Array3<Float> {
    field.mapv(|v| v * VORTICITY_SCALE)
}

#[cfg(test)]
mod tests {
    use super::{geopotential_to_dam, ms_to_knots, scale_vorticity};
    use crate::constants::{GEOPOTENTIAL_PER_DAM, KNOTS_PER_MS};
    use float_cmp::approx_eq;
    use ndarray::{array, Array3};

    fn sample() -> Array3<f64> {
        array![[[55_000.0, 57_321.5], [-3.25, 0.0]]]
    }

    #[test]
    fn height_round_trip() {
        let original = sample();
        let back = geopotential_to_dam(&original).mapv(|v| v * GEOPOTENTIAL_PER_DAM);

        for (a, b) in original.iter().zip(back.iter()) {
            assert!(approx_eq!(f64, *a, *b, epsilon = 1e-9));
        }
    }

    #[test]
    fn wind_round_trip() {
        let original = sample();
        let back = ms_to_knots(&original).mapv(|v| v / KNOTS_PER_MS);

        for (a, b) in original.iter().zip(back.iter()) {
            assert!(approx_eq!(f64, *a, *b, epsilon = 1e-9));
        }
    }

    #[test]
    fn known_values() {
        let wind = ms_to_knots(&array![[[10.0]]]);
        assert!(approx_eq!(f64, wind[[0, 0, 0]], 19.4384, epsilon = 1e-12));

        let height = geopotential_to_dam(&array![[[55_000.0]]]);
        assert!(approx_eq!(f64, height[[0, 0, 0]], 550.0, epsilon = 1e-12));

        let vort = scale_vorticity(&array![[[2.0e-5]]]);
        assert!(approx_eq!(f64, vort[[0, 0, 0]], 2.0, epsilon = 1e-12));
    }

    #[test]
    fn nan_survives_conversion() {
        let wind = ms_to_knots(&array![[[f64::NAN]]]);
        assert!(wind[[0, 0, 0]].is_nan());
    }
}
