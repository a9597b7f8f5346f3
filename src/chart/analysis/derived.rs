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

//! Fields computed from the variables read from the dataset.

use crate::Float;
use ndarray::{Array3, Zip};

/// Computes wind speed from its components, gridpoint by gridpoint.
///
/// Plain `sqrt(u^2 + v^2)` is used instead of `hypot` so that
/// a missing (NaN) component always yields a missing speed.
pub fn wind_speed(u_wind: &Array3<Float>, v_wind: &Array3<Float>) -> Array3<Float> {
    Zip::from(u_wind)
        .and(v_wind)
        .map_collect(|&u, &v| (u * u + v * v).sqrt())
}

#[cfg(test)]
mod tests {
    use super::wind_speed;
    use float_cmp::approx_eq;
    use ndarray::{array, Array3};

    fn components() -> (Array3<f64>, Array3<f64>) {
        let u = array![[[3.0, -12.5, 0.0], [41.0, -0.25, 7.0]]];
        let v = array![[[4.0, 30.0, -0.0], [-9.5, 18.0, -24.0]]];
        (u, v)
    }

    #[test]
    fn matches_pythagoras() {
        let (u, v) = components();
        let speed = wind_speed(&u, &v);

        for ((s, a), b) in speed.iter().zip(u.iter()).zip(v.iter()) {
            assert!(approx_eq!(f64, *s, (a * a + b * b).sqrt(), ulps = 2));
            assert!(*s >= 0.0);
        }

        assert!(approx_eq!(f64, speed[[0, 0, 0]], 5.0, ulps = 2));
    }

    #[test]
    fn symmetric_in_components() {
        let (u, v) = components();
        assert_eq!(wind_speed(&u, &v), wind_speed(&v, &u));
    }

    #[test]
    fn missing_component_gives_missing_speed() {
        let u = array![[[f64::NAN, 3.0, f64::NAN]]];
        let v = array![[[4.0, f64::NAN, f64::INFINITY]]];
        let speed = wind_speed(&u, &v);

        assert!(speed.iter().all(|s| s.is_nan()));
    }
}
