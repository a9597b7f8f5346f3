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

//! In-place masks hiding values that are not meant to be drawn.
//!
//! Masked gridpoints are set to NaN, which every drawing routine
//! treats as a missing value.

use crate::Float;
use ndarray::Array3;

/// Keeps only cyclonic (positive) relative vorticity.
pub fn mask_anticyclonic(vorticity: &mut Array3<Float>) {
    vorticity.mapv_inplace(|v| if v <= 0.0 { Float::NAN } else { v });
}

/// Hides all values below `threshold`.
pub fn mask_below(field: &mut Array3<Float>, threshold: Float) {
    field.mapv_inplace(|v| if v < threshold { Float::NAN } else { v });
}

#[cfg(test)]
mod tests {
    use super::{mask_anticyclonic, mask_below};
    use ndarray::{array, Array3};

    fn same_cells(a: &Array3<f64>, b: &Array3<f64>) -> bool {
        a.iter()
            .zip(b.iter())
            .all(|(x, y)| (x.is_nan() && y.is_nan()) || x == y)
    }

    #[test]
    fn vorticity_mask() {
        let mut vort = array![[[-3.0, 0.0, 0.5], [f64::NAN, 12.0, -0.0]]];
        mask_anticyclonic(&mut vort);

        assert!(vort.iter().all(|v| v.is_nan() || *v > 0.0));
        assert_eq!(vort.iter().filter(|v| !v.is_nan()).count(), 2);
    }

    #[test]
    fn vorticity_mask_idempotent() {
        let mut once = array![[[-3.0, 0.0, 0.5], [f64::NAN, 12.0, -7.5]]];
        mask_anticyclonic(&mut once);

        let mut twice = once.clone();
        mask_anticyclonic(&mut twice);

        assert!(same_cells(&once, &twice));
    }

    #[test]
    fn speed_mask() {
        let mut speed = array![[[29.999, 30.0, 55.0], [0.0, f64::NAN, 120.0]]];
        mask_below(&mut speed, 30.0);

        assert!(speed.iter().all(|v| v.is_nan() || *v >= 30.0));
        assert_eq!(speed.iter().filter(|v| !v.is_nan()).count(), 3);

        let mut again = speed.clone();
        mask_below(&mut again, 30.0);
        assert!(same_cells(&speed, &again));
    }
}
