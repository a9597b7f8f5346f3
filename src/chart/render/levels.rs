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

//! Selection of shading and contour levels.

use crate::Float;

/// Steps tried by [`nice_levels`], as multiples of a power of ten.
const NICE_STEPS: [Float; 5] = [1.0, 2.0, 2.5, 5.0, 10.0];

/// Maximal number of intervals spanned by automatic contour levels.
const NICE_BINS: usize = 8;

/// Levels from `min` (inclusive) to `max` (exclusive)
/// every `interval`, rounded to two decimal places.
pub fn shading_levels(min: Float, max: Float, interval: Float) -> Vec<Float> {
    if !(interval > 0.0) || !(max > min) {
        return vec![];
    }

    let count = ((max - min) / interval).ceil() as usize;

    (0..count)
        .map(|i| round_2(min + i as Float * interval))
        .collect()
}

fn round_2(x: Float) -> Float {
    (x * 100.0).round() / 100.0
}

/// Chooses round contour levels for data spanning `zmin..zmax`.
///
/// Ticks are spaced by one of [`NICE_STEPS`] times a power of ten,
/// the smallest step that covers the range in at most [`NICE_BINS`]
/// intervals. Only levels strictly inside the range are returned,
/// so a constant field gives no levels.
pub fn nice_levels(zmin: Float, zmax: Float) -> Vec<Float> {
    if !zmin.is_finite() || !zmax.is_finite() || zmin >= zmax {
        return vec![];
    }

    let (scale, offset) = scale_range(zmin, zmax);
    let vmin = zmin - offset;
    let vmax = zmax - offset;

    let raw_step = (vmax - vmin) / NICE_BINS as Float;

    // steps extended by one decade down and one step up,
    // so that the first step not smaller than raw step always exists
    let steps: Vec<Float> = NICE_STEPS[..NICE_STEPS.len() - 1]
        .iter()
        .map(|s| 0.1 * s)
        .chain(NICE_STEPS.iter().copied())
        .chain([10.0 * NICE_STEPS[1]])
        .map(|s| s * scale)
        .collect();

    let first_large = steps
        .iter()
        .position(|&s| s >= raw_step)
        .unwrap_or(steps.len() - 1);

    let mut ticks = vec![];

    for &step in steps[..=first_large].iter().rev() {
        let best_vmin = (vmin / step).floor() * step;
        let edge = Edge { step, offset };

        let low = edge.floor(vmin - best_vmin);
        let high = edge.ceil(vmax - best_vmin);

        ticks = (low as i64..=high as i64)
            .map(|i| i as Float * step + best_vmin)
            .collect();

        if ticks.iter().any(|&t| t >= vmin && t <= vmax) {
            break;
        }
    }

    ticks
        .into_iter()
        .map(|t| t + offset)
        .filter(|&t| t > zmin && t < zmax)
        .collect()
}

/// Power of ten matching the range divided into bins
/// and offset removed from values far from zero.
fn scale_range(vmin: Float, vmax: Float) -> (Float, Float) {
    let dv = (vmax - vmin).abs();
    let meanv = (vmax + vmin) / 2.0;

    let offset = if meanv.abs() / dv < 100.0 {
        0.0
    } else {
        Float::powf(10.0, meanv.abs().log10().floor()).copysign(meanv)
    };

    let scale = Float::powf(10.0, (dv / NICE_BINS as Float).log10().floor());

    (scale, offset)
}

/// Integer multiples of the step with tolerance
/// for floating point error relative to the offset.
struct Edge {
    step: Float,
    offset: Float,
}

impl Edge {
    fn tolerance(&self) -> Float {
        if self.offset > 0.0 {
            let digits = (self.offset / self.step).log10();
            Float::powf(10.0, digits - 12.0).max(1e-10).min(0.4999)
        } else {
            1e-10
        }
    }

    fn floor(&self, x: Float) -> Float {
        let d = (x / self.step).floor();
        let m = x.rem_euclid(self.step);

        if (m / self.step - 1.0).abs() < self.tolerance() {
            d + 1.0
        } else {
            d
        }
    }

    fn ceil(&self, x: Float) -> Float {
        let d = (x / self.step).floor();
        let m = x.rem_euclid(self.step);

        if (m / self.step).abs() < self.tolerance() {
            d
        } else {
            d + 1.0
        }
    }
}
