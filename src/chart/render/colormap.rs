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

//! Sequential blue-purple colour scheme of the isotach shading
//! and assignment of colours to shading bands.

use crate::Float;

/// Anchor colours of the ColorBrewer BuPu scheme,
/// spread evenly from the lightest to the darkest.
const BUPU: [[u8; 3]; 9] = [
    [0xf7, 0xfc, 0xfd],
    [0xe0, 0xec, 0xf4],
    [0xbf, 0xd3, 0xe6],
    [0x9e, 0xbc, 0xda],
    [0x8c, 0x96, 0xc6],
    [0x8c, 0x6b, 0xb1],
    [0x88, 0x41, 0x9d],
    [0x81, 0x0f, 0x7c],
    [0x4d, 0x00, 0x4b],
];

/// Colour of the scheme at position `t` in `[0, 1]`,
/// linearly interpolated between anchors.
pub fn bupu(t: Float) -> [u8; 3] {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

    let position = t * (BUPU.len() - 1) as Float;
    let lower = (position.floor() as usize).min(BUPU.len() - 2);
    let fraction = position - lower as Float;

    let mut rgb = [0; 3];

    for (c, channel) in rgb.iter_mut().enumerate() {
        let a = BUPU[lower][c] as Float;
        let b = BUPU[lower + 1][c] as Float;
        *channel = (a + (b - a) * fraction).round() as u8;
    }

    rgb
}

/// Colours of bands between consecutive levels.
///
/// Each band gets the colour at its midpoint, normalised
/// over the whole span of levels.
pub fn band_colors(levels: &[Float]) -> Vec<[u8; 3]> {
    let (first, last) = match (levels.first(), levels.last()) {
        (Some(first), Some(last)) if last > first => (*first, *last),
        _ => return vec![],
    };

    levels
        .windows(2)
        .map(|w| bupu(((w[0] + w[1]) / 2.0 - first) / (last - first)))
        .collect()
}

/// Index of the band containing the value.
///
/// Bands are closed at the bottom, the last one is closed at both ends.
/// `None` for values outside `[levels[0], levels[last]]` and NaN.
pub fn band_index(levels: &[Float], value: Float) -> Option<usize> {
    if levels.len() < 2 || value.is_nan() {
        return None;
    }

    let last = levels.len() - 1;
    if value == levels[last] {
        return Some(last - 1);
    }

    let upper = levels.partition_point(|&l| l <= value);

    if upper == 0 || upper == levels.len() {
        None
    } else {
        Some(upper - 1)
    }
}
