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

//! Wind barbs geometry.
//!
//! The shaft starts at the plotted point and extends towards the
//! direction the wind blows from. Flags (50 kt), full barbs (10 kt)
//! and half barbs (5 kt) are placed from the far end of the shaft.

use crate::Float;

/// Relative sizes of barb elements, as fractions of the shaft length.
const SPACING: f32 = 0.125;
const HEIGHT: f32 = 0.4;
const FLAG_WIDTH: f32 = 0.25;
const CALM_RADIUS: f32 = 0.15;

/// Counts of barb elements representing the wind speed.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct BarbParts {
    pub flags: u32,
    pub full: u32,
    pub half: bool,
}

impl BarbParts {
    /// Splits speed (in knots) rounded to the nearest 5 kt
    /// into 50, 10 and 5 kt increments.
    pub fn from_speed(speed: Float) -> Self {
        let rounded = if speed.is_finite() {
            ((speed / 5.0).round() * 5.0) as u32
        } else {
            0
        };

        BarbParts {
            flags: rounded / 50,
            full: (rounded % 50) / 10,
            half: rounded % 10 >= 5,
        }
    }

    pub fn is_calm(&self) -> bool {
        self.flags == 0 && self.full == 0 && !self.half
    }
}

/// Pixel geometry of a single wind barb.
#[derive(Clone, PartialEq, Debug)]
pub enum Barb {
    /// Circle drawn instead of a shaft for calm wind.
    Calm { centre: (f32, f32), radius: f32 },
    Wind {
        shaft: [(f32, f32); 2],
        flags: Vec<[(f32, f32); 3]>,
        barbs: Vec<[(f32, f32); 2]>,
    },
}

impl Barb {
    /// Computes the barb at pixel position `tip` for wind components
    /// (in knots) `u` eastward and `v` northward.
    pub fn new(tip: (f32, f32), u: Float, v: Float, length: f32) -> Self {
        let speed = (u * u + v * v).sqrt();
        let parts = BarbParts::from_speed(speed);

        if parts.is_calm() {
            return Barb::Calm {
                centre: tip,
                radius: CALM_RADIUS * length,
            };
        }

        // screen y axis points south
        let dir = ((-u / speed) as f32, (v / speed) as f32);
        let side = (-dir.1, dir.0);

        let at = |distance: f32, height: f32| {
            (
                tip.0 + dir.0 * distance + side.0 * height,
                tip.1 + dir.1 * distance + side.1 * height,
            )
        };

        let spacing = SPACING * length;
        let height = HEIGHT * length;
        let width = FLAG_WIDTH * length;

        let mut position = length;
        let mut flags = vec![];
        let mut barbs = vec![];

        for _ in 0..parts.flags {
            flags.push([
                at(position, 0.0),
                at(position - width / 2.0, height),
                at(position - width, 0.0),
            ]);
            position -= width + spacing;
        }

        for _ in 0..parts.full {
            barbs.push([at(position, 0.0), at(position + width / 2.0, height)]);
            position -= spacing;
        }

        if parts.half {
            // lone half barb is set off from the shaft end
            if parts.flags == 0 && parts.full == 0 {
                position -= 1.5 * spacing;
            }
            barbs.push([
                at(position, 0.0),
                at(position + width / 4.0, height / 2.0),
            ]);
        }

        Barb::Wind {
            shaft: [tip, at(length, 0.0)],
            flags,
            barbs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Barb, BarbParts};
    use float_cmp::approx_eq;

    #[test]
    fn speed_increments() {
        assert_eq!(
            BarbParts::from_speed(47.0),
            BarbParts {
                flags: 0,
                full: 4,
                half: true
            }
        );
        assert_eq!(
            BarbParts::from_speed(64.0),
            BarbParts {
                flags: 1,
                full: 1,
                half: true
            }
        );
        assert_eq!(
            BarbParts::from_speed(103.0),
            BarbParts {
                flags: 2,
                full: 0,
                half: true
            }
        );
        assert!(BarbParts::from_speed(2.0).is_calm());
        assert!(BarbParts::from_speed(f64::NAN).is_calm());
    }

    #[test]
    fn calm_is_circle() {
        let barb = Barb::new((50.0, 50.0), 1.0, -1.0, 20.0);

        match barb {
            Barb::Calm { centre, radius } => {
                assert_eq!(centre, (50.0, 50.0));
                assert!(approx_eq!(f32, radius, 3.0, epsilon = 1e-4));
            }
            Barb::Wind { .. } => panic!("weak wind drawn with a shaft"),
        }
    }

    #[test]
    fn westerly_points_west() {
        let barb = Barb::new((100.0, 100.0), 20.0, 0.0, 20.0);

        match barb {
            Barb::Wind {
                shaft,
                flags,
                barbs,
            } => {
                assert!(approx_eq!(f32, shaft[1].0, 80.0, epsilon = 1e-4));
                assert!(approx_eq!(f32, shaft[1].1, 100.0, epsilon = 1e-4));
                assert!(flags.is_empty());
                assert_eq!(barbs.len(), 2);

                // first barb at the shaft end, leaning north
                assert!(approx_eq!(f32, barbs[0][0].0, 80.0, epsilon = 1e-4));
                assert!(approx_eq!(f32, barbs[0][1].0, 77.5, epsilon = 1e-4));
                assert!(approx_eq!(f32, barbs[0][1].1, 92.0, epsilon = 1e-4));
            }
            Barb::Calm { .. } => panic!("20 kt wind drawn as calm"),
        }
    }

    #[test]
    fn southerly_flag() {
        let barb = Barb::new((0.0, 0.0), 0.0, 50.0, 20.0);

        match barb {
            Barb::Wind { shaft, flags, .. } => {
                // wind from the south so the shaft goes down the screen
                assert!(approx_eq!(f32, shaft[1].1, 20.0, epsilon = 1e-4));
                assert_eq!(flags.len(), 1);
            }
            Barb::Calm { .. } => panic!("50 kt wind drawn as calm"),
        }
    }
}
