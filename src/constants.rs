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

//! Module containing constants used by the chart.

use crate::Float;

/// Conversion factor from metres per second to knots.
pub const KNOTS_PER_MS: Float = 1.94384;

/// Divisor bringing geopotential from the dataset to decameters
/// as plotted on the chart.
pub const GEOPOTENTIAL_PER_DAM: Float = 100.0;

/// Scale applied to relative vorticity for display convenience.
pub const VORTICITY_SCALE: Float = 1.0e5;

/// Wind speed (in knots) below which isotachs are not shaded.
pub const ISOTACH_THRESHOLD: Float = 30.0;

/// Default stride (in gridpoints) between plotted wind barbs.
pub const DEFAULT_DECLUTTER: usize = 12;

/// Pressure level (in hPa) assumed when neither configuration
/// nor dataset provide one.
pub const DEFAULT_LEVEL: Float = 500.0;

/// Figure width in inches used to convert font sizes in points
/// into pixels, so that the chart scales with the output size.
pub const FIGURE_WIDTH_INCHES: Float = 10.0;

/// Font size (in points) of inline height contour labels.
pub const CONTOUR_LABEL_SIZE: Float = 10.0;

/// Length (in points) of wind barb shafts.
pub const BARB_LENGTH: Float = 7.0;

/// Font size (in points) of colour bar tick labels.
pub const TICK_LABEL_SIZE: Float = 10.0;

/// Label drawn next to the colour bar.
pub const COLORBAR_LABEL: &str = "[knots]";

/// Prompt shown when the analysis label is read from terminal.
pub const LABEL_PROMPT: &str = "Enter the analysis time:";
