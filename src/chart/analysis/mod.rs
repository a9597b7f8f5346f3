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

//! Module responsible for reading the reanalysis dataset,
//! deriving and masking fields, and providing that data
//! to the renderer.
//!
//! All grids are loaded once and kept in the [`Analysis`] struct.
//! Masks are applied while constructing it, so every later reader,
//! including repeated renders, sees the masked fields.

mod accesser;
mod bisection;
mod derived;
mod loader;
mod masking;
mod time_axis;
mod units;

pub use self::loader::RawDataset;
pub use self::time_axis::TimeAxis;

use super::configuration::Input;
use crate::constants::ISOTACH_THRESHOLD;
use crate::{errors::InputError, Float};
use log::debug;
use ndarray::{Array1, Array2, Array3};

/// Enum containing fields that can be requested
/// from the analysis.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum FieldKind {
    /// Geopotential height in decameters.
    Height,
    /// Eastward wind in knots, never masked.
    UWind,
    /// Northward wind in knots, never masked.
    VWind,
    /// Relative vorticity times `10^5`, anticyclonic values masked.
    Vorticity,
    /// Wind speed in knots, values below threshold masked.
    WindSpeed,
}

/// Longitudes and latitudes of every gridpoint,
/// both of shape `[latitude, longitude]`.
#[derive(Clone, PartialEq, Debug)]
pub struct MeshGrid {
    pub lons: Array2<Float>,
    pub lats: Array2<Float>,
}

impl MeshGrid {
    fn new(lons: &Array1<Float>, lats: &Array1<Float>) -> Self {
        let shape = (lats.len(), lons.len());

        MeshGrid {
            lons: Array2::from_shape_fn(shape, |(_, i)| lons[i]),
            lats: Array2::from_shape_fn(shape, |(j, _)| lats[j]),
        }
    }
}

/// Analysis main struct storing all fields
/// needed to draw the chart.
///
/// Fields are indexed `[time, latitude, longitude]`
/// and are in units shown on the chart.
#[derive(Debug)]
pub struct Analysis {
    pub lats: Array1<Float>,
    pub lons: Array1<Float>,
    pub mesh: MeshGrid,
    pub height: Array3<Float>,
    pub u_wind: Array3<Float>,
    pub v_wind: Array3<Float>,
    pub vorticity: Array3<Float>,
    pub wind_speed: Array3<Float>,
    pub times: Option<TimeAxis>,
    pub level: Option<Float>,
}

impl Analysis {
    /// Analysis struct constructor
    /// responsible for reading the dataset
    /// and preparing fields for drawing.
    pub fn new(input: &Input) -> Result<Self, InputError> {
        debug!("Creating new analysis");

        let raw = loader::read_dataset(&input.data_file)?;

        Ok(Analysis::from_raw(raw))
    }

    /// Converts units, derives wind speed and applies masks
    /// to variables already read from a dataset.
    pub fn from_raw(raw: RawDataset) -> Self {
        debug!("Converting units");
        let height = units::geopotential_to_dam(&raw.geopotential);
        let u_wind = units::ms_to_knots(&raw.u_wind);
        let v_wind = units::ms_to_knots(&raw.v_wind);
        let vorticity = units::scale_vorticity(&raw.vorticity);

        debug!("Computing wind speed");
        let wind_speed = derived::wind_speed(&u_wind, &v_wind);

        let lats = Array1::from_vec(raw.lats);
        let lons = Array1::from_vec(raw.lons);
        let mesh = MeshGrid::new(&lons, &lats);

        let mut analysis = Analysis {
            lats,
            lons,
            mesh,
            height,
            u_wind,
            v_wind,
            vorticity,
            wind_speed,
            times: raw.times,
            level: raw.level,
        };

        analysis.apply_masks();

        analysis
    }

    fn apply_masks(&mut self) {
        debug!("Masking anticyclonic vorticity and weak winds");
        masking::mask_anticyclonic(&mut self.vorticity);
        masking::mask_below(&mut self.wind_speed, ISOTACH_THRESHOLD);
    }

    /// Length of the time axis shared by all fields.
    pub fn time_len(&self) -> usize {
        self.height.dim().0
    }

    pub fn field(&self, kind: FieldKind) -> &Array3<Float> {
        match kind {
            FieldKind::Height => &self.height,
            FieldKind::UWind => &self.u_wind,
            FieldKind::VWind => &self.v_wind,
            FieldKind::Vorticity => &self.vorticity,
            FieldKind::WindSpeed => &self.wind_speed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Analysis, RawDataset};
    use crate::constants::KNOTS_PER_MS;
    use float_cmp::approx_eq;
    use ndarray::{array, Array3};

    fn raw_dataset(u: Array3<f64>, v: Array3<f64>, vo: Array3<f64>) -> RawDataset {
        let shape = u.raw_dim();

        RawDataset {
            lats: (0..shape[1]).map(|j| 40.0 - 5.0 * j as f64).collect(),
            lons: (0..shape[2]).map(|i| -100.0 + 5.0 * i as f64).collect(),
            geopotential: Array3::from_elem(shape, 55_000.0),
            u_wind: u,
            v_wind: v,
            vorticity: vo,
            times: None,
            level: None,
        }
    }

    #[test]
    fn mesh_follows_coordinates() {
        let zeros = Array3::zeros((1, 2, 3));
        let analysis = Analysis::from_raw(raw_dataset(zeros.clone(), zeros.clone(), zeros));

        assert_eq!(analysis.mesh.lons.dim(), (2, 3));
        assert_eq!(analysis.mesh.lons.row(1).to_vec(), vec![-100.0, -95.0, -90.0]);
        assert_eq!(analysis.mesh.lats.column(2).to_vec(), vec![40.0, 35.0]);
    }

    #[test]
    fn barb_winds_stay_unmasked() {
        let u = array![[[1.0, 20.0]]];
        let v = array![[[0.0, 0.0]]];
        let vo = array![[[-1.0, 1.0]]];
        let analysis = Analysis::from_raw(raw_dataset(u, v, vo));

        // weak wind is hidden from shading but not from barbs
        assert!(analysis.wind_speed[[0, 0, 0]].is_nan());
        assert!(approx_eq!(f64, analysis.u_wind[[0, 0, 0]], KNOTS_PER_MS));
        assert!(approx_eq!(f64, analysis.wind_speed[[0, 0, 1]], 20.0 * KNOTS_PER_MS));
        assert!(analysis.vorticity[[0, 0, 0]].is_nan());
        assert!(approx_eq!(f64, analysis.vorticity[[0, 0, 1]], 1.0e5));
        assert!(approx_eq!(f64, analysis.height[[0, 0, 0]], 550.0));
    }
}
