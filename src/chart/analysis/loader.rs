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

//! Sub-module responsible for reading variables
//! from the netCDF dataset.
//!
//! Reanalysis files commonly store variables packed as integers,
//! so every field read here is unpacked (`scale_factor`, `add_offset`)
//! and its fill values are replaced with NaN.

use super::time_axis::TimeAxis;
use crate::errors::InputError;
use crate::Float;
use log::{debug, warn};
use ndarray::Array3;
use netcdf::{AttributeValue, Variable};
use std::path::Path;

/// Variables as read from the dataset, in their original units.
#[derive(Debug)]
pub struct RawDataset {
    pub lats: Vec<Float>,
    pub lons: Vec<Float>,
    pub geopotential: Array3<Float>,
    pub u_wind: Array3<Float>,
    pub v_wind: Array3<Float>,
    pub vorticity: Array3<Float>,
    pub times: Option<TimeAxis>,
    pub level: Option<Float>,
}

/// Reads all variables needed for the chart from the netCDF file.
///
/// Fails when the file cannot be opened, any of required variables
/// is missing or fields do not match the coordinates.
pub fn read_dataset(path: &Path) -> Result<RawDataset, InputError> {
    debug!("Opening dataset {}", path.display());
    let file = netcdf::open(path)?;

    let lats = read_coordinate(&file, "latitude")?;
    let lons = read_coordinate(&file, "longitude")?;
    debug!(
        "Dataset grid has {} latitudes and {} longitudes",
        lats.len(),
        lons.len()
    );

    let shape = (lats.len(), lons.len());
    let geopotential = read_field(&file, "z", shape)?;
    let u_wind = read_field(&file, "u", shape)?;
    let v_wind = read_field(&file, "v", shape)?;
    let vorticity = read_field(&file, "vo", shape)?;

    let time_len = geopotential.dim().0;
    for (name, field) in [("u", &u_wind), ("v", &v_wind), ("vo", &vorticity)] {
        if field.dim().0 != time_len {
            return Err(InputError::ShapeMismatch(name));
        }
    }

    let times = read_time_axis(&file).filter(|times| {
        let consistent = times.len() == time_len;
        if !consistent {
            warn!(
                "Time coordinate has {} values but fields have {} times, dataset times will not be available",
                times.len(),
                time_len
            );
        }
        consistent
    });
    let level = read_level(&file);

    Ok(RawDataset {
        lats,
        lons,
        geopotential,
        u_wind,
        v_wind,
        vorticity,
        times,
        level,
    })
}

fn read_coordinate(file: &netcdf::File, name: &'static str) -> Result<Vec<Float>, InputError> {
    let var = file
        .variable(name)
        .ok_or(InputError::MissingVariable(name))?;

    let packing = Packing::of(&var);
    let values: Vec<Float> = var.get_values(..)?;

    Ok(values.into_iter().map(|v| packing.unpack(v)).collect())
}

/// Reads a `[time, latitude, longitude]` variable into a 3d array.
fn read_field(
    file: &netcdf::File,
    name: &'static str,
    grid_shape: (usize, usize),
) -> Result<Array3<Float>, InputError> {
    debug!("Reading variable {}", name);

    let var = file
        .variable(name)
        .ok_or(InputError::MissingVariable(name))?;

    let dims = var.dimensions();
    if dims.len() != 3 {
        return Err(InputError::ShapeMismatch(name));
    }

    let shape = (dims[0].len(), dims[1].len(), dims[2].len());
    if (shape.1, shape.2) != grid_shape {
        return Err(InputError::ShapeMismatch(name));
    }

    let packing = Packing::of(&var);
    let values: Vec<Float> = var.get_values(..)?;
    let values = values.into_iter().map(|v| packing.unpack(v)).collect();

    Ok(Array3::from_shape_vec(shape, values)?)
}

/// Time coordinate is optional as it only serves the analysis label.
fn read_time_axis(file: &netcdf::File) -> Option<TimeAxis> {
    let var = file.variable("time")?;

    let units = match var.attribute_value("units") {
        Some(Ok(AttributeValue::Str(units))) => units,
        _ => {
            warn!("Time coordinate has no units, dataset times will not be available");
            return None;
        }
    };

    let packing = Packing::of(&var);
    let offsets: Vec<Float> = match var.get_values::<Float, _>(..) {
        Ok(offsets) => offsets.into_iter().map(|v| packing.unpack(v)).collect(),
        Err(err) => {
            warn!("Cannot read time coordinate: {}", err);
            return None;
        }
    };

    match TimeAxis::new(&units, offsets) {
        Ok(axis) => Some(axis),
        Err(err) => {
            warn!("{}, dataset times will not be available", err);
            None
        }
    }
}

fn read_level(file: &netcdf::File) -> Option<Float> {
    let var = file.variable("level")?;
    let values: Vec<Float> = var.get_values(..).ok()?;

    if values.len() > 1 {
        warn!("Dataset contains more than one level, only the first one is described in title");
    }

    values.first().copied()
}

/// Packing attributes of a netCDF variable.
#[derive(Copy, Clone, PartialEq, Debug)]
struct Packing {
    scale: Float,
    offset: Float,
    fill: Option<Float>,
    missing: Option<Float>,
}

impl Packing {
    fn of(var: &Variable) -> Self {
        Packing {
            scale: numeric_attribute(var, "scale_factor").unwrap_or(1.0),
            offset: numeric_attribute(var, "add_offset").unwrap_or(0.0),
            fill: numeric_attribute(var, "_FillValue"),
            missing: numeric_attribute(var, "missing_value"),
        }
    }

    fn unpack(&self, raw: Float) -> Float {
        if Some(raw) == self.fill || Some(raw) == self.missing {
            return Float::NAN;
        }

        raw * self.scale + self.offset
    }
}

fn numeric_attribute(var: &Variable, name: &str) -> Option<Float> {
    match var.attribute_value(name)?.ok()? {
        AttributeValue::Double(v) => Some(v),
        AttributeValue::Float(v) => Some(Float::from(v)),
        AttributeValue::Short(v) => Some(Float::from(v)),
        AttributeValue::Int(v) => Some(Float::from(v)),
        AttributeValue::Schar(v) => Some(Float::from(v)),
        AttributeValue::Uchar(v) => Some(Float::from(v)),
        _ => None,
    }
}
