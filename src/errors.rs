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

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Error while reading config.yaml: {0}")]
    Config(#[from] ConfigError),

    #[error("Error while reading input dataset: {0}")]
    Input(#[from] InputError),

    #[error("Error while rendering the chart: {0}")]
    Render(#[from] RenderError),

    #[error("Cannot set the memory limit of {0} MB")]
    MemoryLimit(usize),

    #[error("Cannot read the analysis label: {0}")]
    Label(std::io::Error),

    #[error("Error while preparing output: {0}")]
    FaultyOutput(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot open config.yaml: {0}")]
    CantOpenFile(#[from] std::io::Error),

    #[error("Cannot deserialize config.yaml: {0}")]
    CantDeserialize(#[from] serde_yaml::Error),

    #[error("Configuration component is out of bounds {0}")]
    OutOfBounds(&'static str),
}

#[derive(Error, Debug)]
pub enum InputError {
    #[error("netCDF error: {0}")]
    Netcdf(#[from] netcdf::Error),

    #[error("Variable {0} not found in the dataset")]
    MissingVariable(&'static str),

    #[error("Variable {0} has a shape inconsistent with the coordinates")]
    ShapeMismatch(&'static str),

    #[error("Cannot arrange values into a grid: {0}")]
    ArrayShape(#[from] ndarray::ShapeError),

    #[error("Cannot decode time units: {0}")]
    TimeUnits(String),
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Time index {index} is out of bounds for time axis of length {len}")]
    TimeIndexOutOfBounds { index: usize, len: usize },

    #[error("Cannot read font file: {0}")]
    CantReadFont(std::io::Error),

    #[error("File {0} does not contain a usable TrueType font")]
    InvalidFont(PathBuf),

    #[error("Cannot read boundaries file {0}: {1}")]
    CantReadBoundaries(PathBuf, std::io::Error),

    #[error("Cannot parse boundaries file {0}: {1}")]
    CantParseBoundaries(PathBuf, serde_json::Error),

    #[error("Cannot project the chart extent: {0}")]
    Projection(#[from] ProjectionError),

    #[error("Cannot create a canvas of size {0}x{1}")]
    CantCreateCanvas(u32, u32),

    #[error("Cannot save the figure: {0}")]
    CantSaveImage(#[from] image::ImageError),
}

#[derive(Error, Debug)]
pub enum ProjectionError {
    #[error("Incorrect projection parameters: {0}")]
    IncorrectParams(&'static str),
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("Searched array is empty")]
    EmptyArray,

    #[error("Searched value is out of array bounds")]
    OutOfBounds,
}
