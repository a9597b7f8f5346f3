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

//! Module responsible for parsing and checking the configuration file.
//!
//! To provide meaningful error messages. The configuration file uses
//! [YAML](https://en.wikipedia.org/wiki/YAML) and `serde` to enforce
//! strong typing and automatic type checking.
//!
//! The structures and their fields in this module directly correspond to
//! the fields inside `config.yaml` so you can check this documentation
//! for more details how to set the config file.

use crate::constants::DEFAULT_DECLUTTER;
use crate::errors::ConfigError;
use crate::Float;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Fields with information about the input dataset.
#[derive(Clone, PartialEq, PartialOrd, Debug, Deserialize)]
pub struct Input {
    /// Path to the netCDF file with reanalysis data.
    ///
    /// The file must contain `latitude` and `longitude` coordinates
    /// and `z`, `u`, `v` and `vo` variables shaped `[time, latitude, longitude]`.
    pub data_file: PathBuf,

    /// _(Optional)_ Pressure level (in hPa) of the data, used in the chart title.
    ///
    /// When not set the `level` coordinate of the dataset is used,
    /// and if that is also missing 500 hPa is assumed.
    #[serde(default)]
    pub level: Option<Float>,
}

/// Geographic bounding box of the chart, in degrees.
///
/// The ordering of the edges is not checked. An inverted or empty
/// box results in an empty map rather than an error.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Deserialize)]
pub struct Extent {
    pub lon_min: Float,
    pub lon_max: Float,
    pub lat_min: Float,
    pub lat_max: Float,
}

impl Extent {
    /// Checks if all edges are finite numbers.
    pub fn check_bounds(&self) -> Result<(), ConfigError> {
        let edges = [self.lon_min, self.lon_max, self.lat_min, self.lat_max];

        if edges.iter().any(|e| !e.is_finite()) {
            return Err(ConfigError::OutOfBounds(
                "Chart extent edges must be finite numbers",
            ));
        }

        Ok(())
    }

    /// Geographic centre of the box.
    pub fn midpoint(&self) -> (Float, Float) {
        (
            (self.lon_min + self.lon_max) / 2.0,
            (self.lat_min + self.lat_max) / 2.0,
        )
    }

    /// Whether the box spans a positive area.
    pub fn is_degenerate(&self) -> bool {
        !(self.lon_min < self.lon_max && self.lat_min < self.lat_max)
    }
}

/// Range and interval (in knots) of the isotach shading.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Deserialize)]
pub struct Shading {
    pub min: Float,
    pub max: Float,
    pub interval: Float,
}

impl Shading {
    /// Checks that the range is non-empty and the interval is positive.
    pub fn check_bounds(&self) -> Result<(), ConfigError> {
        if !self.min.is_finite() || !self.max.is_finite() || !self.interval.is_finite() {
            return Err(ConfigError::OutOfBounds(
                "Shading range must consist of finite numbers",
            ));
        }

        if self.min >= self.max {
            return Err(ConfigError::OutOfBounds(
                "Shading minimum must be smaller than maximum",
            ));
        }

        if self.interval <= 0.0 {
            return Err(ConfigError::OutOfBounds(
                "Shading interval must be positive",
            ));
        }

        Ok(())
    }
}

/// Source of the free-text analysis label shown under the title.
///
/// The label is independent from [`Chart::time_index`], which alone
/// selects the data that gets plotted.
#[derive(Clone, PartialEq, Eq, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelSource {
    /// Ask for the label on the terminal and wait for the answer.
    Prompt,

    /// Use the provided text.
    Fixed(String),

    /// Format the time coordinate of the dataset at the plotted index.
    Dataset,
}

impl Default for LabelSource {
    fn default() -> Self {
        LabelSource::Prompt
    }
}

/// Fields describing what and how is drawn on the chart.
#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct Chart {
    /// Index of the plotted time along the time axis of the dataset.
    ///
    /// It is checked against the dataset only when rendering.
    pub time_index: usize,

    pub extent: Extent,

    pub shading: Shading,

    /// Font size (in points) of the title and colour bar label.
    ///
    /// Must be positive.
    pub title_font_size: Float,

    /// _(Optional)_ Stride (in gridpoints along both axes) between
    /// plotted wind barbs. Greater number means lower barb density.
    ///
    /// Defaults to `12`. Cannot be less than `1`.
    #[serde(default = "Chart::default_declutter")]
    pub declutter: usize,

    /// _(Optional)_ Where the analysis label comes from.
    ///
    /// Defaults to `prompt`.
    #[serde(default)]
    pub label: LabelSource,

    /// _(Optional)_ Draw contours of cyclonic relative vorticity.
    ///
    /// Defaults to `false`.
    #[serde(default)]
    pub vorticity_contours: bool,
}

impl Chart {
    fn default_declutter() -> usize {
        DEFAULT_DECLUTTER
    }

    /// Checks if chart settings follow conventions and limits.
    pub fn check_bounds(&self) -> Result<(), ConfigError> {
        self.extent.check_bounds()?;
        self.shading.check_bounds()?;

        if !(self.title_font_size > 0.0 && self.title_font_size.is_finite()) {
            return Err(ConfigError::OutOfBounds(
                "Title font size must be a positive number",
            ));
        }

        if self.declutter < 1 {
            return Err(ConfigError::OutOfBounds(
                "Barbs declutter stride cannot be less than 1",
            ));
        }

        Ok(())
    }
}

/// _(Optional)_ Fields describing the produced image.
#[derive(Clone, PartialEq, PartialOrd, Debug, Deserialize)]
pub struct Output {
    /// _(Optional)_ Path of the PNG file to write.
    ///
    /// Defaults to `./output/chart.png`.
    #[serde(default = "Output::default_path")]
    pub path: PathBuf,

    /// _(Optional)_ Width and height of the image in pixels.
    ///
    /// Defaults to `(1000, 1000)`. Neither can be less than `200`.
    #[serde(default = "Output::default_size")]
    pub size: (u32, u32),
}

impl Output {
    fn default_path() -> PathBuf {
        PathBuf::from("./output/chart.png")
    }

    fn default_size() -> (u32, u32) {
        (1000, 1000)
    }

    /// Checks if the image is large enough to hold the chart.
    pub fn check_bounds(&self) -> Result<(), ConfigError> {
        if self.size.0 < 200 || self.size.1 < 200 {
            return Err(ConfigError::OutOfBounds(
                "Output image cannot be smaller than 200x200 pixels",
            ));
        }

        Ok(())
    }
}

impl Default for Output {
    fn default() -> Self {
        Output {
            path: Output::default_path(),
            size: Output::default_size(),
        }
    }
}

/// _(Optional)_ Fields with information about
/// resources available for the program.
#[derive(Clone, PartialEq, PartialOrd, Debug, Deserialize)]
pub struct Resources {
    /// _(Optional)_ Heap memory limit in MB.
    /// Useful for enabling meaningful Out-of-memory error messages
    /// when reading large datasets.
    ///
    /// Cannot be less than `128`. Defaults to whole addressable-space.
    #[serde(default = "Resources::default_memory")]
    pub memory: usize,

    /// _(Optional)_ Path to a TrueType font used for all chart text.
    ///
    /// Without a font the chart is drawn with no text at all.
    #[serde(default)]
    pub font: Option<PathBuf>,

    /// _(Optional)_ Directory with GeoJSON files of map boundaries:
    /// `coastlines.geojson`, `countries.geojson`, `states.geojson`
    /// and `counties.geojson`. Missing files are skipped.
    #[serde(default)]
    pub geodata_dir: Option<PathBuf>,
}

impl Resources {
    fn default_memory() -> usize {
        usize::MAX / (1024 * 1024)
    }

    /// Checks if memory limit is above limits.
    pub fn check_bounds(&self) -> Result<(), ConfigError> {
        if self.memory < 128 {
            return Err(ConfigError::OutOfBounds(
                "Available memory cannot be less than 128 MB",
            ));
        }

        Ok(())
    }
}

impl Default for Resources {
    fn default() -> Self {
        Resources {
            memory: Resources::default_memory(),
            font: None,
            geodata_dir: None,
        }
    }
}

/// Main config structure representing the fields in
/// configuration file.
#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct Config {
    pub input: Input,

    pub chart: Chart,

    #[serde(default)]
    pub output: Output,

    #[serde(default)]
    pub resources: Resources,
}

impl Config {
    /// Config structure constructor, responsible for
    /// deserializing configuration and checking it.
    pub fn new_from_file(file_path: &Path) -> Result<Config, ConfigError> {
        let data = fs::read(file_path)?;
        Config::new_from_slice(data.as_slice())
    }

    fn new_from_slice(data: &[u8]) -> Result<Config, ConfigError> {
        let config: Config = serde_yaml::from_slice(data)?;

        config.chart.check_bounds()?;
        config.output.check_bounds()?;
        config.resources.check_bounds()?;

        Ok(config)
    }
}
