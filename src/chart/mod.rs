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

//! Module containing the actual chart code.
//!
//! Drawing a chart takes three steps: reading the configuration
//! together with the dataset into [`Core`], getting the analysis label,
//! and rendering the figure which is then saved as a PNG file.

mod analysis;
mod configuration;
mod label;
mod render;


use crate::chart::{
    analysis::Analysis,
    configuration::Config,
    render::{RenderParams, Renderer},
};
use crate::constants::DEFAULT_LEVEL;
use crate::{errors::ChartError, Float, ALLOCATOR};
use log::{debug, info};
use std::{fs, path::Path};

/// Main chart function, responsible for all steps from
/// reading the configuration to writing the image.
pub fn main() -> Result<(), ChartError> {
    info!("Preparing the chart core");

    let core = Core::new()?;

    let label = label::acquire(
        &core.config.chart.label,
        &core.analysis,
        core.config.chart.time_index,
    )?;

    let params = RenderParams::new(&core.config.chart, core.level());
    let figure = core.renderer.render(&core.analysis, &params, &label)?;

    prepare_output_dir(&core.config.output.path)?;

    info!("Writing chart to {}", core.config.output.path.display());
    figure.save(&core.config.output.path)?;

    Ok(())
}

/// Structure containing everything needed to draw a chart.
pub struct Core {
    pub config: Config,
    pub analysis: Analysis,
    pub renderer: Renderer,
}

impl Core {
    /// Chart [`Core`] constructor.
    ///
    /// Configuration and input data provided by the user
    /// are loaded and checked before anything is drawn.
    pub fn new() -> Result<Self, ChartError> {
        debug!("Reading configuration from config.yaml");
        let config = Config::new_from_file(Path::new("config.yaml"))?;

        debug!("Setting memory limit");
        ALLOCATOR
            .set_limit(config.resources.memory.saturating_mul(1024 * 1024))
            .map_err(|_| ChartError::MemoryLimit(config.resources.memory))?;

        debug!("Reading analysis from {}", config.input.data_file.display());
        let analysis = Analysis::new(&config.input)?;

        let renderer = Renderer::new(&config.resources, &config.output)?;

        Ok(Core {
            config,
            analysis,
            renderer,
        })
    }

    /// Pressure level shown in the title, from configuration,
    /// then from the dataset, then the default.
    fn level(&self) -> Float {
        self.config
            .input
            .level
            .or(self.analysis.level)
            .unwrap_or(DEFAULT_LEVEL)
    }
}

/// Creates the directory for the output image if it does not exist.
///
/// An existing image at the output path is overwritten.
fn prepare_output_dir(path: &Path) -> Result<(), ChartError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.is_dir() => {
            debug!("Output directory does not exist so creating a new one");
            fs::create_dir_all(dir)?;
        }
        _ => debug!("Output directory exists"),
    }

    Ok(())
}
