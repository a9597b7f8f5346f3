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

//! Isotach Chart (isochart) renders a single upper-air analysis
//! chart from gridded reanalysis data: geopotential height contours,
//! isotachs (filled wind-speed shading) and wind barbs at one
//! pressure level.
//!
//! The program reads `config.yaml` from the working directory,
//! loads the requested netCDF dataset, derives and masks the
//! fields and writes one PNG image of the chart.

mod chart;
mod constants;
mod errors;

use cap::Cap;
use env_logger::Env;
use log::{error, info};
use std::alloc;

type Float = f64;

/// Global allocator used by the program.
///
/// Use of static global allocator allows for capping the memory to the limit set by user
/// in configuration file and in effect provide better [OOM error](https://en.wikipedia.org/wiki/Out_of_memory) handling.
#[global_allocator]
static ALLOCATOR: Cap<alloc::System> = Cap::new(alloc::System, usize::MAX);

/// The main program function.
/// Prepares the runtime environment and calls the [`chart::main`].
///
/// The `env_logger` needs to be initiated before any log messages
/// are possible to occur, so that errors from reading the dataset
/// are reported with the same formatting as the rest of the output.
fn main() {
    #[cfg(not(feature = "debug"))]
    let logger_env = Env::new().filter_or("ISOCHART_LOG_LEVEL", "info");

    #[cfg(feature = "debug")]
    let logger_env = Env::new().filter_or("ISOCHART_LOG_LEVEL", "debug");

    env_logger::Builder::from_env(logger_env)
        .format_timestamp_millis()
        .init();

    match chart::main() {
        Ok(_) => info!("Chart rendering finished. Check the output directory and log."),
        Err(err) => error!("Chart rendering failed with error: {}", err),
    }
}
