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

//! Acquisition of the free-text analysis label.
//!
//! The label is only displayed on the chart. It is never used
//! to select data, so it may describe a different time than
//! the one pointed by the configured time index.

use super::analysis::Analysis;
use super::configuration::LabelSource;
use crate::constants::LABEL_PROMPT;
use crate::errors::ChartError;
use log::{debug, warn};
use std::io::{self, BufRead, Write};

/// Gets the analysis label from the configured source.
///
/// With [`LabelSource::Prompt`] this blocks until a line
/// is entered on the terminal.
pub fn acquire(
    source: &LabelSource,
    analysis: &Analysis,
    time_index: usize,
) -> Result<String, ChartError> {
    match source {
        LabelSource::Prompt => {
            debug!("Waiting for the analysis label on stdin");
            let stdin = io::stdin();
            let stdout = io::stdout();
            prompt(&mut stdin.lock(), &mut stdout.lock()).map_err(ChartError::Label)
        }
        LabelSource::Fixed(text) => Ok(text.clone()),
        LabelSource::Dataset => Ok(from_dataset(analysis, time_index)),
    }
}

/// Prints the prompt and reads a single line of answer.
///
/// End of input gives an empty label.
fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<String> {
    write!(output, "{} ", LABEL_PROMPT)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
}

fn from_dataset(analysis: &Analysis, time_index: usize) -> String {
    let datetime = analysis
        .times
        .as_ref()
        .and_then(|times| times.datetime(time_index));

    match datetime {
        Some(datetime) => datetime.format("%Y-%m-%d %H:%M UTC").to_string(),
        None => {
            warn!(
                "Dataset provides no time for index {}, the analysis label will be empty",
                time_index
            );
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{from_dataset, prompt};
    use crate::chart::analysis::{Analysis, RawDataset, TimeAxis};
    use crate::constants::LABEL_PROMPT;
    use ndarray::Array3;
    use std::io::Cursor;

    #[test]
    fn reads_one_line() {
        let mut input = Cursor::new("00Z 15 Mar 2021\r\nsecond line\n");
        let mut output = Vec::new();

        let label = prompt(&mut input, &mut output).unwrap();

        assert_eq!(label, "00Z 15 Mar 2021");
        assert!(String::from_utf8(output).unwrap().starts_with(LABEL_PROMPT));
    }

    #[test]
    fn end_of_input_gives_empty_label() {
        let mut input = Cursor::new("");
        let mut output = Vec::new();

        assert_eq!(prompt(&mut input, &mut output).unwrap(), "");
    }

    fn analysis(times: Option<TimeAxis>) -> Analysis {
        Analysis::from_raw(RawDataset {
            lats: vec![10.0],
            lons: vec![20.0],
            geopotential: Array3::zeros((2, 1, 1)),
            u_wind: Array3::zeros((2, 1, 1)),
            v_wind: Array3::zeros((2, 1, 1)),
            vorticity: Array3::zeros((2, 1, 1)),
            times,
            level: None,
        })
    }

    #[test]
    fn label_from_dataset_time() {
        let times = TimeAxis::new("hours since 2021-03-15 00:00:00", vec![0.0, 12.0]).unwrap();
        let analysis = analysis(Some(times));

        assert_eq!(from_dataset(&analysis, 1), "2021-03-15 12:00 UTC");
        assert_eq!(from_dataset(&analysis, 2), "");
    }

    #[test]
    fn fill_valued_time_gives_empty_label() {
        let times = TimeAxis::new(
            "hours since 1900-01-01 00:00:00.0",
            vec![1_060_000.0, 9.969209968386869e36],
        )
        .unwrap();
        let analysis = analysis(Some(times));

        assert_eq!(from_dataset(&analysis, 1), "");
    }

    #[test]
    fn label_without_time_axis() {
        assert_eq!(from_dataset(&analysis(None), 0), "");
    }
}
