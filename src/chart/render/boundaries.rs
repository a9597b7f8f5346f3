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

//! Map boundary lines (coastlines and political borders)
//! read from GeoJSON files.

use crate::errors::RenderError;
use crate::Float;
use log::{debug, warn};
use serde::Deserialize;
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use tiny_skia::Color;

/// Kinds of boundaries with their file names and styles.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum BoundaryKind {
    Coastlines,
    States,
    Countries,
    Counties,
}

impl BoundaryKind {
    pub const ALL: [BoundaryKind; 4] = [
        BoundaryKind::Coastlines,
        BoundaryKind::States,
        BoundaryKind::Countries,
        BoundaryKind::Counties,
    ];

    fn file_name(self) -> &'static str {
        match self {
            BoundaryKind::Coastlines => "coastlines.geojson",
            BoundaryKind::States => "states.geojson",
            BoundaryKind::Countries => "countries.geojson",
            BoundaryKind::Counties => "counties.geojson",
        }
    }

    pub fn color(self) -> Color {
        match self {
            BoundaryKind::Coastlines | BoundaryKind::Countries => Color::BLACK,
            BoundaryKind::States => Color::from_rgba8(64, 64, 64, 255),
            BoundaryKind::Counties => Color::from_rgba8(128, 128, 128, 255),
        }
    }

    /// Line width in points.
    pub fn width(self) -> Float {
        match self {
            BoundaryKind::Coastlines | BoundaryKind::Countries => 0.8,
            BoundaryKind::States => 0.5,
            BoundaryKind::Counties => 0.3,
        }
    }
}

/// Boundary lines of one kind as `(longitude, latitude)` sequences.
#[derive(Clone, PartialEq, Debug)]
pub struct Boundaries {
    pub kind: BoundaryKind,
    pub lines: Vec<Vec<(Float, Float)>>,
}

/// Any of top-level GeoJSON objects carrying geometries.
#[derive(Deserialize)]
#[serde(untagged)]
enum Document {
    Collection { features: Vec<Feature> },
    Geometry(Geometry),
    Feature(Feature),
}

#[derive(Deserialize)]
enum FeatureTag {
    Feature,
}

#[derive(Deserialize)]
struct Feature {
    #[serde(rename = "type")]
    _tag: FeatureTag,
    geometry: Option<Geometry>,
}

type Position = Vec<Float>;

#[derive(Deserialize)]
#[serde(tag = "type", content = "coordinates")]
enum Geometry {
    LineString(Vec<Position>),
    MultiLineString(Vec<Vec<Position>>),
    Polygon(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
    Point(Position),
    MultiPoint(Vec<Position>),
}

impl Geometry {
    fn into_lines(self) -> Vec<Vec<Position>> {
        match self {
            Geometry::LineString(line) => vec![line],
            Geometry::MultiLineString(lines) | Geometry::Polygon(lines) => lines,
            Geometry::MultiPolygon(polygons) => polygons.into_iter().flatten().collect(),
            Geometry::Point(_) | Geometry::MultiPoint(_) => vec![],
        }
    }
}

impl Boundaries {
    /// Reads all boundary kinds present in the directory.
    ///
    /// Missing files are skipped, so the chart can be drawn
    /// with any subset of boundaries.
    pub fn load_all(dir: &Path) -> Result<Vec<Boundaries>, RenderError> {
        let mut all = vec![];

        for kind in BoundaryKind::ALL {
            if let Some(boundaries) = Boundaries::load(dir, kind)? {
                debug!(
                    "Read {} lines of {:?} boundaries",
                    boundaries.lines.len(),
                    kind
                );
                all.push(boundaries);
            }
        }

        Ok(all)
    }

    fn load(dir: &Path, kind: BoundaryKind) -> Result<Option<Boundaries>, RenderError> {
        let path = dir.join(kind.file_name());

        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                if kind == BoundaryKind::Counties {
                    debug!("No county boundaries in {}", dir.display());
                } else {
                    warn!(
                        "Boundaries file {} not found, {:?} will not be drawn",
                        path.display(),
                        kind
                    );
                }
                return Ok(None);
            }
            Err(err) => return Err(RenderError::CantReadBoundaries(path, err)),
        };

        Boundaries::from_slice(&data, kind, path).map(Some)
    }

    fn from_slice(data: &[u8], kind: BoundaryKind, path: PathBuf) -> Result<Self, RenderError> {
        let document: Document = serde_json::from_slice(data)
            .map_err(|err| RenderError::CantParseBoundaries(path, err))?;

        let geometries: Vec<Geometry> = match document {
            Document::Collection { features } => {
                features.into_iter().filter_map(|f| f.geometry).collect()
            }
            Document::Feature(feature) => feature.geometry.into_iter().collect(),
            Document::Geometry(geometry) => vec![geometry],
        };

        let lines = geometries
            .into_iter()
            .flat_map(Geometry::into_lines)
            .map(|line| {
                line.into_iter()
                    .filter(|p| p.len() >= 2)
                    .map(|p| (p[0], p[1]))
                    .collect::<Vec<_>>()
            })
            .filter(|line| line.len() >= 2)
            .collect();

        Ok(Boundaries { kind, lines })
    }
}

#[cfg(test)]
mod tests {
    use super::{BoundaryKind, Boundaries};
    use crate::errors::RenderError;
    use std::path::PathBuf;

    const COLLECTION: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "name": "coast" },
                "geometry": { "type": "LineString", "coordinates": [[-100.0, 40.0], [-99.0, 41.0, 12.0]] }
            },
            {
                "type": "Feature",
                "properties": {},
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [[[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]], [[[5.0, 5.0], [6.0, 5.0], [5.0, 5.0]]]]
                }
            },
            { "type": "Feature", "properties": {}, "geometry": null },
            { "type": "Feature", "properties": {}, "geometry": { "type": "Point", "coordinates": [3.0, 3.0] } }
        ]
    }"#;

    #[test]
    fn reads_lines_and_polygons() {
        let boundaries = Boundaries::from_slice(
            COLLECTION.as_bytes(),
            BoundaryKind::Coastlines,
            PathBuf::from("coastlines.geojson"),
        )
        .unwrap();

        assert_eq!(boundaries.lines.len(), 3);
        assert_eq!(boundaries.lines[0], vec![(-100.0, 40.0), (-99.0, 41.0)]);
        assert_eq!(boundaries.lines[1].len(), 4);
    }

    #[test]
    fn reads_single_objects() {
        let feature = r#"{ "type": "Feature", "geometry": { "type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]] } }"#;
        let boundaries = Boundaries::from_slice(
            feature.as_bytes(),
            BoundaryKind::States,
            PathBuf::from("states.geojson"),
        )
        .unwrap();
        assert_eq!(boundaries.lines, vec![vec![(0.0, 0.0), (1.0, 1.0)]]);

        let geometry = r#"{ "type": "MultiLineString", "coordinates": [[[0.0, 0.0], [1.0, 1.0]], [[2.0, 2.0], [3.0, 3.0]]] }"#;
        let boundaries = Boundaries::from_slice(
            geometry.as_bytes(),
            BoundaryKind::States,
            PathBuf::from("states.geojson"),
        )
        .unwrap();
        assert_eq!(boundaries.lines.len(), 2);
    }

    #[test]
    fn rejects_broken_file() {
        let result = Boundaries::from_slice(
            b"{ \"features\": 3 }",
            BoundaryKind::States,
            PathBuf::from("states.geojson"),
        );

        assert!(matches!(result, Err(RenderError::CantParseBoundaries(_, _))));
    }

    #[test]
    fn skips_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("countries.geojson"),
            r#"{ "type": "FeatureCollection", "features": [] }"#,
        )
        .unwrap();

        let all = Boundaries::load_all(dir.path()).unwrap();

        assert_eq!(all.len(), 1);
        assert_eq!(all[0].kind, BoundaryKind::Countries);
        assert!(all[0].lines.is_empty());
    }
}
