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

//! Contour line (isoline) tracing using marching squares algorithm
//! and placement of inline contour labels.
//!
//! Lines are traced in index space of the grid (column, row), so
//! they do not depend on the projection and are converted to
//! geographic coordinates only when drawn.

use crate::Float;
use ndarray::ArrayView2;
use std::collections::{HashMap, VecDeque};

/// A point in index space of the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub col: Float,
    pub row: Float,
}

impl Point {
    fn new(col: Float, row: Float) -> Self {
        Point { col, row }
    }

    fn key(&self) -> (i64, i64) {
        ((self.col * 1.0e6).round() as i64, (self.row * 1.0e6).round() as i64)
    }
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    start: Point,
    end: Point,
}

/// A complete contour line (polyline).
#[derive(Debug, Clone, PartialEq)]
pub struct ContourLine {
    pub level: Float,
    pub points: Vec<Point>,
    pub closed: bool,
}

/// Traces all lines of given level through the field
/// indexed `[row, column]`.
///
/// Cells with a missing (NaN) corner are skipped, so lines
/// end at the border of missing data.
pub fn trace(field: ArrayView2<Float>, level: Float) -> Vec<ContourLine> {
    let segments = march_squares(field, level);

    join_segments(&segments)
        .into_iter()
        .map(|(points, closed)| ContourLine {
            level,
            points,
            closed,
        })
        .collect()
}

fn march_squares(field: ArrayView2<Float>, level: Float) -> Vec<Segment> {
    let (rows, cols) = field.dim();

    if rows < 2 || cols < 2 {
        return vec![];
    }

    let mut segments = vec![];

    for y in 0..(rows - 1) {
        for x in 0..(cols - 1) {
            let tl = field[[y, x]];
            let tr = field[[y, x + 1]];
            let bl = field[[y + 1, x]];
            let br = field[[y + 1, x + 1]];

            if tl.is_nan() || tr.is_nan() || bl.is_nan() || br.is_nan() {
                continue;
            }

            let mut case = 0;
            if tl >= level {
                case |= 1;
            }
            if tr >= level {
                case |= 2;
            }
            if br >= level {
                case |= 4;
            }
            if bl >= level {
                case |= 8;
            }

            cell_segments(
                &mut segments,
                case,
                (x as Float, y as Float),
                [tl, tr, br, bl],
                level,
            );
        }
    }

    segments
}

/// Adds segments crossing one cell, with crossing points
/// linearly interpolated along the cell edges.
fn cell_segments(
    segments: &mut Vec<Segment>,
    case: u8,
    (x, y): (Float, Float),
    [tl, tr, br, bl]: [Float; 4],
    level: Float,
) {
    let top = || interpolate_edge((x, y), (x + 1.0, y), tl, tr, level);
    let right = || interpolate_edge((x + 1.0, y), (x + 1.0, y + 1.0), tr, br, level);
    let bottom = || interpolate_edge((x, y + 1.0), (x + 1.0, y + 1.0), bl, br, level);
    let left = || interpolate_edge((x, y), (x, y + 1.0), tl, bl, level);

    let mut push = |start: Point, end: Point| segments.push(Segment { start, end });

    match case {
        1 | 14 => push(left(), top()),
        2 | 13 => push(top(), right()),
        3 | 12 => push(left(), right()),
        4 | 11 => push(right(), bottom()),
        5 => {
            push(left(), top());
            push(right(), bottom());
        }
        6 | 9 => push(top(), bottom()),
        7 | 8 => push(left(), bottom()),
        10 => {
            push(top(), right());
            push(left(), bottom());
        }
        _ => (),
    }
}

fn interpolate_edge(
    (x1, y1): (Float, Float),
    (x2, y2): (Float, Float),
    val1: Float,
    val2: Float,
    level: Float,
) -> Point {
    if (val2 - val1).abs() < 1e-12 {
        return Point::new((x1 + x2) / 2.0, (y1 + y2) / 2.0);
    }

    let t = ((level - val1) / (val2 - val1)).clamp(0.0, 1.0);

    Point::new(x1 + t * (x2 - x1), y1 + t * (y2 - y1))
}

/// Connects unordered segments into polylines through shared endpoints.
///
/// Neighbouring cells compute their shared crossing point identically,
/// so endpoints are matched by their rounded coordinates.
fn join_segments(segments: &[Segment]) -> Vec<(Vec<Point>, bool)> {
    let mut ends: HashMap<(i64, i64), Vec<usize>> = HashMap::new();

    for (i, segment) in segments.iter().enumerate() {
        ends.entry(segment.start.key()).or_default().push(i);
        ends.entry(segment.end.key()).or_default().push(i);
    }

    let mut used = vec![false; segments.len()];
    let mut lines = vec![];

    for first in 0..segments.len() {
        if used[first] {
            continue;
        }
        used[first] = true;

        let mut line = VecDeque::from([segments[first].start, segments[first].end]);

        while let Some(next) = continuation(segments, &ends, &mut used, line.back()) {
            line.push_back(next);
        }

        while let Some(next) = continuation(segments, &ends, &mut used, line.front()) {
            line.push_front(next);
        }

        let closed = match (line.front(), line.back()) {
            (Some(front), Some(back)) => line.len() > 2 && front.key() == back.key(),
            _ => false,
        };

        lines.push((Vec::from(line), closed));
    }

    lines
}

/// Takes the next unused segment touching the point
/// and returns its other end.
fn continuation(
    segments: &[Segment],
    ends: &HashMap<(i64, i64), Vec<usize>>,
    used: &mut [bool],
    point: Option<&Point>,
) -> Option<Point> {
    let key = point?.key();
    let next = ends.get(&key)?.iter().copied().find(|&i| !used[i])?;

    used[next] = true;
    let segment = segments[next];

    if segment.start.key() == key {
        Some(segment.end)
    } else {
        Some(segment.start)
    }
}

/// Position of an inline contour label, in pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct ContourLabel {
    pub text: String,
    pub centre: (f32, f32),
    pub half_size: (f32, f32),
}

impl ContourLabel {
    fn overlaps(&self, other: &ContourLabel) -> bool {
        (self.centre.0 - other.centre.0).abs() < self.half_size.0 + other.half_size.0
            && (self.centre.1 - other.centre.1).abs() < self.half_size.1 + other.half_size.1
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        (x - self.centre.0).abs() <= self.half_size.0 && (y - self.centre.1).abs() <= self.half_size.1
    }
}

/// Chooses at most one label position per line, at the middle of
/// its length, skipping lines too short to carry the label and
/// positions where the label would overlap another one or stick
/// out of the bounds.
///
/// `measure` gives the size (in pixels) of the rendered text.
pub fn place_labels<M>(
    lines: &[(Float, Vec<(f32, f32)>)],
    bounds: (f32, f32, f32, f32),
    measure: M,
) -> Vec<ContourLabel>
where
    M: Fn(&str) -> (f32, f32),
{
    let (left, top, right, bottom) = bounds;
    let mut labels: Vec<ContourLabel> = vec![];

    for (level, points) in lines {
        let text = format!("{:.0}", level);
        let (width, height) = measure(&text);
        let half_size = (width / 2.0 + 2.0, height / 2.0 + 1.0);

        let length = polyline_length(points);
        if length < 3.0 * width {
            continue;
        }

        let centre = match point_at(points, length / 2.0) {
            Some(centre) => centre,
            None => continue,
        };

        let label = ContourLabel {
            text,
            centre,
            half_size,
        };

        let inside = centre.0 - half_size.0 >= left
            && centre.0 + half_size.0 <= right
            && centre.1 - half_size.1 >= top
            && centre.1 + half_size.1 <= bottom;

        if inside && !labels.iter().any(|l| l.overlaps(&label)) {
            labels.push(label);
        }
    }

    labels
}

fn polyline_length(points: &[(f32, f32)]) -> f32 {
    points
        .windows(2)
        .map(|w| ((w[1].0 - w[0].0).powi(2) + (w[1].1 - w[0].1).powi(2)).sqrt())
        .sum()
}

fn point_at(points: &[(f32, f32)], distance: f32) -> Option<(f32, f32)> {
    let mut travelled = 0.0;

    for w in points.windows(2) {
        let step = ((w[1].0 - w[0].0).powi(2) + (w[1].1 - w[0].1).powi(2)).sqrt();

        if step > 0.0 && travelled + step >= distance {
            let t = (distance - travelled) / step;
            return Some((w[0].0 + t * (w[1].0 - w[0].0), w[0].1 + t * (w[1].1 - w[0].1)));
        }

        travelled += step;
    }

    points.last().copied()
}

#[cfg(test)]
mod tests {
    use super::{interpolate_edge, place_labels, trace};
    use float_cmp::approx_eq;
    use ndarray::{array, Array2};

    #[test]
    fn test_interpolate_edge() {
        let p = interpolate_edge((0.0, 0.0), (1.0, 0.0), 0.0, 10.0, 5.0);
        assert!(approx_eq!(f64, p.col, 0.5));
        assert!(approx_eq!(f64, p.row, 0.0));
    }

    #[test]
    fn flat_field_has_no_lines() {
        let field = Array2::from_elem((3, 3), 5.0);
        assert!(trace(field.view(), 5.5).is_empty());
    }

    #[test]
    fn peak_gives_closed_line() {
        let field = array![[0.0, 0.0, 0.0], [0.0, 10.0, 0.0], [0.0, 0.0, 0.0]];
        let lines = trace(field.view(), 5.0);

        assert_eq!(lines.len(), 1);
        assert!(lines[0].closed);
        // four crossing points plus the repeated first one
        assert_eq!(lines[0].points.len(), 5);

        for p in &lines[0].points {
            let distance = (p.col - 1.0).abs() + (p.row - 1.0).abs();
            assert!(approx_eq!(f64, distance, 0.5, epsilon = 1e-9));
        }
    }

    #[test]
    fn gradient_gives_open_line() {
        let field = array![
            [0.0, 10.0, 20.0, 30.0],
            [0.0, 10.0, 20.0, 30.0],
            [0.0, 10.0, 20.0, 30.0]
        ];
        let lines = trace(field.view(), 15.0);

        assert_eq!(lines.len(), 1);
        assert!(!lines[0].closed);
        assert_eq!(lines[0].points.len(), 3);
        assert!(lines[0]
            .points
            .iter()
            .all(|p| approx_eq!(f64, p.col, 1.5, epsilon = 1e-9)));
    }

    #[test]
    fn missing_cells_are_skipped() {
        let field = array![
            [0.0, 10.0, 20.0],
            [0.0, f64::NAN, 20.0],
            [0.0, 10.0, 20.0]
        ];

        assert!(trace(field.view(), 5.0).is_empty());
    }

    #[test]
    fn labels_do_not_overlap() {
        let line: Vec<(f32, f32)> = (0..=10).map(|i| (i as f32 * 20.0, 100.0)).collect();
        let lines = vec![(570.0, line.clone()), (576.0, line), (582.0, vec![(0.0, 0.0), (5.0, 0.0)])];

        let labels = place_labels(&lines, (0.0, 0.0, 400.0, 400.0), |t| {
            (8.0 * t.len() as f32, 12.0)
        });

        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].text, "570");
        assert!(approx_eq!(f32, labels[0].centre.0, 100.0, epsilon = 1e-3));
        assert!(labels[0].contains(100.0, 100.0));
        assert!(!labels[0].contains(150.0, 100.0));
    }
}
