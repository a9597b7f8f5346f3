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

//! Module responsible for drawing the chart.
//!
//! The [`Renderer`] holds resources that do not change between
//! charts (font and map boundaries) and draws one [`Figure`]
//! from the [`Analysis`] per call of [`Renderer::render`].
//!
//! Layers are drawn on a vector canvas in fixed order: wind speed shading,
//! coastlines with state and country borders, height contours, optional
//! vorticity contours, wind barbs, county borders, map frame and colour bar.
//! All text is put on the rasterised image at the end.

mod barbs;
mod boundaries;
mod canvas;
mod colorbar;
mod colormap;
mod contour;
mod levels;
mod projection;
mod text;

pub use self::projection::PixelRect;

use self::barbs::Barb;
use self::boundaries::{Boundaries, BoundaryKind};
use self::colorbar::ColorBarText;
use self::projection::MapView;
use self::text::{Align, TextItem, Typeface};
use super::analysis::{Analysis, FieldKind};
use super::configuration::{Chart, Extent, Output, Resources, Shading};
use crate::constants::{BARB_LENGTH, CONTOUR_LABEL_SIZE, TICK_LABEL_SIZE};
use crate::{errors::RenderError, Float};
use image::RgbaImage;
use log::{debug, info, warn};
use ndarray::{Array1, Axis};
use std::path::Path;
use tiny_skia::{Color, Mask, Pixmap, PixmapPaint, Transform};

/// Line widths in points.
const HEIGHT_LINE_WIDTH: Float = 1.5;
const VORTICITY_LINE_WIDTH: Float = 1.0;
const BARB_LINE_WIDTH: Float = 0.8;

/// Chart settings for a single render.
#[derive(Clone, PartialEq, Debug)]
pub struct RenderParams {
    pub time_index: usize,
    pub extent: Extent,
    pub shading: Shading,
    pub title_font_size: Float,
    pub declutter: usize,
    pub vorticity_contours: bool,
    /// Pressure level (in hPa) shown in the title.
    pub level: Float,
}

impl RenderParams {
    pub fn new(chart: &Chart, level: Float) -> Self {
        RenderParams {
            time_index: chart.time_index,
            extent: chart.extent,
            shading: chart.shading,
            title_font_size: chart.title_font_size,
            declutter: chart.declutter,
            vorticity_contours: chart.vorticity_contours,
            level,
        }
    }
}

/// Rendered chart ready to be saved.
#[derive(Clone, Debug)]
pub struct Figure {
    pub image: RgbaImage,
    /// Area of the image covered by the map.
    pub map_area: PixelRect,
    pub title: String,
    pub subtitle: Option<String>,
}

impl Figure {
    /// Writes the figure as PNG image.
    pub fn save(&self, path: &Path) -> Result<(), RenderError> {
        self.image.save(path)?;
        Ok(())
    }
}

/// Placement of the figure parts before the map is fitted.
struct Layout {
    map_area: PixelRect,
    title_size: f32,
    tick_size: f32,
}

impl Layout {
    fn new(size: (u32, u32), title_font_size: Float) -> Self {
        let title_size = canvas::pt_to_px(title_font_size, size.0);
        let tick_size = canvas::pt_to_px(TICK_LABEL_SIZE, size.0);

        let (width, height) = (size.0 as f32, size.1 as f32);
        let margin = 0.04 * width;

        let top = (margin + 2.8 * title_size).min(0.5 * height);
        let right_reserve = 0.04 * width + 4.5 * tick_size + 2.0 * title_size;

        Layout {
            map_area: PixelRect {
                left: margin,
                top,
                right: (width - margin - right_reserve).max(margin + 1.0),
                bottom: height - margin,
            },
            title_size,
            tick_size,
        }
    }
}

/// Main struct drawing the charts.
pub struct Renderer {
    size: (u32, u32),
    typeface: Option<Typeface>,
    boundaries: Vec<Boundaries>,
}

impl Renderer {
    /// Renderer constructor, reading the font
    /// and map boundaries given in the configuration.
    pub fn new(resources: &Resources, output: &Output) -> Result<Self, RenderError> {
        debug!("Creating new renderer");

        let typeface = match &resources.font {
            Some(path) => Some(Typeface::load(path)?),
            None => {
                warn!("No font configured, the chart will be drawn without any text");
                None
            }
        };

        let boundaries = match &resources.geodata_dir {
            Some(dir) => Boundaries::load_all(dir)?,
            None => {
                warn!("No geodata directory configured, map boundaries will not be drawn");
                vec![]
            }
        };

        Ok(Renderer {
            size: output.size,
            typeface,
            boundaries,
        })
    }

    /// Draws the chart for given time index of the analysis.
    ///
    /// The label is shown as a sub-title only and does not
    /// affect which data is drawn.
    pub fn render(
        &self,
        analysis: &Analysis,
        params: &RenderParams,
        label: &str,
    ) -> Result<Figure, RenderError> {
        let len = analysis.time_len();
        if params.time_index >= len {
            return Err(RenderError::TimeIndexOutOfBounds {
                index: params.time_index,
                len,
            });
        }

        info!("Rendering chart for time index {}", params.time_index);

        let (width, height) = self.size;
        let mut pixmap =
            Pixmap::new(width, height).ok_or(RenderError::CantCreateCanvas(width, height))?;
        pixmap.fill(Color::WHITE);

        let layout = Layout::new(self.size, params.title_font_size);
        let mut texts = vec![];

        let levels = levels::shading_levels(
            params.shading.min,
            params.shading.max,
            params.shading.interval,
        );
        let colors = colormap::band_colors(&levels);

        let map_area = match MapView::fit(&params.extent, layout.map_area)? {
            Some(view) => {
                self.draw_map(&mut pixmap, &view, analysis, params, &levels, &colors, &mut texts)?;
                view.rect()
            }
            None => {
                warn!("Chart extent has no area, the map will be empty");
                layout.map_area
            }
        };

        debug!("Drawing colour bar");
        let bar_width = (0.02 * map_area.width()).max(4.0);
        let bar_left = map_area.right + 0.02 * width as f32;
        let bar = PixelRect {
            left: bar_left,
            right: bar_left + bar_width,
            ..map_area
        };
        texts.extend(colorbar::draw(
            &mut pixmap,
            bar,
            &levels,
            &colors,
            ColorBarText {
                tick_size: layout.tick_size,
                label_size: layout.title_size,
            },
        ));

        let title = format!(
            "{:.0} mb Geopotential height (dam), Winds (kt) {}",
            params.level, params.time_index
        );
        let (centre_x, _) = map_area.centre();
        texts.push(TextItem::new(
            title.clone(),
            (centre_x, map_area.top - 1.9 * layout.title_size),
            layout.title_size,
            Align::Centre,
        ));

        let subtitle = if label.is_empty() {
            None
        } else {
            let subtitle = format!("Analysis: {}", label);
            texts.push(TextItem::new(
                subtitle.clone(),
                (map_area.right, map_area.top - 0.7 * layout.title_size),
                0.8 * layout.title_size,
                Align::Right,
            ));
            Some(subtitle)
        };

        let mut image = canvas::to_image(&pixmap)?;

        match &self.typeface {
            Some(typeface) => {
                debug!("Drawing {} text items", texts.len());
                for item in &texts {
                    typeface.draw(&mut image, item);
                }
            }
            None => warn!("Skipping {} text items as no font is available", texts.len()),
        }

        Ok(Figure {
            image,
            map_area,
            title,
            subtitle,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_map(
        &self,
        pixmap: &mut Pixmap,
        view: &MapView,
        analysis: &Analysis,
        params: &RenderParams,
        levels: &[Float],
        colors: &[[u8; 3]],
        texts: &mut Vec<TextItem>,
    ) -> Result<(), RenderError> {
        let (width, height) = self.size;
        let clip = canvas::clip_mask(width, height, view.rect());

        debug!("Shading isotachs");
        shade(pixmap, view, analysis, params.time_index, levels, colors);

        debug!("Drawing map boundaries");
        let (counties, others): (Vec<_>, Vec<_>) = self
            .boundaries
            .iter()
            .partition(|b| b.kind == BoundaryKind::Counties);

        for boundaries in others {
            self.draw_boundaries(pixmap, view, boundaries, clip.as_ref());
        }

        debug!("Drawing height contours");
        let labels =
            self.draw_height_contours(pixmap, view, analysis, params.time_index, clip.as_ref())?;
        texts.extend(labels);

        if params.vorticity_contours {
            debug!("Drawing vorticity contours");
            let lines: Vec<Vec<(f32, f32)>> =
                contour_lines(view, analysis, FieldKind::Vorticity, params.time_index)
                    .into_iter()
                    .map(|(_, line)| line)
                    .collect();
            canvas::stroke_lines(
                pixmap,
                &lines,
                Color::from_rgba8(255, 0, 0, 255),
                canvas::pt_to_px(VORTICITY_LINE_WIDTH, width),
                clip.as_ref(),
            );
        }

        debug!("Drawing wind barbs");
        self.draw_barbs(pixmap, view, analysis, params, clip.as_ref());

        for boundaries in counties {
            self.draw_boundaries(pixmap, view, boundaries, clip.as_ref());
        }

        canvas::stroke_rect(pixmap, view.rect(), Color::BLACK, 1.0);

        Ok(())
    }

    fn draw_boundaries(
        &self,
        pixmap: &mut Pixmap,
        view: &MapView,
        boundaries: &Boundaries,
        clip: Option<&Mask>,
    ) {
        let lines: Vec<Vec<(f32, f32)>> = boundaries
            .lines
            .iter()
            .flat_map(|line| project_line(view, line.iter().copied()))
            .collect();

        canvas::stroke_lines(
            pixmap,
            &lines,
            boundaries.kind.color(),
            canvas::pt_to_px(boundaries.kind.width(), self.size.0),
            clip,
        );
    }

    /// Draws black height contours on a separate layer, so that
    /// lines can be cut under the labels, and returns the labels.
    fn draw_height_contours(
        &self,
        pixmap: &mut Pixmap,
        view: &MapView,
        analysis: &Analysis,
        time_index: usize,
        clip: Option<&Mask>,
    ) -> Result<Vec<TextItem>, RenderError> {
        let (width, height) = self.size;
        let mut layer =
            Pixmap::new(width, height).ok_or(RenderError::CantCreateCanvas(width, height))?;

        let lines = contour_lines(view, analysis, FieldKind::Height, time_index);
        let strokes: Vec<Vec<(f32, f32)>> = lines.iter().map(|(_, line)| line.clone()).collect();

        canvas::stroke_lines(
            &mut layer,
            &strokes,
            Color::BLACK,
            canvas::pt_to_px(HEIGHT_LINE_WIDTH, width),
            clip,
        );

        let mut texts = vec![];

        if let Some(typeface) = &self.typeface {
            let size = canvas::pt_to_px(CONTOUR_LABEL_SIZE, width);
            let rect = view.rect();

            let labels = contour::place_labels(
                &lines,
                (rect.left, rect.top, rect.right, rect.bottom),
                |text| typeface.measure(text, size),
            );

            canvas::clear_where(&mut layer, |x, y| labels.iter().any(|l| l.contains(x, y)));

            texts = labels
                .into_iter()
                .map(|l| TextItem::new(l.text, l.centre, size, Align::Centre))
                .collect();
        }

        pixmap.draw_pixmap(
            0,
            0,
            layer.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );

        Ok(texts)
    }

    fn draw_barbs(
        &self,
        pixmap: &mut Pixmap,
        view: &MapView,
        analysis: &Analysis,
        params: &RenderParams,
        clip: Option<&Mask>,
    ) {
        let width = self.size.0;
        let length = canvas::pt_to_px(BARB_LENGTH, width);
        let line_width = canvas::pt_to_px(BARB_LINE_WIDTH, width);
        let rect = view.rect();

        let u_wind = analysis.field(FieldKind::UWind);
        let v_wind = analysis.field(FieldKind::VWind);
        let t = params.time_index;

        let mut lines = vec![];
        let mut triangles = vec![];

        let mesh = &analysis.mesh;
        let (rows, cols) = mesh.lons.dim();

        for j in (0..rows).step_by(params.declutter) {
            for i in (0..cols).step_by(params.declutter) {
                let tip = view.to_pixel(mesh.lons[[j, i]], mesh.lats[[j, i]]);
                if !rect.contains(tip.0, tip.1) {
                    continue;
                }

                let (u, v) = (u_wind[[t, j, i]], v_wind[[t, j, i]]);
                if u.is_nan() || v.is_nan() {
                    continue;
                }

                match Barb::new(tip, u, v, length) {
                    Barb::Calm { centre, radius } => {
                        canvas::stroke_circle(pixmap, centre, radius, Color::BLACK, line_width, clip)
                    }
                    Barb::Wind {
                        shaft,
                        flags,
                        barbs,
                    } => {
                        lines.push(shaft.to_vec());
                        lines.extend(barbs.iter().map(|b| b.to_vec()));
                        triangles.extend(flags);
                    }
                }
            }
        }

        canvas::stroke_lines(pixmap, &lines, Color::BLACK, line_width, clip);
        canvas::fill_triangles(pixmap, &triangles, Color::BLACK, clip);
    }
}

/// Fills map pixels with colours of wind speed bands.
///
/// Pixels where wind speed is missing or outside the levels stay blank.
fn shade(
    pixmap: &mut Pixmap,
    view: &MapView,
    analysis: &Analysis,
    time_index: usize,
    levels: &[Float],
    colors: &[[u8; 3]],
) {
    let colors: Vec<_> = colors.iter().map(|c| canvas::opaque(*c)).collect();

    let rect = view.rect();
    let width = pixmap.width();
    let height = pixmap.height();

    let x_range = (rect.left.floor().max(0.0) as u32)..(rect.right.ceil().min(width as f32) as u32);
    let y_range = (rect.top.floor().max(0.0) as u32)..(rect.bottom.ceil().min(height as f32) as u32);

    let pixels = pixmap.pixels_mut();

    for py in y_range {
        for px in x_range.clone() {
            let (x, y) = (px as f32 + 0.5, py as f32 + 0.5);
            if !rect.contains(x, y) {
                continue;
            }

            let (lon, lat) = view.to_geo(x, y);

            let value = match analysis.field_value(FieldKind::WindSpeed, time_index, lon, lat) {
                Ok(value) => value,
                Err(_) => continue,
            };

            if let Some(band) = colormap::band_index(levels, value) {
                pixels[(py * width + px) as usize] = colors[band];
            }
        }
    }
}

/// Traces contours of the field at automatically chosen levels
/// and converts them to pixel polylines.
fn contour_lines(
    view: &MapView,
    analysis: &Analysis,
    kind: FieldKind,
    time_index: usize,
) -> Vec<(Float, Vec<(f32, f32)>)> {
    let field = analysis.field(kind).index_axis(Axis(0), time_index);

    let (zmin, zmax) = field
        .iter()
        .filter(|z| z.is_finite())
        .fold((Float::INFINITY, Float::NEG_INFINITY), |(lo, hi), &z| {
            (lo.min(z), hi.max(z))
        });

    let mut lines = vec![];

    for level in levels::nice_levels(zmin, zmax) {
        for line in contour::trace(field, level) {
            let points = line.points.iter().map(|p| {
                (
                    at_index(&analysis.lons, p.col),
                    at_index(&analysis.lats, p.row),
                )
            });

            lines.extend(project_line(view, points).into_iter().map(|l| (level, l)));
        }
    }

    lines
}

/// Coordinate at a fractional grid index.
fn at_index(coords: &Array1<Float>, index: Float) -> Float {
    let last = coords.len().saturating_sub(1);
    let lower = (index.floor().max(0.0) as usize).min(last);
    let upper = (lower + 1).min(last);
    let fraction = index - lower as Float;

    coords[lower] + (coords[upper] - coords[lower]) * fraction
}

/// Projects a geographic line into pixel polylines,
/// split where the line crosses the map antimeridian.
fn project_line<I>(view: &MapView, points: I) -> Vec<Vec<(f32, f32)>>
where
    I: Iterator<Item = (Float, Float)>,
{
    let mut pieces = vec![];
    let mut current: Vec<(f32, f32)> = vec![];

    for (lon, lat) in points {
        let point = view.to_pixel(lon, lat);

        if let Some(&previous) = current.last() {
            if view.breaks_between(previous, point) {
                pieces.push(std::mem::take(&mut current));
            }
        }

        current.push(point);
    }

    pieces.push(current);
    pieces.retain(|p| p.len() >= 2);

    pieces
}
