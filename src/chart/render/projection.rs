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

//! Module with methods to do computations
//! of geographical projection used by the chart
//! and to place projected coordinates on the figure.
//!
//! The chart uses equidistant cylindrical (plate carrée) projection
//! with equal scale along both axes, so one degree of longitude
//! and one degree of latitude span the same number of pixels.

use crate::chart::configuration::Extent;
use crate::{errors::ProjectionError, Float};

/// Front-facing struct of equidistant cylindrical projection
/// centred on given geographic point.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Default)]
pub struct Equirectangular {
    lon_0: Float,
    lat_0: Float,
}

impl Equirectangular {
    /// Projection constructor from the central meridian
    /// and the central parallel.
    pub fn new(lon_0: Float, lat_0: Float) -> Result<Self, ProjectionError> {
        if !lon_0.is_finite() || !lat_0.is_finite() {
            return Err(ProjectionError::IncorrectParams(
                "one of params is not finite",
            ));
        }

        if !(-90.0..=90.0).contains(&lat_0) {
            return Err(ProjectionError::IncorrectParams("latitude out of bounds"));
        }

        Ok(Equirectangular { lon_0, lat_0 })
    }

    /// Function to project geographic coordinates
    /// to cartographic coordinates (in degrees from the centre).
    ///
    /// Longitude difference is wrapped into `[-180, 180)` so datasets
    /// using `0..360` longitudes land at the same place as `-180..180` ones.
    pub fn project(&self, lon: Float, lat: Float) -> (Float, Float) {
        let x = (lon - self.lon_0 + 180.0).rem_euclid(360.0) - 180.0;
        let y = lat - self.lat_0;

        (x, y)
    }

    /// Function to inversly project cartographic coordinates
    /// to geographic coordinates.
    pub fn inverse_project(&self, x: Float, y: Float) -> (Float, Float) {
        (self.lon_0 + x, self.lat_0 + y)
    }
}

/// Rectangle on the figure, in pixels.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug)]
pub struct PixelRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl PixelRect {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn centre(&self) -> (f32, f32) {
        (
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    pub fn to_skia(self) -> Option<tiny_skia::Rect> {
        tiny_skia::Rect::from_ltrb(self.left, self.top, self.right, self.bottom)
    }
}

/// Projection of the chart extent fitted into an area of the figure.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct MapView {
    projection: Equirectangular,
    /// Pixels per degree along both axes.
    scale: Float,
    centre: (Float, Float),
    rect: PixelRect,
}

impl MapView {
    /// Fits the extent into the given area, keeping the aspect ratio
    /// and centring the map in the area.
    ///
    /// Returns `None` for an extent with no area.
    pub fn fit(extent: &Extent, area: PixelRect) -> Result<Option<Self>, ProjectionError> {
        if extent.is_degenerate() {
            return Ok(None);
        }

        let (lon_0, lat_0) = extent.midpoint();
        let projection = Equirectangular::new(lon_0, lat_0)?;

        let span_x = extent.lon_max - extent.lon_min;
        let span_y = extent.lat_max - extent.lat_min;

        let scale = (area.width() as Float / span_x).min(area.height() as Float / span_y);

        let (cx, cy) = area.centre();
        let half_w = (span_x * scale / 2.0) as f32;
        let half_h = (span_y * scale / 2.0) as f32;

        Ok(Some(MapView {
            projection,
            scale,
            centre: (cx as Float, cy as Float),
            rect: PixelRect {
                left: cx - half_w,
                top: cy - half_h,
                right: cx + half_w,
                bottom: cy + half_h,
            },
        }))
    }

    /// Area of the figure covered by the map.
    pub fn rect(&self) -> PixelRect {
        self.rect
    }

    /// Pixel coordinates of a geographic point.
    pub fn to_pixel(&self, lon: Float, lat: Float) -> (f32, f32) {
        let (x, y) = self.projection.project(lon, lat);

        (
            (self.centre.0 + x * self.scale) as f32,
            (self.centre.1 - y * self.scale) as f32,
        )
    }

    /// Geographic coordinates of a pixel position.
    pub fn to_geo(&self, px: f32, py: f32) -> (Float, Float) {
        let x = (px as Float - self.centre.0) / self.scale;
        let y = (self.centre.1 - py as Float) / self.scale;

        self.projection.inverse_project(x, y)
    }

    /// Whether two consecutive points of a line lie on opposite
    /// sides of the antimeridian of the map and must not be joined.
    pub fn breaks_between(&self, a: (f32, f32), b: (f32, f32)) -> bool {
        ((a.0 - b.0).abs() as Float) > 180.0 * self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::{Equirectangular, MapView, PixelRect};
    use crate::chart::configuration::Extent;
    use float_cmp::approx_eq;

    #[test]
    fn project() {
        let proj = Equirectangular::new(-97.5, 42.5).unwrap();

        let (lon_0, lat_0) = (-110.25, 35.75);

        let (x, y) = proj.project(lon_0, lat_0);
        let (lon, lat) = proj.inverse_project(x, y);

        assert!(approx_eq!(f64, lon, lon_0, epsilon = 1e-9));
        assert!(approx_eq!(f64, lat, lat_0, epsilon = 1e-9));
    }

    #[test]
    fn wraps_longitudes() {
        let proj = Equirectangular::new(-97.5, 42.5).unwrap();

        let (x_west, _) = proj.project(-110.0, 40.0);
        let (x_east, _) = proj.project(250.0, 40.0);

        assert!(approx_eq!(f64, x_west, -12.5, epsilon = 1e-9));
        assert!(approx_eq!(f64, x_east, -12.5, epsilon = 1e-9));
    }

    #[test]
    fn rejects_incorrect_params() {
        assert!(Equirectangular::new(0.0, 95.0).is_err());
        assert!(Equirectangular::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn fits_extent_into_area() {
        let extent = Extent {
            lon_min: -120.0,
            lon_max: -80.0,
            lat_min: 30.0,
            lat_max: 50.0,
        };
        let area = PixelRect {
            left: 0.0,
            top: 0.0,
            right: 400.0,
            bottom: 400.0,
        };

        let view = MapView::fit(&extent, area).unwrap().unwrap();
        let rect = view.rect();

        assert!(approx_eq!(f32, rect.width(), 400.0, epsilon = 1e-3));
        assert!(approx_eq!(f32, rect.height(), 200.0, epsilon = 1e-3));
        assert!(approx_eq!(f32, rect.top, 100.0, epsilon = 1e-3));

        let (px, py) = view.to_pixel(-120.0, 50.0);
        assert!(approx_eq!(f32, px, 0.0, epsilon = 1e-3));
        assert!(approx_eq!(f32, py, 100.0, epsilon = 1e-3));

        let (lon, lat) = view.to_geo(200.0, 200.0);
        assert!(approx_eq!(f64, lon, -100.0, epsilon = 1e-6));
        assert!(approx_eq!(f64, lat, 40.0, epsilon = 1e-6));
    }

    #[test]
    fn degenerate_extent_has_no_view() {
        let extent = Extent {
            lon_min: -80.0,
            lon_max: -120.0,
            lat_min: 30.0,
            lat_max: 50.0,
        };
        let area = PixelRect {
            left: 0.0,
            top: 0.0,
            right: 400.0,
            bottom: 400.0,
        };

        assert_eq!(MapView::fit(&extent, area).unwrap(), None);
    }
}
