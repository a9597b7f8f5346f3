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

//! Drawing primitives shared by chart layers.

use super::projection::PixelRect;
use crate::constants::FIGURE_WIDTH_INCHES;
use crate::errors::RenderError;
use crate::Float;
use image::RgbaImage;
use tiny_skia::{
    Color, FillRule, LineCap, LineJoin, Mask, Paint, PathBuilder, Pixmap, PremultipliedColorU8,
    Stroke, Transform,
};

/// Converts a size in typographic points to pixels
/// of a figure with given width.
pub fn pt_to_px(points: Float, figure_width: u32) -> f32 {
    (points * (figure_width as Float / FIGURE_WIDTH_INCHES) / 72.0) as f32
}

pub fn opaque(rgb: [u8; 3]) -> PremultipliedColorU8 {
    // opaque colours are the same premultiplied
    PremultipliedColorU8::from_rgba(rgb[0], rgb[1], rgb[2], 255)
        .unwrap_or(PremultipliedColorU8::TRANSPARENT)
}

fn paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = true;
    paint
}

/// Mask limiting drawing to the given rectangle.
pub fn clip_mask(width: u32, height: u32, rect: PixelRect) -> Option<Mask> {
    let path = PathBuilder::from_rect(rect.to_skia()?);
    let mut mask = Mask::new(width, height)?;
    mask.fill_path(&path, FillRule::Winding, true, Transform::identity());

    Some(mask)
}

/// Strokes every polyline with round joins and caps.
pub fn stroke_lines(
    pixmap: &mut Pixmap,
    lines: &[Vec<(f32, f32)>],
    color: Color,
    width: f32,
    clip: Option<&Mask>,
) {
    let mut pb = PathBuilder::new();

    for line in lines.iter().filter(|l| l.len() >= 2) {
        pb.move_to(line[0].0, line[0].1);
        for &(x, y) in &line[1..] {
            pb.line_to(x, y);
        }
    }

    let path = match pb.finish() {
        Some(path) => path,
        None => return,
    };

    let stroke = Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };

    pixmap.stroke_path(&path, &paint(color), &stroke, Transform::identity(), clip);
}

/// Fills every triangle.
pub fn fill_triangles(
    pixmap: &mut Pixmap,
    triangles: &[[(f32, f32); 3]],
    color: Color,
    clip: Option<&Mask>,
) {
    let mut pb = PathBuilder::new();

    for [a, b, c] in triangles {
        pb.move_to(a.0, a.1);
        pb.line_to(b.0, b.1);
        pb.line_to(c.0, c.1);
        pb.close();
    }

    if let Some(path) = pb.finish() {
        pixmap.fill_path(
            &path,
            &paint(color),
            FillRule::Winding,
            Transform::identity(),
            clip,
        );
    }
}

pub fn stroke_circle(
    pixmap: &mut Pixmap,
    centre: (f32, f32),
    radius: f32,
    color: Color,
    width: f32,
    clip: Option<&Mask>,
) {
    if let Some(path) = PathBuilder::from_circle(centre.0, centre.1, radius) {
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, &paint(color), &stroke, Transform::identity(), clip);
    }
}

pub fn fill_rect(pixmap: &mut Pixmap, rect: PixelRect, color: Color) {
    if let Some(rect) = rect.to_skia() {
        pixmap.fill_rect(rect, &paint(color), Transform::identity(), None);
    }
}

pub fn stroke_rect(pixmap: &mut Pixmap, rect: PixelRect, color: Color, width: f32) {
    if let Some(rect) = rect.to_skia() {
        let path = PathBuilder::from_rect(rect);
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, &paint(color), &stroke, Transform::identity(), None);
    }
}

/// Makes transparent all pixels whose centres satisfy the predicate.
pub fn clear_where<P>(pixmap: &mut Pixmap, predicate: P)
where
    P: Fn(f32, f32) -> bool,
{
    let width = pixmap.width() as usize;

    for (i, pixel) in pixmap.pixels_mut().iter_mut().enumerate() {
        let x = (i % width) as f32 + 0.5;
        let y = (i / width) as f32 + 0.5;

        if predicate(x, y) {
            *pixel = PremultipliedColorU8::TRANSPARENT;
        }
    }
}

/// Converts the pixmap into an image with straight (not premultiplied) alpha.
pub fn to_image(pixmap: &Pixmap) -> Result<RgbaImage, RenderError> {
    let data = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();

    RgbaImage::from_raw(pixmap.width(), pixmap.height(), data)
        .ok_or_else(|| RenderError::CantCreateCanvas(pixmap.width(), pixmap.height()))
}

#[cfg(test)]
mod tests {
    use super::{clear_where, pt_to_px, stroke_lines, to_image};
    use float_cmp::approx_eq;
    use tiny_skia::{Color, Pixmap};

    #[test]
    fn points_scale_with_figure() {
        assert!(approx_eq!(f32, pt_to_px(72.0, 1000), 100.0, epsilon = 1e-4));
        assert!(approx_eq!(f32, pt_to_px(10.0, 2000), 27.777779, epsilon = 1e-4));
    }

    #[test]
    fn cleared_line_leaves_gap() {
        let mut pixmap = Pixmap::new(40, 20).unwrap();
        let line = vec![(0.0, 10.0), (40.0, 10.0)];
        stroke_lines(&mut pixmap, &[line], Color::BLACK, 2.0, None);

        clear_where(&mut pixmap, |x, _| (15.0..25.0).contains(&x));

        let image = to_image(&pixmap).unwrap();
        assert_eq!(image.get_pixel(5, 10)[3], 255);
        assert_eq!(image.get_pixel(20, 10)[3], 0);
    }
}
