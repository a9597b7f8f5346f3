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

//! Colour bar of the isotach shading.

use super::canvas;
use super::projection::PixelRect;
use super::text::{Align, TextItem};
use crate::constants::COLORBAR_LABEL;
use crate::Float;
use tiny_skia::{Color, Pixmap};

/// Sizes (in pixels) of colour bar texts.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct ColorBarText {
    pub tick_size: f32,
    pub label_size: f32,
}

/// Draws bands from the lowest level at the bottom and returns
/// tick labels and the bar label to put on the image.
pub fn draw(
    pixmap: &mut Pixmap,
    rect: PixelRect,
    levels: &[Float],
    colors: &[[u8; 3]],
    text: ColorBarText,
) -> Vec<TextItem> {
    let bands = colors.len();
    if bands == 0 || levels.len() != bands + 1 {
        return vec![];
    }

    let band_height = rect.height() / bands as f32;

    for (i, rgb) in colors.iter().enumerate() {
        let band = PixelRect {
            top: rect.bottom - (i + 1) as f32 * band_height,
            bottom: rect.bottom - i as f32 * band_height,
            ..rect
        };
        canvas::fill_rect(pixmap, band, Color::from_rgba8(rgb[0], rgb[1], rgb[2], 255));
    }

    canvas::stroke_rect(pixmap, rect, Color::BLACK, 1.0);

    let tick_length = 0.35 * text.tick_size;
    let mut items = vec![];
    let mut ticks = vec![];

    for (i, level) in levels.iter().enumerate() {
        let y = rect.bottom - i as f32 * band_height;
        ticks.push(vec![(rect.right, y), (rect.right + tick_length, y)]);

        items.push(TextItem::new(
            tick_label(*level),
            (rect.right + tick_length + 0.3 * text.tick_size, y),
            text.tick_size,
            Align::Left,
        ));
    }

    canvas::stroke_lines(pixmap, &ticks, Color::BLACK, 1.0, None);

    let widest = levels
        .iter()
        .map(|l| tick_label(*l).chars().count())
        .max()
        .unwrap_or(0);
    let label_x = rect.right
        + tick_length
        + 0.3 * text.tick_size
        + 0.6 * text.tick_size * widest as f32
        + 0.8 * text.label_size;

    items.push(
        TextItem::new(
            COLORBAR_LABEL,
            (label_x, (rect.top + rect.bottom) / 2.0),
            text.label_size,
            Align::Centre,
        )
        .rotated(),
    );

    items
}

/// Level formatted without trailing zeros.
fn tick_label(level: Float) -> String {
    if level.fract() == 0.0 {
        format!("{:.0}", level)
    } else {
        format!("{:.2}", level)
            .trim_end_matches('0')
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{draw, tick_label, ColorBarText};
    use crate::chart::render::projection::PixelRect;
    use crate::constants::COLORBAR_LABEL;
    use tiny_skia::Pixmap;

    #[test]
    fn tick_labels() {
        assert_eq!(tick_label(30.0), "30");
        assert_eq!(tick_label(2.5), "2.5");
        assert_eq!(tick_label(0.25), "0.25");
    }

    #[test]
    fn bands_from_bottom() {
        let mut pixmap = Pixmap::new(100, 120).unwrap();
        let rect = PixelRect {
            left: 10.0,
            top: 10.0,
            right: 30.0,
            bottom: 110.0,
        };
        let levels = [30.0, 40.0, 50.0];
        let colors = [[255, 0, 0], [0, 0, 255]];

        let items = draw(
            &mut pixmap,
            rect,
            &levels,
            &colors,
            ColorBarText {
                tick_size: 10.0,
                label_size: 12.0,
            },
        );

        let low = pixmap.pixel(20, 100).unwrap();
        let high = pixmap.pixel(20, 20).unwrap();
        assert_eq!((low.red(), low.blue()), (255, 0));
        assert_eq!((high.red(), high.blue()), (0, 255));

        assert_eq!(items.len(), 4);
        assert_eq!(items[0].text, "30");
        assert_eq!(items[2].text, "50");
        assert!(items[2].y < items[0].y);
        assert_eq!(items[3].text, COLORBAR_LABEL);
        assert!(items[3].rotated);
    }
}
