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

//! Text drawing on the finished image.
//!
//! All text is collected while the graphics are drawn and put
//! on the image at the end, because the text rasteriser works
//! on [`RgbaImage`] rather than on the vector canvas.

use crate::errors::RenderError;
use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use rusttype::{Font, Scale};
use std::{fs, path::Path};

const TEXT_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Align {
    Left,
    Centre,
    Right,
}

/// Single piece of text with its position.
///
/// `x` is the anchor given by [`Align`] and `y` is the vertical
/// centre of the text. Rotated text reads bottom to top
/// and is always centred on the position.
#[derive(Clone, PartialEq, Debug)]
pub struct TextItem {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub align: Align,
    pub rotated: bool,
}

impl TextItem {
    pub fn new(text: impl Into<String>, (x, y): (f32, f32), size: f32, align: Align) -> Self {
        TextItem {
            text: text.into(),
            x,
            y,
            size,
            align,
            rotated: false,
        }
    }

    pub fn rotated(mut self) -> Self {
        self.rotated = true;
        self
    }
}

/// TrueType font used for all text on the chart.
pub struct Typeface {
    font: Font<'static>,
}

impl Typeface {
    pub fn load(path: &Path) -> Result<Self, RenderError> {
        let data = fs::read(path).map_err(RenderError::CantReadFont)?;
        let font =
            Font::try_from_vec(data).ok_or_else(|| RenderError::InvalidFont(path.to_path_buf()))?;

        Ok(Typeface { font })
    }

    /// Width and height (in pixels) of the rendered text.
    pub fn measure(&self, text: &str, size: f32) -> (f32, f32) {
        let (width, height) = text_size(Scale::uniform(size), &self.font, text);
        (width as f32, height as f32)
    }

    pub fn draw(&self, image: &mut RgbaImage, item: &TextItem) {
        if item.text.is_empty() {
            return;
        }

        let scale = Scale::uniform(item.size);
        let (width, height) = self.measure(&item.text, item.size);

        if item.rotated {
            let mut horizontal = RgbaImage::from_pixel(
                width.ceil() as u32 + 2,
                height.ceil() as u32 + 2,
                Rgba([0, 0, 0, 0]),
            );
            draw_text_mut(&mut horizontal, TEXT_COLOR, 1, 1, scale, &self.font, &item.text);

            let vertical = imageops::rotate270(&horizontal);
            let x = item.x - vertical.width() as f32 / 2.0;
            let y = item.y - vertical.height() as f32 / 2.0;

            imageops::overlay(image, &vertical, x.round() as i64, y.round() as i64);
            return;
        }

        let x = match item.align {
            Align::Left => item.x,
            Align::Centre => item.x - width / 2.0,
            Align::Right => item.x - width,
        };
        let y = item.y - height / 2.0;

        draw_text_mut(
            image,
            TEXT_COLOR,
            x.round() as i32,
            y.round() as i32,
            scale,
            &self.font,
            &item.text,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{Align, TextItem, Typeface};
    use crate::errors::RenderError;
    use std::io::Write;

    #[test]
    fn rotated_item() {
        let item = TextItem::new("[knots]", (10.0, 20.0), 12.0, Align::Centre).rotated();

        assert!(item.rotated);
        assert_eq!(item.text, "[knots]");
    }

    #[test]
    fn missing_font_file() {
        let result = Typeface::load(std::path::Path::new("./no/such/font.ttf"));
        assert!(matches!(result, Err(RenderError::CantReadFont(_))));
    }

    #[test]
    fn invalid_font_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not a font").unwrap();

        let result = Typeface::load(file.path());
        assert!(matches!(result, Err(RenderError::InvalidFont(_))));
    }
}
