//! A thin drawing layer over `printpdf` that works in millimetres from the top-left corner of an
//! A4 page, the way the statement layout is written.

use super::text::{text_width, MM_PER_PT};
use crate::model::Rgb;
use anyhow::anyhow;
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    Color, Image, ImageTransform, IndirectFontRef, Mm, PdfLayerReference, Point, Polygon,
};
use std::f32::consts::{FRAC_PI_2, PI, TAU};

/// A4 portrait, in millimetres.
pub(super) const PAGE_WIDTH: f32 = 210.0;
pub(super) const PAGE_HEIGHT: f32 = 297.0;

/// Segments used to approximate a full circle.
const CIRCLE_SEGMENTS: usize = 64;

/// Horizontal anchoring of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Align {
    Left,
    Center,
    Right,
}

/// The two faces of Helvetica the statement uses.
#[derive(Clone)]
pub(super) struct Fonts {
    pub(super) normal: IndirectFontRef,
    pub(super) bold: IndirectFontRef,
}

pub(super) const BLACK: Rgb = [0, 0, 0];

/// Line width, in millimetres, before anything sets it.
const DEFAULT_LINE_WIDTH: f32 = 0.2;

/// Drawing state for one page. PDF paints text with the fill color, so the text color and the
/// shape fill color are tracked separately and applied before each operation.
pub(super) struct Page<'a> {
    layer: PdfLayerReference,
    fonts: &'a Fonts,
    bold: bool,
    font_size: f32,
    text_color: Rgb,
    fill_color: Rgb,
    stroke: (Rgb, f32),
}

impl<'a> Page<'a> {
    pub(super) fn new(layer: PdfLayerReference, fonts: &'a Fonts) -> Self {
        Self {
            layer,
            fonts,
            bold: false,
            font_size: 10.0,
            text_color: BLACK,
            fill_color: BLACK,
            stroke: (BLACK, DEFAULT_LINE_WIDTH),
        }
    }

    /// Starts drawing on another page, keeping the current font and colors.
    pub(super) fn turn(&mut self, layer: PdfLayerReference) {
        self.layer = layer;
        let (color, width) = self.stroke;
        self.set_stroke(color, width);
    }

    pub(super) fn set_font_size(&mut self, size: f32) {
        self.font_size = size;
    }

    pub(super) fn set_bold(&mut self, bold: bool) {
        self.bold = bold;
    }

    pub(super) fn set_text_color(&mut self, color: Rgb) {
        self.text_color = color;
    }

    pub(super) fn set_fill_color(&mut self, color: Rgb) {
        self.fill_color = color;
    }

    /// Sets the color and width, in millimetres, of stroked shapes.
    pub(super) fn set_stroke(&mut self, color: Rgb, width: f32) {
        self.stroke = (color, width);
        self.layer.set_outline_color(pdf_color(color));
        self.layer.set_outline_thickness(width / MM_PER_PT);
    }

    /// Writes `text` with its baseline at `y`, anchored at `x` according to `align`.
    pub(super) fn text(&self, text: &str, x: f32, y: f32, align: Align) {
        let x = match align {
            Align::Left => x,
            Align::Center => x - text_width(text, self.font_size) / 2.0,
            Align::Right => x - text_width(text, self.font_size),
        };
        let font = if self.bold {
            &self.fonts.bold
        } else {
            &self.fonts.normal
        };
        self.layer.set_fill_color(pdf_color(self.text_color));
        self.layer
            .use_text(text, self.font_size, Mm(x), flip(y), font);
    }

    /// Fills the rectangle whose top-left corner is at (`x`, `y`).
    pub(super) fn fill_rect(&self, x: f32, y: f32, w: f32, h: f32) {
        let ring = vec![(x, y), (x + w, y), (x + w, y + h), (x, y + h)];
        self.layer.set_fill_color(pdf_color(self.fill_color));
        self.polygon(ring, PaintMode::Fill);
    }

    /// Fills a rectangle with corners rounded to radius `r`.
    pub(super) fn fill_rounded_rect(&self, x: f32, y: f32, w: f32, h: f32, r: f32) {
        let r = r.min(w / 2.0).min(h / 2.0);
        let steps = CIRCLE_SEGMENTS / 4;
        // Corner centers in clockwise order starting top-right, with the angle each arc starts at.
        // Angles are measured on screen, so they grow clockwise.
        let corners = [
            (x + w - r, y + r, -FRAC_PI_2),
            (x + w - r, y + h - r, 0.0),
            (x + r, y + h - r, FRAC_PI_2),
            (x + r, y + r, PI),
        ];
        let mut ring = Vec::with_capacity(corners.len() * (steps + 1));
        for (cx, cy, start) in corners {
            for i in 0..=steps {
                let a = start + FRAC_PI_2 * i as f32 / steps as f32;
                ring.push((cx + r * a.cos(), cy + r * a.sin()));
            }
        }
        self.layer.set_fill_color(pdf_color(self.fill_color));
        self.polygon(ring, PaintMode::Fill);
    }

    /// Strokes the outline of a circle.
    pub(super) fn stroke_circle(&self, cx: f32, cy: f32, r: f32) {
        let ring = (0..CIRCLE_SEGMENTS)
            .map(|i| {
                let a = TAU * i as f32 / CIRCLE_SEGMENTS as f32;
                (cx + r * a.cos(), cy + r * a.sin())
            })
            .collect();
        self.polygon(ring, PaintMode::Stroke);
    }

    /// Strokes a straight line.
    pub(super) fn line(&self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.polygon(vec![(x1, y1), (x2, y2)], PaintMode::Stroke);
    }

    /// Places an image with its top-left corner at (`x`, `y`), scaled to `w` by `h`.
    pub(super) fn image(&self, image: &image::DynamicImage, x: f32, y: f32, w: f32, h: f32) {
        let (px_w, px_h) = (image.width() as f32, image.height() as f32);
        if px_w == 0.0 || px_h == 0.0 {
            return;
        }
        // At this resolution the image is exactly `w` wide; the height is then scaled to fit.
        let dpi = px_w * 25.4 / w;
        let natural_h = px_h * 25.4 / dpi;
        Image::from_dynamic_image(image).add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(x)),
                translate_y: Some(flip(y + h)),
                dpi: Some(dpi),
                scale_y: Some(h / natural_h),
                ..Default::default()
            },
        );
    }

    fn polygon(&self, ring: Vec<(f32, f32)>, mode: PaintMode) {
        let points = ring
            .into_iter()
            .map(|(x, y)| (Point::new(Mm(x), flip(y)), false))
            .collect();
        self.layer.add_polygon(Polygon {
            rings: vec![points],
            mode,
            winding_order: WindingOrder::NonZero,
        });
    }
}

/// Converts a distance from the top of the page into PDF's bottom-up coordinate.
fn flip(y: f32) -> Mm {
    Mm(PAGE_HEIGHT - y)
}

fn pdf_color(color: Rgb) -> Color {
    let [r, g, b] = color.map(|c| f32::from(c) / 255.0);
    Color::Rgb(printpdf::Rgb::new(r, g, b, None))
}

/// Converts a `printpdf` error into an `anyhow::Error`.
pub(super) fn map_pdf_error(e: printpdf::Error) -> anyhow::Error {
    anyhow!("PDF error: {e:?}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip() {
        assert_eq!(flip(0.0), Mm(297.0));
        assert_eq!(flip(290.0), Mm(7.0));
    }

    #[test]
    fn test_pdf_color() {
        match pdf_color([255, 0, 51]) {
            Color::Rgb(rgb) => {
                assert_eq!(rgb.r, 1.0);
                assert_eq!(rgb.g, 0.0);
                assert!((rgb.b - 0.2).abs() < 1e-6);
            }
            _ => panic!("expected an RGB color"),
        }
    }
}
