//! Offscreen rasterization of the category ring chart that is embedded in the statement.

use crate::model::Rgb;
use crate::summary::CategoryTotal;
use crate::Result;
use anyhow::Context;
use image::{ImageOutputFormat, RgbImage};
use std::f64::consts::TAU;
use std::io::Cursor;
use tracing::{trace, warn};

/// Width and height of the chart raster, in pixels.
pub const CHART_SIZE: u32 = 400;
const CENTER: f64 = 200.0;
const OUTER_RADIUS: f64 = 180.0;
const INNER_RADIUS: f64 = 100.0;
const WHITE: Rgb = [255, 255, 255];

/// A 2D raster surface that the chart can be drawn on.
///
/// Angles are in radians, measured from the positive x axis and growing clockwise on screen
/// (raster y grows downwards).
pub trait Surface {
    /// Fills the circular sector of `radius` around (`cx`, `cy`) from `start` to `end`.
    fn fill_wedge(&mut self, cx: f64, cy: f64, radius: f64, start: f64, end: f64, color: Rgb);

    /// Fills the full circle of `radius` around (`cx`, `cy`).
    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Rgb);

    /// Encodes what has been drawn as PNG bytes.
    fn export_raster(&self) -> Result<Vec<u8>>;
}

/// A `Surface` backed by an in-memory RGB image with a white background.
pub struct RasterSurface {
    image: RgbImage,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, image::Rgb(WHITE)),
        }
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Calls `paint` with the center of every pixel inside the bounding box of the given circle.
    fn for_each_pixel_in(
        &mut self,
        cx: f64,
        cy: f64,
        radius: f64,
        mut paint: impl FnMut(f64, f64) -> bool,
        color: Rgb,
    ) {
        let (w, h) = self.image.dimensions();
        let x0 = (cx - radius).floor().max(0.0) as u32;
        let y0 = (cy - radius).floor().max(0.0) as u32;
        let x1 = ((cx + radius).ceil().max(0.0) as u32).min(w);
        let y1 = ((cy + radius).ceil().max(0.0) as u32).min(h);
        for y in y0..y1 {
            for x in x0..x1 {
                let dx = f64::from(x) + 0.5 - cx;
                let dy = f64::from(y) + 0.5 - cy;
                if dx * dx + dy * dy <= radius * radius && paint(dx, dy) {
                    self.image.put_pixel(x, y, image::Rgb(color));
                }
            }
        }
    }
}

impl Surface for RasterSurface {
    fn fill_wedge(&mut self, cx: f64, cy: f64, radius: f64, start: f64, end: f64, color: Rgb) {
        if end <= start {
            return;
        }
        let full = end - start >= TAU;
        self.for_each_pixel_in(
            cx,
            cy,
            radius,
            |dx, dy| {
                if full {
                    return true;
                }
                // Angle of the pixel in [0, TAU), then relative to the wedge start.
                let angle = dy.atan2(dx).rem_euclid(TAU);
                let offset = (angle - start).rem_euclid(TAU);
                offset < end - start
            },
            color,
        );
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Rgb) {
        self.for_each_pixel_in(cx, cy, radius, |_, _| true, color);
    }

    fn export_raster(&self) -> Result<Vec<u8>> {
        let mut bytes = Cursor::new(Vec::new());
        self.image
            .write_to(&mut bytes, ImageOutputFormat::Png)
            .context("Unable to encode the chart as PNG")?;
        Ok(bytes.into_inner())
    }
}

/// Draws the ring chart: one wedge per category, in the order given, starting at angle zero and
/// following on from each other without gaps. The center is then masked out with white.
///
/// When the totals are all zero the divisor is taken to be one, so every wedge has zero span and
/// only the background is left.
pub fn draw_ring_chart(surface: &mut dyn Surface, totals: &[CategoryTotal]) {
    let sum: f64 = totals.iter().map(|t| t.value().to_f64()).sum();
    let divisor = if sum == 0.0 { 1.0 } else { sum };
    let mut start = 0.0;
    for total in totals {
        let span = TAU * total.value().to_f64() / divisor;
        trace!("{} wedge from {start:.3} spanning {span:.3}", total.label());
        surface.fill_wedge(CENTER, CENTER, OUTER_RADIUS, start, start + span, total.color());
        start += span;
    }
    surface.fill_circle(CENTER, CENTER, INNER_RADIUS, WHITE);
}

/// Renders the ring chart to PNG bytes. If no drawing surface can be produced the result is empty
/// and the statement is rendered without a chart.
pub fn chart_png(surface: Option<&mut dyn Surface>, totals: &[CategoryTotal]) -> Vec<u8> {
    let Some(surface) = surface else {
        warn!("No drawing surface is available, the statement will not include a chart");
        return Vec::new();
    };
    draw_ring_chart(surface, totals);
    match surface.export_raster() {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("The chart could not be exported: {e:#}");
            Vec::new()
        }
    }
}
