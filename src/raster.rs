//! # Frame Rasterization
//!
//! Turns a list of [`DrawPrimitive`]s into pixels on any embedded-graphics
//! [`DrawTarget`] with an [`Rgb888`] color, plus an in-memory [`FrameBuffer`]
//! target and an ASCII preview for development without a panel attached.
//!
//! Rectangles and text go through embedded-graphics primitives directly.
//! Elbow arcs are pie slices of an ellipse, which embedded-graphics has no
//! primitive for, so they are scanned pixel by pixel over their bounds.
//!
//! Edges are always drawn hard; the `anti_alias` flag is left to surfaces
//! that can blend.

use crate::layout::{Bounds, DrawPrimitive, TextAlign};
use crate::palette::{Color, AMBIENT_WHITE, BACKGROUND_BLACK, ORANGE, PURPLE, RED, YELLOW};
use core::convert::Infallible;
use embedded_graphics::{
    mono_font::{ascii::FONT_10X20, MonoFont, MonoTextStyle},
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{PointsIter, PrimitiveStyle, Rectangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};

/// Draw every primitive in order onto `target`.
pub fn rasterize<D>(frame: &[DrawPrimitive], target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    for primitive in frame {
        draw_primitive(primitive, target)?;
    }
    Ok(())
}

/// Draw a single primitive.
pub fn draw_primitive<D>(primitive: &DrawPrimitive, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    match primitive {
        DrawPrimitive::Rect {
            bounds,
            color,
            filled,
            ..
        } => draw_rect(bounds, *color, *filled, target),
        DrawPrimitive::Arc {
            bounds,
            start_angle,
            sweep_angle,
            color,
            filled,
            ..
        } => draw_arc(bounds, *start_angle, *sweep_angle, *color, *filled, target),
        DrawPrimitive::Text {
            content,
            x,
            y,
            align,
            font_size,
            color,
        } => draw_text(content, *x, *y, *align, *font_size, *color, target),
    }
}

/// Snap float bounds to the pixel grid: a pixel belongs to the shape when its
/// top-left corner lies inside `[left, right) × [top, bottom)` after rounding.
fn pixel_rect(bounds: &Bounds) -> Option<Rectangle> {
    let left = bounds.left.round() as i32;
    let top = bounds.top.round() as i32;
    let right = bounds.right.round() as i32;
    let bottom = bounds.bottom.round() as i32;
    if right <= left || bottom <= top {
        return None;
    }
    Some(Rectangle::new(
        Point::new(left, top),
        Size::new((right - left) as u32, (bottom - top) as u32),
    ))
}

fn draw_rect<D>(bounds: &Bounds, color: Color, filled: bool, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let Some(rect) = pixel_rect(bounds) else {
        return Ok(());
    };
    let style = if filled {
        PrimitiveStyle::with_fill(color.into())
    } else {
        PrimitiveStyle::with_stroke(color.into(), 1)
    };
    rect.into_styled(style).draw(target)
}

/// Whether `angle` (degrees) lies on the sweep starting at `start`.
fn angle_in_sweep(angle: f32, start: f32, sweep: f32) -> bool {
    if sweep.abs() >= 360.0 {
        return true;
    }
    let (from, span) = if sweep >= 0.0 {
        (start, sweep)
    } else {
        (start + sweep, -sweep)
    };
    (angle - from).rem_euclid(360.0) <= span
}

/// Pixels covered by the pie slice, scanned over the slice's bounding box.
///
/// Angles are taken on the unit circle before stretching to the ellipse,
/// so quarter sweeps land exactly on the bounding box quadrants.
fn arc_pixels(bounds: &Bounds, start: f32, sweep: f32, filled: bool) -> Vec<Point> {
    let Some(rect) = pixel_rect(bounds) else {
        return Vec::new();
    };
    let rx = bounds.width() / 2.0;
    let ry = bounds.height() / 2.0;
    let cx = bounds.left + rx;
    let cy = bounds.top + ry;

    let mut points = Vec::new();
    for point in rect.points() {
        let nx = (point.x as f32 + 0.5 - cx) / rx;
        let ny = (point.y as f32 + 0.5 - cy) / ry;
        let distance = nx * nx + ny * ny;
        if distance > 1.0 {
            continue;
        }
        if !filled {
            // One-pixel rim along the ellipse edge.
            let inner_x = (point.x as f32 + 0.5 - cx) / (rx - 1.0).max(0.5);
            let inner_y = (point.y as f32 + 0.5 - cy) / (ry - 1.0).max(0.5);
            if inner_x * inner_x + inner_y * inner_y <= 1.0 {
                continue;
            }
        }
        let angle = ny.atan2(nx).to_degrees();
        if angle_in_sweep(angle, start, sweep) {
            points.push(point);
        }
    }
    points
}

fn draw_arc<D>(
    bounds: &Bounds,
    start: f32,
    sweep: f32,
    color: Color,
    filled: bool,
    target: &mut D,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let color: Rgb888 = color.into();
    let pixels = arc_pixels(bounds, start, sweep, filled)
        .into_iter()
        .map(|point| Pixel(point, color));
    target.draw_iter(pixels)
}

/// Largest bundled font that does not exceed the requested size.
fn font_for_size(font_size: f32) -> &'static MonoFont<'static> {
    if font_size >= 60.0 {
        &profont::PROFONT_24_POINT
    } else if font_size >= 30.0 {
        &profont::PROFONT_18_POINT
    } else {
        &FONT_10X20
    }
}

fn draw_text<D>(
    content: &str,
    x: f32,
    y: f32,
    align: TextAlign,
    font_size: f32,
    color: Color,
    target: &mut D,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let character_style = MonoTextStyle::new(font_for_size(font_size), color.into());
    let alignment = match align {
        TextAlign::Left => Alignment::Left,
        TextAlign::Center => Alignment::Center,
    };
    let text_style = TextStyleBuilder::new()
        .alignment(alignment)
        .baseline(Baseline::Alphabetic)
        .build();

    Text::with_text_style(
        content,
        Point::new(x.round() as i32, y.round() as i32),
        character_style,
        text_style,
    )
    .draw(target)?;
    Ok(())
}

/// Owned RGB frame the host presents from. Pixels outside the surface are dropped.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgb888>,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb888::BLACK; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb888> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgb888) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = (y * self.width + x) as usize;
        self.pixels[index] = color;
    }

    /// Number of pixels that currently hold `color`.
    pub fn count(&self, color: Rgb888) -> usize {
        self.pixels.iter().filter(|&&pixel| pixel == color).count()
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0 && point.y >= 0 {
                self.set_pixel(point.x as u32, point.y as u32, color);
            }
        }
        Ok(())
    }
}

/// Character used for a palette color in the terminal preview.
fn ascii_shade(color: Rgb888) -> char {
    let palette = [
        (BACKGROUND_BLACK, ' '),
        (RED, '▓'),
        (ORANGE, '▒'),
        (PURPLE, '░'),
        (YELLOW, '#'),
        (AMBIENT_WHITE, '█'),
    ];
    palette
        .iter()
        .find(|(candidate, _)| Rgb888::from(*candidate) == color)
        .map(|(_, shade)| *shade)
        .unwrap_or('·')
}

/// Downsample `buffer` to `columns` characters per row. Terminal cells are
/// about twice as tall as wide, so each row covers two columns' worth of pixels.
/// An empty buffer gives an empty preview.
pub fn ascii_preview(buffer: &FrameBuffer, columns: u32) -> String {
    if buffer.width() == 0 || buffer.height() == 0 {
        return String::new();
    }
    let columns = columns.clamp(1, buffer.width());
    let cell_width = buffer.width() as f32 / columns as f32;
    let cell_height = cell_width * 2.0;
    let rows = ((buffer.height() as f32 / cell_height).floor() as u32).max(1);

    let mut out = String::with_capacity((columns as usize + 1) * rows as usize);
    for row in 0..rows {
        for column in 0..columns {
            let x = ((column as f32 + 0.5) * cell_width) as u32;
            let y = ((row as f32 + 0.5) * cell_height) as u32;
            let shade = buffer.pixel(x, y).map(ascii_shade).unwrap_or(' ');
            out.push(shade);
        }
        out.push('\n');
    }
    out
}

/// Print the terminal preview of a frame.
pub fn draw_ascii(buffer: &FrameBuffer, columns: u32) {
    print!("{}", ascii_preview(buffer, columns));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::render_frame;
    use crate::{ClockSample, DisplayMetrics, RenderMode};
    use embedded_graphics::mock_display::MockDisplay;

    fn test_sample() -> ClockSample {
        ClockSample {
            year: 2024,
            month: 3,
            day: 7,
            hour: 14,
            minute: 5,
            second: 0.0,
        }
    }

    #[test]
    fn test_angle_in_sweep() {
        // 180° → 270° clockwise is the upper-left quadrant
        assert!(angle_in_sweep(225.0, 180.0, 90.0));
        assert!(angle_in_sweep(-135.0, 180.0, 90.0));
        assert!(!angle_in_sweep(135.0, 180.0, 90.0));

        // 180° → 90° counter-clockwise is the lower-left quadrant
        assert!(angle_in_sweep(135.0, 180.0, -90.0));
        assert!(!angle_in_sweep(225.0, 180.0, -90.0));

        assert!(angle_in_sweep(10.0, 0.0, 360.0));
    }

    #[test]
    fn test_upper_left_quarter_arc_stays_in_its_quadrant() {
        let bounds = Bounds::new(0.0, 0.0, 80.0, 80.0);
        let pixels = arc_pixels(&bounds, 180.0, 90.0, true);
        assert!(!pixels.is_empty());
        assert!(pixels.iter().all(|p| p.x < 40 && p.y < 40));
        // Near the center the slice is solid
        assert!(pixels.contains(&Point::new(30, 30)));
        // The outer corner lies outside the ellipse
        assert!(!pixels.contains(&Point::new(0, 0)));
    }

    #[test]
    fn test_lower_left_quarter_arc_stays_in_its_quadrant() {
        let bounds = Bounds::new(0.0, 20.0, 80.0, 100.0);
        let pixels = arc_pixels(&bounds, 180.0, -90.0, true);
        assert!(!pixels.is_empty());
        assert!(pixels.iter().all(|p| p.x < 40 && p.y >= 60));
    }

    #[test]
    fn test_outline_arc_is_thinner_than_filled() {
        let bounds = Bounds::new(0.0, 0.0, 80.0, 60.0);
        let filled = arc_pixels(&bounds, 0.0, 360.0, true);
        let outline = arc_pixels(&bounds, 0.0, 360.0, false);
        assert!(!outline.is_empty());
        assert!(outline.len() < filled.len() / 4);
    }

    #[test]
    fn test_degenerate_bounds_draw_nothing() {
        let inverted = Bounds::new(210.0, 0.0, 100.0, 10.0);
        assert!(pixel_rect(&inverted).is_none());
        assert!(arc_pixels(&inverted, 180.0, 90.0, true).is_empty());

        let mut buffer = FrameBuffer::new(50, 50);
        draw_rect(&inverted, RED, true, &mut buffer).ok();
        assert_eq!(buffer.count(Rgb888::from(RED)), 0);
    }

    #[test]
    fn test_rect_fills_exact_pixels() {
        let mut display = MockDisplay::<Rgb888>::new();
        draw_rect(&Bounds::new(1.0, 2.0, 4.0, 3.0), PURPLE, true, &mut display).unwrap();
        assert_eq!(display.affected_area(), Rectangle::new(Point::new(1, 2), Size::new(3, 1)));
    }

    #[test]
    fn test_frame_paints_palette() {
        let metrics = DisplayMetrics::new(400.0, 400.0);
        let frame = render_frame(metrics, RenderMode::Active, &test_sample());
        let mut buffer = FrameBuffer::new(400, 400);
        rasterize(&frame, &mut buffer).ok();

        for color in [RED, ORANGE, PURPLE, YELLOW] {
            assert!(buffer.count(color.into()) > 0, "{:?} never painted", color);
        }
        assert_eq!(buffer.count(AMBIENT_WHITE.into()), 0);

        // The last band segment reaches the right edge at the top
        assert_eq!(buffer.pixel(399, 5), Some(PURPLE.into()));
        // Gap between band segments stays black
        assert_eq!(buffer.pixel(62, 5), Some(Rgb888::BLACK));
    }

    #[test]
    fn test_ambient_frame_is_monochrome_shapes() {
        let metrics = DisplayMetrics::new(300.0, 300.0);
        let frame = render_frame(metrics, RenderMode::Ambient, &test_sample());
        let mut buffer = FrameBuffer::new(300, 300);
        rasterize(&frame, &mut buffer).ok();

        for color in [RED, ORANGE, PURPLE] {
            assert_eq!(buffer.count(color.into()), 0);
        }
        assert!(buffer.count(AMBIENT_WHITE.into()) > 0);
        assert!(buffer.count(YELLOW.into()) > 0);
    }

    #[test]
    fn test_frame_buffer_drops_out_of_bounds() {
        let mut buffer = FrameBuffer::new(4, 4);
        buffer
            .draw_iter([
                Pixel(Point::new(-1, 0), Rgb888::WHITE),
                Pixel(Point::new(4, 0), Rgb888::WHITE),
                Pixel(Point::new(3, 3), Rgb888::WHITE),
            ])
            .ok();
        assert_eq!(buffer.count(Rgb888::WHITE), 1);
        assert_eq!(buffer.pixel(3, 3), Some(Rgb888::WHITE));
        assert_eq!(buffer.pixel(4, 4), None);
    }

    #[test]
    fn test_ascii_preview_shape() {
        let metrics = DisplayMetrics::new(400.0, 400.0);
        let frame = render_frame(metrics, RenderMode::Active, &test_sample());
        let mut buffer = FrameBuffer::new(400, 400);
        rasterize(&frame, &mut buffer).ok();

        let preview = ascii_preview(&buffer, 40);
        let lines: Vec<&str> = preview.lines().collect();
        assert_eq!(lines.len(), 20);
        assert!(lines.iter().all(|line| line.chars().count() == 40));
        // Elbow arcs, orange bars and purple band segments all show up
        for shade in ['▓', '▒', '░'] {
            assert!(preview.contains(shade), "missing {}", shade);
        }
    }

    #[test]
    fn test_ascii_preview_of_empty_buffer() {
        assert_eq!(ascii_preview(&FrameBuffer::new(0, 400), 60), "");
        assert_eq!(ascii_preview(&FrameBuffer::new(400, 0), 60), "");
    }
}
