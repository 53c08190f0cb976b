//! # LCARS Face Layout
//!
//! Maps a display size, a render mode and a clock sample to the ordered list
//! of shapes and texts that make up one frame.
//!
//! ## Face Structure
//!
//! ```text
//!  ╭──┬▬▬▬▬▬▬▬▬▬▬▬▬▬▬▬▬▬▬  band at y = 0
//!  │  │ 2024.03.07             date
//!  ╰──┴▬▬▬▬▬▬▬▬▬▬▬▬▬▬▬▬▬▬  band at y = H/3 - 10
//!  ╭──┬▬▬▬▬▬▬▬▬▬▬▬▬▬▬▬▬▬▬  band at y = H/3 + 10
//!  ███
//!  ▬▬▬        14.05            time
//!  ███
//!  ▬▬▬
//!  ╰──┴▬▬▬▬▬▬▬▬▬▬▬▬▬▬▬▬▬▬  band at y = H - 20
//! ```
//!
//! The left edge carries two elbow panels built from quarter arcs and bars;
//! the horizontal bands are fixed-width segments with the last segment
//! stretched to the right edge. Only the panel heights and the last band
//! segment depend on the display size.
//!
//! Angles follow the screen convention: 0° points to 3 o'clock and positive
//! sweeps run clockwise.

use crate::palette::{Color, BACKGROUND_BLACK, ORANGE, PURPLE, RED, YELLOW};
use crate::{ClockSample, DisplayMetrics, RenderMode};
use serde::{Deserialize, Serialize};

/// Width of the vertical bars on the left edge. Elbow arcs are twice as wide.
pub const PANEL_WIDTH: f32 = 40.0;
/// Thickness of every horizontal band segment.
pub const BAND_HEIGHT: f32 = 10.0;
pub const TIME_FONT_SIZE: f32 = 70.0;
pub const DATE_FONT_SIZE: f32 = 40.0;

/// Band segments as (left, right, accent); `None` stretches to the right edge.
const BAND_SEGMENTS: [(f32, Option<f32>, Color); 5] = [
    (40.0, Some(60.0), RED),
    (65.0, Some(100.0), PURPLE),
    (105.0, Some(180.0), ORANGE),
    (185.0, Some(205.0), RED),
    (210.0, None, PURPLE),
];

/// Axis-aligned box in canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Bounds {
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// Horizontal placement of a text run relative to its anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    Left,
    Center,
}

/// One drawing instruction. Produced fresh for every frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawPrimitive {
    /// Pie slice of the ellipse inscribed in `bounds`.
    Arc {
        bounds: Bounds,
        start_angle: f32,
        sweep_angle: f32,
        color: Color,
        filled: bool,
        anti_alias: bool,
    },
    Rect {
        bounds: Bounds,
        color: Color,
        filled: bool,
        anti_alias: bool,
    },
    /// `y` is the text baseline.
    Text {
        content: String,
        x: f32,
        y: f32,
        align: TextAlign,
        font_size: f32,
        color: Color,
    },
}

impl DrawPrimitive {
    /// Color this primitive paints with.
    pub fn color(&self) -> Color {
        match self {
            DrawPrimitive::Arc { color, .. }
            | DrawPrimitive::Rect { color, .. }
            | DrawPrimitive::Text { color, .. } => *color,
        }
    }

    /// Text content, if this is a text run.
    pub fn text(&self) -> Option<&str> {
        match self {
            DrawPrimitive::Text { content, .. } => Some(content),
            _ => None,
        }
    }

    fn shape_rect(bounds: Bounds, accent: Color, mode: RenderMode) -> Self {
        let style = mode.shape_style(accent);
        DrawPrimitive::Rect {
            bounds,
            color: style.color,
            filled: true,
            anti_alias: style.anti_alias,
        }
    }

    fn shape_arc(bounds: Bounds, start_angle: f32, sweep_angle: f32, accent: Color, mode: RenderMode) -> Self {
        let style = mode.shape_style(accent);
        DrawPrimitive::Arc {
            bounds,
            start_angle,
            sweep_angle,
            color: style.color,
            filled: true,
            anti_alias: style.anti_alias,
        }
    }
}

/// Render a clock field with at least two digits.
///
/// ```
/// use lcars_face_lib::layout::two_digits;
///
/// assert_eq!(two_digits(5), "05");
/// assert_eq!(two_digits(23), "23");
/// assert_eq!(two_digits(2024), "2024");
/// ```
pub fn two_digits(value: i32) -> String {
    if (0..10).contains(&value) {
        format!("0{}", value)
    } else {
        value.to_string()
    }
}

/// Full-canvas black fill. Always the first primitive of a frame.
pub fn background(metrics: DisplayMetrics) -> DrawPrimitive {
    DrawPrimitive::Rect {
        bounds: Bounds::new(0.0, 0.0, metrics.width, metrics.height),
        color: BACKGROUND_BLACK,
        filled: true,
        anti_alias: false,
    }
}

/// Upper elbow: quarter arc, short bar, mirrored quarter arc, filling the
/// first third of the left edge.
pub fn top_left_panel(canvas_height: f32, mode: RenderMode) -> Vec<DrawPrimitive> {
    let start = 0.0;
    let third = canvas_height / 3.0;
    let total_height = third - 10.0;
    let bar_top = start + total_height / 2.0;

    vec![
        DrawPrimitive::shape_arc(
            Bounds::new(0.0, start, PANEL_WIDTH * 2.0, start + total_height - 10.0),
            180.0,
            90.0,
            RED,
            mode,
        ),
        DrawPrimitive::shape_rect(
            Bounds::new(0.0, bar_top, PANEL_WIDTH, bar_top + BAND_HEIGHT),
            PURPLE,
            mode,
        ),
        DrawPrimitive::shape_arc(
            Bounds::new(0.0, third - total_height + 10.0, PANEL_WIDTH * 2.0, third),
            180.0,
            -90.0,
            RED,
            mode,
        ),
    ]
}

/// Lower elbow covering the remaining two thirds of the left edge: a quarter
/// arc, four stacked bars alternating big and small, and a closing arc.
pub fn bottom_left_panel(canvas_height: f32, mode: RenderMode) -> Vec<DrawPrimitive> {
    const MIDDLE_HEIGHT: f32 = 100.0;
    const BIG: f32 = 40.0;
    const SMALL: f32 = 10.0;
    const GAP: f32 = 5.0;

    let start = canvas_height / 3.0;
    let offset = (canvas_height / 1.5 - MIDDLE_HEIGHT) / 2.0;
    let top = start + offset;

    let mut primitives = Vec::with_capacity(6);
    primitives.push(DrawPrimitive::shape_arc(
        Bounds::new(0.0, start + 10.0, PANEL_WIDTH * 2.0, start + 2.0 * offset - 20.0),
        180.0,
        90.0,
        RED,
        mode,
    ));

    // Each bar starts one gap below the previous bar's bottom edge; the bottom
    // edges accumulate without the gaps, so small bars come out 5 units tall.
    let bars = [
        (top, top + BIG),
        (top + BIG + GAP, top + BIG + SMALL),
        (top + BIG + SMALL + GAP, top + 2.0 * BIG + SMALL),
        (top + 2.0 * BIG + SMALL + GAP, top + 2.0 * BIG + 2.0 * SMALL),
    ];
    primitives.extend(bars.iter().map(|&(bar_top, bar_bottom)| {
        DrawPrimitive::shape_rect(Bounds::new(0.0, bar_top, PANEL_WIDTH, bar_bottom), ORANGE, mode)
    }));

    primitives.push(DrawPrimitive::shape_arc(
        Bounds::new(
            0.0,
            canvas_height - 2.0 * offset + 20.0,
            PANEL_WIDTH * 2.0,
            canvas_height - 10.0,
        ),
        180.0,
        -90.0,
        RED,
        mode,
    ));
    primitives
}

/// Five abutting band segments starting at `y_start`, the last one running
/// to the right edge of the canvas.
pub fn horizontal_band(canvas_width: f32, y_start: f32, mode: RenderMode) -> Vec<DrawPrimitive> {
    BAND_SEGMENTS
        .iter()
        .map(|&(left, right, accent)| {
            let right = right.unwrap_or(canvas_width);
            DrawPrimitive::shape_rect(
                Bounds::new(left, y_start, right, y_start + BAND_HEIGHT),
                accent,
                mode,
            )
        })
        .collect()
}

/// `HH.MM` in 24-hour form, centered right of the display middle.
///
/// Text keeps its yellow in ambient mode.
pub fn time_text(metrics: DisplayMetrics, sample: &ClockSample) -> DrawPrimitive {
    DrawPrimitive::Text {
        content: format!(
            "{}.{}",
            two_digits(sample.hour as i32),
            two_digits(sample.minute as i32)
        ),
        x: metrics.width / 2.0 + 40.0,
        y: metrics.height / 1.5 + 20.0,
        align: TextAlign::Center,
        font_size: TIME_FONT_SIZE,
        color: YELLOW,
    }
}

/// `YYYY.MM.DD`, left-aligned inside the upper elbow.
pub fn date_text(metrics: DisplayMetrics, sample: &ClockSample) -> DrawPrimitive {
    DrawPrimitive::Text {
        content: format!(
            "{}.{}.{}",
            two_digits(sample.year),
            two_digits(sample.month as i32),
            two_digits(sample.day as i32)
        ),
        x: 50.0,
        y: metrics.height / 3.0 - 35.0,
        align: TextAlign::Left,
        font_size: DATE_FONT_SIZE,
        color: YELLOW,
    }
}

/// Build the complete frame in painter's order.
pub fn render_frame(metrics: DisplayMetrics, mode: RenderMode, sample: &ClockSample) -> Vec<DrawPrimitive> {
    let DisplayMetrics { width, height } = metrics;
    let third = height / 3.0;

    let mut frame = Vec::with_capacity(36);
    frame.push(background(metrics));

    // Top
    frame.extend(top_left_panel(height, mode));
    frame.extend(horizontal_band(width, 0.0, mode));
    frame.extend(horizontal_band(width, third - 10.0, mode));

    // Bottom
    frame.extend(bottom_left_panel(height, mode));
    frame.extend(horizontal_band(width, third + 10.0, mode));
    frame.extend(horizontal_band(width, height - 20.0, mode));

    frame.push(time_text(metrics, sample));
    frame.push(date_text(metrics, sample));
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::AMBIENT_WHITE;

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

    fn square(size: f32) -> DisplayMetrics {
        DisplayMetrics::new(size, size)
    }

    #[test]
    fn test_two_digits() {
        assert_eq!(two_digits(0), "00");
        assert_eq!(two_digits(5), "05");
        assert_eq!(two_digits(9), "09");
        assert_eq!(two_digits(10), "10");
        assert_eq!(two_digits(23), "23");
        assert_eq!(two_digits(59), "59");
        assert_eq!(two_digits(2024), "2024");
    }

    #[test]
    fn test_frame_starts_with_background() {
        for (width, height) in [(1.0, 1.0), (240.0, 240.0), (400.0, 400.0), (320.0, 480.0)] {
            let metrics = DisplayMetrics::new(width, height);
            for mode in [RenderMode::Active, RenderMode::Ambient] {
                let frame = render_frame(metrics, mode, &test_sample());
                assert!(!frame.is_empty());
                assert_eq!(
                    frame[0],
                    DrawPrimitive::Rect {
                        bounds: Bounds::new(0.0, 0.0, width, height),
                        color: BACKGROUND_BLACK,
                        filled: true,
                        anti_alias: false,
                    }
                );
            }
        }
    }

    #[test]
    fn test_frame_composition() {
        let frame = render_frame(square(400.0), RenderMode::Active, &test_sample());
        // background + 3 + 4 bands × 5 + 6 + 2 texts
        assert_eq!(frame.len(), 1 + 3 + 20 + 6 + 2);

        let texts: Vec<&str> = frame.iter().filter_map(|p| p.text()).collect();
        assert_eq!(texts, vec!["14.05", "2024.03.07"]);
    }

    #[test]
    fn test_time_and_date_text_scenario() {
        let metrics = square(400.0);
        let sample = test_sample();

        match time_text(metrics, &sample) {
            DrawPrimitive::Text {
                content,
                x,
                y,
                align,
                font_size,
                color,
            } => {
                assert_eq!(content, "14.05");
                assert_eq!(x, 240.0);
                assert!((y - (400.0 / 1.5 + 20.0)).abs() < 1e-3);
                assert_eq!(align, TextAlign::Center);
                assert_eq!(font_size, 70.0);
                assert_eq!(color, YELLOW);
            }
            other => panic!("expected text, got {:?}", other),
        }

        match date_text(metrics, &sample) {
            DrawPrimitive::Text {
                content,
                x,
                y,
                align,
                font_size,
                ..
            } => {
                assert_eq!(content, "2024.03.07");
                assert_eq!(x, 50.0);
                assert!((y - (400.0 / 3.0 - 35.0)).abs() < 1e-3);
                assert_eq!(align, TextAlign::Left);
                assert_eq!(font_size, 40.0);
            }
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_midnight_padding() {
        let sample = ClockSample {
            year: 2025,
            month: 12,
            day: 31,
            hour: 0,
            minute: 0,
            second: 59.999,
        };
        assert_eq!(time_text(square(400.0), &sample).text(), Some("00.00"));
        assert_eq!(date_text(square(400.0), &sample).text(), Some("2025.12.31"));
    }

    #[test]
    fn test_ambient_only_changes_shape_style() {
        let metrics = square(400.0);
        let sample = test_sample();
        let active = render_frame(metrics, RenderMode::Active, &sample);
        let ambient = render_frame(metrics, RenderMode::Ambient, &sample);

        // Same inputs give the same frame
        assert_eq!(ambient, render_frame(metrics, RenderMode::Ambient, &sample));
        assert_eq!(active.len(), ambient.len());

        // Background and texts are untouched
        assert_eq!(active[0], ambient[0]);
        assert_eq!(active[active.len() - 2..], ambient[ambient.len() - 2..]);

        for (a, b) in active.iter().zip(ambient.iter()).skip(1) {
            match (a, b) {
                (
                    DrawPrimitive::Rect {
                        bounds: ba,
                        filled: fa,
                        anti_alias: aa,
                        ..
                    },
                    DrawPrimitive::Rect {
                        bounds: bb,
                        color,
                        filled: fb,
                        anti_alias: ab,
                    },
                ) => {
                    assert_eq!(ba, bb);
                    assert_eq!(fa, fb);
                    assert!(*aa);
                    assert!(!*ab);
                    assert_eq!(*color, AMBIENT_WHITE);
                }
                (
                    DrawPrimitive::Arc {
                        bounds: ba,
                        start_angle: sa,
                        sweep_angle: wa,
                        anti_alias: aa,
                        ..
                    },
                    DrawPrimitive::Arc {
                        bounds: bb,
                        start_angle: sb,
                        sweep_angle: wb,
                        color,
                        anti_alias: ab,
                        ..
                    },
                ) => {
                    assert_eq!(ba, bb);
                    assert_eq!(sa, sb);
                    assert_eq!(wa, wb);
                    assert!(*aa);
                    assert!(!*ab);
                    assert_eq!(*color, AMBIENT_WHITE);
                }
                (DrawPrimitive::Text { .. }, DrawPrimitive::Text { .. }) => assert_eq!(a, b),
                _ => panic!("primitive kinds differ: {:?} vs {:?}", a, b),
            }
        }
    }

    #[test]
    fn test_top_left_panel_geometry() {
        let panel = top_left_panel(300.0, RenderMode::Active);
        assert_eq!(panel.len(), 3);

        // total height = 300/3 - 10 = 90
        assert_eq!(
            panel[0],
            DrawPrimitive::Arc {
                bounds: Bounds::new(0.0, 0.0, 80.0, 80.0),
                start_angle: 180.0,
                sweep_angle: 90.0,
                color: RED,
                filled: true,
                anti_alias: true,
            }
        );
        assert_eq!(
            panel[1],
            DrawPrimitive::Rect {
                bounds: Bounds::new(0.0, 45.0, 40.0, 55.0),
                color: PURPLE,
                filled: true,
                anti_alias: true,
            }
        );
        assert_eq!(
            panel[2],
            DrawPrimitive::Arc {
                bounds: Bounds::new(0.0, 20.0, 80.0, 100.0),
                start_angle: 180.0,
                sweep_angle: -90.0,
                color: RED,
                filled: true,
                anti_alias: true,
            }
        );
    }

    #[test]
    fn test_bottom_left_panel_geometry() {
        let panel = bottom_left_panel(300.0, RenderMode::Active);
        assert_eq!(panel.len(), 6);

        // start = 100, offset = (200 - 100) / 2 = 50
        let colors: Vec<Color> = panel.iter().map(|p| p.color()).collect();
        assert_eq!(colors, vec![RED, ORANGE, ORANGE, ORANGE, ORANGE, RED]);

        let bars: Vec<Bounds> = panel[1..5]
            .iter()
            .map(|p| match p {
                DrawPrimitive::Rect { bounds, .. } => *bounds,
                other => panic!("expected rect, got {:?}", other),
            })
            .collect();
        assert_eq!(bars[0], Bounds::new(0.0, 150.0, 40.0, 190.0));
        assert_eq!(bars[1], Bounds::new(0.0, 195.0, 40.0, 200.0));
        assert_eq!(bars[2], Bounds::new(0.0, 205.0, 40.0, 240.0));
        assert_eq!(bars[3], Bounds::new(0.0, 245.0, 40.0, 250.0));

        match &panel[0] {
            DrawPrimitive::Arc { bounds, sweep_angle, .. } => {
                assert_eq!(*bounds, Bounds::new(0.0, 110.0, 80.0, 180.0));
                assert_eq!(*sweep_angle, 90.0);
            }
            other => panic!("expected arc, got {:?}", other),
        }
        match &panel[5] {
            DrawPrimitive::Arc { bounds, sweep_angle, .. } => {
                assert_eq!(*bounds, Bounds::new(0.0, 220.0, 80.0, 290.0));
                assert_eq!(*sweep_angle, -90.0);
            }
            other => panic!("expected arc, got {:?}", other),
        }
    }

    #[test]
    fn test_horizontal_band_segments() {
        let band = horizontal_band(400.0, 50.0, RenderMode::Active);
        let expected = [
            (40.0, 60.0, RED),
            (65.0, 100.0, PURPLE),
            (105.0, 180.0, ORANGE),
            (185.0, 205.0, RED),
            (210.0, 400.0, PURPLE),
        ];
        assert_eq!(band.len(), expected.len());
        for (primitive, (left, right, color)) in band.iter().zip(expected) {
            assert_eq!(
                *primitive,
                DrawPrimitive::Rect {
                    bounds: Bounds::new(left, 50.0, right, 60.0),
                    color,
                    filled: true,
                    anti_alias: true,
                }
            );
        }
    }

    #[test]
    fn test_band_positions_in_frame() {
        let height = 360.0;
        let frame = render_frame(DisplayMetrics::new(400.0, height), RenderMode::Active, &test_sample());
        let band_tops: Vec<f32> = frame
            .iter()
            .filter_map(|p| match p {
                DrawPrimitive::Rect { bounds, .. } if bounds.left == 40.0 => Some(bounds.top),
                _ => None,
            })
            .collect();
        assert_eq!(band_tops, vec![0.0, 110.0, 130.0, 340.0]);
    }

    #[test]
    fn test_frame_serializes_to_json() {
        let frame = render_frame(square(240.0), RenderMode::Ambient, &test_sample());
        let json = serde_json::to_string(&frame).unwrap();
        assert!(json.contains("\"kind\":\"arc\""));
        assert!(json.contains("\"content\":\"14.05\""));

        let parsed: Vec<DrawPrimitive> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, frame);
    }
}
