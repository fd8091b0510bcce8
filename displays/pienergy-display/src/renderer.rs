//! Statistics screen
//!
//! Layout on the 128x64 logical surface, `FONT_6X10` with a top baseline:
//!
//! | y  | content                                   |
//! |----|-------------------------------------------|
//! | 0  | title, spinner at x = 120                 |
//! | 12 | stable digits                             |
//! | 24 | run time as mm:ss                         |
//! | 36 | digits per minute                         |
//! | 48 | `energy` label                            |
//! | 58 | activity gauge, full width, 6 px tall     |

use core::fmt::Write;

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use heapless::String;
use pienergy_core::traits::FrameStats;

/// Screen title
pub const TITLE: &str = "Pi ENERGY";

/// Spinner frames, one step per rendered frame
pub const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

const SPINNER_X: i32 = 120;
const ROW_TITLE: i32 = 0;
const ROW_DIGITS: i32 = 12;
const ROW_TIME: i32 = 24;
const ROW_RATE: i32 = 36;
const ROW_ENERGY: i32 = 48;

/// Activity gauge outline
pub const GAUGE_AREA: Rectangle = Rectangle::new(Point::new(0, 58), Size::new(128, 6));

/// Longest formatted line
const LINE_LEN: usize = 32;

/// Spinner glyph for a frame counter
pub fn spinner_char(frame: u64) -> char {
    SPINNER[(frame & 3) as usize]
}

/// Format a run time as `mm:ss`; minutes keep counting past 59
pub fn format_time(elapsed_ms: u64) -> String<LINE_LEN> {
    let total_s = elapsed_ms / 1000;
    let mut out = String::new();
    let _ = write!(out, "{:02}:{:02}", total_s / 60, total_s % 60);
    out
}

/// Filled width of a gauge with `inner_width` usable pixels
///
/// `ratio` is clamped to [0, 1]; NaN draws an empty gauge.
pub fn gauge_fill_width(inner_width: u32, ratio: f64) -> u32 {
    let ratio = if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(0.0, 1.0)
    };
    // Non-negative, so truncation is floor
    (inner_width as f64 * ratio) as u32
}

/// Draw a 1 px outline with the inside filled left to right by `ratio`
pub fn draw_gauge<D>(target: &mut D, area: Rectangle, ratio: f64) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    area.into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(target)?;

    let fill = gauge_fill_width(area.size.width.saturating_sub(2), ratio);
    let inner_height = area.size.height.saturating_sub(2);
    if fill > 0 && inner_height > 0 {
        Rectangle::new(area.top_left + Point::new(1, 1), Size::new(fill, inner_height))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(target)?;
    }

    Ok(())
}

fn draw_text<D>(target: &mut D, content: &str, x: i32, y: i32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
    Text::with_baseline(content, Point::new(x, y), style, Baseline::Top).draw(target)?;
    Ok(())
}

/// Paint the statistics screen
///
/// Draws on top of whatever is already there; callers clear first.
pub fn render_stats<D>(target: &mut D, stats: &FrameStats) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    draw_text(target, TITLE, 0, ROW_TITLE)?;

    let mut glyph = [0u8; 4];
    let spinner = spinner_char(stats.frame).encode_utf8(&mut glyph);
    draw_text(target, spinner, SPINNER_X, ROW_TITLE)?;

    let mut line: String<LINE_LEN> = String::new();
    let _ = write!(line, "digits : {}", stats.digits);
    draw_text(target, line.as_str(), 0, ROW_DIGITS)?;

    line.clear();
    let _ = write!(line, "time   : {}", format_time(stats.elapsed_ms));
    draw_text(target, line.as_str(), 0, ROW_TIME)?;

    line.clear();
    let _ = write!(line, "digits/min : {:.1}", stats.digits_per_minute);
    draw_text(target, line.as_str(), 0, ROW_RATE)?;

    draw_text(target, "energy", 0, ROW_ENERGY)?;

    draw_gauge(target, GAUGE_AREA, stats.activity)
}
