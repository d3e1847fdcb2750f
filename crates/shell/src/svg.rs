//! SVG encoding of a recorded frame through `plotters`' SVG backend.

use crate::surface::Frame;
use plotters::element::DashedPathElement;
use plotters::prelude::*;
use plotters::style::Color as _;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use telemon_chart::{DrawOp, Point};
use telemon_config::LabelAlign;
use telemon_core::{Result, TelemonError};
use telemon_theme::Color;

/// Distance of the title from the top-left corner, in pixels.
const TITLE_INSET: i32 = 5;

type Area<'a> = DrawingArea<SVGBackend<'a>, plotters::coord::Shift>;

/// Replay `frame` onto an in-memory SVG document.
///
/// Coordinates are surface pixels, so the backend draws them as given.
pub fn document(frame: &Frame<'_>) -> Result<String> {
    let mut out = String::new();
    {
        let size = (frame.width.round() as u32, frame.height.round() as u32);
        let root = SVGBackend::with_string(&mut out, size).into_drawing_area();
        root.fill(&rgba(frame.background)).map_err(draw_error)?;

        for op in frame.ops {
            draw(&root, op)?;
        }

        if !frame.title.is_empty() {
            let style = ("sans-serif", f64::from(frame.font_size))
                .into_font()
                .color(&rgba(frame.foreground))
                .pos(Pos::new(HPos::Left, VPos::Top));
            root.draw(&Text::new(frame.title, (TITLE_INSET, TITLE_INSET), style))
                .map_err(draw_error)?;
        }

        root.present().map_err(draw_error)?;
    }
    Ok(out)
}

fn draw(root: &Area<'_>, op: &DrawOp) -> Result<()> {
    let drawn = match op {
        DrawOp::Polyline { points, color, thickness } => {
            let path: Vec<(i32, i32)> = points.iter().map(|p| pixel(*p)).collect();
            root.draw(&PathElement::new(path, stroke(*color, *thickness)))
        }
        DrawOp::Line { from, to, color, thickness, dash: Some([on, off]) } => root.draw(&DashedPathElement::new(
            vec![pixel(*from), pixel(*to)],
            *on,
            *off,
            stroke(*color, *thickness),
        )),
        DrawOp::Line { from, to, color, thickness, dash: None } => root.draw(&PathElement::new(
            vec![pixel(*from), pixel(*to)],
            stroke(*color, *thickness),
        )),
        DrawOp::Label { text, x, y, align, color, font_size } => {
            let hpos = match align {
                LabelAlign::Right => HPos::Right,
                LabelAlign::Left  => HPos::Left,
            };
            let style = ("sans-serif", f64::from(*font_size))
                .into_font()
                .color(&rgba(*color))
                .pos(Pos::new(hpos, VPos::Top));
            root.draw(&Text::new(text.as_str(), pixel(Point::new(*x, *y)), style))
        }
    };
    drawn.map_err(draw_error)
}

fn pixel(p: Point) -> (i32, i32) {
    (p.x.round() as i32, p.y.round() as i32)
}

fn rgba(c: Color) -> RGBAColor {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    RGBAColor(channel(c.r), channel(c.g), channel(c.b), f64::from(c.a))
}

/// Sub-pixel strokes are drawn one pixel wide.
fn stroke(color: Color, thickness: f32) -> ShapeStyle {
    rgba(color).stroke_width(thickness.ceil().max(1.0) as u32)
}

fn draw_error<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> TelemonError {
    TelemonError::Surface(format!("cannot draw svg frame: {e}"))
}
