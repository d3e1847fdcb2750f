use crate::svg;
use chrono::Local;
use serde::Serialize;
use std::path::{Path, PathBuf};
use telemon_chart::{DrawOp, DrawingSurface, Point, RecordingSurface};
use telemon_config::{LabelAlign, OutputFormat};
use telemon_core::{Result, TelemonError};
use telemon_pipeline::SharedTitle;
use telemon_theme::{Color, Theme};

/// One presented frame, as written to disk.
#[derive(Debug, Serialize)]
pub struct Frame<'a> {
    pub title:      &'a str,
    pub timestamp:  String,
    pub width:      f32,
    pub height:     f32,
    pub background: Color,
    pub foreground: Color,
    pub font_size:  f32,
    pub ops:        &'a [DrawOp],
}

/// Surface that rewrites `<dir>/<name>.<svg|json>` every time a frame is
/// presented.  The chart title is read from a [`SharedTitle`] and drawn in
/// the theme's label colour.
#[derive(Debug)]
pub struct FileSurface {
    canvas:     RecordingSurface,
    path:       PathBuf,
    format:     OutputFormat,
    background: Color,
    foreground: Color,
    font_size:  f32,
    title:      SharedTitle,
}

impl FileSurface {
    pub fn new(
        dir: &Path,
        name: &str,
        format: OutputFormat,
        (width, height): (f32, f32),
        theme: &Theme,
        title: SharedTitle,
    ) -> Self {
        let ext = match format {
            OutputFormat::Svg  => "svg",
            OutputFormat::Json => "json",
        };
        Self {
            canvas: RecordingSurface::new(width, height),
            path: dir.join(format!("{name}.{ext}")),
            format,
            background: theme.background,
            foreground: theme.chart.label_color,
            font_size: theme.chart.font_size,
            title,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn encode(&self) -> Result<String> {
        let title = self.title.text();
        let frame = Frame {
            title:      &title,
            timestamp:  Local::now().to_rfc3339(),
            width:      self.canvas.width(),
            height:     self.canvas.height(),
            background: self.background,
            foreground: self.foreground,
            font_size:  self.font_size,
            ops:        self.canvas.ops(),
        };
        match self.format {
            OutputFormat::Svg  => svg::document(&frame),
            OutputFormat::Json => serde_json::to_string_pretty(&frame)
                .map_err(|e| TelemonError::Surface(format!("cannot encode frame: {e}"))),
        }
    }
}

impl DrawingSurface for FileSurface {
    fn width(&self) -> f32 {
        self.canvas.width()
    }

    fn height(&self) -> f32 {
        self.canvas.height()
    }

    fn clear(&mut self) {
        self.canvas.clear();
    }

    fn add_polyline(&mut self, points: &[Point], color: Color, thickness: f32) {
        self.canvas.add_polyline(points, color, thickness);
    }

    fn add_line(&mut self, from: Point, to: Point, color: Color, thickness: f32, dash: Option<[f32; 2]>) {
        self.canvas.add_line(from, to, color, thickness, dash);
    }

    fn add_label(&mut self, text: &str, x: f32, y: f32, align: LabelAlign, color: Color, font_size: f32) {
        self.canvas.add_label(text, x, y, align, color, font_size);
    }

    fn present(&mut self) -> Result<()> {
        let contents = self.encode()?;
        write_replacing(&self.path, contents.as_bytes())
    }
}

/// Write to a sibling temp file and rename over `path`, so readers never
/// see a half-written frame.
fn write_replacing(path: &Path, contents: &[u8]) -> Result<()> {
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, contents)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use telemon_pipeline::TitleLabel;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("telemon-surface-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn svg_frame_is_written_on_present() {
        let dir = scratch("svg");
        let mut title = SharedTitle::new();
        let mut surface =
            FileSurface::new(&dir, "cpu_load", OutputFormat::Svg, (300.0, 100.0), &Theme::default(), title.clone());

        surface.clear();
        surface.add_polyline(&[Point::new(0.0, 90.0), Point::new(5.0, 80.0)], Color::RED, 2.0);
        title.set_text("CPU Load - 20.0%");
        surface.present().unwrap();

        assert_eq!(surface.path(), dir.join("cpu_load.svg"));
        let written = std::fs::read_to_string(surface.path()).unwrap();
        assert!(written.contains("CPU Load - 20.0%"));
        assert!(written.to_ascii_lowercase().contains("#ff0000"));
        assert!(!dir.join("cpu_load.tmp").exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn json_frame_lists_ops() {
        let dir = scratch("json");
        let mut surface = FileSurface::new(
            &dir,
            "gpu_power",
            OutputFormat::Json,
            (300.0, 100.0),
            &Theme::default(),
            SharedTitle::new(),
        );
        surface.add_label("10W", 295.0, 43.0, LabelAlign::Right, Color::WHITE, 10.0);
        surface.present().unwrap();

        let raw = std::fs::read_to_string(dir.join("gpu_power.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["width"], 300.0);
        assert_eq!(value["ops"][0]["op"], "label");
        assert_eq!(value["ops"][0]["text"], "10W");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let mut surface = FileSurface::new(
            Path::new("/nonexistent/telemon"),
            "cpu_load",
            OutputFormat::Svg,
            (300.0, 100.0),
            &Theme::default(),
            SharedTitle::new(),
        );
        assert!(matches!(surface.present(), Err(TelemonError::Io { .. })));
    }
}
