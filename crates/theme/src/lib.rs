pub mod colors;
pub mod style;

pub use colors::Color;
pub use style::{ChartStyle, StrokeStyle};

use telemon_config::{PercentLabels, ThemeConfig};

/// Compiled theme derived from [`ThemeConfig`].
///
/// All colors are pre-parsed from hex strings into normalised `[0, 1]` RGBA.
/// Calling [`Theme::from_config`] is infallible: invalid color strings fall
/// back to the built-in style.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub background:     Color,
    pub chart:          ChartStyle,
    pub percent_labels: PercentLabels,
}

impl Theme {
    /// Build a [`Theme`] from the config file's `[theme]` section.
    pub fn from_config(cfg: &ThemeConfig) -> Self {
        let defaults = ChartStyle::default();
        let mut chart = defaults.clone();

        chart.gridline.color = Color::from_hex(&cfg.grid).unwrap_or(defaults.gridline.color);
        chart.warning.color  = Color::from_hex(&cfg.warning).unwrap_or(defaults.warning.color);
        chart.critical.color = Color::from_hex(&cfg.critical).unwrap_or(defaults.critical.color);
        chart.label_color    = Color::from_hex(&cfg.label).unwrap_or(defaults.label_color);
        chart.label_align    = cfg.label_align;
        if cfg.font_size > 0.0 {
            chart.font_size = cfg.font_size;
        }

        Self {
            background: Color::from_hex(&cfg.background).unwrap_or(Color::DARK),
            chart,
            percent_labels: cfg.percent_labels,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use telemon_config::LabelAlign;

    #[test]
    fn default_theme_matches_builtin_style() {
        let theme = Theme::default();
        assert_eq!(theme.chart, ChartStyle::default());
        assert_eq!(theme.background, Color::DARK);
    }

    #[test]
    fn invalid_colors_fall_back() {
        let cfg = ThemeConfig {
            grid: "not-a-color".into(),
            label: "#000000".into(),
            label_align: LabelAlign::Left,
            font_size: -3.0,
            ..ThemeConfig::default()
        };
        let theme = Theme::from_config(&cfg);
        assert_eq!(theme.chart.gridline.color, Color::GRAY);
        assert_eq!(theme.chart.label_color, Color::BLACK);
        assert_eq!(theme.chart.label_align, LabelAlign::Left);
        assert_eq!(theme.chart.font_size, 10.0);
    }
}
