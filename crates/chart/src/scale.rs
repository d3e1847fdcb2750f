//! Axis scaling policies.
//!
//! A [`ScaleStrategy`] turns the contents of a [`RollingSeries`] into an
//! [`AxisRange`] and a set of [`GridMark`]s.  Every strategy is a pure
//! function of its inputs: the same series always yields the same range.

use serde::Serialize;
use telemon_config::{PercentLabels, ScaleChoice};
use telemon_core::{MetricKind, RollingSeries};

/// Minimum vertical span of a temperature chart (°C).
pub const TEMPERATURE_SPAN_FLOOR: f32 = 10.0;
/// Minimum vertical span of a power chart (W).
pub const POWER_SPAN_FLOOR: f32 = 5.0;
/// Minimum vertical span of a raw-value chart.
pub const RAW_SPAN_FLOOR: f32 = 1.0;

/// Fraction of the observed range added above and below the data.
const ADAPTIVE_HEADROOM: f32 = 0.2;

/// Upper bound on gridlines per chart; only reachable with absurd readings.
const MAX_GRIDLINES: usize = 64;

const FIXED_THRESHOLD_MIN: f32 = 30.0;
const FIXED_THRESHOLD_MAX: f32 = 100.0;
const FIXED_THRESHOLD_STEP: f32 = 20.0;

/// Vertical extent of a chart plus the spacing of its gridlines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisRange {
    pub min:       f32,
    pub max:       f32,
    pub grid_step: f32,
}

impl AxisRange {
    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    /// `true` if `value` lies within `[min, max]`.
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// One horizontal gridline: where it goes and what it says.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridMark {
    pub value: f32,
    pub label: String,
}

/// Grid-step lookup keyed on the axis span.  Each table is monotone: a
/// wider span never gets a finer step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepTable {
    Temperature,
    Power,
    /// 1-2-5 "nice numbers", at most about five lines, never below 1.
    Generic,
}

impl StepTable {
    pub fn step_for(self, span: f32) -> f32 {
        match self {
            Self::Temperature => match span {
                s if s <= 20.0  => 5.0,
                s if s <= 50.0  => 10.0,
                s if s <= 100.0 => 20.0,
                _ => 25.0,
            },
            Self::Power => match span {
                s if s <= 10.0  => 2.0,
                s if s <= 25.0  => 5.0,
                s if s <= 50.0  => 10.0,
                s if s <= 100.0 => 20.0,
                _ => 50.0,
            },
            Self::Generic => nice_step(span),
        }
    }
}

fn nice_step(span: f32) -> f32 {
    let raw = span / 5.0;
    if !(raw.is_finite() && raw > 1.0) {
        return 1.0;
    }
    let magnitude = 10f32.powi(raw.log10().floor() as i32);
    let multiplier = match raw / magnitude {
        n if n <= 1.0 => 1.0,
        n if n <= 2.0 => 2.0,
        n if n <= 5.0 => 5.0,
        _ => 10.0,
    };
    multiplier * magnitude
}

/// Axis scaling policy for one chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScaleStrategy {
    /// `[0, max(100, observed max)]` with quarter gridlines.
    ///
    /// With [`PercentLabels::Nominal`] the gridlines are labelled
    /// `75% / 50% / 25% / 0%` even when the axis max has been raised above
    /// 100, so the labels no longer match the lines.
    FixedRange { labels: PercentLabels },
    /// Fit the observed min/max with 20% headroom, never narrower than
    /// `floor` and never below zero.
    AdaptiveMinMax { floor: f32, steps: StepTable },
    /// Fixed `[30, 100]` temperature axis with lines at 40/60/80/100.
    FixedThresholdRange,
}

impl ScaleStrategy {
    pub const fn temperature() -> Self {
        Self::AdaptiveMinMax {
            floor: TEMPERATURE_SPAN_FLOOR,
            steps: StepTable::Temperature,
        }
    }

    pub const fn power() -> Self {
        Self::AdaptiveMinMax {
            floor: POWER_SPAN_FLOOR,
            steps: StepTable::Power,
        }
    }

    pub const fn raw() -> Self {
        Self::AdaptiveMinMax {
            floor: RAW_SPAN_FLOOR,
            steps: StepTable::Generic,
        }
    }

    /// Default strategy for a metric kind.
    pub fn for_kind(kind: MetricKind, labels: PercentLabels) -> Self {
        match kind {
            MetricKind::Percentage  => Self::FixedRange { labels },
            MetricKind::Temperature => Self::temperature(),
            MetricKind::Power       => Self::power(),
            MetricKind::RawValue    => Self::raw(),
        }
    }

    /// Strategy named in config.  `Adaptive` picks the floor and step table
    /// that belong to `kind`.
    pub fn from_choice(choice: ScaleChoice, kind: MetricKind, labels: PercentLabels) -> Self {
        match choice {
            ScaleChoice::FixedRange     => Self::FixedRange { labels },
            ScaleChoice::FixedThreshold => Self::FixedThresholdRange,
            ScaleChoice::Adaptive => match kind {
                MetricKind::Temperature => Self::temperature(),
                MetricKind::Power       => Self::power(),
                MetricKind::Percentage | MetricKind::RawValue => Self::raw(),
            },
        }
    }

    /// Compute the axis for the current series contents.
    pub fn compute_range(&self, series: &RollingSeries) -> AxisRange {
        match *self {
            Self::FixedRange { .. } => {
                let observed = finite_bounds(series).map_or(0.0, |(_, max)| max);
                AxisRange {
                    min:       0.0,
                    max:       observed.max(100.0),
                    grid_step: 25.0,
                }
            }
            Self::AdaptiveMinMax { floor, steps } => {
                let (min, max) = adaptive_bounds(series, floor);
                AxisRange {
                    min,
                    max,
                    grid_step: steps.step_for(max - min),
                }
            }
            Self::FixedThresholdRange => AxisRange {
                min:       FIXED_THRESHOLD_MIN,
                max:       FIXED_THRESHOLD_MAX,
                grid_step: FIXED_THRESHOLD_STEP,
            },
        }
    }

    /// Gridlines for `range`, top to bottom for [`FixedRange`](Self::FixedRange)
    /// and bottom to top otherwise.  `unit` is appended to each label.
    pub fn gridlines(&self, range: &AxisRange, unit: &str) -> Vec<GridMark> {
        match *self {
            Self::FixedRange { labels } => (1..=4)
                .map(|i| {
                    let value = range.min + range.span() * (4 - i) as f32 / 4.0;
                    let label = match labels {
                        PercentLabels::Nominal => format!("{}{unit}", 100 - i * 25),
                        PercentLabels::Scaled  => format!("{value:.0}{unit}"),
                    };
                    GridMark { value, label }
                })
                .collect(),
            Self::AdaptiveMinMax { .. } | Self::FixedThresholdRange => step_marks(range, unit),
        }
    }
}

/// Smallest and largest finite sample; NaN and infinities are skipped.
fn finite_bounds(series: &RollingSeries) -> Option<(f32, f32)> {
    series
        .values()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

fn adaptive_bounds(series: &RollingSeries, floor: f32) -> (f32, f32) {
    let (raw_min, raw_max) = finite_bounds(series).unwrap_or((0.0, 0.0));
    let buffer = (raw_max - raw_min) * ADAPTIVE_HEADROOM;

    let mut min = (raw_min - buffer).max(0.0);
    let mut max = raw_max + buffer;

    if max - min < floor {
        let mid = (max + min) / 2.0;
        min = (mid - floor / 2.0).max(0.0);
        max = mid + floor / 2.0;
        // Clamping at zero would otherwise leave the axis short of the floor.
        if max - min < floor {
            max = min + floor;
        }
    }

    (min, max)
}

/// Lines at every multiple of `grid_step` inside the range.
fn step_marks(range: &AxisRange, unit: &str) -> Vec<GridMark> {
    let step = range.grid_step;
    if !(step > 0.0 && range.min.is_finite() && range.max.is_finite()) {
        return Vec::new();
    }

    let first = (range.min / step).ceil() * step;
    let marks: Vec<GridMark> = (0..MAX_GRIDLINES)
        .map(|k| first + k as f32 * step)
        .take_while(|&value| value <= range.max)
        .map(|value| GridMark {
            value,
            label: format!("{value:.0}{unit}"),
        })
        .collect();

    if marks.len() == MAX_GRIDLINES {
        tracing::debug!(?range, "gridline count capped at {MAX_GRIDLINES}");
    }
    marks
}
