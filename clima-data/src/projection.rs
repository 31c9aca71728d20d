//! Slope-anchor projection of an annual index into future years.
//!
//! Two projections are produced side by side:
//!
//! * **raw**: the OLS line over the whole history, extended.
//! * **anchored**: starts from the last smoothed historical value and moves
//!   with the slope of the smoothed curve over a recent stable window.
//!
//! The anchored line evaluated at the last historical year equals the last
//! smoothed value exactly, so it continues the smoothed curve without a
//! jump.

use crate::aggregate::YearValue;
use clima_stats::regression::{fit, RegressionModel, MIN_REGRESSION_SAMPLES};
use clima_stats::smoothing::{smooth_series, SmoothedPoint};
use serde::{Deserialize, Serialize};

/// Default smoothing window, in years.
pub const DEFAULT_WINDOW: usize = 5;

/// Default start of the stable window: the 1991-2020 climate normal.
pub const DEFAULT_STABLE_START_YEAR: i32 = 1991;

/// Default final projected year.
pub const DEFAULT_HORIZON: i32 = 2050;

/// Furthest a projection reaches past the last historical year.
pub const MAX_PROJECTION_YEARS: i32 = 1000;

/// Parameters of one projection request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Moving-average window width; odd values center exactly.
    pub window: usize,
    /// Only smoothed values from this year on feed the anchored slope.
    pub stable_start_year: i32,
    /// Last future year to project (inclusive).
    pub horizon: i32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        ProjectionConfig {
            window: DEFAULT_WINDOW,
            stable_start_year: DEFAULT_STABLE_START_YEAR,
            horizon: DEFAULT_HORIZON,
        }
    }
}

/// Projected values for one future year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    pub year: i32,
    pub raw: f64,
    pub anchored: f64,
}

/// Everything a chart needs to draw history, smoothing and both projections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// OLS over the full history.
    pub raw_trend: RegressionModel,
    /// OLS over the stable part of the smoothed curve (or `raw_trend` when
    /// that part is too short).
    pub smoothed_trend: RegressionModel,
    /// Smoothed history, aligned with the (sorted) input.
    pub smoothed: Vec<SmoothedPoint>,
    pub anchor_year: Option<i32>,
    pub anchor_value: Option<f64>,
    /// One entry per year from `anchor_year + 1` to the horizon.
    pub points: Vec<ProjectionPoint>,
}

impl Projection {
    /// Anchored projection formula at any year. Returns `anchor_value`
    /// exactly at `anchor_year`.
    pub fn anchored_at(&self, year: i32) -> Option<f64> {
        let anchor_year = self.anchor_year?;
        let anchor_value = self.anchor_value?;
        if year == anchor_year {
            return Some(anchor_value);
        }
        Some(anchor_value + self.smoothed_trend.slope * f64::from(year - anchor_year))
    }

    /// Raw trend line at any year.
    pub fn raw_at(&self, year: i32) -> f64 {
        self.raw_trend.predict_one(f64::from(year))
    }

    /// Smoothed historical value at `year`, if that year is in the history.
    pub fn smoothed_at(&self, year: i32) -> Option<f64> {
        self.smoothed
            .iter()
            .find(|p| p.index == year)
            .and_then(|p| p.value)
    }
}

/// Project `history` forward to `config.horizon`.
///
/// `history` need not be sorted; a sorted copy is used. Non-finite values are
/// dropped. With fewer than two points both trends are flat and, if there is
/// a single point, the projections stay at its value. A horizon at or before
/// the last historical year yields no projected points; one more than
/// [`MAX_PROJECTION_YEARS`] past it is capped.
pub fn project(history: &[YearValue], config: &ProjectionConfig) -> Projection {
    let mut series: Vec<(i32, f64)> = history
        .iter()
        .filter(|p| p.value.is_finite())
        .map(|p| (p.year, p.value))
        .collect();
    if series.windows(2).any(|w| w[0].0 > w[1].0) {
        log::debug!("projection: history not sorted by year, sorting a copy");
        series.sort_by_key(|&(year, _)| year);
    }

    let years: Vec<f64> = series.iter().map(|&(y, _)| f64::from(y)).collect();
    let values: Vec<f64> = series.iter().map(|&(_, v)| v).collect();

    let raw_trend = fit(&years, &values);
    let smoothed = smooth_series(&series, config.window);

    // Edge positions average a truncated window; leave them out of the
    // stable fit along with everything before the stable start.
    let half = config.window / 2;
    let n = smoothed.len();
    let (stable_years, stable_values): (Vec<f64>, Vec<f64>) = smoothed
        .iter()
        .enumerate()
        .filter(|&(i, p)| i >= half && i + half < n && p.index >= config.stable_start_year)
        .filter_map(|(_, p)| p.value.map(|v| (f64::from(p.index), v)))
        .unzip();

    let smoothed_trend = if stable_years.len() < MIN_REGRESSION_SAMPLES {
        log::debug!(
            "projection: {} stable points from {}, using full-range trend",
            stable_years.len(),
            config.stable_start_year
        );
        raw_trend
    } else {
        fit(&stable_years, &stable_values)
    };

    let anchor_year = series.last().map(|&(year, _)| year);
    let anchor_value = anchor_year.map(|year| {
        smoothed
            .last()
            .and_then(|p| p.value)
            .unwrap_or_else(|| raw_trend.predict_one(f64::from(year)))
    });

    let mut projection = Projection {
        raw_trend,
        smoothed_trend,
        smoothed,
        anchor_year,
        anchor_value,
        points: Vec::new(),
    };

    let Some(anchor_year) = anchor_year else {
        log::debug!("projection: empty history");
        return projection;
    };
    if config.horizon <= anchor_year {
        log::debug!(
            "projection: horizon {} not after last year {}",
            config.horizon,
            anchor_year
        );
        return projection;
    }
    let max_horizon = anchor_year.saturating_add(MAX_PROJECTION_YEARS);
    let horizon = if config.horizon > max_horizon {
        log::warn!(
            "projection: horizon {} capped at {} ({} years past {})",
            config.horizon,
            max_horizon,
            MAX_PROJECTION_YEARS,
            anchor_year
        );
        max_horizon
    } else {
        config.horizon
    };

    let points: Vec<ProjectionPoint> = ((anchor_year + 1)..=horizon)
        .filter_map(|year| {
            let anchored = projection.anchored_at(year)?;
            Some(ProjectionPoint {
                year,
                raw: projection.raw_at(year),
                anchored,
            })
        })
        .collect();
    projection.points = points;

    log::info!(
        "projected {} years from {}: raw {:+.3}/decade, smoothed {:+.3}/decade",
        projection.points.len(),
        anchor_year,
        projection.raw_trend.slope_per_decade,
        projection.smoothed_trend.slope_per_decade
    );
    projection
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(start: i32, values: &[f64]) -> Vec<YearValue> {
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| YearValue {
                year: start + i as i32,
                value,
            })
            .collect()
    }

    /// A wobbly warming series, 1940-2024.
    fn warming() -> Vec<YearValue> {
        let values: Vec<f64> = (0..85)
            .map(|i| 20.0 + 0.4 * i as f64 + [3.0, -2.0, 5.0, -4.0, 1.0][i % 5])
            .collect();
        history(1940, &values)
    }

    #[test]
    fn test_anchored_projection_is_continuous() {
        for window in [1, 3, 5, 7, 9] {
            let config = ProjectionConfig {
                window,
                ..Default::default()
            };
            let p = project(&warming(), &config);
            let anchor_year = p.anchor_year.unwrap();
            assert_eq!(anchor_year, 2024);
            let real_smoothed = p.smoothed_at(anchor_year).unwrap();
            // evaluate the formula rather than the shortcut in anchored_at
            let formula = p.anchor_value.unwrap()
                + p.smoothed_trend.slope * f64::from(anchor_year - anchor_year);
            assert_eq!(formula, real_smoothed);
            assert_eq!(p.anchored_at(anchor_year), Some(real_smoothed));
        }
    }

    #[test]
    fn test_projection_years_and_formulas() {
        let p = project(&warming(), &ProjectionConfig::default());
        assert_eq!(p.points.len(), 26);
        assert_eq!(p.points[0].year, 2025);
        assert_eq!(p.points[25].year, 2050);
        let anchor = p.anchor_value.unwrap();
        for point in &p.points {
            let raw = p.raw_trend.slope * f64::from(point.year) + p.raw_trend.intercept;
            assert!((point.raw - raw).abs() < 1e-9);
            let anchored = anchor + p.smoothed_trend.slope * f64::from(point.year - 2024);
            assert!((point.anchored - anchored).abs() < 1e-9);
        }
        assert!(p.smoothed_trend.slope > 0.0);
        assert_eq!(p.smoothed.len(), 85);
    }

    #[test]
    fn test_linear_history_projects_the_same_line() {
        let values: Vec<f64> = (0..40).map(|i| 10.0 + 0.5 * i as f64).collect();
        let p = project(
            &history(1980, &values),
            &ProjectionConfig {
                window: 5,
                stable_start_year: 1991,
                horizon: 2030,
            },
        );
        assert!((p.raw_trend.slope - 0.5).abs() < 1e-9);
        assert!((p.smoothed_trend.slope - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_stable_window_too_short_falls_back_to_raw() {
        let p = project(
            &warming(),
            &ProjectionConfig {
                window: 5,
                stable_start_year: 2022,
                horizon: 2030,
            },
        );
        // only 2022 survives the edge trim (2023 and 2024 are edge positions)
        assert_eq!(p.smoothed_trend, p.raw_trend);
    }

    #[test]
    fn test_empty_history() {
        let p = project(&[], &ProjectionConfig::default());
        assert_eq!(p.raw_trend.slope, 0.0);
        assert_eq!(p.smoothed_trend.slope, 0.0);
        assert_eq!(p.anchor_year, None);
        assert!(p.points.is_empty());
        assert_eq!(p.anchored_at(2030), None);
    }

    #[test]
    fn test_single_point_is_flat() {
        let p = project(&history(2024, &[42.0]), &ProjectionConfig::default());
        assert_eq!(p.raw_trend.slope, 0.0);
        assert_eq!(p.smoothed_trend.slope, 0.0);
        assert_eq!(p.anchor_value, Some(42.0));
        assert!(p.points.iter().all(|pt| pt.raw == 42.0 && pt.anchored == 42.0));
        assert_eq!(p.points.len(), 26);
    }

    #[test]
    fn test_horizon_not_after_history() {
        let p = project(
            &warming(),
            &ProjectionConfig {
                horizon: 2024,
                ..Default::default()
            },
        );
        assert!(p.points.is_empty());
        assert_eq!(p.anchor_year, Some(2024));
    }

    #[test]
    fn test_far_horizon_is_capped() {
        let p = project(
            &warming(),
            &ProjectionConfig {
                horizon: i32::MAX,
                ..Default::default()
            },
        );
        assert_eq!(p.points.len(), MAX_PROJECTION_YEARS as usize);
        assert_eq!(p.points.last().map(|pt| pt.year), Some(2024 + MAX_PROJECTION_YEARS));
    }

    #[test]
    fn test_unsorted_history_is_sorted() {
        let mut shuffled = warming();
        shuffled.reverse();
        let a = project(&shuffled, &ProjectionConfig::default());
        let b = project(&warming(), &ProjectionConfig::default());
        assert_eq!(a, b);
    }

    #[test]
    fn test_non_finite_values_dropped() {
        let mut h = warming();
        h.push(YearValue {
            year: 2025,
            value: f64::NAN,
        });
        let p = project(&h, &ProjectionConfig::default());
        assert_eq!(p.anchor_year, Some(2024));
    }
}
