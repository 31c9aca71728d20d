//! Pure statistics over climate time series.
//!
//! Every function here is a stateless transform of its arguments: nothing is
//! cached and nothing panics on short or empty input. Insufficient data comes
//! back as a documented degenerate value (a flat regression line, an empty
//! density curve, `None`), so chart code always has something safe to draw.
//!
//! Non-finite inputs (NaN, +/-inf) are treated as missing values.

pub mod density;
pub mod percentile;
pub mod regression;
pub mod smoothing;

pub use density::{epanechnikov_kde, gaussian_kde, DensityPoint, GaussianKdeOptions};
pub use percentile::{percentile, percentile_opt, percentiles, EMPTY_PERCENTILE};
pub use regression::{fit, RegressionModel, MIN_REGRESSION_SAMPLES};
pub use smoothing::{moving_average, smooth_series, SmoothedPoint};
