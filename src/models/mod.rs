//! Forecasting model fitters.
//!
//! All fitters share one contract: fit on the usable (non-zero) weekly
//! values and produce point estimates with interval bounds for the
//! requested horizon. Failure is signalled through
//! [`ForecastError::ModelFit`](crate::error::ForecastError) and recovered
//! by the selector's fallback chain.

mod autoregressive;
mod baseline;
mod seasonal;

pub use autoregressive::AutoRegressive;
pub use baseline::LinearTrend;
pub use seasonal::{SeasonalAutoRegressive, SeasonalDecomposition};

use crate::core::IntervalForecast;
use crate::error::Result;

/// Common interface for all forecasting model fitters.
///
/// This trait is object-safe and can be used with `Box<dyn ModelFitter>`.
pub trait ModelFitter {
    /// Fit on the series values and forecast `horizon` steps ahead.
    ///
    /// Implementations clamp all returned values to be non-negative.
    fn fit(&self, values: &[f64], horizon: usize) -> Result<IntervalForecast>;

    /// Get the model name.
    fn name(&self) -> &'static str;
}

/// Type alias for boxed fitter trait objects.
pub type BoxedFitter = Box<dyn ModelFitter>;
