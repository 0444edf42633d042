//! Future-month demand: projection, transition windows and smoothing.

mod projection;
mod smoothing;
mod window;

pub use projection::{project, BaselineRow};
pub use smoothing::{centered_rolling_mean, smooth_forecast};
pub use window::{enforce_windows, TransitionWindow};
