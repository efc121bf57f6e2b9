//! Analytics module: wholesaler dashboard figures and daily rollups.

pub mod rollup;
pub mod stats;
pub mod window;

pub use rollup::{DailyRollup, ROLLUP_HISTORY_DAYS};
pub use stats::DashboardStats;
pub use window::{MonthWindow, day_bounds};
