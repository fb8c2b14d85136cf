//! HTTP API handlers for owr-monitor
//!
//! All JSON endpoints are read-only views over storage.

pub mod devices;
pub mod health;
pub mod recommendations;
pub mod reports;
pub mod ui;

pub use devices::device_routes;
pub use health::health_routes;
pub use recommendations::recommendation_routes;
pub use reports::report_routes;
pub use ui::serve_ui;
