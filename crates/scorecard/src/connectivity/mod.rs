//! Connectivity monitors
//!
//! - `manual` - state pushed by the host platform
//! - `http_probe` - state measured by probing a URL

pub mod http_probe;
pub mod manual;

pub use http_probe::HttpProbeConnectivity;
pub use manual::ManualConnectivity;
