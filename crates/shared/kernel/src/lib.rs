//! Kernel utilities shared across slices.
//! Keep this crate lightweight; it provides the configuration model, the
//! layered config loader, and the API state shared by feature routers.
//!
//! ## Config loading
//! ```rust,ignore
//! use trailhub_kernel::config::{AppConfig, load_config};
//! let cfg: AppConfig = load_config(Some("server"))?;
//! ```

pub mod config;
pub mod server;
