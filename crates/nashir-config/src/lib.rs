// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Nashir publishing platform.
//!
//! Layered TOML configuration via Figment with environment variable
//! overrides, plus startup validation of pipeline thresholds.

pub mod loader;
pub mod model;
pub mod validation;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::NashirConfig;
pub use validation::validate;
