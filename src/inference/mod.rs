//! RUL inference.
//!
//! - [`features`]: Sensor map → fixed-order feature row
//! - [`model`]: Regressor trait, tree ensemble and linear models
//! - [`model_loader`]: JSON model artifact loading and validation
//! - [`status`]: RUL → maintenance status band

pub mod features;
pub mod model;
pub mod model_loader;
pub mod status;
