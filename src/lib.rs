//! engine-rul: Remaining Useful Life prediction for aircraft engines.
//!
//! Serves a single pre-trained regression model over HTTP. Each request
//! carries raw sensor readings; the service shapes them into the model's
//! feature order, predicts the remaining cycles and maps the estimate to a
//! maintenance status band.

pub mod config;
pub mod inference;
pub mod server;
