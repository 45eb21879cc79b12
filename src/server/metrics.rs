//! Prometheus metrics for the prediction endpoint.

use prometheus::{Encoder, Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder};

use crate::inference::status::RulStatus;

/// Counters and histograms owned by the application state.
pub struct Metrics {
    registry: Registry,
    predictions: IntCounterVec,
    errors: IntCounterVec,
    predicted_cycles: Histogram,
}

impl Metrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let predictions = IntCounterVec::new(
            Opts::new("rul_predictions_total", "Successful predictions by status band"),
            &["status"],
        )?;
        let errors = IntCounterVec::new(
            Opts::new("rul_prediction_errors_total", "Failed prediction requests by kind"),
            &["kind"],
        )?;
        let predicted_cycles = Histogram::with_opts(
            HistogramOpts::new("rul_predicted_cycles", "Distribution of predicted RUL")
                .buckets(vec![10.0, 20.0, 30.0, 50.0, 75.0, 100.0, 150.0, 200.0, 300.0]),
        )?;

        registry.register(Box::new(predictions.clone()))?;
        registry.register(Box::new(errors.clone()))?;
        registry.register(Box::new(predicted_cycles.clone()))?;

        Ok(Self {
            registry,
            predictions,
            errors,
            predicted_cycles,
        })
    }

    pub fn record_prediction(&self, status: RulStatus, rul: f64) {
        self.predictions.with_label_values(&[status.as_str()]).inc();
        self.predicted_cycles.observe(rul);
    }

    pub fn record_error(&self, kind: &str) {
        self.errors.with_label_values(&[kind]).inc();
    }

    /// Render all metrics in the Prometheus text exposition format.
    pub fn render(&self) -> prometheus::Result<String> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
