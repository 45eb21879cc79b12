//! Maps a numeric RUL to a maintenance status band.

use std::fmt;

use crate::config::ThresholdConfig;

/// Coarse maintenance status derived from predicted RUL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RulStatus {
    Urgent,
    Warning,
    Normal,
}

impl RulStatus {
    /// Classify a RUL value. Both band bounds are inclusive.
    pub fn classify(rul: f64, thresholds: &ThresholdConfig) -> Self {
        if rul <= thresholds.urgent_max {
            RulStatus::Urgent
        } else if rul <= thresholds.warning_max {
            RulStatus::Warning
        } else {
            RulStatus::Normal
        }
    }

    /// Human-facing status text returned to clients.
    pub fn label(self) -> &'static str {
        match self {
            // Wire string kept as-is; dashboards match on it.
            RulStatus::Urgent => "URGENT: Maintainance Required",
            RulStatus::Warning => "WARNING: Schedule Inspection",
            RulStatus::Normal => "Normal",
        }
    }

    /// Color hint for UIs.
    pub fn color_code(self) -> &'static str {
        match self {
            RulStatus::Urgent => "red",
            RulStatus::Warning => "orange",
            RulStatus::Normal => "green",
        }
    }

    /// Metric label.
    pub fn as_str(self) -> &'static str {
        match self {
            RulStatus::Urgent => "urgent",
            RulStatus::Warning => "warning",
            RulStatus::Normal => "normal",
        }
    }
}

impl fmt::Display for RulStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A prediction together with its status band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assessment {
    pub predicted_rul: f64,
    pub status: RulStatus,
}

impl Assessment {
    pub fn new(predicted_rul: f64, thresholds: &ThresholdConfig) -> Self {
        Self {
            predicted_rul,
            status: RulStatus::classify(predicted_rul, thresholds),
        }
    }

    pub fn message(&self) -> String {
        format!("Engine has approx {:.0} cycles remaining.", self.predicted_rul)
    }
}
