use serde::{Deserialize, Serialize};

use crate::grading::{DropRule, PredictionRequest};
use crate::tui::Theme;

fn default_target() -> f64 {
    80.0
}

/// User preferences. Grades themselves are never stored.
///
/// Example YAML:
/// ```yaml
/// target: 80
/// curve_points: 0
/// drop_lowest_midterm: false
/// theme: auto
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Default target overall grade, percent (default: 80)
    #[serde(default = "default_target")]
    pub target: f64,

    /// Flat points added before predicting (default: 0)
    #[serde(default)]
    pub curve_points: f64,

    /// Whether midterm 1 may be dropped when below midterm 2 (default: false)
    #[serde(default)]
    pub drop_lowest_midterm: bool,

    /// TUI color theme (default: auto)
    #[serde(default)]
    pub theme: Theme,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target: default_target(),
            curve_points: 0.0,
            drop_lowest_midterm: false,
            theme: Theme::Auto,
        }
    }
}

impl Config {
    pub fn drop_rule(&self) -> DropRule {
        DropRule::from(self.drop_lowest_midterm)
    }

    /// Prediction request built from the configured defaults.
    pub fn prediction_request(&self) -> PredictionRequest {
        PredictionRequest::new(self.target)
            .with_curve(self.curve_points)
            .with_drop_rule(self.drop_rule())
    }
}
