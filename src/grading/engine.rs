use serde::Serialize;

use super::component::{Component, DropRule, GradeInputs};

/// Remaining weight at or below this is treated as "nothing left to grade".
pub const REMAINING_WEIGHT_EPSILON: f64 = 1e-6;

/// Running grade over whichever components have been entered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurrentGrade {
    /// Sum of `score * weight` over counted components (percent of the whole course).
    pub earned_points: f64,
    /// Sum of weights of counted components, in [0, 1].
    pub included_weight: f64,
    /// `earned_points / included_weight`; `None` when nothing is counted yet.
    pub current_average: Option<f64>,
    /// Component excluded by the drop rule, if it fired.
    pub dropped: Option<Component>,
}

/// Target, curve and drop rule for a prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionRequest {
    pub target: f64,
    /// Flat points added to the earned total (0-100 scale).
    pub curve_points: f64,
    pub drop_rule: DropRule,
}

impl PredictionRequest {
    pub fn new(target: f64) -> Self {
        Self {
            target,
            curve_points: 0.0,
            drop_rule: DropRule::Disabled,
        }
    }

    pub fn with_curve(mut self, curve_points: f64) -> Self {
        self.curve_points = curve_points;
        self
    }

    pub fn with_drop_rule(mut self, drop_rule: DropRule) -> Self {
        self.drop_rule = drop_rule;
        self
    }
}

/// What it takes to hit the target on the work that is left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "required_average", rename_all = "snake_case")]
pub enum PredictionResult {
    /// Average needed across the remaining components.
    RequiredAverage(f64),
    /// Target reached even with zero on everything left.
    AlreadyMet,
    /// Would need more than 100% on average; carries the value anyway.
    Impossible(f64),
    /// Every gradable component has been entered (or dropped).
    NoRemainingWork,
}

/// Prediction outcome with the intermediate values used to reach it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub current: CurrentGrade,
    pub remaining_weight: f64,
    pub points_needed: f64,
    pub adjusted_points_needed: f64,
    pub outcome: PredictionResult,
}

pub fn compute_current(inputs: &GradeInputs, drop_rule: DropRule) -> CurrentGrade {
    let mut earned_points = 0.0;
    let mut included_weight = 0.0;

    for (component, entry) in inputs.iter() {
        if entry.present {
            earned_points += entry.score * component.weight();
            included_weight += component.weight();
        }
    }

    let dropped = dropped_component(inputs, drop_rule);
    if let Some(component) = dropped {
        earned_points -= inputs[component].score * component.weight();
        included_weight -= component.weight();
    }

    let current_average = if included_weight > 0.0 {
        Some(earned_points / included_weight)
    } else {
        None
    };

    CurrentGrade {
        earned_points,
        included_weight,
        current_average,
        dropped,
    }
}

/// Midterm 1 is dropped only when the rule is on, all three midterms are in,
/// and it scored strictly below midterm 2.
fn dropped_component(inputs: &GradeInputs, drop_rule: DropRule) -> Option<Component> {
    if !drop_rule.is_enabled() {
        return None;
    }
    let all_midterms = [Component::Mid1, Component::Mid2, Component::Mid3]
        .iter()
        .all(|&c| inputs.is_present(c));
    if all_midterms && inputs[Component::Mid1].score < inputs[Component::Mid2].score {
        Some(Component::Mid1)
    } else {
        None
    }
}

pub fn predict(inputs: &GradeInputs, request: &PredictionRequest) -> Prediction {
    let current = compute_current(inputs, request.drop_rule);

    let max_possible_weight = match current.dropped {
        Some(component) => 1.0 - component.weight(),
        None => 1.0,
    };
    let remaining_weight = max_possible_weight - current.included_weight;
    let points_needed = request.target - current.earned_points;
    let adjusted_points_needed = points_needed - request.curve_points;

    let outcome = if remaining_weight <= REMAINING_WEIGHT_EPSILON {
        PredictionResult::NoRemainingWork
    } else {
        let required = adjusted_points_needed / remaining_weight;
        if required > 100.0 {
            PredictionResult::Impossible(required)
        } else if adjusted_points_needed <= 0.0 {
            PredictionResult::AlreadyMet
        } else {
            PredictionResult::RequiredAverage(required)
        }
    };

    Prediction {
        current,
        remaining_weight: remaining_weight.max(0.0),
        points_needed,
        adjusted_points_needed,
        outcome,
    }
}

pub fn predict_required_average(
    inputs: &GradeInputs,
    request: &PredictionRequest,
) -> PredictionResult {
    predict(inputs, request).outcome
}

/// Components not yet entered, in canonical order. A dropped midterm was
/// entered, so it never shows up here.
pub fn remaining_components(inputs: &GradeInputs) -> Vec<Component> {
    inputs
        .iter()
        .filter(|(_, entry)| !entry.present)
        .map(|(component, _)| component)
        .collect()
}
