use super::component::GradeInputs;
use super::engine::PredictionRequest;

/// Check entered scores against the 0-100 range.
/// Returns all validation errors at once (not just the first).
///
/// The engine accepts any value; this is the policy front ends apply before
/// handing inputs over.
pub fn validate_inputs(inputs: &GradeInputs) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for (component, entry) in inputs.iter() {
        if entry.present {
            if let Some(problem) = percent_problem(entry.score) {
                errors.push(format!("{}: {} ({})", component.key(), problem, entry.score));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check the target and curve of a prediction request.
pub fn validate_request(request: &PredictionRequest) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(problem) = percent_problem(request.target) {
        errors.push(format!("target: {} ({})", problem, request.target));
    }
    if let Some(problem) = curve_problem(request.curve_points) {
        errors.push(format!("curve: {} ({})", problem, request.curve_points));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub(crate) fn percent_problem(value: f64) -> Option<&'static str> {
    if !value.is_finite() {
        Some("must be a finite number")
    } else if !(0.0..=100.0).contains(&value) {
        Some("must be between 0 and 100")
    } else {
        None
    }
}

pub(crate) fn curve_problem(value: f64) -> Option<&'static str> {
    if !value.is_finite() {
        Some("must be a finite number")
    } else if value < 0.0 {
        Some("must be non-negative")
    } else {
        None
    }
}
