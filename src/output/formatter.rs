use std::io::IsTerminal;
use owo_colors::OwoColorize;
use serde::Serialize;
use terminal_size::{Width, terminal_size};

use crate::grading::{
    Component, CurrentGrade, GradeInputs, Prediction, PredictionRequest, PredictionResult,
};

/// Approximate letter-grade cutoffs (lower bounds, percent).
/// Final cutoffs may be set lower, never higher.
pub const CUTOFFS: [(f64, &str); 4] = [(80.0, "A-"), (70.0, "B-"), (50.0, "C-"), (40.0, "D-")];

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a percentage with two decimals: "85.45%"
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

/// Format a weight fraction as a whole percentage: 0.55 -> "55%"
pub fn format_weight(weight: f64) -> String {
    format!("{:.0}%", weight * 100.0)
}

/// Letter grade an average would earn under the approximate cutoffs.
pub fn approximate_letter(average: f64) -> &'static str {
    CUTOFFS
        .iter()
        .find(|(min, _)| average >= *min)
        .map(|(_, letter)| *letter)
        .unwrap_or("F")
}

/// Final standing once nothing is left to grade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Standing {
    Met { final_grade: f64 },
    Below { final_grade: f64 },
}

/// Compare the finished grade (earned points plus curve) against the target.
/// A dropped midterm leaves its weight unearned, same as in `predict`.
/// `None` when nothing has been entered.
pub fn final_standing(current: &CurrentGrade, request: &PredictionRequest) -> Option<Standing> {
    current.current_average?;
    let final_grade = current.earned_points + request.curve_points;
    if final_grade >= request.target {
        Some(Standing::Met { final_grade })
    } else {
        Some(Standing::Below { final_grade })
    }
}

fn divider() -> String {
    let width = terminal_size()
        .map(|(Width(w), _)| w as usize)
        .unwrap_or(40)
        .min(60);
    "-".repeat(width)
}

fn paint_average(text: &str, average: f64, use_colors: bool) -> String {
    if !use_colors {
        return text.to_string();
    }
    if average >= 80.0 {
        text.green().bold().to_string()
    } else if average >= 50.0 {
        text.yellow().bold().to_string()
    } else {
        text.red().bold().to_string()
    }
}

fn paint_required(required: f64, use_colors: bool) -> String {
    let text = format_percent(required);
    if !use_colors {
        return text;
    }
    if required > 100.0 {
        text.red().bold().to_string()
    } else if required > 90.0 {
        text.yellow().bold().to_string()
    } else {
        text.green().bold().to_string()
    }
}

fn heading(text: &str, use_colors: bool) -> String {
    if use_colors {
        text.bold().cyan().to_string()
    } else {
        text.to_string()
    }
}

/// Current progress block: points earned, completed share, average, drop notice.
pub fn format_current(current: &CurrentGrade, use_colors: bool) -> String {
    let mut lines = vec![heading("Current Progress", use_colors)];

    let Some(average) = current.current_average else {
        lines.push("No grades entered yet. Enter at least one grade to see your progress.".to_string());
        return lines.join("\n");
    };

    lines.push(format!("  Points earned:   {}", format_percent(current.earned_points)));
    lines.push(format!(
        "  Completed:       {} of total grade",
        format_weight(current.included_weight)
    ));
    let average_text = format!("{} ({})", format_percent(average), approximate_letter(average));
    lines.push(format!("  Current average: {}", paint_average(&average_text, average, use_colors)));

    if let Some(dropped) = current.dropped {
        let notice = format!(
            "  {} dropped (lower than {}); it does not count toward your grade.",
            dropped.label(),
            Component::Mid2.label()
        );
        lines.push(if use_colors { notice.dimmed().to_string() } else { notice });
    }

    lines.join("\n")
}

fn format_remaining(remaining: &[Component]) -> String {
    remaining
        .iter()
        .map(|c| format!("{} ({})", c.label(), format_weight(c.weight())))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Prediction block: what is needed on the remaining work, or the final standing.
pub fn format_prediction(
    prediction: &Prediction,
    request: &PredictionRequest,
    remaining: &[Component],
    use_colors: bool,
) -> String {
    let mut lines = vec![heading("Prediction", use_colors)];
    let target = format_percent(request.target);

    if request.curve_points != 0.0 {
        lines.push(format!("  Curve: +{} points", request.curve_points));
    }

    match prediction.outcome {
        PredictionResult::NoRemainingWork => {
            lines.push("  You have entered all grades. Your final grade is calculated.".to_string());
            match final_standing(&prediction.current, request) {
                Some(Standing::Met { final_grade }) => {
                    let msg = format!(
                        "  Your final grade of {} meets or exceeds your target of {}.",
                        format_percent(final_grade),
                        target
                    );
                    lines.push(if use_colors { msg.green().to_string() } else { msg });
                }
                Some(Standing::Below { final_grade }) => {
                    let msg = format!(
                        "  Your final grade of {} is below your target of {}.",
                        format_percent(final_grade),
                        target
                    );
                    lines.push(if use_colors { msg.yellow().to_string() } else { msg });
                }
                None => {}
            }
            return lines.join("\n");
        }
        PredictionResult::RequiredAverage(required) | PredictionResult::Impossible(required) => {
            lines.push(format!(
                "  To reach {} you need an average of {} on the remaining work.",
                target,
                paint_required(required, use_colors)
            ));
        }
        PredictionResult::AlreadyMet => {}
    }

    if !remaining.is_empty() {
        lines.push(format!(
            "  Remaining work worth {} of the grade: {}",
            format_weight(prediction.remaining_weight),
            format_remaining(remaining)
        ));
    }

    let banner = match prediction.outcome {
        PredictionResult::Impossible(required) => {
            let msg = format!(
                "  An average of {} is impossible (max is 100%). You may need to adjust your target.",
                format_percent(required)
            );
            if use_colors { msg.red().to_string() } else { msg }
        }
        PredictionResult::AlreadyMet => {
            let msg = format!(
                "  You've already met or exceeded your target of {} based on current entries!",
                target
            );
            if use_colors { msg.green().to_string() } else { msg }
        }
        _ => "  This average across the remaining work is needed to reach your goal.".to_string(),
    };
    lines.push(banner);

    lines.join("\n")
}

/// Approximate cutoff table.
pub fn format_cutoffs(use_colors: bool) -> String {
    let mut lines = vec![heading("Approximate Grade Cutoffs", use_colors)];
    for (min, letter) in CUTOFFS {
        lines.push(format!("  {:<3} {:.0}%", letter, min));
    }
    lines.push(format!("  {:<3} below {:.0}%", "F", CUTOFFS[CUTOFFS.len() - 1].0));
    lines.join("\n")
}

/// Full text report: progress, then prediction when requested, then cutoffs.
pub fn format_report(
    current: &CurrentGrade,
    prediction: Option<(&Prediction, &PredictionRequest)>,
    remaining: &[Component],
    use_colors: bool,
) -> String {
    let mut sections = vec![format_current(current, use_colors)];
    if let Some((prediction, request)) = prediction {
        sections.push(format_prediction(prediction, request, remaining, use_colors));
    }
    sections.push(format_cutoffs(use_colors));
    sections.join(&format!("\n{}\n", divider()))
}

#[derive(Serialize)]
struct EntryReport {
    component: Component,
    weight: f64,
    score: Option<f64>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    entries: Vec<EntryReport>,
    current: &'a CurrentGrade,
    remaining: &'a [Component],
    #[serde(skip_serializing_if = "Option::is_none")]
    prediction: Option<&'a Prediction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    standing: Option<Standing>,
}

/// Machine-readable report for scripting.
pub fn format_json(
    inputs: &GradeInputs,
    current: &CurrentGrade,
    prediction: Option<(&Prediction, &PredictionRequest)>,
    remaining: &[Component],
) -> anyhow::Result<String> {
    let entries = inputs
        .iter()
        .map(|(component, entry)| EntryReport {
            component,
            weight: component.weight(),
            score: entry.present.then_some(entry.score),
        })
        .collect();

    let standing = prediction.and_then(|(p, request)| match p.outcome {
        PredictionResult::NoRemainingWork => final_standing(&p.current, request),
        _ => None,
    });

    let report = JsonReport {
        entries,
        current,
        remaining,
        prediction: prediction.map(|(p, _)| p),
        standing,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::{compute_current, predict, remaining_components, DropRule};

    fn sample_inputs() -> GradeInputs {
        GradeInputs::new()
            .with(Component::Homework, 100.0)
            .with(Component::Discussion, 100.0)
            .with(Component::Mid1, 80.0)
            .with(Component::Mid2, 80.0)
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(85.454545), "85.45%");
        assert_eq!(format_percent(0.0), "0.00%");
    }

    #[test]
    fn test_format_weight() {
        assert_eq!(format_weight(0.55), "55%");
        assert_eq!(format_weight(0.45), "45%");
    }

    #[test]
    fn test_approximate_letter_bands() {
        assert_eq!(approximate_letter(95.0), "A-");
        assert_eq!(approximate_letter(80.0), "A-");
        assert_eq!(approximate_letter(79.99), "B-");
        assert_eq!(approximate_letter(55.0), "C-");
        assert_eq!(approximate_letter(40.0), "D-");
        assert_eq!(approximate_letter(12.0), "F");
    }

    #[test]
    fn test_format_current_plain() {
        let current = compute_current(&sample_inputs(), DropRule::Disabled);
        let text = format_current(&current, false);
        assert!(text.contains("Points earned:   47.00%"));
        assert!(text.contains("Completed:       55% of total grade"));
        assert!(text.contains("85.45% (A-)"));
        assert!(!text.contains("dropped"));
    }

    #[test]
    fn test_format_current_empty() {
        let current = compute_current(&GradeInputs::new(), DropRule::Disabled);
        let text = format_current(&current, false);
        assert!(text.contains("No grades entered yet"));
    }

    #[test]
    fn test_format_current_mentions_drop() {
        let inputs = sample_inputs()
            .with(Component::Mid1, 60.0)
            .with(Component::Mid3, 90.0);
        let current = compute_current(&inputs, DropRule::DropFirstMidtermIfLower);
        let text = format_current(&current, false);
        assert!(text.contains("Midterm 1 dropped (lower than Midterm 2)"));
    }

    #[test]
    fn test_format_prediction_required() {
        let inputs = sample_inputs();
        let request = PredictionRequest::new(98.0).with_curve(10.0);
        let prediction = predict(&inputs, &request);
        let text = format_prediction(&prediction, &request, &remaining_components(&inputs), false);
        assert!(text.contains("Curve: +10 points"));
        assert!(text.contains("need an average of 91.11%"));
        assert!(text.contains("Remaining work worth 45% of the grade: Midterm 3 (20%), Final Exam (25%)"));
    }

    #[test]
    fn test_format_prediction_impossible() {
        let inputs = sample_inputs();
        let request = PredictionRequest::new(100.0).with_curve(5.0);
        let prediction = predict(&inputs, &request);
        let text = format_prediction(&prediction, &request, &remaining_components(&inputs), false);
        assert!(text.contains("106.67%"));
        assert!(text.contains("impossible (max is 100%)"));
    }

    #[test]
    fn test_format_prediction_already_met() {
        let inputs = sample_inputs();
        let request = PredictionRequest::new(30.0);
        let prediction = predict(&inputs, &request);
        let text = format_prediction(&prediction, &request, &remaining_components(&inputs), false);
        assert!(text.contains("already met or exceeded your target of 30.00%"));
        assert!(!text.contains("need an average"));
    }

    #[test]
    fn test_final_standing_uses_curve() {
        let current = CurrentGrade {
            earned_points: 78.0,
            included_weight: 1.0,
            current_average: Some(78.0),
            dropped: None,
        };
        let request = PredictionRequest::new(80.0);
        assert_eq!(final_standing(&current, &request), Some(Standing::Below { final_grade: 78.0 }));

        let curved = request.with_curve(2.0);
        assert_eq!(final_standing(&current, &curved), Some(Standing::Met { final_grade: 80.0 }));
    }

    #[test]
    fn test_final_standing_agrees_with_prediction_after_drop() {
        let request = PredictionRequest::new(80.0).with_drop_rule(DropRule::DropFirstMidtermIfLower);
        let before_final = sample_inputs()
            .with(Component::Mid1, 70.0)
            .with(Component::Mid3, 90.0);
        let prediction = predict(&before_final, &request);
        assert!(matches!(prediction.outcome, PredictionResult::Impossible(_)));

        // A perfect final still cannot reach 80 with Midterm 1's weight dropped
        let finished = before_final.with(Component::Final, 100.0);
        let prediction = predict(&finished, &request);
        assert_eq!(prediction.outcome, PredictionResult::NoRemainingWork);
        match final_standing(&prediction.current, &request) {
            Some(Standing::Below { final_grade }) => assert!((final_grade - 74.0).abs() < 1e-9),
            other => panic!("expected Below, got {:?}", other),
        }

        let text = format_prediction(&prediction, &request, &[], false);
        assert!(text.contains("Your final grade of 74.00% is below your target of 80.00%"));
    }

    #[test]
    fn test_final_standing_none_without_entries() {
        let current = compute_current(&GradeInputs::new(), DropRule::Disabled);
        assert_eq!(final_standing(&current, &PredictionRequest::new(0.0)), None);
    }

    #[test]
    fn test_format_prediction_all_entered() {
        let inputs = sample_inputs()
            .with(Component::Mid3, 70.0)
            .with(Component::Final, 70.0);
        let request = PredictionRequest::new(95.0);
        let prediction = predict(&inputs, &request);
        let text = format_prediction(&prediction, &request, &[], false);
        assert!(text.contains("You have entered all grades"));
        assert!(text.contains("is below your target of 95.00%"));
    }

    #[test]
    fn test_format_cutoffs() {
        let text = format_cutoffs(false);
        assert!(text.contains("A-  80%"));
        assert!(text.contains("F   below 40%"));
    }

    #[test]
    fn test_format_json_shape() {
        let inputs = sample_inputs();
        let request = PredictionRequest::new(98.0).with_curve(10.0);
        let prediction = predict(&inputs, &request);
        let remaining = remaining_components(&inputs);
        let json = format_json(&inputs, &prediction.current, Some((&prediction, &request)), &remaining)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["entries"].as_array().unwrap().len(), 6);
        assert_eq!(value["entries"][4]["component"], "mid3");
        assert!(value["entries"][4]["score"].is_null());
        assert_eq!(value["remaining"][1], "final");
        assert_eq!(value["prediction"]["outcome"]["kind"], "required_average");
        assert!(value["prediction"]["outcome"]["required_average"].as_f64().is_some());
        assert!(value.get("standing").is_none());
    }

    #[test]
    fn test_format_json_without_prediction() {
        let inputs = GradeInputs::new();
        let current = compute_current(&inputs, DropRule::Disabled);
        let json = format_json(&inputs, &current, None, &remaining_components(&inputs)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["current"]["current_average"].is_null());
        assert!(value.get("prediction").is_none());
    }
}
