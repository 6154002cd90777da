use crate::config::Config;
use crate::grading::{
    compute_current, predict, remaining_components, Component, CurrentGrade, DropRule,
    GradeInputs, Prediction, PredictionRequest,
};
use crate::tui::theme::ThemeColors;
use std::time::Instant;

/// Rows of the entry form, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Field {
    Score(Component),
    Target,
    Curve,
    DropRule,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::Score(Component::Homework),
        Field::Score(Component::Discussion),
        Field::Score(Component::Mid1),
        Field::Score(Component::Mid2),
        Field::Score(Component::Mid3),
        Field::Score(Component::Final),
        Field::Target,
        Field::Curve,
        Field::DropRule,
    ];

    pub fn is_numeric(self) -> bool {
        !matches!(self, Field::DropRule)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    Editing,
    Help,
}

pub struct App {
    pub inputs: GradeInputs,
    pub target: f64,
    pub curve_points: f64,
    pub drop_rule: DropRule,
    pub selected: usize,
    pub input_mode: InputMode,
    pub edit_buffer: String,
    pub flash_message: Option<(String, Instant)>,
    pub should_quit: bool,
    pub colors: ThemeColors,
    pub verbose: bool,
}

impl App {
    pub fn new(config: &Config, colors: ThemeColors, verbose: bool) -> Self {
        Self {
            inputs: GradeInputs::new(),
            target: config.target,
            curve_points: config.curve_points,
            drop_rule: config.drop_rule(),
            selected: 0,
            input_mode: InputMode::Normal,
            edit_buffer: String::new(),
            flash_message: None,
            should_quit: false,
            colors,
            verbose,
        }
    }

    pub fn selected_field(&self) -> Field {
        Field::ALL[self.selected % Field::ALL.len()]
    }

    pub fn next_row(&mut self) {
        self.selected = (self.selected + 1) % Field::ALL.len();
    }

    pub fn previous_row(&mut self) {
        self.selected = if self.selected == 0 {
            Field::ALL.len() - 1
        } else {
            self.selected - 1
        };
    }

    pub fn request(&self) -> PredictionRequest {
        PredictionRequest::new(self.target)
            .with_curve(self.curve_points)
            .with_drop_rule(self.drop_rule)
    }

    pub fn current(&self) -> CurrentGrade {
        compute_current(&self.inputs, self.drop_rule)
    }

    pub fn prediction(&self) -> Prediction {
        predict(&self.inputs, &self.request())
    }

    pub fn remaining(&self) -> Vec<Component> {
        remaining_components(&self.inputs)
    }

    /// Space on a score row flips "I have this grade"; on the drop row it
    /// flips the rule.
    pub fn toggle_selected(&mut self) {
        match self.selected_field() {
            Field::Score(component) => {
                let entry = &mut self.inputs[component];
                entry.present = !entry.present;
                let msg = if entry.present {
                    format!("{} marked as received", component.label())
                } else {
                    format!("{} marked as not yet received", component.label())
                };
                self.show_flash(msg);
            }
            Field::DropRule => {
                self.drop_rule = DropRule::from(!self.drop_rule.is_enabled());
                let state = if self.drop_rule.is_enabled() { "on" } else { "off" };
                self.show_flash(format!("Drop rule {}", state));
            }
            Field::Target | Field::Curve => {}
        }
        self.log_recompute();
    }

    /// Start editing the selected numeric field, pre-filled with its value.
    pub fn start_editing(&mut self) {
        let field = self.selected_field();
        if !field.is_numeric() {
            self.toggle_selected();
            return;
        }
        self.edit_buffer = format!("{}", self.field_value(field));
        self.input_mode = InputMode::Editing;
    }

    pub fn push_edit_char(&mut self, c: char) {
        if c.is_ascii_digit() || (c == '.' && !self.edit_buffer.contains('.')) {
            self.edit_buffer.push(c);
        }
    }

    /// Parse the edit buffer and store it, clamped to the field's range.
    /// Entering a score also marks the component as received.
    pub fn confirm_editing(&mut self) {
        let field = self.selected_field();
        let input = self.edit_buffer.trim().to_string();
        self.input_mode = InputMode::Normal;
        self.edit_buffer.clear();

        let value = match input.parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => {
                self.show_flash(format!("Invalid number: '{}'", input));
                return;
            }
        };

        match field {
            Field::Score(component) => {
                self.inputs[component].score = clamp_percent(value);
                self.inputs[component].present = true;
            }
            Field::Target => self.target = clamp_percent(value),
            Field::Curve => self.curve_points = value.max(0.0),
            Field::DropRule => {}
        }
        self.log_recompute();
    }

    pub fn cancel_editing(&mut self) {
        self.input_mode = InputMode::Normal;
        self.edit_buffer.clear();
    }

    /// Forget every entered grade; target, curve and drop rule stay.
    pub fn clear_entries(&mut self) {
        self.inputs = GradeInputs::new();
        self.show_flash("Cleared all grades".to_string());
        self.log_recompute();
    }

    pub fn field_value(&self, field: Field) -> f64 {
        match field {
            Field::Score(component) => self.inputs[component].score,
            Field::Target => self.target,
            Field::Curve => self.curve_points,
            Field::DropRule => 0.0,
        }
    }

    pub fn show_flash(&mut self, msg: String) {
        self.flash_message = Some((msg, Instant::now()));
    }

    pub fn update_flash(&mut self) {
        if let Some((_, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= 3 {
                self.flash_message = None;
            }
        }
    }

    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    pub fn dismiss_help(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    fn log_recompute(&self) {
        if self.verbose {
            let current = self.current();
            crate::buffered_eprintln!(
                "Recomputed: earned={:.4} included_weight={:.4} dropped={:?} outcome={:?}",
                current.earned_points,
                current.included_weight,
                current.dropped,
                self.prediction().outcome
            );
        }
    }
}

fn clamp_percent(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::PredictionResult;

    fn app() -> App {
        App::new(&Config::default(), ThemeColors::dark(), false)
    }

    fn select(app: &mut App, field: Field) {
        app.selected = Field::ALL.iter().position(|f| *f == field).unwrap();
    }

    fn enter(app: &mut App, field: Field, text: &str) {
        select(app, field);
        app.start_editing();
        app.edit_buffer.clear();
        for c in text.chars() {
            app.push_edit_char(c);
        }
        app.confirm_editing();
    }

    #[test]
    fn test_starts_from_config_defaults() {
        let app = app();
        assert_eq!(app.target, 80.0);
        assert_eq!(app.curve_points, 0.0);
        assert_eq!(app.drop_rule, DropRule::Disabled);
        assert!(app.current().current_average.is_none());
    }

    #[test]
    fn test_navigation_wraps() {
        let mut app = app();
        app.previous_row();
        assert_eq!(app.selected_field(), Field::DropRule);
        app.next_row();
        assert_eq!(app.selected_field(), Field::Score(Component::Homework));
    }

    #[test]
    fn test_entering_score_marks_present() {
        let mut app = app();
        enter(&mut app, Field::Score(Component::Mid1), "80");
        assert!(app.inputs.is_present(Component::Mid1));
        assert_eq!(app.inputs[Component::Mid1].score, 80.0);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_scores_are_clamped() {
        let mut app = app();
        enter(&mut app, Field::Score(Component::Final), "140");
        assert_eq!(app.inputs[Component::Final].score, 100.0);
        enter(&mut app, Field::Target, "250");
        assert_eq!(app.target, 100.0);
    }

    #[test]
    fn test_edit_buffer_rejects_non_numeric() {
        let mut app = app();
        app.push_edit_char('7');
        app.push_edit_char('a');
        app.push_edit_char('.');
        app.push_edit_char('.');
        app.push_edit_char('5');
        assert_eq!(app.edit_buffer, "7.5");
    }

    #[test]
    fn test_empty_edit_is_rejected() {
        let mut app = app();
        enter(&mut app, Field::Score(Component::Homework), "");
        assert!(!app.inputs.is_present(Component::Homework));
        assert!(app.flash_message.unwrap().0.starts_with("Invalid number"));
    }

    #[test]
    fn test_toggle_present_and_drop_rule() {
        let mut app = app();
        select(&mut app, Field::Score(Component::Homework));
        app.toggle_selected();
        assert!(app.inputs.is_present(Component::Homework));
        app.toggle_selected();
        assert!(!app.inputs.is_present(Component::Homework));

        select(&mut app, Field::DropRule);
        app.toggle_selected();
        assert!(app.drop_rule.is_enabled());
    }

    #[test]
    fn test_enter_on_drop_row_toggles() {
        let mut app = app();
        select(&mut app, Field::DropRule);
        app.start_editing();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.drop_rule.is_enabled());
    }

    #[test]
    fn test_form_drives_prediction() {
        let mut app = app();
        enter(&mut app, Field::Score(Component::Homework), "100");
        enter(&mut app, Field::Score(Component::Discussion), "100");
        enter(&mut app, Field::Score(Component::Mid1), "80");
        enter(&mut app, Field::Score(Component::Mid2), "80");
        enter(&mut app, Field::Target, "98");
        enter(&mut app, Field::Curve, "10");

        match app.prediction().outcome {
            PredictionResult::RequiredAverage(value) => assert!((value - 91.111).abs() < 1e-3),
            other => panic!("expected RequiredAverage, got {:?}", other),
        }
        assert_eq!(app.remaining(), vec![Component::Mid3, Component::Final]);
    }

    #[test]
    fn test_clear_entries_keeps_settings() {
        let mut app = app();
        enter(&mut app, Field::Score(Component::Mid2), "75");
        enter(&mut app, Field::Target, "90");
        app.clear_entries();
        assert!(!app.inputs.is_present(Component::Mid2));
        assert_eq!(app.target, 90.0);
    }
}
