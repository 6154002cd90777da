use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the six gradable items of the course.
///
/// The set is closed: weights are fixed and sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    Homework,
    Discussion,
    Mid1,
    Mid2,
    Mid3,
    Final,
}

impl Component {
    /// All components in canonical (display) order.
    pub const ALL: [Component; 6] = [
        Component::Homework,
        Component::Discussion,
        Component::Mid1,
        Component::Mid2,
        Component::Mid3,
        Component::Final,
    ];

    /// Fraction of the overall grade this component is worth.
    pub fn weight(self) -> f64 {
        match self {
            Component::Homework => 0.05,
            Component::Discussion => 0.10,
            Component::Mid1 | Component::Mid2 | Component::Mid3 => 0.20,
            Component::Final => 0.25,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Component::Homework => "Homework",
            Component::Discussion => "Discussion",
            Component::Mid1 => "Midterm 1",
            Component::Mid2 => "Midterm 2",
            Component::Mid3 => "Midterm 3",
            Component::Final => "Final Exam",
        }
    }

    /// Stable lowercase key used in flags, YAML and JSON.
    pub fn key(self) -> &'static str {
        match self {
            Component::Homework => "homework",
            Component::Discussion => "discussion",
            Component::Mid1 => "mid1",
            Component::Mid2 => "mid2",
            Component::Mid3 => "mid3",
            Component::Final => "final",
        }
    }

    fn index(self) -> usize {
        match self {
            Component::Homework => 0,
            Component::Discussion => 1,
            Component::Mid1 => 2,
            Component::Mid2 => 3,
            Component::Mid3 => 4,
            Component::Final => 5,
        }
    }
}

/// A single component's entry: the score and whether it has been received.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
pub struct ComponentInput {
    pub score: f64,
    pub present: bool,
}

impl ComponentInput {
    pub fn entered(score: f64) -> Self {
        Self {
            score,
            present: true,
        }
    }

    pub fn missing() -> Self {
        Self::default()
    }
}

impl From<Option<f64>> for ComponentInput {
    fn from(score: Option<f64>) -> Self {
        score.map_or_else(Self::missing, Self::entered)
    }
}

/// Entries for every component. Absent grades are `present = false`,
/// never omitted.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GradeInputs {
    entries: [ComponentInput; 6],
}

impl GradeInputs {
    /// All six components marked as not yet received.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for an entered score.
    pub fn with(mut self, component: Component, score: f64) -> Self {
        self[component] = ComponentInput::entered(score);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (Component, &ComponentInput)> + '_ {
        Component::ALL.iter().map(move |&c| (c, &self[c]))
    }

    pub fn is_present(&self, component: Component) -> bool {
        self[component].present
    }
}

impl Index<Component> for GradeInputs {
    type Output = ComponentInput;

    fn index(&self, component: Component) -> &ComponentInput {
        &self.entries[component.index()]
    }
}

impl IndexMut<Component> for GradeInputs {
    fn index_mut(&mut self, component: Component) -> &mut ComponentInput {
        &mut self.entries[component.index()]
    }
}

/// Whether midterm 1 may be dropped when it scored below midterm 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropRule {
    #[default]
    Disabled,
    DropFirstMidtermIfLower,
}

impl DropRule {
    pub fn is_enabled(self) -> bool {
        matches!(self, DropRule::DropFirstMidtermIfLower)
    }
}

impl From<bool> for DropRule {
    fn from(enabled: bool) -> Self {
        if enabled {
            DropRule::DropFirstMidtermIfLower
        } else {
            DropRule::Disabled
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        let total: f64 = Component::ALL.iter().map(|c| c.weight()).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_new_inputs_have_nothing_present() {
        let inputs = GradeInputs::new();
        assert!(inputs.iter().all(|(_, entry)| !entry.present));
        assert_eq!(inputs.iter().count(), 6);
    }

    #[test]
    fn test_with_marks_component_present() {
        let inputs = GradeInputs::new().with(Component::Mid2, 73.5);
        assert!(inputs.is_present(Component::Mid2));
        assert_eq!(inputs[Component::Mid2].score, 73.5);
        assert!(!inputs.is_present(Component::Mid1));
    }

    #[test]
    fn test_component_input_from_option() {
        assert_eq!(ComponentInput::from(Some(90.0)), ComponentInput::entered(90.0));
        assert!(!ComponentInput::from(None).present);
    }

    #[test]
    fn test_drop_rule_from_bool() {
        assert!(DropRule::from(true).is_enabled());
        assert!(!DropRule::from(false).is_enabled());
        assert_eq!(DropRule::default(), DropRule::Disabled);
    }

    #[test]
    fn test_component_serializes_as_key() {
        for component in Component::ALL {
            let json = serde_json::to_string(&component).unwrap();
            assert_eq!(json, format!("\"{}\"", component.key()));
        }
    }
}
