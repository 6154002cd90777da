pub mod component;
pub mod engine;
pub mod validation;

pub use component::{Component, ComponentInput, DropRule, GradeInputs};
pub use engine::{
    compute_current, predict, predict_required_average, remaining_components, CurrentGrade,
    Prediction, PredictionRequest, PredictionResult,
};
pub use validation::{validate_inputs, validate_request};
