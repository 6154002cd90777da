pub mod formatter;

pub use formatter::{
    approximate_letter, final_standing, format_current, format_cutoffs, format_json,
    format_percent, format_prediction, format_report, format_weight, should_use_colors, Standing,
    CUTOFFS,
};
