use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use grade_calc::buffered_eprintln;
use grade_calc::config::Config;
use grade_calc::grading::{Component, ComponentInput, DropRule, GradeInputs, PredictionRequest};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_RUNTIME: i32 = 2;
const EXIT_CONFIG: i32 = 4;

/// Scores for each component. A flag that is given marks the grade as received.
#[derive(Args, Debug, Clone)]
struct ScoreArgs {
    /// Homework grade (percentage, 5% of total)
    #[arg(long)]
    homework: Option<f64>,

    /// Discussion engagement (percentage, 10% of total)
    #[arg(long)]
    discussion: Option<f64>,

    /// Midterm 1 score (percentage, 20% of total)
    #[arg(long)]
    mid1: Option<f64>,

    /// Midterm 2 score (percentage, 20% of total)
    #[arg(long)]
    mid2: Option<f64>,

    /// Midterm 3 score (percentage, 20% of total)
    #[arg(long)]
    mid3: Option<f64>,

    /// Final exam score (percentage, 25% of total)
    #[arg(long = "final")]
    final_exam: Option<f64>,

    /// Drop Midterm 1 when it is lower than Midterm 2 (all three midterms taken)
    #[arg(long)]
    drop_lowest: bool,

    /// Print machine-readable JSON instead of text
    #[arg(long)]
    json: bool,
}

impl ScoreArgs {
    fn inputs(&self) -> GradeInputs {
        let mut inputs = GradeInputs::new();
        for (component, score) in [
            (Component::Homework, self.homework),
            (Component::Discussion, self.discussion),
            (Component::Mid1, self.mid1),
            (Component::Mid2, self.mid2),
            (Component::Mid3, self.mid3),
            (Component::Final, self.final_exam),
        ] {
            inputs[component] = ComponentInput::from(score);
        }
        inputs
    }

    fn drop_rule(&self, config: &Config) -> DropRule {
        DropRule::from(self.drop_lowest || config.drop_lowest_midterm)
    }

    /// Configured request with any command-line overrides applied.
    fn request(&self, config: &Config, target: Option<f64>, curve: Option<f64>) -> PredictionRequest {
        let mut request = config.prediction_request().with_drop_rule(self.drop_rule(config));
        if let Some(target) = target {
            request.target = target;
        }
        if let Some(curve) = curve {
            request = request.with_curve(curve);
        }
        request
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive grade entry form (default if no subcommand)
    Tui,
    /// Show the current weighted grade for the entered components
    Current {
        #[command(flatten)]
        scores: ScoreArgs,
    },
    /// Show the average needed on the remaining components to reach a target
    Predict {
        #[command(flatten)]
        scores: ScoreArgs,

        /// Target overall grade (percentage); defaults to the configured target
        #[arg(short, long)]
        target: Option<f64>,

        /// Curve points added before predicting; defaults to the configured curve
        #[arg(long)]
        curve: Option<f64>,
    },
    /// Create or overwrite the config file interactively
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "grade-calc")]
#[command(about = "Weighted course grade calculator and target predictor", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/grade-calc/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn report_errors(heading: &str, errors: &[String], code: i32) -> ! {
    eprintln!("{}", heading);
    for error in errors {
        eprintln!("  - {}", error);
    }
    std::process::exit(code);
}

fn log_inputs(inputs: &GradeInputs, drop_rule: DropRule) {
    for (component, entry) in inputs.iter() {
        if entry.present {
            buffered_eprintln!("  {}: {} (weight {})", component.key(), entry.score, component.weight());
        } else {
            buffered_eprintln!("  {}: not yet received", component.key());
        }
    }
    buffered_eprintln!("  drop rule: {:?}", drop_rule);
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui);
    let config_path = cli.config.map(PathBuf::from);

    if let Commands::Init = command {
        if let Err(e) = grade_calc::config::init::run_init_wizard(config_path) {
            eprintln!("Init failed: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config = match grade_calc::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = grade_calc::config::validate_config(&config) {
        report_errors("Config errors:", &errors, EXIT_CONFIG);
    }

    if cli.verbose {
        buffered_eprintln!(
            "Config: target={} curve_points={} drop_lowest_midterm={} theme={:?}",
            config.target,
            config.curve_points,
            config.drop_lowest_midterm,
            config.theme
        );
    }

    match command {
        Commands::Tui => {
            let colors = grade_calc::tui::resolve_theme(config.theme);
            let app = grade_calc::tui::App::new(&config, colors, cli.verbose);
            if let Err(e) = grade_calc::tui::run_tui(app).await {
                eprintln!("TUI error: {:#}", e);
                std::process::exit(EXIT_RUNTIME);
            }
        }
        Commands::Current { scores } => {
            let inputs = scores.inputs();
            if let Err(errors) = grade_calc::grading::validate_inputs(&inputs) {
                report_errors("Invalid grades:", &errors, EXIT_INPUT);
            }

            let drop_rule = scores.drop_rule(&config);
            if cli.verbose {
                log_inputs(&inputs, drop_rule);
            }

            let current = grade_calc::grading::compute_current(&inputs, drop_rule);
            let remaining = grade_calc::grading::remaining_components(&inputs);

            if scores.json {
                match grade_calc::output::format_json(&inputs, &current, None, &remaining) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Failed to serialize report: {:#}", e);
                        std::process::exit(EXIT_RUNTIME);
                    }
                }
            } else {
                let use_colors = grade_calc::output::should_use_colors();
                println!(
                    "{}",
                    grade_calc::output::format_report(&current, None, &remaining, use_colors)
                );
            }
        }
        Commands::Predict {
            scores,
            target,
            curve,
        } => {
            let inputs = scores.inputs();
            let request = scores.request(&config, target, curve);

            let mut errors = Vec::new();
            if let Err(e) = grade_calc::grading::validate_inputs(&inputs) {
                errors.extend(e);
            }
            if let Err(e) = grade_calc::grading::validate_request(&request) {
                errors.extend(e);
            }
            if !errors.is_empty() {
                report_errors("Invalid input:", &errors, EXIT_INPUT);
            }

            if cli.verbose {
                log_inputs(&inputs, request.drop_rule);
                buffered_eprintln!("  target: {} curve: {}", request.target, request.curve_points);
            }

            let prediction = grade_calc::grading::predict(&inputs, &request);
            let remaining = grade_calc::grading::remaining_components(&inputs);

            if cli.verbose {
                buffered_eprintln!(
                    "Remaining weight {:.4}, points needed {:.4} ({:.4} after curve)",
                    prediction.remaining_weight,
                    prediction.points_needed,
                    prediction.adjusted_points_needed
                );
            }

            if scores.json {
                match grade_calc::output::format_json(
                    &inputs,
                    &prediction.current,
                    Some((&prediction, &request)),
                    &remaining,
                ) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Failed to serialize report: {:#}", e);
                        std::process::exit(EXIT_RUNTIME);
                    }
                }
            } else {
                let use_colors = grade_calc::output::should_use_colors();
                println!(
                    "{}",
                    grade_calc::output::format_report(
                        &prediction.current,
                        Some((&prediction, &request)),
                        &remaining,
                        use_colors
                    )
                );
            }
        }
        Commands::Init => {}
    }

    std::process::exit(EXIT_SUCCESS);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("grade-calc").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_exit_codes_are_distinct() {
        let codes = [EXIT_SUCCESS, EXIT_INPUT, EXIT_RUNTIME, EXIT_CONFIG];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_predict_request_falls_back_to_config() {
        let config = Config {
            target: 90.0,
            curve_points: 3.0,
            drop_lowest_midterm: true,
            ..Config::default()
        };
        let Some(Commands::Predict { scores, target, curve }) = parse(&["predict", "--mid1", "70"]).command
        else {
            panic!("expected predict");
        };
        assert_eq!(scores.request(&config, target, curve), config.prediction_request());
    }

    #[test]
    fn test_predict_request_overrides() {
        let config = Config::default();
        let Some(Commands::Predict { scores, target, curve }) =
            parse(&["predict", "--target", "70", "--curve", "5", "--drop-lowest"]).command
        else {
            panic!("expected predict");
        };
        let request = scores.request(&config, target, curve);
        assert_eq!(request.target, 70.0);
        assert_eq!(request.curve_points, 5.0);
        assert!(request.drop_rule.is_enabled());
    }

    #[test]
    fn test_flags_mark_components_present() {
        let Some(Commands::Current { scores }) = parse(&["current", "--homework", "90", "--final", "75"]).command
        else {
            panic!("expected current");
        };
        let inputs = scores.inputs();
        assert!(inputs.is_present(Component::Homework));
        assert!(inputs.is_present(Component::Final));
        assert!(!inputs.is_present(Component::Mid1));
    }
}
