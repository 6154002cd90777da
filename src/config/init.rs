use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{get_config_path, save_config, Config};
use crate::grading::validation::{curve_problem, percent_problem};
use crate::tui::Theme;

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Keep asking until the answer parses and passes `check`.
fn prompt_number(
    message: &str,
    default: f64,
    check: fn(f64) -> Option<&'static str>,
) -> Result<f64> {
    loop {
        let input = prompt_with_default(message, &default.to_string())?;
        match input.parse::<f64>() {
            Ok(value) => match check(value) {
                None => return Ok(value),
                Some(problem) => println!("  Value {}. Try again.", problem),
            },
            Err(_) => println!("  '{}' is not a number. Try again.", input),
        }
    }
}

fn parse_theme(input: &str) -> Option<Theme> {
    match input.to_lowercase().as_str() {
        "auto" => Some(Theme::Auto),
        "dark" => Some(Theme::Dark),
        "light" => Some(Theme::Light),
        _ => None,
    }
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, uses the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    let config_path = match default_path {
        Some(p) => p,
        None => get_config_path()?,
    };

    println!();
    println!("Grade Calculator Configuration");
    println!("These are only defaults; every value can be changed per run.");
    println!();

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!("Config already exists at {}. Overwrite?", config_path.display()),
            false,
        )?;
        if !overwrite {
            println!("Keeping existing config.");
            return Ok(());
        }
    }

    let defaults = Config::default();

    let target = prompt_number("Target overall grade (%)", defaults.target, percent_problem)?;
    let curve_points = prompt_number(
        "Curve points added before predicting",
        defaults.curve_points,
        curve_problem,
    )?;
    let drop_lowest_midterm = prompt_yes_no(
        "Drop Midterm 1 when it is lower than Midterm 2 (all three midterms taken)?",
        defaults.drop_lowest_midterm,
    )?;

    let theme = loop {
        let input = prompt_with_default("Theme (auto/dark/light)", "auto")?;
        match parse_theme(&input) {
            Some(theme) => break theme,
            None => println!("  Unknown theme '{}'. Try again.", input),
        }
    };

    let config = Config {
        target,
        curve_points,
        drop_lowest_midterm,
        theme,
    };
    save_config(&config_path, &config)?;

    println!();
    println!("Config written to {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_theme_case_insensitive() {
        assert_eq!(parse_theme("Dark"), Some(Theme::Dark));
        assert_eq!(parse_theme("LIGHT"), Some(Theme::Light));
        assert_eq!(parse_theme("auto"), Some(Theme::Auto));
        assert_eq!(parse_theme("sepia"), None);
    }
}
