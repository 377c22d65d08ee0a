use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;

use crate::predict::Submission;

/// Display welcome message
pub fn display_welcome() {
    println!();
    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║                      Disease Predictor                        ║");
    println!("║   Predict possible diseases based on your symptoms            ║");
    println!("╠═══════════════════════════════════════════════════════════════╣");
    println!("║  Enter your symptoms separated by commas. Possible diseases   ║");
    println!("║  are grouped as Mild, Moderate and Severe threats.            ║");
    println!("║                                                               ║");
    println!("║          WARNING: This is NOT a diagnosis tool.               ║");
    println!("║     Always consult a medical professional for proper          ║");
    println!("║     diagnosis and treatment.                                  ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
}

/// Get the comma-separated symptom list
pub fn get_user_input() -> Result<String> {
    println!("\n═══════════════════════════════════════════════════════════════");
    println!("          ENTER THE SYMPTOMS (separated by commas)");
    println!("═══════════════════════════════════════════════════════════════");
    print!("> ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().to_string())
}

/// Spinner shown while the request is in flight
pub fn awaiting_response(model: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(format!("Predicting diseases with {}...", model));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Text printed for a submission, `None` when there is nothing to show
pub fn render_submission(submission: &Submission) -> Option<String> {
    match submission {
        Submission::Empty => None,
        Submission::Prediction(text) => Some(text.clone()),
        Submission::Failed(line) => Some(line.clone()),
    }
}

/// Display the outcome of one submission
pub fn display_submission(submission: &Submission) {
    match render_submission(submission) {
        None => println!("No symptoms entered. Nothing to predict."),
        Some(text) => {
            if matches!(submission, Submission::Failed(_)) {
                eprintln!("\n{}", text);
            } else {
                println!("\n{}", text);
            }
        }
    }
}

/// Ask user if they want to predict again
pub fn ask_predict_again() -> Result<bool> {
    println!("\nWould you like to try another set of symptoms? (y/n)");

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}
