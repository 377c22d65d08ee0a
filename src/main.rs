mod config;
mod inference;
mod predict;
mod prompt;
mod ui;
mod web;

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::Settings;
use crate::inference::{GenerationConfig, InferenceClient};
use crate::predict::Submission;

#[derive(Parser)]
#[command(author, version, about = "Disease Predictor: possible diseases from a list of symptoms")]
struct Cli {
    /// Serve the web form instead of the terminal prompt
    #[arg(long, default_value_t = false)]
    serve: bool,

    /// Address the web form listens on
    #[arg(long, default_value = "127.0.0.1", requires = "serve")]
    host: String,

    #[arg(long, default_value_t = 8501, requires = "serve")]
    port: u16,

    /// Predict once for these comma-separated symptoms and exit
    #[arg(long, conflicts_with = "serve")]
    symptoms: Option<String>,

    /// Gemini model name
    #[arg(long)]
    model: Option<String>,

    /// Base URL of the generative language API
    #[arg(long)]
    api_base: Option<String>,
}

/// The terminal prompt shares stderr with the spinner, so only the server logs at info
fn default_log_level(serve: bool) -> &'static str {
    if serve {
        "info"
    } else {
        "error"
    }
}

/// A failed one-shot submission becomes the process error
fn finish_one_shot(submission: Submission) -> Result<()> {
    if let Submission::Failed(line) = submission {
        return Err(anyhow!(line));
    }
    ui::display_submission(&submission);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    dotenv::dotenv().ok();
    let default_level = default_log_level(cli.serve);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::from_env(cli.model, cli.api_base)?;
    tracing::debug!(?settings, "Settings resolved");
    let client = InferenceClient::new(settings, GenerationConfig::default())?;

    if cli.serve {
        let addr = config::listen_addr(&cli.host, cli.port)?;
        return web::WebServer::new(addr, client).start().await;
    }

    if let Some(symptoms) = cli.symptoms {
        let submission = predict::submit(&client, &symptoms).await;
        return finish_one_shot(submission);
    }

    ui::display_welcome();

    loop {
        let user_input = ui::get_user_input()?;

        if user_input.to_lowercase() == "q" || user_input.is_empty() {
            println!("\nGoodbye! Take care!");
            break;
        }

        let pb = ui::awaiting_response(client.model());
        let submission = predict::submit(&client, &user_input).await;
        pb.finish_and_clear();

        ui::display_submission(&submission);

        if !ui::ask_predict_again()? {
            println!("\nGoodbye! Take care!");
            break;
        }
    }

    Ok(())
}
