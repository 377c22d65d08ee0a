//! Single-page web form.
//!
//! `GET /` renders the empty form, `POST /predict` runs one submission and
//! renders the same page with the prediction or the error line in place.

use anyhow::Result;
use axum::{
    extract::{Form, State},
    response::{Html, Json},
    routing::{get, post},
    Router,
};
use chrono::Datelike;
use html_escape::encode_safe;
use pulldown_cmark::{html, Event, Options, Parser};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use crate::inference::InferenceClient;
use crate::predict::{submit, Submission};

/// Shared, read-only state for every request
pub struct AppState {
    pub client: InferenceClient,
}

#[derive(Debug, Deserialize)]
pub struct PredictForm {
    #[serde(default)]
    pub symptoms: String,
}

/// Web form server
pub struct WebServer {
    addr: SocketAddr,
    state: Arc<AppState>,
}

impl WebServer {
    pub fn new(addr: SocketAddr, client: InferenceClient) -> Self {
        Self {
            addr,
            state: Arc::new(AppState { client }),
        }
    }

    pub async fn start(&self) -> Result<()> {
        let app = router(self.state.clone());

        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        info!("Disease Predictor listening on http://{}", self.addr);

        axum::serve(listener, app)
            .await
            .map_err(|e| anyhow::anyhow!("Web server stopped: {}", e))?;

        Ok(())
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/predict", post(predict))
        .route("/health", get(health_check))
        .with_state(state)
}

async fn index() -> Html<String> {
    Html(render_page("", None))
}

async fn predict(
    State(state): State<Arc<AppState>>,
    Form(form): Form<PredictForm>,
) -> Html<String> {
    tracing::debug!("Form submitted");
    let submission = submit(&state.client, &form.symptoms).await;
    Html(render_page(&form.symptoms, Some(&submission)))
}

async fn health_check() -> Json<Value> {
    Json(json!({"status": "healthy", "service": "shindan"}))
}

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 0; display: flex; min-height: 100vh; }
.sidebar { width: 220px; padding: 24px; background: #f0f2f6; }
.sidebar h2 { color: #2874f0; }
.main { flex: 1; padding: 32px; }
.main-header { font-size: 3em; color: #2874f0; text-align: center; }
.sub-header { font-size: 1.5em; color: #2874f0; text-align: center; }
textarea { width: 100%; min-height: 120px; }
.result { background: #fafafa; padding: 16px; }
.error { color: #b00020; background: #fdecea; padding: 16px; }
.footer { font-size: 0.8em; color: #999999; text-align: center; padding: 20px; }
"#;

/// Render the page, filling the result area from the submission outcome
pub fn render_page(symptoms: &str, submission: Option<&Submission>) -> String {
    let outcome = match submission {
        Some(Submission::Prediction(text)) => {
            format!(r#"<div class="result">{}</div>"#, render_markdown(text))
        }
        Some(Submission::Failed(line)) => {
            format!(r#"<div class="error">{}</div>"#, encode_safe(line))
        }
        Some(Submission::Empty) | None => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Disease Predictor</title>
<style>{style}</style>
</head>
<body>
<aside class="sidebar"><h2>Disease Predictor</h2></aside>
<main class="main">
<div class="main-header">Welcome to the Disease Predictor!</div>
<div class="sub-header">A web application that helps predict possible diseases based on your symptoms</div>
<form method="post" action="/predict">
<label for="symptoms">Enter the symptoms (separated by commas):</label>
<textarea id="symptoms" name="symptoms">{symptoms}</textarea>
<button type="submit">Predict Disease</button>
</form>
{outcome}
<div class="footer">&copy; {year} Disease Predictor - Helping You Stay Healthy</div>
</main>
</body>
</html>
"#,
        style = STYLE,
        symptoms = encode_safe(symptoms),
        outcome = outcome,
        year = chrono::Local::now().year(),
    )
}

/// Render model Markdown to HTML. Raw HTML in the text is shown as text.
pub fn render_markdown(md: &str) -> String {
    let parser = Parser::new_ext(md, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH)
        .map(|event| match event {
            Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
            other => other,
        });

    let mut out = String::with_capacity(md.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}
