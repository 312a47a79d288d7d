//! On-demand article summarization through an OpenAI-compatible chat
//! completions endpoint. The remote call carries its own timeout; an
//! unset API key disables the feature rather than failing requests
//! deeper in.

use std::time::Duration;

use anyhow::{Context, anyhow};
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use tracing::warn;
use uuid::Uuid;

use vellum_engine::load_article_for_viewer;
use vellum_types::api::SummaryResponse;

use crate::auth::AppState;
use crate::error::{ApiError, engine_error, join_error};
use crate::middleware::bearer_claims;

/// Article body characters sent to the model; longer articles are cut
/// off to stay inside the context window.
const EXCERPT_CHARS: usize = 2000;

const SYSTEM_PROMPT: &str =
    "You are a professional blogging assistant who excels at distilling article summaries.";

pub struct Summarizer {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl Summarizer {
    pub fn new(api_url: String, api_key: String, model: String) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("failed to build summarization HTTP client")?;
        Ok(Self {
            client,
            api_url,
            api_key,
            model,
        })
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    pub async fn summarize(&self, title: &str, content: &str) -> anyhow::Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": build_prompt(title, content) },
            ],
            "stream": false,
        });

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("summarization request failed")?
            .error_for_status()
            .context("summarization API returned an error status")?;

        let data: serde_json::Value = response
            .json()
            .await
            .context("summarization response was not JSON")?;

        data["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| anyhow!("malformed completion response"))
    }
}

/// GET /articles/{id}/summary — same visibility rule as the detail
/// endpoint: a draft's content never reaches the remote API on behalf
/// of anyone but its owner.
pub async fn summarize_article(
    State(state): State<AppState>,
    Path(article_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    if !state.summarizer.is_configured() {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            "summarization is not configured".into(),
        ));
    }

    let claims = bearer_claims(&headers, &state.jwt_secret);

    let db = state.clone();
    let id = article_id.to_string();
    let article = tokio::task::spawn_blocking(move || {
        let viewer = claims.map(|c| c.sub.to_string());
        load_article_for_viewer(&db.db, &id, viewer.as_deref()).map_err(engine_error)
    })
    .await
    .map_err(join_error)??;

    let summary = state
        .summarizer
        .summarize(&article.title, &article.content)
        .await
        .map_err(|e| {
            warn!("Summarization failed for article {}: {:#}", article_id, e);
            (StatusCode::BAD_GATEWAY, "summarization failed".to_string())
        })?;

    Ok(Json(SummaryResponse { summary }))
}

fn build_prompt(title: &str, content: &str) -> String {
    let excerpt: String = content.chars().take(EXCERPT_CHARS).collect();
    format!(
        "Briefly summarize the core content of this article in about 150 words, \
         in a friendly, professional tone:\nTitle: {title}\nBody: {excerpt}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_truncates_long_bodies_on_char_boundaries() {
        // Multi-byte characters must not split.
        let content = "博".repeat(EXCERPT_CHARS + 50);
        let prompt = build_prompt("t", &content);
        assert_eq!(prompt.chars().filter(|c| *c == '博').count(), EXCERPT_CHARS);
    }

    #[test]
    fn prompt_keeps_short_bodies_whole() {
        let prompt = build_prompt("Title", "short body");
        assert!(prompt.contains("Title: Title"));
        assert!(prompt.contains("Body: short body"));
    }

    #[test]
    fn blank_api_key_is_unconfigured() {
        let s = Summarizer::new("https://example.com".into(), String::new(), "m".into()).unwrap();
        assert!(!s.is_configured());
    }
}
