use crate::config::GeminiConfig;
use crate::domain::ports::TitleShortener;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const API_KEY_HEADER: &str = "x-goog-api-key";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

pub fn shorten_prompt(text: &str) -> String {
    format!(
        "Shorten the following product title to maximum 25 characters. It must make sense and be catchy. Original: '{}'. Return ONLY the shortened title.",
        text
    )
}

/// 透過 Gemini generateContent API 縮短標題
pub struct GeminiShortener {
    client: Client,
    config: GeminiConfig,
}

impl GeminiShortener {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .find_map(|part| part.text)
    }
}

#[async_trait]
impl TitleShortener for GeminiShortener {
    async fn shorten(&self, text: &str, api_key: &str) -> Result<Option<String>> {
        if api_key.is_empty() {
            return Ok(None);
        }

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(shorten_prompt(text)),
                }],
            }],
        };

        tracing::debug!("Asking {} to shorten: {}", self.config.model, text);
        let response: GenerateResponse = self
            .client
            .post(self.generate_url())
            .header(API_KEY_HEADER, api_key)
            .timeout(REQUEST_TIMEOUT)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response
            .first_text()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty()))
    }
}
