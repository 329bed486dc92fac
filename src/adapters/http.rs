use crate::config::HttpConfig;
use crate::core::watch_page::find_html_title;
use crate::domain::ports::PageFetcher;
use crate::utils::error::{ExtractorError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Response, StatusCode};

/// 以瀏覽器標頭抓取頁面的 reqwest 實作
pub struct HttpPageFetcher {
    client: Client,
    config: HttpConfig,
}

impl HttpPageFetcher {
    pub fn new(config: HttpConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, header_value("http.user_agent", &config.user_agent)?);
        headers.insert(
            ACCEPT_LANGUAGE,
            header_value("http.accept_language", &config.accept_language)?,
        );

        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self { client, config })
    }
}

fn header_value(field: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| ExtractorError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: format!("Not a valid HTTP header value: {}", e),
    })
}

/// 沒有宣告 charset 或宣告為 ISO-8859-1 時視為 UTF-8，其餘依伺服器宣告解碼
async fn decode_body(response: Response) -> Result<String> {
    let declared = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(declared_charset);

    match declared {
        Some(charset) if !charset.eq_ignore_ascii_case("iso-8859-1") => Ok(response.text().await?),
        _ => {
            let body = response.bytes().await?;
            Ok(String::from_utf8_lossy(&body).into_owned())
        }
    }
}

fn declared_charset(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if !name.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        let value = value.trim().trim_matches('"');
        (!value.is_empty()).then(|| value.to_string())
    })
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        tracing::debug!("Fetching watch page: {}", url);

        let response = self
            .client
            .get(url)
            .timeout(self.config.page_timeout())
            .send()
            .await?
            .error_for_status()?;
        tracing::debug!("Watch page response status: {}", response.status());

        decode_body(response).await
    }

    async fn fetch_title(&self, url: &str) -> Result<Option<String>> {
        let response = self
            .client
            .get(url)
            .timeout(self.config.title_timeout())
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            tracing::debug!("Skipping title for {} (status {})", url, response.status());
            return Ok(None);
        }

        let body = decode_body(response).await?;
        Ok(find_html_title(&body))
    }
}
