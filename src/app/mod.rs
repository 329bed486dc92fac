pub mod output;
pub mod server;

use crate::adapters::{GeminiShortener, HttpPageFetcher};
use crate::config::AppConfig;
use crate::core::extractor::LinkExtractor;
use crate::utils::error::Result;

pub type DefaultExtractor = LinkExtractor<HttpPageFetcher, GeminiShortener>;

/// 以設定檔組裝 HTTP 抓取與 Gemini 縮短服務
pub fn build_extractor(config: &AppConfig) -> Result<DefaultExtractor> {
    let fetcher = HttpPageFetcher::new(config.http.clone())?;
    let shortener = GeminiShortener::new(config.gemini.clone());
    LinkExtractor::new(fetcher, shortener, config.enrichment.clone())
}
