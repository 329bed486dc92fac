use crate::config::EnrichmentConfig;
use crate::core::cache::BoundedCache;
use crate::core::links::extract_links_with_text;
use crate::core::titles::{candidate_short_title, truncate_title, ShortTitle};
use crate::core::watch_page::parse_watch_page;
use crate::domain::model::{ExtractedLink, ExtractionResult};
use crate::domain::ports::{PageFetcher, TitleShortener};
use crate::utils::error::Result;
use futures::stream::{self, StreamExt};

pub struct LinkExtractor<F: PageFetcher, S: TitleShortener> {
    fetcher: F,
    shortener: S,
    config: EnrichmentConfig,
    title_cache: BoundedCache<String, String>,
    short_cache: BoundedCache<(String, String), Option<String>>,
}

impl<F: PageFetcher, S: TitleShortener> LinkExtractor<F, S> {
    pub fn new(fetcher: F, shortener: S, config: EnrichmentConfig) -> Result<Self> {
        let capacity = config.cache_capacity;
        Ok(Self {
            title_cache: BoundedCache::new(capacity)?,
            short_cache: BoundedCache::new(capacity)?,
            fetcher,
            shortener,
            config,
        })
    }

    /// 抓取影片頁面、解析描述中的連結，再並行補上每個連結的標題
    pub async fn extract(&self, video_url: &str, api_key: Option<&str>) -> Result<ExtractionResult> {
        tracing::info!("🚀 Extracting links from: {}", video_url);

        let html = self.fetcher.fetch_page(video_url).await?;
        let page = parse_watch_page(&html);
        tracing::debug!(
            "Parsed watch page '{}' ({} description chars)",
            page.title,
            page.description.chars().count()
        );

        let links = extract_links_with_text(&page.description);
        tracing::info!("🔗 Found {} links in '{}'", links.len(), page.title);

        let links = self.enrich_links(links, api_key).await;
        tracing::info!("✅ Enriched {} links", links.len());

        Ok(ExtractionResult {
            title: page.title,
            description: page.description,
            links,
        })
    }

    /// 同時最多 `max_concurrent` 個查詢，輸出順序與輸入相同
    pub async fn enrich_links(
        &self,
        links: Vec<ExtractedLink>,
        api_key: Option<&str>,
    ) -> Vec<ExtractedLink> {
        let lookups: Vec<_> = links
            .into_iter()
            .map(|link| self.enrich_link(link, api_key))
            .collect();

        stream::iter(lookups)
            .buffered(self.config.max_concurrent.max(1))
            .collect()
            .await
    }

    async fn enrich_link(&self, mut link: ExtractedLink, api_key: Option<&str>) -> ExtractedLink {
        let page_title = self.page_title(&link.url).await;
        let full_title = if page_title.is_empty() {
            link.text.clone()
        } else {
            page_title
        };

        let max_chars = self.config.short_title_max_chars;
        let short_title = match candidate_short_title(&full_title, max_chars) {
            ShortTitle::Ready(title) => title,
            ShortTitle::TooLong(title) => match self.shorten(&title, api_key).await {
                Some(shortened) => shortened,
                None => truncate_title(&title, max_chars),
            },
        };

        link.page_title = Some(full_title);
        link.short_title = Some(short_title);
        link
    }

    /// 連結頁面的標題；失敗時回傳空字串（失敗結果同樣會被快取）
    pub async fn page_title(&self, url: &str) -> String {
        let key = url.to_string();
        if let Some(cached) = self.title_cache.get(&key) {
            tracing::debug!("Title cache hit: {}", url);
            return cached;
        }

        let title = match self.fetcher.fetch_title(url).await {
            Ok(title) => title.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("⚠️ Error fetching title for {}: {}", url, e);
                String::new()
            }
        };

        self.title_cache.insert(key, title.clone());
        title
    }

    async fn shorten(&self, text: &str, api_key: Option<&str>) -> Option<String> {
        let api_key = api_key.filter(|key| !key.is_empty())?;

        let key = (text.to_string(), api_key.to_string());
        if let Some(cached) = self.short_cache.get(&key) {
            return cached;
        }

        let shortened = match self.shortener.shorten(text, api_key).await {
            Ok(result) => result.filter(|s| !s.is_empty()),
            Err(e) => {
                tracing::warn!("⚠️ Gemini API Error: {}", e);
                None
            }
        };

        self.short_cache.insert(key, shortened.clone());
        shortened
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ExtractorError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    struct MockFetcher {
        page: String,
        titles: HashMap<String, String>,
        title_calls: Arc<AtomicUsize>,
        in_flight: Arc<AtomicUsize>,
        max_in_flight: Arc<AtomicUsize>,
    }

    impl MockFetcher {
        fn new(page: &str, titles: &[(&str, &str)]) -> Self {
            Self {
                page: page.to_string(),
                titles: titles
                    .iter()
                    .map(|(u, t)| (u.to_string(), t.to_string()))
                    .collect(),
                title_calls: Arc::new(AtomicUsize::new(0)),
                in_flight: Arc::new(AtomicUsize::new(0)),
                max_in_flight: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl PageFetcher for MockFetcher {
        async fn fetch_page(&self, url: &str) -> Result<String> {
            if url.contains("broken") {
                return Err(ExtractorError::ProcessingError {
                    message: "page unavailable".to_string(),
                });
            }
            Ok(self.page.clone())
        }

        async fn fetch_title(&self, url: &str) -> Result<Option<String>> {
            self.title_calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if url.contains("error") {
                return Err(ExtractorError::ProcessingError {
                    message: "connection reset".to_string(),
                });
            }
            Ok(self.titles.get(url).cloned())
        }
    }

    struct MockShortener {
        reply: Option<String>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl TitleShortener for MockShortener {
        async fn shorten(&self, _text: &str, _api_key: &str) -> Result<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.clone())
        }
    }

    fn shortener(reply: Option<&str>) -> MockShortener {
        MockShortener {
            reply: reply.map(str::to_string),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    const PAGE: &str = r#"<title>Gym Haul - YouTube</title>
<meta name="description" content="short">
"shortDescription":"Jerky: https://shop.example.com/jerky\nBottle\nhttps://shop.example.com/bottle\nhttps://shop.example.com/error""#;

    #[tokio::test]
    async fn test_extract_builds_titles_in_description_order() {
        let fetcher = MockFetcher::new(
            PAGE,
            &[
                ("https://shop.example.com/jerky", "Jelení jerky - GymBeam"),
                (
                    "https://shop.example.com/bottle",
                    "Shaker Bottle | The Long Name Of This Store",
                ),
            ],
        );
        let extractor = LinkExtractor::new(fetcher, shortener(None), EnrichmentConfig::default()).unwrap();

        let result = extractor
            .extract("https://www.youtube.com/watch?v=x", None)
            .await
            .unwrap();

        assert_eq!(result.title, "Gym Haul");
        assert_eq!(result.links.len(), 3);

        let jerky = &result.links[0];
        assert_eq!(jerky.text, "Jerky");
        assert_eq!(jerky.page_title.as_deref(), Some("Jelení jerky - GymBeam"));
        assert_eq!(jerky.short_title.as_deref(), Some("Jelení jerky - GymBeam"));

        let bottle = &result.links[1];
        assert_eq!(bottle.text, "Bottle");
        assert_eq!(bottle.short_title.as_deref(), Some("Shaker Bottle"));

        // 標題查詢失敗時退回連結文字
        let failed = &result.links[2];
        assert_eq!(failed.text, "Link");
        assert_eq!(failed.page_title.as_deref(), Some("Link"));
        assert_eq!(failed.short_title.as_deref(), Some("Link"));
    }

    #[tokio::test]
    async fn test_fetch_page_error_propagates() {
        let extractor = LinkExtractor::new(
            MockFetcher::new(PAGE, &[]),
            shortener(None),
            EnrichmentConfig::default(),
        )
        .unwrap();
        let err = extractor
            .extract("https://broken.example.com", None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("page unavailable"));
    }

    #[tokio::test]
    async fn test_long_title_uses_shortener_when_key_present() {
        let long = "An extremely long product name without separators";
        let fetcher = MockFetcher::new("", &[("https://a.example.com/p", long)]);
        let short = shortener(Some("Catchy Name"));
        let calls = short.calls.clone();
        let extractor = LinkExtractor::new(fetcher, short, EnrichmentConfig::default()).unwrap();

        let links = vec![ExtractedLink::new("Product", "https://a.example.com/p")];
        let enriched = extractor.enrich_links(links.clone(), Some("key")).await;
        assert_eq!(enriched[0].short_title.as_deref(), Some("Catchy Name"));

        // 第二次命中快取
        extractor.enrich_links(links, Some("key")).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_long_title_truncated_without_key() {
        let long = "An extremely long product name without separators";
        let fetcher = MockFetcher::new("", &[("https://a.example.com/p", long)]);
        let short = shortener(Some("never used"));
        let calls = short.calls.clone();
        let extractor = LinkExtractor::new(fetcher, short, EnrichmentConfig::default()).unwrap();

        let links = vec![ExtractedLink::new("Product", "https://a.example.com/p")];
        let enriched = extractor.enrich_links(links, None).await;

        assert_eq!(
            enriched[0].short_title.as_deref(),
            Some("An extremely long product")
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_shortener_empty_reply_falls_back_to_truncation() {
        let long = "Another very long product title here";
        let fetcher = MockFetcher::new("", &[("https://a.example.com/p", long)]);
        let extractor =
            LinkExtractor::new(fetcher, shortener(Some("")), EnrichmentConfig::default()).unwrap();

        let links = vec![ExtractedLink::new("Product", "https://a.example.com/p")];
        let enriched = extractor.enrich_links(links, Some("key")).await;
        assert_eq!(
            enriched[0].short_title.as_deref(),
            Some("Another very long product")
        );
    }

    #[tokio::test]
    async fn test_titles_are_cached_per_url() {
        let fetcher = MockFetcher::new("", &[("https://a.example.com/p", "Title")]);
        let calls = fetcher.title_calls.clone();
        let extractor = LinkExtractor::new(fetcher, shortener(None), EnrichmentConfig::default()).unwrap();

        assert_eq!(extractor.page_title("https://a.example.com/p").await, "Title");
        assert_eq!(extractor.page_title("https://a.example.com/p").await, "Title");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let fetcher = MockFetcher::new("", &[]);
        let max_in_flight = fetcher.max_in_flight.clone();
        let config = EnrichmentConfig {
            max_concurrent: 3,
            ..EnrichmentConfig::default()
        };
        let extractor = LinkExtractor::new(fetcher, shortener(None), config).unwrap();

        let links: Vec<ExtractedLink> = (0..12)
            .map(|i| ExtractedLink::new("Link", format!("https://a.example.com/{}", i)))
            .collect();
        let enriched = extractor.enrich_links(links, None).await;

        assert_eq!(enriched.len(), 12);
        assert_eq!(enriched[5].url, "https://a.example.com/5");
        let peak = max_in_flight.load(Ordering::SeqCst);
        assert!(peak <= 3, "peak concurrency was {}", peak);
        assert!(peak > 1, "lookups did not overlap");
    }

    #[test]
    fn test_zero_cache_capacity_is_rejected() {
        let config = EnrichmentConfig {
            cache_capacity: 0,
            ..EnrichmentConfig::default()
        };
        let result = LinkExtractor::new(MockFetcher::new("", &[]), shortener(None), config);

        assert!(matches!(
            result,
            Err(ExtractorError::InvalidConfigValueError { .. })
        ));
    }
}
