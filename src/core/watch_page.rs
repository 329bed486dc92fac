use regex::Regex;
use std::sync::LazyLock;

pub const UNKNOWN_VIDEO_TITLE: &str = "Unknown Video";

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<title>(.*?)</title>").expect("title regex"));

static META_DESCRIPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<meta name="description" content="(.*?)">"#).expect("meta description regex")
});

static HTML_TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title>(.*?)</title>").expect("html title regex"));

// 播放器資料中的完整描述，內容是 JSON 字串（含跳脫字元）
static SHORT_DESCRIPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""shortDescription":"((?:[^"\\]|\\.)*)""#).expect("shortDescription regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchPage {
    pub title: String,
    pub description: String,
}

/// 從影片頁面 HTML 取出標題與描述
pub fn parse_watch_page(html: &str) -> WatchPage {
    let title = TITLE_RE
        .captures(html)
        .map(|caps| caps[1].replace(" - YouTube", ""))
        .unwrap_or_else(|| UNKNOWN_VIDEO_TITLE.to_string());

    let mut description = META_DESCRIPTION_RE
        .captures(html)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default();

    // meta 描述通常被截斷且沒有換行，有完整描述時優先使用
    if let Some(caps) = SHORT_DESCRIPTION_RE.captures(html) {
        description = unescape_json_string(&caps[1]);
    }

    WatchPage { title, description }
}

/// 任意網頁的 `<title>`，不分大小寫且可跨行
pub fn find_html_title(html: &str) -> Option<String> {
    HTML_TITLE_RE
        .captures(html)
        .map(|caps| caps[1].trim().to_string())
}

/// 解開 JSON 字串跳脫；格式不合法時至少還原 `\n`
pub fn unescape_json_string(raw: &str) -> String {
    match serde_json::from_str::<String>(&format!("\"{}\"", raw)) {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::debug!("Falling back to plain newline unescape: {}", e);
            raw.replace("\\n", "\n")
        }
    }
}
