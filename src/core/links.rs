use crate::domain::model::ExtractedLink;
use regex::Regex;
use std::sync::LazyLock;

pub const FALLBACK_LINK_TEXT: &str = "Link";

pub static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"https?://(?:www\.)?[-a-zA-Z0-9@:%._\+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b(?:[-a-zA-Z0-9()@:%_\+.~#?&//=]*)",
    )
    .expect("url regex")
});

/// 從影片描述中找出所有連結，並為每個連結配上說明文字。
///
/// 文字來源依序為：同一行去掉網址後剩下的文字、上一行（若上一行本身不含網址）、
/// 最後才是固定的 `"Link"`。
pub fn extract_links_with_text(description: &str) -> Vec<ExtractedLink> {
    if description.is_empty() {
        return Vec::new();
    }

    let lines: Vec<&str> = description.split('\n').collect();
    let mut extracted = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        for found in URL_RE.find_iter(line) {
            let url = found.as_str();

            // 同一行的文字
            let remainder = line.replace(url, "");
            let cleaned = strip_separators(remainder.trim());
            if !cleaned.is_empty() && cleaned.chars().any(|c| c.is_ascii_alphanumeric()) {
                extracted.push(ExtractedLink::new(cleaned, url));
                continue;
            }

            // 上一行
            let previous = i
                .checked_sub(1)
                .map(|p| lines[p].trim())
                .filter(|prev| !prev.is_empty() && !URL_RE.is_match(prev));

            match previous {
                Some(prev) => extracted.push(ExtractedLink::new(prev, url)),
                None => extracted.push(ExtractedLink::new(FALLBACK_LINK_TEXT, url)),
            }
        }
    }

    extracted
}

/// 去掉前後的冒號、破折號、直線、空白與箭頭符號
fn strip_separators(text: &str) -> &str {
    text.trim_matches(is_separator).trim()
}

fn is_separator(c: char) -> bool {
    matches!(c, ':' | '-' | '|') || c.is_whitespace() || ('\u{2190}'..='\u{2199}').contains(&c)
}
