/// 結果若仍超過長度上限，需要交給縮短服務或直接截斷
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortTitle {
    Ready(String),
    TooLong(String),
}

/// 從完整標題推導短標題：先去掉 `" | 網站名"`，太長時再嘗試去掉 `" - 品牌"`
pub fn candidate_short_title(full_title: &str, max_chars: usize) -> ShortTitle {
    let cleaned = full_title
        .split(" | ")
        .next()
        .unwrap_or_default()
        .trim();

    if char_len(cleaned) <= max_chars {
        return ShortTitle::Ready(cleaned.to_string());
    }

    if let Some((first_part, _brand)) = cleaned.rsplit_once(" - ") {
        let first_part = first_part.trim();
        if char_len(first_part) <= max_chars {
            return ShortTitle::Ready(first_part.to_string());
        }
    }

    ShortTitle::TooLong(cleaned.to_string())
}

/// 截斷到上限並去掉尾端的標點
pub fn truncate_title(title: &str, max_chars: usize) -> String {
    let truncated: String = title.chars().take(max_chars).collect();
    truncated
        .trim_end_matches([' ', ':', ',', '.', '|', '-'])
        .to_string()
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_title_fits() {
        assert_eq!(
            candidate_short_title("Jelení jerky - GymBeam", 25),
            ShortTitle::Ready("Jelení jerky - GymBeam".to_string())
        );
    }

    #[test]
    fn test_site_suffix_after_pipe_is_dropped() {
        assert_eq!(
            candidate_short_title("Shaker Bottle | Some Very Long Store Name", 25),
            ShortTitle::Ready("Shaker Bottle".to_string())
        );
    }

    #[test]
    fn test_brand_suffix_dropped_when_too_long() {
        assert_eq!(
            candidate_short_title("Pink Burn Drink Limited Edition - GymBeam", 25),
            ShortTitle::TooLong("Pink Burn Drink Limited Edition - GymBeam".to_string())
        );
        assert_eq!(
            candidate_short_title("Pink Burn Drink Mango - GymBeam Store", 25),
            ShortTitle::Ready("Pink Burn Drink Mango".to_string())
        );
    }

    #[test]
    fn test_last_dash_is_used() {
        assert_eq!(
            candidate_short_title("Whey - Chocolate Flavour - GymBeam Store", 25),
            ShortTitle::Ready("Whey - Chocolate Flavour".to_string())
        );
    }

    #[test]
    fn test_too_long_without_dash() {
        assert_eq!(
            candidate_short_title("An extremely long product name without separators", 25),
            ShortTitle::TooLong("An extremely long product name without separators".to_string())
        );
    }

    #[test]
    fn test_truncate_strips_trailing_punctuation() {
        assert_eq!(
            truncate_title("An extremely long product name without separators", 25),
            "An extremely long product"
        );
        assert_eq!(truncate_title("Best deals: shop now, today!", 12), "Best deals");
        assert_eq!(truncate_title("Čokoládový proteín - 1 kg", 20), "Čokoládový proteín");
    }
}
