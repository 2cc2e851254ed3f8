// 文本处理工具
// 分类与图鉴文本的拼接、首字母大写、编号的自然排序

use std::cmp::Ordering;

/// 取 `start` 按分隔符切开后的第一段，接上 `end` 的第二段。
///
/// `end` 只切两段：`"a b c"` 取到的是 `"b"`，只有一段时取它本身。
pub fn splice_text(start: &str, end: &str, separator: &str) -> String {
    let head = start.split(separator).next().unwrap_or_default();
    let tail = end.split(separator).take(2).last().unwrap_or_default();
    format!("{head}{separator}{tail}")
}

// 首字符大写，其余保持不变
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// 按点号分段做数值比较，`"2.10"` 排在 `"2.9"` 之后。
/// 非数字段回退为字典序。
pub fn compare_ids(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ordering = match (x.parse::<u64>(), y.parse::<u64>()) {
                    (Ok(x), Ok(y)) => x.cmp(&y),
                    _ => x.cmp(y),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splice_category() {
        assert_eq!(splice_text("Seed Pokémon", "Lizard Pokémon", " "), "Seed Pokémon");
        assert_eq!(splice_text("Flame", "Mouse Pokémon", " "), "Flame Pokémon");
        assert_eq!(splice_text("Seed Pokémon", "Lizard", " "), "Seed Lizard");
    }

    #[test]
    fn test_splice_sentences() {
        let entry = splice_text("It grows. It naps.", "Fire burns. Tail glows.", ".");
        assert_eq!(entry, "It grows. Tail glows");
    }

    #[test]
    fn test_splice_takes_second_piece_not_last() {
        assert_eq!(splice_text("a", "x y z", " "), "a y");
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("bulbmander"), "Bulbmander");
        assert_eq!(capitalize_first("éclair"), "Éclair");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn test_compare_ids_numeric() {
        assert_eq!(compare_ids("2", "10"), Ordering::Less);
        assert_eq!(compare_ids("144.145.146", "3.6.9"), Ordering::Greater);
        assert_eq!(compare_ids("1.4.7", "1.4.7"), Ordering::Equal);
        assert_eq!(compare_ids("1.4", "1.4.7"), Ordering::Less);
    }
}
