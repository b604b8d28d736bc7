//! Counted nouns for log lines.

/// `count` followed by `noun`, pluralized unless the count is one.
///
/// Covers the regular English forms that show up in our logs:
/// `page` -> `pages`, `capability` -> `capabilities`, `patch` -> `patches`.
pub fn plural_count(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {noun}")
    } else {
        format!("{count} {}", plural(noun))
    }
}

fn plural(noun: &str) -> String {
    let consonant_y = noun
        .strip_suffix('y')
        .filter(|stem| !stem.ends_with(['a', 'e', 'i', 'o', 'u']));

    if let Some(stem) = consonant_y {
        format!("{stem}ies")
    } else if ["s", "x", "z", "ch", "sh"].iter().any(|end| noun.ends_with(end)) {
        format!("{noun}es")
    } else {
        format!("{noun}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_count() {
        assert_eq!(plural_count(0, "page"), "0 pages");
        assert_eq!(plural_count(1, "page"), "1 page");
        assert_eq!(plural_count(3, "record"), "3 records");
    }

    #[test]
    fn test_irregular_endings() {
        assert_eq!(plural_count(2, "capability"), "2 capabilities");
        assert_eq!(plural_count(1, "capability"), "1 capability");
        assert_eq!(plural_count(2, "key"), "2 keys");
        assert_eq!(plural_count(2, "patch"), "2 patches");
        assert_eq!(plural_count(2, "alias"), "2 aliases");
    }
}
