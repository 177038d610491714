use unicode_normalization::UnicodeNormalization;

/// Joins forms for display: empty list is the empty string, a single form is
/// itself, multiple forms are comma-space separated in original order.
pub fn join_forms(items: &[String]) -> String {
    items.join(", ")
}

/// Uppercases the first letter, leaving the rest untouched.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Query preprocessing: trim, NFKC-normalize, strip stray line breaks.
/// Word lists pulled out of Kindle HTML carry compatibility-width characters.
pub fn normalize_query(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }
    let text: String = text.nfkc().collect();
    text.replace(['\n', '\r'], "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_empty_list_is_empty_string() {
        assert_eq!(join_forms(&[]), "");
    }

    #[test]
    fn join_single_form_is_itself() {
        assert_eq!(join_forms(&["ねこ".to_string()]), "ねこ");
    }

    #[test]
    fn join_preserves_order_and_round_trips() {
        let forms = vec!["猫".to_string(), "ネコ".to_string(), "ねこ".to_string()];
        let joined = join_forms(&forms);
        assert_eq!(joined, "猫, ネコ, ねこ");
        let split: Vec<String> = joined.split(", ").map(str::to_string).collect();
        assert_eq!(split, forms);
    }

    #[test]
    fn capitalize_first_letter_only() {
        assert_eq!(capitalize("cat."), "Cat.");
        assert_eq!(capitalize("to eat; to devour."), "To eat; to devour.");
        assert_eq!(capitalize(""), "");
        // Non-cased scripts pass through unchanged.
        assert_eq!(capitalize("ねこ."), "ねこ.");
    }

    #[test]
    fn normalize_query_applies_nfkc() {
        assert_eq!(normalize_query("ｶﾞｷ"), "ガキ");
        assert_eq!(normalize_query("ｔａｎｇｏ"), "tango");
        assert_eq!(normalize_query("  ねこ\n"), "ねこ");
        assert_eq!(normalize_query("   "), "");
    }
}
