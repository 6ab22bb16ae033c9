// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Force-flush trigger keyword matching.
//!
//! Senders can bypass the aggregation window with an explicit "done typing"
//! keyword. Matching is case-insensitive against the trimmed message text and
//! fires when the message equals a configured keyword or starts with one.

/// Returns true when `text` should force immediate processing.
pub fn is_force_trigger(text: &str, keywords: &[String]) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return false;
    }
    let lowered = trimmed.to_lowercase();
    keywords.iter().any(|keyword| {
        let keyword = keyword.trim().to_lowercase();
        // starts_with also covers exact equality
        !keyword.is_empty() && lowered.starts_with(&keyword)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Vec<String> {
        ["send", "done", "publish", "نشر", "انشر", "تم", "ارسل"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn exact_keyword_matches() {
        assert!(is_force_trigger("send", &defaults()));
        assert!(is_force_trigger("نشر", &defaults()));
    }

    #[test]
    fn matching_is_case_insensitive_and_trimmed() {
        assert!(is_force_trigger("  SEND  ", &defaults()));
        assert!(is_force_trigger("Done", &defaults()));
    }

    #[test]
    fn prefix_matches() {
        assert!(is_force_trigger("publish now please", &defaults()));
        assert!(is_force_trigger("تم الانتهاء", &defaults()));
    }

    #[test]
    fn ordinary_text_does_not_match() {
        assert!(!is_force_trigger("عاجل: الأسواق ترتفع", &defaults()));
        assert!(!is_force_trigger("presenting the news", &defaults()));
        assert!(!is_force_trigger("", &defaults()));
    }

    #[test]
    fn empty_keyword_never_matches_everything() {
        assert!(!is_force_trigger("anything", &["".to_string(), "  ".to_string()]));
    }
}
