// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text helpers: slug derivation, token-marker stripping, alt-text generation.

/// Normalizes a string into a URL slug.
///
/// Unicode letters and digits are kept (Arabic titles produce Arabic slugs,
/// which URL-encode fine); every other run of characters collapses to a
/// single hyphen.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_hyphen = false;
    for ch in input.trim().chars() {
        if ch.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            for lower in ch.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

/// Derives a unique article slug from a title: the title slug plus a
/// millisecond-timestamp suffix. Titles that slugify to nothing fall back to
/// a generic stem so the slug is never just the suffix.
pub fn unique_slug(title: &str) -> String {
    let stem = slugify(title);
    let stem = if stem.is_empty() { "article" } else { &stem };
    format!("{stem}-{}", chrono::Utc::now().timestamp_millis())
}

/// Removes the authorization token marker from the combined message text.
///
/// Senders embed the token in the message body (optionally prefixed with
/// `#`); it must not survive into the text handed to the quality service.
pub fn strip_token_marker(text: &str, token: &str) -> String {
    if token.is_empty() {
        return text.trim().to_string();
    }
    let marked = format!("#{token}");
    text.replace(&marked, "").replace(token, "").trim().to_string()
}

/// Truncates a string to at most `max` characters (not bytes).
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    text.chars().take(max).collect()
}

/// Generates bounded alt text for the attachment at `index`.
///
/// The hero image (index 0) uses the article title; subsequent images use the
/// excerpt with an index suffix, falling back to the title when the excerpt
/// is empty.
pub fn alt_text(index: usize, title: &str, excerpt: &str, max_len: usize) -> String {
    let text = if index == 0 {
        title.to_string()
    } else {
        let base = if excerpt.trim().is_empty() { title } else { excerpt };
        format!("{base} {}", index + 1)
    };
    truncate_chars(&text, max_len)
}

/// Extracts a filename from a media URL (last path segment, query stripped).
pub fn filename_from_url(url: &str) -> String {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    without_query
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or("attachment")
        .to_string()
}

/// Guesses a MIME type from a filename extension. Unknown extensions yield
/// `None`; the blob store recorded the authoritative type at upload time.
pub fn mime_from_filename(filename: &str) -> Option<&'static str> {
    let extension = filename.rsplit('.').next()?.to_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "mp4" => Some("video/mp4"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_separators_and_lowercases() {
        assert_eq!(slugify("Breaking News:  Markets Up!"), "breaking-news-markets-up");
        assert_eq!(slugify("  -- "), "");
    }

    #[test]
    fn slugify_keeps_arabic_letters() {
        assert_eq!(slugify("الأسواق ترتفع"), "الأسواق-ترتفع");
    }

    #[test]
    fn unique_slug_appends_suffix_and_never_starts_with_hyphen() {
        let slug = unique_slug("عنوان الخبر");
        assert!(slug.starts_with("عنوان-الخبر-"));

        let fallback = unique_slug("!!!");
        assert!(fallback.starts_with("article-"));
    }

    #[test]
    fn strip_token_marker_removes_hash_and_bare_forms() {
        assert_eq!(strip_token_marker("#tok-1 عاجل: خبر", "tok-1"), "عاجل: خبر");
        assert_eq!(strip_token_marker("عاجل tok-1 خبر", "tok-1"), "عاجل  خبر");
    }

    #[test]
    fn alt_text_hero_uses_title_others_use_excerpt_with_index() {
        assert_eq!(alt_text(0, "العنوان", "المقتطف", 125), "العنوان");
        assert_eq!(alt_text(1, "العنوان", "المقتطف", 125), "المقتطف 2");
        assert_eq!(alt_text(2, "العنوان", "", 125), "العنوان 3");
    }

    #[test]
    fn alt_text_is_bounded_by_char_count() {
        let long_title = "ع".repeat(300);
        let alt = alt_text(0, &long_title, "", 125);
        assert_eq!(alt.chars().count(), 125);
    }

    #[test]
    fn filename_from_url_strips_path_and_query() {
        assert_eq!(
            filename_from_url("https://media.example.com/public/abc-photo.jpg?sig=x"),
            "abc-photo.jpg"
        );
        assert_eq!(filename_from_url("https://media.example.com/"), "attachment");
    }

    #[test]
    fn mime_guesses_common_image_types() {
        assert_eq!(mime_from_filename("a.JPG"), Some("image/jpeg"));
        assert_eq!(mime_from_filename("b.webp"), Some("image/webp"));
        assert_eq!(mime_from_filename("doc.pdf"), None);
    }
}
