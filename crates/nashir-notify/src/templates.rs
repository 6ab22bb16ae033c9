// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Arabic reply templates for the four sender-facing reply categories.
//!
//! The presence of these four categories is a contract with senders; exact
//! wording is a product concern and may be tuned, but published replies must
//! include the article URL, and quality rejections must list the reported
//! issues so the sender can act on them.

/// Reply for a successfully published article.
///
/// Includes the public URL and, when more than one fragment was merged, a
/// note stating how many.
pub fn published(article_url: &str, fragment_count: usize) -> String {
    let mut reply = format!(
        "تم نشر الخبر بنجاح ✅\n\nرابط الخبر:\n{article_url}"
    );
    if fragment_count > 1 {
        reply.push_str(&format!(
            "\n\n(تم دمج {fragment_count} رسائل في خبر واحد)"
        ));
    }
    reply
}

/// Reply when the article was saved as a draft pending editorial review.
pub fn draft_saved() -> String {
    "تم استلام الخبر وحفظه كمسودة بانتظار مراجعة المحرر ✅".to_string()
}

/// Reply for a quality rejection, listing the AI-reported issues.
pub fn quality_rejected(issues: &[String]) -> String {
    let mut reply = String::from("عذراً، لم يتم نشر الخبر للأسباب التالية:");
    if issues.is_empty() {
        reply.push_str("\n• المحتوى لا يستوفي معايير النشر");
    } else {
        for issue in issues {
            reply.push_str("\n• ");
            reply.push_str(issue);
        }
    }
    reply.push_str("\n\nيمكنك تعديل النص وإعادة الإرسال.");
    reply
}

/// Generic failure reply for unexpected errors.
pub fn generic_failure() -> String {
    "عذراً، حدث خطأ أثناء معالجة رسالتك. الرجاء المحاولة مرة أخرى لاحقاً.".to_string()
}
