//! Keyword-based legal topic classifier.
//!
//! Routes free text to one of a fixed set of categories without a model
//! call. The table is evaluated in declaration order; the first category
//! with any substring hit wins, so overlapping keyword sets are resolved
//! by priority, not by match count or position.

use crate::types::Category;

/// Ordered rule table: category priority is declaration order.
///
/// Matching is case-sensitive whole-text `contains`, not tokenized, so the
/// entries are Arabic stems where inflected forms matter (e.g. "زوج" also
/// hits "زوجتي" and "زواج", "طلق" also hits "أطلق").
const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Civil,
        &["عقد", "إيجار", "بيع", "شراء", "ملكية", "تعويض"],
    ),
    (
        Category::Criminal,
        &["جريمة", "سرقة", "قتل", "اعتداء", "جنائي"],
    ),
    (Category::Commercial, &["شركة", "تجارة", "إفلاس", "شيك"]),
    (
        Category::Family,
        &["طلاق", "طلق", "نفقة", "حضانة", "زواج", "زوج", "ميراث"],
    ),
    (Category::Labor, &["عمل", "فصل", "راتب", "إجازة"]),
];

/// Classify a query into a legal topic.
///
/// Total and deterministic: returns the default category when no keyword
/// matches (including for empty input).
pub fn classify(text: &str) -> Category {
    for (category, keywords) in CATEGORY_KEYWORDS {
        if keywords.iter().any(|kw| text.contains(kw)) {
            return *category;
        }
    }
    Category::default()
}

// =============================================================================
// Tests
// =============================================================================
