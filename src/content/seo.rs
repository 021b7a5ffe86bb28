//! SEO heuristic score for the post editor. A pure function of the
//! current draft fields; recomputed by the UI on every relevant change
//! and never persisted.

use serde::{Deserialize, Serialize};

/// The draft fields the score looks at. Field names match the editor's
/// form payload.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SeoInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, rename = "metaKeywords")]
    pub meta_keywords: String,
    #[serde(default, rename = "featuredImage")]
    pub featured_image: String,
}

#[derive(Debug, Serialize)]
pub struct SeoReport {
    pub score: u32,
    pub tips: Vec<String>,
}

/// Additive, independent rules; each evaluates the current field values
/// on its own, and the total is clamped to 100.
pub fn evaluate_seo(input: &SeoInput) -> SeoReport {
    let mut score = 0;
    let mut tips = Vec::new();

    // Title (50-60 characters is the sweet spot for result pages).
    let title_len = input.title.chars().count();
    if title_len > 0 {
        score += 10;
        if title_len < 30 {
            tips.push("Title is too short. Aim for 50-60 characters for optimal SEO.".to_string());
        } else if title_len > 70 {
            tips.push(
                "Title is too long. Keep it under 60 characters for better search engine display."
                    .to_string(),
            );
        } else {
            score += 10;
        }
    } else {
        tips.push("Add a descriptive title for your post.".to_string());
    }

    // Excerpt doubles as the meta description.
    let excerpt_len = input.excerpt.chars().count();
    if excerpt_len > 0 {
        score += 10;
        if excerpt_len < 100 {
            tips.push("Meta description is too short. Aim for 140-160 characters.".to_string());
        } else if excerpt_len > 170 {
            tips.push(
                "Meta description is too long. Keep it under 160 characters for better search engine display."
                    .to_string(),
            );
        } else {
            score += 10;
        }
    } else {
        tips.push(
            "Add a compelling meta description (excerpt) to improve click-through rates."
                .to_string(),
        );
    }

    let word_count = input.content.split_whitespace().count();
    if word_count > 0 {
        score += 10;
        if word_count < 300 {
            tips.push(format!(
                "Content is only {word_count} words. Aim for at least 300 words for better SEO."
            ));
        } else if word_count >= 800 {
            score += 20;
        } else {
            score += 10;
        }
    } else {
        tips.push("Add detailed, valuable content to your post.".to_string());
    }

    if !input.featured_image.is_empty() {
        score += 15;
    } else {
        tips.push("Add a featured image to improve engagement and social sharing.".to_string());
    }

    if !input.meta_keywords.is_empty() {
        score += 15;
    } else {
        tips.push(
            "Add relevant keywords to help search engines understand your content.".to_string(),
        );
    }

    SeoReport {
        score: score.min(100),
        tips,
    }
}
