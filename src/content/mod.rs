//! Pure text analysis for the editor and the rendering path: slug
//! derivation, reading-time estimation, heading/TOC extraction and the
//! SEO heuristic score. Everything here is synchronous and stateless.

pub mod seo;
pub mod toc;

/// Derives a URL-safe slug: lowercase, non-word characters stripped,
/// whitespace collapsed to single hyphens, consecutive hyphens merged.
pub fn slugify(input: &str) -> String {
    let lowered = input.to_lowercase();
    let cleaned: String = lowered
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect();

    let hyphenated = cleaned.split_whitespace().collect::<Vec<_>>().join("-");

    let mut slug = String::with_capacity(hyphenated.len());
    let mut prev_hyphen = false;
    for c in hyphenated.chars() {
        if c == '-' {
            if !prev_hyphen {
                slug.push('-');
            }
            prev_hyphen = true;
        } else {
            slug.push(c);
            prev_hyphen = false;
        }
    }

    slug.trim_matches('-').to_string()
}

/// Estimated reading time in minutes at 200 words per minute, rounded
/// up, never below one minute.
pub fn reading_time(content: &str) -> i32 {
    let words = content.split_whitespace().count();
    words.div_ceil(200).max(1) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_strips_punctuation_and_hyphenates() {
        assert_eq!(slugify("Senior SWE Internship!"), "senior-swe-internship");
    }

    #[test]
    fn slugify_collapses_whitespace_runs() {
        assert_eq!(slugify("  Remote   Summer \t Roles "), "remote-summer-roles");
    }

    #[test]
    fn slugify_merges_consecutive_hyphens() {
        assert_eq!(slugify("Rust - The Good Parts"), "rust-the-good-parts");
    }

    #[test]
    fn slugify_of_symbols_only_is_empty() {
        assert_eq!(slugify("!!! ???"), "");
    }

    #[test]
    fn reading_time_rounds_up() {
        let content = vec!["word"; 450].join(" ");
        assert_eq!(reading_time(&content), 3);
    }

    #[test]
    fn reading_time_has_one_minute_floor() {
        assert_eq!(reading_time(""), 1);
        assert_eq!(reading_time("just a few words"), 1);
    }

    #[test]
    fn reading_time_exact_multiple() {
        let content = vec!["w"; 400].join(" ");
        assert_eq!(reading_time(&content), 2);
    }
}
