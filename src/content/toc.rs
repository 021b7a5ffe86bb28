//! Heading scan and table-of-contents extraction over HTML content.
//!
//! This is a best-effort, non-validating scan: headings whose open and
//! close levels disagree are skipped, never an error. Anchor ids are
//! slugified from the heading's visible text, deduplicated with a `-2`,
//! `-3`, ... suffix, with a `heading-N` fallback when the text slugifies
//! to nothing. The persisted TOC and the rendered anchors use the same
//! strategy, so in-page links always resolve.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use super::slugify;

/// One TOC record, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    pub id: String,
    pub text: String,
    pub level: u8,
}

// The close level is captured separately because the regex engine has no
// backreferences; mismatched pairs are filtered in code.
static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<h([1-6])\b([^>]*)>(.*?)</h([1-6])\s*>").expect("heading pattern")
});

static INNER_TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("inner tag pattern"));

static ID_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|\s)id\s*=\s*"([^"]*)""#).expect("id attribute pattern")
});

static EMPTY_ID_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\s+id\s*=\s*"""#).expect("empty id attribute pattern"));

/// Tracks assigned anchor ids so duplicates stay unique within one
/// document.
struct AnchorIds {
    used: HashSet<String>,
    fallback_counter: usize,
}

impl AnchorIds {
    fn new() -> Self {
        Self {
            used: HashSet::new(),
            fallback_counter: 0,
        }
    }

    fn reserve(&mut self, id: &str) {
        self.used.insert(id.to_string());
    }

    fn assign(&mut self, text: &str) -> String {
        let base = slugify(text);
        if base.is_empty() {
            let id = format!("heading-{}", self.fallback_counter);
            self.fallback_counter += 1;
            self.used.insert(id.clone());
            return id;
        }

        if self.used.insert(base.clone()) {
            return base;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{base}-{n}");
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

fn heading_text(raw: &str) -> String {
    INNER_TAGS.replace_all(raw, "").trim().to_string()
}

fn existing_id(attrs: &str) -> Option<String> {
    ID_ATTR
        .captures(attrs)
        .map(|caps| caps[1].to_string())
        .filter(|id| !id.is_empty())
}

fn well_formed(caps: &Captures) -> Option<u8> {
    let open: u8 = caps[1].parse().ok()?;
    let close: u8 = caps[4].parse().ok()?;
    (open == close).then_some(open)
}

/// Scans `content` for headings in `levels` and returns the ordered TOC.
/// Headings that already carry an `id` attribute keep it.
pub fn scan_headings(content: &str, levels: std::ops::RangeInclusive<u8>) -> Vec<TocEntry> {
    let mut ids = AnchorIds::new();
    let mut toc = Vec::new();

    for caps in HEADING.captures_iter(content) {
        let Some(level) = well_formed(&caps) else {
            continue;
        };
        if !levels.contains(&level) {
            continue;
        }

        let text = heading_text(&caps[3]);
        let id = match existing_id(&caps[2]) {
            Some(id) => {
                ids.reserve(&id);
                id
            }
            None => ids.assign(&text),
        };

        toc.push(TocEntry { id, text, level });
    }

    toc
}

/// Save-path TOC, serialized for the `toc` column. Ids are assigned
/// across h1-h3 so they line up with the rendered anchors; only the
/// h2-h3 records are persisted.
pub fn generate_toc(content: &str) -> String {
    let toc: Vec<TocEntry> = scan_headings(content, 1..=3)
        .into_iter()
        .filter(|entry| entry.level >= 2)
        .collect();
    serde_json::to_string(&toc).unwrap_or_else(|_| "[]".to_string())
}

/// Render-path rewrite over h1-h3: inserts an `id` attribute on every
/// heading that lacks one, leaving everything else untouched.
pub fn ensure_heading_ids(content: &str) -> String {
    let mut ids = AnchorIds::new();

    HEADING
        .replace_all(content, |caps: &Captures| {
            let Some(level) = well_formed(caps) else {
                return caps[0].to_string();
            };
            if !(1..=3).contains(&level) {
                return caps[0].to_string();
            }

            let attrs = &caps[2];
            if let Some(id) = existing_id(attrs) {
                ids.reserve(&id);
                return caps[0].to_string();
            }

            // An empty id="" would otherwise survive next to the
            // generated one as a duplicate attribute.
            let attrs = EMPTY_ID_ATTR.replace_all(attrs, "");
            let inner = &caps[3];
            let id = ids.assign(&heading_text(inner));
            format!("<h{level}{attrs} id=\"{id}\">{inner}</h{level}>")
        })
        .into_owned()
}

/// Render-path TOC over h1-h3. Run on content that went through
/// [`ensure_heading_ids`] so every heading carries an anchor.
pub fn extract_toc(content: &str) -> Vec<TocEntry> {
    scan_headings(content, 1..=3)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "<h2>Introduction</h2><p>hi</p>\
        <h3>Getting Started</h3><p>body</p>\
        <h2>Wrapping <em>Up</em></h2>";

    #[test]
    fn entries_come_back_in_document_order() {
        let toc = scan_headings(SAMPLE, 2..=3);
        let texts: Vec<_> = toc.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, ["Introduction", "Getting Started", "Wrapping Up"]);
        let levels: Vec<_> = toc.iter().map(|e| e.level).collect();
        assert_eq!(levels, [2, 3, 2]);
    }

    #[test]
    fn only_configured_levels_are_captured() {
        let content = "<h1>Page Title</h1><h2>Section</h2><h4>Deep</h4>";
        let toc = scan_headings(content, 2..=3);
        assert_eq!(toc.len(), 1);
        assert_eq!(toc[0].text, "Section");
    }

    #[test]
    fn nested_markup_is_stripped_from_text_and_slug() {
        let toc = scan_headings("<h2>Wrapping <em>Up</em></h2>", 2..=3);
        assert_eq!(toc[0].text, "Wrapping Up");
        assert_eq!(toc[0].id, "wrapping-up");
    }

    #[test]
    fn mismatched_close_tag_is_skipped() {
        let toc = scan_headings("<h2>Broken</h3><h2>Fine</h2>", 2..=3);
        assert_eq!(toc.len(), 1);
        assert_eq!(toc[0].text, "Fine");
    }

    #[test]
    fn no_headings_means_empty_toc() {
        assert!(scan_headings("<p>just a paragraph</p>", 2..=3).is_empty());
        assert_eq!(generate_toc("<p>just a paragraph</p>"), "[]");
    }

    #[test]
    fn duplicate_headings_get_suffixed_ids() {
        let toc = scan_headings("<h2>Tips</h2><h2>Tips</h2><h2>Tips</h2>", 2..=3);
        let ids: Vec<_> = toc.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["tips", "tips-2", "tips-3"]);
    }

    #[test]
    fn symbol_only_heading_falls_back_to_counter_id() {
        let toc = scan_headings("<h2>???</h2><h2>!!!</h2>", 2..=3);
        let ids: Vec<_> = toc.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["heading-0", "heading-1"]);
    }

    #[test]
    fn generate_toc_serializes_records() {
        let json = generate_toc("<h2>Introduction</h2>");
        let parsed: Vec<TocEntry> = serde_json::from_str(&json).unwrap();
        assert_eq!(
            parsed,
            vec![TocEntry {
                id: "introduction".to_string(),
                text: "Introduction".to_string(),
                level: 2,
            }]
        );
    }

    #[test]
    fn ensure_heading_ids_adds_missing_anchors() {
        let out = ensure_heading_ids("<h2 class=\"big\">My Section</h2>");
        assert_eq!(out, "<h2 class=\"big\" id=\"my-section\">My Section</h2>");
    }

    #[test]
    fn ensure_heading_ids_keeps_existing_anchors() {
        let input = "<h2 id=\"custom\">My Section</h2>";
        assert_eq!(ensure_heading_ids(input), input);
    }

    #[test]
    fn ensure_heading_ids_then_extract_round_trips() {
        let processed = ensure_heading_ids("<h1>Title</h1><h2>Part</h2><h3>Sub</h3>");
        let toc = extract_toc(&processed);
        let ids: Vec<_> = toc.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["title", "part", "sub"]);
    }

    #[test]
    fn save_and_render_paths_agree_on_ids() {
        let content = "<h2>Apply Early</h2><h3>Apply Early</h3>";
        let saved: Vec<TocEntry> = serde_json::from_str(&generate_toc(content)).unwrap();
        let rendered = extract_toc(&ensure_heading_ids(content));
        assert_eq!(saved, rendered);
    }

    #[test]
    fn save_path_reserves_ids_for_colliding_h1_headings() {
        let content = "<h1>Tips</h1><h2>Tips</h2>";

        let saved: Vec<TocEntry> = serde_json::from_str(&generate_toc(content)).unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].level, 2);
        assert_eq!(saved[0].id, "tips-2");

        let rendered = extract_toc(&ensure_heading_ids(content));
        let rendered_h2 = rendered.iter().find(|e| e.level == 2).unwrap();
        assert_eq!(saved[0].id, rendered_h2.id);
    }

    #[test]
    fn empty_id_attribute_is_replaced_not_duplicated() {
        let out = ensure_heading_ids("<h2 id=\"\" class=\"big\">My Section</h2>");
        assert_eq!(out, "<h2 class=\"big\" id=\"my-section\">My Section</h2>");
    }
}
