//! Conservative text normalization applied to raw page text before chunking.
//!
//! The pipeline fixes spacing artifacts left by PDF extraction (run-together
//! words, missing spaces after punctuation), strips page furniture such as
//! standalone page numbers, and collapses the result into a single line.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use pagewise_core::Page;
use regex::Regex;
use serde::Serialize;

static CONTROL_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x{7F}-\x{9F}]").expect("valid control-char pattern")
});
static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid newline pattern"));

static HEADER_FOOTER: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)^\d+\s*$",
        r"(?i)^Page \d+ of \d+$",
        r"(?i)^Chapter \d+$",
        r"(?i)^Section \d+$",
        r"(?i)^Table of Contents$",
        r"(?i)^Index$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid header/footer pattern"))
    .collect()
});

static WORD_SPACING: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // "BySunTzu" -> "By Sun Tzu"
        r"([a-z])([A-Z])",
        r"(\.)([A-Z])",
        r"(\d)([A-Za-z])",
        r"([A-Za-z])(\d)",
        r"([.!?;:])([A-Za-z])",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid spacing pattern"))
    .collect()
});

static INLINE_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").expect("valid whitespace pattern"));
static ANY_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));
static ALL_CAPS_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Z\s]{3,}$").expect("valid header pattern"));

/// A normalization step that was applied to a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transformation {
    BasicCleaning,
    RemoveHeadersFooters,
    FixWordSpacing,
    NormalizeWhitespace,
    PreserveStructure,
    FinalCleanup,
}

impl fmt::Display for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Transformation::BasicCleaning => "basic_cleaning",
            Transformation::RemoveHeadersFooters => "remove_headers_footers",
            Transformation::FixWordSpacing => "fix_word_spacing",
            Transformation::NormalizeWhitespace => "normalize_whitespace",
            Transformation::PreserveStructure => "preserve_structure",
            Transformation::FinalCleanup => "final_cleanup",
        };
        f.write_str(name)
    }
}

/// Output of normalizing one text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedText {
    pub text: String,
    /// Character length of the input.
    pub original_length: usize,
    /// Character length of `text`.
    pub normalized_length: usize,
    pub word_count: usize,
    /// Rough token estimate: 1.3 tokens per word.
    pub token_estimate: usize,
    pub transformations: Vec<Transformation>,
}

impl NormalizedText {
    /// Wrap text that was already normalized upstream; no steps are applied.
    pub fn passthrough(text: &str) -> Self {
        let word_count = text.split_whitespace().count();
        let length = text.chars().count();
        Self {
            text: text.to_string(),
            original_length: length,
            normalized_length: length,
            word_count,
            token_estimate: word_count * 13 / 10,
            transformations: Vec::new(),
        }
    }

    fn empty() -> Self {
        Self {
            text: String::new(),
            original_length: 0,
            normalized_length: 0,
            word_count: 0,
            token_estimate: 0,
            transformations: Vec::new(),
        }
    }
}

/// A page after normalization, keeping its page number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedPage {
    pub page_number: usize,
    #[serde(flatten)]
    pub normalized: NormalizedText,
}

impl NormalizedPage {
    /// The page as the chunking engine consumes it.
    pub fn to_page(&self) -> Page {
        Page::new(self.page_number, self.normalized.text.clone())
    }
}

/// Aggregate numbers over a batch of normalized texts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizationStats {
    pub total_texts: usize,
    pub total_original_length: usize,
    pub total_normalized_length: usize,
    pub compression_ratio: f64,
    pub total_words: usize,
    pub total_estimated_tokens: usize,
    pub average_words_per_text: f64,
    pub transformation_counts: BTreeMap<String, usize>,
}

impl NormalizationStats {
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a NormalizedText>) -> Self {
        let mut stats = Self::default();
        for result in results {
            stats.total_texts += 1;
            stats.total_original_length += result.original_length;
            stats.total_normalized_length += result.normalized_length;
            stats.total_words += result.word_count;
            stats.total_estimated_tokens += result.token_estimate;
            for t in &result.transformations {
                *stats.transformation_counts.entry(t.to_string()).or_insert(0) += 1;
            }
        }
        if stats.total_original_length > 0 {
            stats.compression_ratio =
                stats.total_normalized_length as f64 / stats.total_original_length as f64;
        }
        if stats.total_texts > 0 {
            stats.average_words_per_text = stats.total_words as f64 / stats.total_texts as f64;
        }
        stats
    }
}

/// Conservative normalizer that preserves meaning while fixing spacing issues.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    /// Prefix ALL-CAPS lines with `HEADER: ` so headings survive the final
    /// whitespace collapse.
    pub preserve_structure: bool,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self {
            preserve_structure: true,
        }
    }
}

impl TextNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn normalize(&self, text: &str) -> NormalizedText {
        if text.trim().is_empty() {
            return NormalizedText::empty();
        }

        let mut transformations = Vec::new();

        let mut out = basic_cleaning(text);
        transformations.push(Transformation::BasicCleaning);

        out = remove_headers_footers(&out);
        transformations.push(Transformation::RemoveHeadersFooters);

        out = fix_word_spacing(&out);
        transformations.push(Transformation::FixWordSpacing);

        out = normalize_whitespace(&out);
        transformations.push(Transformation::NormalizeWhitespace);

        if self.preserve_structure {
            out = mark_headers(&out);
            transformations.push(Transformation::PreserveStructure);
        }

        out = final_cleanup(&out);
        transformations.push(Transformation::FinalCleanup);

        let word_count = out.split_whitespace().count();
        NormalizedText {
            original_length: text.chars().count(),
            normalized_length: out.chars().count(),
            word_count,
            token_estimate: word_count * 13 / 10,
            transformations,
            text: out,
        }
    }

    /// Normalize every page, keeping page numbers.
    pub fn normalize_pages(&self, pages: &[Page]) -> Vec<NormalizedPage> {
        tracing::info!("Normalizing {} pages", pages.len());
        pages
            .iter()
            .map(|page| NormalizedPage {
                page_number: page.page_number,
                normalized: self.normalize(&page.text),
            })
            .collect()
    }
}

fn basic_cleaning(text: &str) -> String {
    let text = CONTROL_CHARS.replace_all(text, "");
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    EXCESS_NEWLINES.replace_all(&text, "\n\n").into_owned()
}

fn remove_headers_footers(text: &str) -> String {
    text.split('\n')
        .map(str::trim)
        .filter(|line| line.is_empty() || !HEADER_FOOTER.iter().any(|re| re.is_match(line)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn fix_word_spacing(text: &str) -> String {
    let mut out = text.to_string();
    for re in WORD_SPACING.iter() {
        out = re.replace_all(&out, "${1} ${2}").into_owned();
    }
    out
}

fn normalize_whitespace(text: &str) -> String {
    let collapsed = INLINE_WHITESPACE.replace_all(text, " ");
    let lines: Vec<&str> = collapsed.split('\n').map(str::trim).collect();

    let start = lines.iter().position(|l| !l.is_empty()).unwrap_or(lines.len());
    let end = lines.iter().rposition(|l| !l.is_empty()).map_or(start, |i| i + 1);
    lines[start..end].join("\n")
}

fn mark_headers(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            let trimmed = line.trim();
            if ALL_CAPS_LINE.is_match(trimmed) {
                format!("HEADER: {trimmed}")
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn final_cleanup(text: &str) -> String {
    let mut out = ANY_WHITESPACE.replace_all(text, " ").trim().to_string();
    if let Some(last) = out.chars().last() {
        if !matches!(last, '.' | '!' | '?' | ';' | ':') {
            out.push('.');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_blank_input() {
        let normalizer = TextNormalizer::new();
        assert_eq!(normalizer.normalize(""), NormalizedText::empty());
        assert_eq!(normalizer.normalize(" \n\t"), NormalizedText::empty());
    }

    #[test]
    fn splits_run_together_words() {
        let out = TextNormalizer::new().normalize("BySunTzu the art of war");
        assert_eq!(out.text, "By Sun Tzu the art of war.");
        assert_eq!(out.word_count, 7);
        assert_eq!(out.token_estimate, 9);
    }

    #[test]
    fn spaces_after_punctuation_and_digits() {
        let out = TextNormalizer::new().normalize("Chapter one.Next line;then 3days");
        assert_eq!(out.text, "Chapter one. Next line; then 3 days.");
    }

    #[test]
    fn drops_page_furniture_lines() {
        let raw = "Page 3 of 10\nReal content here.\n42\nTABLE OF CONTENTS\nMore content.";
        let out = TextNormalizer::new().normalize(raw);
        assert_eq!(out.text, "Real content here. More content.");
    }

    #[test]
    fn marks_all_caps_headers() {
        let out = TextNormalizer::new().normalize("THE ART OF WAR\nLaying plans.");
        assert_eq!(out.text, "HEADER: THE ART OF WAR Laying plans.");
        assert!(out.transformations.contains(&Transformation::PreserveStructure));

        let plain = TextNormalizer {
            preserve_structure: false,
        }
        .normalize("THE ART OF WAR\nLaying plans.");
        assert_eq!(plain.text, "THE ART OF WAR Laying plans.");
        assert!(!plain.transformations.contains(&Transformation::PreserveStructure));
    }

    #[test]
    fn strips_control_characters_and_keeps_terminal_punctuation() {
        let out = TextNormalizer::new().normalize("Alert\u{0007} raised!\r\n\r\n\r\n\r\nDone?");
        assert_eq!(out.text, "Alert raised! Done?");
    }

    #[test]
    fn lengths_are_in_characters() {
        let out = TextNormalizer::new().normalize("café au lait");
        assert_eq!(out.original_length, 12);
        assert_eq!(out.normalized_length, 13);
    }

    #[test]
    fn stats_aggregate_results() {
        let normalizer = TextNormalizer::new();
        let pages = vec![Page::new(1, "One two three"), Page::new(2, "")];
        let normalized = normalizer.normalize_pages(&pages);
        assert_eq!(normalized[1].to_page(), Page::new(2, ""));

        let stats = NormalizationStats::from_results(normalized.iter().map(|p| &p.normalized));
        assert_eq!(stats.total_texts, 2);
        assert_eq!(stats.total_words, 3);
        assert_eq!(stats.total_original_length, 13);
        assert_eq!(stats.total_normalized_length, 14);
        assert_eq!(stats.transformation_counts.get("final_cleanup"), Some(&1));
        assert!((stats.average_words_per_text - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn passthrough_keeps_text() {
        let out = NormalizedText::passthrough("Already clean text");
        assert_eq!(out.text, "Already clean text");
        assert_eq!(out.original_length, out.normalized_length);
        assert_eq!(out.word_count, 3);
        assert!(out.transformations.is_empty());
    }

    #[test]
    fn stats_of_nothing_are_zero() {
        let stats = NormalizationStats::from_results(std::iter::empty());
        assert_eq!(stats, NormalizationStats::default());
    }
}
