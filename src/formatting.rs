// Code formatting and free-text normalization helpers

use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static PHONE_NOISE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\d+]").expect("valid regex"));
static TAX_ID_NOISE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s.]").expect("valid regex"));

/// Formats a human-readable document code: `COT-000042`
pub fn format_code(prefix: &str, sequence: i64, width: usize) -> String {
    format!("{}-{:0width$}", prefix, sequence, width = width)
}

/// Placeholder code written at insert time, replaced once the row id is known
pub fn temporary_code() -> String {
    format!("TMP-{}", uuid::Uuid::new_v4().simple())
}

/// Trims and collapses inner whitespace; empty input becomes None
pub fn normalize_text(value: Option<&str>) -> Option<String> {
    let collapsed = WHITESPACE.replace_all(value?.trim(), " ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed.into_owned())
    }
}

/// Collapses whitespace and capitalizes each word ("  ana  MARÍA " -> "Ana María")
pub fn normalize_name(value: &str) -> String {
    WHITESPACE
        .split(value.trim())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lower-cased, trimmed email used for lookups and uniqueness
pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Keeps digits and a leading `+`
pub fn normalize_phone(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    let plus = if trimmed.starts_with('+') { "+" } else { "" };
    let digits = PHONE_NOISE.replace_all(trimmed, "").replace('+', "");
    if digits.is_empty() {
        None
    } else {
        Some(format!("{}{}", plus, digits))
    }
}

/// Tax id without dots or spaces, upper-cased ("12.345.678-k" -> "12345678-K")
pub fn normalize_tax_id(value: Option<&str>) -> Option<String> {
    let cleaned = TAX_ID_NOISE.replace_all(value?.trim(), "").to_uppercase();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Optional free-text fields collected from a quote request
#[derive(Debug, Default, Clone)]
pub struct ObservationFields<'a> {
    pub notes: Option<&'a str>,
    pub project_type: Option<&'a str>,
    pub region: Option<&'a str>,
    pub location: Option<&'a str>,
    pub details: Option<&'a str>,
}

/// Joins the non-empty fields into one labelled block, one per line
pub fn build_observations(fields: &ObservationFields<'_>) -> Option<String> {
    let labelled = [
        ("Notes", fields.notes),
        ("Project type", fields.project_type),
        ("Region", fields.region),
        ("Location", fields.location),
        ("Details", fields.details),
    ];

    let lines: Vec<String> = labelled
        .into_iter()
        .filter_map(|(label, value)| normalize_text(value).map(|text| format!("{}: {}", label, text)))
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}
