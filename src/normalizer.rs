//! Text Normalization
//!
//! Cleans up recognized speech before it reaches the intent matcher.

use std::collections::HashMap;

/// Normalizes spoken text to fix common recognition errors
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer {
    /// Manual corrections from config, longest first
    corrections: Vec<(String, String)>,
}

impl TextNormalizer {
    pub fn new(corrections: HashMap<String, String>) -> Self {
        let mut corrections: Vec<(String, String)> = corrections
            .into_iter()
            .map(|(from, to)| (from.to_lowercase(), to))
            .filter(|(from, _)| !from.trim().is_empty())
            .collect();
        // Longer phrases first so "git hub" wins over "hub"
        corrections.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
        Self { corrections }
    }

    /// Lowercase, collapse whitespace, and apply whole-word corrections
    pub fn normalize(&self, text: &str) -> String {
        let mut result = collapse_whitespace(&text.to_lowercase());

        for (from, to) in &self.corrections {
            result = replace_words(&result, from, to);
        }

        collapse_whitespace(&result)
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Replace `from` only where it starts and ends on word boundaries
fn replace_words(text: &str, from: &str, to: &str) -> String {
    let padded = format!(" {} ", text);
    let needle = format!(" {} ", from);
    let replacement = format!(" {} ", to);

    let mut out = padded;
    while let Some(idx) = out.find(&needle) {
        out.replace_range(idx..idx + needle.len(), &replacement);
        if from.is_empty() || to.contains(from) {
            break;
        }
    }
    out.trim().to_string()
}
