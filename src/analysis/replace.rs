//! Standardized-term replacement suggestions.

use crate::config::TermPair;

/// One row of the "Replacements" sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementRow {
    pub word: String,
    pub replacement: String,
}

/// List each non-standard term found verbatim in the full text,
/// paired with its standardized counterpart, in mapping order.
/// Purely informational; the document is never mutated.
pub fn find_term_replacements(full_text: &str, mapping: &[TermPair]) -> Vec<ReplacementRow> {
    mapping
        .iter()
        .filter(|pair| full_text.contains(pair.from.as_str()))
        .map(|pair| ReplacementRow {
            word: pair.from.clone(),
            replacement: pair.to.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(pairs: &[(&str, &str)]) -> Vec<TermPair> {
        pairs
            .iter()
            .map(|(from, to)| TermPair {
                from: from.to_string(),
                to: to.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_every_present_key_reported_in_order() {
        let mapping = mapping(&[("होमवर्क", "गृहपाठ"), ("वर्कशीट", "वर्ग कार्यपत्रक")]);
        let text = "आज वर्कशीट आणि होमवर्क दोन्ही आहेत";
        let rows = find_term_replacements(text, &mapping);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].word, "होमवर्क");
        assert_eq!(rows[0].replacement, "गृहपाठ");
        assert_eq!(rows[1].word, "वर्कशीट");
    }

    #[test]
    fn test_absent_keys_skipped() {
        let mapping = mapping(&[("होमवर्क", "गृहपाठ")]);
        assert!(find_term_replacements("काही वेगळे", &mapping).is_empty());
    }
}
