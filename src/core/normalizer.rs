// src/core/normalizer.rs
//! Merges parsed Arabic sections with their translations

use crate::types::cv_data::{CvSection, ParsedSection, TranslatedSection};
use crate::utils::slugify;

/// One CV section per translated section, in the translation's order.
///
/// Arabic items are matched by exact title equality; an unmatched title yields
/// empty `ar_items`. Ids are slugs of the English title and may collide.
pub fn normalize(original: &[ParsedSection], translated: Vec<TranslatedSection>) -> Vec<CvSection> {
    translated
        .into_iter()
        .map(|section| {
            let ar_items = find_items(original, &section.ar_title);
            CvSection {
                id: slugify(&section.en_title),
                ar_title: section.ar_title,
                ar_items,
                en_title: section.en_title,
                en_items: section.en_items,
                icon: section.icon,
            }
        })
        .collect()
}

/// Translated titles with no exact counterpart among the parsed sections
pub fn unmatched_titles<'a>(
    original: &[ParsedSection],
    translated: &'a [TranslatedSection],
) -> Vec<&'a str> {
    translated
        .iter()
        .filter(|t| !original.iter().any(|o| o.title == t.ar_title))
        .map(|t| t.ar_title.as_str())
        .collect()
}

fn find_items(original: &[ParsedSection], ar_title: &str) -> Vec<String> {
    original
        .iter()
        .find(|section| section.title == ar_title)
        .map(|section| section.items.clone())
        .unwrap_or_default()
}
