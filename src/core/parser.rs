// src/core/parser.rs
//! Groups spreadsheet rows into titled sections

use std::collections::HashMap;

use crate::types::cv_data::{ParsedSection, RawRow};

/// Turn raw rows (header first) into sections in first-appearance order.
///
/// A non-empty label opens or re-opens a section; a non-empty detail is appended
/// to whichever section is current. Details seen before any label are dropped.
pub fn parse(rows: &[RawRow]) -> Vec<ParsedSection> {
    let mut sections = SectionIndex::default();
    let mut current: Option<usize> = None;

    for row in rows.iter().skip(1) {
        if let Some(title) = trimmed(row.section.as_deref()) {
            current = Some(sections.entry(title));
        }

        if let (Some(detail), Some(position)) = (trimmed(row.detail.as_deref()), current) {
            sections.push_item(position, detail);
        }
    }

    sections.into_sections()
}

fn trimmed(cell: Option<&str>) -> Option<&str> {
    cell.map(str::trim).filter(|text| !text.is_empty())
}

/// Insertion-ordered sections with a title lookup
#[derive(Default)]
struct SectionIndex {
    sections: Vec<ParsedSection>,
    positions: HashMap<String, usize>,
}

impl SectionIndex {
    fn entry(&mut self, title: &str) -> usize {
        if let Some(&position) = self.positions.get(title) {
            return position;
        }

        let position = self.sections.len();
        self.sections.push(ParsedSection {
            title: title.to_string(),
            items: Vec::new(),
        });
        self.positions.insert(title.to_string(), position);
        position
    }

    fn push_item(&mut self, position: usize, item: &str) {
        if let Some(section) = self.sections.get_mut(position) {
            section.items.push(item.to_string());
        }
    }

    fn into_sections(self) -> Vec<ParsedSection> {
        self.sections
    }
}
