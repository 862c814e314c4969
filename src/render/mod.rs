//! Brief rendering: record → typed block layout → paginated PDF.

pub mod pdf;

pub use pdf::render_pdf;

use crate::types::{BriefRecord, FieldValue};

pub const DOCUMENT_TITLE: &str = "MUSIC BRIEF GENERATOR";
pub const FOOTER_TEXT: &str =
    "Généré par Music Brief Generator • Brief professionnel pour production musicale";

/// One unit of document content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Title(String),
    Section(String),
    /// `Label: value` line from a mapping value.
    Entry { label: String, value: String },
    Bullet(String),
    Footer(String),
}

/// Ordered blocks for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    pub blocks: Vec<Block>,
}

/// Lay out a brief: title, one section per known field in canonical order,
/// footer. Unknown fields are ignored.
pub fn layout_brief(record: &BriefRecord) -> Layout {
    let mut blocks = vec![Block::Title(DOCUMENT_TITLE.to_string())];

    for (field, value) in record.sections() {
        blocks.push(Block::Section(field.title().to_string()));
        match value {
            FieldValue::Map(entries) => {
                blocks.extend(entries.into_iter().map(|(key, value)| Block::Entry {
                    label: label_from_key(&key),
                    value,
                }));
            }
            FieldValue::List(items) => {
                blocks.extend(items.into_iter().map(Block::Bullet));
            }
            FieldValue::Text(text) => {
                blocks.extend(text_bullets(&text).map(Block::Bullet));
            }
        }
    }

    blocks.push(Block::Footer(FOOTER_TEXT.to_string()));
    Layout { blocks }
}

/// `drum_bus_compression` → `Drum Bus Compression`.
pub fn label_from_key(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut label = String::with_capacity(spaced.len());
    let mut at_word_start = true;
    for c in spaced.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                label.extend(c.to_uppercase());
            } else {
                label.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            label.push(c);
            at_word_start = true;
        }
    }
    label
}

/// Non-blank lines of `text` with any leading `-`/`•` markers removed.
fn text_bullets(text: &str) -> impl Iterator<Item = String> + '_ {
    text.lines()
        .map(|line| line.trim().trim_start_matches(['-', '•']).trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_title_cased() {
        assert_eq!(label_from_key("low_end"), "Low End");
        assert_eq!(label_from_key("KICK_drum"), "Kick Drum");
        assert_eq!(label_from_key("mid-range"), "Mid-Range");
        assert_eq!(label_from_key("bus2_glue"), "Bus2 Glue");
    }

    #[test]
    fn text_lines_become_bullets_without_existing_markers() {
        let bullets: Vec<String> =
            text_bullets("- Kick on 1 and 3\n\n  • Snare on 2 and 4  \nHats 1/8\n--\n").collect();
        assert_eq!(bullets, vec!["Kick on 1 and 3", "Snare on 2 and 4", "Hats 1/8"]);
    }

    #[test]
    fn crlf_lines_are_split() {
        let bullets: Vec<String> = text_bullets("one\r\ntwo").collect();
        assert_eq!(bullets, vec!["one", "two"]);
    }
}
