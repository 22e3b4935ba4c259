use crate::document::{Document, Section};

use super::status::{keyword_positions, mentions_limitation, mentions_strength};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Half {
    First,
    Second,
}

/// Where the limitations discussion sits inside a mixed
/// "strengths and limitations" section. Positions index the section's own
/// sentence list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitationZone {
    /// From the first sentence mentioning a limitation through the next one
    /// mentioning a strength (or the section end).
    Markers { begin: usize, end: usize },
    /// No marker sentence; the title keyword order decides which half of the
    /// section discusses limitations.
    TitleOrder { midpoint: usize, limitation_half: Half },
    /// Title order could not be decided.
    Undecided,
}

impl LimitationZone {
    pub fn covers(&self, position: usize) -> bool {
        match *self {
            Self::Markers { begin, end } => begin <= position && position <= end,
            Self::TitleOrder {
                midpoint,
                limitation_half: Half::First,
            } => position < midpoint,
            Self::TitleOrder {
                midpoint,
                limitation_half: Half::Second,
            } => position >= midpoint,
            Self::Undecided => false,
        }
    }
}

pub fn plan_limitation_zone(document: &Document, section: &Section) -> LimitationZone {
    let sentences = document.section_sentences(section);

    let mut begin = None;
    let mut end = None;
    for (position, sentence) in sentences.iter().enumerate() {
        if section.overlaps_title(sentence.span) {
            continue;
        }
        let text = sentence.text.to_lowercase();
        if begin.is_none() {
            if mentions_limitation(&text) {
                begin = Some(position);
            }
        } else if mentions_strength(&text) {
            end = Some(position);
            break;
        }
    }

    if let Some(begin) = begin {
        let end = end.unwrap_or(sentences.len().saturating_sub(1));
        return LimitationZone::Markers { begin, end };
    }

    let title = document.title_of(section).unwrap_or_default().to_lowercase();
    let midpoint = sentences.len() / 2;
    match keyword_positions(&title) {
        (Some(strength), Some(limitation)) if strength < limitation => {
            LimitationZone::TitleOrder {
                midpoint,
                limitation_half: Half::Second,
            }
        }
        (Some(strength), Some(limitation)) if limitation < strength => {
            LimitationZone::TitleOrder {
                midpoint,
                limitation_half: Half::First,
            }
        }
        _ => LimitationZone::Undecided,
    }
}
