//! Rule-based limitation sentence labeling.
//!
//! Every sentence receives a label. Missing structure (no enclosing
//! top-level section, no title, no resolvable paragraph) always yields NEG.

use clap::ValueEnum;
use tracing::debug;

use crate::document::{Document, Section, Sentence};
use crate::lexical::LexicalCues;
use crate::model::Label;
use crate::paragraph::paragraph_prefix;

mod status;
#[cfg(test)]
mod tests;
mod zone;

pub use status::{SectionStatus, passes_top_level_gate, section_status};
pub use zone::plan_limitation_zone;

/// Named labeling configurations, kept side by side so their output can be
/// compared on the same corpus.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum Variant {
    /// Section rules without suppression; paragraph cues must not be citations.
    Loose,
    /// Section rules with the narrow trailing-keyword paragraph cue.
    Baseline,
    /// Section rules with every suppression cue applied.
    Strict,
    /// Paragraph cue only, for articles without section structure.
    ParagraphOnly,
    /// Whole-article screening: any limitation-titled section counts, and
    /// paragraphs are cued by any limitation-like word.
    DocumentLevel,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ParagraphCue {
    TrailingKeyword,
    Introductory,
    /// Any of limitation, weakness, shortcoming or drawback.
    Relaxed,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct VariantRules {
    pub section_rules: bool,
    pub paragraph_cue: ParagraphCue,
    pub skip_citing_cues: bool,
    pub suppress: bool,
    /// Mixed strengths/limitations sections are positive throughout instead
    /// of only inside their limitation zone.
    pub whole_mixed_sections: bool,
}

impl Variant {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Loose => "loose",
            Self::Baseline => "baseline",
            Self::Strict => "strict",
            Self::ParagraphOnly => "paragraph-only",
            Self::DocumentLevel => "document-level",
        }
    }

    pub fn rules(self) -> VariantRules {
        match self {
            Self::Loose => VariantRules {
                section_rules: true,
                paragraph_cue: ParagraphCue::Introductory,
                skip_citing_cues: true,
                suppress: false,
                whole_mixed_sections: false,
            },
            Self::Baseline => VariantRules {
                section_rules: true,
                paragraph_cue: ParagraphCue::TrailingKeyword,
                skip_citing_cues: false,
                suppress: false,
                whole_mixed_sections: false,
            },
            Self::Strict => VariantRules {
                section_rules: true,
                paragraph_cue: ParagraphCue::Introductory,
                skip_citing_cues: false,
                suppress: true,
                whole_mixed_sections: false,
            },
            Self::ParagraphOnly => VariantRules {
                section_rules: false,
                paragraph_cue: ParagraphCue::Introductory,
                skip_citing_cues: false,
                suppress: false,
                whole_mixed_sections: false,
            },
            Self::DocumentLevel => VariantRules {
                section_rules: true,
                paragraph_cue: ParagraphCue::Relaxed,
                skip_citing_cues: true,
                suppress: false,
                whole_mixed_sections: true,
            },
        }
    }
}

#[derive(Debug)]
pub struct SentenceLabeler<'a> {
    cues: &'a LexicalCues,
    variant: Variant,
    rules: VariantRules,
}

impl<'a> SentenceLabeler<'a> {
    pub fn new(cues: &'a LexicalCues, variant: Variant) -> Self {
        Self {
            cues,
            variant,
            rules: variant.rules(),
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Labels in document sentence order.
    pub fn label_document(&self, document: &Document) -> Vec<Label> {
        document
            .sentences()
            .iter()
            .map(|sentence| self.label(document, sentence))
            .collect()
    }

    pub fn label(&self, document: &Document, sentence: &Sentence) -> Label {
        if !self.rules.section_rules {
            return if self.in_limitation_paragraph(document, sentence) {
                Label::Pos
            } else {
                Label::Neg
            };
        }

        let Some(top) = document.top_section(sentence) else {
            return Label::Neg;
        };
        let Some(top_title) = document.title_of(top) else {
            return Label::Neg;
        };
        if !passes_top_level_gate(top_title) {
            return Label::Neg;
        }

        let section = document.section_of(sentence).unwrap_or(top);
        let status = section_status(document, section);
        debug!(
            document_id = %document.id,
            sentence_id = %sentence.id,
            status = status.as_str(),
            "section status"
        );
        match status {
            SectionStatus::LimitOnly => self.confirm(document, sentence),
            SectionStatus::None => {
                if self.in_limitation_paragraph(document, sentence) {
                    debug!(
                        document_id = %document.id,
                        sentence_id = %sentence.id,
                        "sentence in limitation paragraph"
                    );
                    self.confirm(document, sentence)
                } else {
                    Label::Neg
                }
            }
            SectionStatus::Both if self.rules.whole_mixed_sections => {
                self.confirm(document, sentence)
            }
            SectionStatus::Both => self.label_in_mixed_section(document, section, sentence),
        }
    }

    /// Whether any sentence from the paragraph start through `sentence`
    /// carries this variant's paragraph cue.
    pub fn in_limitation_paragraph(&self, document: &Document, sentence: &Sentence) -> bool {
        paragraph_prefix(document, sentence).iter().any(|candidate| {
            let cued = match self.rules.paragraph_cue {
                ParagraphCue::TrailingKeyword => self.cues.ends_with_limitation_keyword(candidate),
                ParagraphCue::Introductory => {
                    self.cues.is_introductory_limitation_sentence(candidate)
                }
                ParagraphCue::Relaxed => self.cues.mentions_limitation_like_word(candidate),
            };
            cued && !(self.rules.skip_citing_cues && self.cues.is_citation_sentence(candidate))
        })
    }

    fn label_in_mixed_section(
        &self,
        document: &Document,
        section: &Section,
        sentence: &Sentence,
    ) -> Label {
        let Some(position) = section
            .sentence_indices()
            .iter()
            .position(|index| *index == sentence.index)
        else {
            return Label::Neg;
        };

        let zone = plan_limitation_zone(document, section);
        if zone.covers(position) {
            self.confirm(document, sentence)
        } else {
            Label::Neg
        }
    }

    fn confirm(&self, document: &Document, sentence: &Sentence) -> Label {
        if self.rules.suppress && self.cues.should_suppress(document, sentence) {
            Label::Neg
        } else {
            Label::Pos
        }
    }
}
