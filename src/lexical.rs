//! Lexical cues over a single sentence.

use anyhow::{Context, Result};
use regex::Regex;
use tracing::debug;

use crate::document::{Document, Sentence};
use crate::paragraph::paragraph_sentences;

/// Ordinal markers that open an item of an enumerated list.
pub const LIST_MARKERS: &[&str] = &[
    "first", "firstly", "second", "secondly", "third", "thirdly", "fourth", "fifth", "lastly",
    "finally",
];

pub const CONTRASTIVE_OPENERS: &[&str] = &["however", "nonetheless", "nevertheless"];

/// Sentences at or below this many tokens that mention limitations anywhere
/// read as headings in prose form.
const SHORT_SENTENCE_TOKENS: usize = 10;

#[derive(Debug)]
pub struct LexicalCues {
    bracket_citation: Regex,
    trailing_reference: Regex,
    trailing_keyword: Regex,
    any_keyword: Regex,
    limitation_like: Regex,
}

impl LexicalCues {
    pub fn new() -> Result<Self> {
        Ok(Self {
            bracket_citation: Regex::new(r"\[[0-9,\-]+\]")
                .context("failed to compile bracket citation regex")?,
            trailing_reference: Regex::new(r"\.[0-9,\-]+$")
                .context("failed to compile trailing reference regex")?,
            trailing_keyword: Regex::new(r"\b(?:limitations|weaknesses)[[:punct:]]$")
                .context("failed to compile trailing limitation keyword regex")?,
            any_keyword: Regex::new(r"\b(?:limitations|weaknesses)")
                .context("failed to compile limitation keyword regex")?,
            limitation_like: Regex::new(r"limitation|weakness|shortcoming|drawback")
                .context("failed to compile limitation-like word regex")?,
        })
    }

    /// Bracketed reference lists, reference markers glued to the final
    /// period, or author-style citations.
    pub fn is_citation_sentence(&self, sentence: &Sentence) -> bool {
        let text = sentence.text.trim_end();

        if let Some(found) = self.bracket_citation.find(text) {
            debug!(sentence_id = %sentence.id, cue = found.as_str(), "citation match");
            return true;
        }
        if let Some(found) = self.trailing_reference.find(text) {
            debug!(sentence_id = %sentence.id, cue = found.as_str(), "citation match");
            return true;
        }

        text.to_lowercase().contains(" et al")
    }

    /// Sentence ends with "limitations"/"weaknesses" followed by punctuation,
    /// as in "This study has several limitations."
    pub fn ends_with_limitation_keyword(&self, sentence: &Sentence) -> bool {
        let text = sentence.text.trim_end().to_lowercase();
        self.trailing_keyword.is_match(&text)
    }

    /// Any limitation-like word anywhere in the sentence, including inside
    /// longer words ("drawbacks", "shortcomings").
    pub fn mentions_limitation_like_word(&self, sentence: &Sentence) -> bool {
        self.limitation_like.is_match(&sentence.text.to_lowercase())
    }

    pub fn is_introductory_limitation_sentence(&self, sentence: &Sentence) -> bool {
        if self.ends_with_limitation_keyword(sentence) {
            return true;
        }

        sentence.token_count() <= SHORT_SENTENCE_TOKENS
            && self.any_keyword.is_match(&sentence.text.to_lowercase())
    }

    /// A contrastive sentence inside an enumerated paragraph that is not
    /// itself an enumerated item.
    pub fn is_list_continuation(&self, document: &Document, sentence: &Sentence) -> bool {
        opens_with_contrast(sentence)
            && !opens_with_list_marker(sentence)
            && in_list_paragraph(document, sentence)
    }

    /// Cues that downgrade an otherwise positive sentence in the strict
    /// labeler.
    pub fn should_suppress(&self, document: &Document, sentence: &Sentence) -> bool {
        self.is_introductory_limitation_sentence(sentence)
            || self.is_list_continuation(document, sentence)
            || self.is_citation_sentence(sentence)
            || opens_with_contrast(sentence)
    }
}

pub fn opens_with_contrast(sentence: &Sentence) -> bool {
    sentence
        .first_word()
        .map(|word| word.has_any_lemma(CONTRASTIVE_OPENERS))
        .unwrap_or(false)
}

pub fn opens_with_list_marker(sentence: &Sentence) -> bool {
    sentence
        .first_word()
        .map(|word| word.has_any_lemma(LIST_MARKERS))
        .unwrap_or(false)
}

fn in_list_paragraph(document: &Document, sentence: &Sentence) -> bool {
    paragraph_sentences(document, sentence)
        .into_iter()
        .filter(|other| other.index != sentence.index)
        .any(opens_with_list_marker)
}
