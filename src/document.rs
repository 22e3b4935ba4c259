//! Read-only article model produced by the preprocessing pipeline.
//!
//! Articles arrive as one JSON file each. Offsets are byte offsets into the
//! article text. Section ownership of sentences is resolved once at load time
//! from span containment so that the labeling code only ever reads.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// Half-open offset interval `[begin, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub begin: usize,
    pub end: usize,
}

impl Span {
    pub fn new(begin: usize, end: usize) -> Self {
        Self { begin, end }
    }

    /// `outer` fully contains `inner`.
    pub fn subsume(outer: Span, inner: Span) -> bool {
        outer.begin <= inner.begin && inner.end <= outer.end
    }

    pub fn overlap(left: Span, right: Span) -> bool {
        left.begin < right.end && right.begin < left.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    #[serde(default)]
    pub lemmas: Vec<String>,
}

impl Word {
    pub fn from_surface(text: &str) -> Self {
        let lemma = text
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        let lemmas = if lemma.is_empty() { Vec::new() } else { vec![lemma] };

        Self {
            text: text.to_string(),
            lemmas,
        }
    }

    /// Case-insensitive lemma match. Tokens without lemmas fall back to their
    /// punctuation-trimmed surface form.
    pub fn has_any_lemma(&self, candidates: &[&str]) -> bool {
        if self.lemmas.is_empty() {
            let surface = self
                .text
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase();
            return candidates.iter().any(|candidate| *candidate == surface);
        }

        self.lemmas.iter().any(|lemma| {
            candidates
                .iter()
                .any(|candidate| lemma.eq_ignore_ascii_case(candidate))
        })
    }
}

#[derive(Debug, Clone)]
pub struct Sentence {
    pub id: String,
    pub index: usize,
    pub span: Span,
    pub text: String,
    pub words: Vec<Word>,
}

impl Sentence {
    pub fn first_word(&self) -> Option<&Word> {
        self.words.first()
    }

    pub fn token_count(&self) -> usize {
        self.words.len()
    }
}

/// Numeric part of an `S<n>` identifier.
pub fn sentence_id_number(id: &str) -> Option<u64> {
    id.strip_prefix('S')?.parse::<u64>().ok()
}

#[derive(Debug, Clone)]
pub struct Section {
    pub title_span: Option<Span>,
    pub text_span: Span,
    pub children: Vec<Section>,
    sentences: Vec<usize>,
}

impl Section {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Document-order indices of every sentence inside this section, including
    /// those owned by descendants.
    pub fn sentence_indices(&self) -> &[usize] {
        &self.sentences
    }

    pub fn contains(&self, span: Span) -> bool {
        Span::subsume(self.text_span, span)
            || self
                .title_span
                .map(|title| Span::subsume(title, span))
                .unwrap_or(false)
    }

    pub fn overlaps_title(&self, span: Span) -> bool {
        self.title_span
            .map(|title| Span::overlap(title, span))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    text: String,
    sentences: Vec<Sentence>,
    sections: Vec<Section>,
}

#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct RawDocument {
    #[serde(default)]
    pub id: Option<String>,
    pub text: String,
    #[serde(default)]
    pub sentences: Vec<RawSentence>,
    #[serde(default)]
    pub sections: Vec<RawSection>,
}

#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct RawSentence {
    #[serde(default)]
    pub id: Option<String>,
    pub begin: usize,
    pub end: usize,
    #[serde(default)]
    pub words: Option<Vec<Word>>,
}

#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct RawSection {
    #[serde(default)]
    pub title: Option<Span>,
    pub span: Span,
    #[serde(default)]
    pub children: Vec<RawSection>,
}

impl Document {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let fallback_id = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default();

        Self::from_json(&raw, fallback_id)
            .with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn from_json(raw: &str, fallback_id: &str) -> Result<Self> {
        let parsed: RawDocument =
            serde_json::from_str(raw).context("invalid document json")?;
        Self::from_raw(parsed, fallback_id)
    }

    pub(crate) fn from_raw(raw: RawDocument, fallback_id: &str) -> Result<Self> {
        let id = raw
            .id
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| fallback_id.to_string());

        let mut sentences = Vec::with_capacity(raw.sentences.len());
        for (index, sentence) in raw.sentences.into_iter().enumerate() {
            let span = Span::new(sentence.begin, sentence.end);
            let Some(text) = raw.text.get(span.begin..span.end) else {
                bail!(
                    "sentence {} span {}..{} is outside the text or splits a character",
                    index + 1,
                    span.begin,
                    span.end
                );
            };
            let words = sentence
                .words
                .unwrap_or_else(|| text.split_whitespace().map(Word::from_surface).collect());

            sentences.push(Sentence {
                id: sentence.id.unwrap_or_else(|| format!("S{}", index + 1)),
                index,
                span,
                text: text.to_string(),
                words,
            });
        }

        let sections = raw
            .sections
            .into_iter()
            .map(|section| resolve_section(section, &sentences, raw.text.len()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            id,
            text: raw.text,
            sentences,
            sections,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    /// Top-level sections in document order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn substring(&self, span: Span) -> &str {
        self.text.get(span.begin..span.end).unwrap_or_default()
    }

    pub fn title_of(&self, section: &Section) -> Option<&str> {
        section.title_span.map(|span| self.substring(span))
    }

    pub fn top_section(&self, sentence: &Sentence) -> Option<&Section> {
        self.sections
            .iter()
            .find(|section| section.contains(sentence.span))
    }

    /// Deepest section containing the sentence.
    pub fn section_of(&self, sentence: &Sentence) -> Option<&Section> {
        let mut current = self.top_section(sentence)?;
        while let Some(child) = current
            .children
            .iter()
            .find(|child| child.contains(sentence.span))
        {
            current = child;
        }
        Some(current)
    }

    pub fn section_sentences(&self, section: &Section) -> Vec<&Sentence> {
        section
            .sentence_indices()
            .iter()
            .filter_map(|index| self.sentences.get(*index))
            .collect()
    }

    /// Sentence covering the single character at `offset`.
    pub fn sentence_at(&self, offset: usize) -> Option<&Sentence> {
        let point = Span::new(offset, offset + 1);
        self.sentences
            .iter()
            .find(|sentence| Span::subsume(sentence.span, point))
    }

    pub fn subsumed_sentences(&self, span: Span) -> Vec<&Sentence> {
        self.sentences
            .iter()
            .filter(|sentence| Span::subsume(span, sentence.span))
            .collect()
    }
}

fn resolve_section(raw: RawSection, sentences: &[Sentence], text_len: usize) -> Result<Section> {
    let spans = std::iter::once(raw.span).chain(raw.title);
    for span in spans {
        if span.begin > span.end || span.end > text_len {
            bail!(
                "section span {}..{} is outside the text (length {text_len})",
                span.begin,
                span.end
            );
        }
    }

    let children = raw
        .children
        .into_iter()
        .map(|child| resolve_section(child, sentences, text_len))
        .collect::<Result<Vec<_>>>()?;

    let mut section = Section {
        title_span: raw.title,
        text_span: raw.span,
        children,
        sentences: Vec::new(),
    };
    section.sentences = sentences
        .iter()
        .filter(|sentence| section.contains(sentence.span))
        .map(|sentence| sentence.index)
        .collect();

    Ok(section)
}
