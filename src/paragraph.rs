//! Paragraph boundaries inferred from raw newline offsets.

use tracing::debug;

use crate::document::{Document, Sentence, Span};

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// First content offset of the paragraph holding `sentence`, or `None` when
/// nothing but whitespace and punctuation follows the paragraph start.
pub fn paragraph_begin(document: &Document, sentence: &Sentence) -> Option<usize> {
    let text = document.text();
    let start = sentence.span.begin.min(text.len());
    let next = text[start..]
        .find('\n')
        .map(|offset| start + offset)
        .unwrap_or(text.len());
    let previous = text[..next].rfind('\n').map(|offset| offset + 1).unwrap_or(0);

    text[previous..]
        .find(is_word_char)
        .map(|offset| previous + offset)
}

/// Offset of the first newline at or after the sentence end. The end of the
/// text closes the last paragraph.
pub fn paragraph_end(document: &Document, sentence: &Sentence) -> usize {
    let text = document.text();
    let start = sentence.span.end.min(text.len());
    text[start..]
        .find('\n')
        .map(|offset| start + offset)
        .unwrap_or(text.len())
}

pub fn paragraph_span(document: &Document, sentence: &Sentence) -> Option<Span> {
    let begin = paragraph_begin(document, sentence)?;
    let end = paragraph_end(document, sentence);
    (begin <= end).then(|| Span::new(begin, end))
}

/// Sentences lying entirely inside the paragraph that holds `sentence`.
pub fn paragraph_sentences<'a>(document: &'a Document, sentence: &Sentence) -> Vec<&'a Sentence> {
    match paragraph_span(document, sentence) {
        Some(span) => document.subsumed_sentences(span),
        None => Vec::new(),
    }
}

/// Sentences from the one opening the paragraph up to and including
/// `sentence`, in document order. Empty when the opening sentence cannot be
/// resolved.
pub fn paragraph_prefix<'a>(document: &'a Document, sentence: &Sentence) -> &'a [Sentence] {
    let Some(begin) = paragraph_begin(document, sentence) else {
        return &[];
    };
    let Some(opening) = document.sentence_at(begin) else {
        debug!(
            document_id = %document.id,
            sentence_id = %sentence.id,
            offset = begin,
            "no sentence at paragraph start"
        );
        return &[];
    };
    if opening.index > sentence.index {
        return &[];
    }

    &document.sentences()[opening.index..=sentence.index]
}
