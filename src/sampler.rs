//! Builds balanced labeled sentence sets from the section rules.

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::document::{Document, Section, Sentence, sentence_id_number};
use crate::labeler::{
    SectionStatus, SentenceLabeler, Variant, passes_top_level_gate, plan_limitation_zone,
    section_status,
};
use crate::lexical::LexicalCues;
use crate::model::{DatasetRecord, Label, Partition};

/// Documents with fewer sentences get a proportionally smaller negative cap.
const SHORT_DOCUMENT_SENTENCES: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerConfig {
    pub split_ratio: usize,
    pub negative_cap: usize,
    pub min_sentence_chars: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            split_ratio: 1,
            negative_cap: 4,
            min_sentence_chars: 30,
        }
    }
}

#[derive(Debug, Default)]
pub struct Candidates<'a> {
    pub positives: Vec<&'a Sentence>,
    pub negatives: Vec<&'a Sentence>,
}

#[derive(Debug, Clone)]
pub struct DocumentSample {
    pub records: Vec<DatasetRecord>,
    pub positive_count: usize,
    pub negative_candidates: usize,
    pub negative_kept: usize,
}

#[derive(Debug)]
pub struct DatasetSampler<'a> {
    labeler: SentenceLabeler<'a>,
    config: SamplerConfig,
}

impl<'a> DatasetSampler<'a> {
    pub fn new(cues: &'a LexicalCues, config: SamplerConfig) -> Self {
        Self {
            labeler: SentenceLabeler::new(cues, Variant::Loose),
            config,
        }
    }

    /// Provisional POS/NEG split over every leaf section of the document.
    pub fn collect_candidates<'d>(&self, document: &'d Document) -> Candidates<'d> {
        let mut candidates = Candidates::default();
        for top in document.sections() {
            let eligible = document
                .title_of(top)
                .map(passes_top_level_gate)
                .unwrap_or(false);
            self.visit(document, top, eligible, &mut candidates);
        }
        candidates
    }

    fn visit<'d>(
        &self,
        document: &'d Document,
        section: &Section,
        eligible: bool,
        candidates: &mut Candidates<'d>,
    ) {
        if !section.is_leaf() {
            for child in &section.children {
                self.visit(document, child, eligible, candidates);
            }
            return;
        }

        let status = section_status(document, section);
        let zone = (status == SectionStatus::Both).then(|| plan_limitation_zone(document, section));

        for (position, sentence) in document.section_sentences(section).into_iter().enumerate() {
            if section.overlaps_title(sentence.span)
                || sentence.text.chars().count() < self.config.min_sentence_chars
            {
                continue;
            }

            let positive = eligible
                && match status {
                    SectionStatus::LimitOnly => true,
                    SectionStatus::None => self.labeler.in_limitation_paragraph(document, sentence),
                    SectionStatus::Both => zone.map(|zone| zone.covers(position)).unwrap_or(false),
                };

            if positive {
                candidates.positives.push(sentence);
            } else {
                candidates.negatives.push(sentence);
            }
        }
    }

    pub fn negative_quota(
        &self,
        sentence_count: usize,
        positives: usize,
        negatives: usize,
    ) -> usize {
        let cap = if sentence_count < SHORT_DOCUMENT_SENTENCES {
            self.config.negative_cap.min(sentence_count / 10)
        } else {
            self.config.negative_cap
        };

        if positives > 0 && negatives > cap {
            negatives.min(positives.saturating_mul(self.config.split_ratio))
        } else {
            negatives.min(cap)
        }
    }

    /// Keeps every positive and a shuffled quota of negatives, ordered by
    /// sentence number.
    pub fn sample_document<R: Rng + ?Sized>(
        &self,
        document: &Document,
        partition: Partition,
        rng: &mut R,
    ) -> DocumentSample {
        let Candidates {
            positives,
            mut negatives,
        } = self.collect_candidates(document);

        let quota =
            self.negative_quota(document.sentences().len(), positives.len(), negatives.len());
        let negative_candidates = negatives.len();
        negatives.shuffle(rng);
        negatives.truncate(quota);

        debug!(
            document_id = %document.id,
            positives = positives.len(),
            negative_candidates,
            negative_kept = negatives.len(),
            "sampled document"
        );

        let mut records = positives
            .iter()
            .map(|sentence| (sentence, Label::Pos))
            .chain(negatives.iter().map(|sentence| (sentence, Label::Neg)))
            .map(|(sentence, label)| DatasetRecord {
                partition,
                label,
                document_id: document.id.clone(),
                sentence_id: sentence.id.clone(),
                section_title: top_section_title(document, sentence),
                text: sentence.text.clone(),
            })
            .collect::<Vec<_>>();
        records.sort_by_key(|record| sentence_id_number(&record.sentence_id).unwrap_or(u64::MAX));

        DocumentSample {
            positive_count: positives.len(),
            negative_candidates,
            negative_kept: negatives.len(),
            records,
        }
    }
}

fn top_section_title(document: &Document, sentence: &Sentence) -> String {
    document
        .top_section(sentence)
        .and_then(|section| document.title_of(section))
        .unwrap_or_default()
        .to_string()
}
