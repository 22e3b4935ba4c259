//! Confusion-matrix scoring of predicted labels against gold labels.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::aggregate::LabeledDocument;
use crate::document::sentence_id_number;
use crate::model::{Label, LabelRecord, tsv_field};
use crate::util::read_lines;

/// Dataset partitions that carry silver labels and are never scored.
const NON_GOLD_PARTITIONS: &[&str] = &["SEED", "SEMI", "DATASET"];
const GOLD_MIN_FIELDS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    TruePositive,
    FalsePositive,
    FalseNegative,
    TrueNegative,
}

impl Outcome {
    pub fn of(predicted: Label, gold: Label) -> Self {
        match (predicted, gold) {
            (Label::Pos, Label::Pos) => Self::TruePositive,
            (Label::Pos, Label::Neg) => Self::FalsePositive,
            (Label::Neg, Label::Pos) => Self::FalseNegative,
            (Label::Neg, Label::Neg) => Self::TrueNegative,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TruePositive => "TP",
            Self::FalsePositive => "FP",
            Self::FalseNegative => "FN",
            Self::TrueNegative => "TN",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionMatrix {
    pub true_positive: usize,
    pub false_positive: usize,
    pub false_negative: usize,
    pub true_negative: usize,
}

impl ConfusionMatrix {
    pub fn record(&mut self, predicted: Label, gold: Label) -> Outcome {
        let outcome = Outcome::of(predicted, gold);
        match outcome {
            Outcome::TruePositive => self.true_positive += 1,
            Outcome::FalsePositive => self.false_positive += 1,
            Outcome::FalseNegative => self.false_negative += 1,
            Outcome::TrueNegative => self.true_negative += 1,
        }
        outcome
    }

    pub fn total(&self) -> usize {
        self.true_positive + self.false_positive + self.false_negative + self.true_negative
    }

    pub fn precision(&self) -> Option<f64> {
        ratio(self.true_positive, self.true_positive + self.false_positive)
    }

    pub fn recall(&self) -> Option<f64> {
        ratio(self.true_positive, self.true_positive + self.false_negative)
    }

    pub fn f1(&self) -> Option<f64> {
        let precision = self.precision()?;
        let recall = self.recall()?;
        let denominator = precision + recall;
        if denominator == 0.0 {
            None
        } else {
            Some(2.0 * precision * recall / denominator)
        }
    }

    pub fn accuracy(&self) -> Option<f64> {
        ratio(self.true_positive + self.true_negative, self.total())
    }

    pub fn specificity(&self) -> Option<f64> {
        ratio(self.true_negative, self.true_negative + self.false_positive)
    }

    pub fn counts_line(&self) -> String {
        format!(
            "TP|FP|FN|TN:{}|{}|{}|{}",
            self.true_positive, self.false_positive, self.false_negative, self.true_negative
        )
    }

    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            format!("PRECISION {}", format_metric(self.precision())),
            format!("RECALL {}", format_metric(self.recall())),
            format!("F-SCORE {}", format_metric(self.f1())),
            format!("ACCURACY {}", format_metric(self.accuracy())),
            format!("SPECIFICITY {}", format_metric(self.specificity())),
        ]
    }
}

fn ratio(numerator: usize, denominator: usize) -> Option<f64> {
    if denominator == 0 {
        None
    } else {
        Some(numerator as f64 / denominator as f64)
    }
}

pub fn format_metric(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{value:.4}"),
        None => "undefined".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoldRecord {
    pub document_id: String,
    pub sentence_id: String,
    pub label: Label,
    pub text: String,
}

impl GoldRecord {
    pub fn key(&self) -> String {
        format!("{}_{}", self.document_id, self.sentence_id)
    }
}

/// Parses one dataset line. Returns `None` for silver partitions and for
/// lines with too few fields.
pub fn parse_gold_line(line: &str) -> Result<Option<GoldRecord>> {
    let fields = line.split('\t').collect::<Vec<_>>();
    if fields.len() < GOLD_MIN_FIELDS || NON_GOLD_PARTITIONS.contains(&fields[0]) {
        return Ok(None);
    }

    let label = fields[5]
        .parse::<Label>()
        .with_context(|| format!("invalid gold label for {}_{}", fields[2], fields[3]))?;
    let document_id = fields[2]
        .trim_end_matches(".xml")
        .trim_end_matches(".json")
        .to_string();

    Ok(Some(GoldRecord {
        document_id,
        sentence_id: fields[3].to_string(),
        label,
        text: fields[6].to_string(),
    }))
}

/// Gold sentence labels keyed by `documentId_sentenceId`.
#[derive(Debug, Default)]
pub struct GoldStandard {
    records: BTreeMap<String, GoldRecord>,
    documents: BTreeSet<String>,
}

impl GoldStandard {
    pub fn load(path: &Path) -> Result<Self> {
        let lines = read_lines(path)?;
        Self::from_lines(lines.iter().map(String::as_str))
            .with_context(|| format!("failed to parse gold file: {}", path.display()))
    }

    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let mut gold = Self::default();
        for (index, line) in lines.into_iter().enumerate() {
            let Some(record) =
                parse_gold_line(line).with_context(|| format!("gold line {}", index + 1))?
            else {
                continue;
            };
            gold.documents.insert(record.document_id.clone());
            gold.records.insert(record.key(), record);
        }
        Ok(gold)
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn covers_document(&self, document_id: &str) -> bool {
        self.documents.contains(document_id)
    }

    pub fn get(&self, key: &str) -> Option<&GoldRecord> {
        self.records.get(key)
    }
}

/// A prediction paired with its gold label.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSentence {
    pub outcome: Outcome,
    pub record: LabelRecord,
}

impl ScoredSentence {
    pub fn report_line(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}",
            self.outcome.as_str(),
            self.record.key(),
            self.record.predicted,
            self.record.gold.map(Label::as_str).unwrap_or("-"),
            self.record.text
        )
    }
}

/// Run-scoped sentence-level scoring state.
#[derive(Debug, Default)]
pub struct SentenceEvaluation {
    matrix: ConfusionMatrix,
    items: Vec<ScoredSentence>,
    matched: BTreeSet<String>,
    mismatched: usize,
}

impl SentenceEvaluation {
    pub fn score_document(&mut self, labeled: &LabeledDocument, gold: &GoldStandard) {
        for record in &labeled.records {
            let key = record.key();
            let Some(gold_record) = gold.get(&key) else {
                continue;
            };
            if gold_record.text != tsv_field(&record.text) {
                warn!(key = %key, text = %record.text, "gold sentence text mismatch; skipping");
                self.mismatched += 1;
                continue;
            }

            let outcome = self.matrix.record(record.predicted, gold_record.label);
            debug!(key = %key, outcome = outcome.as_str(), "scored sentence");
            self.matched.insert(key);
            self.items.push(ScoredSentence {
                outcome,
                record: LabelRecord {
                    gold: Some(gold_record.label),
                    text: gold_record.text.clone(),
                    ..record.clone()
                },
            });
        }
    }

    pub fn matrix(&self) -> &ConfusionMatrix {
        &self.matrix
    }

    pub fn mismatched(&self) -> usize {
        self.mismatched
    }

    /// Gold records that never met a prediction with identical text.
    pub fn unmatched_gold(&self, gold: &GoldStandard) -> usize {
        gold.record_count().saturating_sub(self.matched.len())
    }

    pub fn report_lines(&self) -> Vec<String> {
        let mut items = self.items.iter().collect::<Vec<_>>();
        items.sort_by(|left, right| {
            left.record
                .document_id
                .cmp(&right.record.document_id)
                .then_with(|| {
                    sentence_order(&left.record.sentence_id)
                        .cmp(&sentence_order(&right.record.sentence_id))
                })
        });

        items
            .into_iter()
            .map(ScoredSentence::report_line)
            .chain(self.matrix.summary_lines())
            .collect()
    }
}

fn sentence_order(sentence_id: &str) -> (u64, &str) {
    (sentence_id_number(sentence_id).unwrap_or(u64::MAX), sentence_id)
}

/// Run-scoped document-level scoring state.
#[derive(Debug, Default)]
pub struct DocumentEvaluation {
    matrix: ConfusionMatrix,
    items: BTreeMap<String, Outcome>,
}

impl DocumentEvaluation {
    pub fn record(&mut self, document_id: &str, predicted: Label, gold_positive: bool) -> Outcome {
        let gold = if gold_positive { Label::Pos } else { Label::Neg };
        let outcome = self.matrix.record(predicted, gold);
        self.items.insert(document_id.to_string(), outcome);
        outcome
    }

    pub fn matrix(&self) -> &ConfusionMatrix {
        &self.matrix
    }

    pub fn report_lines(&self) -> Vec<String> {
        self.items
            .iter()
            .map(|(document_id, outcome)| format!("{}|{document_id}", outcome.as_str()))
            .chain(self.matrix.summary_lines())
            .collect()
    }
}
