use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Label {
    Pos,
    Neg,
}

impl Label {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pos => "POS",
            Self::Neg => "NEG",
        }
    }

    pub fn is_pos(self) -> bool {
        self == Self::Pos
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim() {
            "POS" => Ok(Self::Pos),
            "NEG" => Ok(Self::Neg),
            other => bail!("unknown label: {other}"),
        }
    }
}

/// Dataset partition, assigned by document position in the input ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Partition {
    Seed,
    Test,
    Semi,
}

impl Partition {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Seed => "SEED",
            Self::Test => "TEST",
            Self::Semi => "SEMI",
        }
    }

    pub fn for_position(position: usize, seed_count: usize, test_count: usize) -> Self {
        if position < seed_count {
            Self::Seed
        } else if position < seed_count.saturating_add(test_count) {
            Self::Test
        } else {
            Self::Semi
        }
    }
}

/// One predicted sentence, optionally paired with its gold label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelRecord {
    pub document_id: String,
    pub sentence_id: String,
    pub predicted: Label,
    pub gold: Option<Label>,
    pub text: String,
}

impl LabelRecord {
    pub fn key(&self) -> String {
        format!("{}_{}", self.document_id, self.sentence_id)
    }
}

/// One line of a generated dataset file.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetRecord {
    pub partition: Partition,
    pub label: Label,
    pub document_id: String,
    pub sentence_id: String,
    pub section_title: String,
    pub text: String,
}

impl DatasetRecord {
    pub fn to_tsv_line(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.partition.as_str(),
            self.label,
            self.document_id,
            self.sentence_id,
            tsv_field(&self.section_title),
            self.label,
            tsv_field(&self.text)
        )
    }
}

pub fn tsv_field(value: &str) -> String {
    value
        .chars()
        .map(|c| if matches!(c, '\t' | '\n' | '\r') { ' ' } else { c })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitationSummary {
    pub document_id: String,
    pub positive_sentence_count: usize,
    pub positive_sentence_texts: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetParameters {
    pub seed_count: usize,
    pub test_count: usize,
    pub split_ratio: usize,
    pub negative_cap: usize,
    pub min_sentence_chars: usize,
    pub rng_seed: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetDocumentEntry {
    pub document_id: String,
    pub partition: Partition,
    pub sha256: String,
    pub positive_count: usize,
    pub negative_candidates: usize,
    pub negative_kept: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub source_directory: String,
    pub output_path: String,
    pub parameters: DatasetParameters,
    pub document_count: usize,
    pub failed_documents: Vec<String>,
    pub documents: Vec<DatasetDocumentEntry>,
}
