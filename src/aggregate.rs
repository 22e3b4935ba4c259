use crate::document::Document;
use crate::labeler::SentenceLabeler;
use crate::model::{Label, LabelRecord, LimitationSummary};

/// POS when any sentence is POS.
pub fn document_label(labels: &[Label]) -> Label {
    if labels.iter().any(|label| label.is_pos()) {
        Label::Pos
    } else {
        Label::Neg
    }
}

/// Labeled sentences of one document, in document order.
#[derive(Debug, Clone)]
pub struct LabeledDocument {
    pub document_id: String,
    pub records: Vec<LabelRecord>,
}

impl LabeledDocument {
    pub fn label(document: &Document, labeler: &SentenceLabeler<'_>) -> Self {
        let records = document
            .sentences()
            .iter()
            .zip(labeler.label_document(document))
            .map(|(sentence, predicted)| LabelRecord {
                document_id: document.id.clone(),
                sentence_id: sentence.id.clone(),
                predicted,
                gold: None,
                text: sentence.text.clone(),
            })
            .collect();

        Self {
            document_id: document.id.clone(),
            records,
        }
    }

    pub fn document_label(&self) -> Label {
        let labels = self
            .records
            .iter()
            .map(|record| record.predicted)
            .collect::<Vec<_>>();
        document_label(&labels)
    }

    pub fn summary(&self) -> LimitationSummary {
        let positive_sentence_texts = self
            .records
            .iter()
            .filter(|record| record.predicted.is_pos())
            .map(|record| record.text.clone())
            .collect::<Vec<_>>();

        LimitationSummary {
            document_id: self.document_id.clone(),
            positive_sentence_count: positive_sentence_texts.len(),
            positive_sentence_texts,
        }
    }
}
