use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::aggregate::LabeledDocument;
use crate::cli::EvaluateDocumentsArgs;
use crate::evaluation::{DocumentEvaluation, format_metric};
use crate::labeler::SentenceLabeler;
use crate::lexical::LexicalCues;
use crate::util::{list_documents, read_lines, write_lines};

use super::load_batch_document;

pub fn run(args: EvaluateDocumentsArgs) -> Result<()> {
    let paths = list_documents(&args.input_dir)?;
    let positives = load_positive_documents(&args.positive_docs)?;
    let cues = LexicalCues::new()?;
    let labeler = SentenceLabeler::new(&cues, args.variant);

    info!(
        input_dir = %args.input_dir.display(),
        positive_documents = positives.len(),
        variant = labeler.variant().as_str(),
        "document evaluation started"
    );

    let mut evaluation = DocumentEvaluation::default();
    for path in &paths {
        let Some(document) = load_batch_document(path) else {
            continue;
        };
        let predicted = LabeledDocument::label(&document, &labeler).document_label();
        let outcome = evaluation.record(&document.id, predicted, positives.contains(&document.id));
        info!(document_id = %document.id, outcome = outcome.as_str(), "scored document");
    }

    write_lines(&args.output, evaluation.report_lines())?;

    let matrix = evaluation.matrix();
    info!(counts = %matrix.counts_line(), "confusion matrix");
    info!(
        path = %args.output.display(),
        precision = %format_metric(matrix.precision()),
        recall = %format_metric(matrix.recall()),
        f_score = %format_metric(matrix.f1()),
        accuracy = %format_metric(matrix.accuracy()),
        specificity = %format_metric(matrix.specificity()),
        "document evaluation completed"
    );

    Ok(())
}

fn load_positive_documents(path: &Path) -> Result<BTreeSet<String>> {
    let lines = read_lines(path)
        .with_context(|| format!("failed to load positive document list: {}", path.display()))?;

    Ok(lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| {
            line.trim_end_matches(".xml")
                .trim_end_matches(".json")
                .to_string()
        })
        .collect())
}
