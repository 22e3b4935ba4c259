use anyhow::Result;
use tracing::{info, warn};

use crate::aggregate::LabeledDocument;
use crate::cli::EvaluateArgs;
use crate::evaluation::{GoldStandard, SentenceEvaluation, format_metric};
use crate::labeler::SentenceLabeler;
use crate::lexical::LexicalCues;
use crate::util::{list_documents, write_lines};

use super::load_batch_document;

pub fn run(args: EvaluateArgs) -> Result<()> {
    let paths = list_documents(&args.input_dir)?;
    let gold = GoldStandard::load(&args.gold)?;
    let cues = LexicalCues::new()?;
    let labeler = SentenceLabeler::new(&cues, args.variant);

    info!(
        input_dir = %args.input_dir.display(),
        gold_records = gold.record_count(),
        variant = labeler.variant().as_str(),
        "sentence evaluation started"
    );

    let mut evaluation = SentenceEvaluation::default();
    for path in &paths {
        let Some(document) = load_batch_document(path) else {
            continue;
        };
        if !gold.covers_document(&document.id) {
            continue;
        }

        let labeled = LabeledDocument::label(&document, &labeler);
        evaluation.score_document(&labeled, &gold);
        info!(document_id = %document.id, "scored document");
    }

    let unmatched = evaluation.unmatched_gold(&gold);
    if unmatched > 0 {
        warn!(
            unmatched,
            mismatched_text = evaluation.mismatched(),
            "gold records without a matching prediction"
        );
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
        "sentence evaluation completed"
    );

    Ok(())
}
