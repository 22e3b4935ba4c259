use std::path::Path;

use anyhow::{Result, bail};
use tracing::info;

use crate::aggregate::LabeledDocument;
use crate::cli::{ClassifyArgs, OutputFormat};
use crate::document::Document;
use crate::labeler::SentenceLabeler;
use crate::lexical::LexicalCues;
use crate::model::{LimitationSummary, tsv_field};
use crate::util::{list_documents, write_json_pretty, write_lines};

use super::load_batch_document;

pub fn run(args: ClassifyArgs) -> Result<()> {
    let cues = LexicalCues::new()?;
    let labeler = SentenceLabeler::new(&cues, args.variant);

    info!(
        input = %args.input.display(),
        variant = labeler.variant().as_str(),
        "classification started"
    );

    let labeled = if args.input.is_file() {
        vec![classify_document(&args.input, &labeler)?]
    } else if args.input.is_dir() {
        classify_directory(&args.input, &labeler)?
    } else {
        bail!("input does not exist: {}", args.input.display());
    };

    write_output(&args.output, args.format, &labeled)?;

    let positive_documents = labeled
        .iter()
        .filter(|document| document.document_label().is_pos())
        .count();
    info!(
        path = %args.output.display(),
        document_count = labeled.len(),
        positive_documents,
        "classification completed"
    );

    Ok(())
}

pub fn classify_document(path: &Path, labeler: &SentenceLabeler<'_>) -> Result<LabeledDocument> {
    let document = Document::load(path)?;
    Ok(label_and_log(&document, labeler))
}

pub fn classify_directory(
    dir: &Path,
    labeler: &SentenceLabeler<'_>,
) -> Result<Vec<LabeledDocument>> {
    let paths = list_documents(dir)?;
    let mut labeled = Vec::with_capacity(paths.len());

    for path in &paths {
        let Some(document) = load_batch_document(path) else {
            continue;
        };
        labeled.push(label_and_log(&document, labeler));
    }

    Ok(labeled)
}

fn label_and_log(document: &Document, labeler: &SentenceLabeler<'_>) -> LabeledDocument {
    let labeled = LabeledDocument::label(document, labeler);
    info!(
        document_id = %document.id,
        sentence_count = labeled.records.len(),
        document_label = %labeled.document_label(),
        "labeled document"
    );
    labeled
}

fn write_output(path: &Path, format: OutputFormat, labeled: &[LabeledDocument]) -> Result<()> {
    match format {
        OutputFormat::Summary => {
            let summaries = labeled
                .iter()
                .map(LabeledDocument::summary)
                .collect::<Vec<LimitationSummary>>();
            write_json_pretty(path, &summaries)
        }
        OutputFormat::Documents => write_lines(
            path,
            labeled
                .iter()
                .map(|document| format!("{}\t{}", document.document_id, document.document_label())),
        ),
        OutputFormat::Sentences => write_lines(
            path,
            labeled.iter().flat_map(|document| &document.records).map(|record| {
                format!(
                    "{}\t{}\t{}\t{}",
                    record.document_id,
                    record.sentence_id,
                    record.predicted,
                    tsv_field(&record.text)
                )
            }),
        ),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::run;
    use crate::cli::{ClassifyArgs, OutputFormat};
    use crate::commands::fixtures::write_corpus;
    use crate::labeler::Variant;
    use crate::model::LimitationSummary;

    fn args(input: &Path, output: &Path, format: OutputFormat) -> ClassifyArgs {
        ClassifyArgs {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            variant: Variant::Strict,
            format,
        }
    }

    #[test]
    fn directory_summary_skips_broken_documents() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_corpus(dir.path());
        let output = dir.path().join("out").join("summary.json");

        run(args(dir.path(), &output, OutputFormat::Summary)).expect("classify should succeed");

        let raw = fs::read_to_string(&output).expect("read summary");
        assert!(raw.contains("\"positiveSentenceCount\""));
        let summaries: Vec<LimitationSummary> = serde_json::from_str(&raw).expect("parse summary");
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].document_id, "PMC1");
        assert_eq!(
            summaries[0].positive_sentence_texts,
            vec!["The sample was small.", "Controls were not matched."]
        );
        assert_eq!(summaries[1].document_id, "PMC2");
        assert_eq!(summaries[1].positive_sentence_count, 0);
    }

    #[test]
    fn single_file_writes_document_and_sentence_tables() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_corpus(dir.path());
        let input = dir.path().join("PMC1.json");

        let documents = dir.path().join("documents.tsv");
        run(args(&input, &documents, OutputFormat::Documents)).expect("classify documents");
        assert_eq!(fs::read_to_string(&documents).expect("read"), "PMC1\tPOS\n");

        let sentences = dir.path().join("sentences.tsv");
        run(args(&input, &sentences, OutputFormat::Sentences)).expect("classify sentences");
        let lines = fs::read_to_string(&sentences).expect("read");
        assert_eq!(
            lines.lines().collect::<Vec<_>>(),
            vec![
                "PMC1\tS1\tNEG\tLimitations",
                "PMC1\tS2\tPOS\tThe sample was small.",
                "PMC1\tS3\tPOS\tControls were not matched.",
            ]
        );
    }

    #[test]
    fn missing_input_is_a_usage_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = run(args(
            &dir.path().join("absent"),
            &dir.path().join("out.json"),
            OutputFormat::Summary,
        ));
        assert!(result.is_err());
    }

    #[test]
    fn unreadable_single_file_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_corpus(dir.path());
        let result = run(args(
            &dir.path().join("broken.json"),
            &dir.path().join("out.json"),
            OutputFormat::Summary,
        ));
        assert!(result.is_err());
    }
}
