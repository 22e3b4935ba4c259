use std::path::{Path, PathBuf};

use anyhow::Result;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};

use crate::cli::GenerateDatasetArgs;
use crate::lexical::LexicalCues;
use crate::model::{
    DatasetDocumentEntry, DatasetManifest, DatasetParameters, DatasetRecord, Partition,
};
use crate::sampler::{DatasetSampler, SamplerConfig};
use crate::util::{
    document_stem, list_documents, now_utc_string, sha256_file, write_json_pretty, write_lines,
};

use super::load_batch_document;

/// Accumulated output of one dataset generation run.
#[derive(Debug, Default)]
pub struct DatasetRun {
    pub records: Vec<DatasetRecord>,
    pub documents: Vec<DatasetDocumentEntry>,
    pub failed_documents: Vec<String>,
}

pub fn run(args: GenerateDatasetArgs) -> Result<()> {
    let paths = list_documents(&args.input_dir)?;
    let cues = LexicalCues::new()?;
    let sampler = DatasetSampler::new(
        &cues,
        SamplerConfig {
            split_ratio: args.split_ratio,
            negative_cap: args.negative_cap,
            min_sentence_chars: args.min_sentence_chars,
        },
    );
    let mut rng = StdRng::seed_from_u64(args.rng_seed);

    info!(
        input_dir = %args.input_dir.display(),
        document_count = paths.len(),
        seed_count = args.seed_count,
        test_count = args.test_count,
        rng_seed = args.rng_seed,
        "dataset generation started"
    );

    let dataset = generate_dataset(&paths, &sampler, args.seed_count, args.test_count, &mut rng);

    write_lines(
        &args.output,
        dataset.records.iter().map(DatasetRecord::to_tsv_line),
    )?;
    info!(
        path = %args.output.display(),
        record_count = dataset.records.len(),
        failed_documents = dataset.failed_documents.len(),
        "wrote dataset"
    );

    if let Some(manifest_path) = &args.manifest_path {
        let manifest = build_manifest(&args, dataset);
        write_json_pretty(manifest_path, &manifest)?;
        info!(path = %manifest_path.display(), "wrote dataset manifest");
    }

    Ok(())
}

/// Samples every document in order. Partitions follow the position in
/// `paths`, failed documents included.
pub fn generate_dataset(
    paths: &[PathBuf],
    sampler: &DatasetSampler<'_>,
    seed_count: usize,
    test_count: usize,
    rng: &mut StdRng,
) -> DatasetRun {
    let mut dataset = DatasetRun::default();

    for (position, path) in paths.iter().enumerate() {
        let partition = Partition::for_position(position, seed_count, test_count);
        let Some(document) = load_batch_document(path) else {
            dataset.failed_documents.push(document_stem(path));
            continue;
        };

        let sample = sampler.sample_document(&document, partition, rng);
        info!(
            document_id = %document.id,
            position = position + 1,
            partition = partition.as_str(),
            positives = sample.positive_count,
            negatives_kept = sample.negative_kept,
            "sampled document"
        );

        dataset.documents.push(DatasetDocumentEntry {
            document_id: document.id.clone(),
            partition,
            sha256: source_digest(path),
            positive_count: sample.positive_count,
            negative_candidates: sample.negative_candidates,
            negative_kept: sample.negative_kept,
        });
        dataset.records.extend(sample.records);
    }

    dataset
}

fn source_digest(path: &Path) -> String {
    match sha256_file(path) {
        Ok(digest) => digest,
        Err(err) => {
            warn!(path = %path.display(), error = %format!("{err:#}"), "failed to hash source");
            String::new()
        }
    }
}

fn build_manifest(args: &GenerateDatasetArgs, dataset: DatasetRun) -> DatasetManifest {
    DatasetManifest {
        manifest_version: 1,
        generated_at: now_utc_string(),
        source_directory: args.input_dir.display().to_string(),
        output_path: args.output.display().to_string(),
        parameters: DatasetParameters {
            seed_count: args.seed_count,
            test_count: args.test_count,
            split_ratio: args.split_ratio,
            negative_cap: args.negative_cap,
            min_sentence_chars: args.min_sentence_chars,
            rng_seed: args.rng_seed,
        },
        document_count: dataset.documents.len(),
        failed_documents: dataset.failed_documents,
        documents: dataset.documents,
    }
}
