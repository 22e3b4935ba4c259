pub mod classify;
pub mod evaluate;
pub mod evaluate_documents;
pub mod generate_dataset;

use std::path::Path;

use tracing::warn;

use crate::document::Document;
use crate::util::document_stem;

/// Loads one article of a batch; failures are logged and the batch moves on.
fn load_batch_document(path: &Path) -> Option<Document> {
    match Document::load(path) {
        Ok(document) => Some(document),
        Err(err) => {
            warn!(
                document_id = %document_stem(path),
                error = %format!("{err:#}"),
                "skipping unreadable document"
            );
            None
        }
    }
}
