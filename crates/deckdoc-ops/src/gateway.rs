//! Path resolution and persistence around the engine.
//!
//! Every call loads its own document fresh and saves only after its handler
//! succeeded; a failed mutation never reaches disk. `outputPath` defaults to
//! overwriting the input, and an optional `format` parameter routes the save
//! through the recognised conversion set.

use std::path::{Path, PathBuf};

use deckdoc_engine::{load_document, save_document, Document, EngineError, SaveFormat};
use deckdoc_params::ParamBag;

use crate::error::{OpError, OpResult};

pub fn input_path(bag: &ParamBag) -> OpResult<PathBuf> {
    Ok(PathBuf::from(bag.required_str("path")?))
}

pub fn load(path: &Path) -> OpResult<Document> {
    load_document(path).map_err(from_engine)
}

/// The path a save will land on: explicit `outputPath`, else in place.
pub fn output_path(bag: &ParamBag, input: &Path) -> OpResult<PathBuf> {
    Ok(bag
        .opt_str("outputPath")?
        .map(PathBuf::from)
        .unwrap_or_else(|| input.to_path_buf()))
}

pub fn save_format(bag: &ParamBag) -> OpResult<SaveFormat> {
    match bag.opt_str("format")? {
        None => Ok(SaveFormat::Json),
        Some(requested) => SaveFormat::parse(requested).ok_or_else(|| {
            OpError::UnsupportedFormat {
                requested: requested.to_string(),
                supported: SaveFormat::NAMES.join(", "),
            }
        }),
    }
}

/// Persist after a successful mutation. Returns the path written.
pub fn save(document: &Document, input: &Path, bag: &ParamBag) -> OpResult<PathBuf> {
    let target = output_path(bag, input)?;
    let format = save_format(bag)?;
    save_document(document, &target, format).map_err(from_engine)?;
    Ok(target)
}

/// Inputs for multi-document operations: a primary `path` (optional) plus
/// an `inputPaths` list. An empty combined list is a hard failure.
pub fn merge_inputs(bag: &ParamBag) -> OpResult<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = Vec::new();
    // A supplied primary path must be usable; blank reads as missing.
    if bag.opt_str("path")?.is_some() {
        paths.push(PathBuf::from(bag.required_str("path")?));
    }
    if let Some(extra) = bag.opt_str_list("inputPaths")? {
        paths.extend(extra.into_iter().map(PathBuf::from));
    }
    if paths.is_empty() {
        return Err(OpError::InvalidArgument(
            "parameter 'inputPaths' must list at least one document".to_string(),
        ));
    }
    Ok(paths)
}

/// Side inputs (images, templates, ...) must exist before the engine is
/// asked to use them.
pub fn require_file(path: &Path, what: &str) -> OpResult<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(OpError::NotFound(format!(
            "{what} file '{}' not found",
            path.display()
        )))
    }
}

pub(crate) fn from_engine(err: EngineError) -> OpError {
    match err {
        EngineError::NotFound { path } => OpError::NotFound(format!("document '{path}' not found")),
        EngineError::Io { path, source } => OpError::Io {
            path: PathBuf::from(path),
            source,
        },
        malformed @ EngineError::Malformed { .. } => OpError::InvalidState(malformed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::tempdir;

    fn bag(value: serde_json::Value) -> ParamBag {
        ParamBag::from_value(value).unwrap()
    }

    #[test]
    fn output_path_defaults_to_input() {
        let input = Path::new("deck.json");
        let resolved = output_path(&bag(json!({})), input).unwrap();
        assert_eq!(resolved, input);

        let explicit = output_path(&bag(json!({"outputPath": "copy.json"})), input).unwrap();
        assert_eq!(explicit, Path::new("copy.json"));
    }

    #[test]
    fn unknown_format_is_unsupported() {
        let err = save_format(&bag(json!({"format": "pdf"}))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
        assert!(err.to_string().contains("pdf"));
        assert!(err.to_string().contains("json"));
    }

    #[test]
    fn merge_inputs_rejects_empty_lists() {
        let err = merge_inputs(&bag(json!({"inputPaths": []}))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let paths =
            merge_inputs(&bag(json!({"path": "a.json", "inputPaths": ["b.json"]}))).unwrap();
        assert_eq!(paths.len(), 2);
    }

    #[test]
    fn merge_inputs_rejects_a_blank_primary_path() {
        let err = merge_inputs(&bag(json!({"path": "   ", "inputPaths": ["b.json"]}))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.to_string().contains("'path'"));
    }

    #[test]
    fn loading_a_missing_document_is_not_found() {
        let dir = tempdir().unwrap();
        let err = load(&dir.path().join("absent.json")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn missing_side_input_names_the_resource() {
        let dir = tempdir().unwrap();
        let err = require_file(&dir.path().join("logo.png"), "image").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains("image file"));
        assert!(err.to_string().contains("logo.png"));
    }
}
