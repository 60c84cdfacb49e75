//! Loading and saving the content tree.
//!
//! Documents are stored as JSON. Saves are atomic: content goes to a
//! temporary file in the target directory and is renamed into place, so a
//! concurrent reader never observes a partially written document.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::Builder;
use thiserror::Error;

use crate::model::Document;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("document '{path}' not found")]
    NotFound { path: String },

    #[error("i/o error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("document '{path}' is not readable as a deckdoc document: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Formats a document can be persisted in. `Json` is the canonical on-disk
/// representation; the others are one-way exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveFormat {
    #[default]
    Json,
    Text,
    Markdown,
}

impl SaveFormat {
    pub const NAMES: &'static [&'static str] = &["json", "txt", "md"];

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "json" => Some(Self::Json),
            "txt" => Some(Self::Text),
            "md" => Some(Self::Markdown),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "txt",
            Self::Markdown => "md",
        }
    }
}

pub fn load_document(path: &Path) -> Result<Document, EngineError> {
    let display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            EngineError::NotFound { path: display.clone() }
        } else {
            EngineError::Io {
                path: display.clone(),
                source,
            }
        }
    })?;

    serde_json::from_str(&raw).map_err(|source| EngineError::Malformed {
        path: display,
        source,
    })
}

pub fn save_document(
    document: &Document,
    path: &Path,
    format: SaveFormat,
) -> Result<(), EngineError> {
    let rendered = match format {
        SaveFormat::Json => {
            let mut body = serde_json::to_string_pretty(document).map_err(|source| {
                EngineError::Malformed {
                    path: path.display().to_string(),
                    source,
                }
            })?;
            body.push('\n');
            body
        }
        SaveFormat::Text => {
            let mut body = document.plain_text();
            if !body.ends_with('\n') {
                body.push('\n');
            }
            body
        }
        SaveFormat::Markdown => render_markdown(document),
    };

    atomic_write(path, &rendered).map_err(|source| EngineError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn render_markdown(document: &Document) -> String {
    let mut out = String::new();
    for (index, slide) in document.slides.iter().enumerate() {
        let number = document.first_slide_number as usize + index;
        out.push_str(&format!("# Slide {number}\n\n"));
        for shape in &slide.shapes {
            let text = shape.text();
            if !text.is_empty() {
                out.push_str(&text);
                out.push_str("\n\n");
            }
        }
        if let Some(notes) = &slide.notes {
            out.push_str("> ");
            out.push_str(notes);
            out.push_str("\n\n");
        }
    }
    out
}

/// Write via a sibling temp file plus rename so the destination is always
/// either the old or the new content.
fn atomic_write(path: &Path, contents: &str) -> io::Result<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| Path::new(".").to_path_buf());
    fs::create_dir_all(&parent)?;

    let mut tmp = Builder::new().prefix(".deckdoc").tempfile_in(&parent)?;
    tmp.as_file_mut().write_all(contents.as_bytes())?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(path).map(|_| ()).map_err(|err| err.error)
}
