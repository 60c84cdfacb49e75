//! In-memory content tree and persistence for deckdoc documents.
//!
//! This crate plays the role of the document engine: it owns the
//! slide/shape/paragraph tree, knows how to load and save it, and exposes
//! the navigation primitives the operation layer builds on. The operation
//! layer never touches raw file bytes; everything goes through here.

pub mod model;
pub mod package;

pub use model::{
    Alignment, BuiltinProperties, CustomProperty, Document, FontFormat, Frame, HeaderFooter,
    LayoutType, Paragraph, PictureRef,
    Portion, Protection, ProtectionState, Revision, RevisionKind, Section, Shape, ShapeKind,
    Slide, Table, TableCell, TableRow, TextBody,
};
pub use package::{load_document, save_document, EngineError, SaveFormat};
