//! Index and name resolution against live collections.
//!
//! Bounds checks are strict (`0 <= index < count`) and happen at resolution
//! time against the collection's current length, never against a cached
//! count: handlers that resolve several indices from one bag must see the
//! effect of earlier mutations. Composite addresses resolve left to right
//! and the first failing component names itself.

use deckdoc_engine::{Document, Shape, ShapeKind, Slide, Table, TextBody};

use crate::error::{OpError, OpResult};

/// Resolve `index` into `[0, len)`. The error names the element kind and
/// the live count so out-of-range reports are actionable.
pub fn resolve(len: usize, index: i64, what: &str) -> OpResult<usize> {
    if index < 0 || index >= len as i64 {
        return Err(OpError::InvalidArgument(format!(
            "{what} index {index} is out of range ({len} {what}s)"
        )));
    }
    Ok(index as usize)
}

/// Resolve an insertion position: one past the end is valid.
pub fn resolve_insert(len: usize, index: i64, what: &str) -> OpResult<usize> {
    if index < 0 || index > len as i64 {
        return Err(OpError::InvalidArgument(format!(
            "{what} insertion index {index} is out of range (0..={len})"
        )));
    }
    Ok(index as usize)
}

/// Validate a whole index list up front. Every invalid index is reported
/// together; on success the indices come back deduplicated and descending,
/// so bulk deletions never invalidate the indices still to be applied.
pub fn resolve_many(len: usize, indices: &[i64], what: &str) -> OpResult<Vec<usize>> {
    if indices.is_empty() {
        return Err(OpError::InvalidArgument(format!(
            "{what} index list must not be empty"
        )));
    }

    let invalid: Vec<i64> = indices
        .iter()
        .copied()
        .filter(|&index| index < 0 || index >= len as i64)
        .collect();
    if !invalid.is_empty() {
        let listed = invalid
            .iter()
            .map(|index| index.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(OpError::InvalidArgument(format!(
            "invalid {what} indices [{listed}] ({len} {what}s)"
        )));
    }

    let mut resolved: Vec<usize> = indices.iter().map(|&index| index as usize).collect();
    resolved.sort_unstable_by(|a, b| b.cmp(a));
    resolved.dedup();
    Ok(resolved)
}

pub fn slide(document: &Document, index: i64) -> OpResult<&Slide> {
    let resolved = resolve(document.slides.len(), index, "slide")?;
    Ok(&document.slides[resolved])
}

pub fn slide_mut(document: &mut Document, index: i64) -> OpResult<&mut Slide> {
    let resolved = resolve(document.slides.len(), index, "slide")?;
    Ok(&mut document.slides[resolved])
}

pub fn shape<'a>(slide: &'a Slide, slide_index: i64, index: i64) -> OpResult<&'a Shape> {
    let resolved = shape_slot(slide, slide_index, index)?;
    Ok(&slide.shapes[resolved])
}

pub fn shape_mut<'a>(slide: &'a mut Slide, slide_index: i64, index: i64) -> OpResult<&'a mut Shape> {
    let resolved = shape_slot(slide, slide_index, index)?;
    Ok(&mut slide.shapes[resolved])
}

fn shape_slot(slide: &Slide, slide_index: i64, index: i64) -> OpResult<usize> {
    let len = slide.shapes.len();
    if index < 0 || index >= len as i64 {
        return Err(OpError::InvalidArgument(format!(
            "shape index {index} is out of range on slide {slide_index} ({len} shapes)"
        )));
    }
    Ok(index as usize)
}

/// The shape must be a text box; anything else is an addressing mistake.
pub fn text_body_mut(shape: &mut Shape) -> OpResult<&mut TextBody> {
    let kind = shape.kind.kind_name();
    match &mut shape.kind {
        ShapeKind::TextBox(body) => Ok(body),
        _ => Err(OpError::InvalidArgument(format!(
            "shape '{}' is a {kind}, not a text box",
            shape.name
        ))),
    }
}

pub fn text_body(shape: &Shape) -> OpResult<&TextBody> {
    match &shape.kind {
        ShapeKind::TextBox(body) => Ok(body),
        _ => Err(OpError::InvalidArgument(format!(
            "shape '{}' is a {}, not a text box",
            shape.name,
            shape.kind.kind_name()
        ))),
    }
}

pub fn table_mut(shape: &mut Shape) -> OpResult<&mut Table> {
    let kind = shape.kind.kind_name();
    match &mut shape.kind {
        ShapeKind::Table(table) => Ok(table),
        _ => Err(OpError::InvalidArgument(format!(
            "shape '{}' is a {kind}, not a table",
            shape.name
        ))),
    }
}

pub fn table(shape: &Shape) -> OpResult<&Table> {
    match &shape.kind {
        ShapeKind::Table(table) => Ok(table),
        _ => Err(OpError::InvalidArgument(format!(
            "shape '{}' is a {}, not a table",
            shape.name,
            shape.kind.kind_name()
        ))),
    }
}

/// Name lookup for custom properties. A missing name is `NotFound`, which
/// is deliberately distinct from an out-of-range index.
pub fn custom_property_slot(document: &Document, name: &str) -> OpResult<usize> {
    document
        .custom_properties
        .iter()
        .position(|property| property.name == name)
        .ok_or_else(|| OpError::NotFound(format!("custom property '{name}' not found")))
}
