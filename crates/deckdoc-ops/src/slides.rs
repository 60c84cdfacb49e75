//! Slide-level structural operations.

use deckdoc_engine::{Document, LayoutType, Slide};
use deckdoc_params::ParamBag;
use serde_json::json;

use crate::address;
use crate::error::{OpError, OpResult};
use crate::report::{OpOutcome, Report};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    Add,
    Delete,
    DeleteMany,
    Move,
    Duplicate,
    Get,
    List,
    SetNumberingStart,
}

impl Op {
    pub(crate) const NAMES: &'static [&'static str] = &[
        "add",
        "delete",
        "delete-many",
        "move",
        "duplicate",
        "get",
        "list",
        "set-numbering-start",
    ];

    pub(crate) fn parse(name: &str) -> Option<Self> {
        match name {
            "add" => Some(Self::Add),
            "delete" => Some(Self::Delete),
            "delete-many" => Some(Self::DeleteMany),
            "move" => Some(Self::Move),
            "duplicate" => Some(Self::Duplicate),
            "get" => Some(Self::Get),
            "list" => Some(Self::List),
            "set-numbering-start" => Some(Self::SetNumberingStart),
            _ => None,
        }
    }
}

pub(crate) fn run(op: Op, doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    match op {
        Op::Add => add(doc, bag),
        Op::Delete => delete(doc, bag),
        Op::DeleteMany => delete_many(doc, bag),
        Op::Move => move_slide(doc, bag),
        Op::Duplicate => duplicate(doc, bag),
        Op::Get => get(doc, bag),
        Op::List => Ok(list(doc)),
        Op::SetNumberingStart => set_numbering_start(doc, bag),
    }
}

fn parse_layout(bag: &ParamBag) -> OpResult<LayoutType> {
    match bag.opt_str("layout")? {
        None => Ok(LayoutType::Blank),
        Some(name) => LayoutType::parse(name).ok_or_else(|| {
            OpError::InvalidArgument(format!(
                "unsupported layout type '{name}' (supported: {})",
                LayoutType::NAMES.join(", ")
            ))
        }),
    }
}

fn add(doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    let layout = parse_layout(bag)?;
    let position = match bag.opt_i64("index")? {
        Some(index) => address::resolve_insert(doc.slides.len(), index, "slide")?,
        None => doc.slides.len(),
    };

    doc.slides.insert(position, Slide::with_layout(layout));
    Ok(OpOutcome::changed(Report::line(format!(
        "Added {} slide at index {position}; presentation now has {} slides.",
        layout.name(),
        doc.slides.len()
    ))))
}

fn delete(doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    let index = address::resolve(doc.slides.len(), bag.required_i64("slideIndex")?, "slide")?;
    doc.slides.remove(index);
    adjust_sections(doc, index);
    Ok(OpOutcome::changed(Report::line(format!(
        "Deleted slide at index {index}; {} slides remaining.",
        doc.slides.len()
    ))))
}

fn delete_many(doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    let indices = bag.required_i64_list("indices")?;
    // The whole list is validated before anything is removed; deletion then
    // runs highest-first so remaining slots stay valid.
    let resolved = address::resolve_many(doc.slides.len(), &indices, "slide")?;
    let deleted = resolved.len();
    for index in resolved {
        doc.slides.remove(index);
        adjust_sections(doc, index);
    }
    Ok(OpOutcome::changed(Report::line(format!(
        "Deleted {deleted} slides; {} slides remaining.",
        doc.slides.len()
    ))))
}

fn move_slide(doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    let from = address::resolve(doc.slides.len(), bag.required_i64("slideIndex")?, "slide")?;
    let to = address::resolve(doc.slides.len(), bag.required_i64("toIndex")?, "slide")?;
    let slide = doc.slides.remove(from);
    doc.slides.insert(to, slide);
    Ok(OpOutcome::changed(Report::line(format!(
        "Moved slide from index {from} to index {to}."
    ))))
}

fn duplicate(doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    let index = address::resolve(doc.slides.len(), bag.required_i64("slideIndex")?, "slide")?;
    let copy = doc.slides[index].clone();
    doc.slides.insert(index + 1, copy);
    Ok(OpOutcome::changed(Report::line(format!(
        "Duplicated slide at index {index}; copy inserted at index {}.",
        index + 1
    ))))
}

fn get(doc: &Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    let index = address::resolve(doc.slides.len(), bag.required_i64("slideIndex")?, "slide")?;
    let slide = &doc.slides[index];
    Ok(OpOutcome::read_only(Report::json(json!({
        "slideIndex": index,
        "layoutType": slide.layout.name(),
        "shapeCount": slide.shapes.len(),
        "hasNotes": slide.has_notes(),
        "hidden": slide.hidden,
    }))))
}

fn list(doc: &Document) -> OpOutcome {
    let slides: Vec<_> = doc
        .slides
        .iter()
        .enumerate()
        .map(|(index, slide)| {
            json!({
                "index": index,
                "layoutType": slide.layout.name(),
                "shapeCount": slide.shapes.len(),
                "hasNotes": slide.has_notes(),
            })
        })
        .collect();
    OpOutcome::read_only(Report::json(json!({
        "totalSlides": doc.slides.len(),
        "slides": slides,
    })))
}

fn set_numbering_start(doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    let start = bag.required_i64("start")?;
    if !(0..=u32::MAX as i64).contains(&start) {
        return Err(OpError::InvalidArgument(format!(
            "parameter 'start' must be a non-negative integer, got {start}"
        )));
    }
    doc.first_slide_number = start as u32;
    Ok(OpOutcome::changed(Report::line(format!(
        "Slide numbering starts at {start}."
    ))))
}

/// Keep section markers consistent after removing the slide at `removed`.
fn adjust_sections(doc: &mut Document, removed: usize) {
    for section in &mut doc.sections {
        if section.first_slide > removed {
            section.first_slide -= 1;
        }
    }
    let remaining = doc.slides.len();
    doc.sections.retain(|section| section.first_slide < remaining);
}
