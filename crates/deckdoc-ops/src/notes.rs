//! Speaker notes per slide.

use deckdoc_engine::Document;
use deckdoc_params::ParamBag;
use serde_json::json;

use crate::address;
use crate::error::OpResult;
use crate::report::{OpOutcome, Report};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    Set,
    Get,
    Delete,
}

impl Op {
    pub(crate) const NAMES: &'static [&'static str] = &["set", "get", "delete"];

    pub(crate) fn parse(name: &str) -> Option<Self> {
        match name {
            "set" => Some(Self::Set),
            "get" => Some(Self::Get),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

pub(crate) fn run(op: Op, doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    match op {
        Op::Set => set(doc, bag),
        Op::Get => get(doc, bag),
        Op::Delete => delete(doc, bag),
    }
}

fn set(doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    let index = bag.required_i64("slideIndex")?;
    let text = bag.required_str("text")?.to_string();
    let slide = address::slide_mut(doc, index)?;
    slide.notes = Some(text);
    Ok(OpOutcome::changed(Report::line(format!(
        "Notes set on slide {index}."
    ))))
}

fn get(doc: &Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    let index = bag.required_i64("slideIndex")?;
    let slide = address::slide(doc, index)?;
    Ok(OpOutcome::read_only(Report::json(json!({
        "slideIndex": index,
        "hasNotes": slide.has_notes(),
        "text": slide.notes.clone().unwrap_or_default(),
    }))))
}

fn delete(doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    let index = bag.required_i64("slideIndex")?;
    let slide = address::slide_mut(doc, index)?;
    let had_notes = slide.notes.take().is_some();
    let report = if had_notes {
        Report::line(format!("Notes removed from slide {index}."))
    } else {
        Report::line(format!("Slide {index} has no notes."))
    };
    Ok(if had_notes {
        OpOutcome::changed(report)
    } else {
        OpOutcome::read_only(report)
    })
}
