//! Section markers: named ranges over the slide sequence.

use deckdoc_engine::{Document, Section};
use deckdoc_params::ParamBag;
use serde_json::json;

use crate::address;
use crate::error::OpResult;
use crate::report::{OpOutcome, Report};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    Add,
    Rename,
    Move,
    Delete,
    DeleteMany,
    List,
}

impl Op {
    pub(crate) const NAMES: &'static [&'static str] =
        &["add", "rename", "move", "delete", "delete-many", "list"];

    pub(crate) fn parse(name: &str) -> Option<Self> {
        match name {
            "add" => Some(Self::Add),
            "rename" => Some(Self::Rename),
            "move" => Some(Self::Move),
            "delete" => Some(Self::Delete),
            "delete-many" => Some(Self::DeleteMany),
            "list" => Some(Self::List),
            _ => None,
        }
    }
}

pub(crate) fn run(op: Op, doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    match op {
        Op::Add => add(doc, bag),
        Op::Rename => rename(doc, bag),
        Op::Move => move_section(doc, bag),
        Op::Delete => delete(doc, bag),
        Op::DeleteMany => delete_many(doc, bag),
        Op::List => Ok(list(doc)),
    }
}

fn add(doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    let name = bag.required_str("name")?.to_string();
    let first_slide = address::resolve(
        doc.slides.len(),
        bag.required_i64("firstSlideIndex")?,
        "slide",
    )?;
    doc.sections.push(Section {
        name: name.clone(),
        first_slide,
    });
    Ok(OpOutcome::changed(Report::line(format!(
        "Added section '{name}' starting at slide {first_slide}; document now has {} sections.",
        doc.sections.len()
    ))))
}

fn rename(doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    let index = address::resolve(
        doc.sections.len(),
        bag.required_i64("sectionIndex")?,
        "section",
    )?;
    let name = bag.required_str("name")?.to_string();
    let previous = std::mem::replace(&mut doc.sections[index].name, name.clone());
    Ok(OpOutcome::changed(Report::line(format!(
        "Renamed section '{previous}' to '{name}'."
    ))))
}

fn move_section(doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    let from = address::resolve(
        doc.sections.len(),
        bag.required_i64("sectionIndex")?,
        "section",
    )?;
    let to = address::resolve(doc.sections.len(), bag.required_i64("toIndex")?, "section")?;
    let section = doc.sections.remove(from);
    doc.sections.insert(to, section);
    Ok(OpOutcome::changed(Report::line(format!(
        "Moved section from index {from} to index {to}."
    ))))
}

fn delete(doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    let index = address::resolve(
        doc.sections.len(),
        bag.required_i64("sectionIndex")?,
        "section",
    )?;
    let removed = doc.sections.remove(index);
    Ok(OpOutcome::changed(Report::line(format!(
        "Deleted section '{}'; {} sections remaining.",
        removed.name,
        doc.sections.len()
    ))))
}

fn delete_many(doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    let indices = bag.required_i64_list("indices")?;
    let resolved = address::resolve_many(doc.sections.len(), &indices, "section")?;
    let deleted = resolved.len();
    for index in resolved {
        doc.sections.remove(index);
    }
    Ok(OpOutcome::changed(Report::line(format!(
        "Deleted {deleted} sections; {} sections remaining.",
        doc.sections.len()
    ))))
}

fn list(doc: &Document) -> OpOutcome {
    let sections: Vec<_> = doc
        .sections
        .iter()
        .enumerate()
        .map(|(index, section)| {
            json!({
                "index": index,
                "name": section.name,
                "firstSlide": section.first_slide,
            })
        })
        .collect();
    OpOutcome::read_only(Report::json(json!({
        "count": doc.sections.len(),
        "sections": sections,
    })))
}
