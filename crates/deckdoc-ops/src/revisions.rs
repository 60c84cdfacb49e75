//! Change tracking: revision listing, accept/reject, and document
//! comparison.

use std::path::PathBuf;

use deckdoc_engine::{save_document, Document, Frame, SaveFormat, Shape};
use deckdoc_params::ParamBag;
use serde_json::json;
use similar::{ChangeTag, TextDiff};

use crate::address;
use crate::error::OpResult;
use crate::gateway;
use crate::report::{OpOutcome, Report};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    List,
    Accept,
    Reject,
    AcceptAll,
    RejectAll,
    Compare,
}

impl Op {
    pub(crate) const NAMES: &'static [&'static str] =
        &["list", "accept", "reject", "accept-all", "reject-all", "compare"];

    pub(crate) fn parse(name: &str) -> Option<Self> {
        match name {
            "list" => Some(Self::List),
            "accept" => Some(Self::Accept),
            "reject" => Some(Self::Reject),
            "accept-all" => Some(Self::AcceptAll),
            "reject-all" => Some(Self::RejectAll),
            "compare" => Some(Self::Compare),
            _ => None,
        }
    }
}

pub(crate) fn run(op: Op, doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    match op {
        Op::List => Ok(list(doc)),
        Op::Accept => resolve_one(doc, bag, "Accepted"),
        Op::Reject => resolve_one(doc, bag, "Rejected"),
        Op::AcceptAll => Ok(resolve_all(doc, "Accepted")),
        Op::RejectAll => Ok(resolve_all(doc, "Rejected")),
        Op::Compare => compare(doc, bag),
    }
}

fn list(doc: &Document) -> OpOutcome {
    let revisions: Vec<_> = doc
        .revisions
        .iter()
        .enumerate()
        .map(|(index, revision)| {
            json!({
                "index": index,
                "author": revision.author,
                "date": revision.date,
                "type": revision.kind.name(),
                "text": revision.text,
            })
        })
        .collect();
    OpOutcome::read_only(Report::json(json!({
        "count": doc.revisions.len(),
        "revisions": revisions,
    })))
}

fn resolve_one(doc: &mut Document, bag: &ParamBag, verb: &str) -> OpResult<OpOutcome> {
    let index = address::resolve(
        doc.revisions.len(),
        bag.required_i64("revisionIndex")?,
        "revision",
    )?;
    let revision = doc.revisions.remove(index);
    Ok(OpOutcome::changed(Report::line(format!(
        "{verb} revision {index} by {}; {} revisions remaining.",
        revision.author,
        doc.revisions.len()
    ))))
}

fn resolve_all(doc: &mut Document, verb: &str) -> OpOutcome {
    let count = doc.revisions.len();
    doc.revisions.clear();
    let report = Report::line(format!("{verb} all {count} revisions."));
    if count > 0 {
        OpOutcome::changed(report)
    } else {
        OpOutcome::read_only(report)
    }
}

/// Compare the loaded document against `otherPath`, counting changed lines
/// of extracted text. With `outputPath`, a diff document (one slide holding
/// the unified diff) is written as well. The primary document is never
/// mutated.
fn compare(doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    let other_path = PathBuf::from(bag.required_str("otherPath")?);
    let other = gateway::load(&other_path)?;

    let ours = doc.plain_text();
    let theirs = other.plain_text();
    let diff = TextDiff::from_lines(&ours, &theirs);

    let differences = diff
        .iter_all_changes()
        .filter(|change| change.tag() != ChangeTag::Equal)
        .count();

    let mut message = format!(
        "Found {differences} difference(s) against '{}'.",
        other_path.display()
    );

    if let Some(output) = bag.opt_str("outputPath")? {
        let rendered = diff
            .unified_diff()
            .context_radius(3)
            .header("current", "other")
            .to_string();
        let mut diff_doc = Document::default();
        let mut slide = deckdoc_engine::Slide::default();
        slide
            .shapes
            .push(Shape::text_box("diff", Frame::default(), &rendered));
        diff_doc.slides.push(slide);

        let output = PathBuf::from(output);
        save_document(&diff_doc, &output, SaveFormat::Json).map_err(gateway::from_engine)?;
        message.push_str(&format!(" Diff document saved to '{}'.", output.display()));
    }

    Ok(OpOutcome::read_only(Report::line(message)))
}
