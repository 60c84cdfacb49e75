//! Operation routing: `module.operation` strings resolve to closed per-module
//! enums before any document is loaded, so an unrecognised name can never
//! leave partial work behind.

use deckdoc_params::{ParamBag, ParamError};
use serde_json::Value;

use crate::error::{unknown_operation, OpError, OpResult};
use crate::report::Report;
use crate::{
    document, gateway, headerfooter, hyperlinks, notes, properties, protection, revisions,
    sections, shapes, slides, tables, text, watermark,
};

pub const MODULES: &[&str] = &[
    "slides",
    "sections",
    "text",
    "tables",
    "shapes",
    "hyperlinks",
    "protection",
    "revisions",
    "notes",
    "properties",
    "headerfooter",
    "watermark",
    "document",
];

#[derive(Clone, Copy)]
enum Routed {
    Slides(slides::Op),
    Sections(sections::Op),
    Text(text::Op),
    Tables(tables::Op),
    Shapes(shapes::Op),
    Hyperlinks(hyperlinks::Op),
    Protection(protection::Op),
    Revisions(revisions::Op),
    Notes(notes::Op),
    Properties(properties::Op),
    HeaderFooter(headerfooter::Op),
    Watermark(watermark::Op),
    Document(document::Op),
}

fn route(operation: &str) -> OpResult<Routed> {
    let Some((module, op)) = operation.split_once('.') else {
        return Err(OpError::InvalidArgument(format!(
            "operation '{operation}' must be of the form 'module.operation'"
        )));
    };

    let routed = match module {
        "slides" => slides::Op::parse(op).map(Routed::Slides),
        "sections" => sections::Op::parse(op).map(Routed::Sections),
        "text" => text::Op::parse(op).map(Routed::Text),
        "tables" => tables::Op::parse(op).map(Routed::Tables),
        "shapes" => shapes::Op::parse(op).map(Routed::Shapes),
        "hyperlinks" => hyperlinks::Op::parse(op).map(Routed::Hyperlinks),
        "protection" => protection::Op::parse(op).map(Routed::Protection),
        "revisions" => revisions::Op::parse(op).map(Routed::Revisions),
        "notes" => notes::Op::parse(op).map(Routed::Notes),
        "properties" => properties::Op::parse(op).map(Routed::Properties),
        "headerfooter" => headerfooter::Op::parse(op).map(Routed::HeaderFooter),
        "watermark" => watermark::Op::parse(op).map(Routed::Watermark),
        "document" => document::Op::parse(op).map(Routed::Document),
        _ => {
            return Err(OpError::InvalidArgument(format!(
                "unknown module '{module}' in operation '{operation}' (supported modules: {})",
                MODULES.join(", ")
            )))
        }
    };

    routed.ok_or_else(|| unknown_operation(module, op, supported_for(module)))
}

fn supported_for(module: &str) -> &'static [&'static str] {
    match module {
        "slides" => slides::Op::NAMES,
        "sections" => sections::Op::NAMES,
        "text" => text::Op::NAMES,
        "tables" => tables::Op::NAMES,
        "shapes" => shapes::Op::NAMES,
        "hyperlinks" => hyperlinks::Op::NAMES,
        "protection" => protection::Op::NAMES,
        "revisions" => revisions::Op::NAMES,
        "notes" => notes::Op::NAMES,
        "properties" => properties::Op::NAMES,
        "headerfooter" => headerfooter::Op::NAMES,
        "watermark" => watermark::Op::NAMES,
        "document" => document::Op::NAMES,
        _ => &[],
    }
}

/// Run one operation against the bag. Single-document operations load the
/// document named by `path`, hand it to exactly one handler, and persist it
/// only when the handler reports a mutation.
pub fn dispatch(operation: &str, bag: &ParamBag) -> OpResult<Report> {
    let routed = route(operation)?;

    if let Routed::Document(op) = routed {
        return document::run(op, bag);
    }

    let path = gateway::input_path(bag)?;
    let mut doc = gateway::load(&path)?;

    let outcome = match routed {
        Routed::Slides(op) => slides::run(op, &mut doc, bag)?,
        Routed::Sections(op) => sections::run(op, &mut doc, bag)?,
        Routed::Text(op) => text::run(op, &mut doc, bag)?,
        Routed::Tables(op) => tables::run(op, &mut doc, bag)?,
        Routed::Shapes(op) => shapes::run(op, &mut doc, bag)?,
        Routed::Hyperlinks(op) => hyperlinks::run(op, &mut doc, bag)?,
        Routed::Protection(op) => protection::run(op, &mut doc, bag)?,
        Routed::Revisions(op) => revisions::run(op, &mut doc, bag)?,
        Routed::Notes(op) => notes::run(op, &mut doc, bag)?,
        Routed::Properties(op) => properties::run(op, &mut doc, bag)?,
        Routed::HeaderFooter(op) => headerfooter::run(op, &mut doc, bag)?,
        Routed::Watermark(op) => watermark::run(op, &mut doc, bag)?,
        Routed::Document(_) => unreachable!("document operations return early"),
    };

    if outcome.changed {
        gateway::save(&doc, &path, bag)?;
    }

    Ok(outcome.report)
}

/// Entry point for the request shape `{ "operation": ..., ...fields }`.
pub fn run_request(request: Value) -> OpResult<Report> {
    let Value::Object(mut fields) = request else {
        return Err(OpError::InvalidArgument(
            "request must be a JSON object".to_string(),
        ));
    };

    let operation = match fields.remove("operation") {
        Some(Value::String(operation)) => operation,
        Some(_) => {
            return Err(OpError::InvalidArgument(
                "request field 'operation' must be a string".to_string(),
            ))
        }
        None => {
            return Err(OpError::Param(ParamError::Missing {
                key: "operation".to_string(),
            }))
        }
    };

    dispatch(&operation, &ParamBag::new(fields))
}
