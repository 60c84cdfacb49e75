//! Footer, date and slide-number visibility settings.

use deckdoc_engine::Document;
use deckdoc_params::ParamBag;
use serde_json::json;

use crate::error::OpResult;
use crate::report::{OpOutcome, Report};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    Set,
    Get,
}

impl Op {
    pub(crate) const NAMES: &'static [&'static str] = &["set", "get"];

    pub(crate) fn parse(name: &str) -> Option<Self> {
        match name {
            "set" => Some(Self::Set),
            "get" => Some(Self::Get),
            _ => None,
        }
    }
}

pub(crate) fn run(op: Op, doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    match op {
        Op::Set => set(doc, bag),
        Op::Get => Ok(get(doc)),
    }
}

fn set(doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    let settings = &mut doc.header_footer;
    let mut touched = 0;

    if let Some(text) = bag.opt_str("footerText")? {
        settings.footer_text = Some(text.to_string());
        touched += 1;
    }
    if bag.contains("showFooter") {
        settings.show_footer = bag.bool_or("showFooter", false)?;
        touched += 1;
    }
    if bag.contains("showSlideNumber") {
        settings.show_slide_number = bag.bool_or("showSlideNumber", false)?;
        touched += 1;
    }
    if bag.contains("showDate") {
        settings.show_date = bag.bool_or("showDate", false)?;
        touched += 1;
    }
    if let Some(text) = bag.opt_str("dateText")? {
        settings.date_text = Some(text.to_string());
        touched += 1;
    }

    if touched == 0 {
        return Ok(OpOutcome::read_only(Report::line(
            "No header/footer fields supplied; nothing changed.",
        )));
    }

    Ok(OpOutcome::changed(Report::line(format!(
        "Updated {touched} header/footer setting(s)."
    ))))
}

fn get(doc: &Document) -> OpOutcome {
    let settings = &doc.header_footer;
    OpOutcome::read_only(Report::json(json!({
        "footerText": settings.footer_text.clone().unwrap_or_default(),
        "showFooter": settings.show_footer,
        "showSlideNumber": settings.show_slide_number,
        "showDate": settings.show_date,
        "dateText": settings.date_text.clone().unwrap_or_default(),
    })))
}
