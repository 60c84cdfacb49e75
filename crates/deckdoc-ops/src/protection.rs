//! The protection state machine. Entering any protected state requires a
//! non-blank password; leaving it requires the same password.

use deckdoc_engine::{Document, ProtectionState};
use deckdoc_params::ParamBag;
use serde_json::json;

use crate::error::{OpError, OpResult};
use crate::report::{OpOutcome, Report};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    Protect,
    Unprotect,
    Get,
}

impl Op {
    pub(crate) const NAMES: &'static [&'static str] = &["protect", "unprotect", "get"];

    pub(crate) fn parse(name: &str) -> Option<Self> {
        match name {
            "protect" => Some(Self::Protect),
            "unprotect" => Some(Self::Unprotect),
            "get" => Some(Self::Get),
            _ => None,
        }
    }
}

pub(crate) fn run(op: Op, doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    match op {
        Op::Protect => protect(doc, bag),
        Op::Unprotect => unprotect(doc, bag),
        Op::Get => Ok(get(doc)),
    }
}

fn protect(doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    // Blank and whitespace-only passwords read as missing.
    let password = bag.required_str("password")?.to_string();

    let state = match bag.opt_str("type")? {
        None => ProtectionState::ReadOnly,
        Some("NoProtection") => {
            return Err(OpError::InvalidArgument(
                "protection type 'NoProtection' cannot be applied; use protection.unprotect"
                    .to_string(),
            ))
        }
        Some(name) => ProtectionState::parse(name).ok_or_else(|| {
            OpError::InvalidArgument(format!(
                "unsupported protection type '{name}' (supported: {})",
                ProtectionState::NAMES.join(", ")
            ))
        })?,
    };

    doc.protection.state = state;
    doc.protection.password = Some(password);

    Ok(OpOutcome::changed(Report::line(format!(
        "Document protected with {}.",
        state.name()
    ))))
}

fn unprotect(doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    if doc.protection.state == ProtectionState::NoProtection {
        // Unprotecting an unprotected document is a documented no-op; it
        // still saves when the caller asked for a separate output file.
        let report = Report::line("Document is not protected; nothing to remove.");
        return Ok(if bag.opt_str("outputPath")?.is_some() {
            OpOutcome::changed(report)
        } else {
            OpOutcome::read_only(report)
        });
    }

    let password = bag.required_str("password")?;
    if doc.protection.password.as_deref() != Some(password) {
        return Err(OpError::InvalidState(
            "password does not match; protection unchanged".to_string(),
        ));
    }

    let previous = doc.protection.state;
    doc.protection.state = ProtectionState::NoProtection;
    doc.protection.password = None;

    Ok(OpOutcome::changed(Report::line(format!(
        "Protection removed; previous protection was {}.",
        previous.name()
    ))))
}

fn get(doc: &Document) -> OpOutcome {
    OpOutcome::read_only(Report::json(json!({
        "state": doc.protection.state.name(),
        "protected": doc.protection.state != ProtectionState::NoProtection,
    })))
}
