//! Document metadata: built-in and custom properties, plus statistics.

use deckdoc_engine::{BuiltinProperties, CustomProperty, Document};
use deckdoc_params::ParamBag;
use serde_json::{json, Map, Value};

use crate::address;
use crate::error::{OpError, OpResult};
use crate::report::{OpOutcome, Report};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    SetBuiltin,
    SetCustom,
    DeleteCustom,
    Get,
    Statistics,
}

impl Op {
    pub(crate) const NAMES: &'static [&'static str] = &[
        "set-builtin",
        "set-custom",
        "delete-custom",
        "get",
        "statistics",
    ];

    pub(crate) fn parse(name: &str) -> Option<Self> {
        match name {
            "set-builtin" => Some(Self::SetBuiltin),
            "set-custom" => Some(Self::SetCustom),
            "delete-custom" => Some(Self::DeleteCustom),
            "get" => Some(Self::Get),
            "statistics" => Some(Self::Statistics),
            _ => None,
        }
    }
}

pub(crate) fn run(op: Op, doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    match op {
        Op::SetBuiltin => set_builtin(doc, bag),
        Op::SetCustom => set_custom(doc, bag),
        Op::DeleteCustom => delete_custom(doc, bag),
        Op::Get => Ok(get(doc)),
        Op::Statistics => Ok(statistics(doc)),
    }
}

fn set_builtin(doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    let name = bag.required_str("name")?.to_string();
    let value = bag.present_str("value")?.to_string();
    if !doc.builtin_properties.set(&name, value) {
        return Err(OpError::InvalidArgument(format!(
            "unknown built-in property '{name}' (supported: {})",
            BuiltinProperties::NAMES.join(", ")
        )));
    }
    Ok(OpOutcome::changed(Report::line(format!(
        "Property '{name}' set."
    ))))
}

fn set_custom(doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    let name = bag.required_str("name")?.to_string();
    let value = bag.present_str("value")?.to_string();

    // Names are unique: an existing property is updated in place.
    let verb = match doc
        .custom_properties
        .iter_mut()
        .find(|property| property.name == name)
    {
        Some(existing) => {
            existing.value = value;
            "updated"
        }
        None => {
            doc.custom_properties.push(CustomProperty { name: name.clone(), value });
            "added"
        }
    };

    Ok(OpOutcome::changed(Report::line(format!(
        "Custom property '{name}' {verb}; document has {} custom properties.",
        doc.custom_properties.len()
    ))))
}

fn delete_custom(doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    let name = bag.required_str("name")?;
    let slot = address::custom_property_slot(doc, name)?;
    doc.custom_properties.remove(slot);
    Ok(OpOutcome::changed(Report::line(format!(
        "Custom property '{name}' deleted; {} custom properties remaining.",
        doc.custom_properties.len()
    ))))
}

fn get(doc: &Document) -> OpOutcome {
    let builtin = &doc.builtin_properties;
    let mut builtin_map = Map::new();
    let pairs: [(&str, &Option<String>); 8] = [
        ("title", &builtin.title),
        ("author", &builtin.author),
        ("subject", &builtin.subject),
        ("keywords", &builtin.keywords),
        ("comments", &builtin.comments),
        ("category", &builtin.category),
        ("manager", &builtin.manager),
        ("company", &builtin.company),
    ];
    for (name, value) in pairs {
        if let Some(value) = value {
            builtin_map.insert(name.to_string(), Value::String(value.clone()));
        }
    }

    let custom: Map<String, Value> = doc
        .custom_properties
        .iter()
        .map(|property| (property.name.clone(), Value::String(property.value.clone())))
        .collect();

    OpOutcome::read_only(Report::json(json!({
        "builtin": builtin_map,
        "custom": custom,
        "customCount": doc.custom_properties.len(),
    })))
}

fn statistics(doc: &Document) -> OpOutcome {
    OpOutcome::read_only(Report::json(json!({
        "slides": doc.slides.len(),
        "shapes": doc.shape_count(),
        "words": doc.word_count(),
        "sections": doc.sections.len(),
        "revisions": doc.revisions.len(),
    })))
}
