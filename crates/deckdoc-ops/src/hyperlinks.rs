//! Hyperlink operations at whole-shape and sub-range ("portion") granularity.

use deckdoc_engine::{Document, Portion, Shape, ShapeKind};
use deckdoc_params::ParamBag;
use serde_json::json;

use crate::address;
use crate::error::{OpError, OpResult};
use crate::report::{OpOutcome, Report};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    AddShape,
    AddPortion,
    Delete,
    List,
}

impl Op {
    pub(crate) const NAMES: &'static [&'static str] =
        &["add-shape", "add-portion", "delete", "list"];

    pub(crate) fn parse(name: &str) -> Option<Self> {
        match name {
            "add-shape" => Some(Self::AddShape),
            "add-portion" => Some(Self::AddPortion),
            "delete" => Some(Self::Delete),
            "list" => Some(Self::List),
            _ => None,
        }
    }
}

pub(crate) fn run(op: Op, doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    match op {
        Op::AddShape => add_shape(doc, bag),
        Op::AddPortion => add_portion(doc, bag),
        Op::Delete => delete(doc, bag),
        Op::List => Ok(list(doc)),
    }
}

fn add_shape(doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    let slide_index = bag.required_i64("slideIndex")?;
    let shape_index = bag.required_i64("shapeIndex")?;
    let url = bag.required_str("url")?.to_string();

    let slide = address::slide_mut(doc, slide_index)?;
    let shape = address::shape_mut(slide, slide_index, shape_index)?;
    shape.hyperlink = Some(url.clone());

    Ok(OpOutcome::changed(Report::line(format!(
        "Hyperlink '{url}' added to shape {shape_index} on slide {slide_index}."
    ))))
}

/// Attach a hyperlink to a substring of the shape's text. The match is
/// located in the paragraph's concatenated text, so it may span several
/// runs; every run is split at the match boundaries and keeps its original
/// formatting, with only the matched pieces carrying the link.
fn add_portion(doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    let slide_index = bag.required_i64("slideIndex")?;
    let shape_index = bag.required_i64("shapeIndex")?;
    let link_text = bag.required_str("linkText")?.to_string();
    let url = bag.required_str("url")?.to_string();

    let slide = address::slide_mut(doc, slide_index)?;
    let shape = address::shape_mut(slide, slide_index, shape_index)?;
    let body = address::text_body_mut(shape)?;

    for paragraph in &mut body.paragraphs {
        let Some(start) = paragraph.text().find(&link_text) else {
            continue;
        };
        let end = start + link_text.len();

        // Match offsets are bytes into the concatenated run text; each run
        // contributes the slice of the match it overlaps.
        let mut rebuilt = Vec::with_capacity(paragraph.portions.len() + 2);
        let mut offset = 0;
        for portion in paragraph.portions.drain(..) {
            let run_start = offset;
            let run_end = offset + portion.text.len();
            offset = run_end;

            if run_end <= start || run_start >= end {
                rebuilt.push(portion);
                continue;
            }

            let cut_from = start.saturating_sub(run_start);
            let cut_to = end.min(run_end) - run_start;
            if cut_from > 0 {
                rebuilt.push(Portion {
                    text: portion.text[..cut_from].to_string(),
                    font: portion.font.clone(),
                    hyperlink: portion.hyperlink.clone(),
                });
            }
            rebuilt.push(Portion {
                text: portion.text[cut_from..cut_to].to_string(),
                font: portion.font.clone(),
                hyperlink: Some(url.clone()),
            });
            if cut_to < portion.text.len() {
                rebuilt.push(Portion {
                    text: portion.text[cut_to..].to_string(),
                    font: portion.font.clone(),
                    hyperlink: portion.hyperlink,
                });
            }
        }
        paragraph.portions = rebuilt;

        return Ok(OpOutcome::changed(Report::line(format!(
            "Hyperlink '{url}' added to text '{link_text}' on slide {slide_index}."
        ))));
    }

    Err(OpError::InvalidArgument(format!(
        "linkText '{link_text}' not found in text of shape {shape_index} on slide {slide_index}"
    )))
}

fn delete(doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    let slide_index = bag.required_i64("slideIndex")?;
    let shape_index = bag.required_i64("shapeIndex")?;

    let slide = address::slide_mut(doc, slide_index)?;
    let shape = address::shape_mut(slide, slide_index, shape_index)?;

    let mut removed = 0;
    if shape.hyperlink.take().is_some() {
        removed += 1;
    }
    if let ShapeKind::TextBox(body) = &mut shape.kind {
        for paragraph in &mut body.paragraphs {
            for portion in &mut paragraph.portions {
                if portion.hyperlink.take().is_some() {
                    removed += 1;
                }
            }
        }
    }

    let report = Report::line(format!(
        "Removed {removed} hyperlink(s) from shape {shape_index} on slide {slide_index}."
    ));
    if removed > 0 {
        Ok(OpOutcome::changed(report))
    } else {
        Ok(OpOutcome::read_only(report))
    }
}

fn list(doc: &Document) -> OpOutcome {
    let mut links = Vec::new();
    for (slide_index, slide) in doc.slides.iter().enumerate() {
        for (shape_index, shape) in slide.shapes.iter().enumerate() {
            collect_links(shape, slide_index, shape_index, &mut links);
        }
    }
    OpOutcome::read_only(Report::json(json!({
        "count": links.len(),
        "hyperlinks": links,
    })))
}

fn collect_links(
    shape: &Shape,
    slide_index: usize,
    shape_index: usize,
    links: &mut Vec<serde_json::Value>,
) {
    if let Some(url) = &shape.hyperlink {
        links.push(json!({
            "slideIndex": slide_index,
            "shapeIndex": shape_index,
            "url": url,
            "scope": "shape",
        }));
    }
    match &shape.kind {
        ShapeKind::TextBox(body) => {
            for paragraph in &body.paragraphs {
                for portion in &paragraph.portions {
                    if let Some(url) = &portion.hyperlink {
                        links.push(json!({
                            "slideIndex": slide_index,
                            "shapeIndex": shape_index,
                            "url": url,
                            "scope": "portion",
                            "text": portion.text,
                        }));
                    }
                }
            }
        }
        ShapeKind::Group(children) => {
            for child in children {
                collect_links(child, slide_index, shape_index, links);
            }
        }
        _ => {}
    }
}
