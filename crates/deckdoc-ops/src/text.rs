//! Text content operations: paragraph edits, find/replace and search.

use deckdoc_engine::{Alignment, Document, Paragraph, Shape, ShapeKind};
use deckdoc_params::ParamBag;
use regex::{NoExpand, Regex, RegexBuilder};
use serde_json::json;

use crate::address;
use crate::error::{OpError, OpResult};
use crate::report::{OpOutcome, Report};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    AddParagraph,
    EditPortion,
    AlignParagraph,
    Replace,
    Search,
    Get,
}

impl Op {
    pub(crate) const NAMES: &'static [&'static str] = &[
        "add-paragraph",
        "edit-portion",
        "align-paragraph",
        "replace",
        "search",
        "get",
    ];

    pub(crate) fn parse(name: &str) -> Option<Self> {
        match name {
            "add-paragraph" => Some(Self::AddParagraph),
            "edit-portion" => Some(Self::EditPortion),
            "align-paragraph" => Some(Self::AlignParagraph),
            "replace" => Some(Self::Replace),
            "search" => Some(Self::Search),
            "get" => Some(Self::Get),
            _ => None,
        }
    }
}

pub(crate) fn run(op: Op, doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    match op {
        Op::AddParagraph => add_paragraph(doc, bag),
        Op::EditPortion => edit_portion(doc, bag),
        Op::AlignParagraph => align_paragraph(doc, bag),
        Op::Replace => replace(doc, bag),
        Op::Search => search(doc, bag),
        Op::Get => get(doc, bag),
    }
}

fn parse_alignment(bag: &ParamBag, key: &str) -> OpResult<Option<Alignment>> {
    match bag.opt_str(key)? {
        None => Ok(None),
        Some(name) => Alignment::parse(name).map(Some).ok_or_else(|| {
            OpError::InvalidArgument(format!(
                "unsupported alignment '{name}' (supported: {})",
                Alignment::NAMES.join(", ")
            ))
        }),
    }
}

fn add_paragraph(doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    let slide_index = bag.required_i64("slideIndex")?;
    let shape_index = bag.required_i64("shapeIndex")?;
    let text = bag.required_str("text")?.to_string();
    let alignment = parse_alignment(bag, "alignment")?;

    let slide = address::slide_mut(doc, slide_index)?;
    let shape = address::shape_mut(slide, slide_index, shape_index)?;
    let body = address::text_body_mut(shape)?;

    let mut paragraph = Paragraph::from_text(&text);
    if let Some(alignment) = alignment {
        paragraph.alignment = alignment;
    }
    body.paragraphs.push(paragraph);

    Ok(OpOutcome::changed(Report::line(format!(
        "Added paragraph to shape {shape_index} on slide {slide_index}; shape now has {} paragraphs.",
        body.paragraphs.len()
    ))))
}

fn edit_portion(doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    let slide_index = bag.required_i64("slideIndex")?;
    let text = bag.present_str("text")?.to_string();

    let slide = address::slide_mut(doc, slide_index)?;
    let shape = address::shape_mut(slide, slide_index, bag.required_i64("shapeIndex")?)?;
    let body = address::text_body_mut(shape)?;

    let paragraph_slot = address::resolve(
        body.paragraphs.len(),
        bag.required_i64("paragraphIndex")?,
        "paragraph",
    )?;
    let paragraph = &mut body.paragraphs[paragraph_slot];
    let portion_slot = address::resolve(
        paragraph.portions.len(),
        bag.required_i64("portionIndex")?,
        "portion",
    )?;

    let previous = std::mem::replace(&mut paragraph.portions[portion_slot].text, text);
    Ok(OpOutcome::changed(Report::line(format!(
        "Updated portion {portion_slot} of paragraph {paragraph_slot}; previous text was '{previous}'."
    ))))
}

fn align_paragraph(doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    let slide_index = bag.required_i64("slideIndex")?;
    let alignment = parse_alignment(bag, "alignment")?.ok_or_else(|| {
        OpError::InvalidArgument("missing required parameter 'alignment'".to_string())
    })?;

    let slide = address::slide_mut(doc, slide_index)?;
    let shape = address::shape_mut(slide, slide_index, bag.required_i64("shapeIndex")?)?;
    let body = address::text_body_mut(shape)?;
    let paragraph_slot = address::resolve(
        body.paragraphs.len(),
        bag.required_i64("paragraphIndex")?,
        "paragraph",
    )?;

    body.paragraphs[paragraph_slot].alignment = alignment;
    Ok(OpOutcome::changed(Report::line(format!(
        "Paragraph {paragraph_slot} alignment set to {}.",
        alignment.name()
    ))))
}

fn build_matcher(pattern: &str, case_sensitive: bool, use_regex: bool) -> OpResult<Regex> {
    let source = if use_regex {
        pattern.to_string()
    } else {
        regex::escape(pattern)
    };
    RegexBuilder::new(&source)
        .case_insensitive(!case_sensitive)
        .build()
        .map_err(|err| OpError::InvalidArgument(format!("invalid pattern '{pattern}': {err}")))
}

fn replace_in(text: &mut String, matcher: &Regex, replacement: &str, expand: bool) -> usize {
    let count = matcher.find_iter(text).count();
    if count > 0 {
        let replaced = if expand {
            matcher.replace_all(text, replacement)
        } else {
            matcher.replace_all(text, NoExpand(replacement))
        };
        *text = replaced.into_owned();
    }
    count
}

/// Find/replace across every text-bearing element: text boxes, table cells,
/// nested group shapes and slide notes. Reports the total occurrence count.
fn replace(doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    let find = bag.required_str("find")?.to_string();
    let replacement = bag.present_str("replace")?.to_string();
    let case_sensitive = bag.bool_or("caseSensitive", true)?;
    let use_regex = bag.bool_or("regex", false)?;
    let matcher = build_matcher(&find, case_sensitive, use_regex)?;

    let mut total = 0usize;
    doc.for_each_text_body_mut(&mut |body| {
        for paragraph in &mut body.paragraphs {
            for portion in &mut paragraph.portions {
                total += replace_in(&mut portion.text, &matcher, &replacement, use_regex);
            }
        }
    });
    for slide in &mut doc.slides {
        if let Some(notes) = &mut slide.notes {
            total += replace_in(notes, &matcher, &replacement, use_regex);
        }
    }

    let report = Report::line(format!("Replaced {total} occurrence(s) of '{find}'."));
    if total > 0 {
        Ok(OpOutcome::changed(report))
    } else {
        Ok(OpOutcome::read_only(report))
    }
}

fn search(doc: &Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    let query = bag.required_str("query")?.to_string();
    let case_sensitive = bag.bool_or("caseSensitive", true)?;
    let use_regex = bag.bool_or("regex", false)?;
    let matcher = build_matcher(&query, case_sensitive, use_regex)?;

    let cap = match bag.opt_i64("maxResults")? {
        None => None,
        Some(value) if value > 0 => Some(value as usize),
        Some(value) => {
            return Err(OpError::InvalidArgument(format!(
                "parameter 'maxResults' must be positive, got {value}"
            )))
        }
    };

    let mut total = 0usize;
    let mut matches = Vec::new();
    for (slide_index, slide) in doc.slides.iter().enumerate() {
        for (shape_index, shape) in slide.shapes.iter().enumerate() {
            collect_matches(
                shape,
                slide_index,
                shape_index,
                &matcher,
                cap,
                &mut total,
                &mut matches,
            );
        }
    }

    let truncated = matches.len() < total;
    Ok(OpOutcome::read_only(Report::json(json!({
        "query": query,
        "count": total,
        "truncated": truncated,
        "matches": matches,
    }))))
}

fn collect_matches(
    shape: &Shape,
    slide_index: usize,
    shape_index: usize,
    matcher: &Regex,
    cap: Option<usize>,
    total: &mut usize,
    matches: &mut Vec<serde_json::Value>,
) {
    match &shape.kind {
        ShapeKind::TextBox(body) => {
            for paragraph in &body.paragraphs {
                for portion in &paragraph.portions {
                    for found in matcher.find_iter(&portion.text) {
                        *total += 1;
                        if cap.map_or(true, |cap| matches.len() < cap) {
                            matches.push(json!({
                                "slideIndex": slide_index,
                                "shapeIndex": shape_index,
                                "text": found.as_str(),
                            }));
                        }
                    }
                }
            }
        }
        ShapeKind::Table(table) => {
            for row in &table.rows {
                for cell in &row.cells {
                    for paragraph in &cell.body.paragraphs {
                        for portion in &paragraph.portions {
                            for found in matcher.find_iter(&portion.text) {
                                *total += 1;
                                if cap.map_or(true, |cap| matches.len() < cap) {
                                    matches.push(json!({
                                        "slideIndex": slide_index,
                                        "shapeIndex": shape_index,
                                        "text": found.as_str(),
                                    }));
                                }
                            }
                        }
                    }
                }
            }
        }
        ShapeKind::Group(children) => {
            // Group members report the top-level shape's index.
            for child in children {
                collect_matches(child, slide_index, shape_index, matcher, cap, total, matches);
            }
        }
        ShapeKind::Picture(_) => {}
    }
}

fn get(doc: &Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    match bag.opt_i64("slideIndex")? {
        Some(index) => {
            let slot = address::resolve(doc.slides.len(), index, "slide")?;
            let slide = &doc.slides[slot];
            let mut text = String::new();
            for shape in &slide.shapes {
                let shape_text = shape.text();
                if !shape_text.is_empty() {
                    if !text.is_empty() {
                        text.push('\n');
                    }
                    text.push_str(&shape_text);
                }
            }
            Ok(OpOutcome::read_only(Report::json(json!({
                "slideIndex": slot,
                "text": text,
                "hasNotes": slide.has_notes(),
            }))))
        }
        None => Ok(OpOutcome::read_only(Report::json(json!({
            "totalSlides": doc.slides.len(),
            "text": doc.plain_text(),
        })))),
    }
}
