//! Shape-level operations: creation, deletion, font formatting, listing.

use deckdoc_engine::{Document, Frame, PictureRef, Shape, ShapeKind};
use deckdoc_params::ParamBag;
use serde_json::json;
use std::path::PathBuf;

use crate::address;
use crate::error::OpResult;
use crate::gateway;
use crate::report::{OpOutcome, Report};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    AddTextbox,
    AddPicture,
    Delete,
    SetFont,
    List,
}

impl Op {
    pub(crate) const NAMES: &'static [&'static str] =
        &["add-textbox", "add-picture", "delete", "set-font", "list"];

    pub(crate) fn parse(name: &str) -> Option<Self> {
        match name {
            "add-textbox" => Some(Self::AddTextbox),
            "add-picture" => Some(Self::AddPicture),
            "delete" => Some(Self::Delete),
            "set-font" => Some(Self::SetFont),
            "list" => Some(Self::List),
            _ => None,
        }
    }
}

pub(crate) fn run(op: Op, doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    match op {
        Op::AddTextbox => add_textbox(doc, bag),
        Op::AddPicture => add_picture(doc, bag),
        Op::Delete => delete(doc, bag),
        Op::SetFont => set_font(doc, bag),
        Op::List => list(doc, bag),
    }
}

fn frame_from(bag: &ParamBag) -> OpResult<Frame> {
    Ok(Frame::new(
        bag.f64_or("x", 0.0)?,
        bag.f64_or("y", 0.0)?,
        bag.f64_or("width", 100.0)?,
        bag.f64_or("height", 50.0)?,
    ))
}

fn add_textbox(doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    let slide_index = bag.required_i64("slideIndex")?;
    let text = bag.str_or("text", "")?;
    let name = bag.str_or("name", "textbox")?;
    let frame = frame_from(bag)?;

    let slide = address::slide_mut(doc, slide_index)?;
    slide.shapes.push(Shape::text_box(name, frame, &text));

    Ok(OpOutcome::changed(Report::line(format!(
        "Added text box to slide {slide_index} at shape index {}.",
        slide.shapes.len() - 1
    ))))
}

fn add_picture(doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    let slide_index = bag.required_i64("slideIndex")?;
    let image_path = PathBuf::from(bag.required_str("imagePath")?);
    // The side input must exist before the engine is asked to embed it.
    gateway::require_file(&image_path, "image")?;
    let frame = frame_from(bag)?;

    let slide = address::slide_mut(doc, slide_index)?;
    slide.shapes.push(Shape {
        name: bag.str_or("name", "picture")?,
        frame,
        hyperlink: None,
        kind: ShapeKind::Picture(PictureRef {
            source: image_path.display().to_string(),
        }),
    });

    Ok(OpOutcome::changed(Report::line(format!(
        "Added picture '{}' to slide {slide_index} at shape index {}.",
        image_path.display(),
        slide.shapes.len() - 1
    ))))
}

fn delete(doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    let slide_index = bag.required_i64("slideIndex")?;
    let shape_index = bag.required_i64("shapeIndex")?;
    let slide = address::slide_mut(doc, slide_index)?;
    // Resolve for the bounds error message, then remove by the same slot.
    address::shape(slide, slide_index, shape_index)?;
    let removed = slide.shapes.remove(shape_index as usize);

    Ok(OpOutcome::changed(Report::line(format!(
        "Deleted {} '{}' from slide {slide_index}; {} shapes remaining.",
        removed.kind.kind_name(),
        removed.name,
        slide.shapes.len()
    ))))
}

fn set_font(doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    let slide_index = bag.required_i64("slideIndex")?;
    let shape_index = bag.required_i64("shapeIndex")?;
    let family = bag.opt_str("fontFamily")?.map(str::to_string);
    let size = bag.opt_f64("size")?;
    let color = bag.opt_str("color")?.map(str::to_string);
    let bold = bag.contains("bold").then(|| bag.bool_or("bold", false)).transpose()?;
    let italic = bag
        .contains("italic")
        .then(|| bag.bool_or("italic", false))
        .transpose()?;

    let slide = address::slide_mut(doc, slide_index)?;
    let shape = address::shape_mut(slide, slide_index, shape_index)?;
    let body = address::text_body_mut(shape)?;

    let mut portions = 0;
    for paragraph in &mut body.paragraphs {
        for portion in &mut paragraph.portions {
            if let Some(family) = &family {
                portion.font.family = Some(family.clone());
            }
            if let Some(size) = size {
                portion.font.size = Some(size);
            }
            if let Some(color) = &color {
                portion.font.color = Some(color.clone());
            }
            if let Some(bold) = bold {
                portion.font.bold = bold;
            }
            if let Some(italic) = italic {
                portion.font.italic = italic;
            }
            portions += 1;
        }
    }

    Ok(OpOutcome::changed(Report::line(format!(
        "Updated font on {portions} portion(s) of shape {shape_index} on slide {slide_index}."
    ))))
}

fn list(doc: &Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    let slide_index = bag.required_i64("slideIndex")?;
    let slide = address::slide(doc, slide_index)?;

    let shapes: Vec<_> = slide
        .shapes
        .iter()
        .enumerate()
        .map(|(index, shape)| {
            json!({
                "index": index,
                "name": shape.name,
                "type": shape.kind.kind_name(),
            })
        })
        .collect();

    Ok(OpOutcome::read_only(Report::json(json!({
        "slideIndex": slide_index,
        "count": slide.shapes.len(),
        "shapes": shapes,
    }))))
}
