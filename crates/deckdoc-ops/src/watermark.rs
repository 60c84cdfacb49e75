//! Text watermarks: one tagged shape per slide.

use deckdoc_engine::{
    Alignment, Document, FontFormat, Frame, Paragraph, Portion, Shape, ShapeKind, TextBody,
};
use deckdoc_params::ParamBag;

use crate::error::OpResult;
use crate::report::{OpOutcome, Report};

const WATERMARK_NAME: &str = "watermark";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    Add,
    Delete,
}

impl Op {
    pub(crate) const NAMES: &'static [&'static str] = &["add", "delete"];

    pub(crate) fn parse(name: &str) -> Option<Self> {
        match name {
            "add" => Some(Self::Add),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

pub(crate) fn run(op: Op, doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    match op {
        Op::Add => add(doc, bag),
        Op::Delete => Ok(delete(doc)),
    }
}

fn add(doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    let text = bag.str_or("text", "CONFIDENTIAL")?;
    let font = FontFormat {
        family: bag.opt_str("fontFamily")?.map(str::to_string),
        size: bag.opt_f64("fontSize")?,
        bold: false,
        italic: false,
        color: bag.opt_str("color")?.map(str::to_string),
    };

    let slides = doc.slides.len();
    for slide in &mut doc.slides {
        slide.shapes.push(Shape {
            name: WATERMARK_NAME.to_string(),
            frame: Frame::new(0.0, 0.0, 720.0, 540.0),
            hyperlink: None,
            kind: ShapeKind::TextBox(TextBody {
                paragraphs: vec![Paragraph {
                    alignment: Alignment::Center,
                    portions: vec![Portion {
                        text: text.clone(),
                        font: font.clone(),
                        hyperlink: None,
                    }],
                }],
            }),
        });
    }

    let report = Report::line(format!("Watermark '{text}' added to {slides} slide(s)."));
    if slides > 0 {
        Ok(OpOutcome::changed(report))
    } else {
        Ok(OpOutcome::read_only(report))
    }
}

fn delete(doc: &mut Document) -> OpOutcome {
    let mut removed = 0;
    for slide in &mut doc.slides {
        let before = slide.shapes.len();
        slide.shapes.retain(|shape| shape.name != WATERMARK_NAME);
        removed += before - slide.shapes.len();
    }

    let report = Report::line(format!("Removed {removed} watermark shape(s)."));
    if removed > 0 {
        OpOutcome::changed(report)
    } else {
        OpOutcome::read_only(report)
    }
}
