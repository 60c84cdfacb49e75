//! Whole-document operations: merge, split, convert. These manage their own
//! loading and saving, so they bypass the single-document dispatch path.

use std::fs;
use std::path::PathBuf;

use deckdoc_engine::{save_document, Document, SaveFormat, Section};
use deckdoc_params::ParamBag;

use crate::error::{OpError, OpResult};
use crate::gateway;
use crate::report::Report;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    Merge,
    Split,
    Convert,
}

impl Op {
    pub(crate) const NAMES: &'static [&'static str] = &["merge", "split", "convert"];

    pub(crate) fn parse(name: &str) -> Option<Self> {
        match name {
            "merge" => Some(Self::Merge),
            "split" => Some(Self::Split),
            "convert" => Some(Self::Convert),
            _ => None,
        }
    }
}

pub(crate) fn run(op: Op, bag: &ParamBag) -> OpResult<Report> {
    match op {
        Op::Merge => merge(bag),
        Op::Split => split(bag),
        Op::Convert => convert(bag),
    }
}

fn merge(bag: &ParamBag) -> OpResult<Report> {
    let inputs = gateway::merge_inputs(bag)?;
    let output = PathBuf::from(bag.required_str("outputPath")?);

    let mut merged = Document::default();
    let input_count = inputs.len();
    for input in &inputs {
        let doc = gateway::load(input)?;
        let offset = merged.slides.len();
        merged
            .sections
            .extend(doc.sections.into_iter().map(|section| Section {
                name: section.name,
                first_slide: section.first_slide + offset,
            }));
        merged.slides.extend(doc.slides);
    }

    save_document(&merged, &output, SaveFormat::Json).map_err(gateway::from_engine)?;
    Ok(Report::line(format!(
        "Merged {input_count} document(s) into '{}' with {} slide(s).",
        output.display(),
        merged.slides.len()
    )))
}

fn split(bag: &ParamBag) -> OpResult<Report> {
    let input = gateway::input_path(bag)?;
    let doc = gateway::load(&input)?;
    let output_dir = PathBuf::from(bag.required_str("outputDir")?);

    let count = doc.slides.len();
    if count == 0 {
        return Err(OpError::InvalidState(
            "document has no slides to split".to_string(),
        ));
    }

    // Optional one-based-exclusive style is not used here: start/end are
    // inclusive slide indices, defaulting to the whole deck.
    let start = match bag.opt_i64("start")? {
        Some(raw) => crate::address::resolve(count, raw, "slide")?,
        None => 0,
    };
    let end = match bag.opt_i64("end")? {
        Some(raw) => crate::address::resolve(count, raw, "slide")?,
        None => count - 1,
    };
    if start > end {
        return Err(OpError::InvalidArgument(format!(
            "start index {start} is greater than end index {end}"
        )));
    }

    fs::create_dir_all(&output_dir).map_err(|source| OpError::Io {
        path: output_dir.clone(),
        source,
    })?;

    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "slide".to_string());

    let mut written = 0;
    for (offset, slide) in doc.slides[start..=end].iter().enumerate() {
        let mut part = Document::default();
        part.protection = doc.protection.clone();
        part.builtin_properties = doc.builtin_properties.clone();
        part.header_footer = doc.header_footer.clone();
        part.slides.push(slide.clone());

        let target = output_dir.join(format!("{stem}_{:03}.json", start + offset + 1));
        save_document(&part, &target, SaveFormat::Json).map_err(gateway::from_engine)?;
        written += 1;
    }

    Ok(Report::line(format!(
        "Split '{}' into {written} document(s) under '{}'.",
        input.display(),
        output_dir.display()
    )))
}

fn convert(bag: &ParamBag) -> OpResult<Report> {
    let input = gateway::input_path(bag)?;
    let doc = gateway::load(&input)?;
    let output = PathBuf::from(bag.required_str("outputPath")?);

    let requested = bag.required_str("format")?;
    let format = SaveFormat::parse(requested).ok_or_else(|| OpError::UnsupportedFormat {
        requested: requested.to_string(),
        supported: SaveFormat::NAMES.join(", "),
    })?;

    save_document(&doc, &output, format).map_err(gateway::from_engine)?;
    Ok(Report::line(format!(
        "Converted '{}' to {} at '{}'.",
        input.display(),
        format.name(),
        output.display()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use deckdoc_engine::Slide;
    use serde_json::json;
    use tempfile::tempdir;

    fn bag(value: serde_json::Value) -> ParamBag {
        ParamBag::from_value(value).unwrap()
    }

    fn deck(slides: usize) -> Document {
        let mut doc = Document::default();
        for _ in 0..slides {
            doc.slides.push(Slide::default());
        }
        doc
    }

    #[test]
    fn merge_concatenates_slides_and_offsets_sections() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.json");
        let b = dir.path().join("b.json");
        let out = dir.path().join("merged.json");

        let mut first = deck(2);
        first.sections.push(Section {
            name: "Intro".to_string(),
            first_slide: 0,
        });
        save_document(&first, &a, SaveFormat::Json).unwrap();

        let mut second = deck(3);
        second.sections.push(Section {
            name: "Appendix".to_string(),
            first_slide: 1,
        });
        save_document(&second, &b, SaveFormat::Json).unwrap();

        let report = run(
            Op::Merge,
            &bag(json!({
                "inputPaths": [a.to_str().unwrap(), b.to_str().unwrap()],
                "outputPath": out.to_str().unwrap(),
            })),
        )
        .unwrap();
        assert!(report.render().contains("5 slide(s)"));

        let merged = gateway::load(&out).unwrap();
        assert_eq!(merged.slides.len(), 5);
        assert_eq!(merged.sections[1].first_slide, 3);
    }

    #[test]
    fn split_writes_one_document_per_slide() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("deck.json");
        let out_dir = dir.path().join("parts");
        save_document(&deck(3), &input, SaveFormat::Json).unwrap();

        run(
            Op::Split,
            &bag(json!({
                "path": input.to_str().unwrap(),
                "outputDir": out_dir.to_str().unwrap(),
            })),
        )
        .unwrap();

        for n in 1..=3 {
            let part = gateway::load(&out_dir.join(format!("deck_{n:03}.json"))).unwrap();
            assert_eq!(part.slides.len(), 1);
        }
    }

    #[test]
    fn split_checks_the_range_before_writing() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("deck.json");
        let out_dir = dir.path().join("parts");
        save_document(&deck(2), &input, SaveFormat::Json).unwrap();

        let err = run(
            Op::Split,
            &bag(json!({
                "path": input.to_str().unwrap(),
                "outputDir": out_dir.to_str().unwrap(),
                "start": 0,
                "end": 5,
            })),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(!out_dir.exists());
    }

    #[test]
    fn convert_requires_a_recognised_format() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("deck.json");
        save_document(&deck(1), &input, SaveFormat::Json).unwrap();

        let err = run(
            Op::Convert,
            &bag(json!({
                "path": input.to_str().unwrap(),
                "outputPath": dir.path().join("deck.pdf").to_str().unwrap(),
                "format": "pdf",
            })),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);

        let report = run(
            Op::Convert,
            &bag(json!({
                "path": input.to_str().unwrap(),
                "outputPath": dir.path().join("deck.md").to_str().unwrap(),
                "format": "md",
            })),
        )
        .unwrap();
        assert!(report.render().contains("deck.md"));
    }
}
