use std::path::PathBuf;

use deckdoc_engine::{
    load_document, save_document, Document, FontFormat, Frame, Portion, SaveFormat, Shape,
    ShapeKind, Slide, Table, TextBody,
};
use deckdoc_ops::{dispatch, ErrorKind, Report};
use deckdoc_params::ParamBag;
use serde_json::json;
use tempfile::TempDir;

fn write_deck(dir: &TempDir, name: &str, doc: &Document) -> PathBuf {
    let path = dir.path().join(name);
    save_document(doc, &path, SaveFormat::Json).expect("write fixture");
    path
}

fn bag(value: serde_json::Value) -> ParamBag {
    ParamBag::from_value(value).expect("params are an object")
}

/// One slide holding a text box, a filled table cell and a grouped text box,
/// each containing the word "Old", plus notes that also mention it.
fn deck_with_old_everywhere() -> Document {
    let mut table = Table::with_size(2, 2);
    table.rows[1].cells[0].body = TextBody::from_text("Old data");

    let mut slide = Slide::default();
    slide.shapes.push(Shape::text_box(
        "title",
        Frame::new(0.0, 0.0, 100.0, 40.0),
        "Old title",
    ));
    slide.shapes.push(Shape {
        name: "grid".to_string(),
        frame: Frame::default(),
        hyperlink: None,
        kind: ShapeKind::Table(table),
    });
    slide.shapes.push(Shape {
        name: "cluster".to_string(),
        frame: Frame::default(),
        hyperlink: None,
        kind: ShapeKind::Group(vec![Shape::text_box(
            "inner",
            Frame::default(),
            "Old caption",
        )]),
    });
    slide.notes = Some("Mention Old here too".to_string());

    let mut doc = Document::default();
    doc.slides.push(slide);
    doc
}

#[test]
fn replace_reaches_tables_groups_and_notes() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_deck(&dir, "deck.json", &deck_with_old_everywhere());

    let report = dispatch(
        "text.replace",
        &bag(json!({
            "path": path.to_str().unwrap(),
            "find": "Old",
            "replace": "New",
        })),
    )
    .expect("replace succeeds");
    assert!(report.render().contains("Replaced 4 occurrence(s)"));

    let saved = load_document(&path).unwrap();
    let text = saved.plain_text();
    assert!(!text.contains("Old"));
    assert!(text.contains("New title"));
    assert!(text.contains("New data"));
    assert!(text.contains("New caption"));
    assert_eq!(saved.slides[0].notes.as_deref(), Some("Mention New here too"));
}

#[test]
fn replace_is_case_sensitive_by_default() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_deck(&dir, "deck.json", &deck_with_old_everywhere());

    let report = dispatch(
        "text.replace",
        &bag(json!({
            "path": path.to_str().unwrap(),
            "find": "old",
            "replace": "new",
        })),
    )
    .expect("replace succeeds");
    assert!(report.render().contains("Replaced 0 occurrence(s)"));
}

#[test]
fn literal_replacement_does_not_expand_dollar_groups() {
    let dir = TempDir::new().expect("tempdir");
    let mut doc = Document::default();
    let mut slide = Slide::default();
    slide
        .shapes
        .push(Shape::text_box("body", Frame::default(), "price: Old"));
    doc.slides.push(slide);
    let path = write_deck(&dir, "deck.json", &doc);

    dispatch(
        "text.replace",
        &bag(json!({
            "path": path.to_str().unwrap(),
            "find": "Old",
            "replace": "$1 new",
        })),
    )
    .expect("replace succeeds");

    let saved = load_document(&path).unwrap();
    assert!(saved.plain_text().contains("price: $1 new"));
}

#[test]
fn search_caps_matches_but_counts_them_all() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_deck(&dir, "deck.json", &deck_with_old_everywhere());

    let report = dispatch(
        "text.search",
        &bag(json!({
            "path": path.to_str().unwrap(),
            "query": "Old",
            "maxResults": 2,
        })),
    )
    .expect("search succeeds");
    let Report::Json(value) = report else {
        panic!("text.search returns JSON");
    };
    // Notes are not shapes; three matches live in shapes.
    assert_eq!(value["count"], 3);
    assert_eq!(value["truncated"], true);
    assert_eq!(value["matches"].as_array().unwrap().len(), 2);
}

#[test]
fn invalid_regex_pattern_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_deck(&dir, "deck.json", &deck_with_old_everywhere());

    let err = dispatch(
        "text.search",
        &bag(json!({
            "path": path.to_str().unwrap(),
            "query": "(unclosed",
            "regex": true,
        })),
    )
    .expect_err("bad pattern fails");
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(err.to_string().contains("(unclosed"));
}

#[test]
fn portion_hyperlink_splits_the_run_around_the_match() {
    let dir = TempDir::new().expect("tempdir");
    let mut doc = Document::default();
    let mut slide = Slide::default();
    slide.shapes.push(Shape::text_box(
        "body",
        Frame::default(),
        "Please click here for more info",
    ));
    doc.slides.push(slide);
    let path = write_deck(&dir, "deck.json", &doc);

    dispatch(
        "hyperlinks.add-portion",
        &bag(json!({
            "path": path.to_str().unwrap(),
            "slideIndex": 0,
            "shapeIndex": 0,
            "linkText": "here",
            "url": "https://example.com/info",
        })),
    )
    .expect("add-portion succeeds");

    let saved = load_document(&path).unwrap();
    let ShapeKind::TextBox(body) = &saved.slides[0].shapes[0].kind else {
        panic!("shape stays a text box");
    };
    let portions = &body.paragraphs[0].portions;
    assert_eq!(portions.len(), 3);
    assert_eq!(portions[0].text, "Please click ");
    assert_eq!(portions[1].text, "here");
    assert_eq!(portions[2].text, " for more info");
    assert_eq!(
        portions[1].hyperlink.as_deref(),
        Some("https://example.com/info")
    );
    assert_eq!(portions[0].hyperlink, None);
    assert_eq!(portions[2].hyperlink, None);
    // The visible text is unchanged by the split.
    assert_eq!(body.text(), "Please click here for more info");
}

#[test]
fn portion_hyperlink_matches_across_run_boundaries() {
    let dir = TempDir::new().expect("tempdir");
    let mut doc = Document::default();
    let mut slide = Slide::default();
    // One paragraph split into two formatting runs; "here" straddles the
    // boundary and only exists in the concatenated text.
    let mut shape = Shape::text_box("body", Frame::default(), "click he");
    if let ShapeKind::TextBox(body) = &mut shape.kind {
        body.paragraphs[0].portions.push(Portion {
            text: "re now".to_string(),
            font: FontFormat {
                bold: true,
                ..FontFormat::default()
            },
            hyperlink: None,
        });
    }
    slide.shapes.push(shape);
    doc.slides.push(slide);
    let path = write_deck(&dir, "deck.json", &doc);

    dispatch(
        "hyperlinks.add-portion",
        &bag(json!({
            "path": path.to_str().unwrap(),
            "slideIndex": 0,
            "shapeIndex": 0,
            "linkText": "here",
            "url": "https://example.com/info",
        })),
    )
    .expect("match across runs succeeds");

    let saved = load_document(&path).unwrap();
    let ShapeKind::TextBox(body) = &saved.slides[0].shapes[0].kind else {
        panic!("shape stays a text box");
    };
    let paragraph = &body.paragraphs[0];
    // The visible text is unchanged and the linked pieces spell the match.
    assert_eq!(paragraph.text(), "click here now");
    let linked: String = paragraph
        .portions
        .iter()
        .filter(|portion| portion.hyperlink.is_some())
        .map(|portion| portion.text.as_str())
        .collect();
    assert_eq!(linked, "here");
    // Each run keeps its own formatting through the split.
    assert!(paragraph.portions.iter().any(|p| p.text == "re" && p.font.bold));
    assert!(paragraph.portions.iter().any(|p| p.text == "he" && !p.font.bold));
}

#[test]
fn missing_link_text_names_the_needle() {
    let dir = TempDir::new().expect("tempdir");
    let mut doc = Document::default();
    let mut slide = Slide::default();
    slide
        .shapes
        .push(Shape::text_box("body", Frame::default(), "nothing to see"));
    doc.slides.push(slide);
    let path = write_deck(&dir, "deck.json", &doc);

    let err = dispatch(
        "hyperlinks.add-portion",
        &bag(json!({
            "path": path.to_str().unwrap(),
            "slideIndex": 0,
            "shapeIndex": 0,
            "linkText": "absent",
            "url": "https://example.com",
        })),
    )
    .expect_err("missing text fails");
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(err.to_string().contains("absent"));
}

#[test]
fn table_cell_edits_round_trip() {
    let dir = TempDir::new().expect("tempdir");
    let mut doc = Document::default();
    doc.slides.push(Slide::default());
    let path = write_deck(&dir, "deck.json", &doc);
    let path_str = path.to_str().unwrap();

    dispatch(
        "tables.create",
        &bag(json!({"path": path_str, "slideIndex": 0, "rows": 2, "columns": 3})),
    )
    .expect("create");
    dispatch(
        "tables.set-cell",
        &bag(json!({
            "path": path_str,
            "slideIndex": 0,
            "shapeIndex": 0,
            "rowIndex": 1,
            "columnIndex": 2,
            "text": "total",
        })),
    )
    .expect("set-cell");
    dispatch(
        "tables.insert-column",
        &bag(json!({"path": path_str, "slideIndex": 0, "shapeIndex": 0, "columnIndex": 0})),
    )
    .expect("insert-column");

    let saved = load_document(&path).unwrap();
    let ShapeKind::Table(table) = &saved.slides[0].shapes[0].kind else {
        panic!("shape is a table");
    };
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.column_count(), 4);
    // The filled cell shifted right by the prepended column.
    assert_eq!(table.rows[1].cells[3].body.text(), "total");
}

#[test]
fn row_bulk_delete_reports_every_invalid_index_and_touches_nothing() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_deck(&dir, "deck.json", &deck_with_old_everywhere());
    let before = std::fs::read_to_string(&path).expect("read fixture");

    // The table in the fixture has two rows; 1 is valid, the rest are not.
    let err = dispatch(
        "tables.delete-rows",
        &bag(json!({
            "path": path.to_str().unwrap(),
            "slideIndex": 0,
            "shapeIndex": 1,
            "indices": [1, 4, -2],
        })),
    )
    .expect_err("invalid row indices fail");
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    let message = err.to_string();
    assert!(message.contains('4'));
    assert!(message.contains("-2"));

    let after = std::fs::read_to_string(&path).expect("read fixture again");
    assert_eq!(before, after, "a failed bulk delete must not write");
}

#[test]
fn addressing_a_text_box_as_a_table_is_invalid() {
    let dir = TempDir::new().expect("tempdir");
    let mut doc = Document::default();
    let mut slide = Slide::default();
    slide
        .shapes
        .push(Shape::text_box("body", Frame::default(), "words"));
    doc.slides.push(slide);
    let path = write_deck(&dir, "deck.json", &doc);

    let err = dispatch(
        "tables.insert-row",
        &bag(json!({"path": path.to_str().unwrap(), "slideIndex": 0, "shapeIndex": 0})),
    )
    .expect_err("wrong shape kind fails");
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(err.to_string().contains("TextBox"));
}
