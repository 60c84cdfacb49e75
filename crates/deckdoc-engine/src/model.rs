//! The content tree: slides, shapes, paragraphs, portions, tables.
//!
//! Every ordered collection is plain indexed storage (`Vec`); addressing is
//! done by validated index lookups in the operation layer, never by holding
//! references across mutations.

use serde::{Deserialize, Serialize};

/// One loaded slide-deck document. Exclusively owned by a single operation
/// invocation: loaded fresh, mutated by at most one handler, then persisted
/// or discarded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub slides: Vec<Slide>,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub protection: Protection,
    #[serde(default)]
    pub revisions: Vec<Revision>,
    #[serde(default)]
    pub builtin_properties: BuiltinProperties,
    #[serde(default)]
    pub custom_properties: Vec<CustomProperty>,
    #[serde(default)]
    pub header_footer: HeaderFooter,
    /// Number shown on the first slide; slide numbering counts up from here.
    #[serde(default = "default_first_slide_number")]
    pub first_slide_number: u32,
}

fn default_first_slide_number() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slide {
    #[serde(default)]
    pub layout: LayoutType,
    #[serde(default)]
    pub shapes: Vec<Shape>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub hidden: bool,
}

impl Slide {
    pub fn with_layout(layout: LayoutType) -> Self {
        Slide {
            layout,
            shapes: Vec::new(),
            notes: None,
            hidden: false,
        }
    }

    pub fn has_notes(&self) -> bool {
        self.notes.as_deref().is_some_and(|n| !n.is_empty())
    }
}

impl Default for Slide {
    fn default() -> Self {
        Slide::with_layout(LayoutType::Blank)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayoutType {
    #[default]
    Blank,
    Title,
    TitleAndContent,
    SectionHeader,
    TwoContent,
    Custom,
}

impl LayoutType {
    pub const NAMES: &'static [&'static str] = &[
        "Blank",
        "Title",
        "TitleAndContent",
        "SectionHeader",
        "TwoContent",
        "Custom",
    ];

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "Blank" => Some(Self::Blank),
            "Title" => Some(Self::Title),
            "TitleAndContent" => Some(Self::TitleAndContent),
            "SectionHeader" => Some(Self::SectionHeader),
            "TwoContent" => Some(Self::TwoContent),
            "Custom" => Some(Self::Custom),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Blank => "Blank",
            Self::Title => "Title",
            Self::TitleAndContent => "TitleAndContent",
            Self::SectionHeader => "SectionHeader",
            Self::TwoContent => "TwoContent",
            Self::Custom => "Custom",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shape {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub frame: Frame,
    /// Whole-shape hyperlink; substring-level links live on portions.
    #[serde(default)]
    pub hyperlink: Option<String>,
    pub kind: ShapeKind,
}

impl Shape {
    pub fn text_box(name: impl Into<String>, frame: Frame, text: &str) -> Self {
        Shape {
            name: name.into(),
            frame,
            hyperlink: None,
            kind: ShapeKind::TextBox(TextBody::from_text(text)),
        }
    }

    /// Concatenated visible text of this shape, recursing into groups and
    /// table cells.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.kind.collect_text(&mut out);
        out
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ShapeKind {
    TextBox(TextBody),
    Table(Table),
    Group(Vec<Shape>),
    Picture(PictureRef),
}

impl ShapeKind {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::TextBox(_) => "TextBox",
            Self::Table(_) => "Table",
            Self::Group(_) => "Group",
            Self::Picture(_) => "Picture",
        }
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::TextBox(body) => push_line(out, &body.text()),
            Self::Table(table) => {
                for row in &table.rows {
                    for cell in &row.cells {
                        push_line(out, &cell.body.text());
                    }
                }
            }
            Self::Group(children) => {
                for child in children {
                    child.kind.collect_text(out);
                }
            }
            Self::Picture(_) => {}
        }
    }
}

fn push_line(out: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(text);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Frame {
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PictureRef {
    pub source: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextBody {
    #[serde(default)]
    pub paragraphs: Vec<Paragraph>,
}

impl TextBody {
    pub fn from_text(text: &str) -> Self {
        TextBody {
            paragraphs: vec![Paragraph::from_text(text)],
        }
    }

    pub fn text(&self) -> String {
        let mut out = String::new();
        for paragraph in &self.paragraphs {
            push_line(&mut out, &paragraph.text());
        }
        out
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Paragraph {
    #[serde(default)]
    pub alignment: Alignment,
    #[serde(default)]
    pub portions: Vec<Portion>,
}

impl Paragraph {
    pub fn from_text(text: &str) -> Self {
        Paragraph {
            alignment: Alignment::Left,
            portions: vec![Portion::from_text(text)],
        }
    }

    pub fn text(&self) -> String {
        self.portions
            .iter()
            .map(|portion| portion.text.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    pub const NAMES: &'static [&'static str] = &["Left", "Center", "Right", "Justify"];

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "Left" => Some(Self::Left),
            "Center" => Some(Self::Center),
            "Right" => Some(Self::Right),
            "Justify" => Some(Self::Justify),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Left => "Left",
            Self::Center => "Center",
            Self::Right => "Right",
            Self::Justify => "Justify",
        }
    }
}

/// A single formatted run of text. Hyperlinks attach here, not to whole
/// paragraphs, so substring-level linking can split a run without touching
/// its neighbours.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Portion {
    pub text: String,
    #[serde(default)]
    pub font: FontFormat,
    #[serde(default)]
    pub hyperlink: Option<String>,
}

impl Portion {
    pub fn from_text(text: &str) -> Self {
        Portion {
            text: text.to_string(),
            font: FontFormat::default(),
            hyperlink: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FontFormat {
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub size: Option<f64>,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    #[serde(default)]
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Build an empty rows x columns grid.
    pub fn with_size(rows: usize, columns: usize) -> Self {
        Table {
            rows: (0..rows)
                .map(|_| TableRow::with_columns(columns))
                .collect(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Column count taken from the first row; rows are kept rectangular by
    /// the column operations.
    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, |row| row.cells.len())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableRow {
    #[serde(default)]
    pub cells: Vec<TableCell>,
}

impl TableRow {
    pub fn with_columns(columns: usize) -> Self {
        TableRow {
            cells: (0..columns).map(|_| TableCell::default()).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableCell {
    #[serde(default)]
    pub body: TextBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    /// Index of the first slide the section covers.
    pub first_slide: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Protection {
    #[serde(default)]
    pub state: ProtectionState,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProtectionState {
    #[default]
    NoProtection,
    ReadOnly,
    AllowOnlyComments,
    AllowOnlyFormFields,
    AllowOnlyRevisions,
}

impl ProtectionState {
    pub const NAMES: &'static [&'static str] = &[
        "NoProtection",
        "ReadOnly",
        "AllowOnlyComments",
        "AllowOnlyFormFields",
        "AllowOnlyRevisions",
    ];

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "NoProtection" => Some(Self::NoProtection),
            "ReadOnly" => Some(Self::ReadOnly),
            "AllowOnlyComments" => Some(Self::AllowOnlyComments),
            "AllowOnlyFormFields" => Some(Self::AllowOnlyFormFields),
            "AllowOnlyRevisions" => Some(Self::AllowOnlyRevisions),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::NoProtection => "NoProtection",
            Self::ReadOnly => "ReadOnly",
            Self::AllowOnlyComments => "AllowOnlyComments",
            Self::AllowOnlyFormFields => "AllowOnlyFormFields",
            Self::AllowOnlyRevisions => "AllowOnlyRevisions",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Revision {
    pub author: String,
    pub date: String,
    pub kind: RevisionKind,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevisionKind {
    Insertion,
    Deletion,
    Formatting,
}

impl RevisionKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Insertion => "Insertion",
            Self::Deletion => "Deletion",
            Self::Formatting => "Formatting",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuiltinProperties {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub manager: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
}

impl BuiltinProperties {
    pub const NAMES: &'static [&'static str] = &[
        "title", "author", "subject", "keywords", "comments", "category", "manager", "company",
    ];

    pub fn set(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "title" => &mut self.title,
            "author" => &mut self.author,
            "subject" => &mut self.subject,
            "keywords" => &mut self.keywords,
            "comments" => &mut self.comments,
            "category" => &mut self.category,
            "manager" => &mut self.manager,
            "company" => &mut self.company,
            _ => return false,
        };
        *slot = Some(value);
        true
    }
}

/// Custom properties are name-unique; the operation layer enforces
/// uniqueness on insert and distinguishes missing names from bad indices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomProperty {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeaderFooter {
    #[serde(default)]
    pub footer_text: Option<String>,
    #[serde(default)]
    pub show_footer: bool,
    #[serde(default)]
    pub show_slide_number: bool,
    #[serde(default)]
    pub show_date: bool,
    #[serde(default)]
    pub date_text: Option<String>,
}

impl Document {
    /// Visit every text body in the document: text boxes, table cells and
    /// group members (recursively), plus nothing else. Slide notes are plain
    /// strings and are handled separately by callers that want them.
    pub fn for_each_text_body(&self, f: &mut dyn FnMut(&TextBody)) {
        for slide in &self.slides {
            for shape in &slide.shapes {
                visit_shape(shape, f);
            }
        }
    }

    pub fn for_each_text_body_mut(&mut self, f: &mut dyn FnMut(&mut TextBody)) {
        for slide in &mut self.slides {
            for shape in &mut slide.shapes {
                visit_shape_mut(shape, f);
            }
        }
    }

    /// Full plain text of the document, slide by slide, including notes.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for slide in &self.slides {
            for shape in &slide.shapes {
                push_line(&mut out, &shape.text());
            }
            if let Some(notes) = &slide.notes {
                push_line(&mut out, notes);
            }
        }
        out
    }

    pub fn shape_count(&self) -> usize {
        fn count(shape: &Shape) -> usize {
            match &shape.kind {
                ShapeKind::Group(children) => 1 + children.iter().map(count).sum::<usize>(),
                _ => 1,
            }
        }
        self.slides
            .iter()
            .flat_map(|slide| slide.shapes.iter())
            .map(count)
            .sum()
    }

    pub fn word_count(&self) -> usize {
        self.plain_text().split_whitespace().count()
    }
}

fn visit_shape(shape: &Shape, f: &mut dyn FnMut(&TextBody)) {
    match &shape.kind {
        ShapeKind::TextBox(body) => f(body),
        ShapeKind::Table(table) => {
            for row in &table.rows {
                for cell in &row.cells {
                    f(&cell.body);
                }
            }
        }
        ShapeKind::Group(children) => {
            for child in children {
                visit_shape(child, f);
            }
        }
        ShapeKind::Picture(_) => {}
    }
}

fn visit_shape_mut(shape: &mut Shape, f: &mut dyn FnMut(&mut TextBody)) {
    match &mut shape.kind {
        ShapeKind::TextBox(body) => f(body),
        ShapeKind::Table(table) => {
            for row in &mut table.rows {
                for cell in &mut row.cells {
                    f(&mut cell.body);
                }
            }
        }
        ShapeKind::Group(children) => {
            for child in children {
                visit_shape_mut(child, f);
            }
        }
        ShapeKind::Picture(_) => {}
    }
}
