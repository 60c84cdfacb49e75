//! Table structure and cell operations. Tables stay rectangular: column
//! operations touch every row.

use deckdoc_engine::{Document, Frame, Shape, ShapeKind, Table, TableRow, TextBody};
use deckdoc_params::ParamBag;
use serde_json::json;

use crate::address;
use crate::error::{OpError, OpResult};
use crate::report::{OpOutcome, Report};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    Create,
    InsertRow,
    DeleteRow,
    DeleteRows,
    InsertColumn,
    DeleteColumn,
    SetCell,
    Get,
}

impl Op {
    pub(crate) const NAMES: &'static [&'static str] = &[
        "create",
        "insert-row",
        "delete-row",
        "delete-rows",
        "insert-column",
        "delete-column",
        "set-cell",
        "get",
    ];

    pub(crate) fn parse(name: &str) -> Option<Self> {
        match name {
            "create" => Some(Self::Create),
            "insert-row" => Some(Self::InsertRow),
            "delete-row" => Some(Self::DeleteRow),
            "delete-rows" => Some(Self::DeleteRows),
            "insert-column" => Some(Self::InsertColumn),
            "delete-column" => Some(Self::DeleteColumn),
            "set-cell" => Some(Self::SetCell),
            "get" => Some(Self::Get),
            _ => None,
        }
    }
}

pub(crate) fn run(op: Op, doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    match op {
        Op::Create => create(doc, bag),
        Op::InsertRow => insert_row(doc, bag),
        Op::DeleteRow => delete_row(doc, bag),
        Op::DeleteRows => delete_rows(doc, bag),
        Op::InsertColumn => insert_column(doc, bag),
        Op::DeleteColumn => delete_column(doc, bag),
        Op::SetCell => set_cell(doc, bag),
        Op::Get => get(doc, bag),
    }
}

fn positive_count(bag: &ParamBag, key: &str) -> OpResult<usize> {
    let value = bag.required_i64(key)?;
    if value <= 0 {
        return Err(OpError::InvalidArgument(format!(
            "parameter '{key}' must be positive, got {value}"
        )));
    }
    Ok(value as usize)
}

fn table_at<'a>(doc: &'a mut Document, bag: &ParamBag) -> OpResult<&'a mut Table> {
    let slide_index = bag.required_i64("slideIndex")?;
    let slide = address::slide_mut(doc, slide_index)?;
    let shape = address::shape_mut(slide, slide_index, bag.required_i64("shapeIndex")?)?;
    address::table_mut(shape)
}

fn create(doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    let slide_index = bag.required_i64("slideIndex")?;
    let rows = positive_count(bag, "rows")?;
    let columns = positive_count(bag, "columns")?;
    let frame = Frame::new(
        bag.f64_or("x", 0.0)?,
        bag.f64_or("y", 0.0)?,
        bag.f64_or("width", 400.0)?,
        bag.f64_or("height", 200.0)?,
    );

    let slide = address::slide_mut(doc, slide_index)?;
    slide.shapes.push(Shape {
        name: bag.str_or("name", "table")?,
        frame,
        hyperlink: None,
        kind: ShapeKind::Table(Table::with_size(rows, columns)),
    });

    Ok(OpOutcome::changed(Report::line(format!(
        "Added {rows}x{columns} table to slide {slide_index} at shape index {}.",
        slide.shapes.len() - 1
    ))))
}

fn insert_row(doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    let table = table_at(doc, bag)?;
    let columns = table.column_count();
    let position = match bag.opt_i64("rowIndex")? {
        Some(index) => address::resolve_insert(table.row_count(), index, "row")?,
        None => table.row_count(),
    };
    table.rows.insert(position, TableRow::with_columns(columns));
    Ok(OpOutcome::changed(Report::line(format!(
        "Inserted row at index {position}; table now has {} rows.",
        table.row_count()
    ))))
}

fn delete_row(doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    let table = table_at(doc, bag)?;
    let index = address::resolve(table.row_count(), bag.required_i64("rowIndex")?, "row")?;
    table.rows.remove(index);
    Ok(OpOutcome::changed(Report::line(format!(
        "Deleted row at index {index}; table now has {} rows.",
        table.row_count()
    ))))
}

fn delete_rows(doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    let indices = bag.required_i64_list("indices")?;
    let table = table_at(doc, bag)?;
    let resolved = address::resolve_many(table.row_count(), &indices, "row")?;
    let deleted = resolved.len();
    for index in resolved {
        table.rows.remove(index);
    }
    Ok(OpOutcome::changed(Report::line(format!(
        "Deleted {deleted} rows; table now has {} rows.",
        table.row_count()
    ))))
}

fn insert_column(doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    let table = table_at(doc, bag)?;
    let position = match bag.opt_i64("columnIndex")? {
        Some(index) => address::resolve_insert(table.column_count(), index, "column")?,
        None => table.column_count(),
    };
    for row in &mut table.rows {
        row.cells.insert(position, Default::default());
    }
    Ok(OpOutcome::changed(Report::line(format!(
        "Inserted column at index {position}; table now has {} columns.",
        table.column_count()
    ))))
}

fn delete_column(doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    let table = table_at(doc, bag)?;
    let index = address::resolve(
        table.column_count(),
        bag.required_i64("columnIndex")?,
        "column",
    )?;
    for row in &mut table.rows {
        row.cells.remove(index);
    }
    Ok(OpOutcome::changed(Report::line(format!(
        "Deleted column at index {index}; table now has {} columns.",
        table.column_count()
    ))))
}

fn set_cell(doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    let text = bag.present_str("text")?.to_string();
    let table = table_at(doc, bag)?;
    let row = address::resolve(table.row_count(), bag.required_i64("rowIndex")?, "row")?;
    let column = address::resolve(
        table.column_count(),
        bag.required_i64("columnIndex")?,
        "column",
    )?;

    let cell = &mut table.rows[row].cells[column];
    let previous = cell.body.text();
    cell.body = TextBody::from_text(&text);

    Ok(OpOutcome::changed(Report::line(format!(
        "Cell ({row}, {column}) set; previous text was '{previous}'."
    ))))
}

fn get(doc: &mut Document, bag: &ParamBag) -> OpResult<OpOutcome> {
    let slide_index = bag.required_i64("slideIndex")?;
    let shape_index = bag.required_i64("shapeIndex")?;
    let slide = address::slide(doc, slide_index)?;
    let shape = address::shape(slide, slide_index, shape_index)?;
    let table = address::table(shape)?;

    let cells: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.cells.iter().map(|cell| cell.body.text()).collect())
        .collect();

    Ok(OpOutcome::read_only(Report::json(json!({
        "slideIndex": slide_index,
        "shapeIndex": shape_index,
        "rows": table.row_count(),
        "columns": table.column_count(),
        "cells": cells,
    }))))
}
