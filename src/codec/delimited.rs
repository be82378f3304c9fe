//! Delimited-text codec: snapshots to and from one text blob
//!
//! The wire format is an optional header line of column titles followed by
//! one line per row. Cells are joined by `col_delimiter` and lines by
//! `row_delimiter`. Columns bind by position only: header titles are never
//! matched back to column keys.
//!
//! With `Quoting::None` nothing is escaped, so a delimiter inside a cell
//! splits that cell when read back. `Quoting::Minimal` wraps such cells in
//! double quotes.

use super::scalar::{Decoded, coerce, decode_cell, encode_cell, infer_token};
use crate::config::{Quoting, TransferOptions};
use crate::models::{CellValue, ClipboardPayload, Column, Row, TableSnapshot};
use tracing::debug;

/// Serialize a snapshot to text
pub fn serialize(snapshot: &TableSnapshot, options: &TransferOptions) -> String {
    let mut lines = Vec::with_capacity(snapshot.rows.len() + 1);

    if options.include_header {
        let titles: Vec<String> = snapshot.columns.iter().map(|c| c.title.clone()).collect();
        lines.push(join_cells(&titles, options));
    }

    for row in &snapshot.rows {
        let cells: Vec<String> = snapshot
            .columns
            .iter()
            .map(|column| encode_cell(row.get(&column.key), column, &options.transform))
            .collect();
        lines.push(join_cells(&cells, options));
    }

    lines.join(&options.row_delimiter)
}

/// Serialize a snapshot into a clipboard payload (text plus typed cells)
pub fn to_payload(snapshot: &TableSnapshot, options: &TransferOptions) -> ClipboardPayload {
    let text = serialize(snapshot, options);

    let mut structured = Vec::with_capacity(snapshot.rows.len() + 1);
    if options.include_header {
        structured.push(
            snapshot
                .columns
                .iter()
                .map(|c| CellValue::String(c.title.clone()))
                .collect(),
        );
    }
    for row in &snapshot.rows {
        structured.push(
            snapshot
                .columns
                .iter()
                .map(|column| {
                    let value = row.get(&column.key);
                    match options.transform.export_for(column) {
                        Some(_) if !value.is_null() => CellValue::String(encode_cell(
                            value,
                            column,
                            &options.transform,
                        )),
                        _ => value.clone(),
                    }
                })
                .collect(),
        );
    }

    ClipboardPayload::text(text).with_structured(structured)
}

/// Deserialize text into a snapshot bound positionally to `columns`
///
/// Blank lines are skipped. Extra cells are dropped and missing cells are
/// null. Zero data lines yield an empty snapshot.
pub fn deserialize(text: &str, columns: &[Column], options: &TransferOptions) -> TableSnapshot {
    let records = split_records(text, options);
    debug!(
        lines = records.len(),
        columns = columns.len(),
        "Deserializing delimited text"
    );

    let rows = data_records(records.len(), options)
        .map(|index| {
            let record = &records[index];
            build_row(index, columns, |col| {
                record
                    .get(col)
                    .map(|raw| decode_cell(raw, &columns[col], &options.transform))
            })
        })
        .collect();

    TableSnapshot::new(columns.to_vec(), rows)
}

/// Deserialize a clipboard payload, preferring its structured cells
pub fn deserialize_payload(
    payload: &ClipboardPayload,
    columns: &[Column],
    options: &TransferOptions,
) -> TableSnapshot {
    let Some(structured) = &payload.structured else {
        return deserialize(&payload.text, columns, options);
    };

    let rows = data_records(structured.len(), options)
        .map(|index| {
            let record = &structured[index];
            build_row(index, columns, |col| {
                record
                    .get(col)
                    .map(|cell| coerce(cell.clone(), &columns[col], &options.transform))
            })
        })
        .collect();

    TableSnapshot::new(columns.to_vec(), rows)
}

/// Split text into cells with bare-token inference, no column binding
pub fn parse_structured(text: &str, options: &TransferOptions) -> Vec<Vec<CellValue>> {
    split_records(text, options)
        .into_iter()
        .map(|record| record.iter().map(|cell| infer_token(cell)).collect())
        .collect()
}

/// Split text into raw cell strings, dropping blank lines
pub fn split_records(text: &str, options: &TransferOptions) -> Vec<Vec<String>> {
    match options.quoting {
        Quoting::None => pieces(text, &options.row_delimiter)
            .into_iter()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                pieces(line, &options.col_delimiter)
                    .into_iter()
                    .map(str::to_string)
                    .collect()
            })
            .collect(),
        Quoting::Minimal => {
            split_quoted(text, &options.col_delimiter, &options.row_delimiter)
        }
    }
}

/// Split on a delimiter; an empty delimiter never matches
fn pieces<'a>(text: &'a str, delimiter: &str) -> Vec<&'a str> {
    if delimiter.is_empty() {
        vec![text]
    } else {
        text.split(delimiter).collect()
    }
}

fn data_records(len: usize, options: &TransferOptions) -> std::ops::Range<usize> {
    let start = if options.include_header { 1 } else { 0 };
    start.min(len)..len
}

fn build_row(
    index: usize,
    columns: &[Column],
    mut cell: impl FnMut(usize) -> Option<Decoded>,
) -> Row {
    let mut row = Row::at(index);
    for (col, column) in columns.iter().enumerate() {
        let decoded = cell(col).unwrap_or(Decoded {
            value: CellValue::Null,
            rejected: None,
        });
        if let Some(raw) = decoded.rejected {
            row.rejected.insert(column.key.clone(), raw);
        }
        row.set(column.key.clone(), decoded.value);
    }
    row
}

fn join_cells(cells: &[String], options: &TransferOptions) -> String {
    match options.quoting {
        Quoting::None => cells.join(&options.col_delimiter),
        Quoting::Minimal => cells
            .iter()
            .map(|cell| quote_cell(cell, options))
            .collect::<Vec<_>>()
            .join(&options.col_delimiter),
    }
}

fn quote_cell(cell: &str, options: &TransferOptions) -> String {
    let needs_quotes = cell.contains('"')
        || cell.contains(options.col_delimiter.as_str())
        || cell.contains(options.row_delimiter.as_str());
    if needs_quotes {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

/// Quote-aware splitter for multi-character delimiters
///
/// Empty delimiters never match, so the loop always consumes input.
fn split_quoted(text: &str, col: &str, row: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut record_quoted = false;
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut rest = text;

    let mut finish_record = |record: &mut Vec<String>, quoted: bool| {
        let blank = record.iter().all(|c| c.trim().is_empty());
        let taken = std::mem::take(record);
        if quoted || !blank {
            records.push(taken);
        }
    };

    while let Some(ch) = rest.chars().next() {
        if in_quotes {
            if let Some(after) = rest.strip_prefix("\"\"") {
                cell.push('"');
                rest = after;
                continue;
            }
            if let Some(after) = rest.strip_prefix('"') {
                in_quotes = false;
                rest = after;
                continue;
            }
        } else {
            if ch == '"' && cell.trim().is_empty() {
                cell.clear();
                in_quotes = true;
                record_quoted = true;
                rest = &rest[1..];
                continue;
            }
            if !col.is_empty()
                && let Some(after) = rest.strip_prefix(col)
            {
                record.push(std::mem::take(&mut cell));
                rest = after;
                continue;
            }
            if !row.is_empty()
                && let Some(after) = rest.strip_prefix(row)
            {
                record.push(std::mem::take(&mut cell));
                finish_record(&mut record, record_quoted);
                record_quoted = false;
                rest = after;
                continue;
            }
        }
        cell.push(ch);
        rest = &rest[ch.len_utf8()..];
    }

    if !cell.is_empty() || !record.is_empty() || record_quoted {
        record.push(cell);
        finish_record(&mut record, record_quoted);
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DataType;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("name", "Name").with_type(DataType::String),
            Column::new("age", "Age").with_type(DataType::Number),
        ]
    }

    #[test]
    fn test_serialize_with_header() {
        let snapshot = TableSnapshot::new(
            columns(),
            vec![
                Row::at(0).with("name", "Alice").with("age", 30.0),
                Row::at(1).with("name", "Bob"),
            ],
        );
        let text = serialize(&snapshot, &TransferOptions::default());
        assert_eq!(text, "Name\tAge\nAlice\t30\nBob\t");
    }

    #[test]
    fn test_deserialize_scenario() {
        let text = "Name\tAge\nAlice\t30\nBob\tthirty";
        let snapshot = deserialize(text, &columns(), &TransferOptions::default());

        assert_eq!(snapshot.rows.len(), 2);
        assert_eq!(snapshot.value(0, "name"), &CellValue::from("Alice"));
        assert_eq!(snapshot.value(0, "age"), &CellValue::Number(30.0));
        assert_eq!(snapshot.value(1, "name"), &CellValue::from("Bob"));
        assert_eq!(snapshot.value(1, "age"), &CellValue::Null);
        assert_eq!(snapshot.rows[1].rejected_token("age"), Some("thirty"));
    }

    #[test]
    fn test_deserialize_blank_lines_extra_and_missing_cells() {
        let options = TransferOptions::builder().include_header(false).build();
        let text = "\nAlice\t30\textra\n   \nBob\n";
        let snapshot = deserialize(text, &columns(), &options);

        assert_eq!(snapshot.rows.len(), 2);
        assert!(!snapshot.rows[0].values.contains_key("extra"));
        assert_eq!(snapshot.value(1, "age"), &CellValue::Null);
        assert_eq!(snapshot.rows[1].rejected_token("age"), None);
    }

    #[test]
    fn test_deserialize_header_only_or_empty() {
        let options = TransferOptions::default();
        assert!(deserialize("Name\tAge", &columns(), &options).is_empty());
        assert!(deserialize("", &columns(), &options).is_empty());
        assert!(deserialize("\n\n", &columns(), &options).is_empty());
    }

    #[test]
    fn test_header_titles_are_not_matched() {
        let text = "Age\tName\nAlice\t30";
        let snapshot = deserialize(text, &columns(), &TransferOptions::default());
        assert_eq!(snapshot.value(0, "name"), &CellValue::from("Alice"));
        assert_eq!(snapshot.value(0, "age"), &CellValue::Number(30.0));
    }

    #[test]
    fn test_untyped_columns_infer() {
        let columns = vec![Column::new("a", "A"), Column::new("b", "B"), Column::new("c", "C")];
        let options = TransferOptions::builder().include_header(false).build();
        let snapshot = deserialize("42\tTRUE\tabc", &columns, &options);

        assert_eq!(snapshot.value(0, "a"), &CellValue::Number(42.0));
        assert_eq!(snapshot.value(0, "b"), &CellValue::Boolean(true));
        assert_eq!(snapshot.value(0, "c"), &CellValue::from("abc"));
    }

    #[test]
    fn test_unquoted_delimiter_in_cell_splits() {
        let snapshot = TableSnapshot::new(
            columns(),
            vec![Row::at(0).with("name", "Smith\tJr").with("age", 40.0)],
        );
        let options = TransferOptions::default();
        let back = deserialize(&serialize(&snapshot, &options), &columns(), &options);

        assert_eq!(back.value(0, "name"), &CellValue::from("Smith"));
        assert_eq!(back.value(0, "age"), &CellValue::Null);
    }

    #[test]
    fn test_minimal_quoting_preserves_delimiters() {
        let options = TransferOptions::csv();
        let snapshot = TableSnapshot::new(
            columns(),
            vec![
                Row::at(0).with("name", "Smith, \"Jr\"").with("age", 40.0),
                Row::at(1).with("name", "two\r\nlines").with("age", 1.0),
            ],
        );
        let text = serialize(&snapshot, &options);
        assert_eq!(
            text,
            "Name,Age\r\n\"Smith, \"\"Jr\"\"\",40\r\n\"two\r\nlines\",1"
        );

        let back = deserialize(&text, &columns(), &options);
        assert_eq!(back.rows.len(), 2);
        assert_eq!(back.value(0, "name"), &CellValue::from("Smith, \"Jr\""));
        assert_eq!(back.value(1, "name"), &CellValue::from("two\r\nlines"));
        assert_eq!(back.value(1, "age"), &CellValue::Number(1.0));
    }

    #[test]
    fn test_structured_payload_is_authoritative() {
        let payload = ClipboardPayload::text("ignored\tignored\nx\ty").with_structured(vec![
            vec!["Name".into(), "Age".into()],
            vec![CellValue::Number(7.0), CellValue::from("8")],
        ]);
        let snapshot = deserialize_payload(&payload, &columns(), &TransferOptions::default());

        assert_eq!(snapshot.rows.len(), 1);
        assert_eq!(snapshot.value(0, "name"), &CellValue::from("7"));
        assert_eq!(snapshot.value(0, "age"), &CellValue::Number(8.0));
    }

    #[test]
    fn test_to_payload_keeps_types() {
        let snapshot = TableSnapshot::new(
            columns(),
            vec![Row::at(0).with("name", "Alice").with("age", 30.0)],
        );
        let payload = to_payload(&snapshot, &TransferOptions::default());
        let structured = payload.structured.unwrap();

        assert_eq!(payload.text, "Name\tAge\nAlice\t30");
        assert_eq!(structured[1][1], CellValue::Number(30.0));
    }

    #[test]
    fn test_empty_delimiters_never_split() {
        let single = vec![Column::new("a", "A").with_type(DataType::String)];
        for quoting in [Quoting::None, Quoting::Minimal] {
            let options = TransferOptions::builder()
                .include_header(false)
                .col_delimiter("")
                .quoting(quoting)
                .build();
            let snapshot = deserialize("ab\ncd", &single, &options);
            assert_eq!(snapshot.rows.len(), 2);
            assert_eq!(snapshot.value(0, "a"), &CellValue::from("ab"));

            let options = TransferOptions::builder()
                .include_header(false)
                .row_delimiter("")
                .quoting(quoting)
                .build();
            assert_eq!(split_records("x\ty", &options), vec![vec!["x", "y"]]);
        }
    }

    #[test]
    fn test_minimal_quoting_ignores_padding() {
        let options = TransferOptions::builder().quoting(Quoting::Minimal).build();
        let snapshot = TableSnapshot::new(
            columns(),
            vec![Row::at(0).with("name", "  Alice ").with("age", 30.0)],
        );

        let text = serialize(&snapshot, &options);
        assert_eq!(text, "Name\tAge\n  Alice \t30");

        let back = deserialize("Name\tAge\n\"  Alice \"\t30", &columns(), &options);
        assert_eq!(back.value(0, "name"), &CellValue::from("Alice"));
    }

    #[test]
    fn test_parse_structured_infers() {
        let cells = parse_structured("a\t1\n\nfalse\t", &TransferOptions::default());
        assert_eq!(
            cells,
            vec![
                vec![CellValue::from("a"), CellValue::Number(1.0)],
                vec![CellValue::Boolean(false), CellValue::Null],
            ]
        );
    }
}
