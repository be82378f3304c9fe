//! Grid codec: snapshots to and from a spreadsheet sheet

use super::scalar::{coerce, encode_cell};
use crate::config::TransferOptions;
use crate::models::{CellValue, Column, Grid, Row, TableSnapshot};

/// Lay a snapshot out as a sheet
///
/// Numbers and booleans stay typed. Dates and export-transform output become
/// text.
pub fn to_grid(snapshot: &TableSnapshot, options: &TransferOptions) -> Grid {
    let mut cells = Vec::with_capacity(snapshot.rows.len() + 1);

    if options.include_header {
        cells.push(
            snapshot
                .columns
                .iter()
                .map(|c| CellValue::String(c.title.clone()))
                .collect(),
        );
    }

    for row in &snapshot.rows {
        cells.push(
            snapshot
                .columns
                .iter()
                .map(|column| grid_cell(row.get(&column.key), column, options))
                .collect(),
        );
    }

    let grid = Grid::new(options.sheet_name.clone(), cells);
    if options.include_header {
        grid.with_header_row(0)
    } else {
        grid
    }
}

fn grid_cell(value: &CellValue, column: &Column, options: &TransferOptions) -> CellValue {
    if value.is_null() {
        return CellValue::Null;
    }
    if options.transform.export_for(column).is_some() {
        return CellValue::String(encode_cell(value, column, &options.transform));
    }
    match value {
        CellValue::Date(_) | CellValue::InvalidDate(_) => CellValue::String(value.to_text()),
        other => other.clone(),
    }
}

/// Read a sheet into a snapshot bound positionally to `columns`
pub fn from_grid(grid: &Grid, columns: &[Column], options: &TransferOptions) -> TableSnapshot {
    let start = if options.include_header {
        grid.header_row_offset.unwrap_or(0) + 1
    } else {
        0
    };

    let rows = (start..grid.cells.len())
        .map(|r| {
            let mut row = Row::at(r);
            for (c, column) in columns.iter().enumerate() {
                let decoded = coerce(grid.cell(r, c).clone(), column, &options.transform);
                if let Some(raw) = decoded.rejected {
                    row.rejected.insert(column.key.clone(), raw);
                }
                row.set(column.key.clone(), decoded.value);
            }
            row
        })
        .collect();

    TableSnapshot::new(columns.to_vec(), rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValueTransforms;
    use crate::models::{DataType, RowId};
    use chrono::NaiveDate;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("name", "Name").with_type(DataType::String),
            Column::new("age", "Age").with_type(DataType::Number),
            Column::new("born", "Born").with_type(DataType::Date),
        ]
    }

    fn born() -> NaiveDate {
        NaiveDate::from_ymd_opt(1994, 5, 17).unwrap()
    }

    #[test]
    fn test_to_grid_keeps_native_types() {
        let snapshot = TableSnapshot::new(
            columns(),
            vec![Row::at(0).with("name", "Alice").with("age", 30.0).with("born", born())],
        );
        let grid = to_grid(&snapshot, &TransferOptions::default());

        assert_eq!(grid.name, "Sheet1");
        assert_eq!(grid.header_row_offset, Some(0));
        assert_eq!(grid.cells[0][1], CellValue::from("Age"));
        assert_eq!(grid.cells[1][1], CellValue::Number(30.0));
        assert_eq!(grid.cells[1][2], CellValue::from("1994-05-17"));
    }

    #[test]
    fn test_to_grid_applies_export_transform() {
        let options = TransferOptions::builder()
            .include_header(false)
            .sheet_name("People")
            .transform(ValueTransforms::new().on_export("age", |v, _| format!("{} yrs", v)))
            .build();
        let snapshot = TableSnapshot::new(
            columns(),
            vec![Row::at(0).with("name", "Alice").with("age", 30.0)],
        );
        let grid = to_grid(&snapshot, &options);

        assert_eq!(grid.name, "People");
        assert_eq!(grid.header_row_offset, None);
        assert_eq!(grid.cells[0][1], CellValue::from("30 yrs"));
        assert_eq!(grid.cells[0][2], CellValue::Null);
    }

    #[test]
    fn test_from_grid_pads_and_coerces() {
        let grid = Grid::new(
            "Sheet1",
            vec![
                vec!["Name".into(), "Age".into(), "Born".into()],
                vec!["Alice".into(), "30".into(), "1994-05-17".into()],
                vec![CellValue::Number(12.0)],
            ],
        );
        let snapshot = from_grid(&grid, &columns(), &TransferOptions::default());

        assert_eq!(snapshot.rows.len(), 2);
        assert_eq!(snapshot.rows[0].id, RowId::Index(1));
        assert_eq!(snapshot.value(0, "age"), &CellValue::Number(30.0));
        assert_eq!(snapshot.value(0, "born"), &CellValue::Date(born()));
        assert_eq!(snapshot.value(1, "name"), &CellValue::from("12"));
        assert_eq!(snapshot.value(1, "age"), &CellValue::Null);
    }

    #[test]
    fn test_from_grid_honours_header_offset() {
        let grid = Grid::new(
            "Sheet1",
            vec![
                vec!["Report".into()],
                vec!["Name".into(), "Age".into()],
                vec!["Bob".into(), CellValue::Number(41.0)],
            ],
        )
        .with_header_row(1);
        let snapshot = from_grid(&grid, &columns(), &TransferOptions::default());

        assert_eq!(snapshot.rows.len(), 1);
        assert_eq!(snapshot.value(0, "name"), &CellValue::from("Bob"));
        assert_eq!(snapshot.value(0, "age"), &CellValue::Number(41.0));
    }

    #[test]
    fn test_from_empty_grid() {
        let grid = Grid::new("Sheet1", vec![]);
        assert!(from_grid(&grid, &columns(), &TransferOptions::default()).is_empty());
    }
}
