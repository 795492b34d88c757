// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Row shapes for writes
//!
//! [`ToRow`] turns a record or mapping into the ordered `(column, value)`
//! pairs an INSERT needs. Mapping shapes keep every entry; record
//! implementations treat integer-zero fields as unset and omit them, which
//! lets auto-increment keys fall through to the database.

use std::collections::{BTreeMap, HashMap};

use sqlgate_clause::{Column, Value, Values, Var};

/// A scanned result row.
pub type Row = HashMap<String, Value>;

/// Conversion into INSERT columns and values.
pub trait ToRow {
    /// The `(column, value)` pairs of this record, in emission order.
    fn to_row(&self) -> Vec<(String, Value)>;

    /// Whether integer-zero values are treated as unset and skipped.
    /// Record types keep the default; mapping shapes override to `false`
    /// so explicit zeros survive.
    fn omit_zero_int(&self) -> bool {
        true
    }
}

impl ToRow for HashMap<String, Value> {
    fn to_row(&self) -> Vec<(String, Value)> {
        let mut pairs: Vec<(String, Value)> = self
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        pairs
    }

    fn omit_zero_int(&self) -> bool {
        false
    }
}

impl ToRow for BTreeMap<String, Value> {
    fn to_row(&self) -> Vec<(String, Value)> {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    fn omit_zero_int(&self) -> bool {
        false
    }
}

impl ToRow for Vec<(String, Value)> {
    fn to_row(&self) -> Vec<(String, Value)> {
        self.clone()
    }

    fn omit_zero_int(&self) -> bool {
        false
    }
}

/// Build the VALUES clause for a batch of rows.
///
/// A single row keeps its own column order. For larger batches the column
/// set is the union over all rows, sorted ascending so the emitted SQL is
/// deterministic; a row without a value for some column binds NULL there.
pub(crate) fn convert_create_values<T: ToRow>(data: &[T]) -> Values {
    if data.len() == 1 {
        let item = &data[0];
        let omit = item.omit_zero_int();
        let mut values = Values::default();
        let mut row = Vec::new();
        for (column, value) in item.to_row() {
            if omit && value.is_zero_int() {
                continue;
            }
            values.columns.push(Column::new(column));
            row.push(Var::Value(value));
        }
        values.values.push(row);
        return values;
    }

    let row_count = data.len();
    let mut columns: Vec<String> = Vec::new();
    let mut column_data: HashMap<String, Vec<Value>> = HashMap::new();

    for (idx, item) in data.iter().enumerate() {
        let omit = item.omit_zero_int();
        for (column, value) in item.to_row() {
            if omit && value.is_zero_int() {
                continue;
            }
            let cells = column_data.entry(column.clone()).or_insert_with(|| {
                columns.push(column.clone());
                vec![Value::Null; row_count]
            });
            cells[idx] = value;
        }
    }
    columns.sort();

    let mut values = Values::default();
    let mut rows: Vec<Vec<Var>> = vec![Vec::with_capacity(columns.len()); row_count];
    for column in columns {
        let Some(cells) = column_data.remove(&column) else {
            continue;
        };
        values.columns.push(Column::new(column));
        for (idx, cell) in cells.into_iter().enumerate() {
            rows[idx].push(Var::Value(cell));
        }
    }
    values.values = rows;
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Account {
        id: i64,
        name: String,
        age: i64,
    }

    impl ToRow for Account {
        fn to_row(&self) -> Vec<(String, Value)> {
            vec![
                ("id".to_owned(), self.id.into()),
                ("name".to_owned(), self.name.clone().into()),
                ("age".to_owned(), self.age.into()),
            ]
        }
    }

    #[test]
    fn test_single_record_omits_zero_ints() {
        let values = convert_create_values(&[Account {
            id: 0,
            name: "bin".to_owned(),
            age: 18,
        }]);
        let columns: Vec<&str> = values.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(columns, vec!["name", "age"]);
        assert_eq!(
            values.values,
            vec![vec![
                Var::Value(Value::from("bin")),
                Var::Value(Value::Int(18))
            ]]
        );
    }

    #[test]
    fn test_single_map_keeps_zero_and_sorts_keys() {
        let map = HashMap::from([
            ("b_age".to_owned(), Value::Int(0)),
            ("a_name".to_owned(), Value::from("bin")),
        ]);
        let values = convert_create_values(&[map]);
        let columns: Vec<&str> = values.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(columns, vec!["a_name", "b_age"]);
    }

    #[test]
    fn test_bulk_union_sorted_with_null_fill() {
        let rows = vec![
            HashMap::from([("name".to_owned(), Value::from("bin"))]),
            HashMap::from([
                ("name".to_owned(), Value::from("wen")),
                ("age".to_owned(), Value::Int(1)),
            ]),
        ];
        let values = convert_create_values(&rows);
        let columns: Vec<&str> = values.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(columns, vec!["age", "name"]);
        assert_eq!(
            values.values,
            vec![
                vec![Var::Value(Value::Null), Var::Value(Value::from("bin"))],
                vec![Var::Value(Value::Int(1)), Var::Value(Value::from("wen"))],
            ]
        );
    }

    #[test]
    fn test_bulk_records_null_out_zero_ints() {
        let rows = vec![
            Account {
                id: 0,
                name: "bin".to_owned(),
                age: 18,
            },
            Account {
                id: 0,
                name: "wen".to_owned(),
                age: 0,
            },
        ];
        let values = convert_create_values(&rows);
        let columns: Vec<&str> = values.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(columns, vec!["age", "name"]);
        assert_eq!(
            values.values,
            vec![
                vec![Var::Value(Value::Int(18)), Var::Value(Value::from("bin"))],
                vec![Var::Value(Value::Null), Var::Value(Value::from("wen"))],
            ]
        );
    }
}
