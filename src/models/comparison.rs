use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// One date of an aligned comparison. `values[i]` belongs to `AlignedTable::columns[i]`;
/// `None` means the series had no observation on that date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedRow {
    pub date: NaiveDate,
    pub values: Vec<Option<f64>>,
}

/// Several series merged on the union of their dates, ascending.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlignedTable {
    pub columns: Vec<String>,
    pub rows: Vec<AlignedRow>,
}

impl AlignedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell lookup by column name.
    #[cfg(test)]
    pub(crate) fn value(&self, row: usize, column: &str) -> Option<f64> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.values.get(col).copied().flatten()
    }

    /// Flat records `{ "date": "YYYY-MM-DD", "<column>": number | null }`.
    pub fn to_records(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                let mut record = Map::with_capacity(self.columns.len() + 1);
                record.insert("date".to_string(), Value::String(row.date.to_string()));
                for (column, cell) in self.columns.iter().zip(&row.values) {
                    let value = (*cell)
                        .and_then(Number::from_f64)
                        .map(Value::Number)
                        .unwrap_or(Value::Null);
                    record.insert(column.clone(), value);
                }
                record
            })
            .collect()
    }
}
