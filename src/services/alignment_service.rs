use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::debug;

use crate::models::{AlignedRow, AlignedTable, CanonicalSeries};

/// Merge named series on the union of their dates, ascending.
///
/// Columns follow the order in which names first appear; a repeated name
/// replaces the earlier series in place. Dates a series does not cover are
/// `None`, never a numeric default.
pub fn align<'a, I, S>(named_series: I) -> AlignedTable
where
    I: IntoIterator<Item = (S, &'a CanonicalSeries)>,
    S: Into<String>,
{
    let mut columns: Vec<String> = Vec::new();
    let mut inputs: Vec<&CanonicalSeries> = Vec::new();
    for (name, series) in named_series {
        let name = name.into();
        match columns.iter().position(|c| *c == name) {
            Some(idx) => inputs[idx] = series,
            None => {
                columns.push(name);
                inputs.push(series);
            }
        }
    }

    let width = columns.len();
    let dates: BTreeSet<NaiveDate> = inputs.iter().flat_map(|s| s.iter().map(|p| p.date)).collect();

    let rows: Vec<AlignedRow> = dates
        .into_iter()
        .map(|date| AlignedRow {
            date,
            values: inputs.iter().map(|s| s.value_on(date)).collect(),
        })
        .collect();

    debug!("Aligned {} series over {} dates", width, rows.len());

    AlignedTable { columns, rows }
}
