//! Field cleanup and type coercion
//!
//! The fixed schema comes first, in a stable order, followed by every other
//! attribute label seen in the input in first-seen order.

use crate::record::{AttributeRecord, NAME_KEY, PRICE_KEY};
use crate::transform::table::NormalizedTable;
use indexmap::IndexSet;

/// How a fixed column's cell is derived from its source attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// Copied as-is
    Text,
    /// Digits and '.' only
    Numeric,
    /// 1 when the source is exactly "Yes", 0 otherwise
    Flag,
}

/// One column of the fixed schema
#[derive(Debug, Clone, Copy)]
pub struct FixedColumn {
    /// Header written to the table
    pub header: &'static str,
    /// Attribute label read from the record
    pub source: &'static str,
    pub kind: CellKind,
}

const fn column(header: &'static str, source: &'static str, kind: CellKind) -> FixedColumn {
    FixedColumn {
        header,
        source,
        kind,
    }
}

/// Columns present in every normalized table, in output order
pub const FIXED_COLUMNS: [FixedColumn; 9] = [
    column(NAME_KEY, NAME_KEY, CellKind::Text),
    column(PRICE_KEY, PRICE_KEY, CellKind::Numeric),
    column("Case Size", "Case Size", CellKind::Numeric),
    column("Limited Edition", "Limited Edition", CellKind::Flag),
    column("Frequency (bph)", "Frequency", CellKind::Numeric),
    column("Lug Width", "Lug Width", CellKind::Numeric),
    column("Power Reserve (hours)", "Power Reserve", CellKind::Numeric),
    column("Case Thickness", "Case Thickness", CellKind::Numeric),
    column("Interchangeable Strap", "Interchangeable Strap", CellKind::Flag),
];

/// Keeps only ASCII digits and decimal points
///
/// `"₹1,23,456"` becomes `"123456"`; text without digits becomes `""`.
pub fn clean_numeric(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect()
}

/// 1 for exactly "Yes", 0 for anything else including a missing value
pub fn yes_flag(raw: Option<&str>) -> u8 {
    u8::from(raw == Some("Yes"))
}

fn fixed_cell(record: &AttributeRecord, column: &FixedColumn) -> String {
    let raw = record.get(column.source).map(String::as_str);
    match column.kind {
        CellKind::Text => raw.unwrap_or_default().to_string(),
        CellKind::Numeric => raw.map(clean_numeric).unwrap_or_default(),
        CellKind::Flag => yes_flag(raw).to_string(),
    }
}

/// Converts heterogeneous records into a uniform table
///
/// Deterministic: the same records always produce the same table.
pub fn normalize(records: &[AttributeRecord]) -> NormalizedTable {
    let fixed_headers: IndexSet<&str> = FIXED_COLUMNS.iter().map(|c| c.header).collect();

    let mut extra_columns: IndexSet<&str> = IndexSet::new();
    for record in records {
        for key in record.keys() {
            if !fixed_headers.contains(key.as_str()) {
                extra_columns.insert(key.as_str());
            }
        }
    }

    let columns: Vec<String> = fixed_headers
        .iter()
        .chain(extra_columns.iter())
        .map(|header| header.to_string())
        .collect();

    let rows = records
        .iter()
        .map(|record| {
            FIXED_COLUMNS
                .iter()
                .map(|column| fixed_cell(record, column))
                .chain(
                    extra_columns
                        .iter()
                        .map(|key| record.get(*key).cloned().unwrap_or_default()),
                )
                .collect()
        })
        .collect();

    tracing::debug!(
        "Normalized {} records into {} columns ({} beyond the fixed schema)",
        records.len(),
        columns.len(),
        extra_columns.len()
    );

    NormalizedTable::new(columns, rows)
}
