//! Transform stage: record normalization and CSV encoding
//!
//! This module handles:
//! - Imposing the fixed column schema on heterogeneous records
//! - Cleaning numeric-like fields and coercing yes/no flags
//! - Encoding the resulting table as CSV

mod normalize;
mod table;

pub use normalize::{clean_numeric, normalize, yes_flag, CellKind, FixedColumn, FIXED_COLUMNS};
pub use table::NormalizedTable;

use crate::record::AttributeRecord;
use crate::EtlError;

/// Normalizes records and encodes the table as CSV
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - CSV bytes with a header row and one row per record
/// * `Err(EtlError::EmptyTable)` - There were no records to tabulate
pub fn transform_records(records: &[AttributeRecord]) -> Result<Vec<u8>, EtlError> {
    let table = normalize(records);
    if table.is_empty() {
        return Err(EtlError::EmptyTable);
    }

    let csv = table.to_csv()?;
    if csv.is_empty() {
        return Err(EtlError::EmptyTable);
    }

    Ok(csv)
}
