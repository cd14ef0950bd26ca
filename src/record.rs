//! Product attribute records and the extract-stage interchange format
//!
//! A record is a flat, insertion-ordered map from attribute label to raw
//! text. The key set varies from product to product; only `name` and
//! `price` are guaranteed.

use indexmap::IndexMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Key holding the product display name
pub const NAME_KEY: &str = "name";

/// Key holding the raw price text
pub const PRICE_KEY: &str = "price";

/// Attribute label → raw value for one product detail page
pub type AttributeRecord = IndexMap<String, String>;

/// Records collected by the extract stage, in wave order
pub type RecordSet = Vec<AttributeRecord>;

/// Writes a record set as a JSON array of objects
pub fn write_record_set(path: &Path, records: &[AttributeRecord]) -> crate::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, records)?;
    writer.flush()?;
    Ok(())
}

/// Reads a record set previously written by [`write_record_set`]
pub fn read_record_set(path: &Path) -> crate::Result<RecordSet> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
