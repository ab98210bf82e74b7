use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::aideon::contacts::error::Result;
use crate::aideon::contacts::model::LocalRecord;

/// Reads the address book export at `path`, discarding the header row.
///
/// Rows are kept as-is: no field count or type validation happens here, short
/// rows surface later when a remote body is built from them.
pub fn read_records(path: &Path) -> Result<Vec<LocalRecord>> {
    let file = File::open(path)?;
    let records = read_records_from(file)?;
    debug!(path = %path.display(), count = records.len(), "read address book");
    Ok(records)
}

/// Same as [`read_records`] for any reader.
pub fn read_records_from<R: Read>(reader: R) -> Result<Vec<LocalRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        records.push(LocalRecord::new(row.iter().map(str::to_string).collect()));
    }
    Ok(records)
}
