use crate::model::RawRecord;
use anyhow::{Context, Result};
use std::{fs::File, io::Read, path::Path};

/// Read every record of a series file, in file order.
pub fn read_records<P: AsRef<Path>>(file: P) -> Result<Vec<RawRecord>> {
    let file = file.as_ref();
    let reader = File::open(file).with_context(|| format!("failed to open {file:?}"))?;
    parse_records(reader).with_context(|| format!("failed to parse {file:?}"))
}

fn parse_records<R: Read>(reader: R) -> Result<Vec<RawRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (i_row, record) in reader.deserialize::<RawRecord>().enumerate() {
        let record = record.with_context(|| format!("invalid row {i_row}"))?;
        records.push(record);
    }
    Ok(records)
}
