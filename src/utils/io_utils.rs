use crate::utils::{MenrichError, Result};
use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use serde::{de::DeserializeOwned, Serialize};
use std::{
    fs::File,
    io::{BufWriter, Read, Write},
    path::Path,
};

/// Identifies a serialized motif match table.
pub const MATCH_TABLE_MAGIC: [u8; 4] = *b"MTB\x01";
/// Identifies a serialized annotated match table.
pub const ANNOTATED_TABLE_MAGIC: [u8; 4] = *b"MAN\x01";

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Reads a whole table file, transparently decompressing gzip.
pub fn read_table_bytes(path: &Path) -> Result<Vec<u8>> {
    let raw = std::fs::read(path)?;
    if raw.starts_with(&GZIP_MAGIC) {
        let mut decoded = Vec::new();
        GzDecoder::new(raw.as_slice()).read_to_end(&mut decoded)?;
        Ok(decoded)
    } else {
        Ok(raw)
    }
}

pub fn is_serialized(buf: &[u8], magic: &[u8; 4]) -> bool {
    buf.starts_with(magic)
}

pub fn decode_table<T: DeserializeOwned>(buf: &[u8], magic: &[u8; 4]) -> Result<Vec<T>> {
    if !is_serialized(buf, magic) {
        return Err(MenrichError::Parse(
            "serialized table has an unexpected magic prefix".to_string(),
        ));
    }
    bincode::deserialize(&buf[magic.len()..])
        .map_err(|e| MenrichError::Parse(format!("failed to decode serialized table: {}", e)))
}

pub fn write_table<T: Serialize>(
    path: &Path,
    magic: &[u8; 4],
    rows: &[T],
    compress: bool,
) -> Result<()> {
    let file = File::create(path)?;
    if compress {
        let mut writer = GzEncoder::new(BufWriter::new(file), Compression::default());
        write_payload(&mut writer, magic, rows)?;
        writer.finish()?;
    } else {
        let mut writer = BufWriter::new(file);
        write_payload(&mut writer, magic, rows)?;
    }
    Ok(())
}

fn write_payload<W: Write, T: Serialize>(writer: &mut W, magic: &[u8; 4], rows: &[T]) -> Result<()> {
    writer.write_all(magic)?;
    bincode::serialize_into(writer, rows)
        .map_err(|e| MenrichError::Parse(format!("failed to encode table: {}", e)))
}
