use crate::utils::{
    io_utils::{self, MATCH_TABLE_MAGIC},
    MenrichError, Result, Strand,
};
use serde::{Deserialize, Serialize};
use std::{
    io::{BufRead, Write},
    path::Path,
};

/// Column names of a FIMO match table, in canonical output order.
pub const MATCH_COLUMNS: [&str; 7] = [
    "#pattern name",
    "sequence name",
    "start",
    "stop",
    "strand",
    "score",
    "p-value",
];

/// A single motif occurrence call. Coordinates are 1-based inclusive.
///
/// `match_id` is the stable row id assigned when the table is first loaded
/// from text; the serialized form preserves it across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotifMatch {
    pub match_id: usize,
    pub motif: String,
    pub seqname: String,
    pub start: u32,
    pub stop: u32,
    pub strand: Strand,
    pub score: f64,
    pub pvalue: f64,
}

/// Loads a match table, sniffing the on-disk format: gzip is transparently
/// decompressed, a magic-prefixed serialized table is decoded with bincode,
/// anything else is parsed as tab-delimited text.
pub fn load_matches(path: &Path) -> Result<Vec<MotifMatch>> {
    let buf = io_utils::read_table_bytes(path)?;
    if io_utils::is_serialized(&buf, &MATCH_TABLE_MAGIC) {
        return io_utils::decode_table(&buf, &MATCH_TABLE_MAGIC);
    }
    parse_matches_text(buf.as_slice())
}

/// Parses a tab-delimited match table. The header line must name all of
/// [`MATCH_COLUMNS`]; extra columns are ignored and column order is free.
pub fn parse_matches_text<R: BufRead>(reader: R) -> Result<Vec<MotifMatch>> {
    let mut lines = reader.lines();
    let header = loop {
        match lines.next() {
            Some(line) => {
                let line = line?;
                if !line.trim().is_empty() {
                    break line;
                }
            }
            None => return Err(MenrichError::Parse("match table is empty".to_string())),
        }
    };

    let columns: Vec<&str> = header.split('\t').map(str::trim).collect();
    let mut indices = [0usize; MATCH_COLUMNS.len()];
    for (slot, name) in indices.iter_mut().zip(MATCH_COLUMNS) {
        *slot = columns
            .iter()
            .position(|c| *c == name)
            .ok_or_else(|| MenrichError::Parse(format!("missing column '{}': {}", name, header)))?;
    }
    let needed = indices.iter().max().copied().unwrap_or(0) + 1;

    let mut matches = Vec::new();
    for (line_number, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < needed {
            return Err(MenrichError::Parse(format!(
                "Expected at least {} fields at line {}, found {}: {}",
                needed,
                line_number + 2,
                fields.len(),
                line
            )));
        }
        matches.push(parse_match_fields(&fields, &indices, matches.len(), &line)?);
    }
    Ok(matches)
}

fn parse_match_fields(
    fields: &[&str],
    indices: &[usize; MATCH_COLUMNS.len()],
    match_id: usize,
    line: &str,
) -> Result<MotifMatch> {
    let numeric = |i: usize| -> Result<f64> {
        fields[indices[i]]
            .trim()
            .parse()
            .map_err(|_| MenrichError::Parse(format!("invalid number in match row: {}", line)))
    };
    let coord = |i: usize| -> Result<u32> {
        fields[indices[i]]
            .trim()
            .parse()
            .map_err(|_| MenrichError::Parse(format!("invalid coordinate in match row: {}", line)))
    };

    Ok(MotifMatch {
        match_id,
        motif: fields[indices[0]].trim().to_string(),
        seqname: fields[indices[1]].trim().to_string(),
        start: coord(2)?,
        stop: coord(3)?,
        strand: fields[indices[4]].trim().parse()?,
        score: numeric(5)?,
        pvalue: numeric(6)?,
    })
}

/// Writes the canonical tab-delimited form. `match_id` is not part of the
/// text format; reloading the file reassigns row ids.
pub fn write_matches_tsv<W: Write>(writer: &mut W, matches: &[MotifMatch]) -> Result<()> {
    writeln!(writer, "{}", MATCH_COLUMNS.join("\t"))?;
    for m in matches {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            m.motif, m.seqname, m.start, m.stop, m.strand, m.score, m.pvalue
        )?;
    }
    Ok(())
}

/// Writes the serialized cache form, preserving `match_id`.
pub fn write_matches_serialized(path: &Path, matches: &[MotifMatch]) -> Result<()> {
    io_utils::write_table(path, &MATCH_TABLE_MAGIC, matches, false)
}
