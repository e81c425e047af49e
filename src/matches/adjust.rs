use crate::matches::MotifMatch;
use crate::utils::{MenrichError, Result};
use std::{collections::HashMap, io::BufRead};

/// Genomic placement of one extracted promoter sequence, taken from a
/// FASTA header of the form
/// `>GENE | chrom:start-end FORWARD LENGTH=1000`.
#[derive(Debug, Clone, PartialEq)]
pub struct PromoterRecord {
    pub gene_id: String,
    pub chrom: String,
    pub start: u32,
    pub end: u32,
}

/// Reads promoter placements from the `>` header lines of a FASTA-like
/// file; sequence lines are ignored.
pub fn read_promoters<R: BufRead>(reader: R) -> Result<Vec<PromoterRecord>> {
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.starts_with('>') {
            records.push(parse_promoter_header(&line)?);
        }
    }
    Ok(records)
}

fn parse_promoter_header(line: &str) -> Result<PromoterRecord> {
    let error_msg = || MenrichError::Parse(format!("Invalid promoter header: {}", line));

    let rest = line.strip_prefix('>').ok_or_else(error_msg)?;
    let (gene_id, placement) = rest.split_once(" | ").ok_or_else(error_msg)?;

    let fields: Vec<&str> = placement.split_whitespace().collect();
    if fields.len() != 3 {
        return Err(error_msg());
    }

    let region: Vec<&str> = fields[0].split([':', '-']).collect();
    if region.len() != 3 {
        return Err(error_msg());
    }
    let start: u32 = region[1].parse().map_err(|_| error_msg())?;
    let end: u32 = region[2].parse().map_err(|_| error_msg())?;

    match fields[1] {
        "FORWARD" | "REVERSE" => {}
        _ => return Err(error_msg()),
    }
    fields[2]
        .strip_prefix("LENGTH=")
        .and_then(|v| v.parse::<u32>().ok())
        .ok_or_else(error_msg)?;

    Ok(PromoterRecord {
        gene_id: gene_id.trim().to_string(),
        chrom: region[0].to_string(),
        start,
        end,
    })
}

/// Translates promoter-relative match coordinates (1-based within the
/// extracted sequence) to genome-absolute coordinates and rewrites the
/// sequence name to the promoter's chromosome.
pub fn translate_coordinates(
    matches: Vec<MotifMatch>,
    promoters: &[PromoterRecord],
) -> Result<Vec<MotifMatch>> {
    let by_gene: HashMap<&str, &PromoterRecord> = promoters
        .iter()
        .map(|p| (p.gene_id.as_str(), p))
        .collect();

    matches
        .into_iter()
        .map(|mut m| {
            let promoter = by_gene
                .get(m.seqname.as_str())
                .ok_or_else(|| MenrichError::MissingPromoter(m.seqname.clone()))?;
            m.start = promoter.start + m.start - 1;
            m.stop = promoter.start + m.stop - 1;
            m.seqname = promoter.chrom.clone();
            Ok(m)
        })
        .collect()
}
