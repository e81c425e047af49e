use crate::utils::{MenrichError, Result, Strand};
use std::io::BufRead;

/// A gene model reduced to the span relevant for match annotation: the gene
/// body plus a fixed-length upstream promoter region.
///
/// `promoter_boundary` is `max(1, start - upstream_len)` on the forward
/// strand and `end + upstream_len` on the reverse strand.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneInterval {
    pub gene_id: String,
    pub chrom: String,
    pub strand: Strand,
    pub start: u32,
    pub end: u32,
    pub promoter_boundary: u32,
}

/// Reads gene intervals from a 9-column GFF3 annotation table.
///
/// Keeps rows whose feature type is exactly `gene`, or case-insensitively
/// `gene`/`pseudogene` when `include_pseudogenes` is set. The gene id is the
/// uppercased `ID=` attribute; a matching row without one is fatal.
pub fn read_gene_intervals<R: BufRead>(
    reader: R,
    include_pseudogenes: bool,
    upstream_len: u32,
) -> Result<Vec<GeneInterval>> {
    const EXPECTED_FIELD_COUNT: usize = 9;

    let mut genes = Vec::new();
    for (line_number, line) in reader.lines().enumerate() {
        let line = line?;
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != EXPECTED_FIELD_COUNT {
            return Err(MenrichError::Parse(format!(
                "Expected {} fields at line {}, found {}: {}",
                EXPECTED_FIELD_COUNT,
                line_number + 1,
                fields.len(),
                line
            )));
        }

        if !is_gene_feature(fields[2], include_pseudogenes) {
            continue;
        }

        let start: u32 = fields[3].parse().map_err(|_| {
            MenrichError::Parse(format!("invalid gene start at line {}: {}", line_number + 1, line))
        })?;
        let end: u32 = fields[4].parse().map_err(|_| {
            MenrichError::Parse(format!("invalid gene end at line {}: {}", line_number + 1, line))
        })?;
        let strand: Strand = fields[6].parse()?;
        let gene_id = extract_gene_id(fields[8]).ok_or_else(|| {
            MenrichError::Parse(format!(
                "no ID= attribute at line {}: {}",
                line_number + 1,
                fields[8]
            ))
        })?;

        genes.push(GeneInterval {
            gene_id,
            chrom: fields[0].to_string(),
            strand,
            start,
            end,
            promoter_boundary: promoter_boundary(strand, start, end, upstream_len),
        });
    }
    Ok(genes)
}

fn is_gene_feature(feature: &str, include_pseudogenes: bool) -> bool {
    if include_pseudogenes {
        feature.eq_ignore_ascii_case("gene") || feature.eq_ignore_ascii_case("pseudogene")
    } else {
        feature == "gene"
    }
}

fn extract_gene_id(attributes: &str) -> Option<String> {
    attributes
        .split(';')
        .find_map(|attr| attr.trim().strip_prefix("ID="))
        .map(|id| id.trim().to_uppercase())
}

fn promoter_boundary(strand: Strand, start: u32, end: u32, upstream_len: u32) -> u32 {
    match strand {
        Strand::Forward => start.saturating_sub(upstream_len).max(1),
        Strand::Reverse => end + upstream_len,
    }
}
