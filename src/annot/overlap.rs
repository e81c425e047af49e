use crate::annot::GeneInterval;
use crate::matches::MotifMatch;
use crate::utils::{
    io_utils::{self, ANNOTATED_TABLE_MAGIC},
    MenrichError, Result, Strand,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, path::Path};

/// A motif match re-keyed by the gene whose body-plus-promoter span
/// contains it.
///
/// `dist` is the signed offset from the gene's transcription start:
/// negative strictly inside the promoter, `>= 1` inside the gene body,
/// never 0. The same `match_id` can appear under several genes when gene
/// spans overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedMatch {
    pub gene: String,
    pub match_id: usize,
    pub motif: String,
    pub seqname: String,
    pub start: u32,
    pub stop: u32,
    pub strand: Strand,
    pub score: f64,
    pub pvalue: f64,
    pub dist: i64,
}

/// What to do when a gene's (strand, chromosome) group has no matches at
/// all in the match table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingGroupPolicy {
    /// Fail the run (original behavior).
    Error,
    /// Treat the group as having zero matches.
    Skip,
}

/// Assigns matches to genes and computes signed distances. Gene groups are
/// keyed by (strand, chromosome) and processed in parallel; the result is
/// ordered by (gene, match_id).
pub fn annotate_matches(
    genes: &[GeneInterval],
    matches: &[MotifMatch],
    policy: MissingGroupPolicy,
) -> Result<Vec<AnnotatedMatch>> {
    let mut match_groups: HashMap<(Strand, &str), Vec<&MotifMatch>> = HashMap::new();
    for m in matches {
        match_groups
            .entry((m.strand, m.seqname.as_str()))
            .or_default()
            .push(m);
    }

    let mut gene_groups: HashMap<(Strand, &str), Vec<&GeneInterval>> = HashMap::new();
    for g in genes {
        gene_groups
            .entry((g.strand, g.chrom.as_str()))
            .or_default()
            .push(g);
    }

    let groups: Vec<_> = gene_groups.into_iter().collect();
    let annotated_per_group: Vec<Vec<AnnotatedMatch>> = groups
        .into_par_iter()
        .map(|((strand, chrom), group_genes)| {
            let group_matches = match match_groups.get(&(strand, chrom)) {
                Some(mg) => mg.as_slice(),
                None => match policy {
                    MissingGroupPolicy::Error => {
                        return Err(MenrichError::MissingGroup {
                            strand: strand.to_string(),
                            seqname: chrom.to_string(),
                        })
                    }
                    MissingGroupPolicy::Skip => {
                        log::debug!("no matches for strand {} on {}, skipping", strand, chrom);
                        &[]
                    }
                },
            };
            Ok(annotate_group(&group_genes, group_matches))
        })
        .collect::<Result<_>>()?;

    let mut annotated: Vec<AnnotatedMatch> = annotated_per_group.into_iter().flatten().collect();
    annotated.sort_by(|a, b| a.gene.cmp(&b.gene).then_with(|| a.match_id.cmp(&b.match_id)));
    Ok(annotated)
}

fn annotate_group(genes: &[&GeneInterval], matches: &[&MotifMatch]) -> Vec<AnnotatedMatch> {
    let mut annotated = Vec::new();
    for gene in genes {
        for m in matches {
            let raw = match gene.strand {
                Strand::Forward => {
                    if m.start < gene.promoter_boundary || m.stop > gene.end {
                        continue;
                    }
                    m.start as i64 - gene.start as i64
                }
                Strand::Reverse => {
                    if m.start < gene.start || m.stop > gene.promoter_boundary {
                        continue;
                    }
                    gene.end as i64 - m.stop as i64
                }
            };
            // body distances are 1-indexed so dist is never 0
            let dist = if raw < 0 { raw } else { raw + 1 };
            annotated.push(AnnotatedMatch {
                gene: gene.gene_id.clone(),
                match_id: m.match_id,
                motif: m.motif.clone(),
                seqname: m.seqname.clone(),
                start: m.start,
                stop: m.stop,
                strand: m.strand,
                score: m.score,
                pvalue: m.pvalue,
                dist,
            });
        }
    }
    annotated
}

pub fn write_annotated(path: &Path, annotated: &[AnnotatedMatch]) -> Result<()> {
    io_utils::write_table(path, &ANNOTATED_TABLE_MAGIC, annotated, true)
}

pub fn read_annotated(path: &Path) -> Result<Vec<AnnotatedMatch>> {
    let buf = io_utils::read_table_bytes(path)?;
    io_utils::decode_table(&buf, &ANNOTATED_TABLE_MAGIC)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::annot::genes::tests::make_gene;
    use crate::matches::table::tests::make_match;

    pub(crate) fn make_annotated(
        gene: &str,
        match_id: usize,
        motif: &str,
        start: u32,
        stop: u32,
        pvalue: f64,
        dist: i64,
    ) -> AnnotatedMatch {
        AnnotatedMatch {
            gene: gene.to_string(),
            match_id,
            motif: motif.to_string(),
            seqname: "chr1".to_string(),
            start,
            stop,
            strand: Strand::Forward,
            score: 10.0,
            pvalue,
            dist,
        }
    }

    #[test]
    fn forward_gene_promoter_and_body_distances() {
        let genes = vec![make_gene("G1", "chr1", Strand::Forward, 500, 800, 200)];
        assert_eq!(genes[0].promoter_boundary, 300);
        let matches = vec![
            make_match(0, "M1", "chr1", 310, 320, Strand::Forward, 0.01),
            make_match(1, "M1", "chr1", 500, 510, Strand::Forward, 0.01),
            make_match(2, "M1", "chr1", 250, 260, Strand::Forward, 0.01), // before promoter
            make_match(3, "M1", "chr1", 795, 805, Strand::Forward, 0.01), // past gene end
        ];
        let annotated = annotate_matches(&genes, &matches, MissingGroupPolicy::Error).unwrap();
        let dists: Vec<(usize, i64)> = annotated.iter().map(|a| (a.match_id, a.dist)).collect();
        assert_eq!(dists, vec![(0, -190), (1, 1)]);
    }

    #[test]
    fn reverse_gene_mirrored_selection() {
        let genes = vec![make_gene("G1", "chr1", Strand::Reverse, 500, 800, 200)];
        assert_eq!(genes[0].promoter_boundary, 1000);
        let matches = vec![
            make_match(0, "M1", "chr1", 790, 810, Strand::Reverse, 0.01), // promoter side
            make_match(1, "M1", "chr1", 700, 750, Strand::Reverse, 0.01), // body
            make_match(2, "M1", "chr1", 490, 510, Strand::Reverse, 0.01), // before gene start
            make_match(3, "M1", "chr1", 990, 1010, Strand::Reverse, 0.01), // past promoter
        ];
        let annotated = annotate_matches(&genes, &matches, MissingGroupPolicy::Error).unwrap();
        let dists: Vec<(usize, i64)> = annotated.iter().map(|a| (a.match_id, a.dist)).collect();
        assert_eq!(dists, vec![(0, -10), (1, 51)]);
    }

    #[test]
    fn dist_sign_marks_promoter_and_is_never_zero() {
        let genes = vec![make_gene("G1", "chr1", Strand::Forward, 500, 800, 200)];
        let matches: Vec<MotifMatch> = (300..=790)
            .step_by(10)
            .enumerate()
            .map(|(i, start)| make_match(i, "M1", "chr1", start, start + 5, Strand::Forward, 0.01))
            .collect();
        let annotated = annotate_matches(&genes, &matches, MissingGroupPolicy::Error).unwrap();
        assert!(!annotated.is_empty());
        for a in &annotated {
            assert_ne!(a.dist, 0);
            assert_eq!(a.dist < 0, a.start < 500, "match at {}", a.start);
        }
    }

    #[test]
    fn overlapping_genes_both_claim_a_match() {
        let genes = vec![
            make_gene("G1", "chr1", Strand::Forward, 500, 800, 200),
            make_gene("G2", "chr1", Strand::Forward, 600, 900, 200),
        ];
        let matches = vec![make_match(0, "M1", "chr1", 650, 660, Strand::Forward, 0.01)];
        let annotated = annotate_matches(&genes, &matches, MissingGroupPolicy::Error).unwrap();
        let owners: Vec<&str> = annotated.iter().map(|a| a.gene.as_str()).collect();
        assert_eq!(owners, vec!["G1", "G2"]);
        assert_eq!(annotated[0].dist, 151);
        assert_eq!(annotated[1].dist, 51);
    }

    #[test]
    fn missing_group_policy() {
        let genes = vec![make_gene("G1", "chr2", Strand::Forward, 500, 800, 200)];
        let matches = vec![make_match(0, "M1", "chr1", 650, 660, Strand::Forward, 0.01)];

        assert!(matches!(
            annotate_matches(&genes, &matches, MissingGroupPolicy::Error),
            Err(MenrichError::MissingGroup { .. })
        ));
        let skipped = annotate_matches(&genes, &matches, MissingGroupPolicy::Skip).unwrap();
        assert!(skipped.is_empty());
    }

    #[test]
    fn strand_groups_are_separate() {
        // a forward gene never claims reverse-strand matches
        let genes = vec![make_gene("G1", "chr1", Strand::Forward, 500, 800, 200)];
        let matches = vec![
            make_match(0, "M1", "chr1", 600, 610, Strand::Forward, 0.01),
            make_match(1, "M1", "chr1", 600, 610, Strand::Reverse, 0.01),
        ];
        let annotated = annotate_matches(&genes, &matches, MissingGroupPolicy::Error).unwrap();
        assert_eq!(annotated.len(), 1);
        assert_eq!(annotated[0].match_id, 0);
    }

    #[test]
    fn output_sorted_by_gene_then_match_id() {
        let genes = vec![
            make_gene("B", "chr1", Strand::Forward, 500, 800, 200),
            make_gene("A", "chr1", Strand::Forward, 500, 800, 200),
        ];
        let matches = vec![
            make_match(1, "M1", "chr1", 600, 610, Strand::Forward, 0.01),
            make_match(0, "M1", "chr1", 550, 560, Strand::Forward, 0.01),
        ];
        let annotated = annotate_matches(&genes, &matches, MissingGroupPolicy::Error).unwrap();
        let keys: Vec<(&str, usize)> = annotated.iter().map(|a| (a.gene.as_str(), a.match_id)).collect();
        assert_eq!(keys, vec![("A", 0), ("A", 1), ("B", 0), ("B", 1)]);
    }

    #[test]
    fn annotated_table_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotated.bin.gz");
        let rows = vec![make_annotated("G1", 0, "M1", 310, 320, 0.01, -190)];
        write_annotated(&path, &rows).unwrap();
        assert_eq!(read_annotated(&path).unwrap(), rows);
    }
}
