pub mod filters;
pub mod lists;

pub use filters::{apply_filters, FilterConfig, RegionFilter};
pub use lists::{read_background, read_gene_lists, GeneList};

use crate::annot::AnnotatedMatch;
use crate::stats::{fdr_correction, fisher_exact_greater};
use crate::utils::Result;
use itertools::Itertools;
use std::collections::{HashMap, HashSet};

/// Enrichment of one motif in a query gene list against the background.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentRow {
    pub motif: String,
    pub pvalue: f64,
    pub adj_pvalue: f64,
    pub rejected: bool,
}

/// Per-motif match counts over a population of annotated matches,
/// deduplicated by `match_id` (a match annotated under several genes
/// counts once).
struct MotifCounts<'a> {
    per_motif: HashMap<&'a str, u64>,
    total: u64,
}

fn count_unique_matches<'a, F>(annotated: &'a [AnnotatedMatch], keep: F) -> MotifCounts<'a>
where
    F: Fn(&AnnotatedMatch) -> bool,
{
    let mut seen = HashSet::new();
    let mut per_motif: HashMap<&str, u64> = HashMap::new();
    let mut total = 0;
    for a in annotated {
        if keep(a) && seen.insert(a.match_id) {
            *per_motif.entry(a.motif.as_str()).or_insert(0) += 1;
            total += 1;
        }
    }
    MotifCounts { per_motif, total }
}

/// Tests every motif of the background population for enrichment in
/// `gene_list` with a one-sided Fisher's exact test, then applies
/// Benjamini–Hochberg FDR correction at level `alpha`.
///
/// Rows come back sorted by raw p-value ascending (ties keep motif-name
/// order). With `hide_rejected`, only significant rows are returned.
pub fn list_enrichment(
    annotated: &[AnnotatedMatch],
    gene_list: &GeneList,
    alpha: f64,
    hide_rejected: bool,
) -> Result<Vec<EnrichmentRow>> {
    let background = count_unique_matches(annotated, |_| true);

    let query_genes: HashSet<&str> = gene_list.genes.iter().map(String::as_str).collect();
    let annotated_genes: HashSet<&str> = annotated.iter().map(|a| a.gene.as_str()).collect();
    let absent = query_genes
        .iter()
        .filter(|g| !annotated_genes.contains(**g))
        .count();
    log::info!(
        "{} genes in gene list {} are not part of the background",
        absent,
        gene_list.label()
    );

    let query = count_unique_matches(annotated, |a| query_genes.contains(a.gene.as_str()));

    let mut rows = Vec::with_capacity(background.per_motif.len());
    for motif in background.per_motif.keys().sorted() {
        let b = background.per_motif[motif];
        let q = query.per_motif.get(motif).copied().unwrap_or(0);
        let pvalue = fisher_exact_greater(q, b, query.total, background.total)?;
        rows.push(EnrichmentRow {
            motif: motif.to_string(),
            pvalue,
            adj_pvalue: 0.0,
            rejected: false,
        });
    }
    rows.sort_by(|a, b| a.pvalue.total_cmp(&b.pvalue));

    let pvalues: Vec<f64> = rows.iter().map(|r| r.pvalue).collect();
    let (reject, adjusted) = fdr_correction(&pvalues, alpha);
    for ((row, adj), rejected) in rows.iter_mut().zip(adjusted).zip(reject) {
        row.adj_pvalue = adj;
        row.rejected = rejected;
    }

    if hide_rejected {
        rows.retain(|r| r.rejected);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annot::overlap::tests::make_annotated;

    fn population() -> Vec<AnnotatedMatch> {
        // six distinct matches over three genes: A appears 4 times, B twice
        vec![
            make_annotated("G1", 0, "A", 100, 110, 0.001, -10),
            make_annotated("G1", 1, "A", 200, 210, 0.001, 1),
            make_annotated("G1", 2, "B", 300, 310, 0.001, 5),
            make_annotated("G2", 3, "A", 100, 110, 0.001, -10),
            make_annotated("G2", 4, "B", 200, 210, 0.001, 1),
            make_annotated("G3", 5, "A", 100, 110, 0.001, -10),
        ]
    }

    fn list(genes: &[&str]) -> GeneList {
        GeneList {
            name: Some("test".to_string()),
            genes: genes.iter().map(|g| g.to_string()).collect(),
        }
    }

    fn assert_close(value: f64, expected: f64) {
        assert!(
            (value - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            value
        );
    }

    #[test]
    fn fisher_counts_match_hand_computation() {
        // query {G1, G3}: nq=4 with A=3, B=1 against nbg=6 with A=4, B=2
        let rows = list_enrichment(&population(), &list(&["G1", "G3"]), 0.05, false).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].motif, "A");
        assert_close(rows[0].pvalue, 0.6);
        assert_eq!(rows[1].motif, "B");
        assert_close(rows[1].pvalue, 14.0 / 15.0);
        // BH: [min(2*0.6, 14/15), 14/15]
        assert_close(rows[0].adj_pvalue, 14.0 / 15.0);
        assert_close(rows[1].adj_pvalue, 14.0 / 15.0);
        assert!(!rows[0].rejected && !rows[1].rejected);
    }

    #[test]
    fn duplicate_match_ids_count_once() {
        let mut rows = population();
        // the same match annotated under a second gene
        let mut dup = rows[0].clone();
        dup.gene = "G2".to_string();
        rows.push(dup);

        let result = list_enrichment(&rows, &list(&["G1", "G3"]), 0.05, false).unwrap();
        let baseline = list_enrichment(&population(), &list(&["G1", "G3"]), 0.05, false).unwrap();
        assert_eq!(result, baseline);
    }

    #[test]
    fn motif_absent_from_query_gets_p_one() {
        // query {G3} has only motif A; B should be tested with q = 0
        let rows = list_enrichment(&population(), &list(&["G3"]), 0.05, false).unwrap();
        let b_row = rows.iter().find(|r| r.motif == "B").unwrap();
        assert_close(b_row.pvalue, 1.0);
    }

    #[test]
    fn unknown_genes_do_not_contribute() {
        let rows = list_enrichment(&population(), &list(&["G1", "G3", "NOPE"]), 0.05, false).unwrap();
        let baseline = list_enrichment(&population(), &list(&["G1", "G3"]), 0.05, false).unwrap();
        assert_eq!(rows, baseline);
    }

    #[test]
    fn rows_sorted_by_raw_p() {
        let rows = list_enrichment(&population(), &list(&["G1", "G3"]), 0.05, false).unwrap();
        for pair in rows.windows(2) {
            assert!(pair[0].pvalue <= pair[1].pvalue);
        }
    }

    #[test]
    fn hide_rejected_filters_rows() {
        let rows = list_enrichment(&population(), &list(&["G1", "G3"]), 0.05, true).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn empty_background_yields_no_rows() {
        let rows = list_enrichment(&[], &list(&["G1"]), 0.05, false).unwrap();
        assert!(rows.is_empty());
    }
}
