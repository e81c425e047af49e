use crate::matches::MotifMatch;
use crate::utils::Strand;
use rayon::prelude::*;
use std::collections::HashMap;

/// Removes overlapping matches, keeping one representative per overlap
/// cluster within each (strand, motif, sequence) group.
///
/// Groups are independent and processed in parallel on the current rayon
/// pool. The result is ordered by `match_id`.
pub fn dedup_matches(matches: Vec<MotifMatch>) -> Vec<MotifMatch> {
    let mut groups: HashMap<(Strand, String, String), Vec<MotifMatch>> = HashMap::new();
    for m in matches {
        groups
            .entry((m.strand, m.motif.clone(), m.seqname.clone()))
            .or_default()
            .push(m);
    }

    let mut deduped: Vec<MotifMatch> = groups
        .into_par_iter()
        .flat_map(|(_, group)| remove_overlapping(group))
        .collect();
    deduped.sort_by_key(|m| m.match_id);
    deduped
}

/// Greedy interval-cover reduction: repeatedly keep the remaining match
/// with the lowest p-value (position breaks ties) and drop everything that
/// overlaps its `[start, stop]` interval.
fn remove_overlapping(mut group: Vec<MotifMatch>) -> Vec<MotifMatch> {
    group.sort_by(|a, b| {
        a.pvalue
            .total_cmp(&b.pvalue)
            .then_with(|| a.start.cmp(&b.start))
            .then_with(|| a.stop.cmp(&b.stop))
    });

    let mut kept = Vec::new();
    while !group.is_empty() {
        let best = group.remove(0);
        group.retain(|m| m.start > best.stop || m.stop < best.start);
        kept.push(best);
    }
    kept
}
