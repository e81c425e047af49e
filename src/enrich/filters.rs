use crate::annot::AnnotatedMatch;
use std::collections::HashSet;

/// Restriction of matches by their position relative to the gene.
///
/// `promoter span` below is `stop - start + dist`: for a promoter-side
/// match it is negative exactly when the whole match ends before the
/// transcription start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionFilter {
    /// Match lies entirely in the promoter.
    PromoterOnly,
    /// Match starts in the promoter (may reach into the gene body).
    PromoterOverlap,
    /// Match starts in the gene body.
    GeneOnly,
    /// Match reaches into the gene body (may start in the promoter).
    GeneOverlap,
}

/// Optional pre-enrichment filters, applied in a fixed order: p-value
/// cutoff, promoter-size cutoff, background restriction, region
/// restriction.
#[derive(Debug, Default)]
pub struct FilterConfig {
    pub max_pvalue: Option<f64>,
    pub promoter_size: Option<u32>,
    pub background: Option<HashSet<String>>,
    pub region: Option<RegionFilter>,
}

pub fn apply_filters(mut annotated: Vec<AnnotatedMatch>, config: &FilterConfig) -> Vec<AnnotatedMatch> {
    if let Some(max_pvalue) = config.max_pvalue {
        annotated.retain(|a| a.pvalue < max_pvalue);
    }
    if let Some(promoter_size) = config.promoter_size {
        annotated.retain(|a| a.dist >= -(promoter_size as i64));
    }
    if let Some(background) = &config.background {
        annotated.retain(|a| background.contains(&a.gene));
    }
    if let Some(region) = config.region {
        annotated.retain(|a| {
            let span = (a.stop - a.start) as i64 + a.dist;
            match region {
                RegionFilter::PromoterOnly => span < 0,
                RegionFilter::PromoterOverlap => a.dist < 0,
                RegionFilter::GeneOnly => a.dist > 0,
                RegionFilter::GeneOverlap => span > 0,
            }
        });
    }
    annotated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annot::overlap::tests::make_annotated;

    fn rows() -> Vec<AnnotatedMatch> {
        vec![
            // fully in promoter: [310, 320] vs gene start 500, dist -190
            make_annotated("G1", 0, "M1", 310, 320, 0.001, -190),
            // straddles the transcription start: dist -5, span 5
            make_annotated("G1", 1, "M1", 495, 505, 0.01, -5),
            // fully in the body
            make_annotated("G2", 2, "M2", 500, 510, 0.04, 1),
        ]
    }

    fn ids(rows: &[AnnotatedMatch]) -> Vec<usize> {
        rows.iter().map(|a| a.match_id).collect()
    }

    #[test]
    fn pvalue_cutoff_is_strict() {
        let config = FilterConfig {
            max_pvalue: Some(0.04),
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(rows(), &config)), vec![0, 1]);
    }

    #[test]
    fn promoter_size_cutoff() {
        let config = FilterConfig {
            promoter_size: Some(100),
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(rows(), &config)), vec![1, 2]);
    }

    #[test]
    fn background_restriction() {
        let config = FilterConfig {
            background: Some(["G2".to_string()].into_iter().collect()),
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(rows(), &config)), vec![2]);
    }

    #[test]
    fn region_filters() {
        let only = |region| FilterConfig {
            region: Some(region),
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(rows(), &only(RegionFilter::PromoterOnly))), vec![0]);
        assert_eq!(
            ids(&apply_filters(rows(), &only(RegionFilter::PromoterOverlap))),
            vec![0, 1]
        );
        assert_eq!(ids(&apply_filters(rows(), &only(RegionFilter::GeneOnly))), vec![2]);
        assert_eq!(ids(&apply_filters(rows(), &only(RegionFilter::GeneOverlap))), vec![1, 2]);
    }

    #[test]
    fn filters_compose() {
        let config = FilterConfig {
            max_pvalue: Some(0.05),
            promoter_size: Some(50),
            background: Some(["G1".to_string(), "G2".to_string()].into_iter().collect()),
            region: Some(RegionFilter::PromoterOverlap),
        };
        assert_eq!(ids(&apply_filters(rows(), &config)), vec![1]);
    }

    #[test]
    fn no_filters_is_identity() {
        let config = FilterConfig::default();
        assert_eq!(apply_filters(rows(), &config), rows());
    }
}
