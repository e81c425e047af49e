use crate::utils::{MenrichError, Result};
use statrs::distribution::{Discrete, Hypergeometric};

/// One-sided ("greater") Fisher's exact test for the contingency table
/// `[[q, b-q], [nq-q, nbg-nq-b+q]]`, i.e. the upper tail `P(X >= q)` of
/// `X ~ Hypergeometric(N=nbg, K=b, n=nq)`.
///
/// `q` = query hits for one motif, `b` = background hits for that motif,
/// `nq`/`nbg` = deduplicated query/background totals.
pub fn fisher_exact_greater(q: u64, b: u64, nq: u64, nbg: u64) -> Result<f64> {
    if q > b || q > nq || b > nbg || nq > nbg {
        return Err(MenrichError::Stats(format!(
            "inconsistent contingency counts: q={}, b={}, nq={}, nbg={}",
            q, b, nq, nbg
        )));
    }
    let dist = Hypergeometric::new(nbg, b, nq)
        .map_err(|e| MenrichError::Stats(format!("hypergeometric setup failed: {}", e)))?;

    let upper = b.min(nq);
    let tail: f64 = (q..=upper).map(|k| dist.pmf(k)).sum();
    Ok(tail.min(1.0))
}
