/// Benjamini–Hochberg FDR correction over p-values already sorted in
/// ascending order.
///
/// Returns per-hypothesis reject flags at level `alpha` (step-up: every
/// hypothesis up to the largest `i` with `p[i] <= (i+1)/n * alpha` is
/// rejected) and adjusted p-values (`p[i]*n/(i+1)`, made monotone by a
/// reverse running minimum and clipped at 1).
pub fn fdr_correction(pvalues: &[f64], alpha: f64) -> (Vec<bool>, Vec<f64>) {
    let n = pvalues.len();
    if n == 0 {
        return (Vec::new(), Vec::new());
    }

    let ecdf = |i: usize| (i + 1) as f64 / n as f64;

    let mut reject: Vec<bool> = pvalues
        .iter()
        .enumerate()
        .map(|(i, p)| *p <= ecdf(i) * alpha)
        .collect();
    if let Some(last) = reject.iter().rposition(|&r| r) {
        for flag in reject.iter_mut().take(last + 1) {
            *flag = true;
        }
    }

    let mut adjusted: Vec<f64> = pvalues
        .iter()
        .enumerate()
        .map(|(i, p)| p / ecdf(i))
        .collect();
    for i in (0..n - 1).rev() {
        adjusted[i] = adjusted[i].min(adjusted[i + 1]);
    }
    for value in adjusted.iter_mut() {
        *value = value.min(1.0);
    }

    (reject, adjusted)
}
