mod fdr;
mod fisher;

pub use fdr::fdr_correction;
pub use fisher::fisher_exact_greater;
