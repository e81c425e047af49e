pub mod genes;
pub mod overlap;

pub use genes::{read_gene_intervals, GeneInterval};
pub use overlap::{
    annotate_matches, read_annotated, write_annotated, AnnotatedMatch, MissingGroupPolicy,
};
