pub mod adjust;
pub mod dedup;
pub mod table;

pub use dedup::dedup_matches;
pub use table::{load_matches, write_matches_serialized, write_matches_tsv, MotifMatch};
