mod errors;
pub mod io_utils;
mod strand;

pub use errors::{handle_error_and_exit, MenrichError, Result};
pub use strand::Strand;
