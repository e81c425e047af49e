use thiserror::Error;

pub type Result<T> = std::result::Result<T, MenrichError>;

#[derive(Error, Debug)]
pub enum MenrichError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Undefined strand: {0}")]
    InvalidStrand(String),

    #[error("No match group for strand {strand}, sequence {seqname}")]
    MissingGroup { strand: String, seqname: String },

    #[error("No promoter record for sequence: {0}")]
    MissingPromoter(String),

    #[error("Statistics error: {0}")]
    Stats(String),

    #[error("Failed to initialize thread pool: {0}")]
    ThreadPool(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub fn handle_error_and_exit(err: MenrichError) -> ! {
    log::error!("{}", err);
    std::process::exit(1);
}
