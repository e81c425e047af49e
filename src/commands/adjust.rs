use crate::cli::AdjustArgs;
use crate::matches::{
    adjust::{read_promoters, translate_coordinates},
    load_matches, write_matches_tsv,
};
use crate::utils::Result;
use std::{
    fs::File,
    io::{BufReader, BufWriter},
};

pub fn adjust(args: AdjustArgs) -> Result<()> {
    let matches = load_matches(&args.matches_path)?;
    log::info!("Loaded {} matches", matches.len());

    let promoters = read_promoters(BufReader::new(File::open(&args.promoters_path)?))?;
    log::info!("Loaded {} promoter records", promoters.len());

    let adjusted = translate_coordinates(matches, &promoters)?;

    match &args.output_path {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            write_matches_tsv(&mut writer, &adjusted)
        }
        None => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            write_matches_tsv(&mut out, &adjusted)
        }
    }
}
