use crate::cli::DedupArgs;
use crate::commands::initialize_thread_pool;
use crate::matches::{dedup_matches, load_matches, write_matches_serialized, write_matches_tsv};
use crate::utils::Result;
use std::{fs::File, io::BufWriter};

pub fn dedup(args: DedupArgs) -> Result<()> {
    let matches = load_matches(&args.matches_path)?;
    log::info!("Loaded {} matches", matches.len());

    let pool = initialize_thread_pool(args.num_threads)?;
    let deduped = pool.install(|| dedup_matches(matches));
    log::info!("{} matches left after deduplication", deduped.len());

    if args.serialize {
        write_matches_serialized(&args.output_path, &deduped)?;
    } else {
        let mut writer = BufWriter::new(File::create(&args.output_path)?);
        write_matches_tsv(&mut writer, &deduped)?;
    }
    Ok(())
}
