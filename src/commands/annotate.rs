use crate::annot::{annotate_matches, read_gene_intervals, write_annotated, MissingGroupPolicy};
use crate::cli::AnnotateArgs;
use crate::commands::initialize_thread_pool;
use crate::matches::load_matches;
use crate::utils::Result;
use std::{fs::File, io::BufReader};

pub fn annotate(args: AnnotateArgs) -> Result<()> {
    let matches = load_matches(&args.matches_path)?;
    log::info!("Loaded {} matches", matches.len());

    let annotation = BufReader::new(File::open(&args.annotation_path)?);
    let genes = read_gene_intervals(annotation, args.pseudo, args.upstream_length)?;
    log::info!("Loaded {} gene intervals", genes.len());

    let policy = if args.skip_missing {
        MissingGroupPolicy::Skip
    } else {
        MissingGroupPolicy::Error
    };

    let pool = initialize_thread_pool(args.num_threads)?;
    let annotated = pool.install(|| annotate_matches(&genes, &matches, policy))?;
    log::info!("{} matches assigned to genes", annotated.len());

    write_annotated(&args.output_path, &annotated)
}
