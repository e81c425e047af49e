use crate::annot::read_annotated;
use crate::cli::EnrichArgs;
use crate::enrich::{
    apply_filters, list_enrichment, read_background, read_gene_lists, EnrichmentRow, FilterConfig,
};
use crate::utils::Result;
use std::{
    collections::HashSet,
    fs::File,
    io::{BufReader, BufWriter, Write},
};

const SEPARATOR_WIDTH: usize = 80;

pub fn enrich(args: EnrichArgs) -> Result<()> {
    let annotated = read_annotated(&args.annotated_path)?;

    let background = match &args.background_path {
        Some(path) => Some(read_background(BufReader::new(File::open(path)?))?),
        None => None,
    };
    let config = FilterConfig {
        max_pvalue: args.max_pvalue,
        promoter_size: args.promoter_size,
        background,
        region: args.region_filter(),
    };
    let annotated = apply_filters(annotated, &config);

    let unique: HashSet<usize> = annotated.iter().map(|a| a.match_id).collect();
    log::info!("total matches: {}", unique.len());

    let lists = read_gene_lists(BufReader::new(File::open(&args.genelist_path)?))?;

    if let Some(dir) = &args.output_dir {
        std::fs::create_dir_all(dir)?;
    }

    let stdout = std::io::stdout();
    for list in &lists {
        let rows = list_enrichment(&annotated, list, args.alpha, args.hide_rejected)?;
        match &args.output_dir {
            Some(dir) => {
                let path = dir.join(format!("{}.csv", list.label()));
                let mut writer = BufWriter::new(File::create(path)?);
                write_rows(&mut writer, &rows, ",")?;
            }
            None => {
                let mut out = stdout.lock();
                writeln!(out, "{}", list.label())?;
                write_rows(&mut out, &rows, "\t")?;
                writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH))?;
            }
        }
    }
    Ok(())
}

fn write_rows<W: Write>(writer: &mut W, rows: &[EnrichmentRow], sep: &str) -> Result<()> {
    writeln!(writer, "motif{}p{}adj_p", sep, sep)?;
    for row in rows {
        writeln!(
            writer,
            "{}{}{}{}{}",
            row.motif, sep, row.pvalue, sep, row.adj_pvalue
        )?;
    }
    Ok(())
}
