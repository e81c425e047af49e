use crate::enrich::RegionFilter;
use clap::{ArgAction, ArgGroup, Parser, Subcommand};
use env_logger::fmt::Color;
use log::{Level, LevelFilter};
use std::{
    io::Write,
    path::{Path, PathBuf},
};

type Result<T> = std::result::Result<T, String>;

#[derive(Parser)]
#[command(name="menrich",
          version,
          about = "Motif match annotation and enrichment analysis",
          long_about = None,
          disable_help_subcommand = true,
          help_template = "{name} {version}\n{about-section}\n{usage-heading}\n    {usage}\n\n{all-args}{after-help}",
          )]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = ArgAction::Count, help = "Specify multiple times to increase verbosity level (e.g., -vv for more verbosity)")]
    pub verbosity: u8,
}

#[derive(Subcommand)]
pub enum Command {
    #[clap(about = "Remove overlapping motif matches")]
    Dedup(DedupArgs),
    #[clap(about = "Annotate motif matches against gene models")]
    Annotate(AnnotateArgs),
    #[clap(about = "Per-gene-list motif enrichment with FDR correction")]
    Enrich(EnrichArgs),
    #[clap(about = "Translate promoter-relative match coordinates to genome coordinates")]
    Adjust(AdjustArgs),
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("dedup")))]
#[command(arg_required_else_help(true))]
pub struct DedupArgs {
    #[clap(required = true)]
    #[clap(help = "Match table (tab-delimited or serialized)")]
    #[clap(value_name = "MATCHES")]
    #[arg(value_parser = check_file_exists)]
    pub matches_path: PathBuf,

    #[clap(required = true)]
    #[clap(help = "Output file")]
    #[clap(value_name = "OUTPUT")]
    #[arg(value_parser = check_prefix_path)]
    pub output_path: PathBuf,

    #[clap(long = "serialize")]
    #[clap(help = "Write the serialized table form instead of tab-delimited text")]
    pub serialize: bool,

    #[clap(short = 't')]
    #[clap(long = "threads")]
    #[clap(help = "Number of threads")]
    #[clap(value_name = "THREADS")]
    #[clap(default_value = "1")]
    #[arg(value_parser = threads_in_range)]
    pub num_threads: usize,
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("annotate")))]
#[command(arg_required_else_help(true))]
pub struct AnnotateArgs {
    #[clap(required = true)]
    #[clap(help = "GFF3 file with gene annotations")]
    #[clap(value_name = "GFF3")]
    #[arg(value_parser = check_file_exists)]
    pub annotation_path: PathBuf,

    #[clap(required = true)]
    #[clap(help = "Match table (tab-delimited or serialized)")]
    #[clap(value_name = "MATCHES")]
    #[arg(value_parser = check_file_exists)]
    pub matches_path: PathBuf,

    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output")]
    #[clap(help = "Output file for the annotated table")]
    #[clap(value_name = "OUTPUT")]
    #[arg(value_parser = check_prefix_path)]
    pub output_path: PathBuf,

    #[clap(short = 'p')]
    #[clap(long = "pseudo")]
    #[clap(help = "Include pseudogenes")]
    pub pseudo: bool,

    #[clap(short = 'u')]
    #[clap(long = "upstream-length")]
    #[clap(help = "Length of the upstream promoter region")]
    #[clap(value_name = "LENGTH")]
    #[clap(default_value = "1000")]
    pub upstream_length: u32,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "skip-missing")]
    #[clap(help = "Treat chromosomes without matches as empty instead of failing")]
    pub skip_missing: bool,

    #[clap(short = 't')]
    #[clap(long = "threads")]
    #[clap(help = "Number of threads")]
    #[clap(value_name = "THREADS")]
    #[clap(default_value = "1")]
    #[arg(value_parser = threads_in_range)]
    pub num_threads: usize,
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("region")
    .args(["promoter_only", "promoter_overlap", "gene_only", "gene_overlap"])))]
#[command(arg_required_else_help(true))]
pub struct EnrichArgs {
    #[clap(required = true)]
    #[clap(help = "Gene lists in FASTA-like format")]
    #[clap(value_name = "GENELIST")]
    #[arg(value_parser = check_file_exists)]
    pub genelist_path: PathBuf,

    #[clap(short = 'A')]
    #[clap(long = "annotated")]
    #[clap(help = "Annotated match table")]
    #[clap(value_name = "ANNOTATED")]
    #[clap(default_value = "annotated.bin.gz")]
    pub annotated_path: PathBuf,

    #[clap(short = 'b')]
    #[clap(long = "background")]
    #[clap(help = "Gene list to use as the background population")]
    #[clap(value_name = "BACKGROUND")]
    #[arg(value_parser = check_file_exists)]
    pub background_path: Option<PathBuf>,

    #[clap(short = 'P')]
    #[clap(long = "promoter")]
    #[clap(help = "Limit promoter size")]
    #[clap(value_name = "SIZE")]
    #[arg(value_parser = promoter_size_in_range)]
    pub promoter_size: Option<u32>,

    #[clap(short = 'p')]
    #[clap(long = "p-value")]
    #[clap(help = "P-value cutoff on the matches used")]
    #[clap(value_name = "PVALUE")]
    #[arg(value_parser = ensure_unit_float)]
    pub max_pvalue: Option<f64>,

    #[clap(short = 'a')]
    #[clap(long = "alpha")]
    #[clap(help = "Significance level for the FDR correction")]
    #[clap(value_name = "ALPHA")]
    #[clap(default_value = "0.05")]
    #[arg(value_parser = ensure_unit_float)]
    pub alpha: f64,

    #[clap(long = "hide-rejected")]
    #[clap(help = "Only report significant motifs")]
    pub hide_rejected: bool,

    #[clap(short = 'o')]
    #[clap(long = "output")]
    #[clap(help = "Output folder (one file per gene list); stdout when omitted")]
    #[clap(value_name = "OUTPUT")]
    pub output_dir: Option<PathBuf>,

    #[clap(help_heading("Limit search"))]
    #[clap(long = "promoter-only")]
    #[clap(help = "Limit search to the promoter")]
    pub promoter_only: bool,

    #[clap(help_heading("Limit search"))]
    #[clap(long = "promoter-overlap")]
    #[clap(help = "Search matches that overlap the promoter")]
    pub promoter_overlap: bool,

    #[clap(help_heading("Limit search"))]
    #[clap(long = "gene-only")]
    #[clap(help = "Limit search to the gene body")]
    pub gene_only: bool,

    #[clap(help_heading("Limit search"))]
    #[clap(long = "gene-overlap")]
    #[clap(help = "Search matches that overlap the gene body")]
    pub gene_overlap: bool,
}

impl EnrichArgs {
    pub fn region_filter(&self) -> Option<RegionFilter> {
        if self.promoter_only {
            Some(RegionFilter::PromoterOnly)
        } else if self.promoter_overlap {
            Some(RegionFilter::PromoterOverlap)
        } else if self.gene_only {
            Some(RegionFilter::GeneOnly)
        } else if self.gene_overlap {
            Some(RegionFilter::GeneOverlap)
        } else {
            None
        }
    }
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("adjust")))]
#[command(arg_required_else_help(true))]
pub struct AdjustArgs {
    #[clap(required = true)]
    #[clap(help = "Match table with promoter-relative coordinates")]
    #[clap(value_name = "MATCHES")]
    #[arg(value_parser = check_file_exists)]
    pub matches_path: PathBuf,

    #[clap(required = true)]
    #[clap(help = "FASTA file with promoter placement headers")]
    #[clap(value_name = "PROMOTERS")]
    #[arg(value_parser = check_file_exists)]
    pub promoters_path: PathBuf,

    #[clap(short = 'o')]
    #[clap(long = "output")]
    #[clap(help = "Output file; stdout when omitted")]
    #[clap(value_name = "OUTPUT")]
    #[arg(value_parser = check_prefix_path)]
    pub output_path: Option<PathBuf>,
}

pub fn init_verbose(args: &Cli) {
    let filter_level: LevelFilter = match args.verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            let level = record.level();
            let mut style = buf.style();
            match record.level() {
                Level::Error => style.set_color(Color::Red),
                Level::Warn => style.set_color(Color::Yellow),
                Level::Info => style.set_color(Color::Green),
                Level::Debug => style.set_color(Color::Blue),
                Level::Trace => style.set_color(Color::Cyan),
            };

            writeln!(
                buf,
                "{} [{}] - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                style.value(level),
                record.args()
            )
        })
        .filter_level(filter_level)
        .init();
}

fn check_prefix_path(s: &str) -> Result<PathBuf> {
    let path = Path::new(s);
    if let Some(parent_dir) = path.parent() {
        if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
            return Err(format!("Path does not exist: {}", parent_dir.display()));
        }
    }
    Ok(path.to_path_buf())
}

fn threads_in_range(s: &str) -> Result<usize> {
    let thread: usize = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid thread number", s))?;
    if thread >= 1 {
        Ok(thread)
    } else {
        Err("Number of threads must be at least 1".into())
    }
}

fn check_file_exists(s: &str) -> Result<PathBuf> {
    let path = Path::new(s);
    if !path.exists() {
        Err(format!("File does not exist: {}", path.display()))
    } else {
        Ok(path.to_path_buf())
    }
}

fn ensure_unit_float(s: &str) -> Result<f64> {
    let value = s
        .parse::<f64>()
        .map_err(|e| format!("Could not parse float: {}", e))?;
    if !(0.0..=1.0).contains(&value) {
        Err(format!(
            "The value must be between 0.0 and 1.0, got: {}",
            value
        ))
    } else {
        Ok(value)
    }
}

fn promoter_size_in_range(s: &str) -> Result<u32> {
    const MAX_PROMOTER_SIZE: u32 = 2000;
    let value: u32 = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid promoter size", s))?;
    if value <= MAX_PROMOTER_SIZE {
        Ok(value)
    } else {
        Err(format!(
            "Promoter size has to be less than or equal to {}, got: {}",
            MAX_PROMOTER_SIZE, value
        ))
    }
}
