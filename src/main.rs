use clap::Parser;
use menrich::{
    cli::{init_verbose, Cli, Command},
    commands::{adjust, annotate, dedup, enrich},
    utils::{handle_error_and_exit, Result},
};

fn runner() -> Result<()> {
    let cli = Cli::parse();
    init_verbose(&cli);
    let subcommand_name = match cli.command {
        Command::Dedup(_) => "dedup",
        Command::Annotate(_) => "annotate",
        Command::Enrich(_) => "enrich",
        Command::Adjust(_) => "adjust",
    };

    log::info!(
        "Running {}-{} [{}]",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        subcommand_name
    );
    match cli.command {
        Command::Dedup(args) => dedup::dedup(args)?,
        Command::Annotate(args) => annotate::annotate(args)?,
        Command::Enrich(args) => enrich::enrich(args)?,
        Command::Adjust(args) => adjust::adjust(args)?,
    }
    log::info!("{} end", env!("CARGO_PKG_NAME"));
    Ok(())
}

fn main() {
    if let Err(e) = runner() {
        handle_error_and_exit(e);
    }
}
