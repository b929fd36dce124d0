use clap::Parser;
use env_logger::Env;
use log::LevelFilter;
use miette::Result;
use tendo::cli::commands;
use tendo::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();

    let level = if cli.global.quiet {
        LevelFilter::Error
    } else {
        match cli.global.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_env(Env::default())
        .format_timestamp(None)
        .init();

    let global = &cli.global;
    match cli.command {
        Commands::Convert(args) => commands::convert::run(args, global),
        Commands::Frame(args) => commands::frame::run(args, global),
        Commands::Tendons(args) => commands::tendons::run(args, global),
        Commands::View(args) => commands::view::run(args, global),
        Commands::Request(args) => commands::request::run(args, global),
        Commands::Palette(args) => commands::palette::run(args, global),
        Commands::Watch(args) => commands::watch::run(args, global),
        Commands::Completions(args) => commands::completions::run(args),
    }
}
