//! `tendo watch` command - Re-frame a result file whenever it changes
//!
//! The file is polled for modification. Changes restart a settle timer and
//! the summary is only re-rendered once the file has been quiet for the
//! configured period, so a burst of writes produces one render.

use console::style;
use miette::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime};

use crate::cli::commands::frame::{print_summary, FrameSummary};
use crate::cli::helpers::load_config;
use crate::cli::GlobalOpts;
use crate::core::session::Session;
use crate::core::Config;
use crate::model::load_result;

#[derive(clap::Args, Debug)]
pub struct WatchArgs {
    /// Result JSON file to watch
    pub file: PathBuf,

    /// Stop after this many renders
    #[arg(long, hide = true)]
    pub max_renders: Option<usize>,
}

pub fn run(args: WatchArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    let mut session = Session::new(modified(&args.file), config.watch.settle());
    let mut renders = 0usize;

    log::info!(
        "Watching {} (settle {}ms, poll {}ms)",
        args.file.display(),
        config.watch.settle_ms,
        config.watch.poll_ms
    );

    render(&args.file, &config, global);
    renders += 1;

    loop {
        if args.max_renders.is_some_and(|max| renders >= max) {
            return Ok(());
        }

        std::thread::sleep(config.watch.poll());
        let now = Instant::now();

        let seen = modified(&args.file);
        if seen != *session.current() {
            session.replace(now, seen);
            log::debug!(
                "Change detected in {}, rendering in {:?}",
                args.file.display(),
                session.scheduler().remaining(now).unwrap_or_default()
            );
        }

        if session.commit(now).is_some() {
            render(&args.file, &config, global);
            renders += 1;
        }
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Load and print; failures are reported and the watch continues
fn render(path: &Path, config: &Config, global: &GlobalOpts) {
    match load_result(path) {
        Ok(result) => {
            let summary = FrameSummary::from_result(&result, &config.framing);
            if let Err(e) = print_summary(&summary, global.format, &config.display.policy()) {
                log::error!("{}", e);
            }
        }
        Err(e) => {
            eprintln!("{} {}", style("✗").red(), e);
        }
    }
}
