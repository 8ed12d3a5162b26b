//! bikeshare - Explore US bikeshare trip data from the command line

use anyhow::Context;
use bikeshare::{cli::Cli, console::StdConsole, session::Explorer};
use bikeshare_core::data_loader::DataLoader;
use bikeshare_terminal::output::get_formatter;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise --verbose raises the default from warn to info.
    // Logs go to stderr so they never interleave with the prompts.
    let default_filter = if cli.verbose {
        "bikeshare=info,bikeshare_core=info,bikeshare_terminal=info"
    } else {
        "bikeshare=warn,bikeshare_core=warn,bikeshare_terminal=warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let interactive = is_terminal::is_terminal(std::io::stdout());
    if !interactive || std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    }

    info!(
        "bikeshare {} reading data from {}",
        bikeshare::VERSION,
        cli.data_dir.display()
    );

    let loader = DataLoader::new(&cli.data_dir).with_progress(interactive && !cli.json);
    let explorer = Explorer::new(loader)
        .with_formatter(get_formatter(cli.json))
        .with_browse_mode(cli.browse.into());

    explorer
        .run(&mut StdConsole::new())
        .with_context(|| format!("bikeshare failed (data directory: {})", cli.data_dir.display()))
}
