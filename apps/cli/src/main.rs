//! edadoc CLI — documentation generator for event-driven architectures.
//!
//! Reads .NET XML documentation files and writes one Markdown document per
//! event, service, and process found in them.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
