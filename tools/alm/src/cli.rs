//! Command-line interface definitions for alm.

use std::path::PathBuf;

use clap::Parser;

/// Print a report of the header, sections and tables of R2K modules.
#[derive(Parser)]
#[command(name = "alm", version, about)]
pub struct Cli {
    /// Object or load modules to report on, in order.
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Print decoding diagnostics (file size, region offsets) to stderr.
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Also list every string in the string pool.
    #[arg(long, short = 's')]
    pub strings: bool,
}
