use std::fmt;

use clap::Subcommand;

pub mod count;

pub use count::CountCMD;

///////////////////////////////
/// Possible subcommands to parse
#[derive(Subcommand)]
pub enum Commands {
    /// Count barcodes in a sequencing file, merging near-identical barcodes
    Count(CountCMD),
}

impl fmt::Debug for Commands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cmd = match self {
            Commands::Count(_) => "Count",
        };
        write!(f, "{}", cmd)
    }
}
