use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ifile", about = "Inverted-index text search over a static XML corpus", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the four on-disk artifacts from a directory of XML documents.
    Index {
        /// Directory of XML documents, one per file.
        dir: String,

        /// Basename for the on-disk artifacts (`<basename>.dict`, etc.).
        #[arg(long, default_value = "ifile")]
        output: String,

        /// Pass-1/pass-2 worker-pool size; defaults to the available parallelism.
        #[arg(long)]
        threads: Option<usize>,
    },

    /// Open an index and read queries from stdin until EOF.
    Query {
        /// Basename of the on-disk artifacts to load.
        #[arg(long, default_value = "ifile")]
        index: String,

        /// Maximum number of ranked results per query.
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}
