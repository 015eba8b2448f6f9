use clap::{Parser, Subcommand};

#[derive(Parser)]
#[clap(author, version, about = "Search and browse the TMDB catalog", long_about = None)]
pub struct Cli {
    #[clap(long, value_parser, default_value_t = false)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ranked search, e.g. `reelshelf search latest hindi movies`
    Search {
        #[clap(required = true, num_args = 1..)]
        query: Vec<String>,

        #[clap(long, value_parser, default_value_t = 20)]
        limit: usize,
    },
    /// Fetch the home page shelves
    Browse {
        /// Include shelves that are not shown as rows
        #[clap(long, value_parser, default_value_t = false)]
        all: bool,
    },
}
