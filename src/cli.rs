use clap::{Parser, Subcommand};

/// Track clients and their projects over GraphQL
#[derive(Parser, Debug)]
#[command(name = "project_tracker", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Run the GraphQL server
    Serve {
        /// Keep records in memory instead of PostgreSQL
        #[arg(long)]
        in_memory: bool,

        /// Port to listen on, overriding PORT
        #[arg(long)]
        port: Option<u16>,
    },

    /// Open the terminal client
    Ui {
        /// GraphQL endpoint, overriding API_URL
        #[arg(long)]
        api_url: Option<String>,
    },
}
