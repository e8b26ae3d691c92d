/// Clap argument definitions
mod args;

/// `category create|edit|delete`
mod category;

/// `new`, `move`, `reorder`, `delete`
mod entry;

/// Read-only views of the project
mod tree;

/// Shared CLI utilities
mod util;

/// Live tree refresh
mod watch;

use clap::Parser;

use docutree_core::Workspace;
use docutree_core::fs::RealFileSystem;

/// Type alias for Workspace over the real filesystem.
pub type CliWorkspace = Workspace<RealFileSystem>;

pub use args::Cli;
use args::Commands;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// Main entry point for the CLI
pub fn run_cli() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let root = util::project_root(cli.project);
    let mut ws = Workspace::open(RealFileSystem, &root);
    let yes = cli.yes;

    let success = match cli.command {
        Commands::Tree { json } => tree::handle_tree(&mut ws, json),

        Commands::Ls { path, json } => tree::handle_ls(&ws, path, json),

        Commands::Discover { json } => tree::handle_discover(&ws, json),

        Commands::Templates => tree::handle_templates(&ws),

        Commands::Config => tree::handle_config(&ws),

        Commands::Move { source, folder } => entry::handle_move(&ws, source, folder),

        Commands::Reorder { source, before } => entry::handle_reorder(&ws, source, before),

        Commands::New {
            folder,
            title,
            template,
            description,
            slug,
            id,
            date,
            authors,
            tags,
        } => entry::handle_new(
            &ws,
            folder,
            title,
            template,
            description,
            slug,
            id,
            date,
            authors,
            tags,
        ),

        Commands::Delete { path } => entry::handle_delete(&ws, path, yes),

        Commands::Category { command } => category::handle_category_command(command, &ws, yes),

        Commands::Watch { debounce_ms } => watch::handle_watch(&mut ws, debounce_ms),
    };

    if !success {
        std::process::exit(1);
    }
}
