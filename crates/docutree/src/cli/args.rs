//! Command-line argument structures and enums

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docutree")]
#[command(version)]
#[command(about = "Browse and reorder the content of a Docusaurus project", long_about = None)]
pub struct Cli {
    /// Project root (default: current directory)
    #[arg(short = 'C', long, global = true)]
    pub project: Option<PathBuf>,

    /// Answer yes to every confirmation
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the content tree
    #[command(alias = "t")]
    Tree {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List one folder's children (the content roots if no path is given)
    Ls {
        path: Option<PathBuf>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show the docs and blog roots that were found
    Discover {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Move an entry into a folder, placing it last
    #[command(alias = "mv")]
    Move {
        /// Document or folder to move
        source: PathBuf,

        /// Destination folder
        folder: PathBuf,
    },

    /// Place an entry just before a sibling and renumber the folder
    Reorder {
        /// Document or folder to move
        source: PathBuf,

        /// Sibling document it should come before
        before: PathBuf,
    },

    /// Create a document or blog post from a template
    New {
        /// Folder to create it in
        folder: PathBuf,

        /// Title of the document
        #[arg(short, long)]
        title: String,

        /// Template name (default: "doc", or "blog" in blog folders)
        #[arg(long)]
        template: Option<String>,

        /// Description for the frontmatter
        #[arg(short = 'D', long)]
        description: Option<String>,

        /// File name slug (default: slugified title)
        #[arg(long)]
        slug: Option<String>,

        /// Document id (default: the slug)
        #[arg(long)]
        id: Option<String>,

        /// Blog post date, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,

        /// Blog post author (repeatable)
        #[arg(long = "author")]
        authors: Vec<String>,

        /// Tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Delete a document, image group, or folder
    #[command(alias = "rm")]
    Delete { path: PathBuf },

    /// Category folder management
    #[command(alias = "cat")]
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },

    /// List available templates
    Templates,

    /// Show the effective configuration
    Config,

    /// Reprint the tree whenever the content changes
    Watch {
        /// Quiet period before refreshing, in milliseconds
        #[arg(long, default_value_t = 300)]
        debounce_ms: u64,
    },
}

#[derive(Subcommand)]
pub enum CategoryCommands {
    /// Create a category folder with a `_category_.json`
    Create {
        /// Folder to create it in
        parent: PathBuf,

        /// Folder name: letters, digits, '-' and '_'
        name: String,

        /// Sidebar label (prompted for if omitted)
        #[arg(short, long)]
        label: Option<String>,

        /// Position among sibling categories (default: after the last one)
        #[arg(short, long)]
        position: Option<i64>,

        /// Generated index description
        #[arg(short = 'D', long)]
        description: Option<String>,
    },

    /// Change a category's label, position, or description
    Edit {
        path: PathBuf,

        #[arg(short, long)]
        label: Option<String>,

        #[arg(short, long)]
        position: Option<i64>,

        #[arg(short = 'D', long)]
        description: Option<String>,
    },

    /// Delete a category folder and everything in it
    Delete { path: PathBuf },
}
