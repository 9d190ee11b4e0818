//! CLI entry point for mdx-index

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mdx_index::commands;
use mdx_index::Blog;

#[derive(Parser)]
#[command(name = "mdx-index")]
#[command(version)]
#[command(about = "Index, query and publish a directory of MDX articles", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all articles, newest first
    #[command(alias = "ls")]
    List {
        /// Only show the newest N articles
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Print JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Show one article with its rendered body
    Show {
        /// Article key or file name
        key: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List all tags with article counts
    Tags,

    /// List the articles carrying a tag
    Tag {
        /// Tag to filter by (case-insensitive)
        tag: String,
    },

    /// List articles related to an article
    Related {
        /// Article key or file name
        key: String,

        /// Maximum number of results (defaults to `related_posts` in the config)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Write the sitemap
    Sitemap {
        /// Output file (defaults to the configured sitemap filename)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print to stdout instead of writing a file
        #[arg(long, conflicts_with = "output")]
        stdout: bool,
    },

    /// Create a new article
    New {
        /// Title of the new article
        title: String,

        /// Comma separated tags
        #[arg(short, long, value_delimiter = ',')]
        tags: Vec<String>,
    },

    /// Re-index whenever the content store changes
    #[command(alias = "w")]
    Watch,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "mdx_index=debug,info"
    } else {
        "mdx_index=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let blog = Blog::new(&base_dir)?;
    tracing::debug!("Content store: {:?}", blog.content_dir);

    match cli.command {
        Commands::List { limit, json } => commands::list::run(&blog, limit, json)?,

        Commands::Show { key, json } => commands::show::run(&blog, &key, json)?,

        Commands::Tags => commands::tags::list(&blog)?,

        Commands::Tag { tag } => commands::tags::filter(&blog, &tag)?,

        Commands::Related { key, limit } => {
            let limit = limit.unwrap_or(blog.config.related_posts);
            commands::related::run(&blog, &key, limit)?
        }

        Commands::Sitemap { output, stdout } => {
            commands::sitemap::run(&blog, output.as_deref(), stdout)?
        }

        Commands::New { title, tags } => {
            tracing::info!("Creating new article: {}", title);
            commands::new::run(&blog, &title, &tags)?;
        }

        Commands::Watch => commands::watch::run(&blog)?,
    }

    Ok(())
}
