//! CLI entry point for folio

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio::content::ContentKind;
use folio::Folio;

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Load, render and inspect portfolio blog posts and book notes", long_about = None)]
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
    /// List entries the way the site orders them
    #[command(alias = "ls")]
    List {
        /// Type of content to list (post, book)
        #[arg(default_value = "post")]
        r#type: ContentKind,
    },

    /// Show a single entry
    Show {
        /// Type of content (post, book)
        r#type: ContentKind,

        /// Slug of the entry (file name without extension)
        slug: String,

        /// Print the entry as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render a markdown file to HTML on stdout
    Render {
        /// File to render; front-matter is stripped
        file: PathBuf,
    },

    /// Validate every content file and its metadata
    Check {
        /// Type of content to check (post, book); both when omitted
        r#type: Option<ContentKind>,
    },

    /// Reload content whenever a file changes
    Watch,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio=debug,info"
    } else {
        "folio=info"
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

    match cli.command {
        Commands::List { r#type } => {
            let site = Folio::new(&base_dir)?;
            folio::commands::list::run(&site, r#type).await?;
        }

        Commands::Show {
            r#type,
            slug,
            json,
        } => {
            let site = Folio::new(&base_dir)?;
            if !folio::commands::show::run(&site, r#type, &slug, json).await? {
                std::process::exit(1);
            }
        }

        Commands::Render { file } => {
            let site = Folio::new(&base_dir)?;
            folio::commands::render::run(&site, &file)?;
        }

        Commands::Check { r#type } => {
            let site = Folio::new(&base_dir)?;
            let kinds = match r#type {
                Some(kind) => vec![kind],
                None => vec![ContentKind::Post, ContentKind::Book],
            };
            let problems = folio::commands::check::run(&site, &kinds).await?;
            if problems > 0 {
                eprintln!("{} problem(s) found", problems);
                std::process::exit(1);
            }
        }

        Commands::Watch => {
            let site = Folio::new(&base_dir)?;
            tracing::info!("Watching {:?}", site.base_dir);
            folio::commands::watch::run(&site).await?;
        }

        Commands::Version => {
            println!("folio version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
