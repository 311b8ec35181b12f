use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing::info;

use fr_core::{Article, ArticleStorage, Error, Result};
use fr_pipeline::logging::init_logging;
use fr_pipeline::{BypassClient, ReaderManager, Validator};

#[derive(Parser, Debug)]
#[command(name = "freeread", version, about = "Read Medium articles without the paywall")]
struct Cli {
    /// Storage backend for the reading history
    #[arg(long, default_value = "file")]
    storage: String,
    /// History file used by the file backend
    #[arg(long)]
    data_file: Option<PathBuf>,
    /// Request timeout in seconds for bypass/relay calls
    #[arg(long, default_value_t = 30)]
    timeout: u64,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch a Medium article and add it to the reading history
    Read {
        url: String,
        /// Write the rendered HTML fragment to a file
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Check whether the bypass service can render a URL
    Validate { url: String },
    /// List the reading history, newest first
    History {
        /// Filter by title, author or tag
        #[arg(long)]
        search: Option<String>,
    },
    /// Print a stored article
    Show { id: String },
    /// Delete one article from the history
    Delete { id: String },
    /// Clear the whole history
    Clear,
}

/// Relative label for article cards: `Today`, `Yesterday`, `N days ago`,
/// else the long-form date.
fn format_publish_date(date: DateTime<Utc>) -> String {
    let days = (Utc::now() - date).num_days();
    match days {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => format!("{} days ago", days),
        _ => date.format("%B %-d, %Y").to_string(),
    }
}

fn print_card(article: &Article) {
    let handle = article
        .author_handle
        .as_deref()
        .map(|handle| format!(" (@{})", handle))
        .unwrap_or_default();
    println!("📖 {}", article.title);
    println!("✍️  {}{}", article.author, handle);
    println!(
        "📅 {} · {} min read{}",
        format_publish_date(article.published_at),
        article.reading_time,
        if article.is_paid { " · member-only" } else { "" }
    );
    if !article.tags.is_empty() {
        println!("🏷️  {}", article.tags.join(", "));
    }
    println!();
    println!("{}", article.excerpt);
}

async fn run(cli: Cli) -> Result<()> {
    let storage = fr_storage::create_storage(&cli.storage, cli.data_file.as_deref()).await?;
    let client = BypassClient::new(Duration::from_secs(cli.timeout))?;

    match cli.command {
        Commands::Read { url, output } => {
            let manager = ReaderManager::new(client, storage.clone());
            let article = match manager.read_url(&url).await {
                Ok(article) => article,
                Err(Error::Validation(_)) => {
                    eprintln!("❌ That does not look like a Medium article URL.");
                    eprintln!("   Expected medium.com or link.medium.com, e.g. https://medium.com/@author/story");
                    std::process::exit(1);
                }
                Err(e) => return Err(e),
            };

            print_card(&article);
            if let Some(path) = output {
                tokio::fs::write(&path, &article.content).await?;
                info!("💾 Wrote article HTML to {}", path.display());
            }
            info!("🗄️ Saved to history (id {})", article.id);
        }
        Commands::Validate { url } => {
            let validator = Validator::new(client);
            if validator.validate(&url).await {
                println!("✅ The bypass service can render this article.");
            } else {
                println!("❌ Not a readable Medium article URL.");
                std::process::exit(1);
            }
        }
        Commands::History { search } => {
            let articles = match search {
                Some(query) => storage.search(&query).await?,
                None => storage.list_articles().await?,
            };
            if articles.is_empty() {
                println!("No articles in history.");
            }
            for article in &articles {
                println!(
                    "{}  {} — {} ({} min read) [{}]",
                    article.id,
                    article.title,
                    article.author,
                    article.reading_time,
                    format_publish_date(article.published_at)
                );
            }
        }
        Commands::Show { id } => match storage.get_article(&id).await? {
            Some(article) => {
                print_card(&article);
                println!();
                println!("{}", article.content);
            }
            None => {
                eprintln!("❌ No article with id {} in history.", id);
                std::process::exit(1);
            }
        },
        Commands::Delete { id } => {
            if storage.delete_article(&id).await? {
                info!("🗑️ Deleted {} from history", id);
            } else {
                eprintln!("❌ No article with id {} in history.", id);
                std::process::exit(1);
            }
        }
        Commands::Clear => {
            storage.clear().await?;
            info!("🗑️ History cleared");
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    run(Cli::parse()).await
}
