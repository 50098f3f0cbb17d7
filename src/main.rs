use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use newsprism::config::Config;
use newsprism::output::terminal;
use newsprism::pipeline::{Pipeline, DEFAULT_NUM_TOPICS, DEFAULT_TOP_N};
use newsprism::providers::Language;

/// newsprism: topic modeling and keyword ranking for news articles.
///
/// Clusters batches of articles into topics, ranks keywords, and forwards
/// summarization, translation, sentiment and entity requests to hosted models.
#[derive(Parser)]
#[command(name = "newsprism", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the JSON HTTP API
    #[cfg(feature = "web")]
    Serve {
        /// Port to listen on (default: PORT or 3000)
        #[arg(long)]
        port: Option<u16>,

        /// Address to bind (default: NEWSPRISM_BIND or 0.0.0.0)
        #[arg(long)]
        bind: Option<String>,
    },

    /// Rank the keywords of a single text (TF-IDF)
    Keywords {
        /// Text to analyze (reads --file instead when omitted)
        text: Option<String>,

        /// Read the text from a file
        #[arg(long)]
        file: Option<PathBuf>,

        /// How many keywords to return
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top_n: usize,
    },

    /// Cluster articles into topics
    Topics {
        /// File with one article per line, or a JSON array of strings
        #[arg(long)]
        file: Option<PathBuf>,

        /// Article URL to fetch (repeatable)
        #[arg(long = "url")]
        urls: Vec<String>,

        /// Number of topics to produce
        #[arg(long, default_value_t = DEFAULT_NUM_TOPICS)]
        num_topics: usize,
    },

    /// Fetch an article's headline and body
    Article {
        url: String,
    },

    /// Search news articles by keyword
    Search {
        query: String,
    },

    /// Summarize a text
    Summarize {
        text: String,
    },

    /// Translate a text between supported languages
    Translate {
        text: String,

        /// Target language code (e.g. fr, de, ja)
        #[arg(long)]
        to: String,

        /// Source language code
        #[arg(long, default_value = "en")]
        from: String,
    },

    /// Classify the sentiment of a text
    Sentiment {
        text: String,
    },

    /// Extract named entities from a text
    Entities {
        text: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("newsprism=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        #[cfg(feature = "web")]
        Commands::Serve { port, bind } => {
            if config.hugging_face_api_key.is_empty() {
                tracing::warn!("HUGGING_FACE_API_KEY not set; model-backed routes will fail");
            }
            let pipeline = Pipeline::from_config(&config)?;
            let port = port.unwrap_or(config.port);
            let bind = bind.unwrap_or_else(|| config.bind.clone());
            newsprism::web::run_server(pipeline, port, &bind).await?;
        }

        Commands::Keywords { text, file, top_n } => {
            let text = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                (None, None) => anyhow::bail!("Provide a text argument or --file"),
            };
            let keywords = newsprism::topics::rank_document(&text, top_n);
            terminal::display_keywords(&keywords);
        }

        Commands::Topics {
            file,
            urls,
            num_topics,
        } => {
            config.require_hugging_face()?;
            let pipeline = Pipeline::from_config(&config)?;

            let (topics, article_count) = if !urls.is_empty() {
                let spinner = spinner(&format!("Fetching {} articles...", urls.len()));
                let articles = pipeline.fetch_batch(&urls).await;
                spinner.finish_and_clear();
                let articles = articles?;
                info!(fetched = articles.len(), "Articles ready for topic modeling");

                let texts: Vec<String> = articles.iter().map(|a| a.full_text()).collect();
                let topics = pipeline.analyze_topics(&texts, num_topics).await?;
                (topics, texts.len())
            } else if let Some(path) = file {
                let texts = read_articles(&path)?;
                let spinner = spinner(&format!("Embedding {} articles...", texts.len()));
                let topics = pipeline.analyze_topics(&texts, num_topics).await;
                spinner.finish_and_clear();
                (topics?, texts.len())
            } else {
                anyhow::bail!("Provide --file or at least one --url");
            };

            terminal::display_topics(&topics, article_count);
        }

        Commands::Article { url } => {
            let pipeline = Pipeline::from_config(&config)?;
            let article = pipeline.fetch_article(&url).await?;
            terminal::display_article(&article);
        }

        Commands::Search { query } => {
            config.require_news_api()?;
            let pipeline = Pipeline::from_config(&config)?;
            let articles = pipeline.search(&query).await?;
            terminal::display_search_results(&query, &articles);
        }

        Commands::Summarize { text } => {
            config.require_hugging_face()?;
            let pipeline = Pipeline::from_config(&config)?;
            let summary = pipeline.summarize(&text).await?;
            println!("\n{}\n", "Summary".bold());
            println!("{summary}");
        }

        Commands::Translate { text, to, from } => {
            config.require_hugging_face()?;
            let source: Language = from.parse()?;
            let target: Language = to.parse()?;
            let pipeline = Pipeline::from_config(&config)?;
            let translation = pipeline.translate(&text, source, target).await?;
            println!("{} {}", format!("[{source} → {target}]").dimmed(), translation);
        }

        Commands::Sentiment { text } => {
            config.require_hugging_face()?;
            let pipeline = Pipeline::from_config(&config)?;
            let labels = pipeline.sentiment(&text).await?;
            terminal::display_sentiment(&labels);
        }

        Commands::Entities { text } => {
            config.require_hugging_face()?;
            let pipeline = Pipeline::from_config(&config)?;
            let entities = pipeline.entities(&text).await?;
            terminal::display_entities(&entities);
        }
    }

    Ok(())
}

/// Read a batch of article texts: a JSON array of strings, or one per line.
fn read_articles(path: &Path) -> Result<Vec<String>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    if raw.trim_start().starts_with('[') {
        let values: Vec<serde_json::Value> = serde_json::from_str(&raw)
            .with_context(|| format!("{} is not a JSON array", path.display()))?;
        return Ok(newsprism::topics::ranking::texts_from_json(&values)?);
    }

    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
