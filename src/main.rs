use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use imgstash::data_url;
use imgstash::models::{AppConfig, ImageRef};
use imgstash::services::{CollectionStore, Compressor, DirTextStore, DEFAULT_SAVE_KEY};

#[derive(Parser)]
#[command(name = "imgstash")]
#[command(about = "Image asset helpers - compress images and manage stored collections")]
struct Cli {
    /// Path to a YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress an image to bounded dimensions and quality
    Compress {
        /// Source image: file path, http(s) URL, or data-URL
        source: String,

        /// Output file; prints a data-URL to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output MIME type
        #[arg(short, long, default_value = "image/jpeg")]
        mime: String,

        /// Override the configured dimension bound
        #[arg(long)]
        max_dimension: Option<u32>,

        /// Override the configured JPEG quality
        #[arg(long)]
        quality: Option<u8>,
    },
    /// Compress image files and append them to a stored collection
    Add {
        /// Image files to add
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Collection key to store under
        #[arg(short, long, default_value = DEFAULT_SAVE_KEY)]
        key: String,
    },
    /// Load a collection and print each entry's resolved URL
    List {
        /// Candidate keys in priority order; the well-known list when omitted
        keys: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "imgstash=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let config = AppConfig::load(cli.config.as_deref());

    match cli.command {
        Commands::Compress {
            source,
            output,
            mime,
            max_dimension,
            quality,
        } => {
            run_compress(
                &config,
                &source,
                output.as_deref(),
                &mime,
                max_dimension,
                quality,
            )
            .await
        }
        Commands::Add { files, key } => run_add(&config, &files, &key).await,
        Commands::List { keys } => run_list(&config, &keys),
    }
}

fn compressor_for(config: &AppConfig, max_dimension: Option<u32>, quality: Option<u8>) -> Compressor {
    Compressor::new()
        .max_dimension(max_dimension.unwrap_or(config.max_dimension))
        .quality(quality.unwrap_or(config.quality))
}

async fn run_compress(
    config: &AppConfig,
    source: &str,
    output: Option<&Path>,
    mime: &str,
    max_dimension: Option<u32>,
    quality: Option<u8>,
) -> anyhow::Result<()> {
    let compressor = compressor_for(config, max_dimension, quality);
    let url = compressor.compress(source, mime).await?;

    match output {
        Some(path) => {
            let decoded = data_url::parse(&url)?;
            std::fs::write(path, &decoded.bytes)?;
            println!(
                "{} ({} bytes, {})",
                path.display(),
                decoded.bytes.len(),
                decoded.mime
            );
        }
        None => println!("{url}"),
    }
    Ok(())
}

async fn run_add(config: &AppConfig, files: &[PathBuf], key: &str) -> anyhow::Result<()> {
    let store = CollectionStore::new(DirTextStore::new(&config.store_dir)?);
    let compressor = compressor_for(config, None, None);

    let mut images = store.load(&[key]);
    let before = images.len();

    for file in files {
        let source = file.to_string_lossy();
        let url = compressor.compress(&source, "image/jpeg").await?;
        images.push(ImageRef::Url(url));
    }

    store.save(&images, key)?;
    println!(
        "{}: {} -> {} entries",
        key,
        before,
        images.len()
    );
    Ok(())
}

fn run_list(config: &AppConfig, keys: &[String]) -> anyhow::Result<()> {
    let store = CollectionStore::new(DirTextStore::new(&config.store_dir)?);

    let images = if keys.is_empty() {
        store.load_default()
    } else {
        let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
        store.load(&keys)
    };

    for (index, image) in images.iter().enumerate() {
        let url = image.resolve();
        if url.is_empty() {
            println!("{index}: (no displayable URL)");
        } else {
            println!("{index}: {url}");
        }
    }
    println!("{} entries", images.len());
    Ok(())
}
