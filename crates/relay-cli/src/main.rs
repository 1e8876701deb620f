mod output;
mod pipeline;

use clap::{CommandFactory, Parser, Subcommand};
use relay_core::{AppConfig, LocaleTable};
use relay_publisher::PostStatus;
use relay_scraper::SitemapClient;
use tracing_subscriber::EnvFilter;

use crate::pipeline::{Pipeline, TranslateOptions};

#[derive(Debug, Parser)]
#[command(name = "relay-cli")]
#[command(about = "Scrape, translate and republish recipe articles")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List recipe URLs found in the source sitemap
    List {
        /// Maximum number of recipes to show
        #[arg(long, default_value = "10")]
        limit: usize,
    },
    /// Translate one recipe into the target languages
    Translate {
        /// Recipe article URL
        url: String,
        /// Target language codes
        #[arg(long, num_args = 1.., default_values = ["fr", "es"])]
        langs: Vec<String>,
        /// Write the result to a JSON file in the output directory
        #[arg(long)]
        save: bool,
        /// Create a post on the configured WordPress site
        #[arg(long)]
        publish: bool,
        /// Status for published posts (draft, publish, pending, private)
        #[arg(long, default_value = "draft")]
        status: PostStatus,
        /// Number of image placeholder blocks to insert
        #[arg(long, default_value = "0")]
        placeholders: usize,
    },
    /// Translate the first recipes from the sitemap, saving each result
    Batch {
        /// Number of recipes to translate
        #[arg(long, default_value = "5")]
        count: usize,
        /// Target language codes
        #[arg(long, num_args = 1.., default_values = ["fr"])]
        langs: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = relay_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let locales = match &config.locales_path {
        Some(path) => relay_core::load_locales(path)?,
        None => relay_core::default_locales().clone(),
    };

    match cli.command {
        Some(Commands::List { limit }) => run_list(&config, limit).await,
        Some(Commands::Translate {
            url,
            langs,
            save,
            publish,
            status,
            placeholders,
        }) => {
            check_languages(&locales, &langs)?;
            let options = TranslateOptions {
                save,
                publish,
                status,
                placeholders,
            };
            let pipeline = Pipeline::from_config(&config, locales, publish)?;
            pipeline.run_translate(&url, &langs, &options).await
        }
        Some(Commands::Batch { count, langs }) => {
            check_languages(&locales, &langs)?;
            let pipeline = Pipeline::from_config(&config, locales, false)?;
            pipeline.run_batch(&config, count, &langs).await
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

/// Print up to `limit` recipe URLs from the configured sitemap.
async fn run_list(config: &AppConfig, limit: usize) -> anyhow::Result<()> {
    let sitemap = SitemapClient::new(config.sitemap_timeout_secs, &config.scraper_user_agent)?;
    let recipes = sitemap.get_all_recipes(&config.sitemap_url, Some(limit)).await;

    for (idx, recipe) in recipes.iter().enumerate() {
        println!(
            "{:>4}  {}  {}",
            idx + 1,
            recipe.url,
            recipe.last_modified.as_deref().unwrap_or("n/a")
        );
    }
    println!("found {} recipes in {}", recipes.len(), config.sitemap_url);
    Ok(())
}

/// Reject unknown language codes before any network work starts.
fn check_languages(locales: &LocaleTable, langs: &[String]) -> anyhow::Result<()> {
    let unknown: Vec<&str> = langs
        .iter()
        .map(String::as_str)
        .filter(|code| !locales.is_supported(code))
        .collect();
    if !unknown.is_empty() {
        anyhow::bail!(
            "unsupported language(s): {}; supported: {}",
            unknown.join(", "),
            locales.language_codes().join(", ")
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests;
