use clap::{Parser, Subcommand};
use log::error;
use recipe_scraper::{import_directory, scale_recipe, ScrapeError, Scraper, ScraperConfig};
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "recipe-scraper",
    about = "Scrape recipe pages into structured drafts"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape a recipe page and print the draft as JSON
    Scrape {
        url: String,
    },

    /// List the images a recipe page offers, as JSON
    Images {
        url: String,
    },

    /// Scale ingredient lines to a new number of servings
    Scale {
        /// Original yield text, e.g. "4 servings"
        #[arg(long)]
        servings: String,

        /// Servings wanted
        #[arg(long)]
        target: f64,

        /// Ingredient lines, one per argument
        #[arg(required = true)]
        ingredients: Vec<String>,
    },

    /// Import a directory of exported recipe HTML files and print the report
    Import {
        dir: PathBuf,

        /// Titles that already exist and must not be imported again
        #[arg(long = "existing")]
        existing_titles: Vec<String>,
    },
}

fn print_json(value: &impl Serialize) -> Result<(), ScrapeError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

async fn run(command: Command) -> Result<(), ScrapeError> {
    match command {
        Command::Scrape { url } => {
            let scraper = Scraper::builder().config(ScraperConfig::load()?).build()?;
            print_json(&scraper.scrape(&url).await?)
        }
        Command::Images { url } => {
            let scraper = Scraper::builder().config(ScraperConfig::load()?).build()?;
            print_json(&scraper.scrape_images(&url).await?)
        }
        Command::Scale {
            servings,
            target,
            ingredients,
        } => {
            let scaled = scale_recipe(&ingredients, Some(servings.as_str()), target);
            println!("# scale factor {}", scaled.scale_factor);
            for line in scaled.scaled_ingredients.iter() {
                println!("{line}");
            }
            Ok(())
        }
        Command::Import {
            dir,
            existing_titles,
        } => {
            let existing: HashSet<String> = existing_titles.into_iter().collect();
            print_json(&import_directory(&dir, &existing, None).await?)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("error ({}): {e}", e.reason());
            ExitCode::FAILURE
        }
    }
}
