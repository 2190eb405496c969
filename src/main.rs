use chomptron::config::AppConfig;
use chomptron::server::run_server;
use chomptron::store::{FileStorage, RecipeFilter, RecipeStore, RecordId};
use chomptron::ProviderFactory;
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "chomptron", about = "AI recipe generator", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,
    /// Generate a recipe and save it to the local history
    Generate {
        /// Comma-separated list of ingredients
        ingredients: String,
    },
    /// List saved recipes, newest first
    History {
        /// Only show favorites
        #[arg(long)]
        favorites: bool,
        /// Case-insensitive search over ingredients and names
        #[arg(long, short)]
        query: Option<String>,
    },
    /// Toggle the favorite flag of a saved recipe
    Favorite {
        /// Recipe id as shown by `history`
        id: RecordId,
    },
    /// Export the whole history
    Export {
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Delete every saved recipe
    Clear,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Json,
    Text,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = AppConfig::load()?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server(&config).await?,
        Commands::Generate { ingredients } => {
            if ingredients.trim().is_empty() {
                return Err("No ingredients provided".into());
            }
            let provider = ProviderFactory::create(&config.gemini)?;
            let recipe = chomptron::generate_recipe(provider.as_ref(), &ingredients).await?;
            println!("{}", recipe);

            let mut store = open_history(&config);
            let id = store.save_recipe(&ingredients, &recipe);
            println!("Saved recipe {}", id);
            warn_if_stale(&store);
        }
        Commands::History { favorites, query } => {
            let store = open_history(&config);
            let filter = RecipeFilter {
                favorites_only: favorites,
                query,
            };

            let mut shown = 0;
            for recipe in store.get_recipes(&filter) {
                let star = if recipe.is_favorite { "★" } else { " " };
                println!(
                    "{} {}  {}  {}  [{}]",
                    star,
                    recipe.id,
                    recipe.created_at.format("%Y-%m-%d %H:%M"),
                    recipe.name,
                    recipe.ingredients
                );
                shown += 1;
            }
            if shown == 0 {
                println!("No saved recipes");
            }
        }
        Commands::Favorite { id } => {
            let mut store = open_history(&config);
            match store.toggle_favorite(id) {
                Some(true) => println!("Recipe {} marked as favorite", id),
                Some(false) => println!("Recipe {} removed from favorites", id),
                None => println!("No saved recipe with id {}", id),
            }
            warn_if_stale(&store);
        }
        Commands::Export { format, output } => {
            let store = open_history(&config);
            let document = match format {
                ExportFormat::Json => store.export_to_json()?,
                ExportFormat::Text => store.export_to_text(),
            };

            match output {
                Some(path) => {
                    fs::write(&path, document)?;
                    info!("Exported {} recipes to {}", store.len(), path.display());
                }
                None => println!("{}", document.trim_end()),
            }
        }
        Commands::Clear => {
            let mut store = open_history(&config);
            let removed = store.len();
            store.clear_all();
            println!("Removed {} saved recipes", removed);
            warn_if_stale(&store);
        }
    }

    Ok(())
}

fn open_history(config: &AppConfig) -> RecipeStore<FileStorage> {
    RecipeStore::initialize(FileStorage::new(&config.history.path))
}

fn warn_if_stale(store: &RecipeStore<FileStorage>) {
    if store.is_mirror_stale() {
        eprintln!(
            "Warning: could not write history to {}",
            store.storage().dir().display()
        );
    }
}
