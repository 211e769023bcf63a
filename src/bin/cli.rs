use clap::{Parser, Subcommand};
use recipesense::{Config, RecipeEngine, SearchQuery, SearchResponse};

#[derive(Parser)]
#[command(name = "recipesense-cli")]
#[command(about = "RecipeSense CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Database path (overrides DB_PATH)
    #[arg(short, long)]
    db: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search recipes by comma-separated ingredients
    Search {
        /// Ingredients, e.g. "eggs, tomatoes, rice"
        ingredients: String,

        /// Maximum results
        #[arg(short, long)]
        max_results: Option<usize>,

        /// Disable cache
        #[arg(long)]
        no_cache: bool,
    },

    /// Browse a recipe category (dessert, breakfast, ...)
    Category {
        name: String,

        #[arg(short, long)]
        max_results: Option<usize>,
    },

    /// Show a recipe's details
    Recipe {
        id: i64,
    },

    /// Get cache statistics
    Stats,

    /// Clean up old cache entries
    Cleanup {
        /// Maximum age in days (defaults to CACHE_MAX_AGE_DAYS)
        #[arg(short, long)]
        max_age_days: Option<i64>,
    },
}

fn print_recipes(result: &SearchResponse) {
    if result.is_empty() {
        println!("\nNo recipes found.");
        return;
    }

    println!();
    for (i, recipe) in result.recipes.iter().enumerate() {
        match recipe.intelligence_score {
            Some(score) => println!(
                "   {:>2}. {} (score {}, {} matched, {} missing)",
                i + 1,
                recipe.title,
                score,
                recipe.matched_count.unwrap_or(0),
                recipe.missing_count.unwrap_or(0)
            ),
            None => println!("   {:>2}. {}", i + 1, recipe.title),
        }
    }

    println!("\n   Provider: {}", result.provider);
    println!("   Cached: {}", result.from_cache);
    println!("   Latency: {:.2}ms", result.latency_ms);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }

    let engine = RecipeEngine::new(&config).await?;

    match cli.command {
        Commands::Search { ingredients, max_results, no_cache } => {
            println!("🔍 Searching for: {}", ingredients);

            let query = SearchQuery {
                ingredients,
                max_results,
                use_cache: !no_cache,
            };

            let result = engine.search(query).await?;
            print_recipes(&result);
        }

        Commands::Category { name, max_results } => {
            println!("📂 Category: {}", name);

            let result = engine.search_category(&name, max_results).await?;
            print_recipes(&result);
        }

        Commands::Recipe { id } => {
            let recipe = engine.fetch_recipe(id).await?;

            println!("\n🍽️  {}", recipe.title);
            if let Some(minutes) = recipe.ready_in_minutes {
                println!("   Ready in: {} min", minutes);
            }
            if let Some(servings) = recipe.servings {
                println!("   Servings: {}", servings);
            }
            if let Some(url) = &recipe.source_url {
                println!("   Source: {}", url);
            }
            println!("   Ingredients: {}", recipe.extended_ingredients.len());
        }

        Commands::Stats => {
            let stats = engine.cache_stats().await?;

            println!("📊 Cache Statistics:");
            println!("   Total entries: {}", stats.total_entries);
            println!("   Total hits: {}", stats.total_hits);
            println!("   Avg hits/entry: {:.2}", stats.avg_hit_count);

            if let Some(oldest) = stats.oldest_entry {
                println!("   Oldest entry: {}", oldest.format("%Y-%m-%d %H:%M:%S"));
            }

            if let Some(newest) = stats.newest_entry {
                println!("   Newest entry: {}", newest.format("%Y-%m-%d %H:%M:%S"));
            }
        }

        Commands::Cleanup { max_age_days } => {
            let max_age_days = max_age_days.unwrap_or(config.cache_max_age_days);
            println!("🧹 Cleaning up entries older than {} days...", max_age_days);

            let deleted = engine.cleanup_cache(max_age_days).await?;

            println!("✅ Deleted {} entries", deleted);
        }
    }

    Ok(())
}
