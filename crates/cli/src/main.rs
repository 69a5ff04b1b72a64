use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use colored::Colorize;
use recipe_model::{EnrichedRecipe, RecipeSuggestion, VideoSummary};
use server::{PipelineConfig, RecommendationOrchestrator};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::debug;

/// SnapCook - recipe suggestions from a photo of your ingredients
#[derive(Parser)]
#[command(name = "snapcook")]
#[command(about = "Recommend recipes and cooking videos from a food photo", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend recipes for a food photo
    Recommend {
        /// Path to the photo
        #[arg(long)]
        image: PathBuf,

        /// Extra request appended to the prompt (e.g. "매콤하게")
        #[arg(long)]
        request: Option<String>,

        /// Attach up to this many videos per recipe (clamped to 1..=3)
        #[arg(long)]
        videos: Option<usize>,

        /// MIME type of the photo; inferred from the extension when omitted
        #[arg(long)]
        mime: Option<String>,

        /// Print the raw JSON result
        #[arg(long)]
        json: bool,
    },

    /// Look up cooking videos for a recipe name
    Videos {
        /// Recipe name to search for
        #[arg(long)]
        recipe: String,

        /// Number of videos to return (clamped to 1..=3)
        #[arg(long, default_value = "3")]
        count: usize,

        /// Print the raw JSON result
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = PipelineConfig::from_env().context("Invalid pipeline configuration")?;
    let orchestrator = RecommendationOrchestrator::from_env(&config)?;

    match cli.command {
        Commands::Recommend {
            image,
            request,
            videos,
            mime,
            json,
        } => {
            handle_recommend(&orchestrator, &image, request.as_deref(), videos, mime, json).await?
        }
        Commands::Videos {
            recipe,
            count,
            json,
        } => handle_videos(&orchestrator, &recipe, count, json).await?,
    }

    Ok(())
}

/// Handle the 'recommend' command
async fn handle_recommend(
    orchestrator: &RecommendationOrchestrator,
    image_path: &Path,
    request: Option<&str>,
    videos: Option<usize>,
    mime: Option<String>,
    json: bool,
) -> Result<()> {
    let mime_type = match mime {
        Some(mime) => mime,
        None => infer_mime_type(image_path)
            .ok_or_else(|| {
                anyhow!(
                    "Cannot infer image type of {}; pass --mime",
                    image_path.display()
                )
            })?
            .to_string(),
    };
    let bytes = tokio::fs::read(image_path)
        .await
        .with_context(|| format!("Failed to read {}", image_path.display()))?;
    debug!("Read {} bytes of {} from {}", bytes.len(), mime_type, image_path.display());

    let start = Instant::now();

    match videos {
        None => {
            let result = orchestrator.recommend(bytes, &mime_type, request).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_message(&result.message);
                for (rank, recipe) in result.recipes.iter().enumerate() {
                    print_recipe(rank + 1, recipe);
                }
            }
        }
        Some(count) => {
            let result = orchestrator
                .recommend_with_videos(bytes, &mime_type, request, count)
                .await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_message(&result.message);
                for (rank, EnrichedRecipe { recipe, videos }) in result.recipes.iter().enumerate() {
                    print_recipe(rank + 1, recipe);
                    print_videos(videos);
                }
            }
        }
    }

    if !json {
        println!("{} Done in {:.2?}", "✓".green(), start.elapsed());
    }
    Ok(())
}

/// Handle the 'videos' command
async fn handle_videos(
    orchestrator: &RecommendationOrchestrator,
    recipe: &str,
    count: usize,
    json: bool,
) -> Result<()> {
    let videos = orchestrator.videos_for_recipe(recipe, count).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&videos)?);
    } else {
        println!("{}", format!("Videos for '{}':", recipe).bold().blue());
        if videos.is_empty() {
            println!("  (none found)");
        }
        print_videos(&videos);
    }
    Ok(())
}

/// MIME type for common photo extensions
fn infer_mime_type(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}

fn print_message(message: &str) {
    if !message.is_empty() {
        println!("{}", message.italic());
    }
}

fn print_recipe(rank: usize, recipe: &RecipeSuggestion) {
    let difficulty = match recipe.difficulty_level() {
        Some(level) => level.to_string(),
        None => recipe.difficulty.clone(),
    };

    println!(
        "\n{}. {} ({} min, {})",
        rank.to_string().green(),
        recipe.name.bold(),
        recipe.estimated_time_minutes,
        difficulty
    );
    println!("   {}", recipe.description);
    println!("   {} {}", "Ingredients:".cyan(), recipe.ingredients.join(", "));
    for (step, instruction) in recipe.instructions.iter().enumerate() {
        println!("   {} {}", format!("{}.", step + 1).cyan(), instruction);
    }
    if !recipe.tips.is_empty() {
        println!("   {} {}", "Tip:".yellow(), recipe.tips);
    }
}

fn print_videos(videos: &[VideoSummary]) {
    for video in videos {
        println!(
            "   {} {} [{}] {} views",
            "▶".red(),
            video.title,
            video.channel_title,
            video.view_count
        );
        println!("     {}", video.canonical_url.underline());
    }
}
