use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use catalog::{ActivityCategory, CatalogIndex, MatchingDataStore, UserId};
use matching::{ActivityMatchScore, ScoreOrigin};
use server::{load_env_file, EngineConfig, RecommendationOrchestrator};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Volunteer Match - volunteering activity recommendations
#[derive(Parser)]
#[command(name = "volunteer-match")]
#[command(about = "Match volunteers with volunteering activities", long_about = None)]
struct Cli {
    /// Directory holding users.json, activities.json and participations.json
    #[arg(short, long, env = "MATCHING_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Maximum number of recommendations per request
    #[arg(short, long, env = "MATCHING_LIMIT", default_value = "5")]
    limit: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get activity recommendations for a user
    Recommend {
        /// User ID to get recommendations for
        #[arg(long)]
        user_id: UserId,

        /// Show the reasons behind each recommendation
        #[arg(long)]
        explain: bool,

        /// Score with the rule engine only, even if an API key is set
        #[arg(long)]
        offline: bool,
    },

    /// Show a user's profile and participation history
    Profile {
        /// User ID to display
        #[arg(long)]
        user_id: UserId,
    },

    /// List published activities of a category
    Activities {
        /// ong_volunteering, lab, micro_mission or training
        #[arg(long, default_value = "ong_volunteering")]
        category: ActivityCategory,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Before parsing, so `.env` can feed the env-backed flags too
    load_env_file(Path::new(".env"));
    let cli = Cli::parse();

    let mut config = EngineConfig::from_env();
    config.data_dir = cli.data_dir.clone();
    config.limit = cli.limit.max(1);
    debug!(
        "Data dir {:?}, limit {}, model scoring {}",
        config.data_dir,
        config.limit,
        if config.llm.is_some() { "on" } else { "off" }
    );

    println!("Loading catalog from {}...", config.data_dir.display());
    let start = Instant::now();
    let index = Arc::new(
        CatalogIndex::load_from_dir(&config.data_dir).context("Failed to load catalog")?,
    );
    let (users, activities, participations) = index.counts();
    println!(
        "{} Loaded {} users, {} activities, {} participations in {:?}",
        "✓".green(),
        users,
        activities,
        participations,
        start.elapsed()
    );

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Recommend {
            user_id,
            explain,
            offline,
        } => {
            if offline {
                config.llm = None;
            }
            handle_recommend(index, &config, user_id, explain).await?
        }
        Commands::Profile { user_id } => handle_profile(index, user_id).await?,
        Commands::Activities { category } => handle_activities(index, category).await?,
        Commands::Benchmark { requests } => handle_benchmark(index, &config, requests).await?,
    }

    Ok(())
}

/// Handle the 'recommend' command
async fn handle_recommend(
    index: Arc<CatalogIndex>,
    config: &EngineConfig,
    user_id: UserId,
    explain: bool,
) -> Result<()> {
    let user = index
        .get_user(user_id)
        .ok_or_else(|| anyhow!("User {} not found", user_id))?;
    println!("Recommendations for {}", user.full_name.bold());

    let orchestrator = RecommendationOrchestrator::from_config(index.clone(), config);
    let recommendations = orchestrator.generate_recommendations(user_id).await;

    if recommendations.is_empty() {
        println!("{}", "No activities to recommend.".yellow());
        return Ok(());
    }
    print_recommendations(&recommendations, explain);
    Ok(())
}

/// Handle the 'profile' command
async fn handle_profile(index: Arc<CatalogIndex>, user_id: UserId) -> Result<()> {
    let user = index
        .get_user(user_id)
        .ok_or_else(|| anyhow!("User {} not found", user_id))?;

    println!("{}", format!("User {}: {}", user_id, user.full_name).bold().blue());
    println!("{}Email: {}", "• ".green(), user.email);
    println!("{}Office: {}", "• ".green(), user.office.as_deref().unwrap_or("-"));
    println!("{}Department: {}", "• ".green(), user.department.as_deref().unwrap_or("-"));
    println!("{}Position: {}", "• ".green(), user.position.as_deref().unwrap_or("-"));
    println!("{}Onboarded: {}", "• ".green(), user.is_onboarded);

    let strengths = user
        .strengths
        .as_ref()
        .map(|s| s.keys().cloned().collect::<Vec<_>>().join(", "))
        .unwrap_or_default();
    println!("{}Strengths: {}", "• ".cyan(), strengths);
    println!(
        "{}Personality type: {}",
        "• ".cyan(),
        user.personality_type.as_deref().unwrap_or("-")
    );
    println!(
        "{}Interests: {}",
        "• ".cyan(),
        user.interests.as_ref().map(|i| i.join(", ")).unwrap_or_default()
    );
    if let Some(availability) = &user.availability {
        println!(
            "{}Availability: weekdays={}, weekends={}, slots=[{}]",
            "• ".cyan(),
            availability.weekdays,
            availability.weekends,
            availability.time_slots.join(", ")
        );
    }

    let participations = index.get_user_participations(user_id);
    println!("Participations ({}):", participations.len());
    for participation in participations {
        let title = index
            .get_activity(participation.activity_id)
            .map(|a| a.title.as_str())
            .unwrap_or("<unknown activity>");
        let hours = participation
            .hours_logged
            .map(|h| format!(", {h:.1} h"))
            .unwrap_or_default();
        println!("  - {} ({:?}{})", title, participation.status, hours);
    }

    if let Some(data) = index.fetch_matching_data(user_id).await? {
        println!("Stored matching preferences (updated {}):", data.updated_at);
        for (label, score) in &data.matching_score {
            println!("  - {}: {:.2}", label, score);
        }
    }
    Ok(())
}

/// Handle the 'activities' command
async fn handle_activities(index: Arc<CatalogIndex>, category: ActivityCategory) -> Result<()> {
    let orchestrator = RecommendationOrchestrator::from_index(index);
    let activities = orchestrator.list_activities(category).await?;

    println!("{}", format!("Published {} activities:", category).bold().blue());
    for activity in &activities {
        let place = if activity.is_virtual {
            "virtual".to_string()
        } else {
            activity.location.clone().unwrap_or_else(|| "-".to_string())
        };
        let duration = activity
            .duration_hours
            .map(|h| format!("{h} h"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{}: {} [{}] {} ({} points)",
            activity.id, activity.title, place, duration, activity.points_reward
        );
    }
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    index: Arc<CatalogIndex>,
    config: &EngineConfig,
    requests: usize,
) -> Result<()> {
    if requests == 0 {
        bail!("--requests must be at least 1");
    }
    let user_ids = index.get_all_user_ids();
    if user_ids.is_empty() {
        bail!("Catalog has no users to benchmark with");
    }

    let orchestrator = RecommendationOrchestrator::from_config(index.clone(), config);

    // Pick random users from the catalog
    let picks: Vec<UserId> = (0..requests)
        .map(|_| user_ids[rand::random::<u32>() as usize % user_ids.len()])
        .collect();

    // Use tokio::spawn to make concurrent requests
    let wall_clock = Instant::now();
    let mut handles = vec![];
    for user in picks {
        let orchestrator = orchestrator.clone();
        handles.push(tokio::spawn(async move {
            let start = Instant::now();
            let recommendations = orchestrator.generate_recommendations(user).await;
            (start.elapsed(), recommendations.len())
        }));
    }

    let mut timings = vec![];
    let mut empty = 0;
    for handle in handles {
        let (elapsed, count) = handle.await?;
        if count == 0 {
            empty += 1;
        }
        timings.push(elapsed);
    }
    let total_time = wall_clock.elapsed();

    let summed: Duration = timings.iter().sum();
    let avg_latency = summed / (timings.len() as u32);
    timings.sort();
    let percentile = |p: f32| timings[((timings.len() as f32 * p) as usize).min(timings.len() - 1)];
    let throughput = requests as f32 / total_time.as_secs_f32();

    println!("Benchmark results:");
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);
    println!("Empty results: {}", empty);

    Ok(())
}

/// Helper function to format and print recommendations
fn print_recommendations(recommendations: &[ActivityMatchScore], explain: bool) {
    print!("{}", "Activity Recommendations:\n".bold().blue());
    for (i, rec) in recommendations.iter().enumerate() {
        let origin = match rec.scored_by {
            ScoreOrigin::Model => "model".magenta(),
            ScoreOrigin::Rules => "rules".cyan(),
        };
        println!(
            "{}. {} - Score: {} [{}]",
            (i + 1).to_string().green(),
            rec.activity.title,
            rec.score,
            origin
        );
        if explain {
            for reason in &rec.reasons {
                println!("   - {}", reason);
            }
        }
    }
}
