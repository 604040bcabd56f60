use anyhow::{Context, Result};
use applyflow::batch::{self, BatchOptions};
use applyflow::config::{Config, Profile};
use applyflow::cover;
use applyflow::draft;
use applyflow::sources::{
    self, adzuna::AdzunaClient, reed::ReedClient, remoteok::RemoteOkClient,
    remotive::RemotiveClient,
};
use applyflow::tracker::Tracker;
use applyflow_core_types::JobPosting;
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "applyflow",
    version,
    about = "Automated job discovery and quick-apply form submission"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Query public listing sources and record new postings in the tracker
    Search {
        /// Region key or "all"
        #[arg(long, default_value = "all")]
        region: String,
        /// Search term or "all" for the profile's target roles
        #[arg(long, default_value = "all")]
        role: String,
        /// Max result pages per query
        #[arg(long, default_value_t = 3)]
        max_pages: usize,
    },
    /// Search LinkedIn and drive quick-apply attempts
    Apply {
        #[arg(long, default_value = "uk")]
        region: String,
        #[arg(long, default_value = "all")]
        role: String,
        /// Application cap for this run
        #[arg(long, default_value_t = 20)]
        max: usize,
        /// Locate forms but do not fill or submit anything
        #[arg(long)]
        dry_run: bool,
        /// Show the browser window
        #[arg(long)]
        headed: bool,
    },
    /// Render cover letters for tracked postings still in "found" status
    Cover {
        /// Only this tracker row id
        #[arg(long)]
        id: Option<String>,
    },
    /// List tracked applications or update one by hand
    Track {
        #[arg(long)]
        list: bool,
        /// Mark this tracker row id as applied
        #[arg(long)]
        mark_applied: Option<String>,
    },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_profile(config: &Config) -> Result<Profile> {
    let path = config.profile_path();
    Profile::load(&path).with_context(|| format!("loading profile from {}", path.display()))
}

fn roles_for(profile: &Profile, role: &str) -> Vec<String> {
    if role != "all" {
        return vec![role.to_string()];
    }
    if !profile.target_roles.is_empty() {
        return profile.target_roles.clone();
    }
    sources::DEFAULT_SEARCH_TERMS
        .iter()
        .map(|term| term.to_string())
        .collect()
}

fn regions_for(region: &str) -> Vec<String> {
    if region == "all" {
        sources::region_keys()
            .into_iter()
            .map(str::to_string)
            .collect()
    } else {
        vec![region.to_lowercase()]
    }
}

async fn run_search(config: &Config, region: &str, role: &str, max_pages: usize) -> Result<()> {
    let profile = load_profile(config)?;
    let roles = roles_for(&profile, role);
    let regions = regions_for(region);

    let credentials = config
        .adzuna_app_id
        .clone()
        .zip(config.adzuna_app_key.clone());
    let adzuna = AdzunaClient::new(credentials)?;
    let remoteok = RemoteOkClient::new()?;

    let mut found: Vec<JobPosting> = Vec::new();
    for region_key in &regions {
        let Some(entry) = sources::region(region_key) else {
            warn!(region = %region_key, "unknown region, skipping");
            continue;
        };
        let Some(country) = entry.adzuna_country else {
            continue;
        };
        // Cap the term list per region to stay under the anonymous rate
        // limit.
        for term in roles.iter().take(5) {
            match adzuna.search(term, country, entry.key, max_pages).await {
                Ok(jobs) => {
                    let relevant: Vec<_> =
                        jobs.into_iter().filter(sources::is_relevant).collect();
                    info!(term = %term, region = %entry.key, count = relevant.len(), "adzuna results");
                    found.extend(relevant);
                }
                Err(err) => warn!(term = %term, error = %err, "adzuna search failed"),
            }
        }
    }

    if region == "all" || region == "remote" {
        let remotive = RemotiveClient::new()?;
        for term in roles.iter().take(3) {
            match remoteok.search(term).await {
                Ok(jobs) => {
                    let relevant: Vec<_> =
                        jobs.into_iter().filter(sources::is_relevant).collect();
                    info!(term = %term, count = relevant.len(), "remoteok results");
                    found.extend(relevant);
                }
                Err(err) => warn!(term = %term, error = %err, "remoteok search failed"),
            }
            match remotive.search(term).await {
                Ok(jobs) => {
                    let relevant: Vec<_> =
                        jobs.into_iter().filter(sources::is_relevant).collect();
                    info!(term = %term, count = relevant.len(), "remotive results");
                    found.extend(relevant);
                }
                Err(err) => warn!(term = %term, error = %err, "remotive search failed"),
            }
        }
    }

    if region == "all" || region == "uk" {
        if let Some(api_key) = &config.reed_api_key {
            let reed = ReedClient::new(api_key)?;
            for term in roles.iter().take(3) {
                match reed.search(term).await {
                    Ok(jobs) => {
                        let relevant: Vec<_> =
                            jobs.into_iter().filter(sources::is_relevant).collect();
                        info!(term = %term, count = relevant.len(), "reed results");
                        found.extend(relevant);
                    }
                    Err(err) => warn!(term = %term, error = %err, "reed search failed"),
                }
            }
        }
    }

    let mut unique = sources::dedup(found);
    unique.sort_by_key(|job| std::cmp::Reverse(sources::score_job(job)));

    let mut tracker = Tracker::load(config.tracker_path())?;
    let mut new_count = 0;
    for job in &unique {
        if !tracker.contains(&job.title, &job.company) {
            tracker.add_posting(job, sources::score_job(job), "found", "");
            new_count += 1;
        }
    }
    tracker.save()?;

    let leads_dir = config.leads_dir();
    std::fs::create_dir_all(&leads_dir)?;
    let leads_path = leads_dir.join(format!("leads_{}.json", Local::now().format("%Y%m%d_%H%M")));
    let top: Vec<_> = unique.iter().take(30).collect();
    std::fs::write(&leads_path, serde_json::to_string_pretty(&top)?)?;

    println!("unique postings : {}", unique.len());
    println!("new in tracker  : {new_count}");
    println!("tracker         : {}", tracker.path().display());
    println!("leads snapshot  : {}", leads_path.display());
    for (index, job) in unique.iter().take(15).enumerate() {
        println!(
            "{:>3}. [{:^6}] {} | {} | {}",
            index + 1,
            job.region,
            job.title,
            job.company,
            job.url
        );
    }
    Ok(())
}

async fn run_apply(
    config: &Config,
    region: &str,
    role: &str,
    max: usize,
    dry_run: bool,
    headed: bool,
) -> Result<()> {
    let profile = load_profile(config)?;
    let options = BatchOptions {
        regions: regions_for(region),
        roles: roles_for(&profile, role),
        max_applications: max,
        dry_run,
        headless: !headed,
    };
    let stats = batch::run_batch(config, &profile, &options).await?;
    println!("applied : {}", stats.applied);
    println!("skipped : {}", stats.skipped);
    println!("errors  : {}", stats.errors);
    Ok(())
}

fn run_cover(config: &Config, id: Option<&str>) -> Result<()> {
    let profile = load_profile(config)?;
    let mut tracker = Tracker::load(config.tracker_path())?;
    let covers_dir = config.covers_dir();
    let drafts_dir = config.drafts_dir();
    std::fs::create_dir_all(&covers_dir)?;
    std::fs::create_dir_all(&drafts_dir)?;

    let targets: Vec<_> = tracker
        .rows()
        .iter()
        .filter(|row| row.status == "found")
        .filter(|row| id.map(|wanted| row.id == wanted).unwrap_or(true))
        .cloned()
        .collect();

    if targets.is_empty() {
        println!("no matching postings in \"found\" status");
        return Ok(());
    }

    for row in targets {
        let job = JobPosting::new(&row.title, &row.company, &row.url)
            .with_location(&row.location)
            .with_region(&row.region)
            .with_source(&row.source);
        let letter = cover::generate_cover_letter(&profile, &job);
        let text = draft::generate_draft(&profile, &row, &letter);

        let slug: String = row
            .company
            .to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect();
        let letter_name = format!("{}_{slug}.txt", row.id);
        let draft_name = format!("{}_{slug}_draft.txt", row.id);
        std::fs::write(covers_dir.join(&letter_name), letter)?;
        std::fs::write(drafts_dir.join(&draft_name), text)?;
        tracker.mark_cover_ready(&row.id, &letter_name);
        println!("wrote {letter_name} + {draft_name}");
    }
    tracker.save()?;
    Ok(())
}

fn run_track(config: &Config, list: bool, mark_applied: Option<&str>) -> Result<()> {
    let mut tracker = Tracker::load(config.tracker_path())?;
    if let Some(id) = mark_applied {
        let note = format!("marked by hand | {}", Local::now().format("%Y-%m-%d"));
        if tracker.mark_applied_by_id(id, &note) {
            tracker.save()?;
            println!("row {id} marked applied");
        } else {
            println!("no tracker row with id {id}");
        }
        return Ok(());
    }
    if list || tracker.is_empty() {
        if tracker.is_empty() {
            println!("tracker is empty");
            return Ok(());
        }
        for row in tracker.rows() {
            println!(
                "{:>4} [{:^8}] {} @ {} | {}",
                row.id, row.status, row.title, row.company, row.url
            );
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = Config::from_env();
    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("creating data dir {}", config.data_dir.display()))?;

    match cli.command {
        Command::Search {
            region,
            role,
            max_pages,
        } => run_search(&config, &region, &role, max_pages).await,
        Command::Apply {
            region,
            role,
            max,
            dry_run,
            headed,
        } => run_apply(&config, &region, &role, max, dry_run, headed).await,
        Command::Cover { id } => run_cover(&config, id.as_deref()),
        Command::Track { list, mark_applied } => {
            run_track(&config, list, mark_applied.as_deref())
        }
    }
}
