//! The batch driver: one browser session reused serially across attempts.

use std::sync::Arc;
use std::time::Duration;

use answer_resolver::{AnswerResolver, GeminiCompleter, GeminiConfig};
use anyhow::{bail, Context, Result};
use apply_flow::{ApplyEngine, AttemptSpec};
use applyflow_core_types::Outcome;
use cdp_page::{BrowserSession, SessionConfig};
use chrono::Utc;
use rand::Rng;
use tracing::{info, warn};

use crate::config::{Config, Profile};
use crate::cover;
use crate::search;
use crate::sources;
use crate::tracker::Tracker;

const FEED_URL: &str = "https://www.linkedin.com/feed/";
const LOGIN_SETTLE: Duration = Duration::from_secs(2);
const SEARCH_PAGE_SIZE: usize = 25;
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Pacing window between attempts, in seconds.
const PACING_RANGE: (f64, f64) = (3.0, 7.0);

#[derive(Clone, Debug)]
pub struct BatchOptions {
    pub regions: Vec<String>,
    pub roles: Vec<String>,
    pub max_applications: usize,
    pub dry_run: bool,
    pub headless: bool,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct BatchStats {
    pub applied: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl BatchStats {
    fn tally(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Applied | Outcome::DryRun => self.applied += 1,
            Outcome::Skipped => self.skipped += 1,
            Outcome::Error(_) => self.errors += 1,
        }
    }
}

/// Search each region/role pair and drive one application attempt per new
/// posting, up to the application cap. Attempt failures never abort the
/// batch; each is tallied and the loop moves on.
pub async fn run_batch(
    config: &Config,
    profile: &Profile,
    options: &BatchOptions,
) -> Result<BatchStats> {
    let Some(li_at) = &config.li_at else {
        bail!("LINKEDIN_LI_AT is not set; a session cookie is required");
    };
    let resume_path = config.cv_path.as_ref().filter(|path| path.exists());
    if resume_path.is_none() {
        warn!("no resume file configured; upload steps will be skipped");
    }

    let mut resolver = AnswerResolver::new(profile.rule_table())
        .with_facts(profile.candidate_facts());
    if let Some(api_key) = &config.gemini_api_key {
        let completer = GeminiCompleter::new(GeminiConfig::new(api_key))
            .context("building completion client")?;
        resolver = resolver.with_completer(Arc::new(completer));
    }
    let engine = ApplyEngine::new(Arc::new(resolver), config.log_dir());

    let session_config = SessionConfig {
        headless: options.headless,
        user_agent: Some(USER_AGENT.to_string()),
        ..SessionConfig::default()
    };
    let session = BrowserSession::launch(&session_config)
        .await
        .context("launching browser")?;
    session
        .set_session_cookie("li_at", li_at, ".linkedin.com")
        .await
        .context("installing session cookie")?;
    if !session
        .verify_login(FEED_URL, LOGIN_SETTLE)
        .await
        .context("verifying login")?
    {
        session.close().await;
        bail!("session cookie rejected; refresh LINKEDIN_LI_AT and retry");
    }
    info!(name = %profile.personal.name, dry_run = options.dry_run, "session authenticated");

    let page = session.page();
    let mut tracker = Tracker::load(config.tracker_path())?;
    let mut stats = BatchStats::default();
    let covers_dir = config.covers_dir();

    'regions: for region_key in &options.regions {
        let Some(region) = sources::region(region_key) else {
            warn!(region = %region_key, "unknown region, skipping");
            continue;
        };
        for role in &options.roles {
            if stats.applied >= options.max_applications {
                break 'regions;
            }
            let jobs = match search::linkedin_search(
                &page,
                role,
                region.geo_id,
                region.location,
                SEARCH_PAGE_SIZE,
            )
            .await
            {
                Ok(jobs) => jobs,
                Err(err) => {
                    warn!(role = %role, region = %region.key, error = %err, "search failed");
                    continue;
                }
            };
            info!(role = %role, region = %region.key, count = jobs.len(), "postings found");

            for mut job in jobs {
                if stats.applied >= options.max_applications {
                    break 'regions;
                }
                job.region = region.key.to_string();
                if tracker.already_applied(&job.url) {
                    stats.skipped += 1;
                    continue;
                }

                let mut spec = AttemptSpec::new(&job.url, &job.title, &job.company)
                    .dry_run(options.dry_run)
                    .with_cover_letter(cover::letter_for(profile, &covers_dir, &job));
                if let Some(path) = resume_path {
                    spec = spec.with_resume(path);
                }

                let outcome = engine.run(&page, &spec).await;
                info!(title = %job.title, company = %job.company, outcome = %outcome, "attempt done");
                stats.tally(&outcome);

                if outcome == Outcome::Applied {
                    let note = format!("quick apply | {}", Utc::now().format("%Y-%m-%d"));
                    if !tracker.update_status(&job.url, "applied", &note) {
                        tracker.add_posting(&job, sources::score_job(&job), "applied", &note);
                    }
                    if let Err(err) = tracker.save() {
                        warn!(error = %err, "tracker save failed");
                    }
                }

                let pause = rand::thread_rng().gen_range(PACING_RANGE.0..PACING_RANGE.1);
                tokio::time::sleep(Duration::from_secs_f64(pause)).await;
            }
        }
    }

    session.close().await;
    info!(
        applied = stats.applied,
        skipped = stats.skipped,
        errors = stats.errors,
        "batch finished"
    );
    Ok(stats)
}
