//! LinkedIn quick-apply job search over the live session.
//!
//! Card extraction runs as one in-page script with layered selector
//! fallbacks, since the result markup changes between rollouts.

use std::time::Duration;

use applyflow_core_types::JobPosting;
use browser_port::{PagePort, PortError};
use cdp_page::CdpPage;
use serde::Deserialize;
use tracing::debug;
use url::Url;

const SEARCH_BASE: &str = "https://www.linkedin.com/jobs/search/";
const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);
const RESULTS_SETTLE: Duration = Duration::from_secs(4);
const SCROLL_PAUSE: Duration = Duration::from_millis(800);
const SCROLL_ROUNDS: usize = 4;

#[derive(Debug, Deserialize)]
struct RawCard {
    #[serde(default)]
    title: String,
    #[serde(default)]
    company: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    href: String,
}

/// Build the search URL: quick-apply postings only, entry and associate
/// levels, newest first.
pub fn build_search_url(role: &str, geo_id: &str, location: &str) -> String {
    let mut url = match Url::parse(SEARCH_BASE) {
        Ok(url) => url,
        Err(_) => return SEARCH_BASE.to_string(),
    };
    url.query_pairs_mut()
        .append_pair("keywords", role)
        .append_pair("location", location)
        .append_pair("geoId", geo_id)
        .append_pair("f_AL", "true")
        .append_pair("f_E", "1,2")
        .append_pair("sortBy", "DD")
        .append_pair("start", "0");
    url.to_string()
}

const EXTRACT_CARDS: &str = r#"(() => {
    const results = [];
    const clean = (href) => {
        const base = href.split('?')[0];
        return base.startsWith('http') ? base : 'https://www.linkedin.com' + base;
    };

    const cards = document.querySelectorAll('[data-job-id]');
    cards.forEach(card => {
        const titleEl = card.querySelector(
            '.job-card-list__title, .job-card-list__title--link, ' +
            'a[data-control-name="job_card_title"], .base-search-card__title, strong'
        );
        const title = titleEl ? titleEl.innerText.trim() : '';
        const compEl = card.querySelector(
            '.job-card-container__primary-description, ' +
            '.job-card-container__company-name, ' +
            '.base-search-card__subtitle, .artdeco-entity-lockup__subtitle'
        );
        const company = compEl ? compEl.innerText.trim() : '';
        const locEl = card.querySelector(
            '.job-card-container__metadata-item, ' +
            '.job-search-card__location, .artdeco-entity-lockup__caption'
        );
        const location = locEl ? locEl.innerText.trim() : '';
        const linkEl = card.querySelector('a[href*="/jobs/view/"]');
        let href = linkEl ? (linkEl.getAttribute('href') || '') : '';
        if (!href) {
            const jobId = (card.getAttribute('data-job-id') || '').replace(/\D/g, '');
            if (jobId) href = '/jobs/view/' + jobId + '/';
        }
        if (title && href) results.push({ title, company, location, href: clean(href) });
    });

    if (results.length === 0) {
        const items = document.querySelectorAll(
            '.jobs-search-results__list-item, li.scaffold-layout__list-item'
        );
        items.forEach(item => {
            const titleEl = item.querySelector('a[id*="job-card"], a[href*="/jobs/view/"]');
            const title = titleEl ? titleEl.innerText.trim() : '';
            const href = titleEl ? (titleEl.getAttribute('href') || '') : '';
            const compEl = item.querySelector('.artdeco-entity-lockup__subtitle span');
            const company = compEl ? compEl.innerText.trim() : '';
            if (title && href) results.push({ title, company, location: '', href: clean(href) });
        });
    }

    return results;
})()"#;

/// Search one role in one region, returning postings deduplicated by URL.
pub async fn linkedin_search(
    page: &CdpPage,
    role: &str,
    geo_id: &str,
    location: &str,
    max_results: usize,
) -> Result<Vec<JobPosting>, PortError> {
    let url = build_search_url(role, geo_id, location);
    page.goto(&url, NAVIGATION_TIMEOUT).await?;
    page.settle(RESULTS_SETTLE).await;

    for _ in 0..SCROLL_ROUNDS {
        page.scroll_viewport().await?;
        page.settle(SCROLL_PAUSE).await;
    }

    let raw: Vec<RawCard> = page.eval(EXTRACT_CARDS).await?;
    let mut seen = std::collections::HashSet::new();
    let jobs: Vec<JobPosting> = raw
        .into_iter()
        .filter(|card| !card.href.is_empty() && seen.insert(card.href.clone()))
        .take(max_results)
        .map(|card| {
            let card_location = if card.location.is_empty() {
                location.to_string()
            } else {
                card.location
            };
            JobPosting::new(card.title, card.company, card.href)
                .with_location(card_location)
                .with_source("linkedin")
        })
        .collect();
    debug!(role, count = jobs.len(), "linkedin search done");
    Ok(jobs)
}
