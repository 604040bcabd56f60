//! Deterministic cover-letter rendering.
//!
//! Letters are assembled from profile paragraphs: a fixed intro, one or two
//! skill blocks picked by job-title keywords, and a templated close. A
//! pre-written letter on disk whose filename matches the role takes
//! precedence over generation.

use std::path::Path;

use apply_flow::COVER_LETTER_MAX_LEN;
use applyflow_core_types::JobPosting;
use tracing::debug;

use crate::config::Profile;

pub fn a_or_an(word: &str) -> &'static str {
    let first = word.trim().chars().next().map(|c| c.to_ascii_lowercase());
    match first {
        Some('a') | Some('e') | Some('i') | Some('o') | Some('u') => "an",
        _ => "a",
    }
}

/// Visa phrasing for the closing paragraph, keyed by region code or name.
pub fn visa_note(region: &str) -> &'static str {
    match region.trim().to_lowercase().as_str() {
        "uk" | "gb" => "I require a Skilled Worker visa sponsorship",
        "de" | "nl" | "germany" | "netherlands" | "europe" | "eu" | "ie" | "ireland" | "se"
        | "sweden" => "I require EU work visa sponsorship",
        "ae" | "uae" | "dubai" => "I require a UAE work visa",
        "in" | "india" => "no visa support is needed",
        _ => "I am open to discussing visa arrangements",
    }
}

/// Pick the profile skill paragraphs whose tags match the job title. The
/// first matching block wins; the last profile block doubles as the
/// catch-all when nothing matches.
fn pick_skill_text(profile: &Profile, title: &str) -> String {
    let title = title.to_lowercase();
    let blocks = &profile.cover.blocks;
    blocks
        .iter()
        .find(|block| block.tags.iter().any(|tag| title.contains(&tag.to_lowercase())))
        .or_else(|| blocks.last())
        .map(|block| block.text.clone())
        .unwrap_or_default()
}

/// Render a full letter for one posting.
pub fn generate_cover_letter(profile: &Profile, job: &JobPosting) -> String {
    let company = if job.company.is_empty() {
        "your organisation"
    } else {
        job.company.as_str()
    };
    let availability = if profile.cover.availability.is_empty() {
        "I am available to start promptly".to_string()
    } else {
        profile.cover.availability.clone()
    };

    let mut signature = profile.personal.name.clone();
    let contact_line = [&profile.personal.email, &profile.personal.phone]
        .iter()
        .filter(|part| !part.is_empty())
        .map(|part| part.as_str())
        .collect::<Vec<_>>()
        .join(" | ");
    if !contact_line.is_empty() {
        signature.push('\n');
        signature.push_str(&contact_line);
    }
    let links_line = [&profile.personal.linkedin, &profile.personal.github]
        .iter()
        .filter(|part| !part.is_empty())
        .map(|part| part.as_str())
        .collect::<Vec<_>>()
        .join(" | ");
    if !links_line.is_empty() {
        signature.push('\n');
        signature.push_str(&links_line);
    }

    format!(
        "Dear Hiring Manager,\n\n\
         Re: Application for {title} — {company}\n\n\
         {intro}\n\n\
         {skills}\n\n\
         I am eager to join {company} as {article} {title} and contribute from day one. \
         {availability} and {visa}. Please find my CV attached. \
         I look forward to hearing from you.\n\n\
         Yours sincerely,\n{signature}",
        title = job.title,
        company = company,
        intro = profile.cover.intro,
        skills = pick_skill_text(profile, &job.title),
        article = a_or_an(&job.title),
        availability = availability,
        visa = visa_note(&job.region),
    )
}

/// A pre-written letter whose filename shares a word with the role, clipped
/// to the destination limit.
pub fn lookup_letter(covers_dir: &Path, title: &str) -> Option<String> {
    let words: Vec<String> = title
        .to_lowercase()
        .split_whitespace()
        .take(2)
        .map(str::to_string)
        .collect();
    let entries = std::fs::read_dir(covers_dir).ok()?;
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().to_lowercase();
        if !name.ends_with(".txt") {
            continue;
        }
        if words.iter().any(|word| name.contains(word.as_str())) {
            match std::fs::read_to_string(entry.path()) {
                Ok(text) => return Some(text.chars().take(COVER_LETTER_MAX_LEN).collect()),
                Err(err) => {
                    debug!(path = %entry.path().display(), error = %err, "unreadable cover letter");
                }
            }
        }
    }
    None
}

/// The letter for one posting: a matching on-disk letter if present,
/// otherwise a freshly generated one.
pub fn letter_for(profile: &Profile, covers_dir: &Path, job: &JobPosting) -> String {
    lookup_letter(covers_dir, &job.title)
        .unwrap_or_else(|| generate_cover_letter(profile, job))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CoverConfig, PersonalInfo, SkillBlock};

    fn profile() -> Profile {
        Profile {
            personal: PersonalInfo {
                name: "A. Candidate".into(),
                email: "candidate@example.com".into(),
                ..PersonalInfo::default()
            },
            cover: CoverConfig {
                intro: "I am a recent graduate with production experience.".into(),
                blocks: vec![
                    SkillBlock {
                        tags: vec!["ai".into(), "ml".into(), "machine learning".into()],
                        text: "AI paragraph.".into(),
                    },
                    SkillBlock {
                        tags: vec!["fullstack".into(), "react".into()],
                        text: "Fullstack paragraph.".into(),
                    },
                ],
                availability: "I am available with a 30-day notice period".into(),
            },
            ..Profile::default()
        }
    }

    fn job(title: &str, region: &str) -> JobPosting {
        JobPosting::new(title, "Acme", "https://jobs.example.com/1").with_region(region)
    }

    #[test]
    fn article_follows_leading_vowel() {
        assert_eq!(a_or_an("AI Engineer"), "an");
        assert_eq!(a_or_an("Software Engineer"), "a");
    }

    #[test]
    fn skill_block_is_picked_by_title_tag() {
        let letter = generate_cover_letter(&profile(), &job("Junior ML Engineer", "uk"));
        assert!(letter.contains("AI paragraph."));
        assert!(!letter.contains("Fullstack paragraph."));
    }

    #[test]
    fn unmatched_title_falls_back_to_last_block() {
        let letter = generate_cover_letter(&profile(), &job("Embedded Engineer", "uk"));
        assert!(letter.contains("Fullstack paragraph."));
    }

    #[test]
    fn letter_carries_visa_note_for_region() {
        let letter = generate_cover_letter(&profile(), &job("Junior Developer", "india"));
        assert!(letter.contains("no visa support is needed"));
        let letter = generate_cover_letter(&profile(), &job("Junior Developer", "uk"));
        assert!(letter.contains("Skilled Worker visa"));
    }

    #[test]
    fn on_disk_letter_wins_and_is_clipped() {
        let dir = tempfile::tempdir().unwrap();
        let long = "y".repeat(4000);
        std::fs::write(dir.path().join("junior_developer.txt"), &long).unwrap();

        let letter = letter_for(&profile(), dir.path(), &job("Junior Developer", "uk"));
        assert_eq!(letter.len(), COVER_LETTER_MAX_LEN);
    }

    #[test]
    fn missing_covers_dir_generates() {
        let letter = letter_for(
            &profile(),
            Path::new("/nonexistent/covers"),
            &job("Junior Developer", "uk"),
        );
        assert!(letter.starts_with("Dear Hiring Manager,"));
    }
}
