//! Application draft rendering.
//!
//! A draft is a self-contained text file per posting holding everything
//! needed to apply by hand: the job details, the applicant's contact block,
//! the rendered cover letter, and the static form answers ready to paste.

use chrono::Utc;

use crate::config::Profile;
use crate::tracker::TrackerRow;

/// Render the draft for one tracked posting with its cover letter.
pub fn generate_draft(profile: &Profile, row: &TrackerRow, cover_letter: &str) -> String {
    let personal = &profile.personal;
    let mut applicant = String::new();
    let mut push_line = |label: &str, value: &str| {
        if !value.is_empty() {
            applicant.push_str(&format!("{label:<15}: {value}\n"));
        }
    };
    push_line("Full Name", &personal.name);
    push_line("Email", &personal.email);
    push_line("Phone", &personal.phone);
    push_line("LinkedIn", &personal.linkedin);
    push_line("GitHub", &personal.github);
    push_line("Portfolio", &personal.website);
    if !personal.city.is_empty() {
        let location = if personal.country.is_empty() {
            personal.city.clone()
        } else {
            format!("{}, {}", personal.city, personal.country)
        };
        applicant.push_str(&format!("{:<15}: {location}\n", "Current City"));
    }

    let mut answers = String::new();
    for rule in &profile.answers {
        answers.push_str(&format!("{:<20}: {}\n", rule.key, rule.value));
    }
    if answers.is_empty() {
        answers.push_str("(no static answers in profile)\n");
    }

    let salary = if row.salary.is_empty() {
        "Not listed"
    } else {
        row.salary.as_str()
    };

    format!(
        "APPLICATION DRAFT\n\
         =================\n\
         Date       : {date}\n\
         Role       : {title}\n\
         Company    : {company}\n\
         Location   : {location}\n\
         Region     : {region}\n\
         Source     : {source}\n\
         URL        : {url}\n\
         Salary     : {salary}\n\
         Status     : {status}\n\
         \n\
         -- APPLICANT INFO ----------------------------------------\n\
         {applicant}\
         \n\
         -- COVER LETTER ------------------------------------------\n\
         {cover_letter}\n\
         \n\
         -- FORM ANSWERS (copy-paste these) -----------------------\n\
         {answers}\
         \n\
         -- APPLY NOW ---------------------------------------------\n\
         Open this URL in your browser to apply:\n\
         {url}\n",
        date = Utc::now().format("%Y-%m-%d"),
        title = row.title,
        company = row.company,
        location = row.location,
        region = row.region,
        source = row.source,
        url = row.url,
        salary = salary,
        status = row.status,
        applicant = applicant,
        cover_letter = cover_letter,
        answers = answers,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PersonalInfo;
    use answer_resolver::AnswerRule;

    fn profile() -> Profile {
        Profile {
            personal: PersonalInfo {
                name: "A. Candidate".into(),
                email: "candidate@example.com".into(),
                phone: "+44 7000 000000".into(),
                city: "London".into(),
                country: "United Kingdom".into(),
                ..PersonalInfo::default()
            },
            answers: vec![
                AnswerRule::new("notice period", "30 days"),
                AnswerRule::new("sponsorship", "Yes"),
            ],
            ..Profile::default()
        }
    }

    fn row() -> TrackerRow {
        TrackerRow {
            id: "7".into(),
            title: "Junior Rust Engineer".into(),
            company: "Acme".into(),
            location: "London".into(),
            region: "uk".into(),
            source: "reed".into(),
            url: "https://jobs.example.com/7".into(),
            status: "found".into(),
            ..TrackerRow::default()
        }
    }

    #[test]
    fn draft_carries_job_applicant_and_answers() {
        let draft = generate_draft(&profile(), &row(), "Dear Hiring Manager, ...");
        assert!(draft.starts_with("APPLICATION DRAFT"));
        assert!(draft.contains("Role       : Junior Rust Engineer"));
        assert!(draft.contains("Full Name      : A. Candidate"));
        assert!(draft.contains("Current City   : London, United Kingdom"));
        assert!(draft.contains("Dear Hiring Manager, ..."));
        assert!(draft.contains("notice period       : 30 days"));
        assert!(draft.contains("Salary     : Not listed"));
        assert!(draft.contains("https://jobs.example.com/7"));
    }

    #[test]
    fn empty_profile_sections_degrade_gracefully() {
        let draft = generate_draft(&Profile::default(), &row(), "letter");
        assert!(draft.contains("(no static answers in profile)"));
        assert!(!draft.contains("Email"));
    }
}
