//! End-to-end engine scenarios over the scripted page double.

use std::sync::Arc;

use answer_resolver::{AnswerResolver, RuleTable};
use apply_flow::{ApplyEngine, AttemptSpec};
use applyflow_core_types::Outcome;
use browser_port::{
    ControlKind, ControlRef, FieldGroup, FormField, NavKind, PortError, ScriptedPage, ScriptedStep,
};

fn rules() -> RuleTable {
    RuleTable::new()
        .with_rule("notice period", "30 days")
        .with_rule("require sponsorship", "Yes")
        .with_rule("sponsorship", "Yes")
        .with_rule("salary", "Open to discussion")
        .with_rule("terms", "Yes")
        .with_rule("relocate", "No")
}

fn engine() -> ApplyEngine {
    let log_dir = tempfile::tempdir().unwrap().into_path();
    ApplyEngine::new(Arc::new(AnswerResolver::new(rules())), log_dir)
}

fn spec() -> AttemptSpec {
    AttemptSpec::new("https://jobs.example.com/123", "Rust Engineer", "Acme")
}

fn text_field(label: &str) -> FormField {
    FormField {
        label: label.to_string(),
        kind: ControlKind::Text,
        options: Vec::new(),
    }
}

#[tokio::test]
async fn single_step_submit_returns_applied_and_logs_submission() {
    let page = ScriptedPage::new()
        .with_step(ScriptedStep::new().with_nav(NavKind::Submit, "Submit application"));
    let log_dir = tempfile::tempdir().unwrap();
    let engine = ApplyEngine::new(Arc::new(AnswerResolver::new(rules())), log_dir.path());

    let outcome = engine.run(&page, &spec()).await;

    assert_eq!(outcome, Outcome::Applied);
    assert_eq!(outcome.as_wire(), "applied");
    assert!(page.dismissed());

    let entry = std::fs::read_dir(log_dir.path())
        .unwrap()
        .next()
        .unwrap()
        .unwrap();
    let log = std::fs::read_to_string(entry.path()).unwrap();
    assert!(log.contains("Rust Engineer @ Acme"));
    assert!(log.contains("-> attempt "));
    assert!(log.contains("submitted"));
}

#[tokio::test]
async fn failed_attempt_still_flushes_its_log() {
    let page = ScriptedPage::new().with_entry_action(false);
    let log_dir = tempfile::tempdir().unwrap();
    let engine = ApplyEngine::new(Arc::new(AnswerResolver::new(rules())), log_dir.path());

    let outcome = engine.run(&page, &spec()).await;

    assert_eq!(outcome, Outcome::Skipped);
    let entry = std::fs::read_dir(log_dir.path())
        .unwrap()
        .next()
        .unwrap()
        .unwrap();
    let log = std::fs::read_to_string(entry.path()).unwrap();
    assert!(log.contains("external application"));
}

#[tokio::test]
async fn attempt_ids_differ_between_runs() {
    let mut ids = Vec::new();
    for _ in 0..2 {
        let log_dir = tempfile::tempdir().unwrap();
        let engine = ApplyEngine::new(Arc::new(AnswerResolver::new(rules())), log_dir.path());
        let page = ScriptedPage::new()
            .with_step(ScriptedStep::new().with_nav(NavKind::Submit, "Submit application"));
        engine.run(&page, &spec()).await;

        let entry = std::fs::read_dir(log_dir.path())
            .unwrap()
            .next()
            .unwrap()
            .unwrap();
        let log = std::fs::read_to_string(entry.path()).unwrap();
        let id = log
            .lines()
            .find_map(|line| line.trim().strip_prefix("-> attempt ").map(str::to_string))
            .unwrap();
        ids.push(id);
    }
    assert_ne!(ids[0], ids[1]);
}

#[tokio::test]
async fn three_step_form_advances_then_applies() {
    let page = ScriptedPage::new()
        .with_step(ScriptedStep::new().with_nav(NavKind::Next, "Next"))
        .with_step(ScriptedStep::new().with_nav(NavKind::Next, "Next"))
        .with_step(ScriptedStep::new().with_nav(NavKind::Submit, "Submit application"));

    let outcome = engine().run(&page, &spec()).await;

    assert_eq!(outcome, Outcome::Applied);
    assert_eq!(
        page.nav_clicks(),
        vec!["Next", "Next", "Submit application"]
    );
}

#[tokio::test]
async fn review_step_counts_as_advance() {
    let page = ScriptedPage::new()
        .with_step(ScriptedStep::new().with_nav(NavKind::Review, "Review your application"))
        .with_step(ScriptedStep::new().with_nav(NavKind::Submit, "Submit application"));

    assert_eq!(engine().run(&page, &spec()).await, Outcome::Applied);
}

#[tokio::test]
async fn dry_run_stops_after_entry_without_touching_fields() {
    let page = ScriptedPage::new().with_step(
        ScriptedStep::new()
            .with_group(
                FieldGroup::labelled("Notice period")
                    .with_control(text_field("Notice period"), ControlRef(1)),
            )
            .with_nav(NavKind::Submit, "Submit application"),
    );

    let outcome = engine().run(&page, &spec().dry_run(true)).await;

    assert_eq!(outcome, Outcome::DryRun);
    assert_eq!(outcome.as_wire(), "dry_run");
    assert!(page.entry_clicked());
    assert_eq!(page.mutation_count(), 0);
    assert!(page.nav_clicks().is_empty());
    assert!(page.dismissed());
}

#[tokio::test]
async fn missing_entry_action_skips_without_opening_anything() {
    let page = ScriptedPage::new().with_entry_action(false);

    let outcome = engine().run(&page, &spec()).await;

    assert_eq!(outcome, Outcome::Skipped);
    assert!(!page.entry_clicked());
    assert_eq!(page.mutation_count(), 0);
    assert!(!page.dismissed());
}

#[tokio::test]
async fn dialog_never_opening_skips() {
    let page = ScriptedPage::new().with_dialog(false);
    assert_eq!(engine().run(&page, &spec()).await, Outcome::Skipped);
}

#[tokio::test]
async fn dialog_without_form_content_skips() {
    let page = ScriptedPage::new().with_form_content(false);
    let outcome = engine().run(&page, &spec()).await;
    assert_eq!(outcome, Outcome::Skipped);
    assert!(page.dismissed());
}

#[tokio::test]
async fn rule_matched_text_field_is_filled_verbatim() {
    let page = ScriptedPage::new().with_step(
        ScriptedStep::new()
            .with_group(
                FieldGroup::labelled("Notice period")
                    .with_control(text_field("Notice period"), ControlRef(4)),
            )
            .with_nav(NavKind::Submit, "Submit application"),
    );

    assert_eq!(engine().run(&page, &spec()).await, Outcome::Applied);
    assert_eq!(page.filled(), vec![(4, "30 days".to_string())]);
}

#[tokio::test]
async fn control_without_own_label_uses_group_label() {
    let page = ScriptedPage::new().with_step(
        ScriptedStep::new()
            .with_group(
                FieldGroup::labelled("Notice period").with_control(text_field(""), ControlRef(2)),
            )
            .with_nav(NavKind::Submit, "Submit application"),
    );

    engine().run(&page, &spec()).await;
    assert_eq!(page.filled(), vec![(2, "30 days".to_string())]);
}

#[tokio::test]
async fn select_prefers_matching_option_then_safe_default() {
    let matching = FormField {
        label: "Do you require sponsorship?".to_string(),
        kind: ControlKind::Select,
        options: vec![
            "Select an option".to_string(),
            "Yes".to_string(),
            "No".to_string(),
        ],
    };
    let unmatched = FormField {
        label: "Expected salary band".to_string(),
        kind: ControlKind::Select,
        options: vec![
            "Select an option".to_string(),
            "30-40k".to_string(),
            "40-50k".to_string(),
        ],
    };
    let page = ScriptedPage::new().with_step(
        ScriptedStep::new()
            .with_group(
                FieldGroup::labelled("Sponsorship").with_control(matching, ControlRef(1)),
            )
            .with_group(FieldGroup::labelled("Salary").with_control(unmatched, ControlRef(2)))
            .with_nav(NavKind::Submit, "Submit application"),
    );

    engine().run(&page, &spec()).await;

    // "Yes" matches option 1; "Open to discussion" matches nothing and
    // falls back to the first real option.
    assert_eq!(page.selected(), vec![(1, 1), (2, 1)]);
}

#[tokio::test]
async fn checkbox_is_checked_only_for_truthy_answers() {
    let agree = FormField {
        label: "I accept the terms".to_string(),
        kind: ControlKind::Checkbox,
        options: Vec::new(),
    };
    let relocate = FormField {
        label: "Willing to relocate".to_string(),
        kind: ControlKind::Checkbox,
        options: Vec::new(),
    };
    let page = ScriptedPage::new().with_step(
        ScriptedStep::new()
            .with_group(FieldGroup::labelled("Terms").with_control(agree, ControlRef(1)))
            .with_group(FieldGroup::labelled("Relocation").with_control(relocate, ControlRef(2)))
            .with_nav(NavKind::Submit, "Submit application"),
    );

    engine().run(&page, &spec()).await;

    // Rule "terms" resolves "Yes", rule "relocate" resolves "No".
    assert_eq!(page.checked(), vec![(1, true)]);
}

#[tokio::test]
async fn radio_group_selects_overlapping_option() {
    let page = ScriptedPage::new().with_step(
        ScriptedStep::new()
            .with_group(
                FieldGroup::labelled("Do you require sponsorship?")
                    .with_radio("Yes", ControlRef(11))
                    .with_radio("No", ControlRef(12)),
            )
            .with_nav(NavKind::Submit, "Submit application"),
    );

    engine().run(&page, &spec()).await;
    assert_eq!(page.clicked_controls(), vec![11]);
}

#[tokio::test]
async fn radio_group_defaults_to_first_option_when_nothing_overlaps() {
    let page = ScriptedPage::new().with_step(
        ScriptedStep::new()
            .with_group(
                FieldGroup::labelled("Do you require sponsorship?")
                    .with_radio("Option A", ControlRef(21))
                    .with_radio("Option B", ControlRef(22)),
            )
            .with_nav(NavKind::Submit, "Submit application"),
    );

    engine().run(&page, &spec()).await;
    assert_eq!(page.clicked_controls(), vec![21]);
}

#[tokio::test]
async fn cover_letter_is_clipped_to_destination_limit() {
    let page = ScriptedPage::new().with_step(
        ScriptedStep::new()
            .with_cover_letter_field(ControlRef(9))
            .with_nav(NavKind::Submit, "Submit application"),
    );
    let long_letter = "x".repeat(4000);

    engine()
        .run(&page, &spec().with_cover_letter(long_letter))
        .await;

    let filled = page.filled();
    assert_eq!(filled.len(), 1);
    assert_eq!(filled[0].0, 9);
    assert_eq!(filled[0].1.len(), 2900);
}

#[tokio::test]
async fn resume_is_uploaded_when_file_exists() {
    let resume = tempfile::NamedTempFile::new().unwrap();
    let page = ScriptedPage::new().with_step(
        ScriptedStep::new()
            .with_file_input()
            .with_nav(NavKind::Submit, "Submit application"),
    );

    engine()
        .run(&page, &spec().with_resume(resume.path()))
        .await;

    assert_eq!(page.uploads(), vec![resume.path().to_path_buf()]);
}

#[tokio::test]
async fn missing_resume_file_is_not_uploaded() {
    let page = ScriptedPage::new().with_step(
        ScriptedStep::new()
            .with_file_input()
            .with_nav(NavKind::Submit, "Submit application"),
    );

    engine()
        .run(&page, &spec().with_resume("/nonexistent/resume.pdf"))
        .await;

    assert!(page.uploads().is_empty());
}

#[tokio::test]
async fn endless_next_terminates_after_exactly_max_steps() {
    let page =
        ScriptedPage::new().with_step(ScriptedStep::new().with_nav(NavKind::Next, "Next"));

    let outcome = engine().run(&page, &spec()).await;

    assert_eq!(outcome.as_wire(), "error:no_submit_reached");
    assert_eq!(page.nav_clicks().len(), 10);
    assert!(page.dismissed());
}

#[tokio::test]
async fn step_without_any_button_stalls_immediately() {
    let page = ScriptedPage::new().with_step(ScriptedStep::new());

    let outcome = engine().run(&page, &spec()).await;

    assert_eq!(outcome.as_wire(), "error:no_submit_reached");
    assert!(page.nav_clicks().is_empty());
}

#[tokio::test]
async fn navigation_timeout_maps_to_error_timeout() {
    let page = ScriptedPage::new().with_goto_error(PortError::Timeout(30_000));

    let outcome = engine().run(&page, &spec()).await;

    assert_eq!(outcome.as_wire(), "error:timeout");
}

#[tokio::test]
async fn protocol_fault_maps_to_truncated_error_reason() {
    let long_message = "browser protocol error: ".to_string() + &"z".repeat(200);
    let page = ScriptedPage::new().with_goto_error(PortError::Protocol("z".repeat(200)));

    let outcome = engine().run(&page, &spec()).await;

    match outcome {
        Outcome::Error(reason) => {
            assert!(reason.len() <= 80);
            assert!(long_message.starts_with(&reason[..10]));
        }
        other => panic!("expected error outcome, got {other}"),
    }
}
