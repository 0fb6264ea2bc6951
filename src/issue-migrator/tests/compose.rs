mod common;

use common::{load_issue, load_tables, ParagraphBackend, TRACKER_URL};
use issue_migrator::compose::SECTION_SEPARATOR;
use issue_migrator::{ComposeOptions, Composer, IssueState, ResolvePolicy};
use std::sync::Arc;

fn composer(options: ComposeOptions) -> Composer {
    Composer::new(
        Arc::new(load_tables()),
        options,
        Arc::new(ParagraphBackend::default()),
    )
}

fn options() -> ComposeOptions {
    let mut options = ComposeOptions::new(TRACKER_URL);
    options
        .user_map
        .insert("bob".to_string(), "bob-gh".to_string());
    options
}

#[test]
fn composes_fixture_issue() {
    let document = composer(options()).compose(&load_issue(42)).unwrap();

    assert_eq!(document.source_id, 42);
    assert_eq!(document.title, "[Redmine #42] Crash on startup");
    assert_eq!(document.labels, vec!["imported", "feedback", "bug", "Core"]);
    assert_eq!(document.state, IssueState::Open);
    assert_eq!(document.assignee.as_deref(), Some("bob-gh"));
    assert_eq!(document.milestone.as_deref(), Some("2.5.0"));
    assert!(document.comments.is_empty());

    let sections: Vec<&str> = document.body.split(SECTION_SEPARATOR).collect();
    assert_eq!(sections.len(), 8);

    assert_eq!(
        sections[0],
        "    This issue has been migrated from Redmine: https://dev.example.org/issues/42\n\
         \n\
         \x20   Author: alice\n\
         \x20   Assignee: bob\n\
         \x20   Status: Feedback\n\
         \x20   Target Version: 2.5.0\n\
         \x20   Created: 2016-03-01 10:00:00 UTC\n\
         \x20   Last Update: 2016-03-04 09:15:00 UTC"
    );
    assert_eq!(sections[1], "Severity: High");
    assert_eq!(
        sections[2],
        "The daemon crashes right after start.\n\n\
         ```\n\
         #0 0x00007f main () at daemon.c:12\n\
         #1 0x00007e start () at init.c:40\n\
         ```\n\n\
         See [#12](https://dev.example.org/issues/12) for the earlier report."
    );
    assert_eq!(
        sections[3],
        "**Related Issues:**\n* Related to [#12](https://dev.example.org/issues/12)"
    );
    assert_eq!(
        sections[4],
        "**Attachments:**\n\
         * [crash.log](https://dev.example.org/attachments/download/9/crash.log) alice - 2016-03-01 10:05:00 UTC - Full log"
    );
    assert_eq!(
        sections[5],
        "Updated by bob on 2016-03-02 11:30:00 UTC\n\n\
         * **Status** changed from _New_ to _Feedback_\n\
         * **Assigned to** changed from _alice_ to _bob_\n\n\
         Can you attach the core dump?"
    );
    assert_eq!(
        sections[6],
        "Updated by alice on 2016-03-03 08:00:00 UTC\n\n\
         * **Severity** changed from _Low_ to _High_\n\
         * File added _crash.log_"
    );
    assert_eq!(sections[7], "Updated by alice on 2016-03-04 09:15:00 UTC");
}

#[test]
fn separate_comments_keep_journal_order() {
    let mut options = options();
    options.inline_comments = false;

    let document = composer(options).compose(&load_issue(42)).unwrap();

    assert_eq!(document.comments.len(), 3);
    assert!(document.comments[0].body.starts_with("Updated by bob"));
    assert_eq!(
        document.comments[2].body,
        "Updated by alice on 2016-03-04 09:15:00 UTC"
    );
    assert!(document
        .comments
        .windows(2)
        .all(|pair| pair[0].created_at <= pair[1].created_at));
    assert_eq!(document.body.split(SECTION_SEPARATOR).count(), 5);
}

#[test]
fn composition_is_byte_identical_across_runs() {
    let composer = composer(options());
    let issue = load_issue(42);

    let first = serde_json::to_string_pretty(&composer.compose(&issue).unwrap()).unwrap();
    let second = serde_json::to_string_pretty(&composer.compose(&issue).unwrap()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn document_memoizes_conversions() {
    let backend = Arc::new(ParagraphBackend::default());
    let composer = Composer::new(Arc::new(load_tables()), options(), backend.clone());
    let issue = load_issue(42);
    let document = composer.document(&issue);

    document.compose().unwrap();
    let parses = backend.parse_count();
    document.compose().unwrap();
    document.body().unwrap();

    // Description plus one note.
    assert_eq!(parses, 2);
    assert_eq!(backend.parse_count(), parses);
}

#[test]
fn malformed_detail_fails_only_that_issue() {
    let composer = composer(options());

    let error = composer.compose(&load_issue(43)).unwrap_err();

    assert!(error.to_string().contains("journal 200"));
    assert!(composer.compose(&load_issue(42)).is_ok());
}

#[test]
fn strict_references_fail_on_unknown_ids() {
    let mut issue = load_issue(42);
    issue.journals[0].details[1].new_value = Some("99".to_string());

    let lenient = composer(options()).compose(&issue).unwrap();
    assert!(lenient
        .body
        .contains("**Assigned to** changed from _alice_ to _99_"));

    let mut strict = options();
    strict.resolve_policy = ResolvePolicy::Strict;
    let error = composer(strict).compose(&issue).unwrap_err();
    assert_eq!(error.to_string(), "Unresolved user reference: 99");
}

#[test]
fn import_request_carries_state_and_comments() {
    let mut options = options();
    options.inline_comments = false;
    let document = composer(options).compose(&load_issue(42)).unwrap();

    let request = serde_json::to_value(document.import_request(Some(3))).unwrap();

    assert_eq!(request["issue"]["title"], "[Redmine #42] Crash on startup");
    assert_eq!(request["issue"]["closed"], false);
    assert_eq!(request["issue"]["milestone"], 3);
    assert_eq!(request["issue"]["assignee"], "bob-gh");
    assert!(request["issue"].get("closed_at").is_none());
    assert_eq!(request["comments"].as_array().unwrap().len(), 3);
}

#[test]
fn redirect_notice_detection() {
    let composer = composer(options());
    let mut issue = load_issue(42);
    assert!(!issue.has_redirect_notice("GitHub"));

    let notice = composer
        .renderer()
        .render_redirect_notice("GitHub", "https://github.com/acme/daemon/issues/7")
        .unwrap();
    issue.journals[2].notes = Some(notice);

    assert!(issue.has_redirect_notice("GitHub"));
}
