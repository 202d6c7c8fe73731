use brainstall_core::{
    evaluate, run_query, DateSource, Document, DocumentRepository, FsVaultStore, MemoryVaultStore,
    QueryState, VaultDocumentRepository,
};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeSet;

const BASE: &str = "Archives/Notifications";

fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn doc(name: &str, text: &str) -> Document {
    Document::new(format!("{BASE}/{name}"), text, at(1, 0))
}

fn created(day: u32, hour: u32) -> String {
    format!("2025-03-{day:02}T{hour:02}:00:00.000+09:00")
}

fn corpus() -> Vec<Document> {
    vec![
        doc(
            "a.md",
            &format!(
                "---\ntype: memo\ncontext: \"older pinned\"\ncreated: \"{}\"\npinned: true\n---\n\n#Rust notes",
                created(2, 9)
            ),
        ),
        doc(
            "b.md",
            &format!(
                "---\ntype: deepDive\ncreated: \"{}\"\npriority: 3\n---\n\nnote #プロジェクト and #Test",
                created(5, 9)
            ),
        ),
        doc(
            "c.md",
            &format!(
                "---\ntype: memo\ncreated: \"{}\"\narchived: true\nstatus: archived\n---\n\n#hidden",
                created(4, 9)
            ),
        ),
        doc("20250303_101500_memo_x.md", "plain memo without metadata"),
    ]
}

fn paths(state: &QueryState) -> Vec<String> {
    evaluate(&corpus(), state)
        .items
        .into_iter()
        .map(|item| item.path.rsplit('/').next().unwrap_or_default().to_string())
        .collect()
}

#[test]
fn pinned_documents_sort_before_newer_unpinned_ones() {
    assert_eq!(
        paths(&QueryState::new()),
        vec!["a.md", "b.md", "20250303_101500_memo_x.md"]
    );
}

#[test]
fn archived_documents_are_hidden_unless_requested() {
    let state = QueryState {
        show_archived: true,
        ..QueryState::new()
    };
    assert_eq!(
        paths(&state),
        vec!["a.md", "b.md", "c.md", "20250303_101500_memo_x.md"]
    );
}

#[test]
fn legacy_status_alone_marks_archived() {
    let docs = vec![doc("old.md", "---\nstatus: archived\n---\n\nx")];
    assert_eq!(evaluate(&docs, &QueryState::new()).visible_count, 0);
}

#[test]
fn hashtag_keyword_matches_case_insensitively() {
    let state = QueryState {
        search_keyword: Some("#RUST".to_string()),
        ..QueryState::new()
    };
    assert_eq!(paths(&state), vec!["a.md"]);
}

#[test]
fn date_filter_uses_effective_date_fallback_chain() {
    let state = QueryState {
        search_date: Some(at(3, 0).date()),
        ..QueryState::new()
    };
    let outcome = evaluate(&corpus(), &state);
    assert_eq!(outcome.visible_count, 1);
    assert_eq!(outcome.items[0].date_source, DateSource::PathStamp);
    assert_eq!(outcome.items[0].effective_date, at(3, 10) + chrono::Duration::minutes(15));
}

#[test]
fn type_filter_is_a_literal_substring_test() {
    let state = QueryState {
        search_type: Some("deepDive".to_string()),
        ..QueryState::new()
    };
    assert_eq!(paths(&state), vec!["b.md"]);
}

#[test]
fn priority_filter_defaults_missing_priority_to_zero() {
    let state = QueryState {
        selected_priorities: BTreeSet::from([0]),
        ..QueryState::new()
    };
    assert_eq!(paths(&state), vec!["a.md", "20250303_101500_memo_x.md"]);

    let state = QueryState {
        selected_priorities: BTreeSet::from([3, 5]),
        ..QueryState::new()
    };
    assert_eq!(paths(&state), vec!["b.md"]);
}

#[test]
fn side_outputs_cover_the_unfiltered_corpus() {
    let state = QueryState {
        search_type: Some("deepDive".to_string()),
        ..QueryState::new()
    };
    let outcome = evaluate(&corpus(), &state);
    assert_eq!(outcome.visible_count, 1);
    assert_eq!(
        outcome.hashtags,
        vec!["#hidden", "#rust", "#test", "#プロジェクト"]
    );
    assert_eq!(
        outcome.dates,
        vec![at(5, 0).date(), at(4, 0).date(), at(3, 0).date(), at(2, 0).date()]
    );
}

#[test]
fn run_query_reads_only_the_base_folder() {
    let store = MemoryVaultStore::new();
    let repo = VaultDocumentRepository::new(&store);
    repo.ensure_folder(BASE).unwrap();
    repo.ensure_folder("Topics").unwrap();
    repo.create(&format!("{BASE}/one.md"), "---\ntype: memo\n---\n\none")
        .unwrap();
    repo.create("Topics/Plan A.md", "---\ntype: memo\n---\n\nplan")
        .unwrap();

    let outcome = run_query(&repo, BASE, &QueryState::new()).unwrap();
    assert_eq!(outcome.visible_count, 1);
    assert_eq!(outcome.items[0].path, format!("{BASE}/one.md"));
    assert_eq!(outcome.items[0].doc_type.as_deref(), Some("memo"));
}

#[test]
fn unreadable_documents_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsVaultStore::open(dir.path()).unwrap();
    let repo = VaultDocumentRepository::new(&store);
    repo.ensure_folder(BASE).unwrap();
    repo.create(&format!("{BASE}/ok.md"), "fine").unwrap();
    std::fs::write(
        dir.path().join("Archives/Notifications/broken.md"),
        [0xff, 0xfe, 0x00],
    )
    .unwrap();

    let outcome = run_query(&repo, BASE, &QueryState::new()).unwrap();
    assert_eq!(outcome.visible_count, 1);
    assert!(outcome.items[0].path.ends_with("ok.md"));
}
