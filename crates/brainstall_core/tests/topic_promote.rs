use brainstall_core::{
    DocumentRepository, DocumentType, FixedClock, MemoryVaultStore, PromoteKind, Settings,
    TopicError, TopicService, VaultDocumentRepository,
};
use chrono::NaiveDate;

const SOURCE_DIR: &str = "Archives/Notifications/2025/2025-03/2025-03-29";

fn clock() -> FixedClock {
    FixedClock(
        NaiveDate::from_ymd_opt(2025, 3, 29)
            .unwrap()
            .and_hms_opt(8, 2, 0)
            .unwrap(),
    )
}

fn source(context: &str, body: &str) -> String {
    format!("---\ntype: deepDive\ncontext: \"{context}\"\ncreated: \"2025-03-29T08:00:00.000+09:00\"\n---\n\n{body}")
}

#[test]
fn first_promotion_copies_source_verbatim() {
    let store = MemoryVaultStore::new();
    let repo = VaultDocumentRepository::new(&store);
    repo.ensure_folder(SOURCE_DIR).unwrap();
    let source_path = format!("{SOURCE_DIR}/a.md");
    let text = source("Plan A", "first body\n");
    repo.create(&source_path, &text).unwrap();

    let service = TopicService::new(repo, clock(), Settings::default());
    let outcome = service.promote(&source_path).unwrap();

    assert_eq!(outcome.topic_path, "Topics/Plan A.md");
    assert_eq!(outcome.kind, PromoteKind::Created);
    assert_eq!(repo.read("Topics/Plan A.md").unwrap().text, text);
    assert!(repo.exists(&source_path).unwrap());
}

#[test]
fn second_promotion_appends_stripped_body_to_one_file() {
    let store = MemoryVaultStore::new();
    let repo = VaultDocumentRepository::new(&store);
    repo.ensure_folder(SOURCE_DIR).unwrap();
    let first = source("Plan A", "first body\n");
    repo.create(&format!("{SOURCE_DIR}/a.md"), &first).unwrap();
    repo.create(
        &format!("{SOURCE_DIR}/b.md"),
        &source("Plan A", "\n  second body  \n"),
    )
    .unwrap();

    let service = TopicService::new(repo, clock(), Settings::default());
    service.promote(&format!("{SOURCE_DIR}/a.md")).unwrap();
    let outcome = service.promote(&format!("{SOURCE_DIR}/b.md")).unwrap();

    assert_eq!(outcome.kind, PromoteKind::Updated);
    let topic = repo.read("Topics/Plan A.md").unwrap();
    assert_eq!(topic.text, format!("{first}\n\n---\n\nsecond body"));
    assert_eq!(topic.frontmatter().context(), Some("Plan A"));
    assert_eq!(repo.list_by_prefix("Topics").unwrap().len(), 1);
}

#[test]
fn reserved_characters_and_missing_context_shape_the_key() {
    let store = MemoryVaultStore::new();
    let repo = VaultDocumentRepository::new(&store);
    repo.ensure_folder(SOURCE_DIR).unwrap();
    repo.create(&format!("{SOURCE_DIR}/a.md"), &source("Q1: in/out?", "x"))
        .unwrap();
    repo.create(&format!("{SOURCE_DIR}/b.md"), "no metadata at all")
        .unwrap();

    let service = TopicService::new(repo, clock(), Settings::default());
    let keyed = service.promote(&format!("{SOURCE_DIR}/a.md")).unwrap();
    let fallback = service.promote(&format!("{SOURCE_DIR}/b.md")).unwrap();

    assert_eq!(keyed.topic_path, "Topics/Q1- in-out-.md");
    assert_eq!(fallback.topic_path, "Topics/Deep Dive.md");
}

#[test]
fn each_promotion_writes_a_notification() {
    let store = MemoryVaultStore::new();
    let repo = VaultDocumentRepository::new(&store);
    repo.ensure_folder(SOURCE_DIR).unwrap();
    repo.create(&format!("{SOURCE_DIR}/a.md"), &source("Plan A", "x"))
        .unwrap();

    let service = TopicService::new(repo, clock(), Settings::default());
    let created = service.promote(&format!("{SOURCE_DIR}/a.md")).unwrap();
    let updated = service.promote(&format!("{SOURCE_DIR}/a.md")).unwrap();

    let created_path = created.notification_path.unwrap();
    let updated_path = updated.notification_path.unwrap();
    assert_eq!(created_path, format!("{SOURCE_DIR}/20250329_080200.md"));
    assert_eq!(updated_path, format!("{SOURCE_DIR}/20250329_080200-1.md"));

    let notice = repo.read(&created_path).unwrap();
    assert_eq!(
        notice.frontmatter().doc_type(),
        Some(DocumentType::TopicNotification)
    );
    assert_eq!(notice.frontmatter().links(), ["[[Plan A]]"]);
    assert_eq!(notice.body(), "New topic [[Plan A]] was created.");
    assert_eq!(
        repo.read(&updated_path).unwrap().body(),
        "Topic [[Plan A]] was updated."
    );
}

#[test]
fn iso_setting_changes_notification_stamp() {
    let store = MemoryVaultStore::new();
    let repo = VaultDocumentRepository::new(&store);
    repo.ensure_folder(SOURCE_DIR).unwrap();
    repo.create(&format!("{SOURCE_DIR}/a.md"), &source("Plan A", "x"))
        .unwrap();
    let settings = Settings {
        timestamp_format: "ISO".to_string(),
        ..Settings::default()
    };

    let outcome = TopicService::new(repo, clock(), settings)
        .promote(&format!("{SOURCE_DIR}/a.md"))
        .unwrap();
    let name = outcome.notification_path.unwrap();
    let name = name.rsplit('/').next().unwrap();
    assert!(name.starts_with("2025-03-"));
    assert!(name.ends_with(".md"));
    assert!(!name.contains(':'));
}

#[test]
fn vanished_source_is_reported_without_writes() {
    let store = MemoryVaultStore::new();
    let repo = VaultDocumentRepository::new(&store);
    let service = TopicService::new(repo, clock(), Settings::default());

    let err = service.promote("Archives/gone.md").unwrap_err();
    assert!(matches!(err, TopicError::SourceNotFound(_)));
    assert!(repo.list_all().unwrap().is_empty());
}
