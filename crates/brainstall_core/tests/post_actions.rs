use brainstall_core::{
    DocumentRepository, MemoryVaultStore, PostError, PostService, VaultDocumentRepository,
    VaultStore,
};
use std::time::{Duration, SystemTime};

const PATH: &str = "Archives/Notifications/2025/2025-03/2025-03-29/20250329_080200_memo_idea.md";
const TEXT: &str = "---\ntype: memo\ncontext: \"idea\"\ncreated: \"2025-03-29T08:02:00.000+09:00\"\n---\n\nidea body\n";

fn seeded() -> MemoryVaultStore {
    let store = MemoryVaultStore::new();
    let repo = VaultDocumentRepository::new(&store);
    repo.ensure_folder("Archives/Notifications/2025/2025-03/2025-03-29")
        .unwrap();
    repo.create(PATH, TEXT).unwrap();
    store
}

#[test]
fn archive_and_unarchive_touch_only_metadata() {
    let store = seeded();
    let repo = VaultDocumentRepository::new(&store);
    let service = PostService::new(repo);

    service.archive(PATH).unwrap();
    let archived = repo.read(PATH).unwrap();
    assert!(archived.frontmatter().is_archived());
    assert_eq!(archived.frontmatter().get_str("status"), Some("archived"));
    assert_eq!(archived.body(), "idea body\n");

    service.unarchive(PATH).unwrap();
    let restored = repo.read(PATH).unwrap();
    assert!(!restored.frontmatter().is_archived());
    assert_eq!(restored.frontmatter().get_str("status"), Some("active"));
    assert!(restored.text.starts_with("---\ntype: memo\ncontext: \"idea\"\n"));
}

#[test]
fn repeated_archive_skips_the_write() {
    let store = seeded();
    let repo = VaultDocumentRepository::new(&store);
    let service = PostService::new(repo);

    service.archive(PATH).unwrap();
    let first = repo.read(PATH).unwrap().text;
    let marker = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
    store.set_modified(PATH, marker).unwrap();

    service.archive(PATH).unwrap();
    assert_eq!(repo.read(PATH).unwrap().text, first);
    assert_eq!(store.modified_at(PATH).unwrap(), marker);
}

#[test]
fn toggle_pin_flips_state() {
    let store = seeded();
    let repo = VaultDocumentRepository::new(&store);
    let service = PostService::new(repo);

    assert!(service.toggle_pin(PATH).unwrap());
    assert!(repo.read(PATH).unwrap().frontmatter().is_pinned());
    assert!(!service.toggle_pin(PATH).unwrap());
    assert!(!repo.read(PATH).unwrap().frontmatter().is_pinned());
}

#[test]
fn star_clicks_follow_cycle() {
    let store = seeded();
    let repo = VaultDocumentRepository::new(&store);
    let service = PostService::new(repo);

    assert_eq!(service.click_star(PATH, 3).unwrap(), 3);
    assert_eq!(service.click_star(PATH, 3).unwrap(), 2);
    assert_eq!(service.click_star(PATH, 5).unwrap(), 5);
    assert_eq!(service.click_star(PATH, 1).unwrap(), 1);
    assert_eq!(service.click_star(PATH, 1).unwrap(), 0);
    assert_eq!(repo.read(PATH).unwrap().frontmatter().priority(), 0);
    assert!(repo.read(PATH).unwrap().text.contains("\npriority: 0\n"));
}

#[test]
fn delete_removes_the_file() {
    let store = seeded();
    let repo = VaultDocumentRepository::new(&store);
    let service = PostService::new(repo);

    service.delete(PATH).unwrap();
    assert!(!repo.exists(PATH).unwrap());
    assert!(matches!(service.delete(PATH), Err(PostError::NotFound(_))));
}

#[test]
fn vanished_document_reports_not_found() {
    let store = MemoryVaultStore::new();
    let service = PostService::new(VaultDocumentRepository::new(&store));
    assert!(matches!(service.archive("gone.md"), Err(PostError::NotFound(_))));
    assert!(matches!(service.toggle_pin("gone.md"), Err(PostError::NotFound(_))));
    assert!(matches!(service.share_text("gone.md"), Err(PostError::NotFound(_))));
}

#[test]
fn share_text_uses_base_name_and_body() {
    let store = seeded();
    let service = PostService::new(VaultDocumentRepository::new(&store));
    assert_eq!(
        service.share_text(PATH).unwrap(),
        "[[20250329_080200_memo_idea]]\n\nidea body"
    );
}

#[test]
fn plain_document_gets_a_block_prepended() {
    let store = MemoryVaultStore::new();
    let repo = VaultDocumentRepository::new(&store);
    repo.create("plain.md", "just text").unwrap();
    let service = PostService::new(repo);

    service.toggle_pin("plain.md").unwrap();
    assert_eq!(
        repo.read("plain.md").unwrap().text,
        "---\npinned: true\n---\n\njust text"
    );
}
