mod common;

use chrono::Utc;
use link_checker::domain::entities::{LinkResult, LinkState, SetStatus};
use link_checker::domain::probe::ProbeOutcome;
use link_checker::domain::repositories::{LinkSetRepository, StoreError};
use link_checker::infrastructure::persistence::FileSetRepository;
use link_checker::infrastructure::persistence::atomic_file;
use std::sync::Arc;
use tempfile::TempDir;

fn terminal(url: &str, reachable: bool) -> LinkResult {
    let outcome = if reachable {
        ProbeOutcome::reachable("ok")
    } else {
        ProbeOutcome::unreachable("unreachable")
    };
    LinkResult::from_probe(url, outcome, Utc::now())
}

fn urls(list: &[&str]) -> Vec<String> {
    list.iter().map(|u| u.to_string()).collect()
}

#[tokio::test]
async fn test_create_and_get() {
    let dir = TempDir::new().unwrap();
    let repo = common::open_repository(&dir).await;

    let created = repo
        .create_set(urls(&["https://a.com", "https://b.com"]))
        .await
        .unwrap();

    assert_eq!(created.id, 1);
    assert_eq!(created.status, SetStatus::Processing);
    assert!(created.results.is_empty());

    let loaded = repo.get_set(created.id).await.unwrap();
    assert_eq!(loaded, created);
    assert!(dir.path().join("sets").join("1.json").exists());
}

#[tokio::test]
async fn test_create_empty_set_fails() {
    let dir = TempDir::new().unwrap();
    let repo = common::open_repository(&dir).await;

    let result = repo.create_set(vec![]).await;

    assert!(matches!(result, Err(StoreError::EmptyInput)));
    assert!(!dir.path().join("meta.json").exists());
}

#[tokio::test]
async fn test_get_missing_set() {
    let dir = TempDir::new().unwrap();
    let repo = common::open_repository(&dir).await;

    assert!(matches!(
        repo.get_set(7).await,
        Err(StoreError::NotFound(7))
    ));
}

#[tokio::test]
async fn test_update_recomputes_status() {
    let dir = TempDir::new().unwrap();
    let repo = common::open_repository(&dir).await;
    let set = repo
        .create_set(urls(&["https://a.com", "https://b.com", "https://a.com"]))
        .await
        .unwrap();

    repo.update_link_result(set.id, "https://a.com", terminal("https://a.com", true))
        .await
        .unwrap();
    assert_eq!(repo.get_set(set.id).await.unwrap().status, SetStatus::Processing);

    repo.update_link_result(set.id, "https://b.com", LinkResult::processing("https://b.com"))
        .await
        .unwrap();
    assert_eq!(repo.get_set(set.id).await.unwrap().status, SetStatus::Processing);

    repo.update_link_result(set.id, "https://b.com", terminal("https://b.com", false))
        .await
        .unwrap();

    let done = repo.get_set(set.id).await.unwrap();
    assert_eq!(done.status, SetStatus::Done);
    assert!(done.updated_at >= done.created_at);
}

#[tokio::test]
async fn test_update_missing_set() {
    let dir = TempDir::new().unwrap();
    let repo = common::open_repository(&dir).await;

    let result = repo
        .update_link_result(3, "https://a.com", terminal("https://a.com", true))
        .await;

    assert!(matches!(result, Err(StoreError::NotFound(3))));
}

#[tokio::test]
async fn test_terminal_result_is_kept() {
    let dir = TempDir::new().unwrap();
    let repo = common::open_repository(&dir).await;
    let set = repo.create_set(urls(&["https://a.com"])).await.unwrap();

    let first = repo
        .update_link_result(set.id, "https://a.com", terminal("https://a.com", true))
        .await
        .unwrap();

    let after_processing = repo
        .update_link_result(set.id, "https://a.com", LinkResult::processing("https://a.com"))
        .await
        .unwrap();
    let after_flip = repo
        .update_link_result(set.id, "https://a.com", terminal("https://a.com", false))
        .await
        .unwrap();

    assert_eq!(after_processing, first);
    assert_eq!(after_flip, first);

    let stored = repo.get_set(set.id).await.unwrap();
    assert_eq!(stored.results["https://a.com"].state, LinkState::Available);
    assert_eq!(stored.results["https://a.com"].checked_at, first.checked_at);
    assert_eq!(stored.status, SetStatus::Done);
}

#[tokio::test]
async fn test_concurrent_updates_are_not_lost() {
    let dir = TempDir::new().unwrap();
    let repo = common::open_repository(&dir).await;
    let links: Vec<String> = (0..25).map(|i| format!("https://site{i}.com")).collect();
    let id = repo.create_set(links.clone()).await.unwrap().id;

    let mut tasks = tokio::task::JoinSet::new();
    for url in links.clone() {
        let repo = repo.clone();
        tasks.spawn(async move {
            repo.update_link_result(id, &url, LinkResult::processing(&url))
                .await
                .unwrap();
            repo.update_link_result(id, &url, terminal(&url, true))
                .await
                .unwrap();
        });
    }
    while let Some(joined) = tasks.join_next().await {
        joined.unwrap();
    }

    let stored = repo.get_set(id).await.unwrap();
    assert_eq!(stored.results.len(), links.len());
    assert_eq!(stored.status, SetStatus::Done);
}

#[tokio::test]
async fn test_ids_survive_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let repo = common::open_repository(&dir).await;
        let set = repo.create_set(urls(&["https://a.com"])).await.unwrap();
        repo.update_link_result(set.id, "https://a.com", terminal("https://a.com", false))
            .await
            .unwrap();
        repo.create_set(urls(&["https://b.com"])).await.unwrap();
    }

    let repo = common::open_repository(&dir).await;
    let next = repo.create_set(urls(&["https://c.com"])).await.unwrap();
    assert_eq!(next.id, 3);

    let first = repo.get_set(1).await.unwrap();
    assert_eq!(first.results["https://a.com"].state, LinkState::NotAvailable);
    assert_eq!(first.status, SetStatus::Done);
}

#[tokio::test]
async fn test_uncommitted_write_leaves_record_intact() {
    let dir = TempDir::new().unwrap();
    let repo = common::open_repository(&dir).await;
    let set = repo
        .create_set(urls(&["https://a.com", "https://b.com"]))
        .await
        .unwrap();
    let before = repo.get_set(set.id).await.unwrap();

    // Crash between the temp write and the rename.
    let record = dir.path().join("sets").join(format!("{}.json", set.id));
    let _staged = atomic_file::stage(&record, b"{\"id\": 1, \"links\": [").await.unwrap();
    drop(repo);

    let repo = Arc::new(FileSetRepository::open(dir.path()).await.unwrap());
    assert_eq!(repo.get_set(set.id).await.unwrap(), before);

    let leftovers = repo.leftover_temp_files().await.unwrap();
    assert_eq!(leftovers.len(), 1);
    assert!(atomic_file::is_temp_file(&leftovers[0]));

    let unfinished = repo.list_unfinished().await.unwrap();
    assert_eq!(unfinished.len(), 1);
    assert_eq!(unfinished[0].id, set.id);
}

#[tokio::test]
async fn test_list_unfinished_skips_corrupt_records() {
    let dir = TempDir::new().unwrap();
    let repo = common::open_repository(&dir).await;
    let pending = repo.create_set(urls(&["https://a.com"])).await.unwrap();
    let done = repo.create_set(urls(&["https://b.com"])).await.unwrap();
    repo.update_link_result(done.id, "https://b.com", terminal("https://b.com", true))
        .await
        .unwrap();

    std::fs::write(dir.path().join("sets").join("9.json"), b"not json").unwrap();

    let unfinished = repo.list_unfinished().await.unwrap();
    assert_eq!(unfinished.len(), 1);
    assert_eq!(unfinished[0].id, pending.id);

    assert!(matches!(repo.get_set(9).await, Err(StoreError::Corrupt { .. })));
}

#[tokio::test]
async fn test_stored_status_is_not_trusted() {
    let dir = TempDir::new().unwrap();
    let repo = common::open_repository(&dir).await;
    let set = repo.create_set(urls(&["https://a.com"])).await.unwrap();

    let path = dir.path().join("sets").join(format!("{}.json", set.id));
    let raw = std::fs::read_to_string(&path).unwrap();
    std::fs::write(&path, raw.replace("\"processing\"", "\"done\"")).unwrap();

    let loaded = repo.get_set(set.id).await.unwrap();
    assert_eq!(loaded.status, SetStatus::Processing);
    assert_eq!(repo.list_unfinished().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_sets_preserves_order() {
    let dir = TempDir::new().unwrap();
    let repo = common::open_repository(&dir).await;
    let a = repo.create_set(urls(&["https://a.com"])).await.unwrap();
    let b = repo.create_set(urls(&["https://b.com"])).await.unwrap();

    let sets = repo.list_sets(&[b.id, a.id, b.id]).await.unwrap();

    let ids: Vec<i64> = sets.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![b.id, a.id, b.id]);
}

#[tokio::test]
async fn test_list_sets_with_missing_id_fails() {
    let dir = TempDir::new().unwrap();
    let repo = common::open_repository(&dir).await;
    let a = repo.create_set(urls(&["https://a.com"])).await.unwrap();

    let result = repo.list_sets(&[a.id, 999_999]).await;

    assert!(matches!(result, Err(StoreError::NotFound(999_999))));
}
