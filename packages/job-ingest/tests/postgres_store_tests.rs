//! PostgresStore against a real database.
//!
//! Requires Docker: `cargo test -p job-ingest --features postgres -- --ignored`

#![cfg(feature = "postgres")]

use std::collections::HashSet;

use chrono::Duration;
use job_ingest::testing::{fixed_now, job, job_posted};
use job_ingest::{JobPredicate, JobStore, PostgresStore, SortOrder, UpsertOutcome};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;

async fn start() -> (PostgresStore, ContainerAsync<Postgres>) {
    let container = Postgres::default()
        .with_tag("16")
        .start()
        .await
        .expect("Failed to start Postgres container");
    let host = container.get_host().await.unwrap();
    let port = container.get_host_port_ipv4(5432).await.unwrap();
    let url = format!("postgresql://postgres:postgres@{}:{}/postgres", host, port);

    let store = PostgresStore::new(&url).await.expect("connect");
    (store, container)
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_upsert_and_overwrite() {
    let (store, _container) = start().await;
    let mut j = job("https://a.example.com/1", "notion");

    assert_eq!(store.upsert(&j).await.unwrap(), UpsertOutcome::Inserted);
    j.title = "Staff Engineer".to_string();
    j.source = "intercom".to_string();
    assert_eq!(store.upsert(&j).await.unwrap(), UpsertOutcome::Replaced);

    let stored = store.get("https://a.example.com/1").await.unwrap().unwrap();
    assert_eq!(stored, j);
    assert_eq!(store.count(&JobPredicate::all()).await.unwrap(), 1);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_delete_stale_for_source() {
    let (store, _container) = start().await;
    for link in ["https://a.example.com/1", "https://a.example.com/2"] {
        store.upsert(&job(link, "brex")).await.unwrap();
    }
    store.upsert(&job("https://n.example.com/1", "notion")).await.unwrap();

    let keep = HashSet::from(["https://a.example.com/2".to_string()]);
    let removed = store
        .delete_where(&JobPredicate::for_source("brex").excluding_links(keep))
        .await
        .unwrap();

    assert_eq!(removed, 1);
    assert_eq!(store.count(&JobPredicate::all()).await.unwrap(), 2);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_find_sorted_filtered_and_swept() {
    let (store, _container) = start().await;
    store.upsert(&job_posted("https://a.example.com/1", "brex", 3)).await.unwrap();
    store.upsert(&job_posted("https://a.example.com/2", "brex", 9)).await.unwrap();
    store.upsert(&job_posted("https://n.example.com/1", "notion", 5)).await.unwrap();

    let brex = store
        .find(&JobPredicate::for_company("brex"), SortOrder::PostedDateDesc, 10)
        .await
        .unwrap();
    assert_eq!(brex.len(), 2);
    assert_eq!(brex[0].link, "https://a.example.com/2");

    let cutoff = fixed_now() - Duration::days(365);
    assert_eq!(
        store.delete_where(&JobPredicate::posted_before(cutoff)).await.unwrap(),
        0
    );
    store.ping().await.unwrap();
}
