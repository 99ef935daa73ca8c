use std::sync::Arc;

use chrono::Duration;
use job_ingest::testing::{fixed_now, job, FailingStore};
use job_ingest::{JobPredicate, JobStore, MemoryStore, RetentionSweeper, SweepError};

async fn seed(store: &MemoryStore, ages_in_days: &[i64]) {
    for (i, age) in ages_in_days.iter().enumerate() {
        let mut j = job(&format!("https://a.example.com/jobs/{}", i), "brex");
        j.posted_date = fixed_now() - Duration::days(*age);
        store.upsert(&j).await.unwrap();
    }
}

#[tokio::test]
async fn test_sweep_deletes_only_older_jobs() {
    let store = Arc::new(MemoryStore::new());
    seed(&store, &[1, 10, 49, 51, 120]).await;
    let sweeper = RetentionSweeper::new(store.clone());

    let report = sweeper
        .sweep_at(Duration::days(50), fixed_now())
        .await
        .unwrap();

    assert_eq!(report.deleted_count, 2);
    assert_eq!(report.cutoff_date, fixed_now() - Duration::days(50));
    let remaining = store
        .find(&JobPredicate::all(), Default::default(), 100)
        .await
        .unwrap();
    assert_eq!(remaining.len(), 3);
    assert!(remaining
        .iter()
        .all(|j| j.posted_date >= report.cutoff_date));
}

#[tokio::test]
async fn test_second_sweep_deletes_nothing() {
    let store = Arc::new(MemoryStore::new());
    seed(&store, &[5, 60, 70]).await;
    let sweeper = RetentionSweeper::new(store.clone());

    let first = sweeper.sweep_at(Duration::days(50), fixed_now()).await.unwrap();
    let second = sweeper.sweep_at(Duration::days(50), fixed_now()).await.unwrap();

    assert_eq!(first.deleted_count, 2);
    assert_eq!(second.deleted_count, 0);
}

#[tokio::test]
async fn test_job_exactly_at_cutoff_survives() {
    let store = Arc::new(MemoryStore::new());
    seed(&store, &[50]).await;

    let report = RetentionSweeper::new(store.clone())
        .sweep_at(Duration::days(50), fixed_now())
        .await
        .unwrap();

    assert_eq!(report.deleted_count, 0);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_sweep_spans_every_source() {
    let store = Arc::new(MemoryStore::new());
    for source in ["brex", "notion", "microsoft"] {
        let mut j = job(&format!("https://{}.example.com/old", source), source);
        j.posted_date = fixed_now() - Duration::days(90);
        store.upsert(&j).await.unwrap();
    }

    let report = RetentionSweeper::new(store.clone())
        .with_max_age(Duration::days(50))
        .sweep_at(Duration::days(50), fixed_now())
        .await
        .unwrap();

    assert_eq!(report.deleted_count, 3);
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_store_failure_surfaces() {
    let err = RetentionSweeper::new(Arc::new(FailingStore))
        .sweep()
        .await
        .unwrap_err();

    assert!(matches!(err, SweepError::Store(_)));
}
