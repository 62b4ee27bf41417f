use appraisal_core::query::{browse_filter, comparators_filter, SortOrder, COMPARATOR_LIMIT};
use appraisal_core::record::{Borrower, PropertyRecord};
use appraisal_store::memory::MemoryStore;
use appraisal_store::{ListQuery, RecordStore, StoreError};
use assert_matches::assert_matches;

fn record(name: &str, report: &str, value: f64) -> PropertyRecord {
    PropertyRecord {
        borrower: Borrower::from(name.to_string()),
        report_number: report.into(),
        object_value: value,
        ..Default::default()
    }
}

#[tokio::test]
async fn browse_excludes_comparators_and_paginates() {
    let store = MemoryStore::new();
    store
        .seed((0..35).map(|i| record(&format!("Debitur {i}"), "LAP001", 1.0)))
        .await;
    store
        .seed([record("Aset Pembanding", "LAP001", 2.0)])
        .await;

    let query = ListQuery::new()
        .filter(browse_filter(""))
        .sort(SortOrder::Newest);
    let first = store.list(1, 30, &query).await.unwrap();
    assert_eq!(first.total_items, 35);
    assert_eq!(first.total_pages, 2);
    assert_eq!(first.items.len(), 30);
    assert_eq!(
        first.items[0].record.borrower,
        Borrower::Debtor("Debitur 34".into())
    );

    let second = store.list(2, 30, &query).await.unwrap();
    assert_eq!(second.items.len(), 5);
}

#[tokio::test]
async fn comparators_sorted_by_value() {
    let store = MemoryStore::new();
    let seeded = store
        .seed([
            record("Budi", "LAP001", 500.0),
            record("Aset Pembanding", "LAP001", 100.0),
            record("Aset Pembanding", "LAP001", 300.0),
            record("Ani", "LAP002", 900.0),
        ])
        .await;

    let query = ListQuery::new()
        .filter(comparators_filter("LAP001", &seeded[0].id).unwrap())
        .sort(SortOrder::ValueDesc);
    let page = store.list(1, COMPARATOR_LIMIT, &query).await.unwrap();
    let values: Vec<f64> = page.items.iter().map(|r| r.record.object_value).collect();
    assert_eq!(values, vec![300.0, 100.0]);
}

#[tokio::test]
async fn full_list_walks_every_page() {
    let store = MemoryStore::new();
    store
        .seed((0..1001).map(|i| record("Budi", &format!("LAP{i}"), 1.0)))
        .await;
    let all = store.full_list(&ListQuery::new()).await.unwrap();
    assert_eq!(all.len(), 1001);
    assert_eq!(
        store
            .list_calls
            .load(std::sync::atomic::Ordering::SeqCst),
        3
    );
}

#[tokio::test]
async fn update_keeps_identity_and_created() {
    let store = MemoryStore::new();
    let seeded = store.seed([record("Budi", "LAP001", 1.0)]).await;
    let original = &seeded[0];

    let updated = store
        .update(&original.id, &record("Budi Santoso", "LAP001", 2.0))
        .await
        .unwrap();
    assert_eq!(updated.id, original.id);
    assert_eq!(updated.created, original.created);
    assert_eq!(updated.record.object_value, 2.0);

    assert_matches!(
        store.update("missing", &record("x", "y", 0.0)).await,
        Err(StoreError::NotFound { .. })
    );
}

#[tokio::test]
async fn injected_faults() {
    let store = MemoryStore::new();
    store.reject_report_number("BAD").await;
    assert_matches!(
        store.create(&record("Budi", "BAD", 1.0)).await,
        Err(StoreError::Rejected(_))
    );

    store.fail_listing(true);
    assert_matches!(
        store.list(1, 30, &ListQuery::new()).await,
        Err(StoreError::Api { status: 500, .. })
    );
}

#[tokio::test]
async fn sessions_resolve_to_users() {
    let store = MemoryStore::new();
    store.add_user("admin@example.com", "secret", "admin").await;

    let session = store
        .authenticate("admin@example.com", "secret")
        .await
        .unwrap();
    let refreshed = store.refresh(&session.token).await.unwrap();
    assert!(refreshed.user.is_admin());

    assert_matches!(
        store.authenticate("admin@example.com", "nope").await,
        Err(StoreError::Unauthorized)
    );
    assert_matches!(store.refresh("forged").await, Err(StoreError::Unauthorized));
}
