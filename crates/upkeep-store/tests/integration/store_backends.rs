//! The same scenarios against every record store backend.

use upkeep_core::util::time::parse_timestamp;
use upkeep_core::{AssetId, EntityKind, Error as CoreError, Failure, FailureId, FailureStatus};
use upkeep_store::{FailureFilter, import_dataset, load_dir, snapshot};

use crate::common::TestHarness;

#[tokio::test]
async fn test_import_then_snapshot_matches_dataset() {
    let harness = TestHarness::with_sample_tables();
    let data = load_dir(harness.path()).unwrap();

    for store in harness.backends().await {
        let summary = import_dataset(store.as_ref(), &data).await.unwrap();
        assert_eq!(summary.rejected(), 0, "{}", store.name());
        assert_eq!(summary.failures.inserted, 4);

        let stored = snapshot(store.as_ref()).await.unwrap();
        assert_eq!(stored, data, "{}", store.name());
        store.close().await.unwrap();
    }
}

#[tokio::test]
async fn test_reimport_rejects_every_duplicate() {
    let harness = TestHarness::with_sample_tables();
    let data = load_dir(harness.path()).unwrap();

    for store in harness.backends().await {
        import_dataset(store.as_ref(), &data).await.unwrap();
        let again = import_dataset(store.as_ref(), &data).await.unwrap();
        assert_eq!(again.rejected(), data.len(), "{}", store.name());
        store.close().await.unwrap();
    }
}

#[tokio::test]
async fn test_referential_integrity_on_every_backend() {
    let harness = TestHarness::new();
    for store in harness.backends().await {
        let orphan = Failure::new(
            FailureId::new(1),
            AssetId::new(404),
            parse_timestamp("2024-01-01").unwrap(),
            1.0,
        );
        let err = store.insert_failure(&orphan).await.unwrap_err();
        assert!(
            matches!(
                err.as_core(),
                Some(CoreError::ReferentialIntegrity {
                    kind: EntityKind::Failure,
                    asset_id: 404,
                    ..
                })
            ),
            "{}: {err}",
            store.name()
        );
        store.close().await.unwrap();
    }
}

#[tokio::test]
async fn test_filtered_listing_is_ordered() {
    let harness = TestHarness::with_sample_tables();
    let data = load_dir(harness.path()).unwrap();

    for store in harness.backends().await {
        import_dataset(store.as_ref(), &data).await.unwrap();

        let resolved = store
            .list_failures(&FailureFilter::all().with_status(FailureStatus::Resolved))
            .await
            .unwrap();
        let ids: Vec<u64> = resolved.iter().map(|f| f.id.get()).collect();
        assert_eq!(ids, vec![1, 2], "{}", store.name());

        let asset_two = store
            .list_failures(&FailureFilter::all().for_asset(AssetId::new(2)))
            .await
            .unwrap();
        assert_eq!(asset_two.len(), 1, "{}", store.name());

        let january = FailureFilter::all().between(
            Some(parse_timestamp("2024-01-01T10:00:00").unwrap()),
            Some(parse_timestamp("2024-01-31").unwrap()),
        );
        let ids: Vec<u64> = store
            .list_failures(&january)
            .await
            .unwrap()
            .iter()
            .map(|f| f.id.get())
            .collect();
        assert_eq!(ids, vec![2, 3], "{}", store.name());
        store.close().await.unwrap();
    }
}
