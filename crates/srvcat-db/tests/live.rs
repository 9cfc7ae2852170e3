//! Live integration tests for srvcat-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/srvcat-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory.

use rust_decimal::Decimal;
use srvcat_core::{
    CatalogStore, Currency, FilterCriteria, HddType, NewCatalogEntry, PageRequest, RamType,
};
use srvcat_db::{
    insert_catalog_entries, list_distinct_hdd_types, list_distinct_locations,
    query_catalog_entries, PgCatalogStore,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_entry(model: &str, ram_gb: i32, hdd: (i32, i32, HddType), location: &str) -> NewCatalogEntry {
    let (hdd_count, hdd_size_gb, hdd_type) = hdd;
    NewCatalogEntry {
        model: model.to_string(),
        ram_size_gb: ram_gb,
        ram_type: RamType::Ddr3,
        hdd_size_gb,
        hdd_count,
        hdd_type,
        location: location.to_string(),
        price: Decimal::new(3599, 2),
        currency: Currency::Usd,
    }
}

fn sample_catalog() -> Vec<NewCatalogEntry> {
    vec![
        make_entry("Dell R210-II", 16, (2, 2048, HddType::Sata2), "AmsterdamAMS-01"),
        make_entry("HP DL180G6", 32, (8, 2048, HddType::Sata2), "AmsterdamAMS-01"),
        make_entry("HP DL380eG8", 16, (2, 120, HddType::Ssd), "FrankfurtFRA-10"),
        make_entry("IBM X3650M4", 64, (4, 300, HddType::Sas), "Washington D.C.WDC-01"),
    ]
}

// ---------------------------------------------------------------------------
// Section 1: Inserts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn insert_stores_every_entry(pool: sqlx::PgPool) {
    let inserted = insert_catalog_entries(&pool, &sample_catalog())
        .await
        .expect("insert_catalog_entries failed");
    assert_eq!(inserted, 4);

    let page = query_catalog_entries(&pool, &FilterCriteria::default())
        .await
        .expect("query failed");
    assert_eq!(page.total, 4);
    assert_eq!(page.entries[0].model, "Dell R210-II");
    assert_eq!(page.entries[0].price, Decimal::new(3599, 2));
    assert_eq!(page.entries[0].currency, Currency::Usd.code());
}

#[sqlx::test(migrations = "../../migrations")]
async fn empty_insert_is_noop(pool: sqlx::PgPool) {
    let inserted = insert_catalog_entries(&pool, &[]).await.expect("insert failed");
    assert_eq!(inserted, 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn failing_batch_stores_nothing(pool: sqlx::PgPool) {
    let mut entries = sample_catalog();
    entries[2].price = Decimal::new(-1, 0);

    let result = insert_catalog_entries(&pool, &entries).await;
    assert!(result.is_err(), "negative price should violate the check");

    let page = query_catalog_entries(&pool, &FilterCriteria::default())
        .await
        .expect("query failed");
    assert_eq!(page.total, 0);
    assert!(page.entries.is_empty());
}

// ---------------------------------------------------------------------------
// Section 2: Lookups
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn distinct_locations_are_sorted_and_unique(pool: sqlx::PgPool) {
    insert_catalog_entries(&pool, &sample_catalog()).await.expect("insert failed");

    let locations = list_distinct_locations(&pool).await.expect("locations failed");
    assert_eq!(
        locations,
        vec!["AmsterdamAMS-01", "FrankfurtFRA-10", "Washington D.C.WDC-01"]
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn distinct_hdd_types_cover_used_codes(pool: sqlx::PgPool) {
    insert_catalog_entries(&pool, &sample_catalog()[..2])
        .await
        .expect("insert failed");

    let types = list_distinct_hdd_types(&pool).await.expect("hdd types failed");
    assert_eq!(types, vec![HddType::Sata2]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn lookups_on_empty_table_are_empty(pool: sqlx::PgPool) {
    assert!(list_distinct_locations(&pool).await.expect("locations").is_empty());
    assert!(list_distinct_hdd_types(&pool).await.expect("hdd types").is_empty());
}

// ---------------------------------------------------------------------------
// Section 3: Filtered listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn ram_filter_matches_any_listed_size(pool: sqlx::PgPool) {
    insert_catalog_entries(&pool, &sample_catalog()).await.expect("insert failed");

    let criteria = FilterCriteria {
        ram_sizes_gb: vec![16, 64],
        ..FilterCriteria::default()
    };
    let page = query_catalog_entries(&pool, &criteria).await.expect("query failed");

    let models: Vec<&str> = page.entries.iter().map(|e| e.model.as_str()).collect();
    assert_eq!(models, vec!["Dell R210-II", "HP DL380eG8", "IBM X3650M4"]);
    assert_eq!(page.total, 3);
}

#[sqlx::test(migrations = "../../migrations")]
async fn storage_bounds_use_total_capacity(pool: sqlx::PgPool) {
    insert_catalog_entries(&pool, &sample_catalog()).await.expect("insert failed");

    // 2x2TB = 4096, 8x2TB = 16384, 2x120 = 240, 4x300 = 1200
    let criteria = FilterCriteria {
        min_storage_gb: Some(1200),
        max_storage_gb: Some(4096),
        ..FilterCriteria::default()
    };
    let page = query_catalog_entries(&pool, &criteria).await.expect("query failed");

    let models: Vec<&str> = page.entries.iter().map(|e| e.model.as_str()).collect();
    assert_eq!(models, vec!["Dell R210-II", "IBM X3650M4"]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn location_and_hdd_type_are_anded(pool: sqlx::PgPool) {
    insert_catalog_entries(&pool, &sample_catalog()).await.expect("insert failed");

    let criteria = FilterCriteria {
        hdd_type: Some(HddType::Sata2),
        location: Some("AmsterdamAMS-01".to_string()),
        ram_sizes_gb: vec![32],
        ..FilterCriteria::default()
    };
    let page = query_catalog_entries(&pool, &criteria).await.expect("query failed");

    assert_eq!(page.entries.len(), 1);
    assert_eq!(page.entries[0].model, "HP DL180G6");
}

#[sqlx::test(migrations = "../../migrations")]
async fn sql_filter_agrees_with_in_memory_matches(pool: sqlx::PgPool) {
    insert_catalog_entries(&pool, &sample_catalog())
        .await
        .expect("insert failed");
    let all = query_catalog_entries(&pool, &FilterCriteria::default())
        .await
        .expect("query failed")
        .entries;

    let cases = [
        FilterCriteria {
            min_storage_gb: Some(600),
            max_storage_gb: Some(4096),
            ..FilterCriteria::default()
        },
        FilterCriteria {
            ram_sizes_gb: vec![16, 64],
            ..FilterCriteria::default()
        },
        FilterCriteria {
            hdd_type: Some(HddType::Sata2),
            location: Some("AmsterdamAMS-01".to_string()),
            ..FilterCriteria::default()
        },
        FilterCriteria {
            location: Some("amsterdamams-01".to_string()),
            ..FilterCriteria::default()
        },
    ];

    for criteria in cases {
        let page = query_catalog_entries(&pool, &criteria)
            .await
            .expect("query failed");
        let expected: Vec<i64> = all
            .iter()
            .filter(|e| criteria.matches(e))
            .map(|e| e.id)
            .collect();
        let got: Vec<i64> = page.entries.iter().map(|e| e.id).collect();
        assert_eq!(got, expected, "criteria: {criteria:?}");
        assert_eq!(page.total, i64::try_from(expected.len()).expect("fits"));
    }
}

#[sqlx::test(migrations = "../../migrations")]
async fn total_counts_filtered_rows_across_pages(pool: sqlx::PgPool) {
    insert_catalog_entries(&pool, &sample_catalog()).await.expect("insert failed");

    let criteria = FilterCriteria {
        location: Some("AmsterdamAMS-01".to_string()),
        page: PageRequest::new(Some(1), Some(2)),
        ..FilterCriteria::default()
    };
    let page = query_catalog_entries(&pool, &criteria).await.expect("query failed");

    assert_eq!(page.total, 2);
    assert_eq!(page.entries.len(), 1);
    assert_eq!(page.entries[0].model, "HP DL180G6");
}

#[sqlx::test(migrations = "../../migrations")]
async fn page_past_end_is_empty_with_total(pool: sqlx::PgPool) {
    insert_catalog_entries(&pool, &sample_catalog()).await.expect("insert failed");

    let criteria = FilterCriteria {
        page: PageRequest::new(Some(10), Some(5)),
        ..FilterCriteria::default()
    };
    let page = query_catalog_entries(&pool, &criteria).await.expect("query failed");

    assert!(page.entries.is_empty());
    assert_eq!(page.total, 4);
}

// ---------------------------------------------------------------------------
// Section 4: Store trait
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn pg_store_delegates_to_queries(pool: sqlx::PgPool) {
    let store = PgCatalogStore::new(pool);

    let inserted = store
        .insert_entries(&sample_catalog())
        .await
        .expect("insert_entries failed");
    assert_eq!(inserted, 4);

    let types = store.distinct_hdd_types().await.expect("hdd types failed");
    assert_eq!(types, vec![HddType::Sata2, HddType::Sas, HddType::Ssd]);

    let page = store
        .query_entries(&FilterCriteria::default())
        .await
        .expect("query_entries failed");
    assert_eq!(page.total, 4);
    assert!(page.entries.windows(2).all(|w| w[0].id < w[1].id));
}
