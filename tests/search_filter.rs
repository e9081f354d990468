//! End-to-end tests for the two-stage search pipeline over a real SQLite
//! store: stage 1 through the bundled executor, stage 2 in memory, and the
//! consistency property between them.

use std::sync::Arc;

use serde_json::json;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use br_search::core::config::SearchConfig;
use br_search::{
    BrSchema, BrSearchService, FilterCriterion, FilterValue, Operator, QueryError, Row,
    ScalarValue, SqliteExecutor, parse_filters,
};

async fn seeded_pool() -> SqlitePool {
    // A single connection keeps every statement on the same in-memory store
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    sqlx::query(
        "CREATE TABLE BR_SEARCH_VIEW (
            BR_NMBR INTEGER,
            BR_SHORT_TITLE TEXT,
            BR_TYPE_EN TEXT,
            PRIORITY_EN TEXT,
            BR_ACTIVE_EN TEXT,
            RPT_GC_ORG_NAME_EN TEXT,
            RPT_GC_ORG_NAME_FR TEXT,
            ORG_TYPE_EN TEXT,
            PROD_DESC TEXT,
            SR_OWNER TEXT,
            BA_OPI TEXT,
            PM_OPI TEXT,
            TEAMLEADER TEXT,
            EXTRACTION_DATE TEXT,
            SUBMIT_DATE TEXT,
            REQST_IMPL_DATE TEXT,
            TARGET_IMPL_DATE TEXT
        )",
    )
    .execute(&pool)
    .await
    .unwrap();

    let seed = [
        (
            30001,
            "Server Upgrade",
            "High",
            "Active",
            "Dept of Correctional Services",
            "Jane Doe",
            "2024-03-15",
        ),
        (
            30002,
            "Client App",
            "Medium",
            "Active",
            "Dept of Finance",
            "Alex Roy",
            "2023-11-02",
        ),
        (
            30003,
            "Network Refresh",
            "Low",
            "Inactive",
            "Dept of Correctional Services",
            "Jane Doe",
            "2024-06-30",
        ),
    ];
    for (nmbr, title, priority, active, org, owner, submitted) in seed {
        sqlx::query(
            "INSERT INTO BR_SEARCH_VIEW
                (BR_NMBR, BR_SHORT_TITLE, PRIORITY_EN, BR_ACTIVE_EN,
                 RPT_GC_ORG_NAME_EN, SR_OWNER, SUBMIT_DATE)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(nmbr)
        .bind(title)
        .bind(priority)
        .bind(active)
        .bind(org)
        .bind(owner)
        .bind(submitted)
        .execute(&pool)
        .await
        .unwrap();
    }

    pool
}

async fn service() -> BrSearchService {
    let pool = seeded_pool().await;
    let schema = Arc::new(BrSchema::bits());
    let config = SearchConfig::default();
    let executor = SqliteExecutor::new(pool, &schema, &config);
    BrSearchService::new(Arc::new(executor), schema)
}

fn crit(column: &str, operator: Operator, value: FilterValue) -> FilterCriterion {
    FilterCriterion {
        column: column.to_string(),
        operator,
        value,
    }
}

fn br_numbers(rows: &[Row]) -> Vec<i64> {
    rows.iter()
        .map(|r| r["BR_NMBR"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn empty_stage1_filter_matches_all_rows() {
    let svc = service().await;
    let rows = svc.search(&[]).await.unwrap();
    // Bundled executor orders by BR_NMBR descending
    assert_eq!(br_numbers(&rows), vec![30003, 30002, 30001]);
}

#[tokio::test]
async fn empty_stage2_filter_is_identity() {
    let svc = service().await;
    let rows = svc.search(&[]).await.unwrap();
    let narrowed = svc.filter(rows.clone(), &[]).unwrap();
    assert_eq!(narrowed, rows);
}

#[tokio::test]
async fn stage1_and_stage2_agree_on_equivalent_criteria() {
    let svc = service().await;
    let criteria = [
        crit(
            "RPT_GC_ORG_NAME_EN",
            Operator::Contains,
            FilterValue::text("Correctional"),
        ),
        crit("BR_NMBR", Operator::GreaterThan, FilterValue::number(30000.0)),
        crit(
            "SUBMIT_DATE",
            Operator::GreaterThan,
            FilterValue::text("2024-01-01"),
        ),
        crit(
            "PRIORITY_EN",
            Operator::In,
            FilterValue::list([
                ScalarValue::Text("High".to_string()),
                ScalarValue::Text("Low".to_string()),
            ]),
        ),
        crit("BR_OWNER", Operator::Equals, FilterValue::text("JANE DOE")),
        crit(
            "BR_SHORT_TITLE",
            Operator::StartsWith,
            FilterValue::text("server"),
        ),
    ];
    let everything = svc.search(&[]).await.unwrap();
    for criterion in criteria {
        let filters = std::slice::from_ref(&criterion);
        let pushed_down = svc.search(filters).await.unwrap();
        let in_memory = svc.filter(everything.clone(), filters).unwrap();
        assert_eq!(
            br_numbers(&pushed_down),
            br_numbers(&in_memory),
            "stages diverged for {criterion:?}"
        );
    }
}

#[tokio::test]
async fn scenario_two_stage_narrowing() {
    let svc = service().await;
    // Stage 1: titles containing "Server"
    let stage1 = [crit(
        "BR_SHORT_TITLE",
        Operator::Contains,
        FilterValue::text("Server"),
    )];
    let rows = svc.search(&stage1).await.unwrap();
    assert_eq!(br_numbers(&rows), vec![30001]);

    // Stage 2: organizations containing "Correctional"
    let stage2 = [crit(
        "RPT_GC_ORG_NAME_EN",
        Operator::Contains,
        FilterValue::text("Correctional"),
    )];
    let narrowed = svc.filter(rows, &stage2).unwrap();
    assert_eq!(br_numbers(&narrowed), vec![30001]);
    assert_eq!(narrowed[0]["BR_SHORT_TITLE"], json!("Server Upgrade"));
}

#[tokio::test]
async fn stage1_equality_is_case_insensitive() {
    let svc = service().await;
    let filters = [crit(
        "BR_SHORT_TITLE",
        Operator::Equals,
        FilterValue::text("server upgrade"),
    )];
    let rows = svc.search(&filters).await.unwrap();
    assert_eq!(br_numbers(&rows), vec![30001]);
}

#[tokio::test]
async fn logical_owner_column_reads_physical_field() {
    let svc = service().await;
    let filters = [crit("BR_OWNER", Operator::Equals, FilterValue::text("Jane Doe"))];
    let rows = svc.search(&filters).await.unwrap();
    assert_eq!(br_numbers(&rows), vec![30003, 30001]);
    // Rows come back under the logical name
    assert_eq!(rows[0]["BR_OWNER"], json!("Jane Doe"));
    assert!(!rows[0].contains_key("SR_OWNER"));
}

#[tokio::test]
async fn unknown_column_fails_both_stages() {
    let svc = service().await;
    let filters = [crit("NOT_A_COLUMN", Operator::Equals, FilterValue::text("x"))];

    let err = svc.search(&filters).await.unwrap_err();
    assert!(matches!(err, QueryError::UnknownColumn(ref name) if name == "NOT_A_COLUMN"));

    let rows = svc.search(&[]).await.unwrap();
    let err = svc.filter(rows, &filters).unwrap_err();
    assert!(matches!(err, QueryError::UnknownColumn(ref name) if name == "NOT_A_COLUMN"));
}

#[tokio::test]
async fn date_range_search_hits_the_store() {
    let svc = service().await;
    let filters = [crit(
        "SUBMIT_DATE",
        Operator::LessThan,
        FilterValue::text("2024-01-01"),
    )];
    let rows = svc.search(&filters).await.unwrap();
    assert_eq!(br_numbers(&rows), vec![30002]);
}

#[tokio::test]
async fn json_payload_round_trips_through_both_stages() {
    let svc = service().await;
    let schema = BrSchema::bits();

    let stage1 = parse_filters(
        r#"[{"column": "BR_ACTIVE_EN", "operator": "=", "value": "Active"}]"#,
        &schema,
    )
    .unwrap();
    let rows = svc.search(&stage1).await.unwrap();
    assert_eq!(br_numbers(&rows), vec![30002, 30001]);

    let stage2 = parse_filters(
        r#"[{"column": "PRIORITY_EN", "operator": "in", "value": ["high", "LOW"]}]"#,
        &schema,
    )
    .unwrap();
    let narrowed = svc.filter(rows, &stage2).unwrap();
    assert_eq!(br_numbers(&narrowed), vec![30001]);
}
