use sea_orm::{Database, DatabaseConnection};

use engine::{AllocationRow, DecorQuantities, Engine, ErrorKind};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

fn row(row_number: i32, customer_name: &str, arc: i32) -> AllocationRow {
    AllocationRow {
        row_number,
        customer_name: customer_name.to_string(),
        quantities: DecorQuantities {
            arc,
            centerpieces: 10,
            ..Default::default()
        },
    }
}

#[tokio::test]
async fn save_drops_rows_without_customer_name() {
    let (engine, _db) = engine_with_db().await;

    let stored = engine
        .save_month("alice", 3, 2024, vec![row(1, "X", 1), row(2, "", 4), row(3, "   ", 2)])
        .await
        .unwrap();
    assert_eq!(stored, 1);

    let rows = engine.list_month("alice", 3, 2024).await.unwrap();
    assert_eq!(rows, vec![row(1, "X", 1)]);
}

#[tokio::test]
async fn blank_rows_are_dropped_before_validation() {
    let (engine, _db) = engine_with_db().await;

    let stored = engine
        .save_month(
            "alice",
            3,
            2024,
            vec![row(1, "X", 1), row(0, "", 1), row(-4, "  ", -7), row(1, "", 2)],
        )
        .await
        .unwrap();
    assert_eq!(stored, 1);

    let rows = engine.list_month("alice", 3, 2024).await.unwrap();
    assert_eq!(rows, vec![row(1, "X", 1)]);
}

#[tokio::test]
async fn save_replaces_the_whole_month() {
    let (engine, _db) = engine_with_db().await;

    engine
        .save_month("alice", 3, 2024, vec![row(1, "X", 1), row(2, "", 0)])
        .await
        .unwrap();
    engine
        .save_month("alice", 3, 2024, vec![row(5, "Y", 2)])
        .await
        .unwrap();

    let rows = engine.list_month("alice", 3, 2024).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].row_number, 5);
    assert_eq!(rows[0].customer_name, "Y");
}

#[tokio::test]
async fn save_only_touches_its_own_month_and_tenant() {
    let (engine, _db) = engine_with_db().await;
    engine
        .save_month("alice", 3, 2024, vec![row(1, "March", 1)])
        .await
        .unwrap();
    engine
        .save_month("alice", 4, 2024, vec![row(1, "April", 1)])
        .await
        .unwrap();
    engine
        .save_month("alice", 3, 2025, vec![row(1, "Next year", 1)])
        .await
        .unwrap();
    engine
        .save_month("bob", 3, 2024, vec![row(1, "Bob", 1)])
        .await
        .unwrap();

    engine.save_month("alice", 3, 2024, Vec::new()).await.unwrap();

    assert!(engine.list_month("alice", 3, 2024).await.unwrap().is_empty());
    assert_eq!(engine.list_month("alice", 4, 2024).await.unwrap().len(), 1);
    assert_eq!(engine.list_month("alice", 3, 2025).await.unwrap().len(), 1);
    assert_eq!(engine.list_month("bob", 3, 2024).await.unwrap().len(), 1);
}

#[tokio::test]
async fn list_orders_by_row_number() {
    let (engine, _db) = engine_with_db().await;
    engine
        .save_month(
            "alice",
            12,
            2024,
            vec![row(7, "C", 1), row(2, "A", 1), row(4, "B", 1)],
        )
        .await
        .unwrap();

    let numbers: Vec<i32> = engine
        .list_month("alice", 12, 2024)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.row_number)
        .collect();
    assert_eq!(numbers, vec![2, 4, 7]);
}

#[tokio::test]
async fn invalid_saves_leave_the_month_untouched() {
    let (engine, _db) = engine_with_db().await;
    engine
        .save_month("alice", 3, 2024, vec![row(1, "X", 1)])
        .await
        .unwrap();

    let err = engine
        .save_month("alice", 3, 2024, vec![row(1, "Y", 1), row(1, "Z", 1)])
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = engine
        .save_month("alice", 3, 2024, vec![row(2, "Y", -1)])
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = engine
        .save_month("alice", 3, 2024, vec![row(0, "Y", 1)])
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    assert_eq!(
        engine.list_month("alice", 3, 2024).await.unwrap(),
        vec![row(1, "X", 1)]
    );
}

#[tokio::test]
async fn months_are_one_based() {
    let (engine, _db) = engine_with_db().await;

    for month in [0, 13] {
        let err = engine
            .save_month("alice", month, 2024, vec![row(1, "X", 1)])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        let err = engine.list_month("alice", month, 2024).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    engine
        .save_month("alice", 1, 2024, vec![row(1, "January", 1)])
        .await
        .unwrap();
    assert_eq!(
        engine.list_month("alice", 1, 2024).await.unwrap()[0].customer_name,
        "January"
    );
    assert!(engine.list_month("alice", 2, 2024).await.unwrap().is_empty());
}

#[tokio::test]
async fn upsert_row_inserts_then_overwrites_one_row() {
    let (engine, _db) = engine_with_db().await;
    engine
        .save_month("alice", 6, 2024, vec![row(1, "X", 1), row(2, "Y", 1)])
        .await
        .unwrap();

    let stored = engine
        .upsert_allocation_row("alice", 6, 2024, row(2, "Y2", 9))
        .await
        .unwrap();
    assert_eq!(stored, row(2, "Y2", 9));

    engine
        .upsert_allocation_row("alice", 6, 2024, row(3, "Z", 0))
        .await
        .unwrap();

    let rows = engine.list_month("alice", 6, 2024).await.unwrap();
    assert_eq!(rows, vec![row(1, "X", 1), row(2, "Y2", 9), row(3, "Z", 0)]);

    let err = engine
        .upsert_allocation_row("alice", 6, 2024, row(4, " ", 1))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}
