//! End-to-end reordering scenarios through the command layer

use serde_json::Value;
use shopfloor_kanban::{
    job::{AddJob, ReorderJob},
    kanban::{CheckColumn, GetColumn, ListJobsByStatus},
    Execute, JobStatus, KanbanColumn, KanbanConfig, KanbanContext, KanbanError,
};
use tempfile::TempDir;

async fn setup() -> (TempDir, KanbanContext) {
    let temp = TempDir::new().unwrap();
    let ctx = KanbanContext::init_with_config(temp.path().join(".shopfloor"), KanbanConfig::default())
        .await
        .unwrap();
    (temp, ctx)
}

async fn add(ctx: &KanbanContext, name: &str, status: JobStatus) -> String {
    let added = AddJob::new(name)
        .with_status(status)
        .execute(ctx)
        .await
        .unwrap();
    added["id"].as_str().unwrap().to_string()
}

async fn names_in(ctx: &KanbanContext, status: JobStatus) -> Vec<String> {
    let listed = ListJobsByStatus::new(status).execute(ctx).await.unwrap();
    listed["jobs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["name"].as_str().unwrap().to_string())
        .collect()
}

async fn priorities_in(ctx: &KanbanContext, status: JobStatus) -> Vec<i64> {
    let listed = ListJobsByStatus::new(status).execute(ctx).await.unwrap();
    listed["jobs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["priority"].as_i64().unwrap())
        .collect()
}

#[test_log::test(tokio::test)]
async fn test_midpoint_sequence_then_rebalance() {
    let (_temp, ctx) = setup().await;

    // X alone in an empty column
    let x = add(&ctx, "X", JobStatus::Quoting).await;
    assert_eq!(priorities_in(&ctx, JobStatus::Quoting).await, vec![1000]);

    // Y above X
    let y = add(&ctx, "Y", JobStatus::Quoting).await;
    let placed = ReorderJob::new(y.as_str())
        .with_before(x.as_str())
        .execute(&ctx)
        .await
        .unwrap();
    assert_eq!(placed["priority"], 2000);

    // Z between X and Y
    let z = add(&ctx, "Z", JobStatus::Quoting).await;
    let placed = ReorderJob::new(z.as_str())
        .with_before(x.as_str())
        .with_after(y.as_str())
        .execute(&ctx)
        .await
        .unwrap();
    assert_eq!(placed["priority"], 1500);

    // W between X and Z
    let w = add(&ctx, "W", JobStatus::Quoting).await;
    let placed = ReorderJob::new(w.as_str())
        .with_before(x.as_str())
        .with_after(z.as_str())
        .execute(&ctx)
        .await
        .unwrap();
    assert_eq!(placed["priority"], 1250);

    // Keep squeezing jobs in directly above X until the gap runs out
    let mut upper = w.clone();
    let mut rebalanced_at = None;
    let mut squeezed = Vec::new();
    for n in 0..12 {
        let name = format!("N{n}");
        let id = add(&ctx, &name, JobStatus::Quoting).await;
        let placed: Value = ReorderJob::new(id.as_str())
            .with_before(x.as_str())
            .with_after(upper.as_str())
            .execute(&ctx)
            .await
            .unwrap();
        if placed["rebalanced"].as_u64().unwrap() > 0 && rebalanced_at.is_none() {
            rebalanced_at = Some(n);
        }
        squeezed.push(name);
        upper = id;
    }

    // 1250 -> 1125 -> 1062 -> 1031 -> 1015 -> 1007 -> 1003 -> 1001 -> no room
    assert_eq!(rebalanced_at, Some(7));

    let mut expected = vec!["Y".to_string(), "Z".to_string(), "W".to_string()];
    expected.extend(squeezed);
    expected.push("X".to_string());
    assert_eq!(names_in(&ctx, JobStatus::Quoting).await, expected);

    let check = CheckColumn::new(JobStatus::Quoting)
        .execute(&ctx)
        .await
        .unwrap();
    assert_eq!(check["ok"], true);
}

#[tokio::test]
async fn test_rebalance_spaces_every_job_evenly() {
    let (_temp, ctx) = setup().await;
    let a = add(&ctx, "A", JobStatus::InProgress).await;
    let b = add(&ctx, "B", JobStatus::InProgress).await;

    // Squeeze until a rebalance happens on the very move that needs it
    let mut upper = b.clone();
    loop {
        let id = add(&ctx, "squeeze", JobStatus::InProgress).await;
        let placed = ReorderJob::new(id.as_str())
            .with_before(a.as_str())
            .with_after(upper.as_str())
            .execute(&ctx)
            .await
            .unwrap();
        if placed["rebalanced"].as_u64().unwrap() > 0 {
            let moved = placed["priority"].as_i64().unwrap();
            let others: Vec<i64> = priorities_in(&ctx, JobStatus::InProgress)
                .await
                .into_iter()
                .filter(|p| *p != moved)
                .collect();
            assert!(others.iter().all(|p| p % 1000 == 0), "{others:?}");
            assert_eq!(moved, 1500);
            break;
        }
        upper = id;
    }
}

#[tokio::test]
async fn test_cross_column_move() {
    let (_temp, ctx) = setup().await;
    let q = add(&ctx, "Quote", JobStatus::Quoting).await;
    let p1 = add(&ctx, "P1", JobStatus::InProgress).await;
    let p2 = add(&ctx, "P2", JobStatus::InProgress).await;

    let moved = ReorderJob::new(q.as_str())
        .with_before(p1.as_str())
        .with_after(p2.as_str())
        .with_status(JobStatus::InProgress)
        .execute(&ctx)
        .await
        .unwrap();
    assert_eq!(moved["status"], "in_progress");
    assert_eq!(moved["priority"], 1500);

    assert!(names_in(&ctx, JobStatus::Quoting).await.is_empty());
    assert_eq!(
        names_in(&ctx, JobStatus::InProgress).await,
        vec!["P2", "Quote", "P1"]
    );

    let pre = GetColumn::new(KanbanColumn::PreProduction)
        .execute(&ctx)
        .await
        .unwrap();
    assert_eq!(pre["count"], 0);
    let production = GetColumn::new(KanbanColumn::InProduction)
        .execute(&ctx)
        .await
        .unwrap();
    assert_eq!(production["count"], 3);
}

#[tokio::test]
async fn test_move_into_empty_column() {
    let (_temp, ctx) = setup().await;
    let q = add(&ctx, "Quote", JobStatus::Quoting).await;

    let moved = ReorderJob::new(q.as_str())
        .with_status(JobStatus::Special)
        .execute(&ctx)
        .await
        .unwrap();
    assert_eq!(moved["priority"], 1000);
    assert_eq!(moved["column"], "special");
}

#[tokio::test]
async fn test_move_to_bottom_of_column() {
    let (_temp, ctx) = setup().await;
    let a = add(&ctx, "A", JobStatus::Quoting).await;
    let _b = add(&ctx, "B", JobStatus::Quoting).await;
    let c = add(&ctx, "C", JobStatus::Quoting).await;

    // Below A, the lowest job: A sits at 1000 so this needs a rebalance
    let moved = ReorderJob::new(c.as_str())
        .with_after(a.as_str())
        .execute(&ctx)
        .await
        .unwrap();
    assert!(moved["priority"].as_i64().unwrap() > 0);
    assert_eq!(names_in(&ctx, JobStatus::Quoting).await, vec!["B", "A", "C"]);
}

#[tokio::test]
async fn test_neighbour_from_other_column_rejected() {
    let (_temp, ctx) = setup().await;
    let q = add(&ctx, "Quote", JobStatus::Quoting).await;
    let p = add(&ctx, "Running", JobStatus::InProgress).await;

    // Neighbour is in progress but the job stays in quoting
    let result = ReorderJob::new(q.as_str())
        .with_before(p.as_str())
        .execute(&ctx)
        .await;
    assert!(matches!(result, Err(KanbanError::InvalidValue { .. })));
    assert_eq!(names_in(&ctx, JobStatus::Quoting).await, vec!["Quote"]);
}
