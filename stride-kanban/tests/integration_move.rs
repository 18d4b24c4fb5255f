//! Integration tests for drag-and-drop moves against the persisted store

use stride_kanban::{
    board::{GetBoard, InitBoard},
    task::{AddTask, BulkUpdateTasks, MoveTask},
    Execute, KanbanContext, KanbanOperationProcessor, Position, Slot, TaskPatch, TaskStatus,
};
use tempfile::TempDir;

async fn setup_backlog(names: &[&str]) -> (TempDir, KanbanContext, Vec<String>) {
    let temp = TempDir::new().unwrap();
    let ctx = KanbanContext::new(temp.path().join(".stride"));

    InitBoard::new("Sprint 12")
        .execute(&ctx)
        .await
        .into_result()
        .unwrap();

    let mut ids = Vec::new();
    for name in names {
        let added = AddTask::new(*name, "ws-1", "proj-1", "alice")
            .with_status(TaskStatus::Backlog)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        ids.push(added["id"].as_str().unwrap().to_string());
    }

    (temp, ctx, ids)
}

async fn lane_view(ctx: &KanbanContext, status: TaskStatus) -> Vec<(String, u64)> {
    let board = GetBoard::new("ws-1")
        .execute(ctx)
        .await
        .into_result()
        .unwrap();
    board["lanes"][status.as_str()]
        .as_array()
        .unwrap()
        .iter()
        .map(|task| {
            (
                task["name"].as_str().unwrap().to_string(),
                task["position"].as_u64().unwrap(),
            )
        })
        .collect()
}

#[tokio::test]
async fn test_same_lane_move_round_trip() {
    // Backlog=[a(1000), b(2000), c(3000)], drag c to the front.
    let (_temp, ctx, _ids) = setup_backlog(&["a", "b", "c"]).await;

    let result = MoveTask::new(
        "ws-1",
        Slot::new(TaskStatus::Backlog, 2),
        Slot::new(TaskStatus::Backlog, 0),
    )
    .execute(&ctx)
    .await
    .into_result()
    .unwrap();
    assert_eq!(result["count"], 3);

    let backlog = lane_view(&ctx, TaskStatus::Backlog).await;
    assert_eq!(
        backlog,
        vec![
            ("c".to_string(), 1_000),
            ("a".to_string(), 2_000),
            ("b".to_string(), 3_000),
        ]
    );
}

#[tokio::test]
async fn test_cross_lane_move_round_trip() {
    // Drag a from Backlog into the empty Done lane.
    let (_temp, ctx, _ids) = setup_backlog(&["a", "b", "c"]).await;

    MoveTask::new(
        "ws-1",
        Slot::new(TaskStatus::Backlog, 0),
        Slot::new(TaskStatus::Done, 0),
    )
    .execute(&ctx)
    .await
    .into_result()
    .unwrap();

    let backlog = lane_view(&ctx, TaskStatus::Backlog).await;
    assert_eq!(
        backlog,
        vec![("b".to_string(), 1_000), ("c".to_string(), 2_000)]
    );

    let done = lane_view(&ctx, TaskStatus::Done).await;
    assert_eq!(done, vec![("a".to_string(), 1_000)]);
}

#[tokio::test]
async fn test_settled_move_writes_nothing_further() {
    let (_temp, ctx, _ids) = setup_backlog(&["a", "b", "c"]).await;

    MoveTask::new(
        "ws-1",
        Slot::new(TaskStatus::Backlog, 2),
        Slot::new(TaskStatus::Backlog, 0),
    )
    .execute(&ctx)
    .await
    .into_result()
    .unwrap();

    // Dropping the task back onto the slot it already occupies is empty.
    let repeat = MoveTask::new(
        "ws-1",
        Slot::new(TaskStatus::Backlog, 0),
        Slot::new(TaskStatus::Backlog, 0),
    )
    .execute(&ctx)
    .await
    .into_result()
    .unwrap();
    assert_eq!(repeat["count"], 0);
}

#[tokio::test]
async fn test_display_order_matches_position_order_after_moves() {
    let (_temp, ctx, _ids) = setup_backlog(&["a", "b", "c", "d"]).await;

    let gestures = [
        (Slot::new(TaskStatus::Backlog, 3), Slot::new(TaskStatus::Backlog, 1)),
        (Slot::new(TaskStatus::Backlog, 0), Slot::new(TaskStatus::InReview, 0)),
        (Slot::new(TaskStatus::InReview, 0), Slot::new(TaskStatus::Backlog, 2)),
    ];
    for (source, dest) in gestures {
        MoveTask::new("ws-1", source, dest)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
    }

    for status in TaskStatus::ALL {
        let lane = lane_view(&ctx, status).await;
        for pair in lane.windows(2) {
            assert!(
                pair[0].1 < pair[1].1,
                "lane {} out of order: {:?}",
                status,
                lane
            );
        }
    }
}

#[tokio::test]
async fn test_move_batch_replays_through_bulk_update() {
    // The engine's MoveTask persists its own batch; an external client (the
    // drag-and-drop UI) may instead send the same batch through the bulk
    // endpoint. Both paths must land on the same store state.
    let (_temp, ctx_a, _) = setup_backlog(&["a", "b", "c"]).await;
    let (_temp_b, ctx_b, _) = setup_backlog(&["a", "b", "c"]).await;

    let moved = MoveTask::new(
        "ws-1",
        Slot::new(TaskStatus::Backlog, 2),
        Slot::new(TaskStatus::Backlog, 0),
    )
    .execute(&ctx_a)
    .await
    .into_result()
    .unwrap();

    // Replay the batch against the second store by task *name* (ids differ
    // between stores, positions and statuses must not).
    let board_b = GetBoard::new("ws-1")
        .execute(&ctx_b)
        .await
        .into_result()
        .unwrap();
    let name_of = |id: &str, board: &serde_json::Value| -> String {
        board["lanes"]
            .as_object()
            .unwrap()
            .values()
            .flat_map(|lane| lane.as_array().unwrap())
            .find(|task| task["id"] == id)
            .map(|task| task["name"].as_str().unwrap().to_string())
            .unwrap()
    };
    let board_a = GetBoard::new("ws-1")
        .execute(&ctx_a)
        .await
        .into_result()
        .unwrap();

    let updates: Vec<TaskPatch> = moved["updates"]
        .as_array()
        .unwrap()
        .iter()
        .map(|update| {
            let name = name_of(update["id"].as_str().unwrap(), &board_a);
            let id_b = board_b["lanes"]
                .as_object()
                .unwrap()
                .values()
                .flat_map(|lane| lane.as_array().unwrap())
                .find(|task| task["name"] == name.as_str())
                .map(|task| task["id"].as_str().unwrap().to_string())
                .unwrap();
            TaskPatch {
                id: id_b.into(),
                status: update["status"].as_str().unwrap().parse().unwrap(),
                position: Position::new(update["position"].as_u64().unwrap() as u32),
            }
        })
        .collect();

    BulkUpdateTasks::new(updates)
        .execute(&ctx_b)
        .await
        .into_result()
        .unwrap();

    assert_eq!(
        lane_view(&ctx_a, TaskStatus::Backlog).await,
        lane_view(&ctx_b, TaskStatus::Backlog).await
    );
}

#[tokio::test]
async fn test_moves_are_logged_with_actor() {
    let (_temp, ctx, _ids) = setup_backlog(&["a", "b"]).await;
    let processor = KanbanOperationProcessor::with_actor("alice");

    processor
        .process(
            &MoveTask::new(
                "ws-1",
                Slot::new(TaskStatus::Backlog, 1),
                Slot::new(TaskStatus::Backlog, 0),
            ),
            &ctx,
        )
        .await
        .unwrap();

    let entries = ctx.read_activity(Some(1)).await.unwrap();
    assert_eq!(entries[0].op, "move task");
    assert_eq!(entries[0].actor, Some("alice".to_string()));
}
