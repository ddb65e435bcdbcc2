// Drag/drop tests: the coordinator against a persisted board, and the `drag`
// command that replays a gesture over a terminal-width layout.

use acceptance_framework::*;
use taskboard::board::{BoardLayout, DragCoordinator, DropOutcome, GestureEvent, GestureInput, Point};
use taskboard::models::Stage;

#[test]
fn test_drag_command_moves_task() {
    // 100 wide: Stories 0..20, In Progress 20..40, Peer Review 40..60,
    // In Testing 60..80, Done 80..100
    let ctx = AcceptanceTestContext::new();
    let given = GivenBuilder::new(&ctx);
    let id = given.task_exists("Write spec", "draft v1");

    let mut when = WhenBuilder::new(&ctx);
    when.execute_success(&["drag", &id.to_string(), "--to", "90,3", "--width", "100"]);

    ThenBuilder::new(&ctx, when.result())
        .message_contains("from Stories to Done")
        .task_stage_is(id, Stage::Done);
}

#[test]
fn test_drag_command_touch_input() {
    let ctx = AcceptanceTestContext::new();
    let given = GivenBuilder::new(&ctx);
    let id = given.task_in_stage("Review me", Stage::PeerReview);

    let mut when = WhenBuilder::new(&ctx);
    when.execute_success(&["drag", &id.to_string(), "--to", "25,1", "--touch", "--width", "100"]);

    ThenBuilder::new(&ctx, when.result())
        .message_contains("from Peer Review to In Progress")
        .task_stage_is(id, Stage::InProgress);
}

#[test]
fn test_drag_command_release_outside_board() {
    let ctx = AcceptanceTestContext::new();
    let given = GivenBuilder::new(&ctx);
    let id = given.task_exists("Stay put", "");

    let mut when = WhenBuilder::new(&ctx);
    when.execute_success(&[
        "drag", &id.to_string(), "--to", "50,30", "--width", "100", "--height", "24",
    ]);

    ThenBuilder::new(&ctx, when.result())
        .message_contains("outside the board")
        .task_stage_is(id, Stage::Stories);
}

#[test]
fn test_drag_command_same_column() {
    let ctx = AcceptanceTestContext::new();
    let given = GivenBuilder::new(&ctx);
    let id = given.task_exists("Stay put", "");

    let mut when = WhenBuilder::new(&ctx);
    when.execute_success(&["drag", &id.to_string(), "--to", "5,5", "--width", "100"]);

    ThenBuilder::new(&ctx, when.result())
        .message_contains("stays in Stories")
        .task_stage_is(id, Stage::Stories);
}

#[test]
fn test_drag_command_errors() {
    let ctx = AcceptanceTestContext::new();
    let given = GivenBuilder::new(&ctx);
    let id = given.task_exists("Target", "");

    let mut when = WhenBuilder::new(&ctx);
    when.execute_failure(&["drag", "999", "--to", "90,3", "--width", "100"]);
    ThenBuilder::new(&ctx, when.result())
        .exit_code_is(1)
        .message_contains("not found");

    when.execute_failure(&["drag", &id.to_string(), "--to", "ninety", "--width", "100"]);
    ThenBuilder::new(&ctx, when.result())
        .exit_code_is(1)
        .message_contains("Invalid point");

    when.execute_failure(&["drag", &id.to_string(), "--to", "1,1", "--width", "0"]);
    ThenBuilder::new(&ctx, when.result())
        .exit_code_is(1)
        .message_contains("must be positive")
        .task_stage_is(id, Stage::Stories);

    for bad in ["NaN", "inf"] {
        when.execute_failure(&["drag", &id.to_string(), "--to", "1,1", "--width", bad]);
        ThenBuilder::new(&ctx, when.result())
            .exit_code_is(1)
            .message_contains("must be positive numbers")
            .task_stage_is(id, Stage::Stories);
    }
}

#[test]
fn test_coordinator_persists_drop() {
    let ctx = AcceptanceTestContext::new();
    let mut board = ctx.board();
    let id = board.create_task("Write spec", "draft v1").unwrap().id;

    let mut coordinator = DragCoordinator::new(BoardLayout::columns(500.0, 300.0));
    let events = [
        GestureEvent::Start { task_id: id, input: GestureInput::Pointer, at: Point::new(50.0, 20.0) },
        GestureEvent::Move { at: Point::new(260.0, 40.0) },
        GestureEvent::End { at: Point::new(260.0, 40.0) },
    ];
    let outcomes: Vec<DropOutcome> = events
        .into_iter()
        .filter_map(|e| coordinator.handle(&mut board, e))
        .collect();

    assert_eq!(
        outcomes,
        vec![DropOutcome::Moved { task_id: id, from: Stage::Stories, to: Stage::PeerReview }]
    );
    drop(board);

    // A fresh board over the same database sees the drop
    ThenBuilder::new(&ctx, None).task_stage_is(id, Stage::PeerReview);
}

#[test]
fn test_coordinator_cancelled_drop_writes_nothing() {
    let ctx = AcceptanceTestContext::new();
    let given = GivenBuilder::new(&ctx);
    let id = given.task_exists("Untouched", "");

    let mut board = ctx.board();
    let mut coordinator = DragCoordinator::new(BoardLayout::columns(500.0, 300.0));
    assert!(coordinator.start(&board, id, GestureInput::Touch, Point::new(10.0, 10.0)));
    assert_eq!(coordinator.update(Point::new(460.0, 10.0)), Some(Stage::Done));
    assert_eq!(
        coordinator.end(&mut board, Point::new(460.0, 310.0)),
        DropOutcome::Cancelled { task_id: id }
    );
    drop(board);

    ThenBuilder::new(&ctx, None).task_stage_is(id, Stage::Stories);
}
