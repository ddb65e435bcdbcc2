use predicates::prelude::*;

use acceptance_framework::*;
use taskboard::models::{Stage, Task};

#[test]
fn test_list_shows_every_column() {
    let ctx = AcceptanceTestContext::new();
    let given = GivenBuilder::new(&ctx);
    given.task_exists("Write spec", "draft v1");
    given.task_in_stage("Ship it", Stage::Done);

    ctx.cmd().args(&["list"]).assert().success()
        .stdout(predicate::str::contains("Stories (1)"))
        .stdout(predicate::str::contains("Write spec - draft v1"))
        .stdout(predicate::str::contains("In Progress (0)"))
        .stdout(predicate::str::contains("Peer Review (0)"))
        .stdout(predicate::str::contains("In Testing (0)"))
        .stdout(predicate::str::contains("Done (1)"))
        .stdout(predicate::str::contains("Ship it"));
}

#[test]
fn test_list_empty_board() {
    let ctx = AcceptanceTestContext::new();

    ctx.cmd().args(&["list"]).assert().success()
        .stdout(predicate::str::contains("Stories (0)"))
        .stdout(predicate::str::contains("(no tasks)"));
}

#[test]
fn test_list_single_stage() {
    let ctx = AcceptanceTestContext::new();
    let given = GivenBuilder::new(&ctx);
    given.task_exists("Still a story", "");
    given.task_in_stage("Being reviewed", Stage::PeerReview);

    let output = ctx.cmd().args(&["list", "peer-review"]).assert().success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();

    assert!(stdout.starts_with("Peer Review (1)"));
    assert!(stdout.contains("Being reviewed"));
    assert!(!stdout.contains("Still a story"));
}

#[test]
fn test_list_stage_is_case_insensitive() {
    let ctx = AcceptanceTestContext::new();
    let given = GivenBuilder::new(&ctx);
    given.task_in_stage("Working", Stage::InProgress);

    for stage in ["IN-PROGRESS", "In Progress", "inProgress"] {
        ctx.cmd().args(&["list", stage]).assert().success()
            .stdout(predicate::str::contains("Working"));
    }
}

#[test]
fn test_list_json() {
    let ctx = AcceptanceTestContext::new();
    let given = GivenBuilder::new(&ctx);
    let a = given.task_exists("A", "first");
    let b = given.task_in_stage("B", Stage::Done);

    let output = ctx.cmd().args(&["list", "--json"]).assert().success();
    let tasks: Vec<Task> = serde_json::from_slice(&output.get_output().stdout).unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].id, a);
    assert_eq!(tasks[0].description, "first");
    assert_eq!(tasks[1].id, b);
    assert_eq!(tasks[1].status, Stage::Done);

    let output = ctx.cmd().args(&["list", "done", "--json"]).assert().success();
    let done: Vec<Task> = serde_json::from_slice(&output.get_output().stdout).unwrap();
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].id, b);
}

#[test]
fn test_list_unknown_stage() {
    let ctx = AcceptanceTestContext::new();

    ctx.cmd().args(&["list", "backlog"]).assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with("Error:"))
        .stderr(predicate::str::contains("Valid stages: stories, in-progress"));
}

#[test]
fn test_stages_table() {
    let ctx = AcceptanceTestContext::new();
    let given = GivenBuilder::new(&ctx);
    given.task_exists("A", "");
    given.task_exists("B", "");

    let output = ctx.cmd().args(&["stages"]).assert().success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let stories = stdout.lines().find(|l| l.starts_with("stories")).unwrap();
    assert!(stories.contains("Stories"));
    assert!(stories.contains("red"));
    assert!(stories.trim_end().ends_with('2'));
    assert!(stdout.contains("in-testing"));
}

#[test]
fn test_stages_json() {
    let ctx = AcceptanceTestContext::new();

    let output = ctx.cmd().args(&["stages", "--json"]).assert().success();
    let stages: serde_json::Value = serde_json::from_slice(&output.get_output().stdout).unwrap();
    let stages = stages.as_array().unwrap();
    assert_eq!(stages.len(), 5);
    assert_eq!(stages[0]["id"], "stories");
    assert_eq!(stages[3]["label"], "In Testing");
    assert_eq!(stages[3]["color"], "magenta");
    assert_eq!(stages[4]["tasks"], 0);
}

#[test]
fn test_piped_output_has_no_ansi() {
    let ctx = AcceptanceTestContext::new();
    let given = GivenBuilder::new(&ctx);
    given.task_exists("Plain", "");

    ctx.cmd().args(&["list"]).assert().success()
        .stdout(predicate::str::contains("\x1b[").not());
}
