//! Persistence and git sync tests
mod common;

use common::{add_order, add_sunday_rule, handler_at};
use git2::Repository;
use ordercal_mcp::{OrderCalendarHandler, ServerConfig};
use std::fs;
use tempfile::TempDir;

#[tokio::test]
async fn test_schedule_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("schedule.toml");

    {
        let handler = handler_at(&path);
        add_sunday_rule(&handler).await;
        add_order(&handler, "po-1", "2024-01-10", 5).await.unwrap();
        handler
            .handle_cancel_holiday("holiday-1".to_string(), Some("2024-02-01".to_string()))
            .await
            .unwrap();
    }

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("format_version = 1"));
    assert!(content.contains("[[holiday]]"));
    assert!(content.contains("[[order]]"));
    assert!(content.contains("cancelled = true"));

    let handler = handler_at(&path);
    let list = handler
        .handle_list_orders(None, None, None, None, None)
        .await
        .unwrap();
    assert!(list.contains("2024-01-05 → 2024-01-10"));
    // The cancelled Sunday rule leaves the cached holiday stale
    assert!(list.contains("Holiday cache outdated"));

    let rules = handler.handle_list_holidays(Some(true)).await.unwrap();
    assert!(rules.contains("[cancelled on 2024-02-01]"));

    // The rule counter survives, so new IDs do not collide
    let next = handler
        .handle_add_holiday(
            "specific_date".to_string(),
            "Closure".to_string(),
            Some("2024-03-01".to_string()),
            None,
            None,
            None,
        )
        .await
        .unwrap();
    assert!(next.contains("holiday-2"));
}

#[tokio::test]
async fn test_sync_git_commits_each_change() {
    let dir = TempDir::new().unwrap();
    let repo = Repository::init(dir.path()).unwrap();
    let mut config = repo.config().unwrap();
    config.set_str("user.name", "Planner").unwrap();
    config.set_str("user.email", "planner@example.com").unwrap();

    let path = dir.path().join("schedule.toml");
    let handler =
        OrderCalendarHandler::new(ServerConfig::new(&path).with_sync_git(true)).unwrap();

    add_order(&handler, "po-1", "2024-01-10", 2).await.unwrap();
    let head = repo.head().unwrap().peel_to_commit().unwrap();
    assert_eq!(head.message(), Some("Add order po-1"));

    handler
        .handle_change_status(vec!["po-1".to_string()], "done".to_string())
        .await
        .unwrap();
    let head = repo.head().unwrap().peel_to_commit().unwrap();
    assert_eq!(head.message(), Some("Change po-1 status to done"));
    assert_eq!(head.parent_count(), 1);
}

#[tokio::test]
async fn test_sync_failure_keeps_the_saved_change() {
    let dir = TempDir::new().unwrap();
    let repo = Repository::init(dir.path()).unwrap();
    let mut config = repo.config().unwrap();
    config.set_str("user.name", "Planner").unwrap();
    config.set_str("user.email", "planner@example.com").unwrap();
    repo.remote("origin", "/nonexistent/remote.git").unwrap();

    let path = dir.path().join("schedule.toml");
    let handler =
        OrderCalendarHandler::new(ServerConfig::new(&path).with_sync_git(true)).unwrap();

    let result = add_order(&handler, "po-1", "2024-01-10", 2).await.unwrap();
    assert!(result.contains("Order created with ID: po-1"));
    assert!(result.contains("git sync failed"));
    assert!(fs::read_to_string(&path).unwrap().contains("id = \"po-1\""));

    // A retry is a real duplicate, and the next change still goes through
    assert!(add_order(&handler, "po-1", "2024-01-10", 2).await.is_err());
    let result = handler
        .handle_change_status(vec!["po-1".to_string()], "done".to_string())
        .await
        .unwrap();
    assert!(result.contains("po-1: planned → done"));
    assert!(result.contains("git sync failed"));
}

#[tokio::test]
async fn test_failed_write_rolls_back_the_change() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("schedule.toml");
    let handler = handler_at(&path);
    add_order(&handler, "po-1", "2024-01-10", 2).await.unwrap();

    // A directory where the temporary file goes makes the write fail
    let blocker = dir.path().join("schedule.toml.tmp");
    fs::create_dir(&blocker).unwrap();
    assert!(add_order(&handler, "po-2", "2024-01-12", 2).await.is_err());

    let list = handler
        .handle_list_orders(None, None, None, None, None)
        .await
        .unwrap();
    assert!(list.contains("[po-1]"));
    assert!(!list.contains("[po-2]"));
    assert!(!fs::read_to_string(&path).unwrap().contains("po-2"));

    fs::remove_dir(&blocker).unwrap();
    let retry = add_order(&handler, "po-2", "2024-01-12", 2).await.unwrap();
    assert!(retry.contains("Order created with ID: po-2"));
    assert!(!retry.contains("git sync failed"));
}
