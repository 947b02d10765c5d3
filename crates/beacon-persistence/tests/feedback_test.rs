//! Feedback persistence tests

mod common;

use beacon_persistence::{FeedbackPersistence, FeedbackStatus, NewFeedback, NewReply};
use chrono::Utc;
use common::setup;

fn submission(project_id: &str, content: &str) -> NewFeedback {
    NewFeedback {
        project_id: project_id.to_string(),
        username: "alice".to_string(),
        email: Some("alice@example.com".to_string()),
        content: content.to_string(),
        ip: "127.0.0.1".to_string(),
    }
}

fn reply(content: &str) -> NewReply {
    NewReply {
        content: content.to_string(),
        admin: "admin".to_string(),
        time: Utc::now(),
    }
}

#[tokio::test]
async fn test_create_is_pending() {
    let store = setup().await;

    let created = store
        .feedback_create(submission("p1", "crash on start"))
        .await
        .unwrap();

    assert_eq!(created.status, FeedbackStatus::Pending);
    assert!(created.reply_history.is_empty());
    assert!(created.reply_input.is_none());
}

#[tokio::test]
async fn test_replies_are_newest_first() {
    let store = setup().await;

    let created = store
        .feedback_create(submission("p1", "slow sync"))
        .await
        .unwrap();

    for text in ["a", "b", "c"] {
        store
            .feedback_update(created.id, None, Some(reply(text)))
            .await
            .unwrap()
            .unwrap();
    }

    let found = store.feedback_find_by_id(created.id).await.unwrap().unwrap();
    let history: Vec<_> = found
        .reply_history
        .iter()
        .map(|r| r.content.as_str())
        .collect();
    assert_eq!(history, vec!["c", "b", "a"]);
    assert_eq!(found.reply_input.as_deref(), Some("c"));
}

#[tokio::test]
async fn test_status_and_reply_in_one_update() {
    let store = setup().await;

    let created = store
        .feedback_create(submission("p1", "typo"))
        .await
        .unwrap();

    let updated = store
        .feedback_update(
            created.id,
            Some(FeedbackStatus::Resolved),
            Some(reply("fixed")),
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, FeedbackStatus::Resolved);
    assert_eq!(updated.reply_history.len(), 1);

    // Status only, history untouched
    let updated = store
        .feedback_update(created.id, Some(FeedbackStatus::Reviewed), None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, FeedbackStatus::Reviewed);
    assert_eq!(updated.reply_history.len(), 1);

    assert!(
        store
            .feedback_update(999, Some(FeedbackStatus::Resolved), None)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_search_page() {
    let store = setup().await;

    for i in 0..5 {
        store
            .feedback_create(submission("p1", &format!("item {i}")))
            .await
            .unwrap();
    }
    store
        .feedback_create(submission("p2", "elsewhere"))
        .await
        .unwrap();

    let page = store.feedback_search_page("p1", 1, 2).await.unwrap();
    assert_eq!(page.total_count, 5);
    assert_eq!(page.pages_available, 3);
    assert_eq!(page.page_items.len(), 2);
    assert_eq!(page.page_items[0].content, "item 4");

    let last = store.feedback_search_page("p1", 3, 2).await.unwrap();
    assert_eq!(last.page_items.len(), 1);
    assert_eq!(last.page_items[0].content, "item 0");
}

#[tokio::test]
async fn test_delete_removes_thread() {
    let store = setup().await;

    let created = store
        .feedback_create(submission("p1", "bye"))
        .await
        .unwrap();
    store
        .feedback_update(created.id, None, Some(reply("noted")))
        .await
        .unwrap();

    assert!(store.feedback_delete(created.id).await.unwrap());
    assert!(!store.feedback_delete(created.id).await.unwrap());
    assert!(
        store
            .feedback_find_by_id(created.id)
            .await
            .unwrap()
            .is_none()
    );
}
