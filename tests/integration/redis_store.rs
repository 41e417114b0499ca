use super::{create_redis_store, is_redis_running};
use ragchat::models::{Role, SessionId, Turn};
use ragchat::storage::SessionStore;
use std::time::Duration;

fn unique_session(prefix: &str) -> SessionId {
    SessionId::for_tenant(&format!("it-{}", prefix))
}

#[tokio::test]
async fn test_redis_append_and_load_recent() {
    if !is_redis_running().await {
        eprintln!("Skipping: Redis not running");
        return;
    }

    let store = create_redis_store(Duration::from_secs(60)).await;
    store.ping().await.unwrap();
    let id = unique_session("recent");

    for i in 0..5 {
        let role = if i % 2 == 0 { Role::User } else { Role::Bot };
        store
            .append(&id, &Turn::new(role, format!("m{}", i)))
            .await
            .unwrap();
    }

    let all = store.load(&id).await.unwrap();
    assert_eq!(all.len(), 5);
    assert_eq!(all[0].message, "m0");

    let recent = store.load_recent(&id, 2).await.unwrap();
    let messages: Vec<&str> = recent.iter().map(|t| t.message.as_str()).collect();
    assert_eq!(messages, vec!["m3", "m4"]);

    store.clear(&id).await.unwrap();
}

#[tokio::test]
async fn test_redis_save_replaces_and_clear_is_idempotent() {
    if !is_redis_running().await {
        eprintln!("Skipping: Redis not running");
        return;
    }

    let store = create_redis_store(Duration::from_secs(60)).await;
    let id = unique_session("save");

    store
        .append(&id, &Turn::new(Role::User, "stale"))
        .await
        .unwrap();
    store
        .save(&id, &[Turn::new(Role::User, "q"), Turn::new(Role::Bot, "a")])
        .await
        .unwrap();

    let turns = store.load(&id).await.unwrap();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[1].role, Role::Bot);

    store.clear(&id).await.unwrap();
    store.clear(&id).await.unwrap();
    assert!(store.load(&id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_redis_session_expires() {
    if !is_redis_running().await {
        eprintln!("Skipping: Redis not running");
        return;
    }

    let store = create_redis_store(Duration::from_secs(1)).await;
    let id = unique_session("ttl");

    store
        .append(&id, &Turn::new(Role::User, "short lived"))
        .await
        .unwrap();
    assert_eq!(store.load(&id).await.unwrap().len(), 1);

    tokio::time::sleep(Duration::from_millis(2100)).await;
    assert!(store.load(&id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_redis_concurrent_appends_are_not_lost() {
    if !is_redis_running().await {
        eprintln!("Skipping: Redis not running");
        return;
    }

    let store = create_redis_store(Duration::from_secs(60)).await;
    let id = unique_session("concurrent");

    let mut handles = Vec::new();
    for i in 0..10 {
        let store = store.clone();
        let id = id.clone();
        handles.push(tokio::spawn(async move {
            store
                .append(&id, &Turn::new(Role::User, format!("c{}", i)))
                .await
                .unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(store.load(&id).await.unwrap().len(), 10);
    store.clear(&id).await.unwrap();
}
