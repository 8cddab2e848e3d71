// SPDX-FileCopyrightText: 2026 Statusbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the store crate.

use std::sync::Arc;

use statusbot_config::model::StorageConfig;
use statusbot_core::types::{
    ChatMessage, DeliveryKind, Jid, MediaKind, MessageId, MessageKey, MessagePayload,
};
use statusbot_store::{MediaVault, MessageCache};
use tracing_test::traced_test;

fn status(id: &str) -> ChatMessage {
    ChatMessage {
        key: MessageKey {
            remote_jid: Jid::new("status@broadcast"),
            id: MessageId(id.into()),
            from_me: false,
            participant: Some(Jid::new("222@s.whatsapp.net")),
        },
        payload: MessagePayload::Text {
            text: "status text".into(),
        },
        quoted: None,
        push_name: None,
        timestamp: 0,
        delivery: DeliveryKind::Notify,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_saves_and_clears_never_lose_consistency() {
    let dir = tempfile::tempdir().unwrap();
    let vault = Arc::new(MediaVault::open(dir.path()).unwrap());

    let mut tasks = Vec::new();
    for i in 0..16u8 {
        let vault = vault.clone();
        tasks.push(tokio::spawn(async move {
            vault.save(&[i; 64], MediaKind::Video).await.unwrap()
        }));
    }
    let clearer = {
        let vault = vault.clone();
        tokio::spawn(async move { vault.clear().await.unwrap() })
    };

    let mut saved = Vec::new();
    for task in tasks {
        saved.push(task.await.unwrap());
    }
    let cleared = clearer.await.unwrap();

    // Every save either landed before the clear (and was counted) or after it.
    let remaining = vault.count().await.unwrap();
    assert_eq!(cleared + remaining, saved.len());

    // Whatever remains is complete.
    for name in vault.list().await.unwrap() {
        assert_eq!(vault.read(&name).await.unwrap().len(), 64);
    }
}

#[tokio::test]
async fn clear_then_list_reports_zero() {
    let dir = tempfile::tempdir().unwrap();
    let vault = MediaVault::open(dir.path().join("status")).unwrap();
    for kind in [MediaKind::Image, MediaKind::Video, MediaKind::Audio] {
        vault.save(b"data", kind).await.unwrap();
    }
    assert_eq!(vault.list().await.unwrap().len(), 3);

    vault.clear().await.unwrap();
    assert_eq!(vault.list().await.unwrap().len(), 0);
}

#[tokio::test]
#[traced_test]
async fn corrupt_cache_is_logged_and_replaced_on_flush() {
    let dir = tempfile::tempdir().unwrap();
    let storage = StorageConfig {
        cache_path: dir.path().join("message_store.json"),
        cache_max_per_chat: 5,
        ..StorageConfig::default()
    };
    std::fs::write(&storage.cache_path, b"not json").unwrap();

    let cache = MessageCache::from_config(&storage).await;
    assert!(cache.is_empty().await);
    assert!(logs_contain("corrupt message cache"));

    cache.record(&status("S1")).await;
    cache.flush().await.unwrap();

    let reloaded = MessageCache::from_config(&storage).await;
    let hit = reloaded.find(&MessageId("S1".into())).await.unwrap();
    assert!(hit.key.remote_jid.is_status_broadcast());
}
