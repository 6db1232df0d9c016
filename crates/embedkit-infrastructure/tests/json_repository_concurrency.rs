use std::sync::Arc;

use embedkit_core::embed::EmbedDraft;
use embedkit_core::store::{EmbedRepository, Identifier};
use embedkit_infrastructure::JsonEmbedRepository;
use tempfile::TempDir;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_saves_are_all_kept() {
    let temp_dir = TempDir::new().unwrap();
    let repo = Arc::new(
        JsonEmbedRepository::new_with_base(temp_dir.path())
            .await
            .unwrap(),
    );

    let mut handles = Vec::new();
    for n in 0..16 {
        let repo = Arc::clone(&repo);
        handles.push(tokio::spawn(async move {
            let document = EmbedDraft::new()
                .with_title(format!("Embed {n}"))
                .build()
                .unwrap();
            let id = Identifier::parse(&format!("embed-{n:02}")).unwrap();
            repo.save("config", &id, document).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let ids = repo.list("config").await.unwrap();
    assert_eq!(ids.len(), 16);
    assert_eq!(ids.first().map(Identifier::as_str), Some("embed-00"));
    assert_eq!(ids.last().map(Identifier::as_str), Some("embed-15"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn readers_never_see_partial_records() {
    let temp_dir = TempDir::new().unwrap();
    let repo = Arc::new(
        JsonEmbedRepository::new_with_base(temp_dir.path())
            .await
            .unwrap(),
    );
    let id = Identifier::parse("Status").unwrap();

    let writer = {
        let repo = Arc::clone(&repo);
        let id = id.clone();
        tokio::spawn(async move {
            for n in 0..20 {
                let document = EmbedDraft::new()
                    .with_title(format!("rev {n}"))
                    .with_description("x".repeat(500))
                    .build()
                    .unwrap();
                repo.save("config", &id, document).await.unwrap();
            }
        })
    };

    for _ in 0..40 {
        if let Some(record) = repo.get("config", &id).await.unwrap() {
            assert!(record.document.title().unwrap().starts_with("rev "));
            assert_eq!(record.document.description().map(str::len), Some(500));
        }
        tokio::task::yield_now().await;
    }
    writer.await.unwrap();

    let record = repo.get("config", &id).await.unwrap().unwrap();
    assert_eq!(record.document.title(), Some("rev 19"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn repositories_sharing_a_directory_keep_every_save() {
    let temp_dir = TempDir::new().unwrap();
    let mut repos = Vec::new();
    for _ in 0..4 {
        repos.push(Arc::new(
            JsonEmbedRepository::new_with_base(temp_dir.path())
                .await
                .unwrap(),
        ));
    }

    let mut handles = Vec::new();
    for n in 0..24 {
        let repo = Arc::clone(&repos[n % repos.len()]);
        handles.push(tokio::spawn(async move {
            let document = EmbedDraft::new()
                .with_title(format!("Embed {n}"))
                .build()
                .unwrap();
            let id = Identifier::parse(&format!("shared-{n:02}")).unwrap();
            repo.save("config", &id, document).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let reopened = JsonEmbedRepository::new_with_base(temp_dir.path())
        .await
        .unwrap();
    assert_eq!(reopened.list("config").await.unwrap().len(), 24);

    let mut leftovers: Vec<String> = std::fs::read_dir(temp_dir.path().join("partitions"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    leftovers.sort();
    assert_eq!(leftovers, ["config.json", "config.lock"]);
}
