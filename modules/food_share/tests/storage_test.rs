use std::sync::Arc;

use chrono::Utc;
use tempfile::tempdir;
use uuid::Uuid;

use food_share::contract::model::{FoodPost, GeoPoint, PostStatus};
use food_share::domain::repo::{ChangeOutcome, FoodPostRepository, PostChange};
use food_share::infra::storage::{InMemoryPostRepository, JsonFilePostRepository, LockConfig};

fn post(food: &str) -> FoodPost {
    FoodPost {
        id: Uuid::new_v4(),
        donor_id: Uuid::new_v4(),
        donor_name: "Donor".into(),
        food_name: food.into(),
        quantity: "3 trays".into(),
        description: Some("still warm".into()),
        estimated_weight: Some(1.25),
        pickup_date: "2025-02-02".into(),
        pickup_time: "09:15".into(),
        contact_number: "555".into(),
        address: "4 Quay St".into(),
        location: GeoPoint {
            lat: 51.5,
            lng: -0.12,
        },
        photos: vec!["data:image/jpeg;base64,AAAA".into()],
        status: PostStatus::Available,
        claimed_by: None,
        claimed_by_id: None,
        created_at: Utc::now(),
    }
}

fn repo_in(dir: &std::path::Path) -> JsonFilePostRepository {
    JsonFilePostRepository::new(dir, "foodloop_posts", LockConfig::default())
}

#[tokio::test]
async fn missing_or_blank_file_reads_as_empty() {
    let dir = tempdir().unwrap();
    let repo = repo_in(dir.path());
    assert!(repo.load_all().await.unwrap().is_empty());

    std::fs::write(repo.path(), "  \n").unwrap();
    assert!(repo.load_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn corrupt_file_is_an_error_with_path() {
    let dir = tempdir().unwrap();
    let repo = repo_in(dir.path());
    std::fs::write(repo.path(), "{not json").unwrap();

    let err = repo.load_all().await.unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("failed to parse"), "{msg}");
    assert!(msg.contains("foodloop_posts.json"), "{msg}");
}

#[tokio::test]
async fn document_is_a_camel_case_array_newest_first() {
    let dir = tempdir().unwrap();
    let repo = repo_in(dir.path());
    let older = post("Older");
    let newer = post("Newer");
    repo.upsert(older.clone()).await.unwrap();
    repo.upsert(newer.clone()).await.unwrap();

    let raw: serde_json::Value =
        serde_json::from_slice(&std::fs::read(repo.path()).unwrap()).unwrap();
    let arr = raw.as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["foodName"], "Newer");
    assert_eq!(arr[1]["pickupTime"], "09:15");

    assert_eq!(repo.load_all().await.unwrap(), vec![newer, older]);
}

#[tokio::test]
async fn upsert_replaces_in_place() {
    let dir = tempdir().unwrap();
    let repo = repo_in(dir.path());
    let a = post("A");
    let b = post("B");
    repo.upsert(a.clone()).await.unwrap();
    repo.upsert(b.clone()).await.unwrap();

    let mut renamed = a.clone();
    renamed.food_name = "A2".into();
    repo.upsert(renamed.clone()).await.unwrap();

    let stored = repo.load_all().await.unwrap();
    assert_eq!(stored, vec![b, renamed]);
    assert_eq!(
        repo.find_by_id(a.id).await.unwrap().unwrap().food_name,
        "A2"
    );
}

#[tokio::test]
async fn rejected_claim_leaves_file_untouched() {
    let dir = tempdir().unwrap();
    let repo = repo_in(dir.path());
    let p = post("Soup");
    repo.upsert(p.clone()).await.unwrap();

    let first = repo
        .apply(
            p.id,
            PostChange::Claim {
                claimer: "Ana".into(),
                claimer_id: Uuid::new_v4(),
            },
        )
        .await
        .unwrap();
    assert!(matches!(first, ChangeOutcome::Applied(ref q) if q.claimed_by.as_deref() == Some("Ana")));
    let bytes = std::fs::read(repo.path()).unwrap();

    let second = repo
        .apply(
            p.id,
            PostChange::Claim {
                claimer: "Ben".into(),
                claimer_id: Uuid::new_v4(),
            },
        )
        .await
        .unwrap();
    match second {
        ChangeOutcome::Rejected { current } => {
            assert_eq!(current.claimed_by.as_deref(), Some("Ana"))
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(std::fs::read(repo.path()).unwrap(), bytes);

    assert_eq!(
        repo.apply(Uuid::new_v4(), PostChange::Claim {
            claimer: "X".into(),
            claimer_id: Uuid::nil(),
        })
        .await
        .unwrap(),
        ChangeOutcome::NotFound
    );
}

#[tokio::test]
async fn leftover_lock_file_does_not_block_writes() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("foodloop_posts.json.lock"), "PID: 0\n").unwrap();
    let repo = repo_in(dir.path());
    repo.upsert(post("A")).await.unwrap();

    let mut files: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    files.sort();
    assert_eq!(files, vec!["foodloop_posts.json", "foodloop_posts.json.lock"]);
    assert_eq!(repo.load_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn concurrent_writers_on_separate_handles_lose_nothing() {
    let dir = tempdir().unwrap();
    let patient = LockConfig {
        max_wait: std::time::Duration::from_secs(30),
        ..LockConfig::default()
    };
    let repos: Vec<Arc<JsonFilePostRepository>> = (0..4)
        .map(|_| {
            Arc::new(JsonFilePostRepository::new(
                dir.path(),
                "foodloop_posts",
                patient.clone(),
            ))
        })
        .collect();

    let mut tasks = Vec::new();
    for (i, repo) in repos.iter().enumerate() {
        for j in 0..5 {
            let repo = repo.clone();
            tasks.push(tokio::spawn(async move {
                repo.upsert(post(&format!("w{i}-{j}"))).await
            }));
        }
    }
    for t in tasks {
        t.await.unwrap().unwrap();
    }

    let stored = repos[0].load_all().await.unwrap();
    assert_eq!(stored.len(), 20);
}

#[tokio::test]
async fn memory_repo_matches_file_semantics() {
    let repo = InMemoryPostRepository::new();
    let a = post("A");
    let b = post("B");
    repo.upsert(a.clone()).await.unwrap();
    repo.upsert(b.clone()).await.unwrap();
    assert!(repo.delete(a.id).await.unwrap());
    assert!(!repo.delete(a.id).await.unwrap());
    assert_eq!(repo.load_all().await.unwrap(), vec![b]);
}
