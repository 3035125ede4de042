use quiz_core::model::LeaderboardEntry;
use storage::flat_file::CsvLeaderboard;
use storage::repository::{LeaderboardRepository, Storage, StorageError};

fn entry(name: &str, score: u32, game: &str) -> LeaderboardEntry {
    LeaderboardEntry::new(name, score, game).unwrap()
}

#[tokio::test]
async fn csv_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leaderboard.csv");

    {
        let storage = Storage::csv(&path).unwrap();
        storage
            .leaderboard
            .append_entry(&entry("Ada", 4, "ML"))
            .await
            .unwrap();
        storage
            .leaderboard
            .append_entry(&entry("Lin", 5, "DL"))
            .await
            .unwrap();
    }

    let reopened = Storage::csv(&path).unwrap();
    let top = reopened.leaderboard.top_entries(10, None).await.unwrap();
    let names: Vec<_> = top.iter().map(LeaderboardEntry::name).collect();
    assert_eq!(names, vec!["Lin", "Ada"]);
}

#[tokio::test]
async fn csv_reads_hand_written_file_and_skips_blank_names() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leaderboard.csv");
    std::fs::write(&path, "Name,Score,Game\nAda,3,ML\n,5,ML\nLin,3,ML\n").unwrap();

    let repo = CsvLeaderboard::open(&path).unwrap();
    let all = repo.list_entries().await.unwrap();
    let names: Vec<_> = all.iter().map(LeaderboardEntry::name).collect();
    assert_eq!(names, vec!["Ada", "Lin"]);
}

#[tokio::test]
async fn csv_corrupt_rows_surface_as_serialization_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leaderboard.csv");
    std::fs::write(&path, "Name,Score,Game\nAda,not-a-number,ML\n").unwrap();

    let repo = CsvLeaderboard::open(&path).unwrap();
    let err = repo.list_entries().await.unwrap_err();
    assert!(matches!(err, StorageError::Serialization(_)));
}

#[tokio::test]
async fn csv_concurrent_appends_keep_every_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leaderboard.csv");
    let repo = std::sync::Arc::new(CsvLeaderboard::open(&path).unwrap());

    let mut handles = Vec::new();
    for i in 0..16_u32 {
        let repo = std::sync::Arc::clone(&repo);
        handles.push(tokio::spawn(async move {
            repo.append_entry(&entry(&format!("player{i}"), i % 6, "ML"))
                .await
                .unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(repo.list_entries().await.unwrap().len(), 16);
    let raw = std::fs::read_to_string(&path).unwrap();
    assert_eq!(raw.matches("Name,Score,Game").count(), 1);
}

#[tokio::test]
async fn csv_append_after_file_without_trailing_newline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leaderboard.csv");
    std::fs::write(&path, "Name,Score,Game\nAda,3,ML").unwrap();

    let repo = CsvLeaderboard::open(&path).unwrap();
    repo.append_entry(&entry("Lin", 4, "DL")).await.unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert_eq!(raw, "Name,Score,Game\nAda,3,ML\nLin,4,DL\n");

    let all = repo.list_entries().await.unwrap();
    let names: Vec<_> = all.iter().map(LeaderboardEntry::name).collect();
    assert_eq!(names, vec!["Ada", "Lin"]);
}
