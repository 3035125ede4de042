use quiz_core::model::LeaderboardEntry;
use storage::repository::{LeaderboardRepository, Storage};
use storage::sqlite::SqliteRepository;

fn entry(name: &str, score: u32, game: &str) -> LeaderboardEntry {
    LeaderboardEntry::new(name, score, game).unwrap()
}

#[tokio::test]
async fn sqlite_appends_and_lists_in_insertion_order() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_lb_list?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.append_entry(&entry("Ada", 3, "ML")).await.unwrap();
    repo.append_entry(&entry("Ada", 3, "ML")).await.unwrap();
    repo.append_entry(&entry("Lin", 1, "DL")).await.unwrap();

    let all = repo.list_entries().await.unwrap();
    let names: Vec<_> = all.iter().map(LeaderboardEntry::name).collect();
    assert_eq!(names, vec!["Ada", "Ada", "Lin"]);
}

#[tokio::test]
async fn sqlite_top_sorts_by_score_with_stable_ties_and_filters() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_lb_top?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    for (name, score, game) in [
        ("first", 2, "ML"),
        ("second", 5, "DL"),
        ("third", 2, "ML"),
        ("fourth", 4, "ML"),
    ] {
        repo.append_entry(&entry(name, score, game)).await.unwrap();
    }

    let top = repo.top_entries(3, None).await.unwrap();
    let names: Vec<_> = top.iter().map(LeaderboardEntry::name).collect();
    assert_eq!(names, vec!["second", "fourth", "first"]);

    let ml = repo.top_entries(10, Some("ML")).await.unwrap();
    let names: Vec<_> = ml.iter().map(LeaderboardEntry::name).collect();
    assert_eq!(names, vec!["fourth", "first", "third"]);
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_lb_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.append_entry(&entry("Ada", 5, "ML")).await.unwrap();
    repo.migrate().await.expect("second migrate");

    assert_eq!(repo.list_entries().await.unwrap().len(), 1);
}

#[tokio::test]
async fn storage_sqlite_builder_migrates() {
    let storage = Storage::sqlite("sqlite:file:memdb_lb_storage?mode=memory&cache=shared")
        .await
        .expect("storage");
    storage
        .leaderboard
        .append_entry(&entry("Ada", 4, "DL"))
        .await
        .unwrap();

    let top = storage.leaderboard.top_entries(10, Some("DL")).await.unwrap();
    assert_eq!(top.len(), 1);
}
