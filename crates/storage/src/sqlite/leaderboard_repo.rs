use quiz_core::model::LeaderboardEntry;
use sqlx::Row;

use super::SqliteRepository;
use crate::repository::{LeaderboardRepository, StorageError};

const VALID_ROW: &str =
    "trim(name, ' ' || char(9) || char(10) || char(13)) <> '' AND score >= 0";

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

/// Rows with a blank name or a score outside `u32` are skipped as absent.
fn map_entry_row(row: &sqlx::sqlite::SqliteRow) -> Result<Option<LeaderboardEntry>, StorageError> {
    let name: String = row.try_get("name").map_err(ser)?;
    let score: i64 = row.try_get("score").map_err(ser)?;
    let game: String = row.try_get("game").map_err(ser)?;

    let Ok(score) = u32::try_from(score) else {
        tracing::warn!(score, "skipping leaderboard row with out-of-range score");
        return Ok(None);
    };
    Ok(LeaderboardEntry::new(&name, score, game))
}

fn collect_rows(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<LeaderboardEntry>, StorageError> {
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        if let Some(entry) = map_entry_row(row)? {
            out.push(entry);
        }
    }
    Ok(out)
}

#[async_trait::async_trait]
impl LeaderboardRepository for SqliteRepository {
    async fn append_entry(&self, entry: &LeaderboardEntry) -> Result<(), StorageError> {
        sqlx::query(
            r"
                INSERT INTO leaderboard (name, score, game)
                VALUES (?1, ?2, ?3)
            ",
        )
        .bind(entry.name())
        .bind(i64::from(entry.score()))
        .bind(entry.game())
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }

    async fn list_entries(&self) -> Result<Vec<LeaderboardEntry>, StorageError> {
        let rows = sqlx::query("SELECT name, score, game FROM leaderboard ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;

        collect_rows(&rows)
    }

    async fn top_entries(
        &self,
        limit: usize,
        game: Option<&str>,
    ) -> Result<Vec<LeaderboardEntry>, StorageError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        // Rows that would be skipped on decode must not count against LIMIT.
        let mut sql = format!(
            "SELECT name, score, game FROM leaderboard WHERE {VALID_ROW} AND score <= {}",
            u32::MAX
        );
        if game.is_some() {
            sql.push_str(" AND game = ?2");
        }
        sql.push_str(" ORDER BY score DESC, id ASC LIMIT ?1");

        let mut query = sqlx::query(&sql).bind(limit);
        if let Some(game) = game {
            query = query.bind(game);
        }

        let rows = query.fetch_all(&self.pool).await.map_err(conn)?;
        collect_rows(&rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn top_skips_invalid_rows_before_limit() {
        let repo = SqliteRepository::connect("sqlite:file:memdb_lb_invalid?mode=memory&cache=shared")
            .await
            .unwrap();
        repo.migrate().await.unwrap();

        for (name, score) in [("   ", 9_i64), ("\t", 8), ("huge", 5_000_000_000), ("Ada", 3), ("Lin", 2)] {
            sqlx::query("INSERT INTO leaderboard (name, score, game) VALUES (?1, ?2, 'ML')")
                .bind(name)
                .bind(score)
                .execute(&repo.pool)
                .await
                .unwrap();
        }

        let top = repo.top_entries(2, None).await.unwrap();
        let names: Vec<_> = top.iter().map(LeaderboardEntry::name).collect();
        assert_eq!(names, vec!["Ada", "Lin"]);

        let ml = repo.top_entries(2, Some("ML")).await.unwrap();
        assert_eq!(ml.len(), 2);
    }
}
