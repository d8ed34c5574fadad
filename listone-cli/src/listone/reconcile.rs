//! Reconcile the player table with an uploaded listone

use std::collections::HashSet;
use std::fmt;

use anyhow::{Context, Result};
use sqlx::SqlitePool;

use crate::config::repository::players::{self, UpsertOutcome};
use crate::listone::{ListoneError, Player, QuotationRow};

/// What a sync changed in the database
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub deleted: usize,
    /// Roster slots freed because their player left the listone
    pub released_roster_slots: usize,
    /// Trade lines dropped because their player left the listone
    pub removed_trade_refs: usize,
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} created, {} updated, {} unchanged, {} deleted ({} roster slots, {} trade references)",
            self.created,
            self.updated,
            self.unchanged,
            self.deleted,
            self.released_roster_slots,
            self.removed_trade_refs
        )
    }
}

/// Upsert every row, then delete players missing from the file
///
/// Runs in one transaction. An empty listone is refused so that a bad
/// upload cannot wipe the player table.
pub async fn sync_listone(pool: &SqlitePool, rows: &[QuotationRow]) -> Result<SyncReport> {
    if rows.is_empty() {
        return Err(ListoneError::EmptyListone.into());
    }

    let mut tx = pool.begin().await.context("Failed to begin listone sync")?;
    let mut report = SyncReport::default();

    for row in rows {
        match players::upsert_player(&mut tx, &Player::from(row)).await? {
            UpsertOutcome::Created => report.created += 1,
            UpsertOutcome::Updated => report.updated += 1,
            UpsertOutcome::Unchanged => report.unchanged += 1,
        }
    }

    let incoming: HashSet<i64> = rows.iter().map(|r| r.id).collect();
    let stale: Vec<i64> = players::list_player_ids(&mut tx)
        .await?
        .into_iter()
        .filter(|id| !incoming.contains(id))
        .collect();

    if !stale.is_empty() {
        log::info!("Removing {} players no longer in the listone", stale.len());
        log::debug!("Removed player ids: {:?}", stale);

        let deleted = players::delete_players(&mut tx, &stale).await?;
        report.deleted = deleted.players as usize;
        report.released_roster_slots = deleted.roster_entries as usize;
        report.removed_trade_refs = deleted.trade_entries as usize;
    }

    tx.commit().await.context("Failed to commit listone sync")?;
    log::info!("Listone sync complete: {}", report);

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::repository::test_pool;
    use crate::listone::Role;

    fn row(id: i64, name: &str, value: i64) -> QuotationRow {
        QuotationRow {
            row: id as u32 + 2,
            id,
            role: Role::Centrocampista,
            lastname: name.to_string(),
            realteam: "Atalanta".to_string(),
            value,
        }
    }

    async fn player_ids(pool: &SqlitePool) -> Vec<i64> {
        let mut conn = pool.acquire().await.unwrap();
        players::list_player_ids(&mut conn).await.unwrap()
    }

    #[tokio::test]
    async fn test_first_sync_creates_everything() {
        let pool = test_pool().await;

        let report = sync_listone(&pool, &[row(1, "Ederson", 20), row(2, "De Roon", 12)])
            .await
            .unwrap();

        assert_eq!(
            report,
            SyncReport {
                created: 2,
                ..SyncReport::default()
            }
        );
        assert_eq!(player_ids(&pool).await, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_resync_updates_and_deletes() {
        let pool = test_pool().await;
        sync_listone(
            &pool,
            &[row(1, "Ederson", 20), row(2, "De Roon", 12), row(3, "Koopmeiners", 25)],
        )
        .await
        .unwrap();

        let report = sync_listone(
            &pool,
            &[row(1, "Ederson", 22), row(2, "De Roon", 12), row(4, "Pasalic", 9)],
        )
        .await
        .unwrap();

        assert_eq!(
            report,
            SyncReport {
                created: 1,
                updated: 1,
                unchanged: 1,
                deleted: 1,
                released_roster_slots: 0,
                removed_trade_refs: 0,
            }
        );
        assert_eq!(player_ids(&pool).await, vec![1, 2, 4]);
    }

    #[tokio::test]
    async fn test_deleted_players_lose_roster_and_trade_refs() {
        let pool = test_pool().await;
        sync_listone(&pool, &[row(1, "Ederson", 20), row(2, "De Roon", 12)])
            .await
            .unwrap();
        sqlx::query("INSERT INTO teams (id, name) VALUES (1, 'Alpha'), (2, 'Beta')")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO team_players (team_id, player_id) VALUES (1, 2), (2, 2), (2, 1)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO trades (id, from_team_id, to_team_id) VALUES (1, 1, 2)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO trade_players (trade_id, player_id, direction)
             VALUES (1, 2, 'offered'), (1, 1, 'requested')",
        )
        .execute(&pool)
        .await
        .unwrap();

        let report = sync_listone(&pool, &[row(1, "Ederson", 20)]).await.unwrap();

        assert_eq!(report.deleted, 1);
        assert_eq!(report.released_roster_slots, 2);
        assert_eq!(report.removed_trade_refs, 1);

        let (roster,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM team_players")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(roster, 1);
    }

    #[tokio::test]
    async fn test_empty_listone_is_refused() {
        let pool = test_pool().await;
        sync_listone(&pool, &[row(1, "Ederson", 20)]).await.unwrap();

        let err = sync_listone(&pool, &[]).await.unwrap_err();

        assert_eq!(
            err.downcast_ref::<ListoneError>(),
            Some(&ListoneError::EmptyListone)
        );
        assert_eq!(player_ids(&pool).await, vec![1]);
    }

    #[test]
    fn test_report_display() {
        let report = SyncReport {
            created: 3,
            updated: 2,
            unchanged: 10,
            deleted: 1,
            released_roster_slots: 2,
            removed_trade_refs: 0,
        };
        assert_eq!(
            report.to_string(),
            "3 created, 2 updated, 10 unchanged, 1 deleted (2 roster slots, 0 trade references)"
        );
    }
}
