//! Players repository
//!
//! Write operations take a `SqliteConnection` so they can run inside the
//! transaction of a listone sync.

use anyhow::{Context, Result, anyhow};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};

use crate::listone::{Player, PlayerAvailability, Role};

/// Keep `IN (...)` lists well below SQLite's bound-parameter limit
const DELETE_CHUNK_SIZE: usize = 500;

/// What an upsert did to the stored row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
    Unchanged,
}

/// Rows removed while deleting players
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeletedRows {
    pub players: u64,
    pub roster_entries: u64,
    pub trade_entries: u64,
}

fn player_from_row(row: &SqliteRow) -> Result<Player> {
    let id: i64 = row.try_get("id")?;
    let role_name: String = row.try_get("role")?;
    let role = Role::from_name(&role_name)
        .ok_or_else(|| anyhow!("Unknown role '{}' stored for player {}", role_name, id))?;

    Ok(Player {
        id,
        lastname: row.try_get("lastname")?,
        role,
        realteam: row.try_get("realteam")?,
        value: row.try_get("value")?,
    })
}

pub async fn get_player(conn: &mut SqliteConnection, id: i64) -> Result<Option<Player>> {
    let row = sqlx::query("SELECT id, lastname, role, realteam, value FROM players WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to get player")?;

    row.as_ref().map(player_from_row).transpose()
}

/// Insert the player, or update surname, role, team and quotation of an existing id
pub async fn upsert_player(conn: &mut SqliteConnection, player: &Player) -> Result<UpsertOutcome> {
    let outcome = match get_player(conn, player.id).await? {
        None => UpsertOutcome::Created,
        Some(existing) if existing == *player => return Ok(UpsertOutcome::Unchanged),
        Some(_) => UpsertOutcome::Updated,
    };

    sqlx::query(
        "INSERT INTO players (id, lastname, role, realteam, value)
         VALUES (?, ?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET
             lastname = excluded.lastname,
             role = excluded.role,
             realteam = excluded.realteam,
             value = excluded.value",
    )
    .bind(player.id)
    .bind(&player.lastname)
    .bind(player.role.as_str())
    .bind(&player.realteam)
    .bind(player.value)
    .execute(&mut *conn)
    .await
    .with_context(|| format!("Failed to upsert player {}", player.id))?;

    Ok(outcome)
}

pub async fn list_player_ids(conn: &mut SqliteConnection) -> Result<Vec<i64>> {
    let rows: Vec<(i64,)> = sqlx::query_as("SELECT id FROM players ORDER BY id")
        .fetch_all(&mut *conn)
        .await
        .context("Failed to list player ids")?;

    Ok(rows.into_iter().map(|(id,)| id).collect())
}

/// Delete players together with their roster and trade references
pub async fn delete_players(conn: &mut SqliteConnection, ids: &[i64]) -> Result<DeletedRows> {
    let mut deleted = DeletedRows::default();

    for chunk in ids.chunks(DELETE_CHUNK_SIZE) {
        let placeholders = vec!["?"; chunk.len()].join(", ");

        deleted.roster_entries += delete_in(
            conn,
            &format!("DELETE FROM team_players WHERE player_id IN ({})", placeholders),
            chunk,
        )
        .await
        .context("Failed to delete roster entries")?;

        deleted.trade_entries += delete_in(
            conn,
            &format!("DELETE FROM trade_players WHERE player_id IN ({})", placeholders),
            chunk,
        )
        .await
        .context("Failed to delete trade entries")?;

        deleted.players += delete_in(
            conn,
            &format!("DELETE FROM players WHERE id IN ({})", placeholders),
            chunk,
        )
        .await
        .context("Failed to delete players")?;
    }

    Ok(deleted)
}

async fn delete_in(conn: &mut SqliteConnection, sql: &str, ids: &[i64]) -> Result<u64> {
    let mut query = sqlx::query(sql);
    for id in ids {
        query = query.bind(*id);
    }
    let result = query.execute(&mut *conn).await?;
    Ok(result.rows_affected())
}

/// All players with the number of fantasy teams rostering each
pub async fn list_availability(pool: &SqlitePool) -> Result<Vec<PlayerAvailability>> {
    let rows = sqlx::query(
        r#"
        SELECT
            p.id,
            p.lastname,
            p.role,
            p.realteam,
            p.value,
            COUNT(tp.team_id) AS teams_count
        FROM players p
        LEFT JOIN team_players tp ON tp.player_id = p.id
        GROUP BY p.id
        ORDER BY p.lastname, p.id
        "#,
    )
    .fetch_all(pool)
    .await
    .context("Failed to list player availability")?;

    let mut players = Vec::with_capacity(rows.len());
    for row in rows {
        let player = player_from_row(&row)?;
        let teams_count = u32::try_from(row.try_get::<i64, _>("teams_count")?)
            .with_context(|| format!("Invalid team count for player {}", player.id))?;
        players.push(PlayerAvailability {
            player,
            teams_count,
        });
    }

    Ok(players)
}

pub async fn count_players(pool: &SqlitePool) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM players")
        .fetch_one(pool)
        .await
        .context("Failed to count players")?;
    Ok(count)
}
