//! Fantasy teams and their rosters

use anyhow::{Context, Result};
use sqlx::{Row, SqlitePool};

use super::players;
use crate::listone::ListoneError;

/// Summary of a fantasy team (for listing)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamSummary {
    pub id: i64,
    pub name: String,
    pub roster_size: i64,
}

pub async fn create_team(pool: &SqlitePool, name: &str) -> Result<i64> {
    let result = sqlx::query("INSERT INTO teams (name) VALUES (?)")
        .bind(name)
        .execute(pool)
        .await
        .with_context(|| format!("Failed to create team '{}'", name))?;

    Ok(result.last_insert_rowid())
}

pub async fn list_teams(pool: &SqlitePool) -> Result<Vec<TeamSummary>> {
    let rows = sqlx::query(
        r#"
        SELECT t.id, t.name, COUNT(tp.player_id) AS roster_size
        FROM teams t
        LEFT JOIN team_players tp ON tp.team_id = t.id
        GROUP BY t.id
        ORDER BY t.name
        "#,
    )
    .fetch_all(pool)
    .await
    .context("Failed to list teams")?;

    let mut teams = Vec::new();
    for row in rows {
        teams.push(TeamSummary {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            roster_size: row.try_get("roster_size")?,
        });
    }

    Ok(teams)
}

/// Add a copy of a player to a team's roster
///
/// Returns `false` if the team already had the player. Fails with
/// `ListoneError::NoCopiesLeft` once `max_copies` teams own the player.
pub async fn assign_player(
    pool: &SqlitePool,
    team_name: &str,
    player_id: i64,
    max_copies: u32,
) -> Result<bool> {
    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    let team_id: i64 = sqlx::query_scalar("SELECT id FROM teams WHERE name = ?")
        .bind(team_name)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to look up team")?
        .ok_or_else(|| ListoneError::UnknownTeam(team_name.to_string()))?;

    if players::get_player(&mut tx, player_id).await?.is_none() {
        return Err(ListoneError::UnknownPlayer(player_id).into());
    }

    let owners: Vec<(i64,)> = sqlx::query_as("SELECT team_id FROM team_players WHERE player_id = ?")
        .bind(player_id)
        .fetch_all(&mut *tx)
        .await
        .context("Failed to count player copies")?;

    if owners.iter().any(|(id,)| *id == team_id) {
        return Ok(false);
    }
    if owners.len() as u32 >= max_copies {
        return Err(ListoneError::NoCopiesLeft {
            player_id,
            max_copies,
        }
        .into());
    }

    sqlx::query("INSERT INTO team_players (team_id, player_id) VALUES (?, ?)")
        .bind(team_id)
        .bind(player_id)
        .execute(&mut *tx)
        .await
        .context("Failed to assign player")?;

    tx.commit().await.context("Failed to commit roster change")?;
    log::info!("Assigned player {} to team '{}'", player_id, team_name);

    Ok(true)
}

/// Remove a player from a team's roster; returns `false` if it was not there
pub async fn release_player(pool: &SqlitePool, team_name: &str, player_id: i64) -> Result<bool> {
    let team_id: i64 = sqlx::query_scalar("SELECT id FROM teams WHERE name = ?")
        .bind(team_name)
        .fetch_optional(pool)
        .await
        .context("Failed to look up team")?
        .ok_or_else(|| ListoneError::UnknownTeam(team_name.to_string()))?;

    let result = sqlx::query("DELETE FROM team_players WHERE team_id = ? AND player_id = ?")
        .bind(team_id)
        .bind(player_id)
        .execute(pool)
        .await
        .context("Failed to release player")?;

    Ok(result.rows_affected() > 0)
}
