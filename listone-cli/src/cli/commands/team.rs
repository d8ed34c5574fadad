use anyhow::Result;
use colored::*;

use super::open_pool;
use crate::cli::TeamCommands;
use crate::config::Config;
use crate::config::repository::teams;

pub async fn handle_team_command(command: TeamCommands, config: Config) -> Result<()> {
    let pool = open_pool(&config).await?;

    match command {
        TeamCommands::Add { name } => {
            let id = teams::create_team(&pool, &name).await?;
            println!("Created team {} (id {})", name.green(), id);
        }
        TeamCommands::List => {
            let teams = teams::list_teams(&pool).await?;
            if teams.is_empty() {
                println!("{}", "No teams yet".dimmed());
            }
            for team in teams {
                println!("{:>4}  {:<30} {} players", team.id, team.name.bold(), team.roster_size);
            }
        }
        TeamCommands::Assign { team, player_id } => {
            if teams::assign_player(&pool, &team, player_id, config.listone.max_copies).await? {
                println!("Player {} assigned to {}", player_id, team.green());
            } else {
                println!("Player {} is already in {}", player_id, team.yellow());
            }
        }
        TeamCommands::Release { team, player_id } => {
            if teams::release_player(&pool, &team, player_id).await? {
                println!("Player {} released from {}", player_id, team.green());
            } else {
                println!("Player {} is not in {}", player_id, team.yellow());
            }
        }
    }

    Ok(())
}
