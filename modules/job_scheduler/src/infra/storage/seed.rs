use std::str::FromStr;

use anyhow::Context;
use tracing::{info, warn};

use crate::config::SeedConfig;
use crate::contract::model::{Role, Team, User};
use crate::domain::repo::JobsRepository;
use crate::infra::auth::hash_password;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub teams: usize,
    pub users_created: usize,
    pub users_skipped: usize,
}

/// Write reference teams and initial users. Safe to run on every start:
/// teams are upserted, users are only added when their email is new.
pub async fn seed(repo: &dyn JobsRepository, cfg: &SeedConfig) -> anyhow::Result<SeedReport> {
    let mut report = SeedReport::default();

    for t in &cfg.teams {
        repo.upsert_team(&Team {
            id: t.id.clone(),
            name: t.name.clone(),
        })
        .await
        .with_context(|| format!("seeding team {}", t.id))?;
        report.teams += 1;
    }

    for u in &cfg.users {
        if repo.find_user_by_email(&u.email).await?.is_some() {
            report.users_skipped += 1;
            continue;
        }

        let role = Role::from_str(&u.role).map_err(|e| anyhow::anyhow!("seed user {}: {e}", u.uid))?;
        let team_id = match role {
            Role::Manager => None,
            Role::Team => {
                if u.team_id.is_none() {
                    warn!(uid = %u.uid, "Team user without a team will see no jobs");
                }
                u.team_id.clone()
            }
        };

        let user = User {
            uid: u.uid.clone(),
            email: u.email.clone(),
            name: u.name.clone(),
            role,
            team_id,
        };
        let hash = hash_password(&u.password)?;
        repo.insert_user(&user, &hash)
            .await
            .with_context(|| format!("seeding user {}", u.uid))?;
        report.users_created += 1;
    }

    info!(
        teams = report.teams,
        users_created = report.users_created,
        users_skipped = report.users_skipped,
        "Seed data applied"
    );
    Ok(report)
}
