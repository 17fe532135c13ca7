use crate::core::state::AppState;
use crate::services::{credentials, roster, session};

/// Startup seeding. Safe to run on every start: existing rows are left as
/// they are.
pub(crate) async fn seed(state: &AppState) -> anyhow::Result<()> {
    credentials::ensure_seed_admin(state.db(), state.settings().seed()).await?;

    let inserted = roster::seed_rosters(state.db(), state.reference()).await?;
    tracing::debug!(inserted, groups = state.reference().groups.len(), "Roster seed checked");

    session::prune_expired(state.db(), state.settings().security().token_lifetime()).await?;

    Ok(())
}
