// ============================
// crates/backend-lib/src/seed.rs
// ============================
//! Startup seeding of development members.
use tracing::{debug, info};

use crate::auth::AuthService;
use crate::config::SeedSettings;
use crate::error::AppError;

/// Join every configured seed member. Usernames that already exist are
/// skipped, so restarting against a persistent store is harmless.
///
/// Returns the number of members created.
pub async fn seed_members(auth: &dyn AuthService, seed: &SeedSettings) -> Result<usize, AppError> {
    if !seed.enabled {
        return Ok(0);
    }

    let mut created = 0;
    for member in &seed.members {
        match auth.join(&member.username, &member.password).await {
            Ok(_) => created += 1,
            Err(AppError::DuplicateMember(username)) => {
                debug!(%username, "seed member already present");
            }
            Err(e) => return Err(e),
        }
    }

    info!(created, total = seed.members.len(), "seed members applied");
    Ok(created)
}
