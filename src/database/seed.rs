use sqlx::PgPool;
use tracing::info;

use crate::auth::password;
use crate::database::{admins, roles};

/// Bootstrap roles and a default admin account on an empty admins table.
/// Safe to run on every startup; does nothing once admins exist.
pub async fn seed_admin_accounts(pool: &PgPool) -> anyhow::Result<()> {
    if admins::count(pool).await? > 0 {
        return Ok(());
    }

    info!("No admin accounts found, creating default roles and admin user");

    let super_admin = roles::create(
        pool,
        "Super Admin",
        "Full access to all features",
        &["all".to_string()],
    )
    .await?;

    roles::create(
        pool,
        "Content Manager",
        "Manage content and notifications",
        &["content".to_string(), "notification".to_string()],
    )
    .await?;

    roles::create(
        pool,
        "Reels Manager",
        "Manage reels, leagues, and content",
        &[
            "reels".to_string(),
            "content".to_string(),
            "leagues".to_string(),
        ],
    )
    .await?;

    // Default credentials must be rotated on first login
    let password_hash = password::hash_password("admin123")?;
    let admin = admins::create(
        pool,
        admins::NewAdmin {
            username: "admin",
            email: "admin@gambitadmin.com",
            name: "Administrator",
            password_hash: &password_hash,
            is_active: true,
        },
    )
    .await?;

    admins::assign_role(pool, admin.id, super_admin.id).await?;

    info!("Created default admin account: username=admin");
    Ok(())
}
