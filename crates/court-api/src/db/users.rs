//! User persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `users` table.

use sqlx::PgPool;

use court_core::Role;
use court_state::User;

/// Insert a new user row.
pub async fn insert(pool: &PgPool, user: &User) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO users (id, name, email, password_hash, role)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(user.id)
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.role.as_str())
    .execute(pool)
    .await?;

    Ok(())
}

/// Load all users from the database into the in-memory store on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
    let rows = sqlx::query_as::<_, UserRow>(
        "SELECT id, name, email, password_hash, role FROM users ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    let mut users = Vec::with_capacity(rows.len());
    for row in rows {
        match row.into_record() {
            Some(user) => users.push(user),
            None => {
                tracing::error!("skipping user row with invalid role during load_all");
            }
        }
    }
    Ok(users)
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    password_hash: String,
    role: String,
}

impl UserRow {
    fn into_record(self) -> Option<User> {
        let role = match Role::parse(&self.role) {
            Ok(role) => role,
            Err(_) => {
                tracing::warn!(id = self.id, role = %self.role, "skipping user row with invalid role");
                return None;
            }
        };
        Some(User {
            id: self.id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            role,
        })
    }
}
