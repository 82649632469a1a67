use sqlx::{any::AnyRow, Row};

use crate::{
    api::error::ApiResult,
    database::Database,
    models::{OrgUnit, Role, User},
};

fn user_from_row(row: &AnyRow) -> ApiResult<User> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        role: Role::from(row.try_get::<String, _>("role")?),
        org_unit_id: row.try_get("org_unit_id")?,
        active: row.try_get::<i64, _>("active")? != 0,
        created_at: row.try_get("created_at")?,
    })
}

impl Database {
    pub async fn create_org_unit(&self, org_unit: &OrgUnit) -> ApiResult<()> {
        sqlx::query("INSERT INTO org_units (id, name, created_at) VALUES (?, ?, ?)")
            .bind(&org_unit.id)
            .bind(&org_unit.name)
            .bind(&org_unit.created_at)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    pub async fn get_org_unit_by_id(&self, id: &str) -> ApiResult<Option<OrgUnit>> {
        let row = sqlx::query("SELECT id, name, created_at FROM org_units WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        if let Some(row) = row {
            Ok(Some(OrgUnit {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
                created_at: row.try_get("created_at")?,
            }))
        } else {
            Ok(None)
        }
    }

    pub async fn create_user(&self, user: &User) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO users (id, name, email, role, org_unit_id, active, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.role.as_str())
        .bind(&user.org_unit_id)
        .bind(if user.active { 1i64 } else { 0i64 })
        .bind(&user.created_at)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    pub async fn get_user_by_id(&self, id: &str) -> ApiResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, name, email, role, org_unit_id, active, created_at
             FROM users
             WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        match row {
            Some(row) => Ok(Some(user_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Active members of one org unit.
    pub async fn get_active_org_unit_members(&self, org_unit_id: &str) -> ApiResult<Vec<User>> {
        let rows = sqlx::query(
            "SELECT id, name, email, role, org_unit_id, active, created_at
             FROM users
             WHERE org_unit_id = ? AND active = 1",
        )
        .bind(org_unit_id)
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(user_from_row).collect()
    }

    /// All active users holding any of the given roles, across org units.
    pub async fn get_active_users_by_roles(&self, roles: &[Role]) -> ApiResult<Vec<User>> {
        if roles.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; roles.len()].join(", ");
        let sql = format!(
            "SELECT id, name, email, role, org_unit_id, active, created_at
             FROM users
             WHERE active = 1 AND role IN ({})",
            placeholders
        );

        let mut query = sqlx::query(&sql);
        for role in roles {
            query = query.bind(role.as_str());
        }

        let rows = query.fetch_all(self.pool()).await?;
        rows.iter().map(user_from_row).collect()
    }
}
