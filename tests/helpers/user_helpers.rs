use fortalert::database::Database;
use fortalert::models::{OrgUnit, Role, User};

pub async fn create_test_org_unit(db: &Database, id: &str, name: &str) -> OrgUnit {
    let org_unit = OrgUnit::new(id.to_string(), name.to_string());
    db.create_org_unit(&org_unit)
        .await
        .expect("Failed to create org unit");
    org_unit
}

pub async fn create_test_user(
    db: &Database,
    name: &str,
    email: &str,
    role: Role,
    org_unit_id: Option<&str>,
) -> User {
    let user = User::new(
        name.to_string(),
        email.to_string(),
        role,
        org_unit_id.map(|s| s.to_string()),
    );
    db.create_user(&user).await.expect("Failed to create user");
    user
}

pub async fn create_inactive_user(
    db: &Database,
    name: &str,
    email: &str,
    role: Role,
    org_unit_id: Option<&str>,
) -> User {
    let mut user = User::new(
        name.to_string(),
        email.to_string(),
        role,
        org_unit_id.map(|s| s.to_string()),
    );
    user.active = false;
    db.create_user(&user).await.expect("Failed to create user");
    user
}
