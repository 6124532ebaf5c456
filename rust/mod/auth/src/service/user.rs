use luggage_core::{non_empty, now_rfc3339, ListParams, ListResult};
use luggage_sql::{Row, Value};
use tracing::info;

use crate::model::{Role, Signup, User};
use crate::service::password::hash_password;
use crate::service::{AuthError, AuthService};

const USER_COLUMNS: &str = "id, fullname, email, role, company, employee_id, created_at";

impl AuthService {
    /// Register a new user.
    pub fn signup(&self, input: Signup) -> Result<User, AuthError> {
        let fullname = input.fullname.trim().to_string();
        let email = normalize_email(&input.email);
        if fullname.is_empty() {
            return Err(AuthError::Validation("fullname is required".into()));
        }
        if !email.contains('@') {
            return Err(AuthError::Validation(format!("'{}' is not an email address", email)));
        }
        if input.password.is_empty() {
            return Err(AuthError::Validation("password is required".into()));
        }

        let password_hash = hash_password(&input.password)?;
        let company = non_empty(input.company);
        let employee_id = non_empty(input.employee_id);
        let now = now_rfc3339();

        let id = self
            .sql
            .insert(
                "INSERT INTO users (fullname, email, password_hash, role, company, employee_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                &[
                    Value::Text(fullname.clone()),
                    Value::Text(email.clone()),
                    Value::Text(password_hash),
                    Value::Text(input.role.as_str().into()),
                    company.clone().into(),
                    employee_id.clone().into(),
                    Value::Text(now.clone()),
                ],
            )
            .map_err(|e| match AuthError::from(e) {
                AuthError::Conflict(_) => {
                    AuthError::Conflict(format!("email {} is already registered", email))
                }
                other => other,
            })?;

        info!(user_id = id, role = %input.role, "registered user");

        Ok(User {
            id,
            fullname,
            email,
            role: input.role,
            company,
            employee_id,
            created_at: now,
        })
    }

    /// Get a user by id.
    pub fn get_user(&self, id: i64) -> Result<User, AuthError> {
        let sql = format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS);
        let rows = self.sql.query(&sql, &[Value::Integer(id)])?;
        let row = rows
            .first()
            .ok_or_else(|| AuthError::NotFound(format!("user {} not found", id)))?;
        row_to_user(row)
    }

    /// List users, oldest first.
    pub fn list_users(&self, params: &ListParams) -> Result<ListResult<User>, AuthError> {
        let sql = format!(
            "SELECT {} FROM users ORDER BY id LIMIT ?1 OFFSET ?2",
            USER_COLUMNS
        );
        let rows = self.sql.query(
            &sql,
            &[
                Value::Integer(params.clamped_limit() as i64),
                Value::Integer(params.offset as i64),
            ],
        )?;
        let items = rows.iter().map(row_to_user).collect::<Result<Vec<_>, _>>()?;
        let total = self.count_users(None)? as usize;
        Ok(ListResult { items, total })
    }

    /// Count users, optionally restricted to one role.
    pub fn count_users(&self, role: Option<Role>) -> Result<i64, AuthError> {
        let rows = match role {
            Some(r) => self.sql.query(
                "SELECT COUNT(*) AS cnt FROM users WHERE role = ?1",
                &[Value::Text(r.as_str().into())],
            )?,
            None => self.sql.query("SELECT COUNT(*) AS cnt FROM users", &[])?,
        };
        Ok(rows.first().and_then(|r| r.get_i64("cnt")).unwrap_or(0))
    }

    /// Look up a user and their password hash by email.
    pub(crate) fn find_credentials(&self, email: &str) -> Result<Option<(User, String)>, AuthError> {
        let sql = format!(
            "SELECT {}, password_hash FROM users WHERE email = ?1",
            USER_COLUMNS
        );
        let rows = self
            .sql
            .query(&sql, &[Value::Text(normalize_email(email))])?;
        match rows.first() {
            Some(row) => {
                let hash = row
                    .get_str("password_hash")
                    .ok_or_else(|| AuthError::Internal("missing password_hash column".into()))?
                    .to_string();
                Ok(Some((row_to_user(row)?, hash)))
            }
            None => Ok(None),
        }
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn row_to_user(row: &Row) -> Result<User, AuthError> {
    let missing = |col: &str| AuthError::Internal(format!("users row missing {}", col));
    let role = row
        .get_str("role")
        .ok_or_else(|| missing("role"))?
        .parse::<Role>()
        .map_err(AuthError::Internal)?;
    Ok(User {
        id: row.get_i64("id").ok_or_else(|| missing("id"))?,
        fullname: row.get_str("fullname").unwrap_or_default().to_string(),
        email: row.get_str("email").ok_or_else(|| missing("email"))?.to_string(),
        role,
        company: row.get_str("company").map(String::from),
        employee_id: row.get_str("employee_id").map(String::from),
        created_at: row.get_str("created_at").unwrap_or_default().to_string(),
    })
}
