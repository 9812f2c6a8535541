//! User repository for database operations

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::info;
use uuid::Uuid;

use crate::models::{NewUser, ProfileUpdate, User};

const USER_COLUMNS: &str = "id, name, username, email, password_hash, role, age, gender, city, \
                            experience, organization, about_org, skills, portfolio_url, \
                            created_at, updated_at";

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user, hashing the password on the way in
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        info!("Creating new user: {}", new_user.username);

        let salt = SaltString::generate(&mut rand::thread_rng());
        let argon2 = Argon2::default();
        let password_hash = argon2
            .hash_password(new_user.password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
            .to_string();

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (name, username, email, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(&new_user.name)
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&password_hash)
        .bind(new_user.role.as_str())
        .fetch_one(&self.pool)
        .await?;

        map_user(&row)
    }

    /// Find a user by username or email (caller passes the identifier
    /// already trimmed and lowercased)
    pub async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE username = $1 OR email = $1
            "#,
        ))
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_user).transpose()
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_user).transpose()
    }

    /// Check whether an email or username is already registered
    pub async fn identity_exists(&self, email: &str, username: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 OR username = $2)
            "#,
        )
        .bind(email)
        .bind(username)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Check whether a username belongs to someone other than `exclude`
    pub async fn username_taken(&self, username: &str, exclude: Uuid) -> Result<bool> {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 AND id <> $2)
            "#,
        )
        .bind(username)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }

    /// Verify a user's password
    pub async fn verify_password(&self, user: &User, password: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

        let argon2 = Argon2::default();
        let result = argon2.verify_password(password.as_bytes(), &parsed_hash);

        Ok(result.is_ok())
    }

    /// Apply an allow-listed partial profile update
    pub async fn update_profile(&self, id: Uuid, update: &ProfileUpdate) -> Result<User> {
        info!("Updating profile for user: {}", id);

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE users SET updated_at = now()");

        if let Some(name) = &update.name {
            qb.push(", name = ");
            qb.push_bind(name.clone());
        }
        if let Some(username) = &update.username {
            qb.push(", username = ");
            qb.push_bind(username.clone());
        }
        if let Some(age) = update.age {
            qb.push(", age = ");
            qb.push_bind(age);
        }
        if let Some(gender) = &update.gender {
            qb.push(", gender = ");
            qb.push_bind(gender.clone());
        }
        if let Some(city) = &update.city {
            qb.push(", city = ");
            qb.push_bind(city.clone());
        }
        if let Some(experience) = update.experience {
            qb.push(", experience = ");
            qb.push_bind(experience);
        }
        if let Some(organization) = &update.organization {
            qb.push(", organization = ");
            qb.push_bind(organization.clone());
        }
        if let Some(about_org) = &update.about_org {
            qb.push(", about_org = ");
            qb.push_bind(about_org.clone());
        }
        if let Some(skills) = &update.skills {
            qb.push(", skills = ");
            qb.push_bind(skills.clone());
        }
        if let Some(portfolio_url) = &update.portfolio_url {
            qb.push(", portfolio_url = ");
            qb.push_bind(portfolio_url.clone());
        }

        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(&format!(" RETURNING {USER_COLUMNS}"));

        let row = qb.build().fetch_one(&self.pool).await?;
        map_user(&row)
    }
}

fn map_user(row: &PgRow) -> Result<User> {
    Ok(User {
        id: row.get("id"),
        name: row.get("name"),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        role: row
            .get::<String, _>("role")
            .parse()
            .map_err(anyhow::Error::msg)?,
        age: row.get("age"),
        gender: row.get("gender"),
        city: row.get("city"),
        experience: row.get("experience"),
        organization: row.get("organization"),
        about_org: row.get("about_org"),
        skills: row.get("skills"),
        portfolio_url: row.get("portfolio_url"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
