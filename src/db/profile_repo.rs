// src/db/profile_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{ProfileRow, Role},
};

#[derive(Clone)]
pub struct ProfileRepository;

const PROFILE_COLUMNS: &str = "id, name, email, password_hash, role, created_at";

impl ProfileRepository {
    pub fn new() -> Self {
        Self
    }

    /// Cria o perfil já como `pending`; promoção é tarefa de admin.
    pub async fn create<'e, E>(
        &self,
        executor: E,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<ProfileRow, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let profile = sqlx::query_as::<_, ProfileRow>(&format!(
            r#"
            INSERT INTO profiles (id, name, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::EmailAlreadyExists;
                }
            }
            e.into()
        })?;
        Ok(profile)
    }

    pub async fn find_by_email<'e, E>(
        &self,
        executor: E,
        email: &str,
    ) -> Result<Option<ProfileRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let profile = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(executor)
        .await?;
        Ok(profile)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<ProfileRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let profile = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(profile)
    }

    pub async fn list<'e, E>(&self, executor: E) -> Result<Vec<ProfileRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let profiles = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles ORDER BY created_at"
        ))
        .fetch_all(executor)
        .await?;
        Ok(profiles)
    }

    pub async fn update_role<'e, E>(&self, executor: E, id: Uuid, role: Role) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("UPDATE profiles SET role = $2 WHERE id = $1")
            .bind(id)
            .bind(role)
            .execute(executor)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Perfil"));
        }
        Ok(())
    }
}
