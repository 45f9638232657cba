// src/services/auth_service.rs

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ProfileRepository,
    models::auth::{AuthResponse, Claims, Profile, ProfileRow, Role},
};

#[derive(Clone)]
pub struct AuthService {
    profile_repo: ProfileRepository,
    jwt_secret: String,
    pool: PgPool,
}

impl AuthService {
    pub fn new(profile_repo: ProfileRepository, jwt_secret: String, pool: PgPool) -> Self {
        Self {
            profile_repo,
            jwt_secret,
            pool,
        }
    }

    /// Cadastro de usuário. O perfil nasce `pending` e fica bloqueado até um
    /// admin promover. Se o e-mail já existe, tenta o login com as mesmas
    /// credenciais em vez de só falhar -- cobre o usuário que clica em
    /// "cadastrar" já tendo conta.
    pub async fn register_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, AppError> {
        // Hashing fora da transação e fora do runtime (bcrypt é CPU-bound).
        let password_clone = password.to_owned();
        let hashed_password =
            tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        match self
            .profile_repo
            .create(&self.pool, name, email, &hashed_password)
            .await
        {
            Ok(profile) => self.respond_with_token(profile),
            Err(AppError::EmailAlreadyExists) => {
                tracing::info!(email, "E-mail já cadastrado; tentando login direto");
                self.login_user(email, password).await
            }
            Err(e) => Err(e),
        }
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        let profile = self
            .profile_repo
            .find_by_email(&self.pool, email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = profile.password_hash.clone();
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.respond_with_token(profile)
    }

    /// Valida o token e recarrega o perfil do banco, para que promoção ou
    /// rebaixamento de papel valha já na próxima requisição.
    pub async fn validate_token(&self, token: &str) -> Result<Profile, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )?;

        let profile = self
            .profile_repo
            .find_by_id(&self.pool, token_data.claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)?;

        Ok(profile.into())
    }

    // --- Equipe ---

    pub async fn list_team(&self) -> Result<Vec<Profile>, AppError> {
        let profiles = self.profile_repo.list(&self.pool).await?;
        Ok(profiles.into_iter().map(Profile::from).collect())
    }

    pub async fn update_role(&self, id: Uuid, role: Role) -> Result<(), AppError> {
        self.profile_repo.update_role(&self.pool, id, role).await?;
        tracing::info!(profile_id = %id, ?role, "Papel do usuário alterado");
        Ok(())
    }

    fn respond_with_token(&self, profile: ProfileRow) -> Result<AuthResponse, AppError> {
        let token = self.create_token(profile.id)?;
        Ok(AuthResponse {
            token,
            profile: profile.into(),
        })
    }

    fn create_token(&self, profile_id: Uuid) -> Result<String, AppError> {
        let claims = Claims {
            sub: profile_id,
            exp: (Utc::now() + Duration::days(7)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;
        Ok(token)
    }
}
