use crate::{
    config::BootstrapAdminConfig,
    error::{ApiError, Result},
    models::{
        role::Role,
        user::{LoginRequest, LoginResponse, MeResponse, RegisterRequest, UserResponse},
    },
    services::jwt_service::JWTService,
};
use entity::user;
use sea_orm::{entity::*, query::*, DatabaseConnection};
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

pub struct UserService {
    db: DatabaseConnection,
    jwt_service: Arc<JWTService>,
}

impl UserService {
    pub fn new(db: DatabaseConnection, jwt_service: Arc<JWTService>) -> Self {
        Self { db, jwt_service }
    }

    /// Check credentials and issue a token; the token travels in the session cookie
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> Result<(LoginResponse, String)> {
        let user = self.find_by_email(&request.email).await?.ok_or_else(|| {
            warn!("Login attempt for unknown email");
            invalid_credentials()
        })?;

        if !verify_password(request.password, user.password.clone()).await? {
            warn!("Login attempt with wrong password");
            return Err(invalid_credentials());
        }

        let role = Role::from_code(&user.role_code).ok_or_else(|| {
            anyhow::anyhow!("User {} has unknown role {}", user.id, user.role_code)
        })?;

        let token = self.jwt_service.generate_token(&user.email, role)?;

        info!("User {} logged in", user.id);

        let response = LoginResponse {
            name: user.name,
            expires_in: self.jwt_service.expiration_seconds(),
        };

        Ok((response, token))
    }

    /// Name and role of the authenticated user
    #[instrument(skip(self))]
    pub async fn me(&self, email: &str) -> Result<MeResponse> {
        let user = self
            .find_by_email(email)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("User no longer exists".to_string()))?;

        Ok(MeResponse {
            name: user.name,
            role_code: user.role_code,
        })
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: RegisterRequest) -> Result<UserResponse> {
        if self.find_by_email(&request.email).await?.is_some() {
            return Err(ApiError::Conflict(format!(
                "User {} already exists",
                request.email
            )));
        }

        let password = hash_password(request.password).await?;
        let user = self
            .insert(request.email, request.name, password, request.role_code)
            .await?;

        info!("Registered user {} with role {}", user.id, user.role_code);

        Ok(user.into())
    }

    /// Create the configured administrator unless a user with that email exists
    #[instrument(skip(self, admin), fields(email = %admin.email))]
    pub async fn ensure_administrator(&self, admin: &BootstrapAdminConfig) -> Result<()> {
        if self.find_by_email(&admin.email).await?.is_some() {
            return Ok(());
        }

        let password = hash_password(admin.password.clone()).await?;
        let user = self
            .insert(
                admin.email.clone(),
                admin.name.clone(),
                password,
                Role::Administrator.as_str().to_string(),
            )
            .await?;

        info!("Created bootstrap administrator {}", user.id);

        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>> {
        Ok(user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?)
    }

    async fn insert(
        &self,
        email: String,
        name: String,
        password: String,
        role_code: String,
    ) -> Result<user::Model> {
        let now = OffsetDateTime::now_utc();
        let user = user::ActiveModel {
            email: Set(email),
            name: Set(name),
            password: Set(password),
            role_code: Set(role_code),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        Ok(user)
    }
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized("Invalid email or password".to_string())
}

async fn hash_password(password: String) -> Result<String> {
    let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| ApiError::Internal(e.into()))?
        .map_err(|e| ApiError::Internal(e.into()))?;

    Ok(hashed)
}

async fn verify_password(password: String, hash: String) -> Result<bool> {
    let valid = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| ApiError::Internal(e.into()))?
        .map_err(|e| ApiError::Internal(e.into()))?;

    Ok(valid)
}
