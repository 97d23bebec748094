use std::sync::Arc;

use serde_json::Value;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::error::ServiceError;
use crate::auth::password::hash_password;
use crate::database::models::{FileUrls, NewUser, RegisteredUser, User, UserChanges, UserProfile};
use crate::database::UserStore;
use crate::validation::{FieldRule, Schema, ValidationErrors};

/// Registration, profile maintenance and credential checks
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    files: FileUrls,
}

fn register_schema() -> Schema {
    Schema::new(vec![
        FieldRule::text("name").required(),
        FieldRule::text("email").required().email(),
        FieldRule::text("password").required().min_len(6),
        FieldRule::flag("provider"),
    ])
}

fn profile_schema() -> Schema {
    Schema::new(vec![
        FieldRule::text("name"),
        FieldRule::text("email").email(),
        FieldRule::text("oldPassword").min_len(6),
        FieldRule::text("password").min_len(6).required_when("oldPassword"),
        FieldRule::text("confirmPassword")
            .required_when("password")
            .must_equal("password"),
        FieldRule::id("avatar_id"),
    ])
}

fn session_schema() -> Schema {
    Schema::new(vec![
        FieldRule::text("email").required().email(),
        FieldRule::text("password").required(),
    ])
}

fn user_not_found() -> ServiceError {
    ServiceError::NotFound("User not found".to_string())
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, files: FileUrls) -> Self {
        Self { store, files }
    }

    /// Create an account; the password is hashed before it reaches storage
    #[instrument(skip(self, body))]
    pub async fn register(&self, body: &Value) -> Result<RegisteredUser, ServiceError> {
        let fields = register_schema().validate(body)?;
        let email = fields.required_text("email")?;

        if self.store.find_user_by_email(email).await?.is_some() {
            warn!("Registration refused: email already in use");
            return Err(ServiceError::user_exists());
        }

        let user = self
            .store
            .create_user(NewUser {
                name: fields.required_text("name")?.to_string(),
                email: email.to_string(),
                password_hash: hash_password(fields.required_text("password")?)?,
                provider: fields.flag("provider").unwrap_or(false),
            })
            .await?;

        info!(user_id = %user.id, "User registered");
        Ok(RegisteredUser::from(&user))
    }

    /// Update the caller's own profile and return it with the avatar joined in
    #[instrument(skip(self, body))]
    pub async fn update_profile(&self, body: &Value, caller_id: Uuid) -> Result<UserProfile, ServiceError> {
        let fields = profile_schema().validate(body)?;

        let user = self.store.find_user(caller_id).await?.ok_or_else(user_not_found)?;

        let email = fields.text("email");
        if let Some(email) = email {
            if email != user.email && self.store.find_user_by_email(email).await?.is_some() {
                warn!(user_id = %caller_id, "Profile update refused: email already in use");
                return Err(ServiceError::user_exists());
            }
        }

        if let Some(old_password) = fields.text("oldPassword") {
            if !user.check_password(old_password)? {
                warn!(user_id = %caller_id, "Profile update refused: old password mismatch");
                return Err(ServiceError::Unauthorized("Password does not match".to_string()));
            }
        }

        let avatar_id = fields.id("avatar_id");
        if let Some(avatar_id) = avatar_id {
            if self.store.find_file(avatar_id).await?.is_none() {
                return Err(ValidationErrors::single(
                    "avatar_id",
                    "avatar_id must reference an existing file",
                )
                .into());
            }
        }

        let password_hash = match fields.text("password") {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };

        let changes = UserChanges {
            name: fields.text("name").map(str::to_string),
            email: email.map(str::to_string),
            password_hash,
            avatar_id,
        };

        if !changes.is_empty() {
            self.store
                .update_user(caller_id, changes)
                .await?
                .ok_or_else(user_not_found)?;
            info!(user_id = %caller_id, "Profile updated");
        }

        self.profile(caller_id).await
    }

    /// Reload a user together with its avatar file
    pub async fn profile(&self, user_id: Uuid) -> Result<UserProfile, ServiceError> {
        let user = self.store.find_user(user_id).await?.ok_or_else(user_not_found)?;

        let avatar = match user.avatar_id {
            Some(file_id) => self
                .store
                .find_file(file_id)
                .await?
                .map(|file| self.files.avatar(&file)),
            None => None,
        };

        Ok(UserProfile {
            id: user.id,
            name: user.name,
            email: user.email,
            avatar,
        })
    }

    /// Check email/password credentials
    #[instrument(skip(self, body))]
    pub async fn authenticate(&self, body: &Value) -> Result<User, ServiceError> {
        let fields = session_schema().validate(body)?;

        let user = self
            .store
            .find_user_by_email(fields.required_text("email")?)
            .await?
            .ok_or_else(|| ServiceError::Unauthorized("User not found".to_string()))?;

        if !user.check_password(fields.required_text("password")?)? {
            warn!(user_id = %user.id, "Authentication failed: password mismatch");
            return Err(ServiceError::Unauthorized("Password does not match".to_string()));
        }

        Ok(user)
    }
}
