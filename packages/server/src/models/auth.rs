use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Request body for team registration.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    /// Login email, unique per team.
    #[schema(example = "owls@example.com")]
    pub email: String,
    /// Display name shown on the leaderboard (1-30 chars).
    #[schema(example = "Night Owls")]
    pub name: String,
    /// Password (8-128 characters).
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

pub fn validate_register_request(payload: &RegisterRequest) -> Result<(), AppError> {
    let email = payload.email.trim();
    if email.is_empty() || email.chars().count() > 254 {
        return Err(AppError::Validation("Email must be 1-254 characters".into()));
    }
    if !email.contains('@') {
        return Err(AppError::Validation("Email must contain '@'".into()));
    }
    let name = payload.name.trim();
    if name.is_empty() || name.chars().count() > 30 {
        return Err(AppError::Validation(
            "Team name must be 1-30 characters".into(),
        ));
    }
    if payload.password.len() < 8 || payload.password.len() > 128 {
        return Err(AppError::Validation(
            "Password must be 8-128 characters".into(),
        ));
    }
    Ok(())
}

/// Request body for team login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    /// Email of the team account.
    #[schema(example = "owls@example.com")]
    pub email: String,
    /// Account password.
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

pub fn validate_login_request(payload: &LoginRequest) -> Result<(), AppError> {
    if payload.email.trim().is_empty() {
        return Err(AppError::Validation("Email must not be empty".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".into()));
    }
    Ok(())
}

/// Successful registration response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct RegisterResponse {
    /// ID of the newly created team.
    #[schema(example = 42)]
    pub id: i32,
    /// Login email.
    #[schema(example = "owls@example.com")]
    pub email: String,
    /// Display name.
    #[schema(example = "Night Owls")]
    pub name: String,
}

impl From<crate::entity::team::Model> for RegisterResponse {
    fn from(team: crate::entity::team::Model) -> Self {
        Self {
            id: team.id,
            email: team.email,
            name: team.name,
        }
    }
}

/// Successful login response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    /// JWT bearer token valid for 7 days.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    /// Login email.
    #[schema(example = "owls@example.com")]
    pub email: String,
    /// Display name.
    #[schema(example = "Night Owls")]
    pub name: String,
}

/// Current authenticated team's profile.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MeResponse {
    /// Team ID.
    #[schema(example = 42)]
    pub id: i32,
    /// Login email.
    #[schema(example = "owls@example.com")]
    pub email: String,
    /// Whether the team may manage tournaments.
    #[schema(example = false)]
    pub is_staff: bool,
}
