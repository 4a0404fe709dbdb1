use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo::User;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for token refresh.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Response returned after login, register or refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: PublicUser,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub daily_calorie_goal: Option<f64>,
    pub daily_protein_goal: Option<f64>,
    pub daily_carbs_goal: Option<f64>,
    pub daily_fat_goal: Option<f64>,
    pub goal: String,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            daily_calorie_goal: u.daily_calorie_goal,
            daily_protein_goal: u.daily_protein_goal,
            daily_carbs_goal: u.daily_carbs_goal,
            daily_fat_goal: u.daily_fat_goal,
            goal: u.goal,
        }
    }
}

/// Request body for PUT /me/goals.
#[derive(Debug, Deserialize)]
pub struct UpdateGoalsRequest {
    pub daily_calorie_goal: Option<f64>,
    pub daily_protein_goal: Option<f64>,
    pub daily_carbs_goal: Option<f64>,
    pub daily_fat_goal: Option<f64>,
    pub goal: Option<String>,
}
