//! Request bodies. Responses serialize the domain records directly.

use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUserRequest {
    pub email: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateWorkoutRequest {
    pub name: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub performed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateWorkoutRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddExerciseRequest {
    pub name: String,
    /// Appended after the last exercise when omitted.
    #[serde(default)]
    pub position: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddSetRequest {
    pub reps: u32,
    #[serde(default)]
    pub weight_kg: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSetRequest {
    #[serde(default)]
    pub reps: Option<u32>,
    #[serde(default)]
    pub weight_kg: Option<f64>,
}
