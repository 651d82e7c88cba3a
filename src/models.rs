use anyhow::Error;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::config::PasswordStorage;
use crate::error::ProvisionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, sqlx::Type)]
pub enum PlanType {
    Push,
    Pull,
    Legs,
    Cardio,
    Core,
    #[serde(rename = "Full Body")]
    #[sqlx(rename = "Full Body")]
    FullBody,
}

impl PlanType {
    pub const ALL: [PlanType; 6] = [
        PlanType::Push,
        PlanType::Pull,
        PlanType::Legs,
        PlanType::Cardio,
        PlanType::Core,
        PlanType::FullBody,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::Push => "Push",
            PlanType::Pull => "Pull",
            PlanType::Legs => "Legs",
            PlanType::Cardio => "Cardio",
            PlanType::Core => "Core",
            PlanType::FullBody => "Full Body",
        }
    }

    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|p| p.as_str()).collect()
    }
}

impl FromStr for PlanType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| Error::msg(format!("Unknown plan type: {}", s)))
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, sqlx::Type)]
pub enum DietType {
    #[serde(rename = "Weight Loss")]
    #[sqlx(rename = "Weight Loss")]
    WeightLoss,
    #[serde(rename = "Muscle Gain")]
    #[sqlx(rename = "Muscle Gain")]
    MuscleGain,
    Maintenance,
}

impl DietType {
    pub const ALL: [DietType; 3] = [
        DietType::WeightLoss,
        DietType::MuscleGain,
        DietType::Maintenance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DietType::WeightLoss => "Weight Loss",
            DietType::MuscleGain => "Muscle Gain",
            DietType::Maintenance => "Maintenance",
        }
    }

    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|d| d.as_str()).collect()
    }
}

impl FromStr for DietType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| Error::msg(format!("Unknown diet type: {}", s)))
    }
}

impl fmt::Display for DietType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String,
    pub age: Option<i64>,
    pub weight: Option<f64>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize, Clone, sqlx::FromRow)]
pub struct Admin {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize, Clone, sqlx::FromRow)]
pub struct ExercisePlan {
    pub id: i64,
    pub user_id: i64,
    pub plan_type: PlanType,
    pub exercises: sqlx::types::Json<serde_json::Value>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize, Clone, sqlx::FromRow)]
pub struct DietChart {
    pub id: i64,
    pub user_id: i64,
    pub diet_type: DietType,
    pub diet_details: String,
    pub created_at: Option<NaiveDateTime>,
}

/// The administrator row guaranteed to exist after provisioning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSeed {
    pub username: &'static str,
    pub email: &'static str,
    pub password: &'static str,
}

pub const DEFAULT_ADMIN: AdminSeed = AdminSeed {
    username: "Admin",
    email: "admin@fitforge.com",
    password: "admin123",
};

impl AdminSeed {
    pub fn password_for_storage(&self, storage: PasswordStorage) -> Result<String, ProvisionError> {
        match storage {
            PasswordStorage::Plain => Ok(self.password.to_string()),
            PasswordStorage::Bcrypt => Ok(bcrypt::hash(self.password, bcrypt::DEFAULT_COST)?),
        }
    }
}
