use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "waitlist_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum WaitlistRole {
    Agent,
    Renter,
}

impl WaitlistRole {
    pub fn to_str(&self) -> &str {
        match self {
            WaitlistRole::Agent => "agent",
            WaitlistRole::Renter => "renter",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "agent" => Some(WaitlistRole::Agent),
            "renter" => Some(WaitlistRole::Renter),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct WaitlistEntry {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub state: String,
    pub role: WaitlistRole,
    pub referral_code: String,
    pub referral_count: Option<i32>,
    pub referred_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Column set for a signup insert. The store assigns `id` and `created_at`
/// and always starts `referral_count` at zero.
#[derive(Debug, Clone)]
pub struct NewWaitlistEntry {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub state: String,
    pub role: WaitlistRole,
    pub referral_code: String,
    pub referred_by: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LeaderboardRow {
    // only the masked form leaves the service
    #[serde(skip_serializing, default)]
    pub full_name: String,
    pub masked_name: String,
    pub role: WaitlistRole,
    pub referral_count: i32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReferralStats {
    pub referral_count: i32,
    pub referral_code: String,
    pub referral_link: String,
    pub rank: Option<i64>,
}

pub const NIGERIAN_STATES: [&str; 37] = [
    "Abia",
    "Adamawa",
    "Akwa Ibom",
    "Anambra",
    "Bauchi",
    "Bayelsa",
    "Benue",
    "Borno",
    "Cross River",
    "Delta",
    "Ebonyi",
    "Edo",
    "Ekiti",
    "Enugu",
    "FCT (Abuja)",
    "Gombe",
    "Imo",
    "Jigawa",
    "Kaduna",
    "Kano",
    "Katsina",
    "Kebbi",
    "Kogi",
    "Kwara",
    "Lagos",
    "Nasarawa",
    "Niger",
    "Ogun",
    "Ondo",
    "Osun",
    "Oyo",
    "Plateau",
    "Rivers",
    "Sokoto",
    "Taraba",
    "Yobe",
    "Zamfara",
];
