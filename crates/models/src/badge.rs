//! Colour tokens for status chips. Every variant of every classified enum
//! maps to exactly one token.

use serde::{Deserialize, Serialize};

use crate::bet::BetStatus;
use crate::risk::RiskLevel;
use crate::user::UserRole;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BadgeColor {
    Success,
    Warning,
    Error,
    Primary,
    Default,
}

pub trait Badge {
    fn badge_color(&self) -> BadgeColor;
}

impl Badge for RiskLevel {
    fn badge_color(&self) -> BadgeColor {
        match self {
            RiskLevel::Low => BadgeColor::Success,
            RiskLevel::Medium => BadgeColor::Warning,
            RiskLevel::High => BadgeColor::Error,
        }
    }
}

impl Badge for BetStatus {
    fn badge_color(&self) -> BadgeColor {
        match self {
            BetStatus::Won => BadgeColor::Success,
            BetStatus::Lost => BadgeColor::Error,
            BetStatus::Pending => BadgeColor::Warning,
            BetStatus::Void => BadgeColor::Default,
        }
    }
}

impl Badge for UserRole {
    fn badge_color(&self) -> BadgeColor {
        match self {
            UserRole::Admin => BadgeColor::Error,
            UserRole::User => BadgeColor::Primary,
            UserRole::Guest => BadgeColor::Default,
        }
    }
}
