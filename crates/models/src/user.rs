use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BackofficeError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
    Guest,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Permission {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// Back-office operator account. Permissions are reference data only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub permissions: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

pub static PERMISSION_CATALOG: [Permission; 10] = [
    Permission { id: "dashboard_view", name: "View Dashboard", description: "Access to dashboard and analytics" },
    Permission { id: "matches_view", name: "View Matches", description: "Access to live and prematch matches" },
    Permission { id: "matches_manage", name: "Manage Matches", description: "Create, edit, and delete matches" },
    Permission { id: "bets_view", name: "View Bets", description: "Access to bets management" },
    Permission { id: "bets_manage", name: "Manage Bets", description: "Approve, reject, and modify bets" },
    Permission { id: "risk_view", name: "View Risk Management", description: "Access to risk management tools" },
    Permission { id: "risk_manage", name: "Manage Risk", description: "Configure risk settings and limits" },
    Permission { id: "users_view", name: "View Users", description: "Access to user management" },
    Permission { id: "users_manage", name: "Manage Users", description: "Create, edit, and delete users" },
    Permission { id: "system_admin", name: "System Administration", description: "Full system administration access" },
];

const USER_DEFAULTS: [&str; 4] = ["dashboard_view", "matches_view", "bets_view", "risk_view"];
const GUEST_DEFAULTS: [&str; 2] = ["dashboard_view", "matches_view"];

impl UserRole {
    pub const ALL: [UserRole; 3] = [UserRole::Admin, UserRole::User, UserRole::Guest];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
            UserRole::Guest => "guest",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = BackofficeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "user" => Ok(UserRole::User),
            "guest" => Ok(UserRole::Guest),
            other => Err(BackofficeError::UnknownVariant {
                kind: "role",
                value: other.to_string(),
            }),
        }
    }
}

pub fn find_permission(id: &str) -> Option<&'static Permission> {
    PERMISSION_CATALOG.iter().find(|p| p.id == id)
}

/// Permission ids a freshly assigned role starts with.
pub fn default_permissions(role: UserRole) -> Vec<String> {
    match role {
        UserRole::Admin => PERMISSION_CATALOG.iter().map(|p| p.id.to_string()).collect(),
        UserRole::User => USER_DEFAULTS.iter().map(|id| id.to_string()).collect(),
        UserRole::Guest => GUEST_DEFAULTS.iter().map(|id| id.to_string()).collect(),
    }
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn has_permission(&self, id: &str) -> bool {
        self.permissions.iter().any(|p| p == id)
    }

    /// Switching role replaces the permission list with the role defaults.
    pub fn change_role(&mut self, role: UserRole, at: DateTime<Utc>) {
        self.role = role;
        self.permissions = default_permissions(role);
        self.updated_at = at;
    }

    pub fn set_permission(&mut self, id: &str, granted: bool, at: DateTime<Utc>) {
        let present = self.has_permission(id);
        if granted && !present {
            self.permissions.push(id.to_string());
        } else if !granted && present {
            self.permissions.retain(|p| p != id);
        } else {
            return;
        }
        self.updated_at = at;
    }
}
