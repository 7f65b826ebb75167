use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operator role as carried by the dashboard front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Trader,
    Analyst,
    Viewer,
}

/// View-level permission flags derived from a [`Role`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    pub view_market: bool,
    pub view_settlements: bool,
    pub view_contracts: bool,
    pub view_customers: bool,
    pub manage_plans: bool,
}

impl Role {
    pub fn permissions(&self) -> Permissions {
        match self {
            Role::Admin => Permissions {
                view_market: true,
                view_settlements: true,
                view_contracts: true,
                view_customers: true,
                manage_plans: true,
            },
            Role::Trader => Permissions {
                view_market: true,
                view_settlements: true,
                view_contracts: true,
                view_customers: false,
                manage_plans: true,
            },
            Role::Analyst => Permissions {
                view_market: true,
                view_settlements: true,
                view_contracts: false,
                view_customers: true,
                manage_plans: false,
            },
            Role::Viewer => Permissions {
                view_market: true,
                view_settlements: false,
                view_contracts: false,
                view_customers: false,
                manage_plans: false,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Trader => "trader",
            Role::Analyst => "analyst",
            Role::Viewer => "viewer",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "trader" => Ok(Role::Trader),
            "analyst" => Ok(Role::Analyst),
            "viewer" => Ok(Role::Viewer),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
