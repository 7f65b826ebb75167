use serde::{Deserialize, Serialize};

use crate::models::{Permissions, Role};

pub const GET_ROLE: &str = "/roles/{role}";

/// Header carrying the caller's role. There is no authentication behind it.
pub const ROLE_HEADER: &str = "x-dashboard-role";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleData {
    pub role: Role,
    pub permissions: Permissions,
}

impl From<Role> for RoleData {
    fn from(role: Role) -> Self {
        Self {
            role,
            permissions: role.permissions(),
        }
    }
}
