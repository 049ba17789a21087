//! Caller identity, JWT claims and permission strings

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Permission strings issued by the identity component
pub mod permissions {
    /// Add stock and view any user's assigned devices
    pub const MANAGE_INVENTORY: &str = "inventory:manage";
    /// Assign or unassign devices to sellers
    pub const ASSIGN_DEVICES: &str = "device:assign";
    /// View own assigned devices
    pub const VIEW_DEVICES: &str = "device:view";
    /// Commit sales
    pub const CREATE_SALE: &str = "sale:create";
    /// View sales committed by other sellers
    pub const VIEW_ALL_SALES: &str = "sale:view_all";
    /// Edit application configuration values
    pub const MANAGE_CONFIG: &str = "config:manage";
    /// View profit and other financial reports
    pub const VIEW_FINANCIAL_REPORTS: &str = "report:view_financial";
    /// View stock-level reports
    pub const VIEW_STOCK_REPORTS: &str = "report:view_stock";
}

/// JWT claims as issued by the identity component. The server only decodes
/// and verifies the signature; credential issuance happens elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: Uuid,
    pub username: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Parse and verify a JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    /// Create a JWT token (used by tests and tooling)
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    pub fn into_caller(self) -> Caller {
        Caller {
            user_id: self.sub,
            permissions: self.permissions.into_iter().collect(),
        }
    }
}

/// Authenticated caller with their capability set, passed explicitly into
/// every service operation
#[derive(Debug, Clone)]
pub struct Caller {
    pub user_id: Uuid,
    pub permissions: HashSet<String>,
}

impl Caller {
    pub fn can(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    pub fn require(&self, permission: &str) -> AppResult<()> {
        if self.can(permission) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "Missing required permission '{}'",
                permission
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller_with(perms: &[&str]) -> Caller {
        Caller {
            user_id: Uuid::new_v4(),
            permissions: perms.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn require_checks_capability_set() {
        let caller = caller_with(&[permissions::CREATE_SALE]);
        assert!(caller.require(permissions::CREATE_SALE).is_ok());
        assert!(matches!(
            caller.require(permissions::MANAGE_INVENTORY),
            Err(AppError::Authorization(_))
        ));
    }

    #[test]
    fn token_round_trip_preserves_permissions() {
        let claims = UserClaims {
            sub: Uuid::new_v4(),
            username: "wanjiku".to_string(),
            permissions: vec![
                permissions::CREATE_SALE.to_string(),
                permissions::VIEW_DEVICES.to_string(),
            ],
            exp: chrono::Utc::now().timestamp() + 3600,
            iat: chrono::Utc::now().timestamp(),
        };

        let token = claims.create_token("test-secret").unwrap();
        let decoded = UserClaims::from_token(&token, "test-secret").unwrap();
        assert_eq!(decoded.sub, claims.sub);

        let caller = decoded.into_caller();
        assert!(caller.can(permissions::CREATE_SALE));
        assert!(!caller.can(permissions::ASSIGN_DEVICES));
    }
}
