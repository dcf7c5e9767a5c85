use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Closed set of account roles. There is no promotion flow: a role is fixed
/// when the account is created.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Buyer,
    Admin,
    Enforcer,
}

/// Accessibility and restricted-access flags used to filter which seats a
/// buyer may select. Advisory at booking time, not enforced by the ledger.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SpecialAccommodations {
    pub has_accommodations: bool,
    pub handicap_accessible: bool,
    pub faculty_restricted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    /// Fractional discount, e.g. 0.10 for 10%. Only meaningful for buyers.
    pub discount: Decimal,
    pub special_accommodations: SpecialAccommodations,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: &str, username: &str, email: &str, role: Role, discount: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            role,
            discount,
            special_accommodations: SpecialAccommodations::default(),
            created_at: Utc::now(),
        }
    }

    /// Discount applied at issuance. Non-buyer roles always pay full price.
    pub fn effective_discount(&self) -> Decimal {
        match self.role {
            Role::Buyer => self.discount,
            Role::Admin | Role::Enforcer => Decimal::ZERO,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Enforcers scan tickets at entry; admins may also operate the scanner.
    pub fn can_validate_tickets(&self) -> bool {
        matches!(self.role, Role::Enforcer | Role::Admin)
    }
}
