//! Audit entry for administrative balance corrections

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceAdjustment {
    pub id: Uuid,
    pub account_id: Uuid,
    pub delta: Decimal,
    pub new_balance: Decimal,
    /// User id of the administrator, when known
    pub actor: Option<Uuid>,
    pub reason: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl BalanceAdjustment {
    pub fn new(
        account_id: Uuid,
        delta: Decimal,
        new_balance: Decimal,
        actor: Option<Uuid>,
        reason: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            delta,
            new_balance,
            actor,
            reason,
            timestamp: Utc::now(),
        }
    }
}
