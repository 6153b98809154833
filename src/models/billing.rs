// Allow dead code: wire structs carry all contract fields for completeness
#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingCycle {
    Monthly,
    Yearly,
}

impl std::fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BillingCycle::Monthly => write!(f, "Monthly"),
            BillingCycle::Yearly => write!(f, "Yearly"),
        }
    }
}

/// Platform-wide billing settings, singleton resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingConfig {
    pub default_cycle: BillingCycle,
    pub currency: String,
    /// VAT percentage applied to invoices, e.g. 18.0
    pub tax_rate: f64,
    /// Days past due before a subscription is suspended
    pub grace_period_days: u32,
    pub trial_days: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub monthly_price: f64,
    pub yearly_price: f64,
    pub currency: String,
    pub max_employees: Option<i64>,
    #[serde(default)]
    pub features: Vec<String>,
    pub is_active: bool,
}

impl Plan {
    pub fn price_for(&self, cycle: BillingCycle) -> f64 {
        match cycle {
            BillingCycle::Monthly => self.monthly_price,
            BillingCycle::Yearly => self.yearly_price,
        }
    }
}

/// Payload for creating or updating a plan
#[derive(Debug, Clone, Serialize, Default)]
pub struct PlanInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub monthly_price: f64,
    pub yearly_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_employees: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromoCode {
    pub id: i64,
    pub code: String,
    pub discount_percent: f64,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub max_uses: Option<i64>,
    #[serde(default)]
    pub use_count: i64,
    pub is_active: bool,
}

impl PromoCode {
    /// Usable right now: active, within its window, and not used up
    pub fn is_redeemable(&self, now: DateTime<Utc>) -> bool {
        self.is_active
            && now >= self.valid_from
            && now <= self.valid_until
            && self.max_uses.map_or(true, |max| self.use_count < max)
    }
}

/// Payload for creating a promo code
#[derive(Debug, Clone, Serialize)]
pub struct PromoCodeInput {
    pub code: String,
    pub discount_percent: f64,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_uses: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_code(use_count: i64, max_uses: Option<i64>) -> PromoCode {
        PromoCode {
            id: 1,
            code: "LAUNCH25".to_string(),
            discount_percent: 25.0,
            valid_from: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            valid_until: Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 59).unwrap(),
            max_uses,
            use_count,
            is_active: true,
        }
    }

    #[test]
    fn test_promo_code_redeemable_window() {
        let code = sample_code(0, None);
        let inside = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let before = Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();

        assert!(code.is_redeemable(inside));
        assert!(!code.is_redeemable(before));
        assert!(!code.is_redeemable(after));
    }

    #[test]
    fn test_promo_code_use_cap() {
        let inside = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        assert!(sample_code(9, Some(10)).is_redeemable(inside));
        assert!(!sample_code(10, Some(10)).is_redeemable(inside));
    }

    #[test]
    fn test_plan_price_for_cycle() {
        let plan = Plan {
            id: 3,
            name: "Growth".to_string(),
            description: None,
            monthly_price: 25000.0,
            yearly_price: 250000.0,
            currency: "XOF".to_string(),
            max_employees: Some(100),
            features: vec!["payroll".to_string(), "leave".to_string()],
            is_active: true,
        };
        assert_eq!(plan.price_for(BillingCycle::Monthly), 25000.0);
        assert_eq!(plan.price_for(BillingCycle::Yearly), 250000.0);
    }
}
