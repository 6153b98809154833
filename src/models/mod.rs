//! Data models for the WorkHub admin backend.
//!
//! This module contains the wire types used across the console:
//!
//! - `Company`, `CompanyUser`: tenant and account management
//! - Billing types: `BillingConfig`, `Plan`, `PromoCode`
//! - `Subscription`, `Invoice`, `Transaction`, checkout types
//! - Ops types: `LogEntry`, `ServiceHealth`, `DashboardStats`
//!
//! The backend serializes snake_case JSON; list endpoints wrap results in
//! the `Paginated` envelope.

pub mod billing;
pub mod company;
pub mod ops;
pub mod subscription;
pub mod user;

pub use billing::{BillingConfig, BillingCycle, Plan, PlanInput, PromoCode, PromoCodeInput};
pub use company::{Company, CompanyInput};
pub use ops::{DashboardStats, HealthState, LogEntry, LogLevel, LogQuery, ServiceHealth};
pub use subscription::{
    CheckoutRequest, CheckoutSession, CheckoutStatus, Invoice, InvoiceStatus, PaymentProvider,
    Subscription, SubscriptionStatus, Transaction, TransactionStatus,
};
pub use user::{CompanyUser, UserInput, UserRole};

use serde::{Deserialize, Serialize};

/// Standard list envelope returned by every collection endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn is_last_page(&self) -> bool {
        self.next.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_paginated_companies() {
        let json = r#"{
            "count": 2,
            "next": null,
            "previous": null,
            "results": [
                {"id": 1, "name": "Sahel Logistics", "email": "ops@sahel.example",
                 "phone": "+22670000001", "country": "BF", "employee_count": 34,
                 "is_active": true, "created_at": "2024-11-02T09:00:00Z"},
                {"id": 2, "name": "Teranga Foods", "email": "admin@teranga.example",
                 "phone": null, "country": "SN", "employee_count": 120,
                 "is_active": false, "created_at": "2025-01-20T14:30:00Z"}
            ]
        }"#;

        let page: Paginated<Company> =
            serde_json::from_str(json).expect("Failed to parse companies page JSON");
        assert_eq!(page.count, 2);
        assert!(page.is_last_page());
        assert_eq!(page.results[0].name, "Sahel Logistics");
        assert_eq!(page.results[1].status_display(), "suspended");
    }
}
