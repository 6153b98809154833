// Allow dead code: wire structs carry all contract fields for completeness
#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::billing::BillingCycle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Trial,
    Active,
    PastDue,
    Canceled,
    Expired,
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubscriptionStatus::Trial => write!(f, "Trial"),
            SubscriptionStatus::Active => write!(f, "Active"),
            SubscriptionStatus::PastDue => write!(f, "Past due"),
            SubscriptionStatus::Canceled => write!(f, "Canceled"),
            SubscriptionStatus::Expired => write!(f, "Expired"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: i64,
    pub company: i64,
    pub plan: i64,
    pub status: SubscriptionStatus,
    pub cycle: BillingCycle,
    pub started_at: DateTime<Utc>,
    pub current_period_end: DateTime<Utc>,
    pub auto_renew: bool,
}

impl Subscription {
    pub fn is_billable(&self) -> bool {
        matches!(
            self.status,
            SubscriptionStatus::Active | SubscriptionStatus::PastDue
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Draft,
    Issued,
    Paid,
    Void,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: i64,
    pub subscription: i64,
    pub number: String,
    pub amount: f64,
    pub currency: String,
    pub status: InvoiceStatus,
    pub issued_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

/// Payment rails the checkout flow can route through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentProvider {
    Stripe,
    OrangeMoney,
    MoovMoney,
}

impl std::fmt::Display for PaymentProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentProvider::Stripe => write!(f, "Stripe"),
            PaymentProvider::OrangeMoney => write!(f, "Orange Money"),
            PaymentProvider::MoovMoney => write!(f, "Moov Money"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Succeeded,
    Failed,
    Refunded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub invoice: i64,
    pub provider: PaymentProvider,
    pub amount: f64,
    pub currency: String,
    pub status: TransactionStatus,
    /// Provider-side reference for reconciliation
    pub reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request body for opening a checkout session on an invoice
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutRequest {
    pub invoice: i64,
    pub provider: PaymentProvider,
    /// Wallet number, required by the mobile-money providers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStatus {
    Open,
    Completed,
    Expired,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub invoice: i64,
    pub provider: PaymentProvider,
    pub status: CheckoutStatus,
    /// Hosted payment page to hand to the payer, when the provider has one
    pub payment_url: Option<String>,
    pub expires_at: DateTime<Utc>,
}
