use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// unique identifier for a parcel
pub type ParcelId = Uuid;

/// unique identifier for a client
pub type ClientId = Uuid;

/// unique identifier for a sales agent
pub type AgentId = Uuid;

/// unique identifier for a sale contract
pub type SaleId = Uuid;

/// unique identifier for a registered payment
pub type PaymentId = Uuid;

/// parcel availability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParcelStatus {
    /// on the market, can be attached to a new sale
    Available,
    /// bound to an active sale contract
    Sold,
}

/// credit standing of a sale contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreditStatus {
    /// no installment past due
    Current,
    /// at least one installment past due
    Delinquent,
    /// outstanding balance cleared
    PaidOff,
}

/// settlement state of a single scheduled installment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstallmentStatus {
    /// covered in full by registered payments
    Paid,
    /// partially covered
    Partial,
    /// nothing applied yet
    Pending,
}

/// delinquency severity band for portfolio triage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DelinquencyBand {
    /// on time or within the grace window
    Normal,
    /// past the mild threshold of days overdue
    Mild,
    /// past the severe threshold, escalate
    Severe,
}

/// how a client can be reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactKind {
    Phone,
    Email,
}

/// one raw contact entry for a client; rendering links is the caller's job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactChannel {
    pub kind: ContactKind,
    pub value: String,
}
