//! Accounting move records.

use chrono::NaiveDate;
use ledgerlock_shared::types::{CompanyId, MoveId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Document kind of an accounting move.
///
/// The kind decides which lock dates gate the move: customer-facing
/// documents are gated by the sales lock, vendor-facing documents by the
/// purchase lock, and everything by the fiscal year, tax, and hard locks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    /// Customer invoice.
    CustomerInvoice,
    /// Customer credit note.
    CustomerRefund,
    /// Vendor bill.
    VendorInvoice,
    /// Vendor credit note.
    VendorRefund,
    /// Miscellaneous journal entry.
    MiscEntry,
}

impl MoveKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CustomerInvoice => "customer_invoice",
            Self::CustomerRefund => "customer_refund",
            Self::VendorInvoice => "vendor_invoice",
            Self::VendorRefund => "vendor_refund",
            Self::MiscEntry => "misc_entry",
        }
    }

    /// Parses a kind from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "customer_invoice" => Some(Self::CustomerInvoice),
            "customer_refund" => Some(Self::CustomerRefund),
            "vendor_invoice" => Some(Self::VendorInvoice),
            "vendor_refund" => Some(Self::VendorRefund),
            "misc_entry" => Some(Self::MiscEntry),
            _ => None,
        }
    }

    /// Returns true for customer-facing documents (invoices and refunds).
    #[must_use]
    pub fn is_sale_document(&self) -> bool {
        matches!(self, Self::CustomerInvoice | Self::CustomerRefund)
    }

    /// Returns true for vendor-facing documents (bills and refunds).
    #[must_use]
    pub fn is_purchase_document(&self) -> bool {
        matches!(self, Self::VendorInvoice | Self::VendorRefund)
    }
}

impl fmt::Display for MoveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle state of a move.
///
/// Both directions of `Draft ⇄ Posted` are authorized against the lock
/// tables before they are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveState {
    /// Move is being drafted and can be modified.
    Draft,
    /// Move has been posted to the ledger.
    Posted,
}

impl MoveState {
    /// Returns the string representation of the state.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Posted => "posted",
        }
    }

    /// Parses a state from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "posted" => Some(Self::Posted),
            _ => None,
        }
    }
}

impl fmt::Display for MoveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An accounting move (journal entry or invoice document).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Move {
    /// Unique identifier.
    pub id: MoveId,
    /// Company the move belongs to.
    pub company_id: CompanyId,
    /// Accounting date the move is booked under.
    pub accounting_date: NaiveDate,
    /// Document kind.
    pub kind: MoveKind,
    /// Lifecycle state.
    pub state: MoveState,
}

impl Move {
    /// Creates a draft move.
    #[must_use]
    pub fn draft(company_id: CompanyId, accounting_date: NaiveDate, kind: MoveKind) -> Self {
        Self {
            id: MoveId::new(),
            company_id,
            accounting_date,
            kind,
            state: MoveState::Draft,
        }
    }
}
