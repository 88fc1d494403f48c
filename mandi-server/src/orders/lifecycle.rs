//! Order lifecycle state machine
//!
//! Fulfillment advances along a fixed linear chain, one step at a time:
//! `PENDING -> PACKED -> SHIPPED -> OUT_FOR_DELIVERY -> DELIVERED`.
//! Cancellation is a side exit available only from `PENDING`.
//! `DELIVERED` and `CANCELLED` are terminal.
//!
//! Payment is an independent axis (`UNPAID | PAID | OVERDUE`) and never
//! constrains fulfillment.

use serde::{Deserialize, Serialize};

/// Fulfillment status of an order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FulfillmentStatus {
    Pending,
    Packed,
    Shipped,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl FulfillmentStatus {
    /// Wire/storage form, same as the serde rename
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Packed => "PACKED",
            Self::Shipped => "SHIPPED",
            Self::OutForDelivery => "OUT_FOR_DELIVERY",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// The immediate successor on the fulfillment chain
    ///
    /// Terminal states have no successor. `CANCELLED` is reachable only
    /// through [`can_cancel`](Self::can_cancel), never through this chain.
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Packed),
            Self::Packed => Some(Self::Shipped),
            Self::Shipped => Some(Self::OutForDelivery),
            Self::OutForDelivery => Some(Self::Delivered),
            Self::Delivered | Self::Cancelled => None,
        }
    }

    /// Whether `target` is the single legal next step from here
    pub fn can_advance_to(&self, target: Self) -> bool {
        self.next() == Some(target)
    }

    /// Vendor-side cancellation is allowed only before packing starts
    pub fn can_cancel(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Terminal states accept no further fulfillment writes
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

impl std::fmt::Display for FulfillmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment status of an order (independent of fulfillment)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
    Overdue,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "UNPAID",
            Self::Paid => "PAID",
            Self::Overdue => "OVERDUE",
        }
    }

    /// Orders in these states count toward dues and receivables
    pub fn is_outstanding(&self) -> bool {
        matches!(self, Self::Unpaid | Self::Overdue)
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
