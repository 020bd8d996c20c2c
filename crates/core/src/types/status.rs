//! Status enums for orders and checkout.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// Orders are created as `Pending`; later transitions are driven by an
/// administrative process outside this codebase, so no mutation operation
/// is exposed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Delivered,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Delivered => write!(f, "delivered"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "delivered" => Ok(Self::Delivered),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// Payment method selected during checkout.
///
/// Provider-neutral selectors; no real payment integration exists behind
/// either of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CardPayment,
    WalletPayment,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CardPayment => write!(f, "card_payment"),
            Self::WalletPayment => write!(f, "wallet_payment"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "card" | "card_payment" => Ok(Self::CardPayment),
            "wallet" | "wallet_payment" => Ok(Self::WalletPayment),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}
