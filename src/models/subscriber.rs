//! Subscriber model
//!
//! Newsletter subscribers. An email address is unique regardless of status;
//! unsubscribing flips the status instead of deleting the row so a
//! re-subscription can reactivate it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Newsletter subscriber entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscriber {
    /// Unique identifier
    pub id: i64,
    /// Email address (unique)
    pub email: String,
    /// When the subscription was created
    pub subscribed_on: DateTime<Utc>,
    /// Subscription status
    pub status: SubscriberStatus,
}

impl Subscriber {
    /// Check if the subscription is active
    pub fn is_active(&self) -> bool {
        self.status == SubscriberStatus::Active
    }
}

/// Subscription status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriberStatus {
    /// Receiving newsletters
    Active,
    /// Opted out
    Unsubscribed,
}

impl Default for SubscriberStatus {
    fn default() -> Self {
        Self::Active
    }
}

impl fmt::Display for SubscriberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubscriberStatus::Active => write!(f, "active"),
            SubscriberStatus::Unsubscribed => write!(f, "unsubscribed"),
        }
    }
}

impl FromStr for SubscriberStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(SubscriberStatus::Active),
            "unsubscribed" => Ok(SubscriberStatus::Unsubscribed),
            _ => Err(anyhow::anyhow!("Invalid subscriber status: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        assert_eq!(
            SubscriberStatus::from_str("active").unwrap(),
            SubscriberStatus::Active
        );
        assert_eq!(
            SubscriberStatus::from_str("UNSUBSCRIBED").unwrap(),
            SubscriberStatus::Unsubscribed
        );
        assert!(SubscriberStatus::from_str("paused").is_err());
        assert_eq!(SubscriberStatus::Active.to_string(), "active");
    }
}
