use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};
use crate::types::DelinquencyBand;

/// ledger policy knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// days past due above which a contract is banded severe
    pub severe_days_past_due: u32,
    /// days past due above which a contract is banded mild
    pub mild_days_past_due: u32,
    /// days a payment date may sit ahead of the business date
    pub payment_date_tolerance_days: i64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            severe_days_past_due: 75,
            mild_days_past_due: 25,
            payment_date_tolerance_days: 1,
        }
    }
}

impl LedgerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.mild_days_past_due == 0 {
            return Err(LedgerError::Validation {
                field: "mild_days_past_due",
                message: "mild threshold must be at least one day".to_string(),
            });
        }
        if self.severe_days_past_due <= self.mild_days_past_due {
            return Err(LedgerError::Validation {
                field: "severe_days_past_due",
                message: format!(
                    "severe threshold {} must exceed the mild threshold {}",
                    self.severe_days_past_due, self.mild_days_past_due
                ),
            });
        }
        if self.payment_date_tolerance_days < 0 {
            return Err(LedgerError::Validation {
                field: "payment_date_tolerance_days",
                message: format!(
                    "tolerance must not be negative, got {}",
                    self.payment_date_tolerance_days
                ),
            });
        }
        Ok(())
    }

    /// band a contract by how long its earliest unpaid installment has waited
    pub fn band_for(&self, days_past_due: u32) -> DelinquencyBand {
        if days_past_due > self.severe_days_past_due {
            DelinquencyBand::Severe
        } else if days_past_due > self.mild_days_past_due {
            DelinquencyBand::Mild
        } else {
            DelinquencyBand::Normal
        }
    }
}
