use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, EPSILON};
use crate::errors::{LedgerError, Result};
use crate::types::{
    AgentId, ClientId, ContactChannel, ContactKind, ParcelId, ParcelStatus, PaymentId, SaleId,
};

/// a land lot in the development, identified by block and lot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parcel {
    pub id: ParcelId,
    pub block: String,
    pub lot: String,
    pub area_sqm: Decimal,
    pub list_price: Money,
    pub status: ParcelStatus,
}

impl Parcel {
    /// human-facing key, e.g. "M3-L14"
    pub fn display_key(&self) -> String {
        format!("M{}-L{}", self.block, self.lot)
    }
}

/// a buyer on record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl Client {
    /// raw ways to reach this client, phone first
    pub fn contact_channels(&self) -> Vec<ContactChannel> {
        let mut channels = Vec::new();
        if let Some(phone) = &self.phone {
            channels.push(ContactChannel {
                kind: ContactKind::Phone,
                value: phone.clone(),
            });
        }
        if let Some(email) = &self.email {
            channels.push(ContactChannel {
                kind: ContactKind::Email,
                value: email.clone(),
            });
        }
        channels
    }
}

/// a sales agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    pub phone: Option<String>,
}

/// an installment sale contract binding a parcel to a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    pub parcel_id: ParcelId,
    pub client_id: ClientId,
    pub agent_id: Option<AgentId>,
    pub contract_date: NaiveDate,
    pub agreed_price: Money,
    pub down_payment: Money,
    pub term_months: u32,
    pub installment_amount: Money,
    pub total_commission: Option<Money>,
}

impl Sale {
    /// portion of the price carried as installment credit
    pub fn principal_financed(&self) -> Money {
        self.agreed_price - self.down_payment
    }
}

/// a payment received against a sale contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub sale_id: SaleId,
    pub amount: Money,
    pub date: NaiveDate,
}

/// input for creating a parcel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewParcel {
    pub block: String,
    pub lot: String,
    pub area_sqm: Decimal,
    pub list_price: Money,
}

impl NewParcel {
    pub fn validate(&self) -> Result<()> {
        if self.block.trim().is_empty() || self.lot.trim().is_empty() {
            return Err(LedgerError::Validation {
                field: "block",
                message: "block and lot must not be empty".to_string(),
            });
        }
        if self.area_sqm < Decimal::ZERO {
            return Err(LedgerError::Validation {
                field: "area_sqm",
                message: format!("area must not be negative, got {}", self.area_sqm),
            });
        }
        if self.list_price.is_negative() {
            return Err(LedgerError::Validation {
                field: "list_price",
                message: format!("list price must not be negative, got {}", self.list_price),
            });
        }
        Ok(())
    }
}

/// input for creating a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewClient {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl NewClient {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(LedgerError::Validation {
                field: "name",
                message: "client name must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// input for creating an agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAgent {
    pub name: String,
    pub phone: Option<String>,
}

impl NewAgent {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(LedgerError::Validation {
                field: "name",
                message: "agent name must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// input for registering a sale contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSale {
    pub parcel_id: ParcelId,
    pub client_id: ClientId,
    pub agent_id: Option<AgentId>,
    pub contract_date: NaiveDate,
    pub agreed_price: Money,
    pub down_payment: Money,
    pub term_months: u32,
    pub installment_amount: Money,
    pub total_commission: Option<Money>,
}

impl NewSale {
    /// financial-shape checks that need no repository access
    pub fn validate(&self) -> Result<()> {
        if self.agreed_price.is_negative() {
            return Err(LedgerError::Validation {
                field: "agreed_price",
                message: format!("agreed price must not be negative, got {}", self.agreed_price),
            });
        }
        if self.down_payment.is_negative() {
            return Err(LedgerError::Validation {
                field: "down_payment",
                message: format!("down payment must not be negative, got {}", self.down_payment),
            });
        }
        if self.down_payment > self.agreed_price {
            return Err(LedgerError::Validation {
                field: "down_payment",
                message: format!(
                    "down payment {} exceeds agreed price {}",
                    self.down_payment, self.agreed_price
                ),
            });
        }
        if self.term_months == 0 {
            return Err(LedgerError::Validation {
                field: "term_months",
                message: "term must be at least one month".to_string(),
            });
        }
        if !self.installment_amount.is_positive() {
            return Err(LedgerError::Validation {
                field: "installment_amount",
                message: format!(
                    "installment amount must be positive, got {}",
                    self.installment_amount
                ),
            });
        }
        // one currency unit of slack absorbs rounding in the quoted installment
        let principal = self.agreed_price - self.down_payment;
        let coverage = self.installment_amount * self.term_months;
        if coverage < principal - EPSILON {
            return Err(LedgerError::Validation {
                field: "installment_amount",
                message: format!(
                    "{} installments of {} cover {}, short of the {} financed",
                    self.term_months, self.installment_amount, coverage, principal
                ),
            });
        }
        if let Some(commission) = self.total_commission {
            if commission.is_negative() {
                return Err(LedgerError::Validation {
                    field: "total_commission",
                    message: format!("commission must not be negative, got {}", commission),
                });
            }
        }
        Ok(())
    }
}

/// input for registering a payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPayment {
    pub sale_id: SaleId,
    pub amount: Money,
    pub date: NaiveDate,
}

impl NewPayment {
    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_positive() {
            return Err(LedgerError::Validation {
                field: "amount",
                message: format!("payment amount must be positive, got {}", self.amount),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn sale_draft() -> NewSale {
        NewSale {
            parcel_id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            agent_id: Some(Uuid::new_v4()),
            contract_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            agreed_price: Money::from_major(120_000),
            down_payment: Money::from_major(20_000),
            term_months: 10,
            installment_amount: Money::from_major(10_000),
            total_commission: Some(Money::from_major(6_000)),
        }
    }

    #[test]
    fn test_parcel_display_key() {
        let parcel = Parcel {
            id: Uuid::new_v4(),
            block: "3".to_string(),
            lot: "14".to_string(),
            area_sqm: dec!(250),
            list_price: Money::from_major(80_000),
            status: crate::types::ParcelStatus::Available,
        };
        assert_eq!(parcel.display_key(), "M3-L14");
    }

    #[test]
    fn test_client_contact_channels_skip_missing() {
        let client = Client {
            id: Uuid::new_v4(),
            name: "Marcos Lima".to_string(),
            phone: Some("+55 11 97777-0000".to_string()),
            email: None,
            address: None,
            notes: None,
        };
        let channels = client.contact_channels();
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].kind, ContactKind::Phone);
        assert_eq!(channels[0].value, "+55 11 97777-0000");
    }

    #[test]
    fn test_sale_principal_financed() {
        let draft = sale_draft();
        draft.validate().unwrap();
        assert_eq!(
            draft.agreed_price - draft.down_payment,
            Money::from_major(100_000)
        );
    }

    #[test]
    fn test_sale_rejects_down_payment_above_price() {
        let mut draft = sale_draft();
        draft.down_payment = Money::from_major(130_000);
        let err = draft.validate().unwrap_err();
        assert!(matches!(
            err,
            crate::errors::LedgerError::Validation { field: "down_payment", .. }
        ));
    }

    #[test]
    fn test_sale_rejects_zero_term() {
        let mut draft = sale_draft();
        draft.term_months = 0;
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_sale_rejects_installments_that_do_not_cover_principal() {
        let mut draft = sale_draft();
        draft.installment_amount = Money::from_major(9_000);
        let err = draft.validate().unwrap_err();
        assert!(matches!(
            err,
            crate::errors::LedgerError::Validation { field: "installment_amount", .. }
        ));
    }

    #[test]
    fn test_sale_coverage_tolerates_one_unit_of_rounding() {
        // 3 x 3333.33 = 9999.99 against 10000 financed
        let mut draft = sale_draft();
        draft.agreed_price = Money::from_major(10_000);
        draft.down_payment = Money::ZERO;
        draft.term_months = 3;
        draft.installment_amount = Money::from_str_exact("3333.33").unwrap();
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_sale_rejects_negative_commission() {
        let mut draft = sale_draft();
        draft.total_commission = Some(Money::from_major(-1));
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_sale_without_agent_or_commission_is_valid() {
        let mut draft = sale_draft();
        draft.agent_id = None;
        draft.total_commission = None;
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_client_rejects_empty_name() {
        let draft = NewClient {
            name: "  ".to_string(),
            phone: None,
            email: None,
            address: None,
            notes: None,
        };
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_payment_rejects_non_positive_amount() {
        let draft = NewPayment {
            sale_id: Uuid::new_v4(),
            amount: Money::ZERO,
            date: NaiveDate::from_ymd_opt(2024, 2, 15).unwrap(),
        };
        assert!(draft.validate().is_err());
    }
}
