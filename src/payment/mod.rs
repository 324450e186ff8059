//! Payment Module
//!
//! The payment resource served by the REST service and stored in the
//! payment bucket. Every field defaults when missing from the JSON, so a
//! sparse document still parses and is then judged by [`Payment::verify`].

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Payment validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    #[error("invalid payment")]
    InvalidPayment,
}

/// Treat an explicit JSON `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A payment resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Payment {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub version: i64,
    pub organisation_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub attributes: PaymentAttributes,
}

impl Payment {
    /// Check the payment is in a storable shape
    pub fn verify(&self) -> Result<(), PaymentError> {
        if self.attributes.amount.is_empty() {
            return Err(PaymentError::InvalidPayment);
        }
        Ok(())
    }
}

/// Properties of a payment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentAttributes {
    pub amount: String,
    #[serde(deserialize_with = "null_as_default")]
    pub beneficiary_party: BeneficiaryParty,
    #[serde(deserialize_with = "null_as_default")]
    pub charges_information: ChargesInformation,
    pub currency: String,
    #[serde(deserialize_with = "null_as_default")]
    pub debtor_party: DebtorParty,
    pub end_to_end_reference: String,
    #[serde(deserialize_with = "null_as_default")]
    pub fx: Fx,
    pub numeric_reference: String,
    pub payment_id: String,
    pub payment_purpose: String,
    pub payment_scheme: String,
    pub payment_type: String,
    pub processing_date: String,
    pub reference: String,
    pub scheme_payment_sub_type: String,
    pub scheme_payment_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sponsor_party: SponsorParty,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeneficiaryParty {
    pub account_name: String,
    pub account_number: String,
    pub account_number_code: String,
    pub account_type: i64,
    pub address: String,
    pub bank_id: String,
    pub bank_id_code: String,
    pub name: String,
}

/// Charges applied to a payment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChargesInformation {
    pub bearer_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sender_charges: Vec<Charge>,
    pub receiver_charges_amount: String,
    pub receiver_charges_currency: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Charge {
    pub amount: String,
    pub currency: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebtorParty {
    pub account_name: String,
    pub account_number: String,
    pub account_number_code: String,
    pub address: String,
    pub bank_id: String,
    pub bank_id_code: String,
    pub name: String,
}

/// Foreign exchange details
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fx {
    pub contract_reference: String,
    pub exchange_rate: String,
    pub original_amount: String,
    pub original_currency: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SponsorParty {
    pub account_number: String,
    pub bank_id: String,
    pub bank_id_code: String,
}

/// Links of a payment response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Links {
    #[serde(rename = "self", skip_serializing_if = "String::is_empty")]
    pub self_link: String,
}

/// Envelope for every payment response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentResponse {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<Payment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

impl PaymentResponse {
    /// Response carrying a single payment
    pub fn single(payment: Payment) -> Self {
        Self {
            data: vec![payment],
            links: None,
        }
    }
}
