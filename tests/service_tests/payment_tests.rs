//! Tests for the payment model

#[path = "../common/mod.rs"]
mod common;

use common::{sample_payment, SAMPLE_PAYMENT_JSON};
use paystore::payment::{
    BeneficiaryParty, Fx, Links, Payment, PaymentAttributes, PaymentError, PaymentResponse,
};
use serde_json::json;

// =============================================================================
// Verify Tests
// =============================================================================

#[test]
fn test_verify_accepts_amount() {
    assert_eq!(sample_payment("1.00").verify(), Ok(()));
}

#[test]
fn test_verify_rejects_missing_amount() {
    let payment = sample_payment("");

    assert_eq!(payment.verify(), Err(PaymentError::InvalidPayment));
    assert_eq!(PaymentError::InvalidPayment.to_string(), "invalid payment");
}

#[test]
fn test_verify_rejects_empty_document() {
    let payment: Payment = serde_json::from_str("{}").unwrap();

    assert!(payment.verify().is_err());
}

// =============================================================================
// Wire Format Tests
// =============================================================================

#[test]
fn test_parse_full_document() {
    let payment: Payment = serde_json::from_str(SAMPLE_PAYMENT_JSON).unwrap();

    assert_eq!(payment.kind, "Payment");
    assert_eq!(payment.attributes.amount, "100.21");
    assert_eq!(payment.attributes.beneficiary_party.name, "Wilfred Jeremiah Owens");
    assert_eq!(payment.attributes.charges_information.sender_charges.len(), 2);
    assert_eq!(
        payment.attributes.charges_information.sender_charges[1].currency,
        "USD"
    );
    assert_eq!(payment.attributes.fx.exchange_rate, "2.00000");
    assert_eq!(payment.attributes.sponsor_party.bank_id, "123123");
    // Absent in the document
    assert!(payment.id.is_empty());
    assert!(payment.attributes.debtor_party.name.is_empty());
}

#[test]
fn test_type_field_name() {
    let value = serde_json::to_value(sample_payment("5.00")).unwrap();

    assert_eq!(value["type"], "Payment");
    assert!(value.get("kind").is_none());
    assert_eq!(value["attributes"]["amount"], "5.00");
}

#[test]
fn test_unknown_fields_ignored() {
    let payment: Payment =
        serde_json::from_value(json!({ "attributes": { "amount": "1" }, "extra": true }))
            .unwrap();

    assert_eq!(payment.attributes.amount, "1");
}

#[test]
fn test_null_nested_objects_default() {
    let payment: Payment = serde_json::from_value(json!({
        "type": "Payment",
        "attributes": {
            "amount": "4.20",
            "beneficiary_party": null,
            "charges_information": { "bearer_code": "SHAR", "sender_charges": null },
            "debtor_party": null,
            "fx": null,
            "sponsor_party": null
        }
    }))
    .unwrap();

    assert_eq!(payment.attributes.amount, "4.20");
    assert_eq!(payment.attributes.charges_information.bearer_code, "SHAR");
    assert!(payment.attributes.charges_information.sender_charges.is_empty());
    assert_eq!(payment.attributes.fx, Fx::default());
    assert_eq!(payment.attributes.beneficiary_party, BeneficiaryParty::default());
    assert!(payment.verify().is_ok());
}

#[test]
fn test_null_attributes_default() {
    let payment: Payment =
        serde_json::from_value(json!({ "type": "Payment", "attributes": null })).unwrap();

    assert_eq!(payment.attributes, PaymentAttributes::default());
    assert!(payment.verify().is_err());
}

// =============================================================================
// Response Envelope Tests
// =============================================================================

#[test]
fn test_empty_response_is_empty_object() {
    let text = serde_json::to_string(&PaymentResponse::default()).unwrap();

    assert_eq!(text, "{}");
}

#[test]
fn test_response_links_self() {
    let response = PaymentResponse {
        data: Vec::new(),
        links: Some(Links {
            self_link: "/v1/payments".to_string(),
        }),
    };

    let value = serde_json::to_value(&response).unwrap();

    assert_eq!(value, json!({ "links": { "self": "/v1/payments" } }));
}

#[test]
fn test_single_response() {
    let mut payment = sample_payment("7.00");
    payment.id = "0000000000000001".to_string();

    let value = serde_json::to_value(PaymentResponse::single(payment)).unwrap();

    assert_eq!(value["data"].as_array().unwrap().len(), 1);
    assert_eq!(value["data"][0]["id"], "0000000000000001");
    assert!(value.get("links").is_none());
}
