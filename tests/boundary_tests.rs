use azul_datavault::application::validator::{validate_sale, validate_token_deletion};
use azul_datavault::error::{Constraint, GatewayError};
use serde_json::{Value, json};

fn sale_with(field: &str, value: Value) -> Value {
    let mut input = json!({
        "posInputMode": "E-Commerce",
        "amount": "1000",
        "ITBIS": "000",
        "orderNumber": null,
        "dataVaultToken": "TOKEN-1"
    });
    input[field] = value;
    input
}

fn constraint(result: Result<impl std::fmt::Debug, GatewayError>, field: &str) -> Constraint {
    match result {
        Err(GatewayError::Validation(err)) => err
            .constraint_for(field)
            .cloned()
            .expect("violation for field"),
        other => panic!("expected a validation error, got {other:?}"),
    }
}

#[test]
fn test_boundary_alt_merchant_name_length() {
    assert!(validate_sale(&sale_with("altMerchantName", json!("A".repeat(25)))).is_ok());
    assert_eq!(
        constraint(
            validate_sale(&sale_with("altMerchantName", json!("A".repeat(26)))),
            "altMerchantName"
        ),
        Constraint::MaxLength { max: 25, actual: 26 }
    );
}

#[test]
fn test_boundary_data_vault_token_length() {
    let token = "T".repeat(100);
    assert!(validate_sale(&sale_with("dataVaultToken", json!(token))).is_ok());
    assert!(validate_token_deletion(&json!({ "dataVaultToken": token })).is_ok());

    let token = "T".repeat(101);
    assert_eq!(
        constraint(
            validate_token_deletion(&json!({ "dataVaultToken": token })),
            "dataVaultToken"
        ),
        Constraint::MaxLength {
            max: 100,
            actual: 101
        }
    );
}

#[test]
fn test_boundary_amount_digits() {
    let request = validate_sale(&sale_with("amount", json!("999999999999"))).unwrap();
    let wire = serde_json::to_value(&request).unwrap();
    assert_eq!(wire["Amount"], "999999999999");

    assert!(matches!(
        constraint(
            validate_sale(&sale_with("amount", json!("1000000000000"))),
            "amount"
        ),
        Constraint::OutOfRange(_)
    ));
    assert!(matches!(
        constraint(
            validate_sale(&sale_with("amount", json!(1_000_000_000_000u64))),
            "amount"
        ),
        Constraint::OutOfRange(_)
    ));
}

#[test]
fn test_boundary_smallest_amount_keeps_two_decimals() {
    let request = validate_sale(&sale_with("amount", json!(1))).unwrap();
    let wire = serde_json::to_value(&request).unwrap();
    assert_eq!(wire["Amount"], "001");
    assert_eq!(request.amount.value().to_decimal().to_string(), "0.01");
}

#[test]
fn test_boundary_itbis_equal_to_amount() {
    assert!(validate_sale(&sale_with("ITBIS", json!("1000"))).is_ok());
}

#[test]
fn test_boundary_order_number_length() {
    assert!(validate_sale(&sale_with("orderNumber", json!("123456789012345"))).is_ok());
    assert_eq!(
        constraint(
            validate_sale(&sale_with("orderNumber", json!("1234567890123456"))),
            "orderNumber"
        ),
        Constraint::MaxLength { max: 15, actual: 16 }
    );
}
