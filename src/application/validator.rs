use crate::domain::data_vault::{TokenDeletionRequest, TokenizationRequest};
use crate::domain::fields::{
    AcquirerRefData, AltMerchantName, Amount, CardNumber, CustomOrderId, CustomerServicePhone,
    Cvc, DataVaultToken, Expiration, Itbis, MinorAmount, OrderNumber, PosInputMode,
};
use crate::domain::sale::{DataVaultSaleRequest, PaymentSource};
use crate::error::{Constraint, FieldViolation, Result, ValidationError};
use serde_json::{Map, Value};

/// Input keys of the untyped records.
pub mod keys {
    pub const CARD_NUMBER: &str = "cardNumber";
    pub const EXPIRATION: &str = "expiration";
    pub const CVC: &str = "CVC";
    pub const POS_INPUT_MODE: &str = "posInputMode";
    pub const AMOUNT: &str = "amount";
    pub const ITBIS: &str = "ITBIS";
    pub const ORDER_NUMBER: &str = "orderNumber";
    pub const ACQUIRER_REF_DATA: &str = "acquirerRefData";
    pub const CUSTOMER_SERVICE_PHONE: &str = "customerServicePhone";
    pub const CUSTOM_ORDER_ID: &str = "customOrderId";
    pub const ALT_MERCHANT_NAME: &str = "altMerchantName";
    pub const DATA_VAULT_TOKEN: &str = "dataVaultToken";
}

use keys::*;

const TOKENIZATION_KEYS: &[&str] = &[CARD_NUMBER, EXPIRATION, CVC];
const DELETION_KEYS: &[&str] = &[DATA_VAULT_TOKEN];
const SALE_KEYS: &[&str] = &[
    POS_INPUT_MODE,
    AMOUNT,
    ITBIS,
    ORDER_NUMBER,
    ACQUIRER_REF_DATA,
    CUSTOMER_SERVICE_PHONE,
    CUSTOM_ORDER_ID,
    ALT_MERCHANT_NAME,
    DATA_VAULT_TOKEN,
    CARD_NUMBER,
    EXPIRATION,
    CVC,
];

const STRING: &str = "a string";
const AMOUNT_TYPE: &str = "a non-negative integer or a string of digits";

/// Validates a tokenization request and normalizes it for the wire.
pub fn validate_tokenization(input: &Value) -> Result<TokenizationRequest> {
    let mut record = RecordReader::new(input, TOKENIZATION_KEYS)?;

    let card_number = record.required(CARD_NUMBER, CardNumber::parse);
    let expiration = record.required(EXPIRATION, Expiration::parse);
    let cvc = record.required(CVC, Cvc::parse);

    match (card_number, expiration, cvc) {
        (Some(card_number), Some(expiration), Some(cvc)) if record.is_clean() => {
            tracing::debug!(card = %card_number.masked(), "tokenization request validated");
            Ok(TokenizationRequest {
                card_number,
                expiration,
                cvc,
            })
        }
        _ => Err(record.into_error()),
    }
}

/// Validates a request to delete a stored token.
pub fn validate_token_deletion(input: &Value) -> Result<TokenDeletionRequest> {
    let mut record = RecordReader::new(input, DELETION_KEYS)?;

    match record.required(DATA_VAULT_TOKEN, DataVaultToken::parse) {
        Some(data_vault_token) if record.is_clean() => Ok(TokenDeletionRequest { data_vault_token }),
        _ => Err(record.into_error()),
    }
}

/// Validates a sale request and normalizes it for the wire.
///
/// The sale is charged against `dataVaultToken` when present, otherwise
/// against the raw card fields.
pub fn validate_sale(input: &Value) -> Result<DataVaultSaleRequest> {
    let mut record = RecordReader::new(input, SALE_KEYS)?;

    let pos_input_mode = record.required(POS_INPUT_MODE, PosInputMode::parse);
    let amount = record.required_amount(AMOUNT, Amount::new);
    let mut itbis = record.required_amount(ITBIS, |value| Ok(Itbis::new(value)));
    if let (Some(amount), Some(tax)) = (amount, itbis)
        && tax.value() > amount.value()
    {
        record.reject(ITBIS, Constraint::OutOfRange("must not exceed amount"));
        itbis = None;
    }
    let order_number = record.nullable(ORDER_NUMBER, OrderNumber::parse);
    let acquirer_ref_data = record.acquirer_ref_data();
    let customer_service_phone =
        record.optional(CUSTOMER_SERVICE_PHONE, CustomerServicePhone::parse);
    let custom_order_id = record.optional(CUSTOM_ORDER_ID, CustomOrderId::parse);
    let alt_merchant_name = record.optional(ALT_MERCHANT_NAME, AltMerchantName::parse);
    let source = record.payment_source(pos_input_mode);

    match (
        pos_input_mode,
        amount,
        itbis,
        order_number,
        acquirer_ref_data,
        source,
    ) {
        (
            Some(pos_input_mode),
            Some(amount),
            Some(itbis),
            Some(order_number),
            Some(acquirer_ref_data),
            Some(source),
        ) if record.is_clean() => {
            tracing::debug!(
                amount = %amount.value(),
                itbis = %itbis.value(),
                tokenized = source.token().is_some(),
                "sale request validated"
            );
            Ok(DataVaultSaleRequest {
                pos_input_mode,
                amount,
                itbis,
                order_number,
                acquirer_ref_data,
                customer_service_phone: customer_service_phone.flatten(),
                custom_order_id: custom_order_id.flatten(),
                alt_merchant_name: alt_merchant_name.flatten(),
                source,
            })
        }
        _ => Err(record.into_error()),
    }
}

enum Field<'a> {
    Absent,
    Text(&'a str),
    Invalid,
}

/// Reads typed fields out of an untyped record, collecting every violation
/// instead of stopping at the first one.
struct RecordReader<'a> {
    record: &'a Map<String, Value>,
    violations: Vec<FieldViolation>,
}

impl<'a> RecordReader<'a> {
    fn new(input: &'a Value, known: &[&str]) -> std::result::Result<Self, ValidationError> {
        let record = input.as_object().ok_or_else(|| {
            ValidationError::single("$", Constraint::WrongType { expected: "an object" })
        })?;
        for key in record.keys().filter(|key| !known.contains(&key.as_str())) {
            tracing::debug!(key = %key, "stripping unknown field");
        }
        Ok(Self {
            record,
            violations: Vec::new(),
        })
    }

    fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    fn into_error(self) -> crate::error::GatewayError {
        ValidationError::new(self.violations).into()
    }

    fn reject(&mut self, key: &str, constraint: Constraint) {
        self.violations.push(FieldViolation::new(key, constraint));
    }

    /// Present and not null.
    fn is_present(&self, key: &str) -> bool {
        self.record.get(key).is_some_and(|value| !value.is_null())
    }

    fn text(&mut self, key: &str) -> Field<'a> {
        let record = self.record;
        match record.get(key) {
            None | Some(Value::Null) => Field::Absent,
            Some(Value::String(value)) => Field::Text(value),
            Some(_) => {
                self.reject(key, Constraint::WrongType { expected: STRING });
                Field::Invalid
            }
        }
    }

    fn apply<T>(
        &mut self,
        key: &str,
        value: &str,
        parse: impl FnOnce(&str) -> std::result::Result<T, Constraint>,
    ) -> Option<T> {
        parse(value)
            .map_err(|constraint| self.reject(key, constraint))
            .ok()
    }

    fn required<T>(
        &mut self,
        key: &str,
        parse: impl FnOnce(&str) -> std::result::Result<T, Constraint>,
    ) -> Option<T> {
        match self.text(key) {
            Field::Text(value) => self.apply(key, value, parse),
            Field::Absent => {
                self.reject(key, Constraint::Missing);
                None
            }
            Field::Invalid => None,
        }
    }

    /// `Some(None)` when the field is absent, `None` when it is invalid.
    fn optional<T>(
        &mut self,
        key: &str,
        parse: impl FnOnce(&str) -> std::result::Result<T, Constraint>,
    ) -> Option<Option<T>> {
        match self.text(key) {
            Field::Text(value) => self.apply(key, value, parse).map(Some),
            Field::Absent => Some(None),
            Field::Invalid => None,
        }
    }

    /// The key must be present; its value may be null.
    fn nullable(
        &mut self,
        key: &str,
        parse: impl FnOnce(&str) -> std::result::Result<OrderNumber, Constraint>,
    ) -> Option<OrderNumber> {
        let record = self.record;
        match record.get(key) {
            None => {
                self.reject(key, Constraint::Missing);
                None
            }
            Some(Value::Null) => Some(OrderNumber::null()),
            Some(_) => match self.text(key) {
                Field::Text(value) => self.apply(key, value, parse),
                Field::Absent | Field::Invalid => None,
            },
        }
    }

    fn required_amount<T>(
        &mut self,
        key: &str,
        build: impl FnOnce(MinorAmount) -> std::result::Result<T, Constraint>,
    ) -> Option<T> {
        let record = self.record;
        let parsed = match record.get(key) {
            None | Some(Value::Null) => Err(Constraint::Missing),
            Some(Value::String(value)) => MinorAmount::parse(value),
            Some(Value::Number(number)) => number
                .as_u64()
                .ok_or(Constraint::WrongType {
                    expected: AMOUNT_TYPE,
                })
                .and_then(MinorAmount::from_minor),
            Some(_) => Err(Constraint::WrongType {
                expected: AMOUNT_TYPE,
            }),
        };
        parsed
            .and_then(build)
            .map_err(|constraint| self.reject(key, constraint))
            .ok()
    }

    /// Defaults to the fixed value when absent; accepts `"1"` or `1`.
    fn acquirer_ref_data(&mut self) -> Option<AcquirerRefData> {
        let record = self.record;
        let parsed = match record.get(ACQUIRER_REF_DATA) {
            None | Some(Value::Null) => Ok(AcquirerRefData),
            Some(Value::String(value)) => AcquirerRefData::parse(value),
            Some(Value::Number(number)) => AcquirerRefData::parse(&number.to_string()),
            Some(_) => Err(Constraint::FixedValue {
                expected: AcquirerRefData::VALUE,
            }),
        };
        parsed
            .map_err(|constraint| self.reject(ACQUIRER_REF_DATA, constraint))
            .ok()
    }

    fn payment_source(&mut self, pos_input_mode: Option<PosInputMode>) -> Option<PaymentSource> {
        let moto = pos_input_mode == Some(PosInputMode::Moto);
        let cvc_present = self.is_present(CVC);

        if self.is_present(DATA_VAULT_TOKEN) {
            let token = self.required(DATA_VAULT_TOKEN, DataVaultToken::parse);
            for key in [CARD_NUMBER, EXPIRATION] {
                if self.is_present(key) {
                    self.reject(key, Constraint::ConflictsWith(DATA_VAULT_TOKEN));
                }
            }
            if moto && cvc_present {
                self.reject(
                    CVC,
                    Constraint::NotAllowed("must not be sent for MOTO token sales"),
                );
                return None;
            }
            let cvc = self.optional(CVC, Cvc::parse);
            return Some(PaymentSource::Token { token: token?, cvc: cvc? });
        }

        if self.is_present(CARD_NUMBER) || self.is_present(EXPIRATION) {
            let card_number = self.required(CARD_NUMBER, CardNumber::parse);
            let expiration = self.required(EXPIRATION, Expiration::parse);
            if !moto && !cvc_present {
                self.reject(CVC, Constraint::Missing);
                return None;
            }
            let cvc = self.optional(CVC, Cvc::parse);
            return Some(PaymentSource::Card {
                card_number: card_number?,
                expiration: expiration?,
                cvc: cvc?,
            });
        }

        self.reject(DATA_VAULT_TOKEN, Constraint::Missing);
        None
    }
}
