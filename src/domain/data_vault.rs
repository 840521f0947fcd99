use super::fields::{CardNumber, Cvc, DataVaultToken, Expiration};
use super::ports::{GatewayOperation, TrxType};
use crate::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};

/// Request to store a card in the DataVault and receive a token for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenizationRequest {
    #[serde(rename = "CardNumber")]
    pub card_number: CardNumber,
    #[serde(rename = "Expiration")]
    pub expiration: Expiration,
    #[serde(rename = "CVC")]
    pub cvc: Cvc,
}

impl GatewayOperation for TokenizationRequest {
    const TRX_TYPE: TrxType = TrxType::Create;
}

/// Request to remove a previously stored token from the DataVault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenDeletionRequest {
    #[serde(rename = "DataVaultToken")]
    pub data_vault_token: DataVaultToken,
}

impl GatewayOperation for TokenDeletionRequest {
    const TRX_TYPE: TrxType = TrxType::Delete;
}

/// The gateway's answer to a DataVault operation.
///
/// Every field is optional: error responses omit the success fields and
/// successful ones send `ErrorDescription` blank.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataVaultResponse {
    /// Card brand.
    #[serde(rename = "Brand", skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Masked card number (e.g. `XXXXXX…XXXX`).
    #[serde(rename = "CardNumber", skip_serializing_if = "Option::is_none")]
    pub card_number: Option<String>,
    #[serde(rename = "DataVaultToken", skip_serializing_if = "Option::is_none")]
    pub data_vault_token: Option<String>,
    #[serde(rename = "ErrorDescription", skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
    /// Token expiration, `YYYYMM`.
    #[serde(rename = "Expiration", skip_serializing_if = "Option::is_none")]
    pub expiration: Option<String>,
    /// Whether the token was created with a CVV.
    #[serde(rename = "HasCVV", skip_serializing_if = "Option::is_none")]
    pub has_cvv: Option<bool>,
    /// ISO-8583 response code; `"00"` on success.
    #[serde(rename = "IsoCode", skip_serializing_if = "Option::is_none")]
    pub iso_code: Option<String>,
    // The gateway spells this field without the "s".
    #[serde(rename = "ReponseMessage", skip_serializing_if = "Option::is_none")]
    pub response_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseOutcome {
    Approved,
    Rejected {
        iso_code: Option<String>,
        message: String,
    },
}

/// A card successfully stored in the DataVault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenizedCard {
    pub token: String,
    pub brand: Option<String>,
    pub masked_card_number: Option<String>,
    pub expiration: Option<String>,
    pub has_cvv: bool,
}

impl DataVaultResponse {
    pub const APPROVED_ISO_CODE: &'static str = "00";

    fn error_description(&self) -> Option<&str> {
        self.error_description
            .as_deref()
            .map(str::trim)
            .filter(|description| !description.is_empty())
    }

    pub fn is_approved(&self) -> bool {
        self.iso_code.as_deref() == Some(Self::APPROVED_ISO_CODE) && self.error_description().is_none()
    }

    pub fn outcome(&self) -> ResponseOutcome {
        if self.is_approved() {
            return ResponseOutcome::Approved;
        }
        let message = self
            .error_description()
            .or(self.response_message.as_deref())
            .unwrap_or("no message")
            .to_string();
        ResponseOutcome::Rejected {
            iso_code: self.iso_code.clone(),
            message,
        }
    }

    /// Turns an approved response into the stored card it describes.
    pub fn into_token(self) -> Result<TokenizedCard> {
        if let ResponseOutcome::Rejected { iso_code, message } = self.outcome() {
            return Err(GatewayError::Declined { iso_code, message });
        }
        let token = self
            .data_vault_token
            .filter(|token| !token.is_empty())
            .ok_or(GatewayError::MissingToken)?;
        Ok(TokenizedCard {
            token,
            brand: self.brand,
            masked_card_number: self.card_number,
            expiration: self.expiration,
            has_cvv: self.has_cvv.unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approved_json() -> &'static str {
        r#"{
            "Brand": "VISA",
            "CardNumber": "411111******1111",
            "DataVaultToken": "DD4E5B3F-4A32-4B6B-8C0A-2E1A6C0F1D11",
            "ErrorDescription": "",
            "Expiration": "202812",
            "HasCVV": true,
            "IsoCode": "00",
            "ReponseMessage": "APROBADA"
        }"#
    }

    #[test]
    fn test_response_deserialization() {
        let response: DataVaultResponse = serde_json::from_str(approved_json()).unwrap();
        assert_eq!(response.brand.as_deref(), Some("VISA"));
        assert_eq!(response.has_cvv, Some(true));
        assert_eq!(response.response_message.as_deref(), Some("APROBADA"));
        assert!(response.is_approved());
    }

    #[test]
    fn test_approved_response_into_token() {
        let response: DataVaultResponse = serde_json::from_str(approved_json()).unwrap();
        let card = response.into_token().unwrap();
        assert_eq!(card.token, "DD4E5B3F-4A32-4B6B-8C0A-2E1A6C0F1D11");
        assert_eq!(card.masked_card_number.as_deref(), Some("411111******1111"));
        assert!(card.has_cvv);
    }

    #[test]
    fn test_error_description_means_rejection() {
        let response: DataVaultResponse = serde_json::from_str(
            r#"{"IsoCode": "00", "ErrorDescription": "INVALID_CARD", "ReponseMessage": "ERROR"}"#,
        )
        .unwrap();
        assert_eq!(
            response.outcome(),
            ResponseOutcome::Rejected {
                iso_code: Some("00".to_string()),
                message: "INVALID_CARD".to_string(),
            }
        );
    }

    #[test]
    fn test_non_approved_iso_code_is_declined() {
        let response: DataVaultResponse =
            serde_json::from_str(r#"{"IsoCode": "99", "ReponseMessage": "DECLINADA"}"#).unwrap();
        let err = response.into_token().unwrap_err();
        assert!(matches!(
            err,
            GatewayError::Declined { ref iso_code, ref message }
                if iso_code.as_deref() == Some("99") && message == "DECLINADA"
        ));
    }

    #[test]
    fn test_approved_without_token() {
        let response: DataVaultResponse = serde_json::from_str(r#"{"IsoCode": "00"}"#).unwrap();
        assert!(matches!(
            response.into_token(),
            Err(GatewayError::MissingToken)
        ));
    }

    #[test]
    fn test_empty_response_is_rejected() {
        let response: DataVaultResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(
            response.outcome(),
            ResponseOutcome::Rejected {
                iso_code: None,
                message: "no message".to_string(),
            }
        );
    }
}
