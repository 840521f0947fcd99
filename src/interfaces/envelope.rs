use crate::config::GatewayConfig;
use crate::domain::ports::{GatewayOperation, TrxType};
use crate::error::Result;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use url::Url;

const DATA_VAULT_QUERY: &str = "ProcessDataVault";

#[derive(Serialize)]
struct Body<'a, T> {
    #[serde(rename = "Channel")]
    channel: &'a str,
    #[serde(rename = "Store")]
    store: &'a str,
    #[serde(rename = "TrxType")]
    trx_type: TrxType,
    #[serde(flatten)]
    payload: &'a T,
}

/// A fully-built gateway call, ready to be handed to an HTTP client.
#[derive(Clone, PartialEq)]
pub struct GatewayRequest {
    pub trx_type: TrxType,
    pub url: Url,
    pub headers: Vec<(&'static str, String)>,
    pub body: Value,
}

impl GatewayRequest {
    /// Wraps a validated operation with the merchant's channel, store and
    /// credentials.
    pub fn build<T: GatewayOperation>(config: &GatewayConfig, operation: &T) -> Result<Self> {
        let mut url = config.endpoint();
        if T::TRX_TYPE.is_data_vault() {
            url.set_query(Some(DATA_VAULT_QUERY));
        }
        let body = serde_json::to_value(Body {
            channel: &config.channel,
            store: &config.store,
            trx_type: T::TRX_TYPE,
            payload: operation,
        })?;
        tracing::debug!(trx_type = ?T::TRX_TYPE, url = %url, "gateway request built");
        Ok(Self {
            trx_type: T::TRX_TYPE,
            url,
            headers: vec![
                ("Auth1", config.auth1.clone()),
                ("Auth2", config.auth2.clone()),
                ("Content-Type", "application/json".to_string()),
            ],
            body,
        })
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl fmt::Debug for GatewayRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header_names: Vec<&str> = self.headers.iter().map(|(name, _)| *name).collect();
        f.debug_struct("GatewayRequest")
            .field("trx_type", &self.trx_type)
            .field("url", &self.url.as_str())
            .field("headers", &header_names)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::validator::{validate_sale, validate_tokenization};
    use serde_json::json;

    fn config() -> GatewayConfig {
        GatewayConfig::new("39038540035", "testcert2", "testcert3")
    }

    #[test]
    fn test_tokenization_envelope() {
        let request = validate_tokenization(&json!({
            "cardNumber": "4035874000424977",
            "expiration": "202812",
            "CVC": "977"
        }))
        .unwrap();
        let envelope = GatewayRequest::build(&config(), &request).unwrap();

        assert_eq!(envelope.trx_type, TrxType::Create);
        assert_eq!(envelope.url.query(), Some("ProcessDataVault"));
        assert_eq!(envelope.header("auth1"), Some("testcert2"));
        assert_eq!(envelope.header("Auth2"), Some("testcert3"));
        assert_eq!(
            envelope.body,
            json!({
                "Channel": "EC",
                "Store": "39038540035",
                "TrxType": "CREATE",
                "CardNumber": "4035874000424977",
                "Expiration": "202812",
                "CVC": "977"
            })
        );
    }

    #[test]
    fn test_sale_envelope_uses_plain_endpoint() {
        let request = validate_sale(&json!({
            "posInputMode": "E-Commerce",
            "amount": "1000",
            "ITBIS": "180",
            "orderNumber": "001",
            "dataVaultToken": "TOKEN-1"
        }))
        .unwrap();
        let envelope = GatewayRequest::build(&config(), &request).unwrap();

        assert_eq!(envelope.url.query(), None);
        assert_eq!(envelope.body["TrxType"], "Sale");
        assert_eq!(envelope.body["ITBIS"], "180");
        assert_eq!(envelope.body["AcquirerRefData"], "1");
        assert_eq!(envelope.body["DataVaultToken"], "TOKEN-1");
    }

    #[test]
    fn test_debug_hides_header_values() {
        let request = validate_tokenization(&json!({
            "cardNumber": "4035874000424977",
            "expiration": "202812",
            "CVC": "977"
        }))
        .unwrap();
        let envelope = GatewayRequest::build(&config(), &request).unwrap();
        let debug = format!("{envelope:?}");
        assert!(!debug.contains("testcert2"));
        assert!(!debug.contains("4035874000424977"));
    }
}
