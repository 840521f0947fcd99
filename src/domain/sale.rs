use super::fields::{
    AcquirerRefData, AltMerchantName, Amount, CardNumber, CustomOrderId, CustomerServicePhone,
    Cvc, DataVaultToken, Expiration, Itbis, OrderNumber, PosInputMode,
};
use super::ports::{GatewayOperation, TrxType};
use serde::Serialize;

/// What the sale is charged against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PaymentSource {
    /// A card previously stored in the DataVault. `CardNumber` and
    /// `Expiration` must not travel with it.
    Token {
        #[serde(rename = "DataVaultToken")]
        token: DataVaultToken,
        #[serde(rename = "CVC", skip_serializing_if = "Option::is_none")]
        cvc: Option<Cvc>,
    },
    Card {
        #[serde(rename = "CardNumber")]
        card_number: CardNumber,
        #[serde(rename = "Expiration")]
        expiration: Expiration,
        #[serde(rename = "CVC", skip_serializing_if = "Option::is_none")]
        cvc: Option<Cvc>,
    },
}

impl PaymentSource {
    pub fn token(&self) -> Option<&DataVaultToken> {
        match self {
            PaymentSource::Token { token, .. } => Some(token),
            PaymentSource::Card { .. } => None,
        }
    }

    pub fn cvc(&self) -> Option<&Cvc> {
        match self {
            PaymentSource::Token { cvc, .. } | PaymentSource::Card { cvc, .. } => cvc.as_ref(),
        }
    }
}

/// A sale charged against a DataVault token (or raw card data).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataVaultSaleRequest {
    #[serde(rename = "PosInputMode")]
    pub pos_input_mode: PosInputMode,
    /// Total amount, ITBIS included.
    #[serde(rename = "Amount")]
    pub amount: Amount,
    #[serde(rename = "ITBIS")]
    pub itbis: Itbis,
    #[serde(rename = "OrderNumber")]
    pub order_number: OrderNumber,
    #[serde(rename = "AcquirerRefData")]
    pub acquirer_ref_data: AcquirerRefData,
    #[serde(
        rename = "CustomerServicePhone",
        skip_serializing_if = "Option::is_none"
    )]
    pub customer_service_phone: Option<CustomerServicePhone>,
    #[serde(rename = "CustomOrderId", skip_serializing_if = "Option::is_none")]
    pub custom_order_id: Option<CustomOrderId>,
    #[serde(rename = "AltMerchantName", skip_serializing_if = "Option::is_none")]
    pub alt_merchant_name: Option<AltMerchantName>,
    #[serde(flatten)]
    pub source: PaymentSource,
}

impl GatewayOperation for DataVaultSaleRequest {
    const TRX_TYPE: TrxType = TrxType::Sale;
}
