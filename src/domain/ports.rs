use serde::Serialize;

/// Transaction type sent in the `TrxType` field of every request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrxType {
    #[serde(rename = "CREATE")]
    Create,
    #[serde(rename = "DELETE")]
    Delete,
    Sale,
}

impl TrxType {
    /// DataVault operations go to the `ProcessDataVault` endpoint.
    pub fn is_data_vault(&self) -> bool {
        matches!(self, TrxType::Create | TrxType::Delete)
    }
}

/// A validated request that can be sent to the gateway.
pub trait GatewayOperation: Serialize {
    const TRX_TYPE: TrxType;
}
