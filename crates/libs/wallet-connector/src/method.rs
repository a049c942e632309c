use serde::{Deserialize, Serialize};

/// Wire method names of the capability surface, one RPC method per
/// capability.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ConnectorMethod {
    Probe,
    IsConnected,
    Connect,
    Disconnect,
    Accounts,
    CurrentAccount,
    SignMessage,
    SignData,
    SendTransaction,
    SignTransaction,
    Assets,
    AddAssets,
    AddAbi,
    GetAbi,
    HasAbi,
    CurrentNetwork,
    SelectNetwork,
    Networks,
    AddNetwork,
    Version,
}

impl ConnectorMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Probe => "probe",
            Self::IsConnected => "is_connected",
            Self::Connect => "connect",
            Self::Disconnect => "disconnect",
            Self::Accounts => "accounts",
            Self::CurrentAccount => "current_account",
            Self::SignMessage => "sign_message",
            Self::SignData => "sign_data",
            Self::SendTransaction => "send_transaction",
            Self::SignTransaction => "sign_transaction",
            Self::Assets => "assets",
            Self::AddAssets => "add_assets",
            Self::AddAbi => "add_abi",
            Self::GetAbi => "get_abi",
            Self::HasAbi => "has_abi",
            Self::CurrentNetwork => "current_network",
            Self::SelectNetwork => "select_network",
            Self::Networks => "networks",
            Self::AddNetwork => "add_network",
            Self::Version => "version",
        }
    }
}
