//! Ledger networks and the network-backed publisher

use crate::anchor::{Anchor, OperatorIdentity};
use crate::errors::{auth_error, Result};
use crate::traits::LedgerPublisher;
use hdp_core::errors::{ExError, ExErrorKind};
use hdp_core::ids::TopicId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    #[default]
    Testnet,
    Previewnet,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Previewnet => "previewnet",
        }
    }

    /// Public mirror-node endpoint for this network
    pub fn default_mirror_url(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://mainnet-public.mirrornode.hedera.com",
            Network::Testnet => "https://testnet.mirrornode.hedera.com",
            Network::Previewnet => "https://previewnet.mirrornode.hedera.com",
        }
    }
}

impl FromStr for Network {
    type Err = ExError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            "previewnet" => Ok(Network::Previewnet),
            other => Err(ExError::new(ExErrorKind::Config)
                .with_op("parse_network")
                .with_message(format!(
                    "unknown network '{}' (expected mainnet, testnet or previewnet)",
                    other
                ))),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Publisher for a live network
///
/// Submitting to consensus nodes needs a ledger SDK binding that this build
/// does not carry. Credentials are still checked first so a missing key is
/// reported as such.
#[derive(Debug, Clone, Copy)]
pub struct NetworkPublisher {
    network: Network,
}

impl NetworkPublisher {
    pub fn new(network: Network) -> Self {
        Self { network }
    }

    fn unavailable(&self, operation: &str) -> ExError {
        ExError::new(ExErrorKind::NotImplemented)
            .with_op(operation.to_string())
            .with_entity_id(self.network.to_string())
            .with_message("network submission requires a ledger SDK binding; rerun with --mock")
    }

    fn check_operator(&self, operation: &str, operator: &OperatorIdentity) -> Result<()> {
        if operator.has_key() {
            Ok(())
        } else {
            Err(auth_error(operation, "HEDERA_OPERATOR_KEY is not set"))
        }
    }
}

impl LedgerPublisher for NetworkPublisher {
    fn create_topic(&self, _memo: &str, operator: &OperatorIdentity) -> Result<TopicId> {
        self.check_operator("create_topic", operator)?;
        Err(self.unavailable("create_topic"))
    }

    fn publish(
        &self,
        _topic: &TopicId,
        _payload: &[u8],
        operator: &OperatorIdentity,
    ) -> Result<Anchor> {
        self.check_operator("submit_message", operator)?;
        Err(self.unavailable("submit_message"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdp_core::ids::AccountId;

    #[test]
    fn test_network_parse_and_mirror_urls() {
        assert_eq!("TESTNET".parse::<Network>().unwrap(), Network::Testnet);
        assert_eq!(
            Network::Mainnet.default_mirror_url(),
            "https://mainnet-public.mirrornode.hedera.com"
        );
        assert_eq!(
            "devnet".parse::<Network>().unwrap_err().kind(),
            ExErrorKind::Config
        );
    }

    #[test]
    fn test_missing_key_reports_auth_before_transport() {
        let publisher = NetworkPublisher::new(Network::Testnet);
        let no_key = OperatorIdentity::new(AccountId::new(0, 0, 2), "");
        let err = publisher
            .publish(&TopicId::new(0, 0, 1), b"{}", &no_key)
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Auth);

        let keyed = OperatorIdentity::new(AccountId::new(0, 0, 2), "k");
        let err = publisher
            .publish(&TopicId::new(0, 0, 1), b"{}", &keyed)
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::NotImplemented);
    }
}
