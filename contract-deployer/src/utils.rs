// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::Network;
use alloy::network::EthereumWallet;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::reqwest;
use std::env;

/// environment variable to connect to a custom EVM network
pub const RPC_URL: &str = "RPC_URL";
/// environment variable naming one of the predefined EVM networks
pub const EVM_NETWORK: &str = "EVM_NETWORK";
/// environment variable holding the hex encoded deployer key
pub const PRIVATE_KEY: &str = "PRIVATE_KEY";

/// The first account a Hardhat or Anvil development node pre-funds. Only ever used for
/// [`Network::Localhost`] and local custom networks.
const DEV_NODE_FIRST_ACCOUNT_PRIVATE_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to get EVM network: {0}")]
    FailedToGetEvmNetwork(String),
    #[error("Unknown EVM network: {0}")]
    UnknownNetwork(String),
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),
    #[error("No private key given for {0}, set {PRIVATE_KEY} or pass one explicitly")]
    MissingPrivateKey(Network),
}

/// Get the `Network` from environment variables.
///
/// `RPC_URL` wins over `EVM_NETWORK`. Returns an error if neither is set.
pub fn get_network_from_env() -> Result<Network, Error> {
    if let Ok(rpc_url) = env::var(RPC_URL) {
        info!("Using custom EVM network from {RPC_URL}");
        return Network::new_custom(&rpc_url);
    }

    match env::var(EVM_NETWORK) {
        Ok(name) => {
            let network = name.parse::<Network>()?;
            info!("Using {network} EVM network as {EVM_NETWORK} is set to '{name}'");
            Ok(network)
        }
        Err(_) => {
            error!("Failed to obtain the desired EVM network through environment variables");
            Err(Error::FailedToGetEvmNetwork(format!(
                "neither {RPC_URL} nor {EVM_NETWORK} is set"
            )))
        }
    }
}

/// Parse a hex encoded secp256k1 key, with or without `0x` prefix.
pub fn parse_private_key(private_key: &str) -> Result<PrivateKeySigner, Error> {
    private_key
        .trim()
        .parse::<PrivateKeySigner>()
        .map_err(|err| Error::InvalidPrivateKey(err.to_string()))
}

/// Pick the signer for `network`.
///
/// Local development networks fall back to the node's first pre-funded account; anything
/// else requires an explicit key.
pub fn deployer_signer(
    network: &Network,
    private_key: Option<&str>,
) -> Result<PrivateKeySigner, Error> {
    match private_key {
        Some(key) => parse_private_key(key),
        None if network.is_local() => {
            info!("No private key given, using the first development account of {network}");
            parse_private_key(DEV_NODE_FIRST_ACCOUNT_PRIVATE_KEY)
        }
        None => Err(Error::MissingPrivateKey(network.clone())),
    }
}

/// An HTTP provider that fills in gas, nonce and chain id and signs with `signer`.
pub fn http_provider_with_wallet(rpc_url: reqwest::Url, signer: PrivateKeySigner) -> DynProvider {
    let wallet = EthereumWallet::from(signer);

    ProviderBuilder::new()
        .wallet(wallet)
        .connect_http(rpc_url)
        .erased()
}

/// A read-only HTTP provider.
pub fn http_provider(rpc_url: reqwest::Url) -> DynProvider {
    ProviderBuilder::new().connect_http(rpc_url).erased()
}
