// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::utils;
use crate::{CustomNetwork, Network};
use alloy::hex::ToHexExt;
use alloy::node_bindings::{Anvil, AnvilInstance, NodeError};
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::reqwest::Url;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Could not spawn Anvil node, install it by running `foundryup`: {0}")]
    Spawn(#[from] NodeError),
    #[error("Invalid ANVIL_PORT: {0}")]
    InvalidPort(String),
    #[error(transparent)]
    Network(#[from] utils::Error),
}

/// A throwaway Anvil chain. The node is killed when this is dropped.
pub struct Testnet {
    anvil: AnvilInstance,
    rpc_url: Url,
}

impl Testnet {
    /// Starts an Anvil node.
    pub fn new() -> Result<Self, Error> {
        let (anvil, rpc_url) = start_node()?;
        Ok(Testnet { anvil, rpc_url })
    }

    pub fn to_network(&self) -> Network {
        Network::Custom(CustomNetwork {
            rpc_url_http: self.rpc_url.clone(),
        })
    }

    pub fn rpc_url(&self) -> &Url {
        &self.rpc_url
    }

    /// Private key of the `index`th pre-funded Anvil account.
    pub fn wallet_private_key(&self, index: usize) -> Option<String> {
        let key = self.anvil.keys().get(index)?.clone();
        let signer: PrivateKeySigner = key.into();
        Some(signer.to_bytes().encode_hex_with_prefix())
    }

    pub fn default_wallet_private_key(&self) -> String {
        // Fetches private key from the first default Anvil account (Alice).
        let signer: PrivateKeySigner = self.anvil.keys()[0].clone().into();
        signer.to_bytes().encode_hex_with_prefix()
    }
}

/// Runs a local Anvil node bound to a specified IP address.
///
/// The `AnvilInstance` `endpoint` function is hardcoded to return "localhost", so we must also
/// return the RPC URL if we want to listen on a different address.
///
/// The `anvil` binary respects the `ANVIL_IP_ADDR` environment variable, but defaults to "localhost".
pub fn start_node() -> Result<(AnvilInstance, Url), Error> {
    let host = std::env::var("ANVIL_IP_ADDR").unwrap_or_else(|_| "localhost".to_string());
    let port = std::env::var("ANVIL_PORT")
        .unwrap_or(0.to_string())
        .parse::<u16>()
        .map_err(|err| Error::InvalidPort(err.to_string()))?;

    let anvil = Anvil::new().port(port).try_spawn()?;

    // We have to manually return the RPC URL because the `anvil::endpoint_url()` always returns `localhost`
    let url = Url::parse(&format!("http://{host}:{}", anvil.port()))
        .map_err(|err| utils::Error::InvalidRpcUrl(err.to_string()))?;

    debug!("Started Anvil node at {url}");

    Ok((anvil, url))
}
