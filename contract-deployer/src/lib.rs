// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use alloy::transports::http::reqwest;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use std::sync::LazyLock;

#[macro_use]
extern crate tracing;

pub mod artifact;
pub mod common;
pub mod deploy;
pub mod factory;
mod retry;
pub mod testnet;
pub mod transaction_config;
pub mod utils;

pub use artifact::ContractArtifact;
pub use deploy::{deploy_contract, DeployConfig, Error};
pub use factory::{ContractFactory, Deployment};

/// The contract deployed when no other name is given.
pub const DEFAULT_CONTRACT_NAME: &str = "RoyaltyDistribution";

/// Where Hardhat writes its build output, relative to the project root.
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

static LOCALHOST_HTTP_RPC_URL: LazyLock<reqwest::Url> = LazyLock::new(|| {
    "http://127.0.0.1:8545"
        .parse()
        .expect("Invalid RPC URL")
});

static PUBLIC_ARBITRUM_ONE_HTTP_RPC_URL: LazyLock<reqwest::Url> = LazyLock::new(|| {
    "https://arb1.arbitrum.io/rpc"
        .parse()
        .expect("Invalid RPC URL")
});

static PUBLIC_ARBITRUM_SEPOLIA_HTTP_RPC_URL: LazyLock<reqwest::Url> = LazyLock::new(|| {
    "https://sepolia-rollup.arbitrum.io/rpc"
        .parse()
        .expect("Invalid RPC URL")
});

#[serde_as]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CustomNetwork {
    #[serde_as(as = "DisplayFromStr")]
    pub rpc_url_http: reqwest::Url,
}

impl CustomNetwork {
    pub fn new(rpc_url: &str) -> Result<Self, utils::Error> {
        let rpc_url_http = reqwest::Url::parse(rpc_url)
            .map_err(|err| utils::Error::InvalidRpcUrl(format!("{rpc_url}: {err}")))?;
        Ok(Self { rpc_url_http })
    }
}

/// The EVM network a contract is deployed to.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Network {
    /// A development node (Hardhat or Anvil) listening on the default port.
    #[default]
    Localhost,
    ArbitrumOne,
    ArbitrumSepolia,
    Custom(CustomNetwork),
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Network::Localhost => write!(f, "localhost"),
            Network::ArbitrumOne => write!(f, "arbitrum-one"),
            Network::ArbitrumSepolia => write!(f, "arbitrum-sepolia"),
            Network::Custom(custom) => write!(f, "custom({})", custom.rpc_url_http),
        }
    }
}

impl std::str::FromStr for Network {
    type Err = utils::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "localhost" | "local" => Ok(Network::Localhost),
            "arbitrum-one" => Ok(Network::ArbitrumOne),
            "arbitrum-sepolia" => Ok(Network::ArbitrumSepolia),
            other => Err(utils::Error::UnknownNetwork(other.to_string())),
        }
    }
}

impl Network {
    /// Select the network from the environment, see [`utils::get_network_from_env`].
    pub fn from_env() -> Result<Self, utils::Error> {
        utils::get_network_from_env().inspect_err(|err| {
            warn!("Failed to select EVM network from ENV: {err}");
        })
    }

    pub fn new_custom(rpc_url: &str) -> Result<Self, utils::Error> {
        Ok(Self::Custom(CustomNetwork::new(rpc_url)?))
    }

    pub fn identifier(&self) -> &str {
        match self {
            Network::Localhost => "localhost",
            Network::ArbitrumOne => "arbitrum-one",
            Network::ArbitrumSepolia => "arbitrum-sepolia",
            Network::Custom(_) => "custom",
        }
    }

    pub fn rpc_url(&self) -> &reqwest::Url {
        match self {
            Network::Localhost => &LOCALHOST_HTTP_RPC_URL,
            Network::ArbitrumOne => &PUBLIC_ARBITRUM_ONE_HTTP_RPC_URL,
            Network::ArbitrumSepolia => &PUBLIC_ARBITRUM_SEPOLIA_HTTP_RPC_URL,
            Network::Custom(custom) => &custom.rpc_url_http,
        }
    }

    /// Whether the network is a throwaway development chain with pre-funded accounts.
    pub fn is_local(&self) -> bool {
        match self {
            Network::Localhost => true,
            Network::Custom(custom) => matches!(
                custom.rpc_url_http.host_str(),
                Some("localhost") | Some("127.0.0.1") | Some("[::1]")
            ),
            _ => false,
        }
    }
}
