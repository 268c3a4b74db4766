// Copyright 2025 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::artifact::{self, ContractArtifact};
use crate::factory::{self, ContractFactory, Deployment};
use crate::retry::retry;
use crate::transaction_config::TransactionConfig;
use crate::utils::{self, deployer_signer, http_provider_with_wallet};
use crate::{Network, DEFAULT_ARTIFACTS_DIR, DEFAULT_CONTRACT_NAME};
use alloy::primitives::utils::format_ether;
use alloy::providers::Provider;
use alloy::transports::{RpcError, TransportErrorKind};
use std::path::PathBuf;

const PREFLIGHT_RETRY_INTERVAL_MS: u64 = 1000;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Artifact(#[from] artifact::Error),
    #[error(transparent)]
    Config(#[from] utils::Error),
    #[error(transparent)]
    RpcError(#[from] RpcError<TransportErrorKind>),
    #[error(transparent)]
    Factory(#[from] factory::Error),
}

/// Everything needed to deploy one contract.
#[derive(Clone, Debug)]
pub struct DeployConfig {
    pub contract_name: String,
    pub artifacts_dir: PathBuf,
    /// Skip resolution and load this artifact file directly.
    pub artifact_path: Option<PathBuf>,
    pub network: Network,
    pub private_key: Option<String>,
    pub constructor_args: Vec<String>,
    pub transaction_config: TransactionConfig,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            contract_name: DEFAULT_CONTRACT_NAME.to_string(),
            artifacts_dir: PathBuf::from(DEFAULT_ARTIFACTS_DIR),
            artifact_path: None,
            network: Network::default(),
            private_key: None,
            constructor_args: vec![],
            transaction_config: TransactionConfig::default(),
        }
    }
}

impl DeployConfig {
    pub fn load_artifact(&self) -> Result<ContractArtifact, artifact::Error> {
        match &self.artifact_path {
            Some(path) => ContractArtifact::from_file(path),
            None => ContractArtifact::resolve(&self.artifacts_dir, &self.contract_name),
        }
    }
}

/// Resolve the contract's artifact, deploy it once and wait for the contract address.
pub async fn deploy_contract(config: &DeployConfig) -> Result<Deployment, Error> {
    let artifact = config.load_artifact()?;
    info!(
        "Deploying {} from {:?} to {}",
        artifact.name(),
        artifact.path(),
        config.network
    );

    let signer = deployer_signer(&config.network, config.private_key.as_deref())?;
    let deployer = signer.address();
    let provider = http_provider_with_wallet(config.network.rpc_url().clone(), signer);

    let chain_id = retry(
        || async { provider.get_chain_id().await },
        "get_chain_id",
        Some(PREFLIGHT_RETRY_INTERVAL_MS),
    )
    .await?;
    let balance = retry(
        || async { provider.get_balance(deployer).await },
        "get_balance",
        Some(PREFLIGHT_RETRY_INTERVAL_MS),
    )
    .await?;
    info!(
        "Deployer {deployer} on chain {chain_id} has a balance of {} ETH",
        format_ether(balance)
    );
    if balance.is_zero() {
        warn!("Deployer {deployer} has no funds, the creation transaction will likely be rejected");
    }

    let factory = ContractFactory::new(artifact, provider);
    let deployment = factory
        .deploy(&config.constructor_args, &config.transaction_config)
        .await?;

    Ok(deployment)
}
