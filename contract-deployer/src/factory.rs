// Copyright 2025 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::artifact::{self, ContractArtifact};
use crate::common::{Address, Bytes, TxHash};
use crate::retry::retry;
use crate::transaction_config::{MaxFeePerGas, TransactionConfig};
use alloy::network::{ReceiptResponse, TransactionBuilder};
use alloy::providers::Provider;
use alloy::rpc::types::TransactionRequest;
use alloy::transports::{RpcError, TransportErrorKind};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Artifact(#[from] artifact::Error),
    #[error(transparent)]
    RpcError(#[from] RpcError<TransportErrorKind>),
    #[error("Failed to submit the creation transaction: {0}")]
    Submission(#[source] RpcError<TransportErrorKind>),
    #[error(transparent)]
    PendingTransactionError(#[from] alloy::providers::PendingTransactionError),
    #[error("Creation transaction {tx_hash:?} was mined but reverted")]
    Reverted { tx_hash: TxHash },
    #[error("Receipt of creation transaction {0:?} holds no contract address")]
    MissingContractAddress(TxHash),
    #[error("Constructor of {0} is not payable, refusing to send value with it")]
    NonPayableConstructor(String),
    #[error("Estimated max fee per gas {estimated} is above the configured limit ({cap:?})")]
    MaxFeePerGasExceeded { estimated: u128, cap: MaxFeePerGas },
}

/// The outcome of a successful deployment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deployment {
    pub contract_name: String,
    pub address: Address,
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    pub deployer: Address,
}

/// Deploys one compiled contract through a signing provider.
pub struct ContractFactory<P: Provider> {
    artifact: ContractArtifact,
    provider: P,
}

impl<P: Provider> ContractFactory<P> {
    pub fn new(artifact: ContractArtifact, provider: P) -> Self {
        Self { artifact, provider }
    }

    /// Creation bytecode followed by the ABI-encoded constructor arguments.
    pub fn deploy_code(&self, constructor_args: &[String]) -> Result<Bytes, Error> {
        let encoded_args = self.artifact.encode_constructor_args(constructor_args)?;

        let mut code = Vec::with_capacity(self.artifact.bytecode().len() + encoded_args.len());
        code.extend_from_slice(self.artifact.bytecode());
        code.extend_from_slice(&encoded_args);

        Ok(code.into())
    }

    /// Send the creation transaction and wait for it to be mined.
    ///
    /// The transaction is broadcast exactly once. Deploying is not idempotent, so a failed
    /// submission or confirmation is returned to the caller rather than retried.
    pub async fn deploy(
        &self,
        constructor_args: &[String],
        transaction_config: &TransactionConfig,
    ) -> Result<Deployment, Error> {
        let name = self.artifact.name().to_string();

        if !transaction_config.value.is_zero() && !self.artifact.is_constructor_payable() {
            return Err(Error::NonPayableConstructor(name));
        }

        let code = self.deploy_code(constructor_args)?;
        let mut transaction_request = TransactionRequest::default()
            .with_deploy_code(code)
            .with_value(transaction_config.value);

        if let Some(gas_limit) = transaction_config.gas_limit {
            transaction_request.set_gas_limit(gas_limit);
        }

        self.apply_max_fee_per_gas(&mut transaction_request, &transaction_config.max_fee_per_gas)
            .await?;

        debug!("Submitting creation transaction for {name}");
        let pending_tx_builder = self
            .provider
            .send_transaction(transaction_request)
            .await
            .map_err(Error::Submission)?;

        let tx_hash = *pending_tx_builder.tx_hash();
        info!("Creation transaction for {name} is pending with tx_hash: {tx_hash:?}");

        let receipt = pending_tx_builder
            .with_timeout(transaction_config.confirmation_timeout)
            .get_receipt()
            .await
            .inspect_err(|err| error!("Failed to confirm creation of {name}: {err:?}"))?;

        if !receipt.status() {
            error!("Creation transaction {tx_hash:?} for {name} reverted");
            return Err(Error::Reverted { tx_hash });
        }

        let address = receipt
            .contract_address()
            .ok_or(Error::MissingContractAddress(tx_hash))?;

        info!(
            "{name} deployed to {address} in block {:?}, gas used: {}",
            receipt.block_number(),
            receipt.gas_used()
        );

        Ok(Deployment {
            contract_name: name,
            address,
            tx_hash,
            block_number: receipt.block_number(),
            gas_used: receipt.gas_used(),
            deployer: receipt.from(),
        })
    }

    async fn apply_max_fee_per_gas(
        &self,
        transaction_request: &mut TransactionRequest,
        max_fee_per_gas: &MaxFeePerGas,
    ) -> Result<(), Error> {
        if matches!(max_fee_per_gas, MaxFeePerGas::Auto | MaxFeePerGas::Unlimited) {
            return Ok(());
        }

        let estimate = retry(
            || async { self.provider.estimate_eip1559_fees().await },
            "estimate_eip1559_fees",
            None,
        )
        .await?;

        match max_fee_per_gas.resolve(estimate.max_fee_per_gas) {
            Ok(Some(cap)) => {
                debug!("Capping max fee per gas at {cap}");
                transaction_request.set_max_fee_per_gas(cap);
                transaction_request
                    .set_max_priority_fee_per_gas(estimate.max_priority_fee_per_gas.min(cap));
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(estimated) => Err(Error::MaxFeePerGasExceeded {
                estimated,
                cap: max_fee_per_gas.clone(),
            }),
        }
    }
}
