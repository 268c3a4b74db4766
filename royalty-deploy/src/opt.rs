// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::logging::{LogFormat, LogOutputDest};
use clap::Parser;
use color_eyre::Result;
use contract_deployer::common::U256;
use contract_deployer::transaction_config::{MaxFeePerGas, TransactionConfig};
use contract_deployer::utils;
use contract_deployer::{DeployConfig, Network, DEFAULT_ARTIFACTS_DIR, DEFAULT_CONTRACT_NAME};
use std::path::PathBuf;
use std::time::Duration;

// Please do not remove the blank lines in these doc comments.
// They are used for inserting line breaks when the help menu is rendered in the UI.

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub(crate) struct Opt {
    /// Name of the contract to deploy.
    #[clap(long, default_value = DEFAULT_CONTRACT_NAME)]
    pub contract: String,

    /// Directory holding the compiled contract artifacts.
    #[clap(long, default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts_dir: PathBuf,

    /// Load this artifact file instead of searching the artifacts directory.
    #[clap(long)]
    pub artifact: Option<PathBuf>,

    /// The EVM network to deploy to.
    ///
    /// Valid values are "localhost", "arbitrum-one" or "arbitrum-sepolia".
    ///
    /// Without this or `--rpc-url`, the RPC_URL and EVM_NETWORK environment variables are
    /// consulted. If neither is set, a local development node is assumed.
    #[clap(long, verbatim_doc_comment, conflicts_with = "rpc_url")]
    pub network: Option<Network>,

    /// RPC endpoint of a custom EVM network.
    #[clap(long)]
    pub rpc_url: Option<String>,

    /// Hex encoded private key of the deploying account.
    ///
    /// May be omitted for local development nodes, which pre-fund a well-known account.
    #[clap(long, env = "PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    /// Constructor arguments, in declaration order.
    #[clap(long, num_args = 1..)]
    pub constructor_args: Vec<String>,

    /// Amount of WEI to send to a payable constructor.
    #[clap(long, default_value = "0")]
    pub value: U256,

    /// Max fee per gas for the creation transaction.
    ///
    /// Valid values are "auto", "unlimited", "limited-auto:<WEI AMOUNT>", or a custom value in WEI.
    #[clap(long, verbatim_doc_comment, default_value = "auto")]
    pub max_fee_per_gas: MaxFeePerGas,

    /// Fixed gas limit for the creation transaction. Estimated by the node if unset.
    #[clap(long)]
    pub gas_limit: Option<u64>,

    /// How many seconds to wait for the creation transaction to be mined. Waits indefinitely if unset.
    #[clap(long = "timeout", value_parser = |t: &str| -> Result<Duration> { Ok(t.parse().map(Duration::from_secs)?) })]
    pub confirmation_timeout: Option<Duration>,

    /// Specify the logging format.
    ///
    /// Valid values are "default" or "json".
    #[clap(long, value_parser = LogFormat::parse_from_str, verbatim_doc_comment, default_value = "default")]
    pub log_format: LogFormat,

    /// Specify the logging output destination.
    ///
    /// Valid values are "stderr", "stdout", or a directory to write a log file into.
    #[clap(long, value_parser = LogOutputDest::parse_from_str, verbatim_doc_comment, default_value = "stderr")]
    pub log_output_dest: LogOutputDest,
}

impl Opt {
    /// `--rpc-url` wins over `--network`, which wins over the environment.
    ///
    /// Only an environment without `RPC_URL` and `EVM_NETWORK` falls back to localhost. A set but
    /// invalid value is an error.
    pub(crate) fn network(&self) -> Result<Network> {
        if let Some(rpc_url) = &self.rpc_url {
            return Ok(Network::new_custom(rpc_url)?);
        }
        if let Some(network) = &self.network {
            return Ok(network.clone());
        }
        match Network::from_env() {
            Ok(network) => Ok(network),
            Err(utils::Error::FailedToGetEvmNetwork(_)) => {
                info!("No EVM network configured, using {}", Network::Localhost);
                Ok(Network::Localhost)
            }
            Err(err) => Err(err.into()),
        }
    }

    pub(crate) fn deploy_config(&self) -> Result<DeployConfig> {
        let mut transaction_config =
            TransactionConfig::new(self.max_fee_per_gas.clone()).with_value(self.value);
        if let Some(gas_limit) = self.gas_limit {
            transaction_config = transaction_config.with_gas_limit(gas_limit);
        }
        if let Some(timeout) = self.confirmation_timeout {
            transaction_config = transaction_config.with_confirmation_timeout(timeout);
        }

        Ok(DeployConfig {
            contract_name: self.contract.clone(),
            artifacts_dir: self.artifacts_dir.clone(),
            artifact_path: self.artifact.clone(),
            network: self.network()?,
            private_key: self.private_key.clone(),
            constructor_args: self.constructor_args.clone(),
            transaction_config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Opt {
        Opt::try_parse_from(std::iter::once("royalty-deploy").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn defaults_deploy_royalty_distribution_from_hardhat_artifacts() {
        let opt = parse(&["--network", "localhost"]);
        let config = opt.deploy_config().unwrap();

        assert_eq!(config.contract_name, "RoyaltyDistribution");
        assert_eq!(config.artifacts_dir, PathBuf::from("artifacts"));
        assert_eq!(config.artifact_path, None);
        assert_eq!(config.network, Network::Localhost);
        assert!(config.constructor_args.is_empty());
        assert!(config.transaction_config.value.is_zero());
        assert_eq!(config.transaction_config.confirmation_timeout, None);
        assert_eq!(config.transaction_config.gas_limit, None);
        assert_eq!(
            config.transaction_config.max_fee_per_gas,
            MaxFeePerGas::Auto
        );
    }

    #[test]
    fn rpc_url_selects_custom_network() {
        let opt = parse(&["--rpc-url", "http://10.1.2.3:8545"]);
        assert_eq!(
            opt.network().unwrap(),
            Network::new_custom("http://10.1.2.3:8545").unwrap()
        );
    }

    #[test]
    fn network_and_rpc_url_conflict() {
        let result = Opt::try_parse_from([
            "royalty-deploy",
            "--network",
            "arbitrum-one",
            "--rpc-url",
            "http://10.1.2.3:8545",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn transaction_options_are_carried_over() {
        let opt = parse(&[
            "--network",
            "arbitrum-sepolia",
            "--contract",
            "Splitter",
            "--constructor-args",
            "0x00000000000000000000000000000000000000aa",
            "500",
            "--value",
            "1000",
            "--max-fee-per-gas",
            "limited-auto:100000000",
            "--timeout",
            "90",
            "--gas-limit",
            "3000000",
        ]);
        let config = opt.deploy_config().unwrap();

        assert_eq!(config.contract_name, "Splitter");
        assert_eq!(config.network, Network::ArbitrumSepolia);
        assert_eq!(
            config.constructor_args,
            vec![
                "0x00000000000000000000000000000000000000aa".to_string(),
                "500".to_string()
            ]
        );
        assert_eq!(config.transaction_config.value, U256::from(1_000u64));
        assert_eq!(
            config.transaction_config.max_fee_per_gas,
            MaxFeePerGas::LimitedAuto(100_000_000)
        );
        assert_eq!(
            config.transaction_config.confirmation_timeout,
            Some(Duration::from_secs(90))
        );
        assert_eq!(config.transaction_config.gas_limit, Some(3_000_000));
    }

    // Single test so no other test in this binary races on the environment.
    #[test]
    fn network_from_env_only_defaults_when_unset() {
        std::env::remove_var(utils::RPC_URL);
        std::env::remove_var(utils::EVM_NETWORK);
        let opt = parse(&[]);
        assert_eq!(opt.network().unwrap(), Network::Localhost);

        std::env::set_var(utils::EVM_NETWORK, "arbitrum-onee");
        assert!(opt.network().is_err());
        assert!(opt.deploy_config().is_err());

        std::env::set_var(utils::EVM_NETWORK, "arbitrum-one");
        assert_eq!(opt.network().unwrap(), Network::ArbitrumOne);

        std::env::set_var(utils::RPC_URL, "not a url");
        assert!(opt.network().is_err());

        // Flags are not affected by a broken environment.
        let opt = parse(&["--network", "arbitrum-sepolia"]);
        assert_eq!(opt.network().unwrap(), Network::ArbitrumSepolia);

        std::env::remove_var(utils::RPC_URL);
        std::env::remove_var(utils::EVM_NETWORK);
    }

    #[test]
    fn unknown_network_is_a_usage_error() {
        assert!(Opt::try_parse_from(["royalty-deploy", "--network", "moonbase"]).is_err());
    }
}
