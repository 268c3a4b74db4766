// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

#[macro_use]
extern crate tracing;

mod exit_code;
mod logging;
mod opt;

use crate::exit_code::exit_code;
use crate::logging::init_logging;
use crate::opt::Opt;
use clap::Parser;
use color_eyre::eyre::Context;
use color_eyre::Result;
use contract_deployer::{deploy_contract, Deployment, DEFAULT_CONTRACT_NAME};

#[tokio::main]
async fn main() {
    if let Err(err) = color_eyre::install() {
        eprintln!("Failed to install error reporting: {err:?}");
    }

    let opt = Opt::parse();

    let log_guard = match init_logging(opt.log_format, &opt.log_output_dest) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("Failed to initialize logging: {err:?}");
            None
        }
    };

    let result = run(&opt).await;
    if let Err(err) = &result {
        error!("Deployment failed: {err:?}");
        eprintln!("Error: {err:?}");
    }
    let code = exit_code(&result);

    // `process::exit` skips destructors, flush the log writer first.
    drop(log_guard);
    std::process::exit(code);
}

async fn run(opt: &Opt) -> Result<Deployment> {
    if opt.contract == DEFAULT_CONTRACT_NAME {
        println!("Deploying Automated Royalty Distribution System...");
    } else {
        println!("Deploying {}...", opt.contract);
    }

    let config = opt.deploy_config()?;
    info!(
        "Deploying {} to {} with {:?}",
        config.contract_name, config.network, config.transaction_config
    );

    let deployment = deploy_contract(&config)
        .await
        .wrap_err_with(|| format!("Failed to deploy {}", config.contract_name))?;

    println!(
        "{} deployed to: {}",
        deployment.contract_name, deployment.address
    );
    info!(
        "Deployment of {} confirmed: tx_hash {:?}, block {:?}, gas used {}, deployer {}",
        deployment.contract_name,
        deployment.tx_hash,
        deployment.block_number,
        deployment.gas_used,
        deployment.deployer
    );

    Ok(deployment)
}
