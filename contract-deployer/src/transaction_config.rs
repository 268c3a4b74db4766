// Copyright 2025 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::common::U256;
use std::time::Duration;

#[derive(Clone, Debug, Default)]
pub struct TransactionConfig {
    pub max_fee_per_gas: MaxFeePerGas,
    /// Native currency sent along with the creation transaction, for payable constructors.
    pub value: U256,
    /// Fixed gas limit. `None` lets the node estimate it.
    pub gas_limit: Option<u64>,
    /// How long to wait for the creation transaction to be mined. `None` waits indefinitely.
    pub confirmation_timeout: Option<Duration>,
}

impl TransactionConfig {
    pub fn new(max_fee_per_gas: MaxFeePerGas) -> Self {
        Self {
            max_fee_per_gas,
            ..Default::default()
        }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    pub fn with_confirmation_timeout(mut self, timeout: Duration) -> Self {
        self.confirmation_timeout = Some(timeout);
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum MaxFeePerGas {
    /// Use the current market price for fee per gas. WARNING: This can result in unexpected high gas fees!
    #[default]
    Auto,
    /// Use the current market price for fee per gas, but with an upper limit.
    LimitedAuto(u128),
    /// Use no max fee per gas. WARNING: This can result in unexpected high gas fees!
    Unlimited,
    /// Use a custom max fee per gas in WEI.
    Custom(u128),
}

impl MaxFeePerGas {
    /// The fee cap to put on the transaction, given the fee the provider estimated.
    ///
    /// Returns `None` when the estimate should be used as is.
    pub fn resolve(&self, estimated: u128) -> Result<Option<u128>, u128> {
        match self {
            MaxFeePerGas::Auto | MaxFeePerGas::Unlimited => Ok(None),
            MaxFeePerGas::LimitedAuto(limit) => {
                if estimated > *limit {
                    Err(estimated)
                } else {
                    Ok(Some(estimated))
                }
            }
            MaxFeePerGas::Custom(fee) => Ok(Some(*fee)),
        }
    }
}

impl std::str::FromStr for MaxFeePerGas {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.to_ascii_lowercase();

        match s.as_str() {
            "auto" => Ok(MaxFeePerGas::Auto),
            "unlimited" => Ok(MaxFeePerGas::Unlimited),
            _ => {
                if let Some(rest) = s.strip_prefix("limited-auto:") {
                    rest.parse::<u128>()
                        .map(MaxFeePerGas::LimitedAuto)
                        .map_err(|_| format!("Invalid limited-auto value: {rest}"))
                } else {
                    s.parse::<u128>()
                        .map(MaxFeePerGas::Custom)
                        .map_err(|_| format!("Invalid custom value: {s}"))
                }
            }
        }
    }
}
