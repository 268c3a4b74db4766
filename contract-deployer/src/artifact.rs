// Copyright 2025 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

//! Locating and loading compiled contracts.
//!
//! Both the Hardhat layout (`artifacts/contracts/<Name>.sol/<Name>.json`, bytecode as a hex
//! string) and the Foundry layout (`out/<Name>.sol/<Name>.json`, bytecode under `object`)
//! are understood.

use crate::common::Bytes;
use alloy::dyn_abi::{DynSolType, DynSolValue, JsonAbiExt, Specifier};
use alloy::json_abi::{JsonAbi, StateMutability};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Hardhat keeps compiler inputs and outputs here, they are not contract artifacts.
const BUILD_INFO_DIR: &str = "build-info";

/// Solidity leaves `__$<hash>$__` (or `__<LibName>___` for older compilers) in the bytecode
/// wherever a library address still has to be linked in.
const LINK_PLACEHOLDER_MARKER: &str = "__";

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("No artifact for contract {name} found under {dir}")]
    ArtifactNotFound { name: String, dir: PathBuf },
    #[error("Found several artifacts for contract {name}: {candidates:?}. Pass the artifact path explicitly")]
    AmbiguousArtifact {
        name: String,
        candidates: Vec<PathBuf>,
    },
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse artifact {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid bytecode in artifact {path}: {reason}")]
    InvalidBytecode { path: PathBuf, reason: String },
    #[error("Contract {0} has no bytecode, it is probably abstract or an interface")]
    NotDeployable(String),
    #[error("Contract {0} references libraries that are not linked yet")]
    UnlinkedLibraries(String),
    #[error("Constructor of {contract} takes {expected} argument(s), got {got}")]
    ConstructorArgCount {
        contract: String,
        expected: usize,
        got: usize,
    },
    #[error("Constructor argument #{index} is not a valid {ty}: {reason}")]
    ConstructorArg {
        index: usize,
        ty: String,
        reason: String,
    },
    #[error("Failed to ABI-encode constructor arguments: {0}")]
    ConstructorEncoding(String),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArtifact {
    contract_name: Option<String>,
    source_name: Option<String>,
    abi: JsonAbi,
    bytecode: RawBytecode,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    /// Hardhat
    Hex(String),
    /// Foundry
    Object { object: String },
}

impl RawBytecode {
    fn as_hex(&self) -> &str {
        match self {
            RawBytecode::Hex(hex) => hex,
            RawBytecode::Object { object } => object,
        }
    }
}

/// The compiled form of a contract: what is needed to deploy it and talk to it.
#[derive(Clone, Debug)]
pub struct ContractArtifact {
    name: String,
    source_name: Option<String>,
    abi: JsonAbi,
    bytecode: Bytes,
    path: PathBuf,
}

impl ContractArtifact {
    /// Find the artifact of contract `name` under `artifacts_dir`.
    ///
    /// The conventional Hardhat and Foundry locations are checked first. Failing that, the
    /// whole tree is searched for a `<name>.json`, which must be unique.
    pub fn resolve(artifacts_dir: &Path, name: &str) -> Result<Self, Error> {
        let file_name = format!("{name}.json");
        let source_dir = format!("{name}.sol");

        let conventional = [
            artifacts_dir
                .join("contracts")
                .join(&source_dir)
                .join(&file_name),
            artifacts_dir.join(&source_dir).join(&file_name),
        ];
        if let Some(path) = conventional.iter().find(|path| path.is_file()) {
            debug!("Using artifact at conventional location {path:?}");
            return Self::from_file(path);
        }

        if !artifacts_dir.is_dir() {
            return Err(Error::ArtifactNotFound {
                name: name.to_string(),
                dir: artifacts_dir.to_path_buf(),
            });
        }

        let mut candidates = vec![];
        find_files_named(artifacts_dir, &file_name, &mut candidates)?;
        candidates.sort();

        match candidates.len() {
            0 => Err(Error::ArtifactNotFound {
                name: name.to_string(),
                dir: artifacts_dir.to_path_buf(),
            }),
            1 => Self::from_file(&candidates[0]),
            _ => Err(Error::AmbiguousArtifact {
                name: name.to_string(),
                candidates,
            }),
        }
    }

    /// Load a Hardhat or Foundry artifact file.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: RawArtifact = serde_json::from_str(&contents).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })?;

        let name = raw.contract_name.clone().unwrap_or_else(|| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default()
        });

        let hex = raw.bytecode.as_hex().trim();
        let hex = hex.strip_prefix("0x").unwrap_or(hex);
        if hex.is_empty() {
            return Err(Error::NotDeployable(name));
        }
        if hex.contains(LINK_PLACEHOLDER_MARKER) {
            return Err(Error::UnlinkedLibraries(name));
        }
        let bytecode = alloy::hex::decode(hex).map_err(|err| Error::InvalidBytecode {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;

        debug!(
            "Loaded artifact for {name} from {path:?} ({} bytes of creation code)",
            bytecode.len()
        );

        Ok(Self {
            name,
            source_name: raw.source_name,
            abi: raw.abi,
            bytecode: bytecode.into(),
            path: path.to_path_buf(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The Solidity source the contract was compiled from, when the artifact records it.
    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }

    pub fn abi(&self) -> &JsonAbi {
        &self.abi
    }

    /// Creation bytecode, without constructor arguments.
    pub fn bytecode(&self) -> &Bytes {
        &self.bytecode
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_constructor_payable(&self) -> bool {
        self.abi
            .constructor()
            .is_some_and(|c| c.state_mutability == StateMutability::Payable)
    }

    /// Coerce `args` to the constructor's parameter types and ABI-encode them.
    ///
    /// Arguments use the usual textual forms: `0x…` addresses and bytes, decimal or hex
    /// integers, `true`/`false`, `[a,b]` arrays and `(a,b)` tuples.
    pub fn encode_constructor_args(&self, args: &[String]) -> Result<Bytes, Error> {
        let Some(constructor) = self.abi.constructor() else {
            if args.is_empty() {
                return Ok(Bytes::new());
            }
            return Err(Error::ConstructorArgCount {
                contract: self.name.clone(),
                expected: 0,
                got: args.len(),
            });
        };

        if constructor.inputs.len() != args.len() {
            return Err(Error::ConstructorArgCount {
                contract: self.name.clone(),
                expected: constructor.inputs.len(),
                got: args.len(),
            });
        }

        let values = constructor
            .inputs
            .iter()
            .zip(args)
            .enumerate()
            .map(|(index, (param, arg))| {
                let to_arg_error = |reason: String| Error::ConstructorArg {
                    index,
                    ty: param.ty.clone(),
                    reason,
                };
                let ty: DynSolType = param.resolve().map_err(|err| to_arg_error(err.to_string()))?;
                ty.coerce_str(arg)
                    .map_err(|err| to_arg_error(err.to_string()))
            })
            .collect::<Result<Vec<DynSolValue>, Error>>()?;

        let encoded = constructor
            .abi_encode_input(&values)
            .map_err(|err| Error::ConstructorEncoding(err.to_string()))?;

        Ok(encoded.into())
    }
}

fn find_files_named(dir: &Path, file_name: &str, found: &mut Vec<PathBuf>) -> Result<(), Error> {
    let entries = std::fs::read_dir(dir).map_err(|source| Error::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| Error::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        if path.is_dir() {
            if path.file_name().is_some_and(|n| n == BUILD_INFO_DIR) {
                continue;
            }
            find_files_named(&path, file_name, found)?;
        } else if path.file_name().is_some_and(|n| n == file_name) {
            found.push(path);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    // PUSH1 1, PUSH1 12, PUSH1 0, CODECOPY, PUSH1 1, PUSH1 0, RETURN, followed by a STOP runtime
    const MINIMAL_BYTECODE: &str = "0x6001600c60003960016000f300";

    const CONSTRUCTOR_ABI: &str = r#"[
        {
            "inputs": [
                { "internalType": "address", "name": "treasury", "type": "address" },
                { "internalType": "uint96", "name": "feeBps", "type": "uint96" }
            ],
            "stateMutability": "nonpayable",
            "type": "constructor"
        }
    ]"#;

    fn hardhat_artifact(name: &str, abi: &str, bytecode: &str) -> String {
        format!(
            r#"{{
                "_format": "hh-sol-artifact-1",
                "contractName": "{name}",
                "sourceName": "contracts/{name}.sol",
                "abi": {abi},
                "bytecode": "{bytecode}",
                "deployedBytecode": "0x00",
                "linkReferences": {{}},
                "deployedLinkReferences": {{}}
            }}"#
        )
    }

    fn write(dir: &Path, relative: &str, contents: &str) -> PathBuf {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn resolves_hardhat_layout() {
        let dir = TempDir::new().unwrap();
        let path = write(
            dir.path(),
            "contracts/RoyaltyDistribution.sol/RoyaltyDistribution.json",
            &hardhat_artifact("RoyaltyDistribution", "[]", MINIMAL_BYTECODE),
        );

        let artifact = ContractArtifact::resolve(dir.path(), "RoyaltyDistribution").unwrap();

        assert_eq!(artifact.name(), "RoyaltyDistribution");
        assert_eq!(
            artifact.source_name(),
            Some("contracts/RoyaltyDistribution.sol")
        );
        assert_eq!(artifact.path(), path);
        assert_eq!(artifact.bytecode().len(), 13);
    }

    #[test]
    fn resolves_foundry_layout() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "RoyaltyDistribution.sol/RoyaltyDistribution.json",
            &format!(r#"{{ "abi": [], "bytecode": {{ "object": "{MINIMAL_BYTECODE}" }} }}"#),
        );

        let artifact = ContractArtifact::resolve(dir.path(), "RoyaltyDistribution").unwrap();

        // Foundry artifacts carry no contract name, it comes from the file name.
        assert_eq!(artifact.name(), "RoyaltyDistribution");
        assert_eq!(artifact.source_name(), None);
    }

    #[test]
    fn searches_tree_when_not_in_conventional_location() {
        let dir = TempDir::new().unwrap();
        let expected = write(
            dir.path(),
            "contracts/royalties/Distribution.sol/RoyaltyDistribution.json",
            &hardhat_artifact("RoyaltyDistribution", "[]", MINIMAL_BYTECODE),
        );
        write(
            dir.path(),
            "contracts/royalties/Distribution.sol/RoyaltyDistribution.dbg.json",
            r#"{ "_format": "hh-sol-dbg-1", "buildInfo": "../../../build-info/abc.json" }"#,
        );
        write(
            dir.path(),
            "build-info/RoyaltyDistribution.json",
            r#"{ "not": "an artifact" }"#,
        );

        let artifact = ContractArtifact::resolve(dir.path(), "RoyaltyDistribution").unwrap();

        assert_eq!(artifact.path(), expected);
    }

    #[test]
    fn missing_artifact_is_not_found() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "contracts/Other.sol/Other.json",
            &hardhat_artifact("Other", "[]", MINIMAL_BYTECODE),
        );

        let err = ContractArtifact::resolve(dir.path(), "RoyaltyDistribution").unwrap_err();
        assert!(matches!(err, Error::ArtifactNotFound { name, .. } if name == "RoyaltyDistribution"));

        let err = ContractArtifact::resolve(&dir.path().join("nope"), "Other").unwrap_err();
        assert!(matches!(err, Error::ArtifactNotFound { .. }));
    }

    #[test]
    fn duplicate_names_are_ambiguous() {
        let dir = TempDir::new().unwrap();
        for source in ["a/One.sol", "b/Two.sol"] {
            write(
                dir.path(),
                &format!("contracts/{source}/Splitter.json"),
                &hardhat_artifact("Splitter", "[]", MINIMAL_BYTECODE),
            );
        }

        let err = ContractArtifact::resolve(dir.path(), "Splitter").unwrap_err();
        match err {
            Error::AmbiguousArtifact { candidates, .. } => assert_eq!(candidates.len(), 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn interface_without_bytecode_is_not_deployable() {
        let dir = TempDir::new().unwrap();
        let path = write(
            dir.path(),
            "IRoyalty.json",
            &hardhat_artifact("IRoyalty", "[]", "0x"),
        );

        let err = ContractArtifact::from_file(&path).unwrap_err();
        assert!(matches!(err, Error::NotDeployable(name) if name == "IRoyalty"));
    }

    #[test]
    fn unlinked_library_placeholder_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(
            dir.path(),
            "Linked.json",
            &hardhat_artifact(
                "Linked",
                "[]",
                "0x6080__$2b9e8e1d0c2f8d4e1a4b7f9d6a3c5e0b12$__6000",
            ),
        );

        let err = ContractArtifact::from_file(&path).unwrap_err();
        assert!(matches!(err, Error::UnlinkedLibraries(name) if name == "Linked"));
    }

    #[test]
    fn malformed_artifacts_are_reported() {
        let dir = TempDir::new().unwrap();
        let bad_json = write(dir.path(), "Broken.json", "{ \"abi\": ");
        assert!(matches!(
            ContractArtifact::from_file(&bad_json).unwrap_err(),
            Error::Json { .. }
        ));

        let bad_hex = write(
            dir.path(),
            "BadHex.json",
            &hardhat_artifact("BadHex", "[]", "0x60zz"),
        );
        assert!(matches!(
            ContractArtifact::from_file(&bad_hex).unwrap_err(),
            Error::InvalidBytecode { .. }
        ));
    }

    #[test]
    fn constructor_args_are_coerced_and_encoded() {
        let dir = TempDir::new().unwrap();
        let path = write(
            dir.path(),
            "Royalty.json",
            &hardhat_artifact("Royalty", CONSTRUCTOR_ABI, MINIMAL_BYTECODE),
        );
        let artifact = ContractArtifact::from_file(&path).unwrap();
        assert!(!artifact.is_constructor_payable());

        let encoded = artifact
            .encode_constructor_args(&[
                "0x00000000000000000000000000000000000000aa".to_string(),
                "500".to_string(),
            ])
            .unwrap();

        assert_eq!(encoded.len(), 64);
        assert_eq!(encoded[31], 0xaa);
        assert_eq!(&encoded[62..64], &[0x01, 0xf4]);
    }

    #[test]
    fn constructor_arg_mismatches_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(
            dir.path(),
            "Royalty.json",
            &hardhat_artifact("Royalty", CONSTRUCTOR_ABI, MINIMAL_BYTECODE),
        );
        let artifact = ContractArtifact::from_file(&path).unwrap();

        let err = artifact
            .encode_constructor_args(&["0x00000000000000000000000000000000000000aa".to_string()])
            .unwrap_err();
        assert!(matches!(
            err,
            Error::ConstructorArgCount {
                expected: 2,
                got: 1,
                ..
            }
        ));

        let err = artifact
            .encode_constructor_args(&["not-an-address".to_string(), "500".to_string()])
            .unwrap_err();
        assert!(matches!(err, Error::ConstructorArg { index: 0, ty, .. } if ty == "address"));
    }

    #[test]
    fn no_constructor_means_no_args() {
        let dir = TempDir::new().unwrap();
        let path = write(
            dir.path(),
            "Plain.json",
            &hardhat_artifact("Plain", "[]", MINIMAL_BYTECODE),
        );
        let artifact = ContractArtifact::from_file(&path).unwrap();

        assert!(artifact.encode_constructor_args(&[]).unwrap().is_empty());
        assert!(matches!(
            artifact.encode_constructor_args(&["1".to_string()]),
            Err(Error::ConstructorArgCount { expected: 0, .. })
        ));
    }
}
