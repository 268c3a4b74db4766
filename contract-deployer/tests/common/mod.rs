#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// Creation code that deploys a single `STOP` byte as runtime code.
pub const MINIMAL_BYTECODE: &str = "0x6001600c60003960016000f300";

/// Creation code that reverts straight away.
pub const REVERTING_BYTECODE: &str = "0x60006000fd";

pub const PAYABLE_CONSTRUCTOR_ABI: &str =
    r#"[{ "inputs": [], "stateMutability": "payable", "type": "constructor" }]"#;

/// Write a Hardhat style artifact to `<dir>/contracts/<name>.sol/<name>.json`.
pub fn write_hardhat_artifact(dir: &Path, name: &str, abi: &str, bytecode: &str) -> PathBuf {
    let path = dir
        .join("contracts")
        .join(format!("{name}.sol"))
        .join(format!("{name}.json"));
    std::fs::create_dir_all(path.parent().expect("artifact has a parent dir"))
        .expect("create artifact dir");
    std::fs::write(
        &path,
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
        ),
    )
    .expect("write artifact");
    path
}
