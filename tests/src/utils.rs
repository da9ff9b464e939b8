use anyhow::Result;
use near_workspaces::network::Sandbox;
use near_workspaces::{sandbox, Account, Contract, Worker};
use serde_json::{json, Value};
use std::env;
use std::fs;

pub async fn setup_sandbox() -> Result<Worker<Sandbox>> {
    let mut last_err = None;
    for attempt in 1..=6 {
        match sandbox().await {
            Ok(worker) => return Ok(worker),
            Err(e) => {
                eprintln!("[setup_sandbox] Attempt {attempt}/6 failed, retrying in 5s: {e}");
                last_err = Some(e);
                tokio::time::sleep(std::time::Duration::from_secs(5)).await;
            }
        }
    }
    Err(anyhow::anyhow!(
        "Failed to set up sandbox after 6 attempts: {:?}",
        last_err
    ))
}

pub fn get_wasm_path(contract_name: &str) -> String {
    let crate_name = contract_name.replace('-', "_");
    env::var(format!("{}_WASM_PATH", crate_name.to_uppercase()))
        .unwrap_or_else(|_| format!("/code/target/near/{crate_name}/{crate_name}.wasm"))
}

pub fn read_wasm() -> Result<Vec<u8>> {
    Ok(fs::read(get_wasm_path("portfolio-nft"))?)
}

pub async fn deploy_contract(worker: &Worker<Sandbox>) -> Result<Contract> {
    let wasm = read_wasm()?;
    Ok(worker.dev_deploy(&wasm).await?)
}

/// Deploy and initialize with the contract account as the owner.
pub async fn deploy_initialized(worker: &Worker<Sandbox>) -> Result<Contract> {
    let contract = deploy_contract(worker).await?;
    contract
        .call("new")
        .args_json(json!({ "owner_id": contract.id() }))
        .transact()
        .await?
        .into_result()?;
    Ok(contract)
}

pub fn john_doe(receiver: &Account) -> Value {
    json!({
        "receiver_id": receiver.id(),
        "name": "John Doe",
        "email": "john@example.com",
        "github_username": "johndoe",
        "code_chef_username": "johnd_coder",
        "linked_in_profile": "linkedin.com/in/johndoe"
    })
}

pub async fn total_portfolios(contract: &Contract) -> Result<u64> {
    let total: String = contract.view("total_portfolios").await?.json()?;
    Ok(total.parse()?)
}
