//! The off-chain minter driving a sandbox contract over JSON-RPC.

use crate::utils::{deploy_initialized, read_wasm, setup_sandbox};
use anyhow::Result;
use near_gas::NearGas;
use near_workspaces::network::Sandbox;
use near_workspaces::{Account, Worker};
use portfolio_minter::rpc::RpcClient;
use portfolio_minter::signer::signer_from_secret;
use portfolio_minter::store::deploy_contract;
use portfolio_minter::{
    ContractError, ContractStore, Error, FormController, PortfolioStore, PortfolioViewer,
};
use portfolio_types::Platform;

/// Store that signs as `signer` and targets `contract_id`.
fn contract_store(
    worker: &Worker<Sandbox>,
    signer: &Account,
    contract_id: &str,
) -> Result<ContractStore> {
    let rpc = RpcClient::new(&worker.rpc_addr(), &worker.rpc_addr());
    let signer = signer_from_secret(signer.id().as_str(), &signer.secret_key().to_string())?;
    Ok(ContractStore::new(
        rpc,
        signer,
        contract_id.parse()?,
        NearGas::from_tgas(30),
    ))
}

#[tokio::test]
async fn test_form_mints_through_contract_store() -> Result<()> {
    let worker = setup_sandbox().await?;
    let contract = deploy_initialized(&worker).await?;
    let bob = worker.dev_create_account().await?;
    worker.fast_forward(3).await?;

    let store = contract_store(&worker, contract.as_account(), contract.id().as_str())?;
    assert_eq!(store.owner().await?, contract.id().as_str());

    let mut form = FormController::new(store);
    form.connect_wallet(bob.id().as_str());
    form.set_name("John Doe");
    form.set_email("john@example.com");
    form.set_handle(Platform::Github, "johndoe")?;
    form.set_handle(Platform::LinkedIn, "linkedin.com/in/johndoe")?;
    let expected = form.form().to_mint_args(bob.id().as_str());

    assert_eq!(form.mint().await?, 1);
    assert!(form.form().name.is_empty(), "form resets after a mint");
    worker.fast_forward(3).await?;

    let mut viewer = PortfolioViewer::new();
    assert_eq!(viewer.refresh_total(form.store()).await?, 1);
    let record = viewer
        .load(form.store())
        .await?
        .cloned()
        .expect("record 1 should load");
    assert!(expected.matches(&record), "{record:?}");
    assert_eq!(record.token_id, 1);
    assert_eq!(record.owner_id, bob.id().as_str());
    assert_eq!(record.name, "John Doe");
    assert_eq!(record.github_username, "johndoe");
    assert_eq!(record.code_chef_username, "");
    assert_eq!(record.linked_in_profile, "linkedin.com/in/johndoe");

    let err = form.store().get_portfolio(2).await.unwrap_err();
    assert!(matches!(err, Error::Contract(ContractError::NotFound)), "{err:?}");

    Ok(())
}

#[tokio::test]
async fn test_non_owner_store_is_unauthorized() -> Result<()> {
    let worker = setup_sandbox().await?;
    let contract = deploy_initialized(&worker).await?;
    let eve = worker.dev_create_account().await?;
    worker.fast_forward(3).await?;

    let mut form = FormController::new(contract_store(&worker, &eve, contract.id().as_str())?);
    form.connect_wallet(eve.id().as_str());
    form.set_name("Eve");
    form.set_email("eve@example.com");

    let err = form.mint().await.unwrap_err();
    assert!(
        matches!(err, Error::Contract(ContractError::Unauthorized)),
        "{err:?}"
    );
    assert_eq!(form.form().name, "Eve", "failed mint keeps the form");
    assert_eq!(form.store().total_portfolios().await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_deploy_makes_signer_the_owner() -> Result<()> {
    let worker = setup_sandbox().await?;
    let deployer = worker.dev_create_account().await?;
    worker.fast_forward(3).await?;

    let rpc = RpcClient::new(&worker.rpc_addr(), &worker.rpc_addr());
    let signer = signer_from_secret(deployer.id().as_str(), &deployer.secret_key().to_string())?;
    let contract_id = deploy_contract(&rpc, &signer, read_wasm()?, NearGas::from_tgas(100)).await?;
    assert_eq!(contract_id.as_str(), deployer.id().as_str());
    worker.fast_forward(3).await?;

    let owner: String = worker.view(deployer.id(), "get_owner").await?.json()?;
    assert_eq!(owner, deployer.id().as_str());

    let total: String = worker.view(deployer.id(), "total_portfolios").await?.json()?;
    assert_eq!(total, "0");

    Ok(())
}
