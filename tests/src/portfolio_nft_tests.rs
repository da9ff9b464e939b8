use crate::utils::{deploy_contract, deploy_initialized, john_doe, setup_sandbox, total_portfolios};
use anyhow::Result;
use serde_json::{json, Value};

#[tokio::test]
async fn test_john_doe_mint_and_read_back() -> Result<()> {
    let worker = setup_sandbox().await?;
    let contract = deploy_initialized(&worker).await?;
    let bob = worker.dev_create_account().await?;

    assert_eq!(total_portfolios(&contract).await?, 0);

    let outcome = contract
        .call("mint_portfolio")
        .args_json(john_doe(&bob))
        .transact()
        .await?;
    assert!(outcome.is_success(), "mint failed: {:#?}", outcome);
    let token_id: String = outcome.clone().json()?;
    assert_eq!(token_id, "1");

    let logs = outcome.logs().join("\n");
    assert!(logs.contains("EVENT_JSON"));
    assert!(logs.contains("portfolio_minted"));

    assert_eq!(total_portfolios(&contract).await?, 1);

    let record: Value = contract
        .view("get_portfolio")
        .args_json(json!({ "token_id": "1" }))
        .await?
        .json()?;
    assert_eq!(record["token_id"], "1");
    assert_eq!(record["owner_id"], bob.id().as_str());
    assert_eq!(record["name"], "John Doe");
    assert_eq!(record["email"], "john@example.com");
    assert_eq!(record["github_username"], "johndoe");
    assert_eq!(record["code_chef_username"], "johnd_coder");
    assert_eq!(record["linked_in_profile"], "linkedin.com/in/johndoe");

    Ok(())
}

#[tokio::test]
async fn test_non_owner_cannot_mint() -> Result<()> {
    let worker = setup_sandbox().await?;
    let contract = deploy_initialized(&worker).await?;
    let eve = worker.dev_create_account().await?;

    let outcome = eve
        .call(contract.id(), "mint_portfolio")
        .args_json(john_doe(&eve))
        .transact()
        .await?;
    assert!(outcome.is_failure());
    let failure = format!("{:?}", outcome.into_result().unwrap_err());
    assert!(failure.contains("Not the Owner"), "unexpected failure: {failure}");

    assert_eq!(total_portfolios(&contract).await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_get_portfolio_out_of_range() -> Result<()> {
    let worker = setup_sandbox().await?;
    let contract = deploy_initialized(&worker).await?;
    let bob = worker.dev_create_account().await?;

    contract
        .call("mint_portfolio")
        .args_json(john_doe(&bob))
        .transact()
        .await?
        .into_result()?;

    for token_id in ["0", "2"] {
        let err = contract
            .view("get_portfolio")
            .args_json(json!({ "token_id": token_id }))
            .await
            .unwrap_err();
        let message = format!("{err:?}");
        assert!(
            message.contains("Portfolio not found"),
            "token {token_id}: {message}"
        );
    }
    Ok(())
}

#[tokio::test]
async fn test_optional_handles_and_owner_enumeration() -> Result<()> {
    let worker = setup_sandbox().await?;
    let contract = deploy_initialized(&worker).await?;
    let bob = worker.dev_create_account().await?;
    let carol = worker.dev_create_account().await?;

    for (receiver, name) in [(&bob, "Bob One"), (&carol, "Carol"), (&bob, "Bob Two")] {
        contract
            .call("mint_portfolio")
            .args_json(json!({
                "receiver_id": receiver.id(),
                "name": name,
                "email": "someone@example.com"
            }))
            .transact()
            .await?
            .into_result()?;
    }

    let record: Value = contract
        .view("get_portfolio")
        .args_json(json!({ "token_id": "2" }))
        .await?
        .json()?;
    assert_eq!(record["github_username"], "");
    assert_eq!(record["code_chef_username"], "");
    assert_eq!(record["linked_in_profile"], "");

    let owner: String = contract.view("get_owner").await?.json()?;
    assert_eq!(owner, contract.id().as_str());

    let supply: String = contract
        .view("portfolio_supply_for_owner")
        .args_json(json!({ "account_id": bob.id() }))
        .await?
        .json()?;
    assert_eq!(supply, "2");

    let bobs: Vec<Value> = contract
        .view("portfolios_for_owner")
        .args_json(json!({ "account_id": bob.id(), "from_index": "1", "limit": 10 }))
        .await?
        .json()?;
    assert_eq!(bobs.len(), 1);
    assert_eq!(bobs[0]["name"], "Bob Two");
    assert_eq!(bobs[0]["token_id"], "3");

    Ok(())
}

#[tokio::test]
async fn test_uninitialized_contract_rejects_calls() -> Result<()> {
    let worker = setup_sandbox().await?;
    let contract = deploy_contract(&worker).await?;

    let result = contract.view("total_portfolios").await;
    assert!(result.is_err(), "views must fail before `new`");
    Ok(())
}
