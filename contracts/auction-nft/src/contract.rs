use super::*;

/// Initialize contract instance with no tokens. The origin becomes admin.
#[init(contract = "AuctionNft")]
fn init<S: HasStateApi>(
    ctx: &impl HasInitContext,
    state_builder: &mut StateBuilder<S>,
) -> InitResult<State<S>> {
    // Construct the initial contract state.
    let state = State::new(state_builder, ctx.init_origin());
    Ok(state)
}

/// Mint a new token with a given address as the owner.
/// Logs a `Mint` and a `TokenMetadata` event.
///
/// It rejects if:
/// - The sender is neither an admin nor a maintainer.
/// - Fails to parse parameter.
/// - The minted token ID already exists.
/// - Fails to log Mint or TokenMetadata event.
#[receive(
    contract = "AuctionNft",
    name = "mint",
    parameter = "MintParams",
    mutable,
    enable_logger
)]
fn mint<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    // Parse the parameter.
    let params: MintParams = ctx.parameter_cursor().get()?;
    let state = host.state_mut();

    ensure!(
        state.authority.has_maintainer_rights(&ctx.sender()),
        ContractError::Unauthorized
    );

    state.mint(params.token_id.clone(), params.owner)?;

    // Event for minted NFT.
    logger.log(&Cis2Event::Mint(MintEvent {
        token_id: params.token_id.clone(),
        amount: ContractTokenAmount::from(1),
        owner: params.owner,
    }))?;

    // Metadata URL for the NFT.
    logger.log(
        &Cis2Event::<ContractTokenId, ContractTokenAmount>::TokenMetadata(TokenMetadataEvent {
            token_id: params.token_id,
            metadata_url: MetadataUrl {
                url: params.metadata_url,
                hash: None,
            },
        }),
    )?;

    Ok(())
}

/// Execute a list of token transfers, in the order of the list.
///
/// Logs a `Transfer` event for each transfer in the list and invokes the
/// receive hook of every contract receiving a token.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - Any of the transfers fail to be executed, which could be if:
///     - The `token_id` does not exist.
///     - The sender is neither `from` nor an operator of `from`.
///     - The token is not owned by `from`.
/// - Fails to log event.
/// - Any of the contracts receiving a transfer choose to reject.
#[receive(
    contract = "AuctionNft",
    name = "transfer",
    parameter = "TransferParameter",
    mutable,
    enable_logger
)]
fn transfer<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    // Parse the parameter.
    let TransferParams(transfers): TransferParameter = ctx.parameter_cursor().get()?;
    // Get the sender who invoked this contract function.
    let sender = ctx.sender();

    for transfer in transfers {
        let state = host.state_mut();
        // Authenticate the sender for this transfer
        ensure!(
            transfer.from == sender || state.is_operator(&transfer.from, &sender),
            ContractError::Unauthorized
        );

        let to_address = transfer.to.address();
        // Update the contract state
        state.transfer(&transfer)?;

        // Log transfer event
        logger.log(&Cis2Event::Transfer(TransferEvent {
            token_id: transfer.token_id.clone(),
            amount: transfer.amount,
            from: transfer.from,
            to: to_address,
        }))?;

        // If the receiver is a contract, invoke its receive hook.
        if let Receiver::Contract(address, entrypoint_name) = transfer.to {
            let parameter = OnReceivingCis2Params {
                token_id: transfer.token_id,
                amount: transfer.amount,
                from: transfer.from,
                data: transfer.data,
            };

            host.invoke_contract(
                &address,
                &parameter,
                entrypoint_name.as_entrypoint_name(),
                Amount::zero(),
            )?;
        }
    }
    Ok(())
}

/// Enable or disable addresses as operators of the sender address.
/// Logs an `UpdateOperator` event.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - Fails to log event.
#[receive(
    contract = "AuctionNft",
    name = "updateOperator",
    parameter = "UpdateOperatorParams",
    mutable,
    enable_logger
)]
fn update_operator<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    // Parse the parameter.
    let UpdateOperatorParams(params) = ctx.parameter_cursor().get()?;
    // Get the sender who invoked this contract function.
    let sender = ctx.sender();

    let (state, state_builder) = host.state_and_builder();
    for param in params {
        // Update the operator in the state.
        match param.update {
            OperatorUpdate::Add => state.add_operator(&sender, &param.operator, state_builder),
            OperatorUpdate::Remove => state.remove_operator(&sender, &param.operator),
        }

        // Log the appropriate event
        logger.log(
            &Cis2Event::<ContractTokenId, ContractTokenAmount>::UpdateOperator(
                UpdateOperatorEvent {
                    owner: sender,
                    operator: param.operator,
                    update: param.update,
                },
            ),
        )?;
    }

    Ok(())
}

/// Takes a list of queries. Each query is an owner address and some address to
/// check as an operator of the owner address.
///
/// It rejects if:
/// - It fails to parse the parameter.
#[receive(
    contract = "AuctionNft",
    name = "operatorOf",
    parameter = "OperatorOfQueryParams",
    return_value = "OperatorOfQueryResponse"
)]
fn operator_of<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<OperatorOfQueryResponse> {
    // Parse the parameter.
    let params: OperatorOfQueryParams = ctx.parameter_cursor().get()?;
    let state = host.state();
    let response = params
        .queries
        .iter()
        .map(|query| state.is_operator(&query.owner, &query.address))
        .collect::<Vec<_>>();

    Ok(OperatorOfQueryResponse::from(response))
}

/// Get the balance of given token IDs and addresses.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - Any of the queried `token_id` does not exist.
#[receive(
    contract = "AuctionNft",
    name = "balanceOf",
    parameter = "ContractBalanceOfQueryParams",
    return_value = "ContractBalanceOfQueryResponse"
)]
fn balance_of<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<ContractBalanceOfQueryResponse> {
    // Parse the parameter.
    let params: ContractBalanceOfQueryParams = ctx.parameter_cursor().get()?;
    // Build the response.
    let mut response = Vec::with_capacity(params.queries.len());
    let state = host.state();
    for query in params.queries {
        // Query the state for balance.
        let amount = state.balance(&query.token_id, &query.address)?;
        response.push(amount);
    }

    Ok(ContractBalanceOfQueryResponse::from(response))
}

#[receive(
    mutable,
    contract = "AuctionNft",
    name = "updateAuthority",
    parameter = "AuthorityUpdateParams"
)]
fn update_authority<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<()> {
    let params: AuthorityUpdateParams = ctx.parameter_cursor().get()?;
    let sender = ctx.sender();
    host.state_mut().authority.handle_update(sender, params)?;
    Ok(())
}

#[receive(
    contract = "AuctionNft",
    name = "viewAuthority",
    parameter = "AuthorityViewParams",
    return_value = "Vec<Address>"
)]
fn view_authority<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Vec<Address>> {
    let params: AuthorityViewParams = ctx.parameter_cursor().get()?;
    Ok(host.state().authority.handle_view(params))
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use test_infrastructure::*;

    const ACCOUNT_0: AccountAddress = AccountAddress([0u8; 32]);
    const ADDRESS_0: Address = Address::Account(ACCOUNT_0);
    const ACCOUNT_1: AccountAddress = AccountAddress([1u8; 32]);
    const ADDRESS_1: Address = Address::Account(ACCOUNT_1);
    const ADMIN: AccountAddress = AccountAddress([9u8; 32]);
    const MARKET: ContractAddress = ContractAddress {
        index: 7,
        subindex: 0,
    };

    fn token_0() -> ContractTokenId {
        TokenIdU64(1)
    }

    fn token_1() -> ContractTokenId {
        TokenIdU64(42)
    }

    fn single_transfer(
        token_id: ContractTokenId,
        from: Address,
        to: AccountAddress,
        amount: u64,
    ) -> TransferParameter {
        TransferParams::from(vec![Transfer {
            token_id,
            from,
            to: Receiver::from_account(to),
            amount: ContractTokenAmount::from(amount),
            data: AdditionalData::empty(),
        }])
    }

    /// Test helper function which creates a contract state with `token_0`
    /// owned by `ADDRESS_0` and `token_1` owned by `ADDRESS_1`.
    fn initial_host() -> TestHost<State<TestStateApi>> {
        let mut state_builder = TestStateBuilder::new();
        let mut state = State::new(&mut state_builder, ADMIN);

        state
            .mint(token_0(), ADDRESS_0)
            .expect_report("Failed to mint token_0");
        state
            .mint(token_1(), ADDRESS_1)
            .expect_report("Failed to mint token_1");

        TestHost::new(state, state_builder)
    }

    fn balance(host: &TestHost<State<TestStateApi>>, token_id: ContractTokenId, owner: Address) -> u64 {
        host.state()
            .balance(&token_id, &owner)
            .expect_report("Token is expected to exist")
            .0
    }

    /// Test initialization succeeds.
    #[concordium_test]
    fn test_init() {
        // Setup the context
        let mut ctx = TestInitContext::empty();
        ctx.set_init_origin(ADMIN);
        let mut builder = TestStateBuilder::new();

        // Call the contract function.
        let result = init(&ctx, &mut builder);

        // Check the result
        let state = result.expect_report("Contract initialization failed");

        // Check the state
        claim_eq!(
            state.owners.iter().count(),
            0,
            "No token should be initialized"
        );
        claim!(state.authority.has_admin_rights(&Address::Account(ADMIN)));
    }

    /// Test minting, ensuring the new token is owned by the given address and
    /// the appropriate events are logged.
    #[concordium_test]
    fn test_mint() {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(ADMIN));

        let params = MintParams {
            owner: ADDRESS_0,
            token_id: token_0(),
            metadata_url: String::from("ipfs://token-0"),
        };
        let parameter_bytes = to_bytes(&params);
        ctx.set_parameter(&parameter_bytes);

        let mut logger = TestLogger::init();
        let mut state_builder = TestStateBuilder::new();
        let state = State::new(&mut state_builder, ADMIN);
        let mut host = TestHost::new(state, state_builder);

        // Call the contract function.
        let result = mint(&ctx, &mut host, &mut logger);
        claim_eq!(result, Ok(()));

        claim_eq!(balance(&host, token_0(), ADDRESS_0), 1);
        claim_eq!(balance(&host, token_0(), ADDRESS_1), 0);

        // Check the logs
        claim_eq!(logger.logs.len(), 2, "Mint and metadata should be logged");
        claim_eq!(
            logger.logs[0],
            to_bytes(&Cis2Event::Mint(MintEvent {
                owner: ADDRESS_0,
                token_id: token_0(),
                amount: ContractTokenAmount::from(1),
            }))
        );
        claim_eq!(
            logger.logs[1],
            to_bytes(
                &Cis2Event::<ContractTokenId, ContractTokenAmount>::TokenMetadata(
                    TokenMetadataEvent {
                        token_id: token_0(),
                        metadata_url: MetadataUrl {
                            url: String::from("ipfs://token-0"),
                            hash: None,
                        },
                    }
                )
            )
        );

        // Same id again
        let result = mint(&ctx, &mut host, &mut logger);
        claim_eq!(
            result,
            Err(ContractError::Custom(CustomContractError::TokenIdAlreadyExists))
        );
    }

    #[concordium_test]
    fn test_mint_unauthorized() {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(ADDRESS_0);

        let params = MintParams {
            owner: ADDRESS_0,
            token_id: token_0(),
            metadata_url: String::new(),
        };
        let parameter_bytes = to_bytes(&params);
        ctx.set_parameter(&parameter_bytes);

        let mut logger = TestLogger::init();
        let mut host = initial_host();

        let result = mint(&ctx, &mut host, &mut logger);
        claim_eq!(result, Err(ContractError::Unauthorized));
        claim!(logger.logs.is_empty());
    }

    /// Test transfer succeeds, when `from` is the sender.
    #[concordium_test]
    fn test_transfer_account() {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(ADDRESS_0);

        let parameter_bytes = to_bytes(&single_transfer(token_0(), ADDRESS_0, ACCOUNT_1, 1));
        ctx.set_parameter(&parameter_bytes);

        let mut logger = TestLogger::init();
        let mut host = initial_host();

        // Call the contract function.
        let result = self::transfer(&ctx, &mut host, &mut logger);
        claim_eq!(result, Ok(()));

        claim_eq!(balance(&host, token_0(), ADDRESS_0), 0);
        claim_eq!(balance(&host, token_0(), ADDRESS_1), 1);

        // Check the logs.
        claim_eq!(logger.logs.len(), 1, "Only one event should be logged");
        claim_eq!(
            logger.logs[0],
            to_bytes(&Cis2Event::Transfer(TransferEvent {
                from: ADDRESS_0,
                to: ADDRESS_1,
                token_id: token_0(),
                amount: ContractTokenAmount::from(1),
            })),
            "Incorrect event emitted"
        )
    }

    /// Test a zero transfer leaves ownership untouched.
    #[concordium_test]
    fn test_transfer_zero_amount() {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(ADDRESS_1);

        // ADDRESS_1 does not hold token_0, which does not matter for zero
        let parameter_bytes = to_bytes(&single_transfer(token_0(), ADDRESS_1, ACCOUNT_0, 0));
        ctx.set_parameter(&parameter_bytes);

        let mut logger = TestLogger::init();
        let mut host = initial_host();

        let result = self::transfer(&ctx, &mut host, &mut logger);
        claim_eq!(result, Ok(()));
        claim_eq!(balance(&host, token_0(), ADDRESS_0), 1);
    }

    /// Test transfer fails when `from` does not hold the token.
    #[concordium_test]
    fn test_transfer_insufficient_funds() {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(ADDRESS_1);

        let parameter_bytes = to_bytes(&single_transfer(token_0(), ADDRESS_1, ACCOUNT_0, 1));
        ctx.set_parameter(&parameter_bytes);

        let mut logger = TestLogger::init();
        let mut host = initial_host();

        let result = self::transfer(&ctx, &mut host, &mut logger);
        claim_eq!(result, Err(ContractError::InsufficientFunds));
    }

    /// Test transfer token fails, when sender is neither the owner or an
    /// operator of the owner.
    #[concordium_test]
    fn test_transfer_not_authorized() {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(ADDRESS_1);

        let parameter_bytes = to_bytes(&single_transfer(token_0(), ADDRESS_0, ACCOUNT_1, 1));
        ctx.set_parameter(&parameter_bytes);

        let mut logger = TestLogger::init();
        let mut host = initial_host();

        // Call the contract function.
        let result = self::transfer(&ctx, &mut host, &mut logger);
        // Check the result.
        let err = result.expect_err_report("Expected to fail");
        claim_eq!(
            err,
            ContractError::Unauthorized,
            "Error is expected to be Unauthorized"
        )
    }

    /// Test transfer of a token that was never minted.
    #[concordium_test]
    fn test_transfer_unknown_token() {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(ADDRESS_0);

        let parameter_bytes = to_bytes(&single_transfer(TokenIdU64(99), ADDRESS_0, ACCOUNT_1, 1));
        ctx.set_parameter(&parameter_bytes);

        let mut logger = TestLogger::init();
        let mut host = initial_host();

        let result = self::transfer(&ctx, &mut host, &mut logger);
        claim_eq!(result, Err(ContractError::InvalidTokenId));
    }

    /// Test transfer succeeds when sender is not the owner, but is an operator
    /// of the owner. This is how a marketplace contract delivers a sold token.
    #[concordium_test]
    fn test_operator_transfer() {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Contract(MARKET));

        let parameter_bytes = to_bytes(&single_transfer(token_0(), ADDRESS_0, ACCOUNT_1, 1));
        ctx.set_parameter(&parameter_bytes);

        let mut logger = TestLogger::init();
        let mut host = initial_host();
        {
            let (state, state_builder) = host.state_and_builder();
            state.add_operator(&ADDRESS_0, &Address::Contract(MARKET), state_builder);
        }

        // Call the contract function.
        let result = self::transfer(&ctx, &mut host, &mut logger);
        claim_eq!(result, Ok(()));

        claim_eq!(balance(&host, token_0(), ADDRESS_0), 0);
        claim_eq!(balance(&host, token_0(), ADDRESS_1), 1);

        // The operator of ADDRESS_0 has no say over tokens of ADDRESS_1
        let parameter_bytes = to_bytes(&single_transfer(token_1(), ADDRESS_1, ACCOUNT_0, 1));
        ctx.set_parameter(&parameter_bytes);
        let result = self::transfer(&ctx, &mut host, &mut logger);
        claim_eq!(result, Err(ContractError::Unauthorized));
    }

    /// Test adding an operator succeeds and the appropriate event is logged.
    #[concordium_test]
    fn test_add_operator() {
        // Setup the context
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(ADDRESS_0);

        // and parameter.
        let update = UpdateOperator {
            update: OperatorUpdate::Add,
            operator: Address::Contract(MARKET),
        };
        let parameter = UpdateOperatorParams(vec![update]);
        let parameter_bytes = to_bytes(&parameter);
        ctx.set_parameter(&parameter_bytes);

        let mut logger = TestLogger::init();
        let mut host = initial_host();

        // Call the contract function.
        let result = update_operator(&ctx, &mut host, &mut logger);
        claim_eq!(result, Ok(()));

        // Check the state.
        claim!(
            host.state()
                .is_operator(&ADDRESS_0, &Address::Contract(MARKET)),
            "Market should be an operator of ADDRESS_0"
        );

        // Check the logs.
        claim_eq!(logger.logs.len(), 1, "One event should be logged");
        claim_eq!(
            logger.logs[0],
            to_bytes(
                &Cis2Event::<ContractTokenId, ContractTokenAmount>::UpdateOperator(
                    UpdateOperatorEvent {
                        owner: ADDRESS_0,
                        operator: Address::Contract(MARKET),
                        update: OperatorUpdate::Add,
                    }
                )
            ),
            "Incorrect event emitted"
        );

        // Query through operatorOf
        let query = OperatorOfQueryParams {
            queries: vec![
                OperatorOfQuery {
                    owner: ADDRESS_0,
                    address: Address::Contract(MARKET),
                },
                OperatorOfQuery {
                    owner: ADDRESS_1,
                    address: Address::Contract(MARKET),
                },
            ],
        };
        let parameter_bytes = to_bytes(&query);
        ctx.set_parameter(&parameter_bytes);
        let result = operator_of(&ctx, &host).expect_report("operatorOf should pass");
        claim_eq!(result.0, vec![true, false]);

        // and removal
        let parameter = UpdateOperatorParams(vec![UpdateOperator {
            update: OperatorUpdate::Remove,
            operator: Address::Contract(MARKET),
        }]);
        let parameter_bytes = to_bytes(&parameter);
        ctx.set_parameter(&parameter_bytes);
        let result = update_operator(&ctx, &mut host, &mut logger);
        claim_eq!(result, Ok(()));
        claim!(!host
            .state()
            .is_operator(&ADDRESS_0, &Address::Contract(MARKET)));
    }

    #[concordium_test]
    fn test_balance_of() {
        let host = initial_host();

        let query = ContractBalanceOfQueryParams {
            queries: vec![
                BalanceOfQuery {
                    token_id: token_0(),
                    address: ADDRESS_0,
                },
                BalanceOfQuery {
                    token_id: token_1(),
                    address: ADDRESS_0,
                },
            ],
        };
        let parameter_bytes = to_bytes(&query);
        let mut ctx = TestReceiveContext::empty();
        ctx.set_parameter(&parameter_bytes);

        let result = balance_of(&ctx, &host).expect_report("balanceOf should pass");
        claim_eq!(
            result.0,
            vec![ContractTokenAmount::from(1), ContractTokenAmount::from(0)]
        );

        let query = ContractBalanceOfQueryParams {
            queries: vec![BalanceOfQuery {
                token_id: TokenIdU64(99),
                address: ADDRESS_0,
            }],
        };
        let parameter_bytes = to_bytes(&query);
        ctx.set_parameter(&parameter_bytes);
        claim_eq!(
            balance_of(&ctx, &host),
            Err(ContractError::InvalidTokenId)
        );
    }
}
