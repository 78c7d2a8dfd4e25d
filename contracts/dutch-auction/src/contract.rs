use commons::{
    AuthorityUpdateParams, AuthorityViewParams, ContractReadError, ContractTokenAmount,
    CustomContractError, HostCis2Ext, HostPriceOracleExt,
};
use concordium_std::*;

use crate::events::AuctionEvents;
use crate::external::*;
use crate::pricing;
use crate::state::{Auction, State};

/// Initialize the registry with no auctions and the given price oracle.
#[init(contract = "DutchAuction", parameter = "InitParams")]
fn contract_init<S: HasStateApi>(
    ctx: &impl HasInitContext,
    state_builder: &mut StateBuilder<S>,
) -> InitResult<State<S>> {
    let params = InitParams::deserial(&mut ctx.parameter_cursor())?;
    Ok(State::new(state_builder, params.oracle, ctx.init_origin()))
}

/// List a CIS-2 token for a Dutch auction starting now.
///
/// The sender must hold the token and must have added this contract as an
/// operator on the token contract beforehand. Returns the new auction id.
///
/// It rejects if:
/// - Fails to parse `CreateAuctionParams` parameter;
/// - Sender is a contract;
/// - End price is above the start price, or duration is not a positive number
///   of whole seconds;
/// - Sender does not hold the token;
/// - This contract is not an operator of the sender;
/// - Token is already in an active auction;
/// - Fails to log `Created` event.
#[receive(
    mutable,
    contract = "DutchAuction",
    name = "createAuction",
    parameter = "CreateAuctionParams",
    return_value = "AuctionId",
    enable_logger
)]
fn contract_create_auction<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ReceiveResult<AuctionId> {
    let params = CreateAuctionParams::deserial(&mut ctx.parameter_cursor())?;

    let seller = if let Address::Account(seller) = ctx.sender() {
        seller
    } else {
        bail!(CustomContractError::OnlyAccountAddress.into());
    };

    params.validate()?;

    let balance = host
        .cis2_balance_of(
            &params.nft_contract,
            params.token_id.clone(),
            Address::Account(seller),
        )
        .map_err(handle_read_error)?;
    ensure!(
        balance == ContractTokenAmount::from(1),
        CustomContractError::NotTokenOwner.into()
    );

    let approved = host
        .cis2_operator_of(
            &params.nft_contract,
            Address::Account(seller),
            Address::Contract(ctx.self_address()),
        )
        .map_err(handle_read_error)?;
    ensure!(approved, CustomContractError::NotApproved.into());

    let auction = host
        .state_mut()
        .create(seller, params, ctx.metadata().slot_time())?;

    logger.log(&AuctionEvents::created(&auction))?;

    Ok(auction.id)
}

/// Current USD price of an active auction.
///
/// It rejects if:
/// - Fails to parse `AuctionId` parameter;
/// - Auction does not exist or is no longer active.
#[receive(
    contract = "DutchAuction",
    name = "getCurrentPriceInUsd",
    parameter = "AuctionId",
    return_value = "u64"
)]
fn contract_get_current_price_in_usd<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<u64> {
    let auction_id = AuctionId::deserial(&mut ctx.parameter_cursor())?;
    let auction = host.state().active_auction(auction_id)?;
    Ok(auction.current_price_usd(ctx.metadata().slot_time()))
}

/// Current CCD price of an active auction, converted at the latest oracle round.
///
/// It rejects if:
/// - Fails to parse `AuctionId` parameter;
/// - Auction does not exist or is no longer active;
/// - Oracle call fails or the round is stale or empty.
#[receive(
    contract = "DutchAuction",
    name = "getCurrentPrice",
    parameter = "AuctionId",
    return_value = "Amount"
)]
fn contract_get_current_price<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<Amount> {
    let auction_id = AuctionId::deserial(&mut ctx.parameter_cursor())?;
    let auction = host.state().active_auction(auction_id)?;
    let now = ctx.metadata().slot_time();
    native_price(host, auction.current_price_usd(now), now)
}

/// Buy the token of an active auction.
///
/// The attached amount must cover the current CCD price and is forwarded to
/// the seller in full. The auction is closed before the token and the payment
/// move, so a second purchase of the same auction fails.
///
/// It rejects if:
/// - Fails to parse `AuctionId` parameter;
/// - Sender is a contract or the seller;
/// - Auction does not exist or is no longer active;
/// - Price can not be determined or the attached amount is below it;
/// - Token transfer or payment fails;
/// - Fails to log `Sold` event.
#[receive(
    mutable,
    payable,
    contract = "DutchAuction",
    name = "buy",
    parameter = "AuctionId",
    enable_logger
)]
fn contract_buy<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    amount: Amount,
    logger: &mut impl HasLogger,
) -> ReceiveResult<()> {
    let auction_id = AuctionId::deserial(&mut ctx.parameter_cursor())?;

    let buyer = if let Address::Account(buyer) = ctx.sender() {
        buyer
    } else {
        bail!(CustomContractError::OnlyAccountAddress.into());
    };

    let auction = host.state().active_auction(auction_id)?;
    ensure_ne!(buyer, auction.seller, CustomContractError::OwnerForbidden.into());

    let now = ctx.metadata().slot_time();
    let price_usd = auction.current_price_usd(now);
    let price = native_price(host, price_usd, now)?;
    ensure!(
        amount >= price,
        CustomContractError::InsufficientPayment.into()
    );

    // Close before any outside call so re-entry finds the auction inactive
    host.state_mut().close(auction_id)?;

    host.cis2_transfer(
        &auction.nft_contract,
        auction.token_id.clone(),
        Address::Account(auction.seller),
        buyer,
    )
    .map_err(handle_call_error)?;

    host.invoke_transfer(&auction.seller, amount)?;

    logger.log(&AuctionEvents::sold(auction_id, &buyer, price_usd, amount))?;

    Ok(())
}

/// Withdraw an active auction. Only the seller can cancel, and the token never
/// left the seller, so nothing is returned.
///
/// It rejects if:
/// - Fails to parse `AuctionId` parameter;
/// - Auction does not exist or is no longer active;
/// - Sender is not the seller;
/// - Fails to log `Cancelled` event.
#[receive(
    mutable,
    contract = "DutchAuction",
    name = "cancelAuction",
    parameter = "AuctionId",
    enable_logger
)]
fn contract_cancel_auction<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ReceiveResult<()> {
    let auction_id = AuctionId::deserial(&mut ctx.parameter_cursor())?;
    let state = host.state_mut();

    let auction = state.active_auction(auction_id)?;
    ensure!(
        ctx.sender().matches_account(&auction.seller),
        CustomContractError::Unauthorized.into()
    );

    state.close(auction_id)?;

    logger.log(&AuctionEvents::cancelled(auction_id))?;

    Ok(())
}

/// Number of auctions ever created, closed ones included.
#[receive(contract = "DutchAuction", name = "auctionCounter", return_value = "u64")]
fn contract_auction_counter<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<u64> {
    Ok(host.state().counter)
}

/// Auction record by id. Unknown ids give an inactive all-zero record.
#[receive(
    contract = "DutchAuction",
    name = "auctions",
    parameter = "AuctionId",
    return_value = "Auction"
)]
fn contract_auctions<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<Auction> {
    let auction_id = AuctionId::deserial(&mut ctx.parameter_cursor())?;
    Ok(host
        .state()
        .auction(auction_id)
        .unwrap_or_else(Auction::zero))
}

#[receive(
    contract = "DutchAuction",
    name = "viewActiveAuctions",
    parameter = "ViewAuctionsParams",
    return_value = "Vec<Auction>"
)]
fn contract_view_active_auctions<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<Vec<Auction>> {
    let params = ViewAuctionsParams::deserial(&mut ctx.parameter_cursor())?;
    Ok(host.state().active_auctions(params.skip, params.show))
}

#[receive(
    mutable,
    contract = "DutchAuction",
    name = "updateAuthority",
    parameter = "AuthorityUpdateParams"
)]
fn contract_update_authority<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<()> {
    let params = AuthorityUpdateParams::deserial(&mut ctx.parameter_cursor())?;
    let sender = ctx.sender();
    host.state_mut().authority.handle_update(sender, params)?;
    Ok(())
}

#[receive(
    contract = "DutchAuction",
    name = "viewAuthority",
    parameter = "AuthorityViewParams",
    return_value = "Vec<Address>"
)]
fn contract_view_authority<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<Vec<Address>> {
    let params = AuthorityViewParams::deserial(&mut ctx.parameter_cursor())?;
    Ok(host.state().authority.handle_view(params))
}

/// Function to update values required for internal contract functionality. This includes:
/// - Oracle. Price feed used to convert USD prices to CCD.
/// - MaxPriceAge. Oldest oracle round accepted for pricing.
///
///  It rejects if:
///  - Fails to parse `InternalValue` parameter.
///  - If sender is neither one of the admins nor one of the maintainers.
#[receive(
    mutable,
    contract = "DutchAuction",
    name = "updateInternalValue",
    parameter = "InternalValue"
)]
fn contract_update_internal_value<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<()> {
    if !host.state().authority.has_maintainer_rights(&ctx.sender()) {
        return Err(CustomContractError::Unauthorized.into());
    }

    let state = host.state_mut();
    let params = InternalValue::deserial(&mut ctx.parameter_cursor())?;

    match params {
        InternalValue::Oracle(oracle) => state.oracle = oracle,
        InternalValue::MaxPriceAge(age) => state.max_price_age = age,
    }

    Ok(())
}

#[receive(
    contract = "DutchAuction",
    name = "viewInternalValue",
    parameter = "ViewInternalValueParams",
    return_value = "InternalValue"
)]
fn contract_view_internal_value<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<InternalValue> {
    let state = host.state();
    let params = ViewInternalValueParams::deserial(&mut ctx.parameter_cursor())?;

    let value = match params {
        ViewInternalValueParams::Oracle => InternalValue::Oracle(state.oracle),
        ViewInternalValueParams::MaxPriceAge => InternalValue::MaxPriceAge(state.max_price_age),
    };

    Ok(value)
}

/// Converts `usd` to CCD with the latest oracle round, rejecting stale rounds.
fn native_price<S: HasStateApi>(
    host: &impl HasHost<State<S>, StateApiType = S>,
    usd: u64,
    now: Timestamp,
) -> ReceiveResult<Amount> {
    let oracle = host.state().oracle;
    let max_age = host.state().max_price_age;

    let round = host
        .oracle_latest_round_data(&oracle)
        .map_err(handle_read_error)?;
    ensure!(
        !pricing::is_stale(&round, now, max_age),
        CustomContractError::StalePrice.into()
    );

    Ok(pricing::usd_to_micro_ccd(usd, &round)?)
}

fn handle_call_error<R>(error: CallContractError<R>) -> Reject {
    match error {
        CallContractError::MissingEntrypoint => CustomContractError::Incompatible.into(),
        CallContractError::LogicReject { reason, .. } => match reason {
            // CustomContractError::ParseParams | concordium ParseError
            -1 | -2147483646 => CustomContractError::Incompatible.into(),
            // Cis2Error::InvalidTokenId | Cis2Error::InsufficientFunds
            -42000001 | -42000002 => CustomContractError::NotTokenOwner.into(),
            // Cis2Error::Unauthorized, this contract is no longer an operator
            -42000003 => CustomContractError::NotApproved.into(),
            // Remaining errors
            _ => CustomContractError::InvokeContractError.into(),
        },
        _ => CustomContractError::InvokeContractError.into(),
    }
}

fn handle_read_error<R>(error: ContractReadError<R>) -> Reject {
    match error {
        ContractReadError::Call(e) => handle_call_error(e),
        ContractReadError::Compatibility | ContractReadError::Parse => {
            CustomContractError::Incompatible.into()
        }
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use commons::test::*;
    use commons::{
        AuthorityField, AuthorityUpdateKind, ContractBalanceOfQueryParams,
        ContractBalanceOfQueryResponse, RoundData, TransferParameter,
    };
    use concordium_cis2::{OperatorOfQueryParams, OperatorOfQueryResponse, TokenIdU64};
    use test_infrastructure::*;

    const SELF_ADDRESS: ContractAddress = ContractAddress {
        index: 1,
        subindex: 0,
    };
    const NFT: ContractAddress = ContractAddress {
        index: 2,
        subindex: 0,
    };
    const ORACLE: ContractAddress = ContractAddress {
        index: 3,
        subindex: 0,
    };

    const ADMIN: AccountAddress = AccountAddress([1; 32]);
    const MAINTAINER: AccountAddress = AccountAddress([2; 32]);
    const SELLER: AccountAddress = AccountAddress([16; 32]);
    const BUYER: AccountAddress = AccountAddress([17; 32]);

    const TOKEN: u64 = 7;

    /// Auction opening time.
    fn start() -> Timestamp {
        Timestamp::from_timestamp_millis(1_000_000_000)
    }

    fn after(seconds: u64) -> Timestamp {
        Timestamp::from_timestamp_millis(start().timestamp_millis() + seconds * 1000)
    }

    /// 2 USD per CCD with 8 decimals, published at `updated_at`.
    fn round_at(updated_at: Timestamp) -> RoundData {
        RoundData {
            round_id: 4,
            answer: 200_000_000,
            decimals: 8,
            started_at: updated_at,
            updated_at,
        }
    }

    fn auction_params() -> CreateAuctionParams {
        CreateAuctionParams {
            nft_contract: NFT,
            token_id: TokenIdU64(TOKEN),
            start_price_usd: 100,
            end_price_usd: 10,
            duration: Duration::from_seconds(100),
        }
    }

    fn default_host() -> TestHost<State<TestStateApi>> {
        let mut ctx = TestInitContext::empty();
        // admin is initialized to `ctx.origin()`
        let params = InitParams { oracle: ORACLE };
        let bytes = to_bytes(&params);
        ctx.set_init_origin(ADMIN).set_parameter(&bytes);
        let mut state_builder = TestStateBuilder::new();

        let state =
            contract_init(&ctx, &mut state_builder).expect_report("Failed during init_DutchAuction");

        let mut host = TestHost::new(state, state_builder);

        let mut ctx = TestReceiveContext::empty();
        let params = AuthorityUpdateParams {
            field: AuthorityField::Maintainer,
            kind: AuthorityUpdateKind::Add,
            address: Address::Account(MAINTAINER),
        };
        let bytes = to_bytes(&params);
        ctx.set_sender(Address::Account(ADMIN)).set_parameter(&bytes);
        let result = contract_update_authority(&ctx, &mut host);
        claim_eq!(result, Ok(()));

        host
    }

    fn setup_nft(host: &mut TestHost<State<TestStateApi>>, balance: u64, approved: bool) {
        host.setup_mock_entrypoint(
            NFT,
            OwnedEntrypointName::new_unchecked(String::from("balanceOf")),
            parse_and_map_mock(move |_: &ContractBalanceOfQueryParams| {
                Some(ContractBalanceOfQueryResponse::from(vec![
                    ContractTokenAmount::from(balance),
                ]))
            }),
        );
        host.setup_mock_entrypoint(
            NFT,
            OwnedEntrypointName::new_unchecked(String::from("operatorOf")),
            parse_and_map_mock(move |params: &OperatorOfQueryParams| {
                let query = params.queries.first()?;
                let expected = query.owner == Address::Account(SELLER)
                    && query.address == Address::Contract(SELF_ADDRESS);
                Some(OperatorOfQueryResponse::from(vec![approved && expected]))
            }),
        );
        host.setup_mock_entrypoint(
            NFT,
            OwnedEntrypointName::new_unchecked(String::from("transfer")),
            parse_and_check_mock(
                |params: &TransferParameter| {
                    params.0.len() == 1
                        && params.0[0].token_id == TokenIdU64(TOKEN)
                        && params.0[0].from == Address::Account(SELLER)
                        && params.0[0].to.address() == Address::Account(BUYER)
                },
                (),
            ),
        );
    }

    fn setup_oracle(host: &mut TestHost<State<TestStateApi>>, round: RoundData) {
        setup_oracle_raw(host, round);
    }

    fn setup_oracle_raw(
        host: &mut TestHost<State<TestStateApi>>,
        answer: impl Clone + Serial + 'static,
    ) {
        host.setup_mock_entrypoint(
            ORACLE,
            OwnedEntrypointName::new_unchecked(String::from("latestRoundData")),
            parse_and_ok_mock::<(), _>(answer),
        );
    }

    fn seller_ctx<'a>(bytes: &'a [u8], slot_time: Timestamp) -> TestReceiveContext<'a> {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(SELLER))
            .set_invoker(SELLER)
            .set_self_address(SELF_ADDRESS)
            .set_parameter(bytes)
            .set_metadata_slot_time(slot_time);
        ctx
    }

    fn create(host: &mut TestHost<State<TestStateApi>>) -> ReceiveResult<AuctionId> {
        create_token(host, TOKEN)
    }

    fn create_token(
        host: &mut TestHost<State<TestStateApi>>,
        token: u64,
    ) -> ReceiveResult<AuctionId> {
        let mut params = auction_params();
        params.token_id = TokenIdU64(token);
        let bytes = to_bytes(&params);
        let ctx = seller_ctx(&bytes, start());
        let mut logger = TestLogger::init();
        contract_create_auction(&ctx, host, &mut logger)
    }

    fn buy(
        host: &mut TestHost<State<TestStateApi>>,
        buyer: AccountAddress,
        auction_id: AuctionId,
        slot_time: Timestamp,
        amount: Amount,
        logger: &mut TestLogger,
    ) -> ReceiveResult<()> {
        let bytes = to_bytes(&auction_id);
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(buyer))
            .set_invoker(buyer)
            .set_self_address(SELF_ADDRESS)
            .set_parameter(&bytes)
            .set_metadata_slot_time(slot_time);
        host.set_self_balance(amount);
        contract_buy(&ctx, host, amount, logger)
    }

    fn price_in_usd(
        host: &TestHost<State<TestStateApi>>,
        auction_id: AuctionId,
        slot_time: Timestamp,
    ) -> ReceiveResult<u64> {
        let bytes = to_bytes(&auction_id);
        let mut ctx = TestReceiveContext::empty();
        ctx.set_parameter(&bytes).set_metadata_slot_time(slot_time);
        contract_get_current_price_in_usd(&ctx, host)
    }

    fn price(
        host: &TestHost<State<TestStateApi>>,
        auction_id: AuctionId,
        slot_time: Timestamp,
    ) -> ReceiveResult<Amount> {
        let bytes = to_bytes(&auction_id);
        let mut ctx = TestReceiveContext::empty();
        ctx.set_parameter(&bytes).set_metadata_slot_time(slot_time);
        contract_get_current_price(&ctx, host)
    }

    #[concordium_test]
    fn test_create_auction() {
        let mut host = default_host();
        setup_nft(&mut host, 1, true);

        let bytes = to_bytes(&auction_params());
        let ctx = seller_ctx(&bytes, start());
        let mut logger = TestLogger::init();
        let result = contract_create_auction(&ctx, &mut host, &mut logger);

        claim_eq!(result, Ok(1));
        let auction = host
            .state()
            .auction(1)
            .expect_report("Auction should be stored");
        claim_eq!(auction.seller, SELLER);
        claim_eq!(auction.start_time, start());
        claim!(auction.active);
        claim_eq!(host.state().counter, 1);
        claim_eq!(logger.logs.len(), 1);
        claim_eq!(logger.logs[0], to_bytes(&AuctionEvents::created(&auction)));

        // A listed token can not be listed again while the auction runs
        let result = contract_create_auction(&ctx, &mut host, &mut logger);
        claim_eq!(result, Err(CustomContractError::AlreadyListed.into()));
        claim_eq!(host.state().counter, 1);

        // Another token gets the next id
        claim_eq!(create_token(&mut host, TOKEN + 1), Ok(2));
    }

    #[concordium_test]
    fn test_relist_after_cancel_and_sale() {
        let mut host = default_host();
        setup_nft(&mut host, 1, true);
        setup_oracle(&mut host, round_at(after(40)));
        let first = create(&mut host).expect_report("Auction should be created");
        let mut logger = TestLogger::init();

        let bytes = to_bytes(&first);
        let ctx = seller_ctx(&bytes, after(10));
        contract_cancel_auction(&ctx, &mut host, &mut logger)
            .expect_report("Seller should cancel");

        let second = create(&mut host).expect_report("Cancelled token should list again");
        claim_eq!(second, 2);

        let result = buy(
            &mut host,
            BUYER,
            second,
            after(50),
            Amount::from_ccd(28),
            &mut logger,
        );
        claim_eq!(result, Ok(()));

        // The seller got the token back in some other way and lists it once more
        let third = create(&mut host).expect_report("Sold token should list again");
        claim_eq!(third, 3);
        claim_eq!(
            host.state()
                .active_auctions(0, 10)
                .iter()
                .map(|a| a.id)
                .collect::<Vec<_>>(),
            vec![3]
        );
    }

    #[concordium_test]
    fn test_create_auction_rejects_rising_price() {
        let mut host = default_host();
        setup_nft(&mut host, 1, true);

        let mut params = auction_params();
        params.start_price_usd = 10;
        params.end_price_usd = 11;
        let bytes = to_bytes(&params);
        let ctx = seller_ctx(&bytes, start());
        let mut logger = TestLogger::init();

        let result = contract_create_auction(&ctx, &mut host, &mut logger);
        claim_eq!(result, Err(CustomContractError::InvalidPriceRange.into()));
        claim_eq!(host.state().counter, 0);
    }

    #[concordium_test]
    fn test_create_auction_rejects_zero_duration() {
        let mut host = default_host();
        setup_nft(&mut host, 1, true);

        let mut params = auction_params();
        params.duration = Duration::from_millis(0);
        let bytes = to_bytes(&params);
        let ctx = seller_ctx(&bytes, start());
        let mut logger = TestLogger::init();

        let result = contract_create_auction(&ctx, &mut host, &mut logger);
        claim_eq!(result, Err(CustomContractError::InvalidDuration.into()));
    }

    #[concordium_test]
    fn test_create_auction_requires_approval() {
        let mut host = default_host();
        setup_nft(&mut host, 1, false);

        let result = create(&mut host);
        claim_eq!(result, Err(CustomContractError::NotApproved.into()));
        claim_eq!(host.state().counter, 0);
    }

    #[concordium_test]
    fn test_create_auction_requires_ownership() {
        let mut host = default_host();
        setup_nft(&mut host, 0, true);

        let result = create(&mut host);
        claim_eq!(result, Err(CustomContractError::NotTokenOwner.into()));
    }

    #[concordium_test]
    fn test_create_auction_unknown_token() {
        let mut host = default_host();
        host.setup_mock_entrypoint(
            NFT,
            OwnedEntrypointName::new_unchecked(String::from("balanceOf")),
            // Cis2Error::InvalidTokenId
            reject_mock(-42000001),
        );

        let result = create(&mut host);
        claim_eq!(result, Err(CustomContractError::NotTokenOwner.into()));
    }

    #[concordium_test]
    fn test_create_auction_from_contract() {
        let mut host = default_host();
        setup_nft(&mut host, 1, true);

        let bytes = to_bytes(&auction_params());
        let mut ctx = seller_ctx(&bytes, start());
        ctx.set_sender(Address::Contract(NFT));
        let mut logger = TestLogger::init();

        let result = contract_create_auction(&ctx, &mut host, &mut logger);
        claim_eq!(result, Err(CustomContractError::OnlyAccountAddress.into()));
    }

    #[concordium_test]
    fn test_price_in_usd_decays() {
        let mut host = default_host();
        setup_nft(&mut host, 1, true);
        let auction_id = create(&mut host).expect_report("Auction should be created");

        claim_eq!(price_in_usd(&host, auction_id, start()), Ok(100));
        claim_eq!(price_in_usd(&host, auction_id, after(50)), Ok(55));
        claim_eq!(price_in_usd(&host, auction_id, after(100)), Ok(10));
        claim_eq!(price_in_usd(&host, auction_id, after(5000)), Ok(10));

        let mut previous = 100;
        for t in 0..=120 {
            let current = price_in_usd(&host, auction_id, after(t))
                .expect_report("Price should be available");
            claim!(current <= previous && current >= 10);
            previous = current;
        }

        claim_eq!(
            price_in_usd(&host, 42, start()),
            Err(CustomContractError::NotFound.into())
        );
    }

    #[concordium_test]
    fn test_price_in_ccd() {
        let mut host = default_host();
        setup_nft(&mut host, 1, true);
        setup_oracle(&mut host, round_at(after(40)));
        let auction_id = create(&mut host).expect_report("Auction should be created");

        // 55 USD at 2 USD per CCD
        claim_eq!(
            price(&host, auction_id, after(50)),
            Ok(Amount::from_micro_ccd(27_500_000))
        );
    }

    #[concordium_test]
    fn test_price_rejects_stale_round() {
        let mut host = default_host();
        setup_nft(&mut host, 1, true);
        setup_oracle(&mut host, round_at(start()));
        let auction_id = create(&mut host).expect_report("Auction should be created");

        // Default limit is one hour
        claim!(price(&host, auction_id, after(3600)).is_ok());
        claim_eq!(
            price(&host, auction_id, after(3601)),
            Err(CustomContractError::StalePrice.into())
        );
    }

    #[concordium_test]
    fn test_price_rejects_empty_round() {
        let mut host = default_host();
        setup_nft(&mut host, 1, true);
        let mut round = round_at(start());
        round.answer = 0;
        setup_oracle(&mut host, round);
        let auction_id = create(&mut host).expect_report("Auction should be created");

        claim_eq!(
            price(&host, auction_id, after(10)),
            Err(CustomContractError::PriceUnavailable.into())
        );
    }

    #[concordium_test]
    fn test_price_rejects_unreadable_oracle() {
        let mut host = default_host();
        setup_nft(&mut host, 1, true);
        // Answers with a single byte instead of a round
        setup_oracle_raw(&mut host, 1u8);
        let auction_id = create(&mut host).expect_report("Auction should be created");

        claim_eq!(
            price(&host, auction_id, after(10)),
            Err(CustomContractError::Incompatible.into())
        );
    }

    #[concordium_test]
    fn test_buy() {
        let mut host = default_host();
        setup_nft(&mut host, 1, true);
        setup_oracle(&mut host, round_at(after(40)));
        let auction_id = create(&mut host).expect_report("Auction should be created");

        // Overpaying is accepted and everything goes to the seller
        let paid = Amount::from_ccd(30);
        let mut logger = TestLogger::init();
        let result = buy(&mut host, BUYER, auction_id, after(50), paid, &mut logger);

        claim_eq!(result, Ok(()));
        claim!(host.transfer_occurred(&SELLER, paid));
        claim!(!host.state().auction(auction_id).map_or(true, |a| a.active));
        claim_eq!(
            logger.logs,
            vec![to_bytes(&AuctionEvents::sold(auction_id, &BUYER, 55, paid))]
        );
    }

    #[concordium_test]
    fn test_buy_only_once() {
        let mut host = default_host();
        setup_nft(&mut host, 1, true);
        setup_oracle(&mut host, round_at(after(40)));
        let auction_id = create(&mut host).expect_report("Auction should be created");
        let mut logger = TestLogger::init();

        let result = buy(
            &mut host,
            BUYER,
            auction_id,
            after(50),
            Amount::from_ccd(28),
            &mut logger,
        );
        claim_eq!(result, Ok(()));

        let result = buy(
            &mut host,
            BUYER,
            auction_id,
            after(51),
            Amount::from_ccd(28),
            &mut logger,
        );
        claim_eq!(result, Err(CustomContractError::AuctionInactive.into()));

        claim_eq!(
            price_in_usd(&host, auction_id, after(52)),
            Err(CustomContractError::AuctionInactive.into())
        );
        // Record stays readable and keeps its counter slot
        claim_eq!(host.state().counter, 1);
    }

    #[concordium_test]
    fn test_buy_insufficient_payment() {
        let mut host = default_host();
        setup_nft(&mut host, 1, true);
        setup_oracle(&mut host, round_at(after(40)));
        let auction_id = create(&mut host).expect_report("Auction should be created");
        let mut logger = TestLogger::init();

        let result = buy(
            &mut host,
            BUYER,
            auction_id,
            after(50),
            Amount::from_micro_ccd(27_499_999),
            &mut logger,
        );
        claim_eq!(result, Err(CustomContractError::InsufficientPayment.into()));
        claim!(host.state().active_auction(auction_id).is_ok());
        claim!(logger.logs.is_empty());
    }

    #[concordium_test]
    fn test_buy_by_seller() {
        let mut host = default_host();
        setup_nft(&mut host, 1, true);
        setup_oracle(&mut host, round_at(after(40)));
        let auction_id = create(&mut host).expect_report("Auction should be created");
        let mut logger = TestLogger::init();

        let result = buy(
            &mut host,
            SELLER,
            auction_id,
            after(50),
            Amount::from_ccd(100),
            &mut logger,
        );
        claim_eq!(result, Err(CustomContractError::OwnerForbidden.into()));
    }

    #[concordium_test]
    fn test_buy_with_revoked_approval() {
        let mut host = default_host();
        setup_nft(&mut host, 1, true);
        setup_oracle(&mut host, round_at(after(40)));
        let auction_id = create(&mut host).expect_report("Auction should be created");
        host.setup_mock_entrypoint(
            NFT,
            OwnedEntrypointName::new_unchecked(String::from("transfer")),
            // Cis2Error::Unauthorized
            reject_mock(-42000003),
        );
        let mut logger = TestLogger::init();

        let result = buy(
            &mut host,
            BUYER,
            auction_id,
            after(50),
            Amount::from_ccd(28),
            &mut logger,
        );
        claim_eq!(result, Err(CustomContractError::NotApproved.into()));
        claim!(!host.transfer_occurred(&SELLER, Amount::from_ccd(28)));
    }

    #[concordium_test]
    fn test_cancel_auction() {
        let mut host = default_host();
        setup_nft(&mut host, 1, true);
        setup_oracle(&mut host, round_at(after(40)));
        let auction_id = create(&mut host).expect_report("Auction should be created");
        let bytes = to_bytes(&auction_id);
        let mut logger = TestLogger::init();

        // Only the seller may cancel
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(BUYER)).set_parameter(&bytes);
        let result = contract_cancel_auction(&ctx, &mut host, &mut logger);
        claim_eq!(result, Err(CustomContractError::Unauthorized.into()));

        let ctx = seller_ctx(&bytes, after(10));
        let result = contract_cancel_auction(&ctx, &mut host, &mut logger);
        claim_eq!(result, Ok(()));
        claim_eq!(
            logger.logs,
            vec![to_bytes(&AuctionEvents::cancelled(auction_id))]
        );

        let result = contract_cancel_auction(&ctx, &mut host, &mut logger);
        claim_eq!(result, Err(CustomContractError::AuctionInactive.into()));

        let result = buy(
            &mut host,
            BUYER,
            auction_id,
            after(50),
            Amount::from_ccd(100),
            &mut logger,
        );
        claim_eq!(result, Err(CustomContractError::AuctionInactive.into()));
    }

    #[concordium_test]
    fn test_auctions_read_accessor() {
        let mut host = default_host();
        setup_nft(&mut host, 1, true);
        let auction_id = create(&mut host).expect_report("Auction should be created");

        let bytes = to_bytes(&auction_id);
        let mut ctx = TestReceiveContext::empty();
        ctx.set_parameter(&bytes);
        let auction = contract_auctions(&ctx, &host).expect_report("Known id should be readable");
        claim_eq!(auction.id, auction_id);
        claim_eq!(auction.token_id, TokenIdU64(TOKEN));

        let bytes = to_bytes(&99u64);
        ctx.set_parameter(&bytes);
        let missing = contract_auctions(&ctx, &host).expect_report("Unknown id should not fail");
        claim_eq!(missing, Auction::zero());
        claim!(!missing.active);

        let ctx = TestReceiveContext::empty();
        claim_eq!(contract_auction_counter(&ctx, &host), Ok(1));
    }

    #[concordium_test]
    fn test_view_active_auctions() {
        let mut host = default_host();
        setup_nft(&mut host, 1, true);
        for token in 1..=3 {
            create_token(&mut host, token).expect_report("Auction should be created");
        }
        host.state_mut()
            .close(2)
            .expect_report("Auction should close");

        let bytes = to_bytes(&ViewAuctionsParams { skip: 0, show: 10 });
        let mut ctx = TestReceiveContext::empty();
        ctx.set_parameter(&bytes);
        let active = contract_view_active_auctions(&ctx, &host).expect_report("View should pass");
        claim_eq!(
            active.iter().map(|a| a.id).collect::<Vec<_>>(),
            vec![1, 3]
        );
    }

    #[concordium_test]
    fn test_update_internal_value() {
        let mut host = default_host();

        let bytes = to_bytes(&InternalValue::MaxPriceAge(Duration::from_seconds(60)));
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(BUYER)).set_parameter(&bytes);
        let result = contract_update_internal_value(&ctx, &mut host);
        claim_eq!(result, Err(CustomContractError::Unauthorized.into()));

        ctx.set_sender(Address::Account(MAINTAINER));
        let result = contract_update_internal_value(&ctx, &mut host);
        claim_eq!(result, Ok(()));

        let bytes = to_bytes(&ViewInternalValueParams::MaxPriceAge);
        let mut ctx = TestReceiveContext::empty();
        ctx.set_parameter(&bytes);
        claim_eq!(
            contract_view_internal_value(&ctx, &host),
            Ok(InternalValue::MaxPriceAge(Duration::from_seconds(60)))
        );

        let bytes = to_bytes(&ViewInternalValueParams::Oracle);
        ctx.set_parameter(&bytes);
        claim_eq!(
            contract_view_internal_value(&ctx, &host),
            Ok(InternalValue::Oracle(ORACLE))
        );
    }
}
