use crate::events::{PriceOracleEvent, RoundUpdatedEvent};
use crate::external::*;
use crate::state::State;
use commons::{AuthorityUpdateParams, AuthorityViewParams, CustomContractError, RoundData};
use concordium_std::*;

/// Initialize contract instance with the first round.
#[init(contract = "PriceOracle", parameter = "InitParams")]
fn init<S: HasStateApi>(
    ctx: &impl HasInitContext,
    state_builder: &mut StateBuilder<S>,
) -> InitResult<State<S>> {
    let params = InitParams::deserial(&mut ctx.parameter_cursor())?;
    ensure!(params.answer != 0, CustomContractError::PriceUnavailable.into());

    // Construct the initial contract state.
    let state = State::new(
        state_builder,
        params,
        ctx.init_origin(),
        ctx.metadata().slot_time(),
    );

    Ok(state)
}

/// Function to publish a new USD/CCD rate.
///
/// It rejects if:
/// - Fails to parse parameter;
/// - Sender does not have maintainer rights;
/// - Answer is zero;
/// - Fails to log `RoundUpdated` event.
#[receive(
    mutable,
    contract = "PriceOracle",
    name = "updateRate",
    parameter = "u64",
    enable_logger
)]
fn update_rate<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ReceiveResult<()> {
    let answer = u64::deserial(&mut ctx.parameter_cursor())?;
    let state = host.state_mut();

    ensure!(
        state.authority.has_maintainer_rights(&ctx.sender()),
        CustomContractError::Unauthorized.into()
    );

    let round = state.publish(answer, ctx.metadata().slot_time())?;

    logger.log(&PriceOracleEvent::RoundUpdated(RoundUpdatedEvent {
        round_id: round.round_id,
        answer: round.answer,
        updated_at: round.updated_at,
    }))?;

    Ok(())
}

#[receive(
    contract = "PriceOracle",
    name = "latestRoundData",
    return_value = "RoundData"
)]
fn latest_round_data<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<RoundData> {
    Ok(host.state().round)
}

#[receive(
    mutable,
    contract = "PriceOracle",
    name = "updateAuthority",
    parameter = "AuthorityUpdateParams"
)]
fn update_authority<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<()> {
    let state = host.state_mut();
    let params = AuthorityUpdateParams::deserial(&mut ctx.parameter_cursor())?;
    let sender = ctx.sender();
    state.authority.handle_update(sender, params)?;
    Ok(())
}

#[receive(
    contract = "PriceOracle",
    name = "viewAuthority",
    parameter = "AuthorityViewParams",
    return_value = "Vec<Address>"
)]
fn view_authority<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<Vec<Address>> {
    let params = AuthorityViewParams::deserial(&mut ctx.parameter_cursor())?;
    Ok(host.state().authority.handle_view(params))
}

#[concordium_cfg_test]
mod tests {
    use concordium_std::*;
    use test_infrastructure::*;

    use super::*;

    const ADMIN: AccountAddress = AccountAddress([1; 32]);
    const MAINTAINER: AccountAddress = AccountAddress([2; 32]);
    const STRANGER: AccountAddress = AccountAddress([3; 32]);

    fn genesis() -> Timestamp {
        Timestamp::from_timestamp_millis(5_000)
    }

    fn new_host_with(params: InitParams) -> TestHost<State<TestStateApi>> {
        let mut ctx = TestInitContext::empty();
        let bytes = to_bytes(&params);
        ctx.set_init_origin(ADMIN)
            .set_parameter(&bytes)
            .set_metadata_slot_time(genesis());
        let mut state_builder = TestStateBuilder::new();

        let state = init(&ctx, &mut state_builder).expect_report("Failed during init_PriceOracle");

        let mut host = TestHost::new(state, state_builder);

        let mut ctx = TestReceiveContext::empty();
        let params = AuthorityUpdateParams {
            field: commons::AuthorityField::Maintainer,
            kind: commons::AuthorityUpdateKind::Add,
            address: Address::Account(MAINTAINER),
        };
        let bytes = to_bytes(&params);
        ctx.set_sender(Address::Account(ADMIN)).set_parameter(&bytes);
        let result = update_authority(&ctx, &mut host);
        claim_eq!(result, Ok(()));

        host
    }

    fn read_round(host: &TestHost<State<TestStateApi>>) -> RoundData {
        let ctx = TestReceiveContext::empty();
        latest_round_data(&ctx, host).expect_report("Failed to call latestRoundData")
    }

    #[concordium_test]
    fn test_init_round() {
        let host = new_host_with(InitParams {
            decimals: 8,
            answer: 5_000_000,
        });

        claim_eq!(
            read_round(&host),
            RoundData {
                round_id: 1,
                answer: 5_000_000,
                decimals: 8,
                started_at: genesis(),
                updated_at: genesis(),
            }
        );
    }

    #[concordium_test]
    fn test_init_rejects_zero_answer() {
        let mut ctx = TestInitContext::empty();
        let bytes = to_bytes(&InitParams {
            decimals: 8,
            answer: 0,
        });
        ctx.set_init_origin(ADMIN)
            .set_parameter(&bytes)
            .set_metadata_slot_time(genesis());
        let mut state_builder = TestStateBuilder::new();

        let result = init(&ctx, &mut state_builder);
        claim!(result.is_err());
    }

    #[concordium_test]
    fn test_update_rate() {
        let mut host = new_host_with(InitParams {
            decimals: 2,
            answer: 300,
        });
        let now = Timestamp::from_timestamp_millis(9_000);

        let mut ctx = TestReceiveContext::empty();
        let bytes = to_bytes(&250u64);
        ctx.set_sender(Address::Account(MAINTAINER))
            .set_parameter(&bytes)
            .set_metadata_slot_time(now);
        let mut logger = TestLogger::init();

        let result = update_rate(&ctx, &mut host, &mut logger);
        claim_eq!(result, Ok(()));

        let round = read_round(&host);
        claim_eq!(round.round_id, 2);
        claim_eq!(round.answer, 250);
        claim_eq!(round.decimals, 2);
        claim_eq!(round.started_at, now);
        claim_eq!(round.updated_at, now);

        claim_eq!(
            logger.logs,
            vec![to_bytes(&PriceOracleEvent::RoundUpdated(RoundUpdatedEvent {
                round_id: 2,
                answer: 250,
                updated_at: now,
            }))]
        );
    }

    #[concordium_test]
    fn test_update_rate_unauthorized() {
        let mut host = new_host_with(InitParams {
            decimals: 2,
            answer: 300,
        });

        let mut ctx = TestReceiveContext::empty();
        let bytes = to_bytes(&250u64);
        ctx.set_sender(Address::Account(STRANGER))
            .set_parameter(&bytes)
            .set_metadata_slot_time(genesis());
        let mut logger = TestLogger::init();

        let result = update_rate(&ctx, &mut host, &mut logger);
        claim_eq!(result, Err(CustomContractError::Unauthorized.into()));
        claim_eq!(read_round(&host).round_id, 1);
        claim!(logger.logs.is_empty());
    }

    #[concordium_test]
    fn test_update_rate_rejects_zero() {
        let mut host = new_host_with(InitParams {
            decimals: 2,
            answer: 300,
        });

        let mut ctx = TestReceiveContext::empty();
        let bytes = to_bytes(&0u64);
        ctx.set_sender(Address::Account(ADMIN))
            .set_parameter(&bytes)
            .set_metadata_slot_time(genesis());
        let mut logger = TestLogger::init();

        let result = update_rate(&ctx, &mut host, &mut logger);
        claim_eq!(result, Err(CustomContractError::PriceUnavailable.into()));
        claim_eq!(read_round(&host).answer, 300);
    }
}
