use commons::{Authority, ContractTokenId, CustomContractError};
use concordium_cis2::TokenIdU64;
use concordium_std::*;

use crate::external::{AuctionId, CreateAuctionParams};
use crate::pricing;

/// Oracle rounds older than this are rejected unless reconfigured.
pub const DEFAULT_MAX_PRICE_AGE_MILLIS: u64 = 60 * 60 * 1000;

/// A single Dutch auction. Only `active` changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, SchemaType)]
pub struct Auction {
    pub id: AuctionId,
    pub seller: AccountAddress,
    pub nft_contract: ContractAddress,
    pub token_id: ContractTokenId,
    pub start_price_usd: u64,
    pub end_price_usd: u64,
    pub start_time: Timestamp,
    pub duration: Duration,
    pub active: bool,
}

impl Auction {
    /// Record returned for ids that were never created.
    pub fn zero() -> Self {
        Self {
            id: 0,
            seller: AccountAddress([0; 32]),
            nft_contract: ContractAddress {
                index: 0,
                subindex: 0,
            },
            token_id: TokenIdU64(0),
            start_price_usd: 0,
            end_price_usd: 0,
            start_time: Timestamp::from_timestamp_millis(0),
            duration: Duration::from_millis(0),
            active: false,
        }
    }

    pub fn current_price_usd(&self, now: Timestamp) -> u64 {
        pricing::current_price_usd(
            self.start_price_usd,
            self.end_price_usd,
            self.start_time,
            self.duration,
            now,
        )
    }
}

/// The contract state.
#[derive(Serial, DeserialWithState, StateClone)]
#[concordium(state_parameter = "S")]
pub struct State<S: HasStateApi> {
    /// Authority module for administrative rights management.
    pub authority: Authority<S>,
    /// Price oracle contract.
    pub oracle: ContractAddress,
    /// Oldest oracle round accepted for pricing.
    pub max_price_age: Duration,
    /// Number of auctions ever created. Also the id of the latest one.
    pub counter: u64,
    pub auctions: StateMap<AuctionId, Auction, S>,
    /// Active auction of every listed token. A token has at most one.
    pub listings: StateMap<(ContractAddress, ContractTokenId), AuctionId, S>,
}

impl<S: HasStateApi> State<S> {
    /// Creates a new state with no auctions.
    pub fn new(
        state_builder: &mut StateBuilder<S>,
        oracle: ContractAddress,
        origin: AccountAddress,
    ) -> Self {
        Self {
            authority: Authority::new(state_builder, Address::Account(origin)),
            oracle,
            max_price_age: Duration::from_millis(DEFAULT_MAX_PRICE_AGE_MILLIS),
            counter: 0,
            auctions: state_builder.new_map(),
            listings: state_builder.new_map(),
        }
    }

    /// Registers an auction under the next id. Terms must already be validated.
    /// Fails if the token is already in an active auction.
    pub fn create(
        &mut self,
        seller: AccountAddress,
        params: CreateAuctionParams,
        now: Timestamp,
    ) -> Result<Auction, CustomContractError> {
        let listing = (params.nft_contract, params.token_id.clone());
        ensure!(
            self.listings.get(&listing).is_none(),
            CustomContractError::AlreadyListed
        );

        let id = self
            .counter
            .checked_add(1)
            .ok_or(CustomContractError::Overflow)?;

        let auction = Auction {
            id,
            seller,
            nft_contract: params.nft_contract,
            token_id: params.token_id,
            start_price_usd: params.start_price_usd,
            end_price_usd: params.end_price_usd,
            start_time: now,
            duration: params.duration,
            active: true,
        };

        self.auctions.insert(id, auction.clone());
        self.listings.insert(listing, id);
        self.counter = id;

        Ok(auction)
    }

    pub fn auction(&self, id: AuctionId) -> Option<Auction> {
        self.auctions.get(&id).map(|auction| (*auction).clone())
    }

    pub fn active_auction(&self, id: AuctionId) -> Result<Auction, CustomContractError> {
        let auction = self.auction(id).ok_or(CustomContractError::NotFound)?;
        ensure!(auction.active, CustomContractError::AuctionInactive);
        Ok(auction)
    }

    /// Flips `active` to false and frees the token for a new listing. Fails
    /// if the auction is already closed, so only the first caller gets through.
    pub fn close(&mut self, id: AuctionId) -> Result<Auction, CustomContractError> {
        let closed = {
            let mut auction = self
                .auctions
                .get_mut(&id)
                .ok_or(CustomContractError::NotFound)?;
            ensure!(auction.active, CustomContractError::AuctionInactive);
            auction.active = false;
            (*auction).clone()
        };

        self.listings
            .remove(&(closed.nft_contract, closed.token_id.clone()));

        Ok(closed)
    }

    /// Active auctions in id order. Only listed auctions are visited.
    pub fn active_auctions(&self, skip: u32, show: u32) -> Vec<Auction> {
        let mut ids: Vec<AuctionId> = self.listings.iter().map(|(_, id)| *id).collect();
        ids.sort_unstable();

        ids.into_iter()
            .skip(skip as usize)
            .take(show as usize)
            .filter_map(|id| self.auction(id))
            .collect()
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use test_infrastructure::*;

    const SELLER: AccountAddress = AccountAddress([3; 32]);
    const NFT: ContractAddress = ContractAddress {
        index: 2,
        subindex: 0,
    };
    const ORACLE: ContractAddress = ContractAddress {
        index: 3,
        subindex: 0,
    };

    fn params(token: u64) -> CreateAuctionParams {
        CreateAuctionParams {
            nft_contract: NFT,
            token_id: TokenIdU64(token),
            start_price_usd: 100,
            end_price_usd: 10,
            duration: Duration::from_seconds(100),
        }
    }

    fn new_state(state_builder: &mut TestStateBuilder) -> State<TestStateApi> {
        State::new(state_builder, ORACLE, SELLER)
    }

    #[concordium_test]
    fn test_ids_start_at_one_and_grow() {
        let mut state_builder = TestStateBuilder::new();
        let mut state = new_state(&mut state_builder);
        let now = Timestamp::from_timestamp_millis(10);

        let first = state
            .create(SELLER, params(1), now)
            .expect_report("First auction should be created");
        let second = state
            .create(SELLER, params(2), now)
            .expect_report("Second auction should be created");

        claim_eq!(first.id, 1);
        claim_eq!(second.id, 2);
        claim_eq!(state.counter, 2);
        claim_eq!(state.auction(1), Some(first));
        claim_eq!(state.auction(3), None);
    }

    #[concordium_test]
    fn test_close_only_once() {
        let mut state_builder = TestStateBuilder::new();
        let mut state = new_state(&mut state_builder);
        let now = Timestamp::from_timestamp_millis(10);
        state
            .create(SELLER, params(1), now)
            .expect_report("Auction should be created");

        let closed = state.close(1).expect_report("First close should pass");
        claim!(!closed.active);
        claim_eq!(state.close(1), Err(CustomContractError::AuctionInactive));
        claim_eq!(
            state.active_auction(1),
            Err(CustomContractError::AuctionInactive)
        );
        claim_eq!(state.close(9), Err(CustomContractError::NotFound));

        // Closed ids are not reused
        let next = state
            .create(SELLER, params(1), now)
            .expect_report("Auction should be created");
        claim_eq!(next.id, 2);
    }

    #[concordium_test]
    fn test_token_listed_once() {
        let mut state_builder = TestStateBuilder::new();
        let mut state = new_state(&mut state_builder);
        let now = Timestamp::from_timestamp_millis(10);
        state
            .create(SELLER, params(1), now)
            .expect_report("Auction should be created");

        claim_eq!(
            state.create(SELLER, params(1), now),
            Err(CustomContractError::AlreadyListed)
        );
        claim_eq!(state.counter, 1);

        // Same id on another token contract is a different token
        let mut other = params(1);
        other.nft_contract = ORACLE;
        claim!(state.create(SELLER, other, now).is_ok());

        state.close(1).expect_report("Close should pass");
        let relisted = state
            .create(SELLER, params(1), now)
            .expect_report("Closed token should list again");
        claim_eq!(relisted.id, 3);
        claim_eq!(state.listings.iter().count(), 2);
    }

    #[concordium_test]
    fn test_active_auctions_paging() {
        let mut state_builder = TestStateBuilder::new();
        let mut state = new_state(&mut state_builder);
        let now = Timestamp::from_timestamp_millis(10);
        for token in 1..=5 {
            state
                .create(SELLER, params(token), now)
                .expect_report("Auction should be created");
        }
        state.close(2).expect_report("Close should pass");

        let ids = |list: Vec<Auction>| list.iter().map(|a| a.id).collect::<Vec<_>>();
        claim_eq!(ids(state.active_auctions(0, 10)), vec![1, 3, 4, 5]);
        claim_eq!(ids(state.active_auctions(1, 2)), vec![3, 4]);
        claim_eq!(ids(state.active_auctions(4, 2)), Vec::<u64>::new());
    }

    #[concordium_test]
    fn test_validate_terms() {
        claim_eq!(params(1).validate(), Ok(()));

        let mut flat = params(1);
        flat.end_price_usd = flat.start_price_usd;
        claim_eq!(flat.validate(), Ok(()));

        let mut rising = params(1);
        rising.end_price_usd = rising.start_price_usd + 1;
        claim_eq!(rising.validate(), Err(CustomContractError::InvalidPriceRange));

        let mut instant = params(1);
        instant.duration = Duration::from_millis(0);
        claim_eq!(instant.validate(), Err(CustomContractError::InvalidDuration));

        instant.duration = Duration::from_millis(999);
        claim_eq!(instant.validate(), Err(CustomContractError::InvalidDuration));

        // Pricing counts whole seconds only
        instant.duration = Duration::from_millis(1500);
        claim_eq!(instant.validate(), Err(CustomContractError::InvalidDuration));

        instant.duration = Duration::from_millis(2000);
        claim_eq!(instant.validate(), Ok(()));
    }
}
