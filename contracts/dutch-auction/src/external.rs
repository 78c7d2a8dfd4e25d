use commons::{ContractTokenId, CustomContractError};
use concordium_std::*;

/// Registry key of an auction. The first auction gets 1.
pub type AuctionId = u64;

#[derive(Debug, Clone, SchemaType, Serialize)]
pub struct InitParams {
    /// Price oracle answering `latestRoundData` in USD per CCD.
    pub oracle: ContractAddress,
}

#[derive(Debug, Clone, SchemaType, Serialize)]
pub struct CreateAuctionParams {
    /// CIS-2 contract of the token.
    pub nft_contract: ContractAddress,
    pub token_id: ContractTokenId,
    /// Price in whole USD when the auction opens.
    pub start_price_usd: u64,
    /// Floor price in whole USD, reached when `duration` has elapsed.
    pub end_price_usd: u64,
    /// Decay period in whole seconds, at least one.
    pub duration: Duration,
}

impl CreateAuctionParams {
    pub fn validate(&self) -> Result<(), CustomContractError> {
        ensure!(
            self.start_price_usd >= self.end_price_usd,
            CustomContractError::InvalidPriceRange
        );
        ensure!(
            self.duration.millis() >= 1000 && self.duration.millis() % 1000 == 0,
            CustomContractError::InvalidDuration
        );
        Ok(())
    }
}

#[derive(Debug, Clone, SchemaType, Serialize)]
pub struct ViewAuctionsParams {
    pub skip: u32,
    pub show: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, SchemaType, Serialize)]
pub enum InternalValue {
    /// Price oracle contract.
    Oracle(ContractAddress),
    /// Oldest oracle round accepted for pricing.
    MaxPriceAge(Duration),
}

#[derive(Debug, Clone, SchemaType, Serialize)]
pub enum ViewInternalValueParams {
    Oracle,
    MaxPriceAge,
}
