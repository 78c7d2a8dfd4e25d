/// Tag for the AuctionCreated event.
pub const AUCTION_CREATED_TAG: u8 = u8::MAX - 5;

/// Tag for the AuctionSold event.
pub const AUCTION_SOLD_TAG: u8 = u8::MAX - 6;

/// Tag for the AuctionCancelled event.
pub const AUCTION_CANCELLED_TAG: u8 = u8::MAX - 7;

/// Tag for the RoundUpdated event of the price oracle.
pub const ROUND_UPDATED_TAG: u8 = u8::MAX - 8;

/// Scale of `Amount` relative to one CCD.
pub const MICRO_CCD_PER_CCD: u128 = 1_000_000;
