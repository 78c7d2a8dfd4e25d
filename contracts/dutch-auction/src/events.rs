use commons::{AUCTION_CANCELLED_TAG, AUCTION_CREATED_TAG, AUCTION_SOLD_TAG};
use concordium_std::*;

use crate::external::AuctionId;
use crate::state::Auction;

/// Auction sale event data.
#[derive(Debug, Serial)]
pub struct SoldEvent<'a> {
    pub auction_id: AuctionId,
    /// Account that received the token.
    pub buyer: &'a AccountAddress,
    /// Decayed USD price at the time of sale.
    pub price_usd: u64,
    /// Amount forwarded to the seller.
    pub paid: Amount,
}

/// Tagged Custom event to be serialized for the event log.
#[derive(Debug)]
pub enum AuctionEvents<'a> {
    Created(&'a Auction),
    Sold(SoldEvent<'a>),
    Cancelled(AuctionId),
}

impl<'a> AuctionEvents<'a> {
    pub fn created(auction: &'a Auction) -> Self {
        Self::Created(auction)
    }

    pub fn sold(
        auction_id: AuctionId,
        buyer: &'a AccountAddress,
        price_usd: u64,
        paid: Amount,
    ) -> Self {
        Self::Sold(SoldEvent {
            auction_id,
            buyer,
            price_usd,
            paid,
        })
    }

    pub fn cancelled(auction_id: AuctionId) -> Self {
        Self::Cancelled(auction_id)
    }
}

impl<'a> Serial for AuctionEvents<'a> {
    fn serial<W: Write>(&self, out: &mut W) -> Result<(), W::Err> {
        match self {
            AuctionEvents::Created(auction) => {
                out.write_u8(AUCTION_CREATED_TAG)?;
                auction.serial(out)
            }
            AuctionEvents::Sold(event) => {
                out.write_u8(AUCTION_SOLD_TAG)?;
                event.serial(out)
            }
            AuctionEvents::Cancelled(auction_id) => {
                out.write_u8(AUCTION_CANCELLED_TAG)?;
                auction_id.serial(out)
            }
        }
    }
}
