//! A Dutch auction registry for CIS-2 tokens.
//!
//! # Description
//! Sellers list a token they own after making this contract an operator of
//! their address on the token contract. The asking price starts at a USD value
//! and falls linearly to a floor over the auction duration. Buyers pay in CCD;
//! the USD price is converted with the latest round of a price oracle contract.
//!
//! The token stays with the seller until someone buys it. On purchase the
//! contract moves the token to the buyer as the seller's operator and forwards
//! the payment to the seller. Every auction is sold or cancelled at most once.

#![cfg_attr(not(feature = "std"), no_std)]

mod contract;
mod events;
mod external;
mod pricing;
mod state;
