//! A CIS-2 NFT contract with single-unit tokens.
//!
//! # Description
//! Every token id identifies exactly one token. Maintainers mint tokens to an
//! owner together with a metadata url, owners move them with `transfer` and
//! may appoint operators through `updateOperator`. An operator can transfer
//! every token of the owner, which is how a marketplace contract is allowed to
//! deliver a sold token to its buyer.

#![cfg_attr(not(feature = "std"), no_std)]

use commons::*;
use concordium_cis2::*;
use concordium_std::*;
pub use structs::*;

mod contract;
mod impls;
mod structs;
