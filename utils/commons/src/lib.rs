//! Types, errors and host helpers shared by the auction contracts.
#![cfg_attr(not(feature = "std"), no_std)]
pub use crate::{
    authority::*, cis2::*, constants::*, errors::*, price_oracle::*, types::*,
};
use concordium_cis2::*;
use concordium_std::*;

pub mod test;

mod authority;
mod cis2;
mod constants;
mod errors;
mod price_oracle;
mod types;
