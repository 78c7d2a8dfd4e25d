//! A USD/CCD price feed.
//!
//! # Description
//! The contract keeps a single latest round: the USD price of one CCD scaled
//! by a fixed number of decimals, together with the round number and the time
//! it was published. Maintainers push new answers through `updateRate`, every
//! update opening the next round. Consumers read `latestRoundData` and decide
//! for themselves whether the round is fresh enough.

#![cfg_attr(not(feature = "std"), no_std)]

mod contract;
mod events;
mod external;
mod state;
