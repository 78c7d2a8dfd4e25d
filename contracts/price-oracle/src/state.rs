use commons::{Authority, CustomContractError, RoundData};
use concordium_std::*;

use crate::external::InitParams;

/// The contract state.
#[derive(Serial, DeserialWithState, StateClone)]
#[concordium(state_parameter = "S")]
pub struct State<S: HasStateApi> {
    /// Addresses authorized to update and maintain the contract.
    pub authority: Authority<S>,
    /// Latest published round.
    pub round: RoundData,
}

impl<S: HasStateApi> State<S> {
    /// Creates a new state with round 1 published at `now`.
    pub fn new(
        state_builder: &mut StateBuilder<S>,
        params: InitParams,
        origin: AccountAddress,
        now: Timestamp,
    ) -> Self {
        Self {
            authority: Authority::new(state_builder, Address::Account(origin)),
            round: RoundData {
                round_id: 1,
                answer: params.answer,
                decimals: params.decimals,
                started_at: now,
                updated_at: now,
            },
        }
    }

    /// Opens the next round with `answer`.
    pub fn publish(&mut self, answer: u64, now: Timestamp) -> Result<&RoundData, CustomContractError> {
        ensure!(answer != 0, CustomContractError::PriceUnavailable);

        self.round.round_id = self
            .round
            .round_id
            .checked_add(1)
            .ok_or(CustomContractError::Overflow)?;
        self.round.answer = answer;
        self.round.started_at = now;
        self.round.updated_at = now;

        Ok(&self.round)
    }
}
