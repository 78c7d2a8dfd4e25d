use concordium_std::*;

use crate::ContractReadError;

/// Latest answer of a USD/CCD price feed.
#[derive(Debug, Serialize, SchemaType, Clone, Copy, PartialEq, Eq)]
pub struct RoundData {
    /// Sequence number of the round, starting at 1.
    pub round_id: u64,
    /// USD price of one CCD scaled by `10^decimals`.
    pub answer: u64,
    /// Number of decimals in `answer`.
    pub decimals: u8,
    pub started_at: Timestamp,
    pub updated_at: Timestamp,
}

pub trait HostPriceOracleExt<S>: HasHost<S> {
    fn oracle_latest_round_data(
        &self,
        contract: &ContractAddress,
    ) -> Result<RoundData, ContractReadError<Self::ReturnValueType>> {
        let mut result = self
            .invoke_contract_read_only(
                contract,
                &(),
                EntrypointName::new_unchecked("latestRoundData"),
                Amount::zero(),
            )
            .map_err(ContractReadError::Call)?
            .ok_or(ContractReadError::Compatibility)?;

        RoundData::deserial(&mut result).map_err(|_| ContractReadError::Parse)
    }
}

impl<S, H: HasHost<S>> HostPriceOracleExt<S> for H {}
