use super::*;

#[derive(Debug, Serialize, SchemaType)]
pub struct MintParams {
    /// Account or contract receiving the token.
    pub owner: Address,
    pub token_id: ContractTokenId,
    /// Location of the CIS-2 token metadata json.
    pub metadata_url: String,
}

/// The contract state.
#[derive(Serial, DeserialWithState, StateClone)]
#[concordium(state_parameter = "S")]
pub struct State<S: HasStateApi> {
    /// Addresses authorized to update and maintain the contract.
    pub authority: Authority<S>,
    /// Owner of every minted token.
    pub owners: StateMap<ContractTokenId, Address, S>,
    /// Operators for each address.
    pub operators: StateMap<Address, StateSet<Address, S>, S>,
}
