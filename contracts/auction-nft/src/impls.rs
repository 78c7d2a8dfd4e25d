use super::*;
use core::ops::DerefMut;

// Functions for creating, updating and querying the contract state.
impl<S: HasStateApi> State<S> {
    /// Creates a state with no tokens and `origin` as the only admin.
    pub fn new(state_builder: &mut StateBuilder<S>, origin: AccountAddress) -> Self {
        State {
            authority: Authority::new(state_builder, Address::Account(origin)),
            owners: state_builder.new_map(),
            operators: state_builder.new_map(),
        }
    }

    /// Mint a new token with a given address as the owner.
    pub fn mint(&mut self, token_id: ContractTokenId, owner: Address) -> ContractResult<()> {
        ensure!(
            self.owners.insert(token_id, owner).is_none(),
            CustomContractError::TokenIdAlreadyExists.into()
        );
        Ok(())
    }

    /// Check that the token ID currently exists in this contract.
    #[inline(always)]
    fn contains_token(&self, token_id: &ContractTokenId) -> bool {
        self.owners.get(token_id).is_some()
    }

    /// Get the current balance of a given token ID for a given address.
    /// Results in an error if the token ID does not exist in the state.
    pub fn balance(
        &self,
        token_id: &ContractTokenId,
        address: &Address,
    ) -> ContractResult<ContractTokenAmount> {
        let owner = self.owners.get(token_id).ok_or(ContractError::InvalidTokenId)?;
        Ok(if *owner == *address { 1.into() } else { 0.into() })
    }

    /// Check if a given address is an operator of a given owner address.
    pub fn is_operator(&self, owner: &Address, address: &Address) -> bool {
        self.operators
            .get(owner)
            .map(|operators| operators.contains(address))
            .unwrap_or(false)
    }

    /// Update the state with a transfer of some token.
    /// Results in an error if the token ID does not exist in the state or if
    /// the from address does not hold the token.
    pub fn transfer(
        &mut self,
        transfer: &Transfer<ContractTokenId, ContractTokenAmount>,
    ) -> ContractResult<()> {
        ensure!(
            self.contains_token(&transfer.token_id),
            ContractError::InvalidTokenId
        );

        // A zero transfer does not modify the state.
        if transfer.amount == 0.into() {
            return Ok(());
        }

        // Only one unit of each token exists.
        ensure!(
            transfer.amount == 1.into(),
            ContractError::InsufficientFunds
        );

        let mut owner = self
            .owners
            .get_mut(&transfer.token_id)
            .ok_or(ContractError::InvalidTokenId)?;
        ensure!(*owner == transfer.from, ContractError::InsufficientFunds);
        *owner = transfer.to.address();

        Ok(())
    }

    /// Update the state adding a new operator for a given address.
    /// Succeeds even if the `operator` is already an operator for the
    /// `address`.
    pub fn add_operator(
        &mut self,
        owner: &Address,
        operator: &Address,
        state_builder: &mut StateBuilder<S>,
    ) {
        self.operators
            .entry(*owner)
            .or_insert_with(|| state_builder.new_set())
            .deref_mut()
            .insert(*operator);
    }

    /// Update the state removing an operator for a given address.
    /// Succeeds even if the `operator` is _not_ an operator for the `address`.
    pub fn remove_operator(&mut self, owner: &Address, operator: &Address) {
        self.operators
            .get_mut(owner)
            .map(|mut operators| operators.remove(operator));
    }
}
