use concordium_cis2::*;
use concordium_std::*;

use crate::{
    ContractBalanceOfQueryParams, ContractBalanceOfQueryResponse, ContractReadError,
    ContractTokenAmount, ContractTokenId, TransferParameter,
};

/// Calls into a CIS-2 token contract.
pub trait HostCis2Ext<S>: HasHost<S> {
    /// Balance of `token_id` held by `owner`.
    fn cis2_balance_of(
        &self,
        contract: &ContractAddress,
        token_id: ContractTokenId,
        owner: Address,
    ) -> Result<ContractTokenAmount, ContractReadError<Self::ReturnValueType>> {
        let params = ContractBalanceOfQueryParams {
            queries: vec![BalanceOfQuery {
                token_id,
                address: owner,
            }],
        };

        let mut result = self
            .invoke_contract_read_only(
                contract,
                &params,
                EntrypointName::new_unchecked("balanceOf"),
                Amount::zero(),
            )
            .map_err(ContractReadError::Call)?
            .ok_or(ContractReadError::Compatibility)?;

        let BalanceOfQueryResponse(balances) = ContractBalanceOfQueryResponse::deserial(&mut result)
            .map_err(|_| ContractReadError::Parse)?;

        balances
            .first()
            .copied()
            .ok_or(ContractReadError::Compatibility)
    }

    /// Whether `operator` may transfer tokens of `owner`.
    fn cis2_operator_of(
        &self,
        contract: &ContractAddress,
        owner: Address,
        operator: Address,
    ) -> Result<bool, ContractReadError<Self::ReturnValueType>> {
        let params = OperatorOfQueryParams {
            queries: vec![OperatorOfQuery {
                owner,
                address: operator,
            }],
        };

        let mut result = self
            .invoke_contract_read_only(
                contract,
                &params,
                EntrypointName::new_unchecked("operatorOf"),
                Amount::zero(),
            )
            .map_err(ContractReadError::Call)?
            .ok_or(ContractReadError::Compatibility)?;

        let OperatorOfQueryResponse(answers) =
            OperatorOfQueryResponse::deserial(&mut result).map_err(|_| ContractReadError::Parse)?;

        answers
            .first()
            .copied()
            .ok_or(ContractReadError::Compatibility)
    }

    /// Moves a single unit of `token_id` from `from` to the account `to`.
    fn cis2_transfer(
        &mut self,
        contract: &ContractAddress,
        token_id: ContractTokenId,
        from: Address,
        to: AccountAddress,
    ) -> Result<(), CallContractError<Self::ReturnValueType>> {
        let transfer = Transfer {
            token_id,
            amount: ContractTokenAmount::from(1),
            from,
            to: Receiver::from_account(to),
            data: AdditionalData::empty(),
        };

        self.invoke_contract(
            contract,
            &TransferParameter::from(vec![transfer]),
            EntrypointName::new_unchecked("transfer"),
            Amount::zero(),
        )?;

        Ok(())
    }
}

impl<S, H: HasHost<S>> HostCis2Ext<S> for H {}
