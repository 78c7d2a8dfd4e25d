use super::*;

/// The custom errors the contracts can produce.
#[derive(Serialize, Debug, PartialEq, Eq, Reject, SchemaType)]
pub enum CustomContractError {
    /// Failed parsing the parameter (Error code: -1).
    #[from(ParseError)]
    ParseParams,
    /// Failed logging: Log is full (Error code: -2).
    LogFull,
    /// Failed logging: Log is malformed (Error code: -3).
    LogMalformed,
    /// Failed to invoke a contract (Error code: -4).
    InvokeContractError,
    /// Failed to invoke a transfer (Error code: -5).
    InvokeTransferError,
    /// Unauthorized (Error code: -6)
    Unauthorized,
    /// Invoked contract does not speak the expected protocol (Error code: -7)
    Incompatible,
    /// Only account addresses can sell or buy (Error code: -8).
    OnlyAccountAddress,
    /// Failing to mint a token because its ID already exists
    /// in this contract (Error code: -9).
    TokenIdAlreadyExists,
    /// Not Found (Error code: -10)
    NotFound,
    /// End price is above the start price (Error code: -11)
    InvalidPriceRange,
    /// Auction duration is shorter than one second (Error code: -12)
    InvalidDuration,
    /// Auction was already sold or cancelled (Error code: -13)
    AuctionInactive,
    /// Attached amount is below the current price (Error code: -14)
    InsufficientPayment,
    /// Seller does not hold the token (Error code: -15)
    NotTokenOwner,
    /// Auction contract is not an operator of the seller (Error code: -16)
    NotApproved,
    /// Owner is not allowed to perform this action (Error code: -17)
    OwnerForbidden,
    /// Oracle round is older than the allowed age (Error code: -18)
    StalePrice,
    /// Oracle has no usable rate (Error code: -19)
    PriceUnavailable,
    /// Arithmetic overflow (Error code: -20)
    Overflow,
    /// Token is already in an active auction (Error code: -21)
    AlreadyListed,
}

/// Mapping the logging errors to CustomContractError.
impl From<LogError> for CustomContractError {
    fn from(le: LogError) -> Self {
        match le {
            LogError::Full => Self::LogFull,
            LogError::Malformed => Self::LogMalformed,
        }
    }
}

/// Mapping errors related to contract invocations to CustomContractError.
impl<T> From<CallContractError<T>> for CustomContractError {
    fn from(_cce: CallContractError<T>) -> Self {
        Self::InvokeContractError
    }
}

/// Mapping CustomContractError to ContractError
impl From<CustomContractError> for ContractError {
    fn from(c: CustomContractError) -> Self {
        Cis2Error::Custom(c)
    }
}

/// Mapping errors related to transfers to CustomContractError.
impl From<TransferError> for CustomContractError {
    fn from(_te: TransferError) -> Self {
        Self::InvokeTransferError
    }
}

/// Failure of a read-only call into another contract.
#[derive(Debug)]
pub enum ContractReadError<R> {
    /// The call itself failed.
    Call(CallContractError<R>),
    /// The callee returned nothing.
    Compatibility,
    /// The return value could not be parsed.
    Parse,
}

#[concordium_cfg_test]
mod tests {
    use super::*;

    #[concordium_test]
    fn test_error_codes() {
        claim_eq!(Reject::from(CustomContractError::ParseParams).error_code.get(), -1);
        claim_eq!(Reject::from(CustomContractError::Unauthorized).error_code.get(), -6);
        claim_eq!(Reject::from(CustomContractError::NotFound).error_code.get(), -10);
        claim_eq!(Reject::from(CustomContractError::StalePrice).error_code.get(), -18);
        claim_eq!(Reject::from(CustomContractError::Overflow).error_code.get(), -20);
        claim_eq!(Reject::from(CustomContractError::AlreadyListed).error_code.get(), -21);
    }

    #[concordium_test]
    fn test_log_error_mapping() {
        claim_eq!(
            CustomContractError::from(LogError::Full),
            CustomContractError::LogFull
        );
        claim_eq!(
            CustomContractError::from(LogError::Malformed),
            CustomContractError::LogMalformed
        );
    }
}
