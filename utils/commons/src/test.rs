//! Mock entrypoints for contract tests. Enable the `test-helpers` feature to
//! use them from another crate.
#[cfg(any(test, feature = "test-helpers"))]
pub use inner::*;

#[cfg(any(test, feature = "test-helpers"))]
mod inner {
    use concordium_std::test_infrastructure::MockFn;
    use concordium_std::*;

    /// Accepts any parameter that parses as `D` and returns `return_value`.
    pub fn parse_and_ok_mock<D: Deserial, S>(
        return_value: impl Clone + Serial + 'static,
    ) -> MockFn<S> {
        MockFn::new(move |parameter, _amount, _balance, _state| {
            D::deserial(&mut Cursor::new(parameter)).map_err(|_| CallContractError::Trap)?;
            Ok((false, Some(return_value.clone())))
        })
    }

    /// Like [parse_and_ok_mock], but traps unless `check` holds for the parameter.
    pub fn parse_and_check_mock<D: Deserial, S>(
        check: impl Fn(&D) -> bool + 'static,
        return_value: impl Clone + Serial + 'static,
    ) -> MockFn<S> {
        MockFn::new(move |parameter, _, _, _state| {
            let value =
                D::deserial(&mut Cursor::new(parameter)).map_err(|_| CallContractError::Trap)?;
            if !check(&value) {
                return Err(CallContractError::Trap);
            };
            Ok((false, Some(return_value.clone())))
        })
    }

    /// Answers with `f` of the parsed parameter, traps when `f` gives `None`.
    pub fn parse_and_map_mock<D: Deserial, T: Serial, S>(
        f: impl Fn(&D) -> Option<T> + 'static,
    ) -> MockFn<S> {
        MockFn::new(move |parameter, _, _, _state| {
            let value =
                D::deserial(&mut Cursor::new(parameter)).map_err(|_| CallContractError::Trap)?;
            f(&value)
                .map(|r| (false, Some(r)))
                .ok_or(CallContractError::Trap)
        })
    }

    /// Rejects with the given error code, as a contract rejecting the call would.
    pub fn reject_mock<S>(reason: i32) -> MockFn<S> {
        MockFn::new(move |_parameter, _, _, _state| {
            Err::<(bool, Option<()>), _>(CallContractError::LogicReject {
                reason,
                return_value: (),
            })
        })
    }
}
