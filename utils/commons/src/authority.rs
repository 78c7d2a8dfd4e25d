use crate::CustomContractError;
use concordium_std::*;

/// Access control shared by all auction contracts.
///
/// Admins may change both lists. Maintainers may only change the maintainer
/// list, and admin rights imply maintainer rights.
#[derive(Debug, Serial, DeserialWithState, StateClone)]
#[concordium(state_parameter = "S")]
pub struct Authority<S: HasStateApi> {
    admins: StateSet<Address, S>,
    maintainers: StateSet<Address, S>,
}

impl<S: HasStateApi> Authority<S> {
    /// Creates the authority with a single admin and no maintainers.
    pub fn new(state_builder: &mut StateBuilder<S>, admin: Address) -> Self {
        let mut admins = state_builder.new_set();
        admins.insert(admin);
        Self {
            admins,
            maintainers: state_builder.new_set(),
        }
    }

    pub fn has_admin_rights(&self, address: &Address) -> bool {
        self.admins.contains(address)
    }

    pub fn has_maintainer_rights(&self, address: &Address) -> bool {
        self.maintainers.contains(address) || self.has_admin_rights(address)
    }

    /// Applies `update` on behalf of `sender`. Adding a present address or
    /// removing a missing one is a no-op.
    pub fn handle_update(
        &mut self,
        sender: Address,
        update: AuthorityUpdateParams,
    ) -> Result<(), CustomContractError> {
        let allowed = match update.field {
            AuthorityField::Maintainer => self.has_maintainer_rights(&sender),
            AuthorityField::Admin => self.has_admin_rights(&sender),
        };
        ensure!(allowed, CustomContractError::Unauthorized);

        let list = match update.field {
            AuthorityField::Maintainer => &mut self.maintainers,
            AuthorityField::Admin => &mut self.admins,
        };

        match update.kind {
            AuthorityUpdateKind::Remove => {
                list.remove(&update.address);
            }
            AuthorityUpdateKind::Add => {
                list.insert(update.address);
            }
        }

        Ok(())
    }

    pub fn handle_view(&self, view: AuthorityViewParams) -> Vec<Address> {
        let list = match view.field {
            AuthorityField::Maintainer => &self.maintainers,
            AuthorityField::Admin => &self.admins,
        };

        list.iter()
            .skip(view.skip as usize)
            .take(view.show as usize)
            .map(|a| *a)
            .collect()
    }
}

#[derive(Debug, SchemaType, Serialize)]
pub enum AuthorityField {
    Maintainer,
    Admin,
}

#[derive(Debug, SchemaType, Serialize)]
pub enum AuthorityUpdateKind {
    Remove,
    Add,
}

#[derive(Debug, SchemaType, Serialize)]
pub struct AuthorityUpdateParams {
    pub field: AuthorityField,
    pub kind: AuthorityUpdateKind,
    pub address: Address,
}

#[derive(Debug, SchemaType, Serialize)]
pub struct AuthorityViewParams {
    pub field: AuthorityField,
    pub skip: u32,
    pub show: u32,
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use concordium_std::test_infrastructure::*;

    const ADMIN: AccountAddress = AccountAddress([1; 32]);
    const MAINTAINER: AccountAddress = AccountAddress([2; 32]);
    const MARKET: ContractAddress = ContractAddress {
        index: 7,
        subindex: 0,
    };
    const STRANGER: AccountAddress = AccountAddress([16; 32]);

    fn default_authority() -> Authority<TestStateApi> {
        let mut state_builder = TestStateBuilder::new();
        let mut authority = Authority::new(&mut state_builder, Address::Account(ADMIN));
        authority.maintainers.insert(Address::Account(MAINTAINER));
        authority
    }

    fn update(
        field: AuthorityField,
        kind: AuthorityUpdateKind,
        address: Address,
    ) -> AuthorityUpdateParams {
        AuthorityUpdateParams {
            field,
            kind,
            address,
        }
    }

    #[concordium_test]
    fn test_admin_adds_admin_and_maintainer() {
        let mut authority = default_authority();

        let result = authority.handle_update(
            Address::Account(ADMIN),
            update(
                AuthorityField::Admin,
                AuthorityUpdateKind::Add,
                Address::Contract(MARKET),
            ),
        );
        claim_eq!(result, Ok(()));
        claim!(authority.has_admin_rights(&Address::Contract(MARKET)));
        claim!(authority.has_maintainer_rights(&Address::Contract(MARKET)));

        let result = authority.handle_update(
            Address::Account(ADMIN),
            update(
                AuthorityField::Maintainer,
                AuthorityUpdateKind::Add,
                Address::Account(STRANGER),
            ),
        );
        claim_eq!(result, Ok(()));
        claim!(!authority.has_admin_rights(&Address::Account(STRANGER)));
        claim!(authority.has_maintainer_rights(&Address::Account(STRANGER)));
    }

    #[concordium_test]
    fn test_maintainer_cannot_touch_admins() {
        let mut authority = default_authority();

        let result = authority.handle_update(
            Address::Account(MAINTAINER),
            update(
                AuthorityField::Admin,
                AuthorityUpdateKind::Add,
                Address::Account(STRANGER),
            ),
        );
        claim_eq!(result, Err(CustomContractError::Unauthorized));
        claim!(!authority.has_admin_rights(&Address::Account(STRANGER)));

        let result = authority.handle_update(
            Address::Account(MAINTAINER),
            update(
                AuthorityField::Admin,
                AuthorityUpdateKind::Remove,
                Address::Account(ADMIN),
            ),
        );
        claim_eq!(result, Err(CustomContractError::Unauthorized));
        claim!(authority.has_admin_rights(&Address::Account(ADMIN)));
    }

    #[concordium_test]
    fn test_maintainer_manages_maintainers() {
        let mut authority = default_authority();

        let result = authority.handle_update(
            Address::Account(MAINTAINER),
            update(
                AuthorityField::Maintainer,
                AuthorityUpdateKind::Add,
                Address::Contract(MARKET),
            ),
        );
        claim_eq!(result, Ok(()));
        claim!(authority.has_maintainer_rights(&Address::Contract(MARKET)));

        // Removing itself is allowed
        let result = authority.handle_update(
            Address::Account(MAINTAINER),
            update(
                AuthorityField::Maintainer,
                AuthorityUpdateKind::Remove,
                Address::Account(MAINTAINER),
            ),
        );
        claim_eq!(result, Ok(()));
        claim!(!authority.has_maintainer_rights(&Address::Account(MAINTAINER)));
    }

    #[concordium_test]
    fn test_stranger_is_rejected() {
        let mut authority = default_authority();

        let result = authority.handle_update(
            Address::Account(STRANGER),
            update(
                AuthorityField::Maintainer,
                AuthorityUpdateKind::Add,
                Address::Account(STRANGER),
            ),
        );
        claim_eq!(result, Err(CustomContractError::Unauthorized));
        claim!(!authority.has_maintainer_rights(&Address::Account(STRANGER)));
    }

    #[concordium_test]
    fn test_remove_missing_is_noop() {
        let mut authority = default_authority();

        let result = authority.handle_update(
            Address::Account(ADMIN),
            update(
                AuthorityField::Maintainer,
                AuthorityUpdateKind::Remove,
                Address::Account(STRANGER),
            ),
        );
        claim_eq!(result, Ok(()));
        claim!(authority.has_maintainer_rights(&Address::Account(MAINTAINER)));
    }

    #[concordium_test]
    fn test_view_pages_through_admins() {
        let mut authority = default_authority();

        let mut expected = (16u8..=120u8)
            .map(|n| Address::Account(AccountAddress([n; 32])))
            .chain([Address::Account(ADMIN)])
            .collect::<Vec<_>>();
        for admin in expected.iter() {
            authority.admins.insert(*admin);
        }

        let mut seen = Vec::new();
        let show = 25;
        loop {
            let page = authority.handle_view(AuthorityViewParams {
                field: AuthorityField::Admin,
                skip: seen.len() as u32,
                show,
            });
            let last = page.len() < show as usize;
            seen.extend(page);
            if last {
                break;
            }
        }

        claim_eq!(seen.len(), expected.len());
        expected.retain(|a| !seen.contains(a));
        claim!(expected.is_empty(), "Every admin should be listed once");

        let maintainers = authority.handle_view(AuthorityViewParams {
            field: AuthorityField::Maintainer,
            skip: 0,
            show: 10,
        });
        claim_eq!(maintainers, vec![Address::Account(MAINTAINER)]);
    }
}
