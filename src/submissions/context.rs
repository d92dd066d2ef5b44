use super::domain::{Account, Inventory, NotificationReceipt, Site, Well};

/// Identity claim carried by an inbound operation, as resolved by whatever
/// authentication layer fronts the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Anonymous,
    Claims { external_id: Option<String> },
}

impl Identity {
    pub fn with_external_id(external_id: impl Into<String>) -> Self {
        Self::Claims {
            external_id: Some(external_id.into()),
        }
    }
}

/// Raised when a handler reads a context field its policy never resolved.
/// This is a policy-authoring defect (an ownership requirement missing or out
/// of order), surfaced as an internal error rather than a user-facing one.
#[derive(Debug, thiserror::Error)]
#[error("request context field '{0}' was not resolved by the policy")]
pub struct ContextError(pub &'static str);

/// Per-request resolution cache. Early requirements write the entities they
/// load; later requirements and the handler read them back without another
/// store round-trip. One instance per inbound operation, never shared.
#[derive(Debug)]
pub struct RequestContext {
    pub identity: Identity,
    pub account: Option<Account>,
    pub site: Option<Site>,
    pub inventory: Option<Inventory>,
    pub well: Option<Well>,
    pub receipt: Option<NotificationReceipt>,
}

impl RequestContext {
    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            account: None,
            site: None,
            inventory: None,
            well: None,
            receipt: None,
        }
    }

    pub fn account(&self) -> Result<&Account, ContextError> {
        self.account.as_ref().ok_or(ContextError("account"))
    }

    pub fn site(&self) -> Result<&Site, ContextError> {
        self.site.as_ref().ok_or(ContextError("site"))
    }

    pub fn inventory(&self) -> Result<&Inventory, ContextError> {
        self.inventory.as_ref().ok_or(ContextError("inventory"))
    }

    pub fn well(&self) -> Result<&Well, ContextError> {
        self.well.as_ref().ok_or(ContextError("well"))
    }

    pub fn receipt(&self) -> Result<&NotificationReceipt, ContextError> {
        self.receipt.as_ref().ok_or(ContextError("receipt"))
    }
}
