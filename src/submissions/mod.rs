//! Regulatory submission administration: the authorization-requirement
//! pipeline that gates every operation, the derivation engine that keeps
//! inventory and site lifecycle state honest, and the notification fan-out
//! their transitions trigger.

pub mod authz;
pub mod context;
pub mod domain;
pub mod memory;
pub mod notify;
pub mod router;
pub mod service;
pub mod status;
pub mod store;

#[cfg(test)]
mod tests;

pub use authz::{
    policies, AuthzError, FailureCode, FailureKind, PolicyEvaluator, Requirement,
    RequirementFailure,
};
pub use context::{ContextError, Identity, RequestContext};
pub use domain::{
    AccessLevel, Account, CompletenessSnapshot, Contact, ContactType, Inventory, InventoryStatus,
    Notification, NotificationEvent, NotificationReceipt, ResourceId, Site, SiteStatus, Well,
    PAYMENT_SUB_CLASSES, SER_SUB_CLASS,
};
pub use memory::InMemoryResourceStore;
pub use notify::NotificationDispatcher;
pub use router::submission_router;
pub use service::{
    AccountPatch, AccountProfile, InventoryAnnotation, InventoryPatch, NewContact, NewInventory,
    NewSite, NewWell, NotificationView, ServiceError, SitePatch, SubmissionService, WellPatch,
};
pub use store::{ResourceStore, StoreError};
