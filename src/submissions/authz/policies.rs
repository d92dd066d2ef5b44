//! Operation-to-policy registry. Each operation type declares its ordered
//! requirement chain here, parameterized by the fields of the incoming
//! command. Ownership requirements always precede the status and privilege
//! requirements that read the entities they resolve.

use super::super::domain::{InventoryStatus, ResourceId};
use super::Requirement;

/// Statuses during which an accountholder may still edit inventory content.
const EDITABLE: &[InventoryStatus] = &[InventoryStatus::Incomplete, InventoryStatus::Complete];

const AUTHORIZED: &[InventoryStatus] = &[InventoryStatus::Authorized];

pub fn update_account(account_id: ResourceId) -> Vec<Requirement> {
    vec![
        Requirement::MustHaveAccount,
        Requirement::MustOwnAccount { account_id },
    ]
}

pub fn promote_account(account_id: ResourceId) -> Vec<Requirement> {
    vec![
        Requirement::MustHaveAccount,
        Requirement::MustHaveElevatedAccount,
        Requirement::MustOwnAccount { account_id },
    ]
}

pub fn deactivate_account(account_id: ResourceId) -> Vec<Requirement> {
    vec![
        Requirement::MustHaveAccount,
        Requirement::MustOwnAccount { account_id },
    ]
}

pub fn create_site() -> Vec<Requirement> {
    vec![
        Requirement::MustHaveAccount,
        Requirement::MustHaveCompleteProfile,
    ]
}

pub fn update_site(site_id: ResourceId) -> Vec<Requirement> {
    vec![
        Requirement::MustHaveAccount,
        Requirement::MustOwnSite { site_id },
    ]
}

pub fn submit_site(site_id: ResourceId) -> Vec<Requirement> {
    vec![
        Requirement::MustHaveAccount,
        Requirement::MustOwnSite { site_id },
        Requirement::MustHaveCompleteSite,
    ]
}

pub fn authorize_site(site_id: ResourceId) -> Vec<Requirement> {
    vec![
        Requirement::MustHaveAccount,
        Requirement::MustHaveElevatedAccount,
        Requirement::MustOwnSite { site_id },
    ]
}

pub fn ingest_site(site_id: ResourceId) -> Vec<Requirement> {
    vec![
        Requirement::MustHaveAccount,
        Requirement::MustHaveElevatedAccount,
        Requirement::MustOwnSite { site_id },
    ]
}

pub fn add_contact(site_id: ResourceId) -> Vec<Requirement> {
    vec![
        Requirement::MustHaveAccount,
        Requirement::MustOwnSite { site_id },
    ]
}

pub fn remove_contact(site_id: ResourceId) -> Vec<Requirement> {
    vec![
        Requirement::MustHaveAccount,
        Requirement::MustOwnSite { site_id },
    ]
}

pub fn create_inventory(site_id: ResourceId) -> Vec<Requirement> {
    vec![
        Requirement::MustHaveAccount,
        Requirement::MustOwnSite { site_id },
        Requirement::MustHaveCompleteProfile,
    ]
}

pub fn view_inventory(inventory_id: ResourceId) -> Vec<Requirement> {
    vec![
        Requirement::MustHaveAccount,
        Requirement::MustOwnInventory { inventory_id },
    ]
}

pub fn update_inventory(inventory_id: ResourceId) -> Vec<Requirement> {
    vec![
        Requirement::MustHaveAccount,
        Requirement::MustOwnInventory { inventory_id },
        Requirement::MustHaveInventoryStatus { expected: EDITABLE },
    ]
}

pub fn annotate_inventory(inventory_id: ResourceId) -> Vec<Requirement> {
    vec![
        Requirement::MustHaveAccount,
        Requirement::MustHaveElevatedAccount,
        Requirement::MustOwnInventory { inventory_id },
    ]
}

pub fn submit_inventory(inventory_id: ResourceId) -> Vec<Requirement> {
    vec![
        Requirement::MustHaveAccount,
        Requirement::MustOwnInventory { inventory_id },
        Requirement::MustHaveCompleteInventory,
    ]
}

pub fn review_inventory(inventory_id: ResourceId) -> Vec<Requirement> {
    vec![
        Requirement::MustHaveAccount,
        Requirement::MustHaveElevatedAccount,
        Requirement::MustOwnInventory { inventory_id },
        Requirement::MustHaveReviewableInventory,
    ]
}

pub fn approve_inventory(inventory_id: ResourceId) -> Vec<Requirement> {
    vec![
        Requirement::MustHaveAccount,
        Requirement::MustHaveElevatedAccount,
        Requirement::MustOwnInventory { inventory_id },
        Requirement::MustHaveReviewableInventory,
        Requirement::MustHaveNoFlaggedIssues,
        Requirement::MustHaveInventoryAdminAdditions,
    ]
}

/// Rejection deliberately carries its own policy instead of borrowing the
/// delete policy: staff reject submissions they do not own.
pub fn reject_inventory(inventory_id: ResourceId) -> Vec<Requirement> {
    vec![
        Requirement::MustHaveAccount,
        Requirement::MustHaveElevatedAccount,
        Requirement::MustOwnInventory { inventory_id },
        Requirement::MustHaveReviewableInventory,
    ]
}

pub fn authorize_inventory(inventory_id: ResourceId) -> Vec<Requirement> {
    vec![
        Requirement::MustHaveAccount,
        Requirement::MustHaveElevatedAccount,
        Requirement::MustOwnInventory { inventory_id },
        Requirement::MustHaveApprovedInventory,
    ]
}

pub fn complete_inventory(inventory_id: ResourceId) -> Vec<Requirement> {
    vec![
        Requirement::MustHaveAccount,
        Requirement::MustHaveElevatedAccount,
        Requirement::MustOwnInventory { inventory_id },
        Requirement::MustHaveInventoryStatus {
            expected: AUTHORIZED,
        },
    ]
}

pub fn delete_inventory(inventory_id: ResourceId) -> Vec<Requirement> {
    vec![
        Requirement::MustHaveAccount,
        Requirement::MustOwnInventory { inventory_id },
        Requirement::MustHaveInventoryStatus { expected: EDITABLE },
    ]
}

pub fn create_well(inventory_id: ResourceId) -> Vec<Requirement> {
    vec![
        Requirement::MustHaveAccount,
        Requirement::MustOwnInventory { inventory_id },
        Requirement::MustHaveInventoryStatus { expected: EDITABLE },
    ]
}

pub fn update_well(well_id: ResourceId) -> Vec<Requirement> {
    vec![
        Requirement::MustHaveAccount,
        Requirement::MustOwnWell { well_id },
    ]
}

pub fn delete_well(well_id: ResourceId) -> Vec<Requirement> {
    vec![
        Requirement::MustHaveAccount,
        Requirement::MustOwnWell { well_id },
        Requirement::MustHaveInventoryStatus { expected: EDITABLE },
    ]
}

pub fn list_notifications() -> Vec<Requirement> {
    vec![Requirement::MustHaveAccount]
}

pub fn read_notification(receipt_id: ResourceId) -> Vec<Requirement> {
    vec![
        Requirement::MustHaveAccount,
        Requirement::MustOwnNotification { receipt_id },
    ]
}

pub fn delete_notification(receipt_id: ResourceId) -> Vec<Requirement> {
    vec![
        Requirement::MustHaveAccount,
        Requirement::MustOwnNotification { receipt_id },
    ]
}
