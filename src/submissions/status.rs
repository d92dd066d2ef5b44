//! Pure derivation of completeness and lifecycle state. Nothing in this
//! module touches the store; callers hand in the live child records and
//! persist whatever comes back together with the triggering mutation.

use super::domain::{
    Contact, Inventory, InventoryStatus, SiteStatus, Well, PAYMENT_SUB_CLASSES,
};

pub use super::domain::CompletenessSnapshot;

/// Every well placed, described, and quantified. False with zero wells.
pub fn location_complete(wells: &[Well]) -> bool {
    !wells.is_empty()
        && wells.iter().all(|well| {
            !well.name.is_empty()
                && !well.operating_status.is_empty()
                && well.quantity > 0
                && !well.geometry.is_empty()
        })
}

/// Construction details on every well; a remediation inventory additionally
/// needs injectate characterization on at least one of its remediation wells.
pub fn well_details_complete(wells: &[Well]) -> bool {
    if wells.is_empty() {
        return false;
    }
    if !wells
        .iter()
        .all(|well| !well.construction_details.is_empty())
    {
        return false;
    }

    let remediation_wells: Vec<&Well> = wells.iter().filter(|well| well.is_remediation()).collect();
    remediation_wells.is_empty()
        || remediation_wells
            .iter()
            .any(|well| !well.injectate_characterization.is_empty())
}

/// A fee order number inside the processing window, for a fee-eligible
/// subclass.
pub fn payment_complete(inventory: &Inventory) -> bool {
    let order_in_window = matches!(inventory.order_number, Some(n) if (1_000_000..=9_999_999).contains(&n));
    order_in_window && PAYMENT_SUB_CLASSES.contains(&inventory.sub_class)
}

pub fn signature_complete(inventory: &Inventory) -> bool {
    !inventory.signature.is_empty()
}

/// At least one contact in a role that can speak for the site.
pub fn site_contacts_complete(contacts: &[Contact]) -> bool {
    contacts
        .iter()
        .any(|contact| contact.contact_type.qualifies_for_site())
}

impl CompletenessSnapshot {
    pub fn assess(inventory: &Inventory, wells: &[Well], contacts: &[Contact]) -> Self {
        Self {
            details: well_details_complete(wells),
            contacts: site_contacts_complete(contacts),
            location: location_complete(wells),
            payment: payment_complete(inventory),
            signature: signature_complete(inventory),
        }
    }
}

/// Lifecycle derivation for an inventory. Only ever moves between
/// `Incomplete` and `Complete`; every later status belongs to the explicit,
/// policy-gated operations and passes through unchanged.
pub fn derive_inventory_status(
    current: InventoryStatus,
    snapshot: &CompletenessSnapshot,
) -> InventoryStatus {
    if current.has_reached(InventoryStatus::Submitted) {
        return current;
    }
    if snapshot.contacts && snapshot.details && snapshot.location {
        InventoryStatus::Complete
    } else {
        InventoryStatus::Incomplete
    }
}

/// Site analog of [`derive_inventory_status`]: contact coverage alone decides
/// between the two pre-submission states.
pub fn derive_site_status(current: SiteStatus, contacts: &[Contact]) -> SiteStatus {
    if current >= SiteStatus::Submitted {
        return current;
    }
    if site_contacts_complete(contacts) {
        SiteStatus::Complete
    } else {
        SiteStatus::Incomplete
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submissions::domain::{ContactType, ResourceId, SER_SUB_CLASS};

    fn well(sub_class: i32) -> Well {
        Well {
            id: ResourceId(1),
            account_id: ResourceId(1),
            inventory_id: ResourceId(1),
            name: "MW-1".to_string(),
            operating_status: "AC".to_string(),
            quantity: 3,
            geometry: "{\"type\":\"Point\",\"coordinates\":[-111.9,40.7]}".to_string(),
            construction_details: "cased to 80ft".to_string(),
            injectate_characterization: String::new(),
            sub_class,
        }
    }

    fn inventory(sub_class: i32) -> Inventory {
        Inventory {
            id: ResourceId(1),
            account_id: ResourceId(1),
            site_id: ResourceId(1),
            status: InventoryStatus::Incomplete,
            sub_class,
            order_number: Some(2_000_000),
            signature: "J. Operator".to_string(),
            flagged: String::new(),
            edocs: String::new(),
            completeness: CompletenessSnapshot::default(),
        }
    }

    fn contact(contact_type: ContactType) -> Contact {
        Contact {
            id: ResourceId(1),
            site_id: ResourceId(1),
            name: "Casey Operator".to_string(),
            email: "casey@example.com".to_string(),
            contact_type,
        }
    }

    #[test]
    fn location_requires_at_least_one_well() {
        assert!(!location_complete(&[]));
        assert!(location_complete(&[well(-1)]));
    }

    #[test]
    fn location_fails_on_any_unplaced_well() {
        let mut second = well(-1);
        second.geometry.clear();
        assert!(!location_complete(&[well(-1), second]));

        let mut zero_quantity = well(-1);
        zero_quantity.quantity = 0;
        assert!(!location_complete(&[well(-1), zero_quantity]));
    }

    #[test]
    fn details_require_construction_on_every_well() {
        let mut bare = well(-1);
        bare.construction_details.clear();
        assert!(!well_details_complete(&[well(-1), bare]));
        assert!(well_details_complete(&[well(-1)]));
    }

    #[test]
    fn remediation_wells_need_one_characterization() {
        let plain = well(-1);
        let mut ser = well(SER_SUB_CLASS);
        assert!(!well_details_complete(&[plain.clone(), ser.clone()]));

        ser.injectate_characterization = "chlorinated solvents, 2 gpm".to_string();
        assert!(well_details_complete(&[plain, ser.clone()]));

        // Removing the only characterization flips the flag back off.
        ser.injectate_characterization.clear();
        assert!(!well_details_complete(&[ser]));
    }

    #[test]
    fn payment_needs_order_in_window_and_eligible_subclass() {
        let mut inv = inventory(-1);
        assert!(payment_complete(&inv));

        inv.order_number = Some(999_999);
        assert!(!payment_complete(&inv));

        inv.order_number = Some(9_999_999);
        assert!(payment_complete(&inv));

        inv.order_number = Some(10_000_000);
        assert!(!payment_complete(&inv));

        inv.order_number = None;
        assert!(!payment_complete(&inv));

        let mut wrong_class = inventory(4242);
        wrong_class.order_number = Some(2_000_000);
        assert!(!payment_complete(&wrong_class));
    }

    #[test]
    fn qualifying_contact_types_drive_site_coverage() {
        assert!(!site_contacts_complete(&[]));
        assert!(!site_contacts_complete(&[contact(ContactType::Consultant)]));
        assert!(site_contacts_complete(&[
            contact(ContactType::Consultant),
            contact(ContactType::LegalRep),
        ]));
    }

    #[test]
    fn derivation_only_moves_between_incomplete_and_complete() {
        let ready = CompletenessSnapshot {
            details: true,
            contacts: true,
            location: true,
            payment: false,
            signature: false,
        };
        assert_eq!(
            derive_inventory_status(InventoryStatus::Incomplete, &ready),
            InventoryStatus::Complete
        );

        let missing_contacts = CompletenessSnapshot {
            contacts: false,
            ..ready
        };
        assert_eq!(
            derive_inventory_status(InventoryStatus::Complete, &missing_contacts),
            InventoryStatus::Incomplete
        );

        // Submitted and beyond are untouchable by derivation.
        for status in [
            InventoryStatus::Submitted,
            InventoryStatus::UnderReview,
            InventoryStatus::Approved,
            InventoryStatus::Authorized,
            InventoryStatus::Completed,
        ] {
            assert_eq!(derive_inventory_status(status, &missing_contacts), status);
        }
    }

    #[test]
    fn aggregate_ignores_payment_and_signature() {
        let unpaid_unsigned = CompletenessSnapshot {
            details: true,
            contacts: true,
            location: true,
            payment: false,
            signature: false,
        };
        assert_eq!(
            derive_inventory_status(InventoryStatus::Incomplete, &unpaid_unsigned),
            InventoryStatus::Complete
        );
    }

    #[test]
    fn site_status_follows_contact_coverage_before_submission() {
        let qualifying = [contact(ContactType::OwnerOperator)];
        assert_eq!(
            derive_site_status(SiteStatus::Incomplete, &qualifying),
            SiteStatus::Complete
        );
        assert_eq!(
            derive_site_status(SiteStatus::Complete, &[]),
            SiteStatus::Incomplete
        );
        assert_eq!(
            derive_site_status(SiteStatus::Authorized, &[]),
            SiteStatus::Authorized
        );
    }

    #[test]
    fn snapshot_assess_bundles_all_five_items() {
        let inv = inventory(SER_SUB_CLASS);
        let mut ser = well(SER_SUB_CLASS);
        ser.injectate_characterization = "diluted brine".to_string();
        let contacts = [contact(ContactType::FacilityOwner)];

        let snapshot = CompletenessSnapshot::assess(&inv, &[ser], &contacts);
        assert!(snapshot.details);
        assert!(snapshot.contacts);
        assert!(snapshot.location);
        assert!(snapshot.payment);
        assert!(snapshot.signature);
    }
}
