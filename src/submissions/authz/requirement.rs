use super::super::domain::{InventoryStatus, ResourceId};

/// Closed set of authorization predicates. Policies are ordered slices of
/// these; the evaluator runs them front to back and stops at the first
/// failure. Ownership variants resolve their target into the request context
/// for everything that runs after them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    MustHaveAccount,
    MustOwnAccount { account_id: ResourceId },
    MustOwnSite { site_id: ResourceId },
    MustOwnInventory { inventory_id: ResourceId },
    MustOwnWell { well_id: ResourceId },
    MustOwnNotification { receipt_id: ResourceId },
    MustHaveElevatedAccount,
    MustHaveCompleteProfile,
    MustHaveCompleteSite,
    MustHaveInventoryStatus { expected: &'static [InventoryStatus] },
    MustHaveCompleteInventory,
    MustHaveReviewableInventory,
    MustHaveApprovedInventory,
    MustHaveNoFlaggedIssues,
    MustHaveInventoryAdminAdditions,
}

impl Requirement {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::MustHaveAccount => "must_have_account",
            Self::MustOwnAccount { .. } => "must_own_account",
            Self::MustOwnSite { .. } => "must_own_site",
            Self::MustOwnInventory { .. } => "must_own_inventory",
            Self::MustOwnWell { .. } => "must_own_well",
            Self::MustOwnNotification { .. } => "must_own_notification",
            Self::MustHaveElevatedAccount => "must_have_elevated_account",
            Self::MustHaveCompleteProfile => "must_have_complete_profile",
            Self::MustHaveCompleteSite => "must_have_complete_site",
            Self::MustHaveInventoryStatus { .. } => "must_have_inventory_status",
            Self::MustHaveCompleteInventory => "must_have_complete_inventory",
            Self::MustHaveReviewableInventory => "must_have_reviewable_inventory",
            Self::MustHaveApprovedInventory => "must_have_approved_inventory",
            Self::MustHaveNoFlaggedIssues => "must_have_no_flagged_issues",
            Self::MustHaveInventoryAdminAdditions => "must_have_inventory_admin_additions",
        }
    }
}
