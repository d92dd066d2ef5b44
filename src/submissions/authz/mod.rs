mod checks;
mod failure;
pub mod policies;
mod requirement;

pub use failure::{FailureCode, FailureKind, RequirementFailure};
pub use requirement::Requirement;

use tracing::debug;

use super::context::{ContextError, RequestContext};
use super::store::{ResourceStore, StoreError};

/// Outcome channel for policy evaluation. Denials are expected values carrying
/// a stable code; store and context errors ride the exceptional channel and
/// surface to callers as internal failures.
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    #[error(transparent)]
    Denied(#[from] RequirementFailure),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Context(#[from] ContextError),
}

/// Runs a policy's requirements strictly in order against the shared request
/// context, stopping at the first failure. Requirements only ever write into
/// the context, so a denied chain leaves no trace in the store.
pub struct PolicyEvaluator<'a, S> {
    store: &'a S,
}

impl<'a, S: ResourceStore> PolicyEvaluator<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub async fn evaluate(
        &self,
        policy: &[Requirement],
        ctx: &mut RequestContext,
    ) -> Result<(), AuthzError> {
        for requirement in policy {
            if let Err(error) = self.check(requirement, ctx).await {
                if let AuthzError::Denied(failure) = &error {
                    debug!(requirement = requirement.name(), code = failure.code.as_str(), "requirement denied");
                }
                return Err(error);
            }
        }
        Ok(())
    }

    async fn check(
        &self,
        requirement: &Requirement,
        ctx: &mut RequestContext,
    ) -> Result<(), AuthzError> {
        match requirement {
            Requirement::MustHaveAccount => checks::must_have_account(self.store, ctx).await,
            Requirement::MustOwnAccount { account_id } => {
                checks::must_own_account(self.store, ctx, *account_id).await
            }
            Requirement::MustOwnSite { site_id } => {
                checks::must_own_site(self.store, ctx, *site_id).await
            }
            Requirement::MustOwnInventory { inventory_id } => {
                checks::must_own_inventory(self.store, ctx, *inventory_id).await
            }
            Requirement::MustOwnWell { well_id } => {
                checks::must_own_well(self.store, ctx, *well_id).await
            }
            Requirement::MustOwnNotification { receipt_id } => {
                checks::must_own_notification(self.store, ctx, *receipt_id).await
            }
            Requirement::MustHaveElevatedAccount => checks::must_have_elevated_account(ctx),
            Requirement::MustHaveCompleteProfile => checks::must_have_complete_profile(ctx),
            Requirement::MustHaveCompleteSite => checks::must_have_complete_site(ctx),
            Requirement::MustHaveInventoryStatus { expected } => {
                checks::must_have_inventory_status(ctx, *expected)
            }
            Requirement::MustHaveCompleteInventory => {
                checks::must_have_complete_inventory(self.store, ctx).await
            }
            Requirement::MustHaveReviewableInventory => {
                checks::must_have_reviewable_inventory(ctx)
            }
            Requirement::MustHaveApprovedInventory => checks::must_have_approved_inventory(ctx),
            Requirement::MustHaveNoFlaggedIssues => checks::must_have_no_flagged_issues(ctx),
            Requirement::MustHaveInventoryAdminAdditions => {
                checks::must_have_inventory_admin_additions(ctx)
            }
        }
    }
}
