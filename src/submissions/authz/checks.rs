use tracing::info;

use super::super::context::{Identity, RequestContext};
use super::super::domain::{InventoryStatus, ResourceId, SiteStatus, SER_SUB_CLASS};
use super::super::status::CompletenessSnapshot;
use super::super::store::{ResourceStore, StoreError};
use super::failure::FailureCode;
use super::AuthzError;

pub(super) async fn must_have_account<S: ResourceStore>(
    store: &S,
    ctx: &mut RequestContext,
) -> Result<(), AuthzError> {
    let external_id = match &ctx.identity {
        Identity::Anonymous => return Err(FailureCode::NoIdentity.failure().into()),
        Identity::Claims { external_id: None } => {
            return Err(FailureCode::MissingAccountClaim.failure().into())
        }
        Identity::Claims {
            external_id: Some(external_id),
        } => external_id.clone(),
    };

    let account = store
        .account_by_external_id(&external_id)
        .await?
        .filter(|account| !account.deactivated)
        .ok_or_else(|| FailureCode::NoAccountForIdentity.failure())?;

    ctx.account = Some(account);
    Ok(())
}

pub(super) async fn must_own_account<S: ResourceStore>(
    store: &S,
    ctx: &mut RequestContext,
    account_id: ResourceId,
) -> Result<(), AuthzError> {
    let target = store
        .account(account_id)
        .await?
        .ok_or_else(|| FailureCode::AccountNotFound.failure())?;

    let caller = ctx.account()?;
    if caller.id != target.id && !caller.is_elevated() {
        return Err(FailureCode::AccountNotOwned.failure().into());
    }
    if caller.id != target.id {
        info!(
            caller = %caller.id,
            account = %target.id,
            "elevated account acting on another account"
        );
    }
    Ok(())
}

pub(super) async fn must_own_site<S: ResourceStore>(
    store: &S,
    ctx: &mut RequestContext,
    site_id: ResourceId,
) -> Result<(), AuthzError> {
    let site = store
        .site(site_id)
        .await?
        .ok_or_else(|| FailureCode::SiteNotFound.failure())?;
    let owner = site.account_id;
    ctx.site = Some(site);

    let caller = ctx.account()?;
    if caller.id != owner {
        if !caller.is_elevated() {
            return Err(FailureCode::SiteNotOwned.failure().into());
        }
        info!(caller = %caller.id, site = %site_id, "elevated account accessing another owner's site");
    }
    Ok(())
}

pub(super) async fn must_own_inventory<S: ResourceStore>(
    store: &S,
    ctx: &mut RequestContext,
    inventory_id: ResourceId,
) -> Result<(), AuthzError> {
    let inventory = store
        .inventory(inventory_id)
        .await?
        .ok_or_else(|| FailureCode::InventoryNotFound.failure())?;

    // The parent site rides along so later requirements (admin additions,
    // remediation contact coverage) can read it without another round-trip.
    let site = store
        .site(inventory.site_id)
        .await?
        .ok_or(StoreError::NotFound)?;

    let owner = inventory.account_id;
    ctx.site = Some(site);
    ctx.inventory = Some(inventory);

    let caller = ctx.account()?;
    if caller.id != owner {
        if !caller.is_elevated() {
            return Err(FailureCode::InventoryNotOwned.failure().into());
        }
        info!(
            caller = %caller.id,
            inventory = %inventory_id,
            "elevated account accessing another owner's inventory"
        );
    }
    Ok(())
}

pub(super) async fn must_own_well<S: ResourceStore>(
    store: &S,
    ctx: &mut RequestContext,
    well_id: ResourceId,
) -> Result<(), AuthzError> {
    let well = store
        .well(well_id)
        .await?
        .ok_or_else(|| FailureCode::WellNotFound.failure())?;

    let inventory = store
        .inventory(well.inventory_id)
        .await?
        .ok_or(StoreError::NotFound)?;
    let site = store
        .site(inventory.site_id)
        .await?
        .ok_or(StoreError::NotFound)?;

    let owner = well.account_id;
    ctx.site = Some(site);
    ctx.inventory = Some(inventory);
    ctx.well = Some(well);

    let caller = ctx.account()?;
    if caller.id != owner {
        if !caller.is_elevated() {
            return Err(FailureCode::WellNotOwned.failure().into());
        }
        info!(caller = %caller.id, well = %well_id, "elevated account accessing another owner's well");
    }
    Ok(())
}

pub(super) async fn must_own_notification<S: ResourceStore>(
    store: &S,
    ctx: &mut RequestContext,
    receipt_id: ResourceId,
) -> Result<(), AuthzError> {
    let receipt = store
        .receipt(receipt_id)
        .await?
        .ok_or_else(|| FailureCode::NotificationNotFound.failure())?;
    let owner = receipt.account_id;
    ctx.receipt = Some(receipt);

    let caller = ctx.account()?;
    if caller.id != owner {
        if !caller.is_elevated() {
            return Err(FailureCode::NotificationNotOwned.failure().into());
        }
        info!(
            caller = %caller.id,
            receipt = %receipt_id,
            "elevated account accessing another owner's notification"
        );
    }
    Ok(())
}

pub(super) fn must_have_elevated_account(ctx: &RequestContext) -> Result<(), AuthzError> {
    if ctx.account()?.is_elevated() {
        Ok(())
    } else {
        Err(FailureCode::ElevatedAccountRequired.failure().into())
    }
}

pub(super) fn must_have_complete_profile(ctx: &RequestContext) -> Result<(), AuthzError> {
    if ctx.account()?.profile_complete() {
        Ok(())
    } else {
        Err(FailureCode::IncompleteProfile.failure().into())
    }
}

pub(super) fn must_have_complete_site(ctx: &RequestContext) -> Result<(), AuthzError> {
    if ctx.site()?.status == SiteStatus::Complete {
        Ok(())
    } else {
        Err(FailureCode::SiteNotComplete.failure().into())
    }
}

pub(super) fn must_have_inventory_status(
    ctx: &RequestContext,
    expected: &'static [InventoryStatus],
) -> Result<(), AuthzError> {
    let inventory = ctx.inventory()?;
    if expected.contains(&inventory.status) {
        return Ok(());
    }

    let allowed = expected
        .iter()
        .map(|status| status.label())
        .collect::<Vec<_>>()
        .join(", ");
    Err(FailureCode::UnexpectedInventoryStatus
        .failure_with(format!(
            "The inventory is {} but must be one of: {}.",
            inventory.status.label(),
            allowed
        ))
        .into())
}

/// Full submission-readiness gate: status must be the derived `Complete`, and
/// every completeness item, recomputed from the live child records, must hold.
/// Each violated expectation keeps its own code.
pub(super) async fn must_have_complete_inventory<S: ResourceStore>(
    store: &S,
    ctx: &RequestContext,
) -> Result<(), AuthzError> {
    let inventory = ctx.inventory()?;
    if inventory.status != InventoryStatus::Complete {
        return Err(FailureCode::UnexpectedInventoryStatus
            .failure_with(format!(
                "The inventory is {} but must be complete before it can be submitted.",
                inventory.status.label()
            ))
            .into());
    }

    let wells = store.wells_for_inventory(inventory.id).await?;
    let contacts = store.contacts_for_site(inventory.site_id).await?;
    let snapshot = CompletenessSnapshot::assess(inventory, &wells, &contacts);

    if inventory.sub_class == SER_SUB_CLASS && !snapshot.contacts {
        return Err(FailureCode::RemediationContactMissing.failure().into());
    }

    let mut missing = Vec::new();
    if !snapshot.details {
        missing.push("well details");
    }
    if !snapshot.contacts {
        missing.push("site contacts");
    }
    if !snapshot.location {
        missing.push("well locations");
    }
    if !snapshot.payment {
        missing.push("payment");
    }
    if !snapshot.signature {
        missing.push("signature");
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(FailureCode::InventoryIncomplete
            .failure_with(format!(
                "The inventory is missing required completeness items: {}.",
                missing.join(", ")
            ))
            .into())
    }
}

pub(super) fn must_have_reviewable_inventory(ctx: &RequestContext) -> Result<(), AuthzError> {
    match ctx.inventory()?.status {
        InventoryStatus::Submitted | InventoryStatus::UnderReview => Ok(()),
        _ => Err(FailureCode::InventoryNotReviewable.failure().into()),
    }
}

pub(super) fn must_have_approved_inventory(ctx: &RequestContext) -> Result<(), AuthzError> {
    if ctx.inventory()?.status == InventoryStatus::Approved {
        Ok(())
    } else {
        Err(FailureCode::InventoryNotApproved.failure().into())
    }
}

pub(super) fn must_have_no_flagged_issues(ctx: &RequestContext) -> Result<(), AuthzError> {
    if ctx.inventory()?.is_flagged() {
        Err(FailureCode::InventoryFlagged.failure().into())
    } else {
        Ok(())
    }
}

pub(super) fn must_have_inventory_admin_additions(
    ctx: &RequestContext,
) -> Result<(), AuthzError> {
    if ctx.inventory()?.edocs.is_empty() {
        return Err(FailureCode::EdocsMissing.failure().into());
    }
    if ctx.site()?.external_reference.is_empty() {
        return Err(FailureCode::SiteReferenceMissing.failure().into());
    }
    Ok(())
}
