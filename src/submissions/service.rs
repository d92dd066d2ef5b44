use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::authz::{policies, AuthzError, FailureCode, PolicyEvaluator, RequirementFailure};
use super::context::{ContextError, Identity, RequestContext};
use super::domain::{
    AccessLevel, Account, CompletenessSnapshot, Contact, ContactType, Inventory, InventoryStatus,
    Notification, NotificationEvent, NotificationReceipt, ResourceId, Site, SiteStatus, Well,
};
use super::notify::NotificationDispatcher;
use super::status::{derive_inventory_status, derive_site_status};
use super::store::{ResourceStore, StoreError};

/// Error raised by the submission service. Denials keep their stable codes all
/// the way to the caller; store and context failures are internal.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Denied(#[from] RequirementFailure),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Context(#[from] ContextError),
}

impl From<AuthzError> for ServiceError {
    fn from(error: AuthzError) -> Self {
        match error {
            AuthzError::Denied(failure) => Self::Denied(failure),
            AuthzError::Store(error) => Self::Store(error),
            AuthzError::Context(error) => Self::Context(error),
        }
    }
}

/// Profile fields collected at registration and by account updates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub organization: String,
    #[serde(default)]
    pub subscribed: bool,
}

/// Nullable-patch update for an account: absent fields keep their values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub organization: Option<String>,
    pub subscribed: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSite {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SitePatch {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInventory {
    pub sub_class: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryPatch {
    pub sub_class: Option<i32>,
    pub order_number: Option<u32>,
    pub signature: Option<String>,
}

/// Staff-only additions recorded during review: edocs reference, issue flag,
/// and the program-assigned site identifier on the parent site.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryAnnotation {
    pub edocs: Option<String>,
    pub flagged: Option<String>,
    pub site_reference: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWell {
    pub name: String,
    pub operating_status: String,
    pub quantity: u32,
    pub geometry: String,
    pub construction_details: String,
    #[serde(default)]
    pub injectate_characterization: String,
    pub sub_class: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WellPatch {
    pub name: Option<String>,
    pub operating_status: Option<String>,
    pub quantity: Option<u32>,
    pub geometry: Option<String>,
    pub construction_details: Option<String>,
    pub injectate_characterization: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub contact_type: ContactType,
}

/// Notification payload joined with its per-account receipt state.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationView {
    pub id: ResourceId,
    pub event_type: &'static str,
    pub created_at: DateTime<Utc>,
    pub url: String,
    pub additional_data: std::collections::BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
    pub deleted: bool,
}

/// Service facade composing the policy evaluator, the derivation engine, and
/// the notification dispatcher over one resource store. Every operation runs
/// its policy against a fresh request context before touching anything.
pub struct SubmissionService<S> {
    store: Arc<S>,
    dispatcher: NotificationDispatcher<S>,
}

impl<S: ResourceStore> SubmissionService<S> {
    pub fn new(store: Arc<S>, notification_base_url: impl Into<String>) -> Self {
        let dispatcher = NotificationDispatcher::new(store.clone(), notification_base_url);
        Self { store, dispatcher }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    async fn authorize(
        &self,
        identity: Identity,
        policy: Vec<super::authz::Requirement>,
    ) -> Result<RequestContext, ServiceError> {
        let mut ctx = RequestContext::new(identity);
        PolicyEvaluator::new(self.store.as_ref())
            .evaluate(&policy, &mut ctx)
            .await?;
        Ok(ctx)
    }

    /// Recompute an inventory's completeness from its live children and
    /// persist the snapshot together with the derived status.
    async fn refresh_inventory(&self, mut inventory: Inventory) -> Result<Inventory, StoreError> {
        let wells = self.store.wells_for_inventory(inventory.id).await?;
        let contacts = self.store.contacts_for_site(inventory.site_id).await?;
        inventory.completeness = CompletenessSnapshot::assess(&inventory, &wells, &contacts);
        inventory.status = derive_inventory_status(inventory.status, &inventory.completeness);
        self.store.update_inventory(inventory.clone()).await?;
        Ok(inventory)
    }

    async fn refresh_site(&self, mut site: Site) -> Result<Site, StoreError> {
        let contacts = self.store.contacts_for_site(site.id).await?;
        site.status = derive_site_status(site.status, &contacts);
        self.store.update_site(site.clone()).await?;
        Ok(site)
    }

    /// Contact changes feed the contact-coverage input of every inventory on
    /// the site, so they all get recomputed.
    async fn refresh_site_inventories(&self, site_id: ResourceId) -> Result<(), StoreError> {
        for inventory in self.store.inventories_for_site(site_id).await? {
            self.refresh_inventory(inventory).await?;
        }
        Ok(())
    }

    // ── accounts ──────────────────────────────────────────────────────

    /// The one operation with no policy: there is no account to check yet.
    /// The identity claim is validated directly with the same coded failures
    /// the account requirement would produce.
    pub async fn register_account(
        &self,
        identity: Identity,
        profile: AccountProfile,
    ) -> Result<Account, ServiceError> {
        let external_id = match identity {
            Identity::Anonymous => return Err(FailureCode::NoIdentity.failure().into()),
            Identity::Claims { external_id: None } => {
                return Err(FailureCode::MissingAccountClaim.failure().into())
            }
            Identity::Claims {
                external_id: Some(external_id),
            } => external_id,
        };

        let account = self
            .store
            .insert_account(Account {
                id: ResourceId(0),
                external_id,
                first_name: profile.first_name,
                last_name: profile.last_name,
                email: profile.email,
                phone: profile.phone,
                organization: profile.organization,
                access_level: AccessLevel::Standard,
                subscribed: profile.subscribed,
                deactivated: false,
            })
            .await?;
        info!(account = %account.id, "account registered");
        Ok(account)
    }

    pub async fn update_account(
        &self,
        identity: Identity,
        account_id: ResourceId,
        patch: AccountPatch,
    ) -> Result<Account, ServiceError> {
        self.authorize(identity, policies::update_account(account_id))
            .await?;

        let mut account = self
            .store
            .account(account_id)
            .await?
            .ok_or(StoreError::NotFound)?;
        if let Some(first_name) = patch.first_name {
            account.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            account.last_name = last_name;
        }
        if let Some(email) = patch.email {
            account.email = email;
        }
        if let Some(phone) = patch.phone {
            account.phone = phone;
        }
        if let Some(organization) = patch.organization {
            account.organization = organization;
        }
        if let Some(subscribed) = patch.subscribed {
            account.subscribed = subscribed;
        }
        self.store.update_account(account.clone()).await?;
        Ok(account)
    }

    /// Admin-only promotion to elevated access. Fires its notification only on
    /// an actual standard-to-elevated transition.
    pub async fn promote_account(
        &self,
        identity: Identity,
        account_id: ResourceId,
    ) -> Result<Account, ServiceError> {
        self.authorize(identity, policies::promote_account(account_id))
            .await?;

        let mut account = self
            .store
            .account(account_id)
            .await?
            .ok_or(StoreError::NotFound)?;
        if account.access_level == AccessLevel::Elevated {
            return Ok(account);
        }

        account.access_level = AccessLevel::Elevated;
        self.store.update_account(account.clone()).await?;
        info!(account = %account.id, "account promoted to elevated access");
        self.dispatcher.account_promoted(&account).await?;
        Ok(account)
    }

    /// Soft deletion: the row survives, anonymized and demoted.
    pub async fn deactivate_account(
        &self,
        identity: Identity,
        account_id: ResourceId,
    ) -> Result<Account, ServiceError> {
        self.authorize(identity, policies::deactivate_account(account_id))
            .await?;

        let mut account = self
            .store
            .account(account_id)
            .await?
            .ok_or(StoreError::NotFound)?;
        account.anonymize();
        self.store.update_account(account.clone()).await?;
        info!(account = %account.id, "account deactivated and anonymized");
        Ok(account)
    }

    // ── sites ─────────────────────────────────────────────────────────

    pub async fn create_site(
        &self,
        identity: Identity,
        input: NewSite,
    ) -> Result<Site, ServiceError> {
        let ctx = self.authorize(identity, policies::create_site()).await?;
        let account = ctx.account()?;

        let site = self
            .store
            .insert_site(Site {
                id: ResourceId(0),
                account_id: account.id,
                name: input.name,
                external_reference: String::new(),
                status: SiteStatus::Incomplete,
            })
            .await?;
        Ok(site)
    }

    pub async fn update_site(
        &self,
        identity: Identity,
        site_id: ResourceId,
        patch: SitePatch,
    ) -> Result<Site, ServiceError> {
        let ctx = self
            .authorize(identity, policies::update_site(site_id))
            .await?;

        let mut site = ctx.site()?.clone();
        if let Some(name) = patch.name {
            site.name = name;
        }
        let site = self.refresh_site(site).await?;
        Ok(site)
    }

    pub async fn submit_site(
        &self,
        identity: Identity,
        site_id: ResourceId,
    ) -> Result<Site, ServiceError> {
        let ctx = self
            .authorize(identity, policies::submit_site(site_id))
            .await?;

        let mut site = ctx.site()?.clone();
        site.status = SiteStatus::Submitted;
        self.store.update_site(site.clone()).await?;
        info!(site = %site.id, "site submitted");
        Ok(site)
    }

    pub async fn authorize_site(
        &self,
        identity: Identity,
        site_id: ResourceId,
    ) -> Result<Site, ServiceError> {
        let ctx = self
            .authorize(identity, policies::authorize_site(site_id))
            .await?;

        let mut site = ctx.site()?.clone();
        if site.status != SiteStatus::Submitted {
            return Err(FailureCode::UnexpectedSiteStatus
                .failure_with(format!(
                    "The site is {} but must be submitted before it can be authorized.",
                    site.status.label()
                ))
                .into());
        }
        site.status = SiteStatus::Authorized;
        self.store.update_site(site.clone()).await?;
        info!(site = %site.id, "site authorized");
        Ok(site)
    }

    pub async fn ingest_site(
        &self,
        identity: Identity,
        site_id: ResourceId,
    ) -> Result<Site, ServiceError> {
        let ctx = self
            .authorize(identity, policies::ingest_site(site_id))
            .await?;

        let mut site = ctx.site()?.clone();
        if site.status != SiteStatus::Authorized {
            return Err(FailureCode::UnexpectedSiteStatus
                .failure_with(format!(
                    "The site is {} but must be authorized before it can be ingested.",
                    site.status.label()
                ))
                .into());
        }
        site.status = SiteStatus::Ingested;
        self.store.update_site(site.clone()).await?;
        info!(site = %site.id, "site ingested");
        Ok(site)
    }

    // ── contacts ──────────────────────────────────────────────────────

    pub async fn add_contact(
        &self,
        identity: Identity,
        site_id: ResourceId,
        input: NewContact,
    ) -> Result<Contact, ServiceError> {
        let ctx = self
            .authorize(identity, policies::add_contact(site_id))
            .await?;

        let contact = self
            .store
            .insert_contact(Contact {
                id: ResourceId(0),
                site_id,
                name: input.name,
                email: input.email,
                contact_type: input.contact_type,
            })
            .await?;

        let site = self.refresh_site(ctx.site()?.clone()).await?;
        self.refresh_site_inventories(site_id).await?;
        self.dispatcher
            .contact_changed(NotificationEvent::ContactAdded, &site, &contact)
            .await?;
        Ok(contact)
    }

    pub async fn remove_contact(
        &self,
        identity: Identity,
        site_id: ResourceId,
        contact_id: ResourceId,
    ) -> Result<(), ServiceError> {
        let ctx = self
            .authorize(identity, policies::remove_contact(site_id))
            .await?;

        let contact = self
            .store
            .contact(contact_id)
            .await?
            .filter(|contact| contact.site_id == site_id)
            .ok_or(StoreError::NotFound)?;
        self.store.delete_contact(contact.id).await?;

        let site = self.refresh_site(ctx.site()?.clone()).await?;
        self.refresh_site_inventories(site_id).await?;
        self.dispatcher
            .contact_changed(NotificationEvent::ContactRemoved, &site, &contact)
            .await?;
        Ok(())
    }

    // ── inventories ───────────────────────────────────────────────────

    pub async fn create_inventory(
        &self,
        identity: Identity,
        site_id: ResourceId,
        input: NewInventory,
    ) -> Result<Inventory, ServiceError> {
        let ctx = self
            .authorize(identity, policies::create_inventory(site_id))
            .await?;
        let account = ctx.account()?;
        let site = ctx.site()?;

        let inventory = self
            .store
            .insert_inventory(Inventory {
                id: ResourceId(0),
                account_id: account.id,
                site_id: site.id,
                status: InventoryStatus::Incomplete,
                sub_class: input.sub_class,
                order_number: None,
                signature: String::new(),
                flagged: String::new(),
                edocs: String::new(),
                completeness: CompletenessSnapshot::default(),
            })
            .await?;
        let inventory = self.refresh_inventory(inventory).await?;
        Ok(inventory)
    }

    pub async fn get_inventory(
        &self,
        identity: Identity,
        inventory_id: ResourceId,
    ) -> Result<Inventory, ServiceError> {
        let ctx = self
            .authorize(identity, policies::view_inventory(inventory_id))
            .await?;
        Ok(ctx.inventory()?.clone())
    }

    pub async fn update_inventory(
        &self,
        identity: Identity,
        inventory_id: ResourceId,
        patch: InventoryPatch,
    ) -> Result<Inventory, ServiceError> {
        let ctx = self
            .authorize(identity, policies::update_inventory(inventory_id))
            .await?;

        let mut inventory = ctx.inventory()?.clone();
        if let Some(sub_class) = patch.sub_class {
            inventory.sub_class = sub_class;
        }
        if let Some(order_number) = patch.order_number {
            inventory.order_number = Some(order_number);
        }
        if let Some(signature) = patch.signature {
            inventory.signature = signature;
        }
        let inventory = self.refresh_inventory(inventory).await?;
        Ok(inventory)
    }

    pub async fn annotate_inventory(
        &self,
        identity: Identity,
        inventory_id: ResourceId,
        annotation: InventoryAnnotation,
    ) -> Result<Inventory, ServiceError> {
        let ctx = self
            .authorize(identity, policies::annotate_inventory(inventory_id))
            .await?;

        let mut inventory = ctx.inventory()?.clone();
        if let Some(edocs) = annotation.edocs {
            inventory.edocs = edocs;
        }
        if let Some(flagged) = annotation.flagged {
            inventory.flagged = flagged;
        }
        self.store.update_inventory(inventory.clone()).await?;

        if let Some(site_reference) = annotation.site_reference {
            let mut site = ctx.site()?.clone();
            site.external_reference = site_reference;
            self.store.update_site(site).await?;
        }
        Ok(inventory)
    }

    pub async fn submit_inventory(
        &self,
        identity: Identity,
        inventory_id: ResourceId,
    ) -> Result<Inventory, ServiceError> {
        let ctx = self
            .authorize(identity, policies::submit_inventory(inventory_id))
            .await?;

        let mut inventory = ctx.inventory()?.clone();
        inventory.status = InventoryStatus::Submitted;
        self.store.update_inventory(inventory.clone()).await?;
        info!(inventory = %inventory.id, "inventory submitted");
        Ok(inventory)
    }

    pub async fn review_inventory(
        &self,
        identity: Identity,
        inventory_id: ResourceId,
    ) -> Result<Inventory, ServiceError> {
        let ctx = self
            .authorize(identity, policies::review_inventory(inventory_id))
            .await?;

        let mut inventory = ctx.inventory()?.clone();
        inventory.status = InventoryStatus::UnderReview;
        self.store.update_inventory(inventory.clone()).await?;
        info!(inventory = %inventory.id, "inventory under review");
        Ok(inventory)
    }

    pub async fn approve_inventory(
        &self,
        identity: Identity,
        inventory_id: ResourceId,
    ) -> Result<Inventory, ServiceError> {
        let ctx = self
            .authorize(identity, policies::approve_inventory(inventory_id))
            .await?;

        let mut inventory = ctx.inventory()?.clone();
        inventory.status = InventoryStatus::Approved;
        self.store.update_inventory(inventory.clone()).await?;
        info!(inventory = %inventory.id, "inventory approved");
        Ok(inventory)
    }

    /// Rejection returns the inventory to the accountholder; its status drops
    /// back to whatever the derivation engine says the content supports.
    pub async fn reject_inventory(
        &self,
        identity: Identity,
        inventory_id: ResourceId,
        reason: String,
    ) -> Result<Inventory, ServiceError> {
        let ctx = self
            .authorize(identity, policies::reject_inventory(inventory_id))
            .await?;

        let mut inventory = ctx.inventory()?.clone();
        inventory.flagged = reason;
        inventory.status = InventoryStatus::Incomplete;
        let inventory = self.refresh_inventory(inventory).await?;
        info!(inventory = %inventory.id, "inventory rejected");
        Ok(inventory)
    }

    pub async fn authorize_inventory(
        &self,
        identity: Identity,
        inventory_id: ResourceId,
    ) -> Result<Inventory, ServiceError> {
        let ctx = self
            .authorize(identity, policies::authorize_inventory(inventory_id))
            .await?;

        let mut inventory = ctx.inventory()?.clone();
        inventory.status = InventoryStatus::Authorized;
        self.store.update_inventory(inventory.clone()).await?;
        info!(inventory = %inventory.id, "inventory authorized");
        Ok(inventory)
    }

    pub async fn complete_inventory(
        &self,
        identity: Identity,
        inventory_id: ResourceId,
    ) -> Result<Inventory, ServiceError> {
        let ctx = self
            .authorize(identity, policies::complete_inventory(inventory_id))
            .await?;

        let mut inventory = ctx.inventory()?.clone();
        inventory.status = InventoryStatus::Completed;
        self.store.update_inventory(inventory.clone()).await?;
        info!(inventory = %inventory.id, "inventory completed");
        Ok(inventory)
    }

    pub async fn delete_inventory(
        &self,
        identity: Identity,
        inventory_id: ResourceId,
    ) -> Result<(), ServiceError> {
        self.authorize(identity, policies::delete_inventory(inventory_id))
            .await?;
        self.store.delete_inventory(inventory_id).await?;
        info!(inventory = %inventory_id, "inventory deleted");
        Ok(())
    }

    // ── wells ─────────────────────────────────────────────────────────

    pub async fn create_well(
        &self,
        identity: Identity,
        inventory_id: ResourceId,
        input: NewWell,
    ) -> Result<Well, ServiceError> {
        let ctx = self
            .authorize(identity, policies::create_well(inventory_id))
            .await?;
        let inventory = ctx.inventory()?;

        let well = self
            .store
            .insert_well(Well {
                id: ResourceId(0),
                account_id: inventory.account_id,
                inventory_id: inventory.id,
                name: input.name,
                operating_status: input.operating_status,
                quantity: input.quantity,
                geometry: input.geometry,
                construction_details: input.construction_details,
                injectate_characterization: input.injectate_characterization,
                sub_class: input.sub_class,
            })
            .await?;

        self.refresh_inventory(inventory.clone()).await?;
        Ok(well)
    }

    pub async fn update_well(
        &self,
        identity: Identity,
        well_id: ResourceId,
        patch: WellPatch,
    ) -> Result<Well, ServiceError> {
        let ctx = self
            .authorize(identity, policies::update_well(well_id))
            .await?;

        let mut well = ctx.well()?.clone();
        let previous_status = well.operating_status.clone();
        if let Some(name) = patch.name {
            well.name = name;
        }
        if let Some(operating_status) = patch.operating_status {
            well.operating_status = operating_status;
        }
        if let Some(quantity) = patch.quantity {
            well.quantity = quantity;
        }
        if let Some(geometry) = patch.geometry {
            well.geometry = geometry;
        }
        if let Some(construction_details) = patch.construction_details {
            well.construction_details = construction_details;
        }
        if let Some(injectate_characterization) = patch.injectate_characterization {
            well.injectate_characterization = injectate_characterization;
        }
        self.store.update_well(well.clone()).await?;

        let inventory = self.refresh_inventory(ctx.inventory()?.clone()).await?;
        if well.operating_status != previous_status {
            self.dispatcher
                .well_status_changed(&inventory, &well, &previous_status)
                .await?;
        }
        Ok(well)
    }

    pub async fn delete_well(
        &self,
        identity: Identity,
        well_id: ResourceId,
    ) -> Result<(), ServiceError> {
        let ctx = self
            .authorize(identity, policies::delete_well(well_id))
            .await?;

        self.store.delete_well(well_id).await?;
        self.refresh_inventory(ctx.inventory()?.clone()).await?;
        Ok(())
    }

    // ── notifications ─────────────────────────────────────────────────

    pub async fn list_notifications(
        &self,
        identity: Identity,
    ) -> Result<Vec<NotificationView>, ServiceError> {
        let ctx = self
            .authorize(identity, policies::list_notifications())
            .await?;
        let account = ctx.account()?;

        let mut views = Vec::new();
        for receipt in self.store.receipts_for_account(account.id).await? {
            if receipt.is_deleted() {
                continue;
            }
            let notification = self
                .store
                .notification(receipt.notification_id)
                .await?
                .ok_or(StoreError::NotFound)?;
            views.push(view_for(&notification, &receipt));
        }
        Ok(views)
    }

    pub async fn read_notification(
        &self,
        identity: Identity,
        receipt_id: ResourceId,
    ) -> Result<NotificationView, ServiceError> {
        let ctx = self
            .authorize(identity, policies::read_notification(receipt_id))
            .await?;

        let mut receipt = ctx.receipt()?.clone();
        if receipt.is_unread() {
            receipt.read_at = Some(Utc::now());
            self.store.update_receipt(receipt.clone()).await?;
        }

        let notification = self
            .store
            .notification(receipt.notification_id)
            .await?
            .ok_or(StoreError::NotFound)?;
        Ok(view_for(&notification, &receipt))
    }

    /// Deleting an unread notification marks it read on the way out.
    pub async fn delete_notification(
        &self,
        identity: Identity,
        receipt_id: ResourceId,
    ) -> Result<(), ServiceError> {
        let ctx = self
            .authorize(identity, policies::delete_notification(receipt_id))
            .await?;

        let mut receipt = ctx.receipt()?.clone();
        if receipt.is_deleted() {
            return Ok(());
        }
        let now = Utc::now();
        if receipt.is_unread() {
            receipt.read_at = Some(now);
        }
        receipt.deleted_at = Some(now);
        self.store.update_receipt(receipt).await?;
        Ok(())
    }
}

fn view_for(notification: &Notification, receipt: &NotificationReceipt) -> NotificationView {
    NotificationView {
        id: receipt.id,
        event_type: notification.event.label(),
        created_at: notification.created_at,
        url: notification.url.clone(),
        additional_data: notification.additional_data.clone(),
        read_at: receipt.read_at,
        deleted: receipt.is_deleted(),
    }
}
