use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use super::domain::{
    Account, Contact, Inventory, InventoryStatus, Notification, NotificationEvent,
    NotificationReceipt, ResourceId, Site, SiteStatus, Well,
};
use super::store::{ResourceStore, StoreError};

/// Fans a qualifying lifecycle event out to every subscribed account: one
/// persisted notification plus one unread receipt per recipient. Events that
/// fail their gate are dropped outright, never queued.
pub struct NotificationDispatcher<S> {
    store: Arc<S>,
    base_url: String,
}

impl<S: ResourceStore> NotificationDispatcher<S> {
    pub fn new(store: Arc<S>, base_url: impl Into<String>) -> Self {
        Self {
            store,
            base_url: base_url.into(),
        }
    }

    /// Contact add/remove events only matter once the site is in play: its
    /// status must be past incomplete and at least one of its inventories
    /// must have reached authorized.
    pub async fn contact_changed(
        &self,
        event: NotificationEvent,
        site: &Site,
        contact: &Contact,
    ) -> Result<usize, StoreError> {
        if site.status == SiteStatus::Incomplete {
            debug!(site = %site.id, event = event.label(), "dropping contact event for incomplete site");
            return Ok(0);
        }

        let inventories = self.store.inventories_for_site(site.id).await?;
        if !inventories
            .iter()
            .any(|inventory| inventory.status.has_reached(InventoryStatus::Authorized))
        {
            debug!(site = %site.id, event = event.label(), "dropping contact event, no authorized inventory");
            return Ok(0);
        }

        let mut additional_data = BTreeMap::new();
        additional_data.insert("site_id".to_string(), site.id.to_string());
        additional_data.insert("site_name".to_string(), site.name.clone());
        additional_data.insert("contact_name".to_string(), contact.name.clone());
        additional_data.insert(
            "contact_type".to_string(),
            contact.contact_type.label().to_string(),
        );

        self.fan_out(
            event,
            format!("{}/sites/{}", self.base_url, site.id),
            additional_data,
        )
        .await
    }

    /// Well operating-status edits are only broadcast once the inventory is
    /// past submission; earlier edits are routine data entry.
    pub async fn well_status_changed(
        &self,
        inventory: &Inventory,
        well: &Well,
        previous_status: &str,
    ) -> Result<usize, StoreError> {
        if matches!(
            inventory.status,
            InventoryStatus::Incomplete | InventoryStatus::Complete
        ) {
            debug!(
                inventory = %inventory.id,
                well = %well.id,
                "dropping well status event before submission"
            );
            return Ok(0);
        }

        let mut additional_data = BTreeMap::new();
        additional_data.insert("inventory_id".to_string(), inventory.id.to_string());
        additional_data.insert("well_id".to_string(), well.id.to_string());
        additional_data.insert("well_name".to_string(), well.name.clone());
        additional_data.insert("previous_status".to_string(), previous_status.to_string());
        additional_data.insert("status".to_string(), well.operating_status.clone());

        self.fan_out(
            NotificationEvent::WellStatusChanged,
            format!(
                "{}/inventories/{}/wells/{}",
                self.base_url, inventory.id, well.id
            ),
            additional_data,
        )
        .await
    }

    /// Promotion to elevated access always notifies; there is no gate.
    pub async fn account_promoted(&self, account: &Account) -> Result<usize, StoreError> {
        let mut additional_data = BTreeMap::new();
        additional_data.insert("account_id".to_string(), account.id.to_string());
        additional_data.insert("external_id".to_string(), account.external_id.clone());

        self.fan_out(
            NotificationEvent::AccountPromoted,
            format!("{}/accounts/{}", self.base_url, account.id),
            additional_data,
        )
        .await
    }

    async fn fan_out(
        &self,
        event: NotificationEvent,
        url: String,
        additional_data: BTreeMap<String, String>,
    ) -> Result<usize, StoreError> {
        let recipients = self.store.subscribed_accounts().await?;

        let notification = self
            .store
            .insert_notification(Notification {
                id: ResourceId(0),
                event,
                created_at: Utc::now(),
                url,
                additional_data,
            })
            .await?;

        for recipient in &recipients {
            self.store
                .insert_receipt(NotificationReceipt {
                    id: ResourceId(0),
                    account_id: recipient.id,
                    notification_id: notification.id,
                    read_at: None,
                    deleted_at: None,
                })
                .await?;
        }

        info!(
            event = event.label(),
            notification = %notification.id,
            recipients = recipients.len(),
            "notification dispatched"
        );
        Ok(recipients.len())
    }
}
