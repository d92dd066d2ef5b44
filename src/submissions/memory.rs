use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::domain::{
    Account, Contact, Inventory, Notification, NotificationReceipt, ResourceId, Site, Well,
};
use super::store::{ResourceStore, StoreError};

/// In-memory store backing the demo, the default server wiring, and tests.
/// Individual calls are serialized per table; there is no isolation across
/// calls, so concurrent read-modify-write sequences race exactly as the
/// production store would.
#[derive(Default, Clone)]
pub struct InMemoryResourceStore {
    sequence: Arc<AtomicU64>,
    accounts: Arc<Mutex<HashMap<ResourceId, Account>>>,
    sites: Arc<Mutex<HashMap<ResourceId, Site>>>,
    inventories: Arc<Mutex<HashMap<ResourceId, Inventory>>>,
    wells: Arc<Mutex<HashMap<ResourceId, Well>>>,
    contacts: Arc<Mutex<HashMap<ResourceId, Contact>>>,
    notifications: Arc<Mutex<HashMap<ResourceId, Notification>>>,
    receipts: Arc<Mutex<HashMap<ResourceId, NotificationReceipt>>>,
}

impl InMemoryResourceStore {
    fn next_id(&self) -> ResourceId {
        ResourceId(self.sequence.fetch_add(1, Ordering::Relaxed) + 1)
    }

    pub fn notification_count(&self) -> usize {
        self.notifications
            .lock()
            .expect("notification mutex poisoned")
            .len()
    }

    pub fn receipt_count(&self) -> usize {
        self.receipts.lock().expect("receipt mutex poisoned").len()
    }
}

#[async_trait]
impl ResourceStore for InMemoryResourceStore {
    async fn account(&self, id: ResourceId) -> Result<Option<Account>, StoreError> {
        let guard = self.accounts.lock().expect("account mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    async fn account_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<Account>, StoreError> {
        let guard = self.accounts.lock().expect("account mutex poisoned");
        Ok(guard
            .values()
            .find(|account| account.external_id == external_id)
            .cloned())
    }

    async fn insert_account(&self, mut account: Account) -> Result<Account, StoreError> {
        let mut guard = self.accounts.lock().expect("account mutex poisoned");
        if guard
            .values()
            .any(|existing| existing.external_id == account.external_id)
        {
            return Err(StoreError::Conflict);
        }
        account.id = self.next_id();
        guard.insert(account.id, account.clone());
        Ok(account)
    }

    async fn update_account(&self, account: Account) -> Result<(), StoreError> {
        let mut guard = self.accounts.lock().expect("account mutex poisoned");
        if !guard.contains_key(&account.id) {
            return Err(StoreError::NotFound);
        }
        guard.insert(account.id, account);
        Ok(())
    }

    async fn subscribed_accounts(&self) -> Result<Vec<Account>, StoreError> {
        let guard = self.accounts.lock().expect("account mutex poisoned");
        let mut subscribed: Vec<Account> = guard
            .values()
            .filter(|account| account.subscribed && !account.deactivated)
            .cloned()
            .collect();
        subscribed.sort_by_key(|account| account.id);
        Ok(subscribed)
    }

    async fn site(&self, id: ResourceId) -> Result<Option<Site>, StoreError> {
        let guard = self.sites.lock().expect("site mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    async fn insert_site(&self, mut site: Site) -> Result<Site, StoreError> {
        let mut guard = self.sites.lock().expect("site mutex poisoned");
        site.id = self.next_id();
        guard.insert(site.id, site.clone());
        Ok(site)
    }

    async fn update_site(&self, site: Site) -> Result<(), StoreError> {
        let mut guard = self.sites.lock().expect("site mutex poisoned");
        if !guard.contains_key(&site.id) {
            return Err(StoreError::NotFound);
        }
        guard.insert(site.id, site);
        Ok(())
    }

    async fn inventory(&self, id: ResourceId) -> Result<Option<Inventory>, StoreError> {
        let guard = self.inventories.lock().expect("inventory mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    async fn inventories_for_site(
        &self,
        site_id: ResourceId,
    ) -> Result<Vec<Inventory>, StoreError> {
        let guard = self.inventories.lock().expect("inventory mutex poisoned");
        let mut matching: Vec<Inventory> = guard
            .values()
            .filter(|inventory| inventory.site_id == site_id)
            .cloned()
            .collect();
        matching.sort_by_key(|inventory| inventory.id);
        Ok(matching)
    }

    async fn insert_inventory(&self, mut inventory: Inventory) -> Result<Inventory, StoreError> {
        let mut guard = self.inventories.lock().expect("inventory mutex poisoned");
        inventory.id = self.next_id();
        guard.insert(inventory.id, inventory.clone());
        Ok(inventory)
    }

    async fn update_inventory(&self, inventory: Inventory) -> Result<(), StoreError> {
        let mut guard = self.inventories.lock().expect("inventory mutex poisoned");
        if !guard.contains_key(&inventory.id) {
            return Err(StoreError::NotFound);
        }
        guard.insert(inventory.id, inventory);
        Ok(())
    }

    async fn delete_inventory(&self, id: ResourceId) -> Result<(), StoreError> {
        let mut guard = self.inventories.lock().expect("inventory mutex poisoned");
        guard.remove(&id).ok_or(StoreError::NotFound)?;
        let mut wells = self.wells.lock().expect("well mutex poisoned");
        wells.retain(|_, well| well.inventory_id != id);
        Ok(())
    }

    async fn well(&self, id: ResourceId) -> Result<Option<Well>, StoreError> {
        let guard = self.wells.lock().expect("well mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    async fn wells_for_inventory(
        &self,
        inventory_id: ResourceId,
    ) -> Result<Vec<Well>, StoreError> {
        let guard = self.wells.lock().expect("well mutex poisoned");
        let mut matching: Vec<Well> = guard
            .values()
            .filter(|well| well.inventory_id == inventory_id)
            .cloned()
            .collect();
        matching.sort_by_key(|well| well.id);
        Ok(matching)
    }

    async fn insert_well(&self, mut well: Well) -> Result<Well, StoreError> {
        let mut guard = self.wells.lock().expect("well mutex poisoned");
        well.id = self.next_id();
        guard.insert(well.id, well.clone());
        Ok(well)
    }

    async fn update_well(&self, well: Well) -> Result<(), StoreError> {
        let mut guard = self.wells.lock().expect("well mutex poisoned");
        if !guard.contains_key(&well.id) {
            return Err(StoreError::NotFound);
        }
        guard.insert(well.id, well);
        Ok(())
    }

    async fn delete_well(&self, id: ResourceId) -> Result<(), StoreError> {
        let mut guard = self.wells.lock().expect("well mutex poisoned");
        guard.remove(&id).ok_or(StoreError::NotFound)?;
        Ok(())
    }

    async fn contact(&self, id: ResourceId) -> Result<Option<Contact>, StoreError> {
        let guard = self.contacts.lock().expect("contact mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    async fn contacts_for_site(&self, site_id: ResourceId) -> Result<Vec<Contact>, StoreError> {
        let guard = self.contacts.lock().expect("contact mutex poisoned");
        let mut matching: Vec<Contact> = guard
            .values()
            .filter(|contact| contact.site_id == site_id)
            .cloned()
            .collect();
        matching.sort_by_key(|contact| contact.id);
        Ok(matching)
    }

    async fn insert_contact(&self, mut contact: Contact) -> Result<Contact, StoreError> {
        let mut guard = self.contacts.lock().expect("contact mutex poisoned");
        contact.id = self.next_id();
        guard.insert(contact.id, contact.clone());
        Ok(contact)
    }

    async fn delete_contact(&self, id: ResourceId) -> Result<(), StoreError> {
        let mut guard = self.contacts.lock().expect("contact mutex poisoned");
        guard.remove(&id).ok_or(StoreError::NotFound)?;
        Ok(())
    }

    async fn notification(&self, id: ResourceId) -> Result<Option<Notification>, StoreError> {
        let guard = self
            .notifications
            .lock()
            .expect("notification mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    async fn insert_notification(
        &self,
        mut notification: Notification,
    ) -> Result<Notification, StoreError> {
        let mut guard = self
            .notifications
            .lock()
            .expect("notification mutex poisoned");
        notification.id = self.next_id();
        guard.insert(notification.id, notification.clone());
        Ok(notification)
    }

    async fn receipt(&self, id: ResourceId) -> Result<Option<NotificationReceipt>, StoreError> {
        let guard = self.receipts.lock().expect("receipt mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    async fn receipts_for_account(
        &self,
        account_id: ResourceId,
    ) -> Result<Vec<NotificationReceipt>, StoreError> {
        let guard = self.receipts.lock().expect("receipt mutex poisoned");
        let mut matching: Vec<NotificationReceipt> = guard
            .values()
            .filter(|receipt| receipt.account_id == account_id)
            .cloned()
            .collect();
        matching.sort_by_key(|receipt| receipt.id);
        Ok(matching)
    }

    async fn insert_receipt(
        &self,
        mut receipt: NotificationReceipt,
    ) -> Result<NotificationReceipt, StoreError> {
        let mut guard = self.receipts.lock().expect("receipt mutex poisoned");
        receipt.id = self.next_id();
        guard.insert(receipt.id, receipt.clone());
        Ok(receipt)
    }

    async fn update_receipt(&self, receipt: NotificationReceipt) -> Result<(), StoreError> {
        let mut guard = self.receipts.lock().expect("receipt mutex poisoned");
        if !guard.contains_key(&receipt.id) {
            return Err(StoreError::NotFound);
        }
        guard.insert(receipt.id, receipt);
        Ok(())
    }
}
