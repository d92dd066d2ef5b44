use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::submissions::domain::{
    AccessLevel, Account, Contact, ContactType, Inventory, InventoryStatus, Notification,
    NotificationReceipt, ResourceId, Site, Well,
};
use crate::submissions::memory::InMemoryResourceStore;
use crate::submissions::service::{
    AccountProfile, NewContact, NewInventory, NewSite, NewWell, SubmissionService,
};
use crate::submissions::store::{ResourceStore, StoreError};
use crate::submissions::Identity;

pub(super) const BASE_URL: &str = "https://registry.test";

pub(super) fn operator_identity() -> Identity {
    Identity::with_external_id("login|operator")
}

pub(super) fn reviewer_identity() -> Identity {
    Identity::with_external_id("login|reviewer")
}

pub(super) fn build_service() -> (
    SubmissionService<InMemoryResourceStore>,
    Arc<InMemoryResourceStore>,
) {
    let store = Arc::new(InMemoryResourceStore::default());
    let service = SubmissionService::new(store.clone(), BASE_URL);
    (service, store)
}

pub(super) fn operator_profile() -> AccountProfile {
    AccountProfile {
        first_name: "Dana".to_string(),
        last_name: "Fielding".to_string(),
        email: "dana@riverbend.example".to_string(),
        phone: "555-0147".to_string(),
        organization: "Riverbend Disposal LLC".to_string(),
        subscribed: true,
    }
}

pub(super) async fn seed_operator(
    service: &SubmissionService<InMemoryResourceStore>,
) -> Account {
    service
        .register_account(operator_identity(), operator_profile())
        .await
        .expect("operator registers")
}

/// Registers a reviewer and elevates it directly through the store, the way a
/// deployment seed would.
pub(super) async fn seed_reviewer(
    service: &SubmissionService<InMemoryResourceStore>,
    store: &InMemoryResourceStore,
) -> Account {
    let account = service
        .register_account(
            reviewer_identity(),
            AccountProfile {
                first_name: "Sam".to_string(),
                last_name: "Okafor".to_string(),
                email: "sam@agency.example".to_string(),
                phone: "555-0102".to_string(),
                organization: "State UIC Program".to_string(),
                subscribed: true,
            },
        )
        .await
        .expect("reviewer registers");

    let mut elevated = account.clone();
    elevated.access_level = AccessLevel::Elevated;
    store
        .update_account(elevated.clone())
        .await
        .expect("reviewer elevates");
    elevated
}

pub(super) async fn seed_site(
    service: &SubmissionService<InMemoryResourceStore>,
) -> Site {
    service
        .create_site(
            operator_identity(),
            NewSite {
                name: "Riverbend Facility".to_string(),
            },
        )
        .await
        .expect("site creates")
}

pub(super) async fn seed_qualifying_contact(
    service: &SubmissionService<InMemoryResourceStore>,
    site_id: ResourceId,
) -> Contact {
    service
        .add_contact(
            operator_identity(),
            site_id,
            NewContact {
                name: "Dana Fielding".to_string(),
                email: "dana@riverbend.example".to_string(),
                contact_type: ContactType::OwnerOperator,
            },
        )
        .await
        .expect("contact adds")
}

pub(super) fn complete_well_input(sub_class: i32) -> NewWell {
    NewWell {
        name: "IW-1".to_string(),
        operating_status: "AC".to_string(),
        quantity: 2,
        geometry: "{\"type\":\"Point\",\"coordinates\":[-111.89,40.76]}".to_string(),
        construction_details: "steel casing to 120ft, cement grout".to_string(),
        injectate_characterization: String::new(),
        sub_class,
    }
}

pub(super) async fn seed_inventory(
    service: &SubmissionService<InMemoryResourceStore>,
    site_id: ResourceId,
    sub_class: i32,
) -> Inventory {
    service
        .create_inventory(operator_identity(), site_id, NewInventory { sub_class })
        .await
        .expect("inventory creates")
}

/// Builds an operator + site + contact + well + paid, signed inventory that
/// the completeness gate accepts.
pub(super) async fn seed_submittable_inventory(
    service: &SubmissionService<InMemoryResourceStore>,
    sub_class: i32,
) -> (Site, Inventory) {
    seed_operator(service).await;
    let site = seed_site(service).await;
    seed_qualifying_contact(service, site.id).await;
    let inventory = seed_inventory(service, site.id, sub_class).await;
    service
        .create_well(
            operator_identity(),
            inventory.id,
            complete_well_input(sub_class),
        )
        .await
        .expect("well creates");
    let inventory = service
        .update_inventory(
            operator_identity(),
            inventory.id,
            crate::submissions::service::InventoryPatch {
                sub_class: None,
                order_number: Some(2_440_051),
                signature: Some("Dana Fielding, authorized agent".to_string()),
            },
        )
        .await
        .expect("inventory patches");
    assert_eq!(inventory.status, InventoryStatus::Complete);
    (site, inventory)
}

/// Store wrapper counting every call, used to observe short-circuiting.
pub(super) struct CountingStore {
    pub(super) inner: InMemoryResourceStore,
    pub(super) calls: AtomicUsize,
}

impl CountingStore {
    pub(super) fn new(inner: InMemoryResourceStore) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ResourceStore for CountingStore {
    async fn account(&self, id: ResourceId) -> Result<Option<Account>, StoreError> {
        self.tick();
        self.inner.account(id).await
    }

    async fn account_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<Account>, StoreError> {
        self.tick();
        self.inner.account_by_external_id(external_id).await
    }

    async fn insert_account(&self, account: Account) -> Result<Account, StoreError> {
        self.tick();
        self.inner.insert_account(account).await
    }

    async fn update_account(&self, account: Account) -> Result<(), StoreError> {
        self.tick();
        self.inner.update_account(account).await
    }

    async fn subscribed_accounts(&self) -> Result<Vec<Account>, StoreError> {
        self.tick();
        self.inner.subscribed_accounts().await
    }

    async fn site(&self, id: ResourceId) -> Result<Option<Site>, StoreError> {
        self.tick();
        self.inner.site(id).await
    }

    async fn insert_site(&self, site: Site) -> Result<Site, StoreError> {
        self.tick();
        self.inner.insert_site(site).await
    }

    async fn update_site(&self, site: Site) -> Result<(), StoreError> {
        self.tick();
        self.inner.update_site(site).await
    }

    async fn inventory(&self, id: ResourceId) -> Result<Option<Inventory>, StoreError> {
        self.tick();
        self.inner.inventory(id).await
    }

    async fn inventories_for_site(
        &self,
        site_id: ResourceId,
    ) -> Result<Vec<Inventory>, StoreError> {
        self.tick();
        self.inner.inventories_for_site(site_id).await
    }

    async fn insert_inventory(&self, inventory: Inventory) -> Result<Inventory, StoreError> {
        self.tick();
        self.inner.insert_inventory(inventory).await
    }

    async fn update_inventory(&self, inventory: Inventory) -> Result<(), StoreError> {
        self.tick();
        self.inner.update_inventory(inventory).await
    }

    async fn delete_inventory(&self, id: ResourceId) -> Result<(), StoreError> {
        self.tick();
        self.inner.delete_inventory(id).await
    }

    async fn well(&self, id: ResourceId) -> Result<Option<Well>, StoreError> {
        self.tick();
        self.inner.well(id).await
    }

    async fn wells_for_inventory(
        &self,
        inventory_id: ResourceId,
    ) -> Result<Vec<Well>, StoreError> {
        self.tick();
        self.inner.wells_for_inventory(inventory_id).await
    }

    async fn insert_well(&self, well: Well) -> Result<Well, StoreError> {
        self.tick();
        self.inner.insert_well(well).await
    }

    async fn update_well(&self, well: Well) -> Result<(), StoreError> {
        self.tick();
        self.inner.update_well(well).await
    }

    async fn delete_well(&self, id: ResourceId) -> Result<(), StoreError> {
        self.tick();
        self.inner.delete_well(id).await
    }

    async fn contact(&self, id: ResourceId) -> Result<Option<Contact>, StoreError> {
        self.tick();
        self.inner.contact(id).await
    }

    async fn contacts_for_site(&self, site_id: ResourceId) -> Result<Vec<Contact>, StoreError> {
        self.tick();
        self.inner.contacts_for_site(site_id).await
    }

    async fn insert_contact(&self, contact: Contact) -> Result<Contact, StoreError> {
        self.tick();
        self.inner.insert_contact(contact).await
    }

    async fn delete_contact(&self, id: ResourceId) -> Result<(), StoreError> {
        self.tick();
        self.inner.delete_contact(id).await
    }

    async fn notification(&self, id: ResourceId) -> Result<Option<Notification>, StoreError> {
        self.tick();
        self.inner.notification(id).await
    }

    async fn insert_notification(
        &self,
        notification: Notification,
    ) -> Result<Notification, StoreError> {
        self.tick();
        self.inner.insert_notification(notification).await
    }

    async fn receipt(&self, id: ResourceId) -> Result<Option<NotificationReceipt>, StoreError> {
        self.tick();
        self.inner.receipt(id).await
    }

    async fn receipts_for_account(
        &self,
        account_id: ResourceId,
    ) -> Result<Vec<NotificationReceipt>, StoreError> {
        self.tick();
        self.inner.receipts_for_account(account_id).await
    }

    async fn insert_receipt(
        &self,
        receipt: NotificationReceipt,
    ) -> Result<NotificationReceipt, StoreError> {
        self.tick();
        self.inner.insert_receipt(receipt).await
    }

    async fn update_receipt(&self, receipt: NotificationReceipt) -> Result<(), StoreError> {
        self.tick();
        self.inner.update_receipt(receipt).await
    }
}
