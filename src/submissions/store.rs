use async_trait::async_trait;

use super::domain::{
    Account, Contact, Inventory, Notification, NotificationReceipt, ResourceId, Site, Well,
};

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Storage abstraction over the submission records. Lookups return `None` for
/// missing rows so requirement checks can turn absence into their own coded
/// failures; mutations are individually atomic but nothing is transactional
/// across calls.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    async fn account(&self, id: ResourceId) -> Result<Option<Account>, StoreError>;
    async fn account_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<Account>, StoreError>;
    async fn insert_account(&self, account: Account) -> Result<Account, StoreError>;
    async fn update_account(&self, account: Account) -> Result<(), StoreError>;
    /// Accounts with the notification-subscription flag set.
    async fn subscribed_accounts(&self) -> Result<Vec<Account>, StoreError>;

    async fn site(&self, id: ResourceId) -> Result<Option<Site>, StoreError>;
    async fn insert_site(&self, site: Site) -> Result<Site, StoreError>;
    async fn update_site(&self, site: Site) -> Result<(), StoreError>;

    async fn inventory(&self, id: ResourceId) -> Result<Option<Inventory>, StoreError>;
    async fn inventories_for_site(&self, site_id: ResourceId)
        -> Result<Vec<Inventory>, StoreError>;
    async fn insert_inventory(&self, inventory: Inventory) -> Result<Inventory, StoreError>;
    async fn update_inventory(&self, inventory: Inventory) -> Result<(), StoreError>;
    async fn delete_inventory(&self, id: ResourceId) -> Result<(), StoreError>;

    async fn well(&self, id: ResourceId) -> Result<Option<Well>, StoreError>;
    async fn wells_for_inventory(&self, inventory_id: ResourceId)
        -> Result<Vec<Well>, StoreError>;
    async fn insert_well(&self, well: Well) -> Result<Well, StoreError>;
    async fn update_well(&self, well: Well) -> Result<(), StoreError>;
    async fn delete_well(&self, id: ResourceId) -> Result<(), StoreError>;

    async fn contact(&self, id: ResourceId) -> Result<Option<Contact>, StoreError>;
    async fn contacts_for_site(&self, site_id: ResourceId) -> Result<Vec<Contact>, StoreError>;
    async fn insert_contact(&self, contact: Contact) -> Result<Contact, StoreError>;
    async fn delete_contact(&self, id: ResourceId) -> Result<(), StoreError>;

    async fn notification(&self, id: ResourceId) -> Result<Option<Notification>, StoreError>;
    async fn insert_notification(
        &self,
        notification: Notification,
    ) -> Result<Notification, StoreError>;

    async fn receipt(&self, id: ResourceId) -> Result<Option<NotificationReceipt>, StoreError>;
    async fn receipts_for_account(
        &self,
        account_id: ResourceId,
    ) -> Result<Vec<NotificationReceipt>, StoreError>;
    async fn insert_receipt(
        &self,
        receipt: NotificationReceipt,
    ) -> Result<NotificationReceipt, StoreError>;
    async fn update_receipt(&self, receipt: NotificationReceipt) -> Result<(), StoreError>;
}
