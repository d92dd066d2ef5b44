use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper shared by every stored record. Stores never allocate zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceId(pub u64);

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Privilege tier for an accountholder. Elevated accounts are staff reviewers
/// exempt from ownership checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    Standard,
    Elevated,
}

impl AccessLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Elevated => "elevated",
        }
    }
}

/// Accountholder identity and profile. Owns sites, inventories, and wells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: ResourceId,
    pub external_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub organization: String,
    pub access_level: AccessLevel,
    pub subscribed: bool,
    pub deactivated: bool,
}

impl Account {
    /// A profile is complete once every contact field carries a value.
    pub fn profile_complete(&self) -> bool {
        !self.first_name.is_empty()
            && !self.last_name.is_empty()
            && !self.email.is_empty()
            && !self.phone.is_empty()
            && !self.organization.is_empty()
    }

    pub fn is_elevated(&self) -> bool {
        self.access_level == AccessLevel::Elevated
    }

    /// Soft deletion: strip PII, drop back to standard access, stop notifying.
    pub fn anonymize(&mut self) {
        self.first_name.clear();
        self.last_name.clear();
        self.email.clear();
        self.phone.clear();
        self.organization.clear();
        self.access_level = AccessLevel::Standard;
        self.subscribed = false;
        self.deactivated = true;
    }
}

/// Lifecycle state for a facility site. Ordered so later stages compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteStatus {
    Incomplete,
    Complete,
    Submitted,
    Authorized,
    Ingested,
}

impl SiteStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Incomplete => "incomplete",
            Self::Complete => "complete",
            Self::Submitted => "submitted",
            Self::Authorized => "authorized",
            Self::Ingested => "ingested",
        }
    }
}

/// A facility location owned by one account. Owns contacts, wells, inventories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub id: ResourceId,
    pub account_id: ResourceId,
    pub name: String,
    /// Program-assigned site identifier (e.g. "UTU01S0001"); empty until staff
    /// assign one during review.
    pub external_reference: String,
    pub status: SiteStatus,
}

/// Lifecycle state for an injection-well inventory. The derivation engine only
/// ever moves an inventory between the first two states; everything from
/// `Submitted` on is driven by explicit, policy-gated operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryStatus {
    Incomplete,
    Complete,
    Submitted,
    UnderReview,
    Approved,
    Authorized,
    Completed,
}

impl InventoryStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Incomplete => "incomplete",
            Self::Complete => "complete",
            Self::Submitted => "submitted",
            Self::UnderReview => "under_review",
            Self::Approved => "approved",
            Self::Authorized => "authorized",
            Self::Completed => "completed",
        }
    }

    pub fn has_reached(self, milestone: InventoryStatus) -> bool {
        self >= milestone
    }
}

/// Well subclass marking subsurface environmental remediation, which carries
/// extra completeness rules.
pub const SER_SUB_CLASS: i32 = 5002;

/// Subclasses eligible for fee processing.
pub const PAYMENT_SUB_CLASSES: [i32; 5] = [-1, 5047, SER_SUB_CLASS, 5101, 5026];

/// Cached completeness snapshot for an inventory. The derivation engine in
/// `status` is the only writer; every read path treats it as a cache of the
/// live child records, not a source of truth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletenessSnapshot {
    pub details: bool,
    pub contacts: bool,
    pub location: bool,
    pub payment: bool,
    pub signature: bool,
}

/// An injection-well inventory submission owned by one account and one site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub id: ResourceId,
    pub account_id: ResourceId,
    pub site_id: ResourceId,
    pub status: InventoryStatus,
    pub sub_class: i32,
    pub order_number: Option<u32>,
    pub signature: String,
    /// Free-text issue marker set by staff; non-empty blocks approval.
    pub flagged: String,
    /// Staff-assigned electronic-documents reference, required for approval.
    pub edocs: String,
    pub completeness: CompletenessSnapshot,
}

impl Inventory {
    pub fn is_flagged(&self) -> bool {
        !self.flagged.is_empty()
    }
}

/// A single well belonging to an inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Well {
    pub id: ResourceId,
    pub account_id: ResourceId,
    pub inventory_id: ResourceId,
    pub name: String,
    /// Operating-status code (e.g. "AC", "PA").
    pub operating_status: String,
    pub quantity: u32,
    pub geometry: String,
    pub construction_details: String,
    pub injectate_characterization: String,
    pub sub_class: i32,
}

impl Well {
    pub fn is_remediation(&self) -> bool {
        self.sub_class == SER_SUB_CLASS
    }
}

/// Role a contact plays for a site. Only the first three satisfy the site
/// contact-coverage rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactType {
    OwnerOperator,
    FacilityOwner,
    LegalRep,
    Consultant,
    Other,
}

impl ContactType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::OwnerOperator => "owner_operator",
            Self::FacilityOwner => "facility_owner",
            Self::LegalRep => "legal_rep",
            Self::Consultant => "consultant",
            Self::Other => "other",
        }
    }

    pub const fn qualifies_for_site(self) -> bool {
        matches!(
            self,
            Self::OwnerOperator | Self::FacilityOwner | Self::LegalRep
        )
    }
}

/// A person attached to a site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ResourceId,
    pub site_id: ResourceId,
    pub name: String,
    pub email: String,
    pub contact_type: ContactType,
}

/// Event families that fan out to subscribed accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationEvent {
    ContactAdded,
    ContactRemoved,
    WellStatusChanged,
    AccountPromoted,
}

impl NotificationEvent {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ContactAdded => "contact_added",
            Self::ContactRemoved => "contact_removed",
            Self::WellStatusChanged => "well_status_changed",
            Self::AccountPromoted => "account_promoted",
        }
    }
}

/// A persisted notification, shared by every receipt that references it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: ResourceId,
    pub event: NotificationEvent,
    pub created_at: DateTime<Utc>,
    pub url: String,
    pub additional_data: BTreeMap<String, String>,
}

/// Per-account delivery state for one notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationReceipt {
    pub id: ResourceId,
    pub account_id: ResourceId,
    pub notification_id: ResourceId,
    pub read_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl NotificationReceipt {
    pub fn is_unread(&self) -> bool {
        self.read_at.is_none()
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}
