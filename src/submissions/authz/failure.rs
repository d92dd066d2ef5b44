use serde::Serialize;

/// Stable machine code for every way a requirement can fail. Codes are part of
/// the wire contract and never renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureCode {
    /// A01: request carries no identity at all.
    NoIdentity,
    /// A02: identity present but missing the external account claim.
    MissingAccountClaim,
    /// A03: no account row matches the identity claim.
    NoAccountForIdentity,
    /// A04: operation is restricted to elevated accounts.
    ElevatedAccountRequired,
    /// A05: account profile has empty contact fields.
    IncompleteProfile,
    /// A06: target account does not exist.
    AccountNotFound,
    /// A07: target account belongs to someone else.
    AccountNotOwned,
    /// S01: site belongs to someone else.
    SiteNotOwned,
    /// S02: site does not exist.
    SiteNotFound,
    /// S03: site has not reached complete status.
    SiteNotComplete,
    /// S04: site status outside the expected set.
    UnexpectedSiteStatus,
    /// I01: inventory belongs to someone else.
    InventoryNotOwned,
    /// I02: inventory does not exist.
    InventoryNotFound,
    /// I06: inventory carries an unresolved issue flag.
    InventoryFlagged,
    /// IS01: inventory status outside the expected set.
    UnexpectedInventoryStatus,
    /// IS02: completeness items are missing.
    InventoryIncomplete,
    /// IS03: inventory is not in a reviewable status.
    InventoryNotReviewable,
    /// IS04: inventory has not been approved.
    InventoryNotApproved,
    /// IS05: remediation inventory lacks a qualifying site contact.
    RemediationContactMissing,
    /// IA01: staff edocs reference has not been assigned.
    EdocsMissing,
    /// IA02: program site identifier has not been assigned.
    SiteReferenceMissing,
    /// W01: well belongs to someone else.
    WellNotOwned,
    /// W02: well does not exist.
    WellNotFound,
    /// N01: notification belongs to someone else.
    NotificationNotOwned,
    /// N02: notification does not exist.
    NotificationNotFound,
}

/// Code family, used by HTTP-facing wrappers to pick a response class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// No usable identity on the request.
    Unauthenticated,
    /// Target entity could not be resolved.
    NotFound,
    /// Identity resolved but lacks ownership or privilege.
    Forbidden,
    /// The action is not currently legal given lifecycle state.
    WorkflowState,
}

impl FailureCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoIdentity => "A01",
            Self::MissingAccountClaim => "A02",
            Self::NoAccountForIdentity => "A03",
            Self::ElevatedAccountRequired => "A04",
            Self::IncompleteProfile => "A05",
            Self::AccountNotFound => "A06",
            Self::AccountNotOwned => "A07",
            Self::SiteNotOwned => "S01",
            Self::SiteNotFound => "S02",
            Self::SiteNotComplete => "S03",
            Self::UnexpectedSiteStatus => "S04",
            Self::InventoryNotOwned => "I01",
            Self::InventoryNotFound => "I02",
            Self::InventoryFlagged => "I06",
            Self::UnexpectedInventoryStatus => "IS01",
            Self::InventoryIncomplete => "IS02",
            Self::InventoryNotReviewable => "IS03",
            Self::InventoryNotApproved => "IS04",
            Self::RemediationContactMissing => "IS05",
            Self::EdocsMissing => "IA01",
            Self::SiteReferenceMissing => "IA02",
            Self::WellNotOwned => "W01",
            Self::WellNotFound => "W02",
            Self::NotificationNotOwned => "N01",
            Self::NotificationNotFound => "N02",
        }
    }

    pub const fn kind(self) -> FailureKind {
        match self {
            Self::NoIdentity | Self::MissingAccountClaim => FailureKind::Unauthenticated,
            Self::NoAccountForIdentity
            | Self::AccountNotFound
            | Self::SiteNotFound
            | Self::InventoryNotFound
            | Self::WellNotFound
            | Self::NotificationNotFound => FailureKind::NotFound,
            Self::ElevatedAccountRequired
            | Self::AccountNotOwned
            | Self::SiteNotOwned
            | Self::InventoryNotOwned
            | Self::WellNotOwned
            | Self::NotificationNotOwned => FailureKind::Forbidden,
            Self::IncompleteProfile
            | Self::SiteNotComplete
            | Self::UnexpectedSiteStatus
            | Self::InventoryFlagged
            | Self::UnexpectedInventoryStatus
            | Self::InventoryIncomplete
            | Self::InventoryNotReviewable
            | Self::InventoryNotApproved
            | Self::RemediationContactMissing
            | Self::EdocsMissing
            | Self::SiteReferenceMissing => FailureKind::WorkflowState,
        }
    }

    const fn canonical_message(self) -> &'static str {
        match self {
            Self::NoIdentity => "There is no identity on the request.",
            Self::MissingAccountClaim => "The identity is missing the account claim.",
            Self::NoAccountForIdentity => "There is no account for this identity.",
            Self::ElevatedAccountRequired => "This action requires an elevated account.",
            Self::IncompleteProfile => "The account profile is incomplete.",
            Self::AccountNotFound => "There is no account with that id.",
            Self::AccountNotOwned => "The account does not belong to this identity.",
            Self::SiteNotOwned => "The site does not belong to this account.",
            Self::SiteNotFound => "There is no site with that id.",
            Self::SiteNotComplete => "The site has not been completed.",
            Self::UnexpectedSiteStatus => "The site status does not allow this action.",
            Self::InventoryNotOwned => "The inventory does not belong to this account.",
            Self::InventoryNotFound => "There is no inventory with that id.",
            Self::InventoryFlagged => "The inventory has flagged issues that must be resolved.",
            Self::UnexpectedInventoryStatus => {
                "The inventory status does not allow this action."
            }
            Self::InventoryIncomplete => "The inventory is missing required completeness items.",
            Self::InventoryNotReviewable => "The inventory is not ready for review.",
            Self::InventoryNotApproved => "The inventory has not been approved.",
            Self::RemediationContactMissing => {
                "A remediation inventory requires a qualifying site contact."
            }
            Self::EdocsMissing => "The inventory is missing its edocs reference.",
            Self::SiteReferenceMissing => "The site is missing its assigned site identifier.",
            Self::WellNotOwned => "The well does not belong to this account.",
            Self::WellNotFound => "There is no well with that id.",
            Self::NotificationNotOwned => "The notification does not belong to this account.",
            Self::NotificationNotFound => "There is no notification with that id.",
        }
    }

    pub fn failure(self) -> RequirementFailure {
        RequirementFailure {
            code: self,
            message: self.canonical_message().to_string(),
        }
    }

    pub fn failure_with(self, message: impl Into<String>) -> RequirementFailure {
        RequirementFailure {
            code: self,
            message: message.into(),
        }
    }
}

/// A denied requirement: stable code plus human message. `Display` renders the
/// `"CODE:message"` wire format callers split on the first colon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequirementFailure {
    pub code: FailureCode,
    pub message: String,
}

impl std::fmt::Display for RequirementFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for RequirementFailure {}
