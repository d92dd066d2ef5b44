use clap::Args;
use std::sync::Arc;
use uic_registry::error::AppError;
use uic_registry::submissions::{
    AccessLevel, AccountProfile, ContactType, Identity, InMemoryResourceStore,
    InventoryAnnotation, InventoryPatch, NewContact, NewInventory, NewSite, NewWell,
    ResourceStore, ServiceError, SubmissionService, WellPatch,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Base URL used for notification links in the demo output
    #[arg(long, default_value = "https://registry.example.gov")]
    pub(crate) base_url: String,
    /// Skip the staff-review portion of the walkthrough
    #[arg(long)]
    pub(crate) skip_review: bool,
}

/// End-to-end walkthrough on the in-memory store: an accountholder files an
/// inventory, staff review it, and subscribed accounts pick up the resulting
/// notifications.
pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let store = Arc::new(InMemoryResourceStore::default());
    let service = SubmissionService::new(store.clone(), args.base_url.clone());

    println!("== registering accounts ==");
    let operator = service
        .register_account(
            Identity::with_external_id("login|operator-1"),
            AccountProfile {
                first_name: "Dana".to_string(),
                last_name: "Fielding".to_string(),
                email: "dana@riverbend.example".to_string(),
                phone: "555-0147".to_string(),
                organization: "Riverbend Disposal LLC".to_string(),
                subscribed: true,
            },
        )
        .await?;
    println!("operator account #{}", operator.id);

    let reviewer = service
        .register_account(
            Identity::with_external_id("login|reviewer-1"),
            AccountProfile {
                first_name: "Sam".to_string(),
                last_name: "Okafor".to_string(),
                email: "sam@agency.example".to_string(),
                phone: "555-0102".to_string(),
                organization: "State UIC Program".to_string(),
                subscribed: true,
            },
        )
        .await?;
    // Bootstrap: promote the first reviewer directly through the store, the
    // way a deployment seed script would.
    let mut elevated = reviewer.clone();
    elevated.access_level = AccessLevel::Elevated;
    store
        .update_account(elevated)
        .await
        .map_err(ServiceError::from)?;
    println!("reviewer account #{} (elevated)", reviewer.id);

    let operator_identity = Identity::with_external_id("login|operator-1");
    let reviewer_identity = Identity::with_external_id("login|reviewer-1");

    println!("\n== building the site ==");
    let site = service
        .create_site(
            operator_identity.clone(),
            NewSite {
                name: "Riverbend Facility".to_string(),
            },
        )
        .await?;
    println!("site #{} status: {}", site.id, site.status.label());

    let contact = service
        .add_contact(
            operator_identity.clone(),
            site.id,
            NewContact {
                name: "Dana Fielding".to_string(),
                email: "dana@riverbend.example".to_string(),
                contact_type: ContactType::OwnerOperator,
            },
        )
        .await?;
    println!("added {} contact #{}", contact.contact_type.label(), contact.id);

    println!("\n== filing the inventory ==");
    let inventory = service
        .create_inventory(operator_identity.clone(), site.id, NewInventory { sub_class: 5047 })
        .await?;
    let well = service
        .create_well(
            operator_identity.clone(),
            inventory.id,
            NewWell {
                name: "IW-1".to_string(),
                operating_status: "AC".to_string(),
                quantity: 2,
                geometry: "{\"type\":\"Point\",\"coordinates\":[-111.89,40.76]}".to_string(),
                construction_details: "steel casing to 120ft, cement grout".to_string(),
                injectate_characterization: String::new(),
                sub_class: 5047,
            },
        )
        .await?;
    println!("well #{} added", well.id);

    let inventory = service
        .update_inventory(
            operator_identity.clone(),
            inventory.id,
            InventoryPatch {
                sub_class: None,
                order_number: Some(2_440_051),
                signature: Some("Dana Fielding, authorized agent".to_string()),
            },
        )
        .await?;
    println!(
        "inventory #{} status: {} (details {}, contacts {}, location {}, payment {}, signature {})",
        inventory.id,
        inventory.status.label(),
        inventory.completeness.details,
        inventory.completeness.contacts,
        inventory.completeness.location,
        inventory.completeness.payment,
        inventory.completeness.signature,
    );

    let inventory = service
        .submit_inventory(operator_identity.clone(), inventory.id)
        .await?;
    println!("inventory submitted: {}", inventory.status.label());

    if args.skip_review {
        println!("\n(skipping staff review)");
        return Ok(());
    }

    println!("\n== staff review ==");
    let inventory = service
        .review_inventory(reviewer_identity.clone(), inventory.id)
        .await?;
    println!("inventory status: {}", inventory.status.label());

    service
        .annotate_inventory(
            reviewer_identity.clone(),
            inventory.id,
            InventoryAnnotation {
                edocs: Some("EDOCS-119204".to_string()),
                flagged: None,
                site_reference: Some("UTU01S0042".to_string()),
            },
        )
        .await?;
    println!("edocs and site identifier assigned");

    let inventory = service
        .approve_inventory(reviewer_identity.clone(), inventory.id)
        .await?;
    println!("inventory status: {}", inventory.status.label());

    let inventory = service
        .authorize_inventory(reviewer_identity.clone(), inventory.id)
        .await?;
    println!("inventory status: {}", inventory.status.label());

    println!("\n== post-authorization contact change ==");
    service
        .add_contact(
            operator_identity.clone(),
            site.id,
            NewContact {
                name: "Lee Ramos".to_string(),
                email: "lee@riverbend.example".to_string(),
                contact_type: ContactType::LegalRep,
            },
        )
        .await?;

    // A well operating-status edit past submission also notifies.
    service
        .update_well(
            operator_identity.clone(),
            well.id,
            WellPatch {
                operating_status: Some("PA".to_string()),
                ..WellPatch::default()
            },
        )
        .await?;

    for identity in [operator_identity, reviewer_identity] {
        let views = service.list_notifications(identity.clone()).await?;
        println!("\nnotifications for {identity:?}:");
        for view in views {
            println!("  [{}] {} -> {}", view.id, view.event_type, view.url);
        }
    }

    Ok(())
}
