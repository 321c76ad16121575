//! Database seeder for Aperture development and testing.
//!
//! Seeds a demo customer and walks one booking through the full flow:
//! quotation, confirmation, an advance payment, an expense, and a couple
//! of completed production stages.
//!
//! Usage: cargo run --bin seeder

use chrono::{Duration, Utc};
use rust_decimal::Decimal;

use aperture_core::order::{ProductionStage, StageStatus};
use aperture_core::quotation::{ItemCategory, ServiceDetails};
use aperture_db::entities::sea_orm_active_enums::PaymentMethod;
use aperture_db::repositories::customer::{CreateCustomerInput, CustomerRepository};
use aperture_db::repositories::expense::{CreateExpenseInput, ExpenseRepository};
use aperture_db::repositories::order::OrderRepository;
use aperture_db::repositories::payment::{PaymentRepository, RecordPaymentInput};
use aperture_db::repositories::quotation::{
    CreateQuotationInput, QuotationItemInput, QuotationRepository,
};
use aperture_shared::AppConfig;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().expect("Failed to load configuration");

    println!("Connecting to database...");
    let db = aperture_db::connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    let customers = CustomerRepository::new(db.clone());
    let quotations = QuotationRepository::new(db.clone(), config.documents.clone());
    let orders = OrderRepository::new(db.clone(), config.documents.clone());
    let payments = PaymentRepository::new(db.clone(), config.documents.clone());
    let expenses = ExpenseRepository::new(db.clone());

    if !quotations
        .list(None)
        .await
        .expect("Failed to query quotations")
        .is_empty()
    {
        println!("Database already has quotations, skipping seed.");
        return;
    }

    println!("Seeding demo customer...");
    let customer = customers
        .create(CreateCustomerInput {
            name: "Rohan & Priya".to_string(),
            phone: "+91 98765 43210".to_string(),
            email: Some("rohan.priya@example.com".to_string()),
            address: Some("12 MG Road, Kochi".to_string()),
            source: Some("Referral".to_string()),
            notes: Some("Referred by the Nair wedding".to_string()),
        })
        .await
        .expect("Failed to create customer");
    println!("  Created customer: {}", customer.name);

    println!("Seeding demo quotation...");
    let event_date = (Utc::now() + Duration::days(45)).date_naive();
    let created = quotations
        .create(CreateQuotationInput {
            customer_id: customer.id,
            event_type: "Wedding".to_string(),
            event_date,
            event_end_date: Some(event_date + Duration::days(1)),
            venue: Some("Bolgatty Palace".to_string()),
            city: Some("Kochi".to_string()),
            package: Some("Premium".to_string()),
            details: ServiceDetails {
                photo_type: Some("Candid".to_string()),
                video_type: Some("Traditional".to_string()),
                camera_count: Some(2),
                session: Some("Full day".to_string()),
                album_count: Some(1),
                album_sheets: Some(40),
                ..ServiceDetails::default()
            },
            items: vec![
                QuotationItemInput {
                    category: ItemCategory::Photography,
                    description: "Candid photography, two days".to_string(),
                    quantity: 2,
                    unit_price: Decimal::from(35_000),
                },
                QuotationItemInput {
                    category: ItemCategory::Videography,
                    description: "Traditional video coverage".to_string(),
                    quantity: 2,
                    unit_price: Decimal::from(25_000),
                },
                QuotationItemInput {
                    category: ItemCategory::Album,
                    description: "Premium album, 40 sheets".to_string(),
                    quantity: 1,
                    unit_price: Decimal::from(10_000),
                },
            ],
            discount_percent: Decimal::from(10),
            discount_amount: None,
            notes: Some("Includes drone coverage on day one".to_string()),
        })
        .await
        .expect("Failed to create quotation");
    let quotation_id = created.quotation.id;
    println!("  Created quotation: {}", created.quotation.quotation_number);

    quotations
        .mark_pending(quotation_id)
        .await
        .expect("Failed to mark quotation pending");

    println!("Confirming quotation into an order...");
    let (_, order) = quotations
        .confirm(quotation_id)
        .await
        .expect("Failed to confirm quotation");
    println!("  Created order: {}", order.order_number);

    println!("Recording an advance payment...");
    let (payment, order) = payments
        .record(
            order.id,
            RecordPaymentInput {
                amount: Decimal::from(50_000),
                payment_date: Utc::now().date_naive(),
                method: PaymentMethod::Upi,
                payment_type: Some("Advance".to_string()),
                notes: None,
            },
        )
        .await
        .expect("Failed to record payment");
    println!(
        "  Recorded {} ({} outstanding)",
        payment.payment_number, order.balance_due
    );

    println!("Recording an expense...");
    expenses
        .create(
            order.id,
            CreateExpenseInput {
                order_item_id: None,
                category: "Album Designing".to_string(),
                vendor_name: Some("PixelCraft Studio".to_string()),
                description: Some("Outsourced album design".to_string()),
                amount: Decimal::from(8_000),
                expense_date: Utc::now().date_naive(),
            },
        )
        .await
        .expect("Failed to create expense");

    println!("Marking early production stages...");
    orders
        .set_stage(order.id, ProductionStage::PhotoSelection, StageStatus::Yes)
        .await
        .expect("Failed to set workflow stage");
    orders
        .set_stage(order.id, ProductionStage::OutdoorShoot, StageStatus::NotNeeded)
        .await
        .expect("Failed to set workflow stage");

    println!("Seeding complete!");
}
