//! Initial database migration.
//!
//! Creates all enums, tables, and indexes for the studio pipeline:
//! customers → quotations → orders → payments/expenses, plus the
//! per-(kind, year) document number counters.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: CUSTOMERS
        // ============================================================
        db.execute_unprepared(CUSTOMERS_SQL).await?;

        // ============================================================
        // PART 3: QUOTATIONS
        // ============================================================
        db.execute_unprepared(QUOTATIONS_SQL).await?;
        db.execute_unprepared(QUOTATION_ITEMS_SQL).await?;

        // ============================================================
        // PART 4: ORDERS
        // ============================================================
        db.execute_unprepared(ORDERS_SQL).await?;
        db.execute_unprepared(ORDER_ITEMS_SQL).await?;

        // ============================================================
        // PART 5: PAYMENTS & EXPENSES
        // ============================================================
        db.execute_unprepared(PAYMENTS_SQL).await?;
        db.execute_unprepared(EXPENSES_SQL).await?;

        // ============================================================
        // PART 6: DOCUMENT NUMBER COUNTERS
        // ============================================================
        db.execute_unprepared(DOCUMENT_COUNTERS_SQL).await?;

        // ============================================================
        // PART 7: INDEXES
        // ============================================================
        db.execute_unprepared(INDEXES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Quotation lifecycle
CREATE TYPE quotation_status AS ENUM (
    'draft',
    'pending',
    'confirmed',
    'declined'
);

-- Order payment progress
CREATE TYPE payment_status AS ENUM (
    'pending',
    'partial',
    'paid'
);

-- How a payment was made
CREATE TYPE payment_method AS ENUM (
    'cash',
    'upi',
    'bank_transfer',
    'cheque',
    'card'
);

-- Line item categories
CREATE TYPE item_category AS ENUM (
    'photography',
    'videography',
    'additional_services',
    'album',
    'print_gifts'
);
";

const CUSTOMERS_SQL: &str = r"
CREATE TABLE customers (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL,
    phone TEXT NOT NULL,
    email TEXT,
    address TEXT,
    source TEXT,
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const QUOTATIONS_SQL: &str = r"
CREATE TABLE quotations (
    id UUID PRIMARY KEY,
    quotation_number TEXT NOT NULL UNIQUE,
    customer_id UUID NOT NULL REFERENCES customers(id),
    event_type TEXT NOT NULL,
    event_date DATE NOT NULL,
    event_end_date DATE,
    venue TEXT,
    city TEXT,
    package TEXT,
    -- Primary-service coverage details off the intake form
    photo_type TEXT,
    video_type TEXT,
    area TEXT,
    camera_count INTEGER,
    rate NUMERIC(14, 2),
    session TEXT,
    -- Promised deliverables
    album_count INTEGER,
    album_sheets INTEGER,
    album_photos INTEGER,
    album_size TEXT,
    mini_books INTEGER,
    calendars INTEGER,
    frames INTEGER,
    status quotation_status NOT NULL DEFAULT 'draft',
    subtotal NUMERIC(14, 2) NOT NULL DEFAULT 0,
    -- NULL while a manual discount override is in force
    discount_percent NUMERIC(7, 4),
    discount_amount NUMERIC(14, 2) NOT NULL DEFAULT 0,
    -- On the books but not in any calculation
    tax_amount NUMERIC(14, 2) NOT NULL DEFAULT 0,
    total_amount NUMERIC(14, 2) NOT NULL DEFAULT 0,
    valid_until DATE NOT NULL,
    notes TEXT,
    order_id UUID,
    confirmed_at TIMESTAMPTZ,
    declined_at TIMESTAMPTZ,
    decline_reason TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const QUOTATION_ITEMS_SQL: &str = r"
CREATE TABLE quotation_items (
    id UUID PRIMARY KEY,
    quotation_id UUID NOT NULL REFERENCES quotations(id) ON DELETE CASCADE,
    category item_category NOT NULL,
    description TEXT NOT NULL,
    quantity INTEGER NOT NULL,
    unit_price NUMERIC(14, 2) NOT NULL,
    total_price NUMERIC(14, 2) NOT NULL,
    position INTEGER NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const ORDERS_SQL: &str = r"
CREATE TABLE orders (
    id UUID PRIMARY KEY,
    order_number TEXT NOT NULL UNIQUE,
    quotation_id UUID REFERENCES quotations(id),
    customer_id UUID NOT NULL REFERENCES customers(id),
    -- Snapshot fields frozen at confirmation
    customer_name TEXT NOT NULL,
    customer_phone TEXT NOT NULL,
    event_type TEXT NOT NULL,
    event_date DATE NOT NULL,
    event_end_date DATE,
    venue TEXT,
    city TEXT,
    package TEXT,
    photo_type TEXT,
    video_type TEXT,
    area TEXT,
    camera_count INTEGER,
    rate NUMERIC(14, 2),
    session TEXT,
    album_count INTEGER,
    album_sheets INTEGER,
    album_photos INTEGER,
    album_size TEXT,
    mini_books INTEGER,
    calendars INTEGER,
    frames INTEGER,
    subtotal NUMERIC(14, 2) NOT NULL DEFAULT 0,
    discount_amount NUMERIC(14, 2) NOT NULL DEFAULT 0,
    tax_amount NUMERIC(14, 2) NOT NULL DEFAULT 0,
    total_amount NUMERIC(14, 2) NOT NULL DEFAULT 0,
    final_budget NUMERIC(14, 2),
    -- Derived, recomputed in the same transaction as any affecting write
    amount_paid NUMERIC(14, 2) NOT NULL DEFAULT 0,
    balance_due NUMERIC(14, 2) NOT NULL DEFAULT 0,
    payment_status payment_status NOT NULL DEFAULT 'pending',
    workflow_status JSONB NOT NULL DEFAULT '{}',
    order_completed BOOLEAN NOT NULL DEFAULT FALSE,
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

-- Quotation back-reference to the order it spawned
ALTER TABLE quotations
    ADD CONSTRAINT fk_quotations_order_id
    FOREIGN KEY (order_id) REFERENCES orders(id) ON DELETE SET NULL;
";

const ORDER_ITEMS_SQL: &str = r"
CREATE TABLE order_items (
    id UUID PRIMARY KEY,
    order_id UUID NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
    quotation_item_id UUID REFERENCES quotation_items(id) ON DELETE SET NULL,
    category item_category NOT NULL,
    description TEXT NOT NULL,
    quantity INTEGER NOT NULL,
    unit_price NUMERIC(14, 2) NOT NULL,
    total_price NUMERIC(14, 2) NOT NULL,
    position INTEGER NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const PAYMENTS_SQL: &str = r"
CREATE TABLE payments (
    id UUID PRIMARY KEY,
    payment_number TEXT NOT NULL UNIQUE,
    order_id UUID NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
    customer_id UUID NOT NULL REFERENCES customers(id),
    amount NUMERIC(14, 2) NOT NULL,
    payment_date DATE NOT NULL,
    method payment_method NOT NULL,
    payment_type TEXT,
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const EXPENSES_SQL: &str = r"
CREATE TABLE expenses (
    id UUID PRIMARY KEY,
    order_id UUID NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
    order_item_id UUID REFERENCES order_items(id) ON DELETE SET NULL,
    category TEXT NOT NULL,
    vendor_name TEXT,
    description TEXT,
    amount NUMERIC(14, 2) NOT NULL,
    expense_date DATE NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const DOCUMENT_COUNTERS_SQL: &str = r"
CREATE TABLE document_counters (
    doc_type TEXT NOT NULL,
    year INTEGER NOT NULL,
    last_seq BIGINT NOT NULL DEFAULT 0,
    PRIMARY KEY (doc_type, year)
);
";

const INDEXES_SQL: &str = r"
CREATE INDEX idx_quotations_customer_id ON quotations(customer_id);
CREATE INDEX idx_quotations_status ON quotations(status);
CREATE INDEX idx_quotations_event_date ON quotations(event_date);
CREATE INDEX idx_quotation_items_quotation_id ON quotation_items(quotation_id);
CREATE INDEX idx_orders_customer_id ON orders(customer_id);
CREATE INDEX idx_orders_quotation_id ON orders(quotation_id);
CREATE INDEX idx_orders_event_date ON orders(event_date);
CREATE INDEX idx_orders_payment_status ON orders(payment_status);
CREATE INDEX idx_order_items_order_id ON order_items(order_id);
CREATE INDEX idx_payments_order_id ON payments(order_id);
CREATE INDEX idx_payments_customer_id ON payments(customer_id);
CREATE INDEX idx_expenses_order_id ON expenses(order_id);
CREATE INDEX idx_expenses_order_item_id ON expenses(order_item_id);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS document_counters;
DROP TABLE IF EXISTS expenses;
DROP TABLE IF EXISTS payments;
DROP TABLE IF EXISTS order_items;
ALTER TABLE IF EXISTS quotations DROP CONSTRAINT IF EXISTS fk_quotations_order_id;
DROP TABLE IF EXISTS orders;
DROP TABLE IF EXISTS quotation_items;
DROP TABLE IF EXISTS quotations;
DROP TABLE IF EXISTS customers;
DROP TYPE IF EXISTS item_category;
DROP TYPE IF EXISTS payment_method;
DROP TYPE IF EXISTS payment_status;
DROP TYPE IF EXISTS quotation_status;
";
