//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. Multi-step writes run inside a single database
//! transaction; derived financial fields are recomputed before commit.

pub mod customer;
pub mod dashboard;
pub mod expense;
pub mod numbering;
pub mod order;
pub mod payment;
pub mod quotation;

pub use customer::{CreateCustomerInput, CustomerError, CustomerRepository};
pub use dashboard::{DashboardError, DashboardRepository};
pub use expense::{CreateExpenseInput, ExpenseError, ExpenseRepository, UpdateExpenseInput};
pub use numbering::next_document_number;
pub use order::{
    CreateOrderInput, OrderError, OrderItemInput, OrderRepository, OrderWithRollups,
    UpdateOrderInput,
};
pub use payment::{PaymentError, PaymentRepository, RecordPaymentInput};
pub use quotation::{
    CreateQuotationInput, QuotationItemInput, QuotationRepoError, QuotationRepository,
    QuotationWithItems, UpdateQuotationInput,
};
