//! Order domain: production workflow tracking and financial rollups.

pub mod finance;
pub mod workflow;

pub use finance::{
    ExpenseLine, ExpenseSplit, FinancialSnapshot, PaymentStatus, effective_budget,
    is_post_production, profit,
};
pub use workflow::{ProductionStage, StageStatus, WorkflowParseError, WorkflowStatus};
