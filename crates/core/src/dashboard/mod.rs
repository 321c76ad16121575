//! Dashboard aggregation: report windows and the summary reducer.

pub mod summary;
pub mod window;

pub use summary::{
    DashboardSummary, OrderFacts, QuotationCounts, QuotationFacts, RecentOrder, RecentQuotation,
    StageProgress, summarize,
};
pub use window::ReportWindow;
