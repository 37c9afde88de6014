pub mod dashboard;
pub mod grouped_bar_chart;
pub mod palette;
pub mod pie_chart;

pub use dashboard::OpportunityAnalysisDashboard;
