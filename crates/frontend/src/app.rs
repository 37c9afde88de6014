use leptos::prelude::*;
use thaw::ConfigProvider;

use crate::dashboards::d400_opportunity_analysis::ui::OpportunityAnalysisDashboard;

#[component]
pub fn App() -> impl IntoView {
    view! {
        <ConfigProvider>
            <OpportunityAnalysisDashboard />
        </ConfigProvider>
    }
}
