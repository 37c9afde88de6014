use chrono::Utc;
use contracts::dashboards::d400_opportunity_analysis::{
    ExportRequest, ExportTable, LobReportRow, OpportunityAnalysisRequest,
    OpportunityAnalysisResponse, ProducerReportRow, ReportStatus,
};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::grouped_bar_chart::GroupedBarChart;
use super::pie_chart::PieChart;
use crate::dashboards::d400_opportunity_analysis::api;
use crate::shared::components::DateRangePicker;
use crate::shared::date_utils::{format_date, last_days};
use crate::shared::format::format_count;

const DEFAULT_DAYS: i64 = 30;

/// Opportunity analysis dashboard
///
/// Nothing is queried until the Salesforce connection has been tested once.
/// After that, every change of the period runs the report again.
#[component]
pub fn OpportunityAnalysisDashboard() -> impl IntoView {
    let (initial_from, initial_to) = last_days(Utc::now().date_naive(), DEFAULT_DAYS);
    let date_from = RwSignal::new(initial_from);
    let date_to = RwSignal::new(initial_to);

    // Connection state
    let connected = RwSignal::new(false);
    let connecting = RwSignal::new(false);
    let connection_error = RwSignal::new(None::<String>);
    let instance_url = RwSignal::new(None::<String>);

    // Report state
    let data = RwSignal::new(None::<OpportunityAnalysisResponse>);
    let loading = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);
    let show_raw = RwSignal::new(false);

    // Only the latest request may write its result
    let request_seq = StoredValue::new(0u64);

    let on_connect = move |_| {
        connecting.set(true);
        connection_error.set(None);
        spawn_local(async move {
            match api::test_connection().await {
                Ok(result) if result.success => {
                    log::info!("D400: connected to {:?}", result.instance_url);
                    instance_url.set(result.instance_url);
                    connected.set(true);
                }
                Ok(result) => connection_error.set(Some(result.message)),
                Err(e) => connection_error.set(Some(e)),
            }
            connecting.set(false);
        });
    };

    Effect::new(move |_| {
        if !connected.get() {
            return;
        }
        let request = OpportunityAnalysisRequest::new(date_from.get(), date_to.get());

        let seq = request_seq.get_value() + 1;
        request_seq.set_value(seq);
        loading.set(true);
        error.set(None);

        spawn_local(async move {
            let result = api::get_opportunity_analysis(&request).await;
            if request_seq.get_value() != seq {
                return;
            }
            match result {
                Ok(response) => {
                    if let Some(message) = &response.error {
                        log::error!("D400: report failed: {}", message);
                    }
                    data.set(Some(response));
                }
                Err(e) => {
                    log::error!("D400: request failed: {}", e);
                    error.set(Some(e));
                }
            }
            loading.set(false);
        });
    });

    let on_range_change = Callback::new(move |(from, to): (String, String)| {
        date_from.set(from);
        date_to.set(to);
    });

    let export_link = move |table: ExportTable| {
        api::export_url(&ExportRequest {
            date_from: Some(date_from.get()),
            date_to: Some(date_to.get()),
            table,
        })
    };

    view! {
        <div id="d400_opportunity_analysis--dashboard" class="d400-dashboard" style="padding: 16px;">
            <h2>"Opportunity Analysis"</h2>

            <Show
                when=move || connected.get()
                fallback=move || view! {
                    <Flex vertical=true gap=FlexGap::Medium>
                        <div>"Connect to Salesforce to load opportunity data."</div>
                        <div>
                            <Button
                                appearance=ButtonAppearance::Primary
                                disabled=connecting
                                on_click=on_connect
                            >
                                "Authenticate to Salesforce"
                            </Button>
                        </div>
                        {move || connecting.get().then(|| view! { <Spinner /> })}
                        {move || connection_error.get().map(|message| view! {
                            <MessageBar intent=MessageBarIntent::Error>
                                <div>{message}</div>
                            </MessageBar>
                        })}
                    </Flex>
                }
            >
                <Flex vertical=true gap=FlexGap::Large>
                    <MessageBar intent=MessageBarIntent::Success>
                        <div>
                            "Connected to Salesforce"
                            {move || instance_url.get().map(|url| format!(" ({})", url))}
                        </div>
                    </MessageBar>

                    <DateRangePicker
                        date_from=date_from
                        date_to=date_to
                        on_change=on_range_change
                        default_days=DEFAULT_DAYS
                        label="Opportunities created between".to_string()
                    />

                    {move || loading.get().then(|| view! {
                        <div class="d400-loading">
                            <Spinner />
                            <span>"Loading data..."</span>
                        </div>
                    })}

                    {move || error.get().map(|err| view! {
                        <MessageBar intent=MessageBarIntent::Error>
                            <div>{err}</div>
                        </MessageBar>
                    })}

                    {move || data.get().map(|response| report_view(response, show_raw, export_link))}
                </Flex>
            </Show>
        </div>
    }
}

fn report_view(
    response: OpportunityAnalysisResponse,
    show_raw: RwSignal<bool>,
    export_link: impl Fn(ExportTable) -> String + Copy + Send + Sync + 'static,
) -> AnyView {
    if response.status == ReportStatus::Failed {
        let message = response
            .error
            .unwrap_or_else(|| "Report generation failed".to_string());
        return view! {
            <MessageBar intent=MessageBarIntent::Error>
                <div>{message}</div>
            </MessageBar>
        }
        .into_any();
    }

    let period = format!(
        "{} - {}: {} opportunities",
        format_date(&response.date_from),
        format_date(&response.date_to),
        format_count(response.total_opportunities())
    );
    let unmapped = response.unmapped_types.clone();
    let lob_summary = response.lob_summary;
    let producer_summary = response.producer_summary;
    let lob_rows = StoredValue::new(response.lob_rows);
    let producer_rows = StoredValue::new(response.producer_rows);

    view! {
        <Flex vertical=true gap=FlexGap::Large>
            <div class="d400-period"><strong>{period}</strong></div>

            {(!unmapped.is_empty()).then(|| view! {
                <MessageBar intent=MessageBarIntent::Warning>
                    <div>{format!("Counted as Other (no line of business rule): {}", unmapped.join(", "))}</div>
                </MessageBar>
            })}

            <PieChart totals=Signal::stored(lob_summary) />
            <GroupedBarChart totals=Signal::stored(producer_summary) />

            <Checkbox checked=show_raw label="Show raw data" />

            <Show when=move || show_raw.get()>
                <Flex vertical=true gap=FlexGap::Large>
                    <div>
                        <h3>"Opportunities by Type"</h3>
                        <a href=move || export_link(ExportTable::Lob) download="">"Download CSV"</a>
                        <LobTable rows=lob_rows.get_value() />
                    </div>
                    <div>
                        <h3>"Opportunities by Producer"</h3>
                        <a href=move || export_link(ExportTable::Producer) download="">"Download CSV"</a>
                        <ProducerTable rows=producer_rows.get_value() />
                    </div>
                </Flex>
            </Show>
        </Flex>
    }
    .into_any()
}

fn type_label(opportunity_type: &Option<String>) -> String {
    opportunity_type.clone().unwrap_or_else(|| "(none)".to_string())
}

#[component]
fn LobTable(rows: Vec<LobReportRow>) -> impl IntoView {
    view! {
        <Table>
            <TableHeader>
                <TableRow>
                    <TableHeaderCell min_width=200.0>"Opportunity Type"</TableHeaderCell>
                    <TableHeaderCell min_width=150.0>"LOB Category"</TableHeaderCell>
                    <TableHeaderCell min_width=80.0>"Count"</TableHeaderCell>
                </TableRow>
            </TableHeader>
            <TableBody>
                {rows
                    .into_iter()
                    .map(|row| view! {
                        <TableRow>
                            <TableCell><TableCellLayout>{type_label(&row.opportunity_type)}</TableCellLayout></TableCell>
                            <TableCell><TableCellLayout>{row.lob_category}</TableCellLayout></TableCell>
                            <TableCell><TableCellLayout>{format_count(row.count)}</TableCellLayout></TableCell>
                        </TableRow>
                    })
                    .collect_view()}
            </TableBody>
        </Table>
    }
}

#[component]
fn ProducerTable(rows: Vec<ProducerReportRow>) -> impl IntoView {
    view! {
        <Table>
            <TableHeader>
                <TableRow>
                    <TableHeaderCell min_width=180.0>"Producer"</TableHeaderCell>
                    <TableHeaderCell min_width=200.0>"Opportunity Type"</TableHeaderCell>
                    <TableHeaderCell min_width=150.0>"LOB Category"</TableHeaderCell>
                    <TableHeaderCell min_width=80.0>"Count"</TableHeaderCell>
                </TableRow>
            </TableHeader>
            <TableBody>
                {rows
                    .into_iter()
                    .map(|row| view! {
                        <TableRow>
                            <TableCell><TableCellLayout>{row.producer}</TableCellLayout></TableCell>
                            <TableCell><TableCellLayout>{type_label(&row.opportunity_type)}</TableCellLayout></TableCell>
                            <TableCell><TableCellLayout>{row.lob_category}</TableCellLayout></TableCell>
                            <TableCell><TableCellLayout>{format_count(row.count)}</TableCellLayout></TableCell>
                        </TableRow>
                    })
                    .collect_view()}
            </TableBody>
        </Table>
    }
}
