use chrono::Utc;
use leptos::prelude::*;
use thaw::*;

use crate::shared::date_utils::{last_days, month_of, parse_iso, previous_month};

const INPUT_STYLE: &str = "
    margin-top: 4px;
    margin-bottom: 4px;
    padding: 0px 12px;
    font-size: 0.875rem;
    border: none;
    border-radius: var(--borderRadiusMedium, 4px);
    background: var(--colorNeutralBackground6, #fff);
    color: var(--colorNeutralForeground1, #242424);
    width: 130px;
";

/// Start and end date inputs with quick period buttons
///
/// "-1M" steps back one month from the current start date, "0M" selects
/// the current month and "ND" the last `default_days` days.
#[component]
pub fn DateRangePicker(
    /// Start date, yyyy-mm-dd
    #[prop(into)]
    date_from: Signal<String>,

    /// End date, yyyy-mm-dd
    #[prop(into)]
    date_to: Signal<String>,

    /// Called with (from, to) whenever either end changes
    on_change: Callback<(String, String)>,

    /// Length of the "last days" shortcut
    #[prop(default = 30)]
    default_days: i64,

    #[prop(optional)]
    label: Option<String>,
) -> impl IntoView {
    let on_from_change = move |new_from: String| {
        on_change.run((new_from, date_to.get_untracked()));
    };

    let on_to_change = move |new_to: String| {
        on_change.run((date_from.get_untracked(), new_to));
    };

    let on_previous_month = move |_| {
        let anchor = parse_iso(&date_from.get_untracked())
            .unwrap_or_else(|| Utc::now().date_naive());
        if let Some(range) = previous_month(anchor) {
            on_change.run(range);
        }
    };

    let on_current_month = move |_| {
        if let Some(range) = month_of(Utc::now().date_naive()) {
            on_change.run(range);
        }
    };

    let on_last_days = move |_| {
        on_change.run(last_days(Utc::now().date_naive(), default_days));
    };

    view! {
        <style>
            ".date-range-picker-compact .thaw-button--small { min-width: 32px; height: 30px; }"
            "
            .date-range-picker {
                box-sizing: border-box;
                border: 1px solid var(--colorNeutralStroke1, #d1d1d1);
                border-radius: var(--borderRadiusMedium, 4px);
                background: var(--colorNeutralBackground1, #fff);
                min-height: 32px;
            }
            .date-range-picker:focus-within {
                border-color: var(--colorBrandStroke1, #3b82f6);
            }
            .date-range-picker input[type=\"date\"]:focus {
                outline: none;
            }
            "
        </style>

        <Flex vertical=true gap=FlexGap::Small>
            {label.map(|l| view! { <Label>{l}</Label> })}

            <Flex class="date-range-picker" align=FlexAlign::Center gap=FlexGap::Small>
                <input
                    type="date"
                    prop:value=date_from
                    on:input=move |ev| on_from_change(event_target_value(&ev))
                    style=INPUT_STYLE
                />

                <div>"to"</div>

                <input
                    type="date"
                    prop:value=date_to
                    on:input=move |ev| on_to_change(event_target_value(&ev))
                    style=INPUT_STYLE
                />

                <div class="date-range-picker-compact">
                    <ButtonGroup>
                        <Button
                            size=ButtonSize::Small
                            appearance=ButtonAppearance::Subtle
                            on_click=on_previous_month
                        >
                            "-1M"
                        </Button>
                        <Button
                            size=ButtonSize::Small
                            appearance=ButtonAppearance::Subtle
                            on_click=on_current_month
                        >
                            "0M"
                        </Button>
                        <Button
                            size=ButtonSize::Small
                            appearance=ButtonAppearance::Subtle
                            on_click=on_last_days
                        >
                            {format!("{}D", default_days)}
                        </Button>
                    </ButtonGroup>
                </div>
            </Flex>
        </Flex>
    }
}
