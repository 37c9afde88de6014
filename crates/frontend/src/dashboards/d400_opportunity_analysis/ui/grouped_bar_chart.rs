use contracts::dashboards::d400_opportunity_analysis::ProducerCategoryTotal;
use leptos::prelude::*;

use super::palette::category_color;
use crate::shared::format::format_count;

const MARGIN_LEFT: f64 = 48.0;
const MARGIN_RIGHT: f64 = 16.0;
const MARGIN_TOP: f64 = 12.0;
const MARGIN_BOTTOM: f64 = 110.0;
const PLOT_HEIGHT: f64 = 280.0;
const BAR_WIDTH: f64 = 14.0;
const GROUP_GAP: f64 = 18.0;
const TICKS: i64 = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub category: String,
    pub count: i64,
    pub x: f64,
    pub y: f64,
    pub height: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarGroup {
    pub producer: String,
    /// Center of the group on the x axis
    pub label_x: f64,
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BarLayout {
    pub width: f64,
    pub height: f64,
    /// Every category present, in legend order
    pub categories: Vec<String>,
    pub groups: Vec<BarGroup>,
    /// (y, value) of the horizontal grid lines
    pub ticks: Vec<(f64, i64)>,
}

/// One group per producer, one slot per category in every group
///
/// Totals arrive sorted by producer then category, so groups keep that order.
pub fn layout_bars(totals: &[ProducerCategoryTotal]) -> BarLayout {
    let mut categories: Vec<String> = totals.iter().map(|t| t.lob_category.clone()).collect();
    categories.sort();
    categories.dedup();

    let mut producers: Vec<&str> = Vec::new();
    for total in totals {
        if producers.last() != Some(&total.producer.as_str()) {
            producers.push(&total.producer);
        }
    }

    let max_count = totals.iter().map(|t| t.count).max().unwrap_or(0);
    if producers.is_empty() || max_count <= 0 {
        return BarLayout::default();
    }

    let scale_max = nice_max(max_count);
    let group_width = categories.len() as f64 * BAR_WIDTH + GROUP_GAP;
    let baseline = MARGIN_TOP + PLOT_HEIGHT;

    let groups = producers
        .iter()
        .enumerate()
        .map(|(i, producer)| {
            let group_x = MARGIN_LEFT + i as f64 * group_width + GROUP_GAP / 2.0;
            let bars = totals
                .iter()
                .filter(|t| t.producer == *producer && t.count > 0)
                .map(|t| {
                    let slot = categories
                        .iter()
                        .position(|c| c == &t.lob_category)
                        .unwrap_or(0);
                    let height = PLOT_HEIGHT * t.count as f64 / scale_max as f64;
                    Bar {
                        category: t.lob_category.clone(),
                        count: t.count,
                        x: group_x + slot as f64 * BAR_WIDTH,
                        y: baseline - height,
                        height,
                        color: category_color(&t.lob_category),
                    }
                })
                .collect();
            BarGroup {
                producer: producer.to_string(),
                label_x: group_x + (group_width - GROUP_GAP) / 2.0,
                bars,
            }
        })
        .collect();

    let ticks = (0..=TICKS)
        .map(|i| {
            let value = scale_max * i / TICKS;
            (baseline - PLOT_HEIGHT * i as f64 / TICKS as f64, value)
        })
        .collect();

    BarLayout {
        width: MARGIN_LEFT + producers.len() as f64 * group_width + MARGIN_RIGHT,
        height: baseline + MARGIN_BOTTOM,
        categories,
        groups,
        ticks,
    }
}

/// Smallest multiple of the tick count that is >= `max`, so ticks are whole numbers
fn nice_max(max: i64) -> i64 {
    let step = (max + TICKS - 1) / TICKS;
    step.max(1) * TICKS
}

/// Opportunities by producer, grouped by line of business
#[component]
pub fn GroupedBarChart(#[prop(into)] totals: Signal<Vec<ProducerCategoryTotal>>) -> impl IntoView {
    let layout = Memo::new(move |_| totals.with(|t| layout_bars(t)));

    view! {
        <div class="d400-chart d400-bars">
            <h3>"Opportunities by Producer and Line of Business"</h3>
            {move || {
                let layout = layout.get();
                if layout.groups.is_empty() {
                    return view! { <div class="d400-empty">"No producer data in this period"</div> }
                        .into_any();
                }

                let view_box = format!("0 0 {:.0} {:.0}", layout.width, layout.height);
                let baseline = MARGIN_TOP + PLOT_HEIGHT;
                let grid_right = format!("{:.2}", layout.width - MARGIN_RIGHT);

                let grid = layout
                    .ticks
                    .iter()
                    .map(|(y, value)| {
                        let line_y = format!("{:.2}", y);
                        let label_y = format!("{:.2}", y + 3.0);
                        view! {
                            <line x1=format!("{:.2}", MARGIN_LEFT) x2=grid_right.clone() y1=line_y.clone() y2=line_y stroke="#e0e0e0" />
                            <text x=format!("{:.2}", MARGIN_LEFT - 6.0) y=label_y font-size="10" text-anchor="end">
                                {format_count(*value)}
                            </text>
                        }
                    })
                    .collect_view();

                let bars = layout
                    .groups
                    .iter()
                    .map(|group| {
                        let label_y = baseline + 12.0;
                        let label_transform = format!("rotate(-45 {:.2} {:.2})", group.label_x, label_y);
                        let rects = group
                            .bars
                            .iter()
                            .map(|bar| {
                                view! {
                                    <rect
                                        x=format!("{:.2}", bar.x)
                                        y=format!("{:.2}", bar.y)
                                        width=format!("{:.2}", BAR_WIDTH - 2.0)
                                        height=format!("{:.2}", bar.height)
                                        fill=bar.color
                                    />
                                }
                            })
                            .collect_view();
                        view! {
                            {rects}
                            <text
                                x=format!("{:.2}", group.label_x)
                                y=format!("{:.2}", label_y)
                                font-size="11"
                                text-anchor="end"
                                transform=label_transform
                            >
                                {group.producer.clone()}
                            </text>
                        }
                    })
                    .collect_view();

                let legend = layout
                    .categories
                    .iter()
                    .map(|category| {
                        let swatch = format!(
                            "display: inline-block; width: 12px; height: 12px; margin-right: 6px; background: {};",
                            category_color(category)
                        );
                        view! {
                            <span style="margin-right: 16px;">
                                <span style=swatch></span>
                                {category.clone()}
                            </span>
                        }
                    })
                    .collect_view();

                view! {
                    <div style="overflow-x: auto;">
                        <svg viewBox=view_box width=format!("{:.0}", layout.width) height=format!("{:.0}", layout.height)>
                            {grid}
                            {bars}
                        </svg>
                    </div>
                    <div class="d400-legend">{legend}</div>
                }
                .into_any()
            }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(producer: &str, category: &str, count: i64) -> ProducerCategoryTotal {
        ProducerCategoryTotal {
            producer: producer.to_string(),
            lob_category: category.to_string(),
            count,
        }
    }

    #[test]
    fn test_groups_and_slots() {
        let layout = layout_bars(&[
            total("Alex Kim", "Umbrella", 2),
            total("Jane Doe", "Boat", 8),
            total("Jane Doe", "Umbrella", 4),
        ]);

        assert_eq!(layout.categories, vec!["Boat", "Umbrella"]);
        assert_eq!(layout.groups.len(), 2);

        let alex = &layout.groups[0];
        assert_eq!(alex.producer, "Alex Kim");
        assert_eq!(alex.bars.len(), 1);
        // Umbrella keeps its second slot even when Boat is absent
        assert_eq!(alex.bars[0].x, MARGIN_LEFT + GROUP_GAP / 2.0 + BAR_WIDTH);

        let jane = &layout.groups[1];
        let group_width = 2.0 * BAR_WIDTH + GROUP_GAP;
        assert_eq!(jane.bars[0].x, MARGIN_LEFT + group_width + GROUP_GAP / 2.0);
        // tallest bar spans the whole plot
        assert_eq!(jane.bars[0].height, PLOT_HEIGHT);
        assert_eq!(jane.bars[0].y, MARGIN_TOP);
        assert_eq!(jane.bars[1].height, PLOT_HEIGHT / 2.0);

        assert_eq!(layout.width, MARGIN_LEFT + 2.0 * group_width + MARGIN_RIGHT);
    }

    #[test]
    fn test_ticks_are_whole_numbers() {
        let layout = layout_bars(&[total("Jane Doe", "Boat", 7)]);
        let values: Vec<i64> = layout.ticks.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![0, 2, 4, 6, 8]);
        assert_eq!(layout.ticks[0].0, MARGIN_TOP + PLOT_HEIGHT);
        assert_eq!(layout.ticks[4].0, MARGIN_TOP);
    }

    #[test]
    fn test_empty() {
        assert_eq!(layout_bars(&[]), BarLayout::default());
        assert!(layout_bars(&[total("Jane Doe", "Boat", 0)]).groups.is_empty());
    }
}
