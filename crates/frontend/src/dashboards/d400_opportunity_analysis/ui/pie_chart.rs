use contracts::dashboards::d400_opportunity_analysis::LobCategoryTotal;
use leptos::prelude::*;
use std::f64::consts::PI;

use super::palette::category_color;
use crate::shared::format::{format_count, format_percent};

const SIZE: f64 = 260.0;
const RADIUS: f64 = 120.0;

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub count: i64,
    pub percent: String,
    /// SVG path data
    pub path: String,
    pub color: &'static str,
}

/// Slices clockwise from 12 o'clock; categories with no opportunities are skipped
pub fn pie_slices(totals: &[LobCategoryTotal], cx: f64, cy: f64, r: f64) -> Vec<PieSlice> {
    let total: i64 = totals.iter().map(|t| t.count.max(0)).sum();
    if total == 0 {
        return Vec::new();
    }

    let mut start = -PI / 2.0;
    totals
        .iter()
        .filter(|t| t.count > 0)
        .map(|t| {
            let sweep = 2.0 * PI * t.count as f64 / total as f64;
            let path = if t.count == total {
                full_circle(cx, cy, r)
            } else {
                arc(cx, cy, r, start, start + sweep)
            };
            start += sweep;
            PieSlice {
                label: t.lob_category.clone(),
                count: t.count,
                percent: format_percent(t.count, total),
                path,
                color: category_color(&t.lob_category),
            }
        })
        .collect()
}

fn point(cx: f64, cy: f64, r: f64, angle: f64) -> (f64, f64) {
    (cx + r * angle.cos(), cy + r * angle.sin())
}

fn arc(cx: f64, cy: f64, r: f64, from: f64, to: f64) -> String {
    let (x0, y0) = point(cx, cy, r, from);
    let (x1, y1) = point(cx, cy, r, to);
    let large_arc = if to - from > PI + 1e-9 { 1 } else { 0 };
    format!(
        "M {:.2} {:.2} L {:.2} {:.2} A {:.2} {:.2} 0 {} 1 {:.2} {:.2} Z",
        cx, cy, x0, y0, r, r, large_arc, x1, y1
    )
}

// An arc cannot start and end on the same point
fn full_circle(cx: f64, cy: f64, r: f64) -> String {
    format!(
        "M {:.2} {:.2} A {:.2} {:.2} 0 1 1 {:.2} {:.2} A {:.2} {:.2} 0 1 1 {:.2} {:.2} Z",
        cx,
        cy - r,
        r,
        r,
        cx,
        cy + r,
        r,
        r,
        cx,
        cy - r
    )
}

/// Opportunities by line of business
#[component]
pub fn PieChart(#[prop(into)] totals: Signal<Vec<LobCategoryTotal>>) -> impl IntoView {
    let slices = Memo::new(move |_| {
        totals.with(|t| pie_slices(t, SIZE / 2.0, SIZE / 2.0, RADIUS))
    });
    let view_box = format!("0 0 {} {}", SIZE, SIZE);

    view! {
        <div class="d400-chart d400-pie">
            <h3>"Opportunities by Line of Business"</h3>
            <Show
                when=move || !slices.get().is_empty()
                fallback=|| view! { <div class="d400-empty">"No opportunities in this period"</div> }
            >
                <div style="display: flex; align-items: center; gap: 24px;">
                    <svg viewBox=view_box.clone() width="260" height="260">
                        {move || {
                            slices
                                .get()
                                .into_iter()
                                .map(|slice| {
                                    view! {
                                        <path d=slice.path fill=slice.color stroke="#fff" stroke-width="1" />
                                    }
                                })
                                .collect_view()
                        }}
                    </svg>
                    <ul class="d400-legend" style="list-style: none; padding: 0; margin: 0;">
                        {move || {
                            slices
                                .get()
                                .into_iter()
                                .map(|slice| {
                                    let swatch = format!(
                                        "display: inline-block; width: 12px; height: 12px; margin-right: 8px; background: {};",
                                        slice.color
                                    );
                                    view! {
                                        <li>
                                            <span style=swatch></span>
                                            {format!(
                                                "{}: {} ({})",
                                                slice.label,
                                                format_count(slice.count),
                                                slice.percent
                                            )}
                                        </li>
                                    }
                                })
                                .collect_view()
                        }}
                    </ul>
                </div>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(category: &str, count: i64) -> LobCategoryTotal {
        LobCategoryTotal {
            lob_category: category.to_string(),
            count,
        }
    }

    #[test]
    fn test_two_halves() {
        let slices = pie_slices(&[total("Boat", 3), total("Other", 3)], 100.0, 100.0, 80.0);
        assert_eq!(slices.len(), 2);
        assert_eq!(
            slices[0].path,
            "M 100.00 100.00 L 100.00 20.00 A 80.00 80.00 0 0 1 100.00 180.00 Z"
        );
        assert_eq!(
            slices[1].path,
            "M 100.00 100.00 L 100.00 180.00 A 80.00 80.00 0 0 1 100.00 20.00 Z"
        );
        assert_eq!(slices[0].percent, "50.0%");
    }

    #[test]
    fn test_large_slice_uses_large_arc_flag() {
        let slices = pie_slices(&[total("Boat", 3), total("Other", 1)], 100.0, 100.0, 80.0);
        assert!(slices[0].path.contains(" 0 1 1 "));
        assert!(slices[1].path.contains(" 0 0 1 "));
    }

    #[test]
    fn test_single_category_is_full_circle() {
        let slices = pie_slices(&[total("Boat", 0), total("Other", 7)], 100.0, 100.0, 80.0);
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].label, "Other");
        assert_eq!(slices[0].percent, "100.0%");
        assert!(slices[0].path.starts_with("M 100.00 20.00 A"));
    }

    #[test]
    fn test_no_data() {
        assert!(pie_slices(&[], 100.0, 100.0, 80.0).is_empty());
        assert!(pie_slices(&[total("Boat", 0)], 100.0, 100.0, 80.0).is_empty());
    }
}
