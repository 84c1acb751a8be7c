//! Cards showing the balance, revenue, expenses and savings of the filtered transactions.

use maud::{Markup, html};

use crate::{html::format_currency, metrics::Metrics};

const CARD_STYLE: &str = "flex flex-col gap-1 p-4 rounded-lg shadow bg-white dark:bg-slate-800";
const CARD_LABEL_STYLE: &str = "text-sm font-medium text-slate-500 dark:text-slate-400";
const CARD_VALUE_STYLE: &str = "text-2xl font-bold";
const VALUE_GREEN_STYLE: &str = "text-green-600 dark:text-green-400";
const VALUE_RED_STYLE: &str = "text-red-600 dark:text-red-400";

struct MetricCard {
    id: &'static str,
    label: &'static str,
    value: f64,
}

impl MetricCard {
    fn value_color(&self) -> &'static str {
        if self.value < 0.0 {
            VALUE_RED_STYLE
        } else {
            VALUE_GREEN_STYLE
        }
    }
}

/// Renders one card per metric in a responsive grid.
pub(super) fn metric_cards_view(metrics: &Metrics) -> Markup {
    let cards = [
        MetricCard {
            id: "balance",
            label: "Balance",
            value: metrics.balance,
        },
        MetricCard {
            id: "revenue",
            label: "Revenue",
            value: metrics.revenue,
        },
        MetricCard {
            id: "expenses",
            label: "Expenses",
            value: metrics.expenses,
        },
        MetricCard {
            id: "savings",
            label: "Savings",
            value: metrics.savings,
        },
    ];

    html! {
        section id="metrics" class="w-full grid grid-cols-2 lg:grid-cols-4 gap-4 mb-4"
        {
            @for card in &cards {
                div class=(CARD_STYLE) data-metric=(card.id)
                {
                    span class=(CARD_LABEL_STYLE) { (card.label) }
                    span class={(CARD_VALUE_STYLE) " " (card.value_color())}
                    {
                        (format_currency(card.value))
                    }
                }
            }
        }
    }
}
