//! The transactions table and the recent transactions panel.

use maud::{Markup, html};

use crate::{
    dashboard::query::DashboardQuery,
    endpoints,
    html::{
        BADGE_PAID_STYLE, BADGE_PENDING_STYLE, LINK_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE,
    },
    sort::{SortDirection, SortSpec},
    transaction::{Avatar, TransactionRecord, table_date},
    view::{Column, ColumnSelection, empty_table_message, transfer_label},
};

const AMOUNT_GREEN_STYLE: &str = "text-green-600 dark:text-green-400";
const AMOUNT_RED_STYLE: &str = "text-red-600 dark:text-red-400";
const AVATAR_STYLE: &str = "w-8 h-8 rounded-full shrink-0";
const INITIALS_STYLE: &str = "flex items-center justify-center w-8 h-8 rounded-full \
    shrink-0 text-xs font-semibold text-white";

fn amount_color_class(record: &TransactionRecord) -> &'static str {
    if record.is_revenue() {
        AMOUNT_GREEN_STYLE
    } else {
        AMOUNT_RED_STYLE
    }
}

fn avatar_view(record: &TransactionRecord) -> Markup {
    match record.avatar() {
        Avatar::Image(url) => html! {
            img src=(url) alt=(record.display_name()) class=(AVATAR_STYLE);
        },
        Avatar::Placeholder { initials, color } => html! {
            span
                class=(INITIALS_STYLE)
                style={"background-color: " (color)}
                aria-hidden="true"
            {
                (initials)
            }
        },
    }
}

fn status_badge(record: &TransactionRecord) -> Markup {
    let style = if record.is_paid() {
        BADGE_PAID_STYLE
    } else {
        BADGE_PENDING_STYLE
    };

    html! {
        span class=(style) { (record.display_status()) }
    }
}

fn sort_indicator(column: Column, sort: SortSpec) -> &'static str {
    match column.sort_key() {
        Some(key) if key == sort.key => match sort.direction {
            SortDirection::Asc => " ▲",
            SortDirection::Desc => " ▼",
        },
        _ => "",
    }
}

fn header_cell(column: Column, query: &DashboardQuery) -> Markup {
    html! {
        th scope="col" class=(TABLE_CELL_STYLE)
        {
            @match column.sort_key() {
                Some(key) => {
                    a
                        href=(query.with_sort_toggled(key).to_url(endpoints::DASHBOARD_VIEW))
                        data-sort-key=(key.as_query_value())
                        class="hover:underline"
                    {
                        (column.label()) (sort_indicator(column, query.sort()))
                    }
                }
                None => { (column.label()) }
            }
        }
    }
}

fn row_cell(column: Column, record: &TransactionRecord) -> Markup {
    match column {
        Column::Name => html! {
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex items-center gap-3"
                {
                    (avatar_view(record))
                    span class="font-medium text-slate-900 dark:text-white" { (record.display_name()) }
                }
            }
        },
        Column::Date => html! {
            td class={(TABLE_CELL_STYLE) " whitespace-nowrap"}
            {
                time datetime=(record.date.to_string()) { (table_date(record.date)) }
            }
        },
        Column::Amount => html! {
            td class={(TABLE_CELL_STYLE) " whitespace-nowrap " (amount_color_class(record))}
            {
                (record.signed_amount())
            }
        },
        Column::Status => html! {
            td class=(TABLE_CELL_STYLE) { (status_badge(record)) }
        },
    }
}

/// Renders the filtered transactions as a table with the selected columns.
///
/// The sortable column headers link to the dashboard sorted by that column,
/// keeping every other control as it is.
pub(super) fn transactions_table(
    rows: &[TransactionRecord],
    columns: &ColumnSelection,
    query: &DashboardQuery,
) -> Markup {
    html! {
        section id="transactions" class="w-full"
        {
            div class="overflow-x-auto rounded-lg shadow"
            {
                table class="w-full text-sm text-left text-slate-500 dark:text-slate-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            @for column in columns.columns() {
                                (header_cell(*column, query))
                            }
                        }
                    }

                    tbody
                    {
                        @if rows.is_empty() {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td
                                    colspan=(columns.columns().len())
                                    class={(TABLE_CELL_STYLE) " text-center"}
                                    data-empty-state
                                {
                                    (empty_table_message(query.search_text()))
                                }
                            }
                        }

                        @for record in rows {
                            tr class=(TABLE_ROW_STYLE) data-transaction-id=(record.id)
                            {
                                @for column in columns.columns() {
                                    (row_cell(*column, record))
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Renders the newest transactions in the snapshot.
pub(super) fn recent_transactions_panel(recent: &[TransactionRecord]) -> Markup {
    html! {
        section id="recent-transactions" class="w-full p-4 rounded-lg shadow bg-white dark:bg-slate-800"
        {
            h3 class="text-xl font-semibold mb-4" { "Recent Transactions" }

            @if recent.is_empty() {
                p class="text-sm text-slate-500 dark:text-slate-400" { "No transactions available" }
            }

            ul class="flex flex-col gap-4"
            {
                @for record in recent {
                    li class="flex items-center gap-3" data-transaction-id=(record.id)
                    {
                        (avatar_view(record))

                        div class="flex flex-col flex-1 min-w-0"
                        {
                            span class="text-xs text-slate-500 dark:text-slate-400" data-transfer-label
                            {
                                (transfer_label(record))
                            }
                            span class="font-medium truncate" { (record.display_name()) }
                        }

                        span class={"font-semibold whitespace-nowrap " (amount_color_class(record))}
                        {
                            (record.signed_amount())
                        }
                    }
                }
            }

            a href=(endpoints::DASHBOARD_VIEW) class={"block mt-4 text-sm " (LINK_STYLE)}
            {
                "See all transactions"
            }
        }
    }
}
