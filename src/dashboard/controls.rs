//! The form for filtering, sorting and choosing what the dashboard shows.

use maud::{Markup, html};

use crate::{
    aggregation::Granularity,
    dashboard::query::DashboardQuery,
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    sort::SortOrder,
    view::{Column, ColumnSelection},
};

/// Renders the dashboard controls.
///
/// The form is submitted with GET so the chosen options end up in the URL.
/// The export link carries the same options, so the CSV has exactly the rows
/// shown in the table.
pub(super) fn controls_view(query: &DashboardQuery, columns: &ColumnSelection) -> Markup {
    let selected_sort_order = query.selected_sort_order();
    let selected_granularity = query.granularity.unwrap_or_default();

    html! {
        form
            id="dashboard-controls"
            method="get"
            action=(endpoints::DASHBOARD_VIEW)
            class="w-full grid grid-cols-1 md:grid-cols-2 lg:grid-cols-4 gap-4 mb-4
                p-4 rounded-lg bg-slate-50 dark:bg-slate-800"
        {
            div class="lg:col-span-2"
            {
                label for="search" class=(FORM_LABEL_STYLE) { "Search" }
                input
                    type="search"
                    id="search"
                    name="search"
                    placeholder="Name, status, amount or date"
                    value=(query.search_text())
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="start" class=(FORM_LABEL_STYLE) { "From" }
                input
                    type="date"
                    id="start"
                    name="start"
                    value=[query.start.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="end" class=(FORM_LABEL_STYLE) { "To" }
                input
                    type="date"
                    id="end"
                    name="end"
                    value=[query.end.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="sort_order" class=(FORM_LABEL_STYLE) { "Sort by" }
                select id="sort_order" name="sort_order" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for order in SortOrder::ALL {
                        option
                            value=(order.as_query_value())
                            selected[selected_sort_order == Some(order)]
                        {
                            (order.label())
                        }
                    }
                }
            }

            div
            {
                label for="granularity" class=(FORM_LABEL_STYLE) { "Chart" }
                select id="granularity" name="granularity" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for granularity in Granularity::ALL {
                        option
                            value=(granularity.as_query_value())
                            selected[selected_granularity == granularity]
                        {
                            (granularity.as_query_value())
                        }
                    }
                }
            }

            fieldset class="lg:col-span-2"
            {
                legend class=(FORM_LABEL_STYLE) { "Columns" }

                div class="flex flex-wrap gap-4"
                {
                    @for column in Column::ALL {
                        label class="flex items-center gap-2 text-sm"
                        {
                            input
                                type="checkbox"
                                name="columns"
                                value=(column.as_query_value())
                                checked[columns.contains(column)]
                                class="rounded-sm border-slate-300 text-indigo-600";

                            (column.label())
                        }
                    }
                }
            }

            div class="flex items-end gap-2 lg:col-span-4"
            {
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Apply" }

                a href=(endpoints::DASHBOARD_VIEW) class=(BUTTON_SECONDARY_STYLE) { "Reset" }

                a
                    id="export-csv"
                    href=(query.to_url(endpoints::EXPORT_CSV))
                    download
                    class=(BUTTON_SECONDARY_STYLE)
                {
                    "Export CSV"
                }
            }
        }
    }
}
