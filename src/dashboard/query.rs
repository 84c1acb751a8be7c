//! The dashboard's URL query parameters.
//!
//! Every control on the dashboard (the search box, date pickers, menus,
//! column checkboxes and sortable headers) is written into the query string,
//! so any view of the dashboard can be bookmarked, and the export link
//! downloads exactly the rows on screen.

use serde::{Deserialize, Serialize};

use crate::{
    DashboardSettings, Error,
    aggregation::Granularity,
    filter::DateRange,
    snapshot::parse_date,
    sort::{SortDirection, SortKey, SortOrder, SortSpec, toggle_sort},
    view::{Column, ColumnSelection, ViewParams},
};

/// The query parameters accepted by the dashboard page and the transaction APIs.
///
/// Empty text fields are treated as missing, since HTML forms submit empty
/// inputs as `name=`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DashboardQuery {
    /// Free text to search for.
    pub search: Option<String>,
    /// The earliest date to include, e.g. "2024-01-31".
    pub start: Option<String>,
    /// The latest date to include, e.g. "2024-01-31".
    pub end: Option<String>,
    /// One of the preset sort orders from the "sort by" menu.
    pub sort_order: Option<SortOrder>,
    /// The key chosen by clicking a column header. Takes precedence over `sort_order`.
    pub sort_key: Option<SortKey>,
    /// The direction for `sort_key`. Defaults to ascending.
    pub direction: Option<SortDirection>,
    /// The size of the chart buckets.
    pub granularity: Option<Granularity>,
    /// The table columns to show. Repeated once per column, e.g. `columns=name&columns=amount`.
    #[serde(default)]
    pub columns: Vec<Column>,
}

impl DashboardQuery {
    /// The search text, or an empty string if there is none.
    pub fn search_text(&self) -> &str {
        non_empty(&self.search).unwrap_or_default()
    }

    /// The sort requested by the query.
    ///
    /// A header click (`sort_key`) wins over the "sort by" menu, and no sort
    /// parameters at all gives newest first.
    pub fn sort(&self) -> SortSpec {
        match self.sort_key {
            Some(key) => SortSpec::new(key, self.direction.unwrap_or(SortDirection::Asc)),
            None => self.sort_order.unwrap_or_default().into(),
        }
    }

    /// The menu entry matching the current sort, if the sort is one of the presets.
    pub fn selected_sort_order(&self) -> Option<SortOrder> {
        let sort = self.sort();

        SortOrder::ALL
            .into_iter()
            .find(|order| SortSpec::from(*order) == sort)
    }

    /// Convert the query into the parameters for building a dashboard view.
    ///
    /// # Errors
    /// Returns [Error::InvalidDateParameter] if `start` or `end` is not a valid date.
    pub fn to_view_params(&self, settings: &DashboardSettings) -> Result<ViewParams, Error> {
        let start = parse_date_parameter(&self.start)?;
        let end = parse_date_parameter(&self.end)?;

        Ok(ViewParams {
            query: self.search_text().to_owned(),
            date_range: DateRange::new(start, end),
            sort: self.sort(),
            granularity: self.granularity.unwrap_or_default(),
            bucket_order: settings.bucket_order,
            columns: ColumnSelection::new(&self.columns),
        })
    }

    /// The query for the link on a column header, which sorts by `key`.
    pub fn with_sort_toggled(&self, key: SortKey) -> Self {
        let current = self.sort();
        let next = toggle_sort(Some(current), key);

        Self {
            sort_order: None,
            sort_key: Some(next.key),
            direction: Some(next.direction),
            ..self.clone()
        }
    }

    /// The query as `(name, value)` pairs, leaving out missing values.
    fn to_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::new();

        if let Some(search) = non_empty(&self.search) {
            pairs.push(("search", search));
        }
        if let Some(start) = non_empty(&self.start) {
            pairs.push(("start", start));
        }
        if let Some(end) = non_empty(&self.end) {
            pairs.push(("end", end));
        }
        if let Some(sort_order) = self.sort_order {
            pairs.push(("sort_order", sort_order.as_query_value()));
        }
        if let Some(sort_key) = self.sort_key {
            pairs.push(("sort_key", sort_key.as_query_value()));
        }
        if let Some(direction) = self.direction {
            pairs.push(("direction", direction.as_query_value()));
        }
        if let Some(granularity) = self.granularity {
            pairs.push(("granularity", granularity.as_query_value()));
        }
        for column in &self.columns {
            pairs.push(("columns", column.as_query_value()));
        }

        pairs
    }

    /// The URL for `route` with this query.
    ///
    /// Falls back to `route` on its own if the query could not be encoded.
    pub fn to_url(&self, route: &str) -> String {
        let pairs = self.to_pairs();

        if pairs.is_empty() {
            return route.to_owned();
        }

        serde_urlencoded::to_string(&pairs)
            .inspect_err(|error| tracing::error!("Could not encode dashboard query: {error}"))
            .map(|query| format!("{route}?{query}"))
            .unwrap_or_else(|_| route.to_owned())
    }
}

fn non_empty(text: &Option<String>) -> Option<&str> {
    text.as_deref().filter(|text| !text.is_empty())
}

fn parse_date_parameter(text: &Option<String>) -> Result<Option<time::Date>, Error> {
    match non_empty(text) {
        None => Ok(None),
        Some(text) => parse_date(text)
            .map(Some)
            .ok_or_else(|| Error::InvalidDateParameter(text.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        DashboardSettings, Error,
        aggregation::{BucketOrder, Granularity},
        filter::DateRange,
        sort::{SortDirection, SortKey, SortOrder, SortSpec},
        view::{Column, ColumnSelection},
    };

    use super::DashboardQuery;

    #[test]
    fn parses_repeated_columns() {
        let query: DashboardQuery =
            serde_html_form::from_str("columns=name&columns=amount").unwrap();
        assert_eq!(query.columns, vec![Column::Name, Column::Amount]);

        let query: DashboardQuery = serde_html_form::from_str("columns=status").unwrap();
        assert_eq!(query.columns, vec![Column::Status]);

        let query: DashboardQuery = serde_html_form::from_str("").unwrap();
        assert_eq!(query.columns, Vec::<Column>::new());
    }

    #[test]
    fn parses_full_form_submission() {
        let query: DashboardQuery = serde_html_form::from_str(
            "search=ada&start=2024-01-01&end=&sort_order=amount-asc&granularity=Weekly",
        )
        .unwrap();

        assert_eq!(query.search.as_deref(), Some("ada"));
        assert_eq!(query.sort_order, Some(SortOrder::AmountAsc));
        assert_eq!(query.granularity, Some(Granularity::Weekly));

        let params = query.to_view_params(&DashboardSettings::default()).unwrap();
        assert_eq!(params.query, "ada");
        assert_eq!(
            params.date_range,
            DateRange::new(Some(date!(2024 - 01 - 01)), None)
        );
        assert_eq!(params.sort, SortSpec::from(SortOrder::AmountAsc));
        assert_eq!(params.granularity, Granularity::Weekly);
        assert_eq!(params.columns, ColumnSelection::default());
    }

    #[test]
    fn empty_query_gives_default_params() {
        let settings = DashboardSettings {
            bucket_order: BucketOrder::Chronological,
            recent_count: 5,
        };

        let params = DashboardQuery::default().to_view_params(&settings).unwrap();

        assert_eq!(params.query, "");
        assert_eq!(params.date_range, DateRange::default());
        assert_eq!(params.sort, SortSpec::default());
        assert_eq!(params.granularity, Granularity::Monthly);
        assert_eq!(params.bucket_order, BucketOrder::Chronological);
    }

    #[test]
    fn invalid_date_is_an_error() {
        let query = DashboardQuery {
            end: Some("31/01/2024".to_owned()),
            ..Default::default()
        };

        let result = query.to_view_params(&DashboardSettings::default());

        assert_eq!(
            result,
            Err(Error::InvalidDateParameter("31/01/2024".to_owned()))
        );
    }

    #[test]
    fn header_sort_takes_precedence_over_menu() {
        let query = DashboardQuery {
            sort_order: Some(SortOrder::AmountDesc),
            sort_key: Some(SortKey::UserName),
            ..Default::default()
        };

        assert_eq!(
            query.sort(),
            SortSpec::new(SortKey::UserName, SortDirection::Asc)
        );
        assert_eq!(query.selected_sort_order(), None);
    }

    #[test]
    fn toggling_the_sorted_column_flips_direction() {
        let query = DashboardQuery {
            sort_order: Some(SortOrder::DateDesc),
            ..Default::default()
        };

        let toggled = query.with_sort_toggled(SortKey::Date);
        assert_eq!(toggled.sort(), SortSpec::new(SortKey::Date, SortDirection::Asc));
        assert_eq!(toggled.sort_order, None);

        let toggled = toggled.with_sort_toggled(SortKey::Date);
        assert_eq!(toggled.sort(), SortSpec::new(SortKey::Date, SortDirection::Desc));

        let toggled = toggled.with_sort_toggled(SortKey::Amount);
        assert_eq!(
            toggled.sort(),
            SortSpec::new(SortKey::Amount, SortDirection::Asc)
        );
    }

    #[test]
    fn url_keeps_every_control() {
        let query = DashboardQuery {
            search: Some("rent & bills".to_owned()),
            start: Some("2024-01-01".to_owned()),
            end: Some(String::new()),
            sort_key: Some(SortKey::Amount),
            direction: Some(SortDirection::Desc),
            granularity: Some(Granularity::Daily),
            columns: vec![Column::Name, Column::Amount],
            ..Default::default()
        };

        let url = query.to_url("/dashboard");

        assert_eq!(
            url,
            "/dashboard?search=rent+%26+bills&start=2024-01-01&sort_key=amount&direction=desc\
            &granularity=Daily&columns=name&columns=amount"
        );

        let (_, query_string) = url.split_once('?').unwrap();
        let round_trip: DashboardQuery = serde_html_form::from_str(query_string).unwrap();
        assert_eq!(round_trip.to_url("/dashboard"), url);
    }

    #[test]
    fn url_without_parameters_is_the_route() {
        assert_eq!(DashboardQuery::default().to_url("/dashboard"), "/dashboard");
    }
}
