use maud::{DOCTYPE, Markup, PreEscaped, html};

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

// Shared palette: slate surfaces, indigo accents.

pub const LINK_STYLE: &str = "text-indigo-600 dark:text-indigo-400 hover:underline";

pub const BUTTON_PRIMARY_STYLE: &str = "px-4 py-2 rounded text-sm font-medium \
    text-white bg-indigo-600 hover:bg-indigo-700";

pub const BUTTON_SECONDARY_STYLE: &str = "px-4 py-2 rounded text-sm font-medium \
    border border-slate-300 dark:border-slate-600 hover:bg-slate-100 dark:hover:bg-slate-700";

pub const FORM_LABEL_STYLE: &str = "block mb-1 text-sm font-medium";

pub const FORM_TEXT_INPUT_STYLE: &str = "block w-full p-2 rounded text-sm \
    bg-white dark:bg-slate-700 border border-slate-300 dark:border-slate-600";

pub const TABLE_HEADER_STYLE: &str = "text-xs uppercase bg-slate-100 dark:bg-slate-700";

pub const TABLE_ROW_STYLE: &str = "border-b border-slate-200 dark:border-slate-700";

pub const TABLE_CELL_STYLE: &str = "px-4 py-3";

pub const BADGE_PAID_STYLE: &str = "px-2 py-0.5 rounded-full text-xs font-semibold \
    text-emerald-800 bg-emerald-100";

pub const BADGE_PENDING_STYLE: &str = "px-2 py-0.5 rounded-full text-xs font-semibold \
    text-amber-800 bg-amber-100";

pub const PAGE_CONTAINER_STYLE: &str = "flex flex-col items-center gap-4 px-4 py-6 \
    mx-auto max-w-screen-xl";

pub enum HeadElement {
    /// The file path or URL to a JavaScript script.
    ScriptLink(String),
    /// JavaScript source code.
    ScriptSource(PreEscaped<String>),
}

pub fn base(title: &str, head_elements: &[HeadElement], content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Penta" }
                link href="/static/main.css" rel="stylesheet";

                @for element in head_elements
                {
                    @match element
                    {
                        HeadElement::ScriptSource(text) => script { (text) }
                        HeadElement::ScriptLink(path) => script src=(path) {}
                    }
                }
            }

            body class="min-h-screen text-slate-900 bg-slate-50 dark:text-slate-100 dark:bg-slate-900"
            {
                (content)
            }
        }
    }
}

/// A full page explaining that something went wrong, with a link back to the dashboard.
pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    let content = html!(
        main class="flex flex-col items-center gap-4 px-4 py-16 mx-auto max-w-screen-sm text-center"
        {
            h1 class="text-7xl font-extrabold text-indigo-600 dark:text-indigo-400" { (header) }
            p class="text-3xl font-bold" { (description) }
            p class="text-lg" { (fix) }
            a href="/" class=(BUTTON_PRIMARY_STYLE) { "Back to Dashboard" }
        }
    );

    base(title, &[], &content)
}

/// Format `number` as dollars and cents with thousands separators, e.g. "-$1,234.50".
pub fn format_currency(number: f64) -> String {
    static DOLLARS_FMT: OnceLock<Formatter> = OnceLock::new();

    let dollars_fmt = DOLLARS_FMT.get_or_init(|| {
        Formatter::currency("$")
            .unwrap()
            .precision(Precision::Decimals(0))
    });

    let total_cents = (number.abs() * 100.0).round();
    let dollars = (total_cents / 100.0).trunc();
    let cents = (total_cents - dollars * 100.0) as u8;

    let sign = if number < 0.0 && total_cents > 0.0 { "-" } else { "" };

    // Zero is hardcoded as "0", so we must specify the formatted string for zero
    let dollars = if dollars > 0.0 {
        dollars_fmt.fmt_string(dollars)
    } else {
        "$0".to_owned()
    };

    format!("{sign}{dollars}.{cents:02}")
}
