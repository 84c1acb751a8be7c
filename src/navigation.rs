//! This file defines the navigation bar.

use maud::{Markup, html};

use crate::{endpoints, html::BUTTON_SECONDARY_STYLE};

const NAV_LINK_STYLE: &str = "px-3 py-2 rounded hover:bg-slate-100 dark:hover:bg-slate-700";
const NAV_LINK_CURRENT_STYLE: &str = "px-3 py-2 rounded font-semibold text-indigo-600 \
    dark:text-indigo-400";

/// A page the navigation bar links to. At most one link is the current page.
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    is_current: bool,
}

impl Link<'_> {
    fn into_html(self) -> Markup {
        let style = if self.is_current {
            NAV_LINK_CURRENT_STYLE
        } else {
            NAV_LINK_STYLE
        };

        html!(
            a href=(self.url) class=(style) aria-current=[self.is_current.then_some("page")]
            {
                (self.title)
            }
        )
    }
}

pub struct NavBar<'a> {
    links: Vec<Link<'a>>,
}

impl NavBar<'_> {
    /// Get the navigation bar.
    ///
    /// If a link matches `active_endpoint`, then that link will be
    /// marked as active and displayed differently in the HTML.
    pub fn new(active_endpoint: &str) -> NavBar<'_> {
        let links = vec![Link {
            url: endpoints::DASHBOARD_VIEW,
            title: "Dashboard",
            is_current: active_endpoint == endpoints::DASHBOARD_VIEW,
        }];

        NavBar { links }
    }

    pub fn into_html(self) -> Markup {
        html!(
            nav class="border-b border-slate-200 dark:border-slate-700"
            {
                div class="flex items-center justify-between gap-4 px-4 py-3 mx-auto max-w-screen-xl"
                {
                    a href=(endpoints::ROOT) class="text-2xl font-semibold" { "Penta" }

                    ul class="flex flex-1 gap-2 font-medium"
                    {
                        @for link in self.links {
                            li { (link.into_html()) }
                        }
                    }

                    form method="post" action=(endpoints::SNAPSHOT_RELOAD)
                    {
                        button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Reload data" }
                    }
                }
            }
        )
    }
}
