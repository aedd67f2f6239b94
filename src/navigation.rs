//! The navigation bar shared by the signed-in pages.

use maud::{Markup, html};

use crate::endpoints;

/// A link in the navigation bar. The link matching the active endpoint is
/// rendered highlighted; only one link should be active at a time.
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    is_current: bool,
}

/// The navigation bar template.
pub struct NavBar<'a> {
    links: Vec<Link<'a>>,
}

impl NavBar<'_> {
    /// Build the navigation bar, marking the link that matches
    /// `active_endpoint` as the current page.
    pub fn new(active_endpoint: &str) -> NavBar<'_> {
        let links = vec![
            Link {
                url: endpoints::CALENDAR_VIEW,
                title: "Calendar",
                is_current: active_endpoint == endpoints::CALENDAR_VIEW,
            },
            Link {
                url: endpoints::STATS_VIEW,
                title: "Stats",
                is_current: active_endpoint == endpoints::STATS_VIEW,
            },
            Link {
                url: endpoints::LOG_OUT,
                title: "Log out",
                is_current: false,
            },
        ];

        NavBar { links }
    }

    /// Render the navigation bar.
    pub fn into_html(self) -> Markup {
        html! {
            nav class="nav-bar"
            {
                span class="nav-brand" { "Expenseur" }

                ul class="nav-links"
                {
                    @for link in self.links
                    {
                        li
                        {
                            a
                                href=(link.url)
                                class=(if link.is_current { "nav-link nav-link-current" } else { "nav-link" })
                            {
                                (link.title)
                            }
                        }
                    }
                }
            }
        }
    }
}
