//! Alert fragments for showing success and error messages inline.

use maud::{Markup, html};

/// An inline alert message.
pub enum Alert {
    /// Something went wrong; `details` says what the user can do about it.
    Error {
        /// The short headline of the alert.
        message: String,
        /// The longer explanation shown under the headline.
        details: String,
    },
}

impl Alert {
    /// Create an error alert.
    pub fn error(message: &str, details: &str) -> Self {
        Self::Error {
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    /// Render the alert as an HTML fragment.
    pub fn into_html(self) -> Markup {
        match self {
            Alert::Error { message, details } => html! {
                div class="alert alert-error" role="alert"
                {
                    strong { (message) }
                    p { (details) }
                }
            },
        }
    }
}

#[cfg(test)]
mod alert_tests {
    use super::Alert;

    #[test]
    fn error_alert_renders_message_and_details() {
        let markup = Alert::error("Something broke", "Try again later.")
            .into_html()
            .into_string();

        assert!(markup.contains("Something broke"));
        assert!(markup.contains("Try again later."));
        assert!(markup.contains("alert-error"));
    }
}
