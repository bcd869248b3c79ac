// Post-OAuth redirect resolution
// Decision: Three terminal outcomes, all expressed as frontend URLs

use teamspace_core::Principal;

use super::config::FrontendConfig;

/// Where the browser goes once the OAuth flow has finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// Provider flow finished but no user was resolved
    NoUser,
    /// User resolved but has no workspace to land in
    NoWorkspace,
    /// Land in this workspace
    Workspace(String),
}

impl CallbackOutcome {
    pub fn resolve(principal: Option<&Principal>) -> Self {
        match principal {
            None => CallbackOutcome::NoUser,
            Some(p) => match p.current_workspace.as_deref() {
                Some(id) if !id.is_empty() => CallbackOutcome::Workspace(id.to_string()),
                _ => CallbackOutcome::NoWorkspace,
            },
        }
    }

    pub fn target_url(&self, frontend: &FrontendConfig) -> String {
        match self {
            CallbackOutcome::NoUser => {
                with_query(&frontend.google_callback_url, "status=failure&reason=no_user")
            }
            CallbackOutcome::NoWorkspace => {
                with_query(&frontend.google_callback_url, "status=failure&reason=no_workspace")
            }
            CallbackOutcome::Workspace(id) => format!("{}/workspace/{}", frontend.origin, id),
        }
    }
}

/// Redirect target when the provider step itself failed
pub fn failure_url(frontend: &FrontendConfig) -> String {
    with_query(&frontend.google_callback_url, "status=failure")
}

fn with_query(base: &str, query: &str) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{}{}{}", base, separator, query)
}
