// Role-based choice of dashboard

use crate::models::{Identity, Role};
use tracing::warn;

/// Dashboards the home route can render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    VisitorDashboard,
    StaffDashboard,
    AdminDashboard,
}

/// Pick the dashboard for a role. Legal counsel shares the visitor view.
/// Unrecognized roles get no view at all.
pub fn view_for_role(role: &Role) -> Option<View> {
    match role {
        Role::Visitor | Role::Legal => Some(View::VisitorDashboard),
        Role::Staff => Some(View::StaffDashboard),
        Role::Admin => Some(View::AdminDashboard),
        Role::Unrecognized(raw) => {
            warn!("No view for unrecognized role '{}'", raw);
            None
        }
    }
}

pub fn dispatch(identity: &Identity) -> Option<View> {
    view_for_role(&identity.role)
}
