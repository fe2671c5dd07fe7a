//! Route table and the role gate in front of each page.

use std::fmt;

use uuid::Uuid;

use crate::contract::model::{Role, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    Login,
    Signup,
    DonorDashboard,
    DonorCreatePost,
    DonorHistory,
    VolunteerDashboard,
    VolunteerHistory,
    VolunteerBadges,
    VolunteerClaim(Uuid),
}

impl Route {
    /// Resolve a path. Unknown paths (and malformed claim ids) land on `/`.
    pub fn parse(path: &str) -> Self {
        let trimmed = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = trimmed.trim_end_matches('/');
        match trimmed {
            "" => Route::Landing,
            "/login" => Route::Login,
            "/signup" => Route::Signup,
            "/donor/dashboard" => Route::DonorDashboard,
            "/donor/create-post" => Route::DonorCreatePost,
            "/donor/history" => Route::DonorHistory,
            "/volunteer/dashboard" => Route::VolunteerDashboard,
            "/volunteer/history" => Route::VolunteerHistory,
            "/volunteer/badges" => Route::VolunteerBadges,
            other => other
                .strip_prefix("/volunteer/claim/")
                .and_then(|id| Uuid::parse_str(id).ok())
                .map(Route::VolunteerClaim)
                .unwrap_or(Route::Landing),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Landing => "/".into(),
            Route::Login => "/login".into(),
            Route::Signup => "/signup".into(),
            Route::DonorDashboard => "/donor/dashboard".into(),
            Route::DonorCreatePost => "/donor/create-post".into(),
            Route::DonorHistory => "/donor/history".into(),
            Route::VolunteerDashboard => "/volunteer/dashboard".into(),
            Route::VolunteerHistory => "/volunteer/history".into(),
            Route::VolunteerBadges => "/volunteer/badges".into(),
            Route::VolunteerClaim(id) => format!("/volunteer/claim/{id}"),
        }
    }

    /// `None` for public pages.
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Route::Landing | Route::Login | Route::Signup => None,
            Route::DonorDashboard | Route::DonorCreatePost | Route::DonorHistory => {
                Some(Role::Donor)
            }
            Route::VolunteerDashboard
            | Route::VolunteerHistory
            | Route::VolunteerBadges
            | Route::VolunteerClaim(_) => Some(Role::Volunteer),
        }
    }

    pub fn dashboard_for(role: Role) -> Self {
        match role {
            Role::Donor => Route::DonorDashboard,
            Role::Volunteer => Route::VolunteerDashboard,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Redirect(Route),
}

pub fn authorize(route: Route, user: Option<&User>) -> Access {
    let Some(required) = route.required_role() else {
        return Access::Allow;
    };
    match user {
        None => Access::Redirect(Route::Login),
        Some(u) if u.role == required => Access::Allow,
        Some(u) => Access::Redirect(Route::dashboard_for(u.role)),
    }
}
