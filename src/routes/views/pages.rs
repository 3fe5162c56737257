use serde::Serialize;

use crate::{
    auth::Session,
    cache::ListingView,
    db::entities::{partner_station, profile},
    error::AppError,
    resources::{RentalListing, ResourceError},
    services::ServiceContext,
    state::AppState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageName {
    Home,
    Login,
    Register,
    Dashboard,
    RentalHistory,
    Settings,
    PartnerProgram,
}

impl PageName {
    pub const ALL: [PageName; 7] = [
        PageName::Home,
        PageName::Login,
        PageName::Register,
        PageName::Dashboard,
        PageName::RentalHistory,
        PageName::Settings,
        PageName::PartnerProgram,
    ];

    /// Unprefixed path; `/{locale}` is prepended for the localized route.
    pub fn path(self) -> &'static str {
        match self {
            PageName::Home => "/",
            PageName::Login => "/login",
            PageName::Register => "/register",
            PageName::Dashboard => "/dashboard",
            PageName::RentalHistory => "/rental-history",
            PageName::Settings => "/settings",
            PageName::PartnerProgram => "/partner-program",
        }
    }

    pub fn is_public(self) -> bool {
        matches!(self, PageName::Home | PageName::Login | PageName::Register)
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PageListing {
    Rentals(ListingView<RentalListing>),
    Stations(ListingView<partner_station::Model>),
}

/// What a page needs to render: no markup, only its data.
#[derive(Debug, Serialize)]
pub struct PageShell {
    pub page: PageName,
    pub locale: String,
    pub authenticated: bool,
    pub profile: Option<profile::Model>,
    pub listing: Option<PageListing>,
}

pub(super) async fn render(
    state: &AppState,
    session: &Session,
    locale: Option<String>,
    page: PageName,
) -> Result<PageShell, AppError> {
    let routing = &state.config.routing;
    let locale = match locale {
        Some(locale) if routing.is_supported(&locale) => locale,
        Some(_) => return Err(AppError::not_found("Page not found")),
        None => routing.default_locale.clone(),
    };

    let mut shell = PageShell {
        page,
        locale,
        authenticated: session.is_authenticated(),
        profile: None,
        listing: None,
    };
    if page.is_public() {
        return Ok(shell);
    }

    let identity = session
        .identity
        .as_ref()
        .ok_or(ResourceError::NotAuthenticated)?;
    let profile = ServiceContext::from_state(state)
        .account(&state.auth_providers, &state.profiles, &state.bus)
        .current_profile(&identity.user_id)
        .await
        .map_err(|err| {
            tracing::warn!(
                user_id = %identity.user_id,
                ?page,
                "page profile lookup failed: {err}"
            );
            AppError::internal("Unable to load this page")
        })?;

    let page_size = state.config.cache.default_page_size;
    shell.listing = match page {
        PageName::RentalHistory => Some(PageListing::Rentals(
            state.rentals.listings.view(profile.id, page_size).await?,
        )),
        PageName::PartnerProgram => Some(PageListing::Stations(
            state.stations.listings.view(profile.id, page_size).await?,
        )),
        _ => None,
    };
    shell.profile = Some(profile);
    Ok(shell)
}
