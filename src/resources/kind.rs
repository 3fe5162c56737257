use serde::Serialize;

/// The owned row families exposed through the listing and mutation API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    RentalHistory,
    PartnerStation,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::RentalHistory => "rental_history",
            ResourceKind::PartnerStation => "partner_station",
        }
    }

    /// Used in list failure messages ("Failed to fetch partner stations").
    pub fn plural(self) -> &'static str {
        match self {
            ResourceKind::RentalHistory => "rental history",
            ResourceKind::PartnerStation => "partner stations",
        }
    }

    pub fn singular(self) -> &'static str {
        match self {
            ResourceKind::RentalHistory => "rental history entry",
            ResourceKind::PartnerStation => "partner station",
        }
    }

    /// Short name used in authorization messages.
    pub fn noun(self) -> &'static str {
        match self {
            ResourceKind::RentalHistory => "rental",
            ResourceKind::PartnerStation => "station",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ResourceKind::RentalHistory => "Rental",
            ResourceKind::PartnerStation => "Station",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
