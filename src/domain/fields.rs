// src/domain/fields.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Site-independent field names every `PropertyRecord` carries.
///
/// Schemas map a site's raw script tokens onto these; the record shape never
/// depends on which site a listing came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    WebsiteUniqueId,
    GeoLat,
    GeoLong,
    Postcode,
    RentPcm,
    Beds,
    DateAvailable,
    EstateAgent,
    EstateAgentAddress,
    ImageLinks,
    FloorplanLinks,
}

/// How a captured raw value is converted once the walk is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Float,
    Integer,
    Date,
    List,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 11] = [
        CanonicalField::WebsiteUniqueId,
        CanonicalField::GeoLat,
        CanonicalField::GeoLong,
        CanonicalField::Postcode,
        CanonicalField::RentPcm,
        CanonicalField::Beds,
        CanonicalField::DateAvailable,
        CanonicalField::EstateAgent,
        CanonicalField::EstateAgentAddress,
        CanonicalField::ImageLinks,
        CanonicalField::FloorplanLinks,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CanonicalField::WebsiteUniqueId => "website_unique_id",
            CanonicalField::GeoLat => "geo_lat",
            CanonicalField::GeoLong => "geo_long",
            CanonicalField::Postcode => "postcode",
            CanonicalField::RentPcm => "rent_pcm",
            CanonicalField::Beds => "beds",
            CanonicalField::DateAvailable => "date_available",
            CanonicalField::EstateAgent => "estate_agent",
            CanonicalField::EstateAgentAddress => "estate_agent_address",
            CanonicalField::ImageLinks => "image_links",
            CanonicalField::FloorplanLinks => "floorplan_links",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            CanonicalField::GeoLat | CanonicalField::GeoLong | CanonicalField::RentPcm => {
                FieldKind::Float
            }
            CanonicalField::Beds => FieldKind::Integer,
            CanonicalField::DateAvailable => FieldKind::Date,
            CanonicalField::ImageLinks | CanonicalField::FloorplanLinks => FieldKind::List,
            CanonicalField::WebsiteUniqueId
            | CanonicalField::Postcode
            | CanonicalField::EstateAgent
            | CanonicalField::EstateAgentAddress => FieldKind::Text,
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
