use super::SchemaEntry;
use crate::domain::CanonicalField;

// Object keys in the analytics data layer are quoted, so the raw token keeps
// its quotes. The floor-plan viewer uses a bare identifier key.
pub(super) fn entries() -> Vec<SchemaEntry> {
    vec![
        SchemaEntry::single(CanonicalField::GeoLat, "\"latitude\""),
        SchemaEntry::single(CanonicalField::GeoLong, "\"longitude\""),
        SchemaEntry::single(CanonicalField::Postcode, "\"postcode\""),
        SchemaEntry::single(CanonicalField::RentPcm, "\"price\""),
        SchemaEntry::single(CanonicalField::Beds, "\"beds\""),
        SchemaEntry::single(CanonicalField::DateAvailable, "\"aed\""),
        SchemaEntry::single(CanonicalField::WebsiteUniqueId, "\"propertyId\""),
        SchemaEntry::single(CanonicalField::EstateAgent, "\"brandName\""),
        SchemaEntry::single(CanonicalField::EstateAgentAddress, "\"displayAddress\""),
        SchemaEntry::multi(CanonicalField::ImageLinks, "\"masterUrl\""),
        SchemaEntry::multi(CanonicalField::FloorplanLinks, "zoomUrls"),
    ]
}
