use super::SchemaEntry;
use crate::domain::CanonicalField;

pub(super) fn entries() -> Vec<SchemaEntry> {
    vec![
        SchemaEntry::multi(CanonicalField::ImageLinks, "\"photo\""),
        SchemaEntry::single(CanonicalField::EstateAgentAddress, "\"streetAddress\""),
        SchemaEntry::single(CanonicalField::GeoLat, "\"latitude\""),
        SchemaEntry::single(CanonicalField::GeoLong, "\"longitude\""),
        SchemaEntry::single(CanonicalField::Postcode, "postcode"),
        SchemaEntry::single(CanonicalField::RentPcm, "price"),
        SchemaEntry::single(CanonicalField::Beds, "num_beds"),
        SchemaEntry::single(CanonicalField::DateAvailable, "aed"),
        SchemaEntry::single(CanonicalField::WebsiteUniqueId, "propertyId"),
        SchemaEntry::single(CanonicalField::EstateAgent, "brandName"),
        SchemaEntry::multi(CanonicalField::FloorplanLinks, "zoomUrls"),
    ]
}
