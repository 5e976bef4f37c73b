// src/domain/property.rs

use crate::domain::availability::format_canonical;
use crate::domain::fields::CanonicalField;
use chrono::NaiveDateTime;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

/// A single converted field value. `Null` serializes as JSON `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Text(String),
    Float(f64),
    Integer(i64),
    Date(#[serde(serialize_with = "serialize_canonical_date")] NaiveDateTime),
    List(Vec<String>),
}

fn serialize_canonical_date<S>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_canonical(date))
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(v) => Some(*v),
            FieldValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&NaiveDateTime> {
        match self {
            FieldValue::Date(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_list(&self) -> &[String] {
        match self {
            FieldValue::List(items) => items,
            _ => &[],
        }
    }
}

static NULL: FieldValue = FieldValue::Null;

/// The canonical output of one successful detail extraction.
///
/// Every `CanonicalField` is always present as a key, `Null` when the
/// listing did not carry it. Records are immutable once built; downstream
/// stages that augment them work on their own copies.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyRecord {
    pub prop_uuid: Uuid,
    pub url: Option<String>,
    pub description: Option<String>,
    fields: BTreeMap<CanonicalField, FieldValue>,
}

impl PropertyRecord {
    /// Builds a record, filling any canonical field missing from `fields` with `Null`.
    pub fn new(
        prop_uuid: Uuid,
        url: Option<String>,
        description: Option<String>,
        mut fields: BTreeMap<CanonicalField, FieldValue>,
    ) -> Self {
        for field in CanonicalField::ALL {
            fields.entry(field).or_insert(FieldValue::Null);
        }

        Self {
            prop_uuid,
            url,
            description,
            fields,
        }
    }

    pub fn get(&self, field: CanonicalField) -> &FieldValue {
        self.fields.get(&field).unwrap_or(&NULL)
    }

    pub fn website_unique_id(&self) -> Option<&str> {
        self.get(CanonicalField::WebsiteUniqueId).as_text()
    }

    pub fn geo_lat(&self) -> Option<f64> {
        self.get(CanonicalField::GeoLat).as_f64()
    }

    pub fn geo_long(&self) -> Option<f64> {
        self.get(CanonicalField::GeoLong).as_f64()
    }

    pub fn rent_pcm(&self) -> Option<f64> {
        self.get(CanonicalField::RentPcm).as_f64()
    }

    pub fn beds(&self) -> Option<i64> {
        self.get(CanonicalField::Beds).as_i64()
    }

    pub fn date_available(&self) -> Option<&NaiveDateTime> {
        self.get(CanonicalField::DateAvailable).as_date()
    }

    pub fn image_links(&self) -> &[String] {
        self.get(CanonicalField::ImageLinks).as_list()
    }

    pub fn floorplan_links(&self) -> &[String] {
        self.get(CanonicalField::FloorplanLinks).as_list()
    }
}

// Flat JSON object keyed by canonical name, the shape downstream consumers index into.
impl Serialize for PropertyRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 3))?;
        map.serialize_entry("prop_uuid", &self.prop_uuid)?;
        map.serialize_entry("url", &self.url)?;
        map.serialize_entry("description", &self.description)?;
        for (field, value) in &self.fields {
            map.serialize_entry(field.name(), value)?;
        }
        map.end()
    }
}
