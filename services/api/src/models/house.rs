//! House listing model, query parameters, and pagination metadata

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Closed set of property types accepted at the mutation boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyType {
    Apartment,
    Villa,
    Independent,
    Studio,
    Other,
}

impl PropertyType {
    pub const VALID: [&'static str; 5] = ["Apartment", "Villa", "Independent", "Studio", "Other"];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Apartment => "Apartment",
            PropertyType::Villa => "Villa",
            PropertyType::Independent => "Independent",
            PropertyType::Studio => "Studio",
            PropertyType::Other => "Other",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "apartment" => Ok(PropertyType::Apartment),
            "villa" => Ok(PropertyType::Villa),
            "independent" => Ok(PropertyType::Independent),
            "studio" => Ok(PropertyType::Studio),
            "other" => Ok(PropertyType::Other),
            other => Err(format!("Unknown property type: {}", other)),
        }
    }
}

/// Listing visibility status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingStatus {
    ForSale,
    Sold,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::ForSale => "ForSale",
            ListingStatus::Sold => "Sold",
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forsale" => Ok(ListingStatus::ForSale),
            "sold" => Ok(ListingStatus::Sold),
            other => Err(format!("Unknown listing status: {}", other)),
        }
    }
}

/// House entity
#[derive(Debug, Clone, Serialize)]
pub struct House {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zipcode: String,
    pub property_type: PropertyType,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub area_sqft: i32,
    pub rent: Option<i64>,
    pub available_from: Option<DateTime<Utc>>,
    pub amenities: Vec<String>,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Owner fields embedded in public listing responses
#[derive(Debug, Clone, Serialize)]
pub struct OwnerSummary {
    pub id: Uuid,
    pub name: String,
    pub username: String,
}

/// House together with its owner summary
#[derive(Debug, Clone, Serialize)]
pub struct HouseWithOwner {
    #[serde(flatten)]
    pub house: House,
    pub owner: OwnerSummary,
}

/// Short house fields embedded in owner-side interest listings
#[derive(Debug, Clone, Serialize)]
pub struct HouseSummary {
    pub id: Uuid,
    pub title: String,
    pub address: String,
    pub city: String,
    pub rent: Option<i64>,
}

/// Amenities arrive either as a JSON array or a comma-separated string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Amenities {
    List(Vec<String>),
    Csv(String),
}

impl Amenities {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Amenities::List(items) => items
                .into_iter()
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .collect(),
            Amenities::Csv(csv) => csv
                .split(',')
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .collect(),
        }
    }
}

/// House creation request body
#[derive(Debug, Clone, Deserialize)]
pub struct CreateHouseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
    pub property_type: Option<String>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub area_sqft: Option<i32>,
    pub rent: Option<i64>,
    pub available_from: Option<DateTime<Utc>>,
    pub amenities: Option<Amenities>,
}

/// Repository input for a new house
#[derive(Debug, Clone)]
pub struct NewHouse {
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zipcode: String,
    pub property_type: PropertyType,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub area_sqft: i32,
    pub rent: Option<i64>,
    pub available_from: Option<DateTime<Utc>>,
    pub amenities: Vec<String>,
}

/// House update request body; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateHouseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
    pub property_type: Option<String>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub area_sqft: Option<i32>,
    pub rent: Option<i64>,
    pub available_from: Option<DateTime<Utc>>,
    pub amenities: Option<Amenities>,
    pub status: Option<String>,
}

/// Allow-listed house fields actually applied by the repository
#[derive(Debug, Clone, Default)]
pub struct HouseUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
    pub property_type: Option<PropertyType>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub area_sqft: Option<i32>,
    pub rent: Option<i64>,
    pub available_from: Option<DateTime<Utc>>,
    pub amenities: Option<Vec<String>>,
    pub status: Option<ListingStatus>,
}

impl HouseUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.address.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.zipcode.is_none()
            && self.property_type.is_none()
            && self.bedrooms.is_none()
            && self.bathrooms.is_none()
            && self.area_sqft.is_none()
            && self.rent.is_none()
            && self.available_from.is_none()
            && self.amenities.is_none()
            && self.status.is_none()
    }
}

/// Raw listing query parameters
///
/// Everything is a string on purpose: malformed values degrade to defaults
/// instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingQuery {
    pub search: Option<String>,
    pub city: Option<String>,
    pub property_type: Option<String>,
    pub status: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Pagination metadata attached to listing responses
#[derive(Debug, Clone, Serialize)]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(total: i64, page: i64, limit: i64) -> Self {
        let total_pages = if limit > 0 {
            (total + limit - 1) / limit
        } else {
            0
        };
        Self {
            total,
            page,
            limit,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_type_round_trip() {
        for name in PropertyType::VALID {
            let parsed: PropertyType = name.parse().unwrap();
            assert_eq!(parsed.as_str(), name);
        }
        assert!("castle".parse::<PropertyType>().is_err());
    }

    #[test]
    fn listing_status_parses() {
        assert_eq!(
            "forsale".parse::<ListingStatus>().unwrap(),
            ListingStatus::ForSale
        );
        assert_eq!("SOLD".parse::<ListingStatus>().unwrap(), ListingStatus::Sold);
        assert!("pending".parse::<ListingStatus>().is_err());
    }

    #[test]
    fn amenities_from_csv() {
        let amenities = Amenities::Csv("parking, lift , , gym".to_string());
        assert_eq!(amenities.into_vec(), vec!["parking", "lift", "gym"]);
    }

    #[test]
    fn amenities_from_list() {
        let amenities = Amenities::List(vec![" pool ".to_string(), String::new()]);
        assert_eq!(amenities.into_vec(), vec!["pool"]);
    }

    #[test]
    fn pagination_rounds_up() {
        let p = Pagination::new(15, 1, 10);
        assert_eq!(p.total_pages, 2);

        let p = Pagination::new(20, 2, 10);
        assert_eq!(p.total_pages, 2);

        let p = Pagination::new(0, 1, 10);
        assert_eq!(p.total_pages, 0);
    }
}
