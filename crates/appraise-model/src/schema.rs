//! Column layout of the listing dataset and a typed per-listing view.

use serde::{Deserialize, Serialize};

use crate::data_handling::{Column, Dataset};

pub const TYPE: &str = "TYPE";
pub const BEDS: &str = "BEDS";
pub const BATH: &str = "BATH";
pub const PROPERTYSQFT: &str = "PROPERTYSQFT";
pub const ADMINISTRATIVE_AREA_LEVEL_2: &str = "ADMINISTRATIVE_AREA_LEVEL_2";
pub const LOCALITY: &str = "LOCALITY";
pub const SUBLOCALITY: &str = "SUBLOCALITY";
pub const STREET_NAME: &str = "STREET_NAME";
pub const LATITUDE: &str = "LATITUDE";
pub const LONGITUDE: &str = "LONGITUDE";

/// Regression target.
pub const PRICE: &str = "PRICE";

/// Feature columns in the order they are cleaned.
pub const FEATURE_COLUMNS: [&str; 10] = [
    TYPE,
    BEDS,
    BATH,
    PROPERTYSQFT,
    ADMINISTRATIVE_AREA_LEVEL_2,
    LOCALITY,
    SUBLOCALITY,
    STREET_NAME,
    LATITUDE,
    LONGITUDE,
];

/// Columns that are one-hot encoded by the preprocessor.
pub const CATEGORICAL_COLUMNS: [&str; 5] = [
    TYPE,
    ADMINISTRATIVE_AREA_LEVEL_2,
    LOCALITY,
    SUBLOCALITY,
    STREET_NAME,
];

/// Columns passed through the median imputer.
pub const NUMERICAL_COLUMNS: [&str; 5] = [BEDS, BATH, PROPERTYSQFT, LATITUDE, LONGITUDE];

/// Placeholder written into missing text cells during cleaning.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Features of a single listing, as supplied by a caller that wants a price
/// estimate without going through a CSV file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub property_type: Option<String>,
    pub beds: Option<f64>,
    pub bath: Option<f64>,
    pub property_sqft: Option<f64>,
    pub administrative_area_level_2: Option<String>,
    pub locality: Option<String>,
    pub sublocality: Option<String>,
    pub street_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Listing {
    /// Build a feature-only dataset with one row per listing.
    pub fn to_dataset(listings: &[Listing]) -> Dataset {
        let mut dataset = Dataset::with_rows(listings.len());
        dataset.push_column(TYPE, text_column(listings, |l| l.property_type.clone()));
        dataset.push_column(BEDS, numeric_column(listings, |l| l.beds));
        dataset.push_column(BATH, numeric_column(listings, |l| l.bath));
        dataset.push_column(PROPERTYSQFT, numeric_column(listings, |l| l.property_sqft));
        dataset.push_column(
            ADMINISTRATIVE_AREA_LEVEL_2,
            text_column(listings, |l| l.administrative_area_level_2.clone()),
        );
        dataset.push_column(LOCALITY, text_column(listings, |l| l.locality.clone()));
        dataset.push_column(SUBLOCALITY, text_column(listings, |l| l.sublocality.clone()));
        dataset.push_column(STREET_NAME, text_column(listings, |l| l.street_name.clone()));
        dataset.push_column(LATITUDE, numeric_column(listings, |l| l.latitude));
        dataset.push_column(LONGITUDE, numeric_column(listings, |l| l.longitude));
        dataset
    }
}

fn text_column<F>(listings: &[Listing], f: F) -> Column
where
    F: Fn(&Listing) -> Option<String>,
{
    Column::Text(listings.iter().map(f).collect())
}

fn numeric_column<F>(listings: &[Listing], f: F) -> Column
where
    F: Fn(&Listing) -> Option<f64>,
{
    Column::Numeric(listings.iter().map(f).collect())
}
