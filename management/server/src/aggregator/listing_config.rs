use serde::Deserialize;
use serde::Serialize;

/// Description returned for processes that don't have one.
pub const DEFAULT_DESCRIPTION: &str = "default description";

/// Controls the shape of the process listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    pub shape: ResponseShape,

    /// Sort the metadata shapes by id.
    ///
    /// Ids are always sorted. Metadata is listed in registry order unless
    /// this is set.
    pub sorted: bool,

    pub default_description: String,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            shape: ResponseShape::default(),
            sorted: false,
            default_description: DEFAULT_DESCRIPTION.to_owned(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseShape {
    /// `["orders", "shipping"]`
    Ids,

    /// `[{ "id": "orders", "name": "Order Process" }]`
    IdAndName,

    /// `[{ "id": "orders", "name": "Order Process", "description": "Handles orders" }]`
    #[default]
    Full,
}
