use serde::Deserialize;

/// Subset of a Nominatim `/reverse?format=json` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReverseResponse {
    #[serde(default)]
    pub address: Option<Address>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Address {
    pub house_number: Option<String>,
    pub road: Option<String>,
    pub street: Option<String>,
    pub neighbourhood: Option<String>,
    pub suburb: Option<String>,
    pub locality: Option<String>,
    pub village: Option<String>,
    pub town: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
}
