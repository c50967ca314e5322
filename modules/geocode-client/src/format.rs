//! Human-readable location labels.

use crate::types::{Address, ReverseResponse};

const UNKNOWN_LOCATION: &str = "Unknown Location";

/// `"12.9716, 77.5946"`, the label used when no place name is available.
pub fn format_coordinates(lat: f64, lng: f64) -> String {
    format!("{lat:.4}, {lng:.4}")
}

/// Prefer an explicit name, fall back to coordinates.
pub fn location_label(lat: f64, lng: f64, default_name: Option<&str>) -> String {
    match default_name {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => format_coordinates(lat, lng),
    }
}

/// Cache key: coordinates rounded to 4 decimals (about 11 m).
pub fn cache_key(lat: f64, lng: f64) -> String {
    format!("{lat:.4},{lng:.4}")
}

/// Street, area, city, state, postcode, country, most specific first.
/// Returns `None` when the address carries nothing usable.
pub fn format_address(addr: &Address) -> Option<String> {
    let road = first_of([&addr.road, &addr.street]);
    let street_address = match (nonempty(&addr.house_number), road) {
        (Some(number), Some(road)) => Some(format!("{number} {road}")),
        (None, Some(road)) => Some(road.to_string()),
        _ => None,
    };

    let mut parts: Vec<&str> = Vec::new();
    if let Some(ref street) = street_address {
        parts.push(street);
    }

    if let Some(area) = first_of([&addr.neighbourhood, &addr.suburb, &addr.locality]) {
        parts.push(area);
    }

    if let Some(city) = first_of([&addr.village, &addr.town, &addr.city, &addr.county]) {
        push_unique(&mut parts, city);
    }
    if let Some(state) = nonempty(&addr.state) {
        push_unique(&mut parts, state);
    }
    if let Some(postcode) = nonempty(&addr.postcode) {
        parts.push(postcode);
    }
    if let Some(country) = nonempty(&addr.country) {
        push_unique(&mut parts, country);
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

/// Full label for a reverse lookup: place name plus 6-decimal coordinates.
pub fn describe(response: &ReverseResponse, lat: f64, lng: f64) -> String {
    let name = response
        .address
        .as_ref()
        .and_then(format_address)
        .unwrap_or_else(|| UNKNOWN_LOCATION.to_string());
    format!("{name} ({lat:.6}, {lng:.6})")
}

fn nonempty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

fn first_of<const N: usize>(fields: [&Option<String>; N]) -> Option<&str> {
    fields.into_iter().find_map(nonempty)
}

fn push_unique<'a>(parts: &mut Vec<&'a str>, value: &'a str) {
    if !parts.contains(&value) {
        parts.push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    #[test]
    fn full_address() {
        let addr = Address {
            house_number: s("221"),
            road: s("MG Road"),
            neighbourhood: s("Shanthala Nagar"),
            suburb: s("Ashok Nagar"),
            city: s("Bengaluru"),
            state: s("Karnataka"),
            postcode: s("560001"),
            country: s("India"),
            ..Default::default()
        };
        assert_eq!(
            format_address(&addr).unwrap(),
            "221 MG Road, Shanthala Nagar, Bengaluru, Karnataka, 560001, India"
        );
    }

    #[test]
    fn street_without_number_and_fallback_fields() {
        let addr = Address {
            street: s("Elm Street"),
            locality: s("Old Town"),
            county: s("Hennepin County"),
            country: s("United States"),
            ..Default::default()
        };
        assert_eq!(
            format_address(&addr).unwrap(),
            "Elm Street, Old Town, Hennepin County, United States"
        );
    }

    #[test]
    fn house_number_alone_is_dropped() {
        let addr = Address {
            house_number: s("5"),
            town: s("Springfield"),
            ..Default::default()
        };
        assert_eq!(format_address(&addr).unwrap(), "Springfield");
    }

    #[test]
    fn repeated_names_are_not_repeated() {
        let addr = Address {
            city: s("Singapore"),
            state: s("Singapore"),
            country: s("Singapore"),
            ..Default::default()
        };
        assert_eq!(format_address(&addr).unwrap(), "Singapore");
    }

    #[test]
    fn village_beats_city() {
        let addr = Address {
            village: s("Hamlet"),
            city: s("Metropolis"),
            ..Default::default()
        };
        assert_eq!(format_address(&addr).unwrap(), "Hamlet");
    }

    #[test]
    fn empty_address_is_none() {
        assert_eq!(format_address(&Address::default()), None);
        let blank = Address {
            road: s(""),
            ..Default::default()
        };
        assert_eq!(format_address(&blank), None);
    }

    #[test]
    fn describe_appends_coordinates() {
        let response = ReverseResponse {
            address: Some(Address {
                road: s("Main St"),
                ..Default::default()
            }),
        };
        assert_eq!(
            describe(&response, 44.97781, -93.265),
            "Main St (44.977810, -93.265000)"
        );
        assert_eq!(
            describe(&ReverseResponse::default(), 1.0, 2.0),
            "Unknown Location (1.000000, 2.000000)"
        );
    }

    #[test]
    fn labels_and_keys() {
        assert_eq!(format_coordinates(12.971598, 77.594566), "12.9716, 77.5946");
        assert_eq!(location_label(1.0, 2.0, Some("City Hall")), "City Hall");
        assert_eq!(location_label(1.0, 2.0, Some("")), "1.0000, 2.0000");
        assert_eq!(location_label(1.0, 2.0, None), "1.0000, 2.0000");
        assert_eq!(cache_key(44.97781, -93.26502), "44.9778,-93.2650");
    }
}
