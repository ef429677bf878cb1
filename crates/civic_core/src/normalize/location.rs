use crate::domain::{Coordinates, Location, LocationInput};
use crate::error::AppError;

fn in_range(c: Coordinates) -> bool {
    c.latitude.is_finite()
        && c.longitude.is_finite()
        && (-90.0..=90.0).contains(&c.latitude)
        && (-180.0..=180.0).contains(&c.longitude)
}

/// Parse `"lat, lng"` text into coordinates.
///
/// Exactly two comma-separated numeric tokens are required; anything else (an address,
/// a single number, out-of-range values) yields `None`.
pub fn parse_coordinates(text: &str) -> Option<Coordinates> {
    let mut parts = text.split(',');
    let lat = parts.next()?.trim().parse::<f64>().ok()?;
    let lng = parts.next()?.trim().parse::<f64>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    let c = Coordinates::new(lat, lng);
    in_range(c).then_some(c)
}

/// Display form used whenever no human address is available.
pub fn format_coordinates(c: Coordinates) -> String {
    format!("{:.4}, {:.4}", c.latitude, c.longitude)
}

/// Normalize submitted location input into the canonical structured form.
pub fn normalize_location(input: &LocationInput) -> Result<Location, AppError> {
    match input {
        LocationInput::Text(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Err(AppError::validation("Location is required"));
            }
            Ok(match parse_coordinates(trimmed) {
                Some(c) => Location::at(c, trimmed),
                None => Location::address_only(trimmed),
            })
        }
        LocationInput::Structured {
            latitude,
            longitude,
            address,
        } => {
            let c = Coordinates::new(*latitude, *longitude);
            if !in_range(c) {
                return Err(AppError::validation("Location coordinates out of range")
                    .with_details(format!("latitude={latitude}; longitude={longitude}")));
            }
            let address = address.trim();
            let address = if address.is_empty() {
                format_coordinates(c)
            } else {
                address.to_string()
            };
            Ok(Location::at(c, address))
        }
    }
}

/// Coordinates of a stored location: structured values first, else parsed from the address.
pub fn coordinates_of(location: &Location) -> Option<Coordinates> {
    location
        .coordinates()
        .or_else(|| parse_coordinates(&location.address))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_numeric_tokens() {
        let c = parse_coordinates(" 40.7128 , -74.0060 ").expect("coords");
        assert_eq!(c, Coordinates::new(40.7128, -74.006));
    }

    #[test]
    fn rejects_addresses_and_extra_tokens() {
        assert_eq!(parse_coordinates("Main Street, Springfield"), None);
        assert_eq!(parse_coordinates("1.0, 2.0, 3.0"), None);
        assert_eq!(parse_coordinates("12.5"), None);
        assert_eq!(parse_coordinates("95.0, 10.0"), None);
    }

    #[test]
    fn text_location_normalizes_to_structured_when_numeric() {
        let loc = normalize_location(&LocationInput::Text("40.7128, -74.0060".into())).unwrap();
        assert_eq!(loc.latitude, Some(40.7128));
        assert_eq!(loc.longitude, Some(-74.006));
        assert_eq!(loc.address, "40.7128, -74.0060");

        let addr = normalize_location(&LocationInput::Text("Civil Lines, Delhi".into())).unwrap();
        assert_eq!(addr.coordinates(), None);
        assert_eq!(addr.address, "Civil Lines, Delhi");
    }

    #[test]
    fn blank_text_is_a_validation_error() {
        let err = normalize_location(&LocationInput::Text("   ".into())).unwrap_err();
        assert_eq!(err.code, crate::error::REPORT_VALIDATION_FAILED);
    }

    #[test]
    fn structured_without_address_gets_coordinate_display() {
        let loc = normalize_location(&LocationInput::Structured {
            latitude: 28.6139,
            longitude: 77.209,
            address: String::new(),
        })
        .unwrap();
        assert_eq!(loc.address, "28.6139, 77.2090");
    }
}
