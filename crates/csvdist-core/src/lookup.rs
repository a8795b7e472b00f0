//! Distance lookups: the `DistanceLookup` seam and the Google Distance Matrix client

use serde::Deserialize;

use crate::error::LookupError;
use crate::http::HttpContext;

pub const DEFAULT_API_URL: &str = "https://maps.googleapis.com/maps/api/distancematrix/json";

/// Environment variable holding the Distance Matrix API key
pub const API_KEY_ENV: &str = "GOOGLE_MAPS_API_KEY";

/// Raw service output for one origin/destination pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteMeasurement {
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

/// Source of distance/duration for a pair.
///
/// Implementations must not panic on service failures; every failure is
/// an `Err` that the pipeline records and skips.
pub trait DistanceLookup {
    fn lookup(&self, origin: &str, destination: &str) -> Result<RouteMeasurement, LookupError>;
}

impl<T: DistanceLookup + ?Sized> DistanceLookup for &T {
    fn lookup(&self, origin: &str, destination: &str) -> Result<RouteMeasurement, LookupError> {
        (**self).lookup(origin, destination)
    }
}

#[derive(Debug, Deserialize)]
struct MatrixResponse {
    status: Option<String>,
    #[serde(default)]
    rows: Vec<MatrixRow>,
}

#[derive(Debug, Deserialize)]
struct MatrixRow {
    #[serde(default)]
    elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
struct MatrixElement {
    status: Option<String>,
    distance: Option<ValueField>,
    duration: Option<ValueField>,
}

#[derive(Debug, Deserialize)]
struct ValueField {
    value: Option<f64>,
}

/// Extract the first element's distance and duration from a 200 response body.
///
/// Zero values count as missing, same as absent fields.
pub fn parse_matrix_response(body: &str) -> Result<RouteMeasurement, LookupError> {
    let parsed: MatrixResponse =
        serde_json::from_str(body).map_err(|e| LookupError::Decode(e.to_string()))?;

    let Some(element) = parsed.rows.first().and_then(|r| r.elements.first()) else {
        return Err(LookupError::MissingFields {
            element_status: parsed.status,
        });
    };

    let positive = |field: &Option<ValueField>| {
        field
            .as_ref()
            .and_then(|f| f.value)
            .filter(|v| *v > 0.0)
    };

    match (positive(&element.distance), positive(&element.duration)) {
        (Some(distance_meters), Some(duration_seconds)) => Ok(RouteMeasurement {
            distance_meters,
            duration_seconds,
        }),
        _ => Err(LookupError::MissingFields {
            element_status: element.status.clone().or(parsed.status),
        }),
    }
}

/// Google Distance Matrix client. One GET per call, no retries.
#[derive(Debug)]
pub struct DistanceMatrixClient {
    api_url: String,
    api_key: Option<String>,
    http: HttpContext,
}

impl DistanceMatrixClient {
    pub fn new(api_url: impl Into<String>, api_key: Option<String>) -> std::io::Result<Self> {
        Ok(Self {
            api_url: api_url.into(),
            api_key: api_key.filter(|k| !k.is_empty()),
            http: HttpContext::new()?,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl DistanceLookup for DistanceMatrixClient {
    fn lookup(&self, origin: &str, destination: &str) -> Result<RouteMeasurement, LookupError> {
        let api_key = self.api_key.as_deref().ok_or(LookupError::MissingApiKey)?;

        let (status, body) = self.http.get_text(
            &self.api_url,
            &[
                ("units", "imperial"),
                ("origins", origin),
                ("destinations", destination),
                ("key", api_key),
            ],
        )?;

        if status != 200 {
            return Err(LookupError::Http {
                status: Some(status),
                message: format!("unexpected status for {origin} -> {destination}"),
            });
        }
        parse_matrix_response(&body)
    }
}
