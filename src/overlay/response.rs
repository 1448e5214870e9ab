use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{
    classify::ClassBreakpoints,
    common::OverlayError,
    overlay::{OverlayResult, ZoneArea},
};

/// Body of `POST /api/precinct_overlay`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayRequest {
    pub precinct_name: String,
    pub year: u16,
}

/// Response of `POST /api/precinct_overlay`: raw intersection areas, not yet classified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precinct: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    pub precinct_area: f64,
    #[serde(default)]
    pub dzn_intersect_count: usize,
    #[serde(default)]
    pub intersections: Vec<ResponseIntersection>,
}

/// One zone in an overlay response. Codes and values are accepted as numbers or strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseIntersection {
    #[serde(default, deserialize_with = "lenient_code")]
    pub code: String,
    #[serde(default, deserialize_with = "lenient_value")]
    pub value: Option<f64>,
    pub area: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_pct: Option<f64>,
}

fn lenient_code<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    };
    Ok(value.filter(|v| v.is_finite()))
}

impl From<&OverlayResult> for OverlayResponse {
    /// Build the server-side body for a locally computed overlay.
    fn from(result: &OverlayResult) -> Self {
        Self {
            precinct: Some(result.precinct().to_owned()),
            year: Some(result.year()),
            precinct_area: result.precinct_area(),
            dzn_intersect_count: result.dzn_intersect_count(),
            intersections: result.intersections().iter()
                .map(|zone| ResponseIntersection {
                    code: zone.code.clone(),
                    value: Some(zone.value),
                    area: zone.area,
                    area_pct: Some(zone.area_share),
                })
                .collect(),
        }
    }
}

impl OverlayResponse {
    /// Classify and aggregate the response locally, the same way a local overlay is.
    ///
    /// `areaPct` from the server is ignored; shares are recomputed from the areas.
    pub fn into_result(
        self,
        precinct: &str,
        year: u16,
        breakpoints: &ClassBreakpoints,
    ) -> Result<OverlayResult, OverlayError> {
        if !self.precinct_area.is_finite() || self.precinct_area < 0.0 {
            return Err(OverlayError::MalformedResponse(format!("precinct area {}", self.precinct_area)));
        }
        if let Some(other) = self.year.filter(|&y| y != year) {
            return Err(OverlayError::MalformedResponse(format!("expected year {year}, got {other}")));
        }
        if self.precinct_area == 0.0 {
            return Err(OverlayError::ZeroAreaPrecinct(precinct.to_owned()));
        }
        if let Some(bad) = self.intersections.iter().find(|zone| !zone.area.is_finite()) {
            return Err(OverlayError::MalformedResponse(format!("zone '{}' has area {}", bad.code, bad.area)));
        }

        let areas = self.intersections.into_iter()
            .map(|zone| ZoneArea { code: zone.code, value: zone.value.unwrap_or(0.0), area: zone.area })
            .collect();
        Ok(OverlayResult::new(precinct, year, self.precinct_area, areas, breakpoints))
    }
}
