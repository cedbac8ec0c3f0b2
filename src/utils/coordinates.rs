use crate::error::{ProcessingError, Result};
use crate::models::GeoPoint;
use crate::utils::constants::{MEAN_EARTH_RADIUS_KM, WGS84_A_M, WGS84_F};

const VINCENTY_MAX_ITERATIONS: usize = 200;
const VINCENTY_TOLERANCE: f64 = 1e-12;

/// Convert DMS (Degrees:Minutes:Seconds) format to decimal degrees
///
/// # Examples
/// ```
/// use baro_pulse::utils::dms_to_decimal;
///
/// let decimal = dms_to_decimal("44:48:11").unwrap();
/// assert!((decimal - 44.803056).abs() < 0.000001);
/// ```
pub fn dms_to_decimal(dms: &str) -> Result<f64> {
    let parts: Vec<&str> = dms.split(':').collect();

    if parts.len() != 3 {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Invalid DMS format: '{}'. Expected format: 'DD:MM:SS'",
            dms
        )));
    }

    // The sign may only be carried by the degrees part
    let is_negative = dms.trim_start().starts_with('-');

    let degrees = parts[0].trim().parse::<f64>().map_err(|_| {
        ProcessingError::InvalidCoordinate(format!("Invalid degrees value: '{}'", parts[0]))
    })?;

    let minutes = parts[1].parse::<f64>().map_err(|_| {
        ProcessingError::InvalidCoordinate(format!("Invalid minutes value: '{}'", parts[1]))
    })?;

    let seconds = parts[2].trim().parse::<f64>().map_err(|_| {
        ProcessingError::InvalidCoordinate(format!("Invalid seconds value: '{}'", parts[2]))
    })?;

    if !(0.0..60.0).contains(&minutes) {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Minutes must be between 0 and 60, got: {}",
            minutes
        )));
    }

    if !(0.0..60.0).contains(&seconds) {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Seconds must be between 0 and 60, got: {}",
            seconds
        )));
    }

    let decimal_value = degrees.abs() + minutes / 60.0 + seconds / 3600.0;

    if is_negative {
        Ok(-decimal_value)
    } else {
        Ok(decimal_value)
    }
}

/// Parse coordinate that might be in DMS or decimal format
pub fn parse_coordinate(coord_str: &str) -> Result<f64> {
    let trimmed = coord_str.trim();

    if !trimmed.contains(':') {
        trimmed.parse::<f64>().map_err(|_| {
            ProcessingError::InvalidCoordinate(format!("Invalid coordinate value: '{}'", coord_str))
        })
    } else {
        dms_to_decimal(trimmed)
    }
}

/// Great-circle distance on a sphere of mean Earth radius (km).
///
/// Accurate to roughly 0.5% against the ellipsoid.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().min(1.0).asin();

    MEAN_EARTH_RADIUS_KM * c
}

/// Geodesic distance on the WGS-84 ellipsoid (km) by Vincenty's inverse
/// formula.
///
/// Returns `None` when the iteration fails to converge, which happens only
/// for nearly antipodal points.
pub fn vincenty_distance(from: GeoPoint, to: GeoPoint) -> Option<f64> {
    let a = WGS84_A_M;
    let f = WGS84_F;
    let b = (1.0 - f) * a;

    let l = (to.longitude - from.longitude).to_radians();
    let u1 = ((1.0 - f) * from.latitude.to_radians().tan()).atan();
    let u2 = ((1.0 - f) * to.latitude.to_radians().tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    for _ in 0..VINCENTY_MAX_ITERATIONS {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        let sin_sigma = ((cos_u2 * sin_lambda).powi(2)
            + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
        .sqrt();
        if sin_sigma == 0.0 {
            return Some(0.0); // coincident points
        }
        let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        let sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
        // equatorial line
        let cos_2sigma_m = if cos_sq_alpha != 0.0 {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        } else {
            0.0
        };
        let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));
        let previous = lambda;
        lambda = l
            + (1.0 - c)
                * f
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))));

        if (lambda - previous).abs() < VINCENTY_TOLERANCE {
            let u_sq = cos_sq_alpha * (a * a - b * b) / (b * b);
            let big_a =
                1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
            let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
            let delta_sigma = big_b
                * sin_sigma
                * (cos_2sigma_m
                    + big_b / 4.0
                        * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))
                            - big_b / 6.0
                                * cos_2sigma_m
                                * (-3.0 + 4.0 * sin_sigma.powi(2))
                                * (-3.0 + 4.0 * cos_2sigma_m.powi(2))));
            return Some(b * big_a * (sigma - delta_sigma) / 1000.0);
        }
    }

    None
}

/// Ellipsoidal distance (km), falling back to the haversine formula where
/// Vincenty does not converge.
pub fn geodesic_distance(from: GeoPoint, to: GeoPoint) -> f64 {
    match vincenty_distance(from, to) {
        Some(distance) => distance,
        None => {
            tracing::warn!(
                "Vincenty did not converge for ({}) -> ({}), using haversine distance",
                from,
                to
            );
            haversine_distance(from.latitude, from.longitude, to.latitude, to.longitude)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dms_to_decimal() {
        assert!((dms_to_decimal("50:30:15").unwrap() - 50.504167).abs() < 0.000001);
        assert!((dms_to_decimal("51:28:38").unwrap() - 51.477222).abs() < 0.000001);

        // -0:07:39 = -(7/60 + 39/3600)
        let result = dms_to_decimal("-0:07:39").unwrap();
        assert!((result - -0.1275).abs() < 0.0001);
    }

    #[test]
    fn test_invalid_dms_format() {
        assert!(dms_to_decimal("50:30").is_err());
        assert!(dms_to_decimal("50:70:15").is_err());
        assert!(dms_to_decimal("50:30:70").is_err());
    }

    #[test]
    fn test_parse_coordinate() {
        assert!((parse_coordinate("44.8032").unwrap() - 44.8032).abs() < 0.000001);
        assert!((parse_coordinate("50:30:15").unwrap() - 50.504167).abs() < 0.000001);
        assert!((parse_coordinate(" -63.6204 ").unwrap() - -63.6204).abs() < 0.000001);
    }

    #[test]
    fn test_haversine_distance() {
        // London to Edinburgh
        let distance = haversine_distance(51.5074, -0.1278, 55.9533, -3.1883);
        assert!((distance - 534.0).abs() < 10.0);
    }

    #[test]
    fn test_vincenty_one_degree_of_longitude_on_equator() {
        let d = vincenty_distance(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0)).unwrap();
        assert!((d - 111.319_491).abs() < 1e-3);
    }

    #[test]
    fn test_vincenty_tonga_to_halifax() {
        let tonga = GeoPoint::new(-20.5452074472518, -175.38715105641674);
        let halifax = GeoPoint::new(44.80321621050904, -63.62038361172844);
        let d = vincenty_distance(tonga, halifax).unwrap();
        assert!((d - 13_293.9).abs() < 1.0, "got {}", d);

        // Spherical estimate within half a percent
        let h = haversine_distance(tonga.latitude, tonga.longitude, halifax.latitude, halifax.longitude);
        assert!((h - d).abs() / d < 0.005);
    }

    #[test]
    fn test_geodesic_distance_falls_back_for_antipodes() {
        let d = geodesic_distance(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.5, 179.7));
        assert!(d > 19_900.0 && d < 20_050.0, "got {}", d);
    }

    #[test]
    fn test_coincident_points() {
        let p = GeoPoint::new(44.8, -63.6);
        assert_eq!(geodesic_distance(p, p), 0.0);
    }
}
