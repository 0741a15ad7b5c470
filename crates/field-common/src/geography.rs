//! Geography descriptors exposed by codec-backed metadata.

use serde::{Deserialize, Serialize};

/// A geographic bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Build from the first and last grid points of a scanned grid.
    ///
    /// Grids may scan in either direction, so the corners are sorted. Longitudes
    /// given in the 0-360 convention are shifted to -180..180.
    pub fn from_grid_corners(first_lat: f64, first_lon: f64, last_lat: f64, last_lon: f64) -> Self {
        let min_lat = first_lat.min(last_lat);
        let max_lat = first_lat.max(last_lat);
        let min_lon = first_lon.min(last_lon);
        let max_lon = first_lon.max(last_lon);

        let (min_lon, max_lon) = if min_lon > 180.0 {
            (min_lon - 360.0, max_lon - 360.0)
        } else {
            (min_lon, max_lon)
        };

        Self::new(min_lon, min_lat, max_lon, max_lat)
    }

    /// Width of the bounding box in degrees.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in degrees.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Check if a point is contained within this bbox.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

/// Horizontal description of a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geography {
    /// Grid type identifier (e.g. "regular_ll"), when known
    pub grid_type: Option<String>,
    pub bounding_box: BoundingBox,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_grid_corners_sorts() {
        let bbox = BoundingBox::from_grid_corners(90.0, 0.0, -90.0, 359.0);
        assert_eq!(bbox.min_y, -90.0);
        assert_eq!(bbox.max_y, 90.0);
        assert_eq!(bbox.min_x, 0.0);
        assert_eq!(bbox.max_x, 359.0);
    }

    #[test]
    fn test_from_grid_corners_wraps_longitude() {
        let bbox = BoundingBox::from_grid_corners(50.0, 230.0, 20.0, 300.0);
        assert_eq!(bbox.min_x, -130.0);
        assert_eq!(bbox.max_x, -60.0);
        assert!(bbox.contains_point(-100.0, 40.0));
    }
}
