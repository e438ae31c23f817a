//! Track data model, loading and distance measurement
//!
//! A track file is parsed into tracks → segments → points, but the scanner
//! only ever looks at the flattened point sequence. Grouping is kept so the
//! loader stays a faithful view of the file.

pub mod distance;
pub mod loader;

pub use distance::{DistanceMetric, DistanceOracle, EARTH_RADIUS_M};
pub use loader::{GpxLoader, TrackLoader};

use std::path::{Path, PathBuf};

/// A geographic coordinate in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude (north positive)
    pub latitude: f64,

    /// Longitude (east positive)
    pub longitude: f64,
}

impl Coordinate {
    /// Create a new coordinate
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check the coordinate lies on the globe
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::new(latitude, longitude)
    }
}

/// A contiguous run of recorded points
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segment {
    pub points: Vec<Coordinate>,
}

/// A named track made of segments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Track {
    pub name: Option<String>,
    pub segments: Vec<Segment>,
}

/// A parsed track file
#[derive(Debug, Clone, PartialEq)]
pub struct TrackFile {
    /// Absolute path of the source file
    pub path: PathBuf,

    /// Tracks in file order
    pub tracks: Vec<Track>,
}

impl TrackFile {
    /// Create a track file from already-parsed tracks
    pub fn new(path: impl Into<PathBuf>, tracks: Vec<Track>) -> Self {
        Self {
            path: path.into(),
            tracks,
        }
    }

    /// Convenience constructor for a single track with a single segment
    pub fn from_points(path: impl Into<PathBuf>, points: Vec<Coordinate>) -> Self {
        Self::new(
            path,
            vec![Track {
                name: None,
                segments: vec![Segment { points }],
            }],
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Iterate over every point across all tracks and segments
    pub fn points(&self) -> impl Iterator<Item = &Coordinate> + '_ {
        self.tracks
            .iter()
            .flat_map(|track| track.segments.iter())
            .flat_map(|segment| segment.points.iter())
    }

    /// Total number of points in the file
    pub fn point_count(&self) -> usize {
        self.tracks
            .iter()
            .flat_map(|track| track.segments.iter())
            .map(|segment| segment.points.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.point_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_flatten_across_tracks_and_segments() {
        let file = TrackFile::new(
            "/t.gpx",
            vec![
                Track {
                    name: Some("a".into()),
                    segments: vec![
                        Segment {
                            points: vec![Coordinate::new(1.0, 1.0)],
                        },
                        Segment { points: vec![] },
                        Segment {
                            points: vec![Coordinate::new(2.0, 2.0), Coordinate::new(3.0, 3.0)],
                        },
                    ],
                },
                Track {
                    name: None,
                    segments: vec![Segment {
                        points: vec![Coordinate::new(4.0, 4.0)],
                    }],
                },
            ],
        );

        let lats: Vec<f64> = file.points().map(|p| p.latitude).collect();
        assert_eq!(lats, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(file.point_count(), 4);
        assert!(!file.is_empty());
    }

    #[test]
    fn test_empty_file() {
        let file = TrackFile::new(
            "/e.gpx",
            vec![Track {
                name: None,
                segments: vec![Segment::default()],
            }],
        );
        assert!(file.is_empty());
        assert_eq!(file.points().count(), 0);
    }

    #[test]
    fn test_coordinate_validity() {
        assert!(Coordinate::new(52.52, 13.405).is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, -180.5).is_valid());
    }
}
