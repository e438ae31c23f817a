//! Track file loading
//!
//! The [`TrackLoader`] trait is the seam between the scanner and the file
//! format. [`GpxLoader`] reads GPX 1.0/1.1 documents; only `<trk>` points are
//! kept, waypoints and routes are ignored.

use super::{Coordinate, Segment, Track, TrackFile};
use crate::error::{TrackError, TrackResult};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::trace;

/// Loads a track file from disk
pub trait TrackLoader: Send + Sync {
    fn load(&self, path: &Path) -> TrackResult<TrackFile>;
}

/// Loader for GPX documents
#[derive(Debug, Clone, Copy, Default)]
pub struct GpxLoader;

impl GpxLoader {
    pub fn new() -> Self {
        Self
    }
}

impl TrackLoader for GpxLoader {
    fn load(&self, path: &Path) -> TrackResult<TrackFile> {
        let file = File::open(path).map_err(|source| TrackError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let document = gpx::read(BufReader::new(file)).map_err(|e| TrackError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let tracks: Vec<Track> = document
            .tracks
            .into_iter()
            .map(|track| Track {
                name: track.name,
                segments: track
                    .segments
                    .into_iter()
                    .map(|segment| Segment {
                        points: segment
                            .points
                            .iter()
                            .map(|waypoint| {
                                let point = waypoint.point();
                                Coordinate::new(point.y(), point.x())
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        let file = TrackFile::new(path, tracks);
        trace!(path = %path.display(), points = file.point_count(), "Track file loaded");
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_tracks_and_segments() {
        let file = write_temp(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <trk>
    <name>Morning ride</name>
    <trkseg>
      <trkpt lat="47.5" lon="8.5"></trkpt>
      <trkpt lat="47.6" lon="8.6"></trkpt>
    </trkseg>
    <trkseg>
      <trkpt lat="47.7" lon="8.7"></trkpt>
    </trkseg>
  </trk>
</gpx>"#,
        );

        let track_file = GpxLoader::new().load(file.path()).unwrap();
        assert_eq!(track_file.tracks.len(), 1);
        assert_eq!(track_file.tracks[0].name.as_deref(), Some("Morning ride"));
        assert_eq!(track_file.tracks[0].segments.len(), 2);
        assert_eq!(track_file.point_count(), 3);

        let first = track_file.points().next().unwrap();
        assert_eq!(first.latitude, 47.5);
        assert_eq!(first.longitude, 8.5);
    }

    #[test]
    fn test_waypoints_are_ignored() {
        let file = write_temp(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <wpt lat="10.0" lon="10.0"></wpt>
</gpx>"#,
        );

        let track_file = GpxLoader::new().load(file.path()).unwrap();
        assert!(track_file.is_empty());
    }

    #[test]
    fn test_parse_failure() {
        let file = write_temp("this is not xml at all");
        let err = GpxLoader::new().load(file.path()).unwrap_err();
        assert!(matches!(err, TrackError::Parse { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = GpxLoader::new()
            .load(Path::new("/definitely/not/here.gpx"))
            .unwrap_err();
        assert!(matches!(err, TrackError::Io { .. }));
    }
}
