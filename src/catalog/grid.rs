use crate::search::geo::{BoundingBox, GeoPoint};

/// Identifier of one grid cell: floor(lat / cell), floor(lon / cell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub row: i32,
    pub col: i32,
}

/// Fixed-size latitude/longitude grid used as the coarse spatial index of
/// the in-memory catalog.
///
/// A box query enumerates every cell the box touches; callers still test
/// exact containment, so cell size only affects speed, never results.
#[derive(Debug, Clone, Copy)]
pub struct GeoGrid {
    cell_deg: f64,
}

impl GeoGrid {
    pub fn new(cell_deg: f64) -> Self {
        Self { cell_deg }
    }

    pub fn cell_of(&self, point: &GeoPoint) -> CellKey {
        CellKey {
            row: (point.latitude / self.cell_deg).floor() as i32,
            col: (point.longitude / self.cell_deg).floor() as i32,
        }
    }

    /// Number of cells `bbox` overlaps.
    pub fn cell_count(&self, bbox: &BoundingBox) -> u64 {
        let (lo, hi) = self.corners(bbox);
        let rows = (hi.row - lo.row + 1).max(0) as u64;
        let cols = (hi.col - lo.col + 1).max(0) as u64;
        rows * cols
    }

    /// All cells overlapping `bbox`, row-major.
    pub fn cells_covering(&self, bbox: &BoundingBox) -> impl Iterator<Item = CellKey> {
        let (lo, hi) = self.corners(bbox);
        (lo.row..=hi.row).flat_map(move |row| (lo.col..=hi.col).map(move |col| CellKey { row, col }))
    }

    fn corners(&self, bbox: &BoundingBox) -> (CellKey, CellKey) {
        (
            self.cell_of(&GeoPoint::new(bbox.min_lat, bbox.min_lon)),
            self.cell_of(&GeoPoint::new(bbox.max_lat, bbox.max_lon)),
        )
    }
}
