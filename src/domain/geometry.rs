//! Geometric types for unit extents and lasso boundaries
//!
//! Coordinates are plain `(x, y)` pairs in whatever projection the catalog
//! uses (longitude/latitude for the department files).

/// A point in catalog coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new rectangle from corner coordinates
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Smallest rectangle enclosing every point, or `None` for no points
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Self::new(first.x, first.y, first.x, first.y);
        for p in iter {
            bounds.min_x = bounds.min_x.min(p.x);
            bounds.min_y = bounds.min_y.min(p.y);
            bounds.max_x = bounds.max_x.max(p.x);
            bounds.max_y = bounds.max_y.max(p.y);
        }
        Some(bounds)
    }

    /// Smallest rectangle enclosing both rectangles
    pub fn union(&self, other: BoundingBox) -> BoundingBox {
        BoundingBox {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Center of the rectangle
    pub fn center(&self) -> Point {
        Point {
            x: (self.min_x + self.max_x) / 2.0,
            y: (self.min_y + self.max_y) / 2.0,
        }
    }

    /// Check if this rectangle contains a point (edges included)
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

/// Spatial extent of a unit: its bounds and a representative centroid
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent {
    pub bounds: BoundingBox,
    pub centroid: Point,
}

impl Extent {
    /// Build an extent from explicit bounds and centroid
    pub fn new(bounds: BoundingBox, centroid: Point) -> Self {
        Self { bounds, centroid }
    }

    /// Extent of a single point (bounds collapse onto it)
    pub fn at(centroid: Point) -> Self {
        Self {
            bounds: BoundingBox::new(centroid.x, centroid.y, centroid.x, centroid.y),
            centroid,
        }
    }

    /// Derive the extent of a boundary made of one or more outer rings
    pub fn from_rings(rings: &[Vec<Point>]) -> Option<Self> {
        let bounds = BoundingBox::from_points(rings.iter().flatten())?;
        let centroid = centroid_of_rings(rings).unwrap_or_else(|| bounds.center());
        Some(Self { bounds, centroid })
    }
}

/// Area-weighted centroid of a set of outer rings (shoelace formula)
///
/// Returns `None` when the rings enclose no area.
pub fn centroid_of_rings(rings: &[Vec<Point>]) -> Option<Point> {
    let mut area_sum = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;

    for ring in rings {
        if ring.len() < 3 {
            continue;
        }
        let mut ring_area = 0.0;
        let mut ring_cx = 0.0;
        let mut ring_cy = 0.0;
        for (i, a) in ring.iter().enumerate() {
            let b = ring[(i + 1) % ring.len()];
            let cross = a.x * b.y - b.x * a.y;
            ring_area += cross;
            ring_cx += (a.x + b.x) * cross;
            ring_cy += (a.y + b.y) * cross;
        }
        // Signed area; orientation cancels out in cx/area
        area_sum += ring_area / 2.0;
        cx += ring_cx / 6.0;
        cy += ring_cy / 6.0;
    }

    if area_sum.abs() < f64::EPSILON {
        return None;
    }
    Some(Point {
        x: cx / area_sum,
        y: cy / area_sum,
    })
}
