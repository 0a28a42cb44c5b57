//! 区域边界几何 - boundary outline builder
//!
//! Converts the ordered point string drawn on the floor map
//! (whitespace-separated `"x,y"` tokens) into directed boundary segments plus
//! the enclosing bounding box. Closed polygons (`graphics_type = 1`) connect
//! the last vertex back to the first; open polylines (`graphics_type = 2`)
//! treat the last vertex as a terminator.
//!
//! Malformed tokens are rejected outright — a mis-drawn boundary must never
//! silently collapse to the origin.

use serde::{Deserialize, Serialize};

/// Line type tag for area boundary segments
pub const LINE_TYPE_BOUNDARY: i32 = 1;

/// 图形类型：闭合多边形或开放折线
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum GraphicsType {
    /// 闭合多边形 (graphics_type = 1)
    Polygon = 1,
    /// 开放折线 (graphics_type = 2)，末点为终止点，不回连
    Polyline = 2,
}

impl TryFrom<i32> for GraphicsType {
    type Error = GeometryError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(GraphicsType::Polygon),
            2 => Ok(GraphicsType::Polyline),
            other => Err(GeometryError::UnknownGraphicsType(other)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    #[error("Malformed coordinate token: {0}")]
    MalformedPoint(String),

    #[error("Unknown graphics type: {0}")]
    UnknownGraphicsType(i32),
}

impl From<GeometryError> for crate::utils::AppError {
    fn from(err: GeometryError) -> Self {
        crate::utils::AppError::Validation(err.to_string())
    }
}

/// One directed boundary segment, 1-based `poly_index` order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentSpec {
    pub poly_index: i32,
    pub sx: i64,
    pub sy: i64,
    pub tx: i64,
    pub ty: i64,
}

/// Bounding box derived from the segment scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub start_x: i64,
    pub start_y: i64,
    pub end_x: i64,
    pub end_y: i64,
}

/// Built outline: segments plus the derived bounding box.
///
/// `bounds` is `None` when the input held no usable geometry — callers must
/// leave any previously stored bounding box untouched in that case.
#[derive(Debug, Clone, Default)]
pub struct Outline {
    pub segments: Vec<SegmentSpec>,
    pub bounds: Option<Bounds>,
}

/// Parse one `"x,y"` token
fn parse_point(token: &str) -> Result<(i64, i64), GeometryError> {
    let mut parts = token.split(',');
    let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(GeometryError::MalformedPoint(token.to_string()));
    };
    let x = x
        .trim()
        .parse::<i64>()
        .map_err(|_| GeometryError::MalformedPoint(token.to_string()))?;
    let y = y
        .trim()
        .parse::<i64>()
        .map_err(|_| GeometryError::MalformedPoint(token.to_string()))?;
    Ok((x, y))
}

/// Parse a whitespace-separated `"x,y"` point list
pub fn parse_points(points_str: &str) -> Result<Vec<(i64, i64)>, GeometryError> {
    points_str.split_whitespace().map(parse_point).collect()
}

/// Build the boundary outline for an area.
///
/// Effective segment count is N for a closed polygon and N-1 for an open
/// polyline of N vertices. Segment `i` runs vertex `i` -> vertex `i+1`; the
/// closing segment of a polygon wraps back to vertex 0. The bounding box is
/// the per-coordinate minimum over segment starts and maximum over segment
/// ends.
pub fn build_outline(points_str: &str, graphics: GraphicsType) -> Result<Outline, GeometryError> {
    let vertices = parse_points(points_str)?;
    let count = match graphics {
        GraphicsType::Polygon => vertices.len(),
        GraphicsType::Polyline => vertices.len().saturating_sub(1),
    };
    if count == 0 {
        return Ok(Outline::default());
    }

    let mut segments = Vec::with_capacity(count);
    let (mut start_x, mut start_y) = (i64::MAX, i64::MAX);
    let (mut end_x, mut end_y) = (i64::MIN, i64::MIN);
    for i in 0..count {
        let (sx, sy) = vertices[i];
        let (tx, ty) = if i + 1 < vertices.len() {
            vertices[i + 1]
        } else {
            vertices[0]
        };
        start_x = start_x.min(sx);
        start_y = start_y.min(sy);
        end_x = end_x.max(tx);
        end_y = end_y.max(ty);
        segments.push(SegmentSpec {
            poly_index: (i + 1) as i32,
            sx,
            sy,
            tx,
            ty,
        });
    }

    Ok(Outline {
        segments,
        bounds: Some(Bounds {
            start_x,
            start_y,
            end_x,
            end_y,
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_polygon_forms_a_cycle() {
        let outline = build_outline("0,0 10,0 10,10 0,10", GraphicsType::Polygon).unwrap();
        assert_eq!(outline.segments.len(), 4);
        // each vertex appears exactly once as a start, the walk returns home
        for (i, seg) in outline.segments.iter().enumerate() {
            assert_eq!(seg.poly_index, (i + 1) as i32);
            let next = &outline.segments[(i + 1) % 4];
            assert_eq!((seg.tx, seg.ty), (next.sx, next.sy));
        }
        let bounds = outline.bounds.unwrap();
        assert_eq!((bounds.start_x, bounds.start_y), (0, 0));
        assert_eq!((bounds.end_x, bounds.end_y), (10, 10));
    }

    #[test]
    fn open_polyline_forms_a_simple_path() {
        let outline = build_outline("0,0 5,0 5,5 9,5", GraphicsType::Polyline).unwrap();
        assert_eq!(outline.segments.len(), 3);
        let last = outline.segments.last().unwrap();
        assert_eq!((last.tx, last.ty), (9, 5));
        for pair in outline.segments.windows(2) {
            assert_eq!((pair[0].tx, pair[0].ty), (pair[1].sx, pair[1].sy));
        }
    }

    #[test]
    fn blank_input_yields_no_geometry() {
        let outline = build_outline("   ", GraphicsType::Polygon).unwrap();
        assert!(outline.segments.is_empty());
        assert!(outline.bounds.is_none());
    }

    #[test]
    fn single_point_polyline_yields_no_geometry() {
        let outline = build_outline("3,4", GraphicsType::Polyline).unwrap();
        assert!(outline.segments.is_empty());
        assert!(outline.bounds.is_none());
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        assert!(build_outline("0,0 10", GraphicsType::Polygon).is_err());
        assert!(build_outline("0,0 a,b", GraphicsType::Polygon).is_err());
        assert!(build_outline("0,0,0 1,1", GraphicsType::Polygon).is_err());
        assert!(parse_points("1,2 3,x").is_err());
    }

    #[test]
    fn negative_coordinates_are_valid() {
        let outline = build_outline("-5,-5 5,-5 5,5 -5,5", GraphicsType::Polygon).unwrap();
        let bounds = outline.bounds.unwrap();
        assert_eq!((bounds.start_x, bounds.start_y), (-5, -5));
        assert_eq!((bounds.end_x, bounds.end_y), (5, 5));
    }
}
