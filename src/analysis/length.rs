// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use super::CutPoint;
use crate::error::GeometryError;
use crate::geometry::ribbon::Ribbon;
use crate::geometry::Polygon;

/// Centerline length of `path_polygon` between two of its cut points, in µm.
///
/// Walks both boundary rails between the cut points and averages the two
/// walks. Order of `a` and `b` does not matter.
pub fn segment_length(path_polygon: &Polygon, a: &CutPoint, b: &CutPoint) -> Result<f64, GeometryError> {
    let ribbon = Ribbon::from_polygon(path_polygon)?;
    Ok(ribbon.length_between(&a.position, &b.position))
}
