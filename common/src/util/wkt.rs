use geo::{Coord, LineString};

/// Parses `LINESTRING (x y, x y, ...)` as written by GIS exports of segment tables.
/// `LINESTRING EMPTY` and an empty cell both yield an empty line.
pub fn parse_wkt_linestring(raw: &str) -> Option<LineString<f64>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(LineString::new(vec![]));
    }

    let body = raw.strip_prefix("LINESTRING")
        .or_else(|| raw.strip_prefix("linestring"))?
        .trim();
    if body.eq_ignore_ascii_case("EMPTY") {
        return Some(LineString::new(vec![]));
    }

    let body = body.strip_prefix('(')?.strip_suffix(')')?;
    let mut coords = Vec::new();
    for pair in body.split(',') {
        let mut parts = pair.split_whitespace();
        let x = parts.next()?.parse::<f64>().ok()?;
        let y = parts.next()?.parse::<f64>().ok()?;
        // A Z or M ordinate is ignored
        coords.push(Coord { x, y });
    }

    Some(LineString::new(coords))
}

pub fn to_wkt_linestring(line: &LineString<f64>) -> String {
    if line.0.is_empty() {
        return "LINESTRING EMPTY".into();
    }
    let coords = line.coords()
        .map(|c| format!("{} {}", c.x, c.y))
        .collect::<Vec<_>>()
        .join(", ");
    format!("LINESTRING ({})", coords)
}
