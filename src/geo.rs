use crate::state::Destination;

/// Where the map looks when there is nothing to show.
pub const DEFAULT_POSITION: (f64, f64) = (51.505, -0.09);

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    pub title: String,
    pub region: String,
    pub href: String,
}

fn parse_coordinate(raw: Option<&str>) -> Option<f64> {
    raw?.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

impl Marker {
    pub fn from_destination(destination: &Destination) -> Option<Self> {
        let lat = parse_coordinate(destination.latitude.as_deref())?;
        let lon = parse_coordinate(destination.longitude.as_deref())?;
        Some(Self {
            id: destination.id.clone(),
            lat,
            lon,
            title: format!("{}, {}", destination.city, destination.country),
            region: destination.region.clone(),
            href: destination.href(),
        })
    }

    /// Hover text of the pin.
    pub fn tooltip(&self) -> String {
        format!("{} · Region: {}", self.title, self.region)
    }
}

/// Destinations without usable coordinates are left off the map.
pub fn markers(destinations: &[Destination]) -> Vec<Marker> {
    destinations
        .iter()
        .filter_map(Marker::from_destination)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    pub const WORLD: Bounds = Bounds {
        south: -85.0,
        west: -180.0,
        north: 85.0,
        east: 180.0,
    };

    pub fn of(markers: &[Marker]) -> Option<Self> {
        let first = markers.first()?;
        let mut bounds = Bounds {
            south: first.lat,
            west: first.lon,
            north: first.lat,
            east: first.lon,
        };
        for marker in &markers[1..] {
            bounds.south = bounds.south.min(marker.lat);
            bounds.north = bounds.north.max(marker.lat);
            bounds.west = bounds.west.min(marker.lon);
            bounds.east = bounds.east.max(marker.lon);
        }
        Some(bounds)
    }

    /// Whole world, recentred on `center`.
    fn around((lat, lon): (f64, f64)) -> Self {
        let half_lat = (Self::WORLD.north - Self::WORLD.south) / 2.0;
        let half_lon = (Self::WORLD.east - Self::WORLD.west) / 2.0;
        Bounds {
            south: lat - half_lat,
            west: lon - half_lon,
            north: lat + half_lat,
            east: lon + half_lon,
        }
    }
}

/// Equirectangular projection of a bounding box onto a `width` x `height`
/// canvas, keeping `padding` pixels free on every side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    bounds: Bounds,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

/// Smallest span a fitted view covers, so a single marker doesn't zoom in
/// to a point.
const MIN_SPAN: f64 = 2.0;

impl Viewport {
    pub fn fit(markers: &[Marker], width: f64, height: f64, padding: f64) -> Self {
        let bounds = Bounds::of(markers).unwrap_or_else(|| Bounds::around(DEFAULT_POSITION));
        let bounds = widen(bounds);
        let usable_w = (width - 2.0 * padding).max(1.0);
        let usable_h = (height - 2.0 * padding).max(1.0);
        let span_lon = bounds.east - bounds.west;
        let span_lat = bounds.north - bounds.south;
        let scale = (usable_w / span_lon).min(usable_h / span_lat);
        let offset_x = (width - span_lon * scale) / 2.0;
        let offset_y = (height - span_lat * scale) / 2.0;
        Self {
            width,
            height,
            bounds,
            scale,
            offset_x,
            offset_y,
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn project(&self, lat: f64, lon: f64) -> (f64, f64) {
        let x = self.offset_x + (lon - self.bounds.west) * self.scale;
        let y = self.offset_y + (self.bounds.north - lat) * self.scale;
        (x, y)
    }
}

fn widen(bounds: Bounds) -> Bounds {
    let mut bounds = bounds;
    if bounds.north - bounds.south < MIN_SPAN {
        let mid = (bounds.north + bounds.south) / 2.0;
        bounds.south = mid - MIN_SPAN / 2.0;
        bounds.north = mid + MIN_SPAN / 2.0;
    }
    if bounds.east - bounds.west < MIN_SPAN {
        let mid = (bounds.east + bounds.west) / 2.0;
        bounds.west = mid - MIN_SPAN / 2.0;
        bounds.east = mid + MIN_SPAN / 2.0;
    }
    bounds
}

#[cfg(test)]
mod tests {
    use super::*;

    fn destination(id: &str, lat: Option<&str>, lon: Option<&str>) -> Destination {
        Destination {
            id: id.into(),
            city: format!("City {id}"),
            country: "Somewhere".into(),
            latitude: lat.map(Into::into),
            longitude: lon.map(Into::into),
            ..Default::default()
        }
    }

    #[test]
    fn skips_unparsable_coordinates() {
        let destinations = vec![
            destination("a", Some("48.85"), Some("2.35")),
            destination("b", Some("north"), Some("2.0")),
            destination("c", None, Some("10")),
            destination("d", Some("NaN"), Some("1")),
            destination("e", Some(" -33.86 "), Some("151.2")),
        ];
        let markers = markers(&destinations);
        let ids: Vec<_> = markers.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "e"]);
        assert_eq!(markers[1].lat, -33.86);
        assert_eq!(markers[0].title, "City a, Somewhere");
        assert_eq!(markers[0].href, "/destinations/a");
    }

    #[test]
    fn tooltip_names_city_country_and_region() {
        let mut lisbon = destination("l", Some("38.72"), Some("-9.14"));
        lisbon.city = "Lisbon".into();
        lisbon.country = "Portugal".into();
        lisbon.region = "europe".into();
        let marker = Marker::from_destination(&lisbon).unwrap();
        assert_eq!(marker.tooltip(), "Lisbon, Portugal · Region: europe");
    }

    #[test]
    fn bounds_cover_every_marker() {
        let markers = markers(&[
            destination("a", Some("10"), Some("-20")),
            destination("b", Some("-5"), Some("30")),
            destination("c", Some("40"), Some("0")),
        ]);
        assert_eq!(
            Bounds::of(&markers),
            Some(Bounds {
                south: -5.0,
                west: -20.0,
                north: 40.0,
                east: 30.0
            })
        );
        assert_eq!(Bounds::of(&[]), None);
    }

    #[test]
    fn fitted_markers_stay_inside_padding() {
        let markers = markers(&[
            destination("a", Some("10"), Some("-20")),
            destination("b", Some("-5"), Some("30")),
        ]);
        let viewport = Viewport::fit(&markers, 800.0, 400.0, 50.0);
        for marker in &markers {
            let (x, y) = viewport.project(marker.lat, marker.lon);
            assert!((50.0..=750.0).contains(&x), "x = {x}");
            assert!((50.0..=350.0).contains(&y), "y = {y}");
        }
        let (west, _) = viewport.project(0.0, -20.0);
        let (east, _) = viewport.project(0.0, 30.0);
        assert!(west < east);
        let (_, north) = viewport.project(10.0, 0.0);
        let (_, south) = viewport.project(-5.0, 0.0);
        assert!(north < south);
    }

    #[test]
    fn empty_map_shows_the_world() {
        let viewport = Viewport::fit(&[], 800.0, 400.0, 0.0);
        let bounds = viewport.bounds();
        assert!((bounds.north - bounds.south - 170.0).abs() < 1e-9);
        assert!((bounds.east - bounds.west - 360.0).abs() < 1e-9);
        let (x, y) = viewport.project(DEFAULT_POSITION.0, DEFAULT_POSITION.1);
        assert!((x - 400.0).abs() < 1e-6);
        assert!((y - 200.0).abs() < 1e-6);
    }

    #[test]
    fn single_marker_is_centred() {
        let markers = markers(&[destination("a", Some("35"), Some("139"))]);
        let viewport = Viewport::fit(&markers, 600.0, 600.0, 50.0);
        let (x, y) = viewport.project(35.0, 139.0);
        assert!((x - 300.0).abs() < 1e-6);
        assert!((y - 300.0).abs() < 1e-6);
    }
}
