use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;

pub fn is_valid_latitude(lat: f64) -> bool {
    (MIN_LATITUDE..=MAX_LATITUDE).contains(&lat)
}

pub fn is_valid_longitude(lon: f64) -> bool {
    (MIN_LONGITUDE..=MAX_LONGITUDE).contains(&lon)
}

/// An axis aligned rectangle in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    pub const fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }

    /// Point-in-rectangle test. All four edges belong to the box.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        self.south <= lat && lat <= self.north && self.west <= lon && lon <= self.east
    }

    /// Smallest box covering every box of the iterator, `None` if it is empty.
    pub fn enclosing<'a, I>(boxes: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a BoundingBox>,
    {
        boxes.into_iter().fold(None, |acc, bbox| {
            Some(match acc {
                None => *bbox,
                Some(acc) => Self {
                    south: acc.south.min(bbox.south),
                    west: acc.west.min(bbox.west),
                    north: acc.north.max(bbox.north),
                    east: acc.east.max(bbox.east),
                },
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const BOX: BoundingBox = BoundingBox::new(-25.0, -50.0, -24.0, -49.0);

    #[rstest]
    #[case(-25.0, -49.5)]
    #[case(-24.0, -49.5)]
    #[case(-24.5, -50.0)]
    #[case(-24.5, -49.0)]
    #[case(-25.0, -50.0)]
    fn edges_are_inside(#[case] lat: f64, #[case] lon: f64) {
        assert!(BOX.contains(lat, lon));
    }

    #[rstest]
    #[case(-25.0001, -49.5)]
    #[case(-23.9999, -49.5)]
    #[case(-24.5, -50.0001)]
    #[case(-24.5, -48.9999)]
    fn outside_points_are_rejected(#[case] lat: f64, #[case] lon: f64) {
        assert!(!BOX.contains(lat, lon));
    }

    #[test]
    fn enclosing_box_covers_all() {
        let other = BoundingBox::new(-26.0, -49.5, -24.5, -48.0);
        let enclosing = BoundingBox::enclosing([&BOX, &other]).unwrap();
        assert_eq!(enclosing, BoundingBox::new(-26.0, -50.0, -24.0, -48.0));
    }

    #[test]
    fn enclosing_nothing_is_none() {
        assert_eq!(BoundingBox::enclosing(std::iter::empty()), None);
    }

    #[rstest]
    #[case(90.0, true)]
    #[case(-90.0, true)]
    #[case(90.5, false)]
    #[case(-91.0, false)]
    fn latitude_range(#[case] lat: f64, #[case] valid: bool) {
        assert_eq!(is_valid_latitude(lat), valid);
    }

    #[rstest]
    #[case(180.0, true)]
    #[case(-180.0, true)]
    #[case(180.1, false)]
    #[case(-200.0, false)]
    fn longitude_range(#[case] lon: f64, #[case] valid: bool) {
        assert_eq!(is_valid_longitude(lon), valid);
    }
}
