use utility::geo::BoundingBox;

/// Bucket for everything outside the municipalities of interest.
pub const OTHERS: &str = "Outros";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Municipality {
    pub name: &'static str,
    pub bbox: BoundingBox,
    /// Lower-case fragments an `addr:city` value may contain.
    pub city_fragments: &'static [&'static str],
}

/// Municipalities covered by the directory. Order matters: boxes overlap
/// and the first match wins.
pub static MUNICIPALITIES: [Municipality; 3] = [
    Municipality {
        name: "Ponta Grossa",
        bbox: BoundingBox::new(-25.2945, -50.3633, -24.8945, -49.9633),
        city_fragments: &["ponta grossa"],
    },
    Municipality {
        name: "Carambeí",
        bbox: BoundingBox::new(-25.0421, -50.1995, -24.8421, -49.9995),
        city_fragments: &["carambe"],
    },
    Municipality {
        name: "Telêmaco Borba",
        bbox: BoundingBox::new(-24.4245, -50.7176, -24.2245, -50.5176),
        city_fragments: &["telemaco", "telêmaco", "borba"],
    },
];

/// Box enclosing every municipality.
pub fn coverage() -> BoundingBox {
    BoundingBox::enclosing(MUNICIPALITIES.iter().map(|municipality| &municipality.bbox))
        .unwrap_or(MUNICIPALITIES[0].bbox)
}

pub fn by_city(city: &str) -> Option<&'static Municipality> {
    let city = city.to_lowercase();
    MUNICIPALITIES.iter().find(|municipality| {
        municipality
            .city_fragments
            .iter()
            .any(|fragment| city.contains(fragment))
    })
}

pub fn by_point(lat: f64, lon: f64) -> Option<&'static Municipality> {
    MUNICIPALITIES
        .iter()
        .find(|municipality| municipality.bbox.contains(lat, lon))
}

/// Name of the bucket a point belongs to: the city from its address if that
/// names a known municipality, else the first box containing the point, else
/// [`OTHERS`].
pub fn classify(city: Option<&str>, lat: f64, lon: f64) -> &'static str {
    city.filter(|city| !city.is_empty())
        .and_then(by_city)
        .or_else(|| by_point(lat, lon))
        .map(|municipality| municipality.name)
        .unwrap_or(OTHERS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Ponta Grossa", "Ponta Grossa")]
    #[case("PONTA GROSSA - PR", "Ponta Grossa")]
    #[case("Carambeí", "Carambeí")]
    #[case("carambei", "Carambeí")]
    #[case("Telêmaco Borba", "Telêmaco Borba")]
    #[case("TELEMACO", "Telêmaco Borba")]
    #[case("Borba", "Telêmaco Borba")]
    fn address_wins_over_coordinates(#[case] city: &str, #[case] expected: &str) {
        // the point lies in none of the boxes
        assert_eq!(classify(Some(city), 0.0, 0.0), expected);
    }

    #[test]
    fn unknown_city_falls_back_to_boxes() {
        assert_eq!(classify(Some("Curitiba"), -24.3245, -50.6176), "Telêmaco Borba");
        assert_eq!(classify(Some("Curitiba"), 0.0, 0.0), OTHERS);
    }

    #[test]
    fn empty_city_is_ignored() {
        assert_eq!(classify(Some(""), -24.3245, -50.6176), "Telêmaco Borba");
    }

    #[test]
    fn overlapping_boxes_prefer_table_order() {
        // inside both Ponta Grossa and Carambeí
        assert_eq!(classify(None, -24.9421, -50.0995), "Ponta Grossa");
    }

    #[rstest]
    #[case(-24.4245, -50.6)]
    #[case(-24.2245, -50.6)]
    #[case(-24.3, -50.7176)]
    #[case(-24.3, -50.5176)]
    fn box_edges_are_inside(#[case] lat: f64, #[case] lon: f64) {
        assert_eq!(classify(None, lat, lon), "Telêmaco Borba");
    }

    #[test]
    fn coverage_encloses_all_municipalities() {
        let coverage = coverage();
        assert_eq!(
            coverage,
            BoundingBox::new(-25.2945, -50.7176, -24.2245, -49.9633)
        );
        for municipality in &MUNICIPALITIES {
            let bbox = municipality.bbox;
            assert!(coverage.contains(bbox.south, bbox.west));
            assert!(coverage.contains(bbox.north, bbox.east));
        }
    }
}
