pub use serde_with;

pub mod company;
pub mod establishment;
pub mod municipality;
pub mod osm;
pub mod tags;

pub use establishment::{Coordinates, Establishment, ValidationError};
pub use tags::{map_tags, OsmTags, TagMode};

/// Types that can show an API user what a filled-in instance looks like.
pub trait ExampleData {
    fn example_data() -> Self;
}
