use std::{fs, io, path::PathBuf};

use chrono::Local;
use indexmap::IndexMap;
use model::{
    municipality::{self, MUNICIPALITIES},
    osm::ElementType,
    tags, OsmTags,
};
use overpass::Element;
use serde::{Deserialize, Serialize};

pub mod counters;
pub mod html;

pub const UNNAMED: &str = "Sem nome";

/// One classified establishment as written to the JSON dump.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: u64,
    #[serde(rename = "type")]
    pub element_type: ElementType,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub lightning: bool,
    pub onchain: bool,
    pub tags: OsmTags,
}

impl Entry {
    fn from_element(element: Element, lat: f64, lon: f64) -> Self {
        Self {
            id: element.id,
            element_type: element.element_type,
            name: element.tags.get(tags::NAME).unwrap_or(UNNAMED).to_owned(),
            lat,
            lon,
            lightning: element.tags.is_yes(tags::PAYMENT_LIGHTNING),
            onchain: element.tags.is_yes(tags::PAYMENT_ONCHAIN),
            tags: element.tags,
        }
    }
}

/// Establishments bucketed by municipality, buckets in order of first use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Classification(IndexMap<String, Vec<Entry>>);

impl Classification {
    pub fn classify<I: IntoIterator<Item = Element>>(elements: I) -> Self {
        let mut classification = Self::default();
        for element in elements {
            let Some((lat, lon)) = element.position() else {
                log::warn!("Skipping {} without coordinates.", element.osm_id());
                continue;
            };
            let city = element.tags.get(tags::ADDRESS_CITY);
            let bucket = municipality::classify(city, lat, lon);
            classification
                .0
                .entry(bucket.to_owned())
                .or_default()
                .push(Entry::from_element(element, lat, lon));
        }
        classification
    }

    pub fn get(&self, bucket: &str) -> &[Entry] {
        self.0.get(bucket).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn count(&self, bucket: &str) -> usize {
        self.get(bucket).len()
    }

    pub fn total(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn total_lightning(&self) -> usize {
        self.entries().filter(|entry| entry.lightning).count()
    }

    pub fn total_onchain(&self) -> usize {
        self.entries().filter(|entry| entry.onchain).count()
    }

    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.0.values().flatten()
    }

    /// Buckets sorted by name.
    pub fn buckets(&self) -> impl Iterator<Item = (&str, &[Entry])> {
        let mut buckets = self
            .0
            .iter()
            .map(|(name, entries)| (name.as_str(), entries.as_slice()))
            .collect::<Vec<_>>();
        buckets.sort_by(|a, b| a.0.cmp(b.0));
        buckets.into_iter()
    }

    /// Counts for the known municipalities (in table order, zero included)
    /// followed by every other bucket.
    pub fn summary(&self) -> Vec<(&str, usize)> {
        let mut summary = MUNICIPALITIES
            .iter()
            .map(|municipality| (municipality.name, self.count(municipality.name)))
            .collect::<Vec<_>>();
        let others = self
            .0
            .iter()
            .filter(|(name, _)| !summary.iter().any(|(known, _)| *known == name.as_str()))
            .map(|(name, entries)| (name.as_str(), entries.len()))
            .collect::<Vec<_>>();
        summary.extend(others);
        summary
    }
}

/// Output files of one report run.
#[derive(Debug, Clone)]
pub struct Outputs {
    pub html: PathBuf,
    pub json: PathBuf,
    pub counters: Option<PathBuf>,
}

impl Outputs {
    pub fn write(&self, classification: &Classification) -> io::Result<()> {
        fs::write(&self.html, html::render(classification, &Local::now()))?;
        log::info!("Wrote HTML report to '{}'.", self.html.display());

        fs::write(&self.json, serde_json::to_string_pretty(classification)?)?;
        log::info!("Wrote JSON data to '{}'.", self.json.display());

        if let Some(path) = &self.counters {
            fs::write(path, counters::render(&counters::Counters::new(classification))?)?;
            log::info!("Wrote counters script to '{}'.", path.display());
        }
        Ok(())
    }
}
