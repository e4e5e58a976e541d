use indexmap::IndexMap;
use model::municipality::MUNICIPALITIES;
use serde::Serialize;

use crate::Classification;

/// Estimated monthly transactions per establishment.
pub const TRANSACTIONS_PER_ESTABLISHMENT: usize = 12;

// Growth figures are demo values, not derived from historical data.
const OVERALL_GROWTH: &str = "+8%";
const MUNICIPALITY_GROWTH: [(&str, &str); 3] = [
    ("Ponta Grossa", "+5%"),
    ("Carambeí", "+15%"),
    ("Telêmaco Borba", "+10%"),
];
const NO_GROWTH: &str = "0%";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MunicipalityCounter {
    pub total: usize,
    #[serde(rename = "crescimento")]
    pub growth: &'static str,
}

/// Data object consumed by the landing page counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Counters {
    pub total: usize,
    #[serde(rename = "transacoes")]
    pub transactions: usize,
    #[serde(rename = "crescimento")]
    pub growth: &'static str,
    #[serde(rename = "municipios")]
    pub municipalities: IndexMap<&'static str, MunicipalityCounter>,
}

fn growth(total: usize, placeholder: &'static str) -> &'static str {
    if total > 0 {
        placeholder
    } else {
        NO_GROWTH
    }
}

impl Counters {
    pub fn new(classification: &Classification) -> Self {
        let total = classification.total();
        let municipalities = MUNICIPALITIES
            .iter()
            .map(|municipality| {
                let total = classification.count(municipality.name);
                let placeholder = MUNICIPALITY_GROWTH
                    .iter()
                    .find(|(name, _)| *name == municipality.name)
                    .map(|(_, growth)| *growth)
                    .unwrap_or(NO_GROWTH);
                (
                    municipality.name,
                    MunicipalityCounter {
                        total,
                        growth: growth(total, placeholder),
                    },
                )
            })
            .collect();

        Self {
            total,
            transactions: total * TRANSACTIONS_PER_ESTABLISHMENT,
            growth: growth(total, OVERALL_GROWTH),
            municipalities,
        }
    }
}

const SCRIPT: &str = r#"
    const setTarget = (element, target, text) => {
        if (element) {
            element.setAttribute('data-target', target);
            element.textContent = text;
        }
    };
    setTarget(document.querySelector('.counter[data-target="37"]'), data.total, '0');
    setTarget(document.querySelector('.counter[data-target="215"]'), data.transacoes, '0');
    setTarget(document.querySelector('.counter[data-target="+0%"]'), data.crescimento, '0%');

    const bars = document.querySelectorAll('.chart-bar');
    const values = document.querySelectorAll('.chart-value');
    const maxHeight = 180;
    const totals = Object.values(data.municipios).map((municipio) => municipio.total);
    const maxValue = Math.max(...totals, 1);
    totals.forEach((total, index) => {
        if (bars[index] && values[index]) {
            const height = total > 0 ? Math.max(30, (total / maxValue) * maxHeight) : 0;
            bars[index].setAttribute('data-height', height);
            setTarget(values[index], total, '0');
        }
    });

    animateCounters();
});
"#;

/// Renders the landing page snippet that overwrites the counter placeholders.
pub fn render(counters: &Counters) -> serde_json::Result<String> {
    let data = serde_json::to_string_pretty(counters)?;
    Ok(format!(
        "// Generated by the report job from OpenStreetMap data.\ndocument.addEventListener('DOMContentLoaded', function() {{\n    const data = {data};\n{SCRIPT}"
    ))
}
