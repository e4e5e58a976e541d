use chrono::{DateTime, TimeZone};
use itertools::Itertools;

use crate::{Classification, Entry};

const STYLE: &str = r#"
        body { font-family: Arial, sans-serif; line-height: 1.6; margin: 0; padding: 20px; color: #333; }
        h1, h2, h3 { color: #f7931a; }
        table { border-collapse: collapse; width: 100%; margin-bottom: 20px; }
        th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }
        th { background-color: #f7931a; color: white; }
        tr:nth-child(even) { background-color: #f2f2f2; }
        .summary { background-color: #fff9e6; border-left: 4px solid #f7931a; padding: 15px; margin-bottom: 20px; }
        .timestamp { color: #666; font-style: italic; margin-top: 30px; }
"#;

pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Escapes text for use inside HTML element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn check(flag: bool) -> &'static str {
    if flag {
        "✓"
    } else {
        "✗"
    }
}

fn count_row(cell: &str, label: &str, entries: &[Entry]) -> String {
    let lightning = entries.iter().filter(|entry| entry.lightning).count();
    let onchain = entries.iter().filter(|entry| entry.onchain).count();
    format!(
        "      <tr><{cell}>{}</{cell}><{cell}>{}</{cell}><{cell}>{lightning}</{cell}><{cell}>{onchain}</{cell}></tr>\n",
        escape(label),
        entries.len(),
    )
}

fn detail_table(bucket: &str, entries: &[Entry]) -> String {
    let mut html = format!(
        "    <h2>Detalhes: {}</h2>\n    <table>\n      <tr><th>Nome</th><th>ID OSM</th><th>Tipo</th><th>Lightning</th><th>On-chain</th><th>Coordenadas</th></tr>\n",
        escape(bucket)
    );
    for entry in entries.iter().sorted_by(|a, b| a.name.cmp(&b.name)) {
        html.push_str(&format!(
            "      <tr><td>{}</td><td>{}/{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.6}, {:.6}</td></tr>\n",
            escape(&entry.name),
            entry.element_type,
            entry.id,
            entry.element_type,
            check(entry.lightning),
            check(entry.onchain),
            entry.lat,
            entry.lon,
        ));
    }
    html.push_str("    </table>\n");
    html
}

/// Renders the standalone HTML report.
pub fn render<Tz>(classification: &Classification, generated_at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let total = classification.total();
    let lightning = classification.total_lightning();
    let onchain = classification.total_onchain();

    let mut html = format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
  <head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Análise de Estabelecimentos Bitcoin</title>
    <style>{STYLE}    </style>
  </head>
  <body>
    <h1>Análise de Estabelecimentos que Aceitam Bitcoin</h1>
    <div class="summary">
      <h2>Resumo</h2>
      <p><strong>Total de estabelecimentos:</strong> {total}</p>
      <p><strong>Aceitam Lightning Network:</strong> {lightning}</p>
      <p><strong>Aceitam Bitcoin On-chain:</strong> {onchain}</p>
    </div>
    <h2>Distribuição por Município</h2>
    <table>
      <tr><th>Município</th><th>Total</th><th>Lightning</th><th>On-chain</th></tr>
"#
    );

    for (bucket, entries) in classification.buckets() {
        html.push_str(&count_row("td", bucket, entries));
    }
    html.push_str(&format!(
        "      <tr><th>Total</th><th>{total}</th><th>{lightning}</th><th>{onchain}</th></tr>\n    </table>\n"
    ));

    for (bucket, entries) in classification.buckets().filter(|(_, entries)| !entries.is_empty()) {
        html.push_str(&detail_table(bucket, entries));
    }

    html.push_str(&format!(
        "    <p class=\"timestamp\">Relatório gerado em: {}</p>\n  </body>\n</html>\n",
        generated_at.format(TIMESTAMP_FORMAT)
    ));
    html
}
