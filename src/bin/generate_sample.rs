//! Writes a deterministic sample tracking sheet (`ai_use_cases.csv` and
//! `ai_use_cases.json`) for demos and manual testing, then loads it back
//! through the library and prints the headline KPIs.

use casetrack::{Column, Dashboard};
use serde_json::json;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

const BUSINESS_UNITS: [&str; 5] = ["Sales", "Marketing", "Finance", "IT", "Operations"];
const STATUSES: [&str; 5] = [
    "Ideation",
    "Prioritization",
    "Development",
    "Pilot",
    "Deployed",
];
const RYG: [&str; 3] = ["Red", "Yellow", "Green"];
const CHAMPIONS: [&str; 6] = [
    "Dana Whitfield",
    "Lee Okafor",
    "Priya Raman",
    "Marcus Steiner",
    "Aiko Tanaka",
    "Sofia Marques",
];
const TOPICS: [&str; 10] = [
    "Churn prediction",
    "Invoice triage",
    "Demand forecasting",
    "Ticket routing",
    "Contract review",
    "Lead scoring",
    "Campaign copy drafting",
    "Inventory optimization",
    "Fraud screening",
    "Meeting summarization",
];

struct SampleRow {
    name: String,
    business_unit: String,
    champion: String,
    status: String,
    ryg: String,
    expected: f64,
    /// Realized value, or a placeholder the loader must coerce to missing.
    actual: Option<f64>,
}

fn generate_rows(rng: &mut SimpleRng, n: usize) -> Vec<SampleRow> {
    (0..n)
        .map(|i| {
            let status = rng.pick(&STATUSES);
            let expected = (rng.next_f64() * 45.0 + 5.0).round() * 10_000.0;
            // Only piloted or deployed cases have realized anything yet.
            let actual = match status {
                "Deployed" => Some((expected * (0.4 + 0.6 * rng.next_f64())).round()),
                "Pilot" => Some((expected * 0.2 * rng.next_f64()).round()),
                _ => None,
            };
            SampleRow {
                name: format!("{} #{:02}", rng.pick(&TOPICS), i + 1),
                business_unit: rng.pick(&BUSINESS_UNITS).to_string(),
                champion: rng.pick(&CHAMPIONS).to_string(),
                status: status.to_string(),
                ryg: rng.pick(&RYG).to_string(),
                expected,
                actual,
            }
        })
        .collect()
}

fn write_csv(path: &str, rows: &[SampleRow]) {
    let mut writer = csv::Writer::from_path(path).expect("create CSV output");
    writer
        .write_record(Column::ALL.map(Column::header))
        .expect("write CSV header");
    for row in rows {
        let expected = format!("{:.0}", row.expected);
        let actual = row
            .actual
            .map(|v| format!("{v:.0}"))
            .unwrap_or_else(|| "N/A".to_string());
        writer
            .write_record([
                row.name.as_str(),
                row.business_unit.as_str(),
                row.champion.as_str(),
                row.status.as_str(),
                row.ryg.as_str(),
                expected.as_str(),
                actual.as_str(),
            ])
            .expect("write CSV row");
    }
    writer.flush().expect("flush CSV output");
}

fn write_json(path: &str, rows: &[SampleRow]) {
    let records: Vec<serde_json::Value> = rows
        .iter()
        .map(|row| {
            json!({
                (Column::Name.header()): row.name,
                (Column::BusinessUnit.header()): row.business_unit,
                (Column::Champion.header()): row.champion,
                (Column::Status.header()): row.status,
                (Column::Ryg.header()): row.ryg,
                (Column::ExpectedValue.header()): row.expected,
                (Column::ActualValue.header()): row.actual,
            })
        })
        .collect();
    let text = serde_json::to_string_pretty(&records).expect("serialize sample records");
    std::fs::write(path, text).expect("write JSON output");
}

fn main() {
    env_logger::init();

    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng, 40);

    let csv_path = "ai_use_cases.csv";
    let json_path = "ai_use_cases.json";
    write_csv(csv_path, &rows);
    write_json(json_path, &rows);

    // Round-trip through the library as a sanity pass.
    let mut dashboard = Dashboard::new(csv_path);
    dashboard.load().expect("sample sheet loads");
    let model = dashboard.render_model();

    println!(
        "Wrote {} use cases to {csv_path} and {json_path} (expected value {}, realized {})",
        model.kpis.count,
        model.kpis.expected_value_display(),
        model.kpis.actual_value_display(),
    );
}
