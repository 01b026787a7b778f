//! End-to-end: source -> dataset -> summary -> verdict.

use wq_core::{
    dataset::{parse_raw_records, Dataset},
    ingest::ingest,
    parameter::Parameter,
    reading::NumericPolicy,
    source::StaticSampleSource,
    threshold::ThresholdTable,
};
use wq_data::{
    report::Report,
    statistics::summarize,
    status::{classify, Verdict},
};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[tokio::test]
async fn sample_summary_and_verdict() {
    let ingestion = ingest(&StaticSampleSource, NumericPolicy::Lenient)
        .await
        .unwrap();
    let ph = summarize(&ingestion.dataset, Parameter::Ph);
    assert!(close(ph.min, 7.1));
    assert!(close(ph.max, 7.5));
    assert!(close(ph.mean, 7.3));
    assert_eq!(classify("pH", 7.3), Verdict::Good);

    let report = Report::build(&ingestion.dataset, ThresholdTable::sans_241());
    assert!(!report.has_warnings());
    assert_eq!(report.get("pH").unwrap().verdict, Verdict::Good);
}

#[test]
fn non_numeric_ph_becomes_zero() {
    let text = "timestamp,pH,turbidity_NTU,free_chlorine_mg_L,tds_mg_L,nitrate_mg_L\n2023-01-01,abc,0.5,0.3,300,5.0\n";
    let dataset = Dataset::from_csv(text, NumericPolicy::Lenient).unwrap();
    assert_eq!(dataset.len(), 1);
    assert_eq!(dataset.readings()[0].value(Parameter::Ph), 0.0);

    let strict = Dataset::from_csv(text, NumericPolicy::Strict).unwrap();
    assert!(strict.is_empty());
}

#[test]
fn quoted_and_padded_input() {
    let text = "\"timestamp\",\"pH\",\"turbidity_NTU\",\"free_chlorine_mg_L\",\"tds_mg_L\",\"nitrate_mg_L\"
\"2023-01-01 00:00:00\", 7.2 ,\"0.5\",0.3 , 300,5.0
";
    let records = parse_raw_records(text).unwrap();
    let dataset = Dataset::build(&records, NumericPolicy::Strict);
    assert_eq!(dataset.len(), 1);
    assert_eq!(dataset.readings()[0].value(Parameter::Turbidity), 0.5);
}

#[test]
fn mean_between_min_and_max() {
    let text = "timestamp,pH,turbidity_NTU,free_chlorine_mg_L,tds_mg_L,nitrate_mg_L
2025-06-01 00:00:00,7.51,0.81,0.49,512.3,2.07
2025-06-01 00:30:00,7.12,0.66,0.52,498.9,1.94
2025-06-01 01:00:00,9.80,70.0,0.05,2800,13.0
2025-06-01 01:30:00,4.50,0.1,0.0,50,0.0
";
    let dataset = Dataset::from_csv(text, NumericPolicy::Lenient).unwrap();
    for parameter in Parameter::ALL {
        let s = summarize(&dataset, parameter);
        assert!(s.min <= s.mean && s.mean <= s.max, "{parameter}: {s:?}");
    }
}
