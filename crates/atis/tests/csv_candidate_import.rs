use atis::planning::{
    CandidateItinerarySource, CsvItineraryImporter, CsvItinerarySource, IssueKind, Leg,
    TransportMode, TripRequest,
};

const EXPORT: &str = "id,duration_min,transfers,walk_km,stairs,modes,reliability\n\
A,22,0,0.4,no,bus|walk,0.84\n\
B,28,1,0.9,no,bus+train,0.80\n\
C,24,1,1.1,yes,walk|train,\n\
,31,,0.2,,ferry,0.9\n";

#[test]
fn importer_builds_candidates_with_labelled_legs() {
    let import = CsvItineraryImporter::from_reader(EXPORT.as_bytes()).expect("import succeeds");

    assert_eq!(import.candidates.len(), 4);

    let b = &import.candidates[1];
    assert_eq!(b.id, "B");
    assert_eq!(b.transfers, 1);
    assert_eq!(b.modes, vec![TransportMode::Bus, TransportMode::Train]);
    assert_eq!(
        b.legs,
        vec![Leg::Label("bus".to_string()), Leg::Label("train".to_string())]
    );

    let c = &import.candidates[2];
    assert!(c.stairs);
    assert_eq!(c.reliability, 0.8);
}

#[test]
fn importer_reports_defaulted_fields() {
    let import = CsvItineraryImporter::from_reader(EXPORT.as_bytes()).expect("import succeeds");

    let unnamed = &import.candidates[3];
    assert_eq!(unnamed.id, "Option_4");
    assert_eq!(unnamed.transfers, 0);
    assert!(!unnamed.stairs);

    let defaulted: Vec<(&str, &str)> = import
        .issues
        .iter()
        .filter(|issue| issue.kind == IssueKind::Defaulted)
        .map(|issue| (issue.candidate_id.as_str(), issue.field))
        .collect();
    assert!(defaulted.contains(&("C", "reliability")));
    assert!(defaulted.contains(&("Option_4", "id")));
    assert!(defaulted.contains(&("Option_4", "transfers")));
}

#[test]
fn importer_rejects_malformed_numbers() {
    let csv = "id,duration_min,transfers,walk_km,stairs,modes,reliability\n\
A,twenty,0,0.4,no,bus,0.84\n";

    assert!(CsvItineraryImporter::from_reader(csv.as_bytes()).is_err());
}

#[test]
fn csv_source_serves_imported_candidates() {
    let import = CsvItineraryImporter::from_reader(EXPORT.as_bytes()).expect("import succeeds");
    let source = CsvItinerarySource::new(import);

    let request = TripRequest::new([-36.8443, 174.7676], [-36.8697, 174.7781]);
    let candidates = source.candidates(&request).expect("source serves");

    assert_eq!(candidates.len(), 4);
    assert_eq!(candidates[0].id, "A");
}
