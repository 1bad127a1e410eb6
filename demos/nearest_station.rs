use metronearby::{
    format_distance, Coordinate, FilterCriteria, LocatedEntity, MetroNearbyError,
    ProximityConfig, ProximityFilter, StationIndex,
};

const STATIONS: &str = r#"[
    {"id": "new-railway-station", "name": "New Railway Station", "coordinate": {"lat": 40.6443, "lng": 22.9306}, "active": true, "status": "operational"},
    {"id": "venizelou", "name": "Venizelou", "coordinate": {"lat": 40.6363, "lng": 22.9386}, "active": true, "status": "operational"},
    {"id": "agia-sofia", "name": "Agia Sofia", "coordinate": {"lat": 40.6334, "lng": 22.9415}, "active": true, "status": "operational"},
    {"id": "sintrivani", "name": "Sintrivani", "coordinate": {"lat": 40.6312, "lng": 22.9480}, "active": true, "status": "operational"},
    {"id": "kalamaria", "name": "Kalamaria", "coordinate": {"lat": 40.5850, "lng": 22.9500}, "active": false, "status": "under_construction"}
]"#;

fn main() -> Result<(), MetroNearbyError> {
    let index = StationIndex::from_json_str(STATIONS)?;
    let config = ProximityConfig::from_json_str(r#"{"locale": "english"}"#)?;
    let labels = config.labels();

    let businesses = vec![
        LocatedEntity::new("bougatsa", Coordinate::new(40.6360, 22.9390), "Bougatsa Giannis")
            .with_search_text("Bougatsa Giannis, Venizelou 12"),
        LocatedEntity::new("coffee", Coordinate::new(40.6340, 22.9410), "Coffee Island")
            .with_search_text("Coffee Island, Agias Sofias 30"),
        LocatedEntity::new("ouzeri", Coordinate::new(40.6320, 22.9470), "Ouzeri Aristotelous")
            .with_search_text("Ouzeri Aristotelous, Aristotelous 8"),
    ];

    let filter = ProximityFilter::new(&index);
    println!("Nearest stations:");
    for annotated in filter.annotate(&businesses) {
        let station = annotated
            .closest_station_id
            .as_deref()
            .and_then(|id| index.get(id))
            .map_or("none", |station| station.name.as_str());
        println!(
            "  {:<22} {:<22} {}",
            annotated.entity.payload,
            station,
            labels.format(annotated.distance_meters)
        );
    }

    let criteria = FilterCriteria::builder()
        .reference_station_id("venizelou")
        .radius_meters(config.default_radius_meters)
        .build()?;
    println!("Within {} of Venizelou:", format_distance(Some(criteria.radius_meters())));
    for annotated in filter.apply(&businesses, &criteria) {
        println!(
            "  {:<22} {}",
            annotated.entity.payload,
            labels.format(annotated.distance_meters)
        );
    }

    let applicant = Coordinate::new(40.6000, 22.9700);
    println!(
        "Registration at {:?} allowed: {}",
        applicant,
        config.is_registrable(&index, applicant)
    );
    Ok(())
}
