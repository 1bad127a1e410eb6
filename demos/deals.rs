use chrono::{Duration, Utc};
use metronearby::{
    format_distance, Coordinate, DealAggregator, MetroNearbyError, Offer, Station, StationIndex,
    StationStatus, SystemClock,
};

fn main() -> Result<(), MetroNearbyError> {
    let index = StationIndex::new(vec![
        Station::new("venizelou", "Venizelou", Coordinate::new(40.6363, 22.9386), true, StationStatus::Operational),
        Station::new("agia-sofia", "Agia Sofia", Coordinate::new(40.6334, 22.9415), true, StationStatus::Operational),
    ])?;

    let now = Utc::now();
    let offer = |id: &str, brand: &str, lat: f64, lon: f64, days: i64, title: &str| Offer {
        id: id.to_string(),
        business_id: format!("biz-{id}"),
        brand: brand.to_string(),
        coordinate: Coordinate::new(lat, lon),
        is_active: true,
        valid_until: now + Duration::days(days),
        payload: title.to_string(),
    };
    let offers = vec![
        offer("1", "Coffee Island", 40.6340, 22.9410, 5, "2-for-1 freddo"),
        offer("2", "Bougatsa Giannis", 40.6360, 22.9390, 2, "Free coffee with bougatsa"),
        offer("3", "Coffee Island", 40.6350, 22.9400, -1, "Expired espresso deal"),
    ];

    let deals = DealAggregator::new(&index, SystemClock);
    for group in deals.group_by_closest_station(&deals.active_unexpired(&offers), 500.0) {
        println!("{} ({} deals)", group.station_name, group.offers.len());
        for offer in &group.offers {
            let distance = index
                .nearest(offer.coordinate)
                .map(|nearest| nearest.distance_meters);
            println!("  {} - {} ({})", offer.brand, offer.payload, format_distance(distance));
        }
    }

    let selection = deals
        .select()
        .offers(&offers)
        .reference_station_id("agia-sofia")
        .brand("coffee island")
        .radius_meters(300.0)
        .call()?;
    println!("Brands: {}", selection.brands.join(", "));
    println!("Coffee Island near Agia Sofia: {}", selection.offers.len());
    Ok(())
}
