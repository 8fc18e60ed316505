//! Built-in reference data set for a fresh database

use crate::reference::types::{CityImport, LocalityImport, WriteStats};
use crate::reference::write::{write_cities, write_localities, write_multipliers};
use crate::valuation::memory::InMemoryReferenceData;
use crate::valuation::types::{FactorType, InfrastructureFactor, LandUse, Tier};
use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

// (name, state, price per sqft, growth, population, tier)
const CITIES: &[(&str, &str, f64, f64, i64, &str)] = &[
    // Tier 1
    ("Mumbai", "Maharashtra", 25000.0, 0.08, 12_442_373, "Tier 1"),
    ("Delhi", "Delhi", 22000.0, 0.07, 11_007_835, "Tier 1"),
    ("Bangalore", "Karnataka", 18000.0, 0.09, 8_443_675, "Tier 1"),
    ("Hyderabad", "Telangana", 15000.0, 0.08, 6_993_262, "Tier 1"),
    ("Chennai", "Tamil Nadu", 14000.0, 0.06, 4_681_087, "Tier 1"),
    ("Kolkata", "West Bengal", 12000.0, 0.05, 4_496_694, "Tier 1"),
    ("Pune", "Maharashtra", 16000.0, 0.08, 3_124_458, "Tier 1"),
    ("Ahmedabad", "Gujarat", 8500.0, 0.07, 5_633_927, "Tier 1"),
    // Tier 2
    ("Jaipur", "Rajasthan", 6500.0, 0.06, 3_073_350, "Tier 2"),
    ("Lucknow", "Uttar Pradesh", 5500.0, 0.06, 2_817_105, "Tier 2"),
    ("Kanpur", "Uttar Pradesh", 4500.0, 0.05, 2_767_031, "Tier 2"),
    ("Nagpur", "Maharashtra", 5500.0, 0.06, 2_405_421, "Tier 2"),
    ("Indore", "Madhya Pradesh", 5000.0, 0.06, 1_964_086, "Tier 2"),
    ("Thane", "Maharashtra", 18000.0, 0.07, 1_818_872, "Tier 2"),
    ("Bhopal", "Madhya Pradesh", 4500.0, 0.05, 1_798_218, "Tier 2"),
    ("Visakhapatnam", "Andhra Pradesh", 6000.0, 0.06, 1_730_320, "Tier 2"),
    ("Pimpri-Chinchwad", "Maharashtra", 12000.0, 0.07, 1_729_359, "Tier 2"),
    ("Patna", "Bihar", 4000.0, 0.05, 1_684_222, "Tier 2"),
    ("Vadodara", "Gujarat", 6500.0, 0.06, 1_666_703, "Tier 2"),
    ("Ghaziabad", "Uttar Pradesh", 8000.0, 0.06, 1_636_068, "Tier 2"),
    ("Ludhiana", "Punjab", 7000.0, 0.05, 1_618_879, "Tier 2"),
    ("Agra", "Uttar Pradesh", 4500.0, 0.05, 1_585_704, "Tier 2"),
    ("Nashik", "Maharashtra", 6000.0, 0.06, 1_486_973, "Tier 2"),
    ("Faridabad", "Haryana", 9000.0, 0.06, 1_414_050, "Tier 2"),
    ("Meerut", "Uttar Pradesh", 5000.0, 0.05, 1_305_429, "Tier 2"),
    ("Rajkot", "Gujarat", 5500.0, 0.06, 1_286_995, "Tier 2"),
    ("Kalyan-Dombivli", "Maharashtra", 14000.0, 0.07, 1_246_381, "Tier 2"),
    ("Vasai-Virar", "Maharashtra", 12000.0, 0.08, 1_221_233, "Tier 2"),
    ("Varanasi", "Uttar Pradesh", 4000.0, 0.05, 1_201_815, "Tier 2"),
    // Tier 3
    ("Amritsar", "Punjab", 5500.0, 0.05, 1_183_705, "Tier 3"),
    ("Aligarh", "Uttar Pradesh", 3500.0, 0.04, 874_408, "Tier 3"),
    ("Guwahati", "Assam", 4500.0, 0.05, 962_334, "Tier 3"),
    ("Chandigarh", "Chandigarh", 12000.0, 0.06, 1_025_682, "Tier 3"),
    ("Thiruvananthapuram", "Kerala", 6000.0, 0.05, 957_730, "Tier 3"),
    ("Solapur", "Maharashtra", 4000.0, 0.05, 951_118, "Tier 3"),
    ("Madurai", "Tamil Nadu", 5000.0, 0.05, 1_017_865, "Tier 3"),
    ("Coimbatore", "Tamil Nadu", 6500.0, 0.06, 1_061_447, "Tier 3"),
    ("Jodhpur", "Rajasthan", 4500.0, 0.05, 1_033_756, "Tier 3"),
    ("Kota", "Rajasthan", 4000.0, 0.05, 1_001_365, "Tier 3"),
    ("Gwalior", "Madhya Pradesh", 3500.0, 0.04, 1_101_981, "Tier 3"),
    ("Vijayawada", "Andhra Pradesh", 5500.0, 0.06, 1_048_240, "Tier 3"),
    ("Mysore", "Karnataka", 6000.0, 0.05, 920_550, "Tier 3"),
    ("Bareilly", "Uttar Pradesh", 3000.0, 0.04, 903_668, "Tier 3"),
    ("Allahabad", "Uttar Pradesh", 3500.0, 0.04, 1_216_719, "Tier 3"),
    ("Jabalpur", "Madhya Pradesh", 3500.0, 0.04, 1_267_564, "Tier 3"),
    ("Ranchi", "Jharkhand", 4000.0, 0.05, 1_073_440, "Tier 3"),
    ("Howrah", "West Bengal", 6000.0, 0.05, 1_077_075, "Tier 3"),
    ("Jalandhar", "Punjab", 5000.0, 0.05, 873_725, "Tier 3"),
    ("Tiruchirappalli", "Tamil Nadu", 4500.0, 0.05, 916_857, "Tier 3"),
];

// (city, locality, price per sqft, location multiplier, area type, pin code)
const LOCALITIES: &[(&str, &str, f64, f64, &str, &str)] = &[
    ("Mumbai", "Bandra West", 45000.0, 1.8, "residential", "400050"),
    ("Mumbai", "Juhu", 50000.0, 2.0, "residential", "400049"),
    ("Mumbai", "Lower Parel", 55000.0, 2.2, "commercial", "400013"),
    ("Mumbai", "Andheri East", 35000.0, 1.4, "residential", "400069"),
    ("Mumbai", "Powai", 38000.0, 1.5, "residential", "400076"),
    ("Mumbai", "Worli", 60000.0, 2.4, "residential", "400018"),
    ("Mumbai", "Malad West", 28000.0, 1.1, "residential", "400064"),
    ("Mumbai", "Goregaon East", 30000.0, 1.2, "residential", "400063"),
    ("Delhi", "Connaught Place", 80000.0, 3.6, "commercial", "110001"),
    ("Delhi", "Defence Colony", 45000.0, 2.0, "residential", "110024"),
    ("Delhi", "Greater Kailash", 40000.0, 1.8, "residential", "110048"),
    ("Delhi", "Saket", 38000.0, 1.7, "residential", "110017"),
    ("Delhi", "Vasant Vihar", 50000.0, 2.3, "residential", "110057"),
    ("Delhi", "Dwarka", 25000.0, 1.1, "residential", "110075"),
    ("Delhi", "Rohini", 20000.0, 0.9, "residential", "110085"),
    ("Delhi", "Gurgaon Sector 28", 35000.0, 1.6, "commercial", "122002"),
    ("Bangalore", "Koramangala", 28000.0, 1.6, "residential", "560034"),
    ("Bangalore", "Indiranagar", 25000.0, 1.4, "residential", "560038"),
    ("Bangalore", "Whitefield", 22000.0, 1.2, "residential", "560066"),
    ("Bangalore", "Electronic City", 18000.0, 1.0, "commercial", "560100"),
    ("Bangalore", "Jayanagar", 20000.0, 1.1, "residential", "560011"),
    ("Bangalore", "HSR Layout", 24000.0, 1.3, "residential", "560102"),
    ("Bangalore", "Marathahalli", 20000.0, 1.1, "residential", "560037"),
    ("Bangalore", "Sarjapur Road", 16000.0, 0.9, "residential", "560035"),
    ("Hyderabad", "Banjara Hills", 25000.0, 1.7, "residential", "500034"),
    ("Hyderabad", "Jubilee Hills", 28000.0, 1.9, "residential", "500033"),
    ("Hyderabad", "Gachibowli", 18000.0, 1.2, "commercial", "500032"),
    ("Hyderabad", "Hitech City", 20000.0, 1.3, "commercial", "500081"),
    ("Hyderabad", "Kondapur", 16000.0, 1.1, "residential", "500084"),
    ("Hyderabad", "Madhapur", 18000.0, 1.2, "residential", "500081"),
    ("Chennai", "T Nagar", 22000.0, 1.6, "commercial", "600017"),
    ("Chennai", "Anna Nagar", 18000.0, 1.3, "residential", "600040"),
    ("Chennai", "Adyar", 20000.0, 1.4, "residential", "600020"),
    ("Chennai", "Velachery", 15000.0, 1.1, "residential", "600042"),
    ("Chennai", "OMR", 16000.0, 1.1, "commercial", "600096"),
    ("Chennai", "Porur", 14000.0, 1.0, "residential", "600116"),
    ("Pune", "Koregaon Park", 25000.0, 1.6, "residential", "411001"),
    ("Pune", "Baner", 18000.0, 1.1, "residential", "411045"),
    ("Pune", "Hinjewadi", 16000.0, 1.0, "commercial", "411057"),
    ("Pune", "Wakad", 15000.0, 0.9, "residential", "411057"),
    ("Pune", "Kharadi", 17000.0, 1.1, "residential", "411014"),
];

// (type, value, multiplier, description)
const MULTIPLIERS: &[(FactorType, &str, f64, &str)] = &[
    (FactorType::RoadWidth, "0-12", 0.9, "Narrow roads, limited access"),
    (FactorType::RoadWidth, "12-20", 1.0, "Standard residential roads"),
    (FactorType::RoadWidth, "20-30", 1.1, "Wide residential roads"),
    (FactorType::RoadWidth, "30-40", 1.2, "Major roads with good connectivity"),
    (FactorType::RoadWidth, ">40", 1.3, "Highway frontage or main arterials"),
    (FactorType::NearbySchools, "yes", 1.1, "Good schools within 2km"),
    (FactorType::NearbySchools, "no", 1.0, "No major schools nearby"),
    (FactorType::NearbyMetro, "yes", 1.25, "Metro station within 1km"),
    (FactorType::NearbyMetro, "no", 1.0, "No metro connectivity"),
    (FactorType::CommercialArea, "yes", 1.15, "Commercial hub nearby"),
    (FactorType::CommercialArea, "no", 1.0, "Primarily residential area"),
    (FactorType::AirportProximity, "<10km", 1.2, "Close to airport"),
    (FactorType::AirportProximity, "10-25km", 1.1, "Moderate distance to airport"),
    (FactorType::AirportProximity, ">25km", 1.0, "Far from airport"),
    (FactorType::ItParkProximity, "<5km", 1.15, "Close to IT parks"),
    (FactorType::ItParkProximity, "5-15km", 1.05, "Moderate distance to IT parks"),
    (FactorType::ItParkProximity, ">15km", 1.0, "Far from IT parks"),
];

pub fn seed_cities() -> Vec<CityImport> {
    CITIES
        .iter()
        .map(|(name, state, price, growth, population, tier)| CityImport {
            name: name.to_string(),
            state: state.to_string(),
            base_price_per_sqft: *price,
            growth_rate: *growth,
            population: Some(*population),
            tier: Some(tier.to_string()),
        })
        .collect()
}

pub fn seed_localities() -> Vec<LocalityImport> {
    LOCALITIES
        .iter()
        .filter_map(|(city, name, price, multiplier, area_type, pin)| {
            let (_, state, ..) = CITIES.iter().find(|c| c.0 == *city)?;
            Some(LocalityImport {
                name: name.to_string(),
                city_name: city.to_string(),
                state: state.to_string(),
                price_per_sqft: *price,
                location_multiplier: *multiplier,
                area_type: area_type.to_string(),
                pin_code: Some(pin.to_string()),
            })
        })
        .collect()
}

pub fn seed_multipliers() -> Vec<InfrastructureFactor> {
    MULTIPLIERS
        .iter()
        .map(|(factor_type, value, multiplier, description)| InfrastructureFactor {
            factor_type: *factor_type,
            factor_value: value.to_string(),
            multiplier: *multiplier,
            description: Some(description.to_string()),
        })
        .collect()
}

/// The seed set loaded into an in-memory provider
pub fn seeded_reference() -> InMemoryReferenceData {
    let mut data = InMemoryReferenceData::new();

    for city in seed_cities() {
        let id = data.add_location(
            &city.name,
            &city.state,
            city.base_price_per_sqft,
            city.growth_rate,
            city.population,
            city.tier.as_deref().and_then(Tier::parse_label),
        );
        for locality in seed_localities()
            .into_iter()
            .filter(|l| l.city_name == city.name && l.state == city.state)
        {
            data.add_sub_location(
                id,
                &locality.name,
                locality.price_per_sqft,
                locality.location_multiplier,
                Some(LandUse::parse(&locality.area_type)),
                locality.pin_code.as_deref(),
            );
        }
    }

    for factor in seed_multipliers() {
        data.push_factor(factor);
    }

    data
}

/// Insert the seed set unless the database already has cities
pub async fn seed_database(db: &PgPool) -> Result<WriteStats> {
    let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM cities")
        .fetch_one(db)
        .await?;

    if existing > 0 {
        info!("Database already has {} cities, skipping seed", existing);
        return Ok(WriteStats {
            skipped: existing as usize,
            ..WriteStats::default()
        });
    }

    info!("Seeding initial reference data...");

    let mut stats = write_cities(db, seed_cities()).await?;
    stats += write_localities(db, seed_localities()).await?;
    stats += write_multipliers(db, seed_multipliers()).await?;

    info!("Initial data seeded: {}", stats);

    Ok(stats)
}
