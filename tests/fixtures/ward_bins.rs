//! Realistic bin fixtures for a Vadodara old-city collection ward.
//!
//! Coordinates cluster within a few hundred meters, matching the sub-zone
//! scale the optimizer is tuned for.

use collection_planner::stops::CollectionStop;

/// A named bin with coordinates and a fill reading.
#[derive(Debug, Clone, Copy)]
pub struct Bin {
    pub id: &'static str,
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub fill: u8,
}

impl Bin {
    pub const fn new(id: &'static str, name: &'static str, lat: f64, lng: f64, fill: u8) -> Self {
        Self { id, name, lat, lng, fill }
    }

    pub fn to_stop(&self) -> CollectionStop {
        CollectionStop::new(self.id, self.name, self.lat, self.lng, self.fill)
    }
}

// ============================================================================
// Dandia Bazar ward
// ============================================================================

pub const DANDIA_BAZAR: &[Bin] = &[
    Bin::new("DB-01", "Dandia Bazar Main Market", 22.303420, 73.197650, 72),
    Bin::new("DB-02", "Mandvi Gate East", 22.303940, 73.199050, 48),
    Bin::new("DB-03", "Sidi Saiyyed Mosque Road", 22.304800, 73.198300, 85),
    Bin::new("DB-04", "Laheripura Road Junction", 22.302950, 73.197900, 33),
    Bin::new("DB-05", "Market Lane 1", 22.303250, 73.198000, 57),
    Bin::new("DB-06", "Market Lane 2", 22.304100, 73.197800, 62),
    Bin::new("DB-07", "Spice Bazaar Corner", 22.303600, 73.198900, 26),
    Bin::new("DB-08", "Temple Road Dustbin", 22.304300, 73.199400, 91),
    Bin::new("DB-09", "Community Hall", 22.302600, 73.197450, 40),
    Bin::new("DB-10", "Bus Stand North", 22.305000, 73.198000, 68),
    Bin::new("DB-11", "College Lane Dustbin", 22.304900, 73.197200, 55),
    Bin::new("DB-12", "Vendor Alley", 22.303350, 73.199300, 88),
];

/// All ward bins as concrete stops.
pub fn ward_stops() -> Vec<CollectionStop> {
    DANDIA_BAZAR.iter().map(Bin::to_stop).collect()
}

/// Ids of the bins at or above the given fill level, in fixture order.
pub fn ids_at_or_above(fill: u8) -> Vec<&'static str> {
    DANDIA_BAZAR
        .iter()
        .filter(|bin| bin.fill >= fill)
        .map(|bin| bin.id)
        .collect()
}
