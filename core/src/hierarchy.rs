//! Hierarchy builder: the fixed region -> area -> branch tree.
//!
//! Region and area names are static tables, never drawn. Per-branch
//! attributes (count, volume class, trend status, code prefix,
//! coordinate jitter) all come from the shared SeededRng.
//!
//! DRAW ORDER per area (fixed, never reordered):
//!   1. area latitude jitter, 2. area longitude jitter,
//!   3. branch count, then per branch:
//!   4. code prefix pick, 5. volume roll, 6. status roll,
//!   7. branch longitude jitter, 8. branch latitude jitter.

use crate::{
    config::GeneratorConfig,
    rng::SeededRng,
    types::{AreaId, BranchId, GeoPoint, RegionId},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolumeClass {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendStatus {
    Improving,
    Stagnant,
    Declining,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    pub id: BranchId,
    pub code: String,
    pub name: String,
    pub area_id: AreaId,
    pub region_id: RegionId,
    pub volume_class: VolumeClass,
    pub status: TrendStatus,
    pub coordinates: GeoPoint,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Area {
    pub id: AreaId,
    pub name: String,
    pub region_id: RegionId,
    pub branches: Vec<Branch>,
    pub coordinates: GeoPoint,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    pub name: String,
    pub areas: Vec<Area>,
}

const REGION_NAMES: [&str; 4] = [
    "Wilayah Jawa",
    "Wilayah Sumatera",
    "Wilayah Kalimantan",
    "Wilayah Sulawesi",
];

const BRANCH_PREFIXES: [&str; 3] = ["KC", "KCP", "KK"];

fn area_names(region_name: &str) -> &'static [&'static str] {
    match region_name {
        "Wilayah Jawa" => &[
            "Jakarta Pusat",
            "Jakarta Selatan",
            "Jakarta Barat",
            "Bandung",
            "Surabaya",
            "Semarang",
            "Yogyakarta",
        ],
        "Wilayah Sumatera" => &["Medan", "Palembang", "Pekanbaru", "Padang", "Lampung"],
        "Wilayah Kalimantan" => &["Balikpapan", "Banjarmasin", "Pontianak", "Samarinda"],
        "Wilayah Sulawesi" => &["Makassar", "Manado", "Kendari", "Palu"],
        _ => &[],
    }
}

/// City center for an area name. Unknown names fall back to a point in
/// the middle of the archipelago.
fn city_coordinate(area_name: &str) -> GeoPoint {
    let (lat, lng) = match area_name {
        // Jawa
        "Jakarta Pusat" => (-6.18, 106.83),
        "Jakarta Selatan" => (-6.26, 106.81),
        "Jakarta Barat" => (-6.16, 106.76),
        "Bandung" => (-6.91, 107.61),
        "Surabaya" => (-7.25, 112.75),
        "Semarang" => (-7.00, 110.42),
        "Yogyakarta" => (-7.79, 110.36),
        // Sumatera
        "Medan" => (3.59, 98.67),
        "Palembang" => (-2.97, 104.77),
        "Pekanbaru" => (0.50, 101.44),
        "Padang" => (-0.94, 100.41),
        "Lampung" => (-5.39, 105.26),
        // Kalimantan
        "Balikpapan" => (-1.23, 116.88),
        "Banjarmasin" => (-3.31, 114.59),
        "Pontianak" => (-0.02, 109.33),
        "Samarinda" => (-0.50, 117.15),
        // Sulawesi
        "Makassar" => (-5.14, 119.43),
        "Manado" => (1.47, 124.84),
        "Kendari" => (-3.99, 122.51),
        "Palu" => (-0.90, 119.83),
        _ => (-2.0, 118.0),
    };
    GeoPoint { x: lng, y: lat }
}

/// Build the full organizational tree. Branch codes carry a global,
/// zero-padded sequence counter so they are unique across regions.
pub fn build_hierarchy(cfg: &GeneratorConfig, rng: &mut SeededRng) -> Vec<Region> {
    let mut regions = Vec::with_capacity(REGION_NAMES.len());
    let mut branch_counter: u32 = 1;

    for (region_idx, region_name) in REGION_NAMES.iter().enumerate() {
        let region_id = format!("R{}", region_idx + 1);
        let region_bias = cfg
            .region_status_bias
            .get(region_idx)
            .copied()
            .unwrap_or(0.0);
        let mut areas = Vec::new();

        for (area_idx, area_name) in area_names(region_name).iter().enumerate() {
            let area_id = format!("{}-A{}", region_id, area_idx + 1);
            let city = city_coordinate(area_name);

            // ~0.05 deg of jitter keeps area centers distinct on the map.
            let area_lat = city.y + rng.gaussian(0.0, 0.05);
            let area_lng = city.x + rng.gaussian(0.0, 0.05);

            let branch_count = rng.int(cfg.branches_per_area_min, cfg.branches_per_area_max);
            let mut branches = Vec::with_capacity(branch_count as usize);

            for i in 0..branch_count {
                let prefix = *rng.pick(&BRANCH_PREFIXES);
                let branch_id = format!("{}-B{}", area_id, i + 1);
                let branch_code = format!("{prefix}{branch_counter:04}");

                let volume_roll = rng.next();
                let volume_class = if volume_roll < cfg.volume_high_threshold {
                    VolumeClass::High
                } else if volume_roll < cfg.volume_medium_threshold {
                    VolumeClass::Medium
                } else {
                    VolumeClass::Low
                };

                let status_roll = rng.next();
                let status = if status_roll < cfg.status_improving_threshold + region_bias {
                    TrendStatus::Improving
                } else if status_roll < cfg.status_stagnant_threshold + region_bias {
                    TrendStatus::Stagnant
                } else {
                    TrendStatus::Declining
                };

                branch_counter += 1;

                branches.push(Branch {
                    id: branch_id,
                    code: branch_code,
                    name: format!("{} {}", area_name, i + 1),
                    area_id: area_id.clone(),
                    region_id: region_id.clone(),
                    volume_class,
                    status,
                    // ~0.02 deg around the area center, tighter than the
                    // area's own jitter.
                    coordinates: GeoPoint {
                        x: area_lng + rng.gaussian(0.0, 0.02),
                        y: area_lat + rng.gaussian(0.0, 0.02),
                    },
                });
            }

            areas.push(Area {
                id: area_id,
                name: (*area_name).to_string(),
                region_id: region_id.clone(),
                branches,
                coordinates: GeoPoint {
                    x: area_lng,
                    y: area_lat,
                },
            });
        }

        regions.push(Region {
            id: region_id,
            name: (*region_name).to_string(),
            areas,
        });
    }

    log::debug!(
        "hierarchy built: {} regions, {} branches",
        regions.len(),
        branch_counter - 1
    );

    regions
}

/// Flatten the tree into the canonical branch iteration order
/// (region-major, then area, then branch).
pub fn flatten_branches(regions: &[Region]) -> Vec<Branch> {
    regions
        .iter()
        .flat_map(|r| r.areas.iter())
        .flat_map(|a| a.branches.iter())
        .cloned()
        .collect()
}
