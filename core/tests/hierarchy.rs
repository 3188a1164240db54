//! Structural invariants of the generated organizational tree.

use branchpulse_core::{
    config::GeneratorConfig,
    hierarchy::{build_hierarchy, flatten_branches},
    rng::SeededRng,
};
use std::collections::HashSet;

fn build() -> Vec<branchpulse_core::hierarchy::Region> {
    let config = GeneratorConfig::default();
    let mut rng = SeededRng::new(config.seed).expect("seed");
    build_hierarchy(&config, &mut rng)
}

#[test]
fn four_regions_with_fixed_area_counts() {
    let regions = build();
    assert_eq!(regions.len(), 4);
    let area_counts: Vec<usize> = regions.iter().map(|r| r.areas.len()).collect();
    assert_eq!(area_counts, vec![7, 5, 4, 4]);
}

#[test]
fn branch_counts_stay_in_configured_range() {
    let regions = build();
    for region in &regions {
        for area in &region.areas {
            let n = area.branches.len();
            assert!(
                (8..=20).contains(&n),
                "area {} has {} branches, expected 8..=20",
                area.id,
                n
            );
        }
    }
}

#[test]
fn branch_region_matches_parent_area_region() {
    let regions = build();
    for region in &regions {
        for area in &region.areas {
            assert_eq!(area.region_id, region.id);
            for branch in &area.branches {
                assert_eq!(
                    branch.region_id, area.region_id,
                    "branch {} disagrees with parent area {} about its region",
                    branch.id, area.id
                );
                assert_eq!(branch.area_id, area.id);
            }
        }
    }
}

#[test]
fn branch_codes_are_unique_and_sequential() {
    let branches = flatten_branches(&build());
    let codes: HashSet<&str> = branches.iter().map(|b| b.code.as_str()).collect();
    assert_eq!(codes.len(), branches.len(), "duplicate branch codes");

    for (i, branch) in branches.iter().enumerate() {
        let prefix_len = branch.code.len() - 4;
        let prefix = &branch.code[..prefix_len];
        assert!(
            matches!(prefix, "KC" | "KCP" | "KK"),
            "unexpected code prefix: {}",
            branch.code
        );
        let counter: u32 = branch.code[prefix_len..].parse().expect("numeric suffix");
        assert_eq!(counter as usize, i + 1, "global counter out of order");
    }
}

#[test]
fn coordinates_jitter_around_area_center() {
    let regions = build();
    for region in &regions {
        for area in &region.areas {
            for branch in &area.branches {
                let dx = (branch.coordinates.x - area.coordinates.x).abs();
                let dy = (branch.coordinates.y - area.coordinates.y).abs();
                // 0.02 deg std; anything past half a degree means the
                // jitter is being applied to the wrong base point.
                assert!(
                    dx < 0.5 && dy < 0.5,
                    "branch {} strayed {dx:.3}/{dy:.3} deg from its area",
                    branch.id
                );
            }
        }
    }
}

#[test]
fn every_volume_class_and_status_appears() {
    let branches = flatten_branches(&build());
    use branchpulse_core::hierarchy::{TrendStatus, VolumeClass};

    for class in [VolumeClass::High, VolumeClass::Medium, VolumeClass::Low] {
        assert!(
            branches.iter().any(|b| b.volume_class == class),
            "no branch with volume class {class:?}"
        );
    }
    for status in [
        TrendStatus::Improving,
        TrendStatus::Stagnant,
        TrendStatus::Declining,
    ] {
        assert!(
            branches.iter().any(|b| b.status == status),
            "no branch with status {status:?}"
        );
    }
}
