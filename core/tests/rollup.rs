//! Roll-up conservation, ranking and the hand-built area scenarios.

use branchpulse_core::{
    config::GeneratorConfig,
    dataset::Dataset,
    hierarchy::{Area, Branch, Region, TrendStatus, VolumeClass},
    rollup::aggregate_by_area,
    types::GeoPoint,
};

fn generate() -> Dataset {
    Dataset::generate(&GeneratorConfig::default()).expect("dataset")
}

#[test]
fn status_counts_are_conserved_across_area_summaries() {
    let dataset = generate();

    let from_areas: (usize, usize, usize) = dataset.area_summaries.iter().fold(
        (0, 0, 0),
        |(i, s, d), a| {
            (
                i + a.branches_improving,
                s + a.branches_stagnant,
                d + a.branches_declining,
            )
        },
    );

    let count = |status| {
        dataset
            .branches
            .iter()
            .filter(|b| b.status == status)
            .count()
    };
    let direct = (
        count(TrendStatus::Improving),
        count(TrendStatus::Stagnant),
        count(TrendStatus::Declining),
    );

    assert_eq!(from_areas, direct, "area roll-up lost or invented branches");
}

#[test]
fn region_branch_counts_sum_to_total() {
    let dataset = generate();
    let from_regions: usize = dataset
        .region_summaries
        .iter()
        .map(|r| r.branch_count)
        .sum();
    assert_eq!(from_regions, dataset.branches.len());

    let from_region_status: usize = dataset
        .region_summaries
        .iter()
        .map(|r| r.branches_improving + r.branches_stagnant + r.branches_declining)
        .sum();
    assert_eq!(from_region_status, dataset.branches.len());
}

#[test]
fn areas_are_ranked_by_sla_descending() {
    let dataset = generate();
    let summaries = &dataset.area_summaries;

    for pair in summaries.windows(2) {
        assert!(
            pair[0].sla_met >= pair[1].sla_met,
            "rank {} ({}) has lower SLA than rank {} ({})",
            pair[0].performance_rank,
            pair[0].sla_met,
            pair[1].performance_rank,
            pair[1].sla_met
        );
    }
    for (i, s) in summaries.iter().enumerate() {
        assert_eq!(s.performance_rank, i + 1, "ranks must be dense 1..N");
    }
}

fn branch(area_id: &str, n: usize, status: TrendStatus) -> Branch {
    Branch {
        id: format!("{area_id}-B{n}"),
        code: format!("KC{n:04}"),
        name: format!("Testville {n}"),
        area_id: area_id.into(),
        region_id: "R1".into(),
        volume_class: VolumeClass::Medium,
        status,
        coordinates: GeoPoint { x: 106.8, y: -6.2 },
    }
}

#[test]
fn ten_branch_area_with_three_declining() {
    let area_id = "R1-A1";
    let mut branches = Vec::new();
    for n in 1..=4 {
        branches.push(branch(area_id, n, TrendStatus::Improving));
    }
    for n in 5..=7 {
        branches.push(branch(area_id, n, TrendStatus::Stagnant));
    }
    for n in 8..=10 {
        branches.push(branch(area_id, n, TrendStatus::Declining));
    }

    let regions = vec![Region {
        id: "R1".into(),
        name: "Wilayah Jawa".into(),
        areas: vec![Area {
            id: area_id.into(),
            name: "Jakarta Pusat".into(),
            region_id: "R1".into(),
            branches,
            coordinates: GeoPoint { x: 106.83, y: -6.18 },
        }],
    }];

    let summaries = aggregate_by_area(&regions, &[], &[], &GeneratorConfig::default());

    assert_eq!(summaries.len(), 1);
    let summary = &summaries[0];
    assert_eq!(summary.branch_count, 10);
    assert_eq!(summary.branches_improving, 4);
    assert_eq!(summary.branches_stagnant, 3);
    assert_eq!(summary.branches_declining, 3);
    assert_eq!(summary.percent_declining, 30);
    assert_eq!(summary.performance_rank, 1);
}

#[test]
fn empty_record_sets_average_to_zero() {
    // No daily or monthly records at all: every mean must come back as
    // a plain zero, not NaN.
    let regions = vec![Region {
        id: "R1".into(),
        name: "Wilayah Jawa".into(),
        areas: vec![Area {
            id: "R1-A1".into(),
            name: "Jakarta Pusat".into(),
            region_id: "R1".into(),
            branches: vec![branch("R1-A1", 1, TrendStatus::Stagnant)],
            coordinates: GeoPoint { x: 106.83, y: -6.18 },
        }],
    }];

    let summaries = aggregate_by_area(&regions, &[], &[], &GeneratorConfig::default());
    let summary = &summaries[0];

    assert_eq!(summary.avg_queue_time, 0.0);
    assert_eq!(summary.sla_met, 0.0);
    assert_eq!(summary.ses_score, 0.0);
    assert!(summary.avg_queue_time.is_finite());
}

#[test]
fn region_summary_weights_areas_by_branch_count() {
    let dataset = generate();

    // Recompute one region's weighted queue time by hand.
    let region = &dataset.regions[0];
    let areas: Vec<_> = dataset
        .area_summaries
        .iter()
        .filter(|a| a.region_id == region.id)
        .collect();
    let total_branches: usize = areas.iter().map(|a| a.branch_count).sum();
    let expected: f64 = areas
        .iter()
        .map(|a| a.avg_queue_time * a.branch_count as f64)
        .sum::<f64>()
        / total_branches as f64;

    let summary = dataset
        .region_summaries
        .iter()
        .find(|r| r.region_id == region.id)
        .expect("region summary");

    assert!(
        (summary.avg_queue_time - (expected * 10.0).round() / 10.0).abs() < 1e-9,
        "weighted average mismatch: {} vs {}",
        summary.avg_queue_time,
        expected
    );
}
