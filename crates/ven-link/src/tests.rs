//! Unit tests for ven-link.

use ven_core::{DeviceId, SimRng, SimTime};

use crate::allocator::AllocatorStrategy;
use crate::error::LinkError;
use crate::table::{LinkTable, LinkUpdate};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn row(time: u64, source: u32, target: u32, distance_m: f64) -> LinkUpdate {
    LinkUpdate {
        time:   SimTime(time),
        source: DeviceId(source),
        target: DeviceId(target),
        distance_m,
    }
}

fn table_with(rows: Vec<LinkUpdate>) -> LinkTable {
    let mut table = LinkTable::new();
    table.update(rows);
    table
}

// ── LinkTable ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod table {
    use super::*;

    #[test]
    fn candidates_ranked_by_distance() {
        let table = table_with(vec![
            row(0, 1, 20, 300.0),
            row(0, 1, 10, 50.0),
            row(0, 1, 30, 120.0),
        ]);
        let targets: Vec<_> = table
            .candidates(SimTime(0), DeviceId(1))
            .iter()
            .map(|e| e.target)
            .collect();
        assert_eq!(targets, vec![DeviceId(10), DeviceId(30), DeviceId(20)]);
    }

    #[test]
    fn distance_ties_break_by_target_id() {
        let table = table_with(vec![row(0, 1, 30, 50.0), row(0, 1, 10, 50.0)]);
        let targets: Vec<_> = table
            .candidates(SimTime(0), DeviceId(1))
            .iter()
            .map(|e| e.target)
            .collect();
        assert_eq!(targets, vec![DeviceId(10), DeviceId(30)]);
    }

    #[test]
    fn slice_resolves_to_newest_bucket_at_or_before() {
        let table = table_with(vec![row(100, 1, 10, 1.0), row(300, 1, 20, 1.0)]);

        assert!(table.candidates(SimTime(50), DeviceId(1)).is_empty());
        assert_eq!(table.candidates(SimTime(100), DeviceId(1))[0].target, DeviceId(10));
        assert_eq!(table.candidates(SimTime(299), DeviceId(1))[0].target, DeviceId(10));
        assert_eq!(table.candidates(SimTime(300), DeviceId(1))[0].target, DeviceId(20));
        assert_eq!(table.candidates(SimTime(9_999), DeviceId(1))[0].target, DeviceId(20));
    }

    #[test]
    fn unknown_source_yields_empty_not_error() {
        let table = table_with(vec![row(0, 1, 10, 1.0)]);
        assert!(table.candidates(SimTime(0), DeviceId(42)).is_empty());
    }

    #[test]
    fn select_n_caps_and_never_pads() {
        let table = table_with(vec![
            row(0, 1, 10, 1.0),
            row(0, 1, 20, 2.0),
            row(0, 1, 30, 3.0),
        ]);
        assert_eq!(table.select_n(SimTime(0), DeviceId(1), 2).len(), 2);
        assert_eq!(table.select_n(SimTime(0), DeviceId(1), 10).len(), 3);
        assert!(table.select_n(SimTime(0), DeviceId(9), 5).is_empty());
    }

    #[test]
    fn select_n_results_come_from_current_slice() {
        let table = table_with(vec![row(0, 1, 10, 1.0), row(500, 1, 20, 1.0)]);
        let selected = table.select_n(SimTime(600), DeviceId(1), 5);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].target, DeviceId(20));
    }

    #[test]
    fn update_merges_into_existing_bucket() {
        let mut table = table_with(vec![row(0, 1, 10, 5.0)]);
        table.update(vec![row(0, 1, 20, 1.0)]);

        let targets: Vec<_> = table
            .candidates(SimTime(0), DeviceId(1))
            .iter()
            .map(|e| e.target)
            .collect();
        assert_eq!(targets, vec![DeviceId(20), DeviceId(10)]);
        assert_eq!(table.bucket_count(), 1);
    }

    #[test]
    fn empty_update_is_noop() {
        let mut table = table_with(vec![row(0, 1, 10, 5.0)]);
        table.update(Vec::new());
        assert_eq!(table.bucket_count(), 1);
        assert_eq!(table.candidates(SimTime(0), DeviceId(1)).len(), 1);
    }

    #[test]
    fn old_buckets_are_never_evicted() {
        let mut table = LinkTable::new();
        for t in 0..10 {
            table.update(vec![row(t * 100, 1, 10, 1.0)]);
        }
        assert_eq!(table.bucket_count(), 10);
    }

    #[test]
    fn sources_at_lists_slice_sources_sorted() {
        let table = table_with(vec![row(0, 3, 10, 1.0), row(0, 1, 10, 1.0)]);
        assert_eq!(table.sources_at(SimTime(50)), vec![DeviceId(1), DeviceId(3)]);
        assert!(LinkTable::new().sources_at(SimTime(0)).is_empty());
    }
}

// ── Allocator strategies ──────────────────────────────────────────────────────

#[cfg(test)]
mod allocator {
    use super::*;

    #[test]
    fn parse_accepts_valid_names() {
        assert_eq!(AllocatorStrategy::parse("nearest").unwrap(), AllocatorStrategy::Nearest);
        assert_eq!(AllocatorStrategy::parse("random").unwrap(), AllocatorStrategy::Random);
    }

    #[test]
    fn parse_rejects_unknown_name_listing_valid_set() {
        let err = AllocatorStrategy::parse("closest").unwrap_err();
        let LinkError::InvalidStrategy { name, valid } = err;
        assert_eq!(name, "closest");
        assert!(valid.contains(&"nearest"));
        assert!(valid.contains(&"random"));
    }

    #[test]
    fn nearest_picks_lowest_distance() {
        let table = table_with(vec![row(0, 1, 101, 50.0), row(0, 1, 102, 200.0)]);
        let mut rng = SimRng::new(42);

        let pick = AllocatorStrategy::Nearest
            .pick(table.candidates(SimTime(0), DeviceId(1)), &mut rng);
        assert_eq!(pick, Some(DeviceId(101)));
    }

    #[test]
    fn nearest_assigns_each_vehicle_and_drops_unconnected() {
        // v1:[(b1,50),(b2,200)]  v2:[(b1,300),(b2,10)]  v3:[]
        let table = table_with(vec![
            row(0, 1, 101, 50.0),
            row(0, 1, 102, 200.0),
            row(0, 2, 101, 300.0),
            row(0, 2, 102, 10.0),
        ]);
        let mut rng = SimRng::new(42);
        let nearest = AllocatorStrategy::Nearest;

        let v1 = nearest.pick(table.candidates(SimTime(0), DeviceId(1)), &mut rng);
        let v2 = nearest.pick(table.candidates(SimTime(0), DeviceId(2)), &mut rng);
        let v3 = nearest.pick(table.candidates(SimTime(0), DeviceId(3)), &mut rng);

        assert_eq!(v1, Some(DeviceId(101)));
        assert_eq!(v2, Some(DeviceId(102)));
        assert_eq!(v3, None); // dropped: no candidate
    }

    #[test]
    fn random_pick_stays_within_candidates() {
        let table = table_with(vec![row(0, 1, 10, 1.0), row(0, 1, 20, 2.0)]);
        let mut rng = SimRng::new(7);
        for _ in 0..50 {
            let pick = AllocatorStrategy::Random
                .pick(table.candidates(SimTime(0), DeviceId(1)), &mut rng)
                .unwrap();
            assert!(pick == DeviceId(10) || pick == DeviceId(20));
        }
    }

    #[test]
    fn pick_n_nearest_takes_ranked_prefix() {
        let table = table_with(vec![
            row(0, 1, 10, 1.0),
            row(0, 1, 20, 2.0),
            row(0, 1, 30, 3.0),
        ]);
        let mut rng = SimRng::new(7);
        let picks = AllocatorStrategy::Nearest
            .pick_n(table.candidates(SimTime(0), DeviceId(1)), 2, &mut rng);
        assert_eq!(picks, vec![DeviceId(10), DeviceId(20)]);
    }

    #[test]
    fn pick_n_random_size_is_min_of_n_and_available() {
        let table = table_with(vec![row(0, 1, 10, 1.0), row(0, 1, 20, 2.0)]);
        let mut rng = SimRng::new(7);
        let candidates = table.candidates(SimTime(0), DeviceId(1));

        assert_eq!(AllocatorStrategy::Random.pick_n(candidates, 5, &mut rng).len(), 2);
        assert_eq!(AllocatorStrategy::Random.pick_n(candidates, 1, &mut rng).len(), 1);
        assert!(AllocatorStrategy::Random.pick_n(&[], 3, &mut rng).is_empty());
    }

    #[test]
    fn empty_candidates_yield_none() {
        let mut rng = SimRng::new(7);
        assert_eq!(AllocatorStrategy::Nearest.pick(&[], &mut rng), None);
        assert_eq!(AllocatorStrategy::Random.pick(&[], &mut rng), None);
    }
}
