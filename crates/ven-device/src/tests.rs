//! Unit tests for ven-device.

use ven_core::{DeviceId, GeoPosition, Payload, SimTime};

use crate::activation::ActivationWindow;
use crate::context::StageContext;
use crate::device::{Device, Stageable};
use crate::error::DeviceError;
use crate::factory::{DeviceFactory, StandardFactory};
use crate::kind::DeviceKind;
use crate::registry::DeviceRegistry;

// ── Helpers ───────────────────────────────────────────────────────────────────

const SIM_START: SimTime = SimTime(0);
const SIM_END:   SimTime = SimTime(10_000);

fn ctx(now: u64) -> StageContext {
    StageContext::new(SimTime(now), 100)
}

fn make(kind: DeviceKind, id: u32, window: ActivationWindow) -> Device {
    StandardFactory::with_defaults()
        .create(DeviceId(id), kind, window, None)
        .unwrap()
}

fn active_vehicle(id: u32) -> Device {
    let mut v = make(DeviceKind::Vehicle, id, ActivationWindow::always_on(SIM_START, SIM_END));
    v.activate(SIM_START).unwrap();
    v
}

// ── ActivationWindow ──────────────────────────────────────────────────────────

#[cfg(test)]
mod activation_window {
    use super::*;

    #[test]
    fn clips_to_sim_bounds() {
        let w = ActivationWindow::new(
            vec![(SimTime(0), SimTime(20_000))],
            SimTime(1_000),
            SimTime(9_000),
        );
        assert_eq!(w.next_enable(), Some(SimTime(1_000)));
        assert!(w.contains(SimTime(8_999)));
        assert!(!w.contains(SimTime(9_000)));
    }

    #[test]
    fn drops_windows_entirely_outside() {
        let w = ActivationWindow::new(
            vec![(SimTime(20_000), SimTime(30_000))],
            SIM_START,
            SIM_END,
        );
        assert!(w.is_empty());
        assert_eq!(w.next_enable(), None);
    }

    #[test]
    fn single_window_lifecycle_transitions() {
        // enable=[1000], disable=[5000], sim bounds [0, 10000].
        let mut w = ActivationWindow::new(vec![(SimTime(1_000), SimTime(5_000))], SIM_START, SIM_END);
        let id = DeviceId(1);

        // Activating at the wrong time fails.
        assert!(matches!(
            w.activate(id, SimTime(999)),
            Err(DeviceError::WrongActivationTime { .. })
        ));
        w.activate(id, SimTime(1_000)).unwrap();
        assert!(w.is_active());

        // Deactivating at the wrong time fails.
        assert!(matches!(
            w.deactivate(id, SimTime(5_001)),
            Err(DeviceError::WrongDeactivationTime { .. })
        ));
        w.deactivate(id, SimTime(5_000)).unwrap();
        assert!(!w.is_active());
        assert!(w.is_exhausted());
    }

    #[test]
    fn cursor_advances_across_multiple_windows() {
        let mut w = ActivationWindow::new(
            vec![(SimTime(100), SimTime(200)), (SimTime(500), SimTime(700))],
            SIM_START,
            SIM_END,
        );
        let id = DeviceId(2);

        w.activate(id, SimTime(100)).unwrap();
        w.deactivate(id, SimTime(200)).unwrap();
        assert_eq!(w.next_enable(), Some(SimTime(500)));

        w.activate(id, SimTime(500)).unwrap();
        assert_eq!(w.next_disable(), Some(SimTime(700)));
        w.deactivate(id, SimTime(700)).unwrap();
        assert!(w.is_exhausted());
    }

    #[test]
    fn activate_fails_while_already_active() {
        let mut w = ActivationWindow::always_on(SIM_START, SIM_END);
        let id = DeviceId(3);
        w.activate(id, SIM_START).unwrap();
        assert!(w.activate(id, SIM_START).is_err());
    }

    #[test]
    fn contains_is_half_open() {
        let w = ActivationWindow::new(vec![(SimTime(10), SimTime(20))], SIM_START, SIM_END);
        assert!(!w.contains(SimTime(9)));
        assert!(w.contains(SimTime(10)));
        assert!(w.contains(SimTime(19)));
        assert!(!w.contains(SimTime(20)));
    }

    #[test]
    fn pairs_are_sorted() {
        let w = ActivationWindow::new(
            vec![(SimTime(500), SimTime(600)), (SimTime(100), SimTime(200))],
            SIM_START,
            SIM_END,
        );
        let pairs: Vec<_> = w.pairs().collect();
        assert_eq!(pairs, vec![
            (SimTime(100), SimTime(200)),
            (SimTime(500), SimTime(600)),
        ]);
    }
}

// ── Strategies ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod strategies {
    use super::*;
    use crate::strategy::{
        AggregateComposer, Compression, DataComposer, DataSimplifier, MobilityModel,
        SensorComposer, Stationary, TraceMobility,
    };

    #[test]
    fn trace_mobility_floor_lookup() {
        let mut m = TraceMobility::new();
        m.extend(&[
            (SimTime(0),   GeoPosition::new(1.0, 1.0)),
            (SimTime(100), GeoPosition::new(2.0, 2.0)),
        ]);
        assert_eq!(m.advance(SimTime(50)).unwrap().lat, 1.0);
        assert_eq!(m.advance(SimTime(100)).unwrap().lat, 2.0);
        assert_eq!(m.advance(SimTime(999)).unwrap().lat, 2.0);
    }

    #[test]
    fn trace_mobility_no_fix_before_first_sample() {
        let mut m = TraceMobility::new();
        m.extend(&[(SimTime(100), GeoPosition::new(2.0, 2.0))]);
        assert!(m.advance(SimTime(50)).is_none());
    }

    #[test]
    fn stationary_holds_position_and_ignores_traces() {
        let mut m = Stationary::at(GeoPosition::new(3.0, 4.0));
        m.extend(&[(SimTime(0), GeoPosition::new(9.0, 9.0))]);
        assert_eq!(m.advance(SimTime(500)).unwrap().lat, 3.0);
        assert!(Stationary::unplaced().advance(SimTime(0)).is_none());
    }

    #[test]
    fn sensor_composer_charges_for_elapsed_time() {
        let mut c = SensorComposer::new(10.0);
        c.reset(SimTime(1_000));
        let p = c.compose(DeviceId(1), SimTime(1_100), &[]);
        assert_eq!(p.bytes, 1_000.0); // 10 B/s × 100 s

        let p2 = c.compose(DeviceId(1), SimTime(1_200), &[]);
        assert_eq!(p2.bytes, 1_000.0);
    }

    #[test]
    fn sensor_composer_reset_rearms_clock() {
        let mut c = SensorComposer::new(10.0);
        c.reset(SimTime(0));
        let _ = c.compose(DeviceId(1), SimTime(100), &[]);

        // Device deactivates at 100 and reactivates at 5000; the idle gap
        // must not be billed.
        c.reset(SimTime(5_000));
        let p = c.compose(DeviceId(1), SimTime(5_100), &[]);
        assert_eq!(p.bytes, 1_000.0);
    }

    #[test]
    fn aggregate_composer_sums_plus_overhead() {
        let mut c = AggregateComposer::new(64.0);
        let inputs = [
            Payload::new(DeviceId(1), SimTime(0), 100.0),
            Payload::new(DeviceId(2), SimTime(0), 200.0),
        ];
        let p = c.compose(DeviceId(9), SimTime(0), &inputs);
        assert_eq!(p.bytes, 364.0);
        assert_eq!(p.source, DeviceId(9));
    }

    #[test]
    fn aggregate_composer_empty_inputs() {
        let mut c = AggregateComposer::new(64.0);
        let p = c.compose(DeviceId(9), SimTime(0), &[]);
        assert_eq!(p.bytes, 0.0);
    }

    #[test]
    fn compression_divides() {
        let s = Compression::new(4.0);
        let p = s.simplify(Payload::new(DeviceId(1), SimTime(0), 400.0));
        assert_eq!(p.bytes, 100.0);
    }
}

// ── Device stages ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod stages {
    use super::*;

    #[test]
    fn vehicle_uplink_produces_uplink_and_sidelink() {
        let mut device = active_vehicle(1);
        let Device::Vehicle(v) = &mut device else { unreachable!() };

        v.uplink_stage(&ctx(100));
        let up = v.take_uplink().expect("uplink payload");
        let side = v.take_sidelink().expect("sidelink payload");

        // Default model: 1000 B/s × 100 s, compressed by 2 → 50 000 B.
        assert_eq!(up.bytes, 50_000.0);
        assert_eq!(side.bytes, 5_000.0); // 10 % sidelink fraction
        assert_eq!(up.source, DeviceId(1));

        // Taking twice yields nothing.
        assert!(v.take_uplink().is_none());
    }

    #[test]
    fn vehicle_downlink_drains_inbox() {
        let mut device = active_vehicle(1);
        let Device::Vehicle(v) = &mut device else { unreachable!() };

        v.deliver(Payload::new(DeviceId(9), SimTime(0), 300.0));
        v.deliver(Payload::new(DeviceId(8), SimTime(0), 200.0));
        v.downlink_stage(&ctx(100));

        assert_eq!(v.state.counters.payloads_down, 2);
        assert_eq!(v.state.counters.bytes_down, 500.0);
    }

    #[test]
    fn base_station_composes_pool_and_fans_out_response() {
        let mut device = make(
            DeviceKind::BaseStation,
            10,
            ActivationWindow::always_on(SIM_START, SIM_END),
        );
        device.activate(SIM_START).unwrap();
        let Device::BaseStation(b) = &mut device else { unreachable!() };

        b.receive_uplink(Payload::new(DeviceId(1), SimTime(100), 400.0));
        b.receive_uplink(Payload::new(DeviceId(2), SimTime(100), 800.0));
        b.uplink_stage(&ctx(100));

        // Each input compressed by 2 (200 + 400), plus 64 B overhead.
        let composed = b.take_composed().expect("composed payload");
        assert_eq!(composed.bytes, 664.0);
        assert_eq!(composed.source, DeviceId(10));

        // Controller response fans out evenly across the served devices.
        b.receive_response(Payload::new(DeviceId(99), SimTime(100), 100.0));
        b.downlink_stage(&ctx(100));
        let responses = b.take_responses();
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[&DeviceId(1)].bytes, 50.0);
        assert_eq!(responses[&DeviceId(2)].bytes, 50.0);
    }

    #[test]
    fn base_station_without_traffic_is_quiet() {
        let mut device = make(
            DeviceKind::BaseStation,
            10,
            ActivationWindow::always_on(SIM_START, SIM_END),
        );
        device.activate(SIM_START).unwrap();
        let Device::BaseStation(b) = &mut device else { unreachable!() };

        b.uplink_stage(&ctx(100));
        assert!(b.take_composed().is_none());
        b.downlink_stage(&ctx(100));
        assert!(b.take_responses().is_empty());
    }

    #[test]
    fn controller_responds_per_station() {
        let mut device = make(
            DeviceKind::Controller,
            20,
            ActivationWindow::always_on(SIM_START, SIM_END),
        );
        device.activate(SIM_START).unwrap();
        let Device::Controller(c) = &mut device else { unreachable!() };

        c.receive_ingest(Payload::new(DeviceId(10), SimTime(100), 1_000.0));
        c.receive_ingest(Payload::new(DeviceId(11), SimTime(100), 2_000.0));
        c.uplink_stage(&ctx(100));
        c.downlink_stage(&ctx(100));

        let responses = c.take_responses();
        assert_eq!(responses.len(), 2);
        let to_10 = responses.iter().find(|(id, _)| *id == DeviceId(10)).unwrap();
        assert_eq!(to_10.1.bytes, 50.0); // 5 % response factor
        assert_eq!(to_10.1.source, DeviceId(20));
    }

    #[test]
    fn roadside_unit_relays_pool() {
        let mut device = make(
            DeviceKind::RoadsideUnit,
            30,
            ActivationWindow::always_on(SIM_START, SIM_END),
        );
        device.activate(SIM_START).unwrap();
        let Device::Roadside(r) = &mut device else { unreachable!() };

        r.receive_uplink(Payload::new(DeviceId(1), SimTime(100), 200.0));
        r.uplink_stage(&ctx(100));

        let relay = r.take_relay().expect("relay payload");
        assert_eq!(relay.bytes, 164.0); // 200/2 + 64 overhead
        assert_eq!(relay.source, DeviceId(30));
        let side = r.take_sidelink().expect("sidelink payload");
        assert!((side.bytes - 16.4).abs() < 1e-9);
    }

    #[test]
    fn activation_resets_vehicle_rate_clock() {
        let mut device = make(
            DeviceKind::Vehicle,
            1,
            ActivationWindow::new(vec![(SimTime(1_000), SimTime(5_000))], SIM_START, SIM_END),
        );
        device.activate(SimTime(1_000)).unwrap();
        let Device::Vehicle(v) = &mut device else { unreachable!() };

        // First stage after activation: only the 100 s since activation are
        // billed, not the 1100 s since sim start.
        v.uplink_stage(&ctx(1_100));
        let up = v.take_uplink().unwrap();
        assert_eq!(up.bytes, 50_000.0); // 1000 B/s × 100 s ÷ 2
    }
}

// ── Registry ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod registry {
    use super::*;

    #[test]
    fn duplicate_insert_is_fatal() {
        let mut reg = DeviceRegistry::new();
        reg.insert(active_vehicle(1)).unwrap();
        assert!(matches!(
            reg.insert(active_vehicle(1)),
            Err(DeviceError::DuplicateDevice(DeviceId(1)))
        ));
    }

    #[test]
    fn typed_accessor_rejects_wrong_kind() {
        let mut reg = DeviceRegistry::new();
        reg.insert(active_vehicle(1)).unwrap();
        assert!(matches!(
            reg.base_station_mut(DeviceId(1)),
            Err(DeviceError::KindMismatch { .. })
        ));
        assert!(reg.vehicle_mut(DeviceId(1)).is_ok());
    }

    #[test]
    fn missing_device_reported() {
        let mut reg = DeviceRegistry::new();
        assert!(matches!(
            reg.get_mut(DeviceId(7)),
            Err(DeviceError::NotFound(DeviceId(7)))
        ));
    }

    #[test]
    fn ids_of_kind_sorted() {
        let mut reg = DeviceRegistry::new();
        for id in [5, 1, 3] {
            reg.insert(active_vehicle(id)).unwrap();
        }
        reg.insert(make(
            DeviceKind::BaseStation,
            2,
            ActivationWindow::always_on(SIM_START, SIM_END),
        ))
        .unwrap();

        assert_eq!(
            reg.ids_of_kind(DeviceKind::Vehicle),
            vec![DeviceId(1), DeviceId(3), DeviceId(5)]
        );
        assert_eq!(reg.ids_of_kind(DeviceKind::BaseStation), vec![DeviceId(2)]);
    }

    #[test]
    fn push_trace_fixes_infrastructure_position() {
        let mut reg = DeviceRegistry::new();
        reg.insert(make(
            DeviceKind::BaseStation,
            2,
            ActivationWindow::always_on(SIM_START, SIM_END),
        ))
        .unwrap();

        reg.push_trace(DeviceId(2), &[(SimTime(0), GeoPosition::new(1.5, 2.5))])
            .unwrap();
        let pos = reg.get(DeviceId(2)).unwrap().state().position.unwrap();
        assert_eq!(pos.lat, 1.5);
    }
}

// ── Factory ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod factory {
    use super::*;
    use crate::factory::DeviceModelConfig;
    use rustc_hash::FxHashMap;

    #[test]
    fn missing_model_fails_fast() {
        let mut models = FxHashMap::default();
        models.insert(DeviceKind::Vehicle, DeviceModelConfig::default());
        let factory = StandardFactory::new(models);

        assert!(factory
            .create(
                DeviceId(1),
                DeviceKind::Vehicle,
                ActivationWindow::always_on(SIM_START, SIM_END),
                None,
            )
            .is_ok());
        assert!(matches!(
            factory.create(
                DeviceId(2),
                DeviceKind::Controller,
                ActivationWindow::always_on(SIM_START, SIM_END),
                None,
            ),
            Err(DeviceError::MissingModel(DeviceKind::Controller))
        ));
    }

    #[test]
    fn creates_every_kind() {
        let factory = StandardFactory::with_defaults();
        for kind in DeviceKind::ALL {
            let d = factory
                .create(
                    DeviceId(kind as u32),
                    kind,
                    ActivationWindow::always_on(SIM_START, SIM_END),
                    None,
                )
                .unwrap();
            assert_eq!(d.kind(), kind);
        }
    }
}
