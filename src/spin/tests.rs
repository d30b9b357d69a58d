#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};
    use strum::IntoEnumIterator;

    use crate::{
        error::SpinError,
        item::{default_items, Item},
        resolver::{resolve, segment_angle},
        spin::{
            DecelerationTier, SpinObserver, SpinPhysics, SpinResult, TickEvent, WheelState,
            INITIAL_VELOCITY_MAX, INITIAL_VELOCITY_MIN,
        },
    };

    #[derive(Default)]
    struct Recorder {
        starts: u32,
        ticks: Vec<TickEvent>,
        results: Vec<SpinResult>,
    }

    impl SpinObserver for Recorder {
        fn on_spin_start(&mut self) {
            self.starts += 1;
        }

        fn on_tick(&mut self, tick: &TickEvent) {
            self.ticks.push(*tick);
        }

        fn on_spin_end(&mut self, result: &SpinResult) {
            self.results.push(result.clone());
        }
    }

    fn wheel(count: usize) -> WheelState {
        let items: Vec<Item> = default_items().into_iter().cycle().take(count).collect();
        WheelState::new(items, SpinPhysics::default()).unwrap()
    }

    /// Runs until the wheel stops, returning the number of frames stepped.
    fn run_to_end(state: &mut WheelState, observer: &mut Recorder, limit: u32) -> u32 {
        let mut frames = 0;
        while state.is_spinning() && frames < limit {
            state.step_frame(observer);
            frames += 1;
        }
        frames
    }

    /// Upper bound on frames, summed over the three deceleration tiers.
    fn frame_bound(physics: &SpinPhysics, initial: f64) -> u32 {
        let phase = |from: f64, to: f64, factor: f64| {
            if from < to {
                0
            } else {
                ((to / from).ln() / factor.ln()).ceil() as u32 + 1
            }
        };
        phase(initial, physics.coast_threshold, physics.coast_factor)
            + phase(
                initial.min(physics.coast_threshold),
                physics.brake_threshold,
                physics.brake_factor,
            )
            + phase(
                initial.min(physics.brake_threshold),
                physics.min_velocity,
                physics.snap_factor,
            )
    }

    #[test]
    fn test_deceleration_tiers() {
        let physics = SpinPhysics::default();
        assert_eq!(physics.tier(0.9), DecelerationTier::Coast);
        assert_eq!(physics.tier(0.08), DecelerationTier::Coast);
        assert_eq!(physics.tier(0.0799), DecelerationTier::Brake);
        assert_eq!(physics.tier(0.03), DecelerationTier::Brake);
        assert_eq!(physics.tier(0.0299), DecelerationTier::Snap);
        assert_eq!(physics.factor(DecelerationTier::Coast), 0.993);
        assert_eq!(physics.factor(DecelerationTier::Brake), 0.97);
        assert_eq!(physics.factor(DecelerationTier::Snap), 0.92);
        assert_eq!(DecelerationTier::iter().count(), 3);
        assert_eq!(DecelerationTier::Brake.to_string(), "Brake");
    }

    #[test]
    fn test_new_rejects_single_item() {
        let items = default_items().into_iter().take(1).collect();
        assert!(matches!(
            WheelState::new(items, SpinPhysics::default()),
            Err(SpinError::TooFewItems { count: 1, .. })
        ));
    }

    #[test]
    fn test_termination_bound() {
        let physics = SpinPhysics::default();
        let worst = frame_bound(&physics, INITIAL_VELOCITY_MAX);
        assert!(worst <= 420, "bound {}", worst);
        for n in [2, 3, 8, 13, 50] {
            let mut v = INITIAL_VELOCITY_MIN;
            while v <= INITIAL_VELOCITY_MAX {
                let mut state = wheel(n);
                let mut recorder = Recorder::default();
                state.begin_spin_with_velocity(v, &mut recorder).unwrap();
                let frames = run_to_end(&mut state, &mut recorder, 10_000);
                assert!(!state.is_spinning(), "still spinning at v0 = {}", v);
                assert!(frames <= frame_bound(&physics, v), "v0 = {}: {}", v, frames);
                assert!(frames <= worst);
                v += 0.05;
            }
        }
    }

    #[test]
    fn test_fixed_velocity_is_deterministic() {
        let mut state = wheel(8);
        let mut recorder = Recorder::default();
        state.begin_spin_with_velocity(0.6, &mut recorder).unwrap();
        assert_eq!(run_to_end(&mut state, &mut recorder, 1_000), 356);
        let result = &recorder.results[0];
        assert_eq!(result.frames, 356);
        assert_eq!(result.index, 4);
        assert_eq!(result.winning_item.label, "Uno");
        assert_eq!(result.final_rotation, state.rotation());
        assert_eq!(recorder.ticks.len(), 97);
    }

    #[test]
    fn test_slowest_and_fastest_spin() {
        let mut state = wheel(8);
        let mut recorder = Recorder::default();
        state.begin_spin_with_velocity(0.45, &mut recorder).unwrap();
        assert_eq!(run_to_end(&mut state, &mut recorder, 1_000), 315);
        assert_eq!(recorder.results[0].index, 0);

        let mut state = wheel(8);
        let mut recorder = Recorder::default();
        state.begin_spin_with_velocity(0.9, &mut recorder).unwrap();
        assert_eq!(run_to_end(&mut state, &mut recorder, 1_000), 414);
        assert_eq!(recorder.results[0].index, 6);
        assert_eq!(recorder.ticks.len(), 150);
    }

    #[test]
    fn test_single_resolution() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut state = wheel(5);
        let mut recorder = Recorder::default();
        for spin in 1..=4 {
            state.begin_spin(&mut rng, &mut recorder).unwrap();
            let mut results = 0;
            for _ in 0..1_000 {
                if state.step_frame(&mut recorder).is_some() {
                    results += 1;
                }
            }
            assert_eq!(results, 1);
            assert_eq!(recorder.starts, spin);
            assert_eq!(recorder.results.len(), spin as usize);
        }
    }

    #[test]
    fn test_step_while_idle_is_noop() {
        let mut state = wheel(4);
        let mut recorder = Recorder::default();
        assert_eq!(state.step_frame(&mut recorder), None);
        assert_eq!(state.rotation(), 0.0);
        assert!(recorder.ticks.is_empty());
        assert!(recorder.results.is_empty());
    }

    #[test]
    fn test_reentrant_begin_is_rejected() {
        let mut state = wheel(8);
        let mut recorder = Recorder::default();
        state.begin_spin_with_velocity(0.7, &mut recorder).unwrap();
        state.step_frame(&mut recorder);
        let velocity = state.velocity();
        let rotation = state.rotation();

        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            state.begin_spin(&mut rng, &mut recorder),
            Err(SpinError::AlreadySpinning)
        );
        assert_eq!(
            state.begin_spin_with_velocity(0.9, &mut recorder),
            Err(SpinError::AlreadySpinning)
        );
        assert_eq!(state.velocity(), velocity);
        assert_eq!(state.rotation(), rotation);
        assert_eq!(recorder.starts, 1);
    }

    #[test]
    fn test_items_locked_while_spinning() {
        let mut state = wheel(8);
        state.begin_spin_with_velocity(0.5, &mut ()).unwrap();
        assert_eq!(
            state.set_items(default_items().into_iter().take(3).collect()),
            Err(SpinError::ItemsLocked)
        );
        assert_eq!(state.items().len(), 8);
        assert_eq!(
            state.set_physics(SpinPhysics::default()),
            Err(SpinError::AlreadySpinning)
        );
        while state.is_spinning() {
            state.step_frame(&mut ());
        }
        state
            .set_items(default_items().into_iter().take(3).collect())
            .unwrap();
        assert_eq!(state.items().len(), 3);
        assert!(matches!(
            state.set_items(Vec::new()),
            Err(SpinError::TooFewItems { count: 0, .. })
        ));
    }

    #[test]
    fn test_rotation_is_one_directional() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut state = wheel(6);
        let mut recorder = Recorder::default();
        state.begin_spin(&mut rng, &mut recorder).unwrap();
        let mut previous = state.rotation();
        while state.is_spinning() {
            state.step_frame(&mut recorder);
            assert!(state.rotation() >= previous);
            previous = state.rotation();
        }
    }

    #[test]
    fn test_rotation_carries_over_between_spins() {
        let mut state = wheel(8);
        state.begin_spin_with_velocity(0.6, &mut ()).unwrap();
        while state.is_spinning() {
            state.step_frame(&mut ());
        }
        let after_first = state.rotation();
        assert!(after_first > 0.0);

        let mut recorder = Recorder::default();
        state.begin_spin_with_velocity(0.45, &mut recorder).unwrap();
        assert_eq!(state.rotation(), after_first);
        run_to_end(&mut state, &mut recorder, 1_000);
        let result = &recorder.results[0];
        assert_eq!(result.frames, 315);
        assert_eq!(result.index, 6);
        assert_eq!(recorder.ticks.len(), 70);
    }

    #[test]
    fn test_tick_count_bounded_by_rotation() {
        let mut rng = StdRng::seed_from_u64(1234);
        for n in [2, 3, 8, 20, 64] {
            let mut state = wheel(n);
            for _ in 0..3 {
                let mut recorder = Recorder::default();
                let start = state.rotation();
                state.begin_spin(&mut rng, &mut recorder).unwrap();
                run_to_end(&mut state, &mut recorder, 1_000);
                let turned = state.rotation() - start;
                let bound = turned / segment_angle(n) + 1.0;
                assert!(
                    (recorder.ticks.len() as f64) <= bound,
                    "{} ticks over {} segments",
                    recorder.ticks.len(),
                    bound
                );
                assert!(!recorder.ticks.is_empty());
            }
        }
    }

    #[test]
    fn test_ticks_grow_with_duration() {
        let mut previous = 0;
        let mut v = INITIAL_VELOCITY_MIN;
        while v <= INITIAL_VELOCITY_MAX {
            let mut state = wheel(8);
            let mut recorder = Recorder::default();
            state.begin_spin_with_velocity(v, &mut recorder).unwrap();
            run_to_end(&mut state, &mut recorder, 1_000);
            assert!(recorder.ticks.len() >= previous);
            previous = recorder.ticks.len();
            v += 0.05;
        }
    }

    #[test]
    fn test_tick_velocity_decreases() {
        let mut state = wheel(8);
        let mut recorder = Recorder::default();
        state.begin_spin_with_velocity(0.8, &mut recorder).unwrap();
        run_to_end(&mut state, &mut recorder, 1_000);
        for pair in recorder.ticks.windows(2) {
            assert!(pair[1].velocity < pair[0].velocity);
            assert!(pair[1].segment > pair[0].segment);
        }
    }

    #[test]
    fn test_tick_feedback_scaling() {
        let tick = TickEvent {
            velocity: 0.1,
            segment: 3,
        };
        assert!((tick.pitch_hz() - 170.0).abs() < 1e-9);
        assert!((tick.intensity() - 0.5).abs() < 1e-9);
        let fast = TickEvent {
            velocity: 0.8,
            segment: 3,
        };
        assert_eq!(fast.intensity(), 1.0);
    }

    #[test]
    fn test_random_velocity_in_range() {
        let physics = SpinPhysics::default();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..1_000 {
            let v = physics.random_velocity(&mut rng);
            assert!((INITIAL_VELOCITY_MIN..=INITIAL_VELOCITY_MAX).contains(&v));
        }
    }

    #[test]
    fn test_explicit_velocity_is_clamped() {
        let mut state = wheel(4);
        state.begin_spin_with_velocity(5.0, &mut ()).unwrap();
        assert_eq!(state.velocity(), INITIAL_VELOCITY_MAX);
        while state.is_spinning() {
            state.step_frame(&mut ());
        }
        state.begin_spin_with_velocity(f64::NAN, &mut ()).unwrap();
        assert_eq!(state.velocity(), INITIAL_VELOCITY_MIN);
    }

    #[test]
    fn test_result_matches_resolver() {
        let mut rng = StdRng::seed_from_u64(77);
        let mut state = wheel(7);
        for _ in 0..10 {
            let mut recorder = Recorder::default();
            state.begin_spin(&mut rng, &mut recorder).unwrap();
            run_to_end(&mut state, &mut recorder, 1_000);
            let result = &recorder.results[0];
            assert_eq!(result.index, resolve(state.rotation(), 7));
            assert_eq!(&result.winning_item, &state.items()[result.index]);
        }
    }

    #[test]
    fn test_sanitized_physics_terminates() {
        let physics = SpinPhysics {
            coast_factor: 1.5,
            brake_factor: f64::NAN,
            min_velocity: 0.0,
            initial_velocity_min: 0.9,
            initial_velocity_max: 0.45,
            ..SpinPhysics::default()
        }
        .sanitized();
        assert!(physics.coast_factor < 1.0);
        assert!(physics.brake_factor < 1.0);
        assert!(physics.min_velocity > 0.0);
        assert!(physics.initial_velocity_min <= physics.initial_velocity_max);

        let items = default_items();
        let mut state = WheelState::new(items, physics).unwrap();
        state.begin_spin_with_velocity(0.9, &mut ()).unwrap();
        let mut frames = 0;
        while state.is_spinning() && frames < 100_000 {
            state.step_frame(&mut ());
            frames += 1;
        }
        assert!(!state.is_spinning());
    }

    #[test]
    fn test_snapshot() {
        let mut state = wheel(3);
        state.begin_spin_with_velocity(0.5, &mut ()).unwrap();
        state.step_frame(&mut ());
        let snapshot = state.snapshot();
        assert!(snapshot.spinning);
        assert_eq!(snapshot.rotation, 0.5);
        assert_eq!(snapshot.segment_count, 3);
        assert!(snapshot.velocity < 0.5);
    }
}
