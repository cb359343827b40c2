//! Lane scheduling
//!
//! Lanes are picked one event at a time in hit order. Two pieces of state carry
//! from event to event and are kept in an explicit [`ScheduleState`] value:
//!
//! - the previous lane, which biases the next pick toward its neighbours
//! - how long each lane stays occupied by a hold
//!
//! All randomness comes from the generator passed in, so a seeded generator gives a
//! reproducible chart.

use rand::Rng;

use super::types::{Event, LANE_COUNT};

/// Lane-choice state threaded from one event to the next
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleState {
    pub previous_lane: Option<usize>,
    /// Time until which each lane is held
    pub busy_until: [f64; LANE_COUNT],
}

impl Default for ScheduleState {
    fn default() -> Self {
        Self {
            previous_lane: None,
            busy_until: [0.0; LANE_COUNT],
        }
    }
}

impl ScheduleState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State for the next stage: holds never cross a stage boundary, but the
    /// previous lane does.
    pub fn next_stage(self) -> Self {
        Self {
            previous_lane: self.previous_lane,
            busy_until: [0.0; LANE_COUNT],
        }
    }
}

/// Pick a lane for an event at `time`.
///
/// Lanes whose hold has ended by `time` are available; if none are, every lane is.
/// Without a usable previous lane the pick is uniform over the available lanes.
/// Otherwise each available lane `l` is weighted
/// `(1 - jumpiness) / (1 + |l - previous|) + jumpiness`, which stays near the
/// previous lane at `jumpiness = 0` and approaches uniform at `jumpiness = 1`.
pub fn assign_lane<R: Rng + ?Sized>(
    rng: &mut R,
    previous_lane: Option<usize>,
    lane_busy_until: &[f64; LANE_COUNT],
    time: f64,
    jumpiness: f64,
) -> usize {
    let mut available: Vec<usize> = (0..LANE_COUNT)
        .filter(|&lane| lane_busy_until[lane] <= time)
        .collect();
    if available.is_empty() {
        available = (0..LANE_COUNT).collect();
    }

    let previous = match previous_lane {
        Some(lane) if available.contains(&lane) => lane,
        _ => return available[rng.random_range(0..available.len())],
    };

    let weights: Vec<f64> = available
        .iter()
        .map(|&lane| {
            let distance = lane.abs_diff(previous) as f64;
            (1.0 - jumpiness) / (1.0 + distance) + jumpiness
        })
        .collect();

    let total: f64 = weights.iter().sum();
    let mut roll = rng.random::<f64>() * total;
    for (&lane, &weight) in available.iter().zip(&weights) {
        if roll < weight {
            return lane;
        }
        roll -= weight;
    }
    available[available.len() - 1]
}

/// Schedule one event: pick its lane and return the updated state.
///
/// The chosen lane becomes the previous lane. A hold also occupies its lane until
/// its end time; taps never block a lane.
pub fn schedule<R: Rng + ?Sized>(
    rng: &mut R,
    state: ScheduleState,
    event: &Event,
    jumpiness: f64,
) -> (usize, ScheduleState) {
    let lane = assign_lane(rng, state.previous_lane, &state.busy_until, event.hit, jumpiness);

    let mut next = state;
    next.previous_lane = Some(lane);
    if event.is_hold() {
        next.busy_until[lane] = next.busy_until[lane].max(event.end);
    }
    (lane, next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    const TRIALS: usize = 10_000;

    #[test]
    fn test_jumpiness_zero_prefers_nearby_lanes() {
        let mut rng = Pcg64::seed_from_u64(7);
        let mut counts = [0usize; LANE_COUNT];
        for _ in 0..TRIALS {
            let lane = assign_lane(&mut rng, Some(0), &[0.0; LANE_COUNT], 1.0, 0.0);
            counts[lane] += 1;
        }
        // weights 1, 1/2, 1/3, 1/4
        assert!(counts[0] > counts[2], "{:?}", counts);
        assert!(counts[0] > counts[1]);
        assert!(counts[1] > counts[3]);
    }

    #[test]
    fn test_only_available_lanes_are_chosen() {
        let mut rng = Pcg64::seed_from_u64(11);
        let busy = [0.0, 5.0, 5.0, 0.0];
        for _ in 0..1_000 {
            let lane = assign_lane(&mut rng, Some(0), &busy, 3.0, 0.0);
            assert!(lane == 0 || lane == 3);
        }
    }

    #[test]
    fn test_lane_frees_at_busy_time() {
        let mut rng = Pcg64::seed_from_u64(3);
        let busy = [2.0, 2.0, 2.0, 9.0];
        for _ in 0..200 {
            let lane = assign_lane(&mut rng, None, &busy, 2.0, 0.5);
            assert_ne!(lane, 3);
        }
    }

    #[test]
    fn test_busy_previous_lane_falls_back_to_uniform() {
        let mut rng = Pcg64::seed_from_u64(5);
        let busy = [0.0, 9.0, 0.0, 0.0];
        let mut counts = [0usize; LANE_COUNT];
        for _ in 0..TRIALS {
            counts[assign_lane(&mut rng, Some(1), &busy, 1.0, 0.0)] += 1;
        }
        assert_eq!(counts[1], 0);
        for lane in [0, 2, 3] {
            // uniform over three lanes: expect ~3333 each
            assert!(counts[lane] > 2_900 && counts[lane] < 3_800, "{:?}", counts);
        }
    }

    #[test]
    fn test_all_busy_makes_every_lane_eligible() {
        let mut rng = Pcg64::seed_from_u64(9);
        let busy = [10.0; LANE_COUNT];
        let mut seen = [false; LANE_COUNT];
        for _ in 0..500 {
            seen[assign_lane(&mut rng, None, &busy, 1.0, 0.0)] = true;
        }
        assert_eq!(seen, [true; LANE_COUNT]);
    }

    #[test]
    fn test_full_jumpiness_is_uniform() {
        let mut rng = Pcg64::seed_from_u64(13);
        let mut counts = [0usize; LANE_COUNT];
        for _ in 0..TRIALS {
            counts[assign_lane(&mut rng, Some(0), &[0.0; LANE_COUNT], 1.0, 1.0)] += 1;
        }
        for count in counts {
            assert!(count > 2_200 && count < 2_800, "{:?}", counts);
        }
    }

    #[test]
    fn test_schedule_blocks_lane_for_holds_only() {
        let mut rng = Pcg64::seed_from_u64(1);
        let state = ScheduleState::new();

        let (lane, state) = schedule(&mut rng, state, &Event::tap(1.0), 0.2);
        assert_eq!(state.previous_lane, Some(lane));
        assert_eq!(state.busy_until, [0.0; LANE_COUNT]);

        let (lane, state) = schedule(&mut rng, state, &Event::hold(2.0, 3.5), 0.2);
        assert_eq!(state.previous_lane, Some(lane));
        assert_eq!(state.busy_until[lane], 3.5);

        // the held lane is unavailable while the hold lasts
        for _ in 0..200 {
            let (next_lane, _) = schedule(&mut rng, state, &Event::tap(3.0), 0.0);
            assert_ne!(next_lane, lane);
        }
    }

    #[test]
    fn test_next_stage_keeps_previous_lane_only() {
        let state = ScheduleState {
            previous_lane: Some(2),
            busy_until: [0.0, 4.0, 0.0, 8.0],
        };
        let next = state.next_stage();
        assert_eq!(next.previous_lane, Some(2));
        assert_eq!(next.busy_until, [0.0; LANE_COUNT]);
    }

    #[test]
    fn test_same_seed_same_lanes() {
        let pick = |seed| {
            let mut rng = Pcg64::seed_from_u64(seed);
            let mut state = ScheduleState::new();
            let mut lanes = Vec::new();
            for i in 0..100 {
                let (lane, next) = schedule(&mut rng, state, &Event::tap(i as f64 * 0.5), 0.3);
                lanes.push(lane);
                state = next;
            }
            lanes
        };
        assert_eq!(pick(42), pick(42));
    }
}
