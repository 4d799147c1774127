//! Trajectory Indexer
//!
//! Groups observations by body, orders each group by time and aligns every
//! group to one shared timestamp axis. Frame assembly reads positions by
//! axis index, so alignment is verified here instead of being assumed.

use crate::error::{Result, VisError};
use crate::model::{Observation, Position, Timestamp};
use std::collections::{BTreeMap, BTreeSet};

/// Per-body position sequences aligned to a shared timestamp axis.
///
/// Built once from a table of observations; read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryIndex {
    /// Body identifiers, lexicographically sorted
    bodies: Vec<String>,
    
    /// Distinct timestamps, strictly ascending
    axis: Vec<Timestamp>,
    
    /// Trajectory per body, `trajectories[body][i]` is the position at `axis[i]`
    trajectories: BTreeMap<String, Vec<Position>>,
}

impl TrajectoryIndex {
    /// Builds the index, failing if any body misses or repeats a timestamp.
    pub fn build(observations: impl IntoIterator<Item = Observation>) -> Result<Self> {
        let mut groups: BTreeMap<String, Vec<(Timestamp, Position)>> = BTreeMap::new();
        let mut timestamps = BTreeSet::new();
        
        for observation in observations {
            // An equal key keeps the label seen first
            timestamps.insert(observation.timestamp.clone());
            groups
                .entry(observation.body)
                .or_default()
                .push((observation.timestamp, observation.position));
        }
        
        if groups.is_empty() {
            return Err(VisError::EmptyTable);
        }
        
        let axis: Vec<Timestamp> = timestamps.into_iter().collect();
        let mut trajectories = BTreeMap::new();
        
        for (body, mut rows) in groups {
            rows.sort_by(|(a, _), (b, _)| a.cmp(b));
            check_alignment(&body, &rows, &axis)?;
            trajectories.insert(body, rows.into_iter().map(|(_, position)| position).collect());
        }
        
        let bodies: Vec<String> = trajectories.keys().cloned().collect();
        
        tracing::info!("    Unique names: {}", bodies.len());
        tracing::info!("    Unique dates: {}", axis.len());
        
        Ok(Self {
            bodies,
            axis,
            trajectories,
        })
    }
    
    /// Returns body identifiers in their stable (sorted) order.
    pub fn bodies(&self) -> &[String] {
        &self.bodies
    }
    
    /// Returns the shared timestamp axis.
    pub fn axis(&self) -> &[Timestamp] {
        &self.axis
    }
    
    /// Returns the trajectory of a body.
    pub fn trajectory(&self, body: &str) -> Option<&[Position]> {
        self.trajectories.get(body).map(Vec::as_slice)
    }
    
    /// Returns where a body was at axis index `i`.
    pub fn position(&self, body: &str, i: usize) -> Option<Position> {
        self.trajectory(body).and_then(|t| t.get(i)).copied()
    }
    
    /// Iterates over `(body, trajectory)` pairs in body order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Position])> {
        self.trajectories
            .iter()
            .map(|(body, trajectory)| (body.as_str(), trajectory.as_slice()))
    }
    
    /// Number of timestamps on the axis.
    pub fn len(&self) -> usize {
        self.axis.len()
    }
    
    pub fn is_empty(&self) -> bool {
        self.axis.is_empty()
    }
    
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

/// Verifies that a body's sorted timestamps equal the axis index-for-index.
fn check_alignment(body: &str, rows: &[(Timestamp, Position)], axis: &[Timestamp]) -> Result<()> {
    let mismatch = rows
        .iter()
        .map(|(timestamp, _)| timestamp)
        .zip(axis)
        .position(|(found, expected)| found != expected);
    
    let detail = match mismatch {
        Some(i) if i > 0 && rows[i].0 == rows[i - 1].0 => {
            format!("duplicate observation at {}", rows[i].0)
        }
        Some(i) => format!("no observation at {}", axis[i]),
        None if rows.len() < axis.len() => format!("no observation at {}", axis[rows.len()]),
        None if rows.len() > axis.len() => {
            format!("duplicate observation at {}", rows[axis.len()].0)
        }
        None => return Ok(()),
    };
    
    Err(VisError::misaligned(body, axis.len(), rows.len(), detail))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TimeKey;
    use proptest::prelude::*;
    
    fn obs(body: &str, day: i64, x: f64) -> Observation {
        Observation::new(body, Timestamp::day(day as f64), Position::new(x, -x, x / 2.0))
    }
    
    #[test]
    fn test_groups_and_sorts_by_time() {
        let index = TrajectoryIndex::build(vec![
            obs("MARS", 3, 3.0),
            obs("EARTH", 2, 20.0),
            obs("MARS", 1, 1.0),
            obs("EARTH", 1, 10.0),
            obs("MARS", 2, 2.0),
            obs("EARTH", 3, 30.0),
        ])
        .unwrap();
        
        assert_eq!(index.bodies(), &["EARTH".to_string(), "MARS".to_string()]);
        assert_eq!(
            index.axis(),
            &[Timestamp::day(1.0), Timestamp::day(2.0), Timestamp::day(3.0)]
        );
        
        let xs: Vec<f64> = index.trajectory("MARS").unwrap().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![1.0, 2.0, 3.0]);
        assert_eq!(index.position("EARTH", 2).unwrap().x, 30.0);
        assert!(index.position("EARTH", 3).is_none());
        assert!(index.trajectory("PLUTO").is_none());
    }
    
    #[test]
    fn test_missing_observation_is_misaligned() {
        let err = TrajectoryIndex::build(vec![
            obs("SUN", 1, 0.0),
            obs("SUN", 2, 0.0),
            obs("EARTH", 1, 1.0),
        ])
        .unwrap_err();
        
        match err {
            VisError::MisalignedTrajectory { body, expected, found, detail } => {
                assert_eq!(body, "EARTH");
                assert_eq!(expected, 2);
                assert_eq!(found, 1);
                assert_eq!(detail, "no observation at 2");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
    
    #[test]
    fn test_duplicate_with_gap_is_misaligned() {
        // Same count as the axis, but day 2 is doubled and day 3 is missing
        let err = TrajectoryIndex::build(vec![
            obs("SUN", 1, 0.0),
            obs("SUN", 2, 0.0),
            obs("SUN", 3, 0.0),
            obs("MOON", 1, 1.0),
            obs("MOON", 2, 1.0),
            obs("MOON", 2, 1.5),
        ])
        .unwrap_err();
        
        match err {
            VisError::MisalignedTrajectory { body, expected, found, detail } => {
                assert_eq!(body, "MOON");
                assert_eq!(expected, found);
                assert_eq!(detail, "duplicate observation at 2");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
    
    #[test]
    fn test_trailing_duplicate_is_misaligned() {
        let err = TrajectoryIndex::build(vec![
            obs("SUN", 1, 0.0),
            obs("SUN", 1, 0.1),
        ])
        .unwrap_err();
        
        assert!(matches!(
            err,
            VisError::MisalignedTrajectory { expected: 1, found: 2, .. }
        ));
    }
    
    #[test]
    fn test_equal_instants_share_first_label() {
        let at = |raw: &str| raw.parse::<Timestamp>().unwrap();
        let index = TrajectoryIndex::build(vec![
            Observation::new("SUN", at("2024-01-01T00:00:00Z"), Position::zeros()),
            Observation::new("MOON", at("2024-01-01T01:00:00+01:00"), Position::zeros()),
        ])
        .unwrap();
        
        assert_eq!(index.len(), 1);
        assert_eq!(index.axis()[0].label(), "2024-01-01T00:00:00Z");
    }
    
    #[test]
    fn test_empty_input() {
        let err = TrajectoryIndex::build(Vec::new()).unwrap_err();
        assert!(matches!(err, VisError::EmptyTable));
    }
    
    /// Complete (body x day) grids in arbitrary row order.
    fn grid() -> impl Strategy<Value = (usize, usize, Vec<Observation>)> {
        (
            prop::collection::btree_set("[A-Z]{1,6}", 1..5),
            prop::collection::btree_set(-1000i64..1000, 1..20),
        )
            .prop_flat_map(|(bodies, days)| {
                let rows: Vec<Observation> = bodies
                    .iter()
                    .flat_map(|b| days.iter().map(move |d| obs(b, *d, *d as f64)))
                    .collect();
                (Just(bodies.len()), Just(days.len()), Just(rows).prop_shuffle())
            })
    }
    
    proptest! {
        #[test]
        fn prop_axis_strictly_ascending((n_bodies, n_days, rows) in grid()) {
            let index = TrajectoryIndex::build(rows).unwrap();
            
            prop_assert_eq!(index.len(), n_days);
            prop_assert_eq!(index.body_count(), n_bodies);
            prop_assert!(index.axis().windows(2).all(|w| w[0] < w[1]));
            for (_, trajectory) in index.iter() {
                prop_assert_eq!(trajectory.len(), index.len());
            }
        }
        
        #[test]
        fn prop_positions_follow_axis((_b, _d, rows) in grid()) {
            let index = TrajectoryIndex::build(rows).unwrap();
            
            for (_, trajectory) in index.iter() {
                for (position, timestamp) in trajectory.iter().zip(index.axis()) {
                    match timestamp.key() {
                        TimeKey::Day(day) => prop_assert_eq!(position.x, day.into_inner()),
                        other => prop_assert!(false, "unexpected timestamp {:?}", other),
                    }
                }
            }
        }
        
        #[test]
        fn prop_build_is_idempotent((_b, _d, rows) in grid()) {
            let first = TrajectoryIndex::build(rows.clone()).unwrap();
            let second = TrajectoryIndex::build(rows).unwrap();
            prop_assert_eq!(first, second);
        }
        
        #[test]
        fn prop_dropped_row_is_detected(
            (n_bodies, _d, mut rows) in grid(),
            victim in any::<prop::sample::Index>(),
        ) {
            // With a single body, dropping a row just shortens the axis
            prop_assume!(n_bodies > 1);
            rows.remove(victim.index(rows.len()));
            
            let result = TrajectoryIndex::build(rows);
            let is_misaligned = matches!(result, Err(VisError::MisalignedTrajectory { .. }));
            prop_assert!(is_misaligned);
        }
    }
}
