use sonance_state::TrackId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Neighbor {
    Prev,
    Next,
}

/// Finds the track before or after `center` in `ordered_tracks`, wrapping
/// around at both ends. A single-track view is its own neighbour.
///
/// Returns `None` if the view is empty or `center` is not part of it.
pub fn compute_neighbor(
    ordered_tracks: &[TrackId],
    center: TrackId,
    dir: Neighbor,
) -> Option<TrackId> {
    let len = ordered_tracks.len();
    let idx = ordered_tracks.iter().position(|s| *s == center)?;
    let neighbor_idx = match dir {
        Neighbor::Prev => (idx + len - 1) % len,
        Neighbor::Next => (idx + 1) % len,
    };
    ordered_tracks.get(neighbor_idx).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(ids: &[u64]) -> Vec<TrackId> {
        ids.iter().copied().map(TrackId).collect()
    }

    #[test]
    fn test_next_and_previous_wrap_around() {
        let v = view(&[1, 2, 3]);
        assert_eq!(
            compute_neighbor(&v, TrackId(2), Neighbor::Next),
            Some(TrackId(3))
        );
        assert_eq!(
            compute_neighbor(&v, TrackId(3), Neighbor::Next),
            Some(TrackId(1))
        );
        assert_eq!(
            compute_neighbor(&v, TrackId(1), Neighbor::Prev),
            Some(TrackId(3))
        );
    }

    #[test]
    fn test_next_n_times_returns_to_start() {
        for len in 1..=6u64 {
            let v: Vec<_> = (10..10 + len).map(TrackId).collect();
            for start in &v {
                let mut current = *start;
                for _ in 0..len {
                    current = compute_neighbor(&v, current, Neighbor::Next).unwrap();
                }
                assert_eq!(current, *start, "len={len}");
            }
        }
    }

    #[test]
    fn test_next_then_previous_is_identity() {
        let v = view(&[5, 8, 13, 21]);
        for start in &v {
            let next = compute_neighbor(&v, *start, Neighbor::Next).unwrap();
            assert_eq!(
                compute_neighbor(&v, next, Neighbor::Prev),
                Some(*start)
            );
        }
    }

    #[test]
    fn test_single_track_is_its_own_neighbor() {
        let v = view(&[7]);
        assert_eq!(
            compute_neighbor(&v, TrackId(7), Neighbor::Next),
            Some(TrackId(7))
        );
        assert_eq!(
            compute_neighbor(&v, TrackId(7), Neighbor::Prev),
            Some(TrackId(7))
        );
    }

    #[test]
    fn test_empty_view_or_missing_track_has_no_neighbor() {
        assert_eq!(compute_neighbor(&[], TrackId(1), Neighbor::Next), None);
        assert_eq!(
            compute_neighbor(&view(&[1, 2]), TrackId(3), Neighbor::Prev),
            None
        );
    }
}
