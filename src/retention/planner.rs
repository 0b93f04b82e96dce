//! Deletion planning

use crate::logging::Logger;
use crate::registry::ManifestRecord;

pub struct RetentionPlanner {
    output: Logger,
}

impl RetentionPlanner {
    pub fn new(output: Logger) -> Self {
        Self { output }
    }

    /// Return the manifests to delete: everything after the `keep` most recently uploaded.
    ///
    /// Candidates come back newest first. Manifests with equal upload times keep their
    /// relative input order.
    pub fn plan(&self, mut manifests: Vec<ManifestRecord>, keep: usize) -> Vec<ManifestRecord> {
        if manifests.len() <= keep {
            self.output.info(&format!(
                "There are no images to delete ({} manifests, keeping {})",
                manifests.len(),
                keep
            ));
            return Vec::new();
        }

        // sort_by is stable
        manifests.sort_by(|a, b| b.time_uploaded_ms.cmp(&a.time_uploaded_ms));
        let candidates = manifests.split_off(keep);

        self.output.info(&format!(
            "Keeping {} of {} manifests, {} to delete",
            manifests.len(),
            manifests.len() + candidates.len(),
            candidates.len()
        ));
        for kept in &manifests {
            self.output
                .detail(&format!("keep {} {:?}", kept.digest, kept.tags));
        }

        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planner() -> RetentionPlanner {
        RetentionPlanner::new(Logger::new(false))
    }

    fn digests(records: &[ManifestRecord]) -> Vec<&str> {
        records.iter().map(|r| r.digest.as_str()).collect()
    }

    #[test]
    fn drops_most_recent_and_returns_rest_newest_first() {
        let manifests = vec![
            ManifestRecord::new("a", 300),
            ManifestRecord::new("b", 100),
            ManifestRecord::new("c", 200),
        ];

        let candidates = planner().plan(manifests, 1);
        assert_eq!(digests(&candidates), vec!["c", "b"]);
        assert_eq!(candidates[0].time_uploaded_ms, 200);
        assert_eq!(candidates[1].time_uploaded_ms, 100);
    }

    #[test]
    fn nothing_to_delete_when_keep_covers_everything() {
        let manifests = vec![ManifestRecord::new("a", 1), ManifestRecord::new("b", 2)];
        assert!(planner().plan(manifests.clone(), 2).is_empty());
        assert!(planner().plan(manifests, 50).is_empty());
        assert!(planner().plan(Vec::new(), 1).is_empty());
    }

    #[test]
    fn equal_timestamps_keep_input_order() {
        let manifests = vec![
            ManifestRecord::new("new", 500),
            ManifestRecord::new("tie-1", 100),
            ManifestRecord::new("tie-2", 100),
            ManifestRecord::new("tie-3", 100),
        ];

        let candidates = planner().plan(manifests, 2);
        assert_eq!(digests(&candidates), vec!["tie-2", "tie-3"]);
    }

    #[test]
    fn candidate_count_and_age_hold_for_any_keep() {
        let manifests: Vec<_> = (0..10u64)
            .map(|i| ManifestRecord::new(format!("sha256:{i}"), (i * 37) % 11))
            .collect();

        for keep in 1..=12 {
            let candidates = planner().plan(manifests.clone(), keep);
            assert_eq!(candidates.len(), manifests.len().saturating_sub(keep));

            let newest_deleted = candidates.iter().map(|c| c.time_uploaded_ms).max();
            let retained: Vec<_> = manifests
                .iter()
                .filter(|m| !candidates.contains(m))
                .collect();
            assert_eq!(retained.len(), manifests.len().min(keep));
            if let Some(newest_deleted) = newest_deleted {
                assert!(retained.iter().all(|m| m.time_uploaded_ms > newest_deleted));
            }
        }
    }
}
