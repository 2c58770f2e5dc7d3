use std::path::Path;

use tracing::debug;

/// Decides whether a walk may climb past the level it just scanned.
///
/// Ascent stops once `max_depth` ascents have happened, or after scanning a
/// level that contains one of the `stop_at` markers (e.g. `.git`).
/// Feed it to [`walk_up_guarded`](crate::walk_up_guarded) as `|dir| guard.allow(dir)`.
#[derive(Debug, Clone, Default)]
pub struct AscentGuard {
    max_depth: Option<usize>,
    stop_at: Vec<String>,
    ascents: usize,
}

impl AscentGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Depth 0 scans only the starting level.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn stop_at<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop_at.extend(markers.into_iter().map(Into::into));
        self
    }

    pub fn allow(&mut self, dir: &Path) -> bool {
        if let Some(marker) = self.stop_at.iter().find(|m| dir.join(m).exists()) {
            debug!(dir = %dir.display(), marker = %marker, "boundary reached");
            return false;
        }
        if self.max_depth.is_some_and(|max| self.ascents >= max) {
            debug!(dir = %dir.display(), ascents = self.ascents, "depth limit reached");
            return false;
        }
        self.ascents += 1;
        true
    }

    pub fn ascents(&self) -> usize {
        self.ascents
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TempTree;
    use crate::walk_up_guarded;

    fn find(start: &Path, name: &str, guard: &mut AscentGuard) -> Option<std::path::PathBuf> {
        walk_up_guarded(start, |p| p.ends_with(name), |dir| guard.allow(dir)).unwrap()
    }

    #[test]
    fn default_guard_always_allows() {
        let tmp = TempTree::new("guard-default");
        let mut guard = AscentGuard::new();
        assert!(guard.allow(&tmp));
        assert!(guard.allow(&tmp));
        assert_eq!(guard.ascents(), 2);
    }

    #[test]
    fn stops_at_git_boundary() {
        let tmp = TempTree::new("guard-git");
        tmp.touch("target.txt");
        tmp.mkdir("project/.git");
        let subdir = tmp.mkdir("project/src");

        let mut guard = AscentGuard::new().stop_at([".git"]);
        assert_eq!(find(&subdir, "target.txt", &mut guard), None);
        assert_eq!(guard.ascents(), 1);
    }

    #[test]
    fn boundary_level_is_still_scanned() {
        let tmp = TempTree::new("guard-git-scan");
        tmp.mkdir("project/.git");
        let target = tmp.touch("project/target.txt");
        let subdir = tmp.mkdir("project/src");

        let mut guard = AscentGuard::new().stop_at([".git"]);
        assert_eq!(find(&subdir, "target.txt", &mut guard), Some(target));
    }

    #[test]
    fn zero_depth_scans_only_start() {
        let tmp = TempTree::new("guard-depth0");
        tmp.touch("target.txt");
        let subdir = tmp.mkdir("sub");

        let mut guard = AscentGuard::new().max_depth(0);
        assert_eq!(find(&subdir, "target.txt", &mut guard), None);
        assert_eq!(guard.ascents(), 0);
    }

    #[test]
    fn depth_limit_counts_ascents() {
        let tmp = TempTree::new("guard-depth");
        let target = tmp.touch("target.txt");
        let deep = tmp.mkdir("a/b/c");

        let mut shallow = AscentGuard::new().max_depth(2);
        assert_eq!(find(&deep, "target.txt", &mut shallow), None);

        let mut enough = AscentGuard::new().max_depth(3);
        assert_eq!(find(&deep, "target.txt", &mut enough), Some(target));
        assert_eq!(enough.ascents(), 3);
    }
}
