use std::path::PathBuf;

use serde::Serialize;

/// Exit code for a scan that completed and found something. Kept apart from
/// the generic failure codes so automation can tell "scan worked, found
/// detections" from "scan could not run".
pub const DETECTIONS_EXIT_CODE: i32 = 100;

/// One matching rule, shaped for rendering.
///
/// Tags and metadata keep the matching engine's iteration order; empty sets
/// stay as empty collections so renderers always have a value to show.
#[derive(Debug, Clone, Serialize)]
pub struct MatchRecord {
    pub rule: String,
    pub tags: Vec<String>,
    pub meta: Vec<(String, String)>,
}

impl MatchRecord {
    /// Comma-joined tags, or the placeholder when the rule has none.
    pub fn tags_cell(&self) -> String {
        if self.tags.is_empty() {
            "-".into()
        } else {
            self.tags.join(",")
        }
    }

    /// Comma-joined `key=value` pairs, or the placeholder when absent.
    pub fn meta_cell(&self) -> String {
        if self.meta.is_empty() {
            "-".into()
        } else {
            self.meta
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join(",")
        }
    }
}

/// Complete scan outcome: what was considered, what fired, in engine order.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub target: PathBuf,
    pub rule_count: usize,
    pub matches: Vec<MatchRecord>,
}

impl ScanReport {
    pub fn detections(&self) -> usize {
        self.matches.len()
    }

    /// 0 when clean, [`DETECTIONS_EXIT_CODE`] when anything fired.
    pub fn exit_code(&self) -> i32 {
        if self.matches.is_empty() {
            0
        } else {
            DETECTIONS_EXIT_CODE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_tags_and_meta_render_placeholder() {
        let m = MatchRecord {
            rule: "bare".into(),
            tags: vec![],
            meta: vec![],
        };
        assert_eq!(m.tags_cell(), "-");
        assert_eq!(m.meta_cell(), "-");
    }

    #[test]
    fn cells_join_in_given_order() {
        let m = MatchRecord {
            rule: "SilentBanker".into(),
            tags: vec!["banker".into(), "trojan".into()],
            meta: vec![
                ("author".into(), "unit".into()),
                ("score".into(), "80".into()),
            ],
        };
        assert_eq!(m.tags_cell(), "banker,trojan");
        assert_eq!(m.meta_cell(), "author=unit,score=80");
    }

    #[test]
    fn exit_code_splits_on_detections() {
        let clean = ScanReport {
            target: PathBuf::from("/tmp/a"),
            rule_count: 10,
            matches: vec![],
        };
        assert_eq!(clean.exit_code(), 0);

        let hit = ScanReport {
            matches: vec![MatchRecord {
                rule: "x".into(),
                tags: vec![],
                meta: vec![],
            }],
            ..clean
        };
        assert_eq!(hit.exit_code(), DETECTIONS_EXIT_CODE);
    }
}
