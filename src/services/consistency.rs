//! 序号一致性巡检 - sequence/uniqueness consistency scan
//!
//! Administrative diagnostic over the whole area topology. Runs under the
//! shared topology read-lock so it never observes a bulk mutation half-way,
//! and waits a fixed settling delay before reading. Violations are aggregated
//! into named buckets; an absent bucket means "no anomaly of that kind".
//!
//! Callers must expect multi-second latency and must not hold other locks
//! while waiting.

use crate::db::repository::{AnchorRepository, SwitchAreaRepository};
use crate::utils::AppResult;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio::sync::RwLock;

/// Settling delay before the read phase
pub const SETTLE_DELAY: Duration = Duration::from_secs(1);

/// Zone identifiers inside a bucket are joined with this delimiter
pub const BUCKET_DELIMITER: &str = "、";

/// Duplicate sequence numbers within one area
pub const BUCKET_REPEAT: &str = "Repeat";
/// Reserved sequence number 0 in use
pub const BUCKET_ZERO: &str = "Zero";
/// Anchor without a communication config
pub const BUCKET_NULL: &str = "Null";
/// More than one sync master in an area
pub const BUCKET_MAX_COUNT: &str = "MaxCount";
/// Revision-III anchors left unpaired
pub const BUCKET_ANCHOR_III: &str = "AnchorIII";

/// Hardware revision whose anchors range in pairs
const REVISION_III: &str = "III";

/// One diagnostic row per area
#[derive(Debug, Clone)]
pub struct SeqCheckRow {
    /// External area code used in the report
    pub area_id: String,
    /// Comma-joined sequence numbers of the area's configured anchors
    pub seq_list: Option<String>,
    /// Anchors with a communication config
    pub config_count: usize,
    /// Anchors assigned to the area
    pub anchor_count: usize,
    /// Sync masters among them
    pub master_count: usize,
}

fn append_bucket(result: &mut HashMap<String, String>, bucket: &str, area_id: &str) {
    result
        .entry(bucket.to_string())
        .and_modify(|ids| {
            ids.push_str(BUCKET_DELIMITER);
            ids.push_str(area_id);
        })
        .or_insert_with(|| area_id.to_string());
}

/// Evaluate the diagnostic rows into violation buckets
pub fn collect_issues(rows: &[SeqCheckRow]) -> HashMap<String, String> {
    let mut result = HashMap::new();
    for row in rows {
        if let Some(seq_list) = &row.seq_list {
            let tokens: Vec<&str> = seq_list.split(',').collect();
            let distinct: HashSet<&str> = tokens.iter().copied().collect();
            if distinct.len() != tokens.len() {
                append_bucket(&mut result, BUCKET_REPEAT, &row.area_id);
            }
            if tokens.contains(&"0") {
                append_bucket(&mut result, BUCKET_ZERO, &row.area_id);
            }
        }
        if row.config_count != row.anchor_count {
            append_bucket(&mut result, BUCKET_NULL, &row.area_id);
        }
        if row.master_count > 1 {
            append_bucket(&mut result, BUCKET_MAX_COUNT, &row.area_id);
        }
    }
    result
}

#[derive(Clone)]
pub struct ConsistencyChecker {
    db: Surreal<Db>,
    topology_lock: Arc<RwLock<()>>,
}

impl ConsistencyChecker {
    pub fn new(db: Surreal<Db>, topology_lock: Arc<RwLock<()>>) -> Self {
        Self { db, topology_lock }
    }

    /// Scan all areas for sequencing/uniqueness problems.
    ///
    /// Per-area read failures degrade to a partial result with a warning
    /// rather than failing the whole scan.
    pub async fn check_seq(&self) -> AppResult<HashMap<String, String>> {
        let _read_guard = self.topology_lock.read().await;
        tokio::time::sleep(SETTLE_DELAY).await;

        let (rows, unpaired) = self.gather_rows().await?;
        let mut result = collect_issues(&rows);
        if !unpaired.is_empty() {
            result.insert(BUCKET_ANCHOR_III.to_string(), unpaired.join(","));
        }
        tracing::info!(
            areas = rows.len(),
            buckets = result.len(),
            "consistency scan finished"
        );
        Ok(result)
    }

    /// Collect one diagnostic row per area plus the unpaired revision-III
    /// anchor ids
    async fn gather_rows(&self) -> AppResult<(Vec<SeqCheckRow>, Vec<String>)> {
        let area_repo = SwitchAreaRepository::new(self.db.clone());
        let anchor_repo = AnchorRepository::new(self.db.clone());

        let areas = area_repo.find_all().await?;
        let configs: HashMap<String, _> = anchor_repo
            .all_configs()
            .await?
            .into_iter()
            .map(|c| (c.anchor_id.clone(), c))
            .collect();

        let mut rows = Vec::with_capacity(areas.len());
        let mut unpaired = Vec::new();
        for area in areas {
            let anchors = match anchor_repo.find_all_by_ids(&area.anchors).await {
                Ok(anchors) => anchors,
                Err(err) => {
                    tracing::warn!(area_id = %area.area_id, error = %err,
                        "skipping area in consistency scan");
                    continue;
                }
            };

            let mut seqs = Vec::new();
            let mut config_count = 0;
            let mut revision_iii = Vec::new();
            for anchor in &anchors {
                let Some(config) = configs.get(&anchor.anchor_id) else {
                    continue;
                };
                config_count += 1;
                if let Some(seq) = config.seq {
                    seqs.push(seq.to_string());
                }
                if config.version_code.as_deref() == Some(REVISION_III) {
                    revision_iii.push(anchor.anchor_id.clone());
                }
            }
            // revision III ranges in pairs; a lone one cannot
            if revision_iii.len() == 1 {
                unpaired.extend(revision_iii);
            }

            rows.push(SeqCheckRow {
                area_id: area.area_id.clone(),
                seq_list: if seqs.is_empty() {
                    None
                } else {
                    Some(seqs.join(","))
                },
                config_count,
                anchor_count: anchors.len(),
                master_count: anchors.iter().filter(|a| a.is_bs == Some(1)).count(),
            });
        }
        Ok((rows, unpaired))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(area_id: &str, seq: Option<&str>, configs: usize, anchors: usize, masters: usize) -> SeqCheckRow {
        SeqCheckRow {
            area_id: area_id.to_string(),
            seq_list: seq.map(str::to_string),
            config_count: configs,
            anchor_count: anchors,
            master_count: masters,
        }
    }

    #[test]
    fn duplicate_sequence_is_flagged_as_repeat() {
        let result = collect_issues(&[row("Z01", Some("1,2,2,3"), 4, 4, 1)]);
        assert_eq!(result.get(BUCKET_REPEAT).map(String::as_str), Some("Z01"));
        assert!(!result.contains_key(BUCKET_ZERO));
    }

    #[test]
    fn reserved_zero_sequence_is_flagged() {
        let result = collect_issues(&[row("Z02", Some("0,1,2"), 3, 3, 1)]);
        assert_eq!(result.get(BUCKET_ZERO).map(String::as_str), Some("Z02"));
    }

    #[test]
    fn count_mismatch_and_extra_masters_are_flagged() {
        let rows = [
            row("Z03", Some("1,2"), 2, 3, 1),
            row("Z04", Some("1,2,3"), 3, 3, 2),
        ];
        let result = collect_issues(&rows);
        assert_eq!(result.get(BUCKET_NULL).map(String::as_str), Some("Z03"));
        assert_eq!(result.get(BUCKET_MAX_COUNT).map(String::as_str), Some("Z04"));
    }

    #[test]
    fn bucket_concatenates_multiple_areas() {
        let rows = [
            row("Z05", Some("1,1"), 2, 2, 1),
            row("Z06", Some("2,2"), 2, 2, 1),
        ];
        let result = collect_issues(&rows);
        assert_eq!(
            result.get(BUCKET_REPEAT).map(String::as_str),
            Some("Z05、Z06")
        );
    }

    #[test]
    fn clean_rows_produce_no_buckets() {
        let result = collect_issues(&[row("Z07", Some("1,2,3"), 3, 3, 1)]);
        assert!(result.is_empty());
    }
}
