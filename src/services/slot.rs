//! 时隙容量计算 - communication slot capacity
//!
//! The ranging cycle is divided into a fixed range phase followed by one
//! response slot per anchor beyond the reference count. The number of
//! communication time slots available to tags falls out of the cycle period,
//! the densest area's anchor count and the tag reporting interval.

use crate::db::models::SysConfig;
use crate::db::repository::{AnchorRepository, SwitchAreaRepository, SysConfigRepository};
use crate::services::switch_area::parse_id_csv;
use crate::utils::{AppError, AppResult};
use std::collections::HashMap;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// Config code: highest anchor count observed across areas (never lowered)
pub const CFG_MAX_ANCHOR: &str = "max_anchor";
/// Config code: selected slot model ("0" or "1")
pub const CFG_SLOT_MODEL: &str = "slot_model";
/// Config code: computed slot count
pub const CFG_TIMESLOT_NUMBER: &str = "timeslot_number";

/// Areas are provisioned for at least this many anchors
pub const MIN_ANCHOR_FLOOR: i32 = 6;

/// One slot model preset: cycle period, fixed range-phase duration,
/// per-anchor response duration and the reference anchor count the range
/// phase already covers. Durations in microseconds.
#[derive(Debug, Clone, Copy)]
pub struct SlotModel {
    pub period: i32,
    pub range_pre_time: f32,
    pub resp_time: f32,
    pub ref_anchors: i32,
}

/// 标准测距周期
pub const SLOT_MODEL_0: SlotModel = SlotModel {
    period: 12_000,
    range_pre_time: 600.0,
    resp_time: 150.0,
    ref_anchors: 6,
};

/// 长周期低频模式
pub const SLOT_MODEL_10: SlotModel = SlotModel {
    period: 120_000,
    range_pre_time: 4_800.0,
    resp_time: 1_200.0,
    ref_anchors: 6,
};

/// Raw slot capacity of a model at a given anchor density
pub fn available_slots(model: &SlotModel, max_anchor: i32) -> f32 {
    model.period as f32
        / (model.range_pre_time + (max_anchor - model.ref_anchors) as f32 * model.resp_time)
}

/// Statistical mode of the configured intervals; ties resolve to the smaller
/// value
pub fn mode_interval(intervals: impl IntoIterator<Item = i32>) -> Option<i32> {
    let mut counts: HashMap<i32, usize> = HashMap::new();
    for value in intervals {
        *counts.entry(value).or_default() += 1;
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
        .map(|(value, _)| value)
}

#[derive(Clone)]
pub struct SlotService {
    db: Surreal<Db>,
}

impl SlotService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    /// Highest anchor count across the given areas (all areas when the csv is
    /// blank); `None` when no areas exist
    pub async fn max_anchor_count(&self, area_ids: &str) -> AppResult<Option<i32>> {
        let repo = SwitchAreaRepository::new(self.db.clone());
        let ids = parse_id_csv(area_ids);
        let areas = if ids.is_empty() {
            repo.find_all().await?
        } else {
            repo.find_all_by_ids(&ids).await?
        };
        Ok(areas.iter().map(|a| a.anchors.len() as i32).max())
    }

    /// Recompute and persist the slot count.
    ///
    /// `max_anchor` is floored at [`MIN_ANCHOR_FLOOR`]; the stored ceiling is
    /// only ever raised. The reporting interval is the explicit argument or
    /// the mode of the configured per-anchor intervals.
    pub async fn calculate_slot_inc(
        &self,
        max_anchor: Option<i32>,
        interval: Option<i32>,
    ) -> AppResult<i32> {
        let configs = SysConfigRepository::new(self.db.clone());
        let max_anchor = max_anchor.unwrap_or(MIN_ANCHOR_FLOOR).max(MIN_ANCHOR_FLOOR);

        let stored_max = configs
            .find_by_code(CFG_MAX_ANCHOR)
            .await?
            .and_then(|c| c.cfg_val.parse::<i32>().ok())
            .unwrap_or(MIN_ANCHOR_FLOOR);
        if max_anchor > stored_max {
            configs
                .set_value(CFG_MAX_ANCHOR, &max_anchor.to_string())
                .await?;
        }

        let model = match configs.find_by_code(CFG_SLOT_MODEL).await? {
            Some(SysConfig { cfg_val, .. }) if cfg_val == "1" => SLOT_MODEL_10,
            Some(_) => SLOT_MODEL_0,
            None => {
                tracing::warn!("slot model not configured, falling back to model 0");
                SLOT_MODEL_0
            }
        };

        let interval = match interval {
            Some(value) => value,
            None => {
                let anchor_repo = AnchorRepository::new(self.db.clone());
                let mut intervals = Vec::new();
                for anchor in anchor_repo.find_all().await? {
                    if let Some(config) = anchor_repo.find_config(&anchor.anchor_id).await?
                        && let Some(value) = config.anchor_interval
                    {
                        intervals.push(value);
                    }
                }
                mode_interval(intervals).ok_or_else(|| {
                    AppError::validation("No anchor reporting interval configured")
                })?
            }
        };
        if interval < 1 {
            return Err(AppError::validation(format!(
                "Reporting interval must be positive, got {interval}"
            )));
        }

        let slots = available_slots(&model, max_anchor);
        let slot_count = (slots / interval as f32).floor() as i32;
        configs
            .set_value(CFG_TIMESLOT_NUMBER, &slot_count.to_string())
            .await?;
        tracing::info!(max_anchor, interval, slot_count, "slot capacity recomputed");
        Ok(slot_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_0_formula_end_to_end() {
        // period 12000, range 600, resp 150, ref 6; ten anchors, interval 2:
        // 12000 / (600 + 4 * 150) = 10 slots, / 2 = 5
        let slots = available_slots(&SLOT_MODEL_0, 10);
        assert_eq!(slots, 10.0);
        assert_eq!((slots / 2.0).floor() as i32, 5);
    }

    #[test]
    fn mode_picks_most_frequent_interval() {
        assert_eq!(mode_interval([5, 10, 10, 5, 10]), Some(10));
        assert_eq!(mode_interval([]), None);
        // tie resolves to the smaller interval
        assert_eq!(mode_interval([4, 8]), Some(4));
    }
}
