//! 集成测试公共设施 - in-memory engine + recording notifier

// each test binary compiles its own copy; not every helper is used everywhere
#![allow(dead_code)]

use async_trait::async_trait;
use rtls_edge::db::define_schema;
use rtls_edge::db::models::{Anchor, AnchorConfig, SwitchArea, SwitchAreaCreate};
use rtls_edge::db::repository::AnchorRepository;
use rtls_edge::services::TopologyNotifier;
use rtls_edge::{Config, ServerState};
use std::sync::{Arc, Mutex};
use surrealdb::engine::local::Mem;
use surrealdb::{RecordId, Surreal};

/// Notifier stub recording every delta as a flat event string
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn count_of(&self, event: &str) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.as_str() == event)
            .count()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl TopologyNotifier for RecordingNotifier {
    async fn area_added(&self, area_no: i64) {
        self.push(format!("area+{area_no}"));
    }

    async fn area_removed(&self, area_no: i64) {
        self.push(format!("area-{area_no}"));
    }

    async fn area_anchor_added(&self, area_no: i64, anchor_id: &str) {
        self.push(format!("anchor+{area_no}:{anchor_id}"));
    }

    async fn area_anchor_removed(&self, area_no: i64, anchor_id: &str) {
        self.push(format!("anchor-{area_no}:{anchor_id}"));
    }
}

/// Fresh state over the in-memory engine with a recording notifier attached
pub async fn test_state() -> (ServerState, Arc<RecordingNotifier>) {
    let db = Surreal::new::<Mem>(()).await.expect("open in-memory db");
    db.use_ns("rtls")
        .use_db("edge")
        .await
        .expect("select namespace");
    define_schema(&db).await.expect("define schema");

    let notifier = Arc::new(RecordingNotifier::default());
    let state = ServerState::with_db(Config::with_overrides("/tmp/rtls-edge-test"), db)
        .with_notifier(notifier.clone());
    (state, notifier)
}

/// Bordered 10x10 square area payload
pub fn square_area(area_id: &str, area_no: i64) -> SwitchAreaCreate {
    SwitchAreaCreate {
        area_id: area_id.to_string(),
        area_no,
        map_id: None,
        min_z: Some(0),
        max_z: Some(300),
        show_color: Some("#1E90FF".to_string()),
        points: Some("0,0 10,0 10,10 0,10".to_string()),
        area_type: Some(0),
        leave_rssi_enable: Some(0),
        bs_area_type: Some(0),
        graphics_type: 1,
        border_type: 1,
        disable_warning: Some(0),
    }
}

/// Create a bordered area through the service and return it
pub async fn seed_area(state: &ServerState, area_id: &str, area_no: i64) -> SwitchArea {
    state
        .switch_area_service()
        .create_area(square_area(area_id, area_no))
        .await
        .expect("seed area")
}

/// Persist an anchor and return its record id
pub async fn seed_anchor(state: &ServerState, hw_id: &str) -> RecordId {
    let repo = AnchorRepository::new(state.db.clone());
    let anchor = repo
        .create(Anchor {
            id: None,
            anchor_id: hw_id.to_string(),
            anchor_x: Some(5),
            anchor_y: Some(5),
            anchor_z: Some(250),
            anchor_type: Some(1),
            anchor_bno: None,
            enabled: Some(1),
            is_bs: Some(0),
            map_id: None,
        })
        .await
        .expect("seed anchor");
    anchor.id.expect("anchor id")
}

/// Persist a communication config for an anchor
pub async fn seed_anchor_config(
    state: &ServerState,
    hw_id: &str,
    interval: Option<i32>,
    seq: Option<i32>,
    version_code: Option<&str>,
) {
    let repo = AnchorRepository::new(state.db.clone());
    repo.save_config(AnchorConfig {
        id: None,
        anchor_id: hw_id.to_string(),
        anchor_interval: interval,
        seq,
        version_code: version_code.map(str::to_string),
    })
    .await
    .expect("seed anchor config");
}
