//! 基站成员关系集成测试 - anchor / group membership

mod common;

use common::{seed_anchor, seed_area, test_state};
use rtls_edge::AppError;
use rtls_edge::db::models::AnchorGroup;
use rtls_edge::db::repository::AnchorGroupRepository;
use surrealdb::RecordId;

#[tokio::test]
async fn add_anchor_is_idempotent_with_one_notification() {
    let (state, notifier) = test_state().await;
    let service = state.switch_area_service();
    let area = seed_area(&state, "M-100", 100).await.id.unwrap();
    let anchor = seed_anchor(&state, "A-01").await;

    service.add_anchor(&area, &anchor).await.unwrap();
    service.add_anchor(&area, &anchor).await.unwrap();

    let anchors = service.area_anchors(&area).await.unwrap();
    assert_eq!(anchors.len(), 1);
    assert_eq!(notifier.count_of("anchor+100:A-01"), 1);
}

#[tokio::test]
async fn remove_anchor_notifies_and_requires_existing_ids() {
    let (state, notifier) = test_state().await;
    let service = state.switch_area_service();
    let area = seed_area(&state, "M-200", 200).await.id.unwrap();
    let anchor = seed_anchor(&state, "A-02").await;
    service.add_anchor(&area, &anchor).await.unwrap();

    service.remove_anchor(&area, &anchor).await.unwrap();
    assert!(service.area_anchors(&area).await.unwrap().is_empty());
    assert_eq!(notifier.count_of("anchor-200:A-02"), 1);

    // removing again is a no-op, not an extra notification
    service.remove_anchor(&area, &anchor).await.unwrap();
    assert_eq!(notifier.count_of("anchor-200:A-02"), 1);

    let ghost: RecordId = "anchor:missing".parse().unwrap();
    let result = service.remove_anchor(&area, &ghost).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn group_ids_win_and_populate_the_display_set() {
    let (state, _) = test_state().await;
    let service = state.switch_area_service();
    let area = seed_area(&state, "M-300", 300).await.id.unwrap();
    let a1 = seed_anchor(&state, "A-10").await;
    let a2 = seed_anchor(&state, "A-11").await;
    let a3 = seed_anchor(&state, "A-12").await;

    let groups = AnchorGroupRepository::new(state.db.clone());
    let g1 = groups
        .create(AnchorGroup {
            id: None,
            name: "east-wing".to_string(),
            anchors: vec![a1.clone(), a2.clone()],
        })
        .await
        .unwrap()
        .id
        .unwrap();

    // group wins even though explicit anchors were also supplied
    service
        .set_area_anchors(&area, &a3.to_string(), &g1.to_string())
        .await
        .unwrap();

    let stored = service.area(&area).await.unwrap().unwrap();
    assert_eq!(stored.anchor_groups, vec![g1]);
    let members = service.area_anchors(&area).await.unwrap();
    let hw: Vec<&str> = members.iter().map(|a| a.anchor_id.as_str()).collect();
    assert_eq!(hw, vec!["A-10", "A-11"]);
}

#[tokio::test]
async fn explicit_anchor_list_clears_group_association() {
    let (state, _) = test_state().await;
    let service = state.switch_area_service();
    let area = seed_area(&state, "M-400", 400).await.id.unwrap();
    let a1 = seed_anchor(&state, "A-20").await;
    let a2 = seed_anchor(&state, "A-21").await;

    let groups = AnchorGroupRepository::new(state.db.clone());
    let g1 = groups
        .create(AnchorGroup {
            id: None,
            name: "west-wing".to_string(),
            anchors: vec![a1.clone()],
        })
        .await
        .unwrap()
        .id
        .unwrap();
    service
        .set_area_anchors(&area, "", &g1.to_string())
        .await
        .unwrap();

    service
        .set_area_anchors(&area, &format!("{a1},{a2}"), "")
        .await
        .unwrap();
    let stored = service.area(&area).await.unwrap().unwrap();
    assert!(stored.anchor_groups.is_empty());
    assert_eq!(stored.anchors.len(), 2);
}

#[tokio::test]
async fn empty_lists_clear_both_associations() {
    let (state, _) = test_state().await;
    let service = state.switch_area_service();
    let area = seed_area(&state, "M-500", 500).await.id.unwrap();
    let a1 = seed_anchor(&state, "A-30").await;
    service.add_anchor(&area, &a1).await.unwrap();

    service.set_area_anchors(&area, "", "").await.unwrap();

    let stored = service.area(&area).await.unwrap().unwrap();
    assert!(stored.anchors.is_empty());
    assert!(stored.anchor_groups.is_empty());
}

#[tokio::test]
async fn unparseable_csv_tokens_are_skipped() {
    let (state, _) = test_state().await;
    let service = state.switch_area_service();
    let area = seed_area(&state, "M-600", 600).await.id.unwrap();
    let a1 = seed_anchor(&state, "A-40").await;

    service
        .set_area_anchors(&area, &format!("garbage, ,{a1}"), "")
        .await
        .unwrap();
    assert_eq!(service.area_anchors(&area).await.unwrap().len(), 1);
}

#[tokio::test]
async fn redraw_with_clear_flag_empties_membership_one_by_one() {
    let (state, notifier) = test_state().await;
    let service = state.switch_area_service();
    let area = seed_area(&state, "M-700", 700).await.id.unwrap();
    let a1 = seed_anchor(&state, "A-50").await;
    let a2 = seed_anchor(&state, "A-51").await;
    service.add_anchor(&area, &a1).await.unwrap();
    service.add_anchor(&area, &a2).await.unwrap();

    let updated = service
        .redraw_region(&area, "0,0 40,0 40,40 0,40", 1, true)
        .await
        .unwrap();

    assert!(updated.anchors.is_empty());
    assert_eq!((updated.end_x, updated.end_y), (Some(40), Some(40)));
    // one individual removal notification per former member
    assert_eq!(notifier.count_of("anchor-700:A-50"), 1);
    assert_eq!(notifier.count_of("anchor-700:A-51"), 1);
}

#[tokio::test]
async fn redraw_without_clear_flag_keeps_membership() {
    let (state, notifier) = test_state().await;
    let service = state.switch_area_service();
    let area = seed_area(&state, "M-800", 800).await.id.unwrap();
    let a1 = seed_anchor(&state, "A-60").await;
    service.add_anchor(&area, &a1).await.unwrap();

    let updated = service
        .redraw_region(&area, "0,0 40,0 40,40 0,40", 1, false)
        .await
        .unwrap();
    assert_eq!(updated.anchors.len(), 1);
    assert_eq!(notifier.count_of("anchor-800:A-60"), 0);
}
