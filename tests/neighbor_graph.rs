//! 邻区关系集成测试 - adjacency graph bookkeeping

mod common;

use common::{seed_area, test_state};
use rtls_edge::AppError;
use rtls_edge::db::repository::SwitchAreaRepository;
use surrealdb::RecordId;

#[tokio::test]
async fn add_neighbor_stores_separator_endpoints() {
    let (state, _) = test_state().await;
    let service = state.switch_area_service();
    let a = seed_area(&state, "N-100", 100).await.id.unwrap();
    let b = seed_area(&state, "N-101", 101).await.id.unwrap();

    let relation = service.add_neighbor(&a, &b, "0,5 10,5").await.unwrap();
    assert_eq!(relation.switch_area, a);
    assert_eq!(relation.neighbor_area, b);
    assert_eq!(
        (relation.sep_start_x, relation.sep_start_y, relation.sep_end_x, relation.sep_end_y),
        (0, 5, 10, 5)
    );

    let found = service.neighbor_to(&a, &b).await.unwrap();
    assert!(found.is_some());
}

#[tokio::test]
async fn duplicate_relation_is_a_conflict_and_leaves_the_set_unchanged() {
    let (state, _) = test_state().await;
    let service = state.switch_area_service();
    let a = seed_area(&state, "N-200", 200).await.id.unwrap();
    let b = seed_area(&state, "N-201", 201).await.id.unwrap();

    service.add_neighbor(&a, &b, "0,5 10,5").await.unwrap();
    let duplicate = service.add_neighbor(&a, &b, "1,6 11,6").await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let repo = SwitchAreaRepository::new(state.db.clone());
    assert_eq!(repo.neighbors_of(&a).await.unwrap().len(), 1);
}

#[tokio::test]
async fn relations_are_one_sided_by_default() {
    let (state, _) = test_state().await;
    let service = state.switch_area_service();
    let a = seed_area(&state, "N-300", 300).await.id.unwrap();
    let b = seed_area(&state, "N-301", 301).await.id.unwrap();

    service.add_neighbor(&a, &b, "0,5 10,5").await.unwrap();

    // the reverse side sees nothing unless it issues its own add
    let repo = SwitchAreaRepository::new(state.db.clone());
    assert!(repo.neighbors_of(&b).await.unwrap().is_empty());
}

#[tokio::test]
async fn mirror_flag_inserts_the_reverse_relation() {
    let (mut state, _) = test_state().await;
    state.config.mirror_neighbor_links = true;
    let service = state.switch_area_service();
    let a = seed_area(&state, "N-400", 400).await.id.unwrap();
    let b = seed_area(&state, "N-401", 401).await.id.unwrap();

    service.add_neighbor(&a, &b, "0,5 10,5").await.unwrap();

    let repo = SwitchAreaRepository::new(state.db.clone());
    let reverse = repo.neighbors_of(&b).await.unwrap();
    assert_eq!(reverse.len(), 1);
    assert_eq!(reverse[0].neighbor_area, a);
}

#[tokio::test]
async fn separator_must_hold_exactly_two_points() {
    let (state, _) = test_state().await;
    let service = state.switch_area_service();
    let a = seed_area(&state, "N-500", 500).await.id.unwrap();
    let b = seed_area(&state, "N-501", 501).await.id.unwrap();

    for bad in ["0,5", "0,5 10,5 20,5", "", "0,x 10,5"] {
        let result = service.add_neighbor(&a, &b, bad).await;
        assert!(
            matches!(result, Err(AppError::Validation(_))),
            "expected Validation for {bad:?}"
        );
    }
}

#[tokio::test]
async fn missing_zones_and_self_links_are_rejected() {
    let (state, _) = test_state().await;
    let service = state.switch_area_service();
    let a = seed_area(&state, "N-600", 600).await.id.unwrap();
    let ghost: RecordId = "switch_area:missing".parse().unwrap();

    let result = service.add_neighbor(&a, &ghost, "0,5 10,5").await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    let result = service.add_neighbor(&ghost, &a, "0,5 10,5").await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    let result = service.add_neighbor(&a, &a, "0,5 10,5").await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn remove_neighbors_deletes_each_matched_relation() {
    let (state, _) = test_state().await;
    let service = state.switch_area_service();
    let a = seed_area(&state, "N-700", 700).await.id.unwrap();
    let b = seed_area(&state, "N-701", 701).await.id.unwrap();
    let c = seed_area(&state, "N-702", 702).await.id.unwrap();

    service.add_neighbor(&a, &b, "0,5 10,5").await.unwrap();
    service.add_neighbor(&a, &c, "10,5 20,5").await.unwrap();

    let removed = service
        .remove_neighbors(&a, &[b.clone()])
        .await
        .unwrap();
    assert_eq!(removed, 1);

    let targets = service.neighbor_targets(&a).await.unwrap();
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].id.as_ref(), Some(&c));
}

#[tokio::test]
async fn neighbor_targets_returns_zones_not_relations() {
    let (state, _) = test_state().await;
    let service = state.switch_area_service();
    let a = seed_area(&state, "N-800", 800).await.id.unwrap();
    let b = seed_area(&state, "N-801", 801).await.id.unwrap();

    service.add_neighbor(&a, &b, "0,5 10,5").await.unwrap();

    let targets = service.neighbor_targets(&a).await.unwrap();
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].area_id, "N-801");

    // selection list excludes the area itself
    let others = service.other_areas_for_select(Some(&a)).await.unwrap();
    assert!(others.iter().all(|z| z.id.as_ref() != Some(&a)));
    assert_eq!(others.len(), 1);
}
