mod common;

use std::collections::HashMap;

use uuid::Uuid;

use bizcard_core::links::{self, ReorderOutcome};
use bizcard_core::{CoreError, MemoryDirectory};
use bizcard_types::models::Direction;

use common::{ids, principal, seed_link, seed_profile};

#[tokio::test]
async fn append_uses_pre_call_count_and_lands_last() {
    let dir = MemoryDirectory::new();
    let me = principal(Uuid::new_v4());

    let first = links::append(&dir, &me, "GitHub", "github.com/me").await.unwrap();
    let second = links::append(&dir, &me, "Website", "https://me.dev").await.unwrap();

    assert_eq!(first.order_index, 0);
    assert_eq!(second.order_index, 1);
    assert_eq!(first.target_url, "https://github.com/me");

    let listed = links::list(&dir, &me, me.id).await.unwrap();
    assert_eq!(ids(&listed), vec![first.id, second.id]);
}

#[tokio::test]
async fn append_counts_rows_not_max_index() {
    let dir = MemoryDirectory::new();
    let me = principal(Uuid::new_v4());
    seed_link(&dir, me.id, 0).await;
    seed_link(&dir, me.id, 7).await;

    let added = links::append(&dir, &me, "Email", "mail.example.com").await.unwrap();
    assert_eq!(added.order_index, 2);
}

#[tokio::test]
async fn invalid_input_writes_nothing() {
    let dir = MemoryDirectory::new();
    let me = principal(Uuid::new_v4());

    let err = links::append(&dir, &me, "", "example.com").await.unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
    let err = links::append(&dir, &me, "Website", "not a url").await.unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));

    assert!(links::list(&dir, &me, me.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn listing_someone_else_is_a_permission_error() {
    let dir = MemoryDirectory::new();
    let owner = Uuid::new_v4();
    seed_link(&dir, owner, 0).await;

    let err = links::list(&dir, &principal(Uuid::new_v4()), owner)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Permission));
}

#[tokio::test]
async fn list_sorts_by_order_index() {
    let dir = MemoryDirectory::new();
    let me = principal(Uuid::new_v4());
    let c = seed_link(&dir, me.id, 9).await;
    let a = seed_link(&dir, me.id, 0).await;
    let b = seed_link(&dir, me.id, 4).await;

    let listed = links::list(&dir, &me, me.id).await.unwrap();
    assert_eq!(ids(&listed), vec![a.id, b.id, c.id]);
}

#[tokio::test]
async fn remove_leaves_gaps() {
    let dir = MemoryDirectory::new();
    let me = principal(Uuid::new_v4());
    let a = seed_link(&dir, me.id, 0).await;
    let b = seed_link(&dir, me.id, 1).await;
    let c = seed_link(&dir, me.id, 2).await;

    links::remove(&dir, &me, b.id).await.unwrap();

    let listed = links::list(&dir, &me, me.id).await.unwrap();
    assert_eq!(ids(&listed), vec![a.id, c.id]);
    assert_eq!(listed[0].order_index, 0);
    assert_eq!(listed[1].order_index, 2);
}

#[tokio::test]
async fn remove_checks_ownership() {
    let dir = MemoryDirectory::new();
    let owner = Uuid::new_v4();
    let link = seed_link(&dir, owner, 0).await;

    let err = links::remove(&dir, &principal(Uuid::new_v4()), link.id)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Permission));
    assert!(dir.link(link.id).is_some());

    let err = links::remove(&dir, &principal(owner), Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound));
}

#[tokio::test]
async fn append_then_remove_round_trips() {
    let dir = MemoryDirectory::new();
    let me = principal(Uuid::new_v4());
    seed_link(&dir, me.id, 0).await;
    seed_link(&dir, me.id, 3).await;
    let before = links::list(&dir, &me, me.id).await.unwrap();

    let added = links::append(&dir, &me, "TikTok", "tiktok.com/@me").await.unwrap();
    links::remove(&dir, &me, added.id).await.unwrap();

    assert_eq!(links::list(&dir, &me, me.id).await.unwrap(), before);
}

#[tokio::test]
async fn reorder_up_swaps_with_predecessor() {
    let dir = MemoryDirectory::new();
    let me = principal(Uuid::new_v4());
    let l1 = seed_link(&dir, me.id, 0).await;
    let l2 = seed_link(&dir, me.id, 1).await;
    let l3 = seed_link(&dir, me.id, 2).await;

    let outcome = links::reorder(&dir, &me, l2.id, Direction::Up).await.unwrap();
    match outcome {
        ReorderOutcome::Swapped { moved, neighbor } => {
            assert_eq!((moved.id, moved.order_index), (l2.id, 0));
            assert_eq!((neighbor.id, neighbor.order_index), (l1.id, 1));
        }
        other => panic!("expected swap, got {:?}", other),
    }

    let listed = links::list(&dir, &me, me.id).await.unwrap();
    assert_eq!(ids(&listed), vec![l2.id, l1.id, l3.id]);
    let order: HashMap<Uuid, i64> = listed.iter().map(|l| (l.id, l.order_index)).collect();
    assert_eq!(order[&l1.id], 1);
    assert_eq!(order[&l2.id], 0);
    assert_eq!(order[&l3.id], 2);
}

#[tokio::test]
async fn reorder_down_swaps_with_successor_across_gaps() {
    let dir = MemoryDirectory::new();
    let me = principal(Uuid::new_v4());
    let a = seed_link(&dir, me.id, 0).await;
    let b = seed_link(&dir, me.id, 5).await;
    let c = seed_link(&dir, me.id, 9).await;

    links::reorder(&dir, &me, a.id, Direction::Down).await.unwrap();

    let listed = links::list(&dir, &me, me.id).await.unwrap();
    assert_eq!(ids(&listed), vec![b.id, a.id, c.id]);
    assert_eq!(listed[0].order_index, 0);
    assert_eq!(listed[1].order_index, 5);
}

#[tokio::test]
async fn reorder_at_edges_is_noop() {
    let dir = MemoryDirectory::new();
    let me = principal(Uuid::new_v4());
    let first = seed_link(&dir, me.id, 0).await;
    let last = seed_link(&dir, me.id, 1).await;
    let before = links::list(&dir, &me, me.id).await.unwrap();

    let up = links::reorder(&dir, &me, first.id, Direction::Up).await.unwrap();
    let down = links::reorder(&dir, &me, last.id, Direction::Down).await.unwrap();

    assert_eq!(up, ReorderOutcome::Unchanged);
    assert_eq!(down, ReorderOutcome::Unchanged);
    assert_eq!(links::list(&dir, &me, me.id).await.unwrap(), before);
}

#[tokio::test]
async fn reorder_of_foreign_link_is_rejected() {
    let dir = MemoryDirectory::new();
    let owner = Uuid::new_v4();
    seed_link(&dir, owner, 0).await;
    let second = seed_link(&dir, owner, 1).await;

    let err = links::reorder(&dir, &principal(Uuid::new_v4()), second.id, Direction::Up)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Permission));
    assert_eq!(dir.link(second.id).unwrap().order_index, 1);
}

#[tokio::test]
async fn half_applied_reorder_is_reported_not_rolled_back() {
    let dir = MemoryDirectory::new();
    let me = principal(Uuid::new_v4());
    let a = seed_link(&dir, me.id, 0).await;
    let b = seed_link(&dir, me.id, 1).await;

    dir.fail_link_updates_after(1);
    let err = links::reorder(&dir, &me, b.id, Direction::Up).await.unwrap_err();

    match err {
        CoreError::ReorderIncomplete { moved, neighbor } => {
            assert_eq!(moved, b.id);
            assert_eq!(neighbor, a.id);
        }
        other => panic!("expected ReorderIncomplete, got {:?}", other),
    }
    // First write stuck: both now share index 0.
    assert_eq!(dir.link(b.id).unwrap().order_index, 0);
    assert_eq!(dir.link(a.id).unwrap().order_index, 0);
}

#[tokio::test]
async fn failed_first_write_changes_nothing() {
    let dir = MemoryDirectory::new();
    let me = principal(Uuid::new_v4());
    let a = seed_link(&dir, me.id, 0).await;
    let b = seed_link(&dir, me.id, 1).await;

    dir.fail_link_updates_after(0);
    let err = links::reorder(&dir, &me, b.id, Direction::Up).await.unwrap_err();

    assert!(matches!(err, CoreError::Transient(_)));
    assert_eq!(dir.link(a.id).unwrap().order_index, 0);
    assert_eq!(dir.link(b.id).unwrap().order_index, 1);
}

#[tokio::test]
async fn concurrent_appends_keep_both_links() {
    let dir = MemoryDirectory::new();
    let me = principal(Uuid::new_v4());

    let (a, b) = tokio::join!(
        links::append(&dir, &me, "GitHub", "github.com/me"),
        links::append(&dir, &me, "Website", "me.dev"),
    );
    let (a, b) = (a.unwrap(), b.unwrap());

    // Both may read the same count; only the ordering is ambiguous.
    assert!(a.order_index <= 1 && b.order_index <= 1);
    let listed = links::list(&dir, &me, me.id).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().any(|l| l.id == a.id));
    assert!(listed.iter().any(|l| l.id == b.id));
}

#[tokio::test]
async fn edit_changes_fields_but_not_order() {
    let dir = MemoryDirectory::new();
    let me = principal(Uuid::new_v4());
    let link = seed_link(&dir, me.id, 3).await;

    let edited = links::edit(&dir, &me, link.id, Some("LinkedIn"), Some("linkedin.com/in/me"))
        .await
        .unwrap();
    assert_eq!(edited.platform, "LinkedIn");
    assert_eq!(edited.target_url, "https://linkedin.com/in/me");
    assert_eq!(edited.order_index, 3);

    let err = links::edit(&dir, &me, link.id, None, None).await.unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));

    let err = links::edit(&dir, &principal(Uuid::new_v4()), link.id, Some("X"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Permission));
}

#[tokio::test]
async fn public_links_follow_username() {
    let dir = MemoryDirectory::new();
    let profile = seed_profile(&dir, "carol").await;
    let second = seed_link(&dir, profile.id, 1).await;
    let first = seed_link(&dir, profile.id, 0).await;

    let listed = links::public_links(&dir, "carol").await.unwrap();
    assert_eq!(ids(&listed), vec![first.id, second.id]);

    let err = links::public_links(&dir, "nobody").await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound));
}

#[tokio::test]
async fn outage_surfaces_as_transient() {
    let dir = MemoryDirectory::new();
    let me = principal(Uuid::new_v4());
    dir.set_offline(true);

    let err = links::append(&dir, &me, "GitHub", "github.com").await.unwrap_err();
    assert!(matches!(err, CoreError::Transient(_)));
}

#[tokio::test]
async fn append_after_remove_tie_can_still_be_reordered() {
    let dir = MemoryDirectory::new();
    let me = principal(Uuid::new_v4());
    let a = links::append(&dir, &me, "GitHub", "github.com/me").await.unwrap();
    let b = links::append(&dir, &me, "Website", "me.dev").await.unwrap();
    let c = links::append(&dir, &me, "Email", "mail.me.dev").await.unwrap();
    links::remove(&dir, &me, a.id).await.unwrap();

    let d = links::append(&dir, &me, "TikTok", "tiktok.com/@me").await.unwrap();
    assert_eq!(d.order_index, c.order_index);

    let outcome = links::reorder(&dir, &me, d.id, Direction::Up).await.unwrap();
    assert!(matches!(outcome, ReorderOutcome::Swapped { .. }));
    let listed = links::list(&dir, &me, me.id).await.unwrap();
    assert_eq!(ids(&listed), vec![b.id, d.id, c.id]);

    let outcome = links::reorder(&dir, &me, b.id, Direction::Down).await.unwrap();
    assert!(matches!(outcome, ReorderOutcome::Swapped { .. }));
    let listed = links::list(&dir, &me, me.id).await.unwrap();
    assert_eq!(ids(&listed), vec![d.id, b.id, c.id]);
}

#[tokio::test]
async fn tied_neighbours_moving_down_separate() {
    let dir = MemoryDirectory::new();
    let me = principal(Uuid::new_v4());
    let first = seed_link(&dir, me.id, 4).await;
    let second = seed_link(&dir, me.id, 4).await;

    links::reorder(&dir, &me, first.id, Direction::Down).await.unwrap();

    let listed = links::list(&dir, &me, me.id).await.unwrap();
    assert_eq!(ids(&listed), vec![second.id, first.id]);
    assert_eq!(dir.link(first.id).unwrap().order_index, 4);
    assert_eq!(dir.link(second.id).unwrap().order_index, 3);
}
