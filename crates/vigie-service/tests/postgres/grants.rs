use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use vigie_core::types::{NodeRef, Role};
use vigie_db::db::schema::{building_grant, level, level_grant, part_grant, site_grant};
use vigie_service::auth::{
    GrantStore, HierarchyAccessor,
    postgres::{PgGrantStore, PgHierarchy},
};
use vigie_service::error::ServiceError;

use crate::helpers::test_db;

#[test_log::test(tokio::test)]
async fn upsert_on_existing_pair_updates_in_place() {
    let db = test_db!();
    let store = PgGrantStore::new(db.provider());
    let viewer = db.principal("viewer@example.org", Some(Role::Viewer)).await.unwrap();
    let tree = db.tree(None, None).await.unwrap();
    let site = NodeRef::site(tree.site);

    store.upsert(viewer.id, site, true, false).await.unwrap();
    store.upsert(viewer.id, site, false, true).await.unwrap();

    let grant = store.get(viewer.id, site).await.unwrap().unwrap();
    assert!(!grant.can_read);
    assert!(grant.can_write);
    assert_eq!(store.list_for_node(site).await.unwrap(), vec![grant]);

    let mut conn = db.conn().await.unwrap();
    let rows: i64 = site_grant::table
        .filter(site_grant::site_id.eq(tree.site))
        .count()
        .get_result(&mut conn)
        .await
        .unwrap();
    assert_eq!(rows, 1);
    drop(conn);

    db.drop_database().await.unwrap();
}

#[test_log::test(tokio::test)]
async fn empty_upsert_deletes_the_row() {
    let db = test_db!();
    let store = PgGrantStore::new(db.provider());
    let user = db.principal("user@example.org", Some(Role::User)).await.unwrap();
    let tree = db.tree(None, None).await.unwrap();
    let node = NodeRef::level(tree.level);

    store.upsert(user.id, node, true, true).await.unwrap();
    store.upsert(user.id, node, false, false).await.unwrap();

    assert!(store.get(user.id, node).await.unwrap().is_none());
    assert!(store.list_for_node(node).await.unwrap().is_empty());

    let mut conn = db.conn().await.unwrap();
    let rows: i64 = level_grant::table
        .count()
        .get_result(&mut conn)
        .await
        .unwrap();
    assert_eq!(rows, 0);
    drop(conn);

    db.drop_database().await.unwrap();
}

#[test_log::test(tokio::test)]
async fn each_level_reads_its_own_table() {
    let db = test_db!();
    let store = PgGrantStore::new(db.provider());
    let first = db.principal("first@example.org", Some(Role::Viewer)).await.unwrap();
    let second = db.principal("second@example.org", Some(Role::Viewer)).await.unwrap();
    let tree = db.tree(None, None).await.unwrap();
    let building = NodeRef::building(tree.building);

    store.upsert(first.id, building, true, false).await.unwrap();
    store.upsert(second.id, building, true, true).await.unwrap();

    for node in [NodeRef::site(tree.site), NodeRef::level(tree.level)] {
        assert!(store.get(first.id, node).await.unwrap().is_none(), "{node}");
    }

    let listed = store.list_for_node(building).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|grant| grant.node == building));

    assert_eq!(store.delete_all_for_node(building).await.unwrap(), 2);
    assert!(!store.revoke(first.id, building).await.unwrap());

    let mut conn = db.conn().await.unwrap();
    let rows: i64 = building_grant::table
        .count()
        .get_result(&mut conn)
        .await
        .unwrap();
    assert_eq!(rows, 0);
    drop(conn);

    db.drop_database().await.unwrap();
}

#[test_log::test(tokio::test)]
async fn deleting_a_node_cascades_to_grants_beneath_it() {
    let db = test_db!();
    let store = PgGrantStore::new(db.provider());
    let tree_accessor = PgHierarchy::new(db.provider());
    let user = db.principal("cascade@example.org", Some(Role::User)).await.unwrap();
    let tree = db.tree(None, None).await.unwrap();

    store
        .upsert(user.id, NodeRef::level(tree.level), true, false)
        .await
        .unwrap();
    store
        .upsert(user.id, NodeRef::part(tree.part), true, true)
        .await
        .unwrap();

    let mut conn = db.conn().await.unwrap();
    diesel::delete(level::table.find(tree.level))
        .execute(&mut conn)
        .await
        .unwrap();

    let level_rows: i64 = level_grant::table
        .count()
        .get_result(&mut conn)
        .await
        .unwrap();
    let part_rows: i64 = part_grant::table
        .count()
        .get_result(&mut conn)
        .await
        .unwrap();
    assert_eq!((level_rows, part_rows), (0, 0));
    drop(conn);

    assert!(!tree_accessor.exists(NodeRef::part(tree.part)).await.unwrap());
    assert!(tree_accessor.exists(NodeRef::building(tree.building)).await.unwrap());

    db.drop_database().await.unwrap();
}

#[test_log::test(tokio::test)]
async fn grant_on_unknown_node_is_rejected_by_the_database() {
    let db = test_db!();
    let store = PgGrantStore::new(db.provider());
    let user = db.principal("dangling@example.org", Some(Role::User)).await.unwrap();

    let err = store
        .upsert(user.id, NodeRef::part(Uuid::now_v7()), true, false)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::DatabaseError(_)), "{err:?}");

    db.drop_database().await.unwrap();
}
