use uuid::Uuid;

use vigie_core::types::{NodeRef, Operation, Role};
use vigie_service::auth::{
    AccessControl, HierarchyAccessor, OwnershipStore, postgres::PgHierarchy,
};
use vigie_service::error::ServiceError;

use crate::helpers::test_db;

#[test_log::test(tokio::test)]
async fn ancestors_are_walked_nearest_first() {
    let db = test_db!();
    let accessor = PgHierarchy::new(db.provider());
    let tree = db.tree(None, None).await.unwrap();
    let [site, building, level, part] = tree.nodes();

    assert_eq!(
        accessor.ancestors_of(part).await.unwrap(),
        vec![level, building, site]
    );
    assert_eq!(accessor.parent_of(site).await.unwrap(), None);
    for node in tree.nodes() {
        assert!(accessor.exists(node).await.unwrap(), "{node}");
    }

    db.drop_database().await.unwrap();
}

#[test_log::test(tokio::test)]
async fn unknown_nodes_are_not_found() {
    let db = test_db!();
    let accessor = PgHierarchy::new(db.provider());
    let missing = Uuid::now_v7();

    assert!(!accessor.exists(NodeRef::site(missing)).await.unwrap());
    assert!(matches!(
        accessor.parent_of(NodeRef::part(missing)).await,
        Err(ServiceError::NotFound(_))
    ));
    assert!(matches!(
        accessor.site_client(missing).await,
        Err(ServiceError::NotFound(_))
    ));
    assert!(matches!(
        accessor.part_owner(missing).await,
        Err(ServiceError::NotFound(_))
    ));

    db.drop_database().await.unwrap();
}

#[test_log::test(tokio::test)]
async fn client_and_owner_columns_are_read_back() {
    let db = test_db!();
    let accessor = PgHierarchy::new(db.provider());
    let client = db.principal("client@example.org", Some(Role::User)).await.unwrap();
    let owner = db
        .principal("owner@example.org", Some(Role::UserEntreprise))
        .await
        .unwrap();
    let tree = db.tree(Some(client.id), Some(owner.id)).await.unwrap();
    let bare = db.tree(None, None).await.unwrap();

    assert_eq!(accessor.site_client(tree.site).await.unwrap(), Some(client.id));
    assert_eq!(accessor.part_owner(tree.part).await.unwrap(), Some(owner.id));
    assert_eq!(accessor.site_client(bare.site).await.unwrap(), None);
    assert_eq!(accessor.part_owner(bare.part).await.unwrap(), None);

    db.drop_database().await.unwrap();
}

#[test_log::test(tokio::test)]
async fn owned_part_is_only_found_under_its_own_site() {
    let db = test_db!();
    let accessor = PgHierarchy::new(db.provider());
    let owner = db
        .principal("owner@example.org", Some(Role::UserEntreprise))
        .await
        .unwrap();
    let other = db
        .principal("other@example.org", Some(Role::UserEntreprise))
        .await
        .unwrap();
    let owned = db.tree(None, Some(owner.id)).await.unwrap();
    let elsewhere = db.tree(None, None).await.unwrap();

    assert!(accessor.exists_owned_part_under(owned.site, owner.id).await.unwrap());
    assert!(!accessor.exists_owned_part_under(elsewhere.site, owner.id).await.unwrap());
    assert!(!accessor.exists_owned_part_under(owned.site, other.id).await.unwrap());

    let updated = accessor
        .set_owner(&[owned.part, Uuid::now_v7()], Some(other.id))
        .await
        .unwrap();
    assert_eq!(updated, 1);
    assert!(!accessor.exists_owned_part_under(owned.site, owner.id).await.unwrap());
    assert!(accessor.exists_owned_part_under(owned.site, other.id).await.unwrap());

    assert_eq!(accessor.set_owner(&[owned.part], None).await.unwrap(), 1);
    assert_eq!(accessor.part_owner(owned.part).await.unwrap(), None);

    db.drop_database().await.unwrap();
}

#[test_log::test(tokio::test)]
async fn resolver_over_postgres_follows_the_decision_chain() {
    let db = test_db!();
    let access = AccessControl::postgres(db.provider());
    let client = db.principal("client@example.org", Some(Role::User)).await.unwrap();
    let owner = db
        .principal("owner@example.org", Some(Role::UserEntreprise))
        .await
        .unwrap();
    let viewer = db.principal("viewer@example.org", Some(Role::Viewer)).await.unwrap();
    let tree = db.tree(Some(client.id), Some(owner.id)).await.unwrap();
    let [site, building, level, part] = tree.nodes();

    access
        .grants()
        .upsert(viewer.id, building, true, false)
        .await
        .unwrap();

    let cases = [
        (&client, site, Operation::Write, true),
        (&client, level, Operation::Read, false),
        (&owner, part, Operation::Write, true),
        (&owner, site, Operation::Read, true),
        (&owner, site, Operation::Write, false),
        (&viewer, part, Operation::Read, true),
        (&viewer, part, Operation::Write, false),
        (&viewer, site, Operation::Read, false),
    ];
    for (principal, node, op, expected) in cases {
        let decision = access.resolver().decide(principal, node, op).await.unwrap();
        assert_eq!(decision.is_allowed(), expected, "{} {op} {node}", principal.email);
    }

    db.drop_database().await.unwrap();
}
