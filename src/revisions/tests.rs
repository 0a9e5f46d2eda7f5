// src/revisions/tests.rs

use super::models::*;
use crate::common::validation::LocaleCatalog;
use crate::common::ApiError;
use crate::i18n::Language;
use crate::test_support::{insert_user, test_app};
use crate::users::models::{EMAIL_STATUS_AVAILABLE, USER_STATUS_AVAILABLE};

fn revision(object_id: &str, title: &str) -> NewRevision {
    NewRevision {
        user_id: "U_AUTHOR".to_string(),
        object_type: 1,
        object_id: object_id.to_string(),
        title: title.to_string(),
        content: format!("{} body", title),
        log: "edit".to_string(),
    }
}

#[tokio::test]
async fn test_add_and_list_revisions_newest_first() {
    let app = test_app().await;
    let service = &app.state.revision_service;
    insert_user(&app.state.db, "U_AUTHOR", "author", "2024-01-01T00:00:00+00:00", USER_STATUS_AVAILABLE, EMAIL_STATUS_AVAILABLE).await;

    let first = service.add_revision(&revision("Q_1", "first")).await.unwrap();
    let second = service.add_revision(&revision("Q_1", "second")).await.unwrap();
    service.add_revision(&revision("Q_2", "other")).await.unwrap();

    assert!(first.id.starts_with("R_"));
    assert_eq!(first.status, REVISION_STATUS_NORMAL);

    let list = service.get_revision_list("Q_1").await.unwrap();
    let titles: Vec<_> = list.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, ["second", "first"]);
    assert_eq!(list[0].username.as_deref(), Some("author"));

    let last = service.get_last_revision("Q_1").await.unwrap().unwrap();
    assert_eq!(last.id, second.id);

    assert!(service.get_last_revision("Q_404").await.unwrap().is_none());
    assert!(service.get_revision_list("Q_404").await.unwrap().is_empty());
}

#[test]
fn test_object_id_is_required() {
    let catalog = LocaleCatalog::load(Language::English).unwrap();
    match catalog.validator("en_US").check(&GetRevisionListReq::default()) {
        Err(ApiError::ValidationError { field: Some(field), .. }) => {
            assert_eq!(field.key, "object_id");
            assert_eq!(field.value, "object_id is a required field");
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}
