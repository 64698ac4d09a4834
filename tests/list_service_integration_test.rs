use chrono::Utc;
use sharereads::application::catalog::{SearchError, search_books};
use sharereads::application::list::{
    ListApplicationError, add_book, create_list, delete_list, get_list, get_lists,
    get_shareable_url, remove_book, rename_or_describe,
};
use sharereads::domain::commands::*;
use sharereads::domain::{Book, BookId, Caller, EditToken, ListId, OwnerId};
use sharereads::ports::ListStore;

mod common;
use common::{TEST_ORIGIN, at, book, setup};

// ============================================================================
// ヘルパー
// ============================================================================

fn create_cmd(name: &str) -> CreateList {
    CreateList {
        name: name.to_string(),
        description: None,
        owner_id: None,
        created_at: Utc::now(),
    }
}

fn add_cmd(list_id: ListId, caller: &Caller, id: &str, title: &str) -> AddBook {
    AddBook {
        list_id,
        book: book(id, title),
        caller: caller.clone(),
        added_at: Utc::now(),
    }
}

fn remove_cmd(list_id: ListId, caller: &Caller, id: &str) -> RemoveBook {
    RemoveBook {
        list_id,
        book_id: BookId::parse(id).unwrap(),
        caller: caller.clone(),
        removed_at: Utc::now(),
    }
}

// ============================================================================
// リスト作成
// ============================================================================

#[tokio::test]
async fn test_create_list_persists_empty_list() {
    let ctx = setup(false);

    let cmd = CreateList {
        description: Some("Books for the beach".to_string()),
        ..create_cmd("Summer Reads")
    };
    let list = create_list(&ctx.deps, cmd).await.unwrap();

    assert_eq!(list.name.as_str(), "Summer Reads");
    assert_eq!(list.description.as_deref(), Some("Books for the beach"));
    assert!(list.books.is_empty());
    assert_eq!(list.created_at, list.updated_at);

    let stored = ctx.list_store.get_by_id(list.id).await.unwrap();
    assert_eq!(stored, Some(list));
}

#[tokio::test]
async fn test_create_list_rejects_blank_name_before_store() {
    let ctx = setup(false);

    for name in ["", "   ", "\t\n"] {
        let result = create_list(&ctx.deps, create_cmd(name)).await;
        assert!(matches!(
            result,
            Err(ListApplicationError::ValidationFailed(_))
        ));
    }

    assert!(ctx.list_store.is_empty());
}

#[tokio::test]
async fn test_create_list_issues_edit_token_when_required() {
    let ctx = setup(true);
    let list = create_list(&ctx.deps, create_cmd("Mine")).await.unwrap();
    assert!(list.edit_token.is_some());

    let ctx = setup(false);
    let list = create_list(&ctx.deps, create_cmd("Mine")).await.unwrap();
    assert!(list.edit_token.is_none());
}

// ============================================================================
// 書籍の追加・削除
// ============================================================================

#[tokio::test]
async fn test_add_then_remove_is_inverse() {
    let ctx = setup(false);
    let caller = Caller::anonymous();
    let list = create_list(&ctx.deps, create_cmd("Sci-fi")).await.unwrap();
    let list = add_book(&ctx.deps, add_cmd(list.id, &caller, "B0", "Foundation"))
        .await
        .unwrap();
    let before = list.books.clone();

    add_book(&ctx.deps, add_cmd(list.id, &caller, "B1", "Dune"))
        .await
        .unwrap();
    let after = remove_book(&ctx.deps, remove_cmd(list.id, &caller, "B1"))
        .await
        .unwrap();

    assert_eq!(after.books, before);
}

#[tokio::test]
async fn test_adding_same_book_repeatedly_keeps_one_entry() {
    let ctx = setup(false);
    let caller = Caller::anonymous();
    let list = create_list(&ctx.deps, create_cmd("Dupes")).await.unwrap();

    let first = add_book(&ctx.deps, add_cmd(list.id, &caller, "B1", "Dune"))
        .await
        .unwrap();

    for _ in 0..3 {
        let again = add_book(&ctx.deps, add_cmd(list.id, &caller, "B1", "Dune"))
            .await
            .unwrap();
        // 重複追加は何もしない（更新日時も変わらない）
        assert_eq!(again, first);
    }

    let stored = get_list(&ctx.deps, list.id).await.unwrap();
    let count = stored
        .books
        .iter()
        .filter(|b| b.id.as_str() == "B1")
        .count();
    assert_eq!(count, 1);
    assert_eq!(stored.updated_at, first.updated_at);
}

#[tokio::test]
async fn test_padded_book_id_matches_trimmed_id() {
    let ctx = setup(false);
    let caller = Caller::anonymous();
    let list = create_list(&ctx.deps, create_cmd("Padded")).await.unwrap();

    let padded: Book = serde_json::from_str(r#"{"id":" B1 ","title":"Dune"}"#).unwrap();
    add_book(
        &ctx.deps,
        AddBook {
            list_id: list.id,
            book: padded,
            caller: caller.clone(),
            added_at: Utc::now(),
        },
    )
    .await
    .unwrap();
    let after_adds = add_book(&ctx.deps, add_cmd(list.id, &caller, "B1", "Dune"))
        .await
        .unwrap();
    assert_eq!(after_adds.books, vec![book("B1", "Dune")]);

    let after_remove = remove_book(&ctx.deps, remove_cmd(list.id, &caller, " B1 "))
        .await
        .unwrap();
    assert!(after_remove.books.is_empty());
}

#[tokio::test]
async fn test_blank_title_is_rejected_before_store() {
    let ctx = setup(false);
    let caller = Caller::anonymous();
    let list = create_list(&ctx.deps, create_cmd("Titles")).await.unwrap();

    for title in ["", "   "] {
        let result = add_book(&ctx.deps, add_cmd(list.id, &caller, "B9", title)).await;
        assert!(matches!(
            result,
            Err(ListApplicationError::ValidationFailed(_))
        ));
    }

    assert_eq!(get_list(&ctx.deps, list.id).await.unwrap(), list);
}

#[tokio::test]
async fn test_summer_reads_end_to_end() {
    let ctx = setup(false);
    let caller = Caller::anonymous();
    let base = Utc::now();

    let list = create_list(
        &ctx.deps,
        CreateList {
            created_at: base,
            ..create_cmd("Summer Reads")
        },
    )
    .await
    .unwrap();

    add_book(
        &ctx.deps,
        AddBook {
            added_at: at(base, 1),
            ..add_cmd(list.id, &caller, "B1", "Dune")
        },
    )
    .await
    .unwrap();
    add_book(
        &ctx.deps,
        AddBook {
            added_at: at(base, 2),
            ..add_cmd(list.id, &caller, "B2", "Hyperion")
        },
    )
    .await
    .unwrap();
    let final_list = remove_book(
        &ctx.deps,
        RemoveBook {
            removed_at: at(base, 3),
            ..remove_cmd(list.id, &caller, "B1")
        },
    )
    .await
    .unwrap();

    assert_eq!(final_list.books, vec![book("B2", "Hyperion")]);
    assert!(final_list.updated_at > final_list.created_at);
}

#[tokio::test]
async fn test_remove_missing_book_bumps_updated_at() {
    let ctx = setup(false);
    let caller = Caller::anonymous();
    let base = Utc::now();

    let list = create_list(
        &ctx.deps,
        CreateList {
            created_at: base,
            ..create_cmd("Empty")
        },
    )
    .await
    .unwrap();

    let updated = remove_book(
        &ctx.deps,
        RemoveBook {
            removed_at: at(base, 10),
            ..remove_cmd(list.id, &caller, "ghost")
        },
    )
    .await
    .unwrap();

    assert!(updated.books.is_empty());
    assert_eq!(updated.updated_at, at(base, 10));
}

// ============================================================================
// 名前・説明文の更新
// ============================================================================

#[tokio::test]
async fn test_rename_or_describe() {
    let ctx = setup(false);
    let base = Utc::now();
    let list = create_list(
        &ctx.deps,
        CreateList {
            created_at: base,
            ..create_cmd("Old")
        },
    )
    .await
    .unwrap();

    let updated = rename_or_describe(
        &ctx.deps,
        UpdateListDetails {
            list_id: list.id,
            name: "New".to_string(),
            description: Some("described".to_string()),
            caller: Caller::anonymous(),
            updated_at: at(base, 5),
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.id, list.id);
    assert_eq!(updated.name.as_str(), "New");
    assert_eq!(updated.description.as_deref(), Some("described"));
    assert_eq!(updated.created_at, base);
    assert_eq!(updated.updated_at, at(base, 5));

    let blank = rename_or_describe(
        &ctx.deps,
        UpdateListDetails {
            list_id: list.id,
            name: "  ".to_string(),
            description: None,
            caller: Caller::anonymous(),
            updated_at: at(base, 6),
        },
    )
    .await;
    assert!(matches!(blank, Err(ListApplicationError::ValidationFailed(_))));
}

// ============================================================================
// 削除とNotFound
// ============================================================================

#[tokio::test]
async fn test_mutations_after_delete_fail_with_not_found() {
    let ctx = setup(false);
    let caller = Caller::anonymous();
    let list = create_list(&ctx.deps, create_cmd("Doomed")).await.unwrap();

    delete_list(
        &ctx.deps,
        DeleteList {
            list_id: list.id,
            caller: caller.clone(),
        },
    )
    .await
    .unwrap();

    let add = add_book(&ctx.deps, add_cmd(list.id, &caller, "B1", "Dune")).await;
    assert!(matches!(add, Err(ListApplicationError::ListNotFound)));

    let remove = remove_book(&ctx.deps, remove_cmd(list.id, &caller, "B1")).await;
    assert!(matches!(remove, Err(ListApplicationError::ListNotFound)));

    let rename = rename_or_describe(
        &ctx.deps,
        UpdateListDetails {
            list_id: list.id,
            name: "Back".to_string(),
            description: None,
            caller: caller.clone(),
            updated_at: Utc::now(),
        },
    )
    .await;
    assert!(matches!(rename, Err(ListApplicationError::ListNotFound)));

    let again = delete_list(
        &ctx.deps,
        DeleteList {
            list_id: list.id,
            caller,
        },
    )
    .await;
    assert!(matches!(again, Err(ListApplicationError::ListNotFound)));

    assert!(matches!(
        get_list(&ctx.deps, list.id).await,
        Err(ListApplicationError::ListNotFound)
    ));
}

// ============================================================================
// 認可
// ============================================================================

#[tokio::test]
async fn test_edit_token_guards_every_mutation() {
    let ctx = setup(true);
    let list = create_list(&ctx.deps, create_cmd("Guarded")).await.unwrap();
    let token = list.edit_token.clone().unwrap();

    let stranger = Caller::with_token(EditToken::from_string("not-the-token"));
    let anonymous = Caller::anonymous();

    for caller in [&stranger, &anonymous] {
        let add = add_book(&ctx.deps, add_cmd(list.id, caller, "B1", "Dune")).await;
        assert!(matches!(add, Err(ListApplicationError::Unauthorized(_))));

        let remove = remove_book(&ctx.deps, remove_cmd(list.id, caller, "B1")).await;
        assert!(matches!(remove, Err(ListApplicationError::Unauthorized(_))));

        let delete = delete_list(
            &ctx.deps,
            DeleteList {
                list_id: list.id,
                caller: caller.clone(),
            },
        )
        .await;
        assert!(matches!(delete, Err(ListApplicationError::Unauthorized(_))));
    }

    // 拒否された操作は何も書き込まない
    let stored = get_list(&ctx.deps, list.id).await.unwrap();
    assert_eq!(stored, list);

    let owner = Caller::with_token(token);
    let updated = add_book(&ctx.deps, add_cmd(list.id, &owner, "B1", "Dune"))
        .await
        .unwrap();
    assert_eq!(updated.books.len(), 1);
}

#[tokio::test]
async fn test_owner_scoping() {
    let ctx = setup(false);
    let alice = OwnerId::parse("alice").unwrap();
    let bob = OwnerId::parse("bob").unwrap();

    let list = create_list(
        &ctx.deps,
        CreateList {
            owner_id: Some(alice.clone()),
            ..create_cmd("Alice's")
        },
    )
    .await
    .unwrap();
    create_list(
        &ctx.deps,
        CreateList {
            owner_id: Some(bob.clone()),
            ..create_cmd("Bob's")
        },
    )
    .await
    .unwrap();

    let alices = get_lists(&ctx.deps, Some(&alice)).await.unwrap();
    assert_eq!(alices.len(), 1);
    assert_eq!(alices[0].id, list.id);
    assert_eq!(get_lists(&ctx.deps, None).await.unwrap().len(), 2);

    let as_bob = Caller {
        owner_id: Some(bob),
        edit_token: None,
    };
    let result = add_book(&ctx.deps, add_cmd(list.id, &as_bob, "B1", "Dune")).await;
    assert!(matches!(result, Err(ListApplicationError::Unauthorized(_))));

    let as_alice = Caller {
        owner_id: Some(alice),
        edit_token: None,
    };
    assert!(
        add_book(&ctx.deps, add_cmd(list.id, &as_alice, "B1", "Dune"))
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_owned_list_with_token_requires_both() {
    let ctx = setup(true);
    let alice = OwnerId::parse("alice").unwrap();
    let list = create_list(
        &ctx.deps,
        CreateList {
            owner_id: Some(alice.clone()),
            ..create_cmd("Alice's guarded")
        },
    )
    .await
    .unwrap();
    let token = list.edit_token.clone().unwrap();

    // 所有者ヘッダーだけではトークンの代わりにならない
    let owner_only = Caller {
        owner_id: Some(alice.clone()),
        edit_token: None,
    };
    let result = add_book(&ctx.deps, add_cmd(list.id, &owner_only, "B1", "Dune")).await;
    assert!(matches!(result, Err(ListApplicationError::Unauthorized(_))));

    // トークンだけでも所有者が一致しなければ拒否
    let token_only = Caller::with_token(token.clone());
    let result = add_book(&ctx.deps, add_cmd(list.id, &token_only, "B1", "Dune")).await;
    assert!(matches!(result, Err(ListApplicationError::Unauthorized(_))));

    assert!(get_list(&ctx.deps, list.id).await.unwrap().books.is_empty());

    let both = Caller {
        owner_id: Some(alice),
        edit_token: Some(token),
    };
    let updated = add_book(&ctx.deps, add_cmd(list.id, &both, "B1", "Dune"))
        .await
        .unwrap();
    assert_eq!(updated.books.len(), 1);
}

// ============================================================================
// 共有URL
// ============================================================================

#[tokio::test]
async fn test_shareable_url_needs_no_list() {
    let ctx = setup(false);
    let id = ListId::new();

    let url = get_shareable_url(&ctx.deps, id);
    assert_eq!(url, format!("{}/list/{}", TEST_ORIGIN, id));
    assert!(!url.contains('?'));
    assert!(!url.ends_with('/'));
}

// ============================================================================
// カタログ検索
// ============================================================================

#[tokio::test]
async fn test_blank_search_skips_catalog() {
    let ctx = setup(false);
    ctx.catalog.add_book(book("B1", "Dune"));

    for query in ["", "   ", "\n\t"] {
        let results = search_books(&ctx.deps, query, 0).await.unwrap();
        assert!(results.items.is_empty());
        assert_eq!(results.total_items, 0);
    }

    assert_eq!(ctx.catalog.call_count(), 0);
}

#[tokio::test]
async fn test_search_reissues_every_call() {
    let ctx = setup(false);
    ctx.catalog.add_book(book("B1", "Dune"));
    ctx.catalog.add_book(book("B2", "Dune Messiah"));
    ctx.catalog.add_book(book("B3", "Hyperion"));

    let first = search_books(&ctx.deps, "dune", 0).await.unwrap();
    let second = search_books(&ctx.deps, "dune", 0).await.unwrap();

    assert_eq!(first.total_items, 2);
    assert_eq!(first, second);
    assert_eq!(ctx.catalog.call_count(), 2);
}

#[tokio::test]
async fn test_search_failure_is_not_an_empty_result() {
    let ctx = setup(false);
    ctx.catalog.set_failing(true);

    let result = search_books(&ctx.deps, "dune", 0).await;
    assert!(matches!(result, Err(SearchError::CatalogUnavailable(_))));

    ctx.catalog.set_failing(false);
    let result = search_books(&ctx.deps, "no such book", 0).await.unwrap();
    assert_eq!(result.total_items, 0);
}
