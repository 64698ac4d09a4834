use crate::application::ServiceDependencies;
use crate::domain::{self, AddBookOutcome, BookList, Caller, ListId, ListName, OwnerId, commands::*};
use crate::ports::ListStore;
use std::sync::Arc;

use super::errors::{ListApplicationError, Result};

/// ストアからリストを読み込むヘルパー関数
///
/// 更新・追加・削除の各ユースケースで共通利用される。
///
/// # エラー
/// - StoreError: 読み込み失敗
/// - ListNotFound: リストが存在しない
async fn load_list(list_store: &Arc<dyn ListStore>, list_id: ListId) -> Result<BookList> {
    list_store
        .get_by_id(list_id)
        .await?
        .ok_or(ListApplicationError::ListNotFound)
}

/// 読み込みと認可をまとめたヘルパー関数
async fn load_for_mutation(
    list_store: &Arc<dyn ListStore>,
    list_id: ListId,
    caller: &Caller,
) -> Result<BookList> {
    let list = load_list(list_store, list_id).await?;
    domain::book_list::authorize(&list, caller).inspect_err(|e| {
        tracing::warn!(list_id = %list_id, reason = %e, "Rejected list mutation");
    })?;
    Ok(list)
}

/// リストを作成する
///
/// ビジネスルール：
/// - リスト名が空・空白のみでないこと（ストアに到達する前に拒否）
/// - 書籍は空、作成日時と更新日時は同じ
/// - 編集トークン必須の設定では新しいトークンを発行する
///
/// # 戻り値
/// 作成されたリスト（発行された編集トークンを含む）
pub async fn create_list(deps: &ServiceDependencies, cmd: CreateList) -> Result<BookList> {
    // 1. 名前のバリデーション
    let name = ListName::parse(&cmd.name)?;

    // 2. ドメイン層の純粋関数を呼び出し
    let list = domain::book_list::create_list(
        name,
        cmd.description,
        cmd.owner_id,
        deps.policy.require_edit_token,
        cmd.created_at,
    );

    // 3. ストアに保存
    deps.list_store.insert(list.clone()).await?;

    tracing::info!(list_id = %list.id, name = list.name.as_str(), "List created");
    Ok(list)
}

/// IDでリストを取得する
///
/// 読み取りは公開（共有リンク用）で、認可を行わない。
pub async fn get_list(deps: &ServiceDependencies, list_id: ListId) -> Result<BookList> {
    load_list(&deps.list_store, list_id).await
}

/// 呼び出し元から見えるリストの一覧を取得する
pub async fn get_lists(
    deps: &ServiceDependencies,
    owner_id: Option<&OwnerId>,
) -> Result<Vec<BookList>> {
    Ok(deps.list_store.get_all(owner_id).await?)
}

/// リストの名前と説明文を更新する
///
/// ビジネスルール：
/// - リストが存在すること
/// - 呼び出し元が編集を許可されていること
/// - 新しい名前が空でないこと
pub async fn rename_or_describe(
    deps: &ServiceDependencies,
    cmd: UpdateListDetails,
) -> Result<BookList> {
    // 1. 読み込みと認可
    let list = load_for_mutation(&deps.list_store, cmd.list_id, &cmd.caller).await?;

    // 2. 名前のバリデーション
    let name = ListName::parse(&cmd.name)?;

    // 3. ドメイン層の純粋関数を呼び出し
    let updated = domain::book_list::update_details(list, name, cmd.description, cmd.updated_at);

    // 4. ストアに保存
    deps.list_store.replace(updated.clone()).await?;

    tracing::info!(list_id = %updated.id, "List details updated");
    Ok(updated)
}

/// リストに書籍を追加する
///
/// ビジネスルール：
/// - リストが存在すること
/// - 呼び出し元が編集を許可されていること
/// - 同じIDの書籍が既にある場合は何もしない（更新日時も変えず、保存もしない）
pub async fn add_book(deps: &ServiceDependencies, cmd: AddBook) -> Result<BookList> {
    // 1. 読み込みと認可
    let list = load_for_mutation(&deps.list_store, cmd.list_id, &cmd.caller).await?;
    let book_id = cmd.book.id.clone();

    // 2. ドメイン層の純粋関数を呼び出し
    match domain::book_list::add_book(list, cmd.book, cmd.added_at)? {
        AddBookOutcome::Added(updated) => {
            // 3. ストアに保存
            deps.list_store.replace(updated.clone()).await?;
            tracing::info!(list_id = %updated.id, book_id = %book_id, "Book added to list");
            Ok(updated)
        }
        AddBookOutcome::AlreadyPresent(unchanged) => {
            tracing::debug!(list_id = %unchanged.id, book_id = %book_id, "Book already in list");
            Ok(unchanged)
        }
    }
}

/// リストから書籍を取り除く
///
/// ビジネスルール：
/// - リストが存在すること
/// - 呼び出し元が編集を許可されていること
/// - 該当する書籍がなくても更新日時を進めて保存する
pub async fn remove_book(deps: &ServiceDependencies, cmd: RemoveBook) -> Result<BookList> {
    // 1. 読み込みと認可
    let list = load_for_mutation(&deps.list_store, cmd.list_id, &cmd.caller).await?;

    // 2. ドメイン層の純粋関数を呼び出し
    let updated = domain::book_list::remove_book(list, &cmd.book_id, cmd.removed_at);

    // 3. ストアに保存
    deps.list_store.replace(updated.clone()).await?;

    tracing::info!(list_id = %updated.id, book_id = %cmd.book_id, "Book removed from list");
    Ok(updated)
}

/// リストを削除する
///
/// 書籍メンバーシップも合わせて削除される。
/// 存在しないリストの削除は`ListNotFound`。
pub async fn delete_list(deps: &ServiceDependencies, cmd: DeleteList) -> Result<()> {
    // 1. 読み込みと認可
    load_for_mutation(&deps.list_store, cmd.list_id, &cmd.caller).await?;

    // 2. ストアから削除
    deps.list_store.delete(cmd.list_id).await?;

    tracing::info!(list_id = %cmd.list_id, "List deleted");
    Ok(())
}

/// 共有URLを取得する
///
/// 純粋な関数。リストの存在確認は行わない。
pub fn get_shareable_url(deps: &ServiceDependencies, list_id: ListId) -> String {
    domain::book_list::share_url(&deps.policy.public_origin, list_id)
}
