use crate::ports::{BookCatalog, ListStore};
use std::sync::Arc;

/// リスト操作のポリシー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPolicy {
    /// 作成時に編集トークンを発行し、変更操作でその提示を求める
    pub require_edit_token: bool,
    /// 共有URLのオリジン（例: `https://sharereads.app`）
    pub public_origin: String,
}

impl Default for ListPolicy {
    fn default() -> Self {
        Self {
            require_edit_token: true,
            public_origin: "http://localhost:3000".to_string(),
        }
    }
}

/// サービスの依存関係
///
/// 関数型DDDの原則に従い、データ構造として定義。
/// 振る舞い（メソッド）は持たず、各ユースケース関数に明示的に渡される。
/// モジュールレベルのシングルトンは持たない。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub list_store: Arc<dyn ListStore>,
    pub book_catalog: Arc<dyn BookCatalog>,
    pub policy: ListPolicy,
}
