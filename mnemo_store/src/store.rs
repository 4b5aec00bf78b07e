use mnemo_core::{content_hash, Error, Fragment, FragmentType, Result, Scope, Speaker};
use rayon::prelude::*;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, Schema, Set,
};
use tracing::info;
use uuid::Uuid;

use crate::convert;
use crate::entity::fragment;
use crate::similarity::cosine_similarity;

fn is_table_already_exists_error(err: &DbErr) -> bool {
    err.to_string().contains("table") && err.to_string().contains("already exists")
}

/// A fragment paired with its similarity score against a query embedding.
#[derive(Debug, Clone)]
pub struct Scored {
    pub fragment: Fragment,
    pub score: f64,
}

/// Predicates applied before ranking.
#[derive(Debug, Clone, Default)]
pub struct Filters {
    pub min_importance: Option<u8>,
    pub speaker: Option<Speaker>,
    pub fragment_type: Option<FragmentType>,
}

/// Persistent fragment store: one sqlite-backed `fragments` table holding
/// every scope, partitioned logically by `scope_key`, with
/// brute-force cosine similarity search over the in-scope rows.
pub struct Store {
    db: DatabaseConnection,
    dimension: usize,
}

impl Store {
    /// Connect to `database_url` (e.g. `sqlite:{data_dir}/vectordb/memory.db`)
    /// and ensure the `fragments` table exists. `dimension` is the bound
    /// embedding adapter's output size; every insert and query embedding
    /// is checked against it.
    pub async fn connect(database_url: &str, dimension: usize) -> Result<Self> {
        info!("connecting to fragment store: {database_url}");
        let db = Database::connect(database_url)
            .await
            .map_err(|e| Error::StoreUnavailable(e.to_string()))?;

        let backend = db.get_database_backend();
        let schema = Schema::new(backend);
        let stmt = schema.create_table_from_entity(fragment::Entity);
        match db
            .execute_unprepared(&backend.build(&stmt).to_string())
            .await
        {
            Ok(_) => {}
            Err(e) if is_table_already_exists_error(&e) => {
                info!("fragments table already exists, skipping creation");
            }
            Err(e) => return Err(Error::StoreUnavailable(e.to_string())),
        }

        Ok(Self { db, dimension })
    }

    fn check_dimension(&self, embedding: &[f32]) -> Result<()> {
        if embedding.len() != self.dimension {
            return Err(Error::DimensionMismatch {
                expected: self.dimension,
                actual: embedding.len(),
            });
        }
        Ok(())
    }

    /// Insert a fragment into `scope`'s partition. Idempotent on
    /// `(scope, speaker, content)`: if a row with the same dedup key
    /// already exists, the existing id is returned without inserting a
    /// duplicate.
    pub async fn insert(&self, scope: &Scope, fragment: &Fragment) -> Result<Uuid> {
        if let Some(embedding) = &fragment.embedding {
            self.check_dimension(embedding)?;
        }

        let scope_key = scope.partition_key();
        let dedup_hash = content_hash(
            &scope_key,
            &format!("{}:{}", fragment.speaker, fragment.content),
        );

        let existing = fragment::Entity::find()
            .filter(fragment::Column::ScopeKey.eq(scope_key.clone()))
            .filter(fragment::Column::ContentHash.eq(dedup_hash.clone()))
            .one(&self.db)
            .await
            .map_err(|e| Error::StoreUnavailable(e.to_string()))?;

        if let Some(row) = existing {
            return Ok(row.id);
        }

        let model = fragment::ActiveModel {
            id: Set(fragment.id),
            scope_key: Set(scope_key),
            content: Set(fragment.content.clone()),
            speaker: Set(fragment.speaker.to_string()),
            fragment_type: Set(fragment.fragment_type.to_string()),
            sentiment: Set(fragment.sentiment.to_string()),
            entities: Set(convert::entities_json(fragment)),
            topics: Set(convert::topics_json(fragment)),
            importance_score: Set(i16::from(fragment.importance_score)),
            confidence: Set(fragment.confidence),
            timestamp: Set(fragment.timestamp),
            metadata: Set(convert::metadata_json(fragment)),
            embedding: Set(fragment.embedding.as_deref().map(convert::embedding_to_json)),
            content_hash: Set(dedup_hash),
        };

        let inserted = model
            .insert(&self.db)
            .await
            .map_err(|e| Error::StoreUnavailable(e.to_string()))?;

        Ok(inserted.id)
    }

    /// All fragments in `scope` matching `filters`, unranked and unordered.
    /// Internal helper shared by `list` and `query`; `query` does its own
    /// similarity-based sort, so it fetches through here rather than `list`.
    async fn fetch(&self, scope: &Scope, filters: &Filters) -> Result<Vec<Fragment>> {
        let mut query =
            fragment::Entity::find().filter(fragment::Column::ScopeKey.eq(scope.partition_key()));

        if let Some(min_importance) = filters.min_importance {
            query = query.filter(fragment::Column::ImportanceScore.gte(i16::from(min_importance)));
        }
        if let Some(speaker) = filters.speaker {
            query = query.filter(fragment::Column::Speaker.eq(speaker.to_string()));
        }
        if let Some(fragment_type) = filters.fragment_type {
            query = query.filter(fragment::Column::FragmentType.eq(fragment_type.to_string()));
        }

        let rows = query
            .all(&self.db)
            .await
            .map_err(|e| Error::StoreUnavailable(e.to_string()))?;

        Ok(rows.into_iter().map(convert::fragment_from_model).collect())
    }

    /// Fragments in `scope` matching `filters`, ordered by insertion-time
    /// descending and capped at `limit`. Insertion
    /// order is recovered from the UUIDv7 fragment id, which is
    /// time-ordered by construction (`Fragment::new` stamps `Uuid::now_v7`).
    pub async fn list(&self, scope: &Scope, limit: usize, filters: &Filters) -> Result<Vec<Fragment>> {
        let mut fragments = self.fetch(scope, filters).await?;
        fragments.sort_unstable_by(|a, b| b.id.cmp(&a.id));
        fragments.truncate(limit);
        Ok(fragments)
    }

    /// Number of fragments currently stored in `scope`.
    pub async fn count(&self, scope: &Scope) -> Result<u64> {
        fragment::Entity::find()
            .filter(fragment::Column::ScopeKey.eq(scope.partition_key()))
            .count(&self.db)
            .await
            .map_err(|e| Error::StoreUnavailable(e.to_string()))
    }

    /// Brute-force cosine similarity search over every fragment in `scope`
    /// that matches `filters`, returning the `top_k` highest-scoring rows
    /// sorted descending. Computed in parallel with rayon.
    pub async fn query(
        &self,
        scope: &Scope,
        query_embedding: &[f32],
        filters: &Filters,
        top_k: usize,
    ) -> Result<Vec<Scored>> {
        self.check_dimension(query_embedding)?;

        let fragments = self.fetch(scope, filters).await?;

        let mut scored: Vec<Scored> = fragments
            .into_par_iter()
            .map(|fragment| {
                let score = fragment
                    .embedding
                    .as_deref()
                    .map_or(0.0, |emb| cosine_similarity(query_embedding, emb));
                Scored { fragment, score }
            })
            .collect();

        scored.par_sort_unstable_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(top_k);

        Ok(scored)
    }

    /// Delete every fragment belonging to `scope`. Used when a session ends
    /// or a partition is explicitly reset.
    pub async fn delete_scope(&self, scope: &Scope) -> Result<u64> {
        let result = fragment::Entity::delete_many()
            .filter(fragment::Column::ScopeKey.eq(scope.partition_key()))
            .exec(&self.db)
            .await
            .map_err(|e| Error::StoreUnavailable(e.to_string()))?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mnemo_core::{Fragment, FragmentType, Scope, Sentiment, Speaker};

    fn test_scope(session: &str) -> Scope {
        Scope::new("user-1".to_string(), session.to_string(), "default".to_string())
    }

    fn test_fragment(content: &str, importance: i64) -> Fragment {
        let mut fragment = Fragment::new(
            content.to_string(),
            Speaker::User,
            FragmentType::Fact,
            Sentiment::Neutral,
            vec![],
            vec![],
            importance,
            0.9,
            chrono::Utc::now(),
            std::collections::HashMap::new(),
        )
        .unwrap();
        fragment.embedding = Some(vec![1.0, 0.0, 0.0]);
        fragment
    }

    async fn in_memory_store() -> Store {
        Store::connect("sqlite::memory:", 3).await.unwrap()
    }

    #[tokio::test]
    async fn insert_and_list_round_trip() {
        let store = in_memory_store().await;
        let scope = test_scope("s1");
        let fragment = test_fragment("likes coffee", 6);

        store.insert(&scope, &fragment).await.unwrap();
        let listed = store.list(&scope, 100, &Filters::default()).await.unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].content, "likes coffee");
    }

    #[tokio::test]
    async fn insert_is_idempotent_on_dedup_key() {
        let store = in_memory_store().await;
        let scope = test_scope("s1");
        let fragment = test_fragment("likes coffee", 6);

        let first = store.insert(&scope, &fragment).await.unwrap();
        let second = store.insert(&scope, &fragment).await.unwrap();
        assert_eq!(first, second);

        let listed = store.list(&scope, 100, &Filters::default()).await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn list_is_ordered_newest_first_and_respects_limit() {
        let store = in_memory_store().await;
        let scope = test_scope("s1");

        for content in ["first", "second", "third"] {
            store.insert(&scope, &test_fragment(content, 6)).await.unwrap();
        }

        let listed = store.list(&scope, 2, &Filters::default()).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].content, "third");
        assert_eq!(listed[1].content, "second");
    }

    #[tokio::test]
    async fn scopes_are_isolated() {
        let store = in_memory_store().await;
        let scope_a = test_scope("a");
        let scope_b = test_scope("b");

        store.insert(&scope_a, &test_fragment("a fact", 6)).await.unwrap();

        let in_b = store.list(&scope_b, 100, &Filters::default()).await.unwrap();
        assert!(in_b.is_empty());
    }

    #[tokio::test]
    async fn query_rejects_mismatched_dimension() {
        let store = in_memory_store().await;
        let scope = test_scope("s1");
        let result = store.query(&scope, &[1.0, 0.0], &Filters::default(), 5).await;
        assert!(matches!(result, Err(Error::DimensionMismatch { .. })));
    }

    #[tokio::test]
    async fn delete_scope_removes_only_that_scope() {
        let store = in_memory_store().await;
        let scope_a = test_scope("a");
        let scope_b = test_scope("b");

        store.insert(&scope_a, &test_fragment("a fact", 6)).await.unwrap();
        store.insert(&scope_b, &test_fragment("b fact", 6)).await.unwrap();

        store.delete_scope(&scope_a).await.unwrap();

        assert_eq!(store.count(&scope_a).await.unwrap(), 0);
        assert_eq!(store.count(&scope_b).await.unwrap(), 1);
    }
}
