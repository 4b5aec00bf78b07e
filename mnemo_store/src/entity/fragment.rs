//! sea-orm entity for the `fragments` table, following sea-orm's
//! conventional `DeriveEntityModel` shape.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "fragments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed)]
    pub scope_key: String,
    pub content: String,
    pub speaker: String,
    pub fragment_type: String,
    pub sentiment: String,
    /// JSON array of strings.
    pub entities: Json,
    /// JSON array of strings.
    pub topics: Json,
    pub importance_score: i16,
    pub confidence: f32,
    pub timestamp: DateTimeUtc,
    /// JSON object, string -> string.
    pub metadata: Json,
    /// JSON array of f32, `None` when no embedding has been computed yet.
    pub embedding: Option<Json>,
    #[sea_orm(indexed)]
    pub content_hash: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
