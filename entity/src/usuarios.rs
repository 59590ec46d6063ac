use sea_orm::entity::prelude::*;

/// Registered account row. `gmail` and `nfc_token` are unique at the storage level.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "usuarios")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub dni: String,
    pub nombre: String,
    pub apellidos: String,
    #[sea_orm(unique)]
    pub gmail: String,
    pub password: String,
    pub rol: String,
    #[sea_orm(unique)]
    pub nfc_token: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
