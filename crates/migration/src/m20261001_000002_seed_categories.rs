//! Default cost category catalog.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum CostCategories {
    Table,
    Code,
    Name,
    NameEn,
    AllocationMethod,
    IsHeating,
}

/// (code, name, English name, allocation method, heating)
const DEFAULT_CATEGORIES: [(&str, &str, &str, &str, bool); 12] = [
    ("GRUNDSTEUER", "Grundsteuer", "Property tax", "AREA", false),
    ("GEB_VERS", "Gebäudeversicherung", "Building insurance", "AREA", false),
    ("HAUSSTROM", "Allgemeinstrom", "Common electricity", "UNITS", false),
    ("REINIGUNG", "Hausreinigung", "Cleaning", "UNITS", false),
    ("GARTEN", "Gartenpflege", "Garden", "UNITS", false),
    ("MUELL", "Müll", "Waste", "PERSONS", false),
    ("WASSER", "Wasser/Abwasser", "Water/Sewage", "WATER_M3", false),
    ("HEIZ_BRENN", "Heizung Brennstoff", "Heating fuel", "HEAT_SPLIT_70_30", true),
    ("HEIZ_WART", "Heizung Wartung", "Heating service", "HEAT_SPLIT_70_30", true),
    ("SCHORN", "Schornsteinfeger", "Chimney sweep", "HEAT_SPLIT_70_30", true),
    ("HAUSMEISTER", "Hausmeister", "Janitor", "UNITS", false),
    ("SONSTIGE_BK", "Sonstige BK", "Other costs", "UNITS", false),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert()
            .into_table(CostCategories::Table)
            .columns([
                CostCategories::Code,
                CostCategories::Name,
                CostCategories::NameEn,
                CostCategories::AllocationMethod,
                CostCategories::IsHeating,
            ])
            .to_owned();
        for (code, name, name_en, method, is_heating) in DEFAULT_CATEGORIES {
            insert.values_panic([
                code.into(),
                name.into(),
                name_en.into(),
                method.into(),
                is_heating.into(),
            ]);
        }
        // Keep categories that already exist.
        insert.on_conflict(
            OnConflict::column(CostCategories::Code)
                .do_nothing()
                .to_owned(),
        );

        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let codes = DEFAULT_CATEGORIES.map(|(code, ..)| code);
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(CostCategories::Table)
                    .and_where(Expr::col(CostCategories::Code).is_in(codes))
                    .to_owned(),
            )
            .await
    }
}
