//! Initial schema.
//!
//! - `properties` / `units`: the rental objects costs are allocated to
//! - `cost_categories`: catalog of cost types and their allocation method
//! - `property_settings`: per property allocation parameters
//! - `cost_entries`: the cost ledger (gross amounts in cents)
//! - `unit_persons`: occupancy per unit and year
//! - `meters` / `meter_readings`: cumulative counters per unit
//! - `leases` / `payments`: what settlements reconcile against

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Properties {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum Units {
    Table,
    Id,
    PropertyId,
    Label,
    AreaSqm,
}

#[derive(Iden)]
enum CostCategories {
    Table,
    Code,
    Name,
    NameEn,
    AllocationMethod,
    IsHeating,
}

#[derive(Iden)]
enum PropertySettings {
    Table,
    PropertyId,
    HeatRatioConsumption,
    PersonsDefault,
    WaterAllocationFallback,
}

#[derive(Iden)]
enum CostEntries {
    Table,
    Id,
    PropertyId,
    UnitId,
    Date,
    PeriodStart,
    PeriodEnd,
    CategoryCode,
    AmountMinor,
    VatRate,
    Supplier,
    InvoiceNo,
    Description,
}

#[derive(Iden)]
enum UnitPersons {
    Table,
    Id,
    PropertyId,
    UnitId,
    Year,
    Persons,
}

#[derive(Iden)]
enum Meters {
    Table,
    Id,
    UnitId,
    KindLabel,
    SerialNumber,
    Location,
}

#[derive(Iden)]
enum MeterReadings {
    Table,
    Id,
    MeterId,
    ReadDate,
    Value,
}

#[derive(Iden)]
enum Leases {
    Table,
    Id,
    UnitId,
    TenantName,
    StartDate,
    EndDate,
}

#[derive(Iden)]
enum Payments {
    Table,
    Id,
    LeaseId,
    PayDate,
    AmountMinor,
    Category,
    Note,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Properties::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Properties::Id).blob().not_null().primary_key())
                    .col(ColumnDef::new(Properties::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Units::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Units::Id).blob().not_null().primary_key())
                    .col(ColumnDef::new(Units::PropertyId).blob().not_null())
                    .col(ColumnDef::new(Units::Label).string().not_null())
                    .col(ColumnDef::new(Units::AreaSqm).double())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-units-property_id")
                            .from(Units::Table, Units::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-units-property_id-label-unique")
                    .table(Units::Table)
                    .col(Units::PropertyId)
                    .col(Units::Label)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CostCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CostCategories::Code)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CostCategories::Name).string().not_null())
                    .col(ColumnDef::new(CostCategories::NameEn).string())
                    .col(
                        ColumnDef::new(CostCategories::AllocationMethod)
                            .string()
                            .not_null()
                            .default("UNITS"),
                    )
                    .col(
                        ColumnDef::new(CostCategories::IsHeating)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PropertySettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PropertySettings::PropertyId)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PropertySettings::HeatRatioConsumption)
                            .integer()
                            .not_null()
                            .default(70),
                    )
                    .col(
                        ColumnDef::new(PropertySettings::PersonsDefault)
                            .integer()
                            .not_null()
                            .default(2),
                    )
                    .col(
                        ColumnDef::new(PropertySettings::WaterAllocationFallback)
                            .string()
                            .not_null()
                            .default("PERSONS"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-property_settings-property_id")
                            .from(PropertySettings::Table, PropertySettings::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CostEntries::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CostEntries::Id).blob().not_null().primary_key())
                    .col(ColumnDef::new(CostEntries::PropertyId).blob().not_null())
                    .col(ColumnDef::new(CostEntries::UnitId).blob())
                    .col(ColumnDef::new(CostEntries::Date).date().not_null())
                    .col(ColumnDef::new(CostEntries::PeriodStart).date())
                    .col(ColumnDef::new(CostEntries::PeriodEnd).date())
                    .col(ColumnDef::new(CostEntries::CategoryCode).string().not_null())
                    .col(ColumnDef::new(CostEntries::AmountMinor).big_integer().not_null())
                    .col(
                        ColumnDef::new(CostEntries::VatRate)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(CostEntries::Supplier).string())
                    .col(ColumnDef::new(CostEntries::InvoiceNo).string())
                    .col(ColumnDef::new(CostEntries::Description).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-cost_entries-property_id")
                            .from(CostEntries::Table, CostEntries::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-cost_entries-unit_id")
                            .from(CostEntries::Table, CostEntries::UnitId)
                            .to(Units::Table, Units::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-cost_entries-property_id-date")
                    .table(CostEntries::Table)
                    .col(CostEntries::PropertyId)
                    .col(CostEntries::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UnitPersons::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UnitPersons::Id).blob().not_null().primary_key())
                    .col(ColumnDef::new(UnitPersons::PropertyId).blob().not_null())
                    .col(ColumnDef::new(UnitPersons::UnitId).blob().not_null())
                    .col(ColumnDef::new(UnitPersons::Year).integer().not_null())
                    .col(ColumnDef::new(UnitPersons::Persons).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-unit_persons-unit_id")
                            .from(UnitPersons::Table, UnitPersons::UnitId)
                            .to(Units::Table, Units::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-unit_persons-property_id-unit_id-year-unique")
                    .table(UnitPersons::Table)
                    .col(UnitPersons::PropertyId)
                    .col(UnitPersons::UnitId)
                    .col(UnitPersons::Year)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Meters::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Meters::Id).blob().not_null().primary_key())
                    .col(ColumnDef::new(Meters::UnitId).blob().not_null())
                    .col(ColumnDef::new(Meters::KindLabel).string().not_null())
                    .col(ColumnDef::new(Meters::SerialNumber).string())
                    .col(ColumnDef::new(Meters::Location).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-meters-unit_id")
                            .from(Meters::Table, Meters::UnitId)
                            .to(Units::Table, Units::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MeterReadings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MeterReadings::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MeterReadings::MeterId).blob().not_null())
                    .col(ColumnDef::new(MeterReadings::ReadDate).date().not_null())
                    .col(ColumnDef::new(MeterReadings::Value).double().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-meter_readings-meter_id")
                            .from(MeterReadings::Table, MeterReadings::MeterId)
                            .to(Meters::Table, Meters::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-meter_readings-meter_id-read_date")
                    .table(MeterReadings::Table)
                    .col(MeterReadings::MeterId)
                    .col(MeterReadings::ReadDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Leases::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Leases::Id).blob().not_null().primary_key())
                    .col(ColumnDef::new(Leases::UnitId).blob().not_null())
                    .col(ColumnDef::new(Leases::TenantName).string())
                    .col(ColumnDef::new(Leases::StartDate).date().not_null())
                    .col(ColumnDef::new(Leases::EndDate).date())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-leases-unit_id")
                            .from(Leases::Table, Leases::UnitId)
                            .to(Units::Table, Units::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Payments::Id).blob().not_null().primary_key())
                    .col(ColumnDef::new(Payments::LeaseId).blob().not_null())
                    .col(ColumnDef::new(Payments::PayDate).date().not_null())
                    .col(ColumnDef::new(Payments::AmountMinor).big_integer().not_null())
                    .col(ColumnDef::new(Payments::Category).string().not_null())
                    .col(ColumnDef::new(Payments::Note).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-payments-lease_id")
                            .from(Payments::Table, Payments::LeaseId)
                            .to(Leases::Table, Leases::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-payments-lease_id-pay_date")
                    .table(Payments::Table)
                    .col(Payments::LeaseId)
                    .col(Payments::PayDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Leases::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MeterReadings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Meters::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UnitPersons::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CostEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PropertySettings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CostCategories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Units::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Properties::Table).to_owned())
            .await?;
        Ok(())
    }
}
