//! Initial schema.
//!
//! - `routes`, `cars`: read-only lookups keyed by code
//! - `drivers`, `vehicles`: the chauffeur fleet
//! - `bookings`: customer trips
//! - `driver_assignments`: one per booking, with the frozen pay split
//! - `taxi_drivers`, `taxi_daily_reports`: the owner-operated taxi side

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Routes {
    Table,
    Code,
    Name,
    Active,
}

#[derive(Iden)]
enum Cars {
    Table,
    Code,
    Name,
    Seats,
    Active,
}

#[derive(Iden)]
enum Drivers {
    Table,
    Id,
    Name,
    Phone,
    Email,
    CommissionPercent,
    BaseSalary,
    Active,
}

#[derive(Iden)]
enum Vehicles {
    Table,
    Id,
    Plate,
    Brand,
    Model,
    Seats,
    Status,
    DriverId,
}

#[derive(Iden)]
enum Bookings {
    Table,
    Id,
    CustomerName,
    CustomerPhone,
    CustomerEmail,
    RouteCode,
    CarTypeCode,
    Pickup,
    Dropoff,
    Date,
    ReturnDate,
    Time,
    ReturnTime,
    RoundTrip,
    Adults,
    Children,
    TotalPrice,
    DriverId,
    VehicleId,
    Note,
}

#[derive(Iden)]
enum DriverAssignments {
    Table,
    Id,
    BookingId,
    DriverId,
    VehicleId,
    DriverPay,
    CompanyProfit,
    Status,
    Paid,
    PaidAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum TaxiDrivers {
    Table,
    Id,
    Name,
    Phone,
    CarPlate,
    DriverShare,
    BeWalletBaseline,
    SmWalletBaseline,
    Active,
}

#[derive(Iden)]
enum TaxiDailyReports {
    Table,
    Id,
    TaxiDriverId,
    ReportDate,
    BeRevenue,
    SmRevenue,
    CashRevenue,
    BeWalletStart,
    BeWalletEnd,
    SmWalletStart,
    SmWalletEnd,
    FuelCost,
    OtherCost,
    Note,
    CreatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Lookups
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Routes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Routes::Code)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Routes::Name).string().not_null())
                    .col(
                        ColumnDef::new(Routes::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Cars::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Cars::Code)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Cars::Name).string().not_null())
                    .col(ColumnDef::new(Cars::Seats).integer().not_null())
                    .col(
                        ColumnDef::new(Cars::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Fleet
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Drivers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Drivers::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Drivers::Name).string().not_null())
                    .col(ColumnDef::new(Drivers::Phone).string().not_null())
                    .col(ColumnDef::new(Drivers::Email).string())
                    .col(ColumnDef::new(Drivers::CommissionPercent).double())
                    .col(
                        ColumnDef::new(Drivers::BaseSalary)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Drivers::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Vehicles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Vehicles::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Vehicles::Plate).string().not_null())
                    .col(ColumnDef::new(Vehicles::Brand).string().not_null())
                    .col(ColumnDef::new(Vehicles::Model).string().not_null())
                    .col(ColumnDef::new(Vehicles::Seats).integer().not_null())
                    .col(ColumnDef::new(Vehicles::Status).string().not_null())
                    .col(ColumnDef::new(Vehicles::DriverId).uuid())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Bookings
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Bookings::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Bookings::CustomerName).string().not_null())
                    .col(ColumnDef::new(Bookings::CustomerPhone).string().not_null())
                    .col(ColumnDef::new(Bookings::CustomerEmail).string())
                    .col(ColumnDef::new(Bookings::RouteCode).string().not_null())
                    .col(ColumnDef::new(Bookings::CarTypeCode).string().not_null())
                    .col(ColumnDef::new(Bookings::Pickup).string().not_null())
                    .col(ColumnDef::new(Bookings::Dropoff).string().not_null())
                    .col(ColumnDef::new(Bookings::Date).date().not_null())
                    .col(ColumnDef::new(Bookings::ReturnDate).date())
                    .col(ColumnDef::new(Bookings::Time).string())
                    .col(ColumnDef::new(Bookings::ReturnTime).string())
                    .col(
                        ColumnDef::new(Bookings::RoundTrip)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Bookings::Adults).integer().not_null())
                    .col(ColumnDef::new(Bookings::Children).integer().not_null())
                    .col(ColumnDef::new(Bookings::TotalPrice).big_integer().not_null())
                    .col(ColumnDef::new(Bookings::DriverId).uuid())
                    .col(ColumnDef::new(Bookings::VehicleId).uuid())
                    .col(ColumnDef::new(Bookings::Note).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-bookings-date")
                    .table(Bookings::Table)
                    .col(Bookings::Date)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Driver assignments
        // ───────────────────────────────────────────────────────────────────
        // No foreign key on driver_id: an unknown driver is still recorded.
        manager
            .create_table(
                Table::create()
                    .table(DriverAssignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DriverAssignments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DriverAssignments::BookingId).uuid().not_null())
                    .col(ColumnDef::new(DriverAssignments::DriverId).uuid())
                    .col(ColumnDef::new(DriverAssignments::VehicleId).uuid())
                    .col(
                        ColumnDef::new(DriverAssignments::DriverPay)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DriverAssignments::CompanyProfit)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DriverAssignments::Status).string().not_null())
                    .col(
                        ColumnDef::new(DriverAssignments::Paid)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(DriverAssignments::PaidAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(DriverAssignments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DriverAssignments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-driver_assignments-booking_id")
                            .from(DriverAssignments::Table, DriverAssignments::BookingId)
                            .to(Bookings::Table, Bookings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // The assignment upsert targets this index.
        manager
            .create_index(
                Index::create()
                    .name("idx-driver_assignments-booking_id-unique")
                    .table(DriverAssignments::Table)
                    .col(DriverAssignments::BookingId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-driver_assignments-driver_id")
                    .table(DriverAssignments::Table)
                    .col(DriverAssignments::DriverId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Taxi
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(TaxiDrivers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TaxiDrivers::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TaxiDrivers::Name).string().not_null())
                    .col(ColumnDef::new(TaxiDrivers::Phone).string().not_null())
                    .col(ColumnDef::new(TaxiDrivers::CarPlate).string().not_null())
                    .col(ColumnDef::new(TaxiDrivers::DriverShare).double().not_null())
                    .col(
                        ColumnDef::new(TaxiDrivers::BeWalletBaseline)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TaxiDrivers::SmWalletBaseline)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TaxiDrivers::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TaxiDailyReports::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TaxiDailyReports::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TaxiDailyReports::TaxiDriverId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TaxiDailyReports::ReportDate).date().not_null())
                    .col(ColumnDef::new(TaxiDailyReports::BeRevenue).big_integer().not_null())
                    .col(ColumnDef::new(TaxiDailyReports::SmRevenue).big_integer().not_null())
                    .col(
                        ColumnDef::new(TaxiDailyReports::CashRevenue)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TaxiDailyReports::BeWalletStart)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TaxiDailyReports::BeWalletEnd)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TaxiDailyReports::SmWalletStart)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TaxiDailyReports::SmWalletEnd)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TaxiDailyReports::FuelCost).big_integer().not_null())
                    .col(ColumnDef::new(TaxiDailyReports::OtherCost).big_integer().not_null())
                    .col(ColumnDef::new(TaxiDailyReports::Note).string())
                    .col(
                        ColumnDef::new(TaxiDailyReports::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-taxi_daily_reports-taxi_driver_id")
                            .from(TaxiDailyReports::Table, TaxiDailyReports::TaxiDriverId)
                            .to(TaxiDrivers::Table, TaxiDrivers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Not unique: a second report for the same day is accepted.
        manager
            .create_index(
                Index::create()
                    .name("idx-taxi_daily_reports-taxi_driver_id-report_date")
                    .table(TaxiDailyReports::Table)
                    .col(TaxiDailyReports::TaxiDriverId)
                    .col(TaxiDailyReports::ReportDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(TaxiDailyReports::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TaxiDrivers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DriverAssignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Vehicles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Drivers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cars::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Routes::Table).to_owned())
            .await?;
        Ok(())
    }
}
