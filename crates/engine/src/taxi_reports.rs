//! Daily reports submitted by taxi drivers.
//!
//! A report is immutable once stored. By convention there is one report per
//! driver per day; the store does not enforce it.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine};

/// Figures a driver reports for one working day.
///
/// `be` is the flat-fee ride platform, `sm` the platform taking a percentage
/// fee on its revenue.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxiReportInput {
    pub taxi_driver_id: Uuid,
    pub report_date: NaiveDate,
    pub be_revenue: Money,
    pub sm_revenue: Money,
    pub cash_revenue: Money,
    pub be_wallet_start: Money,
    pub be_wallet_end: Money,
    pub sm_wallet_start: Money,
    pub sm_wallet_end: Money,
    pub fuel_cost: Money,
    pub other_cost: Money,
    pub note: Option<String>,
}

impl TaxiReportInput {
    /// Revenues and costs must be non-negative. Wallet balances may be
    /// negative (platform debt). Every amount is bounded by [`Money::MAX`].
    pub fn validate(&self) -> ResultEngine<()> {
        self.be_revenue.ensure_non_negative("be_revenue")?;
        self.sm_revenue.ensure_non_negative("sm_revenue")?;
        self.cash_revenue.ensure_non_negative("cash_revenue")?;
        self.fuel_cost.ensure_non_negative("fuel_cost")?;
        self.other_cost.ensure_non_negative("other_cost")?;
        self.be_wallet_start.ensure_bounded("be_wallet_start")?;
        self.be_wallet_end.ensure_bounded("be_wallet_end")?;
        self.sm_wallet_start.ensure_bounded("sm_wallet_start")?;
        self.sm_wallet_end.ensure_bounded("sm_wallet_end")?;
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxiDailyReport {
    pub id: Uuid,
    #[serde(flatten)]
    pub input: TaxiReportInput,
    pub created_at: DateTime<Utc>,
}

impl TaxiDailyReport {
    pub fn new(input: TaxiReportInput, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            input,
            created_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "taxi_daily_reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub taxi_driver_id: Uuid,
    pub report_date: Date,
    pub be_revenue: i64,
    pub sm_revenue: i64,
    pub cash_revenue: i64,
    pub be_wallet_start: i64,
    pub be_wallet_end: i64,
    pub sm_wallet_start: i64,
    pub sm_wallet_end: i64,
    pub fuel_cost: i64,
    pub other_cost: i64,
    pub note: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::taxi_drivers::Entity",
        from = "Column::TaxiDriverId",
        to = "crate::taxi_drivers::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    TaxiDriver,
}

impl Related<crate::taxi_drivers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TaxiDriver.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&TaxiDailyReport> for ActiveModel {
    fn from(value: &TaxiDailyReport) -> Self {
        let input = &value.input;
        Self {
            id: ActiveValue::Set(value.id),
            taxi_driver_id: ActiveValue::Set(input.taxi_driver_id),
            report_date: ActiveValue::Set(input.report_date),
            be_revenue: ActiveValue::Set(input.be_revenue.minor()),
            sm_revenue: ActiveValue::Set(input.sm_revenue.minor()),
            cash_revenue: ActiveValue::Set(input.cash_revenue.minor()),
            be_wallet_start: ActiveValue::Set(input.be_wallet_start.minor()),
            be_wallet_end: ActiveValue::Set(input.be_wallet_end.minor()),
            sm_wallet_start: ActiveValue::Set(input.sm_wallet_start.minor()),
            sm_wallet_end: ActiveValue::Set(input.sm_wallet_end.minor()),
            fuel_cost: ActiveValue::Set(input.fuel_cost.minor()),
            other_cost: ActiveValue::Set(input.other_cost.minor()),
            note: ActiveValue::Set(input.note.clone()),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for TaxiDailyReport {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let report = Self {
            id: model.id,
            input: TaxiReportInput {
                taxi_driver_id: model.taxi_driver_id,
                report_date: model.report_date,
                be_revenue: Money::new(model.be_revenue),
                sm_revenue: Money::new(model.sm_revenue),
                cash_revenue: Money::new(model.cash_revenue),
                be_wallet_start: Money::new(model.be_wallet_start),
                be_wallet_end: Money::new(model.be_wallet_end),
                sm_wallet_start: Money::new(model.sm_wallet_start),
                sm_wallet_end: Money::new(model.sm_wallet_end),
                fuel_cost: Money::new(model.fuel_cost),
                other_cost: Money::new(model.other_cost),
                note: model.note,
            },
            created_at: model.created_at,
        };
        report.input.validate()?;
        Ok(report)
    }
}
