use chrono::Utc;
use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    DateRange, EngineError, Lookup, ResultEngine, Roster, Session, TaxiDailyReport, TaxiDriver,
    TaxiReportInput, TaxiSettlementReport, taxi, taxi_drivers, taxi_reports,
};

use super::{Engine, with_tx};

impl Engine {
    /// Return the taxi driver roster, by name.
    pub async fn taxi_drivers(&self) -> ResultEngine<Vec<TaxiDriver>> {
        let models = taxi_drivers::Entity::find()
            .order_by_asc(taxi_drivers::Column::Name)
            .all(&self.database)
            .await?;
        models.into_iter().map(TaxiDriver::try_from).collect()
    }

    /// Stores a daily report. Reports are append-only.
    ///
    /// A taxi driver may only report for themselves. A second report for the
    /// same driver and day is accepted and logged.
    pub async fn submit_taxi_report(
        &self,
        session: &Session,
        input: TaxiReportInput,
    ) -> ResultEngine<TaxiDailyReport> {
        session.ensure_can_report_for(input.taxi_driver_id)?;
        input.validate()?;

        with_tx!(self, |db_tx| {
            let driver_exists = taxi_drivers::Entity::find_by_id(input.taxi_driver_id)
                .one(&db_tx)
                .await?
                .is_some();
            if !driver_exists {
                return Err(EngineError::KeyNotFound("taxi driver not exists".to_string()));
            }

            let duplicates = taxi_reports::Entity::find()
                .filter(taxi_reports::Column::TaxiDriverId.eq(input.taxi_driver_id))
                .filter(taxi_reports::Column::ReportDate.eq(input.report_date))
                .count(&db_tx)
                .await?;
            if duplicates > 0 {
                tracing::warn!(
                    taxi_driver_id = %input.taxi_driver_id,
                    report_date = %input.report_date,
                    existing = duplicates,
                    "taxi driver already reported for this day"
                );
            }

            let report = TaxiDailyReport::new(input, Utc::now());
            let model: taxi_reports::ActiveModel = (&report).into();
            model.insert(&db_tx).await?;
            Ok(report)
        })
    }

    /// Settles every report dated inside `range`.
    ///
    /// `taxi_driver_id` narrows the listing to one driver; a taxi driver
    /// session is always narrowed to its own reports.
    pub async fn taxi_settlements(
        &self,
        session: &Session,
        range: DateRange,
        taxi_driver_id: Option<Uuid>,
    ) -> ResultEngine<TaxiSettlementReport> {
        let taxi_driver_id = session.scope_taxi_driver(taxi_driver_id)?;

        with_tx!(self, |db_tx| {
            let mut query = taxi_reports::Entity::find()
                .filter(taxi_reports::Column::ReportDate.between(range.from, range.to));
            if let Some(id) = taxi_driver_id {
                query = query.filter(taxi_reports::Column::TaxiDriverId.eq(id));
            }
            let reports = query
                .order_by_asc(taxi_reports::Column::ReportDate)
                .order_by_asc(taxi_reports::Column::CreatedAt)
                .all(&db_tx)
                .await?;

            let drivers = taxi_drivers::Entity::find()
                .all(&db_tx)
                .await?
                .into_iter()
                .map(TaxiDriver::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;
            let drivers = Roster::keyed(drivers, |driver| driver.id);

            let mut settlements = Vec::with_capacity(reports.len());
            for model in reports {
                let report_id = model.id;
                let report = match TaxiDailyReport::try_from(model) {
                    Ok(report) => report,
                    Err(err) => {
                        tracing::warn!(%report_id, "skipping unreadable taxi report: {err}");
                        continue;
                    }
                };
                let Some(driver) = drivers.lookup(&report.input.taxi_driver_id) else {
                    tracing::warn!(
                        report_id = %report.id,
                        taxi_driver_id = %report.input.taxi_driver_id,
                        "skipping report of an unknown taxi driver"
                    );
                    continue;
                };
                settlements.push(taxi::settle(&report, driver.driver_share));
            }

            Ok(taxi::summarize(settlements))
        })
    }
}
