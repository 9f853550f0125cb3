//! Settlement of owner-operated taxi reports.
//!
//! Each report is settled on its own:
//!
//! - `sm_fee = round(sm_revenue * 28%)`, charged by the `sm` platform only
//! - `revenue_after_fee = be_revenue + sm_revenue - sm_fee`
//! - `driver_salary = round(revenue_after_fee * driver_share)`
//! - the driver already holds `cash_revenue`, so `driver_salary -
//!   cash_revenue` is owed by the company when positive and by the driver
//!   when negative
//! - `owner_profit = revenue_after_fee - driver_salary - fuel_cost - other_cost`
//!
//! Period totals add up the settled reports field by field. They are never
//! re-derived from summed revenue, so the total salary is exactly the sum of
//! the daily salaries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Money, Rate, TaxiDailyReport};

/// Fee of the `sm` platform, in basis points.
pub const SM_FEE_BP: u32 = 2_800;

const SM_FEE: Rate = match Rate::const_from_basis_points(SM_FEE_BP) {
    Some(rate) => rate,
    None => panic!("sm fee exceeds 100%"),
};

/// Who owes money once the day is settled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementDirection {
    CompanyOwesDriver,
    DriverOwesCompany,
    Even,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementFigures {
    pub be_revenue: Money,
    pub sm_revenue: Money,
    pub sm_fee: Money,
    pub revenue_before_fee: Money,
    pub revenue_after_fee: Money,
    pub cash_revenue: Money,
    pub delta_be: Money,
    pub delta_sm: Money,
    pub driver_salary: Money,
    pub driver_take: Money,
    pub driver_payback: Money,
    pub fuel_cost: Money,
    pub other_cost: Money,
    pub owner_profit: Money,
}

impl SettlementFigures {
    pub fn direction(&self) -> SettlementDirection {
        if self.driver_take.is_positive() {
            SettlementDirection::CompanyOwesDriver
        } else if self.driver_payback.is_positive() {
            SettlementDirection::DriverOwesCompany
        } else {
            SettlementDirection::Even
        }
    }

    fn accumulate(&mut self, other: &SettlementFigures) {
        self.be_revenue += other.be_revenue;
        self.sm_revenue += other.sm_revenue;
        self.sm_fee += other.sm_fee;
        self.revenue_before_fee += other.revenue_before_fee;
        self.revenue_after_fee += other.revenue_after_fee;
        self.cash_revenue += other.cash_revenue;
        self.delta_be += other.delta_be;
        self.delta_sm += other.delta_sm;
        self.driver_salary += other.driver_salary;
        self.driver_take += other.driver_take;
        self.driver_payback += other.driver_payback;
        self.fuel_cost += other.fuel_cost;
        self.other_cost += other.other_cost;
        self.owner_profit += other.owner_profit;
    }
}

/// Settlement of a single report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxiSettlement {
    pub report_id: Uuid,
    pub taxi_driver_id: Uuid,
    pub report_date: NaiveDate,
    pub driver_share: Rate,
    #[serde(flatten)]
    pub figures: SettlementFigures,
    pub direction: SettlementDirection,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxiTotals {
    pub reports: usize,
    #[serde(flatten)]
    pub figures: SettlementFigures,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxiSettlementReport {
    pub settlements: Vec<TaxiSettlement>,
    pub totals: TaxiTotals,
}

/// Settles one report given the driver's share.
pub fn settle(report: &TaxiDailyReport, driver_share: Rate) -> TaxiSettlement {
    let input = &report.input;

    let sm_fee = SM_FEE.apply(input.sm_revenue);
    let revenue_before_fee = input.be_revenue + input.sm_revenue;
    let revenue_after_fee = input.be_revenue + (input.sm_revenue - sm_fee);
    let driver_salary = driver_share.apply(revenue_after_fee);

    let diff = driver_salary - input.cash_revenue;
    let (driver_take, driver_payback) = if diff.is_positive() {
        (diff, Money::ZERO)
    } else {
        (Money::ZERO, -diff)
    };

    let figures = SettlementFigures {
        be_revenue: input.be_revenue,
        sm_revenue: input.sm_revenue,
        sm_fee,
        revenue_before_fee,
        revenue_after_fee,
        cash_revenue: input.cash_revenue,
        delta_be: input.be_wallet_end - input.be_wallet_start,
        delta_sm: input.sm_wallet_end - input.sm_wallet_start,
        driver_salary,
        driver_take,
        driver_payback,
        fuel_cost: input.fuel_cost,
        other_cost: input.other_cost,
        owner_profit: revenue_after_fee - driver_salary - input.fuel_cost - input.other_cost,
    };

    TaxiSettlement {
        report_id: report.id,
        taxi_driver_id: input.taxi_driver_id,
        report_date: input.report_date,
        driver_share,
        direction: figures.direction(),
        figures,
    }
}

/// Folds settled reports into period totals.
pub fn summarize(settlements: Vec<TaxiSettlement>) -> TaxiSettlementReport {
    let mut totals = TaxiTotals::default();
    for settlement in &settlements {
        totals.reports += 1;
        totals.figures.accumulate(&settlement.figures);
    }
    TaxiSettlementReport {
        settlements,
        totals,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::TaxiReportInput;

    fn report(be: i64, sm: i64, cash: i64, fuel: i64, other: i64) -> TaxiDailyReport {
        TaxiDailyReport::new(
            TaxiReportInput {
                taxi_driver_id: Uuid::new_v4(),
                report_date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
                be_revenue: Money::new(be),
                sm_revenue: Money::new(sm),
                cash_revenue: Money::new(cash),
                fuel_cost: Money::new(fuel),
                other_cost: Money::new(other),
                ..Default::default()
            },
            Utc::now(),
        )
    }

    fn share(percent: f64) -> Rate {
        Rate::from_percent(percent).unwrap()
    }

    #[test]
    fn settles_reference_day() {
        let settlement = settle(
            &report(1_000_000, 500_000, 700_000, 100_000, 0),
            share(60.0),
        );
        let f = &settlement.figures;
        assert_eq!(f.sm_fee, Money::new(140_000));
        assert_eq!(f.revenue_before_fee, Money::new(1_500_000));
        assert_eq!(f.revenue_after_fee, Money::new(1_360_000));
        assert_eq!(f.driver_salary, Money::new(816_000));
        assert_eq!(f.driver_take, Money::new(116_000));
        assert_eq!(f.driver_payback, Money::ZERO);
        assert_eq!(f.owner_profit, Money::new(444_000));
        assert_eq!(settlement.direction, SettlementDirection::CompanyOwesDriver);
    }

    #[test]
    fn driver_pays_back_when_cash_exceeds_salary() {
        let settlement = settle(&report(1_000_000, 0, 900_000, 0, 0), share(60.0));
        assert_eq!(settlement.figures.driver_salary, Money::new(600_000));
        assert_eq!(settlement.figures.driver_take, Money::ZERO);
        assert_eq!(settlement.figures.driver_payback, Money::new(300_000));
        assert_eq!(settlement.direction, SettlementDirection::DriverOwesCompany);
    }

    #[test]
    fn even_day_owes_nothing() {
        let settlement = settle(&report(1_000_000, 0, 500_000, 0, 0), share(50.0));
        assert_eq!(settlement.figures.driver_take, Money::ZERO);
        assert_eq!(settlement.figures.driver_payback, Money::ZERO);
        assert_eq!(settlement.direction, SettlementDirection::Even);
    }

    #[test]
    fn wallet_deltas_are_diagnostic_only() {
        let mut with_wallets = report(1_000_000, 500_000, 700_000, 100_000, 0);
        with_wallets.input.be_wallet_start = Money::new(200_000);
        with_wallets.input.be_wallet_end = Money::new(50_000);
        with_wallets.input.sm_wallet_start = Money::new(-10_000);
        with_wallets.input.sm_wallet_end = Money::new(350_000);

        let plain = settle(&report(1_000_000, 500_000, 700_000, 100_000, 0), share(60.0));
        let settled = settle(&with_wallets, share(60.0));
        assert_eq!(settled.figures.delta_be, Money::new(-150_000));
        assert_eq!(settled.figures.delta_sm, Money::new(360_000));
        assert_eq!(settled.figures.driver_salary, plain.figures.driver_salary);
        assert_eq!(settled.figures.owner_profit, plain.figures.owner_profit);
    }

    #[test]
    fn totals_are_sums_of_daily_settlements() {
        // 33_333 * 60% = 19_999.8 rounds to 20_000 per day; a salary taken
        // on the summed revenue would give 59_999.
        let days = vec![
            settle(&report(33_333, 0, 0, 0, 0), share(60.0)),
            settle(&report(33_333, 0, 0, 0, 0), share(60.0)),
            settle(&report(33_333, 0, 0, 0, 0), share(60.0)),
        ];
        let summary = summarize(days);
        assert_eq!(summary.totals.reports, 3);
        assert_eq!(summary.totals.figures.revenue_after_fee, Money::new(99_999));
        assert_eq!(summary.totals.figures.driver_salary, Money::new(60_000));
        assert_eq!(summary.totals.figures.driver_take, Money::new(60_000));
        assert_eq!(summary.totals.figures.owner_profit, Money::new(39_999));
    }

    #[test]
    fn empty_period_sums_to_zero() {
        let summary = summarize(Vec::new());
        assert_eq!(summary.totals, TaxiTotals::default());
        assert!(summary.settlements.is_empty());
    }
}
