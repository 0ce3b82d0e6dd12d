//! Weekly Snapshot Report
//!
//! Splits the bill and pay occurrences of the Monday..Sunday week around a
//! reference date into due, overdue, received and upcoming, and derives the
//! disposable income left for that week.

use chrono::NaiveDate;

use crate::display::format_money_colored;
use crate::error::BilltrackResult;
use crate::models::{week_window, weekday_name, BillSeries, Money, PaySeries, WeekWindow};

/// One bill payment falling inside the week
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillOccurrence<'a> {
    pub bill: &'a BillSeries,
    pub date: NaiveDate,
}

/// One pay date falling inside the week
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayOccurrence<'a> {
    pub pay: &'a PaySeries,
    pub date: NaiveDate,
}

/// Split this week's bill payments into `(due, overdue)`
///
/// A payment strictly before `today` is overdue; `today` itself and later
/// dates are still due.
pub fn partition_bills(
    bills: &[BillSeries],
    today: NaiveDate,
) -> BilltrackResult<(Vec<BillOccurrence<'_>>, Vec<BillOccurrence<'_>>)> {
    let window = week_window(today);
    let mut due = Vec::new();
    let mut overdue = Vec::new();

    for bill in bills {
        for date in bill.occurrences_between(window.start, window.end)? {
            let occurrence = BillOccurrence { bill, date };
            if date < today {
                overdue.push(occurrence);
            } else {
                due.push(occurrence);
            }
        }
    }

    Ok((due, overdue))
}

/// Split this week's pay dates into `(occurred, upcoming)`
pub fn partition_pay(
    pays: &[PaySeries],
    today: NaiveDate,
) -> (Vec<PayOccurrence<'_>>, Vec<PayOccurrence<'_>>) {
    let window = week_window(today);
    let mut occurred = Vec::new();
    let mut upcoming = Vec::new();

    for pay in pays {
        for date in pay.occurrences_between(window.start, window.end) {
            let occurrence = PayOccurrence { pay, date };
            if date < today {
                occurred.push(occurrence);
            } else {
                upcoming.push(occurrence);
            }
        }
    }

    (occurred, upcoming)
}

/// Income against bills for one week
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceSummary {
    /// Pay already received this week
    pub total_income: Money,
    /// Every bill payment this week, due or overdue
    pub total_bills: Money,
    pub disposable_income: Money,
}

impl BalanceSummary {
    fn from_totals(total_income: Money, total_bills: Money) -> Self {
        Self {
            total_income,
            total_bills,
            disposable_income: total_income - total_bills,
        }
    }
}

/// Sum the week's received pay against all of the week's bill payments
///
/// Each occurrence counts on its own, so a bill paid twice in the window
/// counts twice.
pub fn balance_summary(
    pays: &[PaySeries],
    bills: &[BillSeries],
    today: NaiveDate,
) -> BilltrackResult<BalanceSummary> {
    let (occurred, _) = partition_pay(pays, today);
    let (due, overdue) = partition_bills(bills, today)?;

    let total_income: Money = occurred.iter().map(|o| o.pay.amount).sum();
    let total_bills: Money = due.iter().chain(overdue.iter()).map(|o| o.bill.amount).sum();

    Ok(BalanceSummary::from_totals(total_income, total_bills))
}

/// Weekly snapshot
#[derive(Debug, Clone)]
pub struct WeeklyReport<'a> {
    /// Reference date the report was built for
    pub today: NaiveDate,
    pub window: WeekWindow,
    pub bills_due: Vec<BillOccurrence<'a>>,
    pub bills_overdue: Vec<BillOccurrence<'a>>,
    pub pay_received: Vec<PayOccurrence<'a>>,
    pub pay_upcoming: Vec<PayOccurrence<'a>>,
    pub summary: BalanceSummary,
}

impl<'a> WeeklyReport<'a> {
    /// Generate the snapshot for the week containing `today`
    pub fn generate(
        pays: &'a [PaySeries],
        bills: &'a [BillSeries],
        today: NaiveDate,
    ) -> BilltrackResult<Self> {
        let (mut bills_due, mut bills_overdue) = partition_bills(bills, today)?;
        let (mut pay_received, mut pay_upcoming) = partition_pay(pays, today);

        bills_due.sort_by_key(|o| o.date);
        bills_overdue.sort_by_key(|o| o.date);
        pay_received.sort_by_key(|o| o.date);
        pay_upcoming.sort_by_key(|o| o.date);

        let total_income: Money = pay_received.iter().map(|o| o.pay.amount).sum();
        let total_bills: Money = bills_due
            .iter()
            .chain(bills_overdue.iter())
            .map(|o| o.bill.amount)
            .sum();

        Ok(Self {
            today,
            window: week_window(today),
            bills_due,
            bills_overdue,
            pay_received,
            pay_upcoming,
            summary: BalanceSummary::from_totals(total_income, total_bills),
        })
    }

    /// Whether nothing at all happens this week
    pub fn is_empty(&self) -> bool {
        self.bills_due.is_empty()
            && self.bills_overdue.is_empty()
            && self.pay_received.is_empty()
            && self.pay_upcoming.is_empty()
    }

    /// Format the report for terminal display
    ///
    /// With `color` set, disposable income is green when positive and red
    /// when negative.
    pub fn format_terminal(&self, currency_symbol: &str, color: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Week of {} (as of {})\n",
            self.window,
            self.today.format("%Y-%m-%d")
        ));
        output.push_str(&"=".repeat(60));
        output.push('\n');

        let bill_line = |o: &BillOccurrence<'_>| {
            format!(
                "  {:<10} {:<9} {:<25} {:>12}\n",
                o.date.format("%Y-%m-%d"),
                weekday_name(o.bill.anchor_weekday),
                o.bill.name,
                o.bill.amount.format_with_symbol(currency_symbol)
            )
        };
        let pay_line = |o: &PayOccurrence<'_>| {
            format!(
                "  {:<10} {:<35} {:>12}\n",
                o.date.format("%Y-%m-%d"),
                o.pay.name,
                o.pay.amount.format_with_symbol(currency_symbol)
            )
        };

        output.push_str("\nBills due\n");
        if self.bills_due.is_empty() {
            output.push_str("  (none)\n");
        }
        for o in &self.bills_due {
            output.push_str(&bill_line(o));
        }

        output.push_str("\nBills overdue\n");
        if self.bills_overdue.is_empty() {
            output.push_str("  (none)\n");
        }
        for o in &self.bills_overdue {
            output.push_str(&bill_line(o));
        }

        output.push_str("\nPay received\n");
        if self.pay_received.is_empty() {
            output.push_str("  (none)\n");
        }
        for o in &self.pay_received {
            output.push_str(&pay_line(o));
        }

        output.push_str("\nUpcoming pay\n");
        if self.pay_upcoming.is_empty() {
            output.push_str("  (none)\n");
        }
        for o in &self.pay_upcoming {
            output.push_str(&pay_line(o));
        }

        output.push('\n');
        output.push_str(&"-".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "{:<47} {:>12}\n",
            "Total income",
            self.summary.total_income.format_with_symbol(currency_symbol)
        ));
        output.push_str(&format!(
            "{:<47} {:>12}\n",
            "Total bills",
            self.summary.total_bills.format_with_symbol(currency_symbol)
        ));

        // Pad on the plain text; escape codes take no columns
        let disposable = self.summary.disposable_income.format_with_symbol(currency_symbol);
        let padding = " ".repeat(12usize.saturating_sub(disposable.chars().count()));
        let disposable = if color {
            format_money_colored(self.summary.disposable_income, currency_symbol)
        } else {
            disposable
        };
        output.push_str(&format!("{:<47} {}{}\n", "Disposable income", padding, disposable));

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Frequency;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn weekly_bill(name: &str, dollars: f64, weekday: Weekday, start: NaiveDate) -> BillSeries {
        BillSeries::new(name, Money::from_dollars_f64(dollars), Frequency::Weekly, weekday, start)
    }

    fn job(frequency: Frequency) -> PaySeries {
        PaySeries::new(
            "Job",
            Money::from_dollars_f64(1000.0),
            frequency,
            Weekday::Fri,
            date(2025, 1, 10),
        )
    }

    #[test]
    fn test_bill_earlier_in_week_is_overdue() {
        // Monday 2025-05-05 and Friday 2025-05-09
        let bills = vec![
            weekly_bill("Gym", 30.0, Weekday::Mon, date(2025, 1, 6)),
            weekly_bill("Groceries", 120.0, Weekday::Fri, date(2025, 1, 3)),
        ];
        let (due, overdue) = partition_bills(&bills, date(2025, 5, 7)).unwrap();

        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].bill.name, "Gym");
        assert_eq!(overdue[0].date, date(2025, 5, 5));
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].bill.name, "Groceries");
        assert_eq!(due[0].date, date(2025, 5, 9));
    }

    #[test]
    fn test_bill_on_today_is_due() {
        let bills = vec![weekly_bill("Gym", 30.0, Weekday::Mon, date(2025, 1, 6))];
        let (due, overdue) = partition_bills(&bills, date(2025, 5, 5)).unwrap();
        assert_eq!(due.len(), 1);
        assert!(overdue.is_empty());
    }

    #[test]
    fn test_biweekly_pay_skips_the_week() {
        let pays = vec![job(Frequency::Biweekly)];
        let (occurred, upcoming) = partition_pay(&pays, date(2025, 5, 9));
        assert!(occurred.is_empty());
        assert!(upcoming.is_empty());
    }

    #[test]
    fn test_pay_on_today_is_upcoming() {
        let pays = vec![job(Frequency::Weekly)];
        let (occurred, upcoming) = partition_pay(&pays, date(2025, 5, 9));
        assert!(occurred.is_empty());
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].date, date(2025, 5, 9));
    }

    #[test]
    fn test_pay_before_today_counts_as_income() {
        let pays = vec![job(Frequency::Weekly)];
        for today in [date(2025, 5, 10), date(2025, 5, 11)] {
            let (occurred, upcoming) = partition_pay(&pays, today);
            assert_eq!(occurred.len(), 1);
            assert!(upcoming.is_empty());

            let summary = balance_summary(&pays, &[], today).unwrap();
            assert_eq!(summary.total_income, Money::from_dollars_f64(1000.0));
        }
    }

    #[test]
    fn test_disposable_income() {
        // Paid Monday and Wednesday; bills Tuesday and Friday
        let pays = vec![
            PaySeries::new("Main", Money::from_dollars_f64(1000.0), Frequency::Weekly, Weekday::Mon, date(2025, 1, 6)),
            PaySeries::new("Side", Money::from_dollars_f64(500.0), Frequency::Weekly, Weekday::Wed, date(2025, 1, 8)),
        ];
        let bills = vec![
            weekly_bill("Phone", 80.0, Weekday::Tue, date(2025, 1, 7)),
            weekly_bill("Car", 300.0, Weekday::Fri, date(2025, 1, 10)),
        ];

        let summary = balance_summary(&pays, &bills, date(2025, 5, 8)).unwrap();
        assert_eq!(summary.total_income, Money::from_dollars_f64(1500.0));
        assert_eq!(summary.total_bills, Money::from_dollars_f64(380.0));
        assert_eq!(summary.disposable_income, Money::from_dollars_f64(1120.0));
    }

    #[test]
    fn test_upcoming_pay_not_counted() {
        let pays = vec![job(Frequency::Weekly)];
        let bills = vec![weekly_bill("Gym", 30.0, Weekday::Mon, date(2025, 1, 6))];
        let summary = balance_summary(&pays, &bills, date(2025, 5, 9)).unwrap();
        assert_eq!(summary.total_income, Money::zero());
        assert_eq!(summary.disposable_income, Money::from_dollars_f64(-30.0));
    }

    #[test]
    fn test_same_bill_twice_counts_twice() {
        let bills = vec![
            weekly_bill("Lunch", 10.0, Weekday::Mon, date(2025, 1, 6)),
            weekly_bill("Lunch", 10.0, Weekday::Mon, date(2025, 1, 6)),
        ];
        let summary = balance_summary(&[], &bills, date(2025, 5, 9)).unwrap();
        assert_eq!(summary.total_bills, Money::from_dollars_f64(20.0));
    }

    #[test]
    fn test_generate_report() {
        let pays = vec![job(Frequency::Weekly)];
        let bills = vec![
            weekly_bill("Groceries", 120.0, Weekday::Fri, date(2025, 1, 3)),
            weekly_bill("Gym", 30.0, Weekday::Mon, date(2025, 1, 6)),
        ];
        let report = WeeklyReport::generate(&pays, &bills, date(2025, 5, 10)).unwrap();

        assert_eq!(report.window.start, date(2025, 5, 5));
        assert_eq!(report.bills_overdue.len(), 2);
        assert_eq!(report.bills_overdue[0].bill.name, "Gym");
        assert_eq!(report.pay_received.len(), 1);
        assert_eq!(report.summary.disposable_income, Money::from_dollars_f64(850.0));
        assert!(!report.is_empty());

        let text = report.format_terminal("$", false);
        assert!(text.contains("Week of 2025-05-05..2025-05-11"));
        assert!(text.contains("Groceries"));
        assert!(text.contains("$850.00"));
    }

    #[test]
    fn test_disposable_income_colored() {
        let pays = vec![job(Frequency::Weekly)];
        let bills = vec![weekly_bill("Phone", 80.0, Weekday::Mon, date(2025, 1, 6))];
        let report = WeeklyReport::generate(&pays, &bills, date(2025, 5, 10)).unwrap();

        let plain = report.format_terminal("$", false);
        let colored = report.format_terminal("$", true);
        assert!(!plain.contains('\x1b'));
        assert!(colored.contains("\x1b[32m$920.00\x1b[0m"));

        let plain_line = plain.lines().last().unwrap();
        let colored_line = colored.lines().last().unwrap();
        assert_eq!(plain_line.chars().count(), 60);
        assert_eq!(colored_line.replace("\x1b[32m", "").replace("\x1b[0m", ""), plain_line);
    }

    #[test]
    fn test_empty_week() {
        let report = WeeklyReport::generate(&[], &[], date(2025, 5, 9)).unwrap();
        assert!(report.is_empty());
        assert_eq!(report.summary.disposable_income, Money::zero());
        assert!(report.format_terminal("$", false).contains("(none)"));
    }
}
