//! Monthly aggregation of entry occurrences.

use serde::{Deserialize, Serialize};

use crate::{EntryKind, LedgerError, MonetaryEntry, MoneyCents, ResultLedger, YearMonth};

/// Income and expense totals of one month. Both are non-negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyTotals {
    pub income: MoneyCents,
    pub expense: MoneyCents,
}

impl MonthlyTotals {
    /// `income - expense`, `None` on overflow.
    pub fn net(&self) -> Option<MoneyCents> {
        self.income.checked_sub(self.expense)
    }
}

/// Sums the occurrences of `user_id`'s entries that land in `month`.
///
/// Each entry adds `amount × occurrences` to the total of its kind; entries
/// of other users are ignored. A total that does not fit in [`MoneyCents`]
/// fails with [`LedgerError::InvalidAmount`].
pub fn aggregate(
    user_id: &str,
    month: YearMonth,
    entries: &[MonetaryEntry],
) -> ResultLedger<MonthlyTotals> {
    let window = month.window();
    entries
        .iter()
        .filter(|entry| entry.user_id == user_id)
        .try_fold(MonthlyTotals::default(), |mut totals, entry| {
            let amount = entry.contribution(window)?;
            let total = match entry.kind {
                EntryKind::Income => &mut totals.income,
                EntryKind::Expense => &mut totals.expense,
            };
            *total = total.checked_add(amount).ok_or_else(|| {
                LedgerError::InvalidAmount(format!(
                    "{} total of {month} overflows",
                    entry.kind.as_str()
                ))
            })?;
            Ok(totals)
        })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::Interval;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn entry(
        user: &str,
        kind: EntryKind,
        cents: i64,
        origin: NaiveDate,
        interval: Interval,
        end: Option<NaiveDate>,
    ) -> MonetaryEntry {
        MonetaryEntry::new(
            user.to_string(),
            kind,
            MoneyCents::new(cents),
            origin,
            interval,
            end,
        )
        .unwrap()
    }

    #[test]
    fn empty_month_is_zero() {
        let totals = aggregate("alice", YearMonth::new(2024, 2).unwrap(), &[]).unwrap();
        assert_eq!(totals, MonthlyTotals::default());
        assert_eq!(totals.net(), Some(MoneyCents::ZERO));
    }

    #[test]
    fn sums_kinds_separately() {
        let entries = vec![
            entry("alice", EntryKind::Income, 2000, date(2024, 1, 5), Interval::None, None),
            entry("alice", EntryKind::Expense, 500, date(2024, 1, 9), Interval::None, None),
            entry("alice", EntryKind::Expense, 100, date(2024, 1, 1), Interval::Weekly, None),
        ];
        let totals = aggregate("alice", YearMonth::new(2024, 1).unwrap(), &entries).unwrap();
        assert_eq!(totals.income, MoneyCents::new(2000));
        // 1, 8, 15, 22, 29 January.
        assert_eq!(totals.expense, MoneyCents::new(500 + 5 * 100));
        assert_eq!(totals.net(), Some(MoneyCents::new(1000)));
    }

    #[test]
    fn weekly_expense_over_march() {
        let entries = vec![entry(
            "alice",
            EntryKind::Expense,
            100,
            date(2024, 3, 4),
            Interval::Weekly,
            None,
        )];
        let totals = aggregate("alice", YearMonth::new(2024, 3).unwrap(), &entries).unwrap();
        assert_eq!(totals.expense, MoneyCents::new(400));
        assert_eq!(totals.income, MoneyCents::ZERO);
    }

    #[test]
    fn ended_yearly_income_contributes_nothing() {
        let entries = vec![entry(
            "alice",
            EntryKind::Income,
            5000,
            date(2023, 6, 1),
            Interval::Yearly,
            Some(date(2023, 12, 31)),
        )];
        assert_eq!(
            aggregate("alice", YearMonth::new(2024, 6).unwrap(), &entries),
            Ok(MonthlyTotals::default())
        );
        assert_eq!(
            aggregate("alice", YearMonth::new(2023, 6).unwrap(), &entries)
                .unwrap()
                .income,
            MoneyCents::new(5000)
        );
    }

    #[test]
    fn other_users_are_ignored() {
        let entries = vec![
            entry("bob", EntryKind::Income, 900, date(2024, 4, 1), Interval::None, None),
            entry("alice", EntryKind::Income, 100, date(2024, 4, 1), Interval::None, None),
        ];
        let totals = aggregate("alice", YearMonth::new(2024, 4).unwrap(), &entries).unwrap();
        assert_eq!(totals.income, MoneyCents::new(100));
    }

    #[test]
    fn overflowing_amounts_are_rejected() {
        let huge: MoneyCents = "92233720368547758.07".parse().unwrap();
        let march = YearMonth::new(2024, 3).unwrap();

        let daily = vec![entry(
            "alice",
            EntryKind::Expense,
            huge.cents(),
            date(2024, 1, 1),
            Interval::Daily,
            None,
        )];
        assert!(matches!(
            aggregate("alice", march, &daily),
            Err(LedgerError::InvalidAmount(_))
        ));

        let two_incomes = vec![
            entry("alice", EntryKind::Income, huge.cents(), date(2024, 3, 1), Interval::None, None),
            entry("alice", EntryKind::Income, 1, date(2024, 3, 2), Interval::None, None),
        ];
        assert!(matches!(
            aggregate("alice", march, &two_incomes),
            Err(LedgerError::InvalidAmount(_))
        ));
    }
}
