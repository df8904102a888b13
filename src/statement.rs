//! Pure helpers for the statement view: filtering, date sorting and
//! grouping of an in-memory transaction list.

use chrono::{ NaiveDate, NaiveDateTime };

use crate::db::{ Transaction, TxType };

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(TxType),
}

/// Statement filter options. Empty strings / `None` mean "no bound".
#[derive(Debug, Clone, Default)]
pub struct TxFilter {
    /// Case-insensitive substring matched against beneficiary, document,
    /// bank, agency, account and PIX key.
    pub query: String,
    pub type_filter: TypeFilter,
    /// Inclusive range start, `YYYY-MM-DD`.
    pub from: String,
    /// Inclusive range end, `YYYY-MM-DD`.
    pub to: String,
    /// Bounds on the absolute amount.
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub sort_asc: bool,
}

/// Parses the date strings carried by transactions: a bare `YYYY-MM-DD` is
/// read as local midnight, otherwise an RFC3339-style datetime.
pub fn parse_tx_date(s: &str) -> Option<NaiveDateTime> {
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    if let Ok(d) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(d.naive_local());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").ok()
}

fn haystack(t: &Transaction) -> String {
    let opt = |v: &Option<String>| v.clone().unwrap_or_default();
    format!(
        "{} {} {} {} {} {}",
        t.beneficiary,
        t.document,
        opt(&t.bank),
        opt(&t.agency),
        opt(&t.account),
        opt(&t.pix_key)
    )
        .to_lowercase()
}

fn sort_key(t: &Transaction) -> NaiveDateTime {
    parse_tx_date(&t.date).unwrap_or(NaiveDateTime::MIN)
}

/// Applies every filter, then sorts by date. The sort is stable, so entries
/// with equal dates keep their incoming order in either direction.
pub fn filter_and_sort(items: &[Transaction], filter: &TxFilter) -> Vec<Transaction> {
    let query = filter.query.trim().to_lowercase();

    let start = if filter.from.is_empty() {
        NaiveDateTime::MIN
    } else {
        parse_tx_date(&filter.from).unwrap_or(NaiveDateTime::MIN)
    };
    let end = if filter.to.is_empty() {
        NaiveDateTime::MAX
    } else {
        parse_tx_date(&filter.to)
            .and_then(|d| d.date().and_hms_opt(23, 59, 59))
            .unwrap_or(NaiveDateTime::MAX)
    };

    let min = filter.min_value.unwrap_or(0.0);
    let max = filter.max_value.unwrap_or(f64::INFINITY);

    let mut out: Vec<Transaction> = items
        .iter()
        .filter(|t| {
            match filter.type_filter {
                TypeFilter::All => true,
                TypeFilter::Only(kind) => t.tx_type == kind,
            }
        })
        .filter(|t| query.is_empty() || haystack(t).contains(&query))
        .filter(|t| {
            // Entries with unparseable dates never match a date range.
            parse_tx_date(&t.date).is_some_and(|d| d >= start && d <= end)
        })
        .filter(|t| {
            let v = t.amount.abs();
            v.is_finite() && v >= min && v <= max
        })
        .cloned()
        .collect();

    if filter.sort_asc {
        out.sort_by_key(sort_key);
    } else {
        out.sort_by(|a, b| sort_key(b).cmp(&sort_key(a)));
    }

    out
}

/// Groups transactions by calendar day into `(dd/mm/yyyy, items)` pairs,
/// ordered by day recency (most recent first by default). Items inside a
/// group keep their incoming order. Ordering is computed from the parsed day
/// stamp, so it is independent of the incoming list order.
pub fn group_by_day(
    items: &[Transaction],
    descending: bool
) -> Vec<(String, Vec<Transaction>)> {
    let mut groups: Vec<(String, NaiveDate, Vec<Transaction>)> = Vec::new();

    for t in items {
        let (label, day) = match parse_tx_date(&t.date) {
            Some(d) => (d.date().format("%d/%m/%Y").to_string(), d.date()),
            // Unparseable dates group under their raw label, sorted last.
            None => (t.date.clone(), NaiveDate::MIN),
        };

        match groups.iter_mut().find(|(l, _, _)| *l == label) {
            Some((_, _, bucket)) => bucket.push(t.clone()),
            None => groups.push((label, day, vec![t.clone()])),
        }
    }

    groups.sort_by(|a, b| if descending { b.1.cmp(&a.1) } else { a.1.cmp(&b.1) });

    groups
        .into_iter()
        .map(|(label, _, bucket)| (label, bucket))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(id: i64, tx_type: TxType, beneficiary: &str, amount: f64, date: &str) -> Transaction {
        Transaction {
            id,
            user_id: 1,
            tx_type,
            beneficiary: beneficiary.to_string(),
            document: "123.456.789-00".to_string(),
            bank: None,
            agency: None,
            account: None,
            pix_key: Some("chave@pix.com".to_string()),
            amount,
            date: date.to_string(),
            balance_after: 0.0,
        }
    }

    fn sample() -> Vec<Transaction> {
        vec![
            tx(1, TxType::Pix, "Maria", -120.0, "2025-08-22"),
            tx(2, TxType::Ted, "João", -300.5, "2025-08-20"),
            tx(3, TxType::Deposit, "Salário", 5000.0, "2025-08-22T09:30:00"),
            tx(4, TxType::Pix, "Mercado", -57.9, "2025-08-10")
        ]
    }

    #[test]
    fn test_filter_is_idempotent() {
        let filter = TxFilter {
            type_filter: TypeFilter::Only(TxType::Pix),
            min_value: Some(50.0),
            ..Default::default()
        };

        let once = filter_and_sort(&sample(), &filter);
        let twice = filter_and_sort(&once, &filter);

        let ids = |v: &[Transaction]| v.iter().map(|t| t.id).collect::<Vec<_>>();
        assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn test_sort_asc_is_reverse_of_desc() {
        let asc = filter_and_sort(&sample(), &TxFilter { sort_asc: true, ..Default::default() });
        let desc = filter_and_sort(&sample(), &TxFilter::default());

        let mut reversed: Vec<i64> = desc
            .iter()
            .map(|t| t.id)
            .collect();
        reversed.reverse();
        assert_eq!(
            asc
                .iter()
                .map(|t| t.id)
                .collect::<Vec<_>>(),
            reversed
        );
    }

    #[test]
    fn test_query_matches_across_fields() {
        let mut items = sample();
        items[1].bank = Some("Banco Azul".to_string());

        let by_name = filter_and_sort(&items, &TxFilter {
            query: "  MARIA ".to_string(),
            ..Default::default()
        });
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].beneficiary, "Maria");

        let by_bank = filter_and_sort(&items, &TxFilter {
            query: "banco azul".to_string(),
            ..Default::default()
        });
        assert_eq!(by_bank.len(), 1);
        assert_eq!(by_bank[0].id, 2);

        let by_pix_key = filter_and_sort(&items, &TxFilter {
            query: "chave@pix".to_string(),
            ..Default::default()
        });
        assert_eq!(by_pix_key.len(), items.len());
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let filter = TxFilter {
            from: "2025-08-20".to_string(),
            to: "2025-08-22".to_string(),
            sort_asc: true,
            ..Default::default()
        };

        let out = filter_and_sort(&sample(), &filter);
        let ids: Vec<i64> = out
            .iter()
            .map(|t| t.id)
            .collect();
        // The 22nd with a time component still falls inside the range end.
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_amount_range_uses_absolute_value() {
        let filter = TxFilter {
            min_value: Some(100.0),
            max_value: Some(400.0),
            sort_asc: true,
            ..Default::default()
        };

        let out = filter_and_sort(&sample(), &filter);
        let ids: Vec<i64> = out
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_stable_order_for_equal_dates() {
        let items = vec![
            tx(1, TxType::Pix, "A", -1.0, "2025-08-20"),
            tx(2, TxType::Pix, "B", -2.0, "2025-08-20"),
            tx(3, TxType::Pix, "C", -3.0, "2025-08-20")
        ];

        for sort_asc in [true, false] {
            let out = filter_and_sort(&items, &TxFilter { sort_asc, ..Default::default() });
            assert_eq!(
                out
                    .iter()
                    .map(|t| t.id)
                    .collect::<Vec<_>>(),
                vec![1, 2, 3]
            );
        }
    }

    #[test]
    fn test_group_by_day_orders_by_recency() {
        let grouped = group_by_day(&sample(), true);

        let labels: Vec<&str> = grouped
            .iter()
            .map(|(l, _)| l.as_str())
            .collect();
        assert_eq!(labels, vec!["22/08/2025", "20/08/2025", "10/08/2025"]);

        // Both entries of the 22nd land in the same bucket regardless of the
        // time component.
        assert_eq!(grouped[0].1.len(), 2);

        // Ordering comes from the computed day stamp, not list order.
        let mut shuffled = sample();
        shuffled.reverse();
        let regrouped = group_by_day(&shuffled, true);
        assert_eq!(
            regrouped
                .iter()
                .map(|(l, _)| l.as_str())
                .collect::<Vec<_>>(),
            labels
        );
    }

    #[test]
    fn test_group_by_day_ascending() {
        let grouped = group_by_day(&sample(), false);
        let labels: Vec<&str> = grouped
            .iter()
            .map(|(l, _)| l.as_str())
            .collect();
        assert_eq!(labels, vec!["10/08/2025", "20/08/2025", "22/08/2025"]);
    }

    #[test]
    fn test_parse_tx_date_variants() {
        assert_eq!(
            parse_tx_date("2025-08-20"),
            NaiveDate::from_ymd_opt(2025, 8, 20).unwrap().and_hms_opt(0, 0, 0)
        );
        assert!(parse_tx_date("2025-08-20T09:30:00").is_some());
        assert!(parse_tx_date("2025-08-20T09:30:00.123Z").is_some());
        assert!(parse_tx_date("not a date").is_none());
    }
}
