/// Total revenue for one nation.
#[derive(Debug, Clone, PartialEq)]
pub struct NationRevenue {
    pub nation_name: String,
    pub revenue: f64,
}

/// Order totals by revenue descending, ties by nation name ascending.
pub fn rank_by_revenue<'a, I>(totals: I) -> Vec<NationRevenue>
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let mut rows = totals
        .into_iter()
        .map(|(name, revenue)| NationRevenue {
            nation_name: name.to_string(),
            revenue,
        })
        .collect::<Vec<_>>();
    rows.sort_by(|a, b| {
        b.revenue
            .total_cmp(&a.revenue)
            .then_with(|| a.nation_name.cmp(&b.nation_name))
    });
    rows
}
