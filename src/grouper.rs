use crate::types::{FleetMapping, RawEntry};
use tracing::debug;

/// Folds `(server, "key:value")` rows into one record per server.
///
/// A metric without exactly one `:` is skipped. Later values for the same
/// key of the same server replace earlier ones.
pub fn group<I>(entries: I) -> FleetMapping
where
    I: IntoIterator<Item = RawEntry>,
{
    let mut mapping = FleetMapping::new();
    for entry in entries {
        let Some((key, value)) = split_metric(&entry.metric) else {
            debug!(server = %entry.server_name, metric = %entry.metric, "dropping malformed metric");
            continue;
        };
        mapping
            .entry(entry.server_name)
            .or_default()
            .set(key, value);
    }
    mapping
}

fn split_metric(metric: &str) -> Option<(&str, &str)> {
    match metric.split_once(':') {
        Some((_, value)) if value.contains(':') => None,
        other => other,
    }
}
