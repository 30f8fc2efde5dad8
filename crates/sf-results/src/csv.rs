//! Minimal CSV rendering for result tables, charts and reports.

use std::borrow::Cow;

use crate::chart::TimeSeriesChart;
use crate::differential::DifferentialReport;

/// Quote a field if it contains a separator, quote or line break.
pub fn escape(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

pub(crate) fn push_row<'a>(out: &mut String, fields: impl IntoIterator<Item = Cow<'a, str>>) {
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&field);
    }
    out.push('\n');
}

/// `time,<series>...` header and one line per sample, series in chart order.
///
/// Series of one chart share their sample times; the first series supplies the time column.
pub fn chart_csv(chart: &TimeSeriesChart) -> String {
    let mut out = String::new();
    push_row(
        &mut out,
        std::iter::once(Cow::Borrowed("time"))
            .chain(chart.series.iter().map(|s| escape(&s.name))),
    );
    let samples = chart.series.iter().map(|s| s.points.len()).min().unwrap_or(0);
    for k in 0..samples {
        let t = chart.series[0].points[k].0;
        push_row(
            &mut out,
            std::iter::once(Cow::Owned(t.to_string()))
                .chain(chart.series.iter().map(|s| Cow::Owned(s.points[k].1.to_string()))),
        );
    }
    out
}

/// `node,delta` lines in report order.
pub fn report_csv(report: &DifferentialReport) -> String {
    let mut out = String::from("node,delta\n");
    for entry in report.entries() {
        push_row(
            &mut out,
            [escape(&entry.name), Cow::Owned(entry.delta.to_string())],
        );
    }
    out
}
