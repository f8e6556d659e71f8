// Mapper to convert aggregated panel data to chart specs
use crate::domain::chart::{
    CategoryAxis, ChartKind, ChartSpec, Series, SeriesPoints, SeriesStyle, SlicePoint, Stacking,
    ValueAxis,
};
use crate::domain::dashboard::{MpCountChartData, PortDiagnostics, SwitchToolChartData};
use crate::domain::palette::{brighten, ColorAssigner};
use crate::domain::port_diagnostics::NORMAL_ENV;
use crate::domain::series::SeriesByCategory;

const WEEKS_AXIS_TITLE: &str = "Weeks of the year";

pub fn switch_tool_chart(data: &SwitchToolChartData) -> ChartSpec {
    let amounts = data.amount_by_week.iter().map(count_series);

    let progress = data.average_progress_hours_by_week.iter().map(|s| Series {
        kind: ChartKind::Spline,
        name: format!("{} project progress", s.category),
        y_axis: 1,
        data: SeriesPoints::Values(s.values.clone()),
        style: SeriesStyle {
            dash_style: Some("ShortDot".to_string()),
            marker: Some(false),
            ..Default::default()
        },
    });

    let mut chart = ChartSpec::new(ChartKind::Column, "Switch Tool Amount vs Project Progress");
    chart.x_axis = Some(week_axis(&data.amount_by_week));
    chart.y_axes = vec![
        ValueAxis::new("Switch Amount"),
        ValueAxis {
            opposite: true,
            ..ValueAxis::new("Project Progress, Average hours spent in hours")
        },
    ];
    chart.stacking = Some(Stacking::Normal);
    chart.series = amounts.chain(progress).collect();
    chart
}

pub fn mp_count_chart(data: &MpCountChartData) -> ChartSpec {
    let mut chart = ChartSpec::new(ChartKind::Column, "MP Count of ICs by Weeks");
    chart.x_axis = Some(week_axis(&data.mp_count_by_week));
    chart.y_axes = vec![ValueAxis {
        stack_labels: true,
        ..ValueAxis::new("MP Count")
    }];
    chart.stacking = Some(Stacking::Normal);
    chart.data_labels = true;
    chart.series = data.mp_count_by_week.iter().map(count_series).collect();
    chart
}

pub fn environment_chart(data: &PortDiagnostics) -> ChartSpec {
    let mut chart = ChartSpec::new(ChartKind::Pie, "PPS2 Multi Single Port Count vs Normal Env Count");
    if data.env_count.is_empty() {
        return chart;
    }

    let slices = data
        .env_count
        .iter()
        .map(|slice| SlicePoint {
            name: slice.name.clone(),
            y: slice.value,
            sliced: slice.name != NORMAL_ENV,
            color: None,
        })
        .collect();

    chart.data_labels = true;
    chart.series = vec![Series {
        kind: ChartKind::Pie,
        name: "Ave. Count".to_string(),
        y_axis: 0,
        data: SeriesPoints::Slices(slices),
        style: SeriesStyle {
            label_format: Some("<b>{point.name}</b>: {point.y} ({point.percentage:.1f}%)".to_string()),
            ..Default::default()
        },
    }];
    chart
}

/// Inner pie of IC totals with an outer ring of firmware counts, each
/// firmware shaded from its IC's colour by its share of that IC.
pub fn ic_firmware_chart(data: &PortDiagnostics, colors: &dyn ColorAssigner) -> ChartSpec {
    let mut chart = ChartSpec::new(ChartKind::Pie, "Multi Single Port Count of Each IC");
    if data.ic_count.is_empty() {
        return chart;
    }

    let ic_slices = data
        .ic_count
        .iter()
        .map(|slice| SlicePoint {
            name: slice.name.clone(),
            y: slice.value,
            sliced: false,
            color: Some(colors.color_for(&slice.name)),
        })
        .collect();

    let fw_slices = data
        .fw_count
        .iter()
        .map(|slice| {
            let color = data.fw_owner.get(&slice.name).and_then(|ic| {
                let total = data
                    .ic_count
                    .iter()
                    .find(|s| s.name == *ic)
                    .map(|s| s.value)
                    .unwrap_or(0);
                let share = if total == 0 { 0.0 } else { slice.value as f64 / total as f64 };
                brighten(&colors.color_for(ic), 0.2 - share / 6.0)
            });
            SlicePoint {
                name: slice.name.clone(),
                y: slice.value,
                sliced: false,
                color,
            }
        })
        .collect();

    chart.data_labels = true;
    chart.series = vec![
        Series {
            kind: ChartKind::Pie,
            name: "IC Ave. Count".to_string(),
            y_axis: 0,
            data: SeriesPoints::Slices(ic_slices),
            style: SeriesStyle {
                size: Some("45%".to_string()),
                label_format: Some("<b>{point.name}</b>({point.percentage:.1f}%)".to_string()),
                ..Default::default()
            },
        },
        Series {
            kind: ChartKind::Pie,
            name: "Fw Ave. Count".to_string(),
            y_axis: 0,
            data: SeriesPoints::Slices(fw_slices),
            style: SeriesStyle {
                size: Some("80%".to_string()),
                inner_size: Some("60%".to_string()),
                label_format: Some("<b>{point.name}:</b> {y}".to_string()),
                ..Default::default()
            },
        },
    ];
    chart
}

/// Categories come from the first series; all series share one week axis.
fn week_axis<V>(series: &[SeriesByCategory<V>]) -> CategoryAxis {
    CategoryAxis {
        title: WEEKS_AXIS_TITLE.to_string(),
        categories: series.first().map(|s| s.weeks.clone()).unwrap_or_default(),
    }
}

fn count_series(series: &SeriesByCategory<u64>) -> Series {
    Series {
        kind: ChartKind::Column,
        name: series.category.clone(),
        y_axis: 0,
        data: SeriesPoints::Values(series.values.iter().map(|v| Some(*v as f64)).collect()),
        style: SeriesStyle::default(),
    }
}
