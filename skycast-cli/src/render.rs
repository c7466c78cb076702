//! Terminal rendering of a weather bundle: the stand-in for the dashboard's
//! presentation layer.

use chrono::{FixedOffset, Local, TimeZone};
use skycast_core::classify::{self, ConditionTheme};
use skycast_core::daily::{self, DailyBucket};
use skycast_core::model::{AirQuality, Alert, CurrentConditions, WeatherBundle};

pub fn bundle(bundle: &WeatherBundle) {
    current(&bundle.current, &bundle.location.label());

    let buckets = daily::group_by_day(&bundle.forecast, &Local);
    if !buckets.is_empty() {
        forecast(&buckets);
    }

    if let Some(reading) = &bundle.air_quality {
        air_quality(reading);
    } else {
        println!("\nAir quality: no data");
    }

    if let Some(uv) = &bundle.uv_index {
        println!("\nUV index: {:.1}", uv.value);
    }

    alerts(&bundle.alerts);
}

fn current(current: &CurrentConditions, label: &str) {
    let description = current
        .primary_condition()
        .map(|c| c.description.as_str())
        .unwrap_or("unknown");
    let theme = current
        .primary_condition()
        .map(|c| classify::condition_theme(&c.main))
        .unwrap_or(ConditionTheme::Neutral);

    println!("{} {label} - {description}", theme.symbol());
    println!(
        "  {:.0}° (feels like {:.0}°)  H: {:.0}°  L: {:.0}°",
        current.main.temp, current.main.feels_like, current.main.temp_max, current.main.temp_min
    );

    let visibility = current
        .visibility
        .map(format_visibility_km)
        .unwrap_or_else(|| "n/a".to_string());
    println!(
        "  humidity {}%  pressure {:.0} hPa  wind {:.0} m/s {}  visibility {visibility}",
        current.main.humidity,
        current.main.pressure,
        current.wind.speed,
        classify::compass_direction(current.wind.deg)
    );

    println!(
        "  sunrise {}  sunset {}",
        format_epoch(current.sys.sunrise, current.timezone),
        format_epoch(current.sys.sunset, current.timezone)
    );
}

fn forecast(buckets: &[DailyBucket]) {
    match daily::average_temp(buckets) {
        Some(avg) => println!("\n{}-day forecast (avg {avg}°):", buckets.len()),
        None => println!("\nForecast:"),
    }

    for bucket in buckets {
        let condition = bucket.representative.primary_condition();
        let description = condition.map(|c| c.description.as_str()).unwrap_or("unknown");
        let symbol = condition
            .map(|c| classify::condition_theme(&c.main))
            .unwrap_or(ConditionTheme::Neutral)
            .symbol();

        println!(
            "  {}  {symbol}  {:>4.0}° to {:<4.0}°  {description}",
            bucket.date.format("%a %Y-%m-%d"),
            bucket.min_temp,
            bucket.max_temp
        );
    }
}

fn air_quality(reading: &AirQuality) {
    let tier = classify::classify_aqi(reading.index);
    println!("\nAir quality: {} - {}", tier.level, tier.description);
    println!(
        "  PM2.5 {:.1}  PM10 {:.1}  NO₂ {:.1}  O₃ {:.1}  (μg/m³)",
        reading.components.pm2_5, reading.components.pm10, reading.components.no2,
        reading.components.o3
    );
}

fn alerts(alerts: &[Alert]) {
    if alerts.is_empty() {
        return;
    }

    println!("\nAlerts:");
    for alert in alerts {
        let severity = classify::alert_severity(&alert.event);
        println!(
            "  [{}] {} - issued by {}",
            severity.label(),
            alert.event,
            alert.sender
        );
        println!(
            "    {} -> {}",
            format_local(alert.start_time),
            format_local(alert.end_time)
        );
        if !alert.tags.is_empty() {
            println!("    tags: {}", alert.tags.join(", "));
        }
        let description = alert.description.trim();
        if !description.is_empty() {
            println!("    {description}");
        }
    }
}

/// Render an epoch timestamp in the reported location's own UTC offset.
fn format_epoch(ts: i64, offset_secs: i32) -> String {
    FixedOffset::east_opt(offset_secs)
        .and_then(|tz| tz.timestamp_opt(ts, 0).single())
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}

/// Render an epoch timestamp in the viewer's local zone.
fn format_local(ts: i64) -> String {
    Local
        .timestamp_opt(ts, 0)
        .single()
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn format_visibility_km(meters: u32) -> String {
    format!("{:.1} km", f64::from(meters) / 1000.0)
}
