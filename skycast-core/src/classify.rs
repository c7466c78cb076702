//! Display classification tables: AQI tiers, condition themes, alert
//! severity and compass directions. Deterministic lookups consumed by the
//! rendering layer.

/// Display tier for one step of the upstream 1..=5 AQI scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AqiLevel {
    pub level: &'static str,
    pub description: &'static str,
}

const AQI_LEVELS: [AqiLevel; 5] = [
    AqiLevel {
        level: "Good",
        description: "Air quality is satisfactory",
    },
    AqiLevel {
        level: "Fair",
        description: "Air quality is acceptable",
    },
    AqiLevel {
        level: "Moderate",
        description: "Sensitive people may experience minor breathing discomfort",
    },
    AqiLevel {
        level: "Poor",
        description: "Everyone may begin to experience health effects",
    },
    AqiLevel {
        level: "Very Poor",
        description: "Health warnings of emergency conditions",
    },
];

/// Tier for an AQI value. Out-of-scale values clamp to the nearest defined
/// tier rather than failing.
pub fn classify_aqi(index: u8) -> AqiLevel {
    let idx = usize::from(index.saturating_sub(1)).min(AQI_LEVELS.len() - 1);
    AQI_LEVELS[idx]
}

/// Visual theme keyed by the primary condition group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionTheme {
    Sunny,
    Cloudy,
    Rainy,
    Snowy,
    Neutral,
}

impl ConditionTheme {
    pub fn symbol(self) -> &'static str {
        match self {
            ConditionTheme::Sunny => "☀",
            ConditionTheme::Cloudy => "☁",
            ConditionTheme::Rainy => "🌧",
            ConditionTheme::Snowy => "❄",
            ConditionTheme::Neutral => "·",
        }
    }
}

/// Map the upstream condition group string (`weather[0].main`) to a theme.
pub fn condition_theme(main: &str) -> ConditionTheme {
    match main {
        "Clear" => ConditionTheme::Sunny,
        "Clouds" | "Mist" | "Fog" | "Haze" | "Dust" | "Sand" | "Ash" => ConditionTheme::Cloudy,
        "Rain" | "Drizzle" | "Thunderstorm" | "Squall" | "Tornado" => ConditionTheme::Rainy,
        "Snow" => ConditionTheme::Snowy,
        _ => ConditionTheme::Neutral,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
}

impl AlertSeverity {
    pub fn label(self) -> &'static str {
        match self {
            AlertSeverity::Low => "LOW",
            AlertSeverity::Medium => "MEDIUM",
            AlertSeverity::High => "HIGH",
        }
    }
}

/// Severity inferred from the alert event text: warnings outrank watches and
/// advisories; anything else is informational.
pub fn alert_severity(event: &str) -> AlertSeverity {
    let event = event.to_lowercase();
    if event.contains("warning") || event.contains("severe") {
        AlertSeverity::High
    } else if event.contains("watch") || event.contains("advisory") {
        AlertSeverity::Medium
    } else {
        AlertSeverity::Low
    }
}

/// 8-point compass label for a wind direction in meteorological degrees.
pub fn compass_direction(degrees: f64) -> &'static str {
    const POINTS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];
    let index = ((degrees / 45.0).round() as usize) % POINTS.len();
    POINTS[index]
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IconSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl IconSize {
    fn suffix(self) -> &'static str {
        match self {
            IconSize::Small => "1x",
            IconSize::Medium => "2x",
            IconSize::Large => "4x",
        }
    }
}

/// URL of the upstream icon for a condition icon code.
pub fn icon_url(code: &str, size: IconSize) -> String {
    format!(
        "https://openweathermap.org/img/wn/{code}@{}.png",
        size.suffix()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aqi_tiers_follow_the_scale() {
        assert_eq!(classify_aqi(1).level, "Good");
        assert_eq!(classify_aqi(2).level, "Fair");
        assert_eq!(classify_aqi(5).level, "Very Poor");
    }

    #[test]
    fn aqi_out_of_scale_clamps() {
        assert_eq!(classify_aqi(0).level, "Good");
        assert_eq!(classify_aqi(9).level, "Very Poor");
    }

    #[test]
    fn condition_groups_map_to_themes() {
        assert_eq!(condition_theme("Clear"), ConditionTheme::Sunny);
        assert_eq!(condition_theme("Haze"), ConditionTheme::Cloudy);
        assert_eq!(condition_theme("Drizzle"), ConditionTheme::Rainy);
        assert_eq!(condition_theme("Snow"), ConditionTheme::Snowy);
        assert_eq!(condition_theme("Aurora"), ConditionTheme::Neutral);
    }

    #[test]
    fn severity_keys_off_event_keywords() {
        assert_eq!(
            alert_severity("Severe Thunderstorm Warning"),
            AlertSeverity::High
        );
        assert_eq!(alert_severity("Flood Watch"), AlertSeverity::Medium);
        assert_eq!(alert_severity("Heat Advisory"), AlertSeverity::Medium);
        assert_eq!(alert_severity("Air Quality Statement"), AlertSeverity::Low);
    }

    #[test]
    fn compass_wraps_at_north() {
        assert_eq!(compass_direction(0.0), "N");
        assert_eq!(compass_direction(90.0), "E");
        assert_eq!(compass_direction(140.0), "SE");
        assert_eq!(compass_direction(359.0), "N");
    }

    #[test]
    fn icon_url_encodes_code_and_size() {
        assert_eq!(
            icon_url("04d", IconSize::Medium),
            "https://openweathermap.org/img/wn/04d@2x.png"
        );
        assert_eq!(
            icon_url("01n", IconSize::Large),
            "https://openweathermap.org/img/wn/01n@4x.png"
        );
    }
}
