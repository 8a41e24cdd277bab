use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Celsius.
    pub temperature: f32,
    /// km/h.
    pub wind_speed: f32,
    pub alert: Option<String>,
}

impl WeatherSnapshot {
    pub fn calm() -> Self {
        Self {
            temperature: 20.0,
            wind_speed: 0.0,
            alert: None,
        }
    }

    pub fn has_alert(&self) -> bool {
        self.alert.is_some()
    }

    pub fn alert_text(&self) -> &str {
        self.alert.as_deref().unwrap_or("No alerts")
    }
}

impl Default for WeatherSnapshot {
    fn default() -> Self {
        Self::calm()
    }
}

pub trait WeatherSource {
    fn current(&self) -> &WeatherSnapshot;
    /// Advances simulated time by `dt` seconds.
    fn update(&mut self, dt: f32);
}

/// Per-city weather with a stable baseline and slow oscillation over sim time.
#[derive(Debug, Clone)]
pub struct SimulatedWeather {
    base_temperature: f32,
    base_wind: f32,
    elapsed: f32,
    since_refresh: f32,
    refresh_secs: f32,
    current: WeatherSnapshot,
}

impl SimulatedWeather {
    pub fn new(city: &str, seed: u64, refresh_secs: f32) -> Self {
        let city_hash = city
            .bytes()
            .fold(0u64, |h, c| h.wrapping_mul(31).wrapping_add(u64::from(c)));
        let mut rng = StdRng::seed_from_u64(city_hash ^ seed);
        let mut weather = Self {
            base_temperature: rng.gen_range(15.0..35.0),
            base_wind: rng.gen_range(5.0..30.0),
            elapsed: 0.0,
            since_refresh: 0.0,
            refresh_secs,
            current: WeatherSnapshot::calm(),
        };
        weather.refresh();
        weather
    }

    fn refresh(&mut self) {
        let temperature = (self.base_temperature + 5.0 * (self.elapsed * 0.01).sin()).clamp(-10.0, 40.0);
        let wind_speed = (self.base_wind + 5.0 * (self.elapsed * 0.02).sin()).clamp(0.0, 50.0);
        self.current = WeatherSnapshot {
            temperature,
            wind_speed,
            alert: alert_for(temperature, wind_speed),
        };
        self.since_refresh = 0.0;
    }
}

fn alert_for(temperature: f32, wind_speed: f32) -> Option<String> {
    let text = if wind_speed > 25.0 {
        "High wind warning"
    } else if temperature < 5.0 {
        "Low temperature alert"
    } else if temperature > 35.0 {
        "Heat wave warning"
    } else {
        return None;
    };
    Some(text.to_string())
}

impl WeatherSource for SimulatedWeather {
    fn current(&self) -> &WeatherSnapshot {
        &self.current
    }

    fn update(&mut self, dt: f32) {
        self.elapsed += dt;
        self.since_refresh += dt;
        if self.since_refresh >= self.refresh_secs {
            self.refresh();
        }
    }
}
