//! Enhancer configuration.
//!
//! Every field has a default matching the stock page, so an empty TOML file
//! (or no file at all) reproduces the shipped behavior. Unknown keys are
//! rejected to catch typos early.

use crate::error::ConfigError;
use crate::observer::RootMargin;
use core_types::Millis;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnhancerConfig {
    pub selectors: Selectors,
    pub submit: SubmitConfig,
    pub ripple: RippleConfig,
    pub phone: PhoneConfig,
    pub scroll: ScrollConfig,
    pub typewriter: TypewriterConfig,
    pub counter: CounterConfig,
    pub reveal: RevealConfig,
    pub search: SearchConfig,
}

/// CSS selectors used to locate the elements each behavior is wired to.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Selectors {
    pub forms: String,
    /// Evaluated inside each form.
    pub submit_button: String,
    pub ripple_buttons: String,
    pub phone_inputs: String,
    pub fragment_links: String,
    pub hero_title: String,
    pub stat_numbers: String,
    pub reveal_targets: String,
    pub search_form: String,
    /// Evaluated inside the search form.
    pub search_value: String,
    /// Evaluated inside the search form.
    pub search_mode: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            forms: "form".into(),
            submit_button: r#"button[type="submit"]"#.into(),
            ripple_buttons: ".button, button".into(),
            phone_inputs: r#"input[name="phone"]"#.into(),
            fragment_links: r##"a[href^="#"]"##.into(),
            hero_title: ".hero-title".into(),
            stat_numbers: ".stat-number".into(),
            reveal_targets: ".card, .feature-card, .stat-item".into(),
            search_form: ".search-form".into(),
            search_value: r#"input[name="value"]"#.into(),
            search_mode: r#"select[name="mode"]"#.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SubmitConfig {
    pub processing_label: String,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            processing_label: "⏳ جاري المعالجة...".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RippleConfig {
    pub class: String,
    pub lifetime_ms: Millis,
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            class: "ripple".into(),
            lifetime_ms: 600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhoneConfig {
    /// Digits only, without the leading `+`.
    pub country_code: String,
}

impl Default for PhoneConfig {
    fn default() -> Self {
        Self {
            country_code: "249".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrollConfig {
    pub smooth_duration_ms: Millis,
    pub frame_ms: Millis,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smooth_duration_ms: 400,
            frame_ms: 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TypewriterConfig {
    pub start_delay_ms: Millis,
    pub step_ms: Millis,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            start_delay_ms: 500,
            step_ms: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CounterConfig {
    pub interval_ms: Millis,
    /// The increment per tick is `target / steps`.
    pub steps: u32,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            interval_ms: 30,
            steps: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealConfig {
    pub threshold: f32,
    /// CSS margin shorthand applied to the viewport, e.g. `"0px 0px -50px 0px"`.
    pub root_margin: String,
    pub class: String,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin: "0px 0px -50px 0px".into(),
            class: "animate-in".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Values up to this many characters are plates; longer alphanumeric values are chassis numbers.
    pub plate_max_len: usize,
    pub chassis_placeholder: String,
    pub plate_placeholder: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            plate_max_len: 10,
            chassis_placeholder: "تم اكتشاف رقم شاسي تلقائياً".into(),
            plate_placeholder: "أدخل رقم اللوحة أو الشاسي".into(),
        }
    }
}

impl EnhancerConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)
            .map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.counter.steps == 0 {
            return Err(ConfigError::Invalid("counter.steps must be at least 1".into()));
        }
        for (name, value) in [
            ("counter.interval_ms", self.counter.interval_ms),
            ("typewriter.step_ms", self.typewriter.step_ms),
            ("scroll.frame_ms", self.scroll.frame_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{name} must be non-zero")));
            }
        }
        if !(0.0..=1.0).contains(&self.reveal.threshold) {
            return Err(ConfigError::Invalid(format!(
                "reveal.threshold must be within [0, 1], got {}",
                self.reveal.threshold
            )));
        }
        if self.phone.country_code.is_empty()
            || !self.phone.country_code.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(ConfigError::Invalid(format!(
                "phone.country_code must be digits, got `{}`",
                self.phone.country_code
            )));
        }
        RootMargin::parse(&self.reveal.root_margin)?;
        Ok(())
    }
}
