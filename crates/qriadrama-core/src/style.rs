//! Speaker display styles.
//!
//! A style is an ordered list of `property: value` declarations. Script
//! metadata stores them either as a CSS declaration string or as a JSON
//! object; both forms deserialize into a `RoleStyle`.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Declarations applied to speakers that have no entry in the script's roles.
pub const DEFAULT_ROLE_STYLE: &str = "color: #FFDA79; text-shadow: 0 0 5px rgba(76, 23, 64, 0.5)";

static FALLBACK: LazyLock<RoleStyle> = LazyLock::new(|| RoleStyle::parse(DEFAULT_ROLE_STYLE));

/// Display style for one speaker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleStyle {
    declarations: Vec<(String, String)>,
}

impl RoleStyle {
    /// Parses a CSS declaration list such as `"color: red; font-weight: bold"`.
    ///
    /// Declarations without a `:` are dropped. A repeated property keeps its
    /// last value, in the position of its first occurrence.
    #[must_use]
    pub fn parse(css: &str) -> Self {
        let mut style = Self::default();
        for declaration in css.split(';') {
            if let Some((property, value)) = declaration.split_once(':') {
                style.set(property, value);
            }
        }
        style
    }

    /// The style used when a speaker has no entry of its own.
    #[must_use]
    pub fn fallback() -> &'static Self {
        &FALLBACK
    }

    /// Sets a declaration, replacing any existing value for the property.
    pub fn set(&mut self, property: &str, value: &str) {
        let property = property.trim().to_ascii_lowercase();
        let value = value.trim().to_owned();
        if property.is_empty() {
            return;
        }
        match self.declarations.iter_mut().find(|(p, _)| *p == property) {
            Some(existing) => existing.1 = value,
            None => self.declarations.push((property, value)),
        }
    }

    /// Returns the value of a property, matched case-insensitively.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(p, _)| p.eq_ignore_ascii_case(property))
            .map(|(_, v)| v.as_str())
    }

    /// Iterates declarations in order.
    pub fn declarations(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declarations
            .iter()
            .map(|(p, v)| (p.as_str(), v.as_str()))
    }

    /// Returns `true` if the style has no declarations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// The `color` declaration, if it is a hex colour.
    #[must_use]
    pub fn color(&self) -> Option<Rgb> {
        self.get("color").and_then(Rgb::parse_hex)
    }
}

impl fmt::Display for RoleStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (property, value)) in self.declarations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{property}: {value}")?;
        }
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StyleRepr {
    Css(String),
    Map(BTreeMap<String, String>),
}

impl<'de> Deserialize<'de> for RoleStyle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match StyleRepr::deserialize(deserializer)? {
            StyleRepr::Css(css) => Self::parse(&css),
            StyleRepr::Map(map) => {
                let mut style = Self::default();
                for (property, value) in &map {
                    style.set(property, value);
                }
                style
            }
        })
    }
}

impl Serialize for RoleStyle {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// A 24-bit colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Parses `#rgb` or `#rrggbb`.
    #[must_use]
    pub fn parse_hex(value: &str) -> Option<Self> {
        let hex = value.trim().strip_prefix('#')?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let expand = |i: usize| channel(&hex[i..=i]).map(|v| v * 17);
                Some(Self {
                    r: expand(0)?,
                    g: expand(1)?,
                    b: expand(2)?,
                })
            }
            6 => Some(Self {
                r: channel(&hex[0..2])?,
                g: channel(&hex[2..4])?,
                b: channel(&hex[4..6])?,
            }),
            _ => None,
        }
    }
}
