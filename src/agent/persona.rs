//! Persona: the framing style applied at the top of the system prompt.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    #[default]
    Sales,
    Support,
}

impl Persona {
    pub const ALL: [Persona; 2] = [Persona::Sales, Persona::Support];

    pub fn as_str(self) -> &'static str {
        match self {
            Persona::Sales => "sales",
            Persona::Support => "support",
        }
    }

    /// Opening sentence of the system prompt.
    pub fn framing(self) -> &'static str {
        match self {
            Persona::Sales => {
                "You are a professional sales representative. Be persuasive, friendly, and focus on value proposition."
            }
            Persona::Support => {
                "You are a helpful customer support agent. Be empathetic, clear, and solution-oriented."
            }
        }
    }

    /// Lenient parse: unrecognized tags get the sales framing.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "support" => Persona::Support,
            _ => Persona::Sales,
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Persona {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Persona::from_tag(s))
    }
}

// Hand-edited agent files may carry any tag
impl<'de> Deserialize<'de> for Persona {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tag = String::deserialize(deserializer)?;
        Ok(Persona::from_tag(&tag))
    }
}
