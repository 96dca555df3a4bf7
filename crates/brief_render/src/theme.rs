use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Classic,
    Dark,
    Paper,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Classic, Theme::Dark, Theme::Paper];

    pub fn stylesheet(&self) -> &'static str {
        match self {
            Theme::Classic => {
                "body{font-family:system-ui,sans-serif;background:#f5f6f8;color:#1d2433;}\
                 a{color:#1a5fb4;}.tag{background:#dfe7f5;color:#1a3a6b;}\
                 .stale{background:#fff3cd;color:#664d03;}"
            }
            Theme::Dark => {
                "body{font-family:system-ui,sans-serif;background:#15181e;color:#d8dee9;}\
                 a{color:#88c0d0;}.tag{background:#2e3440;color:#a3be8c;}\
                 .stale{background:#3b3222;color:#ebcb8b;}"
            }
            Theme::Paper => {
                "body{font-family:Georgia,serif;background:#fbf8f1;color:#222;}\
                 a{color:#7a1f1f;}.tag{background:#eee6d3;color:#5b4a2a;}\
                 .stale{background:#f3e1c7;color:#6b3d00;}"
            }
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Classic => write!(f, "classic"),
            Theme::Dark => write!(f, "dark"),
            Theme::Paper => write!(f, "paper"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .into_iter()
            .find(|theme| theme.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown theme `{}` (expected classic, dark or paper)", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_parse_and_display() {
        for theme in Theme::ALL {
            assert_eq!(theme.to_string().parse::<Theme>().unwrap(), theme);
        }
        assert_eq!("DARK".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("neon".parse::<Theme>().is_err());
    }

    #[test]
    fn test_theme_serde() {
        let theme: Theme = serde_json::from_str("\"paper\"").unwrap();
        assert_eq!(theme, Theme::Paper);
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
    }
}
