// ── Mower identity ──

use serde::{Deserialize, Serialize};

use automower_api::RobotInfo;

use crate::catalog;

/// Prefix for tracker device ids.
const DEV_ID_PREFIX: &str = "automower";

/// Immutable identity of one mower, fixed at discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MowerIdentity {
    /// Vendor id, e.g. `171300123-171300456`.
    pub id: String,
    pub name: String,
    /// Vendor model code (`G`, `L`, ...).
    pub model: String,
}

impl MowerIdentity {
    pub fn new(id: impl Into<String>, name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            model: model.into(),
        }
    }

    /// Device id for location trackers: `automower_<model>_<id>`, slugified.
    pub fn dev_id(&self) -> String {
        slugify(&format!("{DEV_ID_PREFIX}_{}_{}", self.model, self.id))
    }

    /// Marketing name, falling back to the raw model code.
    pub fn model_name(&self) -> &str {
        catalog::model_name(&self.model)
    }
}

impl From<RobotInfo> for MowerIdentity {
    fn from(robot: RobotInfo) -> Self {
        Self {
            id: robot.id,
            name: robot.name,
            model: robot.model,
        }
    }
}

impl From<&RobotInfo> for MowerIdentity {
    fn from(robot: &RobotInfo) -> Self {
        Self::from(robot.clone())
    }
}

/// Lowercase, fold accented Latin letters to ASCII, collapse every run of
/// other characters into one `_`, and trim separators from both ends.
fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_sep = false;

    for ch in input.chars().flat_map(char::to_lowercase) {
        let mut buf = [0; 4];
        let piece: &str = if ch.is_ascii_alphanumeric() {
            ch.encode_utf8(&mut buf)
        } else if let Some(ascii) = fold_latin(ch) {
            ascii
        } else {
            pending_sep = true;
            continue;
        };
        if pending_sep && !slug.is_empty() {
            slug.push('_');
        }
        pending_sep = false;
        slug.push_str(piece);
    }
    slug
}

/// ASCII spelling of a lowercase Latin-1 / Latin Extended-A letter.
fn fold_latin(ch: char) -> Option<&'static str> {
    let ascii = match ch {
        'à'..='å' | 'ā' | 'ă' | 'ą' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => "c",
        'ď' | 'đ' | 'ð' => "d",
        'è'..='ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => "e",
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => "g",
        'ĥ' | 'ħ' => "h",
        'ì'..='ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => "i",
        'ĵ' => "j",
        'ķ' => "k",
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => "l",
        'ñ' | 'ń' | 'ņ' | 'ň' => "n",
        'ò'..='ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => "o",
        'œ' => "oe",
        'ŕ' | 'ŗ' | 'ř' => "r",
        'ś' | 'ŝ' | 'ş' | 'š' => "s",
        'ß' => "ss",
        'ţ' | 'ť' | 'ŧ' => "t",
        'þ' => "th",
        'ù'..='ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => "u",
        'ŵ' => "w",
        'ý' | 'ÿ' | 'ŷ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        _ => return None,
    };
    Some(ascii)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dev_id_is_slugified() {
        let identity = MowerIdentity::new("171300123-171300456", "Lawnie", "G");
        assert_eq!(identity.dev_id(), "automower_g_171300123_171300456");
    }

    #[test]
    fn slugify_collapses_and_trims() {
        assert_eq!(slugify("--A  b..C--"), "a_b_c");
        assert_eq!(slugify("Ünïcode 42"), "unicode_42");
        assert_eq!(slugify("Gräsklippare Ø"), "grasklippare_o");
        assert_eq!(slugify("Straße ✂ 1"), "strasse_1");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn model_name_falls_back() {
        assert_eq!(MowerIdentity::new("1", "a", "H").model_name(), "Automower 450X");
        assert_eq!(MowerIdentity::new("1", "a", "Q").model_name(), "Q");
    }

    #[test]
    fn from_robot_info() {
        let robot = RobotInfo {
            id: "abc".into(),
            name: "Front".into(),
            model: "L".into(),
        };
        let identity = MowerIdentity::from(&robot);
        assert_eq!(identity, MowerIdentity::new("abc", "Front", "L"));
    }
}
