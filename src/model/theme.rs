//! Workbook theme colors.

use serde::{Deserialize, Serialize};

/// The twelve slots of a theme color scheme, as `RRGGBB` hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub name: String,
    pub dk1: String,
    pub lt1: String,
    pub dk2: String,
    pub lt2: String,
    pub accent1: String,
    pub accent2: String,
    pub accent3: String,
    pub accent4: String,
    pub accent5: String,
    pub accent6: String,
    pub hlink: String,
    pub fol_hlink: String,
}

impl Default for ColorScheme {
    fn default() -> Self {
        // Office theme
        Self {
            name: "Office".to_string(),
            dk1: "000000".to_string(),
            lt1: "FFFFFF".to_string(),
            dk2: "1F497D".to_string(),
            lt2: "EEECE1".to_string(),
            accent1: "4F81BD".to_string(),
            accent2: "C0504D".to_string(),
            accent3: "9BBB59".to_string(),
            accent4: "8064A2".to_string(),
            accent5: "4BACC6".to_string(),
            accent6: "F79646".to_string(),
            hlink: "0000FF".to_string(),
            fol_hlink: "800080".to_string(),
        }
    }
}

impl ColorScheme {
    /// Mutable slot by its element name (`dk1`, `accent3`, `folHlink`, ...).
    pub fn slot_mut(&mut self, name: &str) -> Option<&mut String> {
        Some(match name {
            "dk1" => &mut self.dk1,
            "lt1" => &mut self.lt1,
            "dk2" => &mut self.dk2,
            "lt2" => &mut self.lt2,
            "accent1" => &mut self.accent1,
            "accent2" => &mut self.accent2,
            "accent3" => &mut self.accent3,
            "accent4" => &mut self.accent4,
            "accent5" => &mut self.accent5,
            "accent6" => &mut self.accent6,
            "hlink" => &mut self.hlink,
            "folHlink" => &mut self.fol_hlink,
            _ => return None,
        })
    }
}

/// Theme read from the theme part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ColorScheme,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "Office Theme".to_string(),
            colors: ColorScheme::default(),
        }
    }
}

impl Theme {
    /// Resolve a SpreadsheetML `theme="n"` color index.
    ///
    /// Cell styles number the scheme with light and dark swapped:
    /// 0 is `lt1`, 1 is `dk1`, 2 is `lt2`, 3 is `dk2`.
    pub fn color_by_index(&self, index: u32) -> Option<&str> {
        let c = &self.colors;
        let color = match index {
            0 => &c.lt1,
            1 => &c.dk1,
            2 => &c.lt2,
            3 => &c.dk2,
            4 => &c.accent1,
            5 => &c.accent2,
            6 => &c.accent3,
            7 => &c.accent4,
            8 => &c.accent5,
            9 => &c.accent6,
            10 => &c.hlink,
            11 => &c.fol_hlink,
            _ => return None,
        };
        Some(color)
    }
}
