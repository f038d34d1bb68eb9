//! Formatting components and the resolved style tables.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Declares a fieldless enum whose variants map to fixed SpreadsheetML
/// attribute values, with `as_str`, `FromStr` and `Display`.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $text)] $variant),+
        }

        impl $name {
            /// Attribute value as written in the XML.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Error> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(Error::invalid_value(stringify!($name), s)),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum! {
    /// Font underline style.
    #[derive(Default)]
    pub enum UnderlineStyle {
        None = "none",
        #[default]
        Single = "single",
        Double = "double",
        SingleAccounting = "singleAccounting",
        DoubleAccounting = "doubleAccounting",
    }
}

string_enum! {
    /// Superscript/subscript placement of a run.
    pub enum VerticalRunAlignment {
        Baseline = "baseline",
        Superscript = "superscript",
        Subscript = "subscript",
    }
}

string_enum! {
    /// Theme font scheme a font belongs to.
    pub enum FontScheme {
        None = "none",
        Major = "major",
        Minor = "minor",
    }
}

string_enum! {
    /// Pattern of a pattern fill.
    #[derive(Default)]
    pub enum PatternType {
        #[default]
        None = "none",
        Solid = "solid",
        MediumGray = "mediumGray",
        DarkGray = "darkGray",
        LightGray = "lightGray",
        DarkHorizontal = "darkHorizontal",
        DarkVertical = "darkVertical",
        DarkDown = "darkDown",
        DarkUp = "darkUp",
        DarkGrid = "darkGrid",
        DarkTrellis = "darkTrellis",
        LightHorizontal = "lightHorizontal",
        LightVertical = "lightVertical",
        LightDown = "lightDown",
        LightUp = "lightUp",
        LightGrid = "lightGrid",
        LightTrellis = "lightTrellis",
        Gray125 = "gray125",
        Gray0625 = "gray0625",
    }
}

string_enum! {
    /// Kind of gradient fill.
    #[derive(Default)]
    pub enum GradientType {
        #[default]
        Linear = "linear",
        Path = "path",
    }
}

string_enum! {
    /// Line style of a border side.
    #[derive(Default)]
    pub enum BorderStyle {
        #[default]
        None = "none",
        DashDot = "dashDot",
        DashDotDot = "dashDotDot",
        Dashed = "dashed",
        Dotted = "dotted",
        Double = "double",
        Hair = "hair",
        Medium = "medium",
        MediumDashDot = "mediumDashDot",
        MediumDashDotDot = "mediumDashDotDot",
        MediumDashed = "mediumDashed",
        SlantDashDot = "slantDashDot",
        Thick = "thick",
        Thin = "thin",
    }
}

string_enum! {
    /// Named side of a border.
    pub enum BorderSide {
        Start = "start",
        End = "end",
        Left = "left",
        Right = "right",
        Top = "top",
        Bottom = "bottom",
        Diagonal = "diagonal",
        Vertical = "vertical",
        Horizontal = "horizontal",
    }
}

string_enum! {
    /// Horizontal cell alignment.
    pub enum HorizontalAlignment {
        General = "general",
        Left = "left",
        Center = "center",
        Right = "right",
        Fill = "fill",
        Justify = "justify",
        CenterContinuous = "centerContinuous",
        Distributed = "distributed",
    }
}

string_enum! {
    /// Vertical cell alignment.
    pub enum VerticalAlignment {
        Top = "top",
        Center = "center",
        Bottom = "bottom",
        Justify = "justify",
        Distributed = "distributed",
    }
}

/// Where a color comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum ColorKind {
    /// System automatic color.
    Auto,
    /// ARGB hex string, e.g. `FF0000FF`.
    Rgb(String),
    /// Index into the theme color scheme.
    Theme(u32),
    /// Index into the indexed palette.
    Indexed(u32),
}

/// A color reference with an optional tint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub kind: ColorKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tint: Option<f64>,
}

impl Color {
    pub fn rgb(argb: impl Into<String>) -> Self {
        Self {
            kind: ColorKind::Rgb(argb.into()),
            tint: None,
        }
    }

    pub fn theme(index: u32) -> Self {
        Self {
            kind: ColorKind::Theme(index),
            tint: None,
        }
    }

    pub fn indexed(index: u32) -> Self {
        Self {
            kind: ColorKind::Indexed(index),
            tint: None,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self {
            kind: ColorKind::Auto,
            tint: None,
        }
    }
}

/// Font definition, also used for rich-text run properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Font {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub italic: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub strikethrough: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<UnderlineStyle>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<FontScheme>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charset: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical_align: Option<VerticalRunAlignment>,
}

/// Pattern fill with optional foreground/background colors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternFill {
    #[serde(default)]
    pub pattern: PatternType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground: Option<Color>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,
}

/// One color stop of a gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub position: f64,
    pub color: Color,
}

/// Gradient fill.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GradientFill {
    #[serde(default)]
    pub gradient_type: GradientType,
    #[serde(default)]
    pub degree: f64,
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub right: f64,
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub bottom: f64,
    #[serde(default)]
    pub stops: Vec<GradientStop>,
}

/// A cell fill: either a pattern or a gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Fill {
    Pattern(PatternFill),
    Gradient(GradientFill),
}

impl Default for Fill {
    fn default() -> Self {
        Fill::Pattern(PatternFill::default())
    }
}

/// Style and color of one border side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BorderProperty {
    #[serde(default)]
    pub style: BorderStyle,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

/// Border made of independently optional sides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Border {
    #[serde(default)]
    pub sides: BTreeMap<BorderSide, BorderProperty>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub diagonal_up: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub diagonal_down: bool,
}

impl Border {
    /// Properties of one side, if that side was declared.
    pub fn side(&self, side: BorderSide) -> Option<&BorderProperty> {
        self.sides.get(&side)
    }
}

/// Identifier at which custom number formats start.
pub const FIRST_CUSTOM_NUMBER_FORMAT_ID: u32 = 164;

/// Built-in number formats that carry a fixed format code.
const BUILTIN_NUMBER_FORMATS: &[(u32, &str)] = &[
    (0, "General"),
    (1, "0"),
    (2, "0.00"),
    (3, "#,##0"),
    (4, "#,##0.00"),
    (9, "0%"),
    (10, "0.00%"),
    (11, "0.00E+00"),
    (12, "# ?/?"),
    (13, "# ??/??"),
    (14, "mm-dd-yy"),
    (15, "d-mmm-yy"),
    (16, "d-mmm"),
    (17, "mmm-yy"),
    (18, "h:mm AM/PM"),
    (19, "h:mm:ss AM/PM"),
    (20, "h:mm"),
    (21, "h:mm:ss"),
    (22, "m/d/yy h:mm"),
    (37, "#,##0 ;(#,##0)"),
    (38, "#,##0 ;[Red](#,##0)"),
    (39, "#,##0.00;(#,##0.00)"),
    (40, "#,##0.00;[Red](#,##0.00)"),
    (45, "mm:ss"),
    (46, "[h]:mm:ss"),
    (47, "mmss.0"),
    (48, "##0.0E+0"),
    (49, "@"),
];

/// A number format: id plus format code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberFormat {
    pub id: u32,
    pub format_code: String,
}

impl NumberFormat {
    /// Create a format, normalizing any-case `GENERAL` to `General`.
    pub fn new(id: u32, format_code: impl Into<String>) -> Self {
        let format_code = format_code.into();
        let format_code = if format_code.eq_ignore_ascii_case("general") {
            "General".to_string()
        } else {
            format_code
        };
        Self { id, format_code }
    }

    /// The `General` format (id 0).
    pub fn general() -> Self {
        Self::new(0, "General")
    }

    /// Built-in format for `id`, if the built-in table defines one.
    pub fn builtin(id: u32) -> Option<Self> {
        BUILTIN_NUMBER_FORMATS
            .iter()
            .find(|(builtin_id, _)| *builtin_id == id)
            .map(|(id, code)| Self::new(*id, *code))
    }

    /// Whether the id lies in the reserved built-in range.
    pub fn is_builtin(&self) -> bool {
        self.id < FIRST_CUSTOM_NUMBER_FORMAT_ID
    }

    /// Whether this format displays a date or time.
    pub fn is_date_format(&self) -> bool {
        if (14..=22).contains(&self.id) || (45..=47).contains(&self.id) {
            return true;
        }
        is_date_format_code(&self.format_code)
    }
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::general()
    }
}

/// Whether a format code has day/month/year tokens outside of literals.
pub fn is_date_format_code(format_code: &str) -> bool {
    let mut in_bracket = false;
    let mut in_quote = false;
    let mut escaped = false;
    let lower = format_code.to_ascii_lowercase();

    for c in lower.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if !in_quote => escaped = true,
            '"' => in_quote = !in_quote,
            '[' if !in_quote => in_bracket = true,
            ']' if !in_quote => in_bracket = false,
            _ if in_bracket || in_quote => {}
            'd' | 'y' => return true,
            // month only when the code also has days or years; otherwise minutes
            'm' if lower.contains('d') || lower.contains('y') => return true,
            _ => {}
        }
    }
    false
}

/// Horizontal/vertical alignment and text control.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Alignment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizontal: Option<HorizontalAlignment>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical: Option<VerticalAlignment>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub wrap_text: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub shrink_to_fit: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indent: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_rotation: Option<i32>,
}

/// Cell protection flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Protection {
    pub locked: bool,
    pub hidden: bool,
}

impl Default for Protection {
    fn default() -> Self {
        Self {
            locked: true,
            hidden: false,
        }
    }
}

/// A formatting component together with its "applied" flag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleComponent<T> {
    pub value: T,
    pub applied: bool,
}

impl<T> StyleComponent<T> {
    pub fn new(value: T, applied: bool) -> Self {
        Self { value, applied }
    }

    /// The value when applied.
    pub fn effective(&self) -> Option<&T> {
        self.applied.then_some(&self.value)
    }
}

/// A named, reusable style (`cellStyle` paired with its `cellStyleXfs` record).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellStyle {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub builtin_id: Option<u32>,

    pub alignment: StyleComponent<Alignment>,
    pub border: StyleComponent<Border>,
    pub fill: StyleComponent<Fill>,
    pub font: StyleComponent<Font>,
    pub number_format: StyleComponent<NumberFormat>,
    pub protection: StyleComponent<Protection>,
}

/// An anonymous per-cell format (`cellXfs` record) bound to a style by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellFormat {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    pub alignment: StyleComponent<Alignment>,
    pub border: StyleComponent<Border>,
    pub fill: StyleComponent<Fill>,
    pub font: StyleComponent<Font>,
    pub number_format: StyleComponent<NumberFormat>,
    pub protection: StyleComponent<Protection>,
}

/// Every table read from the styles part.
///
/// Component tables keep file order; `cellXfs`/`cellStyleXfs` records
/// refer into them by position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stylesheet {
    /// Custom number formats in file order.
    pub number_formats: Vec<NumberFormat>,
    pub fonts: Vec<Font>,
    pub fills: Vec<Fill>,
    pub borders: Vec<Border>,
    /// Custom indexed palette; empty means the default palette.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indexed_colors: Vec<Color>,
    pub styles: Vec<CellStyle>,
    pub formats: Vec<CellFormat>,
}

impl Stylesheet {
    /// Resolve a number format id: a custom entry with that id wins, ids
    /// below 164 fall back to the built-in table, anything else is `General`.
    pub fn lookup_number_format(&self, id: u32) -> NumberFormat {
        if let Some(custom) = self.number_formats.iter().find(|nf| nf.id == id) {
            return custom.clone();
        }
        if id < FIRST_CUSTOM_NUMBER_FORMAT_ID {
            return NumberFormat::builtin(id).unwrap_or_else(|| NumberFormat::new(id, "General"));
        }
        NumberFormat::general()
    }

    /// Cell format at `index`.
    pub fn format(&self, index: usize) -> Option<&CellFormat> {
        self.formats.get(index)
    }

    /// Named style.
    pub fn style(&self, name: &str) -> Option<&CellStyle> {
        self.styles.iter().find(|s| s.name == name)
    }

    /// Whether the cell format at `index` displays dates.
    pub fn is_date_format(&self, index: usize) -> bool {
        self.format(index)
            .is_some_and(|f| f.number_format.value.is_date_format())
    }

    /// Whether nothing was read.
    pub fn is_empty(&self) -> bool {
        self.number_formats.is_empty()
            && self.fonts.is_empty()
            && self.fills.is_empty()
            && self.borders.is_empty()
            && self.styles.is_empty()
            && self.formats.is_empty()
    }
}
